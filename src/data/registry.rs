use std::thread;

use super::clean::{clean_sheet, DimensionSpec};
use super::loader::{load_reference, load_survey, DataSource, SurveySheets};
use super::model::{CleanedTable, Dimension};
use super::reference::IndustryReference;
use crate::config::{AppConfig, SheetNames};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// TableRegistry – the four cleaned tables, read-only after startup
// ---------------------------------------------------------------------------

/// Owns the cleaned tables for the life of the process. Built once, never
/// mutated; share it behind an `Arc` and query it from anywhere.
#[derive(Debug, Clone)]
pub struct TableRegistry {
    national: CleanedTable,
    sector: CleanedTable,
    state: CleanedTable,
    employment: CleanedTable,
}

impl TableRegistry {
    /// Load both sources and clean every sheet.
    ///
    /// The two loaders share nothing and run side by side. A failure in
    /// either aborts construction before any table is cleaned.
    pub fn load(config: &AppConfig) -> Result<Self> {
        let workbook = DataSource::parse(&config.workbook);
        let reference_source = DataSource::parse(&config.reference);

        let (survey, reference) = thread::scope(|scope| {
            let reference = scope.spawn(|| load_reference(&reference_source, &config.fetch));
            let survey = load_survey(&workbook, &config.sheets, &config.fetch);
            (survey, reference.join())
        });

        let reference = reference.unwrap_or_else(|_| {
            Err(PipelineError::ReferenceUnavailable {
                source_name: reference_source.to_string(),
                reason: "reference loader panicked".to_string(),
            })
        })?;
        let survey = survey?;

        Self::from_sources(&survey, &reference, &config.sheets)
    }

    /// Clean already-loaded sheets.
    pub fn from_sources(
        survey: &SurveySheets,
        reference: &IndustryReference,
        sheets: &SheetNames,
    ) -> Result<Self> {
        let clean = |dimension: Dimension| {
            let spec = DimensionSpec::for_dimension(dimension, sheets);
            let reference = (dimension == Dimension::Sector).then_some(reference);
            clean_sheet(survey.get(dimension), &spec, reference)
        };

        Ok(TableRegistry {
            national: clean(Dimension::National)?,
            sector: clean(Dimension::Sector)?,
            state: clean(Dimension::State)?,
            employment: clean(Dimension::Employment)?,
        })
    }

    pub fn get(&self, dimension: Dimension) -> &CleanedTable {
        match dimension {
            Dimension::National => &self.national,
            Dimension::Sector => &self.sector,
            Dimension::State => &self.state,
            Dimension::Employment => &self.employment,
        }
    }
}
