//! Startup configuration: where the workbooks live and how to fetch them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::Dimension;

pub const CONFIG_ENV: &str = "CENSUS_AI_CONFIG";
pub const WORKBOOK_ENV: &str = "CENSUS_AI_WORKBOOK";
pub const REFERENCE_ENV: &str = "CENSUS_AI_REFERENCE";

const DEFAULT_WORKBOOK: &str = "ai_supplement_us_census.xlsx";
const DEFAULT_REFERENCE: &str = "https://www.census.gov/naics/2022NAICS/2-6%20digit_2022_Codes.xlsx";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Survey workbook: local path or http(s) URL.
    pub workbook: String,
    /// Industry classification table: local path or http(s) URL.
    pub reference: String,
    pub sheets: SheetNames,
    pub fetch: FetchConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workbook: DEFAULT_WORKBOOK.to_string(),
            reference: DEFAULT_REFERENCE.to_string(),
            sheets: SheetNames::default(),
            fetch: FetchConfig::default(),
        }
    }
}

/// Worksheet name for each dimension.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    pub national: String,
    pub sector: String,
    pub state: String,
    pub employment: String,
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            national: "National Response Estimates".to_string(),
            sector: "Sector Response Estimates".to_string(),
            state: "State Response Estimates".to_string(),
            employment: "Employment Response Estimates".to_string(),
        }
    }
}

impl SheetNames {
    pub fn name(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::National => &self.national,
            Dimension::Sector => &self.sector,
            Dimension::State => &self.state,
            Dimension::Employment => &self.employment,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout for remote sources.
    pub timeout_secs: u64,
    /// Total attempts for the remote reference fetch.
    pub reference_attempts: u32,
    /// Delay before the first retry; doubled for each further one.
    pub backoff_ms: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            reference_attempts: 2,
            backoff_ms: 500,
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn backoff(&self, retry: u32) -> Duration {
        Duration::from_millis(self.backoff_ms.saturating_mul(1u64 << retry.min(16)))
    }
}

impl AppConfig {
    /// Resolve configuration from the command line and environment.
    ///
    /// The JSON file comes from the first CLI argument, else `CENSUS_AI_CONFIG`;
    /// without either the defaults are used. `CENSUS_AI_WORKBOOK` and
    /// `CENSUS_AI_REFERENCE` override the sources in both cases.
    pub fn load() -> Result<Self> {
        let path = std::env::args()
            .nth(1)
            .or_else(|| std::env::var(CONFIG_ENV).ok())
            .map(PathBuf::from);

        let config = match path {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        Ok(config.with_overrides(
            std::env::var(WORKBOOK_ENV).ok(),
            std::env::var(REFERENCE_ENV).ok(),
        ))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config file {}", path.display()))
    }

    pub fn with_overrides(mut self, workbook: Option<String>, reference: Option<String>) -> Self {
        if let Some(workbook) = workbook.filter(|s| !s.is_empty()) {
            self.workbook = workbook;
        }
        if let Some(reference) = reference.filter(|s| !s.is_empty()) {
            self.reference = reference;
        }
        self
    }
}
