use super::filter::by_estimate_desc;
use super::model::{CellValue, CleanedRow, CleanedTable, Dimension, EmpSize, RawSheet, Segment};
use super::questions;
use super::reference::IndustryReference;
use crate::config::SheetNames;
use crate::error::{PipelineError, Result};

/// Census disclosure-suppression flag.
pub const SUPPRESSION_MARKER: &str = "S";

/// Administrative columns that never reach a cleaned table.
const DROPPED_COLUMNS: [&str; 3] = ["Scope (see data dictionary)", "Question ID", "Answer ID"];

// ---------------------------------------------------------------------------
// Per-dimension configuration
// ---------------------------------------------------------------------------

/// How the dimension column of a cleaned row is derived from the renamed
/// sheet columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRule {
    /// National aggregate: no dimension column.
    None,
    /// Sector code, inner-joined against the industry reference.
    IndustryJoin { column: &'static str },
    /// State name copied through as text.
    State { column: &'static str },
    /// Employment-size code mapped to small / medium / large.
    FirmSize { column: &'static str },
}

/// Everything that differs between the four cleaning pipelines.
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionSpec {
    pub dimension: Dimension,
    pub sheet: String,
    /// Mask `"S"` cells and drop incomplete rows.
    pub suppression: bool,
    /// Also read a leftover `"S"` in the percentage columns as missing.
    pub residual_marker: bool,
    pub segment: SegmentRule,
}

impl DimensionSpec {
    pub fn for_dimension(dimension: Dimension, sheets: &SheetNames) -> Self {
        let sheet = sheets.name(dimension).to_string();
        match dimension {
            // The national aggregate carries no suppression marker and is
            // reproduced as published.
            Dimension::National => DimensionSpec {
                dimension,
                sheet,
                suppression: false,
                residual_marker: false,
                segment: SegmentRule::None,
            },
            Dimension::Sector => DimensionSpec {
                dimension,
                sheet,
                suppression: true,
                residual_marker: false,
                segment: SegmentRule::IndustryJoin { column: "sector" },
            },
            // Suppression can also sit in a percentage cell the row filter
            // did not look at.
            Dimension::State => DimensionSpec {
                dimension,
                sheet,
                suppression: true,
                residual_marker: true,
                segment: SegmentRule::State { column: "state" },
            },
            Dimension::Employment => DimensionSpec {
                dimension,
                sheet,
                suppression: true,
                residual_marker: false,
                segment: SegmentRule::FirmSize { column: "empsize" },
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Pipeline
// ---------------------------------------------------------------------------

/// Run the full cleaning pipeline for one dimension.
///
/// `reference` is only consulted by the sector join and may be `None` for
/// every other dimension.
pub fn clean_sheet(
    raw: &RawSheet,
    spec: &DimensionSpec,
    reference: Option<&IndustryReference>,
) -> Result<CleanedTable> {
    let scoped = scope_filter(raw)?;
    if scoped.is_empty() {
        log::warn!("{}: no AI-adoption questions in {} rows", spec.sheet, raw.len());
    }
    let in_scope = scoped.len();

    let mut frame = project(scoped);
    if spec.suppression {
        frame = drop_suppressed(frame);
    }
    let suppressed = in_scope - frame.len();
    let frame = rename_columns(frame);

    let question_idx = require(&frame, "question")?;
    let answer_idx = require(&frame, "answer")?;
    let estimate_idx = require(&frame, "estimate")?;
    let se_idx = require(&frame, "standard_error")?;
    let segment_idx = match spec.segment {
        SegmentRule::None => None,
        SegmentRule::IndustryJoin { column }
        | SegmentRule::State { column }
        | SegmentRule::FirmSize { column } => Some(require(&frame, column)?),
    };
    let reference = match (spec.segment, reference) {
        (SegmentRule::IndustryJoin { .. }, None) => {
            return Err(PipelineError::ReferenceUnavailable {
                source_name: spec.sheet.clone(),
                reason: "sector join needs the industry reference".to_string(),
            })
        }
        (_, r) => r,
    };

    let mut rows = Vec::with_capacity(frame.len());
    let mut unmatched = 0usize;

    for cells in &frame.rows {
        let question_text = cells[question_idx].as_text().unwrap_or_default();
        let question = questions::normalize(&question_text)?;

        let segment_cell = segment_idx.map(|i| &cells[i]);
        let segment = match derive_segment(spec, segment_cell, reference)? {
            Some(segment) => segment,
            None => {
                unmatched += 1;
                log::debug!(
                    "{}: dropping row without a {} match: {:?}",
                    spec.sheet,
                    spec.dimension,
                    segment_cell
                );
                continue;
            }
        };

        rows.push(CleanedRow {
            question,
            answer: cells[answer_idx].as_text(),
            estimate: parse_percent(&cells[estimate_idx], spec, "estimate")?,
            standard_error: parse_percent(&cells[se_idx], spec, "standard_error")?,
            segment,
        });
    }

    rows.sort_by(|a, b| by_estimate_desc(a.estimate, b.estimate));

    log::info!(
        "Cleaned {} table: {} rows ({} in scope, {} suppressed, {} unmatched)",
        spec.dimension,
        rows.len(),
        in_scope,
        suppressed,
        unmatched
    );
    let table = CleanedTable::new(spec.dimension, rows);
    if table.is_empty() {
        log::warn!("{} table is empty; its tab will show no results", spec.dimension);
    }
    Ok(table)
}

fn missing_column(sheet: &RawSheet, column: &str) -> PipelineError {
    PipelineError::WorkbookLoad {
        source_name: sheet.name.clone(),
        reason: format!("missing column '{column}'"),
    }
}

fn require(sheet: &RawSheet, column: &str) -> Result<usize> {
    sheet.column(column).ok_or_else(|| missing_column(sheet, column))
}

/// Keep the AI-adoption questions only.
fn scope_filter(raw: &RawSheet) -> Result<RawSheet> {
    let idx = require(raw, "Question")?;
    let rows = raw
        .rows
        .iter()
        .filter(|row| {
            row.get(idx)
                .and_then(CellValue::as_str)
                .is_some_and(questions::is_in_scope)
        })
        .cloned()
        .collect();
    Ok(RawSheet::new(raw.name.clone(), raw.headers.clone(), rows))
}

/// Drop the administrative columns that are present.
fn project(sheet: RawSheet) -> RawSheet {
    let keep: Vec<usize> = (0..sheet.headers.len())
        .filter(|&i| !DROPPED_COLUMNS.contains(&sheet.headers[i].as_str()))
        .collect();

    let headers = keep.iter().map(|&i| sheet.headers[i].clone()).collect();
    let rows = sheet
        .rows
        .iter()
        .map(|row| keep.iter().map(|&i| row.get(i).cloned().unwrap_or(CellValue::Null)).collect())
        .collect();
    RawSheet::new(sheet.name, headers, rows)
}

/// Mask suppression markers as missing, then drop every incomplete row.
fn drop_suppressed(sheet: RawSheet) -> RawSheet {
    let RawSheet { name, headers, rows } = sheet;
    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .map(|cell| match cell {
                    CellValue::String(s) if s == SUPPRESSION_MARKER => CellValue::Null,
                    other => other,
                })
                .collect::<Vec<_>>()
        })
        .filter(|row| row.iter().all(|c| !c.is_null()))
        .collect();
    RawSheet::new(name, headers, rows)
}

/// "Standard Error" → "standard_error".
fn rename_columns(sheet: RawSheet) -> RawSheet {
    let headers = sheet
        .headers
        .iter()
        .map(|h| h.to_lowercase().replace(' ', "_"))
        .collect();
    RawSheet::new(sheet.name, headers, sheet.rows)
}

/// `Ok(None)` means the row has no join partner and is dropped.
fn derive_segment(
    spec: &DimensionSpec,
    cell: Option<&CellValue>,
    reference: Option<&IndustryReference>,
) -> Result<Option<Segment>> {
    let text = cell.and_then(CellValue::as_text);
    match spec.segment {
        SegmentRule::None => Ok(Some(Segment::None)),
        SegmentRule::IndustryJoin { .. } => Ok(text
            .and_then(|code| reference?.title(code.trim()))
            .map(|title| Segment::Industry(title.to_string()))),
        SegmentRule::State { .. } => Ok(text.map(Segment::State)),
        SegmentRule::FirmSize { .. } => {
            let code = text.unwrap_or_default();
            EmpSize::from_code(code.trim())
                .map(|size| Some(Segment::EmpSize(size)))
                .ok_or_else(|| PipelineError::UnknownFirmSizeCode {
                    sheet: spec.sheet.clone(),
                    code,
                })
        }
    }
}

/// Strip a trailing "%" and parse; the result must lie in [0, 100].
///
/// The survey publishes percentages as text. A numeric cell is rejected:
/// Excel stores a percent-formatted number as a fraction (12.5% → 0.125),
/// so its unit cannot be trusted.
fn parse_percent(cell: &CellValue, spec: &DimensionSpec, column: &str) -> Result<Option<f64>> {
    let invalid = || PipelineError::EstimateParse {
        sheet: spec.sheet.clone(),
        column: column.to_string(),
        value: cell.to_string(),
    };

    let value = match cell {
        CellValue::Null => return Ok(None),
        CellValue::String(s) if spec.residual_marker && s.trim() == SUPPRESSION_MARKER => {
            return Ok(None)
        }
        CellValue::String(s) => {
            let s = s.trim();
            s.strip_suffix('%')
                .unwrap_or(s)
                .trim()
                .parse::<f64>()
                .map_err(|_| invalid())?
        }
        CellValue::Float(_) | CellValue::Integer(_) | CellValue::Bool(_) => return Err(invalid()),
    };

    if (0.0..=100.0).contains(&value) {
        Ok(Some(value))
    } else {
        Err(invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::fixtures::{self, s, survey_row, APPLICATIONS};
    use crate::data::questions::QUESTION_MAP;

    fn spec(dimension: Dimension) -> DimensionSpec {
        DimensionSpec::for_dimension(dimension, &SheetNames::default())
    }

    #[test]
    fn national_keeps_every_in_scope_row() {
        let table = clean_sheet(&fixtures::national_sheet(), &spec(Dimension::National), None).unwrap();
        // 6 answers plus the row without answer text; the out-of-scope question is gone.
        assert_eq!(table.len(), 7);
        assert!(table.rows.iter().any(|r| r.answer.is_none()));
        assert!(table.rows.iter().all(|r| r.segment == Segment::None));
    }

    #[test]
    fn state_drops_exactly_the_suppressed_row() {
        let table = clean_sheet(&fixtures::state_sheet(), &spec(Dimension::State), None).unwrap();
        assert_eq!(table.len(), 11);
        let wa_ml = table
            .rows
            .iter()
            .filter(|r| r.segment == Segment::State("WA".into()))
            .filter(|r| r.answer.as_deref() == Some("Machine learning"))
            .count();
        assert_eq!(wa_ml, 0);
    }

    #[test]
    fn questions_are_normalized_labels() {
        let table = clean_sheet(&fixtures::state_sheet(), &spec(Dimension::State), None).unwrap();
        let labels: Vec<_> = QUESTION_MAP.iter().map(|(_, label)| *label).collect();
        assert!(table.rows.iter().all(|r| labels.contains(&r.question)));
        // Alaska's machine-learning share is the largest surviving estimate.
        assert_eq!(table.questions()[0], APPLICATIONS);
    }

    #[test]
    fn rows_are_stored_by_descending_estimate() {
        let table = clean_sheet(&fixtures::national_sheet(), &spec(Dimension::National), None).unwrap();
        let estimates: Vec<f64> = table.rows.iter().filter_map(|r| r.estimate).collect();
        assert_eq!(estimates, vec![20.0, 15.3, 12.5, 9.0, 9.0, 4.1, 1.0]);
        // Equal estimates keep sheet order.
        let nine: Vec<_> = table
            .rows
            .iter()
            .filter(|r| r.estimate == Some(9.0))
            .map(|r| r.answer.as_deref().unwrap_or_default())
            .collect();
        assert_eq!(nine, vec!["Production", "Customer service"]);
    }

    #[test]
    fn sector_join_is_inner() {
        let reference = fixtures::reference();
        let table =
            clean_sheet(&fixtures::sector_sheet(), &spec(Dimension::Sector), Some(&reference)).unwrap();
        assert_eq!(table.len(), 12);
        assert_eq!(
            table.segment_values(),
            vec![
                "Agriculture, Forestry, Fishing & Hunting".to_string(),
                "Finance & Insurance".to_string()
            ]
        );
        for row in &table.rows {
            let Segment::Industry(title) = &row.segment else {
                panic!("sector row without industry: {row:?}");
            };
            assert!(["11", "52"].iter().any(|code| reference.title(code) == Some(title.as_str())));
        }
    }

    #[test]
    fn sector_without_reference_is_fatal() {
        let err = clean_sheet(&fixtures::sector_sheet(), &spec(Dimension::Sector), None).unwrap_err();
        assert!(matches!(err, PipelineError::ReferenceUnavailable { .. }));
    }

    #[test]
    fn employment_codes_map_to_size_classes() {
        let table =
            clean_sheet(&fixtures::employment_sheet(), &spec(Dimension::Employment), None).unwrap();
        assert_eq!(table.len(), 18);
        assert_eq!(table.segment_values(), vec!["Large", "Medium", "Small"]);
    }

    #[test]
    fn unknown_firm_size_code_is_fatal() {
        let raw = RawSheet::new(
            "Employment Response Estimates",
            fixtures::employment_sheet().headers,
            vec![survey_row(Some(s("H")), QUESTION_MAP[0].0, s("Machine learning"), s("3%"), s("1%"))],
        );
        let err = clean_sheet(&raw, &spec(Dimension::Employment), None).unwrap_err();
        assert!(matches!(err, PipelineError::UnknownFirmSizeCode { code, .. } if code == "H"));
    }

    #[test]
    fn unparseable_estimate_is_fatal() {
        let raw = RawSheet::new(
            "National Response Estimates",
            fixtures::national_sheet().headers,
            vec![survey_row(None, QUESTION_MAP[0].0, s("Machine learning"), s("twelve"), s("1%"))],
        );
        let err = clean_sheet(&raw, &spec(Dimension::National), None).unwrap_err();
        assert!(matches!(err, PipelineError::EstimateParse { column, .. } if column == "estimate"));
    }

    #[test]
    fn national_does_not_treat_marker_as_missing() {
        let raw = RawSheet::new(
            "National Response Estimates",
            fixtures::national_sheet().headers,
            vec![survey_row(None, QUESTION_MAP[0].0, s("Machine learning"), s("S"), s("1%"))],
        );
        assert!(clean_sheet(&raw, &spec(Dimension::National), None).is_err());
    }

    #[test]
    fn in_scope_question_without_label_is_fatal() {
        let raw = RawSheet::new(
            "National Response Estimates",
            fixtures::national_sheet().headers,
            vec![survey_row(None, "Which changes are planned?", s("Hiring"), s("3%"), s("1%"))],
        );
        let err = clean_sheet(&raw, &spec(Dimension::National), None).unwrap_err();
        assert!(matches!(err, PipelineError::UnmappedQuestion(_)));
    }

    #[test]
    fn sheet_without_ai_questions_cleans_to_empty_table() {
        let raw = RawSheet::new(
            "Employment Response Estimates",
            fixtures::employment_sheet().headers,
            vec![survey_row(Some(s("A")), fixtures::OUT_OF_SCOPE, s("Yes"), s("3%"), s("1%"))],
        );
        let table = clean_sheet(&raw, &spec(Dimension::Employment), None).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn missing_question_column_is_a_load_error() {
        let raw = RawSheet::new("National Response Estimates", vec!["Answer".into()], vec![]);
        let err = clean_sheet(&raw, &spec(Dimension::National), None).unwrap_err();
        assert!(matches!(err, PipelineError::WorkbookLoad { reason, .. } if reason.contains("Question")));
    }

    #[test]
    fn residual_marker_only_applies_to_state() {
        let state = spec(Dimension::State);
        let sector = spec(Dimension::Sector);
        assert_eq!(parse_percent(&s("S"), &state, "estimate").unwrap(), None);
        assert!(parse_percent(&s("S"), &sector, "estimate").is_err());
    }

    #[test]
    fn percent_parsing_accepts_percent_text() {
        let national = spec(Dimension::National);
        assert_eq!(parse_percent(&s("12.5%"), &national, "estimate").unwrap(), Some(12.5));
        assert_eq!(parse_percent(&s(" 7 % "), &national, "estimate").unwrap(), Some(7.0));
        assert_eq!(parse_percent(&CellValue::Null, &national, "estimate").unwrap(), None);
        assert!(parse_percent(&s("120%"), &national, "estimate").is_err());
        assert!(parse_percent(&s("NaN"), &national, "estimate").is_err());
        assert!(parse_percent(&s("-1%"), &national, "estimate").is_err());
    }

    #[test]
    fn numeric_percentage_cells_are_rejected() {
        let national = spec(Dimension::National);
        for cell in [CellValue::Float(0.125), CellValue::Integer(12), CellValue::Bool(true)] {
            let err = parse_percent(&cell, &national, "estimate").unwrap_err();
            assert!(matches!(err, PipelineError::EstimateParse { column, .. } if column == "estimate"));
        }
    }

    #[test]
    fn numeric_estimate_in_sheet_is_fatal() {
        let raw = RawSheet::new(
            "National Response Estimates",
            fixtures::national_sheet().headers,
            vec![survey_row(None, QUESTION_MAP[0].0, s("Machine learning"), CellValue::Float(0.125), s("1%"))],
        );
        let err = clean_sheet(&raw, &spec(Dimension::National), None).unwrap_err();
        assert!(matches!(err, PipelineError::EstimateParse { value, .. } if value == "0.125"));
    }

    #[test]
    fn renamed_headers_are_snake_case() {
        let raw = RawSheet::new("x", vec!["Standard Error".into(), "Question".into()], vec![]);
        assert_eq!(rename_columns(raw).headers, vec!["standard_error", "question"]);
    }
}
