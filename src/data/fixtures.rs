//! Small in-memory survey sheets shared by the pipeline tests.

use super::loader::SurveySheets;
use super::model::{CellValue, RawSheet};
use super::questions::QUESTION_MAP;
use super::reference::IndustryReference;

pub const APPLICATIONS: &str = "What types of applications of AI did this business use?";
pub const OPERATIONS: &str = "In which business operations did this business use AI?";

pub const OUT_OF_SCOPE: &str =
    "In the last two weeks, did this business use Artificial Intelligence (AI) in producing goods or services?";

pub fn s(v: &str) -> CellValue {
    CellValue::String(v.to_string())
}

fn headers(extra: Option<&str>) -> Vec<String> {
    let mut h = vec![
        "Question ID",
        "Question",
        "Answer ID",
        "Answer",
        "Estimate",
        "Standard Error",
        "Scope (see data dictionary)",
    ];
    if let Some(extra) = extra {
        h.insert(0, extra);
    }
    h.into_iter().map(str::to_string).collect()
}

/// One survey row; `segment` is prepended when the sheet has a dimension column.
pub fn survey_row(
    segment: Option<CellValue>,
    question: &str,
    answer: CellValue,
    estimate: CellValue,
    standard_error: CellValue,
) -> Vec<CellValue> {
    let mut row = vec![
        CellValue::Integer(7),
        s(question),
        CellValue::Integer(1),
        answer,
        estimate,
        standard_error,
        s("All employer businesses"),
    ];
    if let Some(segment) = segment {
        row.insert(0, segment);
    }
    row
}

/// Two questions × three answers for one segment value.
fn block(segment: Option<CellValue>) -> Vec<Vec<CellValue>> {
    let applications = QUESTION_MAP[0].0;
    let operations = QUESTION_MAP[2].0;
    vec![
        survey_row(segment.clone(), applications, s("Marketing automation"), s("4.1%"), s("0.3%")),
        survey_row(segment.clone(), applications, s("Machine learning"), s("20.0%"), s("1.1%")),
        survey_row(segment.clone(), applications, s("Natural language processing"), s("12.5%"), s("0.9%")),
        survey_row(segment.clone(), operations, s("Production"), s("9.0%"), s("0.8%")),
        survey_row(segment.clone(), operations, s("Customer service"), s("9.0%"), s("0.7%")),
        survey_row(segment, operations, s("Marketing"), s("15.3%"), s("1.0%")),
    ]
}

pub fn national_sheet() -> RawSheet {
    let mut rows = block(None);
    rows.push(survey_row(None, OUT_OF_SCOPE, s("Yes"), s("5.0%"), s("0.2%")));
    rows.push(survey_row(None, QUESTION_MAP[0].0, CellValue::Null, s("1.0%"), s("0.1%")));
    RawSheet::new("National Response Estimates", headers(None), rows)
}

pub fn sector_sheet() -> RawSheet {
    let mut rows = block(Some(s("11")));
    rows.extend(block(Some(CellValue::Float(52.0))));
    // Not a two-digit sector in the reference table.
    rows.extend(block(Some(s("99"))));
    RawSheet::new("Sector Response Estimates", headers(Some("Sector")), rows)
}

/// Washington carries one suppressed estimate.
pub fn state_sheet() -> RawSheet {
    let mut rows = block(Some(s("WA")));
    rows[1][5] = s("S");
    rows.extend(block(Some(s("AK"))));
    rows.push(survey_row(Some(s("AK")), OUT_OF_SCOPE, s("No"), s("S"), s("S")));
    RawSheet::new("State Response Estimates", headers(Some("State")), rows)
}

pub fn employment_sheet() -> RawSheet {
    let mut rows = block(Some(s("A")));
    rows.extend(block(Some(s("E"))));
    rows.extend(block(Some(s("G"))));
    RawSheet::new("Employment Response Estimates", headers(Some("Empsize")), rows)
}

pub fn survey() -> SurveySheets {
    SurveySheets {
        national: national_sheet(),
        sector: sector_sheet(),
        state: state_sheet(),
        employment: employment_sheet(),
    }
}

pub fn reference() -> IndustryReference {
    IndustryReference::from_rows(
        [
            ("11", "Agriculture, Forestry, Fishing and HuntingT"),
            ("52", "Finance and InsuranceT"),
            ("521", "Monetary AuthoritiesT"),
        ]
        .into_iter()
        .map(|(c, t)| (c.to_string(), t.to_string())),
    )
}
