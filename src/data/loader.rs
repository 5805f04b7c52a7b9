use std::fmt;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};

use super::model::{CellValue, Dimension, RawSheet};
use super::reference::IndustryReference;
use crate::config::{FetchConfig, SheetNames};
use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// Where a workbook comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Local(PathBuf),
    Remote(String),
}

impl DataSource {
    pub fn parse(location: &str) -> Self {
        if location.starts_with("http://") || location.starts_with("https://") {
            DataSource::Remote(location.to_string())
        } else {
            DataSource::Local(PathBuf::from(location))
        }
    }

    /// Lower-cased file extension, ignoring any URL query or fragment.
    pub fn extension(&self) -> String {
        let path = match self {
            DataSource::Local(path) => path.as_path(),
            DataSource::Remote(url) => {
                let end = url.find(|c: char| c == '?' || c == '#').unwrap_or(url.len());
                Path::new(&url[..end])
            }
        };
        path.extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Local(path) => write!(f, "{}", path.display()),
            DataSource::Remote(url) => write!(f, "{url}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Survey workbook
// ---------------------------------------------------------------------------

/// The four raw response-estimate sheets.
#[derive(Debug, Clone)]
pub struct SurveySheets {
    pub national: RawSheet,
    pub sector: RawSheet,
    pub state: RawSheet,
    pub employment: RawSheet,
}

impl SurveySheets {
    pub fn get(&self, dimension: Dimension) -> &RawSheet {
        match dimension {
            Dimension::National => &self.national,
            Dimension::Sector => &self.sector,
            Dimension::State => &self.state,
            Dimension::Employment => &self.employment,
        }
    }
}

/// Load the four named sheets of the survey workbook, untransformed.
///
/// Remote workbooks are fetched once; any failure is fatal.
pub fn load_survey(source: &DataSource, sheets: &SheetNames, fetch: &FetchConfig) -> Result<SurveySheets> {
    let fail = |reason: String| PipelineError::WorkbookLoad {
        source_name: source.to_string(),
        reason,
    };

    let loaded = match source {
        DataSource::Local(path) => {
            let mut workbook = open_workbook_auto(path).map_err(|e| fail(e.to_string()))?;
            read_survey_sheets(&mut workbook, sheets)
        }
        DataSource::Remote(url) => {
            let client = http_client(fetch).map_err(&fail)?;
            let bytes = fetch_bytes(&client, url).map_err(|e| fail(e.to_string()))?;
            let mut workbook =
                open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| fail(e.to_string()))?;
            read_survey_sheets(&mut workbook, sheets)
        }
    }
    .map_err(fail)?;

    log::info!(
        "Loaded survey workbook {source}: {} national, {} sector, {} state, {} employment rows",
        loaded.national.len(),
        loaded.sector.len(),
        loaded.state.len(),
        loaded.employment.len()
    );
    Ok(loaded)
}

fn read_survey_sheets<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    names: &SheetNames,
) -> std::result::Result<SurveySheets, String> {
    let available = workbook.sheet_names();
    let mut read = |dimension: Dimension| -> std::result::Result<RawSheet, String> {
        let name = names.name(dimension);
        if !available.iter().any(|s| s == name) {
            return Err(format!("missing sheet '{name}'"));
        }
        let range = workbook
            .worksheet_range(name)
            .map_err(|e| format!("reading sheet '{name}': {e}"))?;
        range_to_sheet(name, &range)
    };

    Ok(SurveySheets {
        national: read(Dimension::National)?,
        sector: read(Dimension::Sector)?,
        state: read(Dimension::State)?,
        employment: read(Dimension::Employment)?,
    })
}

/// First row becomes the header; fully blank rows are skipped.
fn range_to_sheet(name: &str, range: &Range<Data>) -> std::result::Result<RawSheet, String> {
    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .ok_or_else(|| format!("sheet '{name}' is empty"))?
        .iter()
        .map(|cell| cell_from_data(cell).as_text().unwrap_or_default().trim().to_string())
        .collect();

    let body = rows
        .map(|row| row.iter().map(cell_from_data).collect::<Vec<_>>())
        .filter(|cells| cells.iter().any(|c| !c.is_null()))
        .collect();

    Ok(RawSheet::new(name, headers, body))
}

fn cell_from_data(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Null,
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::String(s.trim().to_string()),
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        other => CellValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Industry classification reference
// ---------------------------------------------------------------------------

/// Load the classification table and derive the sector mapping.
///
/// Remote sources are retried up to `fetch.reference_attempts` times with
/// exponential backoff before giving up with `ReferenceUnavailable`.
pub fn load_reference(source: &DataSource, fetch: &FetchConfig) -> Result<IndustryReference> {
    let fail = |reason: String| PipelineError::ReferenceUnavailable {
        source_name: source.to_string(),
        reason,
    };

    let ext = source.extension();
    let rows = match (source, ext.as_str()) {
        (DataSource::Local(path), "csv") => {
            let file = std::fs::File::open(path).map_err(|e| fail(e.to_string()))?;
            reference_rows_from_csv(file)
        }
        (DataSource::Local(path), "xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
            let mut workbook = open_workbook_auto(path).map_err(|e| fail(e.to_string()))?;
            reference_rows_from_workbook(&mut workbook)
        }
        (DataSource::Remote(url), "csv") => {
            let bytes = fetch_with_retry(url, fetch).map_err(&fail)?;
            reference_rows_from_csv(Cursor::new(bytes))
        }
        (DataSource::Remote(url), "xlsx" | "xlsm" | "xlsb" | "xls" | "ods") => {
            let bytes = fetch_with_retry(url, fetch).map_err(&fail)?;
            let mut workbook =
                open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(|e| fail(e.to_string()))?;
            reference_rows_from_workbook(&mut workbook)
        }
        (_, other) => Err(format!("unsupported file extension: .{other}")),
    }
    .map_err(fail)?;

    let reference = IndustryReference::from_rows(rows);
    if reference.is_empty() {
        return Err(fail("no two-digit sector codes found".to_string()));
    }
    log::info!("Loaded {} industry sectors from {source}", reference.len());
    Ok(reference)
}

/// CSV exports carry the same columns as the workbook; read them into a
/// sheet and share the column lookup.
fn reference_rows_from_csv<R: Read>(reader: R) -> std::result::Result<Vec<(String, String)>, String> {
    let mut rdr = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| format!("CSV header: {e}"))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| format!("CSV row {row}: {e}"))?;
        rows.push(
            record
                .iter()
                .map(|field| match field.trim() {
                    "" => CellValue::Null,
                    text => CellValue::String(text.to_string()),
                })
                .collect(),
        );
    }

    reference_rows(&RawSheet::new("csv", headers, rows))
}

fn reference_rows_from_workbook<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
) -> std::result::Result<Vec<(String, String)>, String> {
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| "workbook has no sheets".to_string())?;
    let range = workbook
        .worksheet_range(&first)
        .map_err(|e| format!("reading sheet '{first}': {e}"))?;
    reference_rows(&range_to_sheet(&first, &range)?)
}

/// `(code, title)` pairs; rows missing either cell are skipped.
fn reference_rows(sheet: &RawSheet) -> std::result::Result<Vec<(String, String)>, String> {
    let code_idx = find_header(sheet, "Code").ok_or("missing 'Code' column")?;
    let title_idx = find_header(sheet, "Title").ok_or("missing 'Title' column")?;

    Ok(sheet
        .rows
        .iter()
        .filter_map(|row| {
            let code = row.get(code_idx)?.as_text()?;
            let title = row.get(title_idx)?.as_text()?;
            Some((code, title))
        })
        .collect())
}

/// Exact header match, else the first header ending in `name`
/// (the published workbook uses e.g. "2022 NAICS US Code").
fn find_header(sheet: &RawSheet, name: &str) -> Option<usize> {
    sheet
        .column(name)
        .or_else(|| sheet.headers.iter().position(|h| h.ends_with(name)))
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

fn http_client(fetch: &FetchConfig) -> std::result::Result<reqwest::blocking::Client, String> {
    reqwest::blocking::Client::builder()
        .timeout(fetch.timeout())
        .build()
        .map_err(|e| format!("building HTTP client: {e}"))
}

fn fetch_bytes(client: &reqwest::blocking::Client, url: &str) -> reqwest::Result<Vec<u8>> {
    let resp = client.get(url).send()?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Connection failures, timeouts and 5xx responses may clear up on their own;
/// anything else (a 404, a TLS error) will not.
fn is_transient(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.status().is_some_and(|s| s.is_server_error())
}

fn fetch_with_retry(url: &str, fetch: &FetchConfig) -> std::result::Result<Vec<u8>, String> {
    let client = http_client(fetch)?;
    let attempts = fetch.reference_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match fetch_bytes(&client, url) {
            Ok(bytes) => return Ok(bytes),
            Err(e) if !is_transient(&e) => return Err(format!("{e} (not retried)")),
            Err(e) if attempt < attempts => {
                let delay = fetch.backoff(attempt - 1);
                log::warn!("Fetching {url} failed (attempt {attempt}/{attempts}): {e}; retrying in {delay:?}");
                std::thread::sleep(delay);
            }
            Err(e) => return Err(format!("{e} (after {attempt} attempts)")),
        }
    }
}
