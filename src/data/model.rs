use std::collections::BTreeSet;
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of a raw worksheet
// ---------------------------------------------------------------------------

/// A dynamically-typed spreadsheet cell, reduced to the shapes the survey
/// extracts actually contain.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            // Codes typed into Excel as numbers come back as floats: 11.0 → "11".
            CellValue::Float(v) if v.is_finite() && v.fract() == 0.0 => write!(f, "{v:.0}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, "<null>"),
        }
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// String representation of a present value; `None` for a missing cell.
    pub fn as_text(&self) -> Option<String> {
        match self {
            CellValue::Null => None,
            other => Some(other.to_string()),
        }
    }

    /// Borrow the text of a string cell.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// RawSheet – one worksheet, untransformed
// ---------------------------------------------------------------------------

/// A worksheet as extracted from the workbook: header row plus data rows.
#[derive(Debug, Clone)]
pub struct RawSheet {
    pub name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        RawSheet {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Position of a column by exact header text.
    pub fn column(&self, header: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == header)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Dimensions and segment values
// ---------------------------------------------------------------------------

/// The four ways the survey estimates are broken down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Dimension {
    National,
    Sector,
    State,
    Employment,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::National,
        Dimension::Sector,
        Dimension::State,
        Dimension::Employment,
    ];

    /// Registry key.
    pub fn key(self) -> &'static str {
        match self {
            Dimension::National => "national",
            Dimension::Sector => "sector",
            Dimension::State => "state",
            Dimension::Employment => "employment",
        }
    }

    /// Tab title in the viewer.
    pub fn title(self) -> &'static str {
        match self {
            Dimension::National => "National Trends",
            Dimension::Sector => "By Industry",
            Dimension::State => "By State",
            Dimension::Employment => "By Firm Size",
        }
    }

    /// Name of the segment column, `None` for the national aggregate.
    pub fn segment_name(self) -> Option<&'static str> {
        match self {
            Dimension::National => None,
            Dimension::Sector => Some("industry"),
            Dimension::State => Some("state"),
            Dimension::Employment => Some("firm size"),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Three-level firm-size category derived from the Census employment-size code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EmpSize {
    Small,
    Medium,
    Large,
}

impl EmpSize {
    /// A–D → Small, E–F → Medium, G → Large.
    pub fn from_code(code: &str) -> Option<EmpSize> {
        match code {
            "A" | "B" | "C" | "D" => Some(EmpSize::Small),
            "E" | "F" => Some(EmpSize::Medium),
            "G" => Some(EmpSize::Large),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EmpSize::Small => "Small",
            EmpSize::Medium => "Medium",
            EmpSize::Large => "Large",
        }
    }
}

impl fmt::Display for EmpSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The dimension column of a cleaned row.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    None,
    Industry(String),
    State(String),
    EmpSize(EmpSize),
}

impl Segment {
    /// Display value used by the segment selector and the query filter.
    pub fn value(&self) -> Option<&str> {
        match self {
            Segment::None => None,
            Segment::Industry(s) | Segment::State(s) => Some(s),
            Segment::EmpSize(size) => Some(size.as_str()),
        }
    }
}

// ---------------------------------------------------------------------------
// CleanedTable – the analysis-ready output of one pipeline
// ---------------------------------------------------------------------------

/// One cleaned estimate.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedRow {
    /// Short display label from the question map.
    pub question: &'static str,
    /// `None` when the survey recorded no answer text.
    pub answer: Option<String>,
    /// Percentage in [0, 100].
    pub estimate: Option<f64>,
    /// Percentage in [0, 100].
    pub standard_error: Option<f64>,
    pub segment: Segment,
}

#[derive(Debug, Clone)]
pub struct CleanedTable {
    pub dimension: Dimension,
    pub rows: Vec<CleanedRow>,
}

impl CleanedTable {
    pub fn new(dimension: Dimension, rows: Vec<CleanedRow>) -> Self {
        CleanedTable { dimension, rows }
    }

    /// Distinct question labels in first-appearance order.
    pub fn questions(&self) -> Vec<&'static str> {
        let mut seen = BTreeSet::new();
        self.rows
            .iter()
            .map(|r| r.question)
            .filter(|q| seen.insert(*q))
            .collect()
    }

    /// Distinct, sorted segment values (empty for the national table).
    pub fn segment_values(&self) -> Vec<String> {
        let values: BTreeSet<&str> = self.rows.iter().filter_map(|r| r.segment.value()).collect();
        values.into_iter().map(str::to_string).collect()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
