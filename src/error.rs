use thiserror::Error;

/// Fatal startup failures of the load → clean → registry pipeline.
///
/// None of these are recovered from once construction gives up; only
/// [`PipelineError::ReferenceUnavailable`] is retried before being raised.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to load survey workbook {source_name}: {reason}")]
    WorkbookLoad { source_name: String, reason: String },

    #[error("industry reference {source_name} unavailable: {reason}")]
    ReferenceUnavailable { source_name: String, reason: String },

    #[error("question has no display label: {0:?}")]
    UnmappedQuestion(String),

    #[error("{sheet}: cannot parse {column} value {value:?} as a percentage")]
    EstimateParse {
        sheet: String,
        column: String,
        value: String,
    },

    #[error("{sheet}: unknown firm-size code {code:?}")]
    UnknownFirmSizeCode { sheet: String, code: String },
}

pub type Result<T> = std::result::Result<T, PipelineError>;
