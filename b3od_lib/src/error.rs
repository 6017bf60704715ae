//! Error types for the library layer.

/// Errors produced by the library layer, wrapping wire errors and adding
/// input validation, decoding, and aggregation failures.
#[derive(thiserror::Error, Debug)]
pub enum B3Error {
    /// A date-like value could not be normalized.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// The table is not in the catalog.
    #[error("unknown table '{table}', table must be one of: {available}")]
    UnknownTable { table: String, available: String },
    /// The table cannot be fetched with the requested backend.
    #[error("table {table} cannot be fetched with the {backend} backend")]
    UnsupportedBackend { table: String, backend: String },
    /// User-provided input failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// An error from the wire layer (connection, status, or decode).
    #[error(transparent)]
    Api(#[from] b3od_api::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("base64 error: {0}")]
    Base64(#[from] base64::DecodeError),
    /// A non-blank cell could not be converted to its column type.
    #[error("column {column}: cannot read '{value}' as {expected}")]
    Coerce {
        column: String,
        value: String,
        expected: &'static str,
    },
    /// A row does not have one value per column.
    #[error("row {row} has {found} values but there are {expected} columns")]
    ArityMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },
    /// Frames with different column lists cannot be concatenated.
    #[error("column mismatch while merging results: expected {expected:?}, found {found:?}")]
    ColumnMismatch {
        expected: Vec<String>,
        found: Vec<String>,
    },
    /// A worker task panicked or was cancelled.
    #[error("task failed: {0}")]
    Task(String),
}

impl B3Error {
    /// HTTP status code when the failure was a non-success response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status(),
            _ => None,
        }
    }

    /// Whether no connection could be established.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_transport())
    }
}
