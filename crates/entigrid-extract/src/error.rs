use thiserror::Error;

/// Boxed failure reported by a [`Transport`](crate::Transport).
pub type TransportError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("service '{service}' could not be reached: {source}")]
    Transport {
        service: String,
        #[source]
        source: TransportError,
    },

    #[error("service '{service}' returned an unusable response: {reason}")]
    Response { service: String, reason: String },

    #[error("service '{service}' is missing required property '{property}'")]
    MissingProperty { service: String, property: String },

    #[error("extraction failed on row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: Box<ExtractError>,
    },

    #[error("source column {column} is out of range ({column_count} columns)")]
    SourceColumnOutOfRange { column: usize, column_count: usize },
}

impl ExtractError {
    /// Row on which a capture stopped, if this error came from one.
    pub fn row(&self) -> Option<usize> {
        match self {
            ExtractError::Row { row, .. } => Some(*row),
            _ => None,
        }
    }
}
