use entigrid_common::GridError;
use thiserror::Error;

pub type ChangeResult<T> = Result<T, ChangeError>;

#[derive(Debug, Error)]
pub enum ChangeError {
    /// A recorded row cannot be removed because the grid is smaller than the
    /// post-apply shape the change expects.
    #[error("needed to remove row {row}, but only {row_count} rows were available")]
    RowOutOfRange { row: usize, row_count: usize },

    #[error("change is not applied to this grid")]
    NotApplied,

    #[error("expected column '{expected}' at position {position}, found {}", describe_found(.found))]
    ColumnMismatch {
        position: usize,
        expected: String,
        found: Option<String>,
    },

    #[error("term table has {actual} rows but the grid has {expected}")]
    RowCountMismatch { expected: usize, actual: usize },

    #[error("term table row {row} has {actual} service lists, expected {expected}")]
    ServiceCountMismatch {
        row: usize,
        expected: usize,
        actual: usize,
    },

    #[error("malformed change record: {reason}")]
    MalformedRecord { reason: String },

    #[error("unknown change type '{tag}'")]
    UnknownChangeType { tag: String },

    #[error("change record I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Grid(#[from] GridError),
}

fn describe_found(found: &Option<String>) -> String {
    match found {
        Some(name) => format!("'{name}'"),
        None => "no column".to_string(),
    }
}

/// Coarse classification of [`ChangeError`], for hosts that only need to
/// decide whether to skip a log entry, abort, or report a bug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeErrorKind {
    /// The grid is not in the shape the change requires.
    Precondition,
    /// Caller-supplied term table does not fit the grid or the service list.
    DimensionMismatch,
    /// A persisted record could not be decoded.
    MalformedRecord,
    Io,
    Grid,
}

impl ChangeError {
    pub fn malformed(reason: impl ToString) -> Self {
        ChangeError::MalformedRecord {
            reason: reason.to_string(),
        }
    }

    pub fn kind(&self) -> ChangeErrorKind {
        match self {
            ChangeError::NotApplied
            | ChangeError::RowOutOfRange { .. }
            | ChangeError::ColumnMismatch { .. } => ChangeErrorKind::Precondition,
            ChangeError::RowCountMismatch { .. } | ChangeError::ServiceCountMismatch { .. } => {
                ChangeErrorKind::DimensionMismatch
            }
            ChangeError::MalformedRecord { .. } | ChangeError::UnknownChangeType { .. } => {
                ChangeErrorKind::MalformedRecord
            }
            ChangeError::Io(_) => ChangeErrorKind::Io,
            ChangeError::Grid(_) => ChangeErrorKind::Grid,
        }
    }

    pub fn is_precondition_violation(&self) -> bool {
        self.kind() == ChangeErrorKind::Precondition
    }

    pub fn is_malformed_record(&self) -> bool {
        self.kind() == ChangeErrorKind::MalformedRecord
    }
}
