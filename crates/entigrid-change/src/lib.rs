pub mod change;
pub mod error;
pub mod extract_terms;
pub mod history;
pub mod record;
pub mod registry;

pub use change::Change;
pub use error::{ChangeError, ChangeErrorKind, ChangeResult};
pub use extract_terms::{EXTRACT_TERMS_TAG, ExtractTermsChange, TermTable};
pub use history::{History, HistoryConfig, HistoryEntry, HistoryError};
pub use record::ExtractTermsRecord;
pub use registry::{ChangeFactory, ChangeRegistry, builtin_registry};

// Re-export for convenience
pub use entigrid_grid::{CellValue, Grid, Sheet};
