pub mod sheet;
pub mod snapshot;
pub mod traits;

pub use sheet::{Column, Row, SharedSheet, Sheet};
pub use snapshot::SheetSnapshot;
pub use traits::Grid;

// Re-export for convenience
pub use entigrid_common::{CellValue, GridError, GridResult};
