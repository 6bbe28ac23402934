//! Meta crate that re-exports the entigrid layers. Depend on this crate and
//! pick layers with feature flags, or reach the underlying crates directly
//! through the module re-exports.

#[cfg(feature = "common")]
pub use entigrid_common as common;

#[cfg(feature = "grid")]
pub use entigrid_grid as grid;

#[cfg(feature = "change")]
pub use entigrid_change as change;

#[cfg(feature = "extract")]
pub use entigrid_extract as extract;

#[cfg(feature = "grid")]
pub use entigrid_grid::{CellValue, Grid, GridError, Sheet, SheetSnapshot};

#[cfg(feature = "change")]
pub use entigrid_change::{
    Change, ChangeError, ChangeRegistry, ExtractTermsChange, History, HistoryConfig,
    builtin_registry,
};

#[cfg(feature = "extract")]
pub use entigrid_extract::{CaptureOptions, JsonArrayService, TermExtractor, capture_terms};
