use std::fmt;

use entigrid_grid::Grid;

use crate::error::ChangeResult;

/// A reversible structural edit of a grid.
///
/// `apply` and `revert` are only meaningful as a strict pair: `revert` must see
/// the grid exactly as the preceding `apply` left it. Callers hold an exclusive
/// lock on the grid for the duration of each call.
pub trait Change: fmt::Debug + Send + Sync {
    /// Stable tag used to find the factory for this change when a log is replayed.
    fn type_tag(&self) -> &'static str;

    /// Short human description for history listings.
    fn describe(&self) -> String;

    fn apply(&mut self, grid: &mut dyn Grid) -> ChangeResult<()>;

    fn revert(&mut self, grid: &mut dyn Grid) -> ChangeResult<()>;

    /// Portable record from which the registered factory can rebuild an
    /// equivalent change.
    fn to_record(&self) -> ChangeResult<serde_json::Value>;
}
