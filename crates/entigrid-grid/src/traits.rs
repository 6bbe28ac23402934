use entigrid_common::{CellValue, GridResult};

/// Narrow capability interface over a host-owned table of rows and columns.
///
/// Columns have two coordinates: their *position* in the visible column order
/// and the *cell slot* their values occupy inside each row. The two are not
/// guaranteed to be equal; callers must use the slot reported by
/// [`Grid::add_column`] or [`Grid::column_cell_index`].
///
/// Structural primitives are not transactional. Callers that need several
/// primitives to appear atomic must hold an exclusive lock on the grid for the
/// whole sequence.
pub trait Grid {
    fn row_count(&self) -> usize;

    fn column_count(&self) -> usize;

    fn column_name(&self, position: usize) -> Option<&str>;

    /// Cell slot used by the column at `position`.
    fn column_cell_index(&self, position: usize) -> Option<usize>;

    /// Value stored at `(row, slot)`, `None` for an empty or unallocated slot.
    fn cell(&self, row: usize, slot: usize) -> Option<CellValue>;

    /// Insert a row whose `slots` cell slots are all empty. `position` may be
    /// equal to the row count, which appends.
    fn insert_blank_row(&mut self, position: usize, slots: usize) -> GridResult<()>;

    fn remove_row(&mut self, position: usize) -> GridResult<()>;

    /// Insert a column named `name` at `position`, seeding one value per
    /// existing row, and return the cell slot the grid assigned to it.
    fn add_column(
        &mut self,
        name: &str,
        position: usize,
        seed: &[Option<CellValue>],
    ) -> GridResult<usize>;

    fn remove_column(&mut self, position: usize) -> GridResult<()>;

    fn set_cell(&mut self, row: usize, slot: usize, value: CellValue) -> GridResult<()>;

    /// Grow `row` to at least `min_slots` cell slots, padding with empty cells.
    fn ensure_cell_slots(&mut self, row: usize, min_slots: usize) -> GridResult<()>;

    fn cell_at_column(&self, row: usize, position: usize) -> Option<CellValue> {
        let slot = self.column_cell_index(position)?;
        self.cell(row, slot)
    }
}
