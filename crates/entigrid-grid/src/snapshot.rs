use entigrid_common::CellValue;

use crate::sheet::Sheet;
use crate::traits::Grid;

/// Logical view of a grid: column names in position order and, per row, the
/// value each column shows. Slot layout is not part of the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetSnapshot {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Option<CellValue>>>,
}

impl SheetSnapshot {
    pub fn capture(sheet: &Sheet) -> Self {
        Self::of(sheet)
    }

    /// Snapshot any grid through its capability interface.
    pub fn of<G: Grid + ?Sized>(grid: &G) -> Self {
        let columns = (0..grid.column_count())
            .map(|c| grid.column_name(c).unwrap_or_default().to_string())
            .collect();
        let rows = (0..grid.row_count())
            .map(|r| {
                (0..grid.column_count())
                    .map(|c| grid.cell_at_column(r, c))
                    .collect()
            })
            .collect();
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Text shown in the named column for every row, `None` for empty cells.
    pub fn column_text(&self, name: &str) -> Vec<Option<String>> {
        let Some(position) = self.columns.iter().position(|c| c == name) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .map(|row| row[position].as_ref().map(|v| v.to_string()))
            .collect()
    }
}
