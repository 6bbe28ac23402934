//! In-memory grid backed by row-major cell slots.
//!
//! Columns only store their name and the cell slot they read from; the rows own
//! the cell storage. A column added after others gets a fresh slot at the end of
//! the slot space regardless of the position it is inserted at, so positions and
//! slots diverge as soon as a column is inserted anywhere but the end.

use std::sync::Arc;

use entigrid_common::{CellValue, GridError, GridResult};
use parking_lot::RwLock;

use crate::snapshot::SheetSnapshot;
use crate::traits::Grid;

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Sheet shared between a host and the operations mutating it. Structural edits
/// take the write guard for their full duration.
pub type SharedSheet = Arc<RwLock<Sheet>>;

#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub cell_index: usize,
}

#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    pub cells: Vec<Option<CellValue>>,
}

impl Row {
    pub fn blank(slots: usize) -> Self {
        Self {
            cells: vec![None; slots],
        }
    }

    pub fn get(&self, slot: usize) -> Option<&CellValue> {
        self.cells.get(slot).and_then(|c| c.as_ref())
    }

    fn trim_to(&mut self, width: usize) {
        while self.cells.len() > width && matches!(self.cells.last(), Some(None)) {
            self.cells.pop();
        }
    }
}

#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sheet {
    name: String,
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }

    /// Sheet whose columns occupy slots `0..names.len()` in order.
    pub fn with_columns<S: AsRef<str>>(name: impl Into<String>, names: &[S]) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(i, n)| Column {
                name: n.as_ref().to_string(),
                cell_index: i,
            })
            .collect();
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_shared(self) -> SharedSheet {
        Arc::new(RwLock::new(self))
    }

    /// Append a row given values in column order. Missing trailing values are
    /// left empty; only as many slots as needed are allocated.
    pub fn push_row<I, V>(&mut self, values: I) -> GridResult<()>
    where
        I: IntoIterator<Item = Option<V>>,
        V: Into<CellValue>,
    {
        let mut row = Row::default();
        for (position, value) in values.into_iter().enumerate() {
            let column = self
                .columns
                .get(position)
                .ok_or(GridError::ColumnOutOfRange {
                    column: position,
                    column_count: self.columns.len(),
                })?;
            if let Some(v) = value {
                let slot = column.cell_index;
                if row.cells.len() <= slot {
                    row.cells.resize(slot + 1, None);
                }
                row.cells[slot] = Some(v.into());
            }
        }
        self.rows.push(row);
        Ok(())
    }

    /// Value of the column at `position` in `row`.
    pub fn get_value(&self, row: usize, position: usize) -> Option<&CellValue> {
        let slot = self.columns.get(position)?.cell_index;
        self.rows.get(row)?.get(slot)
    }

    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// Number of slots a row needs to hold every column.
    pub fn slot_width(&self) -> usize {
        self.columns
            .iter()
            .map(|c| c.cell_index + 1)
            .max()
            .unwrap_or(0)
    }

    pub fn snapshot(&self) -> SheetSnapshot {
        SheetSnapshot::capture(self)
    }

    #[cfg(feature = "json")]
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "json")]
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    fn next_cell_index(&self) -> usize {
        self.slot_width()
    }

    fn row_mut(&mut self, row: usize) -> GridResult<&mut Row> {
        let row_count = self.rows.len();
        self.rows
            .get_mut(row)
            .ok_or(GridError::RowOutOfRange { row, row_count })
    }
}

impl Grid for Sheet {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, position: usize) -> Option<&str> {
        self.columns.get(position).map(|c| c.name.as_str())
    }

    fn column_cell_index(&self, position: usize) -> Option<usize> {
        self.columns.get(position).map(|c| c.cell_index)
    }

    fn cell(&self, row: usize, slot: usize) -> Option<CellValue> {
        self.rows.get(row)?.get(slot).cloned()
    }

    fn insert_blank_row(&mut self, position: usize, slots: usize) -> GridResult<()> {
        if position > self.rows.len() {
            return Err(GridError::InsertPositionOutOfRange {
                position,
                row_count: self.rows.len(),
            });
        }
        self.rows.insert(position, Row::blank(slots));
        Ok(())
    }

    fn remove_row(&mut self, position: usize) -> GridResult<()> {
        if position >= self.rows.len() {
            return Err(GridError::RowOutOfRange {
                row: position,
                row_count: self.rows.len(),
            });
        }
        self.rows.remove(position);
        Ok(())
    }

    fn add_column(
        &mut self,
        name: &str,
        position: usize,
        seed: &[Option<CellValue>],
    ) -> GridResult<usize> {
        if position > self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                column: position,
                column_count: self.columns.len(),
            });
        }
        if seed.len() != self.rows.len() {
            return Err(GridError::SeedLengthMismatch {
                name: name.to_string(),
                provided: seed.len(),
                row_count: self.rows.len(),
            });
        }
        let cell_index = self.next_cell_index();
        // Rows are only grown where a seed value actually needs the slot.
        for (row, value) in self.rows.iter_mut().zip(seed) {
            if let Some(v) = value {
                if row.cells.len() <= cell_index {
                    row.cells.resize(cell_index + 1, None);
                }
                row.cells[cell_index] = Some(v.clone());
            }
        }
        self.columns.insert(
            position,
            Column {
                name: name.to_string(),
                cell_index,
            },
        );
        Ok(cell_index)
    }

    fn remove_column(&mut self, position: usize) -> GridResult<()> {
        if position >= self.columns.len() {
            return Err(GridError::ColumnOutOfRange {
                column: position,
                column_count: self.columns.len(),
            });
        }
        let removed = self.columns.remove(position);
        let width = self.slot_width();
        for row in &mut self.rows {
            if let Some(cell) = row.cells.get_mut(removed.cell_index) {
                *cell = None;
            }
            row.trim_to(width);
        }
        Ok(())
    }

    fn set_cell(&mut self, row: usize, slot: usize, value: CellValue) -> GridResult<()> {
        let target = self.row_mut(row)?;
        let slots = target.cells.len();
        let cell = target
            .cells
            .get_mut(slot)
            .ok_or(GridError::SlotOutOfRange { row, slot, slots })?;
        *cell = Some(value);
        Ok(())
    }

    fn ensure_cell_slots(&mut self, row: usize, min_slots: usize) -> GridResult<()> {
        let target = self.row_mut(row)?;
        if target.cells.len() < min_slots {
            target.cells.resize(min_slots, None);
        }
        Ok(())
    }
}
