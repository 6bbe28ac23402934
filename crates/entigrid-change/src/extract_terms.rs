//! Reversible placement of extracted terms into new grid columns.
//!
//! Applying the change adds one column per extraction service and writes each
//! service's terms underneath the row they were extracted from. When a row has
//! more than one term for some service, blank rows are inserted directly below
//! it so the k-th term of every service lands on the same output row. The
//! positions of those inserted rows form the added-row ledger, which is the only
//! state reverting needs: rows are deleted from the ledger, then the columns.

use entigrid_common::CellValue;
use entigrid_grid::Grid;

use crate::change::Change;
use crate::error::{ChangeError, ChangeResult};

/// Tag under which this change is registered and persisted.
pub const EXTRACT_TERMS_TAG: &str = "extract-terms";

/// Terms indexed `[row][service][term]`.
pub type TermTable = Vec<Vec<Vec<String>>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractTermsChange {
    column_index: usize,
    service_names: Vec<String>,
    extracted_terms: TermTable,
    added_row_ids: Vec<usize>,
    // Not persisted: a change rebuilt from a record is already applied.
    applied: bool,
}

impl ExtractTermsChange {
    /// `column_index` is where the first service column is inserted; the
    /// remaining service columns follow it in `service_names` order.
    pub fn new(column_index: usize, service_names: Vec<String>, extracted_terms: TermTable) -> Self {
        Self {
            column_index,
            service_names,
            extracted_terms,
            added_row_ids: Vec::new(),
            applied: false,
        }
    }

    pub fn column_index(&self) -> usize {
        self.column_index
    }

    pub fn service_names(&self) -> &[String] {
        &self.service_names
    }

    pub fn extracted_terms(&self) -> &TermTable {
        &self.extracted_terms
    }

    /// Rows synthesized by the last apply, ascending, in post-apply numbering.
    pub fn added_row_ids(&self) -> &[usize] {
        &self.added_row_ids
    }

    /// Whether the grid currently holds this change's columns and rows.
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    pub(crate) fn with_added_row_ids(mut self, added_row_ids: Vec<usize>) -> Self {
        self.added_row_ids = added_row_ids;
        self
    }

    pub(crate) fn into_applied(mut self) -> Self {
        self.applied = true;
        self
    }

    /// Number of output rows the term table needs beyond the source rows.
    pub fn planned_extra_rows(&self) -> usize {
        self.extracted_terms
            .iter()
            .map(|services| max_terms(services).saturating_sub(1))
            .sum()
    }

    fn check_dimensions(&self, row_count: usize) -> ChangeResult<()> {
        if self.extracted_terms.len() != row_count {
            return Err(ChangeError::RowCountMismatch {
                expected: row_count,
                actual: self.extracted_terms.len(),
            });
        }
        for (row, services) in self.extracted_terms.iter().enumerate() {
            if services.len() != self.service_names.len() {
                return Err(ChangeError::ServiceCountMismatch {
                    row,
                    expected: self.service_names.len(),
                    actual: services.len(),
                });
            }
        }
        Ok(())
    }

    /// Create the destination columns and return the cell slot of each, in
    /// service order.
    fn create_columns(&self, grid: &mut dyn Grid) -> ChangeResult<Vec<usize>> {
        let empty_cells: Vec<Option<CellValue>> = vec![None; grid.row_count()];
        let mut cell_indexes = Vec::with_capacity(self.service_names.len());
        for (offset, name) in self.service_names.iter().enumerate() {
            let slot = grid.add_column(name, self.column_index + offset, &empty_cells)?;
            cell_indexes.push(slot);
        }
        Ok(cell_indexes)
    }

    fn insert_values(&mut self, grid: &mut dyn Grid, cell_indexes: &[usize]) -> ChangeResult<()> {
        self.added_row_ids.clear();
        if grid.row_count() == 0 {
            return Ok(());
        }
        let Some(min_row_size) = cell_indexes.iter().max().map(|max| max + 1) else {
            return Ok(());
        };
        for row in 0..grid.row_count() {
            grid.ensure_cell_slots(row, min_row_size)?;
        }

        let mut row_number = 0;
        for service_terms in &self.extracted_terms {
            let row_terms = max_terms(service_terms);
            if row_terms == 0 {
                row_number += 1;
                continue;
            }
            for offset in 1..row_terms {
                let term_row = row_number + offset;
                grid.insert_blank_row(term_row, min_row_size)?;
                self.added_row_ids.push(term_row);
            }
            #[cfg(feature = "tracing")]
            tracing::debug!(output_row = row_number, output_rows = row_terms, "placing terms");

            for (terms, &slot) in service_terms.iter().zip(cell_indexes) {
                for (offset, term) in terms.iter().enumerate() {
                    grid.set_cell(row_number + offset, slot, CellValue::Text(term.clone()))?;
                }
            }
            row_number += row_terms;
        }
        Ok(())
    }

    /// Verify the grid has the post-apply shape before anything is deleted.
    fn check_revert_preconditions(&self, grid: &dyn Grid, descending: &[usize]) -> ChangeResult<()> {
        let mut row_count = grid.row_count();
        for &row in descending {
            if row >= row_count {
                return Err(ChangeError::RowOutOfRange { row, row_count });
            }
            row_count -= 1;
        }
        for (offset, expected) in self.service_names.iter().enumerate() {
            let position = self.column_index + offset;
            let found = grid.column_name(position);
            if found != Some(expected.as_str()) {
                return Err(ChangeError::ColumnMismatch {
                    position,
                    expected: expected.clone(),
                    found: found.map(str::to_string),
                });
            }
        }
        Ok(())
    }

    fn delete_rows(&mut self, grid: &mut dyn Grid, descending: &[usize]) -> ChangeResult<()> {
        for &row in descending {
            grid.remove_row(row)?;
        }
        self.added_row_ids.clear();
        Ok(())
    }

    fn delete_columns(&self, grid: &mut dyn Grid) -> ChangeResult<()> {
        // Each removal shifts the following service columns left onto the same index.
        for _ in &self.service_names {
            grid.remove_column(self.column_index)?;
        }
        Ok(())
    }
}

fn max_terms(service_terms: &[Vec<String>]) -> usize {
    service_terms.iter().map(Vec::len).max().unwrap_or(0)
}

impl Change for ExtractTermsChange {
    fn type_tag(&self) -> &'static str {
        EXTRACT_TERMS_TAG
    }

    fn describe(&self) -> String {
        format!(
            "Extract terms into {} column(s) at position {} ({})",
            self.service_names.len(),
            self.column_index,
            self.service_names.join(", ")
        )
    }

    fn apply(&mut self, grid: &mut dyn Grid) -> ChangeResult<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "extract_terms_apply",
            column = self.column_index,
            services = self.service_names.len(),
            rows = grid.row_count()
        )
        .entered();

        self.check_dimensions(grid.row_count())?;
        let cell_indexes = self.create_columns(grid)?;
        self.insert_values(grid, &cell_indexes)?;
        self.applied = true;

        #[cfg(feature = "tracing")]
        tracing::debug!(added_rows = self.added_row_ids.len(), "applied extracted terms");
        Ok(())
    }

    fn revert(&mut self, grid: &mut dyn Grid) -> ChangeResult<()> {
        #[cfg(feature = "tracing")]
        let _span = tracing::info_span!(
            "extract_terms_revert",
            column = self.column_index,
            added_rows = self.added_row_ids.len()
        )
        .entered();

        if !self.applied {
            let err = ChangeError::NotApplied;
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "refusing to revert");
            return Err(err);
        }

        // Highest position first: every removal shifts the rows below it up by one.
        let mut descending = self.added_row_ids.clone();
        descending.sort_unstable_by(|a, b| b.cmp(a));

        if let Err(err) = self.check_revert_preconditions(grid, &descending) {
            #[cfg(feature = "tracing")]
            tracing::warn!(error = %err, "grid does not match the applied shape; refusing to revert");
            return Err(err);
        }
        self.delete_rows(grid, &descending)?;
        self.delete_columns(grid)?;
        self.applied = false;
        Ok(())
    }

    fn to_record(&self) -> ChangeResult<serde_json::Value> {
        serde_json::to_value(self.record()).map_err(ChangeError::malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entigrid_grid::Sheet;

    fn terms(rows: &[&[&[&str]]]) -> TermTable {
        rows.iter()
            .map(|services| {
                services
                    .iter()
                    .map(|ts| ts.iter().map(|t| t.to_string()).collect())
                    .collect()
            })
            .collect()
    }

    fn text_sheet(texts: &[&str]) -> Sheet {
        let mut sheet = Sheet::with_columns("s", &["text"]);
        for t in texts {
            sheet.push_row([Some(*t)]).unwrap();
        }
        sheet
    }

    #[test]
    fn planned_extra_rows_counts_overflow_only() {
        let change = ExtractTermsChange::new(
            1,
            vec!["A".into(), "B".into()],
            terms(&[&[&["a", "b", "c"], &["x"]], &[&[], &[]], &[&["d"], &["y", "z"]]]),
        );
        assert_eq!(change.planned_extra_rows(), 3);
    }

    #[test]
    fn ledger_positions_use_post_insertion_numbering() {
        let mut sheet = text_sheet(&["r0", "r1", "r2"]);
        let mut change = ExtractTermsChange::new(
            1,
            vec!["A".into()],
            terms(&[&[&["a", "b"]], &[&[]], &[&["c", "d", "e"]]]),
        );
        change.apply(&mut sheet).unwrap();
        // r0 -> rows 0..2, r1 -> row 2, r2 -> rows 3..6
        assert_eq!(change.added_row_ids(), &[1, 4, 5]);
        assert_eq!(sheet.row_count(), 6);
        assert_eq!(
            sheet.snapshot().column_text("text"),
            vec![
                Some("r0".to_string()),
                None,
                Some("r1".to_string()),
                Some("r2".to_string()),
                None,
                None
            ]
        );
    }

    #[test]
    fn dimension_mismatch_leaves_grid_untouched() {
        let mut sheet = text_sheet(&["only"]);
        let before = sheet.snapshot();
        let mut change = ExtractTermsChange::new(1, vec!["A".into()], terms(&[&[&["a"]], &[&[]]]));
        let err = change.apply(&mut sheet).unwrap_err();
        assert!(matches!(
            err,
            ChangeError::RowCountMismatch {
                expected: 1,
                actual: 2
            }
        ));
        assert_eq!(sheet.snapshot(), before);

        let mut change = ExtractTermsChange::new(1, vec!["A".into(), "B".into()], terms(&[&[&["a"]]]));
        let err = change.apply(&mut sheet).unwrap_err();
        assert!(matches!(
            err,
            ChangeError::ServiceCountMismatch {
                row: 0,
                expected: 2,
                actual: 1
            }
        ));
        assert_eq!(sheet.snapshot(), before);
    }

    #[test]
    fn apply_clears_previous_ledger() {
        let mut sheet = text_sheet(&["r0"]);
        let mut change = ExtractTermsChange::new(1, vec!["A".into()], terms(&[&[&["a"]]]))
            .with_added_row_ids(vec![7, 8]);
        change.apply(&mut sheet).unwrap();
        assert!(change.added_row_ids().is_empty());
    }

    #[test]
    fn empty_grid_only_gets_columns() {
        let mut sheet = Sheet::with_columns("s", &["text"]);
        let mut change = ExtractTermsChange::new(0, vec!["A".into(), "B".into()], Vec::new());
        change.apply(&mut sheet).unwrap();
        assert_eq!(sheet.snapshot().columns, vec!["A", "B", "text"]);
        assert_eq!(sheet.row_count(), 0);
        change.revert(&mut sheet).unwrap();
        assert_eq!(sheet.snapshot().columns, vec!["text"]);
    }

    #[test]
    fn no_services_is_a_noop_pair() {
        let mut sheet = text_sheet(&["r0", "r1"]);
        let before = sheet.snapshot();
        let mut change = ExtractTermsChange::new(1, Vec::new(), vec![Vec::new(), Vec::new()]);
        change.apply(&mut sheet).unwrap();
        assert_eq!(sheet.snapshot(), before);
        change.revert(&mut sheet).unwrap();
        assert_eq!(sheet.snapshot(), before);
    }

    #[test]
    fn revert_checks_columns_before_deleting_rows() {
        let mut sheet = text_sheet(&["r0"]);
        let mut change = ExtractTermsChange::new(1, vec!["A".into()], terms(&[&[&["a", "b"]]]));
        change.apply(&mut sheet).unwrap();
        sheet.remove_column(1).unwrap();
        let rows_before = sheet.row_count();

        let err = change.revert(&mut sheet).unwrap_err();
        assert!(matches!(
            err,
            ChangeError::ColumnMismatch {
                position: 1,
                found: None,
                ..
            }
        ));
        assert_eq!(sheet.row_count(), rows_before);
        assert_eq!(change.added_row_ids(), &[1]);
    }

    #[test]
    fn revert_sorts_a_replayed_ledger() {
        let mut sheet = text_sheet(&["r0", "r1"]);
        let mut change = ExtractTermsChange::new(
            1,
            vec!["A".into()],
            terms(&[&[&["a", "b"]], &[&["c", "d"]]]),
        );
        let before = sheet.snapshot();
        change.apply(&mut sheet).unwrap();
        assert_eq!(change.added_row_ids(), &[1, 3]);

        let mut replayed = change.clone().with_added_row_ids(vec![3, 1]);
        replayed.revert(&mut sheet).unwrap();
        assert_eq!(sheet.snapshot(), before);
    }

    #[test]
    fn describe_lists_services() {
        let change = ExtractTermsChange::new(2, vec!["A".into(), "B".into()], Vec::new());
        assert_eq!(
            change.describe(),
            "Extract terms into 2 column(s) at position 2 (A, B)"
        );
        assert_eq!(change.type_tag(), "extract-terms");
    }
}
