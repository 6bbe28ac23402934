use std::path::{Path, PathBuf};

use entigrid_grid::{CellValue, Sheet};
use tempfile::TempDir;

/// Sheet with a `text` column holding one row per entry of `texts`.
pub fn text_sheet(texts: &[&str]) -> Sheet {
    let mut sheet = Sheet::with_columns("fixture", &["text"]);
    for text in texts {
        sheet
            .push_row([Some(*text)])
            .expect("single-column fixture row");
    }
    sheet
}

/// Sheet with `id` and `text` columns; ids are `r0`, `r1`, ... so rows stay
/// identifiable after other rows are inserted around them.
pub fn numbered_sheet(texts: &[Option<&str>]) -> Sheet {
    let mut sheet = Sheet::with_columns("fixture", &["id", "text"]);
    for (i, text) in texts.iter().enumerate() {
        sheet
            .push_row([
                Some(CellValue::from(format!("r{i}"))),
                text.map(CellValue::from),
            ])
            .expect("two-column fixture row");
    }
    sheet
}

/// Sheet whose columns were inserted out of order, so column positions and
/// cell slots disagree.
pub fn shuffled_slot_sheet(rows: usize) -> Sheet {
    use entigrid_grid::Grid;

    let mut sheet = Sheet::with_columns("fixture", &["b"]);
    for i in 0..rows {
        sheet
            .push_row([Some(CellValue::from(format!("b{i}")))])
            .expect("fixture row");
    }
    let seed: Vec<Option<CellValue>> = (0..rows)
        .map(|i| Some(CellValue::from(format!("a{i}"))))
        .collect();
    sheet.add_column("a", 0, &seed).expect("fixture column");
    sheet
}

/// Build a `[row][service][term]` table from string literals.
pub fn term_table(rows: &[&[&[&str]]]) -> Vec<Vec<Vec<String>>> {
    rows.iter()
        .map(|services| {
            services
                .iter()
                .map(|terms| terms.iter().map(|t| t.to_string()).collect())
                .collect()
        })
        .collect()
}

/// Temporary directory holding a change log file, removed on drop.
pub struct TempLog {
    _dir: TempDir,
    path: PathBuf,
}

impl TempLog {
    pub fn new(file_name: &str) -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let path = dir.path().join(file_name);
        Self { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path in the same temporary directory.
    pub fn sibling(&self, file_name: &str) -> PathBuf {
        self.path.with_file_name(file_name)
    }
}
