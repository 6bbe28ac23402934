use entigrid_change::ExtractTermsChange;
use entigrid_grid::Grid;

use crate::error::{ExtractError, ExtractResult};
use crate::extractor::TermExtractor;

#[derive(Debug, Clone)]
pub struct CaptureOptions {
    /// Give empty and whitespace-only cells empty term lists without calling
    /// any extractor.
    pub skip_blank_cells: bool,
    /// Stop at the first extractor failure. When unset the failing service's
    /// list for that row is left empty.
    pub fail_fast: bool,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            skip_blank_cells: true,
            fail_fast: false,
        }
    }
}

/// Run every extractor over the text in `source_column` and build the change
/// that writes the results into new columns right after it.
///
/// The grid is only read. Applying the returned change is up to the caller.
pub fn capture_terms<G: Grid + ?Sized>(
    grid: &G,
    source_column: usize,
    extractors: &[&dyn TermExtractor],
    options: &CaptureOptions,
) -> ExtractResult<ExtractTermsChange> {
    let slot = grid
        .column_cell_index(source_column)
        .ok_or(ExtractError::SourceColumnOutOfRange {
            column: source_column,
            column_count: grid.column_count(),
        })?;

    #[cfg(feature = "tracing")]
    let _span = tracing::info_span!(
        "capture_terms",
        source_column,
        rows = grid.row_count(),
        services = extractors.len()
    )
    .entered();

    let mut terms = Vec::with_capacity(grid.row_count());
    for row in 0..grid.row_count() {
        let value = grid.cell(row, slot);
        let blank = value.as_ref().is_none_or(|v| v.is_blank_text());
        if blank && options.skip_blank_cells {
            terms.push(vec![Vec::new(); extractors.len()]);
            continue;
        }
        let text = value.map(|v| v.to_extraction_text()).unwrap_or_default();

        let mut found = Vec::with_capacity(extractors.len());
        for extractor in extractors {
            match extractor.extract(&text) {
                Ok(list) => found.push(list),
                Err(err) if options.fail_fast => {
                    return Err(ExtractError::Row {
                        row,
                        source: Box::new(err),
                    });
                }
                Err(_err) => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(row, service = extractor.name(), error = %_err, "extraction failed");
                    found.push(Vec::new());
                }
            }
        }
        terms.push(found);
    }

    let services = extractors.iter().map(|e| e.name().to_string()).collect();
    Ok(ExtractTermsChange::new(source_column + 1, services, terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::StaticExtractor;
    use entigrid_grid::Sheet;

    #[test]
    fn new_columns_follow_the_source_column() {
        let mut sheet = Sheet::with_columns("s", &["id", "text", "notes"]);
        sheet.push_row([Some("1"), Some("Paris"), None]).unwrap();
        let ner = StaticExtractor::new("NER").with_answer("Paris", ["Paris"]);

        let change = capture_terms(&sheet, 1, &[&ner], &CaptureOptions::default()).unwrap();
        assert_eq!(change.column_index(), 2);
        assert_eq!(change.service_names(), &["NER".to_string()]);
        assert_eq!(change.extracted_terms(), &vec![vec![vec!["Paris".to_string()]]]);
    }

    #[test]
    fn missing_source_column_is_reported() {
        let sheet = Sheet::with_columns("s", &["text"]);
        let ner = StaticExtractor::new("NER");
        let err = capture_terms(&sheet, 3, &[&ner], &CaptureOptions::default()).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::SourceColumnOutOfRange {
                column: 3,
                column_count: 1
            }
        ));
    }
}
