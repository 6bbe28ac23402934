//! One-line JSON record for [`ExtractTermsChange`].
//!
//! ```text
//! {"column":1,"services":["NER1"],"terms":[[["Paris","London"]],[["Berlin"]]],"addedRows":[1]}
//! ```
//!
//! All four fields are required. Empty term lists are written as `[]` and come
//! back as empty lists; `addedRows` is replayed in the order it was written.

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};

use crate::error::{ChangeError, ChangeResult};
use crate::extract_terms::{ExtractTermsChange, TermTable};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ExtractTermsRecord {
    pub column: usize,
    pub services: Vec<String>,
    pub terms: TermTable,
    #[serde(rename = "addedRows")]
    pub added_rows: Vec<usize>,
}

impl ExtractTermsRecord {
    /// Reject term tables whose rows do not carry one list per service.
    pub fn validate(&self) -> ChangeResult<()> {
        for (row, services) in self.terms.iter().enumerate() {
            if services.len() != self.services.len() {
                return Err(ChangeError::malformed(format!(
                    "terms row {row} has {} service lists but {} services are named",
                    services.len(),
                    self.services.len()
                )));
            }
        }
        Ok(())
    }
}

impl ExtractTermsChange {
    pub fn record(&self) -> ExtractTermsRecord {
        ExtractTermsRecord {
            column: self.column_index(),
            services: self.service_names().to_vec(),
            terms: self.extracted_terms().clone(),
            added_rows: self.added_row_ids().to_vec(),
        }
    }

    pub fn from_record(record: ExtractTermsRecord) -> ChangeResult<Self> {
        record.validate()?;
        let ExtractTermsRecord {
            column,
            services,
            terms,
            added_rows,
        } = record;
        Ok(ExtractTermsChange::new(column, services, terms)
            .with_added_row_ids(added_rows)
            .into_applied())
    }

    pub fn from_value(value: serde_json::Value) -> ChangeResult<Self> {
        let record: ExtractTermsRecord =
            serde_json::from_value(value).map_err(ChangeError::malformed)?;
        Self::from_record(record)
    }

    /// Write the record as a single line terminated by `\n`.
    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> ChangeResult<()> {
        let line = serde_json::to_string(&self.record()).map_err(ChangeError::malformed)?;
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }

    /// Read one line written by [`ExtractTermsChange::save`].
    pub fn load<R: BufRead + ?Sized>(reader: &mut R) -> ChangeResult<Self> {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            return Err(ChangeError::malformed("expected a change record, found end of input"));
        }
        let record: ExtractTermsRecord =
            serde_json::from_str(line.trim_end()).map_err(ChangeError::malformed)?;
        Self::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn load_str(s: &str) -> ChangeResult<ExtractTermsChange> {
        ExtractTermsChange::load(&mut Cursor::new(s.as_bytes()))
    }

    #[test]
    fn save_writes_a_single_line_with_all_fields() {
        let change = ExtractTermsChange::new(
            1,
            vec!["NER1".into(), "NER2".into()],
            vec![vec![vec!["Paris".into()], vec![]]],
        )
        .with_added_row_ids(vec![4]);
        let mut out = Vec::new();
        change.save(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.ends_with('\n'));
        assert_eq!(text.lines().count(), 1);

        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["column"], 1);
        assert_eq!(v["services"][1], "NER2");
        assert_eq!(v["terms"][0][0][0], "Paris");
        assert!(v["terms"][0][1].as_array().unwrap().is_empty());
        assert_eq!(v["addedRows"][0], 4);
    }

    #[test]
    fn field_order_is_not_significant() {
        let change =
            load_str(r#"{"addedRows":[2,1],"terms":[[[]]],"services":["A"],"column":0}"#).unwrap();
        assert_eq!(change.column_index(), 0);
        assert_eq!(change.added_row_ids(), &[2, 1]);
        // A record describes a change that has already been applied.
        assert!(change.is_applied());
        assert_eq!(change.extracted_terms(), &vec![vec![Vec::<String>::new()]]);
    }

    #[test]
    fn missing_fields_are_malformed() {
        for line in [
            r#"{"services":["A"],"terms":[],"addedRows":[]}"#,
            r#"{"column":0,"terms":[],"addedRows":[]}"#,
            r#"{"column":0,"services":["A"],"addedRows":[]}"#,
            r#"{"column":0,"services":["A"],"terms":[]}"#,
        ] {
            let err = load_str(line).unwrap_err();
            assert!(err.is_malformed_record(), "{line}: {err}");
        }
    }

    #[test]
    fn non_rectangular_terms_are_malformed() {
        let err = load_str(r#"{"column":0,"services":["A","B"],"terms":[[["x"],[]],[["y"]]],"addedRows":[]}"#)
            .unwrap_err();
        assert!(err.is_malformed_record());
        assert!(err.to_string().contains("terms row 1"));
    }

    #[test]
    fn wrong_nesting_depth_is_malformed() {
        let err =
            load_str(r#"{"column":0,"services":["A"],"terms":[["x"]],"addedRows":[]}"#).unwrap_err();
        assert!(err.is_malformed_record());
        let err =
            load_str(r#"{"column":-1,"services":[],"terms":[],"addedRows":[]}"#).unwrap_err();
        assert!(err.is_malformed_record());
    }

    #[test]
    fn empty_input_is_malformed_not_io() {
        let err = load_str("").unwrap_err();
        assert!(err.is_malformed_record());
    }

    #[test]
    fn load_consumes_exactly_one_line() {
        let mut input = Cursor::new(
            "{\"column\":0,\"services\":[],\"terms\":[],\"addedRows\":[]}\n{\"column\":3,\"services\":[],\"terms\":[],\"addedRows\":[]}\n"
                .as_bytes(),
        );
        assert_eq!(ExtractTermsChange::load(&mut input).unwrap().column_index(), 0);
        assert_eq!(ExtractTermsChange::load(&mut input).unwrap().column_index(), 3);
    }
}
