use std::{
    fmt::{self, Display},
    hash::{Hash, Hasher},
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A value stored in a grid cell.
///
/// An empty cell is represented by the *absence* of a value (`Option<CellValue>`
/// is `None`), not by a dedicated variant, so a freshly padded slot and a slot
/// that never existed compare equal in snapshots.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", content = "value"))]
#[derive(Debug, Clone)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Number(f64),
    Boolean(bool),
}

impl Hash for CellValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            CellValue::Text(s) => s.hash(state),
            CellValue::Int(i) => i.hash(state),
            CellValue::Number(n) => n.to_bits().hash(state),
            CellValue::Boolean(b) => b.hash(state),
        }
    }
}

// Numbers compare by bit pattern so equality agrees with `Hash`.
impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (CellValue::Text(a), CellValue::Text(b)) => a == b,
            (CellValue::Int(a), CellValue::Int(b)) => a == b,
            (CellValue::Number(a), CellValue::Number(b)) => a.to_bits() == b.to_bits(),
            (CellValue::Boolean(a), CellValue::Boolean(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for CellValue {}

impl Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Int(i) => write!(f, "{i}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Boolean(b) => write!(f, "{b}"),
        }
    }
}

impl CellValue {
    /// Borrow the text payload, if this is a text cell.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Text used as input for term extraction. Non-text values are rendered
    /// with their `Display` form.
    pub fn to_extraction_text(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_blank_text(&self) -> bool {
        matches!(self, CellValue::Text(s) if s.trim().is_empty())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}
