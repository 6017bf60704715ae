//! Uniform tabular result shared by every protocol.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::B3Error;

/// One typed cell.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    Float(f64),
    Integer(i64),
    Bool(bool),
    Date(NaiveDate),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(d) => Some(*d),
            _ => None,
        }
    }

    /// Formats the value the way B3 files write it: comma decimal separator,
    /// blank for null.
    pub fn to_b3_string(&self) -> String {
        match self {
            Self::Float(v) => v.to_string().replace('.', ","),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Text(s) => f.write_str(s),
            Self::Float(v) => write!(f, "{}", v),
            Self::Integer(v) => write!(f, "{}", v),
            Self::Bool(v) => write!(f, "{}", v),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// Column names plus typed rows. Every row has one value per column.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Frame {
    columns: Vec<String>,
    #[serde(rename = "data")]
    rows: Vec<Vec<Value>>,
}

impl Frame {
    /// A frame with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a frame, rejecting rows whose length differs from the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self, B3Error> {
        if let Some((idx, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != columns.len())
        {
            return Err(B3Error::ArityMismatch {
                row: idx,
                expected: columns.len(),
                found: row.len(),
            });
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True for the placeholder produced by an empty payload.
    pub fn has_no_columns(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of one column, top to bottom.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value> + 'a> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Stacks frames vertically.
    ///
    /// Frames without columns are skipped; all others must share the same
    /// column list.
    pub fn concat(frames: impl IntoIterator<Item = Frame>) -> Result<Frame, B3Error> {
        let mut out = Frame::empty();
        for frame in frames {
            if frame.has_no_columns() {
                continue;
            }
            if out.has_no_columns() {
                out.columns = frame.columns;
                out.rows = frame.rows;
                continue;
            }
            if frame.columns != out.columns {
                return Err(B3Error::ColumnMismatch {
                    expected: out.columns,
                    found: frame.columns,
                });
            }
            out.rows.extend(frame.rows);
        }
        Ok(out)
    }
}
