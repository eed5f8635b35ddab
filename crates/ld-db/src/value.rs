//! Backend-neutral SQL values and result rows.

use crate::error::{DbError, DbResult};
use std::fmt;

/// A parameter or column value exchanged with a backend
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Bool(bool),
    Int(i64),
    Double(f64),
    Text(String),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("NULL"),
            SqlValue::Bool(b) => write!(f, "{b}"),
            SqlValue::Int(i) => write!(f, "{i}"),
            SqlValue::Double(d) => write!(f, "{d}"),
            SqlValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SqlValue {
    fn from(v: bool) -> Self {
        SqlValue::Bool(v)
    }
}

impl From<i64> for SqlValue {
    fn from(v: i64) -> Self {
        SqlValue::Int(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        SqlValue::Int(i64::from(v))
    }
}

impl From<f64> for SqlValue {
    fn from(v: f64) -> Self {
        SqlValue::Double(v)
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        SqlValue::Text(v.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        SqlValue::Text(v)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(v: Option<T>) -> Self {
        v.map_or(SqlValue::Null, Into::into)
    }
}

/// One result row; columns are addressed by zero-based position
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    values: Vec<SqlValue>,
}

impl Row {
    pub fn new(values: Vec<SqlValue>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[SqlValue] {
        &self.values
    }

    /// Raw value at `index`.
    pub fn get(&self, index: usize) -> DbResult<&SqlValue> {
        self.values.get(index).ok_or_else(|| DbError::ValueError {
            index,
            message: format!("out of range (row has {} columns)", self.values.len()),
        })
    }

    /// Nullable string value. Numbers and booleans are rendered as text.
    pub fn get_string(&self, index: usize) -> DbResult<Option<String>> {
        Ok(match self.get(index)? {
            SqlValue::Null => None,
            SqlValue::Text(s) => Some(s.clone()),
            other => Some(other.to_string()),
        })
    }

    /// Nullable integer value.
    pub fn get_i64(&self, index: usize) -> DbResult<Option<i64>> {
        match self.get(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Int(i) => Ok(Some(*i)),
            SqlValue::Bool(b) => Ok(Some(i64::from(*b))),
            SqlValue::Text(s) => s.trim().parse().map(Some).map_err(|_| DbError::ValueError {
                index,
                message: format!("'{s}' is not an integer"),
            }),
            SqlValue::Double(d) => Err(DbError::ValueError {
                index,
                message: format!("{d} is not an integer"),
            }),
        }
    }

    /// Nullable boolean value. Integer columns (Oracle `NUMBER(1)`, MS SQL `BIT`) map 0/1.
    pub fn get_bool(&self, index: usize) -> DbResult<Option<bool>> {
        match self.get(index)? {
            SqlValue::Null => Ok(None),
            SqlValue::Bool(b) => Ok(Some(*b)),
            SqlValue::Int(0) => Ok(Some(false)),
            SqlValue::Int(1) => Ok(Some(true)),
            other => Err(DbError::ValueError {
                index,
                message: format!("{other} is not a boolean"),
            }),
        }
    }
}

impl From<Vec<SqlValue>> for Row {
    fn from(values: Vec<SqlValue>) -> Self {
        Self::new(values)
    }
}

#[cfg(test)]
#[path = "value_test.rs"]
mod tests;
