use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// A single cell of tabular input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Scalar {
    pub fn is_non_finite(&self) -> bool {
        matches!(self, Self::Float(value) if !value.is_finite())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Named columns of equal length, in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::new();
        for column in &columns {
            if !seen.insert(column.name.as_str()) {
                return Err(Error::input(format!(
                    "Duplicate column name '{}'",
                    column.name
                )));
            }
        }

        if let Some(first) = columns.first() {
            let expected = first.values.len();
            if let Some(ragged) = columns.iter().find(|c| c.values.len() != expected) {
                return Err(Error::input(format!(
                    "Column '{}' has {} values, expected {}",
                    ragged.name,
                    ragged.values.len(),
                    expected
                )));
            }
        }

        Ok(Self { columns })
    }

    /// A one-row table built from a single record.
    pub fn from_record<K, V>(fields: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: Into<String>,
        V: Into<Scalar>,
    {
        let columns = fields
            .into_iter()
            .map(|(name, value)| Column::new(name, vec![value.into()]))
            .collect();
        Self::new(columns)
    }

    /// A one-row table holding `text` under `column`.
    pub fn single_text(column: &str, text: &str) -> Result<Self> {
        if column.trim().is_empty() {
            return Err(Error::input("Missing required field: column name"));
        }
        if text.trim().is_empty() {
            return Err(Error::input("Missing required field: text"));
        }
        Self::from_record([(column, text)])
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |c| c.values.len())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Projects the named columns, in the order requested.
    pub fn select(&self, names: &[&str]) -> Result<Self> {
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let column = self
                .column(name)
                .ok_or_else(|| Error::input(format!("Column '{name}' not found")))?;
            columns.push(column.clone());
        }
        Self::new(columns)
    }

    /// Keeps at most the first `limit` rows.
    pub fn head(mut self, limit: usize) -> Self {
        for column in &mut self.columns {
            column.values.truncate(limit);
        }
        self
    }

    pub fn row(&self, index: usize) -> Option<Vec<&Scalar>> {
        if index >= self.row_count() {
            return None;
        }
        Some(self.columns.iter().map(|c| &c.values[index]).collect())
    }

    pub fn rows(&self) -> impl Iterator<Item = Vec<&Scalar>> + '_ {
        (0..self.row_count()).filter_map(|i| self.row(i))
    }
}
