use super::raw::RawJson;
use super::types::{Column, Scalar, Table};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Top-level key the serving endpoint uses to recognise split-oriented frames.
pub const DATAFRAME_SPLIT_KEY: &str = "dataframe_split";

/// Split-oriented encoding of a [`Table`]: names, row ordinals and row-major data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitFrame {
    pub columns: Vec<String>,
    pub index: Vec<usize>,
    pub data: Vec<Vec<Scalar>>,
}

impl SplitFrame {
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    /// Rebuilds the columnar table this frame was produced from.
    pub fn to_table(&self) -> Result<Table> {
        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .map(|name| Column::new(name.clone(), Vec::with_capacity(self.data.len())))
            .collect();

        for (row_number, row) in self.data.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::input(format!(
                    "Row {} has {} values, expected {}",
                    row_number,
                    row.len(),
                    columns.len()
                )));
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.values.push(cell.clone());
            }
        }

        Table::new(columns)
    }
}

#[derive(Serialize)]
struct SplitEnvelope<'a> {
    dataframe_split: &'a SplitFrame,
}

/// A request body ready for encoding.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// `{"dataframe_split": {...}}`
    Split(SplitFrame),
    /// Caller-supplied JSON forwarded unchanged.
    Raw(RawJson),
}

impl Payload {
    pub fn dataframe_split(table: &Table) -> Self {
        Self::Split(build_tabular_payload(table))
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Split(frame) => format!(
                "{} with {} rows x {} columns",
                DATAFRAME_SPLIT_KEY,
                frame.row_count(),
                frame.columns.len()
            ),
            Self::Raw(raw) if raw.non_finite_count() > 0 => format!(
                "raw JSON with {} non-finite values",
                raw.non_finite_count()
            ),
            Self::Raw(_) => "raw JSON".to_string(),
        }
    }

    /// JSON form of the payload; non-finite values become `null`.
    pub fn to_value(&self) -> Result<Value> {
        match self {
            Self::Split(frame) => Ok(serde_json::to_value(SplitEnvelope {
                dataframe_split: frame,
            })?),
            Self::Raw(raw) => Ok(raw.value().clone()),
        }
    }
}

pub fn build_tabular_payload(table: &Table) -> SplitFrame {
    SplitFrame {
        columns: table.column_names().into_iter().map(str::to_string).collect(),
        index: (0..table.row_count()).collect(),
        data: table
            .rows()
            .map(|row| row.into_iter().cloned().collect())
            .collect(),
    }
}

/// Parses raw JSON text for passthrough.
pub fn parse_raw_payload(text: &str) -> Result<Payload> {
    RawJson::parse(text).map(Payload::Raw)
}

/// Template offered to users composing a raw payload.
pub fn example_payload() -> Result<Value> {
    let table = Table::single_text("text", "hello")?;
    Payload::dataframe_split(&table).to_value()
}
