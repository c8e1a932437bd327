use crate::payload::{Column, Scalar, Table};
use crate::{Error, Result};
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Reads CSV with a header row, inferring one scalar type per column.
pub fn read_csv<R: Read>(reader: R) -> Result<Table> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(reader);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if headers.is_empty() {
        return Err(Error::input("CSV has no header row"));
    }

    let mut raw_columns: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for record in reader.records() {
        let record = record?;
        for (column, field) in raw_columns.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(raw_columns)
        .map(|(name, cells)| infer_column(name, cells))
        .collect();
    Table::new(columns)
}

pub async fn load_csv(path: &Path) -> Result<Table> {
    debug!("Reading CSV from {}", path.display());
    let bytes = tokio::fs::read(path).await?;
    let table = read_csv(bytes.as_slice())?;
    debug!(
        "Loaded {} rows x {} columns from {}",
        table.row_count(),
        table.column_count(),
        path.display()
    );
    Ok(table)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellType {
    Int,
    Float,
    Bool,
    Text,
}

fn infer_column(name: String, cells: Vec<String>) -> Column {
    let cell_type = infer_type(&cells);
    let values = cells
        .into_iter()
        .map(|cell| convert(cell, cell_type))
        .collect();
    Column::new(name, values)
}

fn infer_type(cells: &[String]) -> CellType {
    let present: Vec<&str> = cells
        .iter()
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    if present.is_empty() {
        CellType::Text
    } else if present.iter().all(|c| c.parse::<i64>().is_ok()) {
        CellType::Int
    } else if present.iter().all(|c| c.parse::<f64>().is_ok()) {
        CellType::Float
    } else if present.iter().all(|c| parse_bool(c).is_some()) {
        CellType::Bool
    } else {
        CellType::Text
    }
}

fn convert(cell: String, cell_type: CellType) -> Scalar {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Scalar::Null;
    }
    // inference guarantees every non-empty cell parses as the column type
    match cell_type {
        CellType::Int => trimmed.parse().map(Scalar::Int).unwrap_or(Scalar::Null),
        CellType::Float => trimmed.parse().map(Scalar::Float).unwrap_or(Scalar::Null),
        CellType::Bool => parse_bool(trimmed).map(Scalar::Bool).unwrap_or(Scalar::Null),
        CellType::Text => Scalar::Text(cell),
    }
}

fn parse_bool(cell: &str) -> Option<bool> {
    if cell.eq_ignore_ascii_case("true") {
        Some(true)
    } else if cell.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}
