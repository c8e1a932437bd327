use crate::payload::{Scalar, Table};
use crate::serving::{EndpointTarget, InvocationResult};
use crate::{Error, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Failure,
}

/// What the surface shows for one attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub tone: Tone,
    pub headline: String,
    pub detail: Option<String>,
}

impl Rendered {
    pub fn is_success(&self) -> bool {
        self.tone == Tone::Success
    }
}

impl fmt::Display for Rendered {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline)?;
        if let Some(detail) = &self.detail {
            write!(f, "\n{detail}")?;
        }
        Ok(())
    }
}

pub fn render_outcome(outcome: &Result<InvocationResult>) -> Rendered {
    match outcome {
        Ok(result) if result.is_success => Rendered {
            tone: Tone::Success,
            headline: "Success".to_string(),
            detail: Some(result.body.to_display_string()),
        },
        Ok(result) => Rendered {
            tone: Tone::Failure,
            headline: format!("Request failed: HTTP {}", result.status_code),
            detail: Some(result.body.to_display_string()),
        },
        Err(Error::Remote { status, body }) => Rendered {
            tone: Tone::Failure,
            headline: format!("Request failed: HTTP {status}"),
            detail: Some(body.clone()),
        },
        Err(e) => Rendered {
            tone: Tone::Failure,
            headline: e.to_string(),
            detail: None,
        },
    }
}

pub fn render_status(target: &EndpointTarget) -> String {
    format!(
        "Host:     {}\nEndpoint: {}\nToken:    {}",
        target.host(),
        target.endpoint_name(),
        target.masked_credential()
    )
}

/// Plain-text grid of the first `rows` rows.
pub fn render_preview(table: &Table, rows: usize) -> String {
    let names = table.column_names();
    let shown: Vec<Vec<String>> = table
        .rows()
        .take(rows)
        .map(|row| row.into_iter().map(cell_text).collect())
        .collect();

    let mut widths: Vec<usize> = names.iter().map(|n| n.chars().count()).collect();
    for row in &shown {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = Vec::with_capacity(shown.len() + 2);
    lines.push(format_line(names.iter().map(|n| n.to_string()), &widths));
    lines.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    for row in shown {
        lines.push(format_line(row.into_iter(), &widths));
    }
    lines.push(format!(
        "({} of {} rows)",
        rows.min(table.row_count()),
        table.row_count()
    ));
    lines.join("\n")
}

fn cell_text(cell: &Scalar) -> String {
    match cell {
        Scalar::Null => "<null>".to_string(),
        other => other.to_string().replace('\n', "\\n"),
    }
}

fn format_line(cells: impl Iterator<Item = String>, widths: &[usize]) -> String {
    cells
        .zip(widths)
        .map(|(cell, &width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}
