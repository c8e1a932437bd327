use super::render::{render_outcome, render_status};
use super::tabular::load_csv;
use crate::client::{DEFAULT_BATCH_LIMIT, DEFAULT_TEXT_COLUMN, ServingClient};
use crate::{Error, Result};
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

pub const HELP: &str = "\
Type text and press enter to send it to the endpoint.
  :column <name>                  set the column used for text (default: text)
  :raw <json>                     send a raw JSON payload
  :batch <csv> [column] [limit]   send rows from a CSV file
  :status                         show the connection settings
  :help                           show this help
  :quit                           leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineCommand {
    Empty,
    Help,
    Status,
    Quit,
    Column(String),
    Text(String),
    Raw(String),
    Batch {
        path: PathBuf,
        column: Option<String>,
        limit: usize,
    },
}

pub fn parse_line(line: &str) -> Result<LineCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(LineCommand::Empty);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(LineCommand::Text(line.to_string()));
    };

    let (name, rest) = match command.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim()),
        None => (command, ""),
    };

    match name {
        "help" => Ok(LineCommand::Help),
        "status" => Ok(LineCommand::Status),
        "quit" | "exit" => Ok(LineCommand::Quit),
        "column" if !rest.is_empty() => Ok(LineCommand::Column(rest.to_string())),
        "column" => Err(Error::input("Usage: :column <name>")),
        "raw" => Ok(LineCommand::Raw(rest.to_string())),
        "batch" => parse_batch(rest),
        other => Err(Error::input(format!("Unknown command ':{other}' (try :help)"))),
    }
}

fn parse_batch(args: &str) -> Result<LineCommand> {
    let mut parts = args.split_whitespace();
    let path = parts
        .next()
        .ok_or_else(|| Error::input("Usage: :batch <csv> [column] [limit]"))?;
    let column = parts.next().map(str::to_string);
    let limit = match parts.next() {
        Some(raw) => raw
            .parse::<usize>()
            .map_err(|_| Error::input(format!("Invalid row limit '{raw}'")))?,
        None => DEFAULT_BATCH_LIMIT,
    };
    Ok(LineCommand::Batch {
        path: PathBuf::from(path),
        column,
        limit,
    })
}

/// Counts kept across one interactive session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub attempts: usize,
    pub succeeded: usize,
}

/// Reads commands line by line until EOF or `:quit`.
///
/// A failed attempt is reported and the loop keeps going.
pub async fn run_interactive<R, W>(client: &ServingClient, mut reader: R, out: &mut W) -> Result<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut buffer = Vec::new();
    let mut column = DEFAULT_TEXT_COLUMN.to_string();
    let mut summary = SessionSummary::default();

    writeln!(out, "{HELP}")?;
    loop {
        write!(out, "> ")?;
        out.flush()?;

        buffer.clear();
        if reader.read_until(b'\n', &mut buffer).await? == 0 {
            break;
        }
        let Ok(line) = std::str::from_utf8(&buffer) else {
            writeln!(out, "{}", Error::input("line is not valid UTF-8"))?;
            continue;
        };

        let command = match parse_line(line) {
            Ok(command) => command,
            Err(e) => {
                writeln!(out, "{e}")?;
                continue;
            }
        };
        debug!("Interactive command: {:?}", command);

        let outcome = match command {
            LineCommand::Empty => continue,
            LineCommand::Quit => break,
            LineCommand::Help => {
                writeln!(out, "{HELP}")?;
                continue;
            }
            LineCommand::Status => {
                writeln!(out, "{}", render_status(client.target()))?;
                continue;
            }
            LineCommand::Column(name) => {
                writeln!(out, "Text column set to '{name}'")?;
                column = name;
                continue;
            }
            LineCommand::Text(text) => client.send_text(&text, &column).await,
            LineCommand::Raw(json) => client.send_raw(&json).await,
            LineCommand::Batch {
                path,
                column: batch_column,
                limit,
            } => match load_csv(&path).await {
                Ok(table) => {
                    let batch_column = batch_column.as_deref().unwrap_or(column.as_str());
                    client.send_batch(&table, batch_column, limit).await
                }
                Err(e) => Err(e),
            },
        };

        let rendered = render_outcome(&outcome);
        summary.attempts += 1;
        if rendered.is_success() {
            summary.succeeded += 1;
        }
        writeln!(out, "{rendered}")?;
    }

    Ok(summary)
}
