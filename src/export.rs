use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use crate::parser::DocumentOutcome;
use crate::table::{assemble_parsed, Column, Table};

const PREVIEW_WIDTH: usize = 18;

#[derive(Serialize)]
struct JsonColumn {
    key: &'static str,
    label: &'static str,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    source: &'a str,
    status: &'static str,
    columns: Vec<JsonColumn>,
    rows: Vec<[&'a str; 11]>,
}

/// Write every document as `{source, status, columns, rows}`; rows are
/// arrays of cells in column order.
pub fn write_json<W: Write>(mut out: W, documents: &[(String, DocumentOutcome)]) -> Result<()> {
    let tables: Vec<Table> = documents
        .iter()
        .map(|(_, outcome)| assemble_parsed(outcome.subplots()))
        .collect();

    let payload: Vec<JsonDocument> = documents
        .iter()
        .zip(&tables)
        .map(|((source, outcome), table)| JsonDocument {
            source,
            status: outcome.status(),
            columns: table
                .columns
                .iter()
                .map(|c| JsonColumn {
                    key: c.key(),
                    label: c.label(),
                })
                .collect(),
            rows: table.rows.iter().map(|r| r.cells()).collect(),
        })
        .collect();

    serde_json::to_writer_pretty(&mut out, &payload)?;
    writeln!(out)?;
    Ok(())
}

/// Compact fixed-width preview; multi-line cells show their first line and
/// a `(+n)` count of the rest.
pub fn write_preview<W: Write>(mut out: W, source: &str, table: &Table) -> Result<()> {
    writeln!(out, "{} ({} subplots)", source, table.rows.len())?;

    let header: Vec<String> = table
        .labels()
        .iter()
        .map(|l| pad(&truncate(l, PREVIEW_WIDTH), PREVIEW_WIDTH))
        .collect();
    writeln!(out, "{}", header.join(" | "))?;
    writeln!(out, "{}", "-".repeat(header.len() * (PREVIEW_WIDTH + 3)))?;

    for row in &table.rows {
        let cells: Vec<String> = Column::ALL
            .iter()
            .map(|c| pad(&truncate(&summarize(row.get(*c)), PREVIEW_WIDTH), PREVIEW_WIDTH))
            .collect();
        writeln!(out, "{}", cells.join(" | "))?;
    }
    writeln!(out)?;
    Ok(())
}

fn summarize(cell: &str) -> String {
    let mut lines = cell.lines();
    let first = lines.next().unwrap_or("");
    let rest = lines.count();
    if rest == 0 {
        first.to_string()
    } else {
        format!("{} (+{})", first, rest)
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    format!("{}{}", s, " ".repeat(width.saturating_sub(len)))
}
