//! Statement rendering
//!
//! Tabular (CSV) export of a transaction list for account statements.

use std::fmt::Write as _;
use std::str::FromStr;

use super::entries::LedgerEntry;

/// Requested statement output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementFormat {
    /// Structured JSON list
    Structured,
    /// Delimited-text export
    Tabular,
}

impl Default for StatementFormat {
    fn default() -> Self {
        StatementFormat::Structured
    }
}

impl FromStr for StatementFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" | "structured" => Ok(StatementFormat::Structured),
            "csv" | "tabular" => Ok(StatementFormat::Tabular),
            other => Err(format!("unknown statement format: {other:?}")),
        }
    }
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Render entries as CSV, header row first. Rows keep the input order
/// (the log already returns them newest first).
pub fn render_csv(entries: &[LedgerEntry]) -> String {
    let mut out = String::from("id,created_at,direction,amount,currency,status,description\n");

    for entry in entries {
        let _ = writeln!(
            out,
            "{},{},{},{:.2},{},{},{}",
            entry.id,
            entry.created_at.to_rfc3339(),
            entry.direction,
            entry.amount,
            entry.currency,
            entry.status,
            csv_field(&entry.description),
        );
    }

    out
}
