//! CSV-backed decision tables.
//!
//! [`DataTable`] is the raw input: a header row, an identifier column and at
//! least two criteria columns. [`RankedTable`] is the output shape with the
//! score and rank columns appended and rows sorted best-first. The CSV
//! support is deliberately small: quoted fields, doubled-quote escapes and
//! CRLF line ends, nothing more.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::engine::Ranking;

/// Header appended for the closeness score column.
pub const SCORE_HEADER: &str = "Topsis Score";
/// Header appended for the rank column.
pub const RANK_HEADER: &str = "Rank";

/// A parsed input table. Row cells are kept as strings so the identifier
/// column survives untouched; criteria cells are only parsed on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Reads and parses a CSV file from disk.
    pub fn read_csv(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading csv from {}", path.display()))?;
        Self::from_csv_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    /// Parses CSV text into a rectangular table.
    ///
    /// The first record is the header row. Blank lines are skipped. The
    /// table must have at least three columns (identifier plus two
    /// criteria) and at least one data row.
    pub fn from_csv_str(text: &str) -> Result<Self> {
        // Excel exports often lead with a BOM.
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut records = parse_csv(text)?;
        if records.is_empty() {
            anyhow::bail!("csv input is empty");
        }
        let headers = records.remove(0);
        if headers.len() < 3 {
            anyhow::bail!(
                "need at least 3 columns (an identifier and two criteria), got {}",
                headers.len()
            );
        }
        if records.is_empty() {
            anyhow::bail!("csv has a header row but no data rows");
        }
        for (i, row) in records.iter().enumerate() {
            if row.len() != headers.len() {
                anyhow::bail!(
                    "row {} has {} fields, expected {}",
                    i + 1,
                    row.len(),
                    headers.len()
                );
            }
        }
        Ok(Self {
            headers,
            rows: records,
        })
    }

    /// Number of criteria columns (everything after the identifier).
    pub fn criteria_count(&self) -> usize {
        self.headers.len().saturating_sub(1)
    }

    /// Parses every criteria cell as a float, in row order.
    ///
    /// Errors name the offending row by its identifier cell and the column
    /// by its header, so they read well when surfaced to a form or terminal.
    pub fn numeric_matrix(&self) -> Result<Vec<Vec<f64>>> {
        self.rows
            .iter()
            .map(|row| {
                let id = &row[0];
                row[1..]
                    .iter()
                    .zip(&self.headers[1..])
                    .map(|(cell, header)| {
                        cell.trim().parse::<f64>().with_context(|| {
                            format!("row {id:?}: column {header:?} has non-numeric value {cell:?}")
                        })
                    })
                    .collect()
            })
            .collect()
    }

    /// Merges a [`Ranking`] into the table: appends the score and rank
    /// columns and sorts rows best-first.
    pub fn into_ranked(self, ranking: &Ranking) -> Result<RankedTable> {
        if ranking.scores.len() != self.rows.len() || ranking.ranks.len() != self.rows.len() {
            anyhow::bail!(
                "ranking covers {} rows but the table has {}",
                ranking.scores.len(),
                self.rows.len()
            );
        }
        let mut headers = self.headers;
        headers.push(SCORE_HEADER.to_string());
        headers.push(RANK_HEADER.to_string());
        let mut rows: Vec<RankedRow> = self
            .rows
            .into_iter()
            .enumerate()
            .map(|(i, cells)| RankedRow {
                cells,
                score: ranking.scores[i],
                rank: ranking.ranks[i],
            })
            .collect();
        rows.sort_by_key(|row| row.rank);
        Ok(RankedTable { headers, rows })
    }
}

/// One output row: the original cells plus its score and rank.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub cells: Vec<String>,
    pub score: f64,
    pub rank: usize,
}

/// The result table, sorted by rank ascending (best alternative first).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedTable {
    pub headers: Vec<String>,
    pub rows: Vec<RankedRow>,
}

impl RankedTable {
    /// Renders the table back to CSV. Scores keep their full precision;
    /// presentation layers round for display instead.
    pub fn to_csv(&self) -> String {
        let mut out = String::new();
        push_record(&mut out, self.headers.iter().map(String::as_str));
        for row in &self.rows {
            let score = row.score.to_string();
            let rank = row.rank.to_string();
            let fields = row
                .cells
                .iter()
                .map(String::as_str)
                .chain([score.as_str(), rank.as_str()]);
            push_record(&mut out, fields);
        }
        out
    }

    /// Writes the CSV rendering to disk.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_csv())
            .with_context(|| format!("writing csv to {}", path.display()))
    }
}

/// Splits CSV text into records. Handles quoted fields, doubled quotes
/// inside them, and both LF and CRLF terminators. Blank lines produce no
/// record.
fn parse_csv(text: &str) -> Result<Vec<Vec<String>>> {
    let mut records: Vec<Vec<String>> = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    // True once the current record has any content, so `a,,b` keeps its
    // empty middle field while a fully blank line is dropped.
    let mut pending = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                other => field.push(other),
            }
            continue;
        }
        match c {
            '"' => {
                in_quotes = true;
                pending = true;
            }
            ',' => {
                record.push(std::mem::take(&mut field));
                pending = true;
            }
            '\n' | '\r' => {
                if c == '\r' && chars.peek() == Some(&'\n') {
                    chars.next();
                }
                if pending {
                    record.push(std::mem::take(&mut field));
                    records.push(std::mem::take(&mut record));
                    pending = false;
                }
            }
            other => {
                field.push(other);
                pending = true;
            }
        }
    }
    if in_quotes {
        anyhow::bail!("unterminated quoted field at end of input");
    }
    if pending {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}

/// Appends one CSV record, quoting fields only when they need it.
fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for f in fields {
        if !first {
            out.push(',');
        }
        first = false;
        if f.contains(|c| matches!(c, ',' | '"' | '\n' | '\r')) {
            out.push('"');
            out.push_str(&f.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(f);
        }
    }
    out.push('\n');
}
