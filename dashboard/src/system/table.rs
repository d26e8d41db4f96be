//! Adapter for the fixed-column table printed by `ollama ps`.
//!
//! This is the only module that knows the CLI's text layout. Columns are
//! located by searching the header for their names, and every data row is
//! sliced at those character offsets. Splitting on whitespace would break on
//! fields like `100% GPU` or `4 minutes from now`.

use thiserror::Error;
use tracing::{debug, warn};
use vram_view_shared::ResourceRecord;

use crate::system::units;

pub const REQUIRED_COLUMNS: [&str; 5] = ["NAME", "ID", "SIZE", "PROCESSOR", "UNTIL"];

const NAME: usize = 0;
const ID: usize = 1;
const SIZE: usize = 2;
const PROCESSOR: usize = 3;
const UNTIL: usize = 4;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("could not parse table header, missing column {column}. Header was: {header}")]
    MissingColumn { column: &'static str, header: String },
}

/// Character offsets of the required columns, indexed like `REQUIRED_COLUMNS`.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    starts: [usize; 5],
    ends: [Option<usize>; 5],
}

impl ColumnLayout {
    pub fn from_header(header: &str) -> Result<Self, ParseError> {
        let header = header.to_ascii_uppercase();

        let mut starts = [0; 5];
        for (slot, column) in starts.iter_mut().zip(REQUIRED_COLUMNS) {
            let byte = header.find(column).ok_or_else(|| ParseError::MissingColumn {
                column,
                header: header.clone(),
            })?;
            *slot = header[..byte].chars().count();
        }

        // A column runs until the next column to its right, whatever the order.
        let mut ends = [None; 5];
        for (end, start) in ends.iter_mut().zip(starts) {
            *end = starts.iter().copied().filter(|&other| other > start).min();
        }

        Ok(ColumnLayout { starts, ends })
    }

    pub fn offset(&self, column: &str) -> Option<usize> {
        REQUIRED_COLUMNS
            .iter()
            .position(|name| *name == column)
            .map(|index| self.starts[index])
    }

    fn field(&self, row: &[char], index: usize) -> String {
        let start = self.starts[index].min(row.len());
        let end = self.ends[index]
            .unwrap_or(row.len())
            .clamp(start, row.len());
        row[start..end].iter().collect::<String>().trim().to_string()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedTable {
    pub records: Vec<ResourceRecord>,
    /// Sum of every row's SIZE, in GiB.
    pub total_gib: f64,
    pub skipped_rows: usize,
    pub conversion_warnings: usize,
}

pub fn try_parse(raw: &str) -> Result<ParsedTable, ParseError> {
    let normalized = raw.replace("\r\n", "\n");
    let lines: Vec<&str> = normalized.trim().split('\n').collect();
    if lines.len() < 2 {
        return Ok(ParsedTable::default());
    }

    let layout = ColumnLayout::from_header(lines[0])?;
    let mut table = ParsedTable::default();

    for line in &lines[1..] {
        let row: Vec<char> = line.chars().collect();
        if row.len() < layout.starts[UNTIL] {
            debug!(row = %line, "skipping truncated table row");
            table.skipped_rows += 1;
            continue;
        }

        let record = ResourceRecord {
            name: layout.field(&row, NAME),
            identifier: layout.field(&row, ID),
            raw_size: layout.field(&row, SIZE),
            processor_label: layout.field(&row, PROCESSOR),
            expiry: layout.field(&row, UNTIL),
        };

        let (gib, warning) = units::convert_checked(&record.raw_size);
        table.total_gib += gib;
        if warning.is_some() {
            debug!(model = %record.name, "model size not counted");
            table.conversion_warnings += 1;
        }
        table.records.push(record);
    }

    Ok(table)
}

/// Never fails: an unreadable header yields an empty table.
pub fn parse(raw: &str) -> ParsedTable {
    try_parse(raw).unwrap_or_else(|error| {
        warn!(%error, "discarding command output");
        ParsedTable::default()
    })
}
