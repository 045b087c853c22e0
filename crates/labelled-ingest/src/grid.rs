use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use crate::error::{IngestError, Result};

/// Raw string cells with a header row.
///
/// Rows are padded with empty cells to the header width; extra cells are
/// dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawGrid {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawGrid {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build from string slices, mainly for tests and small fixtures.
    pub fn from_rows(headers: &[&str], rows: &[&[&str]]) -> Self {
        Self::new(
            headers.iter().map(|header| (*header).to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| (*cell).to_string()).collect())
                .collect(),
        )
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.headers.len()
    }

    /// Cells of column `index`, top to bottom.
    pub fn column(&self, index: usize) -> impl Iterator<Item = &str> + '_ {
        self.rows
            .iter()
            .map(move |row| row.get(index).map(String::as_str).unwrap_or(""))
    }
}

/// Trim a header and collapse its internal whitespace.
pub(crate) fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str, trim: bool) -> String {
    if trim {
        raw.trim().trim_matches('\u{feff}').to_string()
    } else {
        raw.trim_matches('\u{feff}').to_string()
    }
}

/// Read a delimited source. The first record is the header row.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] for malformed input.
pub fn read_grid<R: Read>(source: R, delimiter: u8, trim: bool) -> Result<RawGrid> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(source);
    let mut records = reader.records();
    let Some(header) = records.next().transpose()? else {
        return Ok(RawGrid::default());
    };
    let headers: Vec<String> = header.iter().map(normalize_header).collect();
    let mut rows = Vec::new();
    for record in records {
        let record = record?;
        if record.len() > headers.len() {
            debug!(
                line = record.position().map(csv::Position::line),
                extra = record.len() - headers.len(),
                "dropping cells beyond header width"
            );
        }
        rows.push(
            record
                .iter()
                .take(headers.len())
                .map(|cell| normalize_cell(cell, trim))
                .collect(),
        );
    }
    Ok(RawGrid::new(headers, rows))
}

/// Read a delimited file from disk.
///
/// # Errors
///
/// Returns [`IngestError::Io`] if the file cannot be opened.
pub fn read_grid_path(path: &Path, delimiter: u8, trim: bool) -> Result<RawGrid> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::io(path, source))?;
    read_grid(file, delimiter, trim)
}
