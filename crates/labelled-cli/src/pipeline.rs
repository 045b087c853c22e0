//! Load pipeline: options assembly, loading, label mode and CSV output.

use std::borrow::Cow;
use std::fmt;
use std::io::Write;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, trace};

use labelled_ingest::{
    ChannelRequest, ChannelSpec, LoadOptions, LoadReport, MissingRecognizer, load_path,
    read_schema_path,
};
use labelled_model::{FactorLevels, Missing, Table};
use labelled_transform::LabelTransform;

use crate::logging::redact_value;

/// How labels are surfaced in the output table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelMode {
    /// Raw typed values.
    #[default]
    Raw,
    /// Label overlay on labelled values.
    Apply,
    /// Labels removed, domains kept.
    Zap,
    /// Factor displaying labels where present, values elsewhere.
    FactorValues,
    /// Factor displaying labels only.
    FactorLabels,
}

impl LabelMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelMode::Raw => "raw",
            LabelMode::Apply => "apply",
            LabelMode::Zap => "zap",
            LabelMode::FactorValues => "factor-values",
            LabelMode::FactorLabels => "factor-labels",
        }
    }

    /// Apply this mode to every column of `table`.
    ///
    /// # Errors
    ///
    /// Propagates the table's row-count check.
    pub fn transform(&self, table: &Table) -> labelled_model::Result<Table> {
        match self {
            LabelMode::Raw => Ok(table.clone()),
            LabelMode::Apply => table.apply_labels(),
            LabelMode::Zap => table.zap_labels(),
            LabelMode::FactorValues => table.as_factor(FactorLevels::Values),
            LabelMode::FactorLabels => table.as_factor(FactorLevels::Labels),
        }
    }
}

impl fmt::Display for LabelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LabelMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "raw" => Ok(LabelMode::Raw),
            "apply" => Ok(LabelMode::Apply),
            "zap" => Ok(LabelMode::Zap),
            "factor-values" => Ok(LabelMode::FactorValues),
            "factor-labels" => Ok(LabelMode::FactorLabels),
            _ => Err(format!("Unknown label mode: {s}")),
        }
    }
}

/// Everything needed to load one file.
#[derive(Debug, Clone)]
pub struct LoadRequest {
    pub path: PathBuf,
    pub schema: Option<PathBuf>,
    pub delimiter: char,
    /// Missing tokens. Empty together with `na_aliases` means "use the schema's".
    pub na_tokens: Vec<String>,
    /// `(token, reason)` pairs.
    pub na_aliases: Vec<(String, String)>,
    pub channels: Vec<ChannelRequest>,
    pub labels: LabelMode,
    pub strict_schema: bool,
    pub trim_cells: bool,
}

impl LoadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            schema: None,
            delimiter: ',',
            na_tokens: Vec::new(),
            na_aliases: Vec::new(),
            channels: Vec::new(),
            labels: LabelMode::default(),
            strict_schema: false,
            trim_cells: true,
        }
    }

    /// Resolve the request into ingest options, reading the schema if given.
    ///
    /// # Errors
    ///
    /// Fails for non-ASCII delimiters, invalid channel lists and unreadable schemas.
    pub fn options(&self) -> Result<LoadOptions> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got '{}'", self.delimiter);
        }
        let mut buffer = [0; 1];
        let delimiter = self.delimiter.encode_utf8(&mut buffer).as_bytes()[0];
        let mut options = LoadOptions::new()
            .with_delimiter(delimiter)
            .with_trim_cells(self.trim_cells)
            .with_strict_schema(self.strict_schema);
        if let Some(path) = &self.schema {
            let schema = read_schema_path(path)
                .with_context(|| format!("read schema {}", path.display()))?;
            options = options.with_schema(schema);
        }
        if !self.na_tokens.is_empty() || !self.na_aliases.is_empty() {
            let recognizer = self
                .na_aliases
                .iter()
                .fold(MissingRecognizer::new(&self.na_tokens), |recognizer, (token, reason)| {
                    recognizer.with_alias(token, reason)
                });
            options = options.with_recognizer(recognizer);
        }
        if !self.channels.is_empty() {
            let channels =
                ChannelSpec::new(self.channels.clone()).context("invalid channel list")?;
            options = options.with_channels(channels);
        }
        Ok(options)
    }
}

/// A loaded and label-transformed table.
#[derive(Debug, Clone)]
pub struct LoadResult {
    pub path: PathBuf,
    pub table: Table,
    pub report: LoadReport,
    pub labels: LabelMode,
    /// Validated delimiter byte, reused when writing output.
    pub delimiter: u8,
}

impl LoadResult {
    pub fn has_warnings(&self) -> bool {
        self.report.has_warnings()
    }
}

/// Load the requested file and apply its label mode.
///
/// # Errors
///
/// Propagates option, I/O, parse and configuration errors.
pub fn run_load(request: &LoadRequest) -> Result<LoadResult> {
    let span = info_span!("run_load", path = %request.path.display(), labels = %request.labels);
    let _guard = span.enter();

    let options = request.options()?;
    let outcome = load_path(&request.path, &options)
        .with_context(|| format!("load {}", request.path.display()))?;
    log_unconverted_cells(&outcome.table);
    let table = request.labels.transform(&outcome.table)?;
    info!(
        columns = table.width(),
        rows = table.height(),
        warnings = outcome.report.warnings.len(),
        "load complete"
    );
    Ok(LoadResult {
        path: request.path.clone(),
        table,
        report: outcome.report,
        labels: request.labels,
        delimiter: options.delimiter,
    })
}

fn log_unconverted_cells(table: &Table) {
    for (name, column) in table.iter() {
        for (row, cell) in column.cells().iter().enumerate() {
            if let Some(raw) = cell.as_missing().and_then(Missing::raw) {
                trace!(column = name, row, raw = redact_value(raw), "unconverted cell");
            }
        }
    }
}

/// Write `table` as delimited text using each entry's display form.
///
/// Missing entries are written as empty fields.
///
/// # Errors
///
/// Fails if the writer fails.
pub fn write_csv<W: Write>(table: &Table, writer: W, delimiter: u8) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);
    csv.write_record(table.names())?;
    let columns: Vec<Vec<String>> = table
        .iter()
        .map(|(_, column)| {
            column
                .displays()
                .into_iter()
                .map(|text| text.map(Cow::into_owned).unwrap_or_default())
                .collect()
        })
        .collect();
    for row in 0..table.height() {
        csv.write_record(columns.iter().map(|column| column[row].as_str()))?;
    }
    csv.flush().context("flush output")?;
    Ok(())
}

/// Parse a `TOKEN=REASON` alias.
///
/// # Errors
///
/// Fails when there is no `=`.
pub fn parse_alias(value: &str) -> std::result::Result<(String, String), String> {
    match value.split_once('=') {
        Some((token, reason)) if !reason.is_empty() => {
            Ok((token.to_string(), reason.to_string()))
        }
        _ => Err(format!("expected TOKEN=REASON, got '{value}'")),
    }
}
