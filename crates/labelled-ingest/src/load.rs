//! Delimited-source loading.

use std::io::Read;
use std::path::Path;

use tracing::{info, info_span};

use labelled_model::TableSchema;

use crate::channel::ChannelSpec;
use crate::error::{IngestError, Result};
use crate::grid::{RawGrid, read_grid, read_grid_path};
use crate::missing::MissingRecognizer;
use crate::split::{ChannelSplitter, SplitOutcome};

/// Options for [`load`].
///
/// When no recognizer is set, the schema's table-level `missingValues`
/// are used, falling back to treating empty cells as missing.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: u8,
    pub recognizer: Option<MissingRecognizer>,
    pub channels: ChannelSpec,
    pub schema: TableSchema,
    /// Trim surrounding whitespace from every cell.
    pub trim_cells: bool,
    /// Fail on labels that match neither a domain member nor a missing token.
    pub strict_schema: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            recognizer: None,
            channels: ChannelSpec::default(),
            schema: TableSchema::default(),
            trim_cells: true,
            strict_schema: false,
        }
    }
}

impl LoadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_na_tokens<I, S>(mut self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.recognizer = Some(MissingRecognizer::new(tokens));
        self
    }

    #[must_use]
    pub fn with_recognizer(mut self, recognizer: MissingRecognizer) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    #[must_use]
    pub fn with_channels(mut self, channels: ChannelSpec) -> Self {
        self.channels = channels;
        self
    }

    #[must_use]
    pub fn with_schema(mut self, schema: TableSchema) -> Self {
        self.schema = schema;
        self
    }

    #[must_use]
    pub fn with_trim_cells(mut self, trim: bool) -> Self {
        self.trim_cells = trim;
        self
    }

    #[must_use]
    pub fn with_strict_schema(mut self, strict: bool) -> Self {
        self.strict_schema = strict;
        self
    }

    /// The recognizer this load will use.
    pub fn effective_recognizer(&self) -> MissingRecognizer {
        match &self.recognizer {
            Some(recognizer) => recognizer.clone(),
            None if !self.schema.missing_values.is_empty() => {
                MissingRecognizer::new(self.schema.missing_values.iter().cloned())
            }
            None => MissingRecognizer::default(),
        }
    }

    /// Split an already-read grid with these options.
    ///
    /// # Errors
    ///
    /// Returns [`IngestError::Model`] for configuration and schema errors.
    pub fn split(&self, grid: &RawGrid) -> Result<SplitOutcome> {
        let recognizer = self.effective_recognizer();
        let outcome = ChannelSplitter::new(&self.schema, &recognizer, &self.channels)
            .strict_schema(self.strict_schema)
            .split(grid)?;
        Ok(outcome)
    }
}

/// Load a delimited source into labelled channel columns.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] for malformed input and [`IngestError::Model`]
/// for configuration and schema errors.
pub fn load<R: Read>(source: R, options: &LoadOptions) -> Result<SplitOutcome> {
    let grid = read_grid(source, options.delimiter, options.trim_cells)?;
    options.split(&grid)
}

/// Load a delimited file from disk.
///
/// # Errors
///
/// As [`load`], plus [`IngestError::Io`] if the file cannot be opened.
pub fn load_path(path: &Path, options: &LoadOptions) -> Result<SplitOutcome> {
    let span = info_span!("load", path = %path.display());
    let _guard = span.enter();
    let grid = read_grid_path(path, options.delimiter, options.trim_cells)?;
    info!(
        columns = grid.width(),
        rows = grid.height(),
        "read delimited source"
    );
    options.split(&grid)
}

/// Parse a table schema manifest.
///
/// # Errors
///
/// Returns [`IngestError::Schema`] for invalid JSON or schema content.
pub fn read_schema<R: Read>(reader: R) -> Result<TableSchema> {
    Ok(serde_json::from_reader(reader)?)
}

/// Parse a table schema manifest from disk.
///
/// # Errors
///
/// As [`read_schema`], plus [`IngestError::Io`] if the file cannot be opened.
pub fn read_schema_path(path: &Path) -> Result<TableSchema> {
    let file = std::fs::File::open(path).map_err(|source| IngestError::io(path, source))?;
    read_schema(std::io::BufReader::new(file))
}
