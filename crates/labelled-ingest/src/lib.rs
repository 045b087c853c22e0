//! Channel-split loading.
//!
//! Raw string cells go in; a [`Table`](labelled_model::Table) of labelled,
//! typed columns comes out, with the value and missing-reason facets of each
//! source column materialised as independent channels.

pub mod channel;
pub mod error;
pub mod grid;
pub mod load;
pub mod missing;
pub mod report;
pub mod split;

pub use channel::{ChannelKind, ChannelRequest, ChannelSpec};
pub use error::{IngestError, Result};
pub use grid::{RawGrid, read_grid, read_grid_path};
pub use load::{LoadOptions, load, load_path, read_schema, read_schema_path};
pub use missing::{Classification, MissingRecognizer, Recognition};
pub use report::{CellCounts, LoadReport, SchemaWarning, WarningKind};
pub use split::{ChannelSplitter, SplitOutcome, split};
