//! CLI argument definitions for `labelled`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use tracing::level_filters::LevelFilter;

use labelled_cli::logging::LogFormat;
use labelled_cli::pipeline::parse_alias;
use labelled_ingest::ChannelRequest;

#[derive(Parser)]
#[command(
    name = "labelled",
    version,
    about = "Load delimited data into labelled, channel-split columns",
    long_about = "Load delimited data into typed, labelled columns.\n\n\
                  Each source column can be split into a values channel and a\n\
                  missing-reason channel, and labels can be applied, removed or\n\
                  materialised as factors."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Include raw cell contents in trace logs.
    #[arg(long = "log-data", global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Load a delimited file and write the channel-split table as CSV.
    Load(LoadArgs),

    /// Show the fields, domains and labels declared by a schema manifest.
    Inspect(InspectArgs),
}

#[derive(Parser)]
pub struct LoadArgs {
    /// Delimited file with a header row.
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Table schema manifest (JSON).
    #[arg(long = "schema", value_name = "PATH")]
    pub schema: Option<PathBuf>,

    /// Field delimiter.
    #[arg(long = "delimiter", default_value_t = ',')]
    pub delimiter: char,

    /// Missing-value token (repeatable). Defaults to the schema's missingValues, or "".
    #[arg(long = "na", value_name = "TOKEN")]
    pub na: Vec<String>,

    /// Missing-value token reported under another reason (repeatable).
    #[arg(long = "na-alias", value_name = "TOKEN=REASON", value_parser = parse_alias)]
    pub na_alias: Vec<(String, String)>,

    /// Channel to produce, in output order (repeatable): values, missing, or KIND:SUFFIX.
    #[arg(long = "channel", value_name = "KIND[:SUFFIX]")]
    pub channel: Vec<ChannelRequest>,

    /// How labels appear in the output.
    #[arg(long = "labels", value_enum, default_value = "raw")]
    pub labels: LabelsArg,

    /// Output CSV path (default: stdout).
    #[arg(long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Fail on labels matching neither a domain member nor a missing token.
    #[arg(long = "strict-schema")]
    pub strict_schema: bool,

    /// Keep leading and trailing whitespace in cells.
    #[arg(long = "no-trim")]
    pub no_trim: bool,
}

#[derive(Parser)]
pub struct InspectArgs {
    /// Table schema manifest (JSON).
    #[arg(value_name = "SCHEMA")]
    pub schema: PathBuf,
}

/// CLI label mode choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LabelsArg {
    Raw,
    Apply,
    Zap,
    FactorValues,
    FactorLabels,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        }
    }
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => LogFormat::Pretty,
            LogFormatArg::Compact => LogFormat::Compact,
            LogFormatArg::Json => LogFormat::Json,
        }
    }
}
