use std::fs::File;
use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use tracing::info;

use labelled_cli::pipeline::{LabelMode, LoadRequest, LoadResult, run_load, write_csv};
use labelled_ingest::read_schema_path;

use crate::cli::{InspectArgs, LabelsArg, LoadArgs};
use crate::summary::print_schema;

pub fn run_load_command(args: &LoadArgs) -> Result<LoadResult> {
    let request = LoadRequest {
        schema: args.schema.clone(),
        delimiter: args.delimiter,
        na_tokens: args.na.clone(),
        na_aliases: args.na_alias.clone(),
        channels: args.channel.clone(),
        labels: label_mode(args.labels),
        strict_schema: args.strict_schema,
        trim_cells: !args.no_trim,
        ..LoadRequest::new(&args.file)
    };
    let result = run_load(&request)?;
    match &args.output {
        Some(path) => {
            let file =
                File::create(path).with_context(|| format!("create {}", path.display()))?;
            write_csv(&result.table, BufWriter::new(file), result.delimiter)?;
            info!(path = %path.display(), "wrote output");
        }
        None => write_csv(&result.table, io::stdout().lock(), result.delimiter)?,
    }
    Ok(result)
}

pub fn run_inspect(args: &InspectArgs) -> Result<()> {
    let schema = read_schema_path(&args.schema)
        .with_context(|| format!("read schema {}", args.schema.display()))?;
    print_schema(&schema);
    Ok(())
}

fn label_mode(arg: LabelsArg) -> LabelMode {
    match arg {
        LabelsArg::Raw => LabelMode::Raw,
        LabelsArg::Apply => LabelMode::Apply,
        LabelsArg::Zap => LabelMode::Zap,
        LabelsArg::FactorValues => LabelMode::FactorValues,
        LabelsArg::FactorLabels => LabelMode::FactorLabels,
    }
}
