use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use labelled_cli::pipeline::LoadResult;
use labelled_model::{ColumnType, LabelledColumn, Representation, TableSchema};

/// Print the per-column summary of a load to stderr.
pub fn print_load_summary(result: &LoadResult) {
    eprintln!("Source: {}", result.path.display());
    eprintln!(
        "Rows: {}  Columns: {}  Labels: {}",
        result.table.height(),
        result.table.width(),
        result.labels
    );
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Type"),
        header_cell("Shown as"),
        header_cell("Present"),
        header_cell("Missing"),
        header_cell("Domain"),
        header_cell("Labels"),
    ]);
    apply_table_style(&mut table);
    for index in 3..7 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for (name, column) in result.table.iter() {
        let missing = column.cells().iter().filter(|cell| cell.is_missing()).count();
        table.add_row(vec![
            Cell::new(name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(type_name(column.column_type())),
            Cell::new(representation_name(column)),
            Cell::new(column.len() - missing),
            count_cell(missing, Color::Yellow),
            optional_count_cell(column.declared_domain().map(<[_]>::len)),
            optional_count_cell(Some(column.label_map().len()).filter(|count| *count > 0)),
        ]);
    }
    eprintln!("{table}");

    let failures = result.report.parse_failures();
    if failures > 0 {
        eprintln!("Unconverted cells: {failures}");
    }
    if result.has_warnings() {
        eprintln!("Warnings:");
        for warning in &result.report.warnings {
            eprintln!("- {warning}");
        }
    }
}

/// Print the fields of a schema manifest to stdout.
pub fn print_schema(schema: &TableSchema) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Field"),
        header_cell("Type"),
        header_cell("Domain"),
        header_cell("Ordered"),
        header_cell("Labels"),
        header_cell("Description"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Center);
    for field in &schema.fields {
        let domain = field
            .domain
            .as_ref()
            .map_or_else(|| "-".to_string(), |members| members.join(", "));
        let labels = if field.labels.is_empty() {
            "-".to_string()
        } else {
            field
                .labels
                .iter()
                .map(|(token, label)| format!("{token}={label}"))
                .collect::<Vec<_>>()
                .join(", ")
        };
        table.add_row(vec![
            Cell::new(&field.name)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            Cell::new(field.field_type.as_str()),
            dash_or(domain),
            if field.ordered {
                Cell::new("✓").fg(Color::Green)
            } else {
                dim_cell("-")
            },
            dash_or(labels),
            dash_or(field.description.clone().unwrap_or_else(|| "-".to_string())),
        ]);
    }
    println!("{table}");
    if !schema.missing_values.is_empty() {
        let tokens: Vec<String> = schema
            .missing_values
            .iter()
            .map(|token| format!("{token:?}"))
            .collect();
        println!("Missing values: {}", tokens.join(", "));
    }
}

fn type_name(column_type: ColumnType) -> String {
    match column_type {
        ColumnType::Plain(value_type) => value_type.to_string(),
        ColumnType::Categorical(value_type) => format!("categorical<{value_type}>"),
    }
}

fn representation_name(column: &LabelledColumn) -> String {
    match column.representation() {
        Representation::Raw => "raw".to_string(),
        Representation::Labelled => "labelled".to_string(),
        Representation::Factor(levels) => format!("factor ({levels})"),
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn optional_count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn dash_or(value: String) -> Cell {
    if value == "-" {
        dim_cell(value)
    } else {
        Cell::new(value)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
