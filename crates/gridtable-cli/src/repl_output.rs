//! REPL output formatting.

use std::fmt;
use std::str::FromStr;

use clap::ValueEnum;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};

use crate::session::{Output, RowOutput};

/// How command results are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Bordered tables
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => f.write_str("table"),
            Self::Json => f.write_str("json"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(Self::Table),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown format '{other}'")),
        }
    }
}

/// Print a command result in the given format
pub fn print_output(output: &Output, format: OutputFormat) {
    match output {
        Output::Quit => {}
        Output::Help => print_help(),
        _ => println!("{}", render(output, format)),
    }
}

/// Render a command result as text
pub fn render(output: &Output, format: OutputFormat) -> String {
    if format == OutputFormat::Json {
        return serde_json::to_string_pretty(output)
            .unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"));
    }

    match output {
        Output::Message { text } => text.clone(),
        Output::Cell { row, column, value } => format!(
            "({row}, {column}) = {}",
            value.as_deref().map_or_else(|| "-".dimmed().to_string(), str::to_string)
        ),
        Output::Rows { rows, .. } if rows.is_empty() => "No rows.".dimmed().to_string(),
        Output::Rows { headers, rows } => render_table(headers, rows),
        Output::Stats {
            rows,
            columns,
            cells,
            row_capacity,
            column_capacity,
        } => format!(
            "{} {rows} x {columns} ({cells} cells)\n{} {row_capacity} row slots, {column_capacity} column slots",
            "Size:".cyan(),
            "Capacity:".cyan(),
        ),
        Output::Help | Output::Quit => String::new(),
    }
}

/// Render rows as a bordered table, logical row index first
fn render_table(headers: &[String], rows: &[RowOutput]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![Cell::new("row").fg(Color::Yellow)];
    header.extend(headers.iter().map(|h| Cell::new(h).fg(Color::Cyan)));
    table.set_header(header);

    for row in rows {
        let mut cells = vec![Cell::new(row.index)];
        cells.extend(
            row.cells
                .iter()
                .map(|cell| Cell::new(cell.as_deref().unwrap_or("-"))),
        );
        table.add_row(cells);
    }

    table.to_string()
}

fn print_help() {
    println!("\n{}", "GridTable REPL Commands".bold().underline());
    println!();
    println!("  {}            Name columns 0..n", "headers <name>...".yellow());
    println!("  {}                  Append a row", "add <values>...".yellow());
    println!("  {}       Insert a row before <row>", "insert <row> <values>...".yellow());
    println!("  {}      Append a named column", "addcol <name> <values>...".yellow());
    println!("  {}     Write a cell (grows the table)", "set <row> <col> <value>".yellow());
    println!("  {}             Clear a cell", "unset <row> <col>".yellow());
    println!("  {}               Read a cell", "get <row> <col>".yellow());
    println!("  {}                 Show one row / column", "row <row> | col <col>".yellow());
    println!("  {}         Remove a row / column", "rmrow <row> | rmcol <col>".yellow());
    println!("  {}                  Show rows", "show [limit]".yellow());
    println!("  {}                       Size and capacity", "stats".yellow());
    println!("  {}                       Remove everything", "clear".yellow());
    println!("  {}     Indexed lookups", "eq|gt|lt <col> <value>".yellow());
    println!("  {}   Inclusive range lookup", "between <col> <low> <high>".yellow());
    println!("  {}          Set output format", ".format table|json".yellow());
    println!("  {}                       Show this help", ".help".yellow());
    println!("  {}                       Exit the REPL", ".quit".yellow());
    println!();
    println!("Columns are given by index or header name; values compare as text.");
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_rows() -> Output {
        Output::Rows {
            headers: vec!["name".to_string(), "#1".to_string()],
            rows: vec![RowOutput {
                index: 4,
                cells: vec![Some("ada".to_string()), None],
            }],
        }
    }

    #[test]
    fn test_output_format_parse_and_display() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert_eq!("table".parse::<OutputFormat>(), Ok(OutputFormat::Table));
        assert!("xml".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::Json.to_string(), "json");
        assert_eq!(OutputFormat::default(), OutputFormat::Table);
    }

    #[test]
    fn test_render_table_contains_cells() {
        colored::control::set_override(false);
        let text = render(&sample_rows(), OutputFormat::Table);

        assert!(text.contains("name"));
        assert!(text.contains("ada"));
        assert!(text.contains('4'));
        assert!(text.contains('-'));
    }

    #[test]
    fn test_render_json() {
        let text = render(&sample_rows(), OutputFormat::Json);
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();

        assert_eq!(value["kind"], "rows");
        assert_eq!(value["rows"][0]["index"], 4);
        assert_eq!(value["rows"][0]["cells"][1], serde_json::Value::Null);
    }

    #[test]
    fn test_render_empty_rows() {
        colored::control::set_override(false);
        let output = Output::Rows {
            headers: vec![],
            rows: vec![],
        };

        assert_eq!(render(&output, OutputFormat::Table), "No rows.");
    }

    #[test]
    fn test_render_cell() {
        colored::control::set_override(false);
        let output = Output::Cell {
            row: 1,
            column: 0,
            value: Some("x".to_string()),
        };

        assert_eq!(render(&output, OutputFormat::Table), "(1, 0) = x");
    }
}
