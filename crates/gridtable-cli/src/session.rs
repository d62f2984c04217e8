//! Command interpreter shared by the REPL and script runner.
//!
//! A session owns one in-memory `Table<String>`. Each input line is one
//! command; arguments are whitespace separated. Columns may be addressed by
//! logical index or by header name. Cell values are compared as strings.

use gridtable_core::{select, Condition, GridConfig, Table};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::repl_output::OutputFormat;

/// Most cells a `set` may grow the table to.
pub const MAX_CELLS: usize = 1 << 20;

/// Errors produced while executing a command line.
#[derive(Error, Debug)]
pub enum CommandError {
    /// The first word is not a known command.
    #[error("Unknown command: {0} (type .help for commands)")]
    Unknown(String),

    /// Wrong number or shape of arguments.
    #[error("Usage: {0}")]
    Usage(&'static str),

    /// A row index did not parse.
    #[error("Invalid row index '{0}'")]
    InvalidRow(String),

    /// A write would grow the table past [`MAX_CELLS`].
    #[error("Cell ({row}, {column}) would grow the table past {} cells", MAX_CELLS)]
    TooLarge {
        /// Requested logical row.
        row: usize,
        /// Requested logical column.
        column: usize,
    },

    /// The table rejected the operation.
    #[error(transparent)]
    Table(#[from] gridtable_core::Error),
}

/// One row of command output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowOutput {
    /// Logical row index.
    pub index: usize,
    /// Cells in column order; `None` is an empty cell.
    pub cells: Vec<Option<String>>,
}

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Output {
    /// Free-form status line.
    Message {
        /// Text to display.
        text: String,
    },
    /// A single cell.
    Cell {
        /// Logical row.
        row: usize,
        /// Logical column.
        column: usize,
        /// Cell value, `None` when empty.
        value: Option<String>,
    },
    /// A set of rows under column headers.
    Rows {
        /// Display header per column.
        headers: Vec<String>,
        /// Rows in ascending logical order.
        rows: Vec<RowOutput>,
    },
    /// Table dimensions and physical capacities.
    Stats {
        /// Logical rows.
        rows: usize,
        /// Logical columns.
        columns: usize,
        /// Cells (`rows * columns`).
        cells: usize,
        /// Physical row slots.
        row_capacity: usize,
        /// Physical column slots.
        column_capacity: usize,
    },
    /// Command reference.
    Help,
    /// Leave the REPL or stop the script.
    Quit,
}

/// Interpreter state: the table plus output settings.
#[derive(Debug)]
pub struct Session {
    table: Table<String>,
    format: OutputFormat,
}

impl Session {
    /// Creates a session over an empty table sized from `config`.
    pub fn new(config: &GridConfig) -> Self {
        Self {
            table: Table::with_config(&config.storage),
            format: OutputFormat::Table,
        }
    }

    /// The session table.
    pub fn table(&self) -> &Table<String> {
        &self.table
    }

    /// Current output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Sets the output format.
    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Executes one command line.
    pub fn execute(&mut self, line: &str) -> Result<Output, CommandError> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&cmd, args)) = parts.split_first() else {
            return Ok(message(""));
        };
        let cmd = cmd.to_lowercase();
        debug!(command = %cmd, args = args.len(), "executing");

        match cmd.as_str() {
            ".quit" | ".exit" | ".q" => Ok(Output::Quit),
            ".help" | ".h" => Ok(Output::Help),
            ".format" => self.cmd_format(args),
            "headers" => self.cmd_headers(args),
            "add" => {
                let row = self.table.push_row(owned(args))?;
                Ok(message(format!("row {row}")))
            }
            "insert" => {
                let (&at, values) = args
                    .split_first()
                    .ok_or(CommandError::Usage("insert <row> [values...]"))?;
                let row = self.table.insert_row(parse_row(at)?, owned(values))?;
                Ok(message(format!("row {row}")))
            }
            "addcol" => {
                let (&name, values) = args
                    .split_first()
                    .ok_or(CommandError::Usage("addcol <name> [values...]"))?;
                let column = self.table.push_column(owned(values))?;
                self.table.set_header(column, name)?;
                Ok(message(format!("column {column}")))
            }
            "set" => {
                let [row, column, value] = args else {
                    return Err(CommandError::Usage("set <row> <column> <value>"));
                };
                let row = parse_row(row)?;
                let column = self.parse_column_or_new(column)?;
                self.check_growth(row, column)?;
                let previous = self.table.set(row, column, (*value).to_string());
                Ok(Output::Cell {
                    row,
                    column,
                    value: previous,
                })
            }
            "unset" => {
                let [row, column] = args else {
                    return Err(CommandError::Usage("unset <row> <column>"));
                };
                let (row, column) = (parse_row(row)?, self.parse_column(column)?);
                let previous = self.table.unset(row, column);
                Ok(Output::Cell {
                    row,
                    column,
                    value: previous,
                })
            }
            "get" => {
                let [row, column] = args else {
                    return Err(CommandError::Usage("get <row> <column>"));
                };
                let (row, column) = (parse_row(row)?, self.parse_column(column)?);
                let value = self.table.get(row, column)?.cloned();
                Ok(Output::Cell { row, column, value })
            }
            "row" => {
                let [row] = args else {
                    return Err(CommandError::Usage("row <row>"));
                };
                let row = self.table.row(parse_row(row)?)?;
                Ok(self.rows_output([row.index()]))
            }
            "col" => {
                let [column] = args else {
                    return Err(CommandError::Usage("col <column>"));
                };
                let column = self.table.column(self.parse_column(column)?)?;
                Ok(Output::Rows {
                    headers: vec![display_header(column.index(), column.header())],
                    rows: column
                        .iter()
                        .enumerate()
                        .map(|(index, cell)| RowOutput {
                            index,
                            cells: vec![cell.cloned()],
                        })
                        .collect(),
                })
            }
            "rmrow" => {
                let [row] = args else {
                    return Err(CommandError::Usage("rmrow <row>"));
                };
                let row = parse_row(row)?;
                let cells = self.table.remove_row(row)?;
                Ok(Output::Rows {
                    headers: self.headers(),
                    rows: vec![RowOutput { index: row, cells }],
                })
            }
            "rmcol" => {
                let [column] = args else {
                    return Err(CommandError::Usage("rmcol <column>"));
                };
                let column = self.parse_column(column)?;
                let header = display_header(column, self.table.header(column));
                let cells = self.table.remove_column(column)?;
                Ok(message(format!(
                    "removed column {header} ({} cells)",
                    cells.iter().flatten().count()
                )))
            }
            "show" => {
                let limit = match args {
                    [] => usize::MAX,
                    [limit] => parse_row(limit)?,
                    _ => return Err(CommandError::Usage("show [limit]")),
                };
                Ok(self.rows_output(0..self.table.row_count().min(limit)))
            }
            "stats" => {
                let store = self.table.store();
                Ok(Output::Stats {
                    rows: self.table.row_count(),
                    columns: self.table.column_count(),
                    cells: self.table.cell_count(),
                    row_capacity: store.row_capacity(),
                    column_capacity: store.column_capacity(),
                })
            }
            "clear" => {
                self.table.clear();
                Ok(message("table cleared"))
            }
            "eq" | "gt" | "lt" => {
                let [column, value] = args else {
                    return Err(CommandError::Usage("eq|gt|lt <column> <value>"));
                };
                let column = self.parse_column(column)?;
                let value = (*value).to_string();
                let condition = match cmd.as_str() {
                    "eq" => Condition::eq(column, value),
                    "gt" => Condition::gt(column, value),
                    _ => Condition::lt(column, value),
                };
                self.query(column, &condition)
            }
            "between" => {
                let [column, low, high] = args else {
                    return Err(CommandError::Usage("between <column> <low> <high>"));
                };
                let column = self.parse_column(column)?;
                let condition = Condition::between(column, (*low).to_string(), (*high).to_string());
                self.query(column, &condition)
            }
            _ => Err(CommandError::Unknown(cmd)),
        }
    }

    fn cmd_format(&mut self, args: &[&str]) -> Result<Output, CommandError> {
        match args {
            [] => Ok(message(format!("format is {}", self.format))),
            [name] => {
                self.format = name
                    .parse()
                    .map_err(|_| CommandError::Usage(".format table|json"))?;
                Ok(message(format!("format: {}", self.format)))
            }
            _ => Err(CommandError::Usage(".format table|json")),
        }
    }

    fn cmd_headers(&mut self, args: &[&str]) -> Result<Output, CommandError> {
        if args.is_empty() {
            return Err(CommandError::Usage("headers <name>..."));
        }
        for (column, name) in args.iter().enumerate() {
            self.table.set_header(column, *name)?;
        }
        Ok(message(format!("{} headers set", args.len())))
    }

    /// Answers a single-column condition through a freshly built index.
    fn query(&self, column: usize, condition: &Condition<String>) -> Result<Output, CommandError> {
        let index = self.table.index_column(column)?;
        let rows = select::select_indexed(&index, column, condition)
            .unwrap_or_else(|| select::select(&self.table, condition));
        Ok(self.rows_output(rows))
    }

    fn parse_column(&self, arg: &str) -> Result<usize, CommandError> {
        match arg.parse::<usize>() {
            Ok(column) => Ok(column),
            Err(_) => Ok(self.table.require_column(arg)?),
        }
    }

    /// Like `parse_column`, but an unknown name becomes a new named column.
    fn parse_column_or_new(&mut self, arg: &str) -> Result<usize, CommandError> {
        if arg.parse::<usize>().is_ok() || self.table.column_index(arg).is_some() {
            return self.parse_column(arg);
        }
        let column = self.table.column_count();
        self.table.set_header(column, arg)?;
        Ok(column)
    }

    /// Rejects writes that would grow the table past [`MAX_CELLS`].
    fn check_growth(&self, row: usize, column: usize) -> Result<(), CommandError> {
        let (rows, columns) = (self.table.row_count(), self.table.column_count());
        if row < rows && column < columns {
            return Ok(());
        }
        let grown = rows
            .max(row.saturating_add(1))
            .checked_mul(columns.max(column.saturating_add(1)));
        match grown {
            Some(cells) if cells <= MAX_CELLS => Ok(()),
            _ => Err(CommandError::TooLarge { row, column }),
        }
    }

    fn headers(&self) -> Vec<String> {
        self.table
            .columns()
            .map(|column| display_header(column.index(), column.header()))
            .collect()
    }

    fn rows_output(&self, rows: impl IntoIterator<Item = usize>) -> Output {
        Output::Rows {
            headers: self.headers(),
            rows: rows
                .into_iter()
                .filter_map(|index| self.table.row(index).ok())
                .map(|row| RowOutput {
                    index: row.index(),
                    cells: row.to_vec(),
                })
                .collect(),
        }
    }
}

fn message(text: impl Into<String>) -> Output {
    Output::Message { text: text.into() }
}

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn parse_row(arg: &str) -> Result<usize, CommandError> {
    arg.parse()
        .map_err(|_| CommandError::InvalidRow(arg.to_string()))
}

fn display_header(column: usize, header: Option<&str>) -> String {
    header.map_or_else(|| format!("#{column}"), str::to_string)
}
