//! REPL (Read-Eval-Print-Loop) and script runner over one in-memory table

use anyhow::{bail, Context, Result};
use colored::Colorize;
use gridtable_core::GridConfig;
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{Completer, Editor, Helper, Highlighter, Hinter, Validator};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::repl_output::{print_output, OutputFormat};
use crate::session::{Output, Session};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Completer, Helper, Highlighter, Hinter, Validator)]
struct ReplHelper;

/// Run the interactive REPL
pub fn run(config: &GridConfig) -> Result<()> {
    println!(
        "\n{}",
        format!("GridTable v{VERSION} - table REPL").bold().cyan()
    );
    println!(
        "Type {} for commands, {} to exit\n",
        ".help".yellow(),
        ".quit".yellow()
    );

    let mut session = Session::new(config);

    let mut rl: Editor<ReplHelper, DefaultHistory> = Editor::new()?;
    rl.set_helper(Some(ReplHelper));

    let history_path = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".gridtable_history");
    let _ = rl.load_history(&history_path);

    loop {
        let prompt = "gridtable> ".bold().blue().to_string();
        match rl.readline(&prompt) {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                let _ = rl.add_history_entry(line);

                match session.execute(line) {
                    Ok(Output::Quit) => break,
                    Ok(output) => {
                        print_output(&output, session.format());
                        println!();
                    }
                    Err(e) => {
                        println!("{} {}\n", "Error:".red().bold(), e);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("Use .quit to exit");
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("{} {:?}", "Error:".red().bold(), err);
                break;
            }
        }
    }

    let _ = rl.save_history(&history_path);
    println!("Goodbye!");
    Ok(())
}

/// Execute every command in `script`, stopping at the first failure.
///
/// Blank lines and lines starting with `#` are skipped; `.quit` ends the
/// script early.
pub fn run_script(path: &Path, config: &GridConfig, format: OutputFormat) -> Result<()> {
    let script = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read script {}", path.display()))?;

    let mut session = Session::new(config);
    session.set_format(format);

    let mut executed = 0usize;
    for (number, line) in script.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match session.execute(line) {
            Ok(Output::Quit) => break,
            Ok(output) => print_output(&output, session.format()),
            Err(e) => bail!("{}:{}: {e}", path.display(), number + 1),
        }
        executed += 1;
    }

    info!(
        script = %path.display(),
        commands = executed,
        rows = session.table().row_count(),
        "script finished"
    );
    Ok(())
}
