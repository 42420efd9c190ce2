use std::fs;
use std::path::Path;

use crate::cli::commands::InitArgs;
use crate::io::config_io::{CONFIG_FILE, config_path};
use crate::io::workspace;
use crate::model::config::validate_column;

const CONFIG_TEMPLATE: &str = r##"[board]
# Document the board opens on. Relative to this directory.
file = "{file}"

# Column tags, in lane order. A task line ending in one of these
# (e.g. `- [ ] buy milk #todo`) is shown in that lane.
columns = [{columns}]

# Where `lanes add` puts new tasks. Relative to the board's folder, or
# workspace-absolute with a leading `/`. Leave empty to pick a document
# from a menu each time.
default_task_path = ""

# Appended to a default task path that has no extension
default_extension = "md"
"##;

const BOARD_TEMPLATE: &str = "# Board\n\n";

fn render_config(file: &str, columns: &[String]) -> String {
    let columns = columns
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(", ");
    CONFIG_TEMPLATE
        .replace("{file}", file)
        .replace("{columns}", &columns)
}

pub fn cmd_init(args: InitArgs, dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = config_path(dir);
    if config.exists() && !args.force {
        return Err(format!("{} already exists (use --force to overwrite)", CONFIG_FILE).into());
    }

    if let Some(parent) = dir.parent()
        && let Ok(outer) = workspace::discover_workspace(parent)
    {
        eprintln!("Note: enclosing workspace found at {}/", outer.display());
    }

    let columns = if args.columns.is_empty() {
        vec!["todo".to_string(), "doing".to_string()]
    } else {
        args.columns
    };
    let mut seen = std::collections::HashSet::new();
    for column in &columns {
        validate_column(column)?;
        if !seen.insert(column.as_str()) {
            return Err(format!("duplicate column \"{}\"", column).into());
        }
    }

    let file = args.board.unwrap_or_else(|| "board.md".to_string());
    let file = file.trim_start_matches('/');
    if file.is_empty() {
        return Err("board document cannot be empty".into());
    }

    fs::write(&config, render_config(file, &columns))?;

    let board = dir.join(file);
    if let Some(parent) = board.parent() {
        fs::create_dir_all(parent)?;
    }
    if !board.exists() {
        fs::write(&board, BOARD_TEMPLATE)?;
    }

    tracing::info!(root = %dir.display(), board = file, "initialized workspace");
    println!("Initialized lanes workspace");
    println!("  board: {}", file);
    println!("  columns: {}", columns.join(", "));
    Ok(())
}
