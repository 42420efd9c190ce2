mod init;
pub use init::cmd_init;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::cli::presenter::{ExternalEditor, PromptChooser};
use crate::io::config_io::{self, FileSettings};
use crate::io::recovery;
use crate::io::store::FsStore;
use crate::io::watcher::WorkspaceWatcher;
use crate::io::workspace::{self, Workspace, WorkspaceError};
use crate::model::board::BoardIndex;
use crate::model::config::validate_column;
use crate::ops::actions::TaskActions;
use crate::ops::index::build_index;
use crate::ops::placement::Anchor;
use crate::parse::serialize_with_column;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;

    let start = match cli.workspace_dir {
        Some(ref dir) => std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?,
        None => std::env::current_dir()?,
    };

    match cli.command {
        // Init works before there is a workspace to discover
        Commands::Init(args) => cmd_init(args, &start),

        // Read commands
        Commands::Board(args) => cmd_board(args, &start, json),
        Commands::List(args) => cmd_list(args, &start, json),

        // Write commands
        Commands::Move(args) => cmd_move(args, &start),
        Commands::Done(args) => cmd_done(args, &start),
        Commands::Edit(args) => cmd_edit(args, &start),
        Commands::Archive(args) => cmd_archive(args, &start),
        Commands::Delete(args) => cmd_delete(args, &start),
        Commands::View(args) => cmd_view(args, &start),
        Commands::Add(args) => cmd_add(args, &start, json),

        // Settings and maintenance
        Commands::Config(cmd) => cmd_config(cmd, &start, json),
        Commands::Recovery(cmd) => cmd_recovery(cmd, &start, json),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_workspace_at(start: &Path) -> Result<Workspace, WorkspaceError> {
    let root = workspace::discover_workspace(start)?;
    workspace::load_workspace(&root)
}

/// Load the workspace and scan every document into a fresh index.
fn load_board(start: &Path) -> Result<(Workspace, BoardIndex), Box<dyn std::error::Error>> {
    let ws = load_workspace_at(start)?;
    let index = build_index(&ws.store, ws.columns())?;
    Ok((ws, index))
}

fn actions<'a>(ws: &'a Workspace, index: &'a mut BoardIndex) -> TaskActions<'a, FsStore> {
    TaskActions::new(index, &ws.store, ws.board_doc()).with_recovery_log(&ws.root)
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_board(args: BoardArgs, start: &Path, json: bool) -> CmdResult {
    let (ws, index) = load_board(start)?;
    print_board(&ws, &index, args.width, json)?;
    if !args.watch {
        return Ok(());
    }

    let watcher = WorkspaceWatcher::start(&ws.root)?;
    while let Some(paths) = watcher.wait(Duration::from_millis(100)) {
        tracing::debug!(changed = paths.len(), "workspace changed, rescanning");
        // Columns may have changed along with the config
        let (ws, index) = load_board(start)?;
        if !json && std::io::stdout().is_terminal() {
            print!("\x1b[2J\x1b[H");
        } else if !json {
            println!();
        }
        print_board(&ws, &index, args.width, json)?;
    }
    Ok(())
}

fn print_board(ws: &Workspace, index: &BoardIndex, width: usize, json: bool) -> CmdResult {
    if json {
        let lanes = board_to_json(index, ws.columns());
        println!("{}", serde_json::to_string(&lanes)?);
    } else {
        for line in format_board(index, ws.columns(), width) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_list(args: ListArgs, start: &Path, json: bool) -> CmdResult {
    let (_ws, index) = load_board(start)?;
    let tasks: Vec<_> = index
        .tasks
        .values()
        .filter(|t| args.all || !t.is_archived())
        .filter(|t| match &args.column {
            Some(c) => t.column.as_ref() == Some(c),
            None => true,
        })
        .collect();

    if json {
        let out: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(&index, t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        let width = id_column_width(&tasks);
        for task in &tasks {
            let line = format_task_line(task);
            // Pad the id so checkboxes line up
            let (id, rest) = line.split_at(task.id.len());
            println!("{:<width$}{}", id, rest, width = width);
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_move(args: MoveArgs, start: &Path) -> CmdResult {
    validate_column(&args.column)?;
    let (ws, mut index) = load_board(start)?;
    if !ws.columns().contains(&args.column) {
        tracing::warn!(column = %args.column, "column is not configured; the task will show as uncategorised");
    }

    if args.dry_run {
        if let Some(task) = index.task(&args.id) {
            println!("{}", serialize_with_column(task, &args.column));
        }
        return Ok(());
    }

    let found = index.task(&args.id).is_some();
    actions(&ws, &mut index).change_column(&args.id, &args.column)?;
    if found {
        println!("{} -> {}", args.id, args.column);
    }
    Ok(())
}

fn cmd_done(args: IdArg, start: &Path) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let found = index.task(&args.id).is_some();
    actions(&ws, &mut index).mark_done(&args.id)?;
    if found {
        println!("{} done", args.id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs, start: &Path) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let found = index.task(&args.id).is_some();
    actions(&ws, &mut index).update_content(&args.id, &args.content)?;
    if found {
        println!("{} updated", args.id);
    }
    Ok(())
}

fn cmd_archive(args: ArchiveArgs, start: &Path) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let found: Vec<String> = args
        .ids
        .iter()
        .filter(|id| index.task(id).is_some())
        .cloned()
        .collect();
    actions(&ws, &mut index).archive_tasks(&args.ids)?;
    for id in found {
        println!("{} archived", id);
    }
    Ok(())
}

fn cmd_delete(args: IdArg, start: &Path) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let found = index.task(&args.id).is_some();
    actions(&ws, &mut index).delete_task(&args.id)?;
    if found {
        println!("{} deleted", args.id);
    }
    Ok(())
}

fn cmd_view(args: IdArg, start: &Path) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let mut editor = ExternalEditor::new(&ws.root);
    actions(&ws, &mut index).view_file(&args.id, &mut editor)?;
    Ok(())
}

fn cmd_add(args: AddArgs, start: &Path, json: bool) -> CmdResult {
    let (ws, mut index) = load_board(start)?;
    let settings = FileSettings::new(&ws.root);
    let stdin = std::io::stdin();
    let mut chooser = PromptChooser::new(stdin.lock(), std::io::stderr());

    let placed = actions(&ws, &mut index).add_new(
        &args.column,
        Anchor::default(),
        &settings,
        &mut chooser,
    )?;

    match placed {
        Some(doc) if json => {
            let out = AddedJson {
                document: doc.to_string(),
                column: args.column,
            };
            println!("{}", serde_json::to_string(&out)?);
        }
        Some(doc) => println!("added to {} ({})", doc, args.column),
        None => eprintln!("cancelled"),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

fn check_config_key(key: &str) -> Result<(), String> {
    match key {
        "default-task-path" | "default_task_path" => Ok(()),
        _ => Err(format!("unknown setting '{}' (expected: default-task-path)", key)),
    }
}

fn cmd_config(cmd: ConfigCmd, start: &Path, json: bool) -> CmdResult {
    let root = workspace::discover_workspace(start)?;
    match cmd.action {
        ConfigAction::Get(args) => {
            check_config_key(&args.key)?;
            let (config, _) = config_io::read_config(&root)?;
            let value = config.board.default_task_path();
            if json {
                println!("{}", serde_json::json!({ "default_task_path": value }));
            } else if let Some(value) = value {
                println!("{}", value);
            }
        }
        ConfigAction::Set(args) => {
            check_config_key(&args.key)?;
            let (_, mut doc) = config_io::read_config(&root)?;
            config_io::set_default_task_path(&mut doc, args.value.trim());
            config_io::write_config(&root, &doc)?;
            tracing::info!(value = %args.value.trim(), "default task path updated");
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

fn cmd_recovery(cmd: RecoveryCmd, start: &Path, json: bool) -> CmdResult {
    let root = workspace::discover_workspace(start)?;
    match cmd.action {
        None => {
            let entries = recovery::read_recovery_entries(&root, Some(cmd.limit));
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("recovery log is empty");
            } else {
                for entry in &entries {
                    print!("{}", entry.to_markdown());
                }
            }
        }
        Some(RecoveryAction::Prune(args)) => {
            let before = args
                .before
                .as_deref()
                .map(|s| {
                    DateTime::parse_from_rfc3339(s)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|e| format!("invalid --before timestamp '{}': {}", s, e))
                })
                .transpose()?;
            let removed = recovery::prune_recovery(&root, before, args.all)?;
            println!("pruned {} entries", removed);
        }
        Some(RecoveryAction::Path) => {
            let path: PathBuf = recovery::recovery_log_path(&root);
            println!("{}", path.display());
        }
    }
    Ok(())
}
