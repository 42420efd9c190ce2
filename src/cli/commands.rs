use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "lanes", about = concat!("lanes v", env!("CARGO_PKG_VERSION"), " - a kanban board over your markdown checklists"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different workspace directory
    #[arg(short = 'C', long = "workspace-dir", global = true)]
    pub workspace_dir: Option<String>,

    /// More log output on stderr (-v debug, -vv trace). LANES_LOG overrides.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a workspace in the current directory
    Init(InitArgs),
    /// Show the board
    Board(BoardArgs),
    /// List tasks with their ids
    List(ListArgs),
    /// Move a task to another column
    Move(MoveArgs),
    /// Mark a task done
    Done(IdArg),
    /// Replace a task's text
    Edit(EditArgs),
    /// Archive one or more tasks
    Archive(ArchiveArgs),
    /// Delete a task's line from its document
    Delete(IdArg),
    /// Open a task's document in $EDITOR at its line
    View(IdArg),
    /// Add a blank task to a column
    Add(AddArgs),
    /// Read or change workspace settings
    Config(ConfigCmd),
    /// View or prune the recovery log
    Recovery(RecoveryCmd),
}

#[derive(Args)]
pub struct InitArgs {
    /// Board document (default: board.md)
    #[arg(long)]
    pub board: Option<String>,
    /// Column tag, in lane order (repeatable; default: todo, doing)
    #[arg(long = "column")]
    pub columns: Vec<String>,
    /// Overwrite an existing .lanes.toml
    #[arg(long)]
    pub force: bool,
}

#[derive(Args)]
pub struct BoardArgs {
    /// Re-render whenever a document changes
    #[arg(long)]
    pub watch: bool,
    /// Width of each lane in cells
    #[arg(long, default_value = "28")]
    pub width: usize,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only tasks in this column
    #[arg(long)]
    pub column: Option<String>,
    /// Include archived tasks
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct IdArg {
    /// Task id (`<document>:<row>`, see `lanes list`)
    pub id: String,
}

#[derive(Args)]
pub struct MoveArgs {
    /// Task id
    pub id: String,
    /// Target column tag
    pub column: String,
    /// Print the line that would be written instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task id
    pub id: String,
    /// New task text (tags and column are kept)
    pub content: String,
}

#[derive(Args)]
pub struct ArchiveArgs {
    /// Task ids
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct AddArgs {
    /// Column tag for the new task
    pub column: String,
}

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print a setting
    Get(ConfigKeyArg),
    /// Change a setting, keeping the rest of .lanes.toml as written
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigKeyArg {
    /// Setting name (default-task-path)
    pub key: String,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Setting name (default-task-path)
    pub key: String,
    /// New value (empty string to unset)
    pub value: String,
}

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries (older than 30 days by default)
    Prune(RecoveryPruneArgs),
    /// Print the absolute path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove entries older than this timestamp (RFC 3339)
    #[arg(long)]
    pub before: Option<String>,
    /// Remove every entry
    #[arg(long)]
    pub all: bool,
}
