//! CLI argument parsing via `clap`.

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(
    name = "lint-todo",
    version,
    about = "Track known lint violations as decaying todos",
    long_about = "lint-todo records pre-existing lint violations in an append-only .lint-todo log so they can be suppressed while new ones surface. Todos decay into warnings and then errors after configurable day counts.\n\nDecay precedence: CLI > TODO_DAYS_TO_WARN/TODO_DAYS_TO_ERROR > package.json#lintTodo or .lint-todorc.* > defaults (30/60).",
    after_help = "Examples:\n  eslint -f json . | lint-todo update --engine eslint\n  lint-todo list --file app/controllers/settings.js\n  lint-todo compact --strategy drop-expired\n  lint-todo init --engine eslint",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
/// Built-in compaction strategies.
pub enum StrategyArg {
    AddOnly,
    DropExpired,
}

#[derive(Subcommand)]
/// Supported subcommands.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current lint-todo version.")]
    Version,
    /// Reconcile a lint run with the todo log
    #[command(
        about = "Update todos from lint results",
        long_about = "Read a JSON array of lint results, diff it against the recorded todos and append add/remove operations. Expired todos are removed so they fail the lint run again.",
        after_help = "Examples:\n  lint-todo update --engine eslint --input results.json\n  lint-todo update --engine eslint --file app/a.js --input -"
    )]
    Update {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
        #[arg(long, default_value = "-", help = "Lint results JSON file, or - for stdin")]
        input: String,
        #[arg(long, help = "Engine for results without an `engine` field; also scopes removal")]
        engine: Option<String>,
        #[arg(long = "file", help = "Only remove todos for these files (paths or globs)")]
        files: Vec<String>,
        #[arg(long, help = "Days until todos become warnings")]
        warn: Option<u32>,
        #[arg(long, help = "Days until todos become errors")]
        error: Option<u32>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Compute changes without writing")]
        dry_run: bool,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// List recorded todos
    #[command(
        about = "List todos",
        long_about = "Replay the todo log and print the current todos with their decay severity."
    )]
    List {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
        #[arg(long, help = "Only todos of this engine")]
        engine: Option<String>,
        #[arg(long, help = "Only todos of this file (relative path)")]
        file: Option<String>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Rewrite the todo log to its minimal form
    #[command(
        about = "Compact the todo log",
        long_about = "Replay the log (repairing merge conflict markers) and rewrite it as add operations only."
    )]
    Compact {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
        #[arg(long, value_enum, default_value = "add-only")]
        strategy: StrategyArg,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Write a default config into package.json
    #[command(
        about = "Initialize config",
        long_about = "Add a default lintTodo section for the engine to package.json unless config or a todo log already exists."
    )]
    Init {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
        #[arg(long, help = "Engine to configure")]
        engine: String,
    },
    /// Print resolved decay config
    #[command(about = "Show resolved config", long_about = "Print the effective decay days for an engine.")]
    Config {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
        #[arg(long, help = "Engine to resolve")]
        engine: String,
        #[arg(long, help = "Days until todos become warnings")]
        warn: Option<u32>,
        #[arg(long, help = "Days until todos become errors")]
        error: Option<u32>,
        #[arg(long, help = "Output mode: human|json (default: human)")]
        output: Option<String>,
    },
    /// Exchange todo snapshots via git notes
    Notes {
        #[command(subcommand)]
        cmd: NotesCmd,
    },
}

#[derive(Subcommand)]
/// Subcommands for `lint-todo notes`
pub enum NotesCmd {
    /// Print the todos attached to HEAD
    #[command(about = "Show notes", long_about = "Print the todo snapshot stored in git notes on HEAD.")]
    Show {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
    },
    /// Attach the current todos to HEAD
    #[command(about = "Push notes", long_about = "Replace the git note on HEAD with the current todos.")]
    Push {
        #[arg(long, help = "Project base directory (default: detected from cwd)")]
        base_dir: Option<String>,
    },
}
