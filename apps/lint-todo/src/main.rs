//! lint-todo CLI binary entry point.
//! Delegates to library modules and prints results.

use clap::Parser;
use lint_todo::cli::{Cli, Commands, NotesCmd, StrategyArg};
use lint_todo::config::{self, DaysToDecay};
use lint_todo::models::violation::parse_violations;
use lint_todo::models::UpdateResult;
use lint_todo::storage::{self, CompactStrategy, ReadOptions};
use lint_todo::update::{self, UpdateOptions};
use lint_todo::{decay, notes, output, Result, TodoError};
use std::io::Read;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LINT_TODO_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn base_dir(arg: Option<String>) -> PathBuf {
    match arg {
        Some(dir) => PathBuf::from(dir),
        None => {
            let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
            config::detect_base_dir(&cwd)
        }
    }
}

fn explicit_days(warn: Option<u32>, error: Option<u32>) -> Option<DaysToDecay> {
    (warn.is_some() || error.is_some()).then(|| DaysToDecay::new(warn, error))
}

fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| TodoError::Io {
                path: PathBuf::from("<stdin>"),
                source: e,
            })?;
        Ok(buf)
    } else {
        std::fs::read_to_string(input).map_err(|e| TodoError::Io {
            path: PathBuf::from(input),
            source: e,
        })
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.cmd {
        Commands::Version => {
            println!("{}", env!("CARGO_PKG_VERSION"));
        }
        Commands::Update {
            base_dir: dir,
            input,
            engine,
            files,
            warn,
            error,
            dry_run,
            output,
        } => {
            let base = base_dir(dir);
            let violations = parse_violations(&read_input(&input)?, engine.as_deref())?;
            let options = UpdateOptions {
                files: (!files.is_empty()).then_some(files),
                days_to_decay: explicit_days(warn, error),
                engines: engine.into_iter().collect(),
                ..Default::default()
            };
            let result = if dry_run {
                let batches = update::plan(&base, &violations, &options)?;
                UpdateResult {
                    added: batches.add.len(),
                    removed: batches.remove.len(),
                    stable: batches.stable.len(),
                    expired: batches.expired.len(),
                }
            } else {
                update::update(&base, &violations, &options)?
            };
            output::print_update(&result, output.as_deref().unwrap_or("human"));
        }
        Commands::List {
            base_dir: dir,
            engine,
            file,
            output,
        } => {
            let base = base_dir(dir);
            if !storage::storage_path(&base).exists() {
                eprintln!("{} No .lint-todo found in {}", output::note_prefix(), base.display());
            }
            let state = storage::read_todos(&base, &ReadOptions { engine, file_path: file })?;
            output::print_list(&state, output.as_deref().unwrap_or("human"), decay::today());
        }
        Commands::Compact {
            base_dir: dir,
            strategy,
            output,
        } => {
            let strategy = match strategy {
                StrategyArg::AddOnly => CompactStrategy::AddOnly,
                StrategyArg::DropExpired => CompactStrategy::DropExpired,
            };
            let result = storage::compact(&base_dir(dir), strategy)?;
            output::print_compact(&result, output.as_deref().unwrap_or("human"));
        }
        Commands::Init { base_dir: dir, engine } => {
            let base = base_dir(dir);
            if config::ensure_config(&base, &engine)? {
                println!("wrote default lintTodo config for {} to package.json", engine);
            } else {
                eprintln!("{} lint-todo is already configured; nothing written.", output::note_prefix());
            }
        }
        Commands::Config {
            base_dir: dir,
            engine,
            warn,
            error,
            output,
        } => {
            let cfg = config::resolve(&base_dir(dir), &engine, explicit_days(warn, error))?;
            output::print_config(&cfg, output.as_deref().unwrap_or("human"));
        }
        Commands::Notes { cmd } => match cmd {
            NotesCmd::Show { base_dir: dir } => {
                let todos = notes::show_notes(&base_dir(dir));
                println!("{}", serde_json::to_string_pretty(&todos)?);
            }
            NotesCmd::Push { base_dir: dir } => {
                let base = base_dir(dir);
                let state = storage::read_todos(&base, &ReadOptions::default())?;
                let todos: Vec<_> = output::sorted_todos(&state).into_iter().cloned().collect();
                notes::add_notes(&todos, &base);
            }
        },
    }
    Ok(())
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("{} {}", output::error_prefix(), e);
        std::process::exit(if e.is_config() { 2 } else { 1 });
    }
}
