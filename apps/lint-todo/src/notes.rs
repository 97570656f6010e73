//! Optional snapshot transport through git notes.
//!
//! The current set of todos can be attached to `HEAD` as a JSON note under
//! `refs/notes/lint-todo`. Git failures (not a repository, no note, git not
//! installed) are logged and treated as "no notes" or a no-op.

use crate::models::todo::TodoRecord;
use std::path::Path;
use std::process::Command;

pub const NOTES_REF: &str = "lint-todo";

fn git(cwd: &Path, args: &[&str]) -> Option<String> {
    let output = match Command::new("git").args(args).current_dir(cwd).output() {
        Ok(o) => o,
        Err(e) => {
            tracing::warn!(error = %e, "failed to run git");
            return None;
        }
    };
    if !output.status.success() {
        tracing::warn!(
            args = ?args,
            stderr = %String::from_utf8_lossy(&output.stderr).trim(),
            "git exited with {}",
            output.status
        );
        return None;
    }
    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Decode a note payload; anything unreadable counts as no notes.
pub fn decode_notes(payload: &str) -> Vec<TodoRecord> {
    match serde_json::from_str(payload.trim()) {
        Ok(todos) => todos,
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable lint-todo note");
            Vec::new()
        }
    }
}

/// Todos stored in the note attached to the current revision.
pub fn show_notes(cwd: &Path) -> Vec<TodoRecord> {
    git(cwd, &["notes", "--ref", NOTES_REF, "show", "HEAD"])
        .map(|payload| decode_notes(&payload))
        .unwrap_or_default()
}

/// Replace the note on the current revision with `todos`.
pub fn add_notes(todos: &[TodoRecord], cwd: &Path) {
    let payload = match serde_json::to_string(todos) {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(error = %e, "failed to encode lint-todo note");
            return;
        }
    };
    if git(cwd, &["notes", "--ref", NOTES_REF, "add", "-f", "-m", &payload, "HEAD"]).is_some() {
        tracing::info!(count = todos.len(), "wrote lint-todo note");
    }
}
