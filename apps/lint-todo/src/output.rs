//! Output rendering for update, list, compact and config commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form is built by
//! pure `compose_*` functions so its shape can be tested directly.

use crate::batch::TodoState;
use crate::config::TodoConfig;
use crate::decay;
use crate::models::todo::{Severity, TodoRecord};
use crate::models::{CompactResult, TodoSummary, UpdateResult};
use chrono::NaiveDate;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn use_colors(output: &str) -> bool {
    output != "json" && std::env::var_os("NO_COLOR").is_none()
}

fn print_json(value: &JsonVal) {
    println!("{}", serde_json::to_string_pretty(value).unwrap_or_default());
}

pub fn error_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "error:".red().bold().to_string()
    } else {
        "error:".to_string()
    }
}

pub fn note_prefix() -> String {
    if std::env::var_os("NO_COLOR").is_none() {
        "note:".blue().bold().to_string()
    } else {
        "note:".to_string()
    }
}

fn format_date(millis: Option<i64>) -> String {
    millis
        .and_then(decay::date_of)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Every todo in `state`, ordered by file, line, column and rule.
pub fn sorted_todos(state: &TodoState) -> Vec<&TodoRecord> {
    let mut todos: Vec<&TodoRecord> = state.values().flat_map(|m| m.records()).collect();
    todos.sort_by(|a, b| {
        a.file_path
            .cmp(&b.file_path)
            .then(a.range.start.line.cmp(&b.range.start.line))
            .then(a.range.start.column.cmp(&b.range.start.column))
            .then(a.rule_id.cmp(&b.rule_id))
    });
    todos
}

/// Count todos in `state` by severity on `today`.
pub fn summarize(state: &TodoState, today: NaiveDate) -> TodoSummary {
    let mut summary = TodoSummary::default();
    for todo in state.values().flat_map(|m| m.records()) {
        match todo.severity(today) {
            Severity::Todo => summary.todo += 1,
            Severity::Warn => summary.warn += 1,
            Severity::Error => summary.error += 1,
        }
    }
    summary
}

/// Print the counts of an update run.
pub fn print_update(res: &UpdateResult, output: &str) {
    match output {
        "json" => print_json(&compose_update_json(res)),
        _ => {
            let line = format!(
                "added={} removed={} stable={} expired={}",
                res.added, res.removed, res.stable, res.expired
            );
            if use_colors(output) {
                println!("{} {}", "✔ todos updated:".green().bold(), line);
            } else {
                println!("✔ todos updated: {}", line);
            }
        }
    }
}

/// Print recorded todos with their current severity.
pub fn print_list(state: &TodoState, output: &str, today: NaiveDate) {
    match output {
        "json" => print_json(&compose_list_json(state, today)),
        _ => {
            let color = use_colors(output);
            for todo in sorted_todos(state) {
                let severity = todo.severity(today);
                let tag = match (severity, color) {
                    (Severity::Error, true) => "⟦error⟧".red().bold().to_string(),
                    (Severity::Warn, true) => "⟦warn⟧".yellow().bold().to_string(),
                    (Severity::Todo, true) => "⟦todo⟧".blue().bold().to_string(),
                    (s, false) => format!("⟦{s}⟧"),
                };
                let file = if color {
                    todo.file_path.clone().bold().to_string()
                } else {
                    todo.file_path.clone()
                };
                println!(
                    "{} {}:{}:{} ❲{}/{}❳ warn {} error {}",
                    tag,
                    file,
                    todo.range.start.line,
                    todo.range.start.column,
                    todo.engine,
                    todo.rule_id,
                    format_date(todo.warn_date),
                    format_date(todo.error_date),
                );
            }
            let s = summarize(state, today);
            let summary = format!("— Summary — todo={} warn={} error={}", s.todo, s.warn, s.error);
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print compaction counts.
pub fn print_compact(res: &CompactResult, output: &str) {
    match output {
        "json" => print_json(&compose_compact_json(res)),
        _ => {
            let line = format!(
                "{} operations -> {} ({} removed)",
                res.original,
                res.compacted,
                res.removed()
            );
            if use_colors(output) {
                println!("{} {}", "🧹 compacted:".green().bold(), line);
            } else {
                println!("🧹 compacted: {}", line);
            }
        }
    }
}

/// Print the resolved decay config of an engine.
pub fn print_config(cfg: &TodoConfig, output: &str) {
    match output {
        "json" => print_json(&compose_config_json(cfg)),
        _ => {
            let days = |d: Option<u32>| d.map(|v| v.to_string()).unwrap_or_else(|| "never".into());
            println!(
                "{}: warn after {} days, error after {} days",
                cfg.engine,
                days(cfg.days_to_decay.warn),
                days(cfg.days_to_decay.error)
            );
            for (rule, d) in &cfg.days_to_decay_by_rule {
                let merged = cfg.for_rule(rule);
                println!(
                    "  {}: warn after {} days, error after {} days{}",
                    rule,
                    days(merged.warn),
                    days(merged.error),
                    if d.warn.is_some() && d.error.is_some() { "" } else { " (partial override)" }
                );
            }
        }
    }
}

pub fn compose_update_json(res: &UpdateResult) -> JsonVal {
    serde_json::to_value(res).unwrap_or(JsonVal::Null)
}

pub fn compose_compact_json(res: &CompactResult) -> JsonVal {
    json!({
        "original": res.original,
        "compacted": res.compacted,
        "removed": res.removed(),
    })
}

pub fn compose_config_json(cfg: &TodoConfig) -> JsonVal {
    json!({
        "engine": cfg.engine,
        "daysToDecay": cfg.days_to_decay,
        "daysToDecayByRule": cfg.days_to_decay_by_rule,
    })
}

/// Compose list JSON: one item per todo plus a severity summary.
pub fn compose_list_json(state: &TodoState, today: NaiveDate) -> JsonVal {
    let items: Vec<_> = sorted_todos(state)
        .into_iter()
        .map(|t| {
            json!({
                "engine": t.engine,
                "filePath": t.file_path,
                "ruleId": t.rule_id,
                "line": t.range.start.line,
                "column": t.range.start.column,
                "severity": t.severity(today),
                "createdDate": t.created_date,
                "warnDate": t.warn_date,
                "errorDate": t.error_date,
            })
        })
        .collect();
    json!({"todos": items, "summary": summarize(state, today)})
}
