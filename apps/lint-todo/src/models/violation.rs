//! Boundary shapes for lint results handed to the engine.
//!
//! Lint tools disagree on the name of the rule field (`ruleId` for ESLint,
//! `rule` for template linters) and on how they report spans. Raw results
//! are converted into a `Violation` once, here, so the rest of the engine
//! never has to probe for fields.

use crate::error::{Result, TodoError};
use crate::models::todo::{Position, Range};
use serde::Deserialize;
use serde_json::Value as Json;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where a violation's rule identifier came from.
pub enum RuleRef {
    RuleId(String),
    Rule(String),
    Unnamed,
}

impl RuleRef {
    /// Prefer a `ruleId`-shaped field, then a `rule`-shaped one.
    pub fn resolve(rule_id: Option<String>, rule: Option<String>) -> Self {
        match (rule_id, rule) {
            (Some(id), _) => RuleRef::RuleId(id),
            (None, Some(r)) => RuleRef::Rule(r),
            (None, None) => RuleRef::Unnamed,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            RuleRef::RuleId(s) | RuleRef::Rule(s) => s,
            RuleRef::Unnamed => "",
        }
    }
}

#[derive(Debug, Clone)]
/// A single lint result, normalized at the system boundary.
pub struct Violation {
    pub engine: String,
    pub file_path: String,
    pub rule: RuleRef,
    pub range: Range,
    /// Inline source fragment supplied by the tool, if any.
    pub source: Option<String>,
    pub original: Option<Json>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawViolation {
    #[serde(default)]
    engine: Option<String>,
    file_path: String,
    #[serde(default)]
    rule_id: Option<String>,
    #[serde(default)]
    rule: Option<String>,
    #[serde(default)]
    range: Option<Range>,
    #[serde(default)]
    line: Option<u32>,
    #[serde(default)]
    column: Option<u32>,
    #[serde(default)]
    end_line: Option<u32>,
    #[serde(default)]
    end_column: Option<u32>,
    #[serde(default)]
    source: Option<String>,
}

impl Violation {
    /// Convert one JSON lint result. `default_engine` fills in a missing
    /// `engine` field.
    pub fn from_json(value: Json, default_engine: Option<&str>) -> Result<Self> {
        let raw: RawViolation = serde_json::from_value(value.clone())?;
        let engine = raw
            .engine
            .or_else(|| default_engine.map(str::to_string))
            .ok_or_else(|| {
                TodoError::InvalidViolation(format!("{}: missing engine", raw.file_path))
            })?;
        let range = match (raw.range, raw.line) {
            (Some(r), _) => r,
            (None, Some(line)) => {
                let column = raw.column.unwrap_or(0);
                Range {
                    start: Position { line, column },
                    end: Position {
                        line: raw.end_line.unwrap_or(line),
                        column: raw.end_column.unwrap_or(column),
                    },
                }
            }
            (None, None) => {
                return Err(TodoError::InvalidViolation(format!(
                    "{}: missing range or line",
                    raw.file_path
                )))
            }
        };
        Ok(Violation {
            engine,
            file_path: raw.file_path,
            rule: RuleRef::resolve(raw.rule_id, raw.rule),
            range,
            source: raw.source,
            original: Some(value),
        })
    }
}

/// Parse a JSON array of lint results.
pub fn parse_violations(text: &str, default_engine: Option<&str>) -> Result<Vec<Violation>> {
    let values: Vec<Json> = serde_json::from_str(text)?;
    values
        .into_iter()
        .map(|v| Violation::from_json(v, default_engine))
        .collect()
}
