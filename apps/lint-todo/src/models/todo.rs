//! The versioned todo record and its equality rules.
//!
//! Identity of a todo is decided only by its `FileFormat` comparator (exact
//! match) or by the engine/rule/source triple (fuzzy match). Dates and the
//! original lint payload never take part in either.

use crate::decay;
use crate::hash::{self, TodoCompositeHash, TodoDirectoryHash};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fmt;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// 1-based line/column pair.
pub struct Position {
    pub line: u32,
    pub column: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
/// Source span as reported by the analysis tool.
pub struct Range {
    pub start: Position,
    pub end: Position,
}

type Comparator = fn(&TodoRecord, &TodoRecord) -> bool;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
/// Selects the exact-match rule for a record.
pub enum FileFormat {
    /// engine + ruleId + range.start
    V1,
    /// V1 plus range.end and source
    V2,
}

impl FileFormat {
    /// Comparator used for exact matching of records in this format.
    pub fn comparator(self) -> Comparator {
        match self {
            FileFormat::V1 => same_start,
            FileFormat::V2 => same_span_and_source,
        }
    }
}

impl From<FileFormat> for u8 {
    fn from(f: FileFormat) -> u8 {
        match f {
            FileFormat::V1 => 1,
            FileFormat::V2 => 2,
        }
    }
}

impl TryFrom<u8> for FileFormat {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            1 => Ok(FileFormat::V1),
            2 => Ok(FileFormat::V2),
            other => Err(format!("unsupported fileFormat {other}")),
        }
    }
}

fn same_start(a: &TodoRecord, b: &TodoRecord) -> bool {
    a.engine == b.engine
        && a.rule_id == b.rule_id
        && a.range.start.line == b.range.start.line
        && a.range.start.column == b.range.start.column
}

fn same_span_and_source(a: &TodoRecord, b: &TodoRecord) -> bool {
    same_start(a, b)
        && a.range.end.line == b.range.end.line
        && a.range.end.column == b.range.end.column
        && a.source == b.source
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Decay state of a todo; only ever moves forward.
pub enum Severity {
    Todo,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Todo => "todo",
            Severity::Warn => "warn",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// A recorded, suppressed lint violation.
pub struct TodoRecord {
    pub engine: String,
    pub file_path: String,
    #[serde(default)]
    pub rule_id: String,
    pub range: Range,
    #[serde(default)]
    pub source: String,
    pub file_format: FileFormat,
    pub created_date: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_date: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_lint_result: Option<Json>,
}

impl TodoRecord {
    pub fn directory_hash(&self) -> TodoDirectoryHash {
        hash::directory_hash(&self.file_path)
    }

    pub fn composite_hash(&self) -> TodoCompositeHash {
        hash::composite_hash(self)
    }

    /// Exact match under this record's format-specific rule.
    pub fn is_same_violation(&self, other: &TodoRecord) -> bool {
        (self.file_format.comparator())(self, other)
    }

    /// Position-insensitive match: engine, rule and a non-empty source agree.
    pub fn is_fuzzy_match(&self, other: &TodoRecord) -> bool {
        self.engine == other.engine
            && self.rule_id == other.rule_id
            && !self.source.is_empty()
            && !other.source.is_empty()
            && self.source == other.source
    }

    pub fn severity(&self, today: NaiveDate) -> Severity {
        decay::severity(self.warn_date, self.error_date, today)
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.severity(today) == Severity::Error
    }
}
