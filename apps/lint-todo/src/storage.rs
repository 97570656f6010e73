//! Append-only operation log holding the recorded todos.
//!
//! The log lives at `<base>/.lint-todo`. Each line is one operation:
//!
//! ```text
//! add|eslint|no-undef|3|5|3|12|<sourceHash>|<created>|<warn>|<error>|app/a.js
//! ```
//!
//! String fields are escaped (`\\`, `\p`, `\n`, `\r`) so no field can
//! contain the separator or a line break.
//!
//! Writers only append. Deleting a todo appends a `remove` line carrying the
//! removed record's own field values. Because every line is a self-contained
//! operation, a log interleaved by a VCS merge is repaired by dropping the
//! conflict marker lines and replaying the rest.
//!
//! Replay folds operations, in file order, into one `TodoMatcher` per file.
//! Lines that do not decode are logged and skipped.

use crate::batch::{TodoBatch, TodoState};
use crate::decay;
use crate::error::{Result, TodoError};
use crate::hash;
use crate::matcher::TodoMatcher;
use crate::models::todo::{FileFormat, Position, Range, TodoRecord};
use crate::models::CompactResult;
use chrono::NaiveDate;
use regex::Regex;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

pub const STORAGE_FILE: &str = ".lint-todo";
const SEPARATOR: char = '|';
const FIELD_COUNT: usize = 12;

#[cfg(windows)]
const EOL: &str = "\r\n";
#[cfg(not(windows))]
const EOL: &str = "\n";

fn conflict_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^(?:<{7}|={7}|>{7}|\|{7})").expect("conflict marker pattern is valid")
    })
}

/// Escape `\`, `|`, `\n` and `\r` so a field never splits a line or a record.
fn escape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    for c in field.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '|' => out.push_str("\\p"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out
}

/// Inverse of `escape_field`. Unknown escapes are kept verbatim, so
/// unescaped legacy fields decode unchanged.
fn unescape_field(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut chars = field.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => out.push('\\'),
            Some('p') => out.push('|'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Add,
    Remove,
}

impl OperationKind {
    fn as_str(self) -> &'static str {
        match self {
            OperationKind::Add => "add",
            OperationKind::Remove => "remove",
        }
    }
}

#[derive(Debug, Clone)]
/// One line of the todo log.
pub struct Operation {
    pub kind: OperationKind,
    pub todo: TodoRecord,
}

impl Operation {
    pub fn add(todo: TodoRecord) -> Self {
        Self {
            kind: OperationKind::Add,
            todo,
        }
    }

    pub fn remove(todo: TodoRecord) -> Self {
        Self {
            kind: OperationKind::Remove,
            todo,
        }
    }

    /// Encode as a single log line (without line terminator).
    pub fn encode(&self) -> String {
        let t = &self.todo;
        let date = |d: Option<i64>| d.map(|v| v.to_string()).unwrap_or_default();
        [
            self.kind.as_str().to_string(),
            escape_field(&t.engine),
            escape_field(&t.rule_id),
            t.range.start.line.to_string(),
            t.range.start.column.to_string(),
            t.range.end.line.to_string(),
            t.range.end.column.to_string(),
            escape_field(&t.source),
            t.created_date.to_string(),
            date(t.warn_date),
            date(t.error_date),
            escape_field(&t.file_path),
        ]
        .join("|")
    }

    /// Decode one log line. `line_no` is 1-based and only used in errors.
    ///
    /// The file path is the last field and may itself contain `|`.
    pub fn decode(line: &str, line_no: usize) -> Result<Self> {
        let malformed = |reason: String| TodoError::MalformedOperationLine {
            line: line_no,
            reason,
        };
        let fields: Vec<&str> = line.splitn(FIELD_COUNT, SEPARATOR).collect();
        if fields.len() != FIELD_COUNT {
            return Err(malformed(format!(
                "expected {FIELD_COUNT} fields, found {}",
                fields.len()
            )));
        }
        let kind = match fields[0] {
            "add" => OperationKind::Add,
            "remove" => OperationKind::Remove,
            other => return Err(malformed(format!("unknown operation '{other}'"))),
        };
        let number = |idx: usize, name: &str| -> Result<u32> {
            fields[idx]
                .parse::<u32>()
                .map_err(|_| malformed(format!("{name} '{}' is not a number", fields[idx])))
        };
        let date = |idx: usize, name: &str| -> Result<Option<i64>> {
            if fields[idx].is_empty() {
                return Ok(None);
            }
            fields[idx]
                .parse::<i64>()
                .map(Some)
                .map_err(|_| malformed(format!("{name} '{}' is not a timestamp", fields[idx])))
        };
        let created_date = date(8, "createdDate")?
            .ok_or_else(|| malformed("createdDate is empty".to_string()))?;
        if fields[11].is_empty() {
            return Err(malformed("filePath is empty".to_string()));
        }
        let todo = TodoRecord {
            engine: unescape_field(fields[1]),
            rule_id: unescape_field(fields[2]),
            range: Range {
                start: Position {
                    line: number(3, "startLine")?,
                    column: number(4, "startColumn")?,
                },
                end: Position {
                    line: number(5, "endLine")?,
                    column: number(6, "endColumn")?,
                },
            },
            source: unescape_field(fields[7]),
            created_date,
            warn_date: date(9, "warnDate")?,
            error_date: date(10, "errorDate")?,
            file_path: unescape_field(fields[11]),
            file_format: FileFormat::V2,
            original_lint_result: None,
        };
        Ok(Operation { kind, todo })
    }
}

#[derive(Debug, Clone, Default)]
/// Filters applied after replay.
pub struct ReadOptions {
    pub engine: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Built-in compaction filters.
pub enum CompactStrategy {
    /// Keep every surviving `add` operation.
    AddOnly,
    /// Additionally drop todos whose error date has passed.
    DropExpired,
}

pub fn storage_path(base_dir: &Path) -> PathBuf {
    base_dir.join(STORAGE_FILE)
}

/// Non-blank lines of the log; a missing file reads as empty.
fn read_lines(path: &Path) -> Result<Vec<String>> {
    match fs::read_to_string(path) {
        Ok(s) => Ok(s
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_string)
            .collect()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
        Err(e) => Err(TodoError::io(path, e)),
    }
}

fn write_lines(path: &Path, lines: &[String]) -> Result<()> {
    let mut out = String::new();
    for line in lines {
        out.push_str(line);
        out.push_str(EOL);
    }
    fs::write(path, out).map_err(|e| TodoError::io(path, e))
}

pub fn is_conflict_marker(line: &str) -> bool {
    conflict_pattern().is_match(line)
}

pub fn has_conflicts(lines: &[String]) -> bool {
    lines.iter().any(|l| is_conflict_marker(l))
}

/// Drop every conflict marker line, keeping the rest in order.
pub fn strip_conflicts(lines: Vec<String>) -> Vec<String> {
    lines.into_iter().filter(|l| !is_conflict_marker(l)).collect()
}

fn decode_lines(lines: &[String]) -> Vec<Operation> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| match Operation::decode(line, idx + 1) {
            Ok(op) => Some(op),
            Err(e) => {
                tracing::warn!(error = %e, "skipping todo operation");
                None
            }
        })
        .collect()
}

/// Read all operations, repairing conflict markers in place first.
pub fn read_operations(base_dir: &Path) -> Result<Vec<Operation>> {
    let path = storage_path(base_dir);
    let mut lines = read_lines(&path)?;
    if has_conflicts(&lines) {
        let before = lines.len();
        lines = strip_conflicts(lines);
        write_lines(&path, &lines)?;
        tracing::info!(
            path = %path.display(),
            stripped = before - lines.len(),
            "resolved conflict markers in todo log"
        );
    }
    Ok(decode_lines(&lines))
}

/// Operations whose file path is `file_path`, without replay.
pub fn read_operations_for_file(base_dir: &Path, file_path: &str) -> Result<Vec<Operation>> {
    let suffix = format!("{SEPARATOR}{}", escape_field(file_path));
    let lines: Vec<String> = read_lines(&storage_path(base_dir))?
        .into_iter()
        .filter(|l| !is_conflict_marker(l) && l.ends_with(&suffix))
        .collect();
    Ok(decode_lines(&lines)
        .into_iter()
        .filter(|op| op.todo.file_path == file_path)
        .collect())
}

/// Fold operations into per-file matchers.
pub fn replay(operations: Vec<Operation>) -> TodoState {
    let mut state = TodoState::new();
    for op in operations {
        let dir = op.todo.directory_hash();
        match op.kind {
            OperationKind::Add => {
                state.entry(dir).or_default().add(op.todo);
            }
            OperationKind::Remove => {
                if let Some(matcher) = state.get_mut(&dir) {
                    matcher.remove(&op.todo);
                }
            }
        }
    }
    state.retain(|_, m| !m.is_empty());
    state
}

/// Replay the log and keep only todos matching `options`.
pub fn read_todos(base_dir: &Path, options: &ReadOptions) -> Result<TodoState> {
    let ops = read_operations(base_dir)?;
    let total = ops.len();
    let mut state = replay(ops);
    if let Some(file_path) = options.file_path.as_deref() {
        let dir = hash::directory_hash(file_path);
        state.retain(|k, _| *k == dir);
    }
    if let Some(engine) = options.engine.as_deref() {
        let filtered = std::mem::take(&mut state)
            .into_iter()
            .filter_map(|(dir, matcher)| {
                let mut kept = TodoMatcher::new();
                for todo in matcher.into_records().filter(|t| t.engine == engine) {
                    kept.add(todo);
                }
                (!kept.is_empty()).then_some((dir, kept))
            })
            .collect();
        state = filtered;
    }
    tracing::debug!(operations = total, files = state.len(), "replayed todo log");
    Ok(state)
}

/// Append (or with `overwrite`, replace the log with) `add` then `remove`
/// operations. Returns the number of lines written.
pub fn apply_changes(base_dir: &Path, add: &TodoBatch, remove: &TodoBatch, overwrite: bool) -> Result<usize> {
    let ops: Vec<Operation> = add
        .values()
        .cloned()
        .map(Operation::add)
        .chain(remove.values().cloned().map(Operation::remove))
        .collect();
    write_operations(base_dir, &ops, overwrite)?;
    Ok(ops.len())
}

fn write_operations(base_dir: &Path, ops: &[Operation], overwrite: bool) -> Result<()> {
    let path = storage_path(base_dir);
    let lines: Vec<String> = ops.iter().map(Operation::encode).collect();
    if overwrite {
        return write_lines(&path, &lines);
    }
    if lines.is_empty() {
        return Ok(());
    }
    let needs_newline = match fs::read(&path) {
        Ok(bytes) => bytes.last().is_some_and(|b| *b != b'\n'),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => false,
        Err(e) => return Err(TodoError::io(&path, e)),
    };
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| TodoError::io(&path, e))?;
    let mut out = String::new();
    if needs_newline {
        out.push_str(EOL);
    }
    for line in &lines {
        out.push_str(line);
        out.push_str(EOL);
    }
    file.write_all(out.as_bytes())
        .map_err(|e| TodoError::io(&path, e))
}

/// Compact the log with a built-in strategy as of the current UTC day.
pub fn compact(base_dir: &Path, strategy: CompactStrategy) -> Result<CompactResult> {
    compact_at(base_dir, strategy, decay::today())
}

pub fn compact_at(base_dir: &Path, strategy: CompactStrategy, today: NaiveDate) -> Result<CompactResult> {
    match strategy {
        CompactStrategy::AddOnly => compact_with(base_dir, |op| op.kind == OperationKind::Add),
        CompactStrategy::DropExpired => compact_with(base_dir, |op| {
            op.kind == OperationKind::Add && !op.todo.is_expired(today)
        }),
    }
}

/// Rewrite the log as `add` operations for the replayed state, keeping only
/// operations accepted by `keep`.
pub fn compact_with<F>(base_dir: &Path, keep: F) -> Result<CompactResult>
where
    F: Fn(&Operation) -> bool,
{
    let ops = read_operations(base_dir)?;
    let original = ops.len();
    let compacted: Vec<Operation> = replay(ops)
        .into_values()
        .flat_map(|m| m.into_records())
        .map(Operation::add)
        .filter(|op| keep(op))
        .collect();
    write_operations(base_dir, &compacted, true)?;
    let result = CompactResult {
        original,
        compacted: compacted.len(),
    };
    tracing::info!(original = result.original, compacted = result.compacted, "compacted todo log");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::tempdir;

    fn todo(file: &str, line: u32, source: &str) -> TodoRecord {
        TodoRecord {
            engine: "eslint".into(),
            file_path: file.into(),
            rule_id: "no-undef".into(),
            range: Range {
                start: Position { line, column: 2 },
                end: Position { line, column: 9 },
            },
            source: source.into(),
            file_format: FileFormat::V2,
            created_date: 1_700_000_000_000,
            warn_date: Some(1_700_000_000_000 + 30 * decay::MILLIS_PER_DAY),
            error_date: None,
            original_lint_result: None,
        }
    }

    fn batch(todos: Vec<TodoRecord>) -> TodoBatch {
        todos.into_iter().map(|t| (t.composite_hash(), t)).collect()
    }

    fn count(state: &TodoState) -> usize {
        state.values().map(|m| m.len()).sum()
    }

    #[test]
    fn test_encode_layout() {
        let line = Operation::add(todo("app/a.js", 3, "abc")).encode();
        assert_eq!(
            line,
            format!(
                "add|eslint|no-undef|3|2|3|9|abc|1700000000000|{}||app/a.js",
                1_700_000_000_000 + 30 * decay::MILLIS_PER_DAY
            )
        );
    }

    #[test]
    fn test_decode_round_trip_with_empty_fields() {
        let mut t = todo("dir/with|pipe.js", 1, "");
        t.warn_date = None;
        t.rule_id = String::new();
        let op = Operation::decode(&Operation::remove(t.clone()).encode(), 1).unwrap();
        assert_eq!(op.kind, OperationKind::Remove);
        assert!(op.todo.is_same_violation(&t));
        assert_eq!(op.todo.file_path, "dir/with|pipe.js");
        assert_eq!(op.todo.warn_date, None);
        assert_eq!(op.todo.error_date, None);
        assert_eq!(op.todo.created_date, t.created_date);
    }

    #[test]
    fn test_separator_and_newlines_in_fields_survive_replay() {
        let dir = tempdir().unwrap();
        let mut t = todo("app/a|b.js", 3, "line one\r\nline|two\\");
        t.rule_id = "plugin/rule|variant".into();
        t.engine = "custom|engine".into();
        let line = Operation::add(t.clone()).encode();
        assert_eq!(line.matches('|').count(), FIELD_COUNT - 1);
        assert!(!line.contains('\n') && !line.contains('\r'));

        apply_changes(dir.path(), &batch(vec![t.clone()]), &TodoBatch::new(), false).unwrap();
        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(count(&state), 1);
        let back = state.values().next().unwrap().records().next().unwrap();
        assert!(back.is_same_violation(&t));
        assert_eq!(back.engine, t.engine);
        assert_eq!(back.file_path, t.file_path);
        assert_eq!(back.composite_hash(), t.composite_hash());

        let ops = read_operations_for_file(dir.path(), "app/a|b.js").unwrap();
        assert_eq!(ops.len(), 1);
        apply_changes(dir.path(), &TodoBatch::new(), &batch(vec![t]), false).unwrap();
        assert_eq!(count(&read_todos(dir.path(), &ReadOptions::default()).unwrap()), 0);
    }

    #[test]
    fn test_unescaped_legacy_fields_decode_verbatim() {
        let op = Operation::decode("add|eslint|no-undef|1|1|1|2|c:\\x|0|||dir/with|pipe.js", 1).unwrap();
        assert_eq!(op.todo.source, "c:\\x");
        assert_eq!(op.todo.file_path, "dir/with|pipe.js");
    }

    #[test]
    fn test_decode_rejects_malformed_lines() {
        for bad in [
            "add|eslint|rule",
            "update|e|r|1|1|1|1||0|||a.js",
            "add|e|r|x|1|1|1||0|||a.js",
            "add|e|r|1|1|1|1|||||a.js",
            "add|e|r|1|1|1|1||0|||",
        ] {
            let err = Operation::decode(bad, 7).unwrap_err();
            assert!(matches!(err, TodoError::MalformedOperationLine { line: 7, .. }), "{bad}");
        }
    }

    #[test]
    fn test_missing_log_is_empty_state() {
        let dir = tempdir().unwrap();
        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert!(state.is_empty());
    }

    #[test]
    fn test_append_and_replay_add_remove() {
        let dir = tempdir().unwrap();
        let a = todo("app/a.js", 1, "a");
        let b = todo("app/a.js", 2, "b");
        let c = todo("app/c.js", 1, "c");
        apply_changes(dir.path(), &batch(vec![a.clone(), b, c]), &TodoBatch::new(), false).unwrap();
        apply_changes(dir.path(), &TodoBatch::new(), &batch(vec![a]), false).unwrap();

        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(state.len(), 2);
        assert_eq!(count(&state), 2);
        let raw = fs::read_to_string(storage_path(dir.path())).unwrap();
        assert_eq!(raw.lines().count(), 4);
        assert!(raw.lines().last().unwrap().starts_with("remove|"));
    }

    #[test]
    fn test_replay_ignores_duplicate_adds_and_unknown_removes() {
        let a = todo("app/a.js", 1, "a");
        let stray = todo("app/z.js", 1, "z");
        let state = replay(vec![
            Operation::add(a.clone()),
            Operation::add(a.clone()),
            Operation::remove(stray),
        ]);
        assert_eq!(count(&state), 1);
        let state = replay(vec![Operation::add(a.clone()), Operation::remove(a.clone()), Operation::add(a)]);
        assert_eq!(count(&state), 1);
    }

    #[test]
    fn test_conflict_markers_are_stripped_and_file_rewritten() {
        let dir = tempdir().unwrap();
        let a = Operation::add(todo("app/a.js", 1, "a")).encode();
        let b = Operation::add(todo("app/b.js", 1, "b")).encode();
        let c = Operation::add(todo("app/c.js", 1, "c")).encode();
        let text = format!("{a}\n<<<<<<< HEAD\n{b}\n||||||| base\n=======\n{c}\n>>>>>>> feature\n");
        fs::write(storage_path(dir.path()), text).unwrap();

        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(count(&state), 3);
        let rewritten = fs::read_to_string(storage_path(dir.path())).unwrap();
        assert_eq!(rewritten, format!("{a}{EOL}{b}{EOL}{c}{EOL}"));
        assert!(!has_conflicts(&read_lines(&storage_path(dir.path())).unwrap()));
    }

    #[test]
    fn test_strip_conflicts_is_idempotent() {
        let lines: Vec<String> = ["add|x", "=======", "remove|y", ">>>>>>> b", "<<<<<<<"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let once = strip_conflicts(lines);
        assert_eq!(once, vec!["add|x".to_string(), "remove|y".to_string()]);
        let twice = strip_conflicts(once.clone());
        assert_eq!(once, twice);
        assert!(!is_conflict_marker("======"));
    }

    #[test]
    fn test_malformed_lines_are_skipped_during_replay() {
        let dir = tempdir().unwrap();
        let a = Operation::add(todo("app/a.js", 1, "a")).encode();
        fs::write(storage_path(dir.path()), format!("garbage line\n\n{a}\nadd|half")).unwrap();
        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(count(&state), 1);
    }

    #[test]
    fn test_append_after_file_without_trailing_newline() {
        let dir = tempdir().unwrap();
        let a = Operation::add(todo("app/a.js", 1, "a")).encode();
        fs::write(storage_path(dir.path()), &a).unwrap();
        apply_changes(dir.path(), &batch(vec![todo("app/b.js", 1, "b")]), &TodoBatch::new(), false).unwrap();
        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(count(&state), 2);
    }

    #[test]
    fn test_filtered_reads() {
        let dir = tempdir().unwrap();
        let mut tpl = todo("app/a.hbs", 1, "t");
        tpl.engine = "ember-template-lint".into();
        let a = todo("app/a.js", 1, "a");
        apply_changes(dir.path(), &batch(vec![a.clone(), todo("app/b.js", 1, "b"), tpl]), &TodoBatch::new(), false)
            .unwrap();
        apply_changes(dir.path(), &TodoBatch::new(), &batch(vec![a]), false).unwrap();

        let ops = read_operations_for_file(dir.path(), "app/a.js").unwrap();
        assert_eq!(ops.len(), 2);
        assert!(ops.iter().all(|op| op.todo.file_path == "app/a.js"));

        let by_file = read_todos(
            dir.path(),
            &ReadOptions {
                file_path: Some("app/b.js".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(count(&by_file), 1);

        let by_engine = read_todos(
            dir.path(),
            &ReadOptions {
                engine: Some("ember-template-lint".into()),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(count(&by_engine), 1);
    }

    #[test]
    fn test_compact_add_only_is_idempotent() {
        let dir = tempdir().unwrap();
        let a = todo("app/a.js", 1, "a");
        let b = todo("app/b.js", 2, "b");
        apply_changes(dir.path(), &batch(vec![a.clone(), b]), &TodoBatch::new(), false).unwrap();
        apply_changes(dir.path(), &TodoBatch::new(), &batch(vec![a]), false).unwrap();

        let first = compact(dir.path(), CompactStrategy::AddOnly).unwrap();
        assert_eq!(first, CompactResult { original: 3, compacted: 1 });
        assert_eq!(first.removed(), 2);
        let bytes_once = fs::read(storage_path(dir.path())).unwrap();
        let second = compact(dir.path(), CompactStrategy::AddOnly).unwrap();
        assert_eq!(second, CompactResult { original: 1, compacted: 1 });
        assert_eq!(fs::read(storage_path(dir.path())).unwrap(), bytes_once);
    }

    #[test]
    fn test_compact_drop_expired() {
        let dir = tempdir().unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let mut old = todo("app/a.js", 1, "a");
        old.error_date = Some(decay::day_start_millis(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()));
        let fresh = todo("app/b.js", 1, "b");
        apply_changes(dir.path(), &batch(vec![old, fresh]), &TodoBatch::new(), false).unwrap();
        let res = compact_at(dir.path(), CompactStrategy::DropExpired, today).unwrap();
        assert_eq!(res.compacted, 1);
        let state = read_todos(dir.path(), &ReadOptions::default()).unwrap();
        assert_eq!(state.values().next().unwrap().records().next().unwrap().file_path, "app/b.js");
    }

    proptest! {
        #[test]
        fn prop_encode_decode_round_trip(
            engine in r"[a-z|\n\r\\-]{1,12}",
            rule in r"[a-z/@|\n\\-]{0,20}",
            l1 in 0u32..100_000, c1 in 0u32..500, l2 in 0u32..100_000, c2 in 0u32..500,
            source in r"[0-9a-f|\n\r\\ ]{0,64}",
            created in 0i64..4_000_000_000_000,
            warn in proptest::option::of(0i64..4_000_000_000_000),
            error in proptest::option::of(0i64..4_000_000_000_000),
            file in r"[a-zA-Z0-9_./|\n\\-]{1,40}",
        ) {
            let t = TodoRecord {
                engine,
                file_path: file,
                rule_id: rule,
                range: Range {
                    start: Position { line: l1, column: c1 },
                    end: Position { line: l2, column: c2 },
                },
                source,
                file_format: FileFormat::V2,
                created_date: created,
                warn_date: warn,
                error_date: error,
                original_lint_result: None,
            };
            let back = Operation::decode(&Operation::add(t.clone()).encode(), 1).unwrap().todo;
            prop_assert!(back.is_same_violation(&t));
            prop_assert_eq!(&back.engine, &t.engine);
            prop_assert_eq!(back.file_path, t.file_path);
            prop_assert_eq!(back.created_date, t.created_date);
            prop_assert_eq!(back.warn_date, t.warn_date);
            prop_assert_eq!(back.error_date, t.error_date);
        }
    }
}
