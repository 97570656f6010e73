//! Per-file collection of existing todos used during reconciliation.
//!
//! Records live in an index-tracked arena: a successful match takes the
//! record out of its slot instead of shifting the collection, so scans never
//! observe a collection that changes underneath them and the remaining
//! records keep their insertion order.

use crate::batch::TodoBatch;
use crate::models::todo::TodoRecord;

#[derive(Debug, Default, Clone)]
/// Unprocessed todos believed to belong to one file.
pub struct TodoMatcher {
    slots: Vec<Option<TodoRecord>>,
    live: usize,
}

impl TodoMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `todo` unless an exactly-equal record is already present.
    pub fn add(&mut self, todo: TodoRecord) -> bool {
        if self.records().any(|t| t.is_same_violation(&todo)) {
            return false;
        }
        self.slots.push(Some(todo));
        self.live += 1;
        true
    }

    /// Remove the first record exactly equal to `todo`.
    pub fn remove(&mut self, todo: &TodoRecord) -> Option<TodoRecord> {
        self.take_first(|t| t.is_same_violation(todo))
    }

    /// Take the first record that exactly matches `candidate`.
    pub fn exact_match(&mut self, candidate: &TodoRecord) -> Option<TodoRecord> {
        self.take_first(|t| t.is_same_violation(candidate))
    }

    /// Take the first record matching `candidate` on engine, rule and a
    /// non-empty source, regardless of range.
    pub fn fuzzy_match(&mut self, candidate: &TodoRecord) -> Option<TodoRecord> {
        self.take_first(|t| t.is_fuzzy_match(candidate))
    }

    /// Remaining records for which `predicate` holds, keyed by composite hash.
    ///
    /// Does not drain the matcher.
    pub fn unmatched<F>(&self, predicate: F) -> TodoBatch
    where
        F: Fn(&TodoRecord) -> bool,
    {
        self.records()
            .filter(|t| predicate(t))
            .map(|t| (t.composite_hash(), t.clone()))
            .collect()
    }

    /// Remaining records in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &TodoRecord> {
        self.slots.iter().flatten()
    }

    pub fn into_records(self) -> impl Iterator<Item = TodoRecord> {
        self.slots.into_iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    fn take_first<F>(&mut self, pred: F) -> Option<TodoRecord>
    where
        F: Fn(&TodoRecord) -> bool,
    {
        let slot = self
            .slots
            .iter_mut()
            .find(|slot| slot.as_ref().is_some_and(&pred))?;
        self.live -= 1;
        slot.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::todo::{FileFormat, Position, Range};

    fn todo(line: u32, source: &str) -> TodoRecord {
        TodoRecord {
            engine: "eslint".into(),
            file_path: "app/controllers/settings.js".into(),
            rule_id: "no-prototype-builtins".into(),
            range: Range {
                start: Position { line, column: 11 },
                end: Position { line, column: 25 },
            },
            source: source.into(),
            file_format: FileFormat::V2,
            created_date: 0,
            warn_date: None,
            error_date: None,
            original_lint_result: None,
        }
    }

    #[test]
    fn test_add_deduplicates_exact_records() {
        let mut m = TodoMatcher::new();
        assert!(m.add(todo(25, "a")));
        assert!(!m.add(todo(25, "a")));
        assert!(m.add(todo(26, "a")));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_exact_match_takes_record_once() {
        let mut m = TodoMatcher::new();
        m.add(todo(25, "a"));
        m.add(todo(26, "b"));
        let hit = m.exact_match(&todo(26, "b")).unwrap();
        assert_eq!(hit.range.start.line, 26);
        assert!(m.exact_match(&todo(26, "b")).is_none());
        assert_eq!(m.len(), 1);
        assert_eq!(m.records().next().unwrap().range.start.line, 25);
    }

    #[test]
    fn test_fuzzy_match_tolerates_line_shift() {
        let mut m = TodoMatcher::new();
        m.add(todo(25, "a"));
        assert!(m.exact_match(&todo(27, "a")).is_none());
        let hit = m.fuzzy_match(&todo(27, "a")).unwrap();
        assert_eq!(hit.range.start.line, 25);
        assert!(m.is_empty());
    }

    #[test]
    fn test_fuzzy_match_requires_source() {
        let mut m = TodoMatcher::new();
        m.add(todo(25, ""));
        assert!(m.fuzzy_match(&todo(27, "")).is_none());
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn test_unmatched_respects_predicate_and_does_not_drain() {
        let mut m = TodoMatcher::new();
        m.add(todo(25, "a"));
        m.add(todo(26, "b"));
        assert!(m.unmatched(|_| false).is_empty());
        let all = m.unmatched(|_| true);
        assert_eq!(all.len(), 2);
        assert!(all.contains_key(&todo(25, "a").composite_hash()));
        let only_b = m.unmatched(|t| t.source == "b");
        assert_eq!(only_b.len(), 1);
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn test_remove_uses_record_format() {
        let mut m = TodoMatcher::new();
        let mut v1 = todo(25, "a");
        v1.file_format = FileFormat::V1;
        m.add(v1);
        // V1 ignores end/source, so a drifted end still removes it
        let mut probe = todo(25, "other");
        probe.range.end.column = 99;
        assert!(m.remove(&probe).is_some());
        assert!(m.is_empty());
    }
}
