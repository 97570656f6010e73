//! Reconciliation of a fresh lint run against the recorded todos.
//!
//! Candidates are processed in insertion order in two passes: every
//! candidate first tries an exact match in its file's matcher, and only the
//! candidates left over try a fuzzy match. Matching removes the record from
//! its matcher, so each existing record is classified at most once and the
//! four output batches stay disjoint.

use crate::decay;
use crate::hash::{TodoCompositeHash, TodoDirectoryHash};
use crate::matcher::TodoMatcher;
use crate::models::todo::TodoRecord;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashSet};

/// Todos keyed by composite hash.
pub type TodoBatch = BTreeMap<TodoCompositeHash, TodoRecord>;

/// Replayed state: one matcher per file, keyed by directory hash.
pub type TodoState = BTreeMap<TodoDirectoryHash, TodoMatcher>;

#[derive(Debug, Default, Clone)]
/// Outcome of one reconciliation.
pub struct TodoBatches {
    /// New violations not yet recorded.
    pub add: TodoBatch,
    /// Recorded todos no longer reported.
    pub remove: TodoBatch,
    /// Recorded todos still reported and not expired.
    pub stable: TodoBatch,
    /// Recorded todos still reported whose error date has passed.
    pub expired: TodoBatch,
}

impl TodoBatches {
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty() && self.stable.is_empty() && self.expired.is_empty()
    }
}

fn classify<F>(batches: &mut TodoBatches, todo: TodoRecord, should_remove: &F, today: NaiveDate)
where
    F: Fn(&TodoRecord) -> bool,
{
    let key = todo.composite_hash();
    if todo.is_expired(today) && should_remove(&todo) {
        batches.expired.insert(key, todo);
    } else {
        batches.stable.insert(key, todo);
    }
}

/// Diff `candidates` against `existing` as of the current UTC day.
pub fn reconcile<F>(candidates: Vec<TodoRecord>, existing: &mut TodoState, should_remove: F) -> TodoBatches
where
    F: Fn(&TodoRecord) -> bool,
{
    reconcile_at(candidates, existing, should_remove, decay::today())
}

/// Diff `candidates` against `existing` as of `today`.
///
/// Matched records are taken out of `existing`; whatever remains afterwards
/// and satisfies `should_remove` is reported under `remove`.
pub fn reconcile_at<F>(
    candidates: Vec<TodoRecord>,
    existing: &mut TodoState,
    should_remove: F,
    today: NaiveDate,
) -> TodoBatches
where
    F: Fn(&TodoRecord) -> bool,
{
    let mut batches = TodoBatches::default();

    let mut seen = HashSet::new();
    let working: Vec<(TodoDirectoryHash, TodoRecord)> = candidates
        .into_iter()
        .filter(|c| seen.insert(c.composite_hash()))
        .map(|c| (c.directory_hash(), c))
        .collect();

    let mut remaining = Vec::with_capacity(working.len());
    for (dir, candidate) in working {
        match existing.get_mut(&dir).and_then(|m| m.exact_match(&candidate)) {
            Some(todo) => classify(&mut batches, todo, &should_remove, today),
            None => remaining.push((dir, candidate)),
        }
    }

    for (dir, candidate) in remaining {
        match existing.get_mut(&dir).and_then(|m| m.fuzzy_match(&candidate)) {
            Some(todo) => classify(&mut batches, todo, &should_remove, today),
            None => {
                batches.add.insert(candidate.composite_hash(), candidate);
            }
        }
    }

    for matcher in existing.values() {
        batches.remove.extend(matcher.unmatched(&should_remove));
    }

    tracing::debug!(
        add = batches.add.len(),
        remove = batches.remove.len(),
        stable = batches.stable.len(),
        expired = batches.expired.len(),
        "reconciled todos"
    );
    batches
}
