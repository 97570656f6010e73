//! Shared data models: todo records, lint-result boundary shapes, and the
//! result structs printed by the CLI.

pub mod todo;
pub mod violation;

use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Counts produced by one update run.
pub struct UpdateResult {
    pub added: usize,
    pub removed: usize,
    pub stable: usize,
    pub expired: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Todo counts per severity.
pub struct TodoSummary {
    pub todo: usize,
    pub warn: usize,
    pub error: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
/// Operation counts before and after compaction.
pub struct CompactResult {
    pub original: usize,
    pub compacted: usize,
}

impl CompactResult {
    pub fn removed(&self) -> usize {
        self.original.saturating_sub(self.compacted)
    }
}
