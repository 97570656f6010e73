//! lint-todo core library.
//!
//! Tracks known lint violations ("todos") across lint runs so pre-existing
//! violations can be suppressed while new ones surface. Todos decay into
//! warnings and then errors after configurable grace periods.
//!
//! High-level modules:
//! - `hash`: Content addressing of todos (directory and composite hashes).
//! - `config`: Decay config discovery, precedence merge and validation.
//! - `models`: Todo records, lint-result boundary shapes, result structs.
//! - `decay`: Day normalization and severity transitions.
//! - `builder`: Todo construction with an explicit source cache.
//! - `storage`: Append-only operation log, conflict repair, compaction.
//! - `matcher`: Per-file exact and fuzzy matching.
//! - `batch`: Reconciliation into add/remove/stable/expired batches.
//! - `update`: Build, reconcile and append in one step.
//! - `notes`: Git notes snapshot transport.
//! - `cli`, `output`: Binary argument parsing and printers.
pub mod batch;
pub mod builder;
pub mod cli;
pub mod config;
pub mod decay;
pub mod error;
pub mod hash;
pub mod matcher;
pub mod models;
pub mod notes;
pub mod output;
pub mod storage;
pub mod update;

pub use error::{Result, TodoError};
