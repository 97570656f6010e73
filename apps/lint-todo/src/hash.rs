//! Content addressing for todos.
//!
//! Every hash is a SHA-256 digest rendered as lowercase hex. Inputs are only
//! the semantic fields of a todo, never time or insertion order, so the same
//! violation hashes identically across runs and machines.
//!
//! - Directory hash: digest of the normalized file path; groups todos by file.
//! - Violation hash: digest of `engine, ruleId, range, source`, each field
//!   length-prefixed so adjacent fields can never bleed into each other.
//! - Composite hash: `<directory hash>/<violation hash>`.

use crate::models::todo::TodoRecord;
use sha2::{Digest, Sha256};
use std::fmt::Write;

pub type TodoDirectoryHash = String;
pub type TodoCompositeHash = String;

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        let _ = write!(&mut out, "{byte:02x}");
    }
    out
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_le_bytes());
    hasher.update(field.as_bytes());
}

/// Hash a normalized, `/`-separated file path.
pub fn directory_hash(location: &str) -> TodoDirectoryHash {
    to_hex(&Sha256::digest(location.as_bytes()))
}

/// Hash a raw source fragment; used to store `source` compactly.
pub fn source_hash(fragment: &str) -> String {
    to_hex(&Sha256::digest(fragment.as_bytes()))
}

/// Hash the identifying fields of a todo in fixed order.
pub fn violation_hash(todo: &TodoRecord) -> String {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, &todo.engine);
    update_field(&mut hasher, &todo.rule_id);
    update_field(&mut hasher, &todo.range.start.line.to_string());
    update_field(&mut hasher, &todo.range.start.column.to_string());
    update_field(&mut hasher, &todo.range.end.line.to_string());
    update_field(&mut hasher, &todo.range.end.column.to_string());
    update_field(&mut hasher, &todo.source);
    to_hex(&hasher.finalize())
}

/// `<directory hash>/<violation hash>`, the key of one tracked violation.
pub fn composite_hash(todo: &TodoRecord) -> TodoCompositeHash {
    format!("{}/{}", directory_hash(&todo.file_path), violation_hash(todo))
}
