//! End-to-end todo update: build records for a lint run, replay the log,
//! reconcile, and append the resulting operations.
//!
//! Removal is scoped. A run for one engine never removes another engine's
//! todos, and a run over a subset of files only removes todos for those
//! files. Expired todos are removed from the log as well, so they surface as
//! regular lint errors again.

use crate::batch::{self, TodoBatch, TodoBatches};
use crate::builder::{self, SourceCache};
use crate::config::{self, DaysToDecay, TodoConfig};
use crate::decay;
use crate::error::Result;
use crate::models::todo::TodoRecord;
use crate::models::violation::Violation;
use crate::models::UpdateResult;
use crate::storage::{self, ReadOptions};
use chrono::NaiveDate;
use glob::Pattern;
use std::collections::{BTreeSet, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default)]
/// Which recorded todos an update run may remove.
pub struct RemovalPolicy {
    engines: Option<BTreeSet<String>>,
    files: Option<Vec<Pattern>>,
}

impl RemovalPolicy {
    /// Everything is eligible for removal.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict removal to todos produced by `engines`.
    pub fn with_engines<I, S>(mut self, engines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.engines = Some(engines.into_iter().map(Into::into).collect());
        self
    }

    /// Restrict removal to todos whose path matches one of `patterns`
    /// (plain relative paths or glob patterns).
    pub fn with_files<I, S>(mut self, patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let compiled = patterns
            .into_iter()
            .map(|p| Pattern::new(p.as_ref().trim_start_matches("./")))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        self.files = Some(compiled);
        Ok(self)
    }

    pub fn should_remove(&self, todo: &TodoRecord) -> bool {
        let engine_ok = self
            .engines
            .as_ref()
            .map_or(true, |engines| engines.contains(&todo.engine));
        let file_ok = self
            .files
            .as_ref()
            .map_or(true, |pats| pats.iter().any(|p| p.matches(&todo.file_path)));
        engine_ok && file_ok
    }
}

#[derive(Debug, Clone, Default)]
/// Inputs of an update run beyond the violations themselves.
pub struct UpdateOptions {
    /// Limit removals to these files (paths or globs).
    pub files: Option<Vec<String>>,
    /// Explicit decay override, highest precedence.
    pub days_to_decay: Option<DaysToDecay>,
    /// Creation timestamp for new todos; defaults to now.
    pub created_date: Option<i64>,
    /// Day used for expiry; defaults to today (UTC).
    pub today: Option<NaiveDate>,
    /// Engines the run covers even if they reported no violations.
    pub engines: Vec<String>,
}

/// Resolve config for every engine in `engines`.
pub fn resolve_configs<'a, I>(
    base_dir: &Path,
    engines: I,
    explicit: Option<DaysToDecay>,
) -> Result<HashMap<String, TodoConfig>>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut configs = HashMap::new();
    for engine in engines {
        if !configs.contains_key(engine) {
            configs.insert(engine.to_string(), config::resolve(base_dir, engine, explicit)?);
        }
    }
    Ok(configs)
}

fn covered_engines(violations: &[Violation], options: &UpdateOptions) -> BTreeSet<String> {
    violations
        .iter()
        .map(|v| v.engine.clone())
        .chain(options.engines.iter().cloned())
        .collect()
}

/// Compute the batches for a run without touching the log.
pub fn plan(base_dir: &Path, violations: &[Violation], options: &UpdateOptions) -> Result<TodoBatches> {
    let engines = covered_engines(violations, options);
    let configs = resolve_configs(base_dir, engines.iter().map(String::as_str), options.days_to_decay)?;

    let mut cache = SourceCache::new();
    let created = options.created_date.unwrap_or_else(decay::now_millis);
    let candidates = builder::build_records(base_dir, violations, &configs, &mut cache, created);
    cache.clear();

    let mut policy = RemovalPolicy::any().with_engines(engines);
    if let Some(files) = options.files.as_ref() {
        policy = policy.with_files(files.iter().map(|f| builder::normalize_file_path(base_dir, f)))?;
    }

    let mut existing = storage::read_todos(base_dir, &ReadOptions::default())?;
    let today = options.today.unwrap_or_else(decay::today);
    Ok(batch::reconcile_at(
        candidates,
        &mut existing,
        |t| policy.should_remove(t),
        today,
    ))
}

/// Reconcile `violations` with the log and append the changes.
pub fn update(base_dir: &Path, violations: &[Violation], options: &UpdateOptions) -> Result<UpdateResult> {
    let batches = plan(base_dir, violations, options)?;
    let mut remove: TodoBatch = batches.remove.clone();
    remove.extend(batches.expired.clone());
    let written = storage::apply_changes(base_dir, &batches.add, &remove, false)?;
    tracing::info!(written, "updated todo log");
    Ok(UpdateResult {
        added: batches.add.len(),
        removed: batches.remove.len(),
        stable: batches.stable.len(),
        expired: batches.expired.len(),
    })
}
