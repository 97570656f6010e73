//! Construction of todo records from normalized lint results.
//!
//! The `source` of a todo is the hash of the exact text its range covers.
//! File contents are read through a `SourceCache` owned by the caller, so a
//! file referenced by many violations is read once per cache scope.

use crate::config::TodoConfig;
use crate::decay;
use crate::hash;
use crate::models::todo::{FileFormat, Range, TodoRecord};
use crate::models::violation::Violation;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
/// Read-once cache of file contents keyed by absolute path.
///
/// A file that cannot be read is cached as absent.
pub struct SourceCache {
    files: HashMap<PathBuf, Option<String>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of `path`, reading it on first access.
    pub fn get(&mut self, path: &Path) -> Option<&str> {
        self.files
            .entry(path.to_path_buf())
            .or_insert_with(|| fs::read_to_string(path).ok())
            .as_deref()
    }

    /// Read every uncached path in parallel.
    pub fn preload<I>(&mut self, paths: I)
    where
        I: IntoIterator<Item = PathBuf>,
    {
        let missing: Vec<PathBuf> = paths
            .into_iter()
            .filter(|p| !self.files.contains_key(p))
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let loaded: Vec<(PathBuf, Option<String>)> = missing
            .into_par_iter()
            .map(|p| {
                let text = fs::read_to_string(&p).ok();
                (p, text)
            })
            .collect();
        self.files.extend(loaded);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }
}

/// Make `file_path` relative to `base_dir` with `/` separators.
pub fn normalize_file_path(base_dir: &Path, file_path: &str) -> String {
    let p = Path::new(file_path);
    let rel = if p.is_absolute() {
        pathdiff::diff_paths(p, base_dir).unwrap_or_else(|| p.to_path_buf())
    } else {
        p.to_path_buf()
    };
    let s = rel.to_string_lossy().replace('\\', "/");
    let mut out = s.as_str();
    while let Some(rest) = out.strip_prefix("./") {
        out = rest;
    }
    out.to_string()
}

/// Text covered by `range`, with 1-based columns and an exclusive end column.
///
/// Out-of-bounds positions are clamped; an inverted range yields "".
pub fn source_for_range(text: &str, range: &Range) -> String {
    let first = range.start.line as usize;
    let last = range.end.line as usize;
    if first == 0 || last < first {
        return String::new();
    }
    let mut out = String::new();
    for (idx, line) in text.lines().enumerate().skip(first - 1).take(last - first + 1) {
        let n = idx + 1;
        let chars: Vec<char> = line.chars().collect();
        let from = if n == first {
            (range.start.column as usize).saturating_sub(1)
        } else {
            0
        };
        let to = if n == last {
            (range.end.column as usize).saturating_sub(1)
        } else {
            chars.len()
        };
        let from = from.min(chars.len());
        let to = to.min(chars.len()).max(from);
        if n != first {
            out.push('\n');
        }
        out.extend(&chars[from..to]);
    }
    out
}

fn source_of(base_dir: &Path, file_path: &str, violation: &Violation, cache: &mut SourceCache) -> String {
    let from_file = cache
        .get(&base_dir.join(file_path))
        .map(|text| source_for_range(text, &violation.range))
        .filter(|fragment| !fragment.is_empty());
    match from_file {
        Some(fragment) => hash::source_hash(&fragment),
        None => match violation.source.as_deref() {
            Some(inline) if !inline.is_empty() => hash::source_hash(inline),
            _ => String::new(),
        },
    }
}

/// Build a todo record for one violation first seen at `created_date`.
pub fn build_record(
    base_dir: &Path,
    violation: &Violation,
    config: &TodoConfig,
    cache: &mut SourceCache,
    created_date: i64,
) -> TodoRecord {
    let file_path = normalize_file_path(base_dir, &violation.file_path);
    let rule_id = violation.rule.as_str().to_string();
    let source = source_of(base_dir, &file_path, violation, cache);
    let days = config.for_rule(&rule_id);
    TodoRecord {
        engine: violation.engine.clone(),
        file_path,
        rule_id,
        range: violation.range,
        source,
        file_format: FileFormat::V2,
        created_date,
        warn_date: decay::decay_date(created_date, days.warn),
        error_date: decay::decay_date(created_date, days.error),
        original_lint_result: violation.original.clone(),
    }
}

/// Build records for a batch, preloading every referenced file first.
///
/// `configs` maps engine name to its resolved config; violations of an
/// engine without an entry are skipped.
pub fn build_records(
    base_dir: &Path,
    violations: &[Violation],
    configs: &HashMap<String, TodoConfig>,
    cache: &mut SourceCache,
    created_date: i64,
) -> Vec<TodoRecord> {
    cache.preload(
        violations
            .iter()
            .map(|v| base_dir.join(normalize_file_path(base_dir, &v.file_path))),
    );
    violations
        .iter()
        .filter_map(|v| match configs.get(&v.engine) {
            Some(cfg) => Some(build_record(base_dir, v, cfg, cache, created_date)),
            None => {
                tracing::warn!(engine = %v.engine, file = %v.file_path, "no config for engine; skipping");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DaysToDecay;
    use crate::models::todo::Position;
    use crate::models::violation::RuleRef;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn range(l1: u32, c1: u32, l2: u32, c2: u32) -> Range {
        Range {
            start: Position { line: l1, column: c1 },
            end: Position { line: l2, column: c2 },
        }
    }

    fn config(days: DaysToDecay) -> TodoConfig {
        TodoConfig {
            engine: "eslint".into(),
            days_to_decay: days,
            days_to_decay_by_rule: BTreeMap::new(),
        }
    }

    fn violation(file_path: &str, rule: RuleRef, source: Option<&str>) -> Violation {
        Violation {
            engine: "eslint".into(),
            file_path: file_path.into(),
            rule,
            range: range(2, 5, 2, 12),
            source: source.map(str::to_string),
            original: None,
        }
    }

    #[test]
    fn test_normalize_file_path() {
        let base = Path::new("/repo");
        assert_eq!(normalize_file_path(base, "/repo/app/a.js"), "app/a.js");
        assert_eq!(normalize_file_path(base, "./app/a.js"), "app/a.js");
        assert_eq!(normalize_file_path(base, "app/a.js"), "app/a.js");
    }

    #[test]
    fn test_source_for_range_single_and_multi_line() {
        let text = "let a = 1;\nif (foo.hasOwnProperty(x)) {\n  y();\n}";
        assert_eq!(source_for_range(text, &range(2, 5, 2, 26)), "foo.hasOwnProperty(x)");
        assert_eq!(source_for_range(text, &range(2, 28, 3, 7)), "{\n  y();");
        assert_eq!(source_for_range(text, &range(3, 1, 2, 1)), "");
        assert_eq!(source_for_range(text, &range(9, 1, 9, 4)), "");
    }

    #[test]
    fn test_build_record_hashes_file_fragment() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("app")).unwrap();
        fs::write(dir.path().join("app/a.js"), "x\nfoo(bar.baz);\n").unwrap();
        let mut cache = SourceCache::new();
        let v = violation("app/a.js", RuleRef::RuleId("no-undef".into()), Some("ignored"));
        let cfg = config(DaysToDecay::new(Some(30), Some(60)));
        let todo = build_record(dir.path(), &v, &cfg, &mut cache, 1_000);
        assert_eq!(todo.source, hash::source_hash("bar.baz"));
        assert_eq!(todo.rule_id, "no-undef");
        assert_eq!(todo.file_format, FileFormat::V2);
        assert_eq!(todo.created_date, 1_000);
        assert_eq!(todo.warn_date, Some(1_000 + 30 * decay::MILLIS_PER_DAY));
        assert_eq!(todo.error_date, Some(1_000 + 60 * decay::MILLIS_PER_DAY));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_build_record_falls_back_to_inline_then_empty() {
        let dir = tempdir().unwrap();
        let mut cache = SourceCache::new();
        let cfg = config(DaysToDecay::new(None, Some(5)));
        let v = violation("missing.js", RuleRef::Rule("no-bare-strings".into()), Some("<p>hi</p>"));
        let todo = build_record(dir.path(), &v, &cfg, &mut cache, 0);
        assert_eq!(todo.source, hash::source_hash("<p>hi</p>"));
        assert_eq!(todo.rule_id, "no-bare-strings");
        assert_eq!(todo.warn_date, None);
        assert!(todo.error_date.is_some());

        let v = violation("missing.js", RuleRef::Unnamed, None);
        let todo = build_record(dir.path(), &v, &cfg, &mut cache, 0);
        assert_eq!(todo.source, "");
        assert_eq!(todo.rule_id, "");
    }

    #[test]
    fn test_cache_reads_once_until_cleared() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.js");
        fs::write(&path, "one").unwrap();
        let mut cache = SourceCache::new();
        cache.preload(vec![path.clone(), path.clone()]);
        assert_eq!(cache.len(), 1);
        fs::write(&path, "two").unwrap();
        assert_eq!(cache.get(&path), Some("one"));
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&path), Some("two"));
    }

    #[test]
    fn test_build_records_skips_unconfigured_engines() {
        let dir = tempdir().unwrap();
        let mut cache = SourceCache::new();
        let mut configs = HashMap::new();
        configs.insert("eslint".to_string(), config(DaysToDecay::defaults()));
        let mut other = violation("a.js", RuleRef::Unnamed, None);
        other.engine = "stylelint".into();
        let violations = vec![violation("a.js", RuleRef::Unnamed, None), other];
        let todos = build_records(dir.path(), &violations, &configs, &mut cache, 0);
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].engine, "eslint");
    }
}
