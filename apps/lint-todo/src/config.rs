//! Decay configuration discovery and resolution.
//!
//! Config lives either under the `lintTodo` key of `package.json` or in a
//! sidecar `.lint-todorc.toml|yaml|yml` next to it. Having both is an error.
//! Both carry the same shape, keyed by engine:
//!
//! ```toml
//! [eslint.daysToDecay]
//! warn = 30
//! error = 60
//!
//! [eslint.daysToDecayByRule.no-console]
//! warn = 5
//! ```
//!
//! Precedence per field: explicit override > `TODO_DAYS_TO_WARN` /
//! `TODO_DAYS_TO_ERROR` > persisted config > defaults (`warn = 30`,
//! `error = 60`). Per-rule entries refine the engine-level result for
//! records of that rule.

use crate::error::{Result, TodoError};
use crate::storage;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub const MANIFEST_FILE: &str = "package.json";
pub const MANIFEST_KEY: &str = "lintTodo";
pub const SIDECAR_FILES: [&str; 3] = [".lint-todorc.toml", ".lint-todorc.yaml", ".lint-todorc.yml"];
pub const ENV_DAYS_TO_WARN: &str = "TODO_DAYS_TO_WARN";
pub const ENV_DAYS_TO_ERROR: &str = "TODO_DAYS_TO_ERROR";
pub const DEFAULT_DAYS_TO_WARN: u32 = 30;
pub const DEFAULT_DAYS_TO_ERROR: u32 = 60;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
/// Day counts after which a todo becomes a warning and then an error.
pub struct DaysToDecay {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warn: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<u32>,
}

impl DaysToDecay {
    pub fn new(warn: Option<u32>, error: Option<u32>) -> Self {
        Self { warn, error }
    }

    pub fn defaults() -> Self {
        Self::new(Some(DEFAULT_DAYS_TO_WARN), Some(DEFAULT_DAYS_TO_ERROR))
    }

    /// Field-wise merge where `self` wins over `lower`.
    pub fn over(self, lower: DaysToDecay) -> Self {
        Self {
            warn: self.warn.or(lower.warn),
            error: self.error.or(lower.error),
        }
    }

    fn validate(&self, scope: &str) -> Result<()> {
        if let (Some(warn), Some(error)) = (self.warn, self.error) {
            if warn >= error {
                return Err(TodoError::ConfigInvalid {
                    scope: scope.to_string(),
                    warn,
                    error,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
/// Persisted settings for one engine.
pub struct EngineConfig {
    #[serde(rename = "daysToDecay", default, skip_serializing_if = "Option::is_none")]
    pub days_to_decay: Option<DaysToDecay>,
    #[serde(rename = "daysToDecayByRule", default, skip_serializing_if = "BTreeMap::is_empty")]
    pub days_to_decay_by_rule: BTreeMap<String, DaysToDecay>,
}

/// Root persisted config, keyed by engine name.
pub type LintTodoConfig = BTreeMap<String, EngineConfig>;

#[derive(Debug, Clone, PartialEq, Eq)]
/// Where the persisted config was found.
pub enum ConfigSource {
    Manifest(PathBuf),
    Sidecar(PathBuf),
    Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Fully-resolved decay settings for one engine.
pub struct TodoConfig {
    pub engine: String,
    pub days_to_decay: DaysToDecay,
    pub days_to_decay_by_rule: BTreeMap<String, DaysToDecay>,
}

impl TodoConfig {
    /// Decay days that apply to records of `rule_id`.
    pub fn for_rule(&self, rule_id: &str) -> DaysToDecay {
        match self.days_to_decay_by_rule.get(rule_id) {
            Some(rule) => rule.over(self.days_to_decay),
            None => self.days_to_decay,
        }
    }
}

/// Walk upward from `start` to find the project base directory.
///
/// Stops at the first directory holding `package.json`, a todo log, or `.git`.
pub fn detect_base_dir(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if cur.join(MANIFEST_FILE).exists() || storage::storage_path(cur).exists() {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

fn read_manifest(base_dir: &Path) -> Result<Option<(PathBuf, Json)>> {
    let path = base_dir.join(MANIFEST_FILE);
    let text = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(TodoError::io(path, e)),
    };
    let json: Json = serde_json::from_str(&text).map_err(|e| TodoError::ConfigParse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    Ok(Some((path, json)))
}

fn find_sidecar(base_dir: &Path) -> Option<PathBuf> {
    SIDECAR_FILES
        .iter()
        .map(|name| base_dir.join(name))
        .find(|p| p.exists())
}

fn load_sidecar(path: &Path) -> Result<LintTodoConfig> {
    let text = fs::read_to_string(path).map_err(|e| TodoError::io(path, e))?;
    let parsed = if path.extension().is_some_and(|ext| ext == "toml") {
        toml::from_str(&text).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str(&text).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| TodoError::ConfigParse {
        path: path.to_path_buf(),
        message,
    })
}

/// Load persisted config from the manifest or the sidecar file.
pub fn load_config(base_dir: &Path) -> Result<(LintTodoConfig, ConfigSource)> {
    let manifest = read_manifest(base_dir)?;
    let embedded = manifest
        .as_ref()
        .and_then(|(path, json)| json.get(MANIFEST_KEY).map(|v| (path.clone(), v.clone())));
    let sidecar = find_sidecar(base_dir);

    match (embedded, sidecar) {
        (Some((manifest, _)), Some(sidecar)) => Err(TodoError::ConfigConflict { manifest, sidecar }),
        (Some((path, value)), None) => {
            let cfg = serde_json::from_value(value).map_err(|e| TodoError::ConfigParse {
                path: path.clone(),
                message: format!("{MANIFEST_KEY}: {e}"),
            })?;
            Ok((cfg, ConfigSource::Manifest(path)))
        }
        (None, Some(path)) => Ok((load_sidecar(&path)?, ConfigSource::Sidecar(path))),
        (None, None) => Ok((LintTodoConfig::new(), ConfigSource::Defaults)),
    }
}

fn parse_days(value: Option<String>) -> Option<u32> {
    value.and_then(|v| v.trim().parse::<u32>().ok())
}

/// Day counts from `TODO_DAYS_TO_WARN` / `TODO_DAYS_TO_ERROR`.
///
/// Unset, empty, or non-integer values count as not set.
pub fn env_days_to_decay() -> DaysToDecay {
    DaysToDecay::new(
        parse_days(std::env::var(ENV_DAYS_TO_WARN).ok()),
        parse_days(std::env::var(ENV_DAYS_TO_ERROR).ok()),
    )
}

/// Resolve the effective config for `engine` using the process environment.
pub fn resolve(base_dir: &Path, engine: &str, explicit: Option<DaysToDecay>) -> Result<TodoConfig> {
    resolve_with_env(base_dir, engine, env_days_to_decay(), explicit)
}

/// Resolve the effective config for `engine` with an explicit env layer.
pub fn resolve_with_env(
    base_dir: &Path,
    engine: &str,
    env: DaysToDecay,
    explicit: Option<DaysToDecay>,
) -> Result<TodoConfig> {
    let (mut persisted, _) = load_config(base_dir)?;
    let engine_cfg = persisted.remove(engine).unwrap_or_default();

    let days_to_decay = explicit
        .unwrap_or_default()
        .over(env)
        .over(engine_cfg.days_to_decay.unwrap_or_default())
        .over(DaysToDecay::defaults());
    days_to_decay.validate(engine)?;

    let resolved = TodoConfig {
        engine: engine.to_string(),
        days_to_decay,
        days_to_decay_by_rule: engine_cfg.days_to_decay_by_rule,
    };
    for rule in resolved.days_to_decay_by_rule.keys() {
        resolved
            .for_rule(rule)
            .validate(&format!("{engine}/{rule}"))?;
    }
    tracing::debug!(engine, days = ?resolved.days_to_decay, "resolved decay config");
    Ok(resolved)
}

fn detect_indent(text: &str) -> String {
    text.lines()
        .skip(1)
        .find_map(|line| {
            let trimmed = line.trim_start();
            let indent = &line[..line.len() - trimmed.len()];
            (!indent.is_empty() && !trimmed.is_empty()).then(|| indent.to_string())
        })
        .unwrap_or_else(|| "  ".to_string())
}

/// Render `value` as the `"lintTodo"` member inserted into `manifest`.
///
/// Multi-line manifests get a pretty member one level deep using the
/// manifest's own indentation; single-line manifests get a compact one.
fn render_member(manifest: &str, value: &Json) -> Result<String> {
    if !manifest.trim().contains('\n') {
        return Ok(format!("\"{MANIFEST_KEY}\":{}", serde_json::to_string(value)?));
    }
    let indent = detect_indent(manifest);
    let eol = if manifest.contains("\r\n") { "\r\n" } else { "\n" };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut ser)?;
    let body = String::from_utf8_lossy(&buf).replace('\n', &format!("{eol}{indent}"));
    Ok(format!("{eol}{indent}\"{MANIFEST_KEY}\": {body}"))
}

/// Write a default config for `engine` into `package.json` if none exists.
///
/// No-op when the manifest already has `lintTodo`, a sidecar exists, or the
/// todo log is already initialized. The member is spliced in before the
/// closing brace; every other byte of the manifest is left as it was.
/// Returns whether the file was written.
pub fn ensure_config(base_dir: &Path, engine: &str) -> Result<bool> {
    if find_sidecar(base_dir).is_some() || storage::storage_path(base_dir).exists() {
        return Ok(false);
    }
    let path = base_dir.join(MANIFEST_FILE);
    if !path.exists() {
        return Err(TodoError::ManifestMissing(base_dir.to_path_buf()));
    }
    let text = fs::read_to_string(&path).map_err(|e| TodoError::io(&path, e))?;
    let manifest: Json = serde_json::from_str(&text).map_err(|e| TodoError::ConfigParse {
        path: path.clone(),
        message: e.to_string(),
    })?;
    let Some(obj) = manifest.as_object() else {
        return Err(TodoError::ConfigParse {
            path,
            message: "manifest is not a JSON object".into(),
        });
    };
    if obj.contains_key(MANIFEST_KEY) {
        return Ok(false);
    }

    let mut cfg = LintTodoConfig::new();
    cfg.insert(
        engine.to_string(),
        EngineConfig {
            days_to_decay: Some(DaysToDecay::defaults()),
            days_to_decay_by_rule: BTreeMap::new(),
        },
    );
    let member = render_member(&text, &serde_json::to_value(&cfg)?)?;

    // the root is an object, so the last non-whitespace byte is its `}`
    let close = text.trim_end().len() - 1;
    let last_member_end = text[..close].trim_end().len();
    let mut out = String::with_capacity(text.len() + member.len() + 1);
    out.push_str(&text[..last_member_end]);
    if !obj.is_empty() {
        out.push(',');
    }
    out.push_str(&member);
    out.push_str(&text[last_member_end..]);

    fs::write(&path, out).map_err(|e| TodoError::io(&path, e))?;
    tracing::info!(engine, path = %path.display(), "wrote default lint-todo config");
    Ok(true)
}
