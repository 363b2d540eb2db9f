use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::diagnostics::MigrateError;

pub const CONFIG_FILE: &str = "chronoport.toml";

/// Resolved settings from `chronoport.toml`; every field has a default.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub migrate: MigrateConfig,
    pub report: ReportConfig,
    /// The file the settings came from, if any.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MigrateConfig {
    /// Structural families to run; `None` runs all of them.
    #[serde(default)]
    pub families: Option<Vec<String>>,
    #[serde(default)]
    pub skip_type_substitution: bool,
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    #[serde(default)]
    pub format: ReportFormat,
    /// Exit non-zero when any mapping event was recorded.
    #[serde(default)]
    pub fail_on_unmapped: bool,
}

// ---- TOML deserialization types ----

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    #[serde(default)]
    migrate: MigrateConfig,
    #[serde(default)]
    report: ReportConfig,
}

// ---- Discovery ----

/// Walk from start_dir up to .git or FS root, looking for chronoport.toml.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut dir = start_dir.to_path_buf();
    loop {
        let candidate = dir.join(CONFIG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        // .git may be a file in worktrees
        if dir.join(".git").exists() {
            return None;
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// Load the config governing `start_dir`; no file means defaults.
pub fn discover(start_dir: &Path) -> Result<Config, MigrateError> {
    match find_config(start_dir) {
        Some(path) => load(&path),
        None => Ok(Config::default()),
    }
}

pub fn load(path: &Path) -> Result<Config, MigrateError> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        MigrateError::config(format!("{CONFIG_FILE}: could not read file: {e}"), path.to_path_buf())
    })?;
    parse_config(&content, path)
}

pub fn parse_config(content: &str, path: &Path) -> Result<Config, MigrateError> {
    let toml: TomlConfig = toml::from_str(content)
        .map_err(|e| MigrateError::config(format!("{CONFIG_FILE}: invalid syntax: {e}"), path.to_path_buf()))?;

    if let Some(families) = &toml.migrate.families {
        if families.is_empty() {
            return Err(MigrateError::config(
                format!("{CONFIG_FILE}: [migrate] families must not be empty; omit it to run every family"),
                path.to_path_buf(),
            ));
        }
    }

    let mut migrate = toml.migrate;
    migrate.source = Some(path.to_path_buf());
    Ok(Config { migrate, report: toml.report, path: Some(path.to_path_buf()) })
}
