//! Layered configuration loader and path helpers.
//!
//! Uses Figment to merge built-in defaults, `config.toml`, `config.<env>.toml`
//! and `APP_*` env vars (`__` separates nested keys). Provides helpers to
//! expand `~` and `${VAR}` and to resolve relative paths against the config
//! directory.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::Error;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Settings {
    pub progress: ProgressSettings,
    pub presentation: PresentationSettings,
    pub search: SearchSettings,
    pub log: LogSettings,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressSettings {
    /// Deepest request tree level rendered before the walk is cut off.
    pub max_depth: usize,
}

impl Default for ProgressSettings {
    fn default() -> Self { Self { max_depth: 16 } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PresentationSettings {
    pub show_old: bool,
    pub scripting: bool,
    pub grouping: GroupingSettings,
}

/// A version gets its own block when it has at least `min_entries` entries
/// or its site has at least `min_versions` versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupingSettings {
    pub min_entries: usize,
    pub min_versions: usize,
}

impl Default for GroupingSettings {
    fn default() -> Self { Self { min_entries: 2, min_versions: 2 } }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub default_index: String,
    pub bookmark_prefix: String,
    pub bookmarks: Vec<String>,
    pub snapshot_dir: String,
    pub refresh_interval_ms: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            default_index: "bookmark:freenetindex".to_string(),
            bookmark_prefix: "bookmark:".to_string(),
            bookmarks: vec!["freenetindex".to_string()],
            snapshot_dir: "./snapshots".to_string(),
            refresh_interval_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub filter: String,
}

impl Default for LogSettings {
    fn default() -> Self { Self { filter: "info".to_string() } }
}

pub struct Config {
    figment: Figment,
    base_dir: PathBuf,
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_from(&env::current_dir()?, &env_name)
    }

    pub fn load_from(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let config = Self { figment, base_dir: base_dir.to_path_buf() };
        config.validate_for_env(env_name)?;
        Ok(config)
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> anyhow::Result<Settings> {
        self.figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to read settings: {}", e))
    }

    pub fn base_dir(&self) -> &Path { &self.base_dir }

    /// Snapshot directory with `~`/`$VAR` expanded, relative to the config dir.
    pub fn snapshot_dir(&self) -> anyhow::Result<PathBuf> {
        Ok(resolve_with_base(&self.base_dir, self.settings()?.search.snapshot_dir))
    }

    /// Problems are reported as `Error::InvalidConfig` inside the `anyhow::Error`.
    fn validate_for_env(&self, env: &str) -> anyhow::Result<()> {
        let settings = self.settings()?;
        if settings.progress.max_depth == 0 {
            anyhow::bail!(Error::InvalidConfig("progress.max_depth must be at least 1".into()));
        }
        let grouping = &settings.presentation.grouping;
        if grouping.min_entries == 0 || grouping.min_versions == 0 {
            anyhow::bail!(Error::InvalidConfig("presentation.grouping thresholds must be at least 1".into()));
        }
        if settings.search.refresh_interval_ms == 0 {
            anyhow::bail!(Error::InvalidConfig("search.refresh_interval_ms must be positive".into()));
        }
        match env {
            "prod" | "production" => {
                if settings.search.refresh_interval_ms < 500 {
                    anyhow::bail!(Error::InvalidConfig(format!(
                        "Prod config polls too often: {}ms. Should be >= 500ms",
                        settings.search.refresh_interval_ms
                    )));
                }
            }
            "dev" | "development" | "test" | "testing" => {}
            _ => {}
        }
        Ok(())
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}
