//! Shared configuration for planboard tools.
//!
//! TOML file + environment layering, config path resolution, and
//! translation into `planboard_core` types (saved-view registry, code
//! allocator, base paths). Core never reads config files; callers load a
//! [`Config`] here and hand the pieces in.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use planboard_core::code::allocate::DEFAULT_MAX_ATTEMPTS;
use planboard_core::{CodeAllocator, CoreError, EntityDomain, SavedView, SavedViewRegistry};

/// Environment variable prefix. Nested keys use `__`, e.g.
/// `PLANBOARD_BOARD__MAX_ALLOCATION_ATTEMPTS=8`.
pub const ENV_PREFIX: &str = "PLANBOARD_";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Output defaults for the CLI.
    #[serde(default)]
    pub defaults: Defaults,

    /// Dashboard routing and allocation settings.
    #[serde(default)]
    pub board: Board,

    /// Extra saved views, appended after the built-ins in file order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub views: Vec<SavedView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Board {
    /// Base path of the object list.
    #[serde(default = "default_objects_path")]
    pub objects_path: String,

    /// Base path of the issue list.
    #[serde(default = "default_issues_path")]
    pub issues_path: String,

    /// Commit attempts before allocation gives up on conflicts.
    #[serde(default = "default_max_attempts")]
    pub max_allocation_attempts: u32,
}

impl Default for Board {
    fn default() -> Self {
        Self {
            objects_path: default_objects_path(),
            issues_path: default_issues_path(),
            max_allocation_attempts: default_max_attempts(),
        }
    }
}

fn default_objects_path() -> String {
    "/objects".into()
}
fn default_issues_path() -> String {
    "/issues".into()
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Config {
    /// Check values that serde alone cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, path) in [
            ("board.objects_path", &self.board.objects_path),
            ("board.issues_path", &self.board.issues_path),
        ] {
            if !path.starts_with('/') {
                return Err(ConfigError::Validation {
                    field: field.into(),
                    reason: format!("expected an absolute path starting with '/', got '{path}'"),
                });
            }
        }

        if self.board.max_allocation_attempts == 0 {
            return Err(ConfigError::Validation {
                field: "board.max_allocation_attempts".into(),
                reason: "must be at least 1".into(),
            });
        }

        if let Some(view) = self.views.iter().find(|v| v.id.is_empty()) {
            return Err(ConfigError::Validation {
                field: "views.id".into(),
                reason: format!("saved view '{}' has an empty id", view.label),
            });
        }

        // An empty filter set is "All", so such a view could never be active.
        if let Some(view) = self.views.iter().find(|v| v.filters.is_empty()) {
            return Err(ConfigError::Validation {
                field: "views.filters".into(),
                reason: format!("saved view '{}' has no non-empty filters", view.id),
            });
        }

        Ok(())
    }

    /// Built-in views followed by the configured ones.
    pub fn registry(&self) -> Result<SavedViewRegistry, ConfigError> {
        Ok(SavedViewRegistry::with_views(self.views.iter().cloned())?)
    }

    pub fn allocator(&self) -> CodeAllocator {
        CodeAllocator::new(self.board.max_allocation_attempts)
    }

    pub fn base_path(&self, entity: EntityDomain) -> &str {
        match entity {
            EntityDomain::Objects => &self.board.objects_path,
            EntityDomain::Issues => &self.board.issues_path,
        }
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "planboard", "planboard").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("planboard");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from the default file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from `path` + environment. A missing file is not an error; the
/// defaults and environment still apply.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    debug!(path = %path.display(), "loading config");

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"));

    let config: Config = figment.extract()?;
    config.validate()?;
    Ok(config)
}

/// Load config, returning a default if loading fails.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    cfg.validate()?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}
