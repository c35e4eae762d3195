//! CLI configuration: a thin wrapper around `planboard_config` shared types.
//!
//! Re-exports the shared types and adds CLI-specific resolution that
//! respects `GlobalOpts` flag overrides (--config, --output, --color).

use std::path::PathBuf;

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;
use crate::output;

// ── Re-exports from shared crate ────────────────────────────────────

pub use planboard_config::{Config, config_path, load_config_from, save_config_to};

// ── CLI-specific helpers ────────────────────────────────────────────

/// Config file path: `--config` / `PLANBOARD_CONFIG`, else the platform default.
pub fn resolved_path(global: &GlobalOpts) -> PathBuf {
    global.config.clone().unwrap_or_else(config_path)
}

/// Load the config file named by the global flags.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_config_from(&resolved_path(global))?)
}

/// Everything a command handler needs, resolved once per invocation.
#[derive(Debug)]
pub struct Context {
    pub config: Config,
    pub output: OutputFormat,
    pub color: bool,
    pub quiet: bool,
}

impl Context {
    /// CLI flags take priority over the config file's `[defaults]`.
    pub fn load(global: &GlobalOpts) -> Result<Self, CliError> {
        let config = load(global)?;

        let output = global
            .output
            .or_else(|| OutputFormat::from_str(&config.defaults.output, true).ok())
            .unwrap_or(OutputFormat::Table);
        let color_mode = global
            .color
            .or_else(|| ColorMode::from_str(&config.defaults.color, true).ok())
            .unwrap_or(ColorMode::Auto);

        tracing::debug!(?output, ?color_mode, "resolved output settings");

        Ok(Self {
            config,
            output,
            color: output::should_color(color_mode),
            quiet: global.quiet,
        })
    }
}
