//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` / `ConfigError` variants into user-facing errors with
//! actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use planboard_config::ConfigError;
use planboard_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Input ────────────────────────────────────────────────────────
    #[error("Unknown {field} '{value}'")]
    #[diagnostic(code(planboard::unknown_value), help("Expected one of: {expected}"))]
    UnknownValue {
        field: String,
        value: String,
        expected: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(planboard::validation))]
    Validation { field: String, reason: String },

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(planboard::not_found),
        help("Run: planboard {list_command} to see available {resource_type}s")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Allocation ───────────────────────────────────────────────────
    #[error("Could not allocate a code under {prefix}: {attempts} attempts conflicted")]
    #[diagnostic(
        code(planboard::allocation_conflict),
        help(
            "Other writers kept taking the computed code.\n\
             Retry, or raise board.max_allocation_attempts in the config file."
        )
    )]
    AllocationConflict { prefix: String, attempts: u32 },

    #[error("No sequence numbers left under {prefix}")]
    #[diagnostic(code(planboard::sequence_exhausted))]
    SequenceExhausted { prefix: String },

    #[error("Storage error: {message}")]
    #[diagnostic(code(planboard::storage))]
    Storage { message: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error(transparent)]
    #[diagnostic(
        code(planboard::config),
        help("Check the config file, or run: planboard config path")
    )]
    Config(Box<figment::Error>),

    #[error("Config file already exists at {path}")]
    #[diagnostic(
        code(planboard::config_exists),
        help("Use --force to overwrite it.")
    )]
    ConfigExists { path: String },

    #[error("Failed to write config: {0}")]
    #[diagnostic(code(planboard::config_write))]
    ConfigWrite(#[from] toml::ser::Error),

    // ── IO / Serialization ────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Serialization failed: {0}")]
    #[diagnostic(code(planboard::serialize))]
    Serialize(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UnknownValue { .. } | Self::Validation { .. } | Self::ConfigExists { .. } => {
                exit_code::USAGE
            }
            Self::NotFound { .. } => exit_code::NOT_FOUND,
            Self::AllocationConflict { .. } => exit_code::CONFLICT,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::UnknownModule { value } => CliError::UnknownValue {
                field: "module".into(),
                value,
                expected: "demand_planning, supply_planning".into(),
            },

            CoreError::UnknownCategory { value } => CliError::UnknownValue {
                field: "category".into(),
                value,
                expected: "master_data, drivers, priority_1, priority_2, priority_3".into(),
            },

            CoreError::UnknownEntity { value } => CliError::UnknownValue {
                field: "entity".into(),
                value,
                expected: "objects, issues".into(),
            },

            CoreError::MalformedCode { value, reason } => CliError::Validation {
                field: "code".into(),
                reason: format!("'{value}': {reason}"),
            },

            CoreError::DuplicateView { id } => CliError::Validation {
                field: "views".into(),
                reason: format!("saved view '{id}' is defined more than once"),
            },

            CoreError::ViewNotFound { id } => CliError::NotFound {
                resource_type: "saved view".into(),
                identifier: id,
                list_command: "views list".into(),
            },

            CoreError::SequenceOverflow { prefix } => CliError::SequenceExhausted { prefix },

            CoreError::AllocationExhausted { prefix, attempts } => {
                CliError::AllocationConflict { prefix, attempts }
            }

            CoreError::Storage { message } => CliError::Storage { message },
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::Serialization(e) => CliError::ConfigWrite(e),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
            ConfigError::Core(e) => e.into(),
        }
    }
}
