//! Clap derive structures for the `planboard` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! Depends only on clap so `build.rs` can include it for man pages.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// planboard -- filter state, saved views, and object codes for the planning dashboard
#[derive(Debug, Parser)]
#[command(
    name = "planboard",
    version,
    about = "Inspect dashboard filters, saved views, and object codes",
    long_about = "Work with the planning dashboard's shareable filter state.\n\n\
        Parses and rewrites filter query strings, resolves which saved view a\n\
        query selects, and derives the next sequential object code for a\n\
        module/category pair.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Output format (defaults to the config file's `defaults.output`)
    #[arg(long, short = 'o', env = "PLANBOARD_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Config file path
    #[arg(long, env = "PLANBOARD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Entity domain a saved view applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EntityArg {
    Objects,
    Issues,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and rewrite filter query strings
    #[command(alias = "f")]
    Filters(FiltersArgs),

    /// List saved views and resolve the active one
    #[command(alias = "v")]
    Views(ViewsArgs),

    /// Derive and allocate object codes
    Codes(CodesArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  FILTERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct FiltersArgs {
    #[command(subcommand)]
    pub command: FiltersCommand,
}

#[derive(Debug, Subcommand)]
pub enum FiltersCommand {
    /// Show the filters encoded in a query string or URL
    Show {
        /// Query text, e.g. "status=blocked&sort=aging" or "/objects?status=blocked"
        #[arg(default_value = "")]
        query: String,
    },

    /// Set or remove one key and print the new query
    Set {
        /// Current query text
        query: String,

        /// Filter key
        key: String,

        /// New value (omit or pass "" to remove the key)
        value: Option<String>,
    },

    /// Remove one key and print the new query
    #[command(alias = "rm")]
    Remove {
        /// Current query text
        query: String,

        /// Filter key
        key: String,
    },

    /// Print the empty query
    Clear,

    /// Count active filters (sort and order excluded)
    Count {
        /// Query text
        #[arg(default_value = "")]
        query: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  VIEWS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ViewsArgs {
    #[command(subcommand)]
    pub command: ViewsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ViewsCommand {
    /// List saved views in registry order
    #[command(alias = "ls")]
    List {
        /// Only views for this entity
        #[arg(long, short = 'e')]
        entity: Option<EntityArg>,
    },

    /// Show which view a query selects: all, a view id, or custom
    Match {
        /// Entity domain to match within
        #[arg(long, short = 'e', default_value = "objects")]
        entity: EntityArg,

        /// Query text
        #[arg(default_value = "")]
        query: String,
    },

    /// Print the navigation link for a saved view
    Open {
        /// Saved view id
        id: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CODES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CodesArgs {
    #[command(subcommand)]
    pub command: CodesCommand,
}

#[derive(Debug, Args)]
pub struct CodePairArgs {
    /// Module type (demand_planning, supply_planning)
    #[arg(long, short = 'm')]
    pub module: String,

    /// Category (master_data, drivers, priority_1, priority_2, priority_3)
    #[arg(long, short = 'c')]
    pub category: String,

    /// Existing identifiers
    pub names: Vec<String>,

    /// Read existing identifiers from a file, one per line ("-" for stdin)
    #[arg(long, short = 'f')]
    pub from_file: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
pub enum CodesCommand {
    /// Compute the next code from existing identifiers
    Next(CodePairArgs),

    /// Allocate codes against an in-memory store seeded with existing identifiers
    Allocate {
        #[command(flatten)]
        pair: CodePairArgs,

        /// Number of codes to allocate
        #[arg(long, short = 'n', default_value = "1")]
        count: u32,
    },

    /// Break an object code into module, category, and sequence
    Parse {
        /// Object code, e.g. OBJ-DP-MD-001
        code: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Display current resolved configuration
    Show,

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
