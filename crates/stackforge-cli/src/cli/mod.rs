//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums. No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod global;
pub use global::{GlobalArgs, OutputFormat};

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
#[derive(Debug, Parser)]
#[command(
    name    = "stackforge",
    bin_name = "stackforge",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{2692} Configuration-driven application generator",
    long_about = "Stackforge merges declarative configuration documents, picks a \
                  strategy for every concern and describes the files to generate \
                  as an ordered manifest.",
    after_help = "EXAMPLES:\n\
        \x20 stackforge init --provider aws --framework rails --environment dev\n\
        \x20 stackforge generate app\n\
        \x20 stackforge --output-format json generate app --out manifest.json\n\
        \x20 stackforge resolve app\n\
        \x20 stackforge completions bash > /usr/share/bash-completion/completions/stackforge",
    arg_required_else_help = true,
    subcommand_required    = true,
)]
pub struct Cli {
    /// Flags available on every subcommand.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

// ── Subcommands ───────────────────────────────────────────────────────────────

/// All available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Build the manifest for a configuration.
    #[command(
        visible_alias = "gen",
        about = "Build the generation manifest",
        after_help = "EXAMPLES:\n\
            \x20 stackforge generate            # base document from settings\n\
            \x20 stackforge generate staging    # base document 'staging'\n\
            \x20 stackforge generate app --out manifest.yml"
    )]
    Generate(GenerateArgs),

    /// Print the merged configuration.
    #[command(
        about = "Show the resolved configuration",
        after_help = "EXAMPLES:\n\
            \x20 stackforge resolve app\n\
            \x20 stackforge --output-format yaml resolve app"
    )]
    Resolve(DocumentArgs),

    /// Show the strategy chosen for every concern.
    #[command(
        about = "Show the chosen strategies",
        after_help = "EXAMPLES:\n\
            \x20 stackforge strategies app"
    )]
    Strategies(DocumentArgs),

    /// Write a starter configuration document.
    #[command(
        about = "Create a starter configuration document",
        after_help = "EXAMPLES:\n\
            \x20 stackforge init\n\
            \x20 stackforge init --provider heroku --framework express --environment prod\n\
            \x20 stackforge init --force"
    )]
    Init(InitArgs),

    /// Generate shell completion scripts.
    #[command(
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n\
            \x20 stackforge completions bash > ~/.local/share/bash-completion/completions/stackforge\n\
            \x20 stackforge completions zsh  > ~/.zfunc/_stackforge\n\
            \x20 stackforge completions fish > ~/.config/fish/completions/stackforge.fish"
    )]
    Completions(CompletionsArgs),

    /// Inspect the CLI settings.
    #[command(
        about = "CLI settings",
        subcommand,
        after_help = "EXAMPLES:\n\
            \x20 stackforge config get documents.base\n\
            \x20 stackforge config list\n\
            \x20 stackforge config path"
    )]
    Config(ConfigCommands),
}

// ── generate / resolve / strategies ──────────────────────────────────────────

/// Which base document to load.
#[derive(Debug, Args)]
pub struct DocumentArgs {
    /// Base document id (file name without extension).
    #[arg(
        value_name = "ID",
        help = "Base document id (defaults to documents.base)"
    )]
    pub base: Option<String>,
}

/// Arguments for `stackforge generate`.
#[derive(Debug, Args)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub document: DocumentArgs,

    /// Write the manifest to a file instead of stdout.
    ///
    /// The format follows the extension (`.json`, `.yml`/`.yaml`), falling
    /// back to `--output-format`.
    #[arg(short = 'o', long = "out", value_name = "FILE", help = "Write the manifest to FILE")]
    pub out: Option<PathBuf>,

    /// Overwrite an existing output file.
    #[arg(long = "force", help = "Overwrite an existing output file")]
    pub force: bool,
}

// ── init ──────────────────────────────────────────────────────────────────────

/// Arguments for `stackforge init`.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Document id to create.
    #[arg(value_name = "ID", help = "Document id (defaults to documents.base)")]
    pub id: Option<String>,

    /// Cloud provider.
    #[arg(long = "provider", default_value = "aws", help = "Deployment provider")]
    pub provider: String,

    /// Framework (also selects the generator).
    #[arg(long = "framework", default_value = "rails", help = "Application framework")]
    pub framework: String,

    /// Deployment environment.
    #[arg(long = "environment", default_value = "dev", help = "Deployment environment")]
    pub environment: String,

    /// Overwrite an existing document.
    #[arg(short = 'f', long = "force", help = "Overwrite an existing document")]
    pub force: bool,
}

// ── completions ───────────────────────────────────────────────────────────────

/// Arguments for `stackforge completions`.
#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Target shell.
    #[arg(value_enum, help = "Shell to generate completions for")]
    pub shell: Shell,
}

/// Supported shells for completion generation.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

// ── config subcommands ────────────────────────────────────────────────────────

/// Subcommands for `stackforge config`.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Print the value of a settings key.
    Get {
        /// Dotted key path, e.g. `documents.base`.
        key: String,
    },
    /// Print all settings.
    List,
    /// Print the path to the default settings file.
    Path,
}

// ── tests ─────────────────────────────────────────────────────────────────────
