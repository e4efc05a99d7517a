use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "window-purpose")]
#[command(about = "Classify editor buffers and windows by purpose")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Base directory (default: ~/.window-purpose)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Purpose tables to use instead of <base-dir>/purposes.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Scenario file describing buffers and the window layout
    #[arg(short, long, global = true)]
    pub scenario: Option<PathBuf>,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the purpose of buffers and the rule that decided it
    Classify {
        /// Buffer names
        #[arg(required = true)]
        buffers: Vec<String>,

        /// Major mode for buffers not in the scenario
        #[arg(short, long, default_value = "fundamental-mode")]
        mode: String,
    },

    /// List every known purpose
    Purposes {
        /// Sort by name instead of table order
        #[arg(long)]
        sorted: bool,
    },

    /// List the scenario's windows with their purpose
    Windows {
        /// Only windows with this purpose
        #[arg(short, long)]
        purpose: Option<String>,
    },

    /// Show the top, bottom, left and right windows of the scenario
    Edges,

    /// Toggle purpose dedication of a scenario window and save the scenario
    Dedicate {
        /// Window number
        window: u32,

        /// Toggle buffer dedication instead
        #[arg(long)]
        buffer: bool,
    },

    /// Show a buffer of the given purpose in a scenario window and save the scenario
    Show {
        /// Window number
        window: u32,

        /// Purpose to show
        purpose: String,

        /// Leave the window undedicated
        #[arg(long)]
        no_dedicate: bool,
    },

    /// Encode or decode dummy buffer names
    Dummy {
        #[command(subcommand)]
        action: DummyAction,
    },

    /// Manage purpose tables
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum DummyAction {
    /// Dummy buffer name for a purpose
    Encode {
        purpose: String,
    },

    /// Purpose embedded in a dummy buffer name
    Decode {
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., modes.python-mode)
        key: String,
    },

    /// Set a config value
    Set {
        /// Config key (e.g., modes.python-mode, names.*Messages*, regexps.^\*shell)
        key: String,

        /// Purpose to map the key to
        value: String,
    },

    /// Remove a table entry
    Unset {
        /// Config key (e.g., modes.python-mode)
        key: String,
    },

    /// List all config values
    List,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}
