//! Clap derive structures for the `automower` CLI.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// automower -- poll and control Husqvarna Automower robots
#[derive(Debug, Parser)]
#[command(
    name = "automower",
    version,
    about = "Monitor and control Husqvarna Automower robotic lawn mowers",
    long_about = "Talks to the Automower Connect cloud API: lists the mowers on an\n\
        account, shows their normalized status, sends start/stop/park\n\
        commands, and polls them on an interval.",
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
    /// Account profile to use
    #[arg(long, short = 'p', env = "AUTOMOWER_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Account e-mail (overrides profile)
    #[arg(long, short = 'u', env = "AUTOMOWER_USERNAME", global = true)]
    pub username: Option<String>,

    /// Account password
    #[arg(
        long,
        env = "AUTOMOWER_PASSWORD",
        global = true,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,

    /// Login service base URL (overrides profile)
    #[arg(long, env = "AUTOMOWER_AUTH_URL", global = true, hide = true)]
    pub auth_url: Option<String>,

    /// Mower service base URL (overrides profile)
    #[arg(long, env = "AUTOMOWER_API_URL", global = true, hide = true)]
    pub api_url: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "AUTOMOWER_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "AUTOMOWER_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
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

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the mowers registered to the account
    #[command(alias = "ls")]
    List,

    /// Poll and show normalized mower status
    #[command(alias = "st")]
    Status {
        /// Mower id, tracker id, or name (all mowers when omitted)
        mower: Option<String>,
    },

    /// Start mowing (no-op if already mowing or charging)
    Start(MowerArg),

    /// Stop the mower if it is active
    Stop(MowerArg),

    /// Send the mower back to its charging station
    #[command(alias = "dock")]
    Park(MowerArg),

    /// Stop an active mower, start an idle one
    Toggle(MowerArg),

    /// Poll on an interval and print every position update
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Debug, Args)]
pub struct MowerArg {
    /// Mower id, tracker id, or name
    pub mower: String,
}

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Poll period in seconds (defaults to the profile's scan_interval)
    #[arg(long, short = 'i', value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Stop after this many poll cycles
    #[arg(long, short = 'n', value_parser = clap::value_parser!(u64).range(1..))]
    pub count: Option<u64>,
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
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a configuration value
    Set {
        /// Config key (dot-separated path, e.g., "profiles.home.username")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name
        name: String,
    },

    /// Store the account password in the system keyring
    SetPassword {
        /// Profile to update (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
