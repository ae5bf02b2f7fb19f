//! Clap derive structures for the `stconf` CLI.
//!
//! Also compiled by `build.rs` for man pages, so this module may only
//! depend on `clap` and `clap_complete`.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stconf -- declarative device and folder management for Syncthing
#[derive(Debug, Parser)]
#[command(
    name = "stconf",
    version,
    about = "Declare Syncthing devices and folders from the command line",
    long_about = "Reconciles one device or folder against the configuration of a \
        running Syncthing instance.\n\n\
        Each apply fetches the live configuration over the REST API, creates, \
        pauses, resumes or removes the entity, and writes the whole document \
        back only when something changed.",
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
    /// Profile to use from the config file
    #[arg(long, short = 'p', env = "STCONF_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Syncthing GUI address (overrides profile)
    #[arg(long, short = 'H', env = "STCONF_HOST", global = true)]
    pub host: Option<String>,

    /// Syncthing REST API key
    #[arg(long, env = "STCONF_API_KEY", global = true, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format [default: table, or `defaults.output` from the config]
    #[arg(long, short = 'o', env = "STCONF_OUTPUT", global = true)]
    pub output: Option<OutputFormat>,

    /// When to use color output [default: auto, or `defaults.color`]
    #[arg(long, global = true)]
    pub color: Option<ColorMode>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept the GUI's self-signed TLS certificate
    #[arg(long, short = 'k', env = "STCONF_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds [default: 30]
    #[arg(long, env = "STCONF_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
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

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

/// Target state of an applied entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum StateArg {
    /// Exists and is running
    #[default]
    Present,
    /// Does not exist
    Absent,
    /// Exists and is paused
    #[value(alias = "pause")]
    Paused,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage remote devices
    #[command(alias = "dev", alias = "d")]
    Device(DeviceArgs),

    /// Manage shared folders
    #[command(alias = "f")]
    Folder(FolderArgs),

    /// Manage stconf configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Device ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct DeviceArgs {
    #[command(subcommand)]
    pub command: DeviceCommand,
}

#[derive(Debug, Subcommand)]
pub enum DeviceCommand {
    /// Bring one device to the requested state
    Apply(DeviceApplyArgs),

    /// List configured devices
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct DeviceApplyArgs {
    /// Device ID
    #[arg(long)]
    pub id: String,

    /// Device name (required unless --state absent)
    #[arg(long)]
    pub name: Option<String>,

    /// Target state
    #[arg(long, value_enum, default_value = "present")]
    pub state: StateArg,

    /// Report the change without writing the configuration
    #[arg(long, alias = "check")]
    pub dry_run: bool,
}

// ── Folder ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct FolderArgs {
    #[command(subcommand)]
    pub command: FolderCommand,
}

#[derive(Debug, Subcommand)]
pub enum FolderCommand {
    /// Bring one folder to the requested state
    Apply(FolderApplyArgs),

    /// List configured folders
    #[command(alias = "ls")]
    List,
}

#[derive(Debug, Args)]
pub struct FolderApplyArgs {
    /// Folder ID
    #[arg(long)]
    pub id: String,

    /// Folder label (defaults to the ID)
    #[arg(long)]
    pub label: Option<String>,

    /// Folder path on the Syncthing host (required unless --state absent)
    #[arg(long)]
    pub path: Option<String>,

    /// Device ID to share the new folder with (repeatable)
    #[arg(long = "device", value_name = "DEVICE_ID")]
    pub devices: Vec<String>,

    /// Target state
    #[arg(long, value_enum, default_value = "present")]
    pub state: StateArg,

    /// Report the change without writing the configuration
    #[arg(long, alias = "check")]
    pub dry_run: bool,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show the effective configuration (secrets redacted)
    Show,

    /// Print the config file location
    Path,

    /// Store an API key for the active profile in the system keyring
    SetKey,
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
