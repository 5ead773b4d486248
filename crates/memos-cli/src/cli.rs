use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use memos_core::resources::BucketOrder;
use memos_core::Appearance;

#[derive(Parser)]
#[command(name = "memos")]
#[command(about = "Inspect a Memos instance and tidy its resources from the terminal")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Memos server URL (falls back to MEMOS_SERVER_URL)
    #[arg(long, global = true, value_name = "URL")]
    pub server: Option<String>,

    /// Access token (falls back to MEMOS_ACCESS_TOKEN)
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Optional path to the local preferences database
    #[arg(long, global = true, value_name = "PATH")]
    pub db_path: Option<PathBuf>,

    /// Keep preferences in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Override OS color scheme detection (`--prefers-dark` or `--prefers-dark=false`)
    #[arg(
        long,
        global = true,
        value_name = "BOOL",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true"
    )]
    pub prefers_dark: Option<bool>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show instance status and the resulting document state
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Keep running and print theme changes until interrupted
        #[arg(long, conflicts_with = "json")]
        follow: bool,
    },
    /// Show or change interface preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },
    /// List or prune uploaded resources
    #[command(alias = "res")]
    Resources {
        #[command(subcommand)]
        command: ResourceCommands,
    },
    /// Manage the stored session marker
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
}

#[derive(Subcommand)]
pub enum PrefsCommands {
    /// Print stored preferences and the resolved theme
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change preferences
    Set {
        /// Interface language tag, e.g. `en` or `zh-Hans`
        #[arg(long, value_name = "TAG")]
        locale: Option<String>,
        /// Theme preference
        #[arg(long, value_enum)]
        appearance: Option<AppearanceArg>,
    },
}

#[derive(Subcommand)]
pub enum ResourceCommands {
    /// List resources grouped by month, then unused ones
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
        /// Month bucket order
        #[arg(long, value_enum, default_value_t = OrderArg::Newest)]
        order: OrderArg,
    },
    /// Delete every resource not attached to a memo
    Prune {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
pub enum SessionCommands {
    /// Remember the signed-in username
    Use {
        username: String,
    },
    /// Forget the signed-in username
    Clear,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AppearanceArg {
    System,
    Light,
    Dark,
}

impl From<AppearanceArg> for Appearance {
    fn from(value: AppearanceArg) -> Self {
        match value {
            AppearanceArg::System => Self::System,
            AppearanceArg::Light => Self::Light,
            AppearanceArg::Dark => Self::Dark,
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OrderArg {
    Newest,
    Oldest,
    Encounter,
}

impl From<OrderArg> for BucketOrder {
    fn from(value: OrderArg) -> Self {
        match value {
            OrderArg::Newest => Self::Newest,
            OrderArg::Oldest => Self::Oldest,
            OrderArg::Encounter => Self::Encounter,
        }
    }
}
