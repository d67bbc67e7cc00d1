//! CLI command definitions and subcommands

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// servicelogger - send OCM service logs
#[derive(Parser, Debug)]
#[command(
    name = "servicelogger",
    about = "Send OCM service logs to one or more clusters",
    version,
    after_help = "Logs are written to: ~/.local/share/servicelogger/logs/servicelogger.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Send a service log read as JSON from stdin
    #[command(
        long_about = "Send a service log to the customer from a JSON template passed via stdin",
        after_help = "Example: servicelogger send -u 'https://api.openshift.com' -t \"$(ocm token)\" -c $CLUSTER_ID < template.json"
    )]
    Send(SendArgs),
}

/// Arguments of `send`; unset values fall back to the environment and config file
#[derive(Args, Debug, Clone, Default)]
pub struct SendArgs {
    /// OCM URL (falls back to $OCM_URL, then the config file, then https://api.openshift.com)
    #[arg(short = 'u', long)]
    pub ocm_url: Option<String>,

    /// OCM token (falls back to $OCM_TOKEN)
    #[arg(short = 't', long)]
    pub ocm_token: Option<String>,

    /// Internal cluster ID (falls back to $CLUSTER_ID)
    #[arg(short = 'c', long, conflicts_with = "cluster_ids")]
    pub cluster_id: Option<String>,

    /// Comma-separated internal cluster IDs (falls back to $CLUSTER_IDS, space separated)
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    pub cluster_ids: Option<Vec<String>>,

    /// Send without asking for confirmation
    #[arg(short = 'y', long)]
    pub yes: bool,
}
