mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cephlab")]
#[command(about = "Test-lab automation for cephadm-managed Ceph clusters", long_about = None)]
struct Cli {
    /// Path to the cluster inventory file (default: cephlab.yaml, or
    /// $CEPHLAB_INVENTORY)
    #[arg(long, short = 'i', global = true)]
    inventory: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a service spec document and push it to the control node
    Spec {
        /// YAML file with the list of service blocks
        file: String,
        /// Print the rendered document instead of writing it to the cluster
        #[arg(long)]
        dry_run: bool,
    },
    /// Apply a service placement through `ceph orch apply`
    Apply {
        /// Service to apply (e.g. mgr)
        service: String,
        /// Inventory node ids to place the service on
        #[arg(required = true)]
        nodes: Vec<String>,
    },
    /// Inspect live cluster state
    State {
        #[command(subcommand)]
        command: StateCommands,
    },
}

#[derive(Subcommand)]
enum StateCommands {
    /// Log the output of the standard status commands
    Snapshot {
        /// Extra commands to run after the standard set
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        extra: Vec<String>,
    },
    /// Show the OSDs deployed on each host
    Osds,
    /// Show the daemons deployed on each host
    Daemons,
    /// List the hosts known to the orchestrator
    Hosts,
    /// Verify every core daemon writes a log file once file logging is on
    VerifyLogs,
    /// Check whether a path exists on a node
    Exists {
        /// Inventory node id
        node: String,
        /// Absolute path to check
        path: String,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    commands::handle_command(cli.inventory.as_deref(), cli.command)
}
