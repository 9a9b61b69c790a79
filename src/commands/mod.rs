// Command module routing
//
// To add a new command:
// 1. Create a new file in this directory (e.g., `mycommand.rs`)
// 2. Add `pub mod mycommand;` below
// 3. Add the match arm in `handle_command`

pub mod spec;
pub mod state;

use std::path::Path;

use anyhow::Result;
use cephlab::cluster::Cluster;
use cephlab::config;
use cephlab::exec::SshRemote;

use crate::{Commands, StateCommands};

/// Dispatch command to appropriate handler
pub fn handle_command(inventory: Option<&str>, command: Commands) -> Result<()> {
    let cluster = load_cluster(inventory)?;

    match command {
        Commands::Spec { file, dry_run } => {
            spec::handle_spec(&cluster, &file, dry_run)?;
        }
        Commands::Apply { service, nodes } => {
            state::handle_apply(&cluster, &service, &nodes)?;
        }
        Commands::State { command } => match command {
            StateCommands::Snapshot { extra } => {
                state::handle_snapshot(&cluster, &extra)?;
            }
            StateCommands::Osds => {
                state::handle_osds(&cluster)?;
            }
            StateCommands::Daemons => {
                state::handle_daemons(&cluster)?;
            }
            StateCommands::Hosts => {
                state::handle_hosts(&cluster)?;
            }
            StateCommands::VerifyLogs => {
                state::handle_verify_logs(&cluster)?;
            }
            StateCommands::Exists { node, path } => {
                state::handle_exists(&cluster, &node, &path)?;
            }
        },
    }

    Ok(())
}

fn load_cluster(inventory: Option<&str>) -> Result<Cluster<SshRemote>> {
    let path = config::inventory_path(inventory);
    let inventory = config::load_inventory(Path::new(&path))?;
    Ok(config::connect_cluster(&inventory))
}
