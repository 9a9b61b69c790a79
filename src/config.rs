//! Lab inventory loading.
//!
//! The inventory is a small YAML file describing the nodes of the cluster
//! under test:
//!
//! ```yaml
//! ssh_user: cephuser
//! nodes:
//!   - id: node1
//!     hostname: ceph-node1
//!     ip_address: 10.0.1.11
//!     roles: [installer, mon, mgr]
//!   - id: node2
//!     hostname: ceph-node2
//!     ip_address: 10.0.1.12
//!     roles: [osd, rgw]
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::cluster::{Cluster, Node};
use crate::exec::SshRemote;

pub const DEFAULT_INVENTORY: &str = "cephlab.yaml";
pub const ENV_INVENTORY: &str = "CEPHLAB_INVENTORY";

#[derive(Debug, Deserialize)]
pub struct Inventory {
    #[serde(default = "default_ssh_user")]
    pub ssh_user: String,
    pub nodes: Vec<NodeEntry>,
}

#[derive(Debug, Deserialize)]
pub struct NodeEntry {
    pub id: String,
    pub hostname: String,
    pub ip_address: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

fn default_ssh_user() -> String {
    "root".to_string()
}

/// Resolve the inventory path: CLI flag, then env var, then the default.
pub fn inventory_path(cli_override: Option<&str>) -> String {
    if let Some(path) = cli_override {
        return path.to_string();
    }
    std::env::var(ENV_INVENTORY).unwrap_or_else(|_| DEFAULT_INVENTORY.to_string())
}

pub fn load_inventory(path: &Path) -> Result<Inventory> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read inventory file: {}", path.display()))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse inventory file: {}", path.display()))
}

/// Open an SSH connection handle to every node in the inventory.
pub fn connect_cluster(inventory: &Inventory) -> Cluster<SshRemote> {
    let nodes = inventory
        .nodes
        .iter()
        .map(|entry| Node {
            id: entry.id.clone(),
            shortname: entry.hostname.clone(),
            ip_address: entry.ip_address.clone(),
            roles: entry.roles.clone(),
            remote: SshRemote::connect(&inventory.ssh_user, &entry.ip_address),
        })
        .collect();
    Cluster::new(nodes)
}
