//! Cluster-state inspection commands.

use anyhow::Result;
use cephlab::admin::{path_exists, CephAdmin};
use cephlab::cluster::Cluster;
use cephlab::exec::SshRemote;

pub fn handle_apply(cluster: &Cluster<SshRemote>, service: &str, nodes: &[String]) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    admin.apply_service(service, nodes)?;
    println!("✓ Applied {service} on {}", nodes.join(", "));
    Ok(())
}

pub fn handle_snapshot(cluster: &Cluster<SshRemote>, extra: &[String]) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    let extra: Vec<&str> = extra.iter().map(String::as_str).collect();
    admin.snapshot_cluster_state(&extra)?;
    println!("✓ Cluster state logged");
    Ok(())
}

pub fn handle_osds(cluster: &Cluster<SshRemote>) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    for (host, osds) in admin.host_osd_map()? {
        let ids: Vec<String> = osds.iter().map(|id| format!("osd.{id}")).collect();
        println!("{host}: {}", ids.join(", "));
    }
    Ok(())
}

pub fn handle_daemons(cluster: &Cluster<SshRemote>) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    for (host, daemons) in admin.host_daemon_map()? {
        println!("{host}: {}", daemons.join(", "));
    }
    Ok(())
}

pub fn handle_hosts(cluster: &Cluster<SshRemote>) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    for host in admin.deployed_hosts()? {
        println!("{host}");
    }
    Ok(())
}

pub fn handle_verify_logs(cluster: &Cluster<SshRemote>) -> Result<()> {
    let admin = CephAdmin::new(cluster);
    if admin.validate_log_files()? {
        println!("✓ All daemon log files present");
    } else {
        println!("✗ Missing daemon log files, see log output");
        std::process::exit(1);
    }
    Ok(())
}

pub fn handle_exists(cluster: &Cluster<SshRemote>, node_id: &str, path: &str) -> Result<()> {
    let node = cluster.node_by_id(node_id)?;
    if path_exists(node, path) {
        println!("✓ {path} exists on {}", node.shortname);
    } else {
        println!("✗ {path} missing on {}", node.shortname);
        std::process::exit(1);
    }
    Ok(())
}
