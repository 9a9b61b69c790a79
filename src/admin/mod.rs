//! Read-only orchestrator queries used for test assertions.

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::{error, info};

use crate::cluster::{Cluster, Node};
use crate::error::Error;
use crate::exec::RemoteHost;

/// Daemon types whose log files are checked by [`CephAdmin::validate_log_files`].
const LOGGED_DAEMON_TYPES: [&str; 5] = ["mon", "mgr", "osd", "rgw", "mds"];

/// Fixed inspection commands run by [`CephAdmin::snapshot_cluster_state`].
const CLUSTER_STATE_COMMANDS: [&str; 5] = [
    "ceph status",
    "ceph orch host ls",
    "ceph orch ls -f yaml",
    "ceph orch ps -f json-pretty",
    "ceph health detail -f yaml",
];

#[derive(Debug, Deserialize)]
struct OsdTree {
    nodes: Vec<OsdTreeNode>,
}

#[derive(Debug, Deserialize)]
struct OsdTreeNode {
    name: String,
    #[serde(rename = "type")]
    node_type: String,
    #[serde(default)]
    children: Vec<i64>,
}

#[derive(Debug, Deserialize)]
struct DaemonRecord {
    daemon_type: String,
    daemon_id: String,
    hostname: String,
}

#[derive(Debug, Deserialize)]
struct HostRecord {
    hostname: String,
}

/// Drives the ceph orchestrator CLI through the cluster's installer node.
///
/// Every query hits the live cluster; nothing is cached between calls.
pub struct CephAdmin<'a, R> {
    cluster: &'a Cluster<R>,
}

impl<'a, R: RemoteHost> CephAdmin<'a, R> {
    pub fn new(cluster: &'a Cluster<R>) -> Self {
        Self { cluster }
    }

    pub fn cluster(&self) -> &Cluster<R> {
        self.cluster
    }

    /// Run a ceph CLI line inside `cephadm shell` on the installer node.
    pub fn shell(&self, args: &[&str]) -> Result<(String, String), Error> {
        let installer = self.cluster.installer()?;
        let command = format!("cephadm shell -- {}", args.join(" "));
        Ok(installer.remote.exec_command(&command, true)?)
    }

    /// Apply a service through `ceph orch apply`, unioning the installer
    /// node into the placement.
    pub fn apply_service(&self, service: &str, node_ids: &[String]) -> Result<(), Error> {
        let installer = self.cluster.installer()?;
        let mut placement: Vec<String> = self
            .cluster
            .nodes_by_ids(node_ids)?
            .iter()
            .map(|node| node.shortname.clone())
            .collect();
        if !placement.contains(&installer.shortname) {
            placement.push(installer.shortname.clone());
        }

        let placement_arg = format!("--placement '{}'", placement.join(";"));
        self.shell(&["ceph", "orch", "apply", service, &placement_arg])?;
        Ok(())
    }

    /// Log the output of the fixed status commands plus any extras.
    pub fn snapshot_cluster_state(&self, extra_commands: &[&str]) -> Result<(), Error> {
        let commands = CLUSTER_STATE_COMMANDS
            .iter()
            .chain(extra_commands.iter())
            .copied();
        for command in commands {
            let (out, err) = self.shell(&[command])?;
            info!("{command} stdout:\n{out}");
            if !err.is_empty() {
                error!("{command} stderr:\n{err}");
            }
        }
        Ok(())
    }

    /// Map each host in the osd tree to the OSD ids placed on it.
    pub fn host_osd_map(&self) -> Result<IndexMap<String, Vec<i64>>, Error> {
        let (out, _) = self.shell(&["ceph", "osd", "tree", "-f", "json"])?;
        let tree: OsdTree = serde_json::from_str(&out)?;
        let mut map = IndexMap::new();
        for node in tree.nodes {
            if node.node_type == "host" {
                map.insert(node.name, node.children);
            }
        }
        Ok(map)
    }

    /// Map each host to the `<type>.<id>` daemons running on it, keeping
    /// the order the orchestrator reports them in.
    pub fn host_daemon_map(&self) -> Result<IndexMap<String, Vec<String>>, Error> {
        let (out, _) = self.shell(&["ceph", "orch", "ps", "-f", "json"])?;
        let daemons: Vec<DaemonRecord> = serde_json::from_str(&out)?;
        let mut map: IndexMap<String, Vec<String>> = IndexMap::new();
        for daemon in daemons {
            let name = format!("{}.{}", daemon.daemon_type, daemon.daemon_id);
            map.entry(daemon.hostname).or_default().push(name);
        }
        Ok(map)
    }

    /// Hostnames currently registered with the orchestrator, in listing order.
    pub fn deployed_hosts(&self) -> Result<Vec<String>, Error> {
        let (out, _) = self.shell(&["ceph", "orch", "host", "ls", "-f", "json"])?;
        let hosts: Vec<HostRecord> = serde_json::from_str(&out)?;
        Ok(hosts.into_iter().map(|host| host.hostname).collect())
    }

    /// Turn on file logging cluster-wide and verify that every core daemon
    /// writes a log file under `/var/log/ceph/<fsid>/`.
    ///
    /// Stops at the first missing file.
    pub fn validate_log_files(&self) -> Result<bool, Error> {
        self.shell(&["ceph", "config", "set", "global", "log_to_file", "true"])?;
        let (out, _) = self.shell(&["ceph", "fsid"])?;
        let fsid = out.trim();
        let log_dir = format!("/var/log/ceph/{fsid}");

        let daemon_map = self.host_daemon_map()?;

        for node in self.cluster.nodes() {
            let Some(daemons) = daemon_map.get(&node.shortname) else {
                continue;
            };
            for daemon in daemons {
                let daemon_type = daemon.split('.').next().unwrap_or_default();
                if !LOGGED_DAEMON_TYPES.contains(&daemon_type) {
                    continue;
                }
                // rgw daemons log under the client name
                let log_file = if daemon_type == "rgw" {
                    format!("{log_dir}/ceph-client.{daemon}.log")
                } else {
                    format!("{log_dir}/ceph-{daemon}.log")
                };
                info!(
                    "verifying existence of log file {log_file} on host {}",
                    node.shortname
                );
                if !path_exists(node, &log_file) {
                    error!("log for {daemon} is missing on {}", node.ip_address);
                    return Ok(false);
                }
            }
            info!("log verification on {} successful", node.ip_address);
        }
        Ok(true)
    }
}

/// Check whether a path exists on the node.
///
/// Failures are logged and reported as `false` instead of propagating.
pub fn path_exists<R: RemoteHost>(node: &Node<R>, path: &str) -> bool {
    match node.remote.exec_command(&format!("ls -l {path}"), true) {
        Ok((out, _)) => {
            info!("{out}");
            true
        }
        Err(err) => {
            error!("path check failed: {err}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::testing::mock_cluster;

    #[test]
    fn shell_runs_on_installer_with_sudo() {
        let cluster = mock_cluster(&[("adm", &["installer"]), ("node1", &[])]);
        let admin = CephAdmin::new(&cluster);
        admin.shell(&["ceph", "status"]).unwrap();

        let adm = cluster.node_by_id("adm").unwrap();
        let calls = adm.remote.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "cephadm shell -- ceph status");
        assert!(calls[0].1);
        assert!(cluster
            .node_by_id("node1")
            .unwrap()
            .remote
            .calls
            .borrow()
            .is_empty());
    }

    #[test]
    fn apply_service_unions_installer_into_placement() {
        let cluster = mock_cluster(&[("adm", &["installer"]), ("node1", &[])]);
        let admin = CephAdmin::new(&cluster);
        admin
            .apply_service("mgr", &["node1".to_string()])
            .unwrap();

        let adm = cluster.node_by_id("adm").unwrap();
        let calls = adm.remote.calls.borrow();
        assert!(calls[0]
            .0
            .contains("ceph orch apply mgr --placement 'node1;adm'"));
    }

    #[test]
    fn snapshot_runs_fixed_commands_plus_extras() {
        let cluster = mock_cluster(&[("adm", &["installer"])]);
        let admin = CephAdmin::new(&cluster);
        admin
            .snapshot_cluster_state(&["ceph osd tree"])
            .unwrap();

        let adm = cluster.node_by_id("adm").unwrap();
        let calls = adm.remote.calls.borrow();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0].0, "cephadm shell -- ceph status");
        assert_eq!(calls[5].0, "cephadm shell -- ceph osd tree");
    }

    #[test]
    fn osd_map_keeps_only_host_nodes() {
        let cluster = mock_cluster(&[("adm", &["installer"])]);
        let adm = cluster.node_by_id("adm").unwrap();
        adm.remote.respond(
            r#"{"nodes": [
                {"id": -1, "name": "default", "type": "root", "children": [-2, -3]},
                {"id": -2, "name": "host1", "type": "host", "children": [0, 1]},
                {"id": -3, "name": "host2", "type": "host", "children": [2]},
                {"id": 0, "name": "osd.0", "type": "osd"}
            ]}"#,
        );

        let admin = CephAdmin::new(&cluster);
        let map = admin.host_osd_map().unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(map["host1"], vec![0, 1]);
        assert_eq!(map["host2"], vec![2]);
    }

    #[test]
    fn daemon_map_preserves_report_order() {
        let cluster = mock_cluster(&[("adm", &["installer"])]);
        let adm = cluster.node_by_id("adm").unwrap();
        adm.remote.respond(
            r#"[
                {"daemon_type": "mon", "daemon_id": "a", "hostname": "host1"},
                {"daemon_type": "osd", "daemon_id": "0", "hostname": "host1"},
                {"daemon_type": "mgr", "daemon_id": "x", "hostname": "host2"}
            ]"#,
        );

        let admin = CephAdmin::new(&cluster);
        let map = admin.host_daemon_map().unwrap();
        assert_eq!(map["host1"], vec!["mon.a", "osd.0"]);
        assert_eq!(map["host2"], vec!["mgr.x"]);
        let hosts: Vec<_> = map.keys().cloned().collect();
        assert_eq!(hosts, ["host1", "host2"]);
    }

    #[test]
    fn deployed_hosts_in_listing_order() {
        let cluster = mock_cluster(&[("adm", &["installer"])]);
        let adm = cluster.node_by_id("adm").unwrap();
        adm.remote.respond(
            r#"[
                {"hostname": "host2", "addr": "10.0.0.2"},
                {"hostname": "host1", "addr": "10.0.0.1"}
            ]"#,
        );

        let admin = CephAdmin::new(&cluster);
        assert_eq!(admin.deployed_hosts().unwrap(), ["host2", "host1"]);
    }

    #[test]
    fn path_exists_swallows_command_failure() {
        let cluster = mock_cluster(&[("node1", &[])]);
        let node = cluster.node_by_id("node1").unwrap();
        node.remote.fail();
        assert!(!path_exists(node, "/var/log/ceph/x.log"));

        assert!(path_exists(node, "/var/log/ceph/x.log"));
        let calls = node.remote.calls.borrow();
        assert_eq!(calls[0].0, "ls -l /var/log/ceph/x.log");
        assert!(calls[0].1, "path check runs with sudo");
    }

    #[test]
    fn log_validation_short_circuits_on_first_missing_file() {
        let cluster = mock_cluster(&[
            ("adm", &["installer"]),
            ("host1", &[]),
            ("host2", &[]),
        ]);
        let adm = cluster.node_by_id("adm").unwrap();
        // config set, fsid, orch ps
        adm.remote.respond("");
        adm.remote.respond("9f2c4e66-77f0-11ee-aab2-001122334455\n");
        adm.remote.respond(
            r#"[
                {"daemon_type": "mon", "daemon_id": "a", "hostname": "host1"},
                {"daemon_type": "node-exporter", "daemon_id": "n", "hostname": "host1"},
                {"daemon_type": "osd", "daemon_id": "0", "hostname": "host2"}
            ]"#,
        );
        let host1 = cluster.node_by_id("host1").unwrap();
        host1.remote.fail();

        let admin = CephAdmin::new(&cluster);
        assert!(!admin.validate_log_files().unwrap());

        // only the mon log was checked; node-exporter is out of scope and
        // host2 is never reached
        let host1_calls = host1.remote.calls.borrow();
        assert_eq!(host1_calls.len(), 1);
        assert_eq!(
            host1_calls[0].0,
            "ls -l /var/log/ceph/9f2c4e66-77f0-11ee-aab2-001122334455/ceph-mon.a.log"
        );
        assert!(cluster
            .node_by_id("host2")
            .unwrap()
            .remote
            .calls
            .borrow()
            .is_empty());
    }

    #[test]
    fn log_validation_uses_client_prefix_for_rgw() {
        let cluster = mock_cluster(&[("adm", &["installer"]), ("host1", &[])]);
        let adm = cluster.node_by_id("adm").unwrap();
        adm.remote.respond("");
        adm.remote.respond("abc\n");
        adm.remote.respond(
            r#"[{"daemon_type": "rgw", "daemon_id": "lab.host1.qrstuv", "hostname": "host1"}]"#,
        );

        let admin = CephAdmin::new(&cluster);
        assert!(admin.validate_log_files().unwrap());

        let host1 = cluster.node_by_id("host1").unwrap();
        let calls = host1.remote.calls.borrow();
        assert_eq!(
            calls[0].0,
            "ls -l /var/log/ceph/abc/ceph-client.rgw.lab.host1.qrstuv.log"
        );
    }
}
