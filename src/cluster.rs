//! Cluster topology registry: node metadata plus shell access per node.

use crate::error::Error;

/// Role carried by the node every orchestrator command is funneled through.
pub const ROLE_INSTALLER: &str = "installer";
/// Role carried by client nodes that need the rgw certificate trusted.
pub const ROLE_CLIENT: &str = "client";
/// Role carried by rgw nodes.
pub const ROLE_RGW: &str = "rgw";

/// A single lab node: inventory metadata plus a live connection.
pub struct Node<R> {
    /// Logical id the node is referenced by in spec documents.
    pub id: String,
    /// Short hostname as known to the orchestrator.
    pub shortname: String,
    pub ip_address: String,
    /// Role tags, also used as host labels.
    pub roles: Vec<String>,
    pub remote: R,
}

impl<R> Node<R> {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

/// The node registry for one cluster under test.
///
/// Not safe for concurrent use; callers serialize access externally.
pub struct Cluster<R> {
    nodes: Vec<Node<R>>,
}

impl<R> Cluster<R> {
    pub fn new(nodes: Vec<Node<R>>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node<R>] {
        &self.nodes
    }

    /// Look a node up by its logical inventory id.
    pub fn node_by_id(&self, id: &str) -> Result<&Node<R>, Error> {
        self.nodes
            .iter()
            .find(|node| node.id == id)
            .ok_or_else(|| Error::UnknownNode(id.to_string()))
    }

    /// Look up several nodes, preserving the input order.
    pub fn nodes_by_ids(&self, ids: &[String]) -> Result<Vec<&Node<R>>, Error> {
        ids.iter().map(|id| self.node_by_id(id)).collect()
    }

    pub fn nodes_with_role(&self, role: &str) -> Vec<&Node<R>> {
        self.nodes.iter().filter(|node| node.has_role(role)).collect()
    }

    /// The control node running cephadm.
    pub fn installer(&self) -> Result<&Node<R>, Error> {
        self.nodes
            .iter()
            .find(|node| node.has_role(ROLE_INSTALLER))
            .ok_or_else(|| Error::NodesNotFound(format!("role {ROLE_INSTALLER}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::exec::testing::mock_cluster;

    #[test]
    fn node_lookup_by_id() {
        let cluster = mock_cluster(&[("node1", &["installer"]), ("node2", &["osd"])]);
        assert_eq!(cluster.node_by_id("node2").unwrap().shortname, "node2");
        assert!(matches!(
            cluster.node_by_id("node9"),
            Err(Error::UnknownNode(id)) if id == "node9"
        ));
    }

    #[test]
    fn bulk_lookup_preserves_order() {
        let cluster = mock_cluster(&[("a", &[]), ("b", &[]), ("c", &[])]);
        let ids = vec!["c".to_string(), "a".to_string()];
        let nodes = cluster.nodes_by_ids(&ids).unwrap();
        let names: Vec<_> = nodes.iter().map(|n| n.shortname.as_str()).collect();
        assert_eq!(names, ["c", "a"]);
    }

    #[test]
    fn role_filter_and_installer() {
        let cluster = mock_cluster(&[
            ("adm", &["installer", "client"]),
            ("rgw1", &["rgw"]),
            ("cli1", &["client"]),
        ]);
        assert_eq!(cluster.nodes_with_role("client").len(), 2);
        assert_eq!(cluster.installer().unwrap().id, "adm");
    }
}
