//! Renders service blocks into one spec document on the control node.

use tracing::info;
use uuid::Uuid;

use crate::cluster::{Cluster, Node};
use crate::error::Error;
use crate::exec::RemoteHost;
use crate::spec::render::render_document;
use crate::spec::ServiceSpec;

/// Creates the spec yaml file used to deploy services through cephadm.
pub struct SpecFileGenerator<'a, R> {
    node: &'a Node<R>,
    cluster: &'a Cluster<R>,
    specs: Vec<ServiceSpec>,
}

impl<'a, R: RemoteHost> SpecFileGenerator<'a, R> {
    /// `node` is where the spec file is written, usually the installer.
    pub fn new(node: &'a Node<R>, cluster: &'a Cluster<R>, specs: Vec<ServiceSpec>) -> Self {
        Self {
            node,
            cluster,
            specs,
        }
    }

    /// Render every block in input order, write the combined document to a
    /// fresh temp path on the target node and install any trust material the
    /// rendering produced. Returns the remote path of the spec file.
    pub fn create_spec_file(&self) -> Result<String, Error> {
        let (document, bundles) = render_document(self.cluster, &self.specs)?;

        info!("spec file content:\n{document}");

        let path = format!("/tmp/cephlab-spec-{}.yaml", Uuid::new_v4());
        self.node.remote.write_file(&path, &document, true)?;

        for bundle in &bundles {
            bundle.distribute(self.cluster)?;
        }

        Ok(path)
    }
}
