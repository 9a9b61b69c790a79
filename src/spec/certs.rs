//! Self-signed certificate material for rgw front-ends.

use rcgen::{Certificate, CertificateParams, DistinguishedName, DnType};
use tracing::debug;

use crate::cluster::{Cluster, ROLE_CLIENT, ROLE_RGW};
use crate::error::Error;
use crate::exec::RemoteHost;

/// Sentinel value requesting certificate generation in an rgw spec block.
pub const CREATE_CERT: &str = "create-cert";

const TRUST_ANCHOR_DIR: &str = "/etc/pki/ca-trust/source/anchors";
const TRUST_REFRESH_CMD: &str = "update-ca-trust enable && update-ca-trust extract";

/// Private key plus certificate, both PEM encoded.
pub struct CertIdentity {
    pub certificate_pem: String,
    pub private_key_pem: String,
}

impl CertIdentity {
    /// Generate a self-signed certificate for the given common name.
    pub fn self_signed(common_name: &str) -> Result<Self, Error> {
        let mut params = CertificateParams::default();
        params.distinguished_name = DistinguishedName::new();
        params
            .distinguished_name
            .push(DnType::CommonName, common_name);
        params.alg = &rcgen::PKCS_ECDSA_P256_SHA256;
        let cert = Certificate::from_params(params)?;
        Ok(Self {
            certificate_pem: cert.serialize_pem()?,
            private_key_pem: cert.serialize_private_key_pem(),
        })
    }

    /// Inline key followed by certificate as a YAML literal block whose
    /// lines sit four spaces deep, ready to follow a two-space-indented key.
    pub fn yaml_literal_block(&self) -> String {
        let pem = format!("{}{}", self.private_key_pem, self.certificate_pem);
        format!("|\n{pem}")
            .split('\n')
            .collect::<Vec<_>>()
            .join("\n    ")
    }
}

/// Public certificate to be planted into node trust stores after the spec
/// document itself has been rendered.
pub struct TrustBundle {
    pub service_id: String,
    pub certificate_pem: String,
}

impl TrustBundle {
    /// Install the certificate on every client- and rgw-role node and
    /// refresh each trust store.
    pub fn distribute<R: RemoteHost>(&self, cluster: &Cluster<R>) -> Result<(), Error> {
        let mut nodes = cluster.nodes_with_role(ROLE_CLIENT);
        nodes.extend(cluster.nodes_with_role(ROLE_RGW));

        for node in nodes {
            let cert_file = format!("{TRUST_ANCHOR_DIR}/{}.crt", self.service_id);
            node.remote
                .write_file(&cert_file, &self.certificate_pem, true)?;
            node.remote.exec_command(TRUST_REFRESH_CMD, true)?;
            debug!(
                "installed trust anchor for {} on {}",
                self.service_id, node.shortname
            );
        }
        Ok(())
    }
}
