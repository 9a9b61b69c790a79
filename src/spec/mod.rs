//! Service spec blocks consumed by `ceph orch apply -i`.

mod certs;
mod generator;
mod render;

pub use certs::{CertIdentity, TrustBundle, CREATE_CERT};
pub use generator::SpecFileGenerator;
pub use render::{render_document, render_service_spec, RenderedSpec};

use serde::Deserialize;

use crate::cluster::Cluster;
use crate::error::Error;

/// The closed set of service kinds a spec document may deploy.
const SERVICE_TYPES: [&str; 12] = [
    "host",
    "mon",
    "mgr",
    "alertmanager",
    "crash",
    "grafana",
    "node-exporter",
    "prometheus",
    "osd",
    "mds",
    "nfs",
    "rgw",
];

/// One block of a declarative service layout document.
///
/// The tag is the cephadm `service_type`; anything outside the closed set is
/// rejected while parsing instead of surfacing mid-render.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "service_type", rename_all = "kebab-case")]
pub enum ServiceSpec {
    Host(HostSpec),
    Mon(CommonSpec),
    Mgr(CommonSpec),
    Alertmanager(CommonSpec),
    Crash(CommonSpec),
    Grafana(CommonSpec),
    NodeExporter(CommonSpec),
    Prometheus(CommonSpec),
    Osd(OsdSpec),
    Mds(MdsSpec),
    Nfs(NfsSpec),
    Rgw(RgwSpec),
}

impl ServiceSpec {
    /// The cephadm service type tag this block deploys.
    pub fn service_type(&self) -> &'static str {
        match self {
            ServiceSpec::Host(_) => "host",
            ServiceSpec::Mon(_) => "mon",
            ServiceSpec::Mgr(_) => "mgr",
            ServiceSpec::Alertmanager(_) => "alertmanager",
            ServiceSpec::Crash(_) => "crash",
            ServiceSpec::Grafana(_) => "grafana",
            ServiceSpec::NodeExporter(_) => "node-exporter",
            ServiceSpec::Prometheus(_) => "prometheus",
            ServiceSpec::Osd(_) => "osd",
            ServiceSpec::Mds(_) => "mds",
            ServiceSpec::Nfs(_) => "nfs",
            ServiceSpec::Rgw(_) => "rgw",
        }
    }
}

/// Parse a YAML list of service blocks.
pub fn parse_spec_blocks(input: &str) -> Result<Vec<ServiceSpec>, Error> {
    let raw: Vec<serde_yaml::Value> = serde_yaml::from_str(input)?;
    raw.into_iter().map(parse_spec_block).collect()
}

fn parse_spec_block(value: serde_yaml::Value) -> Result<ServiceSpec, Error> {
    let service_type = value
        .get("service_type")
        .and_then(serde_yaml::Value::as_str)
        .unwrap_or_default()
        .to_string();
    if !SERVICE_TYPES.contains(&service_type.as_str()) {
        return Err(Error::UnknownSpec(service_type));
    }
    Ok(serde_yaml::from_value(value)?)
}

/// Host registration block. One entry is rendered per node id, in input
/// order; the address and role labels are attached only when requested.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HostSpec {
    pub nodes: Vec<String>,
    #[serde(default)]
    pub address: bool,
    #[serde(default)]
    pub labels: bool,
}

/// Spec shape shared by mon, mgr and the monitoring stack services.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommonSpec {
    #[serde(default)]
    pub unmanaged: Option<bool>,
    #[serde(default)]
    pub placement: Placement,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OsdSpec {
    #[serde(default)]
    pub service_id: Option<String>,
    #[serde(default)]
    pub unmanaged: Option<bool>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub data_devices: Option<DataDevices>,
    #[serde(default)]
    pub encrypted: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataDevices {
    #[serde(default)]
    pub all: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MdsSpec {
    pub service_id: String,
    #[serde(default)]
    pub unmanaged: Option<bool>,
    #[serde(default)]
    pub placement: Placement,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NfsSpec {
    pub service_id: String,
    #[serde(default)]
    pub unmanaged: Option<bool>,
    #[serde(default)]
    pub placement: Placement,
    pub spec: NfsInnerSpec,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NfsInnerSpec {
    pub pool: String,
    #[serde(default)]
    pub namespace: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RgwSpec {
    pub service_id: String,
    #[serde(default)]
    pub unmanaged: Option<bool>,
    #[serde(default)]
    pub placement: Placement,
    #[serde(default)]
    pub spec: RgwInnerSpec,
}

/// Inner rgw daemon settings.
///
/// When `rgw_frontend_ssl_certificate` is the [`CREATE_CERT`] sentinel, a
/// self-signed certificate is generated with the *first* resolved placement
/// host as its common name. Multi-host placements share that single-host
/// certificate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RgwInnerSpec {
    #[serde(default)]
    pub rgw_frontend_port: Option<u16>,
    #[serde(default)]
    pub rgw_realm: Option<String>,
    #[serde(default)]
    pub rgw_zone: Option<String>,
    #[serde(default)]
    pub ssl: Option<bool>,
    #[serde(default)]
    pub rgw_frontend_ssl_certificate: Option<String>,
}

/// Host-selection rule for a service.
///
/// Exactly one of the selection modes is expected. `nodes` holds logical
/// inventory ids and must be resolved to `hosts` before rendering.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Placement {
    #[serde(default)]
    pub nodes: Option<Vec<String>>,
    #[serde(default)]
    pub hosts: Option<Vec<String>>,
    #[serde(default)]
    pub host_pattern: Option<String>,
    #[serde(default)]
    pub count: Option<u32>,
    #[serde(default)]
    pub label: Option<String>,
}

impl Placement {
    /// Resolve logical node ids into hostnames.
    ///
    /// Returns a new placement where `nodes` has been consumed into `hosts`;
    /// the input is left untouched. A placement without `nodes` passes
    /// through unchanged.
    pub fn resolved<R>(&self, cluster: &Cluster<R>) -> Result<Placement, Error> {
        let mut resolved = self.clone();
        if let Some(node_ids) = resolved.nodes.take() {
            let nodes = cluster.nodes_by_ids(&node_ids)?;
            resolved.hosts = Some(nodes.iter().map(|node| node.shortname.clone()).collect());
        }
        Ok(resolved)
    }
}
