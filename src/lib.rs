//! Test-lab automation for cephadm-managed Ceph clusters.
//!
//! Two loosely related pieces live here: a spec generator that renders
//! declarative service blocks into the YAML documents `ceph orch apply -i`
//! consumes and pushes them to the control node, and a set of read-only
//! cluster-state queries used for assertions in cluster validation runs.

pub mod admin;
pub mod cluster;
pub mod config;
pub mod error;
pub mod exec;
pub mod spec;

pub use error::{Error, ExecError};
