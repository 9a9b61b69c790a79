//! Library error taxonomy.
//!
//! A `thiserror` enum split into the fatal library [`Error`] and the remote
//! execution [`ExecError`]. `ExecError` wraps the two failure modes of a
//! remote command (a non-zero exit and a local I/O failure driving `ssh`),
//! and folds into [`Error`] so callers can propagate both with `?`.

use thiserror::Error as ThisError;

/// Fatal errors produced by the spec generator and cluster-state helpers.
#[derive(Debug, ThisError)]
pub enum Error {
    /// No renderer exists for, or the service type was rejected.
    #[error("unknown or unsupported service spec: {0}")]
    UnknownSpec(String),

    /// A node identifier could not be resolved in the cluster inventory.
    #[error("unknown node: {0}")]
    UnknownNode(String),

    /// A lookup that expected at least one node found none.
    #[error("no nodes found: {0}")]
    NodesNotFound(String),

    /// A remote command or file write failed.
    #[error(transparent)]
    Exec(#[from] ExecError),

    /// Certificate generation failed.
    #[error("certificate error: {0}")]
    Cert(#[from] rcgen::Error),

    /// A spec template failed to render.
    #[error("template render error: {0}")]
    Render(#[from] askama::Error),

    /// A YAML document failed to parse.
    #[error("spec parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A JSON command response failed to parse.
    #[error("json parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors from driving a remote host over `ssh`.
#[derive(Debug, ThisError)]
pub enum ExecError {
    /// The remote command exited with a non-zero status.
    #[error("command failed ({status}): {command}\n{stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },

    /// A local I/O error occurred while running the command.
    #[error("io error running command `{command}`: {source}")]
    Io {
        command: String,
        source: std::io::Error,
    },
}
