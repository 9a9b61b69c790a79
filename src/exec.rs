//! Remote command execution over the system `ssh` binary.

use std::io::Write;
use std::process::{Command, Stdio};

use crate::error::ExecError;

/// Access to a single cluster node's shell and filesystem.
///
/// Implemented by [`SshRemote`] in production and by scripted fakes in
/// tests.
pub trait RemoteHost {
    /// Run a command on the node, returning (stdout, stderr).
    ///
    /// A non-zero exit status is reported as [`ExecError::CommandFailed`].
    fn exec_command(&self, command: &str, sudo: bool) -> Result<(String, String), ExecError>;

    /// Write a file on the node, creating or truncating it.
    fn write_file(&self, file_name: &str, content: &str, sudo: bool) -> Result<(), ExecError>;
}

/// Remote host reached through `ssh`.
pub struct SshRemote {
    target: String,
    use_key_auth: bool,
}

impl SshRemote {
    /// Open a connection handle for `user@host`.
    ///
    /// Probes whether key-based auth works before the first real command.
    pub fn connect(user: &str, host: &str) -> Self {
        let target = format!("{user}@{host}");
        let probe = Command::new("ssh")
            .args([
                "-o",
                "ConnectTimeout=10",
                "-o",
                "BatchMode=yes",
                "-o",
                "PreferredAuthentications=publickey",
                "-o",
                "PasswordAuthentication=no",
                "-o",
                "StrictHostKeyChecking=no",
                &target,
                "true",
            ])
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();

        let use_key_auth = probe.map(|status| status.success()).unwrap_or(false);

        Self {
            target,
            use_key_auth,
        }
    }

    fn build_ssh_args(&self) -> Vec<String> {
        let mut args = vec![
            "-o".to_string(),
            "StrictHostKeyChecking=no".to_string(),
            "-o".to_string(),
            "ConnectTimeout=30".to_string(),
        ];

        if self.use_key_auth {
            args.extend([
                "-o".to_string(),
                "PreferredAuthentications=publickey".to_string(),
                "-o".to_string(),
                "PasswordAuthentication=no".to_string(),
            ]);
        } else {
            args.extend([
                "-o".to_string(),
                "PreferredAuthentications=publickey,keyboard-interactive,password".to_string(),
            ]);
        }

        args.push(self.target.clone());
        args
    }

    fn run(
        &self,
        remote_command: &str,
        stdin_payload: Option<&[u8]>,
    ) -> Result<(String, String), ExecError> {
        let mut ssh_args = self.build_ssh_args();
        ssh_args.push(remote_command.to_string());

        let io_err = |source| ExecError::Io {
            command: remote_command.to_string(),
            source,
        };

        let mut child = Command::new("ssh")
            .args(&ssh_args)
            .stdin(if stdin_payload.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(io_err)?;

        if let Some(payload) = stdin_payload {
            // Take the handle so stdin closes before we wait on the child.
            if let Some(mut stdin) = child.stdin.take() {
                stdin.write_all(payload).map_err(io_err)?;
            }
        }

        let output = child.wait_with_output().map_err(io_err)?;
        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(ExecError::CommandFailed {
                command: remote_command.to_string(),
                status: output.status.code().unwrap_or(-1),
                stderr,
            });
        }

        Ok((stdout, stderr))
    }
}

impl RemoteHost for SshRemote {
    fn exec_command(&self, command: &str, sudo: bool) -> Result<(String, String), ExecError> {
        let command = if sudo {
            format!("sudo {command}")
        } else {
            command.to_string()
        };
        self.run(&command, None)
    }

    fn write_file(&self, file_name: &str, content: &str, sudo: bool) -> Result<(), ExecError> {
        let tee = if sudo {
            format!("sudo tee {file_name} >/dev/null")
        } else {
            format!("tee {file_name} >/dev/null")
        };
        self.run(&tee, Some(content.as_bytes())).map(|_| ())
    }
}
