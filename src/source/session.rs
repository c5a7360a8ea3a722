// Scoped remote session: one child process per fetch.
//
// The process is killed when the session is dropped without being finished
// (timeout, error, cancelled worker), so a session never outlives its call.

use std::process::Stdio;

use tokio::process::{Child, Command};
use tracing::debug;

use crate::error::FetchError;

pub struct Session {
    child: Option<Child>,
    label: String,
}

impl Session {
    /// Spawns `program args...` with piped stdout/stderr.
    pub fn open(program: &str, args: &[String], label: impl Into<String>) -> Result<Self, FetchError> {
        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| FetchError::Spawn {
                program: program.to_string(),
                source,
            })?;
        Ok(Self {
            child: Some(child),
            label: label.into(),
        })
    }

    /// Waits for the command. A non-zero exit or any stderr output is a failure.
    pub async fn finish(mut self) -> Result<String, FetchError> {
        let Some(child) = self.child.take() else {
            return Err(FetchError::Cancelled);
        };
        let output = child.wait_with_output().await?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() || !stderr.is_empty() {
            return Err(FetchError::Remote {
                status: output.status.to_string(),
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            let _ = child.start_kill();
            debug!(session = %self.label, "session released before completion");
        }
    }
}
