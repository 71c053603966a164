//! Sandbox engine adapter
//!
//! Runs a real ffmpeg binary over a private scratch directory. The scratch
//! directory plays the role of the engine's flat namespace: `write_file`,
//! `read_file` and `delete_file` operate on plain files inside it, and
//! `exec` spawns the configured binary with the scratch directory as its
//! working directory so commands see exactly the blobs that were written.

use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::config::EngineSource;
use crate::engine::{validate_name, EnginePort};
use crate::error::{ClipdeckError, ClipdeckResult};

/// Engine adapter backed by an external ffmpeg process
pub struct SandboxEngine {
    scratch: TempDir,
    binary: Mutex<Option<PathBuf>>,
}

impl SandboxEngine {
    /// Create an adapter with a fresh scratch namespace
    pub fn new() -> ClipdeckResult<Self> {
        Ok(Self {
            scratch: TempDir::new()?,
            binary: Mutex::new(None),
        })
    }

    fn resolved_binary(&self) -> ClipdeckResult<PathBuf> {
        self.binary
            .lock()
            .expect("binary lock poisoned")
            .clone()
            .ok_or(ClipdeckError::EngineNotReady)
    }

    fn blob_path(&self, name: &str) -> ClipdeckResult<PathBuf> {
        validate_name(name)?;
        Ok(self.scratch.path().join(name))
    }
}

#[async_trait]
impl EnginePort for SandboxEngine {
    async fn load(&self, source: &EngineSource) -> ClipdeckResult<()> {
        if self.binary.lock().expect("binary lock poisoned").is_some() {
            return Ok(());
        }

        // Remote origin means the ambient runtime; local pins a binary path.
        let candidate = match source {
            EngineSource::Remote { .. } => PathBuf::from("ffmpeg"),
            EngineSource::Local { path } => PathBuf::from(path),
        };

        let probe = Command::new(&candidate)
            .arg("-version")
            .output()
            .await
            .map_err(|e| ClipdeckError::ConfigError {
                message: format!("Engine runtime {} is not runnable: {}", candidate.display(), e),
            })?;
        if !probe.status.success() {
            return Err(ClipdeckError::ConfigError {
                message: format!(
                    "Engine runtime {} failed its version probe",
                    candidate.display()
                ),
            });
        }

        debug!(binary = %candidate.display(), "engine runtime resolved");
        *self.binary.lock().expect("binary lock poisoned") = Some(candidate);
        Ok(())
    }

    async fn exec(&self, args: &[String]) -> ClipdeckResult<()> {
        let binary = self.resolved_binary()?;
        debug!(?args, "exec");

        let output = Command::new(&binary)
            .args(args)
            .current_dir(self.scratch.path())
            .output()
            .await
            .map_err(|e| ClipdeckError::ExecutionFailure {
                message: format!("failed to spawn engine process: {}", e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let tail: Vec<&str> = stderr.lines().rev().take(4).collect();
            let tail: Vec<&str> = tail.into_iter().rev().collect();
            warn!(status = ?output.status, "engine execution failed");
            return Err(ClipdeckError::ExecutionFailure {
                message: tail.join("\n"),
            });
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
        let path = self.blob_path(name)?;
        tokio::fs::write(path, bytes).await?;
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ClipdeckResult<Option<Vec<u8>>> {
        let path = self.blob_path(name)?;
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete_file(&self, name: &str) -> ClipdeckResult<()> {
        let path = self.blob_path(name)?;
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn namespace_round_trip_without_load() {
        // write/read/delete operate on the scratch directory directly; only
        // exec needs a resolved runtime.
        let engine = SandboxEngine::new().unwrap();

        engine.write_file("input_a.mp4", b"abc").await.unwrap();
        assert_eq!(
            engine.read_file("input_a.mp4").await.unwrap(),
            Some(b"abc".to_vec())
        );

        engine.delete_file("input_a.mp4").await.unwrap();
        assert_eq!(engine.read_file("input_a.mp4").await.unwrap(), None);
    }

    #[tokio::test]
    async fn deleting_a_missing_name_is_swallowed() {
        let engine = SandboxEngine::new().unwrap();
        engine.delete_file("never_written.mp4").await.unwrap();
    }

    #[tokio::test]
    async fn path_escapes_are_rejected() {
        let engine = SandboxEngine::new().unwrap();
        let result = engine.write_file("../escape.mp4", b"x").await;
        assert!(matches!(result, Err(ClipdeckError::InvalidFileName { .. })));
    }

    #[tokio::test]
    async fn exec_before_load_reports_not_ready() {
        let engine = SandboxEngine::new().unwrap();
        let result = engine.exec(&["-version".to_string()]).await;
        assert!(matches!(result, Err(ClipdeckError::EngineNotReady)));
    }
}
