//! Engine boundary
//!
//! The multimedia engine is an external collaborator: an asynchronous,
//! stateful capability with a private flat namespace of named byte blobs and
//! at most one command in flight. This module defines the port the rest of
//! the crate programs against, and the handle that makes the single-flight
//! constraint and the readiness gate explicit instead of relying on caller
//! discipline.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{watch, Mutex};

use crate::config::EngineSource;
use crate::error::{ClipdeckError, ClipdeckResult};

pub mod memory;
pub mod sandbox;

pub use memory::MemoryEngine;
pub use sandbox::SandboxEngine;

/// Port for the embedded multimedia engine
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Load the engine runtime from the configured source. Idempotent: a
    /// second call after a successful load is a no-op.
    async fn load(&self, source: &EngineSource) -> ClipdeckResult<()>;

    /// Execute one command against the engine namespace. Errors on
    /// engine-reported failure.
    async fn exec(&self, args: &[String]) -> ClipdeckResult<()>;

    /// Write a named blob into the engine namespace
    async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()>;

    /// Read a named blob; `None` when the name is absent
    async fn read_file(&self, name: &str) -> ClipdeckResult<Option<Vec<u8>>>;

    /// Delete a named blob. Deleting a missing name is not an error.
    async fn delete_file(&self, name: &str) -> ClipdeckResult<()>;
}

/// Cloneable handle wrapping an engine port.
///
/// The handle enforces two structural constraints the raw port only
/// documents: every namespace call is gated behind a readiness flag, and
/// `exec` goes through an explicit mutex so two commands can never overlap
/// on the same engine instance.
#[derive(Clone)]
pub struct EngineHandle {
    port: Arc<dyn EnginePort>,
    exec_gate: Arc<Mutex<()>>,
    load_gate: Arc<Mutex<()>>,
    ready: Arc<watch::Sender<bool>>,
}

impl EngineHandle {
    pub fn new(port: Arc<dyn EnginePort>) -> Self {
        let (ready, _) = watch::channel(false);
        Self {
            port,
            exec_gate: Arc::new(Mutex::new(())),
            load_gate: Arc::new(Mutex::new(())),
            ready: Arc::new(ready),
        }
    }

    /// Load the engine if it is not already loaded. Safe to call again; the
    /// second call returns without touching the port.
    pub async fn load(&self, source: &EngineSource) -> ClipdeckResult<()> {
        let _guard = self.load_gate.lock().await;
        if *self.ready.borrow() {
            return Ok(());
        }
        self.port.load(source).await?;
        self.ready.send_replace(true);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        *self.ready.borrow()
    }

    /// Observe readiness transitions
    pub fn ready_watch(&self) -> watch::Receiver<bool> {
        self.ready.subscribe()
    }

    fn ensure_ready(&self) -> ClipdeckResult<()> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(ClipdeckError::EngineNotReady)
        }
    }

    /// Execute one command. At most one exec is in flight at a time; a
    /// second caller waits here rather than overlapping.
    pub async fn exec(&self, args: &[String]) -> ClipdeckResult<()> {
        self.ensure_ready()?;
        let _in_flight = self.exec_gate.lock().await;
        self.port.exec(args).await
    }

    pub async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
        self.ensure_ready()?;
        self.port.write_file(name, bytes).await
    }

    pub async fn read_file(&self, name: &str) -> ClipdeckResult<Option<Vec<u8>>> {
        self.ensure_ready()?;
        self.port.read_file(name).await
    }

    pub async fn delete_file(&self, name: &str) -> ClipdeckResult<()> {
        self.ensure_ready()?;
        self.port.delete_file(name).await
    }
}

/// Reject names that would escape the engine's flat namespace
pub(crate) fn validate_name(name: &str) -> ClipdeckResult<()> {
    if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(ClipdeckError::InvalidFileName {
            name: name.to_string(),
        });
    }
    Ok(())
}
