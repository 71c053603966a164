//! Clipdeck core library
//!
//! Command/session orchestration for a drag-and-drop video dashboard. The
//! crate maintains a virtual namespace mapping tracked source files to
//! engine-visible names, translates structured operation parameters into a
//! single editable command string, rewrites that command for two execution
//! contexts (fast truncated preview vs. full-fidelity process-and-download),
//! and manages the life cycle of sources and their derived artifacts against
//! a minimal, single-writer multimedia engine reached through an async port.

pub mod cli;
pub mod command;
pub mod config;
pub mod engine;
pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod session;
pub mod utils;

// Re-export commonly used types
pub use command::{
    build, tokenize, CommandLine, CommandState, Crf, Operation, OperationKind, Preset,
};
pub use config::{ConfigStore, EngineSource};
pub use engine::{EngineHandle, EnginePort, MemoryEngine, SandboxEngine};
pub use error::{ClipdeckError, ClipdeckResult};
pub use orchestrator::{Orchestrator, OutputArtifact, PreviewArtifact};
pub use session::{FileId, FileStatus, SessionStore, SourceFile, TrackedFile};
