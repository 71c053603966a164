//! In-memory engine adapter
//!
//! A deterministic engine used by the integration tests and by offline
//! dry-runs. The namespace is a plain map; `exec` treats the final argument
//! as the output name and writes the concatenated bytes of every `-i` input
//! into it, which is enough structure to observe the orchestrator's rewrite
//! and read-back behavior. Failure modes are scriptable per call.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::EngineSource;
use crate::engine::EnginePort;
use crate::error::{ClipdeckError, ClipdeckResult};

#[derive(Default)]
struct MemoryState {
    files: HashMap<String, Vec<u8>>,
    exec_log: Vec<Vec<String>>,
    fail_next_exec: bool,
    suppress_output: bool,
    loaded: bool,
}

/// Deterministic engine over an in-memory namespace
#[derive(Default)]
pub struct MemoryEngine {
    state: Mutex<MemoryState>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every argv passed to `exec`, in call order
    pub fn exec_log(&self) -> Vec<Vec<String>> {
        self.state.lock().expect("state lock poisoned").exec_log.clone()
    }

    /// Make the next `exec` fail with an execution error
    pub fn fail_next_exec(&self) {
        self.state.lock().expect("state lock poisoned").fail_next_exec = true;
    }

    /// When set, `exec` succeeds but writes no output file, modeling an
    /// engine that exits non-fatally without producing the expected result.
    pub fn suppress_output(&self, suppress: bool) {
        self.state.lock().expect("state lock poisoned").suppress_output = suppress;
    }

    /// Names currently present in the namespace, sorted
    pub fn file_names(&self) -> Vec<String> {
        let state = self.state.lock().expect("state lock poisoned");
        let mut names: Vec<String> = state.files.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains_file(&self, name: &str) -> bool {
        self.state
            .lock()
            .expect("state lock poisoned")
            .files
            .contains_key(name)
    }
}

#[async_trait]
impl EnginePort for MemoryEngine {
    async fn load(&self, _source: &EngineSource) -> ClipdeckResult<()> {
        self.state.lock().expect("state lock poisoned").loaded = true;
        Ok(())
    }

    async fn exec(&self, args: &[String]) -> ClipdeckResult<()> {
        let mut state = self.state.lock().expect("state lock poisoned");
        state.exec_log.push(args.to_vec());

        if state.fail_next_exec {
            state.fail_next_exec = false;
            return Err(ClipdeckError::ExecutionFailure {
                message: "scripted failure".to_string(),
            });
        }

        let output = match args.last() {
            Some(name) => name.clone(),
            None => {
                return Err(ClipdeckError::ExecutionFailure {
                    message: "no arguments".to_string(),
                })
            }
        };

        let mut payload = Vec::new();
        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            if arg == "-i" {
                let name = iter.next().ok_or_else(|| ClipdeckError::ExecutionFailure {
                    message: "-i without a file name".to_string(),
                })?;
                let bytes =
                    state
                        .files
                        .get(name)
                        .ok_or_else(|| ClipdeckError::ExecutionFailure {
                            message: format!("{}: no such file", name),
                        })?;
                payload.extend_from_slice(bytes);
            }
        }

        if !state.suppress_output {
            state.files.insert(output, payload);
        }
        Ok(())
    }

    async fn write_file(&self, name: &str, bytes: &[u8]) -> ClipdeckResult<()> {
        self.state
            .lock()
            .expect("state lock poisoned")
            .files
            .insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn read_file(&self, name: &str) -> ClipdeckResult<Option<Vec<u8>>> {
        Ok(self
            .state
            .lock()
            .expect("state lock poisoned")
            .files
            .get(name)
            .cloned())
    }

    async fn delete_file(&self, name: &str) -> ClipdeckResult<()> {
        self.state
            .lock()
            .expect("state lock poisoned")
            .files
            .remove(name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn exec_concatenates_inputs_into_the_output_name() {
        let engine = MemoryEngine::new();
        engine.write_file("a.mp4", b"AA").await.unwrap();
        engine.write_file("b.mp4", b"BB").await.unwrap();

        engine
            .exec(&argv(&["-i", "a.mp4", "-i", "b.mp4", "out.mp4"]))
            .await
            .unwrap();

        assert_eq!(
            engine.read_file("out.mp4").await.unwrap(),
            Some(b"AABB".to_vec())
        );
        assert_eq!(engine.exec_log().len(), 1);
    }

    #[tokio::test]
    async fn missing_input_fails_the_exec() {
        let engine = MemoryEngine::new();
        let result = engine.exec(&argv(&["-i", "absent.mp4", "out.mp4"])).await;
        assert!(matches!(result, Err(ClipdeckError::ExecutionFailure { .. })));
        assert!(!engine.contains_file("out.mp4"));
    }

    #[tokio::test]
    async fn scripted_failure_applies_to_one_exec_only() {
        let engine = MemoryEngine::new();
        engine.write_file("a.mp4", b"AA").await.unwrap();
        engine.fail_next_exec();

        assert!(engine.exec(&argv(&["-i", "a.mp4", "out.mp4"])).await.is_err());
        assert!(engine.exec(&argv(&["-i", "a.mp4", "out.mp4"])).await.is_ok());
    }

    #[tokio::test]
    async fn suppressed_output_leaves_the_namespace_untouched() {
        let engine = MemoryEngine::new();
        engine.write_file("a.mp4", b"AA").await.unwrap();
        engine.suppress_output(true);

        engine.exec(&argv(&["-i", "a.mp4", "out.mp4"])).await.unwrap();
        assert!(!engine.contains_file("out.mp4"));
    }
}
