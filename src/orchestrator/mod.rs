//! Execution orchestrator
//!
//! The only component that drives the engine. Owns the session store, the
//! queue of files waiting for proxy generation, and the current preview
//! artifact. Three flows run through here: proxy generation at intake, the
//! bounded disposable preview, and the full-fidelity process run that yields
//! a downloadable artifact. Within one flow the write, exec, and read steps
//! are strictly ordered, and the engine handle serializes exec calls, so the
//! engine namespace has a single writer.

use std::collections::VecDeque;

use tracing::{debug, info, warn};

use crate::command::{tokenize, OperationKind};
use crate::config::EngineSource;
use crate::engine::EngineHandle;
use crate::error::{ClipdeckError, ClipdeckResult};
use crate::naming;
use crate::session::{FileId, FileStatus, SessionStore, SourceFile};

/// Hard duration cap for preview runs, in seconds
const PREVIEW_DURATION_SECS: &str = "3";

/// Proxy transcode shape: bounded width, fastest preset, high compression
const PROXY_FILTER: &str = "scale=480:-1";
const PROXY_CRF: &str = "30";

const VIDEO_MP4: &str = "video/mp4";

/// In-page preview resource produced by a preview run
#[derive(Debug, Clone)]
pub struct PreviewArtifact {
    pub bytes: Vec<u8>,
    pub media_type: String,
}

/// Downloadable resource produced by a process run
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub bytes: Vec<u8>,
    /// Suggested download file name, timestamp-suffixed
    pub file_name: String,
    pub media_type: String,
}

/// Command/session orchestration over one engine instance
pub struct Orchestrator {
    engine: EngineHandle,
    session: SessionStore,
    pending_proxies: VecDeque<FileId>,
    preview: Option<PreviewArtifact>,
}

impl Orchestrator {
    pub fn new(engine: EngineHandle) -> Self {
        Self {
            engine,
            session: SessionStore::new(),
            pending_proxies: VecDeque::new(),
            preview: None,
        }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Read access to the tracked-file collection
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn select_file(&mut self, id: FileId) {
        self.session.select_file(id);
    }

    /// Remove a tracked file from the session and the pending-proxy queue.
    /// Engine-side blobs for the file are not reclaimed; the namespace is
    /// bounded by the engine instance's lifetime.
    pub fn remove_file(&mut self, id: FileId) -> bool {
        self.pending_proxies.retain(|pending| *pending != id);
        self.session.remove_file(id)
    }

    /// The preview most recently produced, if any
    pub fn current_preview(&self) -> Option<&PreviewArtifact> {
        self.preview.as_ref()
    }

    /// Files still waiting for the engine before proxy generation can run
    pub fn pending_proxy_count(&self) -> usize {
        self.pending_proxies.len()
    }

    /// Load the engine (idempotent) and flush any files that were dropped
    /// while it was still loading. Queued files are processed in drop order.
    pub async fn load_engine(&mut self, source: &EngineSource) -> ClipdeckResult<()> {
        self.engine.load(source).await?;
        self.flush_pending_proxies().await;
        Ok(())
    }

    /// Register dropped files and generate their proxies.
    ///
    /// Files enter as `Processing`. When the engine is ready the proxies are
    /// generated immediately, one file at a time, in drop order; otherwise
    /// the ids are queued and drained by [`Orchestrator::load_engine`].
    pub async fn intake(&mut self, sources: Vec<SourceFile>) -> Vec<FileId> {
        let ids = self.session.add_files(sources);
        if self.engine.is_ready() {
            for id in &ids {
                self.generate_proxy(*id).await;
            }
        } else {
            debug!(count = ids.len(), "engine not ready; queueing proxy generation");
            self.pending_proxies.extend(ids.iter().copied());
        }
        ids
    }

    async fn flush_pending_proxies(&mut self) {
        while let Some(id) = self.pending_proxies.pop_front() {
            // The file may have been removed while it sat in the queue
            if self.session.contains(id) {
                self.generate_proxy(id).await;
            }
        }
    }

    /// One proxy generation attempt. Failure marks only this file; there is
    /// no automatic retry.
    async fn generate_proxy(&mut self, id: FileId) {
        match self.try_generate_proxy(id).await {
            Ok(()) => {
                info!(%id, "proxy generated");
                let _ = self.session.update_status(id, FileStatus::Ready);
            }
            Err(error) => {
                warn!(%id, %error, "proxy generation failed");
                let _ = self.session.update_status(id, FileStatus::Error);
            }
        }
    }

    async fn try_generate_proxy(&self, id: FileId) -> ClipdeckResult<()> {
        let file = self
            .session
            .get(id)
            .ok_or_else(|| ClipdeckError::UnknownFile { id: id.to_string() })?;
        let input = naming::input_name(&id);
        let proxy = naming::proxy_name(&id);

        let attempt = async {
            self.engine.write_file(&input, &file.bytes()).await?;
            let args: Vec<String> = [
                "-i",
                input.as_str(),
                "-vf",
                PROXY_FILTER,
                "-c:v",
                "libx264",
                "-preset",
                "ultrafast",
                "-crf",
                PROXY_CRF,
                proxy.as_str(),
            ]
            .iter()
            .map(|s| s.to_string())
            .collect();
            self.engine.exec(&args).await
        };

        attempt
            .await
            .map_err(|e| ClipdeckError::ProxyGenerationFailure {
                file: file.name().to_string(),
                message: e.to_string(),
            })
    }

    /// Run a bounded, disposable preview of the current command.
    ///
    /// The command text is rewritten for the preview context: concrete input
    /// name for non-mix operations, the fixed `preview.mp4` output slot, any
    /// stream-copy directive stripped (a copied stream truncated at an
    /// arbitrary offset can be unplayable), and a 3-second cap plus fastest
    /// preset injected ahead of the trailing output argument. On success the
    /// stored preview is replaced; on failure it is left untouched.
    pub async fn preview(
        &mut self,
        command_text: &str,
        kind: OperationKind,
    ) -> ClipdeckResult<&PreviewArtifact> {
        if !self.engine.is_ready() {
            return Err(ClipdeckError::EngineNotReady);
        }

        let mut text = command_text.to_string();
        if kind.uses_input_placeholder() {
            if let Some(selected) = self.session.selected_id() {
                text = text.replacen(
                    naming::INPUT_PLACEHOLDER,
                    &naming::input_name(&selected),
                    1,
                );
            }
        }
        let text = text.replacen(naming::OUTPUT_PLACEHOLDER, naming::PREVIEW_NAME, 1);

        let mut args = tokenize(&text);
        if args.is_empty() {
            return Err(ClipdeckError::EmptyCommand);
        }
        strip_stream_copy(&mut args);
        inject_preview_flags(&mut args);

        debug!(?args, "running preview");
        self.engine.exec(&args).await?;

        match self.engine.read_file(naming::PREVIEW_NAME).await? {
            Some(bytes) => {
                info!(size = bytes.len(), "preview ready");
                Ok(self.preview.insert(PreviewArtifact {
                    bytes,
                    media_type: VIDEO_MP4.to_string(),
                }))
            }
            None => Err(ClipdeckError::MissingOutput {
                name: naming::PREVIEW_NAME.to_string(),
            }),
        }
    }

    /// Run the full-fidelity process and package the result for download.
    ///
    /// Every `output.mp4` occurrence is replaced with a freshly minted
    /// unique name, so read-back can never pick up a previous run's
    /// leftovers; a download is only offered when that exact name reads
    /// back non-null. The transient engine-side output is deleted
    /// afterwards; a failed delete is tolerated.
    pub async fn process(
        &mut self,
        command_text: &str,
        kind: OperationKind,
    ) -> ClipdeckResult<OutputArtifact> {
        if !self.engine.is_ready() {
            return Err(ClipdeckError::EngineNotReady);
        }

        let mut text = command_text.to_string();
        if kind.uses_input_placeholder() {
            if let Some(selected) = self.session.selected_id() {
                text = text.replacen(
                    naming::INPUT_PLACEHOLDER,
                    &naming::input_name(&selected),
                    1,
                );
            }
        }
        let output_name = naming::unique_output_name();
        let text = text.replace(naming::OUTPUT_PLACEHOLDER, &output_name);

        let args = tokenize(&text);
        if args.is_empty() {
            return Err(ClipdeckError::EmptyCommand);
        }

        debug!(?args, output = %output_name, "running process");
        self.engine.exec(&args).await?;

        match self.engine.read_file(&output_name).await? {
            Some(bytes) => {
                let artifact = OutputArtifact {
                    bytes,
                    file_name: naming::download_name(),
                    media_type: VIDEO_MP4.to_string(),
                };
                if let Err(error) = self.engine.delete_file(&output_name).await {
                    debug!(%error, "transient output cleanup failed");
                }
                info!(file = %artifact.file_name, size = artifact.bytes.len(), "process complete");
                Ok(artifact)
            }
            None => Err(ClipdeckError::MissingOutput { name: output_name }),
        }
    }
}

/// Remove every `-c copy` / `-c:v copy` pair from the argument vector
fn strip_stream_copy(args: &mut Vec<String>) {
    let mut i = 0;
    while i + 1 < args.len() {
        if (args[i] == "-c" || args[i] == "-c:v") && args[i + 1] == "copy" {
            args.drain(i..=i + 1);
        } else {
            i += 1;
        }
    }
}

/// Append the preview cap and fastest preset ahead of the trailing output
/// file argument.
fn inject_preview_flags(args: &mut Vec<String>) {
    let output = args.pop();
    args.push("-t".to_string());
    args.push(PREVIEW_DURATION_SECS.to_string());
    args.push("-preset".to_string());
    args.push("ultrafast".to_string());
    if let Some(output) = output {
        args.push(output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn strip_stream_copy_removes_the_adjacent_pair() {
        let mut args = argv(&["-i", "a.mp4", "-ss", "5", "-c", "copy", "out.mp4"]);
        strip_stream_copy(&mut args);
        assert_eq!(args, argv(&["-i", "a.mp4", "-ss", "5", "out.mp4"]));
    }

    #[test]
    fn strip_stream_copy_handles_the_video_specific_form() {
        let mut args = argv(&["-i", "a.mp4", "-c:v", "copy", "-c", "copy", "out.mp4"]);
        strip_stream_copy(&mut args);
        assert_eq!(args, argv(&["-i", "a.mp4", "out.mp4"]));
    }

    #[test]
    fn strip_stream_copy_leaves_unrelated_tokens_alone() {
        let mut args = argv(&["-i", "copy", "-c", "libx264", "out.mp4"]);
        strip_stream_copy(&mut args);
        assert_eq!(args, argv(&["-i", "copy", "-c", "libx264", "out.mp4"]));
    }

    #[test]
    fn preview_flags_land_before_the_output_argument() {
        let mut args = argv(&["-i", "a.mp4", "preview.mp4"]);
        inject_preview_flags(&mut args);
        assert_eq!(
            args,
            argv(&["-i", "a.mp4", "-t", "3", "-preset", "ultrafast", "preview.mp4"])
        );
    }
}
