//! Session store for tracked source files
//!
//! One `SessionStore` exists for the life of the page/process. It owns the
//! ordered collection of user-supplied files, their statuses, and the single
//! selection slot. Insertion order is display order; it only carries meaning
//! for the mix operation, which concatenates in user-selection order.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::error::{ClipdeckError, ClipdeckResult};

/// Opaque identity of a tracked file. Generated at intake, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct FileId(Uuid);

impl FileId {
    /// Generate a fresh id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for FileId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status of a tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Registered but not yet picked up for processing
    Idle,
    /// Proxy generation pending or running
    Processing,
    /// Proxy generated; file is fully usable
    Ready,
    /// Proxy generation failed; other files are unaffected
    Error,
}

/// A user-supplied source file queued for intake
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Original file name as supplied by the user
    pub name: String,
    /// Declared media type, e.g. `video/mp4`
    pub media_type: String,
    /// Raw input bytes
    pub bytes: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: Arc::from(bytes),
        }
    }
}

/// One tracked source file owned by the session store
#[derive(Debug, Clone)]
pub struct TrackedFile {
    id: FileId,
    name: String,
    media_type: String,
    bytes: Arc<[u8]>,
    status: FileStatus,
}

impl TrackedFile {
    pub fn id(&self) -> FileId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    /// Immutable handle to the raw input bytes
    pub fn bytes(&self) -> Arc<[u8]> {
        Arc::clone(&self.bytes)
    }

    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }
}

/// Ordered collection of tracked files plus the selection slot.
///
/// Invariant: `selected` is always either `None` or the id of an existing
/// entry. Every mutation preserves this.
#[derive(Debug, Default)]
pub struct SessionStore {
    files: Vec<TrackedFile>,
    selected: Option<FileId>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch of dropped files.
    ///
    /// Each file gets a fresh id and enters in `Processing` status, appended
    /// in input order. The last file of the batch becomes the selection:
    /// the most recently added file is what the user most likely wants to
    /// operate on next.
    pub fn add_files(&mut self, sources: Vec<SourceFile>) -> Vec<FileId> {
        let mut ids = Vec::with_capacity(sources.len());
        for source in sources {
            let id = FileId::new();
            self.files.push(TrackedFile {
                id,
                name: source.name,
                media_type: source.media_type,
                bytes: source.bytes,
                status: FileStatus::Processing,
            });
            ids.push(id);
        }
        if let Some(last) = ids.last() {
            self.selected = Some(*last);
        }
        ids
    }

    /// Remove a tracked file. If it was selected, the selection becomes
    /// empty; no neighbor is auto-selected. Returns whether an entry was
    /// removed. Engine-side blobs are not reclaimed here.
    pub fn remove_file(&mut self, id: FileId) -> bool {
        let before = self.files.len();
        self.files.retain(|f| f.id != id);
        let removed = self.files.len() != before;
        if removed && self.selected == Some(id) {
            self.selected = None;
        }
        removed
    }

    /// Set the selection if the id exists; no-op otherwise
    pub fn select_file(&mut self, id: FileId) {
        if self.contains(id) {
            self.selected = Some(id);
        }
    }

    /// The only path by which a file leaves `Processing`
    pub fn update_status(&mut self, id: FileId, status: FileStatus) -> ClipdeckResult<()> {
        let file = self
            .files
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| ClipdeckError::UnknownFile { id: id.to_string() })?;
        file.status = status;
        Ok(())
    }

    pub fn contains(&self, id: FileId) -> bool {
        self.files.iter().any(|f| f.id == id)
    }

    pub fn get(&self, id: FileId) -> Option<&TrackedFile> {
        self.files.iter().find(|f| f.id == id)
    }

    /// Tracked files in insertion order
    pub fn files(&self) -> &[TrackedFile] {
        &self.files
    }

    pub fn selected_id(&self) -> Option<FileId> {
        self.selected
    }

    pub fn selected(&self) -> Option<&TrackedFile> {
        self.selected.and_then(|id| self.get(id))
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source(name: &str) -> SourceFile {
        SourceFile::new(name, "video/mp4", vec![1, 2, 3])
    }

    #[test]
    fn add_files_appends_in_input_order_and_selects_the_last() {
        let mut store = SessionStore::new();
        let ids = store.add_files(vec![source("a.mp4"), source("b.mp4"), source("c.mp4")]);

        assert_eq!(store.len(), 3);
        let names: Vec<&str> = store.files().iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["a.mp4", "b.mp4", "c.mp4"]);
        assert_eq!(store.selected_id(), Some(ids[2]));
        assert!(store
            .files()
            .iter()
            .all(|f| f.status() == FileStatus::Processing));
    }

    #[test]
    fn ids_are_unique_across_batches() {
        let mut store = SessionStore::new();
        let first = store.add_files(vec![source("a.mp4")]);
        let second = store.add_files(vec![source("b.mp4")]);
        assert_ne!(first[0], second[0]);
    }

    #[test]
    fn remove_selected_file_clears_selection() {
        let mut store = SessionStore::new();
        let ids = store.add_files(vec![source("a.mp4"), source("b.mp4")]);

        assert_eq!(store.selected_id(), Some(ids[1]));
        assert!(store.remove_file(ids[1]));
        assert_eq!(store.selected_id(), None);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn remove_unselected_file_keeps_selection() {
        let mut store = SessionStore::new();
        let ids = store.add_files(vec![source("a.mp4"), source("b.mp4")]);

        assert!(store.remove_file(ids[0]));
        assert_eq!(store.selected_id(), Some(ids[1]));
    }

    #[test]
    fn select_unknown_id_is_a_no_op() {
        let mut store = SessionStore::new();
        let ids = store.add_files(vec![source("a.mp4")]);

        store.select_file(FileId::new());
        assert_eq!(store.selected_id(), Some(ids[0]));
    }

    #[test]
    fn update_status_transitions_a_single_file() {
        let mut store = SessionStore::new();
        let ids = store.add_files(vec![source("a.mp4"), source("b.mp4")]);

        store.update_status(ids[0], FileStatus::Ready).unwrap();
        assert_eq!(store.get(ids[0]).unwrap().status(), FileStatus::Ready);
        assert_eq!(store.get(ids[1]).unwrap().status(), FileStatus::Processing);
    }

    #[test]
    fn update_status_for_unknown_id_fails() {
        let mut store = SessionStore::new();
        let result = store.update_status(FileId::new(), FileStatus::Ready);
        assert!(matches!(result, Err(ClipdeckError::UnknownFile { .. })));
    }
}
