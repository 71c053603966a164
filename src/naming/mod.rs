//! Engine namespace mapping
//!
//! Deterministic mapping from tracked-file identities to the names used in
//! the engine's flat file namespace. Two distinct tracked files never share
//! an input or proxy name, and two process invocations never share an output
//! name, even within the same millisecond.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::session::FileId;

/// Fixed engine-side slot for preview output. Only one preview is ever in
/// flight; each run overwrites the previous one.
pub const PREVIEW_NAME: &str = "preview.mp4";

/// Generic source placeholder used in canonical command text
pub const INPUT_PLACEHOLDER: &str = "input.mp4";

/// Generic result placeholder used in canonical command text
pub const OUTPUT_PLACEHOLDER: &str = "output.mp4";

static OUTPUT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Engine-visible name for a tracked file's raw input bytes
pub fn input_name(id: &FileId) -> String {
    format!("input_{}.mp4", id)
}

/// Engine-visible name for a tracked file's low-resolution proxy
pub fn proxy_name(id: &FileId) -> String {
    format!("proxy_{}.mp4", id)
}

/// Mint a collision-resistant output name for one process invocation.
///
/// Combines the current unix-millis timestamp with a process-wide monotonic
/// counter, so rapid repeated invocations inside one millisecond still get
/// distinct names and read-back never races a previous run's leftover file.
pub fn unique_output_name() -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let seq = OUTPUT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("output_{}_{}.mp4", millis, seq)
}

/// File name offered to the user for a downloaded process result
pub fn download_name() -> String {
    format!("processed_{}.mp4", chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_and_proxy_names_are_distinct_per_file() {
        let a = FileId::new();
        let b = FileId::new();
        assert_ne!(input_name(&a), input_name(&b));
        assert_ne!(proxy_name(&a), proxy_name(&b));
        assert_ne!(input_name(&a), proxy_name(&a));
    }

    #[test]
    fn input_name_embeds_the_id() {
        let id = FileId::new();
        assert_eq!(input_name(&id), format!("input_{}.mp4", id));
        assert_eq!(proxy_name(&id), format!("proxy_{}.mp4", id));
    }

    #[test]
    fn unique_output_names_never_collide_within_one_millisecond() {
        // Minting a burst back to back forces the same-millisecond window;
        // the sequence counter must keep the names apart anyway.
        let names: Vec<String> = (0..64).map(|_| unique_output_name()).collect();
        let mut deduped = names.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), names.len());
    }

    #[test]
    fn unique_output_name_matches_timestamp_pattern() {
        let name = unique_output_name();
        assert!(name.starts_with("output_"));
        assert!(name.ends_with(".mp4"));
        let stem = name
            .trim_start_matches("output_")
            .trim_end_matches(".mp4");
        let mut parts = stem.split('_');
        let millis: i64 = parts.next().unwrap().parse().unwrap();
        let _seq: u64 = parts.next().unwrap().parse().unwrap();
        assert!(millis > 0);
        assert!(parts.next().is_none());
    }
}
