//! Command model for the four dashboard operations
//!
//! Operations are structured values; the builder turns them into an
//! argument-vector representation with a render-to-text step for the
//! editable command surface. The text form exists for the user; execution
//! always goes back through the tokenizer.

use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::error::{ClipdeckError, ClipdeckResult};
use crate::session::FileId;

pub mod builder;
pub mod tokenizer;

pub use builder::{build, CommandLine};
pub use tokenizer::tokenize;

/// Constant Rate Factor, constrained to the x264 range `0..=51`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Crf(u8);

impl Crf {
    pub const MAX: u8 = 51;

    /// Create a CRF value, rejecting anything above 51
    pub fn new(value: u8) -> ClipdeckResult<Self> {
        if value > Self::MAX {
            return Err(ClipdeckError::InvalidParameter {
                message: format!("CRF must be in 0..=51, got {}", value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Crf {
    fn default() -> Self {
        Self(23)
    }
}

impl fmt::Display for Crf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// x264 speed/quality preset ladder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    Ultrafast,
    Superfast,
    Veryfast,
    Faster,
    Fast,
    Medium,
    Slow,
    Slower,
    Veryslow,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Ultrafast => "ultrafast",
            Preset::Superfast => "superfast",
            Preset::Veryfast => "veryfast",
            Preset::Faster => "faster",
            Preset::Fast => "fast",
            Preset::Medium => "medium",
            Preset::Slow => "slow",
            Preset::Slower => "slower",
            Preset::Veryslow => "veryslow",
        }
    }

    /// All presets, fastest first
    pub fn ladder() -> &'static [Preset] {
        &[
            Preset::Ultrafast,
            Preset::Superfast,
            Preset::Veryfast,
            Preset::Faster,
            Preset::Fast,
            Preset::Medium,
            Preset::Slow,
            Preset::Slower,
            Preset::Veryslow,
        ]
    }
}

impl Default for Preset {
    fn default() -> Self {
        Preset::Medium
    }
}

impl FromStr for Preset {
    type Err = ClipdeckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ladder()
            .iter()
            .find(|p| p.as_str() == s)
            .copied()
            .ok_or_else(|| ClipdeckError::InvalidParameter {
                message: format!(
                    "Unknown preset: {}. Valid presets: ultrafast, superfast, veryfast, \
                     faster, fast, medium, slow, slower, veryslow",
                    s
                ),
            })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured parameters for one dashboard operation
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// Spatial crop via a filter-graph expression
    Crop {
        width: u32,
        height: u32,
        x_offset: u32,
        y_offset: u32,
    },
    /// Keyframe-accurate trim with stream copy. Timestamps are `HH:MM:SS`
    /// text; the range itself is not validated here, the engine surfaces a
    /// failure for a meaningless range.
    Trim { start: String, end: String },
    /// Full re-encode with quality controls
    Compress { crf: Crf, preset: Preset },
    /// N-way concatenation in user-selection order. Fewer than two entries
    /// builds an empty command.
    Mix { ordered_file_ids: Vec<FileId> },
}

impl Operation {
    pub fn kind(&self) -> OperationKind {
        match self {
            Operation::Crop { .. } => OperationKind::Crop,
            Operation::Trim { .. } => OperationKind::Trim,
            Operation::Compress { .. } => OperationKind::Compress,
            Operation::Mix { .. } => OperationKind::Mix,
        }
    }
}

/// Discriminant of [`Operation`], used where only the variant matters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Crop,
    Trim,
    Compress,
    Mix,
}

impl OperationKind {
    /// Mix reads its inputs directly from concrete engine names; the other
    /// operations go through the generic `input.mp4` placeholder.
    pub fn uses_input_placeholder(&self) -> bool {
        !matches!(self, OperationKind::Mix)
    }
}

/// The single editable command buffer shared across operations.
///
/// Machine-generated text and user edits land in the same slot; an edit
/// survives verbatim until the active operation's parameters change and
/// regenerate the text.
#[derive(Debug, Clone, Default)]
pub struct CommandState {
    text: String,
}

impl CommandState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the buffer with the canonical command for `op`
    pub fn regenerate(&mut self, op: &Operation) -> &str {
        self.text = build(op).render();
        &self.text
    }

    /// Store a verbatim user edit
    pub fn set_override(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crf_rejects_values_above_51() {
        assert!(Crf::new(51).is_ok());
        assert!(matches!(
            Crf::new(52),
            Err(ClipdeckError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn preset_round_trips_through_from_str() {
        for preset in Preset::ladder() {
            assert_eq!(preset.as_str().parse::<Preset>().unwrap(), *preset);
        }
        assert!("warpspeed".parse::<Preset>().is_err());
    }

    #[test]
    fn command_state_keeps_user_edit_until_regenerated() {
        let op = Operation::Compress {
            crf: Crf::default(),
            preset: Preset::default(),
        };
        let mut state = CommandState::new();
        state.regenerate(&op);
        let generated = state.text().to_string();

        state.set_override("ffmpeg -i input.mp4 -vf hflip output.mp4");
        assert_eq!(state.text(), "ffmpeg -i input.mp4 -vf hflip output.mp4");

        state.regenerate(&op);
        assert_eq!(state.text(), generated);
    }
}
