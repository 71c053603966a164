//! Canonical command construction
//!
//! Maps a structured [`Operation`] to an argument-vector intermediate
//! representation. The generic `input.mp4`/`output.mp4` placeholders keep
//! the rendered text readable and independent of any particular tracked
//! file; per-invocation name substitution happens later, in the
//! orchestrator. Pure and deterministic, no I/O.

use std::fmt;

use crate::command::Operation;
use crate::naming;

/// One command token, with a display-quoting hint for the rendered text
#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    quoted: bool,
}

/// Argument-vector form of a canonical command.
///
/// `render` produces the user-facing text, prefixed with the historical
/// `ffmpeg` program name; `argv` yields the bare vector the engine adapter
/// expects.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommandLine {
    tokens: Vec<Token>,
}

impl CommandLine {
    fn push(&mut self, text: impl Into<String>) {
        self.tokens.push(Token {
            text: text.into(),
            quoted: false,
        });
    }

    fn push_quoted(&mut self, text: impl Into<String>) {
        self.tokens.push(Token {
            text: text.into(),
            quoted: true,
        });
    }

    /// An empty command signals "not ready"; both preview and process treat
    /// it as a no-op.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Bare argument vector, without the program-name prefix
    pub fn argv(&self) -> Vec<String> {
        self.tokens.iter().map(|t| t.text.clone()).collect()
    }

    /// Render to the editable text surface. Quoted tokens keep their double
    /// quotes so the text survives a round trip through the tokenizer.
    pub fn render(&self) -> String {
        if self.tokens.is_empty() {
            return String::new();
        }
        let mut out = String::from("ffmpeg");
        for token in &self.tokens {
            out.push(' ');
            if token.quoted {
                out.push('"');
                out.push_str(&token.text);
                out.push('"');
            } else {
                out.push_str(&token.text);
            }
        }
        out
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Build the canonical command for an operation.
///
/// Mix with fewer than two files yields an empty command.
pub fn build(op: &Operation) -> CommandLine {
    let mut cmd = CommandLine::default();
    match op {
        Operation::Crop {
            width,
            height,
            x_offset,
            y_offset,
        } => {
            cmd.push("-i");
            cmd.push(naming::INPUT_PLACEHOLDER);
            cmd.push("-vf");
            cmd.push_quoted(format!("crop={}:{}:{}:{}", width, height, x_offset, y_offset));
            cmd.push(naming::OUTPUT_PLACEHOLDER);
        }
        Operation::Trim { start, end } => {
            cmd.push("-i");
            cmd.push(naming::INPUT_PLACEHOLDER);
            cmd.push("-ss");
            cmd.push(start.clone());
            cmd.push("-to");
            cmd.push(end.clone());
            cmd.push("-c");
            cmd.push("copy");
            cmd.push(naming::OUTPUT_PLACEHOLDER);
        }
        Operation::Compress { crf, preset } => {
            cmd.push("-i");
            cmd.push(naming::INPUT_PLACEHOLDER);
            cmd.push("-c:v");
            cmd.push("libx264");
            cmd.push("-crf");
            cmd.push(crf.to_string());
            cmd.push("-preset");
            cmd.push(preset.as_str());
            cmd.push(naming::OUTPUT_PLACEHOLDER);
        }
        Operation::Mix { ordered_file_ids } => {
            if ordered_file_ids.len() < 2 {
                return cmd;
            }
            for id in ordered_file_ids {
                cmd.push("-i");
                cmd.push(naming::input_name(id));
            }
            let mut filter = String::new();
            for i in 0..ordered_file_ids.len() {
                filter.push_str(&format!("[{i}:v][{i}:a]"));
            }
            filter.push_str(&format!(
                "concat=n={}:v=1:a=1[v][a]",
                ordered_file_ids.len()
            ));
            cmd.push("-filter_complex");
            cmd.push_quoted(filter);
            cmd.push("-map");
            cmd.push_quoted("[v]");
            cmd.push("-map");
            cmd.push_quoted("[a]");
            cmd.push(naming::OUTPUT_PLACEHOLDER);
        }
    }
    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::{tokenize, Crf, Preset};
    use crate::session::FileId;

    fn count_occurrences(haystack: &str, needle: &str) -> usize {
        haystack.matches(needle).count()
    }

    #[test]
    fn crop_command_shape() {
        let op = Operation::Crop {
            width: 1280,
            height: 720,
            x_offset: 0,
            y_offset: 0,
        };
        let text = build(&op).render();
        assert_eq!(
            text,
            "ffmpeg -i input.mp4 -vf \"crop=1280:720:0:0\" output.mp4"
        );
    }

    #[test]
    fn trim_command_shape() {
        let op = Operation::Trim {
            start: "00:00:05".to_string(),
            end: "00:00:10".to_string(),
        };
        let text = build(&op).render();
        assert_eq!(
            text,
            "ffmpeg -i input.mp4 -ss 00:00:05 -to 00:00:10 -c copy output.mp4"
        );
    }

    #[test]
    fn compress_command_shape() {
        let op = Operation::Compress {
            crf: Crf::new(28).unwrap(),
            preset: Preset::Fast,
        };
        let text = build(&op).render();
        assert_eq!(
            text,
            "ffmpeg -i input.mp4 -c:v libx264 -crf 28 -preset fast output.mp4"
        );
    }

    #[test]
    fn single_file_commands_contain_exactly_one_of_each_placeholder() {
        let ops = vec![
            Operation::Crop {
                width: 640,
                height: 480,
                x_offset: 10,
                y_offset: 20,
            },
            Operation::Trim {
                start: "00:00:00".to_string(),
                end: "00:01:00".to_string(),
            },
            Operation::Compress {
                crf: Crf::default(),
                preset: Preset::default(),
            },
        ];
        for op in ops {
            let text = build(&op).render();
            assert_eq!(count_occurrences(&text, "input.mp4"), 1, "{}", text);
            assert_eq!(count_occurrences(&text, "output.mp4"), 1, "{}", text);
        }
    }

    #[test]
    fn built_commands_round_trip_through_the_tokenizer() {
        let op = Operation::Crop {
            width: 1920,
            height: 1080,
            x_offset: 0,
            y_offset: 0,
        };
        let cmd = build(&op);
        let argv = tokenize(&cmd.render());
        assert_eq!(argv, cmd.argv());
        // -i, input, -vf, filter, output
        assert_eq!(argv.len(), 5);

        let op = Operation::Trim {
            start: "00:00:05".to_string(),
            end: "00:00:10".to_string(),
        };
        let cmd = build(&op);
        assert_eq!(tokenize(&cmd.render()).len(), 9);

        let op = Operation::Compress {
            crf: Crf::default(),
            preset: Preset::default(),
        };
        let cmd = build(&op);
        assert_eq!(tokenize(&cmd.render()).len(), 9);
    }

    #[test]
    fn mix_builds_one_stream_pair_per_file_and_parameterizes_concat() {
        let ids: Vec<FileId> = (0..3).map(|_| FileId::new()).collect();
        let op = Operation::Mix {
            ordered_file_ids: ids.clone(),
        };
        let text = build(&op).render();

        for (i, id) in ids.iter().enumerate() {
            assert!(text.contains(&format!("-i input_{}.mp4", id)));
            assert!(text.contains(&format!("[{i}:v][{i}:a]")));
        }
        assert!(!text.contains("[3:v]"));
        assert!(text.contains("concat=n=3:v=1:a=1[v][a]"));
        assert!(text.contains("-map \"[v]\" -map \"[a]\""));
        assert_eq!(count_occurrences(&text, "output.mp4"), 1);
    }

    #[test]
    fn mix_inputs_follow_user_selection_order() {
        let a = FileId::new();
        let b = FileId::new();
        let op = Operation::Mix {
            ordered_file_ids: vec![b, a],
        };
        let argv = build(&op).argv();
        assert_eq!(argv[1], format!("input_{}.mp4", b));
        assert_eq!(argv[3], format!("input_{}.mp4", a));
    }

    #[test]
    fn mix_with_fewer_than_two_files_is_empty() {
        let op = Operation::Mix {
            ordered_file_ids: vec![FileId::new()],
        };
        let cmd = build(&op);
        assert!(cmd.is_empty());
        assert_eq!(cmd.render(), "");

        let op = Operation::Mix {
            ordered_file_ids: Vec::new(),
        };
        assert!(build(&op).is_empty());
    }
}
