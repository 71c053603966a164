//! Command text tokenizer
//!
//! Splits a command string into the argument vector the engine adapter
//! expects. The dialect is deliberately minimal: whitespace-separated
//! tokens, with a double-quoted span (no escape support) kept as one token
//! and its quotes stripped. A leading literal `ffmpeg` token, historically
//! prefixed to every generated command, is dropped.

/// Tokenize command text into a bare argument vector.
///
/// Idempotent: feeding an already-unprefixed, already-unquoted command back
/// in yields the same vector. Empty or whitespace-only text yields an empty
/// vector, which callers must treat as "nothing to run".
pub fn tokenize(text: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                // Quoted span: consumed whole, quotes stripped, glued to any
                // adjacent unquoted characters.
                in_token = true;
                for q in chars.by_ref() {
                    if q == '"' {
                        break;
                    }
                    current.push(q);
                }
            }
            c if c.is_whitespace() => {
                if in_token {
                    args.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                in_token = true;
                current.push(c);
            }
        }
    }
    if in_token {
        args.push(current);
    }

    if args.first().map(String::as_str) == Some("ffmpeg") {
        args.remove(0);
    }
    args
}
