//! Timestamp parsing and formatting utilities
//!
//! The command surface carries trim points as `HH:MM:SS` text. The core
//! passes that text through untouched; these helpers let the CLI check the
//! format of its own inputs before they reach a command.

use crate::error::{ClipdeckError, ClipdeckResult};

/// Parse an `HH:MM:SS` timestamp to total seconds
pub fn parse_hms(time_str: &str) -> ClipdeckResult<u64> {
    let invalid = || ClipdeckError::InvalidTimeFormat {
        time: time_str.to_string(),
    };

    let parts: Vec<&str> = time_str.trim().split(':').collect();
    if parts.len() != 3 {
        return Err(invalid());
    }

    let hours: u64 = parts[0].parse().map_err(|_| invalid())?;
    let minutes: u64 = parts[1].parse().map_err(|_| invalid())?;
    let seconds: u64 = parts[2].parse().map_err(|_| invalid())?;

    if minutes >= 60 || seconds >= 60 {
        return Err(invalid());
    }

    Ok(hours * 3600 + minutes * 60 + seconds)
}

/// Format total seconds as `HH:MM:SS`
pub fn format_hms(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_timestamps() {
        assert_eq!(parse_hms("00:00:05").unwrap(), 5);
        assert_eq!(parse_hms("00:01:30").unwrap(), 90);
        assert_eq!(parse_hms("01:02:03").unwrap(), 3723);
    }

    #[test]
    fn rejects_malformed_timestamps() {
        for bad in ["5", "00:05", "00:00:60", "00:61:00", "aa:bb:cc", ""] {
            assert!(
                matches!(parse_hms(bad), Err(ClipdeckError::InvalidTimeFormat { .. })),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn format_round_trips_through_parse() {
        for seconds in [0, 5, 90, 3723, 86399] {
            assert_eq!(parse_hms(&format_hms(seconds)).unwrap(), seconds);
        }
    }
}
