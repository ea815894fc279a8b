//! Reading wall profiles
//!
//! The profiles file holds one profile per line, each line a list of
//! whitespace-separated section heights in feet:
//!
//! ```text
//! 21 25 28
//! 17
//! 17 22 17 19 17
//! ```
//!
//! Profiles are numbered by line, starting at 1. Reading stops at the first
//! blank line.

use crate::error::InputError;
use crate::partition::Profiles;
use std::fs;
use std::path::Path;
use tracing::info;

/// Read and parse a profiles file
pub fn read_profiles(path: &Path) -> Result<Profiles, InputError> {
    info!(path = %path.display(), "Reading wall profiles");

    if !path.exists() {
        return Err(InputError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path).map_err(|source| InputError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let profiles = parse_profiles(&text)?;
    if profiles.is_empty() {
        return Err(InputError::Empty {
            path: path.to_path_buf(),
        });
    }

    info!(
        profiles = profiles.len(),
        sections = profiles.section_count(),
        "Wall profiles loaded"
    );
    Ok(profiles)
}

/// Parse profile lines from text
///
/// An empty result is not an error here; [`read_profiles`] decides that.
pub fn parse_profiles(text: &str) -> Result<Profiles, InputError> {
    let mut rows = Vec::new();

    for (line_idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let heights = line
            .split_whitespace()
            .enumerate()
            .map(|(col_idx, token)| {
                token.parse::<u32>().map_err(|_| InputError::InvalidHeight {
                    line: line_idx + 1,
                    column: col_idx + 1,
                    token: token.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        rows.push(heights);
    }

    Ok(Profiles::from_rows(rows))
}
