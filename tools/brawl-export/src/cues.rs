//! Animation cue tables
//!
//! The authoring `.cfg` has one cue per line, tab separated:
//! `start<TAB>length<TAB>(unused)<TAB>fps`. Line order is cue order.

use std::path::Path;

use anyhow::{Context, Result, bail};
use brawl_common::AnimationCue;

/// Parse a cue table. Blank lines are skipped.
pub fn parse_cues(text: &str) -> Result<Vec<AnimationCue>> {
    let mut cues = Vec::new();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() < 4 {
            bail!(
                "line {}: expected 4 tab-separated fields, found {}",
                number + 1,
                fields.len()
            );
        }

        let field = |index: usize, name: &str| -> Result<u16> {
            let value = fields[index].trim();
            value
                .parse()
                .with_context(|| format!("line {}: invalid {} {:?}", number + 1, name, value))
        };
        let start = field(0, "start")?;
        let length = field(1, "length")?;
        let fps = field(3, "fps")?;
        cues.push(AnimationCue::new(start, length, fps));
    }
    Ok(cues)
}

pub fn load_cues(path: &Path) -> Result<Vec<AnimationCue>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read animation table: {:?}", path))?;
    parse_cues(&text).with_context(|| format!("Failed to parse animation table: {:?}", path))
}
