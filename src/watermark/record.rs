// src/watermark/record.rs

//! Text format of a watermark record.
//!
//! ```ini
//! [DEFAULT]
//! CommitDateBuildWithSuccess = 1700000000
//! ```
//!
//! Keys compare case-insensitively because older tooling wrote the key
//! lower-cased. Lines that are not ours (other keys, sections, comments)
//! are carried over untouched when a record is rewritten.

use crate::revision::Timestamp;

pub const DEFAULT_SECTION: &str = "DEFAULT";
pub const WATERMARK_KEY: &str = "CommitDateBuildWithSuccess";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Line<'a> {
    Section(&'a str),
    Entry { key: &'a str, value: &'a str },
    Other,
}

fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
        return Line::Other;
    }
    if let Some(name) = trimmed.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        return Line::Section(name.trim());
    }
    match trimmed.find(['=', ':']) {
        Some(idx) => Line::Entry {
            key: trimmed[..idx].trim(),
            value: trimmed[idx + 1..].trim(),
        },
        None => Line::Other,
    }
}

fn is_default(section: Option<&str>) -> bool {
    section.is_some_and(|s| s.eq_ignore_ascii_case(DEFAULT_SECTION))
}

fn is_watermark_key(key: &str) -> bool {
    key.eq_ignore_ascii_case(WATERMARK_KEY)
}

/// Extract the watermark from a record's text.
///
/// Returns a human-readable reason when the record is unusable: missing
/// entry, non-numeric value or a negative timestamp.
pub fn parse_record(text: &str) -> Result<Timestamp, String> {
    let mut section: Option<&str> = None;

    for line in text.lines() {
        match classify(line) {
            Line::Section(name) => section = Some(name),
            Line::Entry { key, value } if is_default(section) && is_watermark_key(key) => {
                let ts = value
                    .parse::<Timestamp>()
                    .map_err(|e| format!("{WATERMARK_KEY} value {value:?} is not an integer: {e}"))?;
                if ts < 0 {
                    return Err(format!("{WATERMARK_KEY} value {ts} is negative"));
                }
                return Ok(ts);
            }
            _ => {}
        }
    }

    Err(format!("no {WATERMARK_KEY} entry in [{DEFAULT_SECTION}]"))
}

/// Render a record holding `timestamp`.
///
/// With `existing` text, the watermark entry is replaced in place (or added
/// to the `[DEFAULT]` section) and everything else is preserved.
pub fn render_record(existing: Option<&str>, timestamp: Timestamp) -> String {
    let entry = format!("{WATERMARK_KEY} = {timestamp}");

    let Some(existing) = existing else {
        return format!("[{DEFAULT_SECTION}]\n{entry}\n\n");
    };

    let mut out: Vec<String> = Vec::new();
    let mut section: Option<&str> = None;
    let mut written = false;
    let mut saw_default = false;

    for line in existing.lines() {
        match classify(line) {
            Line::Section(name) => {
                // Leaving [DEFAULT] without having seen the key: add it here.
                if is_default(section) && !written {
                    insert_before_blank_tail(&mut out, entry.clone());
                    written = true;
                }
                section = Some(name);
                out.push(line.to_string());
                if is_default(section) {
                    saw_default = true;
                }
            }
            Line::Entry { key, .. } if is_default(section) && is_watermark_key(key) => {
                // First occurrence is replaced, later duplicates dropped.
                if !written {
                    out.push(entry.clone());
                    written = true;
                }
            }
            _ => out.push(line.to_string()),
        }
    }

    if !written {
        if saw_default && is_default(section) {
            insert_before_blank_tail(&mut out, entry);
        } else {
            let mut head = vec![format!("[{DEFAULT_SECTION}]"), entry, String::new()];
            head.append(&mut out);
            out = head;
        }
    }

    let mut text = out.join("\n");
    text.push('\n');
    text
}

/// Push `line` before any trailing blank lines of the current section.
fn insert_before_blank_tail(out: &mut Vec<String>, line: String) {
    let at = out
        .iter()
        .rposition(|l| !l.trim().is_empty())
        .map_or(0, |i| i + 1);
    out.insert(at, line);
}
