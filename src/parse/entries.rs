//! Thread body: the entry log.
//!
//! Entries are separated by a `---` line immediately followed by an
//! `Entry:` line. Each entry opens with a mini-header of `Key: value`
//! lines, ended by a blank line or the first line that isn't one.

use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;

use crate::model::ThreadEntry;

fn meta_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_ \-]+):\s*(.*)$").expect("valid regex"))
}

/// `Claude (caleb) 2025-11-04T00:34:29Z`
fn entry_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(.+?)(?:\s+\((.+?)\))?\s+(\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}Z)$")
            .expect("valid regex")
    })
}

/// Parse the (already trimmed) body text into entries, in file order.
pub(super) fn parse_entries(body: &str) -> Vec<ThreadEntry> {
    split_segments(body)
        .iter()
        .map(|segment| segment.join("\n"))
        .filter(|segment| !segment.trim().is_empty())
        .map(|segment| parse_entry(segment.trim()))
        .collect()
}

/// Split body lines at entry boundaries. Boundary lines belong to no segment.
fn split_segments(body: &str) -> Vec<Vec<&str>> {
    let lines: Vec<&str> = body.lines().collect();
    let mut segments = vec![Vec::new()];

    for (i, line) in lines.iter().enumerate() {
        let next_is_entry = lines.get(i + 1).is_some_and(|l| l.starts_with("Entry:"));
        if is_rule(line) && next_is_entry {
            segments.push(Vec::new());
            continue;
        }
        if let Some(current) = segments.last_mut() {
            current.push(*line);
        }
    }

    segments
}

/// `---` followed by nothing but whitespace.
fn is_rule(line: &str) -> bool {
    line.strip_prefix("---")
        .is_some_and(|rest| rest.trim().is_empty())
}

fn parse_entry(segment: &str) -> ThreadEntry {
    let lines: Vec<&str> = segment.lines().collect();
    let mut meta = BTreeMap::new();
    let mut cursor = 0;

    while let Some(line) = lines.get(cursor) {
        if line.trim().is_empty() {
            cursor += 1;
            break;
        }
        let Some(caps) = meta_line().captures(line) else {
            break;
        };
        meta.insert(caps[1].trim().to_string(), caps[2].trim().to_string());
        cursor += 1;
    }

    let body = lines[cursor..]
        .iter()
        .filter(|line| !is_markup(line))
        .copied()
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string();

    let (author, actor, timestamp) = match meta.get("Entry").filter(|v| !v.is_empty()) {
        Some(raw) => split_entry_line(raw),
        None => (None, None, None),
    };

    let field = |key: &str| meta.get(key).filter(|v| !v.is_empty()).cloned();

    ThreadEntry {
        author,
        actor,
        timestamp,
        role: field("Role"),
        kind: field("Type"),
        title: field("Title"),
        spec: field("Spec"),
        body,
        is_new: false,
        meta,
    }
}

/// Entry-ID markers and HTML comments are bookkeeping, not content.
fn is_markup(line: &str) -> bool {
    line.contains("Entry-ID:") || line.contains("<!--") || line.contains("-->")
}

/// Decompose an `Entry` value into author, actor, and timestamp.
///
/// When the value doesn't match, the whole value is the author.
fn split_entry_line(raw: &str) -> (Option<String>, Option<String>, Option<String>) {
    match entry_line().captures(raw) {
        Some(caps) => (
            Some(caps[1].trim().to_string()),
            caps.get(2).map(|m| m.as_str().trim().to_string()),
            Some(caps[3].to_string()),
        ),
        None => (Some(raw.to_string()), None, None),
    }
}
