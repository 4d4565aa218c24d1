//! Thread header: optional `# Title` line plus `Key: value` metadata.

use std::{collections::BTreeMap, sync::OnceLock};

use regex::Regex;

/// Parsed header block.
#[derive(Debug)]
pub(super) struct Header {
    pub title: String,
    pub metadata: BTreeMap<String, String>,
    /// Keys in the order encountered, repeats included.
    pub order: Vec<String>,
}

impl Header {
    /// A metadata value, treating empty values as absent.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.metadata
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

fn metadata_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9_ \-]+):\s*(.+)$").expect("valid regex"))
}

/// Parse header lines. Blank and malformed lines are skipped.
pub(super) fn parse_header(lines: &[&str], default_title: &str) -> Header {
    let mut title = default_title.to_string();
    let mut meta_lines = lines;

    if let Some((first, rest)) = lines.split_first() {
        let first = first.trim();
        if first.starts_with('#') {
            let heading = first.trim_start_matches('#').trim();
            if !heading.is_empty() {
                title = heading.to_string();
            }
            meta_lines = rest;
        }
    }

    let mut metadata = BTreeMap::new();
    let mut order = Vec::new();

    for line in meta_lines {
        let Some(caps) = metadata_line().captures(line.trim()) else {
            continue;
        };
        let key = caps[1].trim().to_string();
        let value = caps[2].trim().to_string();
        order.push(key.clone());
        metadata.insert(key, value);
    }

    Header {
        title,
        metadata,
        order,
    }
}
