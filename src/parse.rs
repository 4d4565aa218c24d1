//! Thread parsing: raw thread text to a [`ThreadDocument`].
//!
//! A thread file is a header block, a `---` line, then zero or more entries
//! separated by `---` lines followed by an `Entry:` line:
//!
//! ```text
//! # Optional Title
//! Status: OPEN
//! Ball: Claude (caleb)
//! ---
//! Entry: Claude (caleb) 2025-11-04T00:34:29Z
//! Role: implementer
//! Title: Deploy queued
//! <!-- Entry-ID: abc123 -->
//! Body text here, any markdown.
//! ```
//!
//! Parsing is total: malformed content falls back to defaults, never errors.
//! The result depends only on the text, the file name, and the collection
//! directory name.

mod entries;
mod header;

use crate::model::{ThreadDocument, ThreadEntry, ThreadStatus};

/// Directory-name suffix marking a thread collection (`acme-threads`).
pub const COLLECTION_SUFFIX: &str = "-threads";

/// Parse one thread.
///
/// `file_name` is the path relative to the collection root
/// (`landing-page.md`, `archived/old.md`); it drives the id and the
/// fallback title. `collection` is the containing collection directory's
/// name, if any.
pub fn parse_thread(text: &str, file_name: &str, collection: Option<&str>) -> ThreadDocument {
    let (header_lines, body) = split_header_and_body(text);
    let default_title = default_title(file_name);
    let header = header::parse_header(&header_lines, &default_title);
    let mut entries = entries::parse_entries(&body);

    let status = header.field("Status").unwrap_or("UNKNOWN").to_string();
    let ball = header.field("Ball");
    let ball_owner = ball.unwrap_or("Unknown").to_string();
    let topic = header.field("Topic").unwrap_or(default_title.as_str()).to_string();
    let priority = header.field("Priority").unwrap_or("P2").to_string();
    let spec = header.field("Spec").map(String::from);
    let created = header.field("Created").map(String::from);

    let has_new = has_new(&entries, ball, &status);
    if has_new && let Some(last) = entries.last_mut() {
        last.is_new = true;
    }

    let last_update = entries
        .iter()
        .rev()
        .find_map(|e| e.timestamp.clone())
        .or_else(|| created.clone());
    let last_title = entries.iter().rev().find_map(|e| e.title.clone());

    ThreadDocument {
        id: thread_id(file_name),
        title: header.title,
        topic,
        status,
        priority,
        ball_owner,
        spec,
        created,
        last_update,
        last_title,
        entry_count: entries.len(),
        has_new,
        metadata: header.metadata,
        header_order: header.order,
        entries,
        repo: collection.map(collection_display_name),
        file_path: None,
    }
}

/// Collection display name: the directory name minus [`COLLECTION_SUFFIX`].
pub fn collection_display_name(dir_name: &str) -> String {
    dir_name
        .strip_suffix(COLLECTION_SUFFIX)
        .unwrap_or(dir_name)
        .to_string()
}

/// Split into header lines and trimmed body text at the first `---` line.
///
/// Trailing blank header lines and leading `---` body lines are dropped.
fn split_header_and_body(text: &str) -> (Vec<&str>, String) {
    let mut lines = text.lines();
    let mut header: Vec<&str> = lines.by_ref().take_while(|l| l.trim() != "---").collect();

    while header.last().is_some_and(|l| l.trim().is_empty()) {
        header.pop();
    }

    let body: Vec<&str> = lines.skip_while(|l| l.trim() == "---").collect();
    (header, body.join("\n").trim().to_string())
}

/// `archived/old-idea.md` → `archived/old-idea`.
fn thread_id(file_name: &str) -> String {
    let normalized = file_name.replace('\\', "/");
    normalized
        .strip_suffix(".md")
        .unwrap_or(&normalized)
        .to_string()
}

/// `archived/old-idea.md` → `old idea`.
fn default_title(file_name: &str) -> String {
    let name = file_name.rsplit(['/', '\\']).next().unwrap_or(file_name);
    let stem = name.strip_suffix(".md").unwrap_or(name);
    if stem.is_empty() {
        return "Untitled".to_string();
    }
    stem.replace('-', " ")
}

/// Whether the thread has activity the ball owner hasn't answered.
///
/// True when the most recent attributed entry was written by someone other
/// than the ball owner and the thread isn't closed.
fn has_new(entries: &[ThreadEntry], ball: Option<&str>, status: &str) -> bool {
    if entries.is_empty() || ThreadStatus::classify(status) == ThreadStatus::Closed {
        return false;
    }

    let last_author = entries
        .iter()
        .rev()
        .find_map(|e| e.author.as_deref())
        .map(normalize_name)
        .unwrap_or_default();

    !last_author.is_empty() && last_author != normalize_name(ball.unwrap_or_default())
}

/// `"Claude (caleb) "` → `"claude"`.
fn normalize_name(name: &str) -> String {
    let trimmed = name.trim_end();
    let base = match trimmed.find('(') {
        Some(open) if trimmed.ends_with(')') => &trimmed[..open],
        _ => trimmed,
    };
    base.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "\
# Deploy pipeline
Status: OPEN
Ball: Claude (caleb)
Topic: example-topic
Created: 2025-11-04T00:00:00Z
Priority: P1
---
Entry: Claude (caleb) 2025-11-04T00:34:29Z
Role: implementer
Type: update
Title: Deploy queued
<!-- Entry-ID: abc123 -->
Body text here, any markdown.
---
Entry: Codex 2025-11-04T01:00:00Z
Role: reviewer

Ball flipped to Claude.
";

    #[test]
    fn parses_sample_thread() {
        let doc = parse_thread(SAMPLE, "deploy-pipeline.md", Some("acme-threads"));

        assert_eq!(doc.id, "deploy-pipeline");
        assert_eq!(doc.title, "Deploy pipeline");
        assert_eq!(doc.topic, "example-topic");
        assert_eq!(doc.status, "OPEN");
        assert_eq!(doc.priority, "P1");
        assert_eq!(doc.ball_owner, "Claude (caleb)");
        assert_eq!(doc.created.as_deref(), Some("2025-11-04T00:00:00Z"));
        assert_eq!(doc.spec, None);
        assert_eq!(
            doc.header_order,
            ["Status", "Ball", "Topic", "Created", "Priority"]
        );
        assert_eq!(doc.repo.as_deref(), Some("acme"));

        assert_eq!(doc.entry_count, 2);
        assert_eq!(doc.last_update.as_deref(), Some("2025-11-04T01:00:00Z"));
        assert_eq!(doc.last_title.as_deref(), Some("Deploy queued"));

        let first = &doc.entries[0];
        assert_eq!(first.author.as_deref(), Some("Claude"));
        assert_eq!(first.actor.as_deref(), Some("caleb"));
        assert_eq!(first.kind.as_deref(), Some("update"));
        assert_eq!(first.body, "Body text here, any markdown.");

        let second = &doc.entries[1];
        assert_eq!(second.author.as_deref(), Some("Codex"));
        assert_eq!(second.actor, None);
        assert_eq!(second.role.as_deref(), Some("reviewer"));
        assert_eq!(second.body, "Ball flipped to Claude.");
    }

    #[test]
    fn parsing_is_idempotent() {
        let a = parse_thread(SAMPLE, "deploy-pipeline.md", Some("acme-threads"));
        let b = parse_thread(SAMPLE, "deploy-pipeline.md", Some("acme-threads"));
        assert_eq!(a, b);
    }

    #[test]
    fn missing_header_fields_use_defaults() {
        let doc = parse_thread("Owner: nobody\n---\n", "quiet-thread.md", None);

        assert_eq!(doc.status, "UNKNOWN");
        assert_eq!(doc.priority, "P2");
        assert_eq!(doc.ball_owner, "Unknown");
        assert_eq!(doc.title, "quiet thread");
        assert_eq!(doc.topic, "quiet thread");
        assert_eq!(doc.created, None);
        assert_eq!(doc.last_update, None);
        assert_eq!(doc.entry_count, 0);
        assert!(!doc.has_new);
    }

    #[test]
    fn text_without_delimiter_is_all_header() {
        let doc = parse_thread("Status: OPEN\nEntry: Codex 2025-11-04T01:00:00Z", "x.md", None);

        assert_eq!(doc.status, "OPEN");
        assert!(doc.entries.is_empty());
        assert_eq!(
            doc.metadata.get("Entry").map(String::as_str),
            Some("Codex 2025-11-04T01:00:00Z")
        );
    }

    #[test]
    fn empty_text_yields_defaults() {
        let doc = parse_thread("", "empty.md", None);
        assert_eq!(doc.title, "empty");
        assert_eq!(doc.status, "UNKNOWN");
        assert!(doc.metadata.is_empty());
        assert!(doc.entries.is_empty());
    }

    #[test]
    fn archived_ids_keep_subpath() {
        let doc = parse_thread("---\n", "archived/old-idea.md", None);
        assert_eq!(doc.id, "archived/old-idea");
        assert_eq!(doc.title, "old idea");
    }

    #[test]
    fn ball_owner_matching_last_author_is_not_new() {
        let text = "Status: OPEN\nBall: Claude\n---\nEntry: Claude 2025-11-04T00:34:29Z\n\nDone.";
        let doc = parse_thread(text, "t.md", None);

        assert!(!doc.has_new);
        assert!(doc.entries.iter().all(|e| !e.is_new));
    }

    #[test]
    fn other_author_marks_only_last_entry_new() {
        let doc = parse_thread(SAMPLE, "t.md", None);

        assert!(doc.has_new);
        assert!(!doc.entries[0].is_new);
        assert!(doc.entries[1].is_new);
    }

    #[test]
    fn closed_thread_is_never_new() {
        let text = SAMPLE.replace("Status: OPEN", "Status: closed");
        let doc = parse_thread(&text, "t.md", None);

        assert!(!doc.has_new);
        assert!(doc.entries.iter().all(|e| !e.is_new));
    }

    #[test]
    fn qualifier_and_case_are_ignored_when_comparing_owner() {
        let text = "Status: OPEN\nBall: claude\n---\nEntry: Claude (caleb) 2025-11-04T00:34:29Z\n\nok";
        assert!(!parse_thread(text, "t.md", None).has_new);
    }

    #[test]
    fn unattributed_entries_are_skipped_when_finding_last_author() {
        let text = "\
Status: OPEN
Ball: Claude
---
Entry: Codex 2025-11-04T00:34:29Z

first
---
Entry:

no author";
        let doc = parse_thread(text, "t.md", None);

        assert_eq!(doc.entries[1].author, None);
        assert!(doc.has_new);
        assert!(doc.entries[1].is_new);
    }

    #[test]
    fn missing_ball_with_author_is_new() {
        let text = "Status: OPEN\n---\nEntry: Codex 2025-11-04T00:34:29Z\n\nhello";
        let doc = parse_thread(text, "t.md", None);
        assert_eq!(doc.ball_owner, "Unknown");
        assert!(doc.has_new);
    }

    #[test]
    fn landing_page_end_to_end() {
        let text = "\
Status: OPEN
Ball: Claude
Topic: landing-page
---
Entry: Codex 2025-11-05T09:15:00Z
Role: reviewer
Title: Copy review

Hero copy reads well.
";
        let doc = parse_thread(text, "landing-page.md", None);

        assert_eq!(doc.topic, "landing-page");
        assert_eq!(doc.status, "OPEN");
        assert_eq!(doc.ball_owner, "Claude");
        assert_eq!(doc.entry_count, 1);
        assert!(doc.has_new);
    }

    #[test]
    fn last_update_falls_back_to_created() {
        let text = "Created: 2025-11-04T00:00:00Z\n---\nEntry: Codex sometime\n\nbody";
        let doc = parse_thread(text, "t.md", None);

        assert_eq!(doc.entries[0].author.as_deref(), Some("Codex sometime"));
        assert_eq!(doc.entries[0].timestamp, None);
        assert_eq!(doc.last_update.as_deref(), Some("2025-11-04T00:00:00Z"));
    }

    #[test]
    fn crlf_line_endings_are_tolerated() {
        let text = SAMPLE.replace('\n', "\r\n");
        let doc = parse_thread(&text, "t.md", None);

        assert_eq!(doc.status, "OPEN");
        assert_eq!(doc.entry_count, 2);
        assert_eq!(doc.entries[0].timestamp.as_deref(), Some("2025-11-04T00:34:29Z"));
    }

    #[test]
    fn normalizes_names() {
        assert_eq!(normalize_name("Claude (caleb)"), "claude");
        assert_eq!(normalize_name("  Codex  "), "codex");
        assert_eq!(normalize_name("Agent (a) (b)"), "agent");
        assert_eq!(normalize_name("Odd (name"), "odd (name");
        assert_eq!(normalize_name(""), "");
    }

    #[test]
    fn collection_names_drop_suffix() {
        assert_eq!(collection_display_name("acme-threads"), "acme");
        assert_eq!(collection_display_name("loose"), "loose");
    }
}
