//! Output formatting for CLI display.

use crate::model::{ThreadDocument, ThreadStatus};

/// One human-readable line per thread.
///
/// `●` marks threads with activity the ball owner hasn't answered.
pub(super) fn format_thread(thread: &ThreadDocument) -> String {
    let marker = if thread.has_new { "●" } else { " " };
    let repo = thread
        .repo
        .as_deref()
        .map(|r| format!("{r}/"))
        .unwrap_or_default();
    let updated = thread.last_update.as_deref().unwrap_or("-");

    let mut line = format!(
        "{marker} {repo}{}  [{}] [{}]  ball: {}  updated: {updated}  {}",
        thread.id,
        format_status(thread),
        thread.priority,
        thread.ball_owner,
        thread.title,
    );
    if let Some(last) = &thread.last_title {
        line.push_str(&format!(" · {last}"));
    }
    line
}

fn format_status(thread: &ThreadDocument) -> String {
    match thread.status_kind() {
        ThreadStatus::Other => thread.status.to_lowercase(),
        kind => kind.label().to_string(),
    }
}
