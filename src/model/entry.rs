//! Thread entries: one turn in a thread's conversation log.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One turn appended to a thread.
///
/// Built from the entry's mini-header (`Key: value` lines) and the free
/// text that follows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadEntry {
    /// Responsible actor from the `Entry:` line.
    /// The raw `Entry` value when it doesn't match the expected pattern.
    pub author: Option<String>,

    /// Parenthetical qualifier on the author line, e.g. the human operator
    /// behind an agent.
    pub actor: Option<String>,

    /// `YYYY-MM-DDTHH:MM:SSZ`, kept as written.
    pub timestamp: Option<String>,

    pub role: Option<String>,

    #[serde(rename = "type")]
    pub kind: Option<String>,

    pub title: Option<String>,

    pub spec: Option<String>,

    /// Free text after the mini-header, with `Entry-ID` and comment lines removed.
    pub body: String,

    /// Every mini-header key/value.
    pub meta: BTreeMap<String, String>,

    /// Set on the final entry only, when the thread has unseen activity.
    pub is_new: bool,
}
