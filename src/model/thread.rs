//! Thread documents: one parsed thread file.

use std::collections::BTreeMap;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::ThreadEntry;

/// One parsed thread file: header metadata plus the ordered entry log.
///
/// Field names are the JSON wire names consumed by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThreadDocument {
    /// Path relative to the collection root, without the `.md` extension
    /// (e.g. `landing-page`, `archived/old-idea`).
    pub id: String,

    pub title: String,

    pub topic: String,

    /// Kept verbatim. See [`ThreadStatus`] for the recognized values.
    pub status: String,

    pub priority: String,

    /// Who is expected to act next (the `Ball` header).
    pub ball_owner: String,

    pub spec: Option<String>,

    pub created: Option<String>,

    /// Timestamp of the last entry that has one, else `created`.
    pub last_update: Option<String>,

    /// Title of the most recent entry that has one.
    pub last_title: Option<String>,

    pub entry_count: usize,

    /// Unseen activity: the last author isn't the ball owner and the thread is open.
    pub has_new: bool,

    pub metadata: BTreeMap<String, String>,

    /// Header keys in the order they appeared.
    pub header_order: Vec<String>,

    /// Oldest first, as written.
    pub entries: Vec<ThreadEntry>,

    /// Collection the file was discovered in, `-threads` suffix stripped.
    pub repo: Option<String>,

    /// Source file, when the document was read from disk. Non-UTF-8 bytes
    /// in the path are replaced with U+FFFD.
    pub file_path: Option<String>,
}

impl ThreadDocument {
    /// Classify the raw status.
    pub fn status_kind(&self) -> ThreadStatus {
        ThreadStatus::classify(&self.status)
    }

    pub fn is_closed(&self) -> bool {
        self.status_kind() == ThreadStatus::Closed
    }

    /// `last_update` as a timestamp, if present and well-formed.
    pub fn last_update_at(&self) -> Option<Timestamp> {
        self.last_update.as_deref()?.parse().ok()
    }
}

/// The status values the dashboard understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThreadStatus {
    Open,
    InReview,
    Blocked,
    Closed,
    /// Anything else, including the `UNKNOWN` default.
    Other,
}

impl ThreadStatus {
    /// Case-insensitive match against the recognized values.
    pub fn classify(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "IN_REVIEW" => Self::InReview,
            "BLOCKED" => Self::Blocked,
            "CLOSED" => Self::Closed,
            _ => Self::Other,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InReview => "in review",
            Self::Blocked => "blocked",
            Self::Closed => "closed",
            Self::Other => "other",
        }
    }
}
