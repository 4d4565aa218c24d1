//! Core data model for watercooler.
//!
//! Threads and their entries are value objects: created fresh on every
//! parse, owned by the caller, never persisted.

mod entry;
mod thread;

pub use entry::ThreadEntry;
pub use thread::{ThreadDocument, ThreadStatus};
