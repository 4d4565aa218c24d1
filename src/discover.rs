//! Thread discovery: find thread files on disk and parse them.
//!
//! The base directory holds one collection per repository:
//!
//! ```text
//! <base>/
//!   acme-threads/
//!     landing-page.md
//!     archived/old-idea.md
//!     README.md          # skipped
//!   widgets-threads/
//!     ...
//!   notes/               # not a collection, ignored
//! ```
//!
//! Discovery is best-effort below the directory the caller names: an
//! unreadable subdirectory or file is logged and skipped.

use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use ignore::WalkBuilder;
use log::{debug, warn};

use crate::model::ThreadDocument;
use crate::parse::{COLLECTION_SUFFIX, collection_display_name, parse_thread};

/// Markdown files that describe a collection rather than being threads.
const SKIPPED_FILES: &[&str] = &["README.md", "INDEX.md", "index.md"];

/// Subdirectory holding retired threads in a flat collection.
const ARCHIVE_DIR: &str = "archived";

/// Errors that can occur during discovery.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    /// The directory the caller asked for can't be listed.
    #[error("cannot read threads directory {}: {source}", .path.display())]
    BaseUnreadable { path: PathBuf, source: io::Error },
}

pub type Result<T> = core::result::Result<T, DiscoveryError>;

/// Names of the collection directories under `base`, sorted.
pub fn list_collections(base: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(base).map_err(|source| DiscoveryError::BaseUnreadable {
        path: base.to_path_buf(),
        source,
    })?;

    let mut names: Vec<String> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", base.display());
                None
            }
        })
        .filter(|entry| entry.file_type().is_ok_and(|ft| ft.is_dir()))
        .map(|entry| entry.file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(COLLECTION_SUFFIX))
        .collect();

    names.sort();
    Ok(names)
}

/// Every thread in every collection under `base`, sorted by topic.
pub fn discover_threads(base: &Path) -> Result<Vec<ThreadDocument>> {
    let mut threads: Vec<ThreadDocument> = list_collections(base)?
        .iter()
        .flat_map(|name| collect_collection(&base.join(name), name))
        .collect();

    sort_by_topic(&mut threads);
    Ok(threads)
}

/// Threads grouped by collection display name.
///
/// Within a group, threads are in file-name order.
pub fn threads_by_collection(base: &Path) -> Result<BTreeMap<String, Vec<ThreadDocument>>> {
    Ok(list_collections(base)?
        .iter()
        .map(|name| {
            let threads = collect_collection(&base.join(name), name);
            (collection_display_name(name), threads)
        })
        .collect())
}

/// Threads of the one collection whose display name is `repo`.
///
/// An unknown name yields an empty list.
pub fn threads_for_collection(base: &Path, repo: &str) -> Result<Vec<ThreadDocument>> {
    let collections = list_collections(base)?;
    let Some(name) = collections
        .iter()
        .find(|name| collection_display_name(name) == repo)
    else {
        return Ok(Vec::new());
    };

    let mut threads = collect_collection(&base.join(name), name);
    sort_by_topic(&mut threads);
    Ok(threads)
}

/// Load a single flat collection: top-level thread files plus `archived/`.
///
/// Archived thread ids carry the `archived/` prefix.
pub fn load_collection(dir: &Path) -> Result<Vec<ThreadDocument>> {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());

    let mut files = list_thread_files(dir).map_err(|source| DiscoveryError::BaseUnreadable {
        path: dir.to_path_buf(),
        source,
    })?;

    let archive = dir.join(ARCHIVE_DIR);
    if archive.is_dir() {
        match list_thread_files(&archive) {
            Ok(archived) => files.extend(archived),
            Err(e) => warn!("skipping {}: {e}", archive.display()),
        }
    }

    let mut threads: Vec<ThreadDocument> = files
        .iter()
        .filter_map(|path| read_thread(path, dir, name.as_deref()))
        .collect();

    sort_by_topic(&mut threads);
    Ok(threads)
}

/// Parse every thread file below a collection root, in file-name order.
fn collect_collection(root: &Path, name: &str) -> Vec<ThreadDocument> {
    let threads: Vec<ThreadDocument> = walk_thread_files(root)
        .iter()
        .filter_map(|path| read_thread(path, root, Some(name)))
        .collect();

    debug!("{} threads in {}", threads.len(), root.display());
    threads
}

/// Recursively find thread files under `root`.
///
/// Walks everything, hidden and ignored files included.
fn walk_thread_files(root: &Path) -> Vec<PathBuf> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .sort_by_file_name(Ord::cmp)
        .build();

    walker
        .filter_map(|result| skip_unreadable(result, root))
        .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .filter(|path| is_thread_file(path))
        .collect()
}

/// Log and drop a walk error.
fn skip_unreadable<T>(result: core::result::Result<T, ignore::Error>, root: &Path) -> Option<T> {
    match result {
        Ok(entry) => Some(entry),
        Err(e) => {
            warn!("skipping unreadable path under {}: {e}", root.display());
            None
        }
    }
}

/// Thread files directly inside `dir`, sorted by name.
fn list_thread_files(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("skipping unreadable entry in {}: {e}", dir.display());
                continue;
            }
        };
        let path = entry.path();
        if entry.file_type().is_ok_and(|ft| ft.is_file()) && is_thread_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// A `.md` file that isn't a README or index.
fn is_thread_file(path: &Path) -> bool {
    let is_markdown = path.extension().is_some_and(|ext| ext == "md");
    let is_skipped = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| SKIPPED_FILES.contains(&n));
    is_markdown && !is_skipped
}

/// Read and parse one thread file. Unreadable files are logged and skipped.
fn read_thread(path: &Path, root: &Path, collection: Option<&str>) -> Option<ThreadDocument> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            warn!("skipping {}: {e}", path.display());
            return None;
        }
    };

    let relative = path.strip_prefix(root).unwrap_or(path);
    let file_name = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/");

    let mut thread = parse_thread(&text, &file_name, collection);
    thread.file_path = Some(path.to_string_lossy().into_owned());
    Some(thread)
}

/// Stable, byte-wise ordering by topic.
fn sort_by_topic(threads: &mut [ThreadDocument]) {
    threads.sort_by(|a, b| a.topic.cmp(&b.topic));
}
