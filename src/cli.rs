//! CLI interface for watercooler.
//!
//! Each subcommand is non-interactive: arguments in, JSON out on stdout.
//! The JSON is what the dashboard serves: `{ "threads": [...] }`,
//! `{ "thread": {...} }`, `{ "repos": ... }`, `{ "blocks": [...] }`.
//!
//! Commands that scan the threads base directory resolve it through the
//! chain described in [`crate::config`].

mod format;

use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::{Parser, Subcommand};
use jiff::Timestamp;
use serde::Serialize;

use crate::config::{self, Config};
use crate::model::ThreadDocument;
use crate::{blocks, discover, parse};

use format::format_thread;

/// watercooler: read agent/human conversation threads.
#[derive(Debug, Parser)]
#[command(name = "watercooler", version, after_long_help = USAGE_HELP)]
pub struct Cli {
    /// Directory holding `<repo>-threads` collections.
    /// Falls back to `$WATERCOOLER_THREADS_BASE`, then `threads-base` in
    /// `~/.watercooler/config.toml`, then `~/.watercooler-threads`.
    #[arg(long, global = true)]
    threads_base: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

const USAGE_HELP: &str = r"Examples:
  watercooler list --status open --summary
  watercooler list --repo acme --since 2025-11-01T00:00:00Z
  watercooler show ~/.watercooler-threads/acme-threads/landing-page.md
  watercooler blocks landing-page.md --entry 2";

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List threads across every collection, sorted by topic.
    List {
        /// Only threads from this repository (collection name without `-threads`).
        #[arg(long)]
        repo: Option<String>,

        /// Only threads with this status (case-insensitive).
        #[arg(long)]
        status: Option<String>,

        /// Only threads updated at or after this timestamp.
        #[arg(long)]
        since: Option<Timestamp>,

        /// Hide closed threads.
        #[arg(long)]
        open: bool,

        /// One human-readable line per thread instead of JSON.
        #[arg(long)]
        summary: bool,
    },

    /// Threads grouped by repository.
    Grouped,

    /// List repository names.
    Repos,

    /// Parse a single thread file.
    Show {
        /// Thread file to parse.
        file: PathBuf,

        /// Collection directory name to attribute the thread to (e.g. `acme-threads`).
        #[arg(long)]
        collection: Option<String>,
    },

    /// Load one flat collection directory, including its `archived/` threads.
    Collection {
        /// Collection directory.
        dir: PathBuf,

        /// One human-readable line per thread instead of JSON.
        #[arg(long)]
        summary: bool,
    },

    /// Split markdown into blocks for progressive reveal.
    Blocks {
        /// Markdown file, or a thread file when `--entry` is given.
        file: PathBuf,

        /// Segment the body of this entry (1 = oldest) instead of the whole file.
        #[arg(long)]
        entry: Option<usize>,
    },
}

/// Run the CLI, returning an error message on failure.
pub fn run() -> Result<(), String> {
    let cli = Cli::parse();

    match cli.command {
        Command::List {
            repo,
            status,
            since,
            open,
            summary,
        } => {
            let base = threads_base(cli.threads_base.as_deref())?;
            let threads = match repo {
                Some(repo) => discover::threads_for_collection(&base, &repo),
                None => discover::discover_threads(&base),
            }
            .map_err(|e| e.to_string())?;
            let filter = ThreadFilter {
                status: status.as_deref(),
                since,
                open_only: open,
            };
            let threads = filter.apply(threads);
            print_threads(&threads, summary)
        }
        Command::Grouped => {
            let base = threads_base(cli.threads_base.as_deref())?;
            let grouped = discover::threads_by_collection(&base).map_err(|e| e.to_string())?;
            print_json(&ReposOutput { repos: grouped })
        }
        Command::Repos => {
            let base = threads_base(cli.threads_base.as_deref())?;
            let repos: Vec<String> = discover::list_collections(&base)
                .map_err(|e| e.to_string())?
                .iter()
                .map(|name| parse::collection_display_name(name))
                .collect();
            print_json(&ReposOutput { repos })
        }
        Command::Show { file, collection } => {
            let thread = read_thread_file(&file, collection.as_deref())?;
            print_json(&ThreadOutput { thread: &thread })
        }
        Command::Collection { dir, summary } => {
            let threads = discover::load_collection(&dir).map_err(|e| e.to_string())?;
            print_threads(&threads, summary)
        }
        Command::Blocks { file, entry } => cmd_blocks(&file, entry),
    }
}

/// Resolve the threads base directory, loading config only when needed.
fn threads_base(explicit: Option<&Path>) -> Result<PathBuf, String> {
    let config = if explicit.is_some() {
        Config::default()
    } else {
        Config::load()?
    };
    config::resolve_threads_base(explicit, &config)
}

fn cmd_blocks(file: &Path, entry: Option<usize>) -> Result<(), String> {
    let text = read_text(file)?;

    let markdown = match entry {
        None => text,
        Some(number) => {
            let thread = parse::parse_thread(&text, &file_name(file), None);
            entry_body(&thread, number)?.to_string()
        }
    };

    print_json(&BlocksOutput {
        blocks: blocks::segment(&markdown),
    })
}

/// Body of entry `number`, counting from 1.
fn entry_body(thread: &ThreadDocument, number: usize) -> Result<&str, String> {
    number
        .checked_sub(1)
        .and_then(|i| thread.entries.get(i))
        .map(|e| e.body.as_str())
        .ok_or_else(|| {
            format!(
                "no entry {number}: thread has {} entries (numbered from 1)",
                thread.entry_count
            )
        })
}

fn read_thread_file(file: &Path, collection: Option<&str>) -> Result<ThreadDocument, String> {
    let text = read_text(file)?;
    let mut thread = parse::parse_thread(&text, &file_name(file), collection);
    thread.file_path = Some(file.to_string_lossy().into_owned());
    Ok(thread)
}

fn read_text(file: &Path) -> Result<String, String> {
    fs::read_to_string(file).map_err(|e| format!("failed to read {}: {e}", file.display()))
}

fn file_name(file: &Path) -> String {
    file.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// The `list` filters.
#[derive(Debug, Default)]
struct ThreadFilter<'a> {
    /// Case-insensitive status match.
    status: Option<&'a str>,
    /// Threads without a parseable `last_update` never pass.
    since: Option<Timestamp>,
    open_only: bool,
}

impl ThreadFilter<'_> {
    fn apply(&self, threads: Vec<ThreadDocument>) -> Vec<ThreadDocument> {
        threads
            .into_iter()
            .filter(|t| self.matches(t))
            .collect()
    }

    fn matches(&self, thread: &ThreadDocument) -> bool {
        let status_ok = self
            .status
            .is_none_or(|s| thread.status.eq_ignore_ascii_case(s));
        let since_ok = self
            .since
            .is_none_or(|since| thread.last_update_at().is_some_and(|at| at >= since));
        status_ok && since_ok && !(self.open_only && thread.is_closed())
    }
}

fn print_threads(threads: &[ThreadDocument], summary: bool) -> Result<(), String> {
    if !summary {
        return print_json(&ThreadsOutput { threads });
    }

    if threads.is_empty() {
        println!("No threads");
    }
    for thread in threads {
        println!("{}", format_thread(thread));
    }
    Ok(())
}

#[derive(Serialize)]
struct ThreadsOutput<'a> {
    threads: &'a [ThreadDocument],
}

#[derive(Serialize)]
struct ThreadOutput<'a> {
    thread: &'a ThreadDocument,
}

/// `repos` is either the name list or the grouped map.
#[derive(Serialize)]
struct ReposOutput<T> {
    repos: T,
}

#[derive(Serialize)]
struct BlocksOutput {
    blocks: Vec<String>,
}

fn print_json(value: &impl Serialize) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("failed to serialize output: {e}"))?;
    println!("{json}");
    Ok(())
}
