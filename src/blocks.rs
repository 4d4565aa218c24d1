//! Markdown block segmentation for progressive reveal.
//!
//! Splits markdown into self-contained blocks that render on their own.
//! Multi-line constructs (fenced code, list items with their children,
//! blockquotes) are kept whole; paragraphs are split into single lines so
//! the player can pace them individually.
//!
//! Every line is classified by the first matching predicate in
//! [`CLASSIFIERS`]; lines no predicate claims are paragraph text.

/// Fence marker style. A fence only closes on the same style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fence {
    Backticks,
    Tildes,
}

impl Fence {
    fn of(line: &str) -> Option<Self> {
        let t = line.trim();
        if t.starts_with("```") {
            Some(Self::Backticks)
        } else if t.starts_with("~~~") {
            Some(Self::Tildes)
        } else {
            None
        }
    }
}

/// What a single line looks like, without context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    FenceOpen(Fence),
    Heading,
    /// `indent` is the byte length of the leading whitespace.
    ListItem { indent: usize },
    Quote,
    Rule,
    Text,
}

type Classifier = fn(&str) -> Option<LineKind>;

/// Evaluated top to bottom; the first match wins.
const CLASSIFIERS: &[Classifier] = &[blank, fence_open, heading, list_item, quote, rule];

fn classify(line: &str) -> LineKind {
    CLASSIFIERS
        .iter()
        .find_map(|classifier| classifier(line))
        .unwrap_or(LineKind::Text)
}

fn blank(line: &str) -> Option<LineKind> {
    line.trim().is_empty().then_some(LineKind::Blank)
}

fn fence_open(line: &str) -> Option<LineKind> {
    Fence::of(line).map(LineKind::FenceOpen)
}

/// One to six `#` followed by whitespace.
fn heading(line: &str) -> Option<LineKind> {
    let hashes = line.len() - line.trim_start_matches('#').len();
    let follows_space = line[hashes..].starts_with(char::is_whitespace);
    ((1..=6).contains(&hashes) && follows_space).then_some(LineKind::Heading)
}

fn list_item(line: &str) -> Option<LineKind> {
    list_marker_indent(line).map(|indent| LineKind::ListItem { indent })
}

fn quote(line: &str) -> Option<LineKind> {
    line.trim().starts_with('>').then_some(LineKind::Quote)
}

/// Three or more of the same `*`, `-` or `_`, and nothing else.
fn rule(line: &str) -> Option<LineKind> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut chars = line.chars();
    let first = chars.next()?;
    let is_rule = matches!(first, '*' | '-' | '_')
        && line.len() >= 3
        && chars.all(|c| c == first);
    is_rule.then_some(LineKind::Rule)
}

/// Indent of a `-`, `*`, `+` or `N.` list marker followed by whitespace.
fn list_marker_indent(line: &str) -> Option<usize> {
    let rest = line.trim_start();
    let indent = line.len() - rest.len();

    let after_marker = if let Some(after) = rest.strip_prefix(['-', '*', '+']) {
        after
    } else {
        let digits = rest.len() - rest.trim_start_matches(|c: char| c.is_ascii_digit()).len();
        if digits == 0 {
            return None;
        }
        rest[digits..].strip_prefix('.')?
    };

    after_marker
        .starts_with(char::is_whitespace)
        .then_some(indent)
}

fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split markdown into ordered, independently renderable blocks.
///
/// Blank lines between blocks are dropped. Joining the blocks with `\n`
/// reproduces the input up to blank lines.
pub fn segment(markdown: &str) -> Vec<String> {
    let lines: Vec<&str> = markdown.split('\n').collect();
    let mut blocks = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        match classify(lines[i]) {
            LineKind::Blank => i += 1,
            LineKind::FenceOpen(fence) => {
                let end = fence_end(&lines, i, fence);
                blocks.push(lines[i..end].join("\n"));
                i = end;
            }
            LineKind::Heading | LineKind::Rule => {
                blocks.push(lines[i].to_string());
                i += 1;
            }
            LineKind::ListItem { indent } => {
                let end = list_end(&lines, i, indent);
                blocks.push(lines[i..end].join("\n"));
                i = end;
            }
            LineKind::Quote => {
                let end = quote_end(&lines, i);
                blocks.push(lines[i..end].join("\n"));
                i = end;
            }
            LineKind::Text => {
                let end = paragraph_end(&lines, i);
                blocks.extend(lines[i..end].iter().map(|line| (*line).to_string()));
                i = end;
            }
        }
    }

    blocks
}

/// Through the closing fence, or to the end of input when unterminated.
fn fence_end(lines: &[&str], start: usize, fence: Fence) -> usize {
    lines[start + 1..]
        .iter()
        .position(|line| Fence::of(line) == Some(fence))
        .map_or(lines.len(), |offset| start + 1 + offset + 1)
}

/// One list item plus its continuation lines.
///
/// Ends before a sibling (or shallower) marker, before a non-blank line not
/// indented under the item, or after a blank line that isn't followed by
/// indented content.
fn list_end(lines: &[&str], start: usize, indent: usize) -> usize {
    let continuation = format!("{}  ", &lines[start][..indent]);
    let mut j = start + 1;

    while let Some(next) = lines.get(j) {
        match list_marker_indent(next) {
            Some(next_indent) if next_indent <= indent => break,
            Some(_) => {}
            None if !is_blank(next) && !next.starts_with(&continuation) => break,
            None => {}
        }
        j += 1;

        let leaves_item = lines
            .get(j)
            .is_some_and(|after| !is_blank(after) && !after.starts_with(&continuation));
        if is_blank(next) && leaves_item {
            break;
        }
    }

    j
}

/// Quoted lines, stopping after the first blank line.
fn quote_end(lines: &[&str], start: usize) -> usize {
    let mut j = start + 1;
    while let Some(next) = lines.get(j) {
        if is_blank(next) {
            return j + 1;
        }
        if classify(next) != LineKind::Quote {
            break;
        }
        j += 1;
    }
    j
}

/// Contiguous lines that don't start another construct.
///
/// Quote and rule lines inside a paragraph stay in the run.
fn paragraph_end(lines: &[&str], start: usize) -> usize {
    lines[start + 1..]
        .iter()
        .position(|line| {
            !matches!(
                classify(line),
                LineKind::Text | LineKind::Quote | LineKind::Rule
            )
        })
        .map_or(lines.len(), |offset| start + 1 + offset)
}
