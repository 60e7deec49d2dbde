//! Comment ranges and doc-comment text utilities.
//!
//! Comments are not part of the syntax tree. The scanner records them as
//! ranges over the source text; doc blocks (`/** … */`) are parsed into
//! structured type information, all other comments are carried through to
//! emission verbatim.

use serde::{Deserialize, Serialize};

/// A range representing a comment in the source text.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CommentRange {
    /// Start position (byte offset), including the `//` or `/*` delimiter.
    pub pos: u32,
    /// End position (byte offset), past the closing delimiter.
    pub end: u32,
    /// Whether this is a `/* */` comment.
    pub is_multi_line: bool,
}

impl CommentRange {
    pub fn new(pos: u32, end: u32, is_multi_line: bool) -> Self {
        CommentRange {
            pos,
            end,
            is_multi_line,
        }
    }

    /// Get the comment text from source.
    pub fn get_text<'a>(&self, source: &'a str) -> &'a str {
        let start = self.pos as usize;
        let end = self.end as usize;
        if end <= source.len() && start < end {
            &source[start..end]
        } else {
            ""
        }
    }

    /// Whether this comment is a doc block (`/**`, but not `/***`).
    pub fn is_jsdoc(&self, source: &str) -> bool {
        let text = self.get_text(source);
        text.starts_with("/**") && !text.starts_with("/***")
    }
}

/// Extract the content of a doc comment (without the delimiters).
///
/// Strips the `/**`/`*/` fences and the leading `*` gutter from each line,
/// leaving the raw tag text for the doc parser.
pub fn jsdoc_content(text: &str) -> String {
    let inner = text
        .strip_prefix("/**")
        .and_then(|t| t.strip_suffix("*/"))
        .unwrap_or(text);
    inner
        .lines()
        .map(|line| {
            let trimmed = line.trim_start();
            if let Some(rest) = trimmed.strip_prefix('*') {
                rest.trim_start()
            } else {
                trimmed
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}
