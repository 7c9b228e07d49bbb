//! Output of article records: file naming, JSON rendering and the issue writer.

mod json;
mod naming;
mod writer;

pub use json::{to_json, JsonFormat};
pub use naming::{article_filename, slugify, ArticleSequence, MAX_SLUG_CHARS, RECORD_EXTENSION};
pub use writer::{IssueWriter, SUMMARY_FILE};
