//! Article-level types produced by the segmenter.

use serde::{Deserialize, Serialize};

/// Where a [`TocEntry`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryOrigin {
    /// Scraped from a table-of-contents page
    Toc,
    /// A section header found in the page body; the title is a placeholder
    Header,
}

/// A (page, title) anchor for an article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TocEntry {
    /// Start page of the article
    pub page: u32,
    /// Title text (placeholder for header entries)
    pub title: String,
    /// Source of the entry
    pub origin: EntryOrigin,
}

impl TocEntry {
    /// Create an entry scraped from a table of contents.
    pub fn toc(page: u32, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
            origin: EntryOrigin::Toc,
        }
    }

    /// Create a placeholder entry from a section header.
    pub fn header(page: u32, title: impl Into<String>) -> Self {
        Self {
            page,
            title: title.into(),
            origin: EntryOrigin::Header,
        }
    }
}

/// A provisionally bounded article.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleCandidate {
    /// Article title, never empty
    pub title: String,
    /// First page of the article
    pub start_page: u32,
    /// Last page of the article range
    pub end_page: u32,
    /// Pages whose text went into `content`, ascending
    pub page_list: Vec<u32>,
    /// Concatenated page text
    pub content: String,
}

impl ArticleCandidate {
    /// Create an empty candidate anchored at `start_page`.
    pub fn new(title: impl Into<String>, start_page: u32) -> Self {
        Self {
            title: title.into(),
            start_page,
            end_page: start_page,
            page_list: Vec::new(),
            content: String::new(),
        }
    }

    /// Append one page of text.
    pub fn push_page(&mut self, number: u32, text: &str) {
        if !self.content.is_empty() {
            self.content.push_str("\n\n");
        }
        self.content.push_str(text.trim_end());
        self.page_list.push(number);
    }

    /// Whether the candidate has any non-whitespace content.
    pub fn has_content(&self) -> bool {
        !self.content.trim().is_empty()
    }

    /// Number of pages in the article range.
    pub fn span(&self) -> u32 {
        self.end_page.saturating_sub(self.start_page) + 1
    }
}

/// A saved article: a candidate plus its ordinal within the issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Ordinal within the issue (1-based)
    pub index: u32,
    /// Article title
    pub title: String,
    /// First page
    pub start_page: u32,
    /// Last page of the range
    pub end_page: u32,
    /// Pages that contributed text
    pub page_list: Vec<u32>,
    /// Article text
    pub content: String,
}

impl ArticleRecord {
    /// Freeze a candidate under the given ordinal.
    pub fn from_candidate(index: u32, candidate: &ArticleCandidate) -> Self {
        Self {
            index,
            title: candidate.title.clone(),
            start_page: candidate.start_page,
            end_page: candidate.end_page,
            page_list: candidate.page_list.clone(),
            content: candidate.content.clone(),
        }
    }
}

/// Issue-level listing of saved articles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueSummary {
    /// Issue name (input file stem)
    pub issue: String,
    /// Number of saved articles
    pub article_count: usize,
    /// One entry per article, in page order
    pub articles: Vec<SummaryEntry>,
}

/// One line of the issue summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryEntry {
    /// Article title
    pub title: String,
    /// First page
    pub start_page: u32,
    /// Pages that contributed text
    pub page_list: Vec<u32>,
    /// File the article record was written to
    pub filename: String,
}
