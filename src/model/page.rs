//! Page-level types.

use serde::{Deserialize, Serialize};

/// One positioned run of decoded text.
///
/// Coordinates are in PDF user space: `y` grows upwards, so the top of the
/// page has the largest `y`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageFragment {
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// The text content
    pub text: String,
}

impl PageFragment {
    /// Create a new fragment.
    pub fn new(x: f32, y: f32, text: impl Into<String>) -> Self {
        Self {
            x,
            y,
            text: text.into(),
        }
    }

    /// Whether the fragment can take part in layout analysis.
    pub fn is_usable(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && !self.text.trim().is_empty()
    }
}

/// A single page of an issue as delivered by a page source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed, physical order)
    pub number: u32,

    /// Page content, either positioned fragments or linear text
    pub content: PageContent,
}

/// Content of a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageContent {
    /// Positioned fragments that still need linearization
    Fragments {
        /// The fragments, in decoding order
        fragments: Vec<PageFragment>,
        /// Unordered text from the decoder, used when linearization fails
        #[serde(default, skip_serializing_if = "Option::is_none")]
        raw_text: Option<String>,
    },

    /// Text that is already in reading order
    Text {
        /// The page text
        text: String,
    },
}

impl Page {
    /// Create a page from positioned fragments.
    pub fn from_fragments(number: u32, fragments: Vec<PageFragment>) -> Self {
        Self {
            number,
            content: PageContent::Fragments {
                fragments,
                raw_text: None,
            },
        }
    }

    /// Create a page from already linearized text.
    pub fn from_text(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            content: PageContent::Text { text: text.into() },
        }
    }

    /// Attach the decoder's raw text as a fallback.
    ///
    /// Has no effect on text pages.
    pub fn with_raw_text(mut self, raw: impl Into<String>) -> Self {
        if let PageContent::Fragments { raw_text, .. } = &mut self.content {
            *raw_text = Some(raw.into());
        }
        self
    }

    /// Number of fragments on the page (0 for text pages).
    pub fn fragment_count(&self) -> usize {
        match &self.content {
            PageContent::Fragments { fragments, .. } => fragments.len(),
            PageContent::Text { .. } => 0,
        }
    }
}

/// A page after linearization, in reading order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageText {
    /// Page number (1-indexed)
    pub number: u32,
    /// Linear page text, lines separated by `\n`
    pub text: String,
}

impl PageText {
    /// Create a new page text.
    pub fn new(number: u32, text: impl Into<String>) -> Self {
        Self {
            number,
            text: text.into(),
        }
    }

    /// Iterate over the trimmed, non-blank lines of the page.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.text.lines().map(str::trim).filter(|l| !l.is_empty())
    }

    /// Check if the page carries no text.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}
