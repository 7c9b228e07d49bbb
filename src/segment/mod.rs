//! Article segmentation: turn an issue's page texts into bounded articles.
//!
//! Segmentation runs as a small state machine:
//!
//! ```text
//! CollectToc ──(entries)──► BoundExtract ──► RefineTitles ──► FilterEmpty ──► Done
//!     │                         ▲
//!     └──(none)──► DetectHeaders┘
//! ```
//!
//! With [`SegmentStrategy::HeadersOnly`] the machine starts at `DetectHeaders`.

mod bounds;
mod profile;
mod title;
mod toc;

pub use bounds::bound_and_extract;
pub use profile::{CompiledProfile, PublicationProfile, TitlePattern, SECTIONS_PLACEHOLDER};
pub use title::{normalize_title, refine_title, MAX_TITLE_CHARS};
pub use toc::{collect_toc_entries, detect_headers, detect_toc_entries};

use serde::{Deserialize, Serialize};

use crate::model::{ArticleCandidate, PageText, TocEntry};

/// How article anchors are found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStrategy {
    /// Table of contents first, section headers as fallback
    #[default]
    TocWithBounds,
    /// Section headers only
    HeadersOnly,
}

/// Which candidates get their title replaced from content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TitleRefinement {
    /// Every candidate
    #[default]
    All,
    /// Only candidates anchored on a section header
    PlaceholdersOnly,
    /// Keep detected titles
    Off,
}

/// Options for segmentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentOptions {
    /// Anchor strategy
    pub strategy: SegmentStrategy,

    /// Maximum pages past the start page an article may extend
    pub max_span: u32,

    /// Leading lines of a page checked for a section header
    pub header_scan_lines: usize,

    /// Title refinement mode
    pub title_refinement: TitleRefinement,
}

impl Default for SegmentOptions {
    fn default() -> Self {
        Self {
            strategy: SegmentStrategy::TocWithBounds,
            max_span: 20,
            header_scan_lines: 3,
            title_refinement: TitleRefinement::All,
        }
    }
}

impl SegmentOptions {
    /// Create new segment options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the anchor strategy.
    pub fn with_strategy(mut self, strategy: SegmentStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Set the maximum article span.
    pub fn with_max_span(mut self, pages: u32) -> Self {
        self.max_span = pages;
        self
    }

    /// Set how many leading lines are checked for section headers.
    pub fn with_header_scan_lines(mut self, lines: usize) -> Self {
        self.header_scan_lines = lines;
        self
    }

    /// Set the title refinement mode.
    pub fn with_title_refinement(mut self, mode: TitleRefinement) -> Self {
        self.title_refinement = mode;
        self
    }
}

/// Where the article anchors came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnchorSource {
    /// A table of contents
    Toc,
    /// Section headers in the page bodies
    Headers,
}

/// Result of segmenting one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Where the anchors came from
    pub anchors: AnchorSource,
    /// Anchors, sorted by page
    pub entries: Vec<TocEntry>,
    /// Final candidates, sorted by start page
    pub candidates: Vec<ArticleCandidate>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentState {
    CollectToc,
    DetectHeaders,
    BoundExtract,
    RefineTitles,
    FilterEmpty,
    Done,
}

/// Splits an issue into articles.
#[derive(Debug, Clone, Default)]
pub struct Segmenter {
    profile: CompiledProfile,
    options: SegmentOptions,
}

impl Segmenter {
    /// Create a segmenter for a compiled profile.
    pub fn new(profile: CompiledProfile, options: SegmentOptions) -> Self {
        Self { profile, options }
    }

    /// The publication profile in use.
    pub fn profile(&self) -> &CompiledProfile {
        &self.profile
    }

    /// The segment options in use.
    pub fn options(&self) -> &SegmentOptions {
        &self.options
    }

    /// Find article anchors without bounding them.
    pub fn detect_entries(&self, pages: &[PageText]) -> (AnchorSource, Vec<TocEntry>) {
        if self.options.strategy == SegmentStrategy::TocWithBounds {
            let entries = collect_toc_entries(pages, &self.profile);
            if !entries.is_empty() {
                return (AnchorSource::Toc, entries);
            }
        }
        (AnchorSource::Headers, detect_headers(pages, &self.profile))
    }

    /// Segment an issue's pages.
    pub fn segment(&self, pages: &[PageText]) -> Segmentation {
        let mut state = match self.options.strategy {
            SegmentStrategy::TocWithBounds => SegmentState::CollectToc,
            SegmentStrategy::HeadersOnly => SegmentState::DetectHeaders,
        };
        let mut anchors = AnchorSource::Headers;
        let mut entries = Vec::new();
        let mut drafts = Vec::new();

        while state != SegmentState::Done {
            let next = match state {
                SegmentState::CollectToc => {
                    entries = collect_toc_entries(pages, &self.profile);
                    if entries.is_empty() {
                        SegmentState::DetectHeaders
                    } else {
                        anchors = AnchorSource::Toc;
                        SegmentState::BoundExtract
                    }
                }
                SegmentState::DetectHeaders => {
                    entries = detect_headers(pages, &self.profile);
                    anchors = AnchorSource::Headers;
                    SegmentState::BoundExtract
                }
                SegmentState::BoundExtract => {
                    drafts = bounds::bound(&entries, pages, &self.profile, &self.options);
                    SegmentState::RefineTitles
                }
                SegmentState::RefineTitles => {
                    bounds::refine(&mut drafts, &self.profile, self.options.title_refinement);
                    SegmentState::FilterEmpty
                }
                SegmentState::FilterEmpty => {
                    bounds::filter_empty(&mut drafts);
                    SegmentState::Done
                }
                SegmentState::Done => SegmentState::Done,
            };
            log::debug!(
                "Segmenter {:?} -> {:?} ({} entries, {} candidates)",
                state,
                next,
                entries.len(),
                drafts.len()
            );
            state = next;
        }

        Segmentation {
            anchors,
            entries,
            candidates: drafts.into_iter().map(|d| d.candidate).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_options_builder() {
        let options = SegmentOptions::new()
            .with_strategy(SegmentStrategy::HeadersOnly)
            .with_max_span(8)
            .with_header_scan_lines(5)
            .with_title_refinement(TitleRefinement::Off);

        assert_eq!(options.strategy, SegmentStrategy::HeadersOnly);
        assert_eq!(options.max_span, 8);
        assert_eq!(options.header_scan_lines, 5);
        assert_eq!(options.title_refinement, TitleRefinement::Off);
        assert_eq!(SegmentOptions::default().max_span, 20);
    }

    #[test]
    fn test_toc_strategy_prefers_toc() {
        let pages = vec![
            PageText::new(1, "INHALT 14 Saure Grüsse"),
            PageText::new(14, "POLITIK\nText"),
        ];
        let result = Segmenter::default().segment(&pages);
        assert_eq!(result.anchors, AnchorSource::Toc);
        assert_eq!(result.entries, vec![TocEntry::toc(14, "Saure Grüsse")]);
    }

    #[test]
    fn test_headers_only_ignores_toc() {
        let pages = vec![
            PageText::new(1, "INHALT 14 Saure Grüsse"),
            PageText::new(14, "POLITIK\nSaure Grüsse aus Bern"),
        ];
        let segmenter = Segmenter::new(
            CompiledProfile::default(),
            SegmentOptions::new().with_strategy(SegmentStrategy::HeadersOnly),
        );
        let result = segmenter.segment(&pages);
        assert_eq!(result.anchors, AnchorSource::Headers);
        assert_eq!(result.entries, vec![TocEntry::header(14, "POLITIK")]);
        assert_eq!(result.candidates[0].title, "Saure Grüsse aus Bern");
        assert_eq!(segmenter.detect_entries(&pages).0, AnchorSource::Headers);
    }

    #[test]
    fn test_no_anchors_yields_nothing() {
        let pages = vec![PageText::new(1, "Nur Text ohne Struktur")];
        let result = Segmenter::default().segment(&pages);
        assert_eq!(result.anchors, AnchorSource::Headers);
        assert!(result.entries.is_empty());
        assert!(result.candidates.is_empty());
    }
}
