//! # magsplit
//!
//! Split scanned magazine issues into article records.
//!
//! Pages are decoded into positioned text fragments, put back into reading
//! order, and then partitioned into articles using the issue's table of
//! contents, or the magazine's recurring section headers when there is none.
//!
//! ## Quick Start
//!
//! ```no_run
//! use magsplit::{load_pages, segment_pages};
//!
//! fn main() -> magsplit::Result<()> {
//!     // Decode and linearize every page of an issue
//!     let pages = load_pages("revue-2024-06.pdf")?;
//!
//!     // Split into articles with the built-in profile
//!     let segmentation = segment_pages(&pages);
//!     for article in &segmentation.candidates {
//!         println!("{:>3}-{:<3} {}", article.start_page, article.end_page, article.title);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Layout reconstruction**: single- and two-column pages, with a raw-text fallback
//! - **TOC anchoring**: titles and start pages scraped from the contents page
//! - **Header fallback**: recurring rubric names as anchors when there is no TOC
//! - **Title refinement**: better titles found in the article text
//! - **Publication profiles**: all magazine-specific tables in one JSON file
//! - **Parallel batches**: several issues at once with Rayon
//!
//! ## Known limitation
//!
//! Two-column pages are read as the full left column followed by the full
//! right column.

pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod render;
pub mod segment;
pub mod source;

// Re-export commonly used types
pub use error::{Error, Result};
pub use model::{
    ArticleCandidate, ArticleRecord, EntryOrigin, IssueSummary, Page, PageContent, PageFragment,
    PageText, SummaryEntry, TocEntry,
};
pub use parser::{looks_reasonable, ErrorMode, LayoutOptions, LayoutReconstructor, ParseOptions};
pub use pipeline::{IssueOutput, IssueReport, IssueStats, Magsplit, MagsplitBuilder};
pub use render::{article_filename, ArticleSequence, IssueWriter, JsonFormat};
pub use segment::{
    AnchorSource, CompiledProfile, PublicationProfile, SegmentOptions, SegmentStrategy,
    Segmentation, Segmenter, TitleRefinement,
};
pub use source::{JsonPageSource, PageSource, PdfSource, SourceRegistry};

use std::path::Path;

/// Load an issue and reconstruct the reading order of every page.
///
/// The input format is chosen by extension (`.pdf` or `.json`).
///
/// # Example
///
/// ```no_run
/// use magsplit::load_pages;
///
/// let pages = load_pages("revue-2024-06.pdf").unwrap();
/// println!("Pages: {}", pages.len());
/// ```
pub fn load_pages<P: AsRef<Path>>(path: P) -> Result<Vec<PageText>> {
    let pages = SourceRegistry::with_defaults().load(path.as_ref())?;
    Ok(LayoutReconstructor::default().reconstruct_all(&pages))
}

/// Linearize positioned fragments with default layout options.
///
/// # Example
///
/// ```
/// use magsplit::{linearize, PageFragment};
///
/// let text = linearize(&[
///     PageFragment::new(72.0, 700.0, "Saure"),
///     PageFragment::new(110.0, 700.0, "Grüsse"),
/// ]);
/// assert_eq!(text, "Saure Grüsse");
/// ```
pub fn linearize(fragments: &[PageFragment]) -> String {
    LayoutReconstructor::default().linearize(fragments)
}

/// Segment page texts with the built-in profile and default options.
pub fn segment_pages(pages: &[PageText]) -> Segmentation {
    Segmenter::default().segment(pages)
}

/// Segment an issue file and write its records under `out_dir`.
///
/// # Example
///
/// ```no_run
/// use magsplit::split_file;
///
/// let summary = split_file("revue-2024-06.pdf", "articles").unwrap();
/// println!("{} articles", summary.article_count);
/// ```
pub fn split_file<P: AsRef<Path>, Q: AsRef<Path>>(path: P, out_dir: Q) -> Result<IssueSummary> {
    let magsplit = Magsplit::builder().build()?;
    let output = magsplit.process_issue(path)?;
    magsplit.write_issue(&output, out_dir)
}
