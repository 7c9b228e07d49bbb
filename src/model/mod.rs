//! Data model shared by the layout reconstructor and the segmenter.
//!
//! Pages flow in from a page source, are linearized into [`PageText`], and
//! leave the segmenter as [`ArticleCandidate`]s. Records and summaries are
//! the persisted projections of candidates.

mod article;
mod page;

pub use article::{
    ArticleCandidate, ArticleRecord, EntryOrigin, IssueSummary, SummaryEntry, TocEntry,
};
pub use page::{Page, PageContent, PageFragment, PageText};
