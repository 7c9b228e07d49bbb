//! End-to-end processing: load an issue, linearize, segment, save.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{IssueSummary, PageText};
use crate::parser::{LayoutOptions, LayoutReconstructor, ParseOptions};
use crate::render::{ArticleSequence, IssueWriter, JsonFormat};
use crate::segment::{PublicationProfile, SegmentOptions, Segmentation, Segmenter};
use crate::source::SourceRegistry;

/// Counters collected while processing one issue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueStats {
    /// Pages delivered by the source
    pub page_count: u32,

    /// Pages whose reconstructed text is blank
    pub blank_page_count: u32,

    /// Article anchors found
    pub entry_count: u32,

    /// Articles kept after filtering
    pub article_count: u32,

    /// Approximate word count over all articles
    pub word_count: u32,
}

impl IssueStats {
    /// Collect statistics from an issue's pages and segmentation.
    pub fn collect(pages: &[PageText], segmentation: &Segmentation) -> Self {
        Self {
            page_count: pages.len() as u32,
            blank_page_count: pages.iter().filter(|p| p.is_blank()).count() as u32,
            entry_count: segmentation.entries.len() as u32,
            article_count: segmentation.candidates.len() as u32,
            word_count: segmentation
                .candidates
                .iter()
                .map(|c| c.content.split_whitespace().count() as u32)
                .sum(),
        }
    }
}

/// A segmented issue, not yet written.
#[derive(Debug, Clone)]
pub struct IssueOutput {
    /// Issue name (input file stem)
    pub issue: String,
    /// Reconstructed page texts
    pub pages: Vec<PageText>,
    /// Anchors and final candidates
    pub segmentation: Segmentation,
    /// Processing counters
    pub stats: IssueStats,
}

/// Outcome of one issue in a batch.
#[derive(Debug)]
pub struct IssueReport {
    /// Input file
    pub path: PathBuf,
    /// Counters, when segmentation finished
    pub stats: Option<IssueStats>,
    /// Written summary, or the error that stopped this issue
    pub result: Result<IssueSummary>,
}

impl IssueReport {
    /// Whether the issue was processed and written.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }

    /// Number of saved articles (0 on failure).
    pub fn article_count(&self) -> usize {
        self.result.as_ref().map_or(0, |s| s.article_count)
    }
}

/// The configured pipeline.
///
/// # Example
///
/// ```no_run
/// use magsplit::Magsplit;
///
/// fn main() -> magsplit::Result<()> {
///     let magsplit = Magsplit::builder().build()?;
///     let output = magsplit.process_issue("revue-2024-06.pdf")?;
///     magsplit.write_issue(&output, "articles")?;
///     Ok(())
/// }
/// ```
pub struct Magsplit {
    registry: SourceRegistry,
    layout: LayoutReconstructor,
    segmenter: Segmenter,
    format: JsonFormat,
}

impl Magsplit {
    /// Start configuring a pipeline.
    pub fn builder() -> MagsplitBuilder {
        MagsplitBuilder::new()
    }

    /// The segmenter in use.
    pub fn segmenter(&self) -> &Segmenter {
        &self.segmenter
    }

    /// Load an issue and reconstruct its page texts.
    pub fn load_pages<P: AsRef<Path>>(&self, path: P) -> Result<Vec<PageText>> {
        let pages = self.registry.load(path.as_ref())?;
        Ok(self.layout.reconstruct_all(&pages))
    }

    /// Load, linearize and segment one issue.
    ///
    /// The whole issue is read into memory before segmentation starts.
    pub fn process_issue<P: AsRef<Path>>(&self, path: P) -> Result<IssueOutput> {
        let path = path.as_ref();
        let issue = issue_name(path)?;

        let pages = self.load_pages(path)?;
        let segmentation = self.segmenter.segment(&pages);
        let stats = IssueStats::collect(&pages, &segmentation);

        log::info!(
            "{}: {} pages, {} anchors ({:?}), {} articles",
            issue,
            stats.page_count,
            stats.entry_count,
            segmentation.anchors,
            stats.article_count
        );

        Ok(IssueOutput {
            issue,
            pages,
            segmentation,
            stats,
        })
    }

    /// Write a segmented issue under `out_dir`.
    pub fn write_issue<P: AsRef<Path>>(
        &self,
        output: &IssueOutput,
        out_dir: P,
    ) -> Result<IssueSummary> {
        let writer = IssueWriter::new(out_dir.as_ref()).with_format(self.format);
        let mut sequence = ArticleSequence::new();
        writer.write(&output.issue, &output.segmentation.candidates, &mut sequence)
    }

    /// Process and write several issues in parallel.
    ///
    /// A failing issue is reported in its own [`IssueReport`] and does not
    /// stop the others. Reports come back in input order.
    ///
    /// Each issue owns the directory named after it. When several inputs
    /// map to the same issue name, the first one in input order is
    /// processed and the others fail with [`Error::UnsupportedInput`].
    pub fn process_batch<P: AsRef<Path> + Sync>(
        &self,
        paths: &[P],
        out_dir: &Path,
    ) -> Vec<IssueReport> {
        let owners = issue_owners(paths);

        paths
            .par_iter()
            .zip(owners.par_iter())
            .map(|(path, owner)| {
                let path = path.as_ref();
                let mut stats = None;
                let result = match owner {
                    Some(owner) => Err(Error::UnsupportedInput(format!(
                        "{} has the same issue name as {}",
                        path.display(),
                        owner.display()
                    ))),
                    None => self.process_issue(path).and_then(|output| {
                        stats = Some(output.stats.clone());
                        self.write_issue(&output, out_dir)
                    }),
                };
                if let Err(e) = &result {
                    log::error!("{}: {}", path.display(), e);
                }
                IssueReport {
                    path: path.to_path_buf(),
                    stats,
                    result,
                }
            })
            .collect()
    }
}

/// Builder for [`Magsplit`].
#[derive(Debug, Clone, Default)]
pub struct MagsplitBuilder {
    profile: PublicationProfile,
    parse: ParseOptions,
    layout: LayoutOptions,
    segment: SegmentOptions,
    format: JsonFormat,
}

impl MagsplitBuilder {
    /// Create a builder with the built-in profile and default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the publication profile.
    pub fn with_profile(mut self, profile: PublicationProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set PDF parse options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set layout options.
    pub fn with_layout_options(mut self, options: LayoutOptions) -> Self {
        self.layout = options;
        self
    }

    /// Set segment options.
    pub fn with_segment_options(mut self, options: SegmentOptions) -> Self {
        self.segment = options;
        self
    }

    /// Set the output JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// Compile the profile and assemble the pipeline.
    pub fn build(self) -> Result<Magsplit> {
        let profile = self.profile.compile()?;
        Ok(Magsplit {
            registry: SourceRegistry::with_parse_options(self.parse),
            layout: LayoutReconstructor::new(self.layout),
            segmenter: Segmenter::new(profile, self.segment),
            format: self.format,
        })
    }
}

/// Issue name: the input file stem.
fn issue_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| Error::UnsupportedInput(format!("{} has no file name", path.display())))
}

/// For each input, the earlier input that already claimed its issue name.
///
/// Names are compared case-insensitively since some file systems fold case.
fn issue_owners<P: AsRef<Path>>(paths: &[P]) -> Vec<Option<PathBuf>> {
    let mut claimed: HashMap<String, usize> = HashMap::new();
    paths
        .iter()
        .enumerate()
        .map(|(i, path)| {
            let name = issue_name(path.as_ref()).ok()?.to_lowercase();
            let owner = *claimed.entry(name).or_insert(i);
            (owner != i).then(|| paths[owner].as_ref().to_path_buf())
        })
        .collect()
}
