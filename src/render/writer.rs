//! Writes an issue's article records and summary to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::model::{ArticleCandidate, ArticleRecord, IssueSummary, SummaryEntry};

use super::json::{to_json, JsonFormat};
use super::naming::{article_filename, ArticleSequence, RECORD_EXTENSION};

/// Name of the issue-level summary file.
pub const SUMMARY_FILE: &str = "summary.json";

/// Writes one directory per issue under an output root.
///
/// Layout: `<out>/<issue>/<NNN>_<slug>.json` per article plus
/// `<out>/<issue>/summary.json`. Records listed in the summary of an
/// earlier run are removed first, so rerunning on unchanged input gives
/// identical output.
#[derive(Debug, Clone)]
pub struct IssueWriter {
    out_dir: PathBuf,
    format: JsonFormat,
}

impl IssueWriter {
    /// Create a writer rooted at `out_dir`.
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            format: JsonFormat::Pretty,
        }
    }

    /// Set the JSON format.
    pub fn with_format(mut self, format: JsonFormat) -> Self {
        self.format = format;
        self
    }

    /// The output root.
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Directory that receives an issue's files.
    pub fn issue_dir(&self, issue: &str) -> PathBuf {
        self.out_dir.join(issue)
    }

    /// Write every candidate as a record, then the summary.
    ///
    /// Ordinals are drawn from `sequence` in candidate order.
    pub fn write(
        &self,
        issue: &str,
        candidates: &[ArticleCandidate],
        sequence: &mut ArticleSequence,
    ) -> Result<IssueSummary> {
        let dir = self.issue_dir(issue);
        fs::create_dir_all(&dir)?;
        remove_stale_records(&dir)?;

        let mut articles = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            let ordinal = sequence.next_ordinal();
            let record = ArticleRecord::from_candidate(ordinal, candidate);
            let filename = article_filename(record.start_page, &record.title, ordinal);

            fs::write(dir.join(&filename), to_json(&record, self.format)?)?;
            log::debug!("Wrote {}", dir.join(&filename).display());

            articles.push(SummaryEntry {
                title: record.title,
                start_page: record.start_page,
                page_list: record.page_list,
                filename,
            });
        }

        let summary = IssueSummary {
            issue: issue.to_string(),
            article_count: articles.len(),
            articles,
        };
        fs::write(dir.join(SUMMARY_FILE), to_json(&summary, self.format)?)?;

        Ok(summary)
    }
}

/// Delete the records listed in a previous run's summary.
///
/// Files the summary does not name are left alone. An unreadable summary
/// is logged and ignored.
fn remove_stale_records(dir: &Path) -> Result<()> {
    let summary_path = dir.join(SUMMARY_FILE);
    let json = match fs::read_to_string(&summary_path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    let previous: IssueSummary = match serde_json::from_str(&json) {
        Ok(summary) => summary,
        Err(e) => {
            log::warn!("Ignoring unreadable {}: {}", summary_path.display(), e);
            return Ok(());
        }
    };

    for entry in &previous.articles {
        // Only bare record names inside the issue directory
        let name = Path::new(&entry.filename);
        let is_record = name.file_name() == Some(name.as_os_str())
            && name
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(RECORD_EXTENSION))
            && entry.filename != SUMMARY_FILE;
        if !is_record {
            log::warn!("Not removing '{}' listed in {}", entry.filename, summary_path.display());
            continue;
        }

        match fs::remove_file(dir.join(name)) {
            Ok(()) => log::debug!("Removed stale record {}", entry.filename),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}
