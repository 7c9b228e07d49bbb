//! Page-range bounding and content extraction.

use std::collections::BTreeMap;

use super::profile::CompiledProfile;
use super::title::refine_title;
use super::{SegmentOptions, TitleRefinement};
use crate::model::{ArticleCandidate, EntryOrigin, PageText, TocEntry};

/// A bounded candidate that still remembers how it was anchored.
#[derive(Debug, Clone)]
pub(crate) struct Draft {
    pub origin: EntryOrigin,
    /// Another entry starts on the same page
    pub co_anchored: bool,
    pub candidate: ArticleCandidate,
}

/// Bound entries to page ranges, refine titles and drop empty candidates.
///
/// `entries` must be sorted by page, as returned by
/// [`detect_toc_entries`](super::detect_toc_entries).
pub fn bound_and_extract(
    entries: &[TocEntry],
    pages: &[PageText],
    profile: &CompiledProfile,
    options: &SegmentOptions,
) -> Vec<ArticleCandidate> {
    let mut drafts = bound(entries, pages, profile, options);
    refine(&mut drafts, profile, options.title_refinement);
    filter_empty(&mut drafts);
    drafts.into_iter().map(|d| d.candidate).collect()
}

/// Assign each entry its page range and collect the page text.
pub(crate) fn bound(
    entries: &[TocEntry],
    pages: &[PageText],
    profile: &CompiledProfile,
    options: &SegmentOptions,
) -> Vec<Draft> {
    let by_number: BTreeMap<u32, &PageText> = pages.iter().map(|p| (p.number, p)).collect();

    entries
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let start = entry.page;
            let cap = start.saturating_add(options.max_span);
            let range_end = entries[i + 1..]
                .iter()
                .find(|e| e.page > start)
                .map_or(cap, |next| (next.page - 1).min(cap));

            let successor = entries.get(i + 1);
            let mut candidate = ArticleCandidate::new(entry.title.clone(), start);
            candidate.end_page = range_end;

            for (&number, page) in by_number.range(start..=range_end) {
                let header_break = number > start
                    && successor.is_some_and(|next| next.page <= number)
                    && page
                        .lines()
                        .take(options.header_scan_lines)
                        .any(|line| profile.contains_section_header(line));
                if header_break {
                    log::debug!(
                        "'{}' ends before page {}: section header of the next article",
                        candidate.title,
                        number
                    );
                    candidate.end_page = number - 1;
                    break;
                }
                candidate.push_page(number, &page.text);
            }

            let co_anchored = entries
                .iter()
                .enumerate()
                .any(|(j, other)| j != i && other.page == start);

            Draft {
                origin: entry.origin,
                co_anchored,
                candidate,
            }
        })
        .collect()
}

/// Replace titles with ones found in the article content.
pub(crate) fn refine(drafts: &mut [Draft], profile: &CompiledProfile, mode: TitleRefinement) {
    for draft in drafts.iter_mut() {
        let eligible = match mode {
            TitleRefinement::Off => false,
            TitleRefinement::All => true,
            TitleRefinement::PlaceholdersOnly => draft.origin == EntryOrigin::Header,
        };
        if !eligible || draft.co_anchored {
            continue;
        }

        let candidate = &mut draft.candidate;
        let refined = refine_title(&candidate.content, &candidate.title, profile);
        if refined != candidate.title && refined.chars().count() > 2 {
            log::debug!("Refined title '{}' -> '{}'", candidate.title, refined);
            candidate.title = refined;
        }
    }
}

/// Drop candidates whose content is empty or whitespace-only.
pub(crate) fn filter_empty(drafts: &mut Vec<Draft>) {
    drafts.retain(|d| {
        let keep = d.candidate.has_content();
        if !keep {
            log::debug!("Dropping empty article '{}'", d.candidate.title);
        }
        keep
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pages(layout: &[(u32, &str)]) -> Vec<PageText> {
        layout.iter().map(|&(n, t)| PageText::new(n, t)).collect()
    }

    fn no_refinement() -> SegmentOptions {
        SegmentOptions::default().with_title_refinement(TitleRefinement::Off)
    }

    #[test]
    fn test_ranges_end_before_next_entry() {
        let entries = vec![TocEntry::toc(14, "Saure Grüsse"), TocEntry::toc(22, "Berge")];
        let pages = pages(&[(14, "a"), (15, "b"), (21, "c"), (22, "d"), (30, "e")]);
        let out = bound_and_extract(&entries, &pages, &CompiledProfile::default(), &no_refinement());

        assert_eq!(out.len(), 2);
        assert_eq!((out[0].start_page, out[0].end_page), (14, 21));
        assert_eq!(out[0].page_list, vec![14, 15, 21]);
        assert_eq!(out[0].content, "a\n\nb\n\nc");
        assert_eq!((out[1].start_page, out[1].end_page), (22, 42));
        assert_eq!(out[1].page_list, vec![22, 30]);
    }

    #[test]
    fn test_span_cap_applies_to_every_entry() {
        let entries = vec![TocEntry::toc(2, "Erster"), TocEntry::toc(60, "Zweiter")];
        let pages = pages(&[(2, "a"), (30, "b"), (60, "c")]);
        let options = no_refinement().with_max_span(5);
        let out = bound_and_extract(&entries, &pages, &CompiledProfile::default(), &options);
        assert_eq!((out[0].start_page, out[0].end_page), (2, 7));
        assert_eq!(out[0].page_list, vec![2]);
    }

    #[test]
    fn test_header_terminates_co_anchored_range() {
        let entries = vec![TocEntry::toc(9, "Müller"), TocEntry::toc(9, "Schmidt")];
        let pages = pages(&[(9, "Müller erzählt"), (10, "weiter"), (11, "KULTUR\nNeues")]);
        let out = bound_and_extract(&entries, &pages, &CompiledProfile::default(), &no_refinement());

        assert_eq!(out[0].page_list, vec![9, 10]);
        assert_eq!(out[0].end_page, 10);
        // The last entry has no successor, so the header does not stop it
        assert_eq!(out[1].page_list, vec![9, 10, 11]);
    }

    #[test]
    fn test_empty_content_dropped() {
        let entries = vec![TocEntry::toc(3, "Leer"), TocEntry::toc(5, "Voll")];
        let pages = pages(&[(3, "   \n\t"), (5, "Text")]);
        let out = bound_and_extract(&entries, &pages, &CompiledProfile::default(), &no_refinement());
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].title, "Voll");
    }

    #[test]
    fn test_refinement_modes() {
        let profile = CompiledProfile::default();
        let entries = vec![TocEntry::header(3, "EINREISE"), TocEntry::toc(5, "Alt")];
        let pages = pages(&[
            (3, "EINREISE\nAnna Muster wandert aus"),
            (5, "Bergbauern im Wallis\nText"),
        ]);

        let all = bound_and_extract(&entries, &pages, &profile, &SegmentOptions::default());
        assert_eq!(all[0].title, "Anna Muster wandert aus");
        assert_eq!(all[1].title, "Bergbauern im Wallis");

        let placeholders = SegmentOptions::default()
            .with_title_refinement(TitleRefinement::PlaceholdersOnly);
        let out = bound_and_extract(&entries, &pages, &profile, &placeholders);
        assert_eq!(out[0].title, "Anna Muster wandert aus");
        assert_eq!(out[1].title, "Alt");

        let off = bound_and_extract(&entries, &pages, &profile, &no_refinement());
        assert_eq!(out.len(), off.len());
        assert_eq!(off[0].title, "EINREISE");
    }

    #[test]
    fn test_co_anchored_titles_kept() {
        let entries = vec![TocEntry::toc(9, "Müller"), TocEntry::toc(9, "Schmidt")];
        let pages = pages(&[(9, "Bergbauern im Wallis")]);
        let out = bound_and_extract(
            &entries,
            &pages,
            &CompiledProfile::default(),
            &SegmentOptions::default(),
        );
        let titles: Vec<&str> = out.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Müller", "Schmidt"]);
    }
}
