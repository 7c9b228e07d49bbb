//! Table-of-contents scraping and the section-header fallback.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use super::profile::{collapse_whitespace, CompiledProfile};
use crate::model::{PageText, TocEntry};

/// Shortest accepted TOC title, in characters.
const MIN_TITLE_CHARS: usize = 3;

// Page numbers have at most three digits. Titles may contain years and
// other runs of four or more digits, and in the number-first form may also
// open with a short number ("12 100 Jahre Frauenstimmrecht").
fn number_then_title() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(\d{1,3})\b\s+((?:\d{1,3}\s+)?(?:[^\d]|\d{4,})+)").expect("valid regex")
    })
}

fn title_then_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"((?:[^\d]|\d{4,})+?)[\s.·…]*\b(\d{1,3})\b").expect("valid regex")
    })
}

fn trailing_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|\s)\d{1,3}\s*$").expect("valid regex"))
}

/// Entries scraped from one regex match; comma-split siblings share a group.
type EntryGroup = Vec<TocEntry>;

/// Find TOC entries, falling back to section headers when no TOC is found.
///
/// The result is deduplicated by page and sorted ascending by page.
pub fn detect_toc_entries(pages: &[PageText], profile: &CompiledProfile) -> Vec<TocEntry> {
    let entries = collect_toc_entries(pages, profile);
    if entries.is_empty() {
        log::debug!("No usable table of contents, falling back to section headers");
        return detect_headers(pages, profile);
    }
    entries
}

/// Scrape entries from table-of-contents pages only.
///
/// Returns an empty list when no page carries a TOC marker or no entry
/// survives cleanup.
pub fn collect_toc_entries(pages: &[PageText], profile: &CompiledProfile) -> Vec<TocEntry> {
    let mut groups = Vec::new();

    for page in pages.iter().filter(|p| profile.has_toc_marker(&p.text)) {
        log::debug!("Page {} looks like a table of contents", page.number);
        let text = profile.strip_toc_markers(&page.text);
        for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
            groups.extend(parse_toc_line(line, profile));
        }
    }

    finalize(groups)
}

/// Treat every line that is exactly a section header as an article anchor.
///
/// The header text becomes the placeholder title.
pub fn detect_headers(pages: &[PageText], profile: &CompiledProfile) -> Vec<TocEntry> {
    let groups = pages
        .iter()
        .flat_map(|page| {
            page.lines()
                .filter(|line| profile.is_section_header(line))
                .map(move |line| vec![TocEntry::header(page.number, collapse_whitespace(line))])
        })
        .collect();

    finalize(groups)
}

/// Parse one TOC line into match groups.
fn parse_toc_line(line: &str, profile: &CompiledProfile) -> Vec<EntryGroup> {
    let starts_with_number = line.starts_with(|c: char| c.is_ascii_digit());

    let pairs: Vec<(&str, &str)> = if starts_with_number {
        number_then_title()
            .captures_iter(line)
            .filter_map(|c| Some((c.get(1)?.as_str(), c.get(2)?.as_str())))
            .collect()
    } else {
        title_then_number()
            .captures_iter(line)
            .filter_map(|c| Some((c.get(2)?.as_str(), c.get(1)?.as_str())))
            .collect()
    };

    pairs
        .into_iter()
        .filter_map(|(number, raw_title)| {
            let page: u32 = number.parse().ok()?;
            if page == 0 {
                return None;
            }
            let group: EntryGroup = clean_title(raw_title, profile)
                .into_iter()
                .map(|title| TocEntry::toc(page, title))
                .collect();
            (!group.is_empty()).then_some(group)
        })
        .collect()
}

/// Clean a raw TOC title and split comma lists into sibling titles.
pub(crate) fn clean_title(raw: &str, profile: &CompiledProfile) -> Vec<String> {
    let mut title = collapse_whitespace(raw);

    loop {
        let before = title.len();
        if let Some(m) = trailing_number().find(&title) {
            title.truncate(m.start());
        }
        if let Some(stripped) = profile.strip_trailing_token(&title) {
            title = stripped.to_string();
        }
        title = trim_decoration(&title).to_string();
        if title.len() == before {
            break;
        }
    }

    title
        .split(',')
        .map(trim_decoration)
        .filter(|t| t.chars().count() >= MIN_TITLE_CHARS)
        .map(str::to_string)
        .collect()
}

/// Trim whitespace, dot leaders and stray punctuation from both ends.
fn trim_decoration(text: &str) -> &str {
    text.trim_matches(|c: char| {
        c.is_whitespace() || matches!(c, '.' | '·' | '…' | ',' | ';' | ':' | '-' | '–' | '—' | '|')
    })
}

/// Deduplicate by page and sort.
///
/// The first group seen for a page wins; within it, a sibling similar to an
/// earlier sibling is dropped.
fn finalize(groups: Vec<EntryGroup>) -> Vec<TocEntry> {
    let mut seen_pages = BTreeSet::new();
    let mut entries = Vec::new();

    for group in groups {
        let Some(page) = group.first().map(|e| e.page) else {
            continue;
        };
        if !seen_pages.insert(page) {
            continue;
        }

        let mut kept: Vec<TocEntry> = Vec::with_capacity(group.len());
        for entry in group {
            if kept.iter().any(|k| similar_titles(&k.title, &entry.title)) {
                log::debug!("Dropping duplicate title '{}' on page {}", entry.title, page);
                continue;
            }
            kept.push(entry);
        }
        entries.extend(kept);
    }

    entries.sort_by_key(|e| e.page);
    entries
}

/// Normalized equality or containment.
pub(crate) fn similar_titles(a: &str, b: &str) -> bool {
    let a = normalize_for_compare(a);
    let b = normalize_for_compare(b);
    if a.is_empty() || b.is_empty() {
        return a == b;
    }
    a == b || a.contains(&b) || b.contains(&a)
}

fn normalize_for_compare(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CompiledProfile {
        CompiledProfile::default()
    }

    fn pairs(entries: &[TocEntry]) -> Vec<(u32, &str)> {
        entries.iter().map(|e| (e.page, e.title.as_str())).collect()
    }

    #[test]
    fn test_glued_number_then_title() {
        let pages = vec![PageText::new(
            1,
            "INHALT 14 Saure Grüsse  22 Der Herr des Mythenkreuzes",
        )];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(
            pairs(&entries),
            vec![(14, "Saure Grüsse"), (22, "Der Herr des Mythenkreuzes")]
        );
    }

    #[test]
    fn test_title_then_number_with_leaders() {
        let pages = vec![PageText::new(
            2,
            "Inhaltsverzeichnis\nSaure Grüsse ........ 14\nDer Herr des Mythenkreuzes · 22",
        )];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(
            pairs(&entries),
            vec![(14, "Saure Grüsse"), (22, "Der Herr des Mythenkreuzes")]
        );
    }

    #[test]
    fn test_titles_keep_embedded_numbers() {
        let pages = vec![PageText::new(
            2,
            "Inhalt\nSchweizer Zahlen 2024 ..... 30\n12 100 Jahre Frauenstimmrecht",
        )];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(
            pairs(&entries),
            vec![(12, "100 Jahre Frauenstimmrecht"), (30, "Schweizer Zahlen 2024")]
        );
    }

    #[test]
    fn test_rejects_short_titles_and_page_zero() {
        let pages = vec![PageText::new(1, "INHALT\n0 Vorwort\n5 Ab\n8 Berge")];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(8, "Berge")]);
    }

    #[test]
    fn test_strips_trailing_section_token() {
        let pages = vec![PageText::new(
            1,
            "INHALT 14 Saure Grüsse POLITIK 22 Berge im Nebel",
        )];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(14, "Saure Grüsse"), (22, "Berge im Nebel")]);
    }

    #[test]
    fn test_comma_split_siblings() {
        let pages = vec![PageText::new(1, "INHALT\n9 Müller, Schmidt")];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(9, "Müller"), (9, "Schmidt")]);
    }

    #[test]
    fn test_similar_siblings_merged() {
        let pages = vec![PageText::new(1, "INHALT\n9 Müller, Anna Müller")];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(9, "Müller")]);
    }

    #[test]
    fn test_first_group_per_page_wins() {
        let pages = vec![PageText::new(1, "INHALT\n9 Saure Grüsse\n9 Andere Sache\n4 Editorial")];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(4, "Editorial"), (9, "Saure Grüsse")]);
    }

    #[test]
    fn test_header_fallback() {
        let pages = vec![
            PageText::new(1, "Willkommen"),
            PageText::new(3, "EINREISE\nAnna Muster wandert aus"),
            PageText::new(5, "Text\nPOLITIK\nmehr Text"),
        ];
        let entries = detect_toc_entries(&pages, &profile());
        assert_eq!(pairs(&entries), vec![(3, "EINREISE"), (5, "POLITIK")]);
        assert!(entries
            .iter()
            .all(|e| e.origin == crate::model::EntryOrigin::Header));
    }

    #[test]
    fn test_marker_without_entries_falls_back() {
        let pages = vec![
            PageText::new(1, "Inhalt folgt"),
            PageText::new(4, "KULTUR\nEin Konzert"),
        ];
        assert!(collect_toc_entries(&pages, &profile()).is_empty());
        assert_eq!(pairs(&detect_toc_entries(&pages, &profile())), vec![(4, "KULTUR")]);
    }

    #[test]
    fn test_clean_title_strips_numbers() {
        let p = profile();
        assert_eq!(clean_title("Saure Grüsse 14", &p), vec!["Saure Grüsse"]);
        assert_eq!(clean_title("  Berge ... ", &p), vec!["Berge"]);
    }

    #[test]
    fn test_similar_titles() {
        assert!(similar_titles("Müller", "müller"));
        assert!(similar_titles("Anna Müller", "Müller"));
        assert!(!similar_titles("Müller", "Schmidt"));
    }
}
