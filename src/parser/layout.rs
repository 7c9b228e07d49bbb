//! Reading-order reconstruction for magazine pages.
//!
//! This module turns the positioned fragments of a page into linear text.
//! Pages are classified as single- or two-column; each column is grouped
//! into lines top to bottom, and the columns are concatenated left first.
//!
//! Reading the whole left column before the right one matches the magazine
//! layouts this was tuned for. Pages with spanning headlines in the middle
//! of a column pair, or with three columns, are not reordered correctly.

use std::cmp::Ordering;
use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

use crate::model::{Page, PageContent, PageFragment, PageText};

use super::options::LayoutOptions;

/// Column classification of a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColumnLayout {
    /// One column, read top to bottom
    Single,
    /// Two columns separated at `midpoint`
    Double {
        /// X coordinate separating left and right column
        midpoint: f32,
    },
}

impl ColumnLayout {
    /// Check if this is a two-column layout.
    pub fn is_double(&self) -> bool {
        matches!(self, ColumnLayout::Double { .. })
    }
}

/// Layout reconstructor.
#[derive(Debug, Clone, Default)]
pub struct LayoutReconstructor {
    options: LayoutOptions,
}

impl LayoutReconstructor {
    /// Create a reconstructor with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    /// Get the layout options.
    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Reconstruct the reading-order text of a page.
    ///
    /// Text pages pass through unchanged. Fragment pages are linearized;
    /// when the result does not look like text, the decoder's raw text is
    /// used instead if there is any. This never fails: the weakest outcome
    /// is an empty string.
    pub fn reconstruct(&self, page: &Page) -> PageText {
        let text: String = match &page.content {
            PageContent::Text { text } => text.nfc().collect(),
            PageContent::Fragments {
                fragments,
                raw_text,
            } => {
                let linear = self.linearize(fragments);
                if looks_reasonable(&linear) {
                    linear
                } else {
                    match raw_text.as_deref().map(str::trim) {
                        Some(raw) if !raw.is_empty() => {
                            log::debug!(
                                "Page {}: layout text rejected, using raw extraction",
                                page.number
                            );
                            raw.nfc().collect()
                        }
                        _ => linear,
                    }
                }
            }
        };

        PageText::new(page.number, text)
    }

    /// Reconstruct all pages of an issue, preserving page order.
    pub fn reconstruct_all(&self, pages: &[Page]) -> Vec<PageText> {
        pages.iter().map(|p| self.reconstruct(p)).collect()
    }

    /// Linearize fragments into reading-order text.
    ///
    /// Returns an empty string for an empty fragment list.
    pub fn linearize(&self, fragments: &[PageFragment]) -> String {
        let fragments = usable_fragments(fragments);
        if fragments.is_empty() {
            return String::new();
        }

        let text = match self.classify_columns(&fragments) {
            ColumnLayout::Single => self.linearize_column(fragments),
            ColumnLayout::Double { midpoint } => {
                let (left, right): (Vec<_>, Vec<_>) =
                    fragments.into_iter().partition(|f| f.x < midpoint);
                let left = self.linearize_column(left);
                let right = self.linearize_column(right);
                format!("{}\n\n{}", left, right)
            }
        };

        text.nfc().collect()
    }

    /// Decide whether the fragments form one or two columns.
    pub fn classify_columns(&self, fragments: &[PageFragment]) -> ColumnLayout {
        let xs = fragments.iter().filter(|f| f.is_usable()).map(|f| f.x);
        let (min_x, max_x) = xs.fold((f32::MAX, f32::MIN), |(lo, hi), x| {
            (lo.min(x), hi.max(x))
        });
        if min_x > max_x {
            return ColumnLayout::Single;
        }

        let spread = max_x - min_x;
        let midpoint = (min_x + max_x) / 2.0;
        let margin = self.options.column_margin;

        let left = fragments
            .iter()
            .filter(|f| f.is_usable() && f.x < midpoint - margin)
            .count();
        let right = fragments
            .iter()
            .filter(|f| f.is_usable() && f.x > midpoint + margin)
            .count();

        log::debug!(
            "Column check: left={}, right={}, spread={:.1}, midpoint={:.1}",
            left,
            right,
            spread,
            midpoint
        );

        let min_population = self.options.min_column_population;
        if left >= min_population
            && right >= min_population
            && spread > self.options.min_column_spread
        {
            ColumnLayout::Double { midpoint }
        } else {
            ColumnLayout::Single
        }
    }

    /// Group one column's fragments into lines and join them.
    fn linearize_column(&self, mut fragments: Vec<PageFragment>) -> String {
        if fragments.is_empty() {
            return String::new();
        }

        // Top of page first (PDF Y is bottom-up), then left to right
        fragments.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(Ordering::Equal);
            if y_cmp == Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let tolerance = self.options.line_tolerance;
        let mut lines: Vec<String> = Vec::new();
        let mut current: Vec<PageFragment> = Vec::new();
        let mut line_y: Option<f32> = None;

        for fragment in fragments {
            match line_y {
                Some(y) if (fragment.y - y).abs() < tolerance => current.push(fragment),
                _ => {
                    if !current.is_empty() {
                        lines.push(join_line(std::mem::take(&mut current)));
                    }
                    line_y = Some(fragment.y);
                    current.push(fragment);
                }
            }
        }

        // Don't forget the last line
        if !current.is_empty() {
            lines.push(join_line(current));
        }

        lines.join("\n")
    }
}

/// Check whether linearized text looks like real page text.
///
/// Rejects empty text, pages of more than five lines where over 70% of the
/// lines are at most two characters long (fragment-level garbage), and pages
/// that reduce to a run of more than 20 digits (stray page numbers).
pub fn looks_reasonable(text: &str) -> bool {
    let lines: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return false;
    }

    if lines.len() > 5 {
        let short = lines.iter().filter(|l| l.chars().count() <= 2).count();
        if short as f32 / lines.len() as f32 > 0.7 {
            return false;
        }
    }

    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.chars().count() > 20 && compact.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    true
}

/// Drop unusable fragments and exact duplicates, keeping decoding order.
fn usable_fragments(fragments: &[PageFragment]) -> Vec<PageFragment> {
    let mut seen: HashSet<(u32, u32, &str)> = HashSet::with_capacity(fragments.len());
    let mut result = Vec::with_capacity(fragments.len());
    for fragment in fragments.iter().filter(|f| f.is_usable()) {
        // Adding 0.0 folds -0.0 into 0.0 so both share a key
        let key = (
            (fragment.x + 0.0).to_bits(),
            (fragment.y + 0.0).to_bits(),
            fragment.text.as_str(),
        );
        if seen.insert(key) {
            result.push(fragment.clone());
        }
    }
    result
}

/// Join the fragments of one line left to right.
fn join_line(mut fragments: Vec<PageFragment>) -> String {
    fragments.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(Ordering::Equal));
    fragments
        .iter()
        .map(|f| f.text.trim())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(x: f32, y: f32, text: &str) -> PageFragment {
        PageFragment::new(x, y, text)
    }

    /// Two columns of `rows` lines each, left at x=50 and right at x=320.
    fn two_column_fragments(rows: usize) -> Vec<PageFragment> {
        let mut fragments = Vec::new();
        for i in 0..rows {
            let y = 700.0 - i as f32 * 14.0;
            fragments.push(frag(50.0, y, &format!("L{}", i)));
            fragments.push(frag(320.0, y, &format!("R{}", i)));
        }
        fragments
    }

    #[test]
    fn test_linearize_empty() {
        let layout = LayoutReconstructor::default();
        assert_eq!(layout.linearize(&[]), "");
    }

    #[test]
    fn test_single_column_lines() {
        let layout = LayoutReconstructor::default();
        let fragments = vec![
            frag(120.0, 700.0, "Welt"),
            frag(50.0, 700.0, "Hallo"),
            frag(50.0, 686.0, "zweite"),
            frag(100.0, 687.5, "Zeile"),
        ];

        assert_eq!(layout.linearize(&fragments), "Hallo Welt\nzweite Zeile");
    }

    #[test]
    fn test_line_tolerance_is_strict() {
        let layout = LayoutReconstructor::default();
        let fragments = vec![frag(50.0, 700.0, "oben"), frag(60.0, 697.0, "unten")];
        assert_eq!(layout.linearize(&fragments), "oben\nunten");
    }

    #[test]
    fn test_two_column_classification() {
        let layout = LayoutReconstructor::default();
        let fragments = two_column_fragments(10);
        assert!(layout.classify_columns(&fragments).is_double());
    }

    #[test]
    fn test_sparse_columns_stay_single() {
        let layout = LayoutReconstructor::default();
        let fragments = two_column_fragments(9);
        assert_eq!(layout.classify_columns(&fragments), ColumnLayout::Single);
    }

    #[test]
    fn test_narrow_spread_stays_single() {
        let layout = LayoutReconstructor::default();
        let mut fragments = Vec::new();
        for i in 0..12 {
            let y = 700.0 - i as f32 * 14.0;
            fragments.push(frag(50.0, y, "a"));
            fragments.push(frag(240.0, y, "b"));
        }
        assert_eq!(layout.classify_columns(&fragments), ColumnLayout::Single);
    }

    #[test]
    fn test_two_column_reads_left_then_right() {
        let layout = LayoutReconstructor::default();
        let text = layout.linearize(&two_column_fragments(10));

        let (left, right) = text.split_once("\n\n").unwrap();
        assert!(left.starts_with("L0\nL1"));
        assert!(left.ends_with("L9"));
        assert!(right.starts_with("R0\nR1"));
        assert!(right.ends_with("R9"));
    }

    #[test]
    fn test_duplicates_and_noise_dropped() {
        let layout = LayoutReconstructor::default();
        let fragments = vec![
            frag(50.0, 700.0, "Titel"),
            frag(50.0, 700.0, "Titel"),
            frag(f32::NAN, 690.0, "kaputt"),
            frag(80.0, 650.0, "  "),
        ];
        assert_eq!(layout.linearize(&fragments), "Titel");
    }

    #[test]
    fn test_duplicate_removal_keeps_first_occurrence() {
        let mut fragments: Vec<PageFragment> = (0..5000)
            .map(|i| frag(50.0 + (i % 50) as f32 * 8.0, 700.0 - (i / 50) as f32 * 12.0, "x"))
            .collect();
        let originals = fragments.len();
        fragments.extend(fragments.clone());
        fragments.push(frag(-0.0, 700.0, "Rand"));
        fragments.push(frag(0.0, 700.0, "Rand"));

        let kept = usable_fragments(&fragments);
        assert_eq!(kept.len(), originals + 1);
        assert_eq!(kept[..originals], fragments[..originals]);
        assert_eq!(kept[originals].text, "Rand");
    }

    #[test]
    fn test_looks_reasonable_rejects_fragment_garbage() {
        let text = "a\nb\nc\nd\ne\nf\ng\nh\nEine normale Zeile\nNoch eine Zeile";
        assert!(!looks_reasonable(text));
    }

    #[test]
    fn test_looks_reasonable_accepts_paragraph() {
        let text = "Die Schweiz hat gewählt.\nIm Herbst\nwurden die Räte neu bestellt,\nund\ndie Beteiligung war hoch.\nEin Kommentar.";
        assert!(looks_reasonable(text));
    }

    #[test]
    fn test_looks_reasonable_rejects_digit_runs() {
        assert!(!looks_reasonable("12 13 14 15 16 17 18 19 20 21 22"));
        assert!(looks_reasonable("12 13"));
        assert!(!looks_reasonable("   \n "));
    }

    #[test]
    fn test_reconstruct_falls_back_to_raw_text() {
        let layout = LayoutReconstructor::default();
        let fragments: Vec<_> = (0..8)
            .map(|i| frag(50.0, 700.0 - i as f32 * 20.0, "x"))
            .collect();
        let page = Page::from_fragments(7, fragments).with_raw_text("Rohtext der Seite");

        let text = layout.reconstruct(&page);
        assert_eq!(text.number, 7);
        assert_eq!(text.text, "Rohtext der Seite");
    }

    #[test]
    fn test_reconstruct_keeps_degenerate_text_without_fallback() {
        let layout = LayoutReconstructor::default();
        let page = Page::from_fragments(2, vec![]);
        assert_eq!(layout.reconstruct(&page).text, "");
    }

    #[test]
    fn test_reconstruct_text_page_passes_through() {
        let layout = LayoutReconstructor::default();
        let page = Page::from_text(1, "INHALT\n14 Saure Grüsse");
        assert_eq!(layout.reconstruct(&page).text, "INHALT\n14 Saure Grüsse");
    }
}
