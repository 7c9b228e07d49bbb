//! Integration tests for article segmentation.

use magsplit::segment::{bound_and_extract, detect_toc_entries, refine_title};
use magsplit::{
    AnchorSource, CompiledProfile, PageText, SegmentOptions, SegmentStrategy, Segmenter,
    TitleRefinement, TocEntry,
};

fn issue() -> Vec<PageText> {
    let mut pages = vec![PageText::new(
        1,
        "INHALT 14 Saure Grüsse  22 Der Herr des Mythenkreuzes",
    )];
    for n in 2..=45 {
        let text = match n {
            14 => "POLITIK\nSaure Grüsse aus Bern\nDer Bundesrat antwortet.".to_string(),
            22 => "REPORTAGE\nDer Herr des Mythenkreuzes\nEin Bergführer erzählt.".to_string(),
            _ => format!("Fliesstext der Seite {}.", n),
        };
        pages.push(PageText::new(n, text));
    }
    pages
}

fn segmenter_without_refinement() -> Segmenter {
    Segmenter::new(
        CompiledProfile::default(),
        SegmentOptions::new().with_title_refinement(TitleRefinement::Off),
    )
}

#[test]
fn test_toc_scenario_entries_and_spans() {
    let pages = issue();
    let profile = CompiledProfile::default();

    let entries = detect_toc_entries(&pages, &profile);
    assert_eq!(
        entries,
        vec![
            TocEntry::toc(14, "Saure Grüsse"),
            TocEntry::toc(22, "Der Herr des Mythenkreuzes"),
        ]
    );

    let result = segmenter_without_refinement().segment(&pages);
    assert_eq!(result.anchors, AnchorSource::Toc);
    let spans: Vec<(u32, u32)> = result
        .candidates
        .iter()
        .map(|c| (c.start_page, c.end_page))
        .collect();
    assert_eq!(spans, vec![(14, 21), (22, 42)]);
    assert_eq!(result.candidates[0].page_list, (14..=21u32).collect::<Vec<_>>());
    assert_eq!(result.candidates[1].page_list, (22..=42u32).collect::<Vec<_>>());
}

#[test]
fn test_candidates_sorted_without_overlap() {
    let mut pages = vec![PageText::new(
        2,
        "Inhalt\n30 Dritter Beitrag\n5 Erster Beitrag\n12 Zweiter Beitrag",
    )];
    pages.extend((3..=60).map(|n| PageText::new(n, format!("Seite {}", n))));

    let result = Segmenter::default().segment(&pages);
    let candidates = &result.candidates;
    assert_eq!(candidates.len(), 3);

    for pair in candidates.windows(2) {
        assert!(pair[0].start_page < pair[1].start_page);
        assert!(pair[0].end_page < pair[1].start_page);
        let last = *pair[0].page_list.last().unwrap();
        assert!(last < pair[1].start_page);
    }
    assert_eq!(candidates[2].end_page, 50);
}

#[test]
fn test_segmentation_is_idempotent() {
    let pages = issue();
    let segmenter = Segmenter::default();
    let first = segmenter.segment(&pages);
    let second = segmenter.segment(&pages);
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_section_header_never_becomes_title() {
    let profile = CompiledProfile::default();
    let content = "EINREISE\nWillkommen in der neuen Heimat\nText";
    let title = refine_title(content, "EINREISE", &profile);
    assert_ne!(title, "EINREISE");
    assert_eq!(title, "Willkommen in der neuen Heimat");

    // Only the header itself: nothing better, fallback kept
    assert_eq!(refine_title("EINREISE", "EINREISE", &profile), "EINREISE");
}

#[test]
fn test_whitespace_only_candidate_dropped() {
    let pages = vec![
        PageText::new(1, "INHALT\n3 Leere Seite\n4 Echter Artikel"),
        PageText::new(3, "  \n\t \n"),
        PageText::new(4, "Echter Artikel\nMit Inhalt."),
    ];
    let result = Segmenter::default().segment(&pages);
    assert_eq!(result.entries.len(), 2);
    assert_eq!(result.candidates.len(), 1);
    assert_eq!(result.candidates[0].start_page, 4);
}

#[test]
fn test_comma_separated_titles_become_siblings() {
    let pages = vec![
        PageText::new(1, "INHALT\n9 Müller, Schmidt\n12 Anderes Thema"),
        PageText::new(9, "Zwei Porträts\nText"),
        PageText::new(12, "Anderes Thema\nText"),
    ];
    let result = Segmenter::default().segment(&pages);

    let anchored: Vec<(&str, u32)> = result
        .candidates
        .iter()
        .map(|c| (c.title.as_str(), c.start_page))
        .collect();
    assert_eq!(
        anchored,
        vec![("Müller", 9), ("Schmidt", 9), ("Anderes Thema", 12)]
    );
}

#[test]
fn test_similar_comma_titles_merge() {
    let pages = vec![
        PageText::new(1, "INHALT\n9 Schmidt, Peter Schmidt"),
        PageText::new(9, "Text"),
    ];
    let entries = detect_toc_entries(&pages, &CompiledProfile::default());
    assert_eq!(entries, vec![TocEntry::toc(9, "Schmidt")]);
}

#[test]
fn test_header_fallback_and_refinement() {
    let pages = vec![
        PageText::new(1, "Editorial ohne Verzeichnis"),
        PageText::new(4, "EINREISE\nAnna Muster wandert aus\nText"),
        PageText::new(5, "weiter"),
        PageText::new(6, "KULTUR\nBergbauern im Wallis\nText"),
    ];
    let result = Segmenter::default().segment(&pages);

    assert_eq!(result.anchors, AnchorSource::Headers);
    let titles: Vec<&str> = result.candidates.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, vec!["Anna Muster wandert aus", "Bergbauern im Wallis"]);
    assert_eq!(result.candidates[0].page_list, vec![4, 5]);
}

#[test]
fn test_headers_only_strategy() {
    let pages = issue();
    let segmenter = Segmenter::new(
        CompiledProfile::default(),
        SegmentOptions::new()
            .with_strategy(SegmentStrategy::HeadersOnly)
            .with_title_refinement(TitleRefinement::Off),
    );
    let result = segmenter.segment(&pages);
    assert_eq!(result.anchors, AnchorSource::Headers);
    let starts: Vec<u32> = result.candidates.iter().map(|c| c.start_page).collect();
    assert_eq!(starts, vec![14, 22]);
}

#[test]
fn test_bound_and_extract_directly() {
    let pages = issue();
    let profile = CompiledProfile::default();
    let entries = vec![TocEntry::toc(44, "Schluss")];
    let out = bound_and_extract(&entries, &pages, &profile, &SegmentOptions::default());

    assert_eq!(out.len(), 1);
    assert_eq!(out[0].end_page, 64);
    assert_eq!(out[0].page_list, vec![44, 45]);
}
