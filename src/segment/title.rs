//! Title refinement from article content.

use super::profile::{collapse_whitespace, CompiledProfile};

/// Longest title kept before truncation.
pub const MAX_TITLE_CHARS: usize = 60;

/// Lines examined by the first-line scan.
const FIRST_LINE_SCAN: usize = 15;

/// Lines examined by the capitalized-run heuristic.
const CAPITALIZED_RUN_SCAN: usize = 6;

/// Characters of content handed to the title patterns.
const PATTERN_SCAN_CHARS: usize = 2000;

const QUOTE_CHARS: &[char] = &['"', '«', '»', '„', '“', '”', '‚', '‘', '‹', '›'];

/// Find a better title for an article in its content.
///
/// Tries the first-line scan, then the profile's title patterns, then the
/// capitalized-run heuristic. The first hit is normalized and returned;
/// `fallback` is returned unchanged when nothing is found.
pub fn refine_title(content: &str, fallback: &str, profile: &CompiledProfile) -> String {
    let found = first_line_title(content, profile)
        .or_else(|| pattern_title(content, profile))
        .or_else(|| capitalized_run_title(content, profile));

    match found.map(|raw| normalize_title(&raw, profile)) {
        Some(title) if !title.is_empty() => title,
        _ => fallback.to_string(),
    }
}

/// Normalize a raw title.
///
/// Collapses whitespace, strips one leading definite article and truncates
/// titles longer than [`MAX_TITLE_CHARS`] with `...`.
pub fn normalize_title(raw: &str, profile: &CompiledProfile) -> String {
    let collapsed = collapse_whitespace(raw);

    let title = match collapsed.split_once(' ') {
        Some((first, rest)) if profile.is_definite_article(first) => rest.to_string(),
        _ => collapsed,
    };

    if title.chars().count() > MAX_TITLE_CHARS {
        let cut: String = title.chars().take(MAX_TITLE_CHARS).collect();
        format!("{}...", cut.trim_end())
    } else {
        title
    }
}

/// Heuristic first-line scan.
fn first_line_title(content: &str, profile: &CompiledProfile) -> Option<String> {
    for line in content_lines(content).take(FIRST_LINE_SCAN) {
        let chars = line.chars().count();

        if profile.is_section_header(line)
            || chars > 80
            || line.contains(QUOTE_CHARS)
            || line.starts_with(|c: char| c.is_ascii_digit())
        {
            continue;
        }

        let first_word = line.split_whitespace().next().unwrap_or_default();
        if starts_lowercase(first_word) && profile.is_function_word(first_word) {
            continue;
        }

        let word_count = line.split_whitespace().count();
        if starts_uppercase(line) && (3..=60).contains(&chars) && (1..=10).contains(&word_count) {
            return Some(line.to_string());
        }
    }
    None
}

/// Profile pattern extraction over the head of the content.
fn pattern_title(content: &str, profile: &CompiledProfile) -> Option<String> {
    let head = match content.char_indices().nth(PATTERN_SCAN_CHARS) {
        Some((idx, _)) => &content[..idx],
        None => content,
    };
    profile.match_title_pattern(head)
}

/// A line of 2-6 words that are all capitalized or connectives.
fn capitalized_run_title(content: &str, profile: &CompiledProfile) -> Option<String> {
    content_lines(content)
        .take(CAPITALIZED_RUN_SCAN)
        .find(|line| {
            let words: Vec<&str> = line.split_whitespace().collect();
            (2..=6).contains(&words.len())
                && words
                    .iter()
                    .all(|w| starts_uppercase(w) || profile.is_connective(w))
        })
        .map(str::to_string)
}

fn content_lines(content: &str) -> impl Iterator<Item = &str> {
    content.lines().map(str::trim).filter(|l| !l.is_empty())
}

fn starts_uppercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_uppercase)
}

fn starts_lowercase(text: &str) -> bool {
    text.chars().next().is_some_and(char::is_lowercase)
}
