//! Deterministic article file names.

/// Longest slug kept in a file name, in characters.
pub const MAX_SLUG_CHARS: usize = 50;

/// Extension of article record files.
pub const RECORD_EXTENSION: &str = "json";

/// Hands out article ordinals for one issue, starting at 1.
///
/// Passed explicitly through the save step so numbering never depends on
/// state left over from another issue.
#[derive(Debug, Clone)]
pub struct ArticleSequence {
    next: u32,
}

impl ArticleSequence {
    /// Start a new sequence at 1.
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Take the next ordinal.
    pub fn next_ordinal(&mut self) -> u32 {
        let ordinal = self.next;
        self.next += 1;
        ordinal
    }

    /// Number of ordinals handed out so far.
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for ArticleSequence {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercase alphanumerics joined by single underscores, cut to [`MAX_SLUG_CHARS`].
pub fn slugify(title: &str) -> String {
    let mut slug = String::new();
    let mut pending_sep = false;

    for c in title.chars().flat_map(char::to_lowercase) {
        if c.is_alphanumeric() {
            if pending_sep && !slug.is_empty() {
                slug.push('_');
            }
            pending_sep = false;
            slug.push(c);
        } else {
            pending_sep = true;
        }
    }

    let truncated: String = slug.chars().take(MAX_SLUG_CHARS).collect();
    truncated.trim_end_matches('_').to_string()
}

/// File name of an article record: `{start:03}_{slug}.json`.
///
/// A title that collapses to an empty slug uses `article_{ordinal}` instead.
pub fn article_filename(start_page: u32, title: &str, ordinal: u32) -> String {
    let slug = slugify(title);
    let stem = if slug.is_empty() {
        format!("article_{}", ordinal)
    } else {
        slug
    };
    format!("{:03}_{}.{}", start_page, stem, RECORD_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filename_format() {
        assert_eq!(
            article_filename(14, "Saure Grüsse", 1),
            "014_saure_grüsse.json"
        );
        assert_eq!(
            article_filename(122, "«Die Alpen» – heute!", 3),
            "122_die_alpen_heute.json"
        );
    }

    #[test]
    fn test_empty_slug_uses_ordinal() {
        assert_eq!(article_filename(5, "«…»", 7), "005_article_7.json");
    }

    #[test]
    fn test_slug_truncated() {
        let slug = slugify(&"Bergbauern ".repeat(10));
        assert!(slug.chars().count() <= MAX_SLUG_CHARS);
        assert!(!slug.ends_with('_'));
        assert!(slug.starts_with("bergbauern_bergbauern"));
    }

    #[test]
    fn test_sequence() {
        let mut seq = ArticleSequence::new();
        assert_eq!(seq.issued(), 0);
        assert_eq!(seq.next_ordinal(), 1);
        assert_eq!(seq.next_ordinal(), 2);
        assert_eq!(seq.issued(), 2);
    }
}
