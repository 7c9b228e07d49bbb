//! Publication profiles: the typography-specific tables used by the segmenter.
//!
//! Everything that ties segmentation to one magazine (table-of-contents
//! markers, rubric names, title regexes, word lists) lives here, so another
//! publication only needs a different profile file.

use std::path::Path;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Placeholder in title patterns that expands to the section-header alternation.
pub const SECTIONS_PLACEHOLDER: &str = "{sections}";

/// A named title-extraction regex.
///
/// The title is taken from the capture group named `title`, or from group 1
/// when the pattern has no such group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitlePattern {
    /// Pattern name, used in error messages and logs
    pub name: String,
    /// Regular expression, may contain `{sections}`
    pub pattern: String,
}

impl TitlePattern {
    /// Create a new title pattern.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }
}

/// Hand-tuned tables describing one publication.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicationProfile {
    /// Profile name
    pub name: String,

    /// Words that mark a table-of-contents page (matched case-insensitively)
    pub toc_markers: Vec<String>,

    /// Recurring rubric names printed atop articles (matched case-sensitively)
    pub section_headers: Vec<String>,

    /// Ordered title-extraction patterns; the first match wins
    pub title_patterns: Vec<TitlePattern>,

    /// Short words allowed in lowercase inside a capitalized title
    pub connective_words: Vec<String>,

    /// Lowercase words that disqualify a line as a title when it starts with them
    pub function_words: Vec<String>,

    /// Leading articles stripped from refined titles
    pub definite_articles: Vec<String>,
}

fn words(list: &[&str]) -> Vec<String> {
    list.iter().map(|w| w.to_string()).collect()
}

impl Default for PublicationProfile {
    /// Built-in profile for the German edition of the Swiss expatriate magazine.
    fn default() -> Self {
        Self {
            name: "schweizer-revue".to_string(),
            toc_markers: words(&["INHALT", "INHALTSVERZEICHNIS", "SOMMAIRE", "CONTENTS"]),
            section_headers: words(&[
                "SCHWERPUNKT",
                "POLITIK",
                "GESELLSCHAFT",
                "KULTUR",
                "REPORTAGE",
                "WIRTSCHAFT",
                "NATUR UND UMWELT",
                "GESCHICHTE",
                "SPORT",
                "WISSENSCHAFT",
                "PORTRÄT",
                "LITERATURSERIE",
                "AUSGEWÄHLT",
                "GELESEN",
                "GEHÖRT",
                "EINREISE",
                "NOTIZEN",
                "NACHRICHTEN",
                "DEBATTE",
                "DISKUSSION",
                "BRIEFKASTEN",
                "EDITORIAL",
                "SCHWEIZER ZAHLEN",
                "AUSLANDSCHWEIZER-ORGANISATION",
                "AUS DEM BUNDESHAUS",
                "MITTEILUNGEN",
            ]),
            title_patterns: vec![
                TitlePattern::new(
                    "quote_person",
                    r#"(?m)^(?:{sections})\s*[«"„“][^»"“”]{3,400}[»"“”]\s*(?P<title>\p{Lu}\p{L}+(?:[ -]\p{Lu}\p{L}+){1,3}),\s*\d{1,3}\b"#,
                ),
                TitlePattern::new(
                    "section_colon",
                    r"(?m)^(?:{sections})\s+(?P<title>[^:\n]{3,80}):",
                ),
                TitlePattern::new(
                    "article_phrase",
                    r"\b(?P<title>(?:Der|Die|Das)\s+\p{Lu}[\p{L}-]+(?:\s+(?:\p{Ll}{2,4}\s+)?\p{Lu}[\p{L}-]+){0,4})",
                ),
            ],
            connective_words: words(&[
                "und", "oder", "der", "die", "das", "des", "dem", "den", "im", "in", "am", "an",
                "auf", "aus", "von", "vom", "zu", "zum", "zur", "für", "mit", "bei", "über", "ein",
                "eine", "of", "the", "and", "et", "de", "du", "la", "le",
            ]),
            function_words: words(&[
                "der", "die", "das", "den", "dem", "des", "ein", "eine", "einen", "einem",
                "einer", "und", "oder", "aber", "in", "im", "an", "am", "auf", "aus", "bei",
                "mit", "nach", "von", "vom", "vor", "zu", "zum", "zur", "für", "über", "unter",
                "durch", "gegen", "ohne", "um", "wie", "als", "dass", "the", "a", "an", "of",
            ]),
            definite_articles: words(&["Der", "Die", "Das", "The", "Le", "La", "Les", "Il"]),
        }
    }
}

impl PublicationProfile {
    /// Parse a profile from JSON. Missing fields take the built-in values.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a profile from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Compile the profile's patterns.
    pub fn compile(&self) -> Result<CompiledProfile> {
        CompiledProfile::new(self.clone())
    }
}

/// A profile with its regular expressions compiled.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    profile: PublicationProfile,
    toc_marker: Regex,
    section_token: Regex,
    trailing_token: Regex,
    title_patterns: Vec<(String, Regex)>,
}

impl CompiledProfile {
    /// Compile a profile.
    pub fn new(profile: PublicationProfile) -> Result<Self> {
        if profile.toc_markers.iter().all(|m| m.trim().is_empty()) {
            return Err(Error::Profile("at least one TOC marker is required".into()));
        }
        if profile.section_headers.iter().any(|h| h.trim().is_empty()) {
            return Err(Error::Profile("section headers must not be blank".into()));
        }

        let markers = alternation(&profile.toc_markers);
        let sections = alternation(&profile.section_headers);

        let toc_marker = compile("toc_marker", &format!(r"(?i)\b(?:{})\b", markers))?;
        let section_token = compile("section_token", &format!(r"\b(?:{})\b", sections))?;
        let trailing_token = compile(
            "trailing_token",
            &format!(r"(?:^|\s)(?:{}|{})\s*$", sections, markers),
        )?;

        let title_patterns = profile
            .title_patterns
            .iter()
            .map(|p| {
                let expanded = p
                    .pattern
                    .replace(SECTIONS_PLACEHOLDER, &format!("(?:{})", sections));
                compile(&p.name, &expanded).map(|re| (p.name.clone(), re))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            profile,
            toc_marker,
            section_token,
            trailing_token,
            title_patterns,
        })
    }

    /// The source profile.
    pub fn profile(&self) -> &PublicationProfile {
        &self.profile
    }

    /// Whether the text contains a table-of-contents marker.
    pub fn has_toc_marker(&self, text: &str) -> bool {
        self.toc_marker.is_match(text)
    }

    /// Remove every table-of-contents marker from the text.
    pub fn strip_toc_markers(&self, text: &str) -> String {
        self.toc_marker.replace_all(text, " ").into_owned()
    }

    /// Whether a whole line is a section header.
    pub fn is_section_header(&self, line: &str) -> bool {
        let line = collapse_whitespace(line);
        self.profile.section_headers.iter().any(|h| *h == line)
    }

    /// Whether a line contains a section-header token.
    pub fn contains_section_header(&self, line: &str) -> bool {
        self.section_token.is_match(line)
    }

    /// Remove one section-header or TOC-marker token from the end of a title.
    ///
    /// Returns `None` when the title does not end with such a token.
    pub fn strip_trailing_token<'t>(&self, title: &'t str) -> Option<&'t str> {
        self.trailing_token
            .find(title)
            .map(|m| title[..m.start()].trim_end())
    }

    /// Run the title patterns in order and return the first extracted title.
    pub fn match_title_pattern(&self, text: &str) -> Option<String> {
        for (name, re) in &self.title_patterns {
            if let Some(caps) = re.captures(text) {
                let title = caps.name("title").or_else(|| caps.get(1));
                if let Some(title) = title {
                    let title = title.as_str().trim();
                    if !title.is_empty() {
                        log::debug!("Title pattern '{}' matched: {}", name, title);
                        return Some(title.to_string());
                    }
                }
            }
        }
        None
    }

    /// Whether a lowercase word may appear inside a capitalized title.
    pub fn is_connective(&self, word: &str) -> bool {
        self.profile.connective_words.iter().any(|w| w == word)
    }

    /// Whether a line-initial word disqualifies the line as a title.
    pub fn is_function_word(&self, word: &str) -> bool {
        self.profile.function_words.iter().any(|w| w == word)
    }

    /// Whether a word is a leading definite article.
    pub fn is_definite_article(&self, word: &str) -> bool {
        self.profile.definite_articles.iter().any(|w| w == word)
    }
}

impl Default for CompiledProfile {
    fn default() -> Self {
        CompiledProfile::new(PublicationProfile::default())
            .unwrap_or_else(|e| panic!("built-in publication profile is invalid: {}", e))
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub(crate) fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Escaped alternation of tokens, longest first so prefixes don't shadow longer tokens.
fn alternation(tokens: &[String]) -> String {
    let mut tokens: Vec<&str> = tokens
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        // Never matches
        return r"[^\s\S]".to_string();
    }
    tokens.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
    tokens
        .iter()
        .map(|t| regex::escape(t))
        .collect::<Vec<_>>()
        .join("|")
}

fn compile(name: &str, pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|source| Error::InvalidPattern {
        name: name.to_string(),
        source,
    })
}
