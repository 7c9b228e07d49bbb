//! Page sources: turn an input file into an issue's ordered pages.
//!
//! Sources are registered by file extension, so a new input format only
//! needs a new [`PageSource`] implementation.
//!
//! # Example
//!
//! ```no_run
//! use magsplit::source::SourceRegistry;
//! use std::path::Path;
//!
//! fn main() -> magsplit::Result<()> {
//!     let registry = SourceRegistry::with_defaults();
//!     let pages = registry.load(Path::new("issue-2024-06.pdf"))?;
//!     println!("{} pages", pages.len());
//!     Ok(())
//! }
//! ```

mod json;
mod pdf;

pub use json::JsonPageSource;
pub use pdf::PdfSource;

use crate::error::{Error, Result};
use crate::model::Page;
use crate::parser::{is_pdf_bytes, ParseOptions};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Trait for page sources.
///
/// Implement this trait to read issues from another format.
pub trait PageSource: Send + Sync {
    /// Get the supported file extensions for this source.
    ///
    /// Extensions should be lowercase without the leading dot (e.g., `["pdf"]`).
    fn supported_extensions(&self) -> &[&str];

    /// Get the name of this source.
    fn name(&self) -> &str;

    /// Load every page of the file at the given path.
    fn load(&self, path: &Path) -> Result<Vec<Page>>;

    /// Load pages from bytes.
    fn load_bytes(&self, bytes: &[u8]) -> Result<Vec<Page>>;

    /// Check if this source supports the given extension.
    fn supports_extension(&self, ext: &str) -> bool {
        let ext_lower = ext.to_lowercase();
        self.supported_extensions().iter().any(|e| *e == ext_lower)
    }
}

/// Registry for page sources.
///
/// The registry maps file extensions to sources.
pub struct SourceRegistry {
    sources: BTreeMap<String, Arc<dyn PageSource>>,
    by_name: BTreeMap<String, Arc<dyn PageSource>>,
}

impl SourceRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            sources: BTreeMap::new(),
            by_name: BTreeMap::new(),
        }
    }

    /// Create a registry with the PDF and JSON sources.
    pub fn with_defaults() -> Self {
        Self::with_parse_options(ParseOptions::default())
    }

    /// Create a registry with the default sources, decoding PDFs with `options`.
    pub fn with_parse_options(options: ParseOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(PdfSource::with_options(options)));
        registry.register(Arc::new(JsonPageSource::new()));
        registry
    }

    /// Register a source for all its supported extensions.
    pub fn register(&mut self, source: Arc<dyn PageSource>) {
        for ext in source.supported_extensions() {
            self.sources.insert(ext.to_lowercase(), source.clone());
        }
        self.by_name.insert(source.name().to_lowercase(), source);
    }

    /// Get a source by file extension.
    pub fn get_by_extension(&self, ext: &str) -> Option<Arc<dyn PageSource>> {
        self.sources.get(&ext.to_lowercase()).cloned()
    }

    /// Get a source by name.
    pub fn get_by_name(&self, name: &str) -> Option<Arc<dyn PageSource>> {
        self.by_name.get(&name.to_lowercase()).cloned()
    }

    /// Check if an extension is supported.
    pub fn supports(&self, ext: &str) -> bool {
        self.sources.contains_key(&ext.to_lowercase())
    }

    /// Get all supported extensions, sorted.
    pub fn supported_extensions(&self) -> Vec<&str> {
        self.sources.keys().map(|s| s.as_str()).collect()
    }

    /// Load an issue with the source registered for its extension.
    pub fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .ok_or_else(|| {
                Error::UnsupportedInput(format!("{} has no extension", path.display()))
            })?;

        let source = self.get_by_extension(ext).ok_or_else(|| {
            Error::UnsupportedInput(format!("no page source for extension: {}", ext))
        })?;

        log::debug!("Loading {} with the {} source", path.display(), source.name());
        source.load(path)
    }

    /// Load an issue from bytes, sniffing PDF by its magic bytes and
    /// treating anything else as JSON pages.
    pub fn load_bytes(&self, bytes: &[u8]) -> Result<Vec<Page>> {
        let ext = if is_pdf_bytes(bytes) { "pdf" } else { "json" };
        let source = self.get_by_extension(ext).ok_or_else(|| {
            Error::UnsupportedInput(format!("no page source for extension: {}", ext))
        })?;
        source.load_bytes(bytes)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
