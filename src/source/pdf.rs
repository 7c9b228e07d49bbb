//! PDF page source.

use crate::error::Result;
use crate::model::Page;
use crate::parser::{ParseOptions, PdfParser};
use std::path::Path;

use super::PageSource;

/// PDF page source.
///
/// Decodes each page into positioned fragments, with lopdf's plain text
/// attached as the fallback.
#[derive(Debug, Clone, Default)]
pub struct PdfSource {
    options: ParseOptions,
}

impl PdfSource {
    /// Create a new PDF source with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a PDF source with custom parse options.
    pub fn with_options(options: ParseOptions) -> Self {
        Self { options }
    }

    /// The parse options in use.
    pub fn options(&self) -> &ParseOptions {
        &self.options
    }
}

impl PageSource for PdfSource {
    fn supported_extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn name(&self) -> &str {
        "pdf"
    }

    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let parser = PdfParser::open_with_options(path, self.options.clone())?;
        log::debug!("{}: {} pages", path.display(), parser.page_count());
        parser.parse()
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<Vec<Page>> {
        let parser = PdfParser::from_bytes_with_options(bytes, self.options.clone())?;
        parser.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_pdf_source_extensions() {
        let source = PdfSource::new();
        assert_eq!(source.supported_extensions(), &["pdf"]);
        assert!(source.supports_extension("pdf"));
        assert!(source.supports_extension("PDF"));
        assert!(!source.supports_extension("json"));
        assert_eq!(source.name(), "pdf");
    }

    #[test]
    fn test_pdf_source_rejects_non_pdf() {
        let source = PdfSource::new();
        assert!(matches!(
            source.load_bytes(b"not a pdf"),
            Err(Error::UnknownFormat)
        ));
    }
}
