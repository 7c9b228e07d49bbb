//! Pre-extracted pages stored as JSON.

use crate::error::{Error, Result};
use crate::model::Page;
use std::path::Path;

use super::PageSource;

/// Reads a JSON array of [`Page`] values.
///
/// Lets issues decoded by another tool go through the same pipeline.
/// Pages are returned sorted by number; duplicate page numbers are rejected.
#[derive(Debug, Clone, Default)]
pub struct JsonPageSource {
    _private: (),
}

impl JsonPageSource {
    /// Create a new JSON page source.
    pub fn new() -> Self {
        Self { _private: () }
    }
}

impl PageSource for JsonPageSource {
    fn supported_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn name(&self) -> &str {
        "json"
    }

    fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let bytes = std::fs::read(path)?;
        self.load_bytes(&bytes)
    }

    fn load_bytes(&self, bytes: &[u8]) -> Result<Vec<Page>> {
        let mut pages: Vec<Page> = serde_json::from_slice(bytes)?;
        pages.sort_by_key(|p| p.number);

        if let Some(pair) = pages.windows(2).find(|w| w[0].number == w[1].number) {
            return Err(Error::UnsupportedInput(format!(
                "page {} appears more than once",
                pair[0].number
            )));
        }
        if pages.first().is_some_and(|p| p.number == 0) {
            return Err(Error::UnsupportedInput("page numbers start at 1".into()));
        }

        Ok(pages)
    }
}
