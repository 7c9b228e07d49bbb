//! Parsing and layout options.

/// Options for decoding PDF issues.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Attach lopdf's plain text extraction to every page as a fallback
    pub raw_text_fallback: bool,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (undecodable pages become empty pages).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable the raw text fallback.
    pub fn with_raw_text_fallback(mut self, enabled: bool) -> Self {
        self.raw_text_fallback = enabled;
        self
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            raw_text_fallback: true,
        }
    }
}

/// Error handling mode during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any error
    #[default]
    Strict,
    /// Skip invalid pages and continue
    Lenient,
}

/// Tuning knobs for reading-order reconstruction.
///
/// Units are PDF layout units (points).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutOptions {
    /// Dead zone on each side of the page midpoint when counting column members
    pub column_margin: f32,

    /// Minimum fragments required on each side for a two-column page
    pub min_column_population: usize,

    /// Minimum horizontal spread of fragments for a two-column page
    pub min_column_spread: f32,

    /// Maximum vertical distance for fragments on the same line
    pub line_tolerance: f32,
}

impl LayoutOptions {
    /// Create layout options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the midpoint dead zone.
    pub fn with_column_margin(mut self, margin: f32) -> Self {
        self.column_margin = margin;
        self
    }

    /// Set the minimum column population.
    pub fn with_min_column_population(mut self, count: usize) -> Self {
        self.min_column_population = count;
        self
    }

    /// Set the minimum horizontal spread.
    pub fn with_min_column_spread(mut self, spread: f32) -> Self {
        self.min_column_spread = spread;
        self
    }

    /// Set the line clustering tolerance.
    pub fn with_line_tolerance(mut self, tolerance: f32) -> Self {
        self.line_tolerance = tolerance;
        self
    }
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            column_margin: 20.0,
            min_column_population: 10,
            min_column_spread: 200.0,
            line_tolerance: 3.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_options_builder() {
        let options = ParseOptions::new().lenient().with_raw_text_fallback(false);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.raw_text_fallback);
    }

    #[test]
    fn test_default_options() {
        let options = ParseOptions::new();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.raw_text_fallback);

        let layout = LayoutOptions::default();
        assert_eq!(layout.min_column_population, 10);
        assert_eq!(layout.min_column_spread, 200.0);
        assert_eq!(layout.line_tolerance, 3.0);
    }
}
