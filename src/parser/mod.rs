//! PDF decoding and reading-order reconstruction.

mod layout;
mod options;
mod pdf_parser;

pub use layout::{looks_reasonable, ColumnLayout, LayoutReconstructor};
pub use options::{ErrorMode, LayoutOptions, ParseOptions};
pub use pdf_parser::{is_pdf_bytes, PdfParser};
