pub mod core {
    pub mod alto;
    pub mod encoding;
    pub mod layout;
    pub mod namespace;
    pub mod page;
    pub mod parser;
    pub mod tree;
}

pub mod utils {
    pub mod document_processor;
}

pub mod diagnostics;
pub mod error;

pub use crate::core::layout::{ExtractedText, ExtractedTextSegment};
pub use crate::core::namespace::Dialect;
pub use crate::core::page::{ExtractOptions, Level};
pub use crate::core::parser::{extract, text, Extraction, Extractor, UniversalExtractor};
pub use crate::diagnostics::{Diagnostic, DiagnosticSink, LogSink};
pub use crate::error::{ExtractError, Result, WrongDialect};
