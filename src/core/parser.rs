use std::fs;
use std::io;
use std::path::Path;

use log::debug;
use roxmltree::{Document, ParsingOptions};

use crate::core::alto::alto_segments;
use crate::core::encoding::decode_xml;
use crate::core::layout::{ExtractedText, ExtractedTextSegment};
use crate::core::namespace::Dialect;
use crate::core::page::{page_segments, ExtractOptions, Level};
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::error::{ExtractError, Result, WrongDialect};

/// Outcome of one extraction attempt
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction<T = ExtractedText> {
    Text(T),
    /// The document is well-formed XML of some other dialect
    WrongDialect(WrongDialect),
    /// The input is not well-formed XML
    MalformedInput(String),
}

impl<T> Extraction<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extraction<U> {
        match self {
            Self::Text(text) => Extraction::Text(f(text)),
            Self::WrongDialect(wrong) => Extraction::WrongDialect(wrong),
            Self::MalformedInput(reason) => Extraction::MalformedInput(reason),
        }
    }
}

pub trait Extractor {
    /// Dialect this extractor reads
    fn dialect(&self) -> Dialect;

    /// Extract text segments from an already parsed document
    fn extract(&self, doc: &Document, sink: &mut dyn DiagnosticSink) -> Result<Extraction>;
}

/// PAGE extractor configured with a level and `TextEquiv` index
#[derive(Debug, Clone, Default)]
pub struct PageExtractor {
    pub options: ExtractOptions,
}

impl Extractor for PageExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Page
    }

    fn extract(&self, doc: &Document, sink: &mut dyn DiagnosticSink) -> Result<Extraction> {
        page_segments(doc, &self.options, sink)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AltoExtractor;

impl Extractor for AltoExtractor {
    fn dialect(&self) -> Dialect {
        Dialect::Alto
    }

    fn extract(&self, doc: &Document, _sink: &mut dyn DiagnosticSink) -> Result<Extraction> {
        Ok(alto_segments(doc))
    }
}

/// Parse `content` as XML, accepting a DTD and ignoring a leading byte order mark
pub fn parse_xml(content: &str) -> std::result::Result<Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    Document::parse_with_options(content.strip_prefix('\u{feff}').unwrap_or(content), options)
}

/// Extractor that detects the input format: PAGE, then ALTO, falling back to plain text for
/// anything that is not well-formed XML.
#[derive(Debug, Clone, Default)]
pub struct UniversalExtractor {
    pub page: PageExtractor,
    pub alto: AltoExtractor,
}

impl UniversalExtractor {
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            page: PageExtractor { options },
            alto: AltoExtractor,
        }
    }

    /// Try PAGE, then ALTO, on `content`.
    ///
    /// The ALTO outcome is returned as is, so a document that is neither dialect comes back as
    /// [`Extraction::WrongDialect`] for ALTO.
    pub fn extract_xml(&self, content: &str, sink: &mut dyn DiagnosticSink) -> Result<Extraction> {
        let doc = match parse_xml(content) {
            Ok(doc) => doc,
            Err(e) => return Ok(Extraction::MalformedInput(e.to_string())),
        };

        match self.page.extract(&doc, sink)? {
            Extraction::WrongDialect(wrong) => {
                debug!("{}, trying {}", wrong, self.alto.dialect());
                self.alto.extract(&doc, sink)
            }
            other => Ok(other),
        }
    }

    /// Extract from in-memory content. Plain text becomes a single segment with id `source_id`.
    pub fn extract_str(
        &self,
        content: &str,
        source_id: &str,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ExtractedText> {
        match self.extract_xml(content, sink)? {
            Extraction::Text(text) => Ok(text),
            Extraction::WrongDialect(wrong) => Err(wrong.into()),
            Extraction::MalformedInput(reason) => {
                debug!("{} is not XML ({}), reading as plain text", source_id, reason);
                Ok(plain_text(source_id, content))
            }
        }
    }

    /// Extract from a file.
    ///
    /// XML is decoded according to its byte order mark or declared encoding. Only the
    /// plain-text fallback requires the file to be UTF-8.
    pub fn extract<P: AsRef<Path>>(
        &self,
        path: P,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ExtractedText> {
        let path = path.as_ref();
        let source_id = path.to_string_lossy();
        let bytes = fs::read(path).map_err(|source| ExtractError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        match decode_xml(&bytes) {
            Some(content) => match self.extract_xml(&content, sink)? {
                Extraction::Text(text) => return Ok(text),
                Extraction::WrongDialect(wrong) => return Err(wrong.into()),
                Extraction::MalformedInput(reason) => {
                    debug!("{} is not XML ({}), reading as plain text", source_id, reason)
                }
            },
            None => debug!("{} does not decode as XML, reading as plain text", source_id),
        }

        let content = String::from_utf8(bytes).map_err(|e| ExtractError::Io {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidData, e),
        })?;
        Ok(plain_text(&source_id, content))
    }

    pub fn text<P: AsRef<Path>>(&self, path: P, sink: &mut dyn DiagnosticSink) -> Result<String> {
        Ok(self.extract(path, sink)?.text())
    }
}

fn plain_text(source_id: &str, content: impl Into<String>) -> ExtractedText {
    ExtractedText::new(vec![ExtractedTextSegment::new(source_id, content)], "\n")
}

/// Text of a PAGE, ALTO or plain-text file.
///
/// Reading-order diagnostics go to the log. Fails on unsupported reading orders, on XML that is
/// neither PAGE nor ALTO, and on unreadable files.
pub fn text<P: AsRef<Path>>(path: P, level: Level, index: &str) -> Result<String> {
    UniversalExtractor::new(ExtractOptions::new(level, index)).text(path, &mut LogSink)
}

/// Segments of a PAGE, ALTO or plain-text file, with diagnostics sent to `sink`
pub fn extract<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<ExtractedText> {
    UniversalExtractor::new(options.clone()).extract(path, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::Diagnostic;

    const PAGE: &str = r#"<PcGts xmlns="http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15">
        <Page><TextRegion id="r1"><TextEquiv><Unicode>page text</Unicode></TextEquiv></TextRegion></Page>
    </PcGts>"#;

    const ALTO: &str = r#"<alto xmlns="http://www.loc.gov/standards/alto/ns-v4#">
        <TextLine ID="l1"><String CONTENT="alto"/><String CONTENT="text"/></TextLine>
    </alto>"#;

    fn extract_str(content: &str) -> Result<ExtractedText> {
        UniversalExtractor::default().extract_str(content, "mem", &mut Vec::<Diagnostic>::new())
    }

    #[test]
    fn test_page_is_tried_first() {
        assert_eq!(extract_str(PAGE).unwrap().text(), "page text");
    }

    #[test]
    fn test_alto_fallback() {
        let text = extract_str(ALTO).unwrap();
        assert_eq!(text.text(), "alto text");
        assert_eq!(text.segments()[0].id(), "l1");
    }

    #[test]
    fn test_plain_text_fallback() {
        let text = extract_str("AAAAB\nno <xml> here").unwrap();
        assert_eq!(text.text(), "AAAAB\nno <xml> here");
        assert_eq!(text.segment_id_for_pos(0), Some("mem"));
    }

    #[test]
    fn test_empty_input_is_plain_text() {
        assert_eq!(extract_str("").unwrap().text(), "");
    }

    #[test]
    fn test_other_xml_is_wrong_dialect() {
        let err = extract_str("<html><body>hi</body></html>").unwrap_err();
        match err {
            ExtractError::WrongDialect(wrong) => {
                assert_eq!(wrong.expected, Dialect::Alto);
                assert_eq!(wrong.found, "html");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_extract_xml_outcomes() {
        let extractor = UniversalExtractor::default();
        let mut sink: Vec<Diagnostic> = Vec::new();
        assert!(matches!(
            extractor.extract_xml("not xml", &mut sink).unwrap(),
            Extraction::MalformedInput(_)
        ));
        assert!(matches!(
            extractor.extract_xml("<root/>", &mut sink).unwrap(),
            Extraction::WrongDialect(_)
        ));
        assert!(matches!(
            extractor.extract_xml(ALTO, &mut sink).unwrap(),
            Extraction::Text(_)
        ));
    }

    #[test]
    fn test_bom_and_doctype_are_accepted() {
        let xml = "\u{feff}<?xml version=\"1.0\"?><!DOCTYPE alto><alto><TextLine><String CONTENT=\"x\"/></TextLine></alto>";
        assert_eq!(extract_str(xml).unwrap().text(), "x");
    }

    #[test]
    fn test_extractor_dialects() {
        assert_eq!(PageExtractor::default().dialect(), Dialect::Page);
        assert_eq!(AltoExtractor.dialect(), Dialect::Alto);
    }
}
