use roxmltree::Document;

use crate::core::layout::{ExtractedText, ExtractedTextSegment};
use crate::core::namespace::alto_namespace;
use crate::core::parser::Extraction;
use crate::core::tree::attribute;

/// One segment per `TextLine` (id = its `ID`), each the `CONTENT` of its `String` children joined
/// with single spaces. A `String` without `CONTENT` still takes part as an empty token.
pub fn alto_segments(doc: &Document) -> Extraction {
    let ns = match alto_namespace(doc) {
        Ok(ns) => ns,
        Err(wrong) => return Extraction::WrongDialect(wrong),
    };

    let segments = ns
        .descendants(doc.root_element(), "TextLine")
        .map(|line| {
            let tokens: Vec<&str> = ns
                .find_all(line, "String")
                .map(|string| attribute(string, "CONTENT").unwrap_or_default())
                .collect();
            ExtractedTextSegment::new(
                attribute(line, "ID").unwrap_or_default(),
                tokens.join(" "),
            )
        })
        .collect();

    Extraction::Text(ExtractedText::new(segments, "\n"))
}

/// Text of an ALTO document, one output line per `TextLine`
pub fn alto_text(doc: &Document) -> Extraction<String> {
    alto_segments(doc).map(|text| text.text())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALTO: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<alto xmlns="http://www.loc.gov/standards/alto/ns-v3#">
  <Layout><Page><PrintSpace><TextBlock ID="b1">
    <TextLine ID="l1">
      <String CONTENT="foo"/><SP/><String CONTENT="bar"/>
    </TextLine>
    <TextLine ID="l2">
      <String CONTENT="baz"/><SP/><String CONTENT="qux"/>
    </TextLine>
  </TextBlock></PrintSpace></Page></Layout>
</alto>"#;

    fn text_of(extraction: Extraction<String>) -> String {
        match extraction {
            Extraction::Text(text) => text,
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn test_lines_and_words() {
        let doc = Document::parse(ALTO).unwrap();
        assert_eq!(text_of(alto_text(&doc)), "foo bar\nbaz qux");
    }

    #[test]
    fn test_segments_carry_line_ids() {
        let doc = Document::parse(ALTO).unwrap();
        let Extraction::Text(text) = alto_segments(&doc) else {
            panic!("expected text");
        };
        let ids: Vec<_> = text.segments().iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["l1", "l2"]);
        assert_eq!(text.segment_id_for_pos(4), Some("l1"));
        assert_eq!(text.segment_id_for_pos(7), None);
        assert_eq!(text.segment_id_for_pos(8), Some("l2"));
    }

    #[test]
    fn test_missing_content_is_empty_token() {
        let doc = Document::parse(
            r#"<alto><TextLine><String CONTENT="a"/><String/><String CONTENT="b"/></TextLine></alto>"#,
        )
        .unwrap();
        assert_eq!(text_of(alto_text(&doc)), "a  b");
    }

    #[test]
    fn test_no_lines_is_empty() {
        let doc = Document::parse(r#"<alto xmlns="urn:alto"><Layout/></alto>"#).unwrap();
        assert_eq!(text_of(alto_text(&doc)), "");
    }

    #[test]
    fn test_empty_lines_are_kept() {
        let doc = Document::parse(
            r#"<alto><TextLine/><TextLine><String CONTENT="x"/></TextLine></alto>"#,
        )
        .unwrap();
        assert_eq!(text_of(alto_text(&doc)), "\nx");
    }

    #[test]
    fn test_other_namespace_is_ignored() {
        let doc = Document::parse(
            r#"<alto xmlns="urn:alto" xmlns:o="urn:other"><TextLine><String CONTENT="a"/><o:String CONTENT="b"/></TextLine></alto>"#,
        )
        .unwrap();
        assert_eq!(text_of(alto_text(&doc)), "a");
    }

    #[test]
    fn test_page_document_is_wrong_dialect() {
        let doc = Document::parse(r#"<PcGts xmlns="urn:page"/>"#).unwrap();
        assert!(matches!(alto_text(&doc), Extraction::WrongDialect(_)));
    }
}
