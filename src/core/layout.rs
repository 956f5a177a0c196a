use serde::{Deserialize, Serialize};

/// One unit of extracted content, tagged with the id of the element it came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ExtractedTextSegment {
    id: String,
    text: String,
}

impl ExtractedTextSegment {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Extracted text kept as segments so offsets in the flattened text can be mapped back to the
/// source element that produced them.
///
/// Offsets are counted in characters (Unicode scalar values), not bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    segments: Vec<ExtractedTextSegment>,
    joiner: String,
}

impl ExtractedText {
    pub fn new(segments: Vec<ExtractedTextSegment>, joiner: impl Into<String>) -> Self {
        Self {
            segments,
            joiner: joiner.into(),
        }
    }

    pub fn segments(&self) -> &[ExtractedTextSegment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The segment texts joined with the joiner
    pub fn text(&self) -> String {
        let texts: Vec<&str> = self.segments.iter().map(|s| s.text.as_str()).collect();
        texts.join(&self.joiner)
    }

    /// Id of the segment whose text covers character offset `pos`.
    ///
    /// Returns `None` when `pos` falls on a joiner between two segments or past the end of the text.
    pub fn segment_id_for_pos(&self, pos: usize) -> Option<&str> {
        let joiner_len = self.joiner.chars().count();
        let mut start = 0;
        for (i, segment) in self.segments.iter().enumerate() {
            let end = start + segment.text.chars().count();
            if pos < end {
                return Some(&segment.id);
            }
            start = end;
            if i + 1 == self.segments.len() {
                break;
            }
            if pos < start + joiner_len {
                return None;
            }
            start += joiner_len;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ExtractedText {
        ExtractedText::new(
            vec![
                ExtractedTextSegment::new("s0", "foo"),
                ExtractedTextSegment::new("s1", "bar"),
                ExtractedTextSegment::new("s2", "bazinga"),
            ],
            " ",
        )
    }

    #[test]
    fn test_text_joins_segments() {
        assert_eq!(sample().text(), "foo bar bazinga");
    }

    #[test]
    fn test_segment_id_for_pos() {
        let text = sample();
        assert_eq!(text.segment_id_for_pos(0), Some("s0"));
        assert_eq!(text.segment_id_for_pos(2), Some("s0"));
        assert_eq!(text.segment_id_for_pos(3), None);
        assert_eq!(text.segment_id_for_pos(4), Some("s1"));
        assert_eq!(text.segment_id_for_pos(10), Some("s2"));
        assert_eq!(text.segment_id_for_pos(14), Some("s2"));
    }

    #[test]
    fn test_pos_past_end_has_no_segment() {
        let text = sample();
        let len = text.text().chars().count();
        assert_eq!(text.segment_id_for_pos(len), None);
        assert_eq!(text.segment_id_for_pos(len + 100), None);
    }

    #[test]
    fn test_multichar_joiner_and_unicode() {
        let text = ExtractedText::new(
            vec![
                ExtractedTextSegment::new("a", "äö"),
                ExtractedTextSegment::new("b", "ß"),
            ],
            " | ",
        );
        assert_eq!(text.text(), "äö | ß");
        assert_eq!(text.segment_id_for_pos(1), Some("a"));
        assert_eq!(text.segment_id_for_pos(2), None);
        assert_eq!(text.segment_id_for_pos(4), None);
        assert_eq!(text.segment_id_for_pos(5), Some("b"));
        assert_eq!(text.segment_id_for_pos(6), None);
    }

    #[test]
    fn test_empty_segments_own_no_offsets() {
        let text = ExtractedText::new(
            vec![
                ExtractedTextSegment::new("e", ""),
                ExtractedTextSegment::new("x", "x"),
            ],
            "\n",
        );
        assert_eq!(text.text(), "\nx");
        assert_eq!(text.segment_id_for_pos(0), None);
        assert_eq!(text.segment_id_for_pos(1), Some("x"));
    }

    #[test]
    fn test_empty_store() {
        let text = ExtractedText::default();
        assert!(text.is_empty());
        assert_eq!(text.text(), "");
        assert_eq!(text.segment_id_for_pos(0), None);
    }

    #[test]
    fn test_serialized_form_has_no_cached_text() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["joiner"], " ");
        assert_eq!(json["segments"][2]["id"], "s2");
        assert!(json.get("text").is_none());
    }
}
