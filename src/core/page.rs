//! Text extraction from PAGE content XML (`PcGts`).
//!
//! Regions are visited in the order given by the first `ReadingOrder` element when it has groups,
//! otherwise in document order. Each region contributes text at the requested [`Level`]:
//!
//! - `region`: the region's own first `TextEquiv/Unicode`
//! - `line`: the first accepted `TextEquiv/Unicode` of each `TextLine`, one per output line
//! - `word`: the first accepted `TextEquiv/Unicode` of each `Word`, space-joined per `TextLine`
//!
//! A `TextEquiv` is accepted when its `index` attribute is `-1` (also the value when absent) or
//! equals the requested index.

use std::fmt;
use std::str::FromStr;

use log::debug;
use roxmltree::{Document, Node};
use serde::{Deserialize, Serialize};

use crate::core::layout::{ExtractedText, ExtractedTextSegment};
use crate::core::namespace::page_namespace;
use crate::core::parser::Extraction;
use crate::core::tree::{attribute, text, Ns};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::error::{ExtractError, Result};

/// `TextEquiv` index that applies whatever index is requested
pub const ANY_INDEX: &str = "-1";

/// Index requested when the caller does not choose one
pub const DEFAULT_INDEX: &str = "0";

const NESTED_GROUPS: [&str; 4] = [
    "OrderedGroup",
    "UnorderedGroup",
    "OrderedGroupIndexed",
    "UnorderedGroupIndexed",
];

/// Granularity text is read at
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[default]
    Region,
    Line,
    Word,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Region => "region",
            Self::Line => "line",
            Self::Word => "word",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ExtractError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "region" => Ok(Self::Region),
            "line" => Ok(Self::Line),
            "word" => Ok(Self::Word),
            other => Err(ExtractError::InvalidLevel(other.to_string())),
        }
    }
}

/// What to extract from a PAGE document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    pub level: Level,
    /// `TextEquiv` index to read
    pub index: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            level: Level::Region,
            index: DEFAULT_INDEX.to_string(),
        }
    }
}

impl ExtractOptions {
    pub fn new(level: Level, index: impl Into<String>) -> Self {
        Self {
            level,
            index: index.into(),
        }
    }
}

struct PageReader<'a, 'o> {
    ns: Ns<'a>,
    options: &'o ExtractOptions,
}

impl<'a, 'o> PageReader<'a, 'o> {
    fn accepted(&self, text_equiv: Node) -> bool {
        let own = attribute(text_equiv, "index").unwrap_or(ANY_INDEX);
        own == ANY_INDEX || own == self.options.index
    }

    /// Text of the first accepted `TextEquiv/Unicode` of `node`; an empty `Unicode` is absent
    fn accepted_unicode(&self, node: Node<'a, '_>) -> Option<&'a str> {
        self.ns
            .find_all(node, "TextEquiv")
            .filter(|te| self.accepted(*te))
            .find_map(|te| self.ns.find_first(te, "Unicode"))
            .and_then(text)
            .filter(|s| !s.is_empty())
    }

    fn region_text(&self, region: Node<'a, '_>) -> Option<String> {
        let (text_equiv, unicode) = self
            .ns
            .find_all(region, "TextEquiv")
            .find_map(|te| self.ns.find_first(te, "Unicode").map(|u| (te, u)))?;
        if !self.accepted(text_equiv) {
            return None;
        }
        text(unicode).map(str::to_string)
    }

    fn line_text(&self, region: Node<'a, '_>) -> Option<String> {
        let lines: Vec<Node> = self.ns.find_all(region, "TextLine").collect();
        if lines.is_empty() {
            return None;
        }
        let texts: Vec<&str> = lines
            .into_iter()
            .filter_map(|line| self.accepted_unicode(line))
            .collect();
        Some(texts.join("\n"))
    }

    fn word_text(&self, region: Node<'a, '_>) -> Option<String> {
        let lines: Vec<Node> = self.ns.find_all(region, "TextLine").collect();
        if lines.is_empty() {
            return None;
        }
        let mut texts = Vec::new();
        for line in lines {
            let words: Vec<&str> = self
                .ns
                .find_all(line, "Word")
                .filter_map(|word| self.accepted_unicode(word))
                .collect();
            if !words.is_empty() {
                texts.push(words.join(" "));
            }
        }
        Some(texts.join("\n"))
    }

    fn extract_region(&self, region: Node<'a, '_>) -> Option<String> {
        match self.options.level {
            Level::Region => self.region_text(region),
            Level::Line => self.line_text(region),
            Level::Word => self.word_text(region),
        }
    }

    /// Text regions in reading order, or `None` when the document declares no usable order
    fn ordered_regions<'input>(
        &self,
        doc: &'a Document<'input>,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Option<Vec<Node<'a, 'input>>>> {
        let root = doc.root_element();
        let Some(reading_order) = self.ns.descendants(root, "ReadingOrder").next() else {
            return Ok(None);
        };
        let groups: Vec<Node> = reading_order.children().filter(|n| n.is_element()).collect();
        if groups.is_empty() {
            debug!("ReadingOrder has no groups, using document order");
            return Ok(None);
        }

        let mut regions = Vec::new();
        for group in groups {
            if !self.ns.is(group, "OrderedGroup") {
                return Err(ExtractError::UnsupportedReadingOrder {
                    element: group.tag_name().name().to_string(),
                });
            }
            if let Some(nested) = group
                .children()
                .find(|n| n.is_element() && NESTED_GROUPS.contains(&n.tag_name().name()))
            {
                return Err(ExtractError::UnsupportedReadingOrder {
                    element: nested.tag_name().name().to_string(),
                });
            }

            let mut refs = Vec::new();
            for region_ref in self.ns.find_all(group, "RegionRefIndexed") {
                let index = attribute(region_ref, "index");
                let Some(id) = attribute(region_ref, "regionRef") else {
                    sink.report(Diagnostic::MissingRegionRef {
                        index: index.map(str::to_string),
                    });
                    continue;
                };
                let position = index.and_then(|i| i.trim().parse::<i64>().ok());
                if position.is_none() {
                    sink.report(Diagnostic::InvalidRefIndex {
                        region_ref: id.to_string(),
                        index: index.map(str::to_string),
                    });
                }
                refs.push((position, id));
            }
            refs.sort_by_key(|(position, _)| (position.is_none(), *position));

            for (_, id) in refs {
                let region = self
                    .ns
                    .descendants(root, "TextRegion")
                    .find(|r| attribute(*r, "id") == Some(id));
                match region {
                    Some(region) => regions.push(region),
                    None => sink.report(Diagnostic::NotATextRegion {
                        region_ref: id.to_string(),
                    }),
                }
            }
        }
        Ok(Some(regions))
    }
}

/// PAGE text as one segment per region with non-empty text, ids taken from the region `id`.
///
/// Fails only with [`ExtractError::UnsupportedReadingOrder`]; a document that is not PAGE yields
/// [`Extraction::WrongDialect`].
pub fn page_segments(
    doc: &Document,
    options: &ExtractOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Extraction> {
    let ns = match page_namespace(doc) {
        Ok(ns) => ns,
        Err(wrong) => return Ok(Extraction::WrongDialect(wrong)),
    };
    let reader = PageReader { ns, options };

    let regions = match reader.ordered_regions(doc, sink)? {
        Some(regions) => regions,
        None => ns.descendants(doc.root_element(), "TextRegion").collect(),
    };

    let segments = regions
        .into_iter()
        .filter_map(|region| {
            let text = reader.extract_region(region)?;
            if text.is_empty() {
                return None;
            }
            Some(ExtractedTextSegment::new(
                attribute(region, "id").unwrap_or_default(),
                text,
            ))
        })
        .collect();

    Ok(Extraction::Text(ExtractedText::new(segments, "\n")))
}

/// PAGE text, regions separated by newlines
pub fn page_text(
    doc: &Document,
    options: &ExtractOptions,
    sink: &mut dyn DiagnosticSink,
) -> Result<Extraction<String>> {
    Ok(page_segments(doc, options, sink)?.map(|text| text.text()))
}
