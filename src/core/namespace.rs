use std::fmt;

use roxmltree::Document;
use serde::{Deserialize, Serialize};

use crate::core::tree::{root_name, Ns};
use crate::error::WrongDialect;

/// The XML dialects text can be extracted from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dialect {
    Page,
    Alto,
}

impl Dialect {
    /// Local name of the root element that marks a document of this dialect
    pub fn root_local_name(self) -> &'static str {
        match self {
            Self::Page => "PcGts",
            Self::Alto => "alto",
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page => f.write_str("PAGE"),
            Self::Alto => f.write_str("ALTO"),
        }
    }
}

/// Namespace the document's root element lives in, if its local name marks `dialect`.
///
/// Only the local name is checked; whatever namespace URI the file uses is accepted.
pub fn namespace_for<'a>(doc: &'a Document<'_>, dialect: Dialect) -> Result<Ns<'a>, WrongDialect> {
    let (local, namespace) = root_name(doc);
    if local == dialect.root_local_name() {
        Ok(Ns(namespace))
    } else {
        Err(WrongDialect {
            expected: dialect,
            found: local.to_string(),
        })
    }
}

/// ALTO namespace in effect for `doc`
pub fn alto_namespace<'a>(doc: &'a Document<'_>) -> Result<Ns<'a>, WrongDialect> {
    namespace_for(doc, Dialect::Alto)
}

/// PAGE content namespace in effect for `doc`
pub fn page_namespace<'a>(doc: &'a Document<'_>) -> Result<Ns<'a>, WrongDialect> {
    namespace_for(doc, Dialect::Page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_namespace_any_uri() {
        for uri in [
            "http://schema.primaresearch.org/PAGE/gts/pagecontent/2019-07-15",
            "http://schema.primaresearch.org/PAGE/gts/pagecontent/2013-07-15",
        ] {
            let xml = format!(r#"<PcGts xmlns="{uri}"><Page/></PcGts>"#);
            let doc = Document::parse(&xml).unwrap();
            assert_eq!(page_namespace(&doc), Ok(Ns(Some(uri))));
        }
    }

    #[test]
    fn test_alto_namespace() {
        let doc = Document::parse(r#"<alto xmlns="http://www.loc.gov/standards/alto/ns-v3#"/>"#).unwrap();
        assert_eq!(
            alto_namespace(&doc),
            Ok(Ns(Some("http://www.loc.gov/standards/alto/ns-v3#")))
        );

        let doc = Document::parse("<alto/>").unwrap();
        assert_eq!(alto_namespace(&doc), Ok(Ns(None)));
    }

    #[test]
    fn test_wrong_dialect() {
        let doc = Document::parse(r#"<alto xmlns="urn:x"/>"#).unwrap();
        let err = page_namespace(&doc).unwrap_err();
        assert_eq!(err.expected, Dialect::Page);
        assert_eq!(err.found, "alto");

        let doc = Document::parse("<html/>").unwrap();
        assert!(alto_namespace(&doc).is_err());
        assert!(page_namespace(&doc).is_err());
    }
}
