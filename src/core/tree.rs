//! Namespace-aware lookups over a parsed `roxmltree` document.
//!
//! Every accessor reports absence as `None` or an empty iterator; nothing here substitutes defaults.

use roxmltree::Node;

/// The namespace an element name is resolved in. `None` matches un-namespaced elements only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ns<'a>(pub Option<&'a str>);

impl<'a> Ns<'a> {
    /// Whether `node` is an element with this namespace and local name
    pub fn is(self, node: Node, local: &str) -> bool {
        node.is_element()
            && node.tag_name().name() == local
            && node.tag_name().namespace() == self.0
    }

    /// First child element named `local`
    pub fn find_first<'input>(self, node: Node<'a, 'input>, local: &str) -> Option<Node<'a, 'input>> {
        node.children().find(|n| self.is(*n, local))
    }

    /// Child elements named `local`, in document order
    pub fn find_all<'input>(
        self,
        node: Node<'a, 'input>,
        local: &'a str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        node.children().filter(move |n| self.is(*n, local))
    }

    /// Elements named `local` below `node` (excluding `node` itself), in document order
    pub fn descendants<'input>(
        self,
        node: Node<'a, 'input>,
        local: &'a str,
    ) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
        node.descendants()
            .skip(1)
            .filter(move |n| self.is(*n, local))
    }
}

/// Attribute value, `None` when the attribute is absent
pub fn attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

/// Text directly inside `node`, `None` when it has no leading text child
pub fn text<'a>(node: Node<'a, '_>) -> Option<&'a str> {
    node.text()
}

/// Local name of the document's root element and its namespace URI
pub fn root_name<'a>(doc: &'a roxmltree::Document<'_>) -> (&'a str, Option<&'a str>) {
    let tag = doc.root_element().tag_name();
    (tag.name(), tag.namespace())
}
