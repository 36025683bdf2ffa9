//! Normalized XML document model.
//!
//! The service's XML responses are converted into [`XmlNode`] trees so
//! callers never deal with namespace prefixes or the single-element-vs-list
//! ambiguity of raw XML. Two reserved object keys exist:
//!
//! - [`ATTRIBUTES_KEY`] (`@attributes`) holds an element's attributes as a
//!   nested object, kept distinct from child elements.
//! - [`TEXT_KEY`] (`#text`) holds the text content of an element that also
//!   carries attributes or children.
//!
//! Element names the service may legally repeat are always exposed as
//! [`XmlNode::Array`], even when exactly one instance was present on the
//! wire. The same model is used in the other direction by the feed encoder.

mod normalizer;

pub use normalizer::normalize;

/// Reserved object key under which element attributes are exposed.
pub const ATTRIBUTES_KEY: &str = "@attributes";

/// Reserved object key for the text content of an element that also carries
/// attributes or children.
pub const TEXT_KEY: &str = "#text";

/// A normalized XML value: scalar text, an object of named children in
/// document order, or a sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlNode {
    /// Scalar text content.
    Text(String),
    /// Named children in document order. Keys may include the reserved
    /// [`ATTRIBUTES_KEY`] and [`TEXT_KEY`] entries.
    Object(Vec<(String, XmlNode)>),
    /// A sequence of nodes in document order.
    Array(Vec<XmlNode>),
}

impl XmlNode {
    /// Build a text node.
    pub fn text(value: impl Into<String>) -> Self {
        XmlNode::Text(value.into())
    }

    /// Build an object node from `(key, child)` pairs.
    pub fn object<I, K>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, XmlNode)>,
        K: Into<String>,
    {
        XmlNode::Object(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    /// Build an array node.
    pub fn array<I>(items: I) -> Self
    where
        I: IntoIterator<Item = XmlNode>,
    {
        XmlNode::Array(items.into_iter().collect())
    }

    /// Look up a named child of an object node.
    pub fn get(&self, key: &str) -> Option<&XmlNode> {
        match self {
            XmlNode::Object(entries) => entries
                .iter()
                .find(|(name, _)| name == key)
                .map(|(_, node)| node),
            _ => None,
        }
    }

    /// Walk a path of named children.
    pub fn at(&self, path: &[&str]) -> Option<&XmlNode> {
        let mut node = self;
        for key in path {
            node = node.get(key)?;
        }
        Some(node)
    }

    /// The scalar text of this node, if it is one.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlNode::Text(value) => Some(value),
            _ => None,
        }
    }

    /// The entries of this node, if it is an object.
    pub fn as_object(&self) -> Option<&[(String, XmlNode)]> {
        match self {
            XmlNode::Object(entries) => Some(entries),
            _ => None,
        }
    }

    /// The items of this node, if it is an array.
    pub fn as_array(&self) -> Option<&[XmlNode]> {
        match self {
            XmlNode::Array(items) => Some(items),
            _ => None,
        }
    }

    /// View any node as a sequence: arrays yield their items, every other
    /// node yields itself as a one-element slice.
    pub fn as_items(&self) -> &[XmlNode] {
        match self {
            XmlNode::Array(items) => items.as_slice(),
            other => std::slice::from_ref(other),
        }
    }

    /// Look up an attribute by name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(ATTRIBUTES_KEY)?.get(name)?.as_text()
    }

    /// Scalar text of a named child, when present and scalar.
    pub fn text_of(&self, key: &str) -> Option<&str> {
        self.get(key)?.as_text()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> XmlNode {
        XmlNode::object([
            (
                ATTRIBUTES_KEY,
                XmlNode::object([("status", XmlNode::text("Success"))]),
            ),
            (
                "Orders",
                XmlNode::object([(
                    "Order",
                    XmlNode::array([XmlNode::object([("Id", XmlNode::text("1"))])]),
                )]),
            ),
        ])
    }

    #[test]
    fn test_path_lookup() {
        let node = sample();
        let id = node.at(&["Orders", "Order"]).unwrap().as_items()[0]
            .text_of("Id")
            .unwrap();
        assert_eq!(id, "1");
    }

    #[test]
    fn test_attribute_lookup() {
        assert_eq!(sample().attribute("status"), Some("Success"));
        assert_eq!(sample().attribute("missing"), None);
    }

    #[test]
    fn test_as_items_wraps_non_arrays() {
        let text = XmlNode::text("x");
        assert_eq!(text.as_items().len(), 1);

        let array = XmlNode::array([XmlNode::text("a"), XmlNode::text("b")]);
        assert_eq!(array.as_items().len(), 2);
    }
}
