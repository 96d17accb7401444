//! Generic attributed element tree.
//!
//! The importer never touches raw XML bytes; callers parse their documents
//! with whatever XML reader they already use and hand over this tree shape.

use serde::{Deserialize, Serialize};

/// One element of a GML document: a possibly namespace-prefixed name,
/// attributes, text content and child elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<GmlNode>,
}

impl GmlNode {
    /// Creates an element with the given (possibly prefixed) name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: vec![],
            text: String::new(),
            children: vec![],
        }
    }

    /// Adds an attribute, builder-style.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Sets the text content, builder-style.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Appends a child element, builder-style.
    pub fn with_child(mut self, child: GmlNode) -> Self {
        self.children.push(child);
        self
    }

    /// The element name as given, prefix included.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The element name with everything up to and including the first colon
    /// stripped.
    pub fn bare_name(&self) -> &str {
        match self.name.split_once(':') {
            Some((_, bare)) => bare,
            None => &self.name,
        }
    }

    /// Attribute value by case-insensitive name, prefix stripped the same
    /// way as element names.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| {
                let bare = match key.split_once(':') {
                    Some((_, bare)) => bare,
                    None => key.as_str(),
                };
                bare.eq_ignore_ascii_case(name)
            })
            .map(|(_, value)| value.as_str())
    }

    /// Text content of the element.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Child elements in document order.
    pub fn children(&self) -> &[GmlNode] {
        &self.children
    }

    /// First child with the given bare name, case-insensitive.
    pub fn child(&self, bare_name: &str) -> Option<&GmlNode> {
        self.children
            .iter()
            .find(|c| c.bare_name().eq_ignore_ascii_case(bare_name))
    }

    /// All children whose bare name matches one of `bare_names`,
    /// case-insensitive, in document order.
    pub fn children_named<'a>(
        &'a self,
        bare_names: &'a [&'a str],
    ) -> impl Iterator<Item = &'a GmlNode> + 'a {
        self.children.iter().filter(move |c| {
            bare_names
                .iter()
                .any(|n| c.bare_name().eq_ignore_ascii_case(n))
        })
    }

    /// First child element regardless of name.
    pub fn first_child(&self) -> Option<&GmlNode> {
        self.children.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_name_strips_prefix() {
        assert_eq!(GmlNode::new("gml:Point").bare_name(), "Point");
        assert_eq!(GmlNode::new("Point").bare_name(), "Point");
        assert_eq!(GmlNode::new("a:b:c").bare_name(), "b:c");
    }

    #[test]
    fn attr_lookup_is_case_insensitive() {
        let node = GmlNode::new("posList").with_attr("srsDimension", "3");
        assert_eq!(node.attr("srsdimension"), Some("3"));
        assert_eq!(node.attr("missing"), None);
    }

    #[test]
    fn child_lookup_ignores_prefix() {
        let node = GmlNode::new("gml:Polygon").with_child(GmlNode::new("gml:exterior"));
        assert!(node.child("EXTERIOR").is_some());
    }
}
