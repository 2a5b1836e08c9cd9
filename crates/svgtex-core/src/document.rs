//! Mutable SVG/XML document tree.
//!
//! A [`Document`] owns a single root [`Element`] plus the nodes around it
//! (XML declaration, comments, doctype). Elements keep their attributes in
//! insertion order and their children as an ordered list of [`Node`]s, so a
//! document that is parsed and written back without changes produces the same
//! bytes every time.
//!
//! Names are kept exactly as written in the source, including any namespace
//! prefix (`inkscape:label`). Tag comparisons go through [`Element::is`], which
//! only looks at the local part, so `svg:text` and `text` are both text
//! elements.
//!
//! # Example
//!
//! ```
//! # use svgtex_core::document::{Document, Element};
//! let mut doc = Document::parse(r#"<svg width="10"><g id="a"/></svg>"#).unwrap();
//! doc.root_mut().append(Element::new("g").with_attribute("id", "b"));
//!
//! assert!(doc.root().find_by_id("b").is_some());
//! assert_eq!(
//!     doc.to_xml().unwrap(),
//!     r#"<svg width="10"><g id="a"/><g id="b"/></svg>"#
//! );
//! ```

mod read;
mod write;

use std::{io, string::FromUtf8Error};

use indexmap::IndexMap;
use thiserror::Error;

use crate::namespace;

/// Errors raised while reading or writing XML.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed XML at byte {position}: {source}")]
    Syntax {
        position: u64,
        source: quick_xml::Error,
    },

    #[error("invalid character data: {0}")]
    Content(#[from] quick_xml::Error),

    #[error("invalid attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("element `{0}` is never closed")]
    Unclosed(String),

    #[error("closing tag `{0}` has no matching opening tag")]
    UnexpectedEnd(String),

    #[error("document has no root element")]
    MissingRoot,

    #[error("document has more than one root element")]
    MultipleRoots,

    #[error("failed to write XML: {0}")]
    Write(#[from] io::Error),

    #[error("written XML is not valid UTF-8: {0}")]
    Encoding(#[from] FromUtf8Error),
}

/// The `<?xml ...?>` declaration of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    version: String,
    encoding: Option<String>,
    standalone: Option<String>,
}

impl Declaration {
    /// Creates a declaration.
    pub fn new(
        version: impl Into<String>,
        encoding: Option<String>,
        standalone: Option<String>,
    ) -> Self {
        Self {
            version: version.into(),
            encoding,
            standalone,
        }
    }

    /// Returns the XML version.
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Returns the declared encoding, if any.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Returns the declared standalone flag, if any.
    pub fn standalone(&self) -> Option<&str> {
        self.standalone.as_deref()
    }
}

impl Default for Declaration {
    fn default() -> Self {
        Self::new("1.0", Some("UTF-8".to_string()), Some("no".to_string()))
    }
}

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Character data, already unescaped.
    Text(String),
    /// A `<![CDATA[...]]>` section.
    CData(String),
    /// A comment, without the `<!--` and `-->` markers.
    Comment(String),
    /// A processing instruction, without the `<?` and `?>` markers.
    ProcessingInstruction(String),
    /// A doctype declaration, without the `<!DOCTYPE` and `>` markers.
    DocType(String),
}

impl Node {
    /// Returns the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the element mutably if this node is one.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Returns the character data of a text or CDATA node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) | Self::CData(text) => Some(text),
            _ => None,
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element of the document tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    name: String,
    attributes: IndexMap<String, String>,
    children: Vec<Node>,
}

impl Element {
    /// Creates an element without attributes or children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute (builder style).
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Appends a child element (builder style).
    pub fn with_child(mut self, child: Element) -> Self {
        self.append(child);
        self
    }

    /// Appends a text node (builder style).
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Returns the qualified tag name as written in the source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the tag name without its namespace prefix.
    pub fn local_name(&self) -> &str {
        namespace::local_name(&self.name)
    }

    /// Checks whether the local part of the tag name is `local`.
    pub fn is(&self, local: &str) -> bool {
        self.local_name() == local
    }

    /// Returns the value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Checks whether an attribute is present.
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Sets an attribute, keeping its position if it already exists.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Removes an attribute and returns its value.
    ///
    /// The relative order of the remaining attributes is preserved.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    /// Iterates over `(name, value)` pairs in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Mutable access to every attribute value.
    pub fn attribute_values_mut(&mut self) -> impl Iterator<Item = (&str, &mut String)> {
        self.attributes
            .iter_mut()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the `id` attribute.
    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    /// Sets the `id` attribute.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set_attribute("id", id);
    }

    /// Returns the child nodes.
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Returns the child nodes mutably.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Iterates over the child elements, skipping text and other nodes.
    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// Iterates mutably over the child elements.
    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Moves all children out of this element.
    pub fn take_children(&mut self) -> Vec<Node> {
        std::mem::take(&mut self.children)
    }

    /// Appends a child element as the last child.
    pub fn append(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Returns the text before the first non-text child, if there is any.
    ///
    /// Consecutive text and CDATA nodes are concatenated. Returns `None` when
    /// the element starts with a child element, a comment, or has no
    /// children at all.
    pub fn leading_text(&self) -> Option<String> {
        let mut text: Option<String> = None;
        for child in &self.children {
            match child.as_text() {
                Some(part) => text.get_or_insert_with(String::new).push_str(part),
                None => break,
            }
        }
        text
    }

    /// Iterates over this element and all its descendants in document order.
    pub fn iter(&self) -> Elements<'_> {
        Elements { stack: vec![self] }
    }

    /// Visits this element and all its descendants mutably in document order.
    pub fn visit_mut(&mut self, visitor: &mut impl FnMut(&mut Element)) {
        visitor(self);
        for child in self.child_elements_mut() {
            child.visit_mut(visitor);
        }
    }

    /// Visits every descendant element together with its ancestor chain.
    ///
    /// The ancestor slice passed to `visitor` is ordered from the outermost
    /// ancestor (this element) to the direct parent. Returning `false` from
    /// `descend` for an element skips its whole subtree, including itself.
    pub fn visit_with_ancestors<'a>(
        &'a self,
        descend: &mut impl FnMut(&'a Element) -> bool,
        visitor: &mut impl FnMut(&'a Element, &[&'a Element]),
    ) {
        let mut ancestors = vec![self];
        self.visit_children_with_ancestors(&mut ancestors, descend, visitor);
    }

    fn visit_children_with_ancestors<'a>(
        &'a self,
        ancestors: &mut Vec<&'a Element>,
        descend: &mut impl FnMut(&'a Element) -> bool,
        visitor: &mut impl FnMut(&'a Element, &[&'a Element]),
    ) {
        for child in self.child_elements() {
            if !descend(child) {
                continue;
            }
            visitor(child, ancestors.as_slice());
            ancestors.push(child);
            child.visit_children_with_ancestors(ancestors, descend, visitor);
            ancestors.pop();
        }
    }

    /// Finds the first element (this one included) with the given id.
    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        self.iter().find(|element| element.id() == Some(id))
    }

    /// Finds the first element (this one included) with the given id, mutably.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.id() == Some(id) {
            return Some(self);
        }
        for child in self.child_elements_mut() {
            if let Some(found) = child.find_by_id_mut(id) {
                return Some(found);
            }
        }
        None
    }

    /// Removes every descendant with the given id and returns them in document order.
    ///
    /// This element itself is never removed, even if its id matches.
    pub fn remove_descendants_by_id(&mut self, id: &str) -> Vec<Element> {
        let mut removed = Vec::new();
        self.collect_removed(id, &mut removed);
        removed
    }

    fn collect_removed(&mut self, id: &str, removed: &mut Vec<Element>) {
        let mut index = 0;
        while index < self.children.len() {
            let matches = self.children[index]
                .as_element()
                .is_some_and(|child| child.id() == Some(id));
            if matches {
                if let Node::Element(child) = self.children.remove(index) {
                    removed.push(child);
                }
                continue;
            }
            if let Some(child) = self.children[index].as_element_mut() {
                child.collect_removed(id, removed);
            }
            index += 1;
        }
    }
}

/// Pre-order iterator over an element and its descendants.
///
/// Created by [`Element::iter`].
#[derive(Debug)]
pub struct Elements<'a> {
    stack: Vec<&'a Element>,
}

impl<'a> Iterator for Elements<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.child_elements().rev());
        Some(element)
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    declaration: Option<Declaration>,
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl Document {
    /// Creates a document around a root element, without declaration.
    pub fn new(root: Element) -> Self {
        Self {
            declaration: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    /// Sets the XML declaration (builder style).
    pub fn with_declaration(mut self, declaration: Declaration) -> Self {
        self.declaration = Some(declaration);
        self
    }

    /// Parses a document from XML text.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] for malformed XML, unbalanced tags, a missing
    /// root element or more than one root element.
    pub fn parse(source: &str) -> Result<Self, XmlError> {
        read::parse(source)
    }

    /// Serializes the document to XML text.
    ///
    /// Whitespace is written exactly as stored; nothing is re-indented.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the writer fails.
    pub fn to_xml(&self) -> Result<String, XmlError> {
        write::to_xml(self)
    }

    /// Returns the XML declaration, if the document has one.
    pub fn declaration(&self) -> Option<&Declaration> {
        self.declaration.as_ref()
    }

    /// Returns the root element.
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Returns the root element mutably.
    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    /// Returns the nodes before the root element.
    pub fn prolog(&self) -> &[Node] {
        &self.prolog
    }

    /// Returns the nodes after the root element.
    pub fn epilog(&self) -> &[Node] {
        &self.epilog
    }
}
