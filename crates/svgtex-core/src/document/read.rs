//! XML reader building a [`Document`] from text with `quick-xml`.

use std::borrow::Cow;

use log::trace;
use quick_xml::{
    Reader,
    events::{BytesDecl, BytesStart, Event},
};

use super::{Declaration, Document, Element, Node, XmlError};

/// Accumulates nodes while the reader walks the event stream.
#[derive(Default)]
struct TreeBuilder {
    declaration: Option<Declaration>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
    open: Vec<Element>,
}

impl TreeBuilder {
    fn attach(&mut self, node: Node) -> Result<(), XmlError> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match node {
            Node::Element(element) => {
                if self.root.is_some() {
                    return Err(XmlError::MultipleRoots);
                }
                self.root = Some(element);
            }
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }

    fn finish(self) -> Result<Document, XmlError> {
        if let Some(unclosed) = self.open.last() {
            return Err(XmlError::Unclosed(unclosed.name().to_string()));
        }
        let root = self.root.ok_or(XmlError::MissingRoot)?;
        Ok(Document {
            declaration: self.declaration,
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

pub(super) fn parse(source: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(source);
    let mut builder = TreeBuilder::default();

    loop {
        let position: u64 = reader.buffer_position().try_into().unwrap_or(u64::MAX);
        let event = reader
            .read_event()
            .map_err(|source| XmlError::Syntax { position, source })?;

        match event {
            Event::Decl(decl) => builder.declaration = Some(read_declaration(&decl)?),
            Event::Start(start) => builder.open.push(read_element(&start)?),
            Event::Empty(start) => builder.attach(Node::Element(read_element(&start)?))?,
            Event::End(end) => {
                let element = builder.open.pop().ok_or_else(|| {
                    XmlError::UnexpectedEnd(lossy(end.name().as_ref()).into_owned())
                })?;
                builder.attach(Node::Element(element))?;
            }
            Event::Text(text) => builder.attach(Node::Text(text.unescape()?.into_owned()))?,
            Event::CData(data) => builder.attach(Node::CData(lossy(&data).into_owned()))?,
            Event::Comment(comment) => {
                builder.attach(Node::Comment(lossy(&comment).into_owned()))?;
            }
            Event::PI(pi) => {
                builder.attach(Node::ProcessingInstruction(lossy(&pi).into_owned()))?;
            }
            Event::DocType(doctype) => {
                builder.attach(Node::DocType(lossy(&doctype).into_owned()))?;
            }
            Event::Eof => break,
        }
    }

    let document = builder.finish()?;
    trace!(root = document.root().name(); "Parsed XML document");
    Ok(document)
}

fn read_element(start: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut element = Element::new(lossy(start.name().as_ref()).into_owned());
    for attribute in start.attributes() {
        let attribute = attribute?;
        let name = lossy(attribute.key.as_ref()).into_owned();
        let value = attribute.unescape_value()?.into_owned();
        element.attributes.insert(name, value);
    }
    Ok(element)
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration, XmlError> {
    let version = lossy(&decl.version()?).into_owned();
    let encoding = decl
        .encoding()
        .transpose()?
        .map(|encoding| lossy(&encoding).into_owned());
    let standalone = decl
        .standalone()
        .transpose()?
        .map(|standalone| lossy(&standalone).into_owned());
    Ok(Declaration::new(version, encoding, standalone))
}

fn lossy(bytes: &[u8]) -> Cow<'_, str> {
    String::from_utf8_lossy(bytes)
}
