//! XML writer serializing a [`Document`] with `quick-xml`.

use quick_xml::{
    Writer,
    events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event},
};

use super::{Document, Element, Node, XmlError};

pub(super) fn to_xml(document: &Document) -> Result<String, XmlError> {
    let mut writer = Writer::new(Vec::new());

    if let Some(declaration) = document.declaration() {
        writer.write_event(Event::Decl(BytesDecl::new(
            declaration.version(),
            declaration.encoding(),
            declaration.standalone(),
        )))?;
    }

    for node in document.prolog() {
        write_node(&mut writer, node)?;
    }
    write_element(&mut writer, document.root())?;
    for node in document.epilog() {
        write_node(&mut writer, node)?;
    }

    Ok(String::from_utf8(writer.into_inner())?)
}

fn write_node(writer: &mut Writer<Vec<u8>>, node: &Node) -> Result<(), XmlError> {
    match node {
        Node::Element(element) => write_element(writer, element)?,
        Node::Text(text) => writer.write_event(Event::Text(BytesText::new(text)))?,
        Node::CData(data) => writer.write_event(Event::CData(BytesCData::new(data.as_str())))?,
        Node::Comment(comment) => {
            writer.write_event(Event::Comment(BytesText::from_escaped(comment.as_str())))?;
        }
        Node::ProcessingInstruction(pi) => {
            writer.write_event(Event::PI(BytesPI::new(pi.as_str())))?;
        }
        Node::DocType(doctype) => {
            writer.write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))?;
        }
    }
    Ok(())
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name());
    for (name, value) in element.attributes() {
        start.push_attribute((name, value));
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        write_node(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.name())))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Declaration;

    #[test]
    fn test_write_escapes_attributes_and_text() {
        let root = Element::new("text")
            .with_attribute("data-formula", "a<b & \"c\"")
            .with_text("x < y & z");
        let xml = to_xml(&Document::new(root)).expect("writable");

        assert!(xml.contains("a&lt;b &amp; &quot;c&quot;"));
        assert!(xml.contains("x &lt; y &amp; z"));
    }

    #[test]
    fn test_write_declaration() {
        let doc = Document::new(Element::new("svg")).with_declaration(Declaration::default());
        let xml = to_xml(&doc).expect("writable");
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"no\"?>"));
        assert!(xml.ends_with("<svg/>"));
    }

    #[test]
    fn test_roundtrip_is_byte_stable() {
        let source = r##"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!-- Created with Inkscape -->
<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="100" height="50">
  <defs><symbol id="glyph0-1"><path d="M 0 0 L 1 1"/></symbol></defs>
  <g id="layer1" style="display:inline"><use xlink:href="#glyph0-1" x="1.5" y="2"/></g>
  <text id="t1"><![CDATA[raw <content>]]></text>
</svg>
"##;
        let first = Document::parse(source)
            .and_then(|doc| doc.to_xml())
            .expect("roundtrip");
        let second = Document::parse(&first)
            .and_then(|doc| doc.to_xml())
            .expect("roundtrip");

        assert_eq!(first, second);
        assert!(first.contains("<!-- Created with Inkscape -->"));
        assert!(first.contains("<![CDATA[raw <content>]]>"));
        assert!(first.contains(r##"<use xlink:href="#glyph0-1" x="1.5" y="2"/>"##));
    }
}
