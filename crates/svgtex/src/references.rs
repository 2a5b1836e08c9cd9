//! Id namespacing for artifacts merged into a document.
//!
//! Every artifact produced by the renderer uses the same glyph ids
//! (`glyph0-1`, `clip1`, ...). Before an artifact joins the document, all its
//! ids and the references to them are prefixed so artifacts never collide
//! with each other or with the user's content.

use log::trace;

use svgtex_core::{document::Element, namespace::Namespace};

/// Returns the artifact id for the text element with id `source_id`.
pub fn artifact_id(source_id: &str) -> String {
    format!("lx-{source_id}")
}

/// Prefixes every id and local reference inside `artifact` with `prefix-`.
///
/// Local references are `href` / `xlink:href` values of the form `#id` and
/// `url(#id)` functions in any attribute. The artifact root's id is set to
/// `prefix` itself.
///
/// # Examples
///
/// ```
/// # use svgtex_core::document::Element;
/// # use svgtex::references::prefix_references;
/// let mut artifact = Element::new("g")
///     .with_child(Element::new("path").with_attribute("id", "glyph0-1"))
///     .with_child(Element::new("use").with_attribute("xlink:href", "#glyph0-1"));
///
/// prefix_references(&mut artifact, "lx-text1");
///
/// assert_eq!(artifact.id(), Some("lx-text1"));
/// assert!(artifact.find_by_id("lx-text1-glyph0-1").is_some());
/// ```
pub fn prefix_references(artifact: &mut Element, prefix: &str) {
    let xlink_href = Namespace::Xlink.qualify("href");
    let mut renamed = 0usize;

    artifact.visit_mut(&mut |element| {
        if let Some(id) = element.id() {
            let prefixed = format!("{prefix}-{id}");
            element.set_id(prefixed);
            renamed += 1;
        }
        for (name, value) in element.attribute_values_mut() {
            if name == "href" || name == xlink_href {
                if let Some(target) = value.strip_prefix('#') {
                    *value = format!("#{prefix}-{target}");
                }
            } else if value.contains("url(#") {
                *value = prefix_url_references(value, prefix);
            }
        }
    });

    artifact.set_id(prefix);
    trace!(prefix, renamed; "Prefixed artifact ids");
}

fn prefix_url_references(value: &str, prefix: &str) -> String {
    value.replace("url(#", &format!("url(#{prefix}-"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_id() {
        assert_eq!(artifact_id("text1234"), "lx-text1234");
    }

    #[test]
    fn test_prefixes_ids_and_references() {
        let mut artifact = Element::new("g")
            .with_attribute("id", "surface1")
            .with_child(
                Element::new("defs").with_child(
                    Element::new("g")
                        .with_child(Element::new("symbol").with_attribute("id", "glyph0-1")),
                ),
            )
            .with_child(
                Element::new("use")
                    .with_attribute("xlink:href", "#glyph0-1")
                    .with_attribute("x", "1"),
            )
            .with_child(
                Element::new("g")
                    .with_attribute("clip-path", "url(#clip1)")
                    .with_attribute("href", "#clip1"),
            );

        prefix_references(&mut artifact, "lx-t1");

        assert_eq!(artifact.id(), Some("lx-t1"));
        let symbol = artifact.iter().find(|e| e.is("symbol")).expect("symbol");
        assert_eq!(symbol.id(), Some("lx-t1-glyph0-1"));

        let glyph = artifact.iter().find(|e| e.is("use")).expect("use");
        assert_eq!(glyph.attribute("xlink:href"), Some("#lx-t1-glyph0-1"));
        assert_eq!(glyph.attribute("x"), Some("1"));

        let clipped = artifact
            .iter()
            .find(|e| e.has_attribute("clip-path"))
            .expect("clipped group");
        assert_eq!(clipped.attribute("clip-path"), Some("url(#lx-t1-clip1)"));
        assert_eq!(clipped.attribute("href"), Some("#lx-t1-clip1"));
    }

    #[test]
    fn test_external_references_untouched() {
        let mut artifact = Element::new("g").with_child(
            Element::new("image").with_attribute("xlink:href", "figure.png"),
        );
        prefix_references(&mut artifact, "lx-a");

        let image = artifact.iter().find(|e| e.is("image")).expect("image");
        assert_eq!(image.attribute("xlink:href"), Some("figure.png"));
    }
}
