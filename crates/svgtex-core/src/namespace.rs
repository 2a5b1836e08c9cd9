//! XML namespaces used by svgtex documents.
//!
//! Attribute names are stored fully qualified (`inkscape:label`), exactly as
//! they appear in the source document. [`Namespace`] gives the canonical
//! prefix and URI for every namespace svgtex writes, and builds qualified
//! names from local names.

/// A namespace svgtex reads from or writes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// SVG document structure.
    Svg,
    /// Inkscape editor-private attributes (layer labels, group modes).
    Inkscape,
    /// XLink cross-references (`xlink:href`).
    Xlink,
    /// Private namespace holding the render parameters remembered in a document.
    ///
    /// The URI matches documents written by earlier releases of the tool so
    /// their remembered settings keep loading.
    Params,
}

impl Namespace {
    /// Returns the conventional prefix for this namespace.
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Svg => "svg",
            Self::Inkscape => "inkscape",
            Self::Xlink => "xlink",
            Self::Params => "rendltx",
        }
    }

    /// Returns the namespace URI.
    pub fn uri(self) -> &'static str {
        match self {
            Self::Svg => "http://www.w3.org/2000/svg",
            Self::Inkscape => "http://www.inkscape.org/namespaces/inkscape",
            Self::Xlink => "http://www.w3.org/1999/xlink",
            Self::Params => "http://NOTSET",
        }
    }

    /// Returns the qualified name `prefix:local`.
    ///
    /// # Examples
    ///
    /// ```
    /// # use svgtex_core::namespace::Namespace;
    /// assert_eq!(Namespace::Inkscape.qualify("label"), "inkscape:label");
    /// ```
    pub fn qualify(self, local: &str) -> String {
        format!("{}:{local}", self.prefix())
    }

    /// Returns the name of the attribute declaring this namespace (`xmlns:prefix`).
    pub fn declaration(self) -> String {
        format!("xmlns:{}", self.prefix())
    }
}

/// Splits a qualified name into its optional prefix and its local part.
///
/// # Examples
///
/// ```
/// # use svgtex_core::namespace::split_qualified;
/// assert_eq!(split_qualified("xlink:href"), (Some("xlink"), "href"));
/// assert_eq!(split_qualified("text"), (None, "text"));
/// ```
pub fn split_qualified(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

/// Returns the local part of a qualified name.
pub fn local_name(name: &str) -> &str {
    split_qualified(name).1
}
