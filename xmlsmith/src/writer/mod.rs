//! Serializers for document trees.
//!
//! Two output formats are supported: XML markup via [`XmlWriter`] and a
//! JSON rendition via [`JsonWriter`]. Both run the same depth-first
//! [`TreeWalker`] and are configured through [`WriterOptions`].

mod escape;
mod json;
mod value;
mod walker;
mod xml;

pub use escape::EscapeFlags;
pub use json::JsonWriter;
pub use value::{descendant_count, flatten, is_leaf, Value};
pub use walker::{is_void_element, Emitter, TreeWalker};
pub use xml::XmlWriter;

/// Output options shared by the XML and JSON serializers.
///
/// The defaults produce compact single-line output. [`WriterOptions::pretty`]
/// is a shorthand for the common two-space indented form.
#[derive(Debug, Clone)]
pub struct WriterOptions {
    /// Reject content that could not be reparsed, such as `--` inside a
    /// comment or `]]>` inside a CDATA section.
    pub well_formed: bool,
    /// Leave existing character and entity references untouched instead of
    /// escaping their ampersands again.
    pub no_double_encoding: bool,
    /// Skip the XML declaration when serializing a document.
    pub headless: bool,
    /// Insert line breaks and indentation.
    pub pretty_print: bool,
    /// String repeated once per depth level when pretty-printing.
    pub indent: String,
    /// Line terminator used when pretty-printing.
    pub newline: String,
    /// Extra indentation levels applied to every line.
    pub offset: usize,
    /// Maximum line width before attributes wrap. Zero disables wrapping.
    pub width: usize,
    /// Render childless elements as `<node></node>` instead of `<node/>`.
    pub allow_empty_tags: bool,
    /// Put text-only elements on multiple lines like any other content.
    pub indent_text_only_nodes: bool,
    /// Render self-closing tags as `<node />` instead of `<node/>`.
    pub space_before_slash: bool,
}

impl Default for WriterOptions {
    fn default() -> Self {
        WriterOptions {
            well_formed: false,
            no_double_encoding: false,
            headless: false,
            pretty_print: false,
            indent: "  ".to_string(),
            newline: "\n".to_string(),
            offset: 0,
            width: 0,
            allow_empty_tags: false,
            indent_text_only_nodes: false,
            space_before_slash: false,
        }
    }
}

impl WriterOptions {
    /// Returns options for two-space indented multi-line output.
    pub fn pretty() -> Self {
        WriterOptions {
            pretty_print: true,
            ..WriterOptions::default()
        }
    }

    /// Escape behavior derived from the boolean options.
    pub fn escape_flags(&self) -> EscapeFlags {
        let mut flags = EscapeFlags::empty();
        if self.well_formed {
            flags |= EscapeFlags::WELL_FORMED;
        }
        if self.no_double_encoding {
            flags |= EscapeFlags::NO_DOUBLE_ENCODING;
        }
        flags
    }
}
