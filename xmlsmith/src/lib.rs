//! XML document trees with configurable XML and JSON serialization.
//!
//! Documents are built programmatically or parsed with [`parse_str`] /
//! [`parse_file`], then rendered with [`XmlWriter`] or [`JsonWriter`].
//! [`WriterOptions`] controls pretty-printing, empty-tag style,
//! attribute width wrapping and escaping behavior.
//!
//! # Examples
//!
//! ```
//! use xmlsmith::{append_child, new_document, new_element, new_text};
//! use xmlsmith::{JsonWriter, WriterOptions, XmlWriter};
//!
//! let doc = new_document();
//! let root = new_element("greeting");
//! append_child(&doc, root.clone()).unwrap();
//! append_child(&root, new_text("hi")).unwrap();
//!
//! let xml = XmlWriter::new(WriterOptions::default()).serialize(&doc).unwrap();
//! assert_eq!(xml, "<?xml version=\"1.0\"?><greeting>hi</greeting>");
//!
//! let json = JsonWriter::new(WriterOptions::default()).serialize(&doc).unwrap();
//! assert_eq!(json, "{\"greeting\":\"hi\"}");
//! ```

pub mod error;
pub mod node;
pub mod writer;
pub mod xml;

pub use error::{Error, Result};
pub use node::{
    append_child, new_cdata, new_comment, new_document, new_element, new_element_with,
    new_fragment, new_instruction, new_node, new_text, Attribute, Declaration, DocType, Element,
    Instruction, NodeContent, NodeInner, NodeRef,
};
pub use writer::{
    descendant_count, flatten, is_leaf, is_void_element, Emitter, EscapeFlags, JsonWriter,
    TreeWalker, Value, WriterOptions, XmlWriter,
};
pub use xml::{parse_file, parse_str, ParserOptions, XmlParser};
