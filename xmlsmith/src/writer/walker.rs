//! Depth-first traversal dispatching serializer callbacks.
//!
//! The walker owns everything that is policy-independent: document order,
//! depth tracking, escaping, well-formedness checks, and structural
//! validation. Emitters only ever see one syntactic unit at a time and
//! decide how to print it.

use crate::error::{Error, Result};
use crate::node::{NodeContent, NodeRef};

use super::escape::{escape_attr_value, escape_text, EscapeFlags};

/// Receives one callback per syntactic unit, in document order.
///
/// `level` is the depth of the node the callback belongs to; it increases
/// by one when entering element children. Text, CDATA, comment, and
/// instruction data arrive already escaped or validated by the walker.
pub trait Emitter {
    /// Called for a `<!DOCTYPE ...>` node. Empty identifier strings mean
    /// the identifier is absent.
    fn doctype(&mut self, name: &str, public_id: &str, system_id: &str, level: usize);
    /// Called with the tag name when an element starts: `<name`.
    fn open_tag_begin(&mut self, name: &str, level: usize);
    /// Called once per attribute, in insertion order. The value is escaped.
    fn attribute(&mut self, name: &str, value: &str, level: usize);
    /// Closes the open tag. `node` is the element node itself, so the
    /// emitter can classify children (empty, text-only) for its own
    /// pretty-printing policy.
    fn open_tag_end(
        &mut self,
        name: &str,
        node: &NodeRef,
        self_closing: bool,
        void_element: bool,
        level: usize,
    );
    /// Called after an element's children. Not invoked for self-closing
    /// or void elements.
    fn close_tag(&mut self, name: &str, level: usize);
    /// Called for non-empty text runs, already escaped.
    fn text(&mut self, data: &str, level: usize);
    /// Called for CDATA sections.
    fn cdata(&mut self, data: &str, level: usize);
    /// Called for comments.
    fn comment(&mut self, data: &str, level: usize);
    /// Called for processing instructions. `data` may be empty.
    fn instruction(&mut self, target: &str, data: &str, level: usize);
}

/// Tag names that never contain children and render without a close tag.
pub fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Drives an [`Emitter`] over a document tree in a single pass.
pub struct TreeWalker {
    flags: EscapeFlags,
}

impl TreeWalker {
    /// Creates a walker with the given escaping strictness flags.
    pub fn new(flags: EscapeFlags) -> Self {
        TreeWalker { flags }
    }

    /// Walks the tree rooted at `node`, invoking callbacks on `emitter`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Structure`] when a node kind appears in a position
    /// it cannot be serialized from, and [`Error::WellFormed`] when the
    /// `WELL_FORMED` flag is set and content violates the checks.
    pub fn walk<E: Emitter>(&self, node: &NodeRef, emitter: &mut E) -> Result<()> {
        let borrowed = node.borrow();
        match borrowed.content() {
            NodeContent::Document(_) | NodeContent::DocumentFragment => {
                for child in borrowed.children() {
                    let child_ref = child.borrow();
                    if let NodeContent::DocType(dt) = child_ref.content() {
                        emitter.doctype(&dt.name, &dt.public_id, &dt.system_id, 0);
                    } else {
                        self.walk_node(child, 0, emitter)?;
                    }
                }
                Ok(())
            }
            NodeContent::DocType(dt) => {
                emitter.doctype(&dt.name, &dt.public_id, &dt.system_id, 0);
                Ok(())
            }
            _ => {
                drop(borrowed);
                self.walk_node(node, 0, emitter)
            }
        }
    }

    fn walk_node<E: Emitter>(&self, node: &NodeRef, level: usize, emitter: &mut E) -> Result<()> {
        let borrowed = node.borrow();
        match borrowed.content() {
            NodeContent::Element(element) => {
                let name = element.name();
                emitter.open_tag_begin(name, level);

                for attr in element.attributes() {
                    let value = escape_attr_value(attr.value(), self.flags);
                    emitter.attribute(attr.name(), &value, level);
                }

                let self_closing = borrowed.children().is_empty();
                let void_element = is_void_element(name);
                if void_element && !self_closing {
                    return Err(Error::Structure(format!(
                        "void element <{name}> cannot have children"
                    )));
                }

                emitter.open_tag_end(name, node, self_closing, void_element, level);

                if !self_closing && !void_element {
                    for child in borrowed.children() {
                        self.walk_node(child, level + 1, emitter)?;
                    }
                    emitter.close_tag(name, level);
                }
                Ok(())
            }
            NodeContent::Text(data) => {
                // Zero-length text produces no callback at all.
                if !data.is_empty() {
                    emitter.text(&escape_text(data, self.flags), level);
                }
                Ok(())
            }
            NodeContent::CData(data) => {
                if self.flags.contains(EscapeFlags::WELL_FORMED) && data.contains("]]>") {
                    return Err(Error::WellFormed(
                        "CDATA section contains \"]]>\"".to_string(),
                    ));
                }
                emitter.cdata(data, level);
                Ok(())
            }
            NodeContent::Comment(data) => {
                if self.flags.contains(EscapeFlags::WELL_FORMED)
                    && (data.contains("--") || data.ends_with('-'))
                {
                    return Err(Error::WellFormed(
                        "comment contains \"--\" or ends with \"-\"".to_string(),
                    ));
                }
                emitter.comment(data, level);
                Ok(())
            }
            NodeContent::Instruction(pi) => {
                if self.flags.contains(EscapeFlags::WELL_FORMED) && pi.data.contains("?>") {
                    return Err(Error::WellFormed(
                        "processing instruction data contains \"?>\"".to_string(),
                    ));
                }
                emitter.instruction(&pi.target, &pi.data, level);
                Ok(())
            }
            NodeContent::Attribute(attr) => Err(Error::Structure(format!(
                "attribute node \"{}\" outside an element",
                attr.name()
            ))),
            NodeContent::DocType(_) => Err(Error::Structure(
                "doctype below document level".to_string(),
            )),
            NodeContent::Document(_) | NodeContent::DocumentFragment => Err(Error::Structure(
                format!("nested {} node", borrowed.content().kind_name()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{append_child, new_document, new_element, new_node, new_text, Attribute};

    /// Records callback names in invocation order.
    #[derive(Default)]
    struct RecordingEmitter {
        calls: Vec<String>,
    }

    impl Emitter for RecordingEmitter {
        fn doctype(&mut self, name: &str, _public_id: &str, _system_id: &str, _level: usize) {
            self.calls.push(format!("doctype {name}"));
        }
        fn open_tag_begin(&mut self, name: &str, level: usize) {
            self.calls.push(format!("open {name} @{level}"));
        }
        fn attribute(&mut self, name: &str, value: &str, _level: usize) {
            self.calls.push(format!("attr {name}={value}"));
        }
        fn open_tag_end(
            &mut self,
            name: &str,
            _node: &NodeRef,
            self_closing: bool,
            _void_element: bool,
            _level: usize,
        ) {
            self.calls.push(format!("open-end {name} sc={self_closing}"));
        }
        fn close_tag(&mut self, name: &str, level: usize) {
            self.calls.push(format!("close {name} @{level}"));
        }
        fn text(&mut self, data: &str, _level: usize) {
            self.calls.push(format!("text {data}"));
        }
        fn cdata(&mut self, data: &str, _level: usize) {
            self.calls.push(format!("cdata {data}"));
        }
        fn comment(&mut self, data: &str, _level: usize) {
            self.calls.push(format!("comment {data}"));
        }
        fn instruction(&mut self, target: &str, _data: &str, _level: usize) {
            self.calls.push(format!("pi {target}"));
        }
    }

    #[test]
    fn test_callback_order_and_depth() {
        let doc = new_document();
        let root = new_element("root");
        let child = new_element("child");
        append_child(&doc, root.clone()).unwrap();
        append_child(&root, child.clone()).unwrap();
        append_child(&child, new_text("hi")).unwrap();

        let mut emitter = RecordingEmitter::default();
        TreeWalker::new(EscapeFlags::empty())
            .walk(&doc, &mut emitter)
            .unwrap();

        assert_eq!(
            emitter.calls,
            vec![
                "open root @0",
                "open-end root sc=false",
                "open child @1",
                "open-end child sc=false",
                "text hi",
                "close child @1",
                "close root @0",
            ]
        );
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let root = new_element("root");
        append_child(&root, new_text("")).unwrap();

        let mut emitter = RecordingEmitter::default();
        TreeWalker::new(EscapeFlags::empty())
            .walk(&root, &mut emitter)
            .unwrap();

        assert!(!emitter.calls.iter().any(|c| c.starts_with("text")));
    }

    #[test]
    fn test_no_close_tag_for_childless_element() {
        let root = new_element("lone");
        let mut emitter = RecordingEmitter::default();
        TreeWalker::new(EscapeFlags::empty())
            .walk(&root, &mut emitter)
            .unwrap();

        assert_eq!(emitter.calls, vec!["open lone @0", "open-end lone sc=true"]);
    }

    #[test]
    fn test_stray_attribute_node_is_fatal() {
        let root = new_element("root");
        let stray = new_node(NodeContent::Attribute(Attribute::new("id", "1")));
        append_child(&root, stray).unwrap();

        let mut emitter = RecordingEmitter::default();
        let err = TreeWalker::new(EscapeFlags::empty())
            .walk(&root, &mut emitter)
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_void_element_with_children_is_fatal() {
        let br = new_element("br");
        append_child(&br, new_text("nope")).unwrap();

        let mut emitter = RecordingEmitter::default();
        let err = TreeWalker::new(EscapeFlags::empty())
            .walk(&br, &mut emitter)
            .unwrap_err();
        assert!(matches!(err, Error::Structure(_)));
    }

    #[test]
    fn test_well_formed_rejects_double_hyphen_comment() {
        let root = new_element("root");
        append_child(&root, crate::node::new_comment("bad -- comment")).unwrap();

        let mut emitter = RecordingEmitter::default();
        let err = TreeWalker::new(EscapeFlags::WELL_FORMED)
            .walk(&root, &mut emitter)
            .unwrap_err();
        assert!(matches!(err, Error::WellFormed(_)));
    }

    #[test]
    fn test_well_formed_rejects_cdata_terminator() {
        let root = new_element("root");
        append_child(&root, crate::node::new_cdata("a ]]> b")).unwrap();

        let mut emitter = RecordingEmitter::default();
        let err = TreeWalker::new(EscapeFlags::WELL_FORMED)
            .walk(&root, &mut emitter)
            .unwrap_err();
        assert!(matches!(err, Error::WellFormed(_)));
    }
}
