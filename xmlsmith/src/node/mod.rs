//! Node structures for the document tree.
//!
//! A tree is built from `NodeRef` values (`Rc<RefCell<NodeInner>>`). Each
//! node owns its ordered children and a weak link back to its parent.
//! Only document, fragment, and element nodes may carry children; the
//! append functions enforce that invariant so the serializers can rely
//! on it.

pub mod content;

pub use content::{Attribute, Declaration, DocType, Element, Instruction, NodeContent};

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::error::{Error, Result};

/// A reference-counted pointer to a node.
pub type NodeRef = Rc<RefCell<NodeInner>>;

/// A weak node pointer, used for parent links.
pub type WeakNodeRef = Weak<RefCell<NodeInner>>;

/// The inner data of a node: its content plus ordered children.
#[derive(Debug)]
pub struct NodeInner {
    children: Vec<NodeRef>,
    parent: WeakNodeRef,
    content: NodeContent,
}

impl NodeInner {
    fn new(content: NodeContent) -> Self {
        NodeInner {
            children: Vec::new(),
            parent: Weak::new(),
            content,
        }
    }

    /// Returns the content of this node.
    pub fn content(&self) -> &NodeContent {
        &self.content
    }

    /// Returns a mutable reference to the content.
    pub fn content_mut(&mut self) -> &mut NodeContent {
        &mut self.content
    }

    /// Returns the children as a slice.
    pub fn children(&self) -> &[NodeRef] {
        &self.children
    }

    /// Returns the number of children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Returns a weak reference to the parent.
    pub fn parent(&self) -> &WeakNodeRef {
        &self.parent
    }

    /// Returns true if this node kind may carry children.
    pub fn can_have_children(&self) -> bool {
        matches!(
            self.content,
            NodeContent::Document(_) | NodeContent::DocumentFragment | NodeContent::Element(_)
        )
    }
}

/// Creates a new detached node with the given content.
pub fn new_node(content: NodeContent) -> NodeRef {
    Rc::new(RefCell::new(NodeInner::new(content)))
}

/// Creates a document node with a default declaration.
pub fn new_document() -> NodeRef {
    new_node(NodeContent::Document(Declaration::default()))
}

/// Creates a document fragment node.
pub fn new_fragment() -> NodeRef {
    new_node(NodeContent::DocumentFragment)
}

/// Creates an element node with the given tag name.
pub fn new_element(name: impl Into<String>) -> NodeRef {
    new_node(NodeContent::Element(Element::new(name)))
}

/// Creates an element node with attributes, in the given order.
pub fn new_element_with(name: impl Into<String>, attributes: &[(&str, &str)]) -> NodeRef {
    let mut element = Element::new(name);
    for (attr_name, attr_value) in attributes {
        element.set_attribute(*attr_name, *attr_value);
    }
    new_node(NodeContent::Element(element))
}

/// Creates a text node.
pub fn new_text(data: impl Into<String>) -> NodeRef {
    new_node(NodeContent::Text(data.into()))
}

/// Creates a CDATA section node.
pub fn new_cdata(data: impl Into<String>) -> NodeRef {
    new_node(NodeContent::CData(data.into()))
}

/// Creates a comment node.
pub fn new_comment(data: impl Into<String>) -> NodeRef {
    new_node(NodeContent::Comment(data.into()))
}

/// Creates a processing instruction node.
pub fn new_instruction(target: impl Into<String>, data: impl Into<String>) -> NodeRef {
    new_node(NodeContent::Instruction(Instruction::new(target, data)))
}

/// Appends `child` to the end of `parent`'s child list.
///
/// # Errors
///
/// Returns [`Error::Structure`] if `parent` is a node kind that cannot
/// carry children (text, CDATA, comments, and the rest are leaves).
pub fn append_child(parent: &NodeRef, child: NodeRef) -> Result<()> {
    if !parent.borrow().can_have_children() {
        return Err(Error::Structure(format!(
            "{} nodes cannot have children",
            parent.borrow().content().kind_name()
        )));
    }
    child.borrow_mut().parent = Rc::downgrade(parent);
    parent.borrow_mut().children.push(child);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_creation() {
        let doc = new_document();
        assert!(doc.borrow().content().is_document());
        assert_eq!(doc.borrow().child_count(), 0);

        let element = new_element("root");
        assert!(element.borrow().content().is_element());

        let text = new_text("hello");
        assert!(text.borrow().content().is_text());
    }

    #[test]
    fn test_append_child() {
        let parent = new_element("parent");
        let child1 = new_element("child1");
        let child2 = new_text("data");

        append_child(&parent, child1.clone()).unwrap();
        append_child(&parent, child2).unwrap();

        assert_eq!(parent.borrow().child_count(), 2);
        let linked = child1.borrow().parent().upgrade().unwrap();
        assert!(Rc::ptr_eq(&linked, &parent));
    }

    #[test]
    fn test_leaves_reject_children() {
        let text = new_text("leaf");
        let err = append_child(&text, new_element("e")).unwrap_err();
        assert!(err.to_string().contains("text nodes cannot have children"));

        let comment = new_comment("leaf");
        assert!(append_child(&comment, new_text("x")).is_err());
    }

    #[test]
    fn test_element_with_attributes() {
        let node = new_element_with("a", &[("href", "x"), ("rel", "y")]);
        let borrowed = node.borrow();
        let element = borrowed.content().as_element().unwrap();
        assert_eq!(element.attribute("href"), Some("x"));
        assert_eq!(element.attributes().len(), 2);
        assert_eq!(element.attributes()[0].name(), "href");
    }
}
