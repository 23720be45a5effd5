//! Content payloads for document tree nodes.
//!
//! `NodeContent` is the closed set of node kinds the serializers understand.
//! Matching on it is always exhaustive, so adding a kind forces every
//! consumer to decide what to do with it.

/// The content of a node in the document tree.
#[derive(Debug, Clone)]
pub enum NodeContent {
    /// The document container. Carries the XML declaration fields.
    Document(Declaration),
    /// A document fragment container.
    DocumentFragment,
    /// An element with a tag name and ordered attributes.
    Element(Element),
    /// A standalone attribute node. Attributes normally live on their
    /// element; a detached attribute reaching a serializer in child
    /// position is a structure error.
    Attribute(Attribute),
    /// A text run.
    Text(String),
    /// A CDATA section.
    CData(String),
    /// A comment.
    Comment(String),
    /// A processing instruction.
    Instruction(Instruction),
    /// A document type declaration.
    DocType(DocType),
}

impl NodeContent {
    /// Returns a short name for this node kind, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeContent::Document(_) => "document",
            NodeContent::DocumentFragment => "fragment",
            NodeContent::Element(_) => "element",
            NodeContent::Attribute(_) => "attribute",
            NodeContent::Text(_) => "text",
            NodeContent::CData(_) => "cdata",
            NodeContent::Comment(_) => "comment",
            NodeContent::Instruction(_) => "instruction",
            NodeContent::DocType(_) => "doctype",
        }
    }

    /// Returns true if this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, NodeContent::Element(_))
    }

    /// Returns true if this is a text node.
    pub fn is_text(&self) -> bool {
        matches!(self, NodeContent::Text(_))
    }

    /// Returns true if this is a document node.
    pub fn is_document(&self) -> bool {
        matches!(self, NodeContent::Document(_))
    }

    /// Returns a reference to the element, if this is an element node.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns a mutable reference to the element, if this is an element node.
    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            NodeContent::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Returns the character data of text, CDATA, and comment nodes.
    pub fn character_data(&self) -> Option<&str> {
        match self {
            NodeContent::Text(d) | NodeContent::CData(d) | NodeContent::Comment(d) => Some(d),
            _ => None,
        }
    }
}

/// XML declaration fields carried by a document node, emitted verbatim
/// as `<?xml version=".." encoding=".." standalone="yes|no"?>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    /// XML version, defaults to "1.0".
    pub version: String,
    /// Declared encoding, omitted from output when `None`.
    pub encoding: Option<String>,
    /// Standalone flag, omitted from output when `None`.
    pub standalone: Option<bool>,
}

impl Default for Declaration {
    fn default() -> Self {
        Declaration {
            version: "1.0".to_string(),
            encoding: None,
            standalone: None,
        }
    }
}

/// An element: a tag name plus attributes in insertion order.
#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
}

impl Element {
    /// Creates a new element with the given tag name and no attributes.
    pub fn new(name: impl Into<String>) -> Self {
        Element {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    /// Returns the tag name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attributes in insertion order.
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Returns the value of the named attribute, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Sets an attribute. Replaces the value in place if the name already
    /// exists, preserving the original insertion position.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.attributes.iter_mut().find(|a| a.name == name) {
            attr.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
    }

    /// Removes the named attribute, returning its value if it was present.
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        let index = self.attributes.iter().position(|a| a.name == name)?;
        Some(self.attributes.remove(index).value)
    }
}

/// A name/value attribute pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    value: String,
}

impl Attribute {
    /// Creates a new attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Attribute {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Returns the attribute name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the attribute value.
    pub fn value(&self) -> &str {
        &self.value
    }
}

/// A `<!DOCTYPE ...>` declaration. Empty identifier strings mean absent;
/// the serializer picks `PUBLIC "p" "s"`, `PUBLIC "p"`, `SYSTEM "s"`, or
/// a bare name accordingly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocType {
    /// Root element name.
    pub name: String,
    /// Public identifier.
    pub public_id: String,
    /// System identifier.
    pub system_id: String,
}

impl DocType {
    /// Creates a doctype with a name and no identifiers.
    pub fn new(name: impl Into<String>) -> Self {
        DocType {
            name: name.into(),
            public_id: String::new(),
            system_id: String::new(),
        }
    }

    /// Creates a doctype with public and system identifiers.
    pub fn with_ids(
        name: impl Into<String>,
        public_id: impl Into<String>,
        system_id: impl Into<String>,
    ) -> Self {
        DocType {
            name: name.into(),
            public_id: public_id.into(),
            system_id: system_id.into(),
        }
    }
}

/// A processing instruction target plus its data, rendered as
/// `<?target data?>` (or `<?target?>` when the data is empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// The instruction target.
    pub target: String,
    /// The instruction data, may be empty.
    pub data: String,
}

impl Instruction {
    /// Creates a new processing instruction.
    pub fn new(target: impl Into<String>, data: impl Into<String>) -> Self {
        Instruction {
            target: target.into(),
            data: data.into(),
        }
    }
}
