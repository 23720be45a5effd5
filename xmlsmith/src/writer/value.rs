//! Intermediate value model for the JSON serializer.
//!
//! A document tree is first flattened into [`Value`], a small
//! string/map/list structure using sigil keys for non-element content,
//! then rendered to text by the JSON writer. Maps preserve insertion
//! order so attribute and child ordering survives the conversion.

use std::mem;

use crate::error::{Error, Result};
use crate::node::{NodeContent, NodeRef};

/// Ordered JSON-like value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Str(String),
    Map(Vec<(String, Value)>),
    List(Vec<Value>),
}

/// Total number of scalar string leaves under a value.
pub fn descendant_count(value: &Value) -> usize {
    match value {
        Value::Str(_) => 1,
        Value::Map(entries) => entries.iter().map(|(_, v)| descendant_count(v)).sum(),
        Value::List(items) => items.iter().map(descendant_count).sum(),
    }
}

/// A leaf holds at most one scalar and can render on a single line.
pub fn is_leaf(value: &Value) -> bool {
    descendant_count(value) <= 1
}

/// Converts a document tree into its JSON value form.
///
/// Element attributes become `"@name"` keys, text children `"#"`, CDATA
/// `"$"`, comments `"!"` and processing instructions `"?"`. Repeated
/// sibling keys collapse into a list at the first occurrence. Doctype
/// nodes and the XML declaration have no JSON rendition and are skipped.
///
/// # Errors
///
/// Returns [`Error::Structure`] for detached attribute nodes or doctype
/// nodes outside a document root.
pub fn flatten(node: &NodeRef) -> Result<Value> {
    let borrowed = node.borrow();
    match borrowed.content() {
        NodeContent::Document(_) | NodeContent::DocumentFragment => {
            let mut entries = Vec::new();
            for child in borrowed.children() {
                if matches!(child.borrow().content(), NodeContent::DocType(_)) {
                    continue;
                }
                collect_child(child, &mut entries)?;
            }
            Ok(Value::Map(entries))
        }
        NodeContent::Element(element) => {
            let name = element.name().to_string();
            drop(borrowed);
            let value = element_value(node)?;
            Ok(Value::Map(vec![(name, value)]))
        }
        NodeContent::Text(data) => Ok(Value::Map(vec![("#".to_string(), Value::Str(data.clone()))])),
        NodeContent::CData(data) => Ok(Value::Map(vec![("$".to_string(), Value::Str(data.clone()))])),
        NodeContent::Comment(data) => {
            Ok(Value::Map(vec![("!".to_string(), Value::Str(data.clone()))]))
        }
        NodeContent::Instruction(pi) => Ok(Value::Map(vec![(
            "?".to_string(),
            Value::Str(instruction_text(&pi.target, &pi.data)),
        )])),
        NodeContent::Attribute(_) | NodeContent::DocType(_) => Err(Error::Structure(format!(
            "{} node has no JSON form",
            borrowed.content().kind_name()
        ))),
    }
}

/// The value side of an element entry.
fn element_value(node: &NodeRef) -> Result<Value> {
    let borrowed = node.borrow();
    let element = match borrowed.content() {
        NodeContent::Element(element) => element,
        _ => return Err(Error::Structure("expected an element node".to_string())),
    };

    // An element holding nothing but a single text child compacts to a
    // bare string.
    if element.attributes().is_empty() && borrowed.child_count() == 1 {
        let child = &borrowed.children()[0];
        if let NodeContent::Text(data) = child.borrow().content() {
            return Ok(Value::Str(data.clone()));
        }
    }

    let mut entries = Vec::new();
    for attribute in element.attributes() {
        entries.push((
            format!("@{}", attribute.name()),
            Value::Str(attribute.value().to_string()),
        ));
    }
    for child in borrowed.children() {
        collect_child(child, &mut entries)?;
    }
    Ok(Value::Map(entries))
}

fn collect_child(child: &NodeRef, entries: &mut Vec<(String, Value)>) -> Result<()> {
    let borrowed = child.borrow();
    let (key, value) = match borrowed.content() {
        NodeContent::Element(element) => {
            let key = element.name().to_string();
            drop(borrowed);
            (key, element_value(child)?)
        }
        NodeContent::Text(data) => ("#".to_string(), Value::Str(data.clone())),
        NodeContent::CData(data) => ("$".to_string(), Value::Str(data.clone())),
        NodeContent::Comment(data) => ("!".to_string(), Value::Str(data.clone())),
        NodeContent::Instruction(pi) => (
            "?".to_string(),
            Value::Str(instruction_text(&pi.target, &pi.data)),
        ),
        NodeContent::DocType(_) | NodeContent::Document(_) | NodeContent::DocumentFragment => {
            return Ok(())
        }
        NodeContent::Attribute(_) => {
            return Err(Error::Structure(
                "attribute node cannot appear among children".to_string(),
            ))
        }
    };
    push_entry(entries, key, value);
    Ok(())
}

/// Inserts an entry, collapsing repeated keys into a list in place.
fn push_entry(entries: &mut Vec<(String, Value)>, key: String, value: Value) {
    if let Some((_, existing)) = entries.iter_mut().find(|(k, _)| *k == key) {
        match existing {
            Value::List(items) => items.push(value),
            _ => {
                let first = mem::replace(existing, Value::List(Vec::new()));
                if let Value::List(items) = existing {
                    items.push(first);
                    items.push(value);
                }
            }
        }
    } else {
        entries.push((key, value));
    }
}

fn instruction_text(target: &str, data: &str) -> String {
    if data.is_empty() {
        target.to_string()
    } else {
        format!("{} {}", target, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{
        append_child, new_cdata, new_comment, new_document, new_element, new_element_with,
        new_instruction, new_text,
    };

    fn str(s: &str) -> Value {
        Value::Str(s.to_string())
    }

    #[test]
    fn test_text_only_element_compacts_to_string() {
        let root = new_element("name");
        append_child(&root, new_text("value")).unwrap();
        assert_eq!(
            flatten(&root).unwrap(),
            Value::Map(vec![("name".to_string(), str("value"))])
        );
    }

    #[test]
    fn test_childless_element_is_empty_map() {
        let root = new_element("empty");
        assert_eq!(
            flatten(&root).unwrap(),
            Value::Map(vec![("empty".to_string(), Value::Map(Vec::new()))])
        );
    }

    #[test]
    fn test_attribute_keys_come_first() {
        let root = new_element_with("item", &[("id", "1")]);
        append_child(&root, new_text("hi")).unwrap();
        assert_eq!(
            flatten(&root).unwrap(),
            Value::Map(vec![(
                "item".to_string(),
                Value::Map(vec![
                    ("@id".to_string(), str("1")),
                    ("#".to_string(), str("hi")),
                ])
            )])
        );
    }

    #[test]
    fn test_sigil_keys_for_non_element_content() {
        let root = new_element("root");
        append_child(&root, new_comment("note")).unwrap();
        append_child(&root, new_cdata("raw")).unwrap();
        append_child(&root, new_instruction("target", "data")).unwrap();
        append_child(&root, new_instruction("bare", "")).unwrap();

        assert_eq!(
            flatten(&root).unwrap(),
            Value::Map(vec![(
                "root".to_string(),
                Value::Map(vec![
                    ("!".to_string(), str("note")),
                    ("$".to_string(), str("raw")),
                    ("?".to_string(), Value::List(vec![str("target data"), str("bare")])),
                ])
            )])
        );
    }

    #[test]
    fn test_repeated_siblings_collapse_to_list_in_place() {
        let root = new_element("list");
        for (tag, text) in [("a", "1"), ("b", "2"), ("a", "3"), ("a", "4")] {
            let child = new_element(tag);
            append_child(&child, new_text(text)).unwrap();
            append_child(&root, child).unwrap();
        }

        assert_eq!(
            flatten(&root).unwrap(),
            Value::Map(vec![(
                "list".to_string(),
                Value::Map(vec![
                    (
                        "a".to_string(),
                        Value::List(vec![str("1"), str("3"), str("4")])
                    ),
                    ("b".to_string(), str("2")),
                ])
            )])
        );
    }

    #[test]
    fn test_document_skips_doctype() {
        let doc = new_document();
        let doctype = crate::node::new_node(crate::node::NodeContent::DocType(
            crate::node::DocType::new("root"),
        ));
        append_child(&doc, doctype).unwrap();
        append_child(&doc, new_element("root")).unwrap();

        assert_eq!(
            flatten(&doc).unwrap(),
            Value::Map(vec![("root".to_string(), Value::Map(Vec::new()))])
        );
    }

    #[test]
    fn test_attribute_with_text_does_not_compact() {
        let root = new_element_with("a", &[("k", "v")]);
        append_child(&root, new_text("body")).unwrap();
        let Value::Map(outer) = flatten(&root).unwrap() else {
            panic!("expected map");
        };
        assert!(matches!(outer[0].1, Value::Map(_)));
    }

    #[test]
    fn test_descendant_count_and_leaves() {
        assert_eq!(descendant_count(&str("x")), 1);
        assert!(is_leaf(&str("x")));

        let empty = Value::Map(Vec::new());
        assert_eq!(descendant_count(&empty), 0);
        assert!(is_leaf(&empty));

        let leaf = Value::Map(vec![("a".to_string(), str("b"))]);
        assert!(is_leaf(&leaf));

        let branch = Value::Map(vec![
            ("a".to_string(), str("b")),
            ("c".to_string(), Value::List(vec![str("d"), str("e")])),
        ]);
        assert_eq!(descendant_count(&branch), 3);
        assert!(!is_leaf(&branch));
    }
}
