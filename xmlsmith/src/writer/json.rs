//! JSON serializer.
//!
//! Works in two stages: the tree is flattened into a [`Value`] first,
//! then rendered to text. Rendering keeps leaf objects on a single line
//! when pretty-printing so small records stay readable.

use std::fmt::Write;

use crate::error::Result;
use crate::node::NodeRef;

use super::value::{flatten, is_leaf, Value};
use super::WriterOptions;

/// Serializes document trees into JSON strings.
///
/// Only the pretty-print family of options applies here: `pretty_print`,
/// `indent`, `newline` and `offset`. The markup options are ignored.
pub struct JsonWriter {
    options: WriterOptions,
}

impl JsonWriter {
    /// Creates a writer with the given options.
    pub fn new(options: WriterOptions) -> Self {
        JsonWriter { options }
    }

    /// Serializes the tree rooted at `node` into a JSON string.
    ///
    /// # Errors
    ///
    /// Propagates structural errors from flattening, such as detached
    /// attribute nodes.
    pub fn serialize(&self, node: &NodeRef) -> Result<String> {
        let value = flatten(node)?;
        let mut output = String::new();
        self.render(&value, 0, &mut output);

        if self.options.pretty_print && output.ends_with(&self.options.newline) {
            let stripped = output.len() - self.options.newline.len();
            output.truncate(stripped);
        }
        Ok(output)
    }

    fn render(&self, value: &Value, level: usize, output: &mut String) {
        match value {
            Value::Str(data) => {
                quote_json(data, output);
            }
            Value::Map(entries) => {
                let leaf = is_leaf(value);
                output.push('{');
                for (index, (key, entry)) in entries.iter().enumerate() {
                    if index > 0 {
                        output.push(',');
                    }
                    output.push_str(&self.entry_separator(leaf, level + 1));
                    quote_json(key, output);
                    output.push(':');
                    if self.options.pretty_print {
                        output.push(' ');
                    }
                    self.render(entry, level + 1, output);
                }
                if !entries.is_empty() {
                    output.push_str(&self.entry_separator(leaf, level));
                }
                output.push('}');
            }
            Value::List(items) => {
                let leaf = is_leaf(value);
                output.push('[');
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        output.push(',');
                    }
                    output.push_str(&self.entry_separator(leaf, level + 1));
                    self.render(item, level + 1, output);
                }
                if !items.is_empty() {
                    output.push_str(&self.entry_separator(leaf, level));
                }
                output.push(']');
            }
        }
    }

    /// What goes between a bracket or comma and the next token. Compact
    /// output uses nothing, single-line leaves use one space, and
    /// everything else breaks onto an indented line.
    fn entry_separator(&self, leaf: bool, level: usize) -> String {
        if !self.options.pretty_print {
            String::new()
        } else if leaf {
            " ".to_string()
        } else {
            let mut separator = self.options.newline.clone();
            separator.push_str(&self.options.indent.repeat(self.options.offset + level));
            separator
        }
    }
}

/// Appends `data` as a quoted JSON string with the required escapes.
fn quote_json(data: &str, output: &mut String) {
    output.push('"');
    for ch in data.chars() {
        match ch {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\u{0008}' => output.push_str("\\b"),
            '\u{000C}' => output.push_str("\\f"),
            '\n' => output.push_str("\\n"),
            '\r' => output.push_str("\\r"),
            '\t' => output.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                // cannot fail when writing into a String
                let _ = write!(output, "\\u{:04X}", ch as u32);
            }
            ch => output.push(ch),
        }
    }
    output.push('"');
}
