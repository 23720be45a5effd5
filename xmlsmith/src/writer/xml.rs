//! Markup serializer producing XML text.
//!
//! All pretty-printing policy for angle-bracket syntax lives here:
//! indentation, line breaks, attribute width-wrapping, empty-tag folding,
//! and text-only suppression. Traversal order and escaping are the
//! walker's job.

use rustc_hash::FxHashMap;

use crate::error::Result;
use crate::node::{NodeContent, NodeRef};

use super::walker::{Emitter, TreeWalker};
use super::WriterOptions;

/// Serializes document trees into XML markup strings.
///
/// # Examples
///
/// ```
/// use xmlsmith::{append_child, new_document, new_element, new_text};
/// use xmlsmith::{WriterOptions, XmlWriter};
///
/// let doc = new_document();
/// let root = new_element("greeting");
/// append_child(&doc, root.clone()).unwrap();
/// append_child(&root, new_text("hi")).unwrap();
///
/// let writer = XmlWriter::new(WriterOptions::default());
/// let xml = writer.serialize(&doc).unwrap();
/// assert_eq!(xml, "<?xml version=\"1.0\"?><greeting>hi</greeting>");
/// ```
pub struct XmlWriter {
    options: WriterOptions,
}

impl XmlWriter {
    /// Creates a writer with the given options.
    pub fn new(options: WriterOptions) -> Self {
        XmlWriter { options }
    }

    /// Serializes the tree rooted at `node` into an XML string.
    ///
    /// For a document root the XML declaration is emitted first unless
    /// `headless` is set. With `pretty_print` active, one trailing
    /// newline is stripped from the result.
    ///
    /// # Errors
    ///
    /// Propagates the walker's structural and well-formedness errors.
    pub fn serialize(&self, node: &NodeRef) -> Result<String> {
        let mut emitter = MarkupEmitter::new(&self.options);

        if let NodeContent::Document(decl) = node.borrow().content() {
            if !self.options.headless {
                emitter.declaration(&decl.version, decl.encoding.as_deref(), decl.standalone);
            }
        }

        TreeWalker::new(self.options.escape_flags()).walk(node, &mut emitter)?;

        Ok(emitter.finish())
    }
}

/// Per-call emission state. Created at the start of `serialize`,
/// discarded at the end; never shared between calls.
struct MarkupEmitter<'a> {
    options: &'a WriterOptions,
    markup: String,
    /// True while inside a text-only subtree that must not be indented.
    suppress_pretty: bool,
    /// True when the current element's children render to nothing, so the
    /// close tag was already folded into the open tag.
    empty_node: bool,
    /// Buffer offset just past the last emitted newline, for width wrapping.
    length_to_last_newline: usize,
    /// Indentation strings cached per depth level.
    indentation: FxHashMap<usize, String>,
}

impl<'a> MarkupEmitter<'a> {
    fn new(options: &'a WriterOptions) -> Self {
        MarkupEmitter {
            options,
            markup: String::new(),
            suppress_pretty: false,
            empty_node: false,
            length_to_last_newline: 0,
            indentation: FxHashMap::default(),
        }
    }

    fn declaration(&mut self, version: &str, encoding: Option<&str>, standalone: Option<bool>) {
        self.begin_line(0);

        self.markup.push_str("<?xml version=\"");
        self.markup.push_str(version);
        self.markup.push('"');
        if let Some(encoding) = encoding {
            self.markup.push_str(" encoding=\"");
            self.markup.push_str(encoding);
            self.markup.push('"');
        }
        if let Some(standalone) = standalone {
            self.markup.push_str(" standalone=\"");
            self.markup.push_str(if standalone { "yes" } else { "no" });
            self.markup.push('"');
        }
        self.markup.push_str("?>");

        self.end_line();
    }

    /// Prepends indentation in pretty-print mode, unless suppressed.
    fn begin_line(&mut self, level: usize) {
        if self.options.pretty_print && !self.suppress_pretty {
            self.push_indent(self.options.offset + level);
        }
    }

    /// Appends the newline in pretty-print mode and records its offset.
    fn end_line(&mut self) {
        if self.options.pretty_print && !self.suppress_pretty {
            self.markup.push_str(&self.options.newline);
            self.length_to_last_newline = self.markup.len();
        }
    }

    fn push_indent(&mut self, level: usize) {
        if level == 0 {
            return;
        }
        let indent = &self.options.indent;
        let cached = self
            .indentation
            .entry(level)
            .or_insert_with(|| indent.repeat(level));
        self.markup.push_str(cached);
    }

    fn finish(mut self) -> String {
        if self.options.pretty_print && self.markup.ends_with(&self.options.newline) {
            let stripped = self.markup.len() - self.options.newline.len();
            self.markup.truncate(stripped);
        }
        self.markup
    }
}

impl Emitter for MarkupEmitter<'_> {
    fn doctype(&mut self, name: &str, public_id: &str, system_id: &str, level: usize) {
        self.begin_line(level);

        self.markup.push_str("<!DOCTYPE ");
        self.markup.push_str(name);
        if !public_id.is_empty() && !system_id.is_empty() {
            self.markup.push_str(" PUBLIC \"");
            self.markup.push_str(public_id);
            self.markup.push_str("\" \"");
            self.markup.push_str(system_id);
            self.markup.push('"');
        } else if !public_id.is_empty() {
            self.markup.push_str(" PUBLIC \"");
            self.markup.push_str(public_id);
            self.markup.push('"');
        } else if !system_id.is_empty() {
            self.markup.push_str(" SYSTEM \"");
            self.markup.push_str(system_id);
            self.markup.push('"');
        }
        self.markup.push('>');

        self.end_line();
    }

    fn open_tag_begin(&mut self, name: &str, level: usize) {
        self.begin_line(level);
        self.markup.push('<');
        self.markup.push_str(name);
    }

    fn attribute(&mut self, name: &str, value: &str, level: usize) {
        // name="value" plus the separating space
        let attr_len = name.len() + value.len() + 3;
        let line_len = self.markup.len() - self.length_to_last_newline;

        if self.options.pretty_print
            && self.options.width > 0
            && line_len + 1 + attr_len > self.options.width
        {
            // Break onto an indented continuation line, one unit deeper
            // than the open tag.
            self.end_line();
            self.begin_line(level);
            self.push_indent(1);
        } else {
            self.markup.push(' ');
        }

        self.markup.push_str(name);
        self.markup.push_str("=\"");
        self.markup.push_str(value);
        self.markup.push('"');
    }

    fn open_tag_end(
        &mut self,
        name: &str,
        node: &NodeRef,
        self_closing: bool,
        void_element: bool,
        _level: usize,
    ) {
        self.suppress_pretty = false;
        self.empty_node = false;

        if self.options.pretty_print && !self_closing && !void_element {
            let mut text_only = true;
            let mut empty = true;
            let mut text_count = 0usize;
            let mut cdata_count = 0usize;

            let borrowed = node.borrow();
            for child in borrowed.children() {
                let child_ref = child.borrow();
                match child_ref.content() {
                    NodeContent::Text(data) => {
                        text_count += 1;
                        if !data.is_empty() {
                            empty = false;
                        }
                    }
                    NodeContent::CData(data) => {
                        cdata_count += 1;
                        if !data.is_empty() {
                            empty = false;
                        }
                    }
                    _ => {
                        text_only = false;
                        empty = false;
                        break;
                    }
                }
            }

            self.suppress_pretty = !self.options.indent_text_only_nodes
                && text_only
                && ((cdata_count <= 1 && text_count == 0) || cdata_count == 0);
            self.empty_node = empty;
        }

        if (void_element || self_closing || self.empty_node) && self.options.allow_empty_tags {
            self.markup.push_str("></");
            self.markup.push_str(name);
            self.markup.push('>');
        } else if void_element {
            self.markup.push_str(" />");
        } else if self_closing || self.empty_node {
            self.markup.push_str(if self.options.space_before_slash {
                " />"
            } else {
                "/>"
            });
        } else {
            self.markup.push('>');
        }

        self.end_line();
    }

    fn close_tag(&mut self, name: &str, level: usize) {
        if !self.empty_node {
            self.begin_line(level);
            self.markup.push_str("</");
            self.markup.push_str(name);
            self.markup.push('>');
        }

        // The suppress flag must clear before the trailing newline so a
        // folded text-only element still ends its line.
        self.suppress_pretty = false;
        self.empty_node = false;

        self.end_line();
    }

    fn text(&mut self, data: &str, level: usize) {
        if !data.is_empty() {
            self.begin_line(level);
            self.markup.push_str(data);
            self.end_line();
        }
    }

    fn cdata(&mut self, data: &str, level: usize) {
        if !data.is_empty() {
            self.begin_line(level);
            self.markup.push_str("<![CDATA[");
            self.markup.push_str(data);
            self.markup.push_str("]]>");
            self.end_line();
        }
    }

    fn comment(&mut self, data: &str, level: usize) {
        self.begin_line(level);
        self.markup.push_str("<!--");
        self.markup.push_str(data);
        self.markup.push_str("-->");
        self.end_line();
    }

    fn instruction(&mut self, target: &str, data: &str, level: usize) {
        self.begin_line(level);
        self.markup.push_str("<?");
        self.markup.push_str(target);
        if !data.is_empty() {
            self.markup.push(' ');
            self.markup.push_str(data);
        }
        self.markup.push_str("?>");
        self.end_line();
    }
}
