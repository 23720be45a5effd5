//! XML parser that builds document trees.
//!
//! This parser uses quick-xml's streaming API and keeps everything the
//! serializers need: attribute order, CDATA sections, comments,
//! processing instructions, the doctype and the XML declaration.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::node::{
    append_child, new_cdata, new_comment, new_document, new_instruction, new_node, new_text,
    DocType, Element, NodeContent, NodeRef,
};

/// Parsing options.
#[derive(Debug, Clone, Default)]
pub struct ParserOptions {
    /// Keep text nodes that consist only of whitespace. By default they
    /// are dropped, which is what indented input needs before it can be
    /// re-serialized with different formatting.
    pub preserve_whitespace: bool,
}

/// XML parser that builds document trees.
pub struct XmlParser {
    options: ParserOptions,
}

impl XmlParser {
    /// Creates a new parser with the given options.
    pub fn new(options: ParserOptions) -> Self {
        XmlParser { options }
    }

    /// Parses XML from a string.
    pub fn parse_str(&self, xml: &str) -> Result<NodeRef> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<NodeRef> {
        let file = File::open(path)?;
        let buf_reader = BufReader::new(file);
        let mut reader = Reader::from_reader(buf_reader);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;
        self.parse_reader(&mut reader)
    }

    /// Parses XML from a quick-xml Reader into a document node.
    fn parse_reader<R: BufRead>(&self, reader: &mut Reader<R>) -> Result<NodeRef> {
        let root = new_document();
        let mut node_stack: Vec<NodeRef> = vec![root.clone()];
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => {
                    let element = self.parse_element(e, reader)?;
                    let node = new_node(NodeContent::Element(element));
                    self.add_to_top(&node_stack, node.clone())?;
                    node_stack.push(node);
                }
                Ok(Event::End(_)) => {
                    node_stack.pop();
                }
                Ok(Event::Empty(ref e)) => {
                    let element = self.parse_element(e, reader)?;
                    self.add_to_top(&node_stack, new_node(NodeContent::Element(element)))?;
                }
                Ok(Event::Text(e)) => {
                    let raw = reader
                        .decoder()
                        .decode(e.as_ref())
                        .map_err(|e| Error::Parse(e.to_string()))?
                        .to_string();
                    let text = unescape(&raw).map_err(|e| Error::Parse(e.to_string()))?;
                    if self.options.preserve_whitespace
                        || !text.chars().all(char::is_whitespace)
                    {
                        self.add_text(&node_stack, text.into_owned())?;
                    }
                }
                Ok(Event::CData(ref e)) => {
                    let data = String::from_utf8_lossy(e.as_ref());
                    self.add_to_top(&node_stack, new_cdata(data.into_owned()))?;
                }
                Ok(Event::Comment(ref e)) => {
                    let data = String::from_utf8_lossy(e.as_ref());
                    self.add_to_top(&node_stack, new_comment(data.into_owned()))?;
                }
                Ok(Event::PI(ref e)) => {
                    let content = String::from_utf8_lossy(e.as_ref()).to_string();
                    let (target, data) = match content.split_once(char::is_whitespace) {
                        Some((target, data)) => (target.to_string(), data.trim().to_string()),
                        None => (content, String::new()),
                    };
                    self.add_to_top(&node_stack, new_instruction(&target, &data))?;
                }
                Ok(Event::Decl(ref e)) => {
                    let mut root_borrowed = root.borrow_mut();
                    if let NodeContent::Document(decl) = root_borrowed.content_mut() {
                        decl.version = reader
                            .decoder()
                            .decode(e.version().map_err(|e| Error::Parse(e.to_string()))?.as_ref())
                            .map_err(|e| Error::Parse(e.to_string()))?
                            .to_string();
                        decl.encoding = match e.encoding() {
                            Some(encoding) => {
                                let encoding = encoding.map_err(|e| Error::Parse(e.to_string()))?;
                                Some(
                                    reader
                                        .decoder()
                                        .decode(encoding.as_ref())
                                        .map_err(|e| Error::Parse(e.to_string()))?
                                        .to_string(),
                                )
                            }
                            None => None,
                        };
                        decl.standalone = match e.standalone() {
                            Some(standalone) => {
                                let standalone =
                                    standalone.map_err(|e| Error::Parse(e.to_string()))?;
                                Some(standalone.as_ref() == b"yes")
                            }
                            None => None,
                        };
                    }
                }
                Ok(Event::DocType(ref e)) => {
                    let text = reader
                        .decoder()
                        .decode(e.as_ref())
                        .map_err(|e| Error::Parse(e.to_string()))?
                        .to_string();
                    let doctype = parse_doctype(&text)?;
                    self.add_to_top(&node_stack, new_node(NodeContent::DocType(doctype)))?;
                }
                Ok(Event::GeneralRef(ref e)) => {
                    // Unknown entities survive as literal reference text.
                    let name = reader
                        .decoder()
                        .decode(e.as_ref())
                        .map_err(|e| Error::Parse(e.to_string()))?
                        .to_string();
                    let resolved = match name.as_str() {
                        "amp" => "&".to_string(),
                        "lt" => "<".to_string(),
                        "gt" => ">".to_string(),
                        "apos" => "'".to_string(),
                        "quot" => "\"".to_string(),
                        _ => match e.resolve_char_ref().map_err(|e| Error::Parse(e.to_string()))? {
                            Some(c) => c.to_string(),
                            None => format!("&{};", name),
                        },
                    };
                    self.add_text(&node_stack, resolved)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(Error::Parse(format!("XML parse error: {}", e))),
            }
            buf.clear();
        }

        Ok(root)
    }

    /// Adds text, extending a directly preceding text node so that runs
    /// split around entity references come back as one node.
    fn add_text(&self, node_stack: &[NodeRef], data: String) -> Result<()> {
        let last = node_stack
            .last()
            .and_then(|parent| parent.borrow().children().last().cloned());
        if let Some(last) = last {
            let mut last_borrowed = last.borrow_mut();
            if let NodeContent::Text(existing) = last_borrowed.content_mut() {
                existing.push_str(&data);
                return Ok(());
            }
        }
        self.add_to_top(node_stack, new_text(data))
    }

    fn add_to_top(&self, node_stack: &[NodeRef], node: NodeRef) -> Result<()> {
        match node_stack.last() {
            Some(parent) => append_child(parent, node),
            None => Err(Error::Parse("content outside the document root".to_string())),
        }
    }

    /// Parses an element's name and attributes, preserving their order.
    fn parse_element<R: BufRead>(&self, e: &BytesStart, reader: &Reader<R>) -> Result<Element> {
        let name = reader
            .decoder()
            .decode(e.name().as_ref())
            .map_err(|e| Error::Parse(e.to_string()))?
            .to_string();

        let mut element = Element::new(name);
        for attr_result in e.attributes() {
            let attr = attr_result.map_err(|e| Error::Parse(format!("attribute error: {}", e)))?;
            let key = reader
                .decoder()
                .decode(attr.key.as_ref())
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            let value = attr
                .unescape_value()
                .map_err(|e| Error::Parse(e.to_string()))?
                .to_string();
            element.set_attribute(&key, &value);
        }

        Ok(element)
    }
}

/// Parses the interior of a `<!DOCTYPE ...>` declaration.
fn parse_doctype(text: &str) -> Result<DocType> {
    let text = text.trim();
    let (name, rest) = match text.split_once(char::is_whitespace) {
        Some((name, rest)) => (name, rest.trim_start()),
        None => (text, ""),
    };
    if name.is_empty() {
        return Err(Error::Parse("doctype without a name".to_string()));
    }

    let mut doctype = DocType::new(name);
    if let Some(rest) = rest.strip_prefix("PUBLIC") {
        let (public_id, rest) = read_quoted(rest)?;
        doctype.public_id = public_id;
        let rest = rest.trim_start();
        if rest.starts_with('"') || rest.starts_with('\'') {
            let (system_id, _) = read_quoted(rest)?;
            doctype.system_id = system_id;
        }
    } else if let Some(rest) = rest.strip_prefix("SYSTEM") {
        let (system_id, _) = read_quoted(rest)?;
        doctype.system_id = system_id;
    }
    Ok(doctype)
}

/// Reads one quoted literal, returning it and the remaining input.
fn read_quoted(input: &str) -> Result<(String, &str)> {
    let input = input.trim_start();
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('"' | '\''))) => c,
        _ => return Err(Error::Parse("expected a quoted identifier".to_string())),
    };
    for (index, c) in chars {
        if c == quote {
            return Ok((input[1..index].to_string(), &input[index + 1..]));
        }
    }
    Err(Error::Parse("unterminated quoted identifier".to_string()))
}

/// Parses XML from a file with default options.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<NodeRef> {
    XmlParser::new(ParserOptions::default()).parse_file(path)
}

/// Parses XML from a string with default options.
pub fn parse_str(xml: &str) -> Result<NodeRef> {
    XmlParser::new(ParserOptions::default()).parse_str(xml)
}
