//! XML parsing into document trees.

mod parser;

pub use parser::{parse_file, parse_str, ParserOptions, XmlParser};
