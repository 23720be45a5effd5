//! Example: Convert an XML document to JSON
//!
//! Parses an XML file and prints its JSON rendition. Element attributes
//! become "@name" keys and text content becomes "#" keys.
//!
//! Usage: cargo run --example to_json <input.xml>

use std::env;
use xmlsmith::{parse_file, JsonWriter, WriterOptions};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.xml>", args[0]);
        std::process::exit(1);
    }

    let doc = parse_file(&args[1])?;

    let writer = JsonWriter::new(WriterOptions::pretty());
    println!("{}", writer.serialize(&doc)?);

    Ok(())
}
