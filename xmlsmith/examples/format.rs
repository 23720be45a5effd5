//! Example: Pretty-print an XML document
//!
//! Parses an XML file and prints it back out with two-space indentation.
//!
//! Usage: cargo run --example format <input.xml>

use std::env;
use xmlsmith::{parse_file, WriterOptions, XmlWriter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: {} <input.xml>", args[0]);
        std::process::exit(1);
    }

    let doc = parse_file(&args[1])?;

    let writer = XmlWriter::new(WriterOptions::pretty());
    println!("{}", writer.serialize(&doc)?);

    Ok(())
}
