//! XML formatting and conversion tool.
//!
//! Reads an XML document and writes it back out, either reformatted as
//! XML or converted to JSON.

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{Parser, Subcommand};
use xmlsmith::{JsonWriter, ParserOptions, WriterOptions, XmlParser, XmlWriter};

/// XML formatting and conversion tool
#[derive(Parser)]
#[command(name = "xsm")]
#[command(version)]
#[command(about = "XML formatting and conversion tool", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat an XML document
    #[command(visible_alias = "f")]
    Fmt {
        /// Input file
        input: String,
        /// Output file (default: stdout)
        output: Option<String>,

        #[command(flatten)]
        format: FormatArgs,

        /// Write <node></node> instead of <node/> for empty elements
        #[arg(long)]
        allow_empty_tags: bool,

        /// Indent elements that hold only text
        #[arg(long)]
        indent_text_only_nodes: bool,

        /// Write <node /> instead of <node/>
        #[arg(long)]
        space_before_slash: bool,

        /// Skip the XML declaration
        #[arg(long)]
        headless: bool,

        /// Maximum line width before attributes wrap (0 = no wrapping)
        #[arg(short = 'w', long, default_value = "0")]
        width: usize,

        /// Reject content that would not reparse, such as -- in comments
        #[arg(long)]
        well_formed: bool,
    },

    /// Convert an XML document to JSON
    #[command(visible_alias = "j")]
    Json {
        /// Input file
        input: String,
        /// Output file (default: stdout)
        output: Option<String>,

        #[command(flatten)]
        format: FormatArgs,
    },
}

/// Formatting flags shared by both subcommands.
#[derive(clap::Args)]
struct FormatArgs {
    /// Pretty-print with indentation and line breaks
    #[arg(short, long)]
    pretty: bool,

    /// Indentation string per depth level
    #[arg(short, long, default_value = "  ")]
    indent: String,

    /// Extra indentation levels applied to every line
    #[arg(short, long, default_value = "0")]
    offset: usize,

    /// Keep whitespace-only text nodes from the input
    #[arg(short = 'k', long)]
    keep_whitespace: bool,
}

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Fmt {
            input,
            output,
            format,
            allow_empty_tags,
            indent_text_only_nodes,
            space_before_slash,
            headless,
            width,
            well_formed,
        } => {
            let options = WriterOptions {
                pretty_print: format.pretty,
                indent: format.indent.clone(),
                offset: format.offset,
                allow_empty_tags,
                indent_text_only_nodes,
                space_before_slash,
                headless,
                width,
                well_formed,
                ..WriterOptions::default()
            };
            run_fmt(&input, output.as_deref(), &format, options)
        }
        Commands::Json {
            input,
            output,
            format,
        } => {
            let options = WriterOptions {
                pretty_print: format.pretty,
                indent: format.indent.clone(),
                offset: format.offset,
                ..WriterOptions::default()
            };
            run_json(&input, output.as_deref(), &format, options)
        }
    };

    match result {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::ExitCode::FAILURE
        }
    }
}

fn parse_input(input_path: &str, format: &FormatArgs) -> Result<xmlsmith::NodeRef, xmlsmith::Error> {
    let parser = XmlParser::new(ParserOptions {
        preserve_whitespace: format.keep_whitespace,
    });
    parser.parse_file(input_path)
}

fn open_output(output_path: Option<&str>) -> io::Result<Box<dyn Write>> {
    Ok(match output_path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(io::stdout()),
    })
}

/// Reformats an XML document.
fn run_fmt(
    input_path: &str,
    output_path: Option<&str>,
    format: &FormatArgs,
    options: WriterOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_input(input_path, format)?;

    let markup = XmlWriter::new(options).serialize(&doc)?;

    let mut output = open_output(output_path)?;
    writeln!(output, "{}", markup)?;

    Ok(())
}

/// Converts an XML document to JSON.
fn run_json(
    input_path: &str,
    output_path: Option<&str>,
    format: &FormatArgs,
    options: WriterOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_input(input_path, format)?;

    let text = JsonWriter::new(options).serialize(&doc)?;

    let mut output = open_output(output_path)?;
    writeln!(output, "{}", text)?;

    Ok(())
}
