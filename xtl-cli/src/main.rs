//! Command-line front end for template-driven XML loading.
//!
//! Loads a document with the accept-everything template and prints the
//! resulting tree.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use xml_template::{
    ElementPrinter, ElementPrinterOptions, GenericSchema, Loader, Template, TokenizerConfig,
};

/// Load an XML document through a template and dump the element tree
#[derive(Parser)]
#[command(name = "xtl")]
#[command(version)]
#[command(about = "Load an XML document through a template and dump the element tree", long_about = None)]
struct Cli {
    /// Document to load
    path: PathBuf,

    /// Root tag to match (default: the first element in the document)
    #[arg(short, long)]
    root: Option<String>,

    /// Drop text content from every element
    #[arg(long)]
    no_text: bool,

    /// Keep whitespace-only text
    #[arg(long)]
    keep_whitespace: bool,

    /// Spaces per indentation level
    #[arg(short, long, default_value = "2")]
    indent: usize,
}

fn main() -> ExitCode {
    // Initialize tracing with WARN level by default, respecting RUST_LOG
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => {
            eprintln!("No matching element in {}", cli.path.display());
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Loads and prints the document. Returns false when nothing matched.
fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let template: Template = Arc::new(
        GenericSchema::new(cli.root.clone().unwrap_or_default()).wrapper(!cli.no_text),
    );
    let loader = Loader::with_config(TokenizerConfig {
        keep_whitespace_text: cli.keep_whitespace,
        ..TokenizerConfig::default()
    });

    let Some(root) = loader.try_load_file(&cli.path, &template)? else {
        return Ok(false);
    };

    let options = ElementPrinterOptions {
        indent_width: cli.indent,
    };
    ElementPrinter::with_options(io::stdout().lock(), options).print(&root)?;
    Ok(true)
}
