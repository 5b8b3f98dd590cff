//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use factura_core::invoice::{FacturaParser, InvoiceParser};

use super::output::{format_invoice, OutputFormat};
use super::{load_config, read_invoice_text};

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or text), or `-` for stdin
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,

    /// Report missing fields on stderr
    #[arg(long)]
    validate: bool,
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    info!("Processing file: {}", args.input.display());

    let (text, source_type) = read_invoice_text(&args.input, &config)?;

    let parser = FacturaParser::with_config(config.extraction.clone());
    let result = parser.parse(&text);
    let mut invoice = result.invoice;
    invoice.metadata.source_type = source_type;

    if invoice.line_items.is_empty() {
        eprintln!(
            "{} No line items detected, check the invoice layout.",
            style("!").yellow()
        );
    }

    if args.validate {
        let issues = invoice.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    let output = format_invoice(&invoice, args.format, args.pretty)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        eprintln!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}
