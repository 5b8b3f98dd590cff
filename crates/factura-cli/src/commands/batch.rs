//! Batch processing command for multiple invoice files.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use factura_core::format_amount;
use factura_core::invoice::{FacturaParser, InvoiceParser};
use factura_core::models::config::FacturaConfig;
use factura_core::models::invoice::Invoice;

use super::output::{format_invoice, OutputFormat};
use super::{is_supported, load_config, read_invoice_text};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    invoice: Option<Invoice>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = Arc::new(load_config(config_path)?);

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported(p))
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    eprintln!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let parser = Arc::new(FacturaParser::with_config(config.extraction.clone()));
    let permits = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let parser = Arc::clone(&parser);
        let config = Arc::clone(&config);
        let permits = Arc::clone(&permits);
        let progress = progress.clone();

        handles.push(tokio::spawn(async move {
            let _permit = permits.acquire_owned().await?;
            let result = tokio::task::spawn_blocking(move || {
                let file_start = Instant::now();
                let outcome = process_single_file(&path, &parser, &config);
                let processing_time_ms = file_start.elapsed().as_millis() as u64;

                match outcome {
                    Ok(invoice) => ProcessResult {
                        path,
                        invoice: Some(invoice),
                        error: None,
                        processing_time_ms,
                    },
                    Err(e) => ProcessResult {
                        path,
                        invoice: None,
                        error: Some(e.to_string()),
                        processing_time_ms,
                    },
                }
            })
            .await?;
            progress.inc(1);
            anyhow::Ok(result)
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;

        if let Some(error_msg) = &result.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                progress.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
    }

    progress.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.invoice.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &successful {
            if let Some(invoice) = &result.invoice {
                let output_name = result
                    .path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("invoice");
                let output_path =
                    output_dir.join(format!("{}.{}", output_name, args.format.extension()));

                fs::write(&output_path, format_invoice(invoice, args.format, true)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        eprintln!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    eprintln!();
    eprintln!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    eprintln!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        eprintln!();
        eprintln!("{}", style("Failed files:").red());
        for result in &failed {
            eprintln!(
                "  - {}: {}",
                result.path.display(),
                result.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    parser: &FacturaParser,
    config: &FacturaConfig,
) -> anyhow::Result<Invoice> {
    let (text, source_type) = read_invoice_text(path, config)?;
    if text.trim().is_empty() {
        anyhow::bail!("No text in {}", path.display());
    }

    let mut invoice = parser.parse(&text).invoice;
    invoice.metadata.source_type = source_type;
    Ok(invoice)
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "point_of_sale",
        "invoice_number",
        "issue_date",
        "cae",
        "items",
        "total_net",
        "total_vat",
        "total_gross",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");
        let processing_time_ms = result.processing_time_ms.to_string();

        if let Some(invoice) = &result.invoice {
            let header = &invoice.header;
            wtr.write_record([
                filename,
                "success",
                header.point_of_sale.as_deref().unwrap_or(""),
                header.invoice_number.as_deref().unwrap_or(""),
                header.issue_date.map(|d| d.to_string()).unwrap_or_default().as_str(),
                header.authorization_code.as_deref().unwrap_or(""),
                invoice.line_items.len().to_string().as_str(),
                format_amount(invoice.totals.total_net).as_str(),
                format_amount(invoice.totals.total_vat).as_str(),
                format_amount(invoice.totals.total_gross).as_str(),
                processing_time_ms.as_str(),
                "",
            ])?;
        } else {
            wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                "",
                processing_time_ms.as_str(),
                result.error.as_deref().unwrap_or(""),
            ])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
