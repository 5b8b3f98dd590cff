//! CLI subcommands and the helpers they share.

pub mod batch;
pub mod config;
pub mod output;
pub mod process;

use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::debug;

use factura_core::models::config::FacturaConfig;
use factura_core::models::invoice::SourceType;
use factura_core::pdf::{PdfExtractor, PdfProcessor};

/// Default location of the configuration file.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("factura")
        .join("config.json")
}

/// Load the configuration from `path`, falling back to the default file and
/// then to built-in defaults.
pub fn load_config(path: Option<&str>) -> anyhow::Result<FacturaConfig> {
    if let Some(path) = path {
        return Ok(FacturaConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(FacturaConfig::from_file(&default_path)?)
    } else {
        Ok(FacturaConfig::default())
    }
}

/// Whether a file extension is something the CLI can read.
pub fn is_supported(path: &Path) -> bool {
    matches!(extension(path).as_str(), "pdf" | "txt" | "text")
}

fn extension(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Read invoice text from a PDF, a text file, or stdin (`-`).
pub fn read_invoice_text(
    path: &Path,
    config: &FacturaConfig,
) -> anyhow::Result<(String, SourceType)> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok((text, SourceType::Text));
    }

    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }

    match extension(path).as_str() {
        "pdf" => {
            let data = std::fs::read(path)?;
            let extractor = PdfExtractor::from_bytes(&data)?;
            debug!("PDF has {} pages", extractor.page_count());

            let text = extractor.extract_text()?;
            if text.trim().len() < config.pdf.min_text_length {
                anyhow::bail!(
                    "No usable text in {} (scanned PDFs are not supported)",
                    path.display()
                );
            }
            Ok((text, SourceType::TextPdf))
        }
        "txt" | "text" => Ok((std::fs::read_to_string(path)?, SourceType::Text)),
        other => anyhow::bail!("Unsupported file format: {}", other),
    }
}
