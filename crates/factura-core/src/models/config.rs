//! Configuration structures for the extraction pipeline.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main configuration for the factura pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FacturaConfig {
    /// Invoice extraction configuration.
    pub extraction: ExtractionConfig,

    /// PDF processing configuration.
    pub pdf: PdfConfig,
}

/// Invoice extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Column header that opens the items table.
    pub table_start_marker: String,

    /// Markers that close the items table; the earliest one wins.
    pub table_end_markers: Vec<String>,

    /// Item codes whose description starts at the claim reference.
    pub claim_reference_codes: Vec<String>,

    /// Claim reference marker inside those descriptions.
    pub claim_reference_marker: String,

    /// VAT rate applied to taxed lines when computing totals.
    pub vat_rate: Decimal,

    /// Prefix for the description of items with no usable text.
    pub fallback_description_prefix: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            table_start_marker: "CANTIDAD".to_string(),
            table_end_markers: [
                "PAG:",
                "CAE:",
                "IMPORTE NETO GRAVADO",
                "IVA 21",
                "IMPORTE TOTAL",
                "SON PESOS",
                "VENCIMIENTO CAE",
            ]
            .iter()
            .map(|m| m.to_string())
            .collect(),
            claim_reference_codes: vec!["HORV".to_string()],
            claim_reference_marker: "NRO DE STRO:".to_string(),
            vat_rate: Decimal::new(21, 2),
            fallback_description_prefix: "Ítem".to_string(),
        }
    }
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Minimum text length to consider the PDF as text-based.
    pub min_text_length: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            min_text_length: 20,
        }
    }
}

impl FacturaConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ExtractionConfig::default();
        assert_eq!(config.table_start_marker, "CANTIDAD");
        assert_eq!(config.table_end_markers.len(), 7);
        assert_eq!(config.vat_rate, Decimal::new(21, 2));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: FacturaConfig =
            serde_json::from_str(r#"{"pdf": {"min_text_length": 5}}"#).unwrap();
        assert_eq!(config.pdf.min_text_length, 5);
        assert_eq!(config.extraction, ExtractionConfig::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = FacturaConfig::default();
        config.extraction.claim_reference_codes.push("HONS".to_string());
        config.save(&path).unwrap();

        let loaded = FacturaConfig::from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();

        let err = FacturaConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, crate::FacturaError::Config(_)));
    }
}
