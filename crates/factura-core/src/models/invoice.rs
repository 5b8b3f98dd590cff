//! Invoice data models for Argentine electronic invoices (AFIP layout).

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A complete extracted invoice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Header fields found in the text.
    pub header: InvoiceHeader,

    /// Line items from the items table.
    pub line_items: Vec<LineItem>,

    /// Totals computed from the line items.
    pub totals: InvoiceTotals,

    /// Extraction metadata.
    pub metadata: ExtractionMetadata,
}

/// Invoice header. Every field is optional: absence means the text did not
/// contain it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceHeader {
    /// Point of sale (punto de venta), zero-padded to at least 4 digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub point_of_sale: Option<String>,

    /// Invoice number, zero-padded to at least 8 digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,

    /// Date the invoice was issued.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<NaiveDate>,

    /// Fiscal authorization code (CAE), 14 digits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization_code: Option<String>,
}

impl InvoiceHeader {
    /// Check if no header field was found.
    pub fn is_empty(&self) -> bool {
        self.point_of_sale.is_none()
            && self.invoice_number.is_none()
            && self.issue_date.is_none()
            && self.authorization_code.is_none()
    }

    /// Full invoice identifier as printed on the document (`0007-00001234`).
    pub fn full_number(&self) -> Option<String> {
        match (&self.point_of_sale, &self.invoice_number) {
            (Some(pos), Some(number)) => Some(format!("{}-{}", pos, number)),
            _ => None,
        }
    }
}

/// A single line item on the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Concept text, never empty after extraction.
    pub description: String,

    /// Net amount for this line, never negative.
    pub net_amount: Decimal,

    /// Whether VAT is charged on this line.
    pub vat_applies: bool,
}

impl LineItem {
    pub fn new(description: impl Into<String>, net_amount: Decimal, vat_applies: bool) -> Self {
        Self {
            description: description.into(),
            net_amount,
            vat_applies,
        }
    }

    /// VAT charged on this line at the given rate (e.g. 0.21).
    pub fn vat_amount(&self, rate: Decimal) -> Decimal {
        if self.vat_applies {
            self.net_amount * rate
        } else {
            Decimal::ZERO
        }
    }
}

impl Default for LineItem {
    fn default() -> Self {
        Self {
            description: String::new(),
            net_amount: Decimal::ZERO,
            vat_applies: true,
        }
    }
}

/// Invoice totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceTotals {
    /// Sum of the line net amounts.
    pub total_net: Decimal,

    /// Sum of VAT over the lines where it applies.
    pub total_vat: Decimal,

    /// Net plus VAT.
    pub total_gross: Decimal,
}

/// Metadata about the extraction process.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionMetadata {
    /// Source document type.
    pub source_type: SourceType,

    /// Processing time in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub processing_time_ms: Option<u64>,

    /// Fields that could not be extracted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Source document type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Plain text handed in by the caller.
    Text,
    /// Text-based PDF (native text extraction).
    TextPdf,
    /// Unknown source.
    #[default]
    Unknown,
}

impl Invoice {
    /// Validate the invoice data and return any issues found.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.header.full_number().is_none() {
            issues.push("Missing point of sale or invoice number".to_string());
        }

        if self.header.authorization_code.is_none() {
            issues.push("Missing CAE".to_string());
        }

        if self.line_items.is_empty() {
            issues.push("No line items".to_string());
        }

        if self.line_items.iter().any(|i| i.net_amount.is_zero()) {
            issues.push("Line item with zero net amount".to_string());
        }

        if self.totals.total_gross != self.totals.total_net + self.totals.total_vat {
            issues.push(format!(
                "Gross total ({}) differs from net plus VAT ({})",
                self.totals.total_gross,
                self.totals.total_net + self.totals.total_vat
            ));
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_header_full_number() {
        let header = InvoiceHeader {
            point_of_sale: Some("0007".to_string()),
            invoice_number: Some("00001234".to_string()),
            ..Default::default()
        };
        assert_eq!(header.full_number(), Some("0007-00001234".to_string()));
        assert!(!header.is_empty());
        assert!(InvoiceHeader::default().is_empty());
    }

    #[test]
    fn test_header_serialization_skips_missing_fields() {
        let header = InvoiceHeader {
            issue_date: NaiveDate::from_ymd_opt(2024, 3, 5),
            ..Default::default()
        };
        let json = serde_json::to_string(&header).unwrap();
        assert_eq!(json, r#"{"issue_date":"2024-03-05"}"#);
    }

    #[test]
    fn test_line_item_vat_amount() {
        let rate = Decimal::new(21, 2);
        let taxed = LineItem::new("Honorarios", Decimal::new(100, 0), true);
        let exempt = LineItem::new("Gastos", Decimal::new(100, 0), false);

        assert_eq!(taxed.vat_amount(rate), Decimal::new(21, 0));
        assert_eq!(exempt.vat_amount(rate), Decimal::ZERO);
    }

    #[test]
    fn test_validate_empty_invoice() {
        let issues = Invoice::default().validate();
        assert!(issues.contains(&"No line items".to_string()));
        assert!(issues.contains(&"Missing CAE".to_string()));
    }
}
