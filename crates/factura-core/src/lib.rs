//! Core library for Argentine invoice text extraction.
//!
//! This crate provides:
//! - PDF text extraction (behind the `pdf` feature)
//! - Header field extraction (point of sale, invoice number, date, CAE)
//! - Line item segmentation for AFIP-style electronic invoices
//! - Totals and `es-AR` amount formatting

pub mod error;
pub mod models;
#[cfg(feature = "pdf")]
pub mod pdf;
pub mod invoice;

pub use error::{FacturaError, PdfError, Result};
pub use models::config::{ExtractionConfig, FacturaConfig, PdfConfig};
pub use models::invoice::{Invoice, InvoiceHeader, InvoiceTotals, LineItem, SourceType};
#[cfg(feature = "pdf")]
pub use pdf::{PdfExtractor, PdfProcessor};
pub use invoice::{ExtractionResult, FacturaParser, InvoiceParser};
pub use invoice::rules::{calculate_totals, format_amount, money_tokens, parse_amount};

/// Re-export the decimal type used for amounts.
pub use rust_decimal::Decimal;
