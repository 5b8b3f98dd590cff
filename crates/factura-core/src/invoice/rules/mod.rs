//! Rule-based field extractors for Argentine invoices.

pub mod amounts;
pub mod cae;
pub mod dates;
pub mod description;
pub mod numbering;
pub mod patterns;
pub mod text;
pub mod vat;

pub use amounts::{format_amount, money_tokens, parse_amount, IntoAmount, MoneyTokenExtractor};
pub use cae::{extract_cae, CaeExtractor};
pub use dates::{extract_issue_date, IssueDateExtractor};
pub use description::{clean_description, item_description};
pub use numbering::{extract_invoice_number, InvoiceNumber, InvoiceNumberExtractor};
pub use text::{find_ignore_ascii_case, normalize_whitespace};
pub use vat::{calculate_totals, vat_applies, VatPercentExtractor};

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;

    /// Extract all occurrences of the field.
    fn extract_all(&self, text: &str) -> Vec<Self::Output>;
}

/// A value together with the text it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Position in source text.
    pub position: Option<(usize, usize)>,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            position: None,
            source: source.into(),
        }
    }

    pub fn with_position(mut self, start: usize, end: usize) -> Self {
        self.position = Some((start, end));
        self
    }
}
