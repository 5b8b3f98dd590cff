//! Point of sale and invoice number extraction.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{INVOICE_NUMBER, INVOICE_NUMBER_STANDALONE};

/// Point of sale plus invoice number, both zero-padded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceNumber {
    /// Four digits or more.
    pub point_of_sale: String,
    /// Eight digits.
    pub number: String,
}

impl InvoiceNumber {
    pub fn new(point_of_sale: &str, number: &str) -> Self {
        Self {
            point_of_sale: format!("{:0>4}", point_of_sale),
            number: format!("{:0>8}", number),
        }
    }
}

/// Invoice number extractor.
///
/// The labeled form (`N° 7-1234`) is tried on the whole text before the bare
/// `0007-00001234` form.
pub struct InvoiceNumberExtractor;

impl InvoiceNumberExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InvoiceNumberExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for InvoiceNumberExtractor {
    type Output = ExtractionMatch<InvoiceNumber>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = INVOICE_NUMBER
            .captures(text)
            .or_else(|| INVOICE_NUMBER_STANDALONE.captures(text))?;
        let full_match = caps.get(0)?;

        Some(
            ExtractionMatch::new(InvoiceNumber::new(&caps[1], &caps[2]), full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        let mut results: Vec<Self::Output> = Vec::new();

        for caps in INVOICE_NUMBER
            .captures_iter(text)
            .chain(INVOICE_NUMBER_STANDALONE.captures_iter(text))
        {
            let Some(full_match) = caps.get(0) else {
                continue;
            };
            let value = InvoiceNumber::new(&caps[1], &caps[2]);

            // The bare pattern also fires inside labeled matches
            if results.iter().any(|r| r.value == value) {
                continue;
            }

            results.push(
                ExtractionMatch::new(value, full_match.as_str())
                    .with_position(full_match.start(), full_match.end()),
            );
        }

        results
    }
}

/// Extract the point of sale and invoice number from invoice text.
pub fn extract_invoice_number(text: &str) -> Option<InvoiceNumber> {
    InvoiceNumberExtractor::new().extract(text).map(|m| m.value)
}
