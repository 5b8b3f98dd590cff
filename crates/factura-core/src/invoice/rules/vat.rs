//! VAT detection on item rows and totals computation.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::models::invoice::{InvoiceTotals, LineItem};

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::VAT_PERCENT;

/// VAT percentage extractor ("21%", "10,5 %").
pub struct VatPercentExtractor;

impl VatPercentExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VatPercentExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for VatPercentExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        VAT_PERCENT
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let percent = Decimal::from_str(&caps[1].replace(',', ".")).ok()?;
                Some(
                    ExtractionMatch::new(percent, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Whether VAT applies to an item row.
///
/// Only an explicit zero percentage turns VAT off; rows without a
/// percentage are taxed.
pub fn vat_applies(block: &str) -> bool {
    VatPercentExtractor::new()
        .extract(block)
        .map(|m| m.value > Decimal::ZERO)
        .unwrap_or(true)
}

/// Compute invoice totals from line items at the given VAT rate.
pub fn calculate_totals(items: &[LineItem], vat_rate: Decimal) -> InvoiceTotals {
    let total_net: Decimal = items.iter().map(|i| i.net_amount).sum();
    let total_vat: Decimal = items.iter().map(|i| i.vat_amount(vat_rate)).sum();

    InvoiceTotals {
        total_net,
        total_vat,
        total_gross: total_net + total_vat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_vat_applies() {
        assert!(vat_applies("Honorarios 1.500,00 21%"));
        assert!(vat_applies("Honorarios 1.500,00 10,5 %"));
        assert!(!vat_applies("Gastos 300,00 0%"));
        assert!(!vat_applies("Gastos 300,00 0,00%"));
        assert!(vat_applies("Gastos 300,00"));
    }

    #[test]
    fn test_first_percentage_wins() {
        assert!(!vat_applies("Bonif 0% 1.000,00 21%"));
    }

    #[test]
    fn test_extract_percentages() {
        let results = VatPercentExtractor::new().extract_all("21% y 10,5%");
        let values: Vec<Decimal> = results.into_iter().map(|m| m.value).collect();
        assert_eq!(values, vec![Decimal::new(21, 0), Decimal::new(105, 1)]);
    }

    #[test]
    fn test_calculate_totals() {
        let items = vec![
            LineItem::new("Honorarios", Decimal::new(100, 0), true),
            LineItem::new("Gastos", Decimal::new(50, 0), false),
        ];

        let totals = calculate_totals(&items, Decimal::new(21, 2));

        assert_eq!(totals.total_net, Decimal::new(150, 0));
        assert_eq!(totals.total_vat, Decimal::new(21, 0));
        assert_eq!(totals.total_gross, Decimal::new(171, 0));
    }

    #[test]
    fn test_calculate_totals_empty() {
        assert_eq!(calculate_totals(&[], Decimal::new(21, 2)), InvoiceTotals::default());
    }
}
