//! Common regex patterns for Argentine invoice extraction.
//!
//! Digit classes are spelled `[0-9]` so that only ASCII digits count.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Amounts in es-AR format: 1.234,56 or 1234,56. Boundaries are ASCII so
    // an amount glued to an accented letter still counts.
    pub static ref MONEY_TOKEN: Regex = Regex::new(
        r"(?-u:\b)[0-9]{1,3}(?:\.[0-9]{3})*(?:,[0-9]{2})(?-u:\b)|(?-u:\b)[0-9]+(?:,[0-9]{2})(?-u:\b)"
    ).unwrap();

    // Leading numeric prefix once separators are normalized
    pub static ref NUMERIC_PREFIX: Regex = Regex::new(
        r"^(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)"
    ).unwrap();

    // VAT percentage inside an item row: 21%, 10,5 %, 0%
    pub static ref VAT_PERCENT: Regex = Regex::new(
        r"([0-9]{1,2}(?:,[0-9]{1,2})?)\s*%"
    ).unwrap();

    // Item row start: line number, item code, separator
    pub static ref ITEM_START: Regex = Regex::new(
        r"([0-9]+)\s+([A-Z0-9]{1,8})\s+"
    ).unwrap();

    // Start of the following item row, including the whitespace before it
    pub static ref NEXT_ITEM: Regex = Regex::new(
        r"\s+[0-9]+\s+[A-Z0-9]{1,8}\s+"
    ).unwrap();

    // Items table column headers that leak into descriptions
    pub static ref HEADER_NOISE: [Regex; 8] = [
        Regex::new(r"(?i)\bCantidad\b").unwrap(),
        Regex::new(r"(?i)\bCódigo\b").unwrap(),
        Regex::new(r"(?i)\bDescripcion\b").unwrap(),
        Regex::new(r"(?i)\bDescripción\b").unwrap(),
        Regex::new(r"(?i)\bPrecio\s*unitario\b").unwrap(),
        Regex::new(r"(?i)\bIVA\b").unwrap(),
        Regex::new(r"(?i)\bBonif\.?\b").unwrap(),
        Regex::new(r"(?i)\bImporte\b").unwrap(),
    ];

    pub static ref TRAILING_DASH: Regex = Regex::new(
        r"[-–]\s*$"
    ).unwrap();

    // Fiscal authorization code
    pub static ref CAE: Regex = Regex::new(
        r"(?i)CAE\s*:?\s*([0-9]{14})"
    ).unwrap();

    // Issue date: Fecha: DD/MM/YYYY or DD-MM-YYYY
    pub static ref ISSUE_DATE: Regex = Regex::new(
        r"(?i)Fecha\s*:?\s*([0-9]{2})[/\-]([0-9]{2})[/\-]([0-9]{4})"
    ).unwrap();

    // Labeled number: N° 0007-00001234
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)N[º°]\s*:?\s*([0-9]{1,5})\s*-\s*([0-9]{1,8})"
    ).unwrap();

    // Bare number: 00007-00001234
    pub static ref INVOICE_NUMBER_STANDALONE: Regex = Regex::new(
        r"([0-9]{4,5})\s*-\s*([0-9]{8})"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_start_requires_uppercase_code() {
        assert!(ITEM_START.is_match("1 HORV Seguro"));
        assert!(!ITEM_START.is_match("1 horv Seguro"));
        assert!(!ITEM_START.is_match("1 ABCDEFGHI Seguro"));
    }

    #[test]
    fn test_bonif_keeps_trailing_dot() {
        assert_eq!(HEADER_NOISE[6].replace_all("Bonif. 10", ""), ". 10");
        assert_eq!(HEADER_NOISE[6].replace_all("Bonif 10", ""), " 10");
    }
}
