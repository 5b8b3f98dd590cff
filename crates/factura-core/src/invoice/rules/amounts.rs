//! Amount parsing and scanning for es-AR formatted invoices.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::{MONEY_TOKEN, NUMERIC_PREFIX};

/// Money token extractor.
///
/// Produces every amount-looking token in left-to-right order together with
/// its parsed value.
pub struct MoneyTokenExtractor;

impl MoneyTokenExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for MoneyTokenExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for MoneyTokenExtractor {
    type Output = ExtractionMatch<Decimal>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        MONEY_TOKEN.find(text).map(|m| {
            ExtractionMatch::new(parse_amount(m.as_str()), m.as_str())
                .with_position(m.start(), m.end())
        })
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        MONEY_TOKEN
            .find_iter(text)
            .map(|m| {
                ExtractionMatch::new(parse_amount(m.as_str()), m.as_str())
                    .with_position(m.start(), m.end())
            })
            .collect()
    }
}

/// Money tokens in `text`, in order of appearance.
pub fn money_tokens(text: &str) -> Vec<&str> {
    MONEY_TOKEN.find_iter(text).map(|m| m.as_str()).collect()
}

/// Values accepted by the amount parser: text tokens or numbers that are
/// already parsed.
pub trait IntoAmount {
    fn into_amount(self) -> Decimal;
}

impl IntoAmount for &str {
    fn into_amount(self) -> Decimal {
        parse_amount_text(self)
    }
}

impl IntoAmount for &String {
    fn into_amount(self) -> Decimal {
        parse_amount_text(self)
    }
}

impl IntoAmount for String {
    fn into_amount(self) -> Decimal {
        parse_amount_text(&self)
    }
}

impl IntoAmount for Decimal {
    fn into_amount(self) -> Decimal {
        self
    }
}

impl IntoAmount for f64 {
    fn into_amount(self) -> Decimal {
        Decimal::from_f64_retain(self).unwrap_or_default()
    }
}

impl<T: IntoAmount> IntoAmount for Option<T> {
    fn into_amount(self) -> Decimal {
        self.map(IntoAmount::into_amount).unwrap_or_default()
    }
}

/// Parse an es-AR amount ("1.234,56") into a decimal.
///
/// Anything that cannot be read as a number yields zero.
pub fn parse_amount(value: impl IntoAmount) -> Decimal {
    value.into_amount()
}

fn parse_amount_text(s: &str) -> Decimal {
    let s = s.trim();
    if s.is_empty() {
        return Decimal::ZERO;
    }

    let normalized = s.replace('.', "").replacen(',', ".", 1);

    NUMERIC_PREFIX
        .find(&normalized)
        .and_then(|m| {
            let digits = m.as_str();
            // "12." is a valid prefix but not a valid Decimal
            Decimal::from_str(digits.trim_end_matches('.')).ok()
        })
        .unwrap_or_default()
}

/// Format an amount in es-AR style (1.234,56).
pub fn format_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.round_dp(2));
    let (sign, s) = match s.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", s.as_str()),
    };

    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return format!("{}{}", sign, s);
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{}{},{}", sign, formatted, decimal_part)
}
