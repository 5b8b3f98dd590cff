//! CAE (Código de Autorización Electrónico) extraction.

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::CAE;

/// CAE field extractor.
pub struct CaeExtractor;

impl CaeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CaeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CaeExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        self.extract_all(text).into_iter().next()
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        CAE.captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                Some(
                    ExtractionMatch::new(caps[1].to_string(), full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

/// Extract the first 14-digit CAE from invoice text.
pub fn extract_cae(text: &str) -> Option<String> {
    CaeExtractor::new().extract(text).map(|m| m.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_cae() {
        assert_eq!(
            extract_cae("CAE: 12345678901234 Fecha de Vto."),
            Some("12345678901234".to_string())
        );
        assert_eq!(
            extract_cae("cae 74123456789012"),
            Some("74123456789012".to_string())
        );
    }

    #[test]
    fn test_cae_too_short() {
        assert_eq!(extract_cae("CAE: 1234567890"), None);
    }

    #[test]
    fn test_cae_takes_first_fourteen_digits() {
        assert_eq!(
            extract_cae("CAE N° 123456789012345"),
            None
        );
        assert_eq!(
            extract_cae("CAE:123456789012345"),
            Some("12345678901234".to_string())
        );
    }
}
