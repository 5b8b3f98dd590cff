//! Line item description cleanup.

use super::patterns::{HEADER_NOISE, MONEY_TOKEN, TRAILING_DASH};
use super::text::{find_ignore_ascii_case, normalize_whitespace};
use crate::models::config::ExtractionConfig;

/// Text of an item block before its first amount, with table header words
/// and a trailing dash removed.
pub fn clean_description(block: &str) -> String {
    let block = normalize_whitespace(block);
    let cut = match MONEY_TOKEN.find(&block) {
        Some(m) => &block[..m.start()],
        None => block.as_str(),
    };

    let mut cleaned = cut.to_string();
    for noise in HEADER_NOISE.iter() {
        cleaned = noise.replace_all(&cleaned, "").into_owned();
    }
    let cleaned = TRAILING_DASH.replace(&cleaned, "");

    normalize_whitespace(&cleaned)
}

/// Final description for an item row.
///
/// Claim-reference items keep only the text from the claim marker onwards.
/// An empty description falls back to `"{prefix} {code}"`.
pub fn item_description(code: &str, block: &str, config: &ExtractionConfig) -> String {
    let mut description = clean_description(block);

    let is_claim_item = config
        .claim_reference_codes
        .iter()
        .any(|c| c.eq_ignore_ascii_case(code));

    if is_claim_item {
        if let Some(idx) = find_ignore_ascii_case(&description, &config.claim_reference_marker) {
            description = description[idx..].to_string();
        }
    }

    let description = normalize_whitespace(&description);
    if description.is_empty() {
        format!("{} {}", config.fallback_description_prefix, code)
            .trim()
            .to_string()
    } else {
        description
    }
}
