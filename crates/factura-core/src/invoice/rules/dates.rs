//! Issue date extraction ("Fecha: 05/03/2024").

use chrono::NaiveDate;

use super::{ExtractionMatch, FieldExtractor};
use super::patterns::ISSUE_DATE;

/// Labeled issue date extractor.
///
/// Accepts `DD/MM/YYYY` and `DD-MM-YYYY` after a `Fecha` label. Matches that
/// are not calendar dates (31/02/2024) are dropped.
pub struct IssueDateExtractor;

impl IssueDateExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IssueDateExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for IssueDateExtractor {
    type Output = ExtractionMatch<NaiveDate>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let caps = ISSUE_DATE.captures(text)?;
        let full_match = caps.get(0)?;
        let date = date_from_parts(&caps[1], &caps[2], &caps[3])?;
        Some(
            ExtractionMatch::new(date, full_match.as_str())
                .with_position(full_match.start(), full_match.end()),
        )
    }

    fn extract_all(&self, text: &str) -> Vec<Self::Output> {
        ISSUE_DATE
            .captures_iter(text)
            .filter_map(|caps| {
                let full_match = caps.get(0)?;
                let date = date_from_parts(&caps[1], &caps[2], &caps[3])?;
                Some(
                    ExtractionMatch::new(date, full_match.as_str())
                        .with_position(full_match.start(), full_match.end()),
                )
            })
            .collect()
    }
}

fn date_from_parts(day: &str, month: &str, year: &str) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

/// Extract the issue date from invoice text.
pub fn extract_issue_date(text: &str) -> Option<NaiveDate> {
    IssueDateExtractor::new().extract(text).map(|m| m.value)
}
