//! Fixed-pattern field extraction over raw document text.
//!
//! Each field is pulled independently with its own case-insensitive pattern and only the first
//! match is kept. A field with no match is simply absent.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::{Match, Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Structured values recognized in credentialing documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    LicenseNumber,
    ExpirationDate,
    DeaNumber,
    Npi,
    ProviderName,
}

impl FieldName {
    pub const ALL: [FieldName; 5] = [
        FieldName::LicenseNumber,
        FieldName::ExpirationDate,
        FieldName::DeaNumber,
        FieldName::Npi,
        FieldName::ProviderName,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FieldName::LicenseNumber => "License number",
            FieldName::ExpirationDate => "Expiration date",
            FieldName::DeaNumber => "DEA number",
            FieldName::Npi => "NPI",
            FieldName::ProviderName => "Provider name",
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            FieldName::LicenseNumber => {
                r"\b(?:license|lic\.)[ \t]*(?:number|num|no\.?|#)?[ \t]*[:#]?[ \t]*([A-Z]{0,3}-?\d[A-Z0-9-]{3,})"
            }
            FieldName::ExpirationDate => {
                r"\bexp(?:ires|iration|iry|\.)?(?:[ \t]+(?:date|on))?[ \t]*[:#]?[ \t]*(?:\r?\n[ \t]*)?(\d{1,2}/\d{1,2}/\d{4}|\d{4}-\d{2}-\d{2})"
            }
            FieldName::DeaNumber => r"\b([A-Z]{2}\d{7})\b",
            FieldName::Npi => r"\b(\d{10})\b",
            FieldName::ProviderName => {
                r"\b((?-i:[A-Z][a-z]+(?:[ \t]+[A-Z]\.)?[ \t]+[A-Z][a-z]+(?:-[A-Z][a-z]+)?)(?:,?[ \t]+(?:MD|DO|NP|PA-C|PA|RN|DDS|DMD|DPM|PhD)\b)?)"
            }
        }
    }

    fn regex(self) -> &'static Regex {
        static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
        let patterns = PATTERNS.get_or_init(|| {
            FieldName::ALL
                .iter()
                .map(|field| {
                    RegexBuilder::new(field.pattern())
                        .case_insensitive(true)
                        .build()
                        .expect("field pattern compiles")
                })
                .collect()
        });
        &patterns[self as usize]
    }

    /// Provider names never end in a field label's colon ("Expiration Date:").
    fn accepts(self, text: &str, whole: Match<'_>) -> bool {
        match self {
            FieldName::ProviderName => !text[whole.end()..]
                .trim_start_matches(|c| c == ' ' || c == '\t')
                .starts_with(':'),
            _ => true,
        }
    }
}

/// First match for every field that appeared in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractedFields(BTreeMap<FieldName, String>);

impl ExtractedFields {
    pub fn from_text(text: &str) -> Self {
        let fields = FieldName::ALL
            .iter()
            .filter_map(|field| extract_field(*field, text).map(|value| (*field, value)))
            .collect();
        Self(fields)
    }

    pub fn get(&self, field: FieldName) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Parsed expiration date. `None` when absent or not a real calendar date.
    pub fn expiration_date(&self) -> Option<NaiveDate> {
        let raw = self.get(FieldName::ExpirationDate)?;
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .or_else(|_| NaiveDate::parse_from_str(raw, "%m/%d/%Y"))
            .ok()
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiration_date()
            .map(|expires| expires < today)
            .unwrap_or(false)
    }
}

/// Capture group 1 when the pattern defines one, otherwise the whole match.
fn extract_field(field: FieldName, text: &str) -> Option<String> {
    field.regex().captures_iter(text).find_map(|captures| {
        let whole = captures.get(0)?;
        if !field.accepts(text, whole) {
            return None;
        }

        let value = captures.get(1).unwrap_or(whole);
        let trimmed = value.as_str().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "Dr. Jane Smith, MD\n\
        Medical License Number: MD-123456\n\
        Expiration Date: 12/31/2026\n\
        DEA Registration AB1234567\n\
        NPI: 1234567890";

    #[test]
    fn extracts_every_field_from_a_typical_document() {
        let fields = ExtractedFields::from_text(SAMPLE);

        assert_eq!(fields.get(FieldName::LicenseNumber), Some("MD-123456"));
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("12/31/2026"));
        assert_eq!(fields.get(FieldName::DeaNumber), Some("AB1234567"));
        assert_eq!(fields.get(FieldName::Npi), Some("1234567890"));
        assert_eq!(fields.get(FieldName::ProviderName), Some("Jane Smith, MD"));
        assert_eq!(fields.len(), 5);
    }

    #[test]
    fn empty_text_yields_no_fields() {
        assert!(ExtractedFields::from_text("").is_empty());
    }

    #[test]
    fn license_match_is_case_insensitive_and_first_wins() {
        let fields =
            ExtractedFields::from_text("license no. a-55501\nlicense number: B-99999");
        assert_eq!(fields.get(FieldName::LicenseNumber), Some("a-55501"));
    }

    #[test]
    fn accepts_iso_expiration_dates() {
        let fields = ExtractedFields::from_text("expires 2025-06-30");
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("2025-06-30"));
        assert_eq!(
            fields.expiration_date(),
            NaiveDate::from_ymd_opt(2025, 6, 30)
        );
        assert!(fields.is_expired(NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid")));
        assert!(!fields.is_expired(NaiveDate::from_ymd_opt(2025, 6, 30).expect("valid")));
    }

    #[test]
    fn impossible_dates_are_kept_but_not_parsed() {
        let fields = ExtractedFields::from_text("Expiration: 13/45/2026");
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("13/45/2026"));
        assert_eq!(fields.expiration_date(), None);
        assert!(!fields.is_expired(NaiveDate::from_ymd_opt(2030, 1, 1).expect("valid")));
    }

    #[test]
    fn accepts_expiry_label_and_value_on_next_line() {
        let fields = ExtractedFields::from_text("Expiry: 12/31/2026");
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("12/31/2026"));

        let fields = ExtractedFields::from_text("Exp Date 2027-03-01");
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("2027-03-01"));

        let fields = ExtractedFields::from_text("Expiration Date:\r\n  12/31/2026");
        assert_eq!(fields.get(FieldName::ExpirationDate), Some("12/31/2026"));
        assert_eq!(
            fields.expiration_date(),
            NaiveDate::from_ymd_opt(2026, 12, 31)
        );
        assert_eq!(fields.get(FieldName::ProviderName), None);
    }

    #[test]
    fn expiration_value_must_follow_within_one_line_break() {
        let fields = ExtractedFields::from_text("Expiration Date:\n\n12/31/2026");
        assert_eq!(fields.get(FieldName::ExpirationDate), None);
    }

    #[test]
    fn provider_name_skips_labels_followed_by_a_colon() {
        let fields = ExtractedFields::from_text(
            "Board Certification: ABIM\nExpiration Date : 2026-01-01\nJohn Doe, MD",
        );
        assert_eq!(fields.get(FieldName::ProviderName), Some("John Doe, MD"));
    }

    #[test]
    fn provider_name_still_takes_unlabelled_title_case_pairs() {
        let fields = ExtractedFields::from_text("Board Certification in Internal Medicine");
        assert_eq!(
            fields.get(FieldName::ProviderName),
            Some("Board Certification")
        );
    }

    #[test]
    fn npi_requires_exactly_ten_digits() {
        let fields = ExtractedFields::from_text("id 12345678901 and 123456789");
        assert_eq!(fields.get(FieldName::Npi), None);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let fields = ExtractedFields::from_text("NPI 1234567890");
        let json = serde_json::to_value(&fields).expect("serializes");
        assert_eq!(json, serde_json::json!({ "npi": "1234567890" }));
    }
}
