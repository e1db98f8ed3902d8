//! Prescriber and facility names. Independent of medicine extraction.

use std::sync::LazyLock;

use regex::Regex;

use super::types::NOT_SPECIFIED;

static DOCTOR_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Dr\.?\s+([A-Z][a-z]+\s+[A-Z][a-z]+)").unwrap());

/// Facility keyword plus up to 50 following characters, newlines included.
static HOSPITAL_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:Hospital|Clinic|Medical Center|Healthcare)[\s\S]{0,50}").unwrap()
});

/// Two-word name following the first "Dr" title.
pub fn extract_doctor_name(text: &str) -> String {
    DOCTOR_NAME
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

pub fn extract_hospital_name(text: &str) -> String {
    HOSPITAL_NAME
        .find(text)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_else(|| NOT_SPECIFIED.to_string())
}
