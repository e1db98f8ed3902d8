//! Field enrichment: frequency, duration and dosage unit inference.

use std::sync::LazyLock;

use regex::Regex;

use super::types::AS_PRESCRIBED;

struct FrequencyRule {
    regex: Regex,
    label: &'static str,
}

/// Checked in order, first match wins.
static FREQUENCY_RULES: LazyLock<Vec<FrequencyRule>> = LazyLock::new(|| {
    vec![
        FrequencyRule {
            regex: Regex::new(r"(?i)once.*day|1.*day|OD").unwrap(),
            label: "Once daily",
        },
        FrequencyRule {
            regex: Regex::new(r"(?i)twice.*day|2.*day|BD").unwrap(),
            label: "Twice daily",
        },
        FrequencyRule {
            regex: Regex::new(r"(?i)thrice.*day|3.*day|TDS").unwrap(),
            label: "Thrice daily",
        },
        FrequencyRule {
            regex: Regex::new(r"(?i)four.*day|4.*day|QID").unwrap(),
            label: "Four times daily",
        },
    ]
});

static DURATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(day|week|month)").unwrap());

static DOSAGE_UNIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)mg|ml|g|mcg|iu").unwrap());

pub fn extract_frequency(text: &str) -> &'static str {
    FREQUENCY_RULES
        .iter()
        .find(|rule| rule.regex.is_match(text))
        .map(|rule| rule.label)
        .unwrap_or(AS_PRESCRIBED)
}

/// "for 5 days" → "5 days", "2 Week" → "2 weeks".
pub fn extract_duration(text: &str) -> String {
    match DURATION.captures(text) {
        Some(caps) => format!("{} {}s", &caps[1], caps[2].to_lowercase()),
        None => AS_PRESCRIBED.to_string(),
    }
}

/// Empty → "As prescribed"; a bare number gets `mg`.
pub fn complete_dosage_unit(dosage: &str) -> String {
    let dosage = dosage.trim();
    if dosage.is_empty() {
        return AS_PRESCRIBED.to_string();
    }
    if DOSAGE_UNIT.is_match(dosage) {
        dosage.to_string()
    } else {
        format!("{dosage}mg")
    }
}

/// Frequency and duration for the line at `index`.
///
/// A field still at its default is looked up again on each of the next
/// `lookahead` lines, since OCR often wraps the schedule onto a continuation line.
pub fn infer_schedule(lines: &[String], index: usize, lookahead: usize) -> (String, String) {
    let Some(line) = lines.get(index) else {
        return (AS_PRESCRIBED.to_string(), AS_PRESCRIBED.to_string());
    };

    let mut frequency = extract_frequency(line);
    let mut duration = extract_duration(line);

    for next in lines.iter().skip(index + 1).take(lookahead) {
        if frequency == AS_PRESCRIBED {
            frequency = extract_frequency(next);
        }
        if duration == AS_PRESCRIBED {
            duration = extract_duration(next);
        }
    }

    (frequency.to_string(), duration)
}
