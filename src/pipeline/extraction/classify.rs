//! Line classification: which OCR lines may hold medicine entries.
//!
//! The skip-word test is a plain substring match on the lowercased line, so a
//! line mentioning "follow-up" or "dosage" (contains "age") is rejected even if
//! it also names a medicine. Rejecting too much is preferred over storing
//! administrative text as a medicine.

use std::sync::LazyLock;

use regex::Regex;

use crate::pipeline_config::{ExtractionConfig, KeywordGate};

/// Words marking a line as administrative metadata.
pub const SKIP_WORDS: &[&str] = &[
    "patient",
    "doctor",
    "hospital",
    "clinic",
    "date",
    "prescription",
    "name",
    "age",
    "address",
    "phone",
    "email",
    "diagnosis",
    "advice",
    "follow",
    "signature",
];

/// Words hinting that a line describes a medicine.
pub const MEDICINE_KEYWORDS: &[&str] = &[
    "tab",
    "cap",
    "syrup",
    "tablet",
    "capsule",
    "mg",
    "ml",
    "injection",
    "inj",
    "drops",
    "ointment",
    "cream",
];

/// Prescriber header line, e.g. "Dr. John Smith" or "DR Jane Doe".
static PRESCRIBER_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^dr(?:\.|\s)").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineClass {
    /// Contains a skip-word or is the prescriber header.
    pub skip: bool,
    /// Contains a medicine keyword. Only gates extraction under
    /// `KeywordGate::Required`.
    pub has_medicine_keyword: bool,
}

impl LineClass {
    pub fn is_eligible(&self, config: &ExtractionConfig) -> bool {
        if self.skip {
            return false;
        }
        match config.keyword_gate {
            KeywordGate::Inert => true,
            KeywordGate::Required => self.has_medicine_keyword,
        }
    }
}

pub fn classify_line(line: &str) -> LineClass {
    let lower = line.to_lowercase();

    let has_skip_word = SKIP_WORDS.iter().any(|w| lower.contains(w));
    let has_medicine_keyword = MEDICINE_KEYWORDS.iter().any(|k| lower.contains(k));

    LineClass {
        skip: has_skip_word || PRESCRIBER_HEADER.is_match(line),
        has_medicine_keyword,
    }
}

/// Whole-word check used on cleaned candidate names and fallback tokens.
pub fn is_skip_word(word: &str) -> bool {
    let lower = word.to_lowercase();
    SKIP_WORDS.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn medicine_line_is_eligible() {
        let class = classify_line("Tab. Paracetamol 500mg OD");
        assert!(!class.skip);
        assert!(class.has_medicine_keyword);
        assert!(class.is_eligible(&ExtractionConfig::default()));
    }

    #[test]
    fn skip_word_rejects_whole_line() {
        let class = classify_line("Patient: Paracetamol");
        assert!(class.skip);
        assert!(!class.is_eligible(&ExtractionConfig::default()));
    }

    #[test]
    fn skip_word_matches_inside_other_words() {
        // "dosage" contains "age"
        assert!(classify_line("Dosage 500mg").skip);
        assert!(classify_line("Follow-up dose Ibuprofen").skip);
    }

    #[test]
    fn prescriber_header_is_skipped() {
        assert!(classify_line("Dr. John Smith").skip);
        assert!(classify_line("DR Jane Doe").skip);
        assert!(!classify_line("Drops 2ml").skip);
    }

    #[test]
    fn keyword_signal_is_inert_by_default() {
        let class = classify_line("Metformin");
        assert!(!class.has_medicine_keyword);
        assert!(class.is_eligible(&ExtractionConfig::default()));
    }

    #[test]
    fn keyword_gate_applies_when_enabled() {
        let config = ExtractionConfig::strict();
        assert!(!classify_line("Metformin").is_eligible(&config));
        assert!(classify_line("Metformin 500mg").is_eligible(&config));
    }

    #[test]
    fn skip_word_is_exact_and_case_insensitive() {
        assert!(is_skip_word("Patient"));
        assert!(is_skip_word("HOSPITAL"));
        assert!(!is_skip_word("Patients"));
        assert!(!is_skip_word("Paracetamol"));
    }
}
