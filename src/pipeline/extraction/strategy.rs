//! Pattern extraction: four ordered regex strategies applied to every eligible line.
//!
//! All strategies run on each line and their hits are pooled in
//! line → strategy → position order. De-duplication by lowercase name happens
//! once over that pool, so strategy order only decides which fields win when
//! two strategies find the same name.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::{classify_line, is_skip_word};
use super::enrich::{complete_dosage_unit, infer_schedule};
use super::types::{CandidateList, CandidateMedicine};
use crate::pipeline_config::ExtractionConfig;

// ═══════════════════════════════════════════
// Strategies
// ═══════════════════════════════════════════

/// "Paracetamol 500mg", "Amoxicillin: 250 mg".
static DOSED_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)([A-Za-z][A-Za-z]{2,})\s*[-:]?\s*(\d+\s*(?:mg|ml|g|mcg|iu))").unwrap()
});

/// "Tab. Paracetamol 500mg", "Syrup Benadryl". Longer forms first so
/// "Tablet X" is not read as "Tab" + "let".
static FORM_PREFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:Tablet|Capsule|Syrup|Inj|Tab|Cap)\b[.\s]*([A-Za-z][A-Za-z]{2,})\s*(\d+\s*(?:mg|ml|g|mcg|iu))?",
    )
    .unwrap()
});

/// "Paracetamol500" (any case), or "Paracetamol 500" with a capitalised name
/// and a standalone number.
static CONCATENATED_DOSE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i:([A-Za-z][A-Za-z]{2,})(\d+))|\b([A-Z][A-Za-z]{2,})[ \t]+(\d+)\b").unwrap()
});

/// Text after a number that makes it something other than a dose: a duration
/// ("5 days"), `1-0-1` schedule notation, or a count ("1 tab", "3 times",
/// "10 units").
static NOT_A_DOSE_TAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(?:-\d|\s*(?:day|week|month)|\s*(?:tablets?|tabs?|capsules?|caps?|times|x|units?|drops?|puffs?)\b)",
    )
    .unwrap()
});

/// "Metformin", "Vitamin Complex". No dosage.
static BARE_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][a-zA-Z]{3,}(?:\s+[A-Z][a-zA-Z]+)?)\b").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternStrategy {
    DosedName,
    FormPrefixed,
    ConcatenatedDose,
    BareName,
}

/// Priority order; earlier strategies win ties on the same name.
pub const STRATEGY_ORDER: [PatternStrategy; 4] = [
    PatternStrategy::DosedName,
    PatternStrategy::FormPrefixed,
    PatternStrategy::ConcatenatedDose,
    PatternStrategy::BareName,
];

/// One raw hit, before name cleaning and enrichment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternMatch<'a> {
    pub name: &'a str,
    pub dosage: Option<&'a str>,
}

impl PatternStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DosedName => "dosed_name",
            Self::FormPrefixed => "form_prefixed",
            Self::ConcatenatedDose => "concatenated_dose",
            Self::BareName => "bare_name",
        }
    }

    /// All non-overlapping hits of this strategy on one line, left to right.
    pub fn find_all<'a>(&self, line: &'a str) -> Vec<PatternMatch<'a>> {
        match self {
            Self::DosedName => DOSED_NAME
                .captures_iter(line)
                .filter_map(|caps| {
                    Some(PatternMatch {
                        name: caps.get(1)?.as_str(),
                        dosage: caps.get(2).map(|m| m.as_str()),
                    })
                })
                .collect(),
            Self::FormPrefixed => FORM_PREFIXED
                .captures_iter(line)
                .filter_map(|caps| {
                    Some(PatternMatch {
                        name: caps.get(1)?.as_str(),
                        dosage: caps.get(2).map(|m| m.as_str()),
                    })
                })
                .collect(),
            Self::ConcatenatedDose => CONCATENATED_DOSE
                .captures_iter(line)
                .filter_map(|caps| {
                    let end = caps.get(0)?.end();
                    if NOT_A_DOSE_TAIL.is_match(&line[end..]) {
                        return None;
                    }
                    let name = caps.get(1).or_else(|| caps.get(3))?;
                    let dose = caps.get(2).or_else(|| caps.get(4))?;
                    Some(PatternMatch {
                        name: name.as_str(),
                        dosage: Some(dose.as_str()),
                    })
                })
                .collect(),
            Self::BareName => BARE_NAME
                .captures_iter(line)
                .filter_map(|caps| {
                    Some(PatternMatch {
                        name: caps.get(1)?.as_str(),
                        dosage: None,
                    })
                })
                .collect(),
        }
    }
}

// ═══════════════════════════════════════════
// Extraction
// ═══════════════════════════════════════════

/// Keep letters, digits and underscores; whitespace runs become one space.
pub fn clean_name(raw: &str) -> String {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || c.is_whitespace())
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Run every strategy over every eligible line and pool the hits.
pub fn extract_by_patterns(lines: &[String], config: &ExtractionConfig) -> Vec<CandidateMedicine> {
    let mut found = CandidateList::default();

    for (index, line) in lines.iter().enumerate() {
        if !classify_line(line).is_eligible(config) {
            continue;
        }

        for strategy in STRATEGY_ORDER {
            for hit in strategy.find_all(line) {
                let name = clean_name(hit.name);
                if name.is_empty() || name.chars().count() < config.min_name_len || is_skip_word(&name) {
                    continue;
                }
                if found.contains(&name) {
                    continue;
                }

                let (frequency, duration) = infer_schedule(lines, index, config.lookahead_lines);
                tracing::trace!(
                    line = index,
                    strategy = strategy.as_str(),
                    "Pattern candidate accepted"
                );
                found.push(CandidateMedicine {
                    name,
                    dosage: complete_dosage_unit(hit.dosage.unwrap_or("")),
                    frequency,
                    duration,
                });
            }
        }
    }

    found.into_vec()
}
