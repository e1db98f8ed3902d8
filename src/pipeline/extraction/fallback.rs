//! Token fallback: last-resort scan when no pattern strategy matched.
//!
//! Any capitalised token qualifies, so this stage has a high false-positive
//! rate. It runs over every line, including ones the classifier rejected.

use std::sync::LazyLock;

use regex::Regex;

use super::classify::is_skip_word;
use super::enrich::{extract_duration, extract_frequency};
use super::types::{CandidateList, CandidateMedicine, AS_PRESCRIBED};
use crate::pipeline_config::ExtractionConfig;

static DOSE_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\d+\s*(?:mg|ml|g|mcg)").unwrap());

fn starts_uppercase(token: &str) -> bool {
    token.chars().next().is_some_and(|c| c.is_ascii_uppercase())
}

pub fn extract_by_tokens(lines: &[String], config: &ExtractionConfig) -> Vec<CandidateMedicine> {
    let mut found = CandidateList::default();
    let min_len = config.fallback_min_token_len;

    for line in lines {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        for (idx, token) in tokens.iter().enumerate() {
            if token.chars().count() < min_len || !starts_uppercase(token) {
                continue;
            }

            let name: String = token
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if name.is_empty()
                || name.chars().count() < min_len
                || is_skip_word(&name)
                || found.contains(&name)
            {
                continue;
            }

            let dosage = tokens
                .get(idx + 1)
                .filter(|next| DOSE_TOKEN.is_match(next))
                .map(|next| next.to_string())
                .unwrap_or_else(|| AS_PRESCRIBED.to_string());

            found.push(CandidateMedicine {
                name,
                dosage,
                frequency: extract_frequency(line).to_string(),
                duration: extract_duration(line),
            });
        }
    }

    tracing::debug!(count = found.len(), "Token fallback finished");
    found.into_vec()
}
