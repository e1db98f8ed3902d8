//! Extraction pipeline configuration.
//!
//! Thresholds for the prescription text-extraction pipeline. The defaults
//! reproduce the behaviour prescriptions have always been processed with;
//! `strict()` additionally requires a medicine keyword on a line before the
//! pattern strategies look at it.

use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════
// Types
// ═══════════════════════════════════════════════════════════

/// Whether the medicine-keyword signal gates pattern extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordGate {
    /// Keyword presence is computed but ignored.
    Inert,
    /// Lines without a keyword (tab, cap, mg, ...) are skipped.
    Required,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Shortest accepted medicine name from the pattern strategies.
    pub min_name_len: usize,
    /// Shortest token the fallback scan treats as a name.
    pub fallback_min_token_len: usize,
    /// Lines searched after a medicine line for a missing frequency or duration.
    pub lookahead_lines: usize,
    pub keyword_gate: KeywordGate,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_name_len: 3,
            fallback_min_token_len: 4,
            lookahead_lines: 1,
            keyword_gate: KeywordGate::Inert,
        }
    }
}

// ═══════════════════════════════════════════════════════════
// Construction
// ═══════════════════════════════════════════════════════════

impl ExtractionConfig {
    pub fn strict() -> Self {
        Self {
            keyword_gate: KeywordGate::Required,
            ..Self::default()
        }
    }

    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ═══════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════
