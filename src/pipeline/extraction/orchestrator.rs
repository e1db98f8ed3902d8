//! Prescription text extraction: normalize → patterns → token fallback → sentinel.
//!
//! Pure and synchronous. Every call builds fresh data from its input, so it can
//! run on any thread without coordination.

use super::fallback::extract_by_tokens;
use super::metadata::{extract_doctor_name, extract_hospital_name};
use super::normalize::normalize_lines;
use super::strategy::extract_by_patterns;
use super::types::{ExtractionResult, PrescriptionExtraction};
use crate::pipeline_config::ExtractionConfig;

/// Medicines in `raw` with the default thresholds. Never empty.
pub fn extract_medicines(raw: &str) -> ExtractionResult {
    extract_medicines_with(raw, &ExtractionConfig::default())
}

pub fn extract_medicines_with(raw: &str, config: &ExtractionConfig) -> ExtractionResult {
    let lines = normalize_lines(raw);

    let mut candidates = extract_by_patterns(&lines, config);
    if candidates.is_empty() {
        tracing::debug!(
            lines = lines.len(),
            "No pattern matched, falling back to token scan"
        );
        candidates = extract_by_tokens(&lines, config);
    }

    if candidates.is_empty() {
        tracing::warn!(
            text_len = raw.len(),
            "OCR text yielded no medicines, manual entry required"
        );
    } else {
        tracing::info!(count = candidates.len(), "Medicines extracted from OCR text");
    }

    ExtractionResult::from_candidates(candidates)
}

/// Medicines, doctor and hospital from one prescription's OCR text.
pub fn extract_prescription(raw: &str, config: &ExtractionConfig) -> PrescriptionExtraction {
    PrescriptionExtraction {
        medicines: extract_medicines_with(raw, config),
        doctor_name: extract_doctor_name(raw),
        hospital_name: extract_hospital_name(raw),
    }
}
