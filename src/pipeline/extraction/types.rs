use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Placeholder for a dosage, frequency or duration the text does not state.
pub const AS_PRESCRIBED: &str = "As prescribed";

/// Placeholder for a doctor or hospital the text does not name.
pub const NOT_SPECIFIED: &str = "Not specified";

pub const SENTINEL_NAME: &str = "Unable to extract";
pub const SENTINEL_DOSAGE: &str = "Please enter manually - OCR could not identify medicines";

/// A provisional medicine read from prescription text, before it is stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateMedicine {
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

impl CandidateMedicine {
    /// The placeholder record returned when no strategy found anything.
    pub fn unable_to_extract() -> Self {
        Self {
            name: SENTINEL_NAME.to_string(),
            dosage: SENTINEL_DOSAGE.to_string(),
            frequency: AS_PRESCRIBED.to_string(),
            duration: AS_PRESCRIBED.to_string(),
        }
    }

    pub fn is_sentinel(&self) -> bool {
        self.name == SENTINEL_NAME
    }
}

/// True when a medicine list is exactly the extraction-failed placeholder.
pub fn is_extraction_failure(medicines: &[CandidateMedicine]) -> bool {
    matches!(medicines, [only] if only.is_sentinel())
}

/// Ordered, never-empty output of one extraction run.
///
/// Only the pipeline builds these: an empty candidate list is replaced by the
/// single `Unable to extract` record, so callers never see an empty result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ExtractionResult {
    medicines: Vec<CandidateMedicine>,
}

impl ExtractionResult {
    pub(crate) fn from_candidates(candidates: Vec<CandidateMedicine>) -> Self {
        if candidates.is_empty() {
            Self {
                medicines: vec![CandidateMedicine::unable_to_extract()],
            }
        } else {
            Self {
                medicines: candidates,
            }
        }
    }

    pub fn medicines(&self) -> &[CandidateMedicine] {
        &self.medicines
    }

    pub fn into_medicines(self) -> Vec<CandidateMedicine> {
        self.medicines
    }

    /// Extraction failed and manual entry is required.
    pub fn is_extraction_failure(&self) -> bool {
        is_extraction_failure(&self.medicines)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CandidateMedicine> {
        self.medicines.iter()
    }
}

impl<'a> IntoIterator for &'a ExtractionResult {
    type Item = &'a CandidateMedicine;
    type IntoIter = std::slice::Iter<'a, CandidateMedicine>;

    fn into_iter(self) -> Self::IntoIter {
        self.medicines.iter()
    }
}

/// Everything read from one prescription's OCR text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrescriptionExtraction {
    pub medicines: ExtractionResult,
    pub doctor_name: String,
    pub hospital_name: String,
}

/// Insertion-ordered candidates, unique by lowercase name. First one wins.
#[derive(Debug, Default)]
pub(crate) struct CandidateList {
    items: Vec<CandidateMedicine>,
    seen: HashSet<String>,
}

impl CandidateList {
    pub fn contains(&self, name: &str) -> bool {
        self.seen.contains(&name.to_lowercase())
    }

    /// Returns false when a candidate with the same name is already present.
    pub fn push(&mut self, candidate: CandidateMedicine) -> bool {
        if !self.seen.insert(candidate.name.to_lowercase()) {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn into_vec(self) -> Vec<CandidateMedicine> {
        self.items
    }
}
