use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::pipeline::extraction::CandidateMedicine;

/// A stored prescription upload with everything OCR recovered from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prescription {
    pub id: Uuid,
    pub user_id: Uuid,
    pub doctor_name: String,
    pub hospital_name: String,
    pub date: DateTime<Utc>,
    pub image_url: Option<String>,
    pub extracted_text: String,
    pub medicines: Vec<CandidateMedicine>,
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
