use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{MedicineFrequency, QuantityUnit};

/// An entry in the user's medicine list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub quantity: i64,
    pub quantity_unit: QuantityUnit,
    pub frequency: MedicineFrequency,
    pub prescription_id: Option<Uuid>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub reminder_enabled: bool,
    pub start_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
