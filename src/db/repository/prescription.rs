use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::Prescription;
use crate::pipeline::extraction::CandidateMedicine;

const PRESCRIPTION_COLUMNS: &str = "id, user_id, doctor_name, hospital_name, date, image_url,
     extracted_text, medicines, diagnosis, notes, created_at";

pub fn insert_prescription(conn: &Connection, rx: &Prescription) -> Result<(), DatabaseError> {
    let medicines_json = serde_json::to_string(&rx.medicines)?;

    conn.execute(
        "INSERT INTO prescriptions (id, user_id, doctor_name, hospital_name, date, image_url,
         extracted_text, medicines, diagnosis, notes, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        params![
            rx.id.to_string(),
            rx.user_id.to_string(),
            rx.doctor_name,
            rx.hospital_name,
            format_timestamp(&rx.date),
            rx.image_url,
            rx.extracted_text,
            medicines_json,
            rx.diagnosis,
            rx.notes,
            format_timestamp(&rx.created_at),
        ],
    )?;
    Ok(())
}

pub fn get_prescription(conn: &Connection, id: &Uuid) -> Result<Option<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions WHERE id = ?1"
    ))?;

    let result = stmt.query_row(params![id.to_string()], prescription_row_from_rusqlite);

    match result {
        Ok(row) => Ok(Some(prescription_from_row(row)?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Newest first.
pub fn list_prescriptions_for_user(
    conn: &Connection,
    user_id: &Uuid,
) -> Result<Vec<Prescription>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PRESCRIPTION_COLUMNS} FROM prescriptions
         WHERE user_id = ?1 ORDER BY created_at DESC"
    ))?;

    let rows = stmt.query_map(params![user_id.to_string()], prescription_row_from_rusqlite)?;

    let mut prescriptions = Vec::new();
    for row in rows {
        prescriptions.push(prescription_from_row(row?)?);
    }
    Ok(prescriptions)
}

struct PrescriptionRow {
    id: String,
    user_id: String,
    doctor_name: String,
    hospital_name: String,
    date: String,
    image_url: Option<String>,
    extracted_text: String,
    medicines: String,
    diagnosis: Option<String>,
    notes: Option<String>,
    created_at: String,
}

fn prescription_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<PrescriptionRow, rusqlite::Error> {
    Ok(PrescriptionRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        doctor_name: row.get(2)?,
        hospital_name: row.get(3)?,
        date: row.get(4)?,
        image_url: row.get(5)?,
        extracted_text: row.get(6)?,
        medicines: row.get(7)?,
        diagnosis: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn prescription_from_row(row: PrescriptionRow) -> Result<Prescription, DatabaseError> {
    let medicines: Vec<CandidateMedicine> = serde_json::from_str(&row.medicines)?;

    Ok(Prescription {
        id: parse_uuid("prescriptions.id", &row.id)?,
        user_id: parse_uuid("prescriptions.user_id", &row.user_id)?,
        doctor_name: row.doctor_name,
        hospital_name: row.hospital_name,
        date: parse_timestamp("prescriptions.date", &row.date)?,
        image_url: row.image_url,
        extracted_text: row.extracted_text,
        medicines,
        diagnosis: row.diagnosis,
        notes: row.notes,
        created_at: parse_timestamp("prescriptions.created_at", &row.created_at)?,
    })
}
