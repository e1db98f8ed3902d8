use std::str::FromStr;

use rusqlite::{params, Connection};
use uuid::Uuid;

use super::{format_timestamp, parse_timestamp, parse_uuid};
use crate::db::DatabaseError;
use crate::models::enums::{MedicineFrequency, QuantityUnit};
use crate::models::Medicine;

const INSERT_MEDICINE_SQL: &str = "INSERT INTO medicines (id, user_id, name, dosage, quantity,
     quantity_unit, frequency, prescription_id, notes, is_active, reminder_enabled,
     start_date, created_at, updated_at)
     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)";

fn insert_row(conn: &Connection, med: &Medicine) -> Result<(), DatabaseError> {
    conn.execute(
        INSERT_MEDICINE_SQL,
        params![
            med.id.to_string(),
            med.user_id.to_string(),
            med.name,
            med.dosage,
            med.quantity,
            med.quantity_unit.as_str(),
            med.frequency.as_str(),
            med.prescription_id.map(|id| id.to_string()),
            med.notes,
            med.is_active as i32,
            med.reminder_enabled as i32,
            format_timestamp(&med.start_date),
            format_timestamp(&med.created_at),
            format_timestamp(&med.updated_at),
        ],
    )?;
    Ok(())
}

pub fn insert_medicine(conn: &Connection, med: &Medicine) -> Result<(), DatabaseError> {
    insert_row(conn, med)
}

/// All-or-nothing: a failing row rolls back the whole batch.
pub fn insert_medicines(conn: &Connection, meds: &[Medicine]) -> Result<usize, DatabaseError> {
    let tx = conn.unchecked_transaction()?;
    for med in meds {
        insert_row(&tx, med)?;
    }
    tx.commit()?;
    Ok(meds.len())
}

pub fn list_medicines_for_user(conn: &Connection, user_id: &Uuid) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, name, dosage, quantity, quantity_unit, frequency,
         prescription_id, notes, is_active, reminder_enabled, start_date, created_at, updated_at
         FROM medicines WHERE user_id = ?1 ORDER BY created_at ASC, rowid ASC",
    )?;

    let rows = stmt.query_map(params![user_id.to_string()], medicine_row_from_rusqlite)?;

    let mut medicines = Vec::new();
    for row in rows {
        medicines.push(medicine_from_row(row?)?);
    }
    Ok(medicines)
}

struct MedicineRow {
    id: String,
    user_id: String,
    name: String,
    dosage: Option<String>,
    quantity: i64,
    quantity_unit: String,
    frequency: String,
    prescription_id: Option<String>,
    notes: Option<String>,
    is_active: i32,
    reminder_enabled: i32,
    start_date: String,
    created_at: String,
    updated_at: String,
}

fn medicine_row_from_rusqlite(row: &rusqlite::Row<'_>) -> Result<MedicineRow, rusqlite::Error> {
    Ok(MedicineRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        dosage: row.get(3)?,
        quantity: row.get(4)?,
        quantity_unit: row.get(5)?,
        frequency: row.get(6)?,
        prescription_id: row.get(7)?,
        notes: row.get(8)?,
        is_active: row.get(9)?,
        reminder_enabled: row.get(10)?,
        start_date: row.get(11)?,
        created_at: row.get(12)?,
        updated_at: row.get(13)?,
    })
}

fn medicine_from_row(row: MedicineRow) -> Result<Medicine, DatabaseError> {
    Ok(Medicine {
        id: parse_uuid("medicines.id", &row.id)?,
        user_id: parse_uuid("medicines.user_id", &row.user_id)?,
        name: row.name,
        dosage: row.dosage,
        quantity: row.quantity,
        quantity_unit: QuantityUnit::from_str(&row.quantity_unit)?,
        frequency: MedicineFrequency::from_str(&row.frequency)?,
        prescription_id: row
            .prescription_id
            .map(|id| parse_uuid("medicines.prescription_id", &id))
            .transpose()?,
        notes: row.notes,
        is_active: row.is_active != 0,
        reminder_enabled: row.reminder_enabled != 0,
        start_date: parse_timestamp("medicines.start_date", &row.start_date)?,
        created_at: parse_timestamp("medicines.created_at", &row.created_at)?,
        updated_at: parse_timestamp("medicines.updated_at", &row.updated_at)?,
    })
}
