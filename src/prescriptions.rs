//! Prescription service: upload → OCR → extraction → storage, and copying
//! extracted medicines into the user's medicine list.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::db::{self, DatabaseError};
use crate::models::enums::{MedicineFrequency, QuantityUnit};
use crate::models::{Medicine, Prescription};
use crate::pipeline::extraction::{
    extract_prescription, is_extraction_failure, ExtractionError, OcrEngine,
};
use crate::pipeline::import::{
    detect_upload_format, remove_staged, stage_upload, ImportError, StagedUpload,
};
use crate::pipeline_config::ExtractionConfig;

#[derive(Error, Debug)]
pub enum PrescriptionError {
    #[error("Prescription not found: {0}")]
    NotFound(Uuid),

    #[error("Not authorized to access prescription {0}")]
    NotAuthorized(Uuid),

    #[error("Cannot add medicines - OCR extraction failed. Please add manually.")]
    ExtractionFailed,

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("OCR error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Upload rejected: {0}")]
    Import(#[from] ImportError),
}

// ═══════════════════════════════════════════
// Upload
// ═══════════════════════════════════════════

/// One uploaded prescription file plus the optional form fields sent with it.
#[derive(Debug, Clone, Default)]
pub struct PrescriptionUpload<'a> {
    pub file_name: &'a str,
    pub bytes: &'a [u8],
    pub diagnosis: Option<String>,
    pub notes: Option<String>,
}

/// Upload response: the stored record and what OCR produced for it.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessedPrescription {
    pub prescription: Prescription,
    pub extracted_text: String,
    pub ocr_confidence: f32,
}

/// Validate, store and OCR an upload, then persist the extraction.
///
/// A failed extraction is still stored (with the sentinel medicine) so the
/// user can see the image and add medicines by hand. OCR and storage errors
/// remove the staged file.
pub fn process_upload(
    conn: &Connection,
    engine: &dyn OcrEngine,
    user_id: &Uuid,
    uploads_dir: &Path,
    upload: PrescriptionUpload<'_>,
    config: &ExtractionConfig,
    now: DateTime<Utc>,
) -> Result<ProcessedPrescription, PrescriptionError> {
    let format = detect_upload_format(upload.file_name, upload.bytes)?;
    let staged = stage_upload(uploads_dir, upload.bytes, format, now)?;

    let ocr = match engine.recognize(upload.bytes) {
        Ok(page) => page,
        Err(e) => {
            tracing::error!(user_id = %user_id, error = %e, "OCR failed on prescription upload");
            discard_staged(&staged);
            return Err(e.into());
        }
    };
    tracing::info!(
        text_len = ocr.text.len(),
        confidence = ocr.confidence,
        "OCR completed"
    );

    let extraction = extract_prescription(&ocr.text, config);

    let prescription = Prescription {
        id: Uuid::new_v4(),
        user_id: *user_id,
        doctor_name: extraction.doctor_name,
        hospital_name: extraction.hospital_name,
        date: now,
        image_url: Some(staged.image_url.clone()),
        extracted_text: ocr.text.clone(),
        medicines: extraction.medicines.into_medicines(),
        diagnosis: upload.diagnosis,
        notes: upload.notes,
        created_at: now,
    };

    if let Err(e) = db::insert_prescription(conn, &prescription) {
        discard_staged(&staged);
        return Err(e.into());
    }

    tracing::info!(
        prescription_id = %prescription.id,
        medicines = prescription.medicines.len(),
        failed = is_extraction_failure(&prescription.medicines),
        "Prescription stored"
    );

    Ok(ProcessedPrescription {
        prescription,
        extracted_text: ocr.text,
        ocr_confidence: ocr.confidence,
    })
}

fn discard_staged(staged: &StagedUpload) {
    if let Err(e) = remove_staged(staged) {
        tracing::warn!(path = %staged.path.display(), error = %e, "Could not remove staged upload");
    }
}

// ═══════════════════════════════════════════
// Queries
// ═══════════════════════════════════════════

pub fn get_prescription_for_user(
    conn: &Connection,
    user_id: &Uuid,
    prescription_id: &Uuid,
) -> Result<Prescription, PrescriptionError> {
    let prescription = db::get_prescription(conn, prescription_id)?
        .ok_or(PrescriptionError::NotFound(*prescription_id))?;

    if prescription.user_id != *user_id {
        tracing::warn!(
            prescription_id = %prescription_id,
            "Prescription requested by a user who does not own it"
        );
        return Err(PrescriptionError::NotAuthorized(*prescription_id));
    }
    Ok(prescription)
}

/// The user's prescriptions, newest first.
pub fn list_prescriptions(conn: &Connection, user_id: &Uuid) -> Result<Vec<Prescription>, PrescriptionError> {
    Ok(db::list_prescriptions_for_user(conn, user_id)?)
}

// ═══════════════════════════════════════════
// Bulk add to medicine list
// ═══════════════════════════════════════════

/// Copy every extracted medicine into the user's list in one transaction.
/// All rows share `now` as start, creation and update time.
pub fn add_medicines_from_prescription(
    conn: &Connection,
    user_id: &Uuid,
    prescription_id: &Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<Medicine>, PrescriptionError> {
    let prescription = get_prescription_for_user(conn, user_id, prescription_id)?;

    if is_extraction_failure(&prescription.medicines) {
        return Err(PrescriptionError::ExtractionFailed);
    }

    let notes = format!(
        "Added from prescription on {} at {}",
        now.format("%Y-%m-%d"),
        now.format("%H:%M:%S")
    );

    let medicines: Vec<Medicine> = prescription
        .medicines
        .iter()
        .map(|candidate| Medicine {
            id: Uuid::new_v4(),
            user_id: *user_id,
            name: candidate.name.clone(),
            dosage: Some(candidate.dosage.clone()),
            quantity: 0,
            quantity_unit: QuantityUnit::Tablets,
            frequency: parse_frequency(&candidate.frequency),
            prescription_id: Some(prescription.id),
            notes: Some(notes.clone()),
            is_active: true,
            reminder_enabled: true,
            start_date: now,
            created_at: now,
            updated_at: now,
        })
        .collect();

    let inserted = db::insert_medicines(conn, &medicines)?;
    tracing::info!(
        prescription_id = %prescription.id,
        count = inserted,
        "Medicines added from prescription"
    );

    Ok(medicines)
}

/// Map an extracted frequency phrase onto the medicine list's schedule enum.
pub fn parse_frequency(text: &str) -> MedicineFrequency {
    let lower = text.to_lowercase();
    if lower.contains("once") {
        MedicineFrequency::OnceDaily
    } else if lower.contains("twice") {
        MedicineFrequency::TwiceDaily
    } else if lower.contains("thrice") || lower.contains("three") {
        MedicineFrequency::ThriceDaily
    } else {
        MedicineFrequency::AsNeeded
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{list_medicines_for_user, open_memory_database};
    use crate::pipeline::extraction::{MockOcrEngine, OcrPageResult, SENTINEL_NAME};
    use chrono::TimeZone;

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const SAMPLE: &str = "Dr. John Smith\n\
                          City Hospital\n\
                          Tab. Paracetamol 500mg OD for 5 days\n\
                          Cap. Amoxicillin 250mg BD for 7 days";

    struct FailingOcr;

    impl OcrEngine for FailingOcr {
        fn recognize(&self, _image: &[u8]) -> Result<OcrPageResult, ExtractionError> {
            Err(ExtractionError::OcrProcessing("engine crashed".into()))
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 3, 14, 5, 9).unwrap()
    }

    fn upload(bytes: &[u8]) -> PrescriptionUpload<'_> {
        PrescriptionUpload {
            file_name: "scan.png",
            bytes,
            ..Default::default()
        }
    }

    fn process(conn: &Connection, dir: &Path, user: &Uuid, text: &str) -> Prescription {
        let engine = MockOcrEngine::new(text, 0.9);
        process_upload(
            conn,
            &engine,
            user,
            dir,
            upload(PNG),
            &ExtractionConfig::default(),
            fixed_now(),
        )
        .unwrap()
        .prescription
    }

    fn staged_files(dir: &Path) -> usize {
        std::fs::read_dir(dir).map(|d| d.count()).unwrap_or(0)
    }

    #[test]
    fn upload_is_extracted_and_stored() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let user = Uuid::new_v4();

        let stored = process(&conn, dir.path(), &user, SAMPLE);

        assert_eq!(stored.doctor_name, "John Smith");
        assert_eq!(stored.medicines.len(), 2);
        assert!(stored
            .image_url
            .as_deref()
            .unwrap()
            .starts_with("/uploads/prescriptions/prescription-"));
        assert_eq!(staged_files(dir.path()), 1);

        let loaded = get_prescription_for_user(&conn, &user, &stored.id).unwrap();
        assert_eq!(loaded, stored);
    }

    #[test]
    fn unreadable_text_stores_sentinel() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let stored = process(&conn, dir.path(), &Uuid::new_v4(), "");
        assert_eq!(stored.medicines.len(), 1);
        assert_eq!(stored.medicines[0].name, SENTINEL_NAME);
    }

    #[test]
    fn form_fields_are_kept() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let engine = MockOcrEngine::new(SAMPLE, 0.8);
        let result = process_upload(
            &conn,
            &engine,
            &Uuid::new_v4(),
            dir.path(),
            PrescriptionUpload {
                file_name: "scan.png",
                bytes: PNG,
                diagnosis: Some("Viral fever".into()),
                notes: Some("Follow up in a week".into()),
            },
            &ExtractionConfig::default(),
            fixed_now(),
        )
        .unwrap();
        assert_eq!(result.prescription.diagnosis.as_deref(), Some("Viral fever"));
        assert_eq!(result.prescription.notes.as_deref(), Some("Follow up in a week"));
        assert_eq!(result.extracted_text, SAMPLE);
    }

    #[test]
    fn invalid_upload_is_rejected_before_storage() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let engine = MockOcrEngine::new(SAMPLE, 0.9);
        let user = Uuid::new_v4();

        let err = process_upload(
            &conn,
            &engine,
            &user,
            dir.path(),
            PrescriptionUpload {
                file_name: "notes.txt",
                bytes: b"plain text",
                ..Default::default()
            },
            &ExtractionConfig::default(),
            fixed_now(),
        )
        .unwrap_err();

        assert!(matches!(err, PrescriptionError::Import(ImportError::UnsupportedFormat(_))));
        assert_eq!(staged_files(dir.path()), 0);
        assert!(list_prescriptions(&conn, &user).unwrap().is_empty());
    }

    #[test]
    fn ocr_failure_removes_staged_file() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let user = Uuid::new_v4();

        let err = process_upload(
            &conn,
            &FailingOcr,
            &user,
            dir.path(),
            upload(PNG),
            &ExtractionConfig::default(),
            fixed_now(),
        )
        .unwrap_err();

        assert!(matches!(err, PrescriptionError::Extraction(_)));
        assert_eq!(staged_files(dir.path()), 0);
        assert!(list_prescriptions(&conn, &user).unwrap().is_empty());
    }

    #[test]
    fn ownership_is_enforced() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let owner = Uuid::new_v4();
        let stored = process(&conn, dir.path(), &owner, SAMPLE);

        let err = get_prescription_for_user(&conn, &Uuid::new_v4(), &stored.id).unwrap_err();
        assert!(matches!(err, PrescriptionError::NotAuthorized(_)));

        let err = get_prescription_for_user(&conn, &owner, &Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, PrescriptionError::NotFound(_)));
    }

    #[test]
    fn bulk_add_copies_medicines_with_shared_timestamp() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let user = Uuid::new_v4();
        let stored = process(&conn, dir.path(), &user, SAMPLE);

        let now = fixed_now();
        let added = add_medicines_from_prescription(&conn, &user, &stored.id, now).unwrap();

        assert_eq!(added.len(), 2);
        assert_eq!(added[0].name, "Paracetamol");
        assert_eq!(added[0].dosage.as_deref(), Some("500mg"));
        assert_eq!(added[0].frequency, MedicineFrequency::OnceDaily);
        assert_eq!(added[1].frequency, MedicineFrequency::TwiceDaily);
        for med in &added {
            assert_eq!(med.created_at, now);
            assert_eq!(med.updated_at, now);
            assert_eq!(med.prescription_id, Some(stored.id));
            assert_eq!(
                med.notes.as_deref(),
                Some("Added from prescription on 2026-02-03 at 14:05:09")
            );
        }

        let listed = list_medicines_for_user(&conn, &user).unwrap();
        assert_eq!(listed, added);
    }

    #[test]
    fn bulk_add_refuses_failed_extraction() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let user = Uuid::new_v4();
        let stored = process(&conn, dir.path(), &user, "");

        let err = add_medicines_from_prescription(&conn, &user, &stored.id, fixed_now()).unwrap_err();
        assert!(matches!(err, PrescriptionError::ExtractionFailed));
        assert!(list_medicines_for_user(&conn, &user).unwrap().is_empty());
    }

    #[test]
    fn bulk_add_requires_ownership() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let stored = process(&conn, dir.path(), &Uuid::new_v4(), SAMPLE);

        let intruder = Uuid::new_v4();
        let err = add_medicines_from_prescription(&conn, &intruder, &stored.id, fixed_now()).unwrap_err();
        assert!(matches!(err, PrescriptionError::NotAuthorized(_)));
        assert!(list_medicines_for_user(&conn, &intruder).unwrap().is_empty());
    }

    #[test]
    fn list_is_newest_first() {
        let conn = open_memory_database().unwrap();
        let dir = tempfile::tempdir().unwrap();
        let user = Uuid::new_v4();
        let engine = MockOcrEngine::new(SAMPLE, 0.9);
        let mut ids = Vec::new();
        for hour in [8, 12] {
            let at = Utc.with_ymd_and_hms(2026, 2, 3, hour, 0, 0).unwrap();
            let result = process_upload(
                &conn,
                &engine,
                &user,
                dir.path(),
                upload(PNG),
                &ExtractionConfig::default(),
                at,
            )
            .unwrap();
            ids.push(result.prescription.id);
        }

        let listed: Vec<Uuid> = list_prescriptions(&conn, &user).unwrap().iter().map(|p| p.id).collect();
        assert_eq!(listed, vec![ids[1], ids[0]]);
    }

    #[test]
    fn frequency_mapping() {
        assert_eq!(parse_frequency("Once daily"), MedicineFrequency::OnceDaily);
        assert_eq!(parse_frequency("Twice daily"), MedicineFrequency::TwiceDaily);
        assert_eq!(parse_frequency("Thrice daily"), MedicineFrequency::ThriceDaily);
        assert_eq!(parse_frequency("Three times a day"), MedicineFrequency::ThriceDaily);
        assert_eq!(parse_frequency("As prescribed"), MedicineFrequency::AsNeeded);
        assert_eq!(parse_frequency("Every 4 hours"), MedicineFrequency::AsNeeded);
    }
}
