//! Integration tests exercising the persistence facade end to end against
//! in-memory databases, plus one on-disk reopen check.

use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::NamedTempFile;
use vet_exam_manager::{Database, DbError};

/// Fresh in-memory database with the schema applied.
fn test_db() -> Database {
    let db = Database::open_in_memory().expect("open in-memory database");
    db.ensure_schema().expect("create schema");
    db
}

#[test]
fn added_patients_appear_in_listing_sorted_by_name() {
    let db = test_db();
    db.create_patient("Ziggy", "cat", "Siamese", "B. Moore").unwrap();
    db.create_patient("Arlo", "dog", "Beagle", "J. Kim").unwrap();
    db.create_patient("Milo", "rabbit", "", "T. Novak").unwrap();

    let patients = db.list_patients().unwrap();
    let names: Vec<&str> = patients.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Arlo", "Milo", "Ziggy"]);

    let arlo = &patients[0];
    assert_eq!(arlo.species, "dog");
    assert_eq!(arlo.breed, "Beagle");
    assert_eq!(arlo.owner_name, "J. Kim");
    assert!(!arlo.created_at.is_empty());
}

#[test]
fn updating_a_patient_changes_the_stored_row() {
    let db = test_db();
    let patient = db.create_patient("Luna", "cat", "", "").unwrap();

    db.update_patient(patient.id, "Luna", "cat", "Maine Coon", "R. Alvarez")
        .unwrap();

    let patients = db.list_patients().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].breed, "Maine Coon");
    assert_eq!(patients[0].owner_name, "R. Alvarez");
}

#[test]
fn updating_a_missing_patient_reports_not_found() {
    let db = test_db();
    let err = db.update_patient(42, "Ghost", "", "", "").unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "patient" }));
}

#[test]
fn deleting_a_patient_cascades_to_their_exams() {
    let db = test_db();
    let patient = db.create_patient("Bella", "dog", "Terrier", "").unwrap();
    db.create_exam(patient.id, "xray", &json!({"notes": "left hind leg"}))
        .unwrap();
    db.create_exam(patient.id, "ultrasound", &json!({"notes": "abdomen"}))
        .unwrap();
    assert_eq!(db.list_exams_for_patient(patient.id).unwrap().len(), 2);

    db.delete_patient(patient.id).unwrap();

    assert!(db.list_patients().unwrap().is_empty());
    assert!(db.list_exams_for_patient(patient.id).unwrap().is_empty());
}

#[test]
fn exam_payload_round_trips_through_storage() {
    let db = test_db();
    let patient = db.create_patient("Rocky", "dog", "", "").unwrap();
    let payload = json!({
        "notes": "no abnormalities",
        "findings": "clear",
        "measurements": {"kidney_length": 4.2, "spleen_width": 2.1}
    });

    let created = db.create_exam(patient.id, "ultrasound", &payload).unwrap();
    let fetched = db.get_exam(created.id).unwrap().expect("exam exists");

    assert_eq!(fetched.patient_id, patient.id);
    assert_eq!(fetched.exam_type, "ultrasound");
    assert_eq!(fetched.data, payload);
    assert!(!fetched.created_at.is_empty());
    assert!(!fetched.updated_at.is_empty());
}

#[test]
fn malformed_stored_payload_reads_as_empty_object() {
    let db = test_db();
    let patient = db.create_patient("Pepper", "cat", "", "").unwrap();
    let exam = db
        .create_exam(patient.id, "xray", &json!({"notes": "fine"}))
        .unwrap();

    // Corrupt the stored payload behind the facade's back.
    db.execute(
        "UPDATE exams SET exam_data = ?1 WHERE id = ?2",
        rusqlite::params!["{not valid json", exam.id],
    )
    .unwrap();

    let fetched = db.get_exam(exam.id).unwrap().expect("exam exists");
    assert_eq!(fetched.data, json!({}));
}

#[test]
fn get_exam_for_missing_id_returns_none() {
    let db = test_db();
    assert!(db.get_exam(999).unwrap().is_none());
}

#[test]
fn updating_an_exam_replaces_type_and_payload() {
    let db = test_db();
    let patient = db.create_patient("Nina", "dog", "", "").unwrap();
    let exam = db
        .create_exam(patient.id, "xray", &json!({"notes": "initial"}))
        .unwrap();

    db.update_exam(exam.id, "ultrasound", &json!({"notes": "follow-up"}))
        .unwrap();

    let fetched = db.get_exam(exam.id).unwrap().expect("exam exists");
    assert_eq!(fetched.exam_type, "ultrasound");
    assert_eq!(fetched.data, json!({"notes": "follow-up"}));
    assert!(!fetched.updated_at.is_empty());
}

#[test]
fn creating_an_exam_for_a_missing_patient_is_rejected() {
    let db = test_db();
    let err = db
        .create_exam(77, "xray", &json!({"notes": "orphan"}))
        .unwrap_err();
    assert!(matches!(err, DbError::Statement { .. }));
}

#[test]
fn saving_a_setting_twice_keeps_the_last_value() {
    let db = test_db();
    db.save_setting("clinic_name", "North Paw Clinic").unwrap();
    db.save_setting("clinic_name", "South Paw Clinic").unwrap();
    db.save_setting("theme", "light").unwrap();

    let settings = db.all_settings().unwrap();
    assert_eq!(settings.len(), 2);
    assert_eq!(
        settings.get("clinic_name").map(String::as_str),
        Some("South Paw Clinic")
    );
    assert_eq!(settings.get("theme").map(String::as_str), Some("light"));
}

#[test]
fn templates_are_listed_sorted_and_names_stay_unique() {
    let db = test_db();
    db.create_template("Thorax", "Thorax report: ...").unwrap();
    db.create_template("Abdomen", "Abdomen report: ...").unwrap();

    let err = db.create_template("Abdomen", "different body").unwrap_err();
    assert!(matches!(
        err,
        DbError::Duplicate {
            entity: "template",
            ..
        }
    ));

    let templates = db.list_templates().unwrap();
    let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["Abdomen", "Thorax"]);
}

#[test]
fn template_update_and_delete_report_missing_rows() {
    let db = test_db();
    let template = db.create_template("Dental", "Dental findings: ...").unwrap();

    db.update_template(template.id, "Dental exam", "Dental findings: ...")
        .unwrap();
    let renamed = db.list_templates().unwrap();
    assert_eq!(renamed[0].name, "Dental exam");

    db.delete_template(template.id).unwrap();
    assert!(db.list_templates().unwrap().is_empty());

    let err = db.update_template(template.id, "x", "y").unwrap_err();
    assert!(matches!(err, DbError::NotFound { entity: "template" }));
}

#[test]
fn reference_value_upsert_keeps_one_row_per_quadruple() {
    let db = test_db();
    db.upsert_reference_value("ultrasound", "dog", "kidney", "length", Some(3.0), Some(4.5), "cm")
        .unwrap();
    let updated = db
        .upsert_reference_value(
            "ultrasound",
            "dog",
            "kidney",
            "length",
            Some(3.2),
            Some(4.8),
            "cm",
        )
        .unwrap();

    let rows = db.list_reference_values("ultrasound", "dog").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, updated.id);
    assert_eq!(rows[0].min_value, Some(3.2));
    assert_eq!(rows[0].max_value, Some(4.8));
    assert_eq!(rows[0].unit, "cm");

    db.delete_reference_value(updated.id).unwrap();
    assert!(db.list_reference_values("ultrasound", "dog").unwrap().is_empty());
}

#[test]
fn ensure_schema_is_idempotent() {
    let db = Database::open_in_memory().unwrap();
    db.ensure_schema().unwrap();
    db.ensure_schema().expect("second run must not fail");

    let tables = db
        .query(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'
             ORDER BY name",
            [],
            |row| row.get::<_, String>(0),
        )
        .unwrap();
    assert_eq!(
        tables,
        vec!["exams", "patients", "reference_values", "settings", "templates"]
    );
}

#[test]
fn full_exam_lifecycle_scenario() {
    let db = test_db();

    let rex = db.create_patient("Rex", "dog", "", "").unwrap();
    let exam = db
        .create_exam(rex.id, "xray", &json!({"notes": "clear"}))
        .unwrap();

    let fetched = db.get_exam(exam.id).unwrap().expect("exam exists");
    assert_eq!(fetched.patient_id, rex.id);
    assert_eq!(fetched.exam_type, "xray");
    assert_eq!(fetched.data, json!({"notes": "clear"}));

    db.delete_patient(rex.id).unwrap();
    assert!(db.list_exams_for_patient(rex.id).unwrap().is_empty());
    assert!(db.get_exam(exam.id).unwrap().is_none());
}

#[test]
fn data_survives_reopening_the_database_file() {
    let temp_file = NamedTempFile::new().expect("create temp file");
    let path = temp_file.path();

    {
        let db = Database::open_at(path).unwrap();
        db.ensure_schema().unwrap();
        db.create_patient("Willow", "horse", "", "M. Ortiz").unwrap();
    }

    let db = Database::open_at(path).unwrap();
    db.ensure_schema().unwrap();
    let patients = db.list_patients().unwrap();
    assert_eq!(patients.len(), 1);
    assert_eq!(patients[0].name, "Willow");
}
