//! Demo records written into an empty store in mock mode.

use crate::record::PatientRecord;
use crate::{LifeKeyError, LifeKeyResult};
use chrono::{TimeZone, Utc};
use lifekey_id::LifeKeyId;

/// Two sample patients for demos and responder walkthroughs.
///
/// # Errors
///
/// Returns [`LifeKeyError::InvalidId`] if a fixed demo id is not a LifeKey ID.
pub fn demo_records() -> LifeKeyResult<Vec<PatientRecord>> {
    let seeded_at = Utc
        .with_ymd_and_hms(2024, 1, 20, 10, 0, 0)
        .single()
        .ok_or_else(|| LifeKeyError::InvalidInput("invalid demo seed timestamp".into()))?;

    Ok(vec![
        PatientRecord {
            id: LifeKeyId::parse("LK-A1B2C3D4")?,
            name: "John Doe".into(),
            phone: "+1-555-0101".into(),
            age: Some(54),
            blood_group: Some("O+".into()),
            allergies: vec!["Penicillin".into(), "Peanuts".into()],
            conditions: vec!["Diabetes".into(), "Hypertension".into()],
            medications: vec!["Lisinopril 10mg".into(), "Metformin".into()],
            emergency_contact: Some("+1-555-0102".into()),
            last_updated: seeded_at,
        },
        PatientRecord {
            id: LifeKeyId::parse("LK-E5F6G7H8")?,
            name: "Anita Rao".into(),
            phone: "+91-98450-12345".into(),
            age: Some(31),
            blood_group: Some("B+".into()),
            allergies: vec!["Latex".into()],
            conditions: vec!["Asthma".into()],
            medications: vec!["Salbutamol inhaler".into()],
            emergency_contact: Some("+91-98450-67890".into()),
            last_updated: seeded_at,
        },
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_ids_are_canonical_and_distinct() {
        let records = demo_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id.as_str(), "LK-A1B2C3D4");
        assert_eq!(records[1].id.as_str(), "LK-E5F6G7H8");
        assert_eq!(records[0].last_updated.to_rfc3339(), "2024-01-20T10:00:00+00:00");
    }

    #[test]
    fn demo_records_are_identical_across_calls() {
        let first = demo_records().unwrap();
        let second = demo_records().unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|r| LifeKeyId::is_canonical(r.id.as_str())));
    }
}
