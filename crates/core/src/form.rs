//! Raw form intake.
//!
//! Registration and profile-edit screens submit free text. [`PatientForm`] carries
//! that text as-is and [`PatientForm::validate`] turns it into a [`PatientDraft`]
//! the store accepts.

use crate::record::PatientDraft;
use crate::{LifeKeyError, LifeKeyResult};
use lifekey_types::{NonEmptyText, TextList};
use serde::Deserialize;

/// Unvalidated form input. List fields are comma-delimited text.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientForm {
    pub name: String,
    pub phone: String,
    pub age: String,
    pub blood_group: String,
    pub allergies: String,
    pub conditions: String,
    pub medications: String,
    pub emergency_contact: String,
}

impl PatientForm {
    /// Validates required fields and shapes the rest.
    ///
    /// # Errors
    ///
    /// Returns [`LifeKeyError::InvalidInput`] if:
    /// - `name` or `phone` is blank,
    /// - `age` is present but not a non-negative integer.
    pub fn validate(self) -> LifeKeyResult<PatientDraft> {
        let name = NonEmptyText::new(&self.name)
            .map_err(|_| LifeKeyError::InvalidInput("name is required".into()))?;
        let phone = NonEmptyText::new(&self.phone)
            .map_err(|_| LifeKeyError::InvalidInput("phone is required".into()))?;

        let age = match NonEmptyText::optional(&self.age) {
            Some(age) => Some(age.as_str().parse::<u32>().map_err(|_| {
                LifeKeyError::InvalidInput(format!(
                    "age must be a whole number of years, got: '{}'",
                    age
                ))
            })?),
            None => None,
        };

        Ok(PatientDraft {
            name: name.into_string(),
            phone: phone.into_string(),
            age,
            blood_group: NonEmptyText::optional(&self.blood_group).map(NonEmptyText::into_string),
            allergies: TextList::parse(&self.allergies).into_vec(),
            conditions: TextList::parse(&self.conditions).into_vec(),
            medications: TextList::parse(&self.medications).into_vec(),
            emergency_contact: NonEmptyText::optional(&self.emergency_contact)
                .map(NonEmptyText::into_string),
        })
    }
}
