//! Pet domain model and field-set validation.
//!
//! # Responsibility
//! - Define the canonical `Pet` record and `Gender` enumeration.
//! - Define `PetValues`, the partial field set used by insert/update.
//! - Validate field sets before they reach storage.
//!
//! # Invariants
//! - `Gender` codes are exactly {0, 1, 2}; anything else never becomes a
//!   `Gender` value.
//! - Insert validation checks name, then gender, then weight, and stops at
//!   the first violation.
//! - Update validation applies the same rules but only to present fields.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage-assigned row identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type PetId = i64;

/// Closed gender enumeration stored as an integer code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Integer code persisted in the `gender` column.
    pub fn code(self) -> i64 {
        match self {
            Self::Unknown => 0,
            Self::Male => 1,
            Self::Female => 2,
        }
    }

    /// Parses a stored or caller-supplied code. Returns `None` out of range.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Self::Unknown),
            1 => Some(Self::Male),
            2 => Some(Self::Female),
            _ => None,
        }
    }
}

/// Canonical pet record as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Storage-assigned primary key.
    pub id: PetId,
    /// Display name, non-blank.
    pub name: String,
    /// Optional breed; `None` is persisted as NULL.
    pub breed: Option<String>,
    pub gender: Gender,
    /// Non-negative weight in the registry's unit.
    pub weight: i64,
}

/// Partial column-to-value mapping for insert and update.
///
/// Every field is optionally present. `gender` and `weight` carry raw codes
/// so out-of-range caller input is representable and rejected by
/// [`PetValues::validate_for_insert`] / [`PetValues::validate_present`]
/// instead of being unconstructible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PetValues {
    pub name: Option<String>,
    /// Outer `None` = field absent; inner `None` = set breed to NULL.
    pub breed: Option<Option<String>>,
    pub gender: Option<i64>,
    pub weight: Option<i64>,
}

impl PetValues {
    /// Complete field set for a new pet.
    pub fn new_pet(
        name: impl Into<String>,
        breed: Option<String>,
        gender: Gender,
        weight: i64,
    ) -> Self {
        Self {
            name: Some(name.into()),
            breed: Some(breed),
            gender: Some(gender.code()),
            weight: Some(weight),
        }
    }

    /// Returns whether no field is present at all.
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.breed.is_none() && self.gender.is_none() && self.weight.is_none()
    }

    /// Validates a full insert field set.
    ///
    /// Name, gender and weight are required; breed is optional. Checks run
    /// in that order and the first violation is returned.
    pub fn validate_for_insert(&self) -> Result<(), PetValidationError> {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => {}
            _ => return Err(PetValidationError::MissingName),
        }

        match self.gender {
            Some(code) if Gender::from_code(code).is_some() => {}
            other => return Err(PetValidationError::InvalidGender(other)),
        }

        match self.weight {
            Some(weight) if weight >= 0 => {}
            other => return Err(PetValidationError::NegativeWeight(other)),
        }

        Ok(())
    }

    /// Validates only the fields present in this set.
    ///
    /// Absent fields are left untouched by update and are not checked here.
    pub fn validate_present(&self) -> Result<(), PetValidationError> {
        if let Some(name) = self.name.as_deref() {
            if name.trim().is_empty() {
                return Err(PetValidationError::MissingName);
            }
        }

        if let Some(code) = self.gender {
            if Gender::from_code(code).is_none() {
                return Err(PetValidationError::InvalidGender(Some(code)));
            }
        }

        if let Some(weight) = self.weight {
            if weight < 0 {
                return Err(PetValidationError::NegativeWeight(Some(weight)));
            }
        }

        Ok(())
    }
}

/// Field-level validation failure for a pet field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PetValidationError {
    /// Name absent, empty, or whitespace-only after trimming.
    MissingName,
    /// Gender absent (`None`) or outside {0, 1, 2}.
    InvalidGender(Option<i64>),
    /// Weight absent (`None`) or below zero.
    NegativeWeight(Option<i64>),
}

impl Display for PetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingName => write!(f, "pet requires a non-blank name"),
            Self::InvalidGender(Some(code)) => write!(f, "invalid gender value: {code}"),
            Self::InvalidGender(None) => write!(f, "pet requires a gender"),
            Self::NegativeWeight(Some(weight)) => {
                write!(f, "pet weight cannot be negative: {weight}")
            }
            Self::NegativeWeight(None) => write!(f, "pet requires a weight"),
        }
    }
}

impl Error for PetValidationError {}

#[cfg(test)]
mod tests {
    use super::{Gender, Pet, PetValidationError, PetValues};

    #[test]
    fn gender_codes_round_trip() {
        for gender in [Gender::Unknown, Gender::Male, Gender::Female] {
            assert_eq!(Gender::from_code(gender.code()), Some(gender));
        }
        assert_eq!(Gender::from_code(3), None);
        assert_eq!(Gender::from_code(-1), None);
    }

    #[test]
    fn insert_validation_rejects_blank_name_first() {
        let values = PetValues {
            name: Some("   ".to_string()),
            gender: Some(9),
            weight: Some(-4),
            ..PetValues::default()
        };
        assert_eq!(
            values.validate_for_insert(),
            Err(PetValidationError::MissingName)
        );
    }

    #[test]
    fn insert_validation_requires_all_of_name_gender_weight() {
        let missing_gender = PetValues {
            name: Some("Rex".to_string()),
            weight: Some(4),
            ..PetValues::default()
        };
        assert_eq!(
            missing_gender.validate_for_insert(),
            Err(PetValidationError::InvalidGender(None))
        );

        let missing_weight = PetValues {
            name: Some("Rex".to_string()),
            gender: Some(Gender::Male.code()),
            ..PetValues::default()
        };
        assert_eq!(
            missing_weight.validate_for_insert(),
            Err(PetValidationError::NegativeWeight(None))
        );
    }

    #[test]
    fn present_field_validation_skips_absent_fields() {
        let weight_only = PetValues {
            weight: Some(12),
            ..PetValues::default()
        };
        assert_eq!(weight_only.validate_present(), Ok(()));

        let bad_gender = PetValues {
            gender: Some(5),
            ..PetValues::default()
        };
        assert_eq!(
            bad_gender.validate_present(),
            Err(PetValidationError::InvalidGender(Some(5)))
        );
    }

    #[test]
    fn pet_serializes_with_snake_case_gender() {
        let pet = Pet {
            id: 1,
            name: "Tommy".to_string(),
            breed: None,
            gender: Gender::Female,
            weight: 4,
        };
        let json = serde_json::to_value(&pet).expect("pet should serialize");
        assert_eq!(json["gender"], "female");
        assert!(json["breed"].is_null());

        let back: Pet = serde_json::from_value(json).expect("pet should deserialize");
        assert_eq!(back, pet);
    }

    #[test]
    fn empty_field_set_is_detectable() {
        assert!(PetValues::default().is_empty());
        let named = PetValues {
            name: Some("Tommy".to_string()),
            ..PetValues::default()
        };
        assert!(!named.is_empty());
    }
}
