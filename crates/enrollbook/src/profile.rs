//! Core profile types for enrollbook.
//!
//! This module defines the data structures for a registered person: the
//! nine text fields collected by the wizard, the stored record with its
//! store-assigned identifier, and the record paired with its decoded photo.
//!
//! # Passwords
//!
//! Passwords are stored in plain text so the on-disk schema stays a flat
//! table of text columns. This is insecure by design. The value is wrapped
//! in [`PlaintextPassword`], which redacts itself in `Debug` output and only
//! hands out the raw text through [`PlaintextPassword::expose_insecure`].

use std::fmt;
use std::str::FromStr;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Gender as offered by the registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    /// Stored as `Male`.
    Male,
    /// Stored as `Female`.
    Female,
}

impl Gender {
    /// All choices, in the order the wizard lists them.
    pub const ALL: [Gender; 2] = [Gender::Male, Gender::Female];
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Male => write!(f, "Male"),
            Self::Female => write!(f, "Female"),
        }
    }
}

impl FromStr for Gender {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Self::Male),
            "female" | "f" => Ok(Self::Female),
            _ => Err(Error::validation("Please select a gender")),
        }
    }
}

/// A password kept in clear text. Insecure by design.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlaintextPassword(String);

impl PlaintextPassword {
    /// Wrap a clear-text password.
    #[must_use]
    pub fn new(password: impl Into<String>) -> Self {
        Self(password.into())
    }

    /// The raw password text, exactly as it is written to disk.
    #[must_use]
    pub fn expose_insecure(&self) -> &str {
        &self.0
    }

    /// One `*` per character of the password.
    #[must_use]
    pub fn masked(&self) -> String {
        "*".repeat(self.0.chars().count())
    }

    /// Check if the password is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for PlaintextPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlaintextPassword(<redacted>)")
    }
}

impl From<&str> for PlaintextPassword {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PlaintextPassword {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The nine caller-supplied fields of a registration.
///
/// Any of them may be empty at this layer; presence checks belong to
/// [`crate::draft::DraftRegistration`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfile {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Clear-text password.
    pub password: PlaintextPassword,
    /// Free-text location (town, street, coordinates).
    pub location: String,
    /// State or province.
    pub state: String,
    /// Country name.
    pub country: String,
    /// Postal or PIN code.
    pub postal_code: String,
    /// Date of birth, usually formatted as `D Month, YYYY`.
    pub date_of_birth: String,
    /// Gender text, `Male` or `Female` in practice.
    pub gender: String,
}

impl NewProfile {
    /// Build a profile from the nine field values, in the order the
    /// registration form hands them over.
    #[must_use]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        password: impl Into<PlaintextPassword>,
        location: impl Into<String>,
        state: impl Into<String>,
        country: impl Into<String>,
        postal_code: impl Into<String>,
        date_of_birth: impl Into<String>,
        gender: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            password: password.into(),
            location: location.into(),
            state: state.into(),
            country: country.into(),
            postal_code: postal_code.into(),
            date_of_birth: date_of_birth.into(),
            gender: gender.into(),
        }
    }

    /// Full name as shown on the display screen.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A profile row as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRecord {
    /// Store-assigned identifier.
    pub id: i64,
    /// The stored field values.
    #[serde(flatten)]
    pub fields: NewProfile,
}

impl std::ops::Deref for ProfileRecord {
    type Target = NewProfile;

    fn deref(&self) -> &Self::Target {
        &self.fields
    }
}

/// A stored profile together with its decoded photo, if one was saved.
#[derive(Debug, Clone)]
pub struct Registration {
    /// The profile row.
    pub profile: ProfileRecord,
    /// The decoded photo.
    pub photo: Option<DynamicImage>,
}

impl Registration {
    /// The profile identifier.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.profile.id
    }

    /// Photo dimensions as `(width, height)`.
    #[must_use]
    pub fn photo_dimensions(&self) -> Option<(u32, u32)> {
        self.photo.as_ref().map(|img| (img.width(), img.height()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> NewProfile {
        NewProfile::new(
            "Ann",
            "Lee",
            "pw123",
            "Earth",
            "",
            "Wonderland",
            "000000",
            "1 January, 2000",
            "Female",
        )
    }

    #[test]
    fn test_gender_display() {
        assert_eq!(Gender::Male.to_string(), "Male");
        assert_eq!(Gender::Female.to_string(), "Female");
    }

    #[test]
    fn test_gender_from_str() {
        assert_eq!("male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" FEMALE ".parse::<Gender>().unwrap(), Gender::Female);
        assert_eq!("f".parse::<Gender>().unwrap(), Gender::Female);

        let err = "".parse::<Gender>().unwrap_err();
        assert_eq!(err.to_string(), "Please select a gender");
    }

    #[test]
    fn test_new_profile_field_order() {
        let profile = sample();
        assert_eq!(profile.first_name, "Ann");
        assert_eq!(profile.last_name, "Lee");
        assert_eq!(profile.password.expose_insecure(), "pw123");
        assert_eq!(profile.location, "Earth");
        assert_eq!(profile.state, "");
        assert_eq!(profile.country, "Wonderland");
        assert_eq!(profile.postal_code, "000000");
        assert_eq!(profile.date_of_birth, "1 January, 2000");
        assert_eq!(profile.gender, "Female");
    }

    #[test]
    fn test_full_name() {
        assert_eq!(sample().full_name(), "Ann Lee");
    }

    #[test]
    fn test_password_masked() {
        let password = PlaintextPassword::new("hunter2");
        assert_eq!(password.masked(), "*******");
        assert_eq!(PlaintextPassword::new("").masked(), "");
        // multi-byte characters mask to one star each
        assert_eq!(PlaintextPassword::new("pässwörd").masked().len(), 8);
    }

    #[test]
    fn test_password_debug_is_redacted() {
        let profile = sample();
        let debug_str = format!("{profile:?}");
        assert!(!debug_str.contains("pw123"));
        assert!(debug_str.contains("<redacted>"));
    }

    #[test]
    fn test_password_serializes_transparently() {
        let json = serde_json::to_string(&PlaintextPassword::new("pw")).unwrap();
        assert_eq!(json, "\"pw\"");
    }

    #[test]
    fn test_record_serialization_flattens_fields() {
        let record = ProfileRecord {
            id: 7,
            fields: sample(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["first_name"], "Ann");

        let back: ProfileRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_derefs_to_fields() {
        let record = ProfileRecord {
            id: 1,
            fields: sample(),
        };
        assert_eq!(record.country, "Wonderland");
    }

    #[test]
    fn test_registration_photo_dimensions() {
        let registration = Registration {
            profile: ProfileRecord {
                id: 3,
                fields: sample(),
            },
            photo: Some(DynamicImage::new_rgb8(4, 2)),
        };
        assert_eq!(registration.id(), 3);
        assert_eq!(registration.photo_dimensions(), Some((4, 2)));
    }
}
