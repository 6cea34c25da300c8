//! Registration wizard state.
//!
//! A [`DraftRegistration`] is the value handed from one wizard step to the
//! next. Each step consumes the draft and returns an updated one, so there is
//! no shared mutable state between steps. The draft is serializable, which
//! lets a front end park it between screens.
//!
//! Validation is limited to presence checks. The messages are the ones shown
//! to the user.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::profile::{Gender, NewProfile, PlaintextPassword};

const MSG_SELECT_GENDER: &str = "Please select a gender";
const MSG_FILL_ALL: &str = "Please fill all the details";
const MSG_FILL_REQUIRED: &str = "Please fill all the required details.";
const MSG_ENTER_STATE: &str = "Please enter the state where you reside";
const MSG_SELECT_COUNTRY: &str = "Please select a country";
const MSG_AGREE_TERMS: &str = "Please agree to the Terms And Conditions to proceed";
const MSG_PERSONAL_FIRST: &str = "Please complete your personal details first";

/// Which wizard step comes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// Name, password, date of birth and gender.
    Personal,
    /// Location, postal code, state, country, terms and photo.
    Address,
    /// Both steps are filled in.
    Complete,
}

/// Input of the first wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalDetails {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Clear-text password.
    pub password: PlaintextPassword,
    /// Date of birth in store format.
    pub date_of_birth: String,
    /// Selected gender, if any.
    pub gender: Option<Gender>,
}

/// Input of the second wizard step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressDetails {
    /// Free-text location.
    pub location: String,
    /// Postal or PIN code.
    pub postal_code: String,
    /// State or province.
    pub state: String,
    /// Country name.
    pub country: String,
    /// Whether the terms and conditions box was ticked.
    pub agreed_to_terms: bool,
    /// Photo to attach to the registration.
    pub photo: Option<PathBuf>,
}

/// Registration collected so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftRegistration {
    personal: Option<PersonalDetails>,
    address: Option<AddressDetails>,
}

fn trimmed(value: &str) -> String {
    value.trim().to_string()
}

impl DraftRegistration {
    /// Start an empty draft.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The step the wizard should show next.
    #[must_use]
    pub fn step(&self) -> WizardStep {
        match (&self.personal, &self.address) {
            (None, _) => WizardStep::Personal,
            (Some(_), None) => WizardStep::Address,
            (Some(_), Some(_)) => WizardStep::Complete,
        }
    }

    /// Accepted personal details, if the first step is done.
    #[must_use]
    pub fn personal(&self) -> Option<&PersonalDetails> {
        self.personal.as_ref()
    }

    /// Accepted address details, if the second step is done.
    #[must_use]
    pub fn address(&self) -> Option<&AddressDetails> {
        self.address.as_ref()
    }

    /// Photo chosen in the second step.
    #[must_use]
    pub fn photo_path(&self) -> Option<&PathBuf> {
        self.address.as_ref().and_then(|a| a.photo.as_ref())
    }

    /// Complete the first step.
    ///
    /// Fields are trimmed. A missing gender is reported before empty text
    /// fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the gender is unset or any text
    /// field is empty after trimming.
    pub fn with_personal(mut self, details: PersonalDetails) -> Result<Self> {
        let details = PersonalDetails {
            first_name: trimmed(&details.first_name),
            last_name: trimmed(&details.last_name),
            password: PlaintextPassword::new(details.password.expose_insecure().trim()),
            date_of_birth: trimmed(&details.date_of_birth),
            gender: details.gender,
        };

        if details.gender.is_none() {
            return Err(Error::validation(MSG_SELECT_GENDER));
        }
        if details.first_name.is_empty()
            || details.last_name.is_empty()
            || details.password.is_empty()
            || details.date_of_birth.is_empty()
        {
            return Err(Error::validation(MSG_FILL_ALL));
        }

        self.personal = Some(details);
        Ok(self)
    }

    /// Complete the second step.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the first step is not done, if
    /// location, postal code, country or state is empty, or if the terms
    /// were not accepted.
    pub fn with_address(mut self, details: AddressDetails) -> Result<Self> {
        if self.personal.is_none() {
            return Err(Error::validation(MSG_PERSONAL_FIRST));
        }

        let details = AddressDetails {
            location: trimmed(&details.location),
            postal_code: trimmed(&details.postal_code),
            state: trimmed(&details.state),
            country: trimmed(&details.country),
            agreed_to_terms: details.agreed_to_terms,
            photo: details.photo,
        };

        if details.location.is_empty() || details.postal_code.is_empty() {
            return Err(Error::validation(MSG_FILL_REQUIRED));
        }
        if details.country.is_empty() {
            return Err(Error::validation(MSG_SELECT_COUNTRY));
        }
        if details.state.is_empty() {
            return Err(Error::validation(MSG_ENTER_STATE));
        }
        if !details.agreed_to_terms {
            return Err(Error::validation(MSG_AGREE_TERMS));
        }

        self.address = Some(details);
        Ok(self)
    }

    /// Clear the first step. The second step depends on it and is cleared too.
    #[must_use]
    pub fn reset_personal(mut self) -> Self {
        self.personal = None;
        self.address = None;
        self
    }

    /// Clear the second step.
    #[must_use]
    pub fn reset_address(mut self) -> Self {
        self.address = None;
        self
    }

    /// Turn a complete draft into the nine stored fields.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if either step is missing.
    pub fn to_profile(&self) -> Result<NewProfile> {
        let (Some(personal), Some(address)) = (&self.personal, &self.address) else {
            return Err(Error::validation(MSG_FILL_ALL));
        };
        let gender = personal
            .gender
            .ok_or_else(|| Error::validation(MSG_SELECT_GENDER))?;

        Ok(NewProfile {
            first_name: personal.first_name.clone(),
            last_name: personal.last_name.clone(),
            password: personal.password.clone(),
            location: address.location.clone(),
            state: address.state.clone(),
            country: address.country.clone(),
            postal_code: address.postal_code.clone(),
            date_of_birth: personal.date_of_birth.clone(),
            gender: gender.to_string(),
        })
    }
}
