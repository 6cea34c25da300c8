//! The two-step registration wizard.
//!
//! Step one asks for personal details, step two for the address, the terms
//! agreement and an optional photo. Each step feeds a [`DraftRegistration`];
//! a rejected step shows its message and asks again with the previous answers
//! pre-filled.

use std::path::PathBuf;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Password, Select};
use tracing::debug;

use crate::config::RegistrationConfig;
use crate::dob::{normalize_date_of_birth, parse_date_of_birth};
use crate::draft::{AddressDetails, DraftRegistration, PersonalDetails, WizardStep};
use crate::error::{Error, Result};
use crate::profile::{Gender, PlaintextPassword};

use super::RegisterCommand;

const MSG_PHOTO_REQUIRED: &str = "Please choose a photo";

/// Personal details taken from command-line flags.
///
/// The date of birth is normalized to the store format when present.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if `--dob` cannot be parsed.
pub fn personal_from_flags(cmd: &RegisterCommand) -> Result<PersonalDetails> {
    let date_of_birth = match cmd.dob.as_deref() {
        Some(raw) if !raw.trim().is_empty() => normalize_date_of_birth(raw)?,
        _ => String::new(),
    };

    Ok(PersonalDetails {
        first_name: cmd.first_name.clone().unwrap_or_default(),
        last_name: cmd.last_name.clone().unwrap_or_default(),
        password: PlaintextPassword::new(cmd.password.clone().unwrap_or_default()),
        date_of_birth,
        gender: cmd.gender.map(Gender::from),
    })
}

/// Address details taken from command-line flags, falling back to the
/// configured default country.
#[must_use]
pub fn address_from_flags(cmd: &RegisterCommand, config: &RegistrationConfig) -> AddressDetails {
    AddressDetails {
        location: cmd.location.clone().unwrap_or_default(),
        postal_code: cmd.postal_code.clone().unwrap_or_default(),
        state: cmd.state.clone().unwrap_or_default(),
        country: cmd
            .country
            .clone()
            .or_else(|| config.default_country.clone())
            .unwrap_or_default(),
        agreed_to_terms: cmd.agree,
        photo: cmd.photo.clone(),
    }
}

/// Reject a complete draft without a photo when one is required.
///
/// # Errors
///
/// Returns [`Error::Validation`] if a photo is required and missing.
pub fn check_photo(draft: &DraftRegistration, config: &RegistrationConfig) -> Result<()> {
    if config.require_photo && draft.photo_path().is_none() {
        return Err(Error::validation(MSG_PHOTO_REQUIRED));
    }
    Ok(())
}

/// Build a complete draft from flags alone, without prompting.
///
/// # Errors
///
/// Returns the first validation error of either step.
pub fn from_flags(cmd: &RegisterCommand, config: &RegistrationConfig) -> Result<DraftRegistration> {
    let draft = DraftRegistration::new()
        .with_personal(personal_from_flags(cmd)?)?
        .with_address(address_from_flags(cmd, config))?;
    check_photo(&draft, config)?;
    Ok(draft)
}

/// Run the wizard interactively, using flags as initial answers.
///
/// Returns `None` if the user abandons the registration at the review step.
///
/// # Errors
///
/// Returns an error if the terminal prompt fails or `--dob` is unparsable.
pub fn run_interactive(
    cmd: &RegisterCommand,
    config: &RegistrationConfig,
) -> Result<Option<DraftRegistration>> {
    let theme = ColorfulTheme::default();
    let mut personal = personal_from_flags(cmd)?;
    let mut address = address_from_flags(cmd, config);
    let mut draft = DraftRegistration::new();

    loop {
        debug!("Wizard at step {:?}", draft.step());
        match draft.step() {
            WizardStep::Personal => {
                eprintln!("Step 1 of 2: personal details");
                personal = prompt_personal(&theme, &personal)?;
                draft = retry_on_validation(draft.clone().with_personal(personal.clone()), draft)?;
            }
            WizardStep::Address => {
                eprintln!("Step 2 of 2: address");
                address = prompt_address(&theme, &address)?;
                draft = retry_on_validation(draft.clone().with_address(address.clone()), draft)?;
                if draft.step() == WizardStep::Complete {
                    if let Err(err) = check_photo(&draft, config) {
                        eprintln!("{err}");
                        draft = draft.reset_address();
                    }
                }
            }
            WizardStep::Complete => {
                let choices = ["Submit", "Edit address", "Start over", "Cancel"];
                let choice = Select::with_theme(&theme)
                    .with_prompt("Ready to submit?")
                    .items(&choices)
                    .default(0)
                    .interact()?;
                match choice {
                    0 => return Ok(Some(draft)),
                    1 => draft = draft.reset_address(),
                    2 => {
                        draft = draft.reset_personal();
                        (personal, address) = blank_answers(config);
                    }
                    _ => return Ok(None),
                }
            }
        }
    }
}

/// Answers for a fresh start: every field empty except the configured
/// default country.
fn blank_answers(config: &RegistrationConfig) -> (PersonalDetails, AddressDetails) {
    (
        PersonalDetails::default(),
        address_from_flags(&RegisterCommand::default(), config),
    )
}

/// An empty answer keeps the password entered earlier.
fn keep_or_replace_password(previous: &PlaintextPassword, entered: String) -> PlaintextPassword {
    if entered.is_empty() {
        previous.clone()
    } else {
        PlaintextPassword::new(entered)
    }
}

/// Keep `previous` and report the message if a step failed validation.
fn retry_on_validation(
    attempt: Result<DraftRegistration>,
    previous: DraftRegistration,
) -> Result<DraftRegistration> {
    match attempt {
        Ok(next) => Ok(next),
        Err(err) if err.is_validation() => {
            eprintln!("{err}");
            Ok(previous)
        }
        Err(err) => Err(err),
    }
}

fn prompt_personal(theme: &ColorfulTheme, prefill: &PersonalDetails) -> Result<PersonalDetails> {
    let first_name: String = Input::with_theme(theme)
        .with_prompt("First name")
        .with_initial_text(prefill.first_name.clone())
        .allow_empty(true)
        .interact_text()?;

    let last_name: String = Input::with_theme(theme)
        .with_prompt("Last name")
        .with_initial_text(prefill.last_name.clone())
        .allow_empty(true)
        .interact_text()?;

    let password_prompt = if prefill.password.is_empty() {
        "Password"
    } else {
        "Password (leave empty to keep the current one)"
    };
    let entered = Password::with_theme(theme)
        .with_prompt(password_prompt)
        .allow_empty_password(true)
        .interact()?;
    let password = keep_or_replace_password(&prefill.password, entered);

    let raw_dob: String = Input::with_theme(theme)
        .with_prompt("Date of birth (YYYY-MM-DD)")
        .with_initial_text(prefill.date_of_birth.clone())
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if input.trim().is_empty() {
                return Ok(());
            }
            parse_date_of_birth(input)
                .map(|_| ())
                .map_err(|err| err.to_string())
        })
        .interact_text()?;
    let date_of_birth = if raw_dob.trim().is_empty() {
        String::new()
    } else {
        normalize_date_of_birth(&raw_dob)?
    };

    let default_gender = prefill
        .gender
        .and_then(|g| Gender::ALL.iter().position(|c| *c == g))
        .unwrap_or(0);
    let gender_idx = Select::with_theme(theme)
        .with_prompt("Gender")
        .items(&Gender::ALL)
        .default(default_gender)
        .interact_opt()?;

    Ok(PersonalDetails {
        first_name,
        last_name,
        password,
        date_of_birth,
        gender: gender_idx.map(|idx| Gender::ALL[idx]),
    })
}

fn prompt_address(theme: &ColorfulTheme, prefill: &AddressDetails) -> Result<AddressDetails> {
    let ask = |prompt: &str, initial: &str| -> Result<String> {
        Ok(Input::<String>::with_theme(theme)
            .with_prompt(prompt)
            .with_initial_text(initial)
            .allow_empty(true)
            .interact_text()?)
    };

    let location = ask("Location", &prefill.location)?;
    let postal_code = ask("PIN / postal code", &prefill.postal_code)?;
    let country = ask("Country", &prefill.country)?;
    let state = ask("State", &prefill.state)?;

    let initial_photo = prefill
        .photo
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_default();
    let photo: String = Input::with_theme(theme)
        .with_prompt("Photo file (leave empty for none)")
        .with_initial_text(initial_photo)
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            let trimmed = input.trim();
            if trimmed.is_empty() || PathBuf::from(trimmed).is_file() {
                Ok(())
            } else {
                Err(format!("No such file: {trimmed}"))
            }
        })
        .interact_text()?;
    let photo = Some(photo.trim().to_string())
        .filter(|p| !p.is_empty())
        .map(PathBuf::from);

    let agreed_to_terms = Confirm::with_theme(theme)
        .with_prompt("I agree to the Terms and Conditions")
        .default(prefill.agreed_to_terms)
        .interact()?;

    Ok(AddressDetails {
        location,
        postal_code,
        state,
        country,
        agreed_to_terms,
        photo,
    })
}
