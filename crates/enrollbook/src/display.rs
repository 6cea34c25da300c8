//! Rendering of a stored registration.

use std::fmt;

use serde::Serialize;

use crate::config::DisplayConfig;
use crate::profile::Registration;

/// How a registration is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    /// Replace each password character with `*`.
    pub mask_password: bool,
    /// Add a line with the photo dimensions.
    pub show_photo_dimensions: bool,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self::from(&DisplayConfig::default())
    }
}

impl From<&DisplayConfig> for DisplayOptions {
    fn from(config: &DisplayConfig) -> Self {
        Self {
            mask_password: config.mask_password,
            show_photo_dimensions: config.show_photo_dimensions,
        }
    }
}

/// Photo summary for JSON output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PhotoSummary {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// Flat, serializable view of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationView {
    /// Profile identifier.
    pub id: i64,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Password, masked unless requested otherwise.
    pub password: String,
    /// Date of birth.
    pub date_of_birth: String,
    /// Gender.
    pub gender: String,
    /// Location.
    pub location: String,
    /// Postal code.
    pub postal_code: String,
    /// State.
    pub state: String,
    /// Country.
    pub country: String,
    /// Photo dimensions, if a photo is stored.
    pub photo: Option<PhotoSummary>,
}

impl RegistrationView {
    /// Build the view, masking the password if asked to.
    #[must_use]
    pub fn new(registration: &Registration, options: &DisplayOptions) -> Self {
        let profile = &registration.profile;
        let password = if options.mask_password {
            profile.password.masked()
        } else {
            profile.password.expose_insecure().to_string()
        };

        Self {
            id: profile.id,
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            password,
            date_of_birth: profile.date_of_birth.clone(),
            gender: profile.gender.clone(),
            location: profile.location.clone(),
            postal_code: profile.postal_code.clone(),
            state: profile.state.clone(),
            country: profile.country.clone(),
            photo: registration
                .photo_dimensions()
                .map(|(width, height)| PhotoSummary { width, height }),
        }
    }
}

/// The display card for one registration.
#[derive(Debug)]
pub struct Card<'a> {
    view: RegistrationView,
    options: &'a DisplayOptions,
}

impl<'a> Card<'a> {
    /// Prepare a card for rendering.
    #[must_use]
    pub fn new(registration: &Registration, options: &'a DisplayOptions) -> Self {
        Self {
            view: RegistrationView::new(registration, options),
            options,
        }
    }
}

impl fmt::Display for Card<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let v = &self.view;
        writeln!(f, "User #{}", v.id)?;
        writeln!(f, "Name:  {} {}", v.first_name, v.last_name)?;
        writeln!(f, "Password:  {}", v.password)?;
        writeln!(f, "Date Of Birth:  {}", v.date_of_birth)?;
        writeln!(f, "Gender:  {}", v.gender)?;
        writeln!(f, "Location:  {}", v.location)?;
        writeln!(f, "PIN Code:  {}", v.postal_code)?;
        writeln!(f, "Miscellaneous:  {}, {}", v.state, v.country)?;
        if self.options.show_photo_dimensions {
            match v.photo {
                Some(p) => writeln!(f, "Photo:  {}x{}", p.width, p.height)?,
                None => writeln!(f, "Photo:  none")?,
            }
        }
        Ok(())
    }
}

/// Render a registration as the lines of the display card.
#[must_use]
pub fn render_text(registration: &Registration, options: &DisplayOptions) -> String {
    Card::new(registration, options).to_string()
}
