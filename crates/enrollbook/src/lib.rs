//! `enrollbook` - A two-step registration wizard backed by a local record store
//!
//! This library provides the pieces behind the `enrollbook` binary: the draft
//! that the wizard fills in, the `SQLite` store that keeps every registration
//! and its photo, and the rendering of a stored registration.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod cli;
pub mod config;
pub mod display;
pub mod dob;
pub mod draft;
pub mod error;
pub mod image_codec;
pub mod logging;
pub mod profile;
pub mod storage;

pub use config::Config;
pub use display::{render_text, DisplayOptions, RegistrationView};
pub use draft::{DraftRegistration, WizardStep};
pub use error::{Error, Result};
pub use logging::init_logging;
pub use profile::{Gender, NewProfile, PlaintextPassword, ProfileRecord, Registration};
pub use storage::RecordStore;
