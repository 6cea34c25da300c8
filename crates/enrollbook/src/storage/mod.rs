//! Storage layer for enrollbook.
//!
//! This module provides `SQLite`-based persistent storage for registrations:
//! one table of profile fields and one table of PNG photos, each photo tied to
//! its profile by a foreign key.
//!
//! The store keeps only the database path. Every operation opens its own
//! connection and drops it before returning, on success and on error alike.
//! Callers that may run concurrently must serialize access themselves.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use image::DynamicImage;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::image_codec;
use crate::profile::{NewProfile, PlaintextPassword, ProfileRecord, Registration};

use schema::{PHOTOS_TABLE, PROFILES_TABLE};

/// Fixed name of the database file inside the data directory.
pub const DATABASE_FILE_NAME: &str = "users.db";

const SELECT_REGISTRATION: &str = r"
SELECT p.id, p.first_name, p.last_name, p.password, p.date_of_birth, p.gender,
       p.location, p.postal_code, p.state, p.country,
       (SELECT image FROM photos WHERE profile_id = p.id ORDER BY id DESC LIMIT 1)
FROM profiles p
";

/// Append-only store of registrations.
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Path to the database file.
    path: PathBuf,
}

impl RecordStore {
    /// Open or create the store in `data_dir`, using the fixed database file
    /// name [`DATABASE_FILE_NAME`].
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema creation
    /// fails.
    pub fn open(data_dir: impl AsRef<Path>) -> Result<Self> {
        Self::open_at(data_dir.as_ref().join(DATABASE_FILE_NAME))
    }

    /// Open or create the store at an explicit database file path.
    ///
    /// Creates the parent directories and database file if they don't exist,
    /// then creates the schema (or rebuilds it if the stored schema version is
    /// stale).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema
    /// initialization fails.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Self::connect(&path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;
        migrations::initialize_schema(&conn)?;

        info!("Database ready at {}", path.display());
        Ok(Self { path })
    }

    fn connect(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path).map_err(|source| Error::DatabaseOpen {
            path: path.to_path_buf(),
            source,
        })?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Ok(conn)
    }

    fn connection(&self) -> Result<Connection> {
        Self::connect(&self.path)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the schema version recorded in the database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn schema_version(&self) -> Result<i32> {
        migrations::get_schema_version(&self.connection()?)
    }

    /// Drop every registration and recreate the tables at `new_version`.
    ///
    /// Every stored registration is lost; nothing is carried across.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DatabaseMigration`] if `new_version` is newer than
    /// this build supports. Returns an error if the rebuild fails; the
    /// database is then unchanged.
    pub fn migrate(&self, old_version: i32, new_version: i32) -> Result<()> {
        if new_version > migrations::CURRENT_VERSION {
            return Err(Error::DatabaseMigration {
                message: format!(
                    "cannot migrate to schema v{new_version}; this build supports up to v{}",
                    migrations::CURRENT_VERSION
                ),
            });
        }
        migrations::migrate(&self.connection()?, old_version, new_version)
    }

    /// Append one profile row and return its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Insert`] if the row cannot be written.
    pub fn insert_profile(&self, profile: &NewProfile) -> Result<i64> {
        let conn = self.connection()?;
        insert_profile_row(&conn, profile)
    }

    /// Append one photo row for `profile_id` and return the photo identifier.
    ///
    /// `encoded` should come from [`image_codec::encode`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Insert`] if the row cannot be written, including when
    /// no profile has the given identifier.
    pub fn insert_image(&self, profile_id: i64, encoded: &[u8]) -> Result<i64> {
        let conn = self.connection()?;
        insert_photo_row(&conn, profile_id, encoded)
    }

    /// Store a complete registration: the profile and, if given, its photo.
    ///
    /// Both rows are written in one transaction, so a failure leaves no
    /// orphaned profile or photo behind. Returns the profile identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the photo cannot be encoded or either insert fails.
    pub fn register(&self, profile: &NewProfile, photo: Option<&DynamicImage>) -> Result<i64> {
        let encoded = photo.map(image_codec::encode).transpose()?;

        let mut conn = self.connection()?;
        let tx = conn.transaction()?;
        let profile_id = insert_profile_row(&tx, profile)?;
        if let Some(bytes) = &encoded {
            insert_photo_row(&tx, profile_id, bytes)?;
        }
        tx.commit()?;

        info!(
            "Registered profile #{} ({})",
            profile_id,
            if encoded.is_some() { "with photo" } else { "no photo" }
        );
        Ok(profile_id)
    }

    /// Fetch the most recently inserted profile with its photo.
    ///
    /// "Most recent" is the row with the largest identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no profile has been stored, or
    /// [`Error::ImageDecode`] if the stored photo is corrupt.
    pub fn fetch_latest_profile(&self) -> Result<Registration> {
        let conn = self.connection()?;
        let sql = format!("{SELECT_REGISTRATION} WHERE p.id = (SELECT MAX(id) FROM profiles)");
        let row = conn.query_row(&sql, [], row_to_parts).optional()?;

        match row {
            Some(parts) => into_registration(parts),
            None => Err(Error::not_found("no registrations have been stored yet")),
        }
    }

    /// Get a registration by its profile identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails or the stored photo
    /// is corrupt.
    pub fn get(&self, id: i64) -> Result<Option<Registration>> {
        let conn = self.connection()?;
        let sql = format!("{SELECT_REGISTRATION} WHERE p.id = ?1");
        conn.query_row(&sql, [id], row_to_parts)
            .optional()?
            .map(into_registration)
            .transpose()
    }

    /// Count stored profiles.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails.
    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .connection()?
            .query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn insert_profile_row(conn: &Connection, profile: &NewProfile) -> Result<i64> {
    conn.execute(
        r"
        INSERT INTO profiles (first_name, last_name, password, date_of_birth, gender,
                              location, postal_code, state, country)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ",
        params![
            profile.first_name,
            profile.last_name,
            profile.password.expose_insecure(),
            profile.date_of_birth,
            profile.gender,
            profile.location,
            profile.postal_code,
            profile.state,
            profile.country,
        ],
    )
    .map_err(|source| Error::Insert {
        table: PROFILES_TABLE,
        source,
    })?;

    let id = conn.last_insert_rowid();
    debug!("Inserted profile with id {}", id);
    Ok(id)
}

fn insert_photo_row(conn: &Connection, profile_id: i64, encoded: &[u8]) -> Result<i64> {
    conn.execute(
        "INSERT INTO photos (profile_id, image) VALUES (?1, ?2)",
        params![profile_id, encoded],
    )
    .map_err(|source| Error::Insert {
        table: PHOTOS_TABLE,
        source,
    })?;

    let id = conn.last_insert_rowid();
    debug!(
        "Inserted photo {} ({} bytes) for profile {}",
        id,
        encoded.len(),
        profile_id
    );
    Ok(id)
}

type RowParts = (ProfileRecord, Option<Vec<u8>>);

/// Convert a database row to a profile record plus raw photo bytes.
fn row_to_parts(row: &rusqlite::Row) -> rusqlite::Result<RowParts> {
    let text = |idx: usize| -> rusqlite::Result<String> {
        Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
    };

    let record = ProfileRecord {
        id: row.get(0)?,
        fields: NewProfile {
            first_name: text(1)?,
            last_name: text(2)?,
            password: PlaintextPassword::new(text(3)?),
            date_of_birth: text(4)?,
            gender: text(5)?,
            location: text(6)?,
            postal_code: text(7)?,
            state: text(8)?,
            country: text(9)?,
        },
    };
    let photo: Option<Vec<u8>> = row.get(10)?;
    Ok((record, photo))
}

fn into_registration((profile, photo): RowParts) -> Result<Registration> {
    let photo = photo.as_deref().map(image_codec::decode).transpose()?;
    Ok(Registration { profile, photo })
}
