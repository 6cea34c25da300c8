//! `SQLite` schema definitions for enrollbook.
//!
//! This module contains the SQL statements for creating and dropping
//! the database schema.

/// Name of the profile table.
pub const PROFILES_TABLE: &str = "profiles";

/// Name of the photo table.
pub const PHOTOS_TABLE: &str = "photos";

/// SQL statement to create the profiles table.
///
/// Every field is plain text, including the password.
pub const CREATE_PROFILES_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS profiles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT,
    last_name TEXT,
    password TEXT,
    date_of_birth TEXT,
    gender TEXT,
    location TEXT,
    postal_code TEXT,
    state TEXT,
    country TEXT
)
";

/// SQL statement to create the photos table.
///
/// Each photo belongs to exactly one profile and goes away with it.
pub const CREATE_PHOTOS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS photos (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    profile_id INTEGER NOT NULL REFERENCES profiles(id) ON DELETE CASCADE,
    image BLOB NOT NULL
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[
    CREATE_PROFILES_TABLE,
    CREATE_PHOTOS_TABLE,
    CREATE_METADATA_TABLE,
];

/// Statements that discard every registration. Photos go first since they
/// reference profiles.
pub const DROP_STATEMENTS: &[&str] = &[
    "DROP TABLE IF EXISTS photos",
    "DROP TABLE IF EXISTS profiles",
];
