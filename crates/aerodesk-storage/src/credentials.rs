//! Persisted session credentials
//!
//! The three keys are written and cleared as a unit: any terminal failure
//! or explicit logout removes all of them in one transaction.

use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};

use crate::database::Database;
use crate::Result;

pub const ACCESS_TOKEN_KEY: &str = "token";
pub const REFRESH_TOKEN_KEY: &str = "refreshToken";
pub const USERNAME_KEY: &str = "username";

const ALL_KEYS: [&str; 3] = [ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY, USERNAME_KEY];

/// Everything the store currently holds
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoredCredentials {
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub username: Option<String>,
}

impl StoredCredentials {
    pub fn is_empty(&self) -> bool {
        self.access_token.is_none() && self.refresh_token.is_none() && self.username.is_none()
    }
}

#[derive(Clone)]
pub struct CredentialStore {
    db: Database,
}

impl CredentialStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get(&self, key: &str) -> Result<Option<String>> {
        self.db.with_connection(|conn| read_key(conn, key))
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.with_connection(|conn| write_key(conn, key, value))
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM credentials WHERE key = ?1", [key])?;
            Ok(())
        })
    }

    pub fn access_token(&self) -> Result<Option<String>> {
        self.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Result<Option<String>> {
        self.get(REFRESH_TOKEN_KEY)
    }

    pub fn username(&self) -> Result<Option<String>> {
        self.get(USERNAME_KEY)
    }

    pub fn set_access_token(&self, token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, token)
    }

    pub fn set_username(&self, username: &str) -> Result<()> {
        self.set(USERNAME_KEY, username)
    }

    /// Replace the access token minted from `refresh_token`, but only while
    /// that refresh token is still the stored one. Returns false when the
    /// credentials were cleared or replaced in the meantime.
    pub fn rotate_access_token(&self, refresh_token: &str, access_token: &str) -> Result<bool> {
        self.db.transaction(|conn| {
            if read_key(conn, REFRESH_TOKEN_KEY)?.as_deref() != Some(refresh_token) {
                return Ok(false);
            }
            write_key(conn, ACCESS_TOKEN_KEY, access_token)?;
            Ok(true)
        })
    }

    /// Store an access/refresh token pair atomically
    pub fn store_tokens(&self, access_token: &str, refresh_token: &str) -> Result<()> {
        self.db.transaction(|conn| {
            write_key(conn, ACCESS_TOKEN_KEY, access_token)?;
            write_key(conn, REFRESH_TOKEN_KEY, refresh_token)?;
            Ok(())
        })
    }

    /// Store the full credential set written by a successful login
    pub fn store_login(&self, access_token: &str, refresh_token: &str, username: &str) -> Result<()> {
        self.db.transaction(|conn| {
            write_key(conn, ACCESS_TOKEN_KEY, access_token)?;
            write_key(conn, REFRESH_TOKEN_KEY, refresh_token)?;
            write_key(conn, USERNAME_KEY, username)?;
            Ok(())
        })
    }

    pub fn load(&self) -> Result<StoredCredentials> {
        self.db.with_connection(|conn| {
            Ok(StoredCredentials {
                access_token: read_key(conn, ACCESS_TOKEN_KEY)?,
                refresh_token: read_key(conn, REFRESH_TOKEN_KEY)?,
                username: read_key(conn, USERNAME_KEY)?,
            })
        })
    }

    /// Remove every persisted credential key
    pub fn clear(&self) -> Result<()> {
        self.db.transaction(|conn| {
            for key in ALL_KEYS {
                conn.execute("DELETE FROM credentials WHERE key = ?1", [key])?;
            }
            Ok(())
        })?;

        tracing::debug!("Cleared stored credentials");
        Ok(())
    }
}

fn read_key(conn: &Connection, key: &str) -> Result<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM credentials WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(value)
}

fn write_key(conn: &Connection, key: &str, value: &str) -> Result<()> {
    let updated_at = Utc::now().to_rfc3339();
    conn.execute(
        "INSERT OR REPLACE INTO credentials (key, value, updated_at) VALUES (?1, ?2, ?3)",
        rusqlite::params![key, value, updated_at],
    )?;
    Ok(())
}
