use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// User record as persisted in the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Positive, assigned by the store.
    pub id: u64,
    /// Unique by convention only.
    pub email: String,
    /// Argon2 PHC string, or a bcrypt hash carried over from older files.
    #[serde(alias = "password")]
    pub password_hash: String,
}

/// A chirp. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chirp {
    pub id: u64,
    pub body: String,
}

/// Opaque refresh token bound to a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshToken {
    pub user_id: u64,
    /// 64 hex chars.
    pub token: String,
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,
}

impl RefreshToken {
    /// Valid while `now <= expires_at`.
    pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
        now <= self.expires_at
    }
}
