use std::path::PathBuf;

/// Failures surfaced by store operations.
///
/// Lookup misses, bad credentials and bad refresh tokens are deliberately
/// coarse: callers cannot tell an unknown email from a wrong password, or an
/// unknown token from an expired one.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("invalid or expired refresh token")]
    InvalidToken,

    #[error("refresh token already exists")]
    DuplicateToken,

    #[error("refresh token lifetime out of range")]
    TtlOutOfRange,

    #[error("password hashing failed: {0}")]
    PasswordHash(String),

    #[error("failed to persist {}: {source}", .path.display())]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt data in {}: {reason}", .path.display())]
    CorruptData { path: PathBuf, reason: String },
}
