use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use tracing::error;

use super::error::StoreError;

lazy_static! {
    // Verified against when the email is unknown, so both login failures cost
    // the same amount of work.
    static ref DUMMY_HASH: Option<String> = hash_password("chirpy-dummy-password").ok();
}

pub fn hash_password(plain: &str) -> Result<String, StoreError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            StoreError::PasswordHash(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Constant-time comparison of `plain` against a stored hash.
///
/// Argon2 PHC strings are what the store writes. Bcrypt hashes (`$2a$`,
/// `$2b$`, `$2x$`, `$2y$`) from older files are still accepted.
pub fn verify_password(plain: &str, hash: &str) -> Result<bool, StoreError> {
    if is_bcrypt(hash) {
        return bcrypt::verify(plain, hash).map_err(|e| {
            error!(error = %e, "bcrypt verify error");
            StoreError::PasswordHash(e.to_string())
        });
    }
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        StoreError::PasswordHash(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

fn is_bcrypt(hash: &str) -> bool {
    ["$2a$", "$2b$", "$2x$", "$2y$"]
        .iter()
        .any(|prefix| hash.starts_with(prefix))
}

/// Burn one verification's worth of work and report failure.
pub fn verify_dummy(plain: &str) -> bool {
    if let Some(hash) = DUMMY_HASH.as_deref() {
        let _ = verify_password(plain, hash);
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_roundtrip() {
        let password = "Secur3P@ssw0rd!";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let password = "correct-horse-battery-staple";
        let hash = hash_password(password).expect("hashing should succeed");
        assert!(!verify_password("wrong-password", &hash).expect("verify should not error"));
    }

    #[test]
    fn same_password_hashes_differently() {
        let a = hash_password("pw123").unwrap();
        let b = hash_password("pw123").unwrap();
        assert_ne!(a, b);
        assert!(!a.contains("pw123"));
    }

    #[test]
    fn verify_errors_on_malformed_hash() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, StoreError::PasswordHash(_)));
    }

    #[test]
    fn verifies_bcrypt_hashes() {
        let legacy = bcrypt::hash("pw123", 4).unwrap();
        assert!(verify_password("pw123", &legacy).unwrap());
        assert!(!verify_password("nope", &legacy).unwrap());
    }

    #[test]
    fn verify_errors_on_malformed_bcrypt_hash() {
        let err = verify_password("pw123", "$2a$10$short").unwrap_err();
        assert!(matches!(err, StoreError::PasswordHash(_)));
    }

    #[test]
    fn dummy_never_matches() {
        assert!(!verify_dummy("chirpy-dummy-password"));
    }
}
