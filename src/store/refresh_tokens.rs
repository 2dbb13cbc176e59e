//! Opaque refresh tokens: issue, verify, revoke.
//!
//! Tokens are keyed by their own value, so a user may hold several at once
//! and lookup is a map hit rather than a scan.

use rand::{rngs::OsRng, RngCore};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info};

use super::{RefreshToken, Store, StoreError};

const TOKEN_BYTES: usize = 32;

impl Store {
    /// Issue a token for `user_id` with the store's configured lifetime.
    pub fn issue_refresh_token(&self, user_id: u64) -> Result<String, StoreError> {
        self.issue_refresh_token_with_ttl(user_id, self.refresh_ttl())
    }

    pub fn issue_refresh_token_with_ttl(
        &self,
        user_id: u64,
        ttl: Duration,
    ) -> Result<String, StoreError> {
        let expires_at = OffsetDateTime::now_utc()
            .checked_add(ttl)
            .ok_or(StoreError::TtlOutOfRange)?;
        let token = generate_token();
        let record = RefreshToken {
            user_id,
            token: token.clone(),
            expires_at,
        };
        self.commit(|data| {
            if !data.snapshot.users.contains_key(&user_id) {
                return Err(StoreError::NotFound);
            }
            if data.snapshot.refresh_tokens.contains_key(&record.token) {
                return Err(StoreError::DuplicateToken);
            }
            data.snapshot
                .refresh_tokens
                .insert(record.token.clone(), record);
            Ok(())
        })?;
        info!(user_id, "refresh token issued");
        Ok(token)
    }

    /// The user bound to `token`, if it exists and has not expired.
    pub fn verify_refresh_token(&self, token: &str) -> Result<u64, StoreError> {
        self.verify_refresh_token_at(token, OffsetDateTime::now_utc())
    }

    pub fn verify_refresh_token_at(
        &self,
        token: &str,
        now: OffsetDateTime,
    ) -> Result<u64, StoreError> {
        let record = self.read(|data| data.snapshot.refresh_tokens.get(token).cloned());
        match record {
            Some(record) if record.is_valid_at(now) => Ok(record.user_id),
            Some(record) => {
                debug!(user_id = record.user_id, "refresh token expired");
                Err(StoreError::InvalidToken)
            }
            None => Err(StoreError::InvalidToken),
        }
    }

    /// Remove `token`. Unknown or already revoked tokens are `NotFound`.
    pub fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        let record = self.commit(|data| {
            data.snapshot
                .refresh_tokens
                .remove(token)
                .ok_or(StoreError::NotFound)
        })?;
        info!(user_id = record.user_id, "refresh token revoked");
        Ok(())
    }
}

fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::super::test_support::open_in;
    use super::*;

    fn store_with_user(dir: &tempfile::TempDir) -> (Store, u64) {
        let store = open_in(dir);
        let user = store.create_user("a@example.com", "pw123").unwrap();
        (store, user.id)
    }

    #[test]
    fn token_is_64_hex_chars() {
        let token = generate_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn login_refresh_revoke_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);

        let user = store.verify_credentials("a@example.com", "pw123").unwrap();
        let token = store.issue_refresh_token(user.id).unwrap();
        assert_eq!(store.verify_refresh_token(&token).unwrap(), user_id);

        store.revoke_refresh_token(&token).unwrap();
        assert!(matches!(
            store.verify_refresh_token(&token),
            Err(StoreError::InvalidToken)
        ));
    }

    #[test]
    fn expiry_is_inclusive() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        let token = store
            .issue_refresh_token_with_ttl(user_id, Duration::hours(1))
            .unwrap();
        let expires_at = store.snapshot().refresh_tokens[&token].expires_at;

        assert_eq!(store.verify_refresh_token_at(&token, expires_at).unwrap(), user_id);
        assert!(matches!(
            store.verify_refresh_token_at(&token, expires_at + Duration::nanoseconds(1)),
            Err(StoreError::InvalidToken)
        ));
    }

    #[test]
    fn negative_ttl_is_already_expired() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        let token = store
            .issue_refresh_token_with_ttl(user_id, Duration::seconds(-1))
            .unwrap();
        assert!(matches!(
            store.verify_refresh_token(&token),
            Err(StoreError::InvalidToken)
        ));
    }

    #[test]
    fn oversized_ttl_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        for ttl in [Duration::MAX, Duration::MIN] {
            assert!(matches!(
                store.issue_refresh_token_with_ttl(user_id, ttl),
                Err(StoreError::TtlOutOfRange)
            ));
        }
        assert!(store.snapshot().refresh_tokens.is_empty());
    }

    #[test]
    fn default_ttl_is_applied() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        let before = OffsetDateTime::now_utc();
        let token = store.issue_refresh_token(user_id).unwrap();
        let expires_at = store.snapshot().refresh_tokens[&token].expires_at;
        assert!(expires_at >= before + Duration::days(60));
        assert!(expires_at <= OffsetDateTime::now_utc() + Duration::days(60));
    }

    #[test]
    fn unknown_token_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        assert!(matches!(
            store.verify_refresh_token("deadbeef"),
            Err(StoreError::InvalidToken)
        ));
    }

    #[test]
    fn revoking_twice_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        let token = store.issue_refresh_token(user_id).unwrap();

        store.revoke_refresh_token(&token).unwrap();
        assert!(matches!(
            store.revoke_refresh_token(&token),
            Err(StoreError::NotFound)
        ));
        assert!(matches!(
            store.revoke_refresh_token("never-issued"),
            Err(StoreError::NotFound)
        ));
    }

    #[test]
    fn user_may_hold_several_tokens() {
        let dir = tempfile::tempdir().unwrap();
        let (store, user_id) = store_with_user(&dir);
        let first = store.issue_refresh_token(user_id).unwrap();
        let second = store.issue_refresh_token(user_id).unwrap();

        store.revoke_refresh_token(&first).unwrap();
        assert!(store.verify_refresh_token(&first).is_err());
        assert_eq!(store.verify_refresh_token(&second).unwrap(), user_id);
    }

    #[test]
    fn issuing_for_unknown_user_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_in(&dir);
        assert!(matches!(
            store.issue_refresh_token(99),
            Err(StoreError::NotFound)
        ));
        assert!(store.snapshot().refresh_tokens.is_empty());
    }

    #[test]
    fn tokens_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let token = {
            let (store, user_id) = store_with_user(&dir);
            store.issue_refresh_token(user_id).unwrap()
        };
        let store = open_in(&dir);
        assert_eq!(store.verify_refresh_token(&token).unwrap(), 1);
    }
}
