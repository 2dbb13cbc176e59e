use tracing::{debug, error, info};

use super::password::{hash_password, verify_dummy, verify_password};
use super::{Dataset, Store, StoreError, User};

impl Store {
    pub fn create_user(&self, email: &str, password: &str) -> Result<User, StoreError> {
        // Hash before taking the lock; Argon2 is deliberately slow.
        let password_hash = hash_password(password)?;
        let user = self.commit(|data| {
            let user = User {
                id: data.next_user_id,
                email: email.to_owned(),
                password_hash,
            };
            data.snapshot.users.insert(user.id, user.clone());
            data.next_user_id += 1;
            Ok(user)
        })?;
        info!(user_id = user.id, "user created");
        Ok(user)
    }

    /// First user, in id order, whose email matches exactly (case-sensitive).
    pub fn find_user_by_email(&self, email: &str) -> Result<User, StoreError> {
        self.read(|data| by_email(data, email).cloned())
            .ok_or(StoreError::NotFound)
    }

    pub fn get_user(&self, id: u64) -> Result<User, StoreError> {
        self.read(|data| data.snapshot.users.get(&id).cloned())
            .ok_or(StoreError::NotFound)
    }

    /// Replace email and password of an existing user.
    pub fn update_user(&self, id: u64, email: &str, password: &str) -> Result<User, StoreError> {
        if self.read(|data| !data.snapshot.users.contains_key(&id)) {
            return Err(StoreError::NotFound);
        }
        let password_hash = hash_password(password)?;
        let user = self.commit(|data| {
            let user = data
                .snapshot
                .users
                .get_mut(&id)
                .ok_or(StoreError::NotFound)?;
            user.email = email.to_owned();
            user.password_hash = password_hash;
            Ok(user.clone())
        })?;
        info!(user_id = user.id, "user updated");
        Ok(user)
    }

    /// Look up `email` and check `password` against its hash.
    ///
    /// Unknown email and wrong password both yield `InvalidCredentials`.
    pub fn verify_credentials(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let Ok(user) = self.find_user_by_email(email) else {
            verify_dummy(password);
            debug!("credentials rejected");
            return Err(StoreError::InvalidCredentials);
        };
        match verify_password(password, &user.password_hash) {
            Ok(true) => Ok(user),
            Ok(false) => {
                debug!(user_id = user.id, "credentials rejected");
                Err(StoreError::InvalidCredentials)
            }
            // Same answer as a wrong password so the email's existence stays hidden.
            Err(e) => {
                error!(user_id = user.id, error = %e, "stored password hash unreadable");
                Err(StoreError::InvalidCredentials)
            }
        }
    }
}

fn by_email<'a>(data: &'a Dataset, email: &str) -> Option<&'a User> {
    data.snapshot.users.values().find(|u| u.email == email)
}
