use std::sync::{Arc, PoisonError, RwLock};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use attendance_core::model::{ProfileDraft, UserProfile, validate_password};
use storage::repository::{NewUserRecord, StorageError, UserRepository};

use crate::Clock;
use crate::error::AuthError;

fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hash(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(stored).map_err(|e| AuthError::Hash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Email/password accounts and the signed-in session.
#[derive(Clone)]
pub struct AuthService {
    clock: Clock,
    users: Arc<dyn UserRepository>,
    session: Arc<RwLock<Option<UserProfile>>>,
}

impl AuthService {
    #[must_use]
    pub fn new(clock: Clock, users: Arc<dyn UserRepository>) -> Self {
        Self {
            clock,
            users,
            session: Arc::new(RwLock::new(None)),
        }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<UserProfile> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set_session(&self, user: Option<UserProfile>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = user;
    }

    /// Create an account and sign it in.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Profile` for invalid fields or passwords,
    /// `AuthError::EmailTaken` for a registered email, or
    /// `AuthError::Storage` on backend failure.
    pub async fn sign_up(
        &self,
        draft: ProfileDraft,
        password: &str,
        confirmation: &str,
    ) -> Result<UserProfile, AuthError> {
        let draft = draft.validate()?;
        validate_password(password, confirmation)?;

        let record = NewUserRecord {
            name: draft.name,
            email: draft.email,
            roll_number: draft.roll_number,
            university: draft.university,
            password_hash: hash_password(password)?,
            created_at: self.clock.now(),
        };
        let id = self.users.insert_user(record).await.map_err(|err| match err {
            StorageError::Conflict => AuthError::EmailTaken,
            other => AuthError::Storage(other),
        })?;
        let profile = self.users.get_user(id).await?;
        tracing::info!(user_id = %id, "account created");
        self.set_session(Some(profile.clone()));
        Ok(profile)
    }

    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` for an unknown email or a wrong
    /// password.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<UserProfile, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let Some(credentials) = self.users.find_credentials(&email).await? else {
            tracing::warn!("sign-in for unknown email");
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(password, &credentials.password_hash)? {
            tracing::warn!(user_id = %credentials.profile.id, "wrong password");
            return Err(AuthError::InvalidCredentials);
        }
        tracing::info!(user_id = %credentials.profile.id, "signed in");
        self.set_session(Some(credentials.profile.clone()));
        Ok(credentials.profile)
    }

    pub fn sign_out(&self) {
        if let Some(user) = self.current_user() {
            tracing::info!(user_id = %user.id, "signed out");
        }
        self.set_session(None);
    }

    /// Edit the signed-in user's profile.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NotSignedIn` without a session,
    /// `AuthError::Profile` for invalid fields, or `AuthError::EmailTaken`
    /// if the new email belongs to another account.
    pub async fn update_profile(&self, draft: ProfileDraft) -> Result<UserProfile, AuthError> {
        let current = self.current_user().ok_or(AuthError::NotSignedIn)?;
        let draft = draft.validate()?;
        let updated = UserProfile {
            id: current.id,
            name: draft.name,
            email: draft.email,
            roll_number: draft.roll_number,
            university: draft.university,
            created_at: current.created_at,
        };
        self.users
            .update_profile(&updated)
            .await
            .map_err(|err| match err {
                StorageError::Conflict => AuthError::EmailTaken,
                other => AuthError::Storage(other),
            })?;
        tracing::info!(user_id = %updated.id, "profile updated");
        self.set_session(Some(updated.clone()));
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::model::ProfileError;
    use attendance_core::time::fixed_now;
    use storage::repository::InMemoryRepository;

    fn service() -> AuthService {
        AuthService::new(Clock::Fixed(fixed_now()), Arc::new(InMemoryRepository::new()))
    }

    fn draft(email: &str) -> ProfileDraft {
        ProfileDraft {
            name: "Asha Rao".into(),
            email: email.into(),
            roll_number: "21CS042".into(),
            university: None,
        }
    }

    #[test]
    fn hashes_verify_only_their_password() {
        let hash = hash_password("secret1").unwrap();
        assert!(verify_password("secret1", &hash).unwrap());
        assert!(!verify_password("secret2", &hash).unwrap());
    }

    #[tokio::test]
    async fn sign_up_then_sign_in() {
        let auth = service();
        let created = auth
            .sign_up(draft("Asha@Uni.edu"), "secret1", "secret1")
            .await
            .unwrap();
        assert_eq!(created.email, "asha@uni.edu");
        assert_eq!(auth.current_user(), Some(created.clone()));

        auth.sign_out();
        assert!(auth.current_user().is_none());

        let signed_in = auth.sign_in(" asha@uni.edu ", "secret1").await.unwrap();
        assert_eq!(signed_in.id, created.id);
    }

    #[tokio::test]
    async fn rejects_bad_credentials_and_duplicates() {
        let auth = service();
        auth.sign_up(draft("asha@uni.edu"), "secret1", "secret1")
            .await
            .unwrap();

        assert!(matches!(
            auth.sign_in("asha@uni.edu", "wrong-pw").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_in("nobody@uni.edu", "secret1").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.sign_up(draft("asha@uni.edu"), "secret1", "secret1").await,
            Err(AuthError::EmailTaken)
        ));
        assert!(matches!(
            auth.sign_up(draft("b@uni.edu"), "secret1", "secret2").await,
            Err(AuthError::Profile(ProfileError::PasswordMismatch))
        ));
    }

    #[tokio::test]
    async fn profile_update_requires_session() {
        let auth = service();
        assert!(matches!(
            auth.update_profile(draft("a@uni.edu")).await,
            Err(AuthError::NotSignedIn)
        ));

        auth.sign_up(draft("a@uni.edu"), "secret1", "secret1")
            .await
            .unwrap();
        let mut edit = draft("a@uni.edu");
        edit.university = Some("State University".into());
        let updated = auth.update_profile(edit).await.unwrap();
        assert_eq!(updated.university.as_deref(), Some("State University"));
        assert_eq!(auth.current_user(), Some(updated));
    }
}
