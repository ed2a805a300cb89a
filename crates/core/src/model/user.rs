use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::UserId;

pub const MIN_NAME_LEN: usize = 3;
pub const MIN_ROLL_NUMBER_LEN: usize = 3;
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProfileError {
    #[error("name must be at least 3 characters")]
    NameTooShort,

    #[error("please enter a valid email")]
    InvalidEmail,

    #[error("roll number must be at least 3 characters")]
    RollNumberTooShort,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,

    #[error("passwords do not match")]
    PasswordMismatch,
}

/// `local@domain.tld` with no whitespace and exactly one `@`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

/// Heuristic used to badge institutional addresses on the profile page.
#[must_use]
pub fn is_university_email(email: &str) -> bool {
    let email = email.to_ascii_lowercase();
    email.ends_with(".edu") || email.contains(".edu.") || email.contains(".ac.")
}

/// Editable profile fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileDraft {
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub university: Option<String>,
}

impl ProfileDraft {
    /// # Errors
    ///
    /// Returns `ProfileError` for a short name or roll number, or an invalid
    /// email.
    pub fn validate(self) -> Result<ProfileDraft, ProfileError> {
        let name = self.name.trim().to_owned();
        let email = self.email.trim().to_ascii_lowercase();
        let roll_number = self.roll_number.trim().to_owned();
        let university = self
            .university
            .map(|u| u.trim().to_owned())
            .filter(|u| !u.is_empty());

        if name.chars().count() < MIN_NAME_LEN {
            return Err(ProfileError::NameTooShort);
        }
        if !is_valid_email(&email) {
            return Err(ProfileError::InvalidEmail);
        }
        if roll_number.chars().count() < MIN_ROLL_NUMBER_LEN {
            return Err(ProfileError::RollNumberTooShort);
        }

        Ok(ProfileDraft {
            name,
            email,
            roll_number,
            university,
        })
    }
}

/// Check a sign-up password and its confirmation.
///
/// # Errors
///
/// Returns `ProfileError::PasswordTooShort` or `ProfileError::PasswordMismatch`.
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), ProfileError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ProfileError::PasswordTooShort);
    }
    if password != confirmation {
        return Err(ProfileError::PasswordMismatch);
    }
    Ok(())
}

/// A registered student.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub roll_number: String,
    pub university: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    #[must_use]
    pub fn to_draft(&self) -> ProfileDraft {
        ProfileDraft {
            name: self.name.clone(),
            email: self.email.clone(),
            roll_number: self.roll_number.clone(),
            university: self.university.clone(),
        }
    }
}
