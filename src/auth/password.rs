//! Password validation and hashing.
//!
//! A raw password becomes a [ValidatedPassword] once it passes a strength
//! check, and a [PasswordHash] once it has been salted and hashed. Only the
//! hash is ever stored.

use std::fmt::Display;

use bcrypt::{hash, verify};
use serde::{Deserialize, Serialize};
use zxcvbn::{Score, feedback::Feedback, zxcvbn};

use crate::Error;

/// A password that has been checked for strength but not yet hashed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedPassword(String);

impl ValidatedPassword {
    /// Create and validate a new password from a string.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] if the password is too easy to guess. The
    /// error message explains why and suggests how to make it stronger.
    pub fn new(raw_password: &str) -> Result<Self, Error> {
        let analysis = zxcvbn(raw_password, &[]);

        match analysis.score() {
            Score::Three | Score::Four => Ok(Self(raw_password.to_owned())),
            _ => Err(Error::TooWeak(
                analysis
                    .feedback()
                    .unwrap_or(&Feedback::default())
                    .to_string(),
            )),
        }
    }

    /// Create a `ValidatedPassword` without checking its strength.
    ///
    /// The caller should ensure the password is acceptable. This function
    /// has `_unchecked` in the name but is not `unsafe`: a weak password
    /// causes no memory unsafety, only a weak account.
    pub fn new_unchecked(raw_password: &str) -> Self {
        Self(raw_password.to_owned())
    }
}

impl Display for ValidatedPassword {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", str::repeat("*", 8))
    }
}

/// A salted and hashed password.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// An alias for the default cost for hashing passwords.
    pub const DEFAULT_COST: u32 = bcrypt::DEFAULT_COST;

    /// Hash a validated password with the given bcrypt `cost`.
    ///
    /// Higher costs take longer to hash and therefore longer to attack;
    /// pass [PasswordHash::DEFAULT_COST] unless there is a reason not to.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the password could not be hashed.
    pub fn new(password: ValidatedPassword, cost: u32) -> Result<Self, Error> {
        hash(&password.0, cost)
            .map(Self)
            .map_err(|error| Error::HashingError(error.to_string()))
    }

    /// Validate and hash a raw password string in one step.
    ///
    /// # Errors
    ///
    /// Returns [Error::TooWeak] or [Error::HashingError] as the two-step
    /// version would.
    pub fn from_raw_password(raw_password: &str, cost: u32) -> Result<Self, Error> {
        PasswordHash::new(ValidatedPassword::new(raw_password)?, cost)
    }

    /// Wrap an existing hash string without re-validating it.
    ///
    /// The caller should ensure the string really is a bcrypt hash, e.g.
    /// because it was read back from the user table.
    pub fn new_unchecked(raw_hash: &str) -> Self {
        Self(raw_hash.to_owned())
    }

    /// Check `raw_password` against the stored hash.
    ///
    /// # Errors
    ///
    /// Returns [Error::HashingError] if the stored hash could not be
    /// parsed.
    pub fn verify(&self, raw_password: &str) -> Result<bool, Error> {
        verify(raw_password, &self.0).map_err(|error| Error::HashingError(error.to_string()))
    }
}

impl AsRef<str> for PasswordHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PasswordHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod password_tests {
    use crate::Error;

    use super::{PasswordHash, ValidatedPassword};

    /// Low cost to keep the tests fast; never use this in the application.
    const TEST_COST: u32 = 4;

    #[test]
    fn weak_password_is_rejected() {
        let result = ValidatedPassword::new("hunter2");

        assert!(matches!(result, Err(Error::TooWeak(_))));
    }

    #[test]
    fn strong_password_is_accepted() {
        let result = ValidatedPassword::new("correcthorsebatterystaple");

        assert!(result.is_ok());
    }

    #[test]
    fn hash_verifies_the_original_password() {
        let password = ValidatedPassword::new_unchecked("correcthorsebatterystaple");
        let hash = PasswordHash::new(password, TEST_COST).unwrap();

        assert_eq!(hash.verify("correcthorsebatterystaple"), Ok(true));
        assert_eq!(hash.verify("incorrecthorsebatterystaple"), Ok(false));
    }

    #[test]
    fn displaying_a_validated_password_redacts_it() {
        let password = ValidatedPassword::new_unchecked("correcthorsebatterystaple");

        assert_eq!(password.to_string(), "********");
    }
}
