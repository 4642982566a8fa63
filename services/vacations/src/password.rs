//! Password hashing

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use tracing::error;

use crate::error::ApiError;

/// Hash a password into an Argon2 PHC string with a fresh random salt
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut rand::thread_rng());
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })
}

/// Check a password against a stored PHC string.
///
/// A hash that cannot be parsed never matches.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed_hash = match PasswordHash::new(password_hash) {
        Ok(hash) => hash,
        Err(e) => {
            error!("Failed to parse stored password hash: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_verifies_only_the_hashed_password() {
        let hash = hash_password("2134").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("2134", &hash));
        assert!(!verify_password("2135", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        assert_ne!(hash_password("same").unwrap(), hash_password("same").unwrap());
    }

    #[test]
    fn test_plaintext_stored_value_never_matches() {
        assert!(!verify_password("2134", "2134"));
    }
}
