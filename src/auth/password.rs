//! Password hashing with Argon2id (PHC string format).

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AppError;

/// Hash a raw password with a fresh random salt.
pub fn hash(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Verify a raw password against a stored PHC hash string.
///
/// An unparseable stored hash verifies as `false` rather than erroring; it is
/// indistinguishable from a wrong password to the caller.
pub fn verify(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify_round_trips() {
        let hashed = hash("pw1").unwrap();
        assert_ne!(hashed, "pw1");
        assert!(verify("pw1", &hashed));
    }

    #[test]
    fn wrong_password_never_verifies() {
        let hashed = hash("pw1").unwrap();
        assert!(!verify("pw2", &hashed));
        assert!(!verify("", &hashed));
    }

    #[test]
    fn same_password_hashes_differently_per_salt() {
        let a = hash("pw1").unwrap();
        let b = hash("pw1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn garbage_stored_hash_is_a_mismatch_not_a_panic() {
        assert!(!verify("pw1", "not-a-phc-string"));
    }
}
