//! Password hashing

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::shared::errors::InfraError;

pub fn hash_password(password: &str) -> Result<String, InfraError> {
    hash(password, DEFAULT_COST).map_err(|e| InfraError::Crypto(e.to_string()))
}

/// `false` for a wrong password; `Err` only for a malformed hash
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, InfraError> {
    verify(password, password_hash).map_err(|e| InfraError::Crypto(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_original() {
        let hashed = hash_password("s3cret-pass").unwrap();
        assert_ne!(hashed, "s3cret-pass");
        assert!(verify_password("s3cret-pass", &hashed).unwrap());
        assert!(!verify_password("other-pass", &hashed).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("anything", "not-a-bcrypt-hash").is_err());
    }
}
