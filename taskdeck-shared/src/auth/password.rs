/// Password hashing using bcrypt
///
/// Signup and credential updates hash with a cost factor of 8 before
/// anything touches the database; plaintext passwords never leave the
/// service layer. Verification reads the cost embedded in the stored hash,
/// so raising [`HASH_COST`] later keeps old hashes verifiable.
///
/// # Example
///
/// ```
/// use taskdeck_shared::auth::password::{hash_password, verify_password};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("hunter2!")?;
/// assert!(verify_password("hunter2!", &hash)?);
/// assert!(!verify_password("wrong", &hash)?);
/// # Ok(())
/// # }
/// ```

/// bcrypt cost factor applied to new hashes
pub const HASH_COST: u32 = 8;

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash a password
    #[error("Failed to hash password: {0}")]
    Hash(String),

    /// Stored hash is malformed or verification failed
    #[error("Failed to verify password: {0}")]
    Verify(String),
}

/// Hashes a plaintext password with bcrypt at [`HASH_COST`]
///
/// Each call salts independently, so hashing the same password twice yields
/// different strings.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    bcrypt::hash(password, HASH_COST).map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Verifies a plaintext password against a stored bcrypt hash
///
/// Returns `Ok(false)` for a wrong password; errors only when the stored
/// hash itself cannot be parsed.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    bcrypt::verify(password, hash).map_err(|e| PasswordError::Verify(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_embeds_cost() {
        let hash = hash_password("test_password_123").expect("hash should succeed");

        assert!(hash.starts_with("$2"));
        assert!(hash.contains("$08$"), "cost factor 8 should be embedded");
    }

    #[test]
    fn test_hash_password_produces_different_salts() {
        let hash1 = hash_password("same_password").expect("hash 1 should succeed");
        let hash2 = hash_password("same_password").expect("hash 2 should succeed");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_verify_password_roundtrip() {
        let hash = hash_password("correct_password").expect("hash should succeed");

        assert!(verify_password("correct_password", &hash).expect("verify should succeed"));
        assert!(!verify_password("wrong_password", &hash).expect("verify should succeed"));
        assert!(!verify_password("", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_verify_password_invalid_hash() {
        let result = verify_password("password", "not_a_bcrypt_hash");
        assert!(result.is_err());
    }

    #[test]
    fn test_hash_unicode_password() {
        let password = "pässwörd-密码";
        let hash = hash_password(password).expect("hash should succeed");
        assert!(verify_password(password, &hash).expect("verify should succeed"));
    }
}
