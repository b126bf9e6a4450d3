use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hashes a password with a fresh random salt.
///
/// The cost factor and salt are embedded in the returned digest, so
/// verification needs nothing beyond the digest itself.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Checks a password against a stored digest.
///
/// A digest that cannot be parsed counts as a mismatch rather than an
/// error, so callers see one uniform failure mode.
pub fn verify_password(password: &str, digest: &str) -> bool {
    verify(password, digest).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hashed_password_verifies() {
        let digest = hash_password("test_password123").unwrap();

        assert!(verify_password("test_password123", &digest));
        assert!(!verify_password("wrong_password", &digest));
    }

    #[test]
    fn same_password_hashes_to_different_digests() {
        let first = hash_password("test_password123").unwrap();
        let second = hash_password("test_password123").unwrap();

        assert_ne!(first, second);
        assert!(verify_password("test_password123", &first));
        assert!(verify_password("test_password123", &second));
    }

    #[test]
    fn malformed_digest_fails_verification() {
        assert!(!verify_password("test_password123", "invalidhashformat"));
        assert!(!verify_password("test_password123", ""));
    }
}
