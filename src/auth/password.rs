use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hash a password for storage. bcrypt embeds the salt and cost factor in
/// the output string.
pub fn hash_password(plain: &str) -> Result<String, BcryptError> {
    hash(plain, DEFAULT_COST)
}

/// Verify a password against a stored hash. Deliberately slow; the
/// comparison inside bcrypt is constant-time.
pub fn verify_password(plain: &str, hashed: &str) -> Result<bool, BcryptError> {
    verify(plain, hashed)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Low cost keeps the tests fast; production paths use DEFAULT_COST
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_verify_round_trip() {
        let hashed = hash("s3cret-pw", TEST_COST).unwrap();
        assert!(verify_password("s3cret-pw", &hashed).unwrap());
    }

    #[test]
    fn test_wrong_password_rejected() {
        let hashed = hash("s3cret-pw", TEST_COST).unwrap();
        assert!(!verify_password("not-the-password", &hashed).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let first = hash("same-password", TEST_COST).unwrap();
        let second = hash("same-password", TEST_COST).unwrap();
        assert_ne!(first, second);
    }
}
