//! Password hashing helpers.

use bcrypt::{BcryptError, hash, verify};

/// Hash a plaintext password with the given bcrypt cost.
pub(crate) fn hash_password(password: &str, cost: u32) -> Result<String, BcryptError> {
    hash(password, cost)
}

/// Check a plaintext password against a stored bcrypt hash.
pub(crate) fn verify_password(password: &str, stored_hash: &str) -> Result<bool, BcryptError> {
    verify(password, stored_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum cost keeps these tests fast; the service uses DEFAULT_COST.
    const TEST_COST: u32 = 4;

    #[test]
    fn hash_then_verify_accepts_correct_password() {
        let hashed = hash_password("hunter2", TEST_COST).expect("hashing should succeed");

        assert!(verify_password("hunter2", &hashed).expect("verify should succeed"));
    }

    #[test]
    fn verify_rejects_wrong_password() {
        let hashed = hash_password("hunter2", TEST_COST).expect("hashing should succeed");

        assert!(!verify_password("hunter3", &hashed).expect("verify should succeed"));
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("same", TEST_COST).expect("hashing should succeed");
        let b = hash_password("same", TEST_COST).expect("hashing should succeed");

        assert_ne!(a, b, "two hashes of the same password must differ");
    }
}
