//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Scrypt,
};
use zeroize::Zeroize;

/// Minimum password length
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password using scrypt.
///
/// A fresh random salt is generated per call and embedded in the PHC-format
/// digest, so hashing the same password twice yields different strings.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("password hashing failed: {e}"))?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored digest.
///
/// A malformed digest verifies as false rather than erroring. Comparison runs
/// through the `password_hash` verifier, which is constant-time.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash a password and zeroize the plaintext buffer.
pub fn hash_password_secure(plain: &mut String) -> anyhow::Result<String> {
    let hash = hash_password(plain)?;
    plain.zeroize();
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_round_trip() {
        let hash = hash_password("correct horse battery").expect("hashing");
        assert_ne!(hash, "correct horse battery");
        assert!(verify_password(&hash, "correct horse battery"));
        assert!(!verify_password(&hash, "correct horse batterz"));
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let first = hash_password("repeatable-password").expect("hashing");
        let second = hash_password("repeatable-password").expect("hashing");
        assert_ne!(first, second);
        assert!(verify_password(&first, "repeatable-password"));
        assert!(verify_password(&second, "repeatable-password"));
    }

    #[test]
    fn test_malformed_digest_verifies_false() {
        assert!(!verify_password("not a phc digest", "anything"));
        assert!(!verify_password("", "anything"));
    }

    #[test]
    fn test_secure_hash_zeroizes_plaintext() {
        let mut plain = "sensitive-password".to_string();
        let hash = hash_password_secure(&mut plain).expect("hashing");
        assert!(plain.is_empty());
        assert!(verify_password(&hash, "sensitive-password"));
    }
}
