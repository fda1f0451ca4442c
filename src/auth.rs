// Credential verification. PINs are stored as `salt$sha256hex`, never as
// plaintext; verification re-derives the digest from the presented PIN and
// the stored salt.

use sha2::{Digest, Sha256};

const DIGEST_SEPARATOR: char = '$';

/// Hash a PIN with a fresh random salt. Output format: `salt$hex`.
pub fn hash_pin(pin: &str) -> String {
    let salt = uuid::Uuid::new_v4().simple().to_string();
    format!("{}{}{}", salt, DIGEST_SEPARATOR, digest(&salt, pin))
}

/// Compare a presented PIN against a stored `salt$hex` digest.
/// A stored value that does not parse verifies as false.
pub fn verify_pin(pin: &str, stored: &str) -> bool {
    let Some((salt, expected)) = stored.split_once(DIGEST_SEPARATOR) else {
        return false;
    };
    digest(salt, pin) == expected
}

fn digest(salt: &str, pin: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(pin.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let stored = hash_pin("4821");
        assert!(verify_pin("4821", &stored));
        assert!(!verify_pin("4822", &stored));
        assert!(!verify_pin("", &stored));
    }

    #[test]
    fn test_salts_differ_per_hash() {
        let a = hash_pin("4821");
        let b = hash_pin("4821");
        assert_ne!(a, b, "same PIN must not produce the same stored digest");
        assert!(verify_pin("4821", &a));
        assert!(verify_pin("4821", &b));
    }

    #[test]
    fn test_stored_format() {
        let stored = hash_pin("0000");
        let (salt, hex) = stored.split_once('$').unwrap();
        assert_eq!(salt.len(), 32); // uuid simple form
        assert_eq!(hex.len(), 64); // sha-256 hex
    }

    #[test]
    fn test_malformed_stored_value_never_verifies() {
        assert!(!verify_pin("4821", ""));
        assert!(!verify_pin("4821", "no-separator"));
        assert!(!verify_pin("4821", "salt$"));
    }
}
