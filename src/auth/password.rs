//! PBKDF2-HMAC-SHA256 password hashing
//!
//! Hashes are stored as `pbkdf2:sha256:<iterations>$<salt>$<hash>` with base64 salt and
//! hash.

use crate::error::{BrieflyError, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD_NO_PAD;
use ring::pbkdf2;
use ring::rand::{SecureRandom, SystemRandom};
use std::num::NonZeroU32;

const METHOD_PREFIX: &str = "pbkdf2:sha256:";
const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;

/// Hash `password` with a fresh random salt
pub fn hash_password(password: &str, iterations: u32) -> Result<String> {
    let iterations = NonZeroU32::new(iterations)
        .ok_or_else(|| BrieflyError::Config("pbkdf2 iterations must be positive".to_string()))?;

    let mut salt = [0u8; SALT_LEN];
    SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| BrieflyError::Auth("Failed to generate salt".to_string()))?;

    let mut hash = [0u8; HASH_LEN];
    pbkdf2::derive(
        pbkdf2::PBKDF2_HMAC_SHA256,
        iterations,
        &salt,
        password.as_bytes(),
        &mut hash,
    );

    Ok(format!(
        "{}{}${}${}",
        METHOD_PREFIX,
        iterations,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    ))
}

/// Check `password` against a stored hash in constant time.
///
/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    match parse_stored_hash(stored) {
        Some((iterations, salt, hash)) => pbkdf2::verify(
            pbkdf2::PBKDF2_HMAC_SHA256,
            iterations,
            &salt,
            password.as_bytes(),
            &hash,
        )
        .is_ok(),
        None => {
            log::warn!("Stored password hash has an unsupported format");
            false
        }
    }
}

fn parse_stored_hash(stored: &str) -> Option<(NonZeroU32, Vec<u8>, Vec<u8>)> {
    let rest = stored.strip_prefix(METHOD_PREFIX)?;
    let mut parts = rest.split('$');
    let iterations = parts.next()?.parse::<u32>().ok().and_then(NonZeroU32::new)?;
    let salt = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    let hash = STANDARD_NO_PAD.decode(parts.next()?).ok()?;
    if parts.next().is_some() || hash.is_empty() {
        return None;
    }
    Some((iterations, salt, hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAST_ITERATIONS: u32 = 1_000;

    #[test]
    fn test_hash_and_verify() {
        let stored = hash_password("correct horse", FAST_ITERATIONS).unwrap();

        assert!(stored.starts_with("pbkdf2:sha256:1000$"));
        assert!(verify_password("correct horse", &stored));
        assert!(!verify_password("wrong horse", &stored));
    }

    #[test]
    fn test_salts_differ() {
        let first = hash_password("same", FAST_ITERATIONS).unwrap();
        let second = hash_password("same", FAST_ITERATIONS).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_malformed_hashes_never_verify() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "plaintext"));
        assert!(!verify_password("pw", "pbkdf2:sha256:0$AAAA$AAAA"));
        assert!(!verify_password("pw", "scrypt:32768:8:1$salt$hash"));
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(hash_password("pw", 0).is_err());
    }
}
