//! Authenticated encryption for resendable OTPs.
//!
//! The email-verification flow re-delivers the identical OTP when a request
//! lands after the cooldown but inside the validity window, so a one-way hash
//! won't do. Instead the OTP is sealed with ChaCha20-Poly1305 under a
//! deployment-wide key, stored as `nonce (12 bytes) || ciphertext`, and the
//! owning email is bound as associated data — a ciphertext lifted onto
//! another ledger row fails to open.

use chacha20poly1305::{
    aead::{Aead, KeyInit, Payload},
    ChaCha20Poly1305, Key, Nonce,
};
use error::AppError;
use rand::RngCore;

const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Deployment-wide sealing key for verification OTPs.
#[derive(Clone)]
pub struct SealingKey {
    key: [u8; KEY_LEN],
}

impl SealingKey {
    /// Build a key from raw bytes; must be exactly 32 bytes.
    ///
    /// # Errors
    ///
    /// Returns a config error for any other length.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AppError> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| AppError::config(format!("Sealing key must be {KEY_LEN} bytes, got {}", bytes.len())))?;
        Ok(Self { key })
    }

    /// Build a key from a base64-encoded string.
    ///
    /// # Errors
    ///
    /// Returns a config error if the encoding or length is wrong.
    pub fn from_base64(encoded: &str) -> Result<Self, AppError> {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| AppError::config(format!("Sealing key is not valid base64: {e}")))?;
        Self::from_bytes(&bytes)
    }

    /// Seal an OTP for the given email. Returns `nonce || ciphertext`.
    ///
    /// # Errors
    ///
    /// Returns a crypto error if encryption fails.
    pub fn seal(&self, otp: &str, email: &str) -> Result<Vec<u8>, AppError> {
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let payload = Payload {
            msg: otp.as_bytes(),
            aad: email.as_bytes(),
        };

        let ciphertext = cipher
            .encrypt(nonce, payload)
            .map_err(|e| AppError::crypto(format!("OTP sealing failed: {e}")))?;

        let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    /// Open a sealed OTP for the given email.
    ///
    /// # Errors
    ///
    /// Returns a crypto error if the data is truncated, was sealed for a
    /// different email, or fails authentication.
    pub fn open(&self, sealed: &[u8], email: &str) -> Result<String, AppError> {
        if sealed.len() < NONCE_LEN {
            return Err(AppError::crypto("Sealed OTP is too short"));
        }

        let (nonce_bytes, ciphertext) = sealed.split_at(NONCE_LEN);
        let cipher = ChaCha20Poly1305::new(Key::from_slice(&self.key));

        let payload = Payload {
            msg: ciphertext,
            aad: email.as_bytes(),
        };

        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), payload)
            .map_err(|_| AppError::crypto("OTP unsealing failed"))?;

        String::from_utf8(plaintext).map_err(|_| AppError::crypto("Unsealed OTP is not valid UTF-8"))
    }
}

impl std::fmt::Debug for SealingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SealingKey").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> SealingKey {
        SealingKey::from_bytes(&[7u8; 32]).unwrap()
    }

    #[test]
    fn test_seal_open_round_trip() {
        let key = test_key();
        let sealed = key.seal("483921", "user@example.com").unwrap();
        assert_ne!(sealed, b"483921");
        assert_eq!(key.open(&sealed, "user@example.com").unwrap(), "483921");
    }

    #[test]
    fn test_nonce_makes_ciphertexts_differ() {
        let key = test_key();
        let a = key.seal("483921", "user@example.com").unwrap();
        let b = key.seal("483921", "user@example.com").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_open_fails_for_other_email() {
        let key = test_key();
        let sealed = key.seal("483921", "user@example.com").unwrap();
        assert!(key.open(&sealed, "attacker@example.com").is_err());
    }

    #[test]
    fn test_open_fails_for_other_key() {
        let key = test_key();
        let other = SealingKey::from_bytes(&[8u8; 32]).unwrap();
        let sealed = key.seal("483921", "user@example.com").unwrap();
        assert!(other.open(&sealed, "user@example.com").is_err());
    }

    #[test]
    fn test_truncated_data_is_rejected() {
        let key = test_key();
        assert!(key.open(&[1, 2, 3], "user@example.com").is_err());
    }

    #[test]
    fn test_key_length_enforced() {
        assert!(SealingKey::from_bytes(&[0u8; 16]).is_err());
        assert!(SealingKey::from_bytes(&[0u8; 32]).is_ok());
    }

    #[test]
    fn test_key_from_base64() {
        use base64::{engine::general_purpose::STANDARD, Engine as _};
        let encoded = STANDARD.encode([9u8; 32]);
        assert!(SealingKey::from_base64(&encoded).is_ok());
        assert!(SealingKey::from_base64("!!!").is_err());
    }
}
