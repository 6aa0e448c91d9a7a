use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretSlice, SecretString};
use sha2::Sha256;
use std::fmt;
use thiserror::Error;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncryptionError {
    #[error("The account number encryption key is unavailable")]
    KeyUnavailable,

    #[error("The account number could not be decrypted")]
    DecryptionFailed,

    #[error("The fingerprint key must not be empty")]
    EmptyFingerprintKey,
}

/// Account number ciphertext, base64 encoded for storage.
///
/// Never printed: the `Debug` output is redacted and the type is not serializable.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptedAccountNumber(String);

impl EncryptedAccountNumber {
    pub fn from_ciphertext(ciphertext: &[u8]) -> Self {
        Self(STANDARD.encode(ciphertext))
    }

    /// Wraps a value previously returned by [EncryptedAccountNumber::encoded]
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    pub fn encoded(&self) -> &str {
        &self.0
    }

    pub fn ciphertext(&self) -> Result<Vec<u8>, EncryptionError> {
        STANDARD
            .decode(&self.0)
            .map_err(|_| EncryptionError::DecryptionFailed)
    }
}

impl fmt::Debug for EncryptedAccountNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptedAccountNumber([REDACTED])")
    }
}

/// Deterministic keyed digest of an account number. Two submissions of the same account
/// number produce the same fingerprint, so stores can detect reuse without decrypting.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountFingerprint(String);

impl AccountFingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// The at-rest encryption service for account numbers.
///
/// Implementations encrypt with a public key and decrypt only with the held private key,
/// so the plaintext is available transiently for validation and never stored.
pub trait AccountNumberVault: Send + Sync {
    fn encrypt(
        &self,
        account_number: &SecretString,
    ) -> Result<EncryptedAccountNumber, EncryptionError>;

    fn decrypt(&self, encrypted: &EncryptedAccountNumber) -> Result<SecretString, EncryptionError>;

    fn fingerprint(
        &self,
        account_number: &SecretString,
    ) -> Result<AccountFingerprint, EncryptionError>;
}

/// HMAC-SHA256 fingerprints for vault implementations.
pub struct HmacFingerprinter {
    key: SecretSlice<u8>,
}

impl HmacFingerprinter {
    pub fn new(key: Vec<u8>) -> Result<Self, EncryptionError> {
        if key.is_empty() {
            return Err(EncryptionError::EmptyFingerprintKey);
        }
        Ok(Self {
            key: SecretSlice::from(key),
        })
    }

    pub fn fingerprint(
        &self,
        account_number: &SecretString,
    ) -> Result<AccountFingerprint, EncryptionError> {
        let mut mac = HmacSha256::new_from_slice(self.key.expose_secret())
            .map_err(|_| EncryptionError::EmptyFingerprintKey)?;
        mac.update(account_number.expose_secret().as_bytes());
        Ok(AccountFingerprint(
            URL_SAFE_NO_PAD.encode(mac.finalize().into_bytes()),
        ))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn secret(value: &str) -> SecretString {
        SecretString::from(value.to_string())
    }

    #[test]
    fn ciphertext_is_redacted_in_debug() {
        let encrypted = EncryptedAccountNumber::from_ciphertext(b"000123456789");
        assert_eq!(
            format!("{encrypted:?}"),
            "EncryptedAccountNumber([REDACTED])"
        );
        assert_eq!(encrypted.ciphertext().unwrap(), b"000123456789".to_vec());
    }

    #[test]
    fn invalid_encoding_fails_to_decode() {
        let encrypted = EncryptedAccountNumber::from_encoded("not base64!");
        assert_eq!(
            encrypted.ciphertext(),
            Err(EncryptionError::DecryptionFailed)
        );
    }

    #[test]
    fn fingerprints_are_deterministic_and_keyed() {
        let fingerprinter = HmacFingerprinter::new(b"key-1".to_vec()).unwrap();
        let other_key = HmacFingerprinter::new(b"key-2".to_vec()).unwrap();

        let a = fingerprinter.fingerprint(&secret("000123456789")).unwrap();
        let b = fingerprinter.fingerprint(&secret("000123456789")).unwrap();
        let c = fingerprinter.fingerprint(&secret("000123456788")).unwrap();
        let d = other_key.fingerprint(&secret("000123456789")).unwrap();

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(!a.as_str().contains("000123456789"));
    }

    #[test]
    fn empty_fingerprint_key_is_rejected() {
        assert!(matches!(
            HmacFingerprinter::new(vec![]),
            Err(EncryptionError::EmptyFingerprintKey)
        ));
    }
}
