//! In-memory collaborators for tests and benchmarks.

use secrecy::{ExposeSecret, SecretString};
use std::error::Error;
use std::sync::{Mutex, PoisonError};

use crate::bank_account::record::BankAccount;
use crate::bank_account::store::{AccountNumberUniqueness, UniquenessQuery};
use crate::encryption::{
    AccountFingerprint, AccountNumberVault, EncryptedAccountNumber, EncryptionError,
    HmacFingerprinter,
};

const CIPHER_KEY: u8 = 0x5a;

/// A reversible stand-in for the real vault. Not encryption, only enough to keep plaintext
/// out of the stored value.
pub struct TestVault {
    fingerprint_key: Vec<u8>,
    available: bool,
}

impl Default for TestVault {
    fn default() -> Self {
        Self {
            fingerprint_key: b"test-fingerprint-key".to_vec(),
            available: true,
        }
    }
}

impl TestVault {
    /// Every operation fails with [EncryptionError::KeyUnavailable]
    pub fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    fn ensure_available(&self) -> Result<(), EncryptionError> {
        if self.available {
            Ok(())
        } else {
            Err(EncryptionError::KeyUnavailable)
        }
    }
}

impl AccountNumberVault for TestVault {
    fn encrypt(
        &self,
        account_number: &SecretString,
    ) -> Result<EncryptedAccountNumber, EncryptionError> {
        self.ensure_available()?;
        let ciphertext: Vec<u8> = account_number
            .expose_secret()
            .bytes()
            .map(|b| b ^ CIPHER_KEY)
            .collect();
        Ok(EncryptedAccountNumber::from_ciphertext(&ciphertext))
    }

    fn decrypt(&self, encrypted: &EncryptedAccountNumber) -> Result<SecretString, EncryptionError> {
        self.ensure_available()?;
        let plaintext: Vec<u8> = encrypted
            .ciphertext()?
            .into_iter()
            .map(|b| b ^ CIPHER_KEY)
            .collect();
        String::from_utf8(plaintext)
            .map(SecretString::from)
            .map_err(|_| EncryptionError::DecryptionFailed)
    }

    fn fingerprint(
        &self,
        account_number: &SecretString,
    ) -> Result<AccountFingerprint, EncryptionError> {
        self.ensure_available()?;
        HmacFingerprinter::new(self.fingerprint_key.clone())?.fingerprint(account_number)
    }
}

/// Bank accounts held in memory. An account number is taken when another alive account
/// with the same country and routing number, owned by a different user, already has it.
#[derive(Default)]
pub struct InMemoryBankAccountStore {
    accounts: Mutex<Vec<BankAccount>>,
}

impl InMemoryBankAccountStore {
    /// Persists a new account, assigning its id
    pub fn insert(&self, account: BankAccount) -> BankAccount {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        let account = account.with_id(accounts.len() as u64 + 1);
        accounts.push(account.clone());
        account
    }

    /// Overwrites a persisted account. Accounts without an id are ignored.
    pub fn save(&self, account: &BankAccount) {
        let mut accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = accounts
            .iter_mut()
            .find(|existing| existing.id().is_some() && existing.id() == account.id())
        {
            *existing = account.clone();
        }
    }

    pub fn all(&self) -> Vec<BankAccount> {
        self.accounts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl AccountNumberUniqueness for InMemoryBankAccountStore {
    fn is_account_number_taken(
        &self,
        query: &UniquenessQuery,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        let accounts = self.accounts.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(accounts.iter().any(|account| {
            account.is_alive()
                && account.id() != query.exclude_id
                && (query.user_id.is_none() || account.user_id() != query.user_id)
                && account.country() == query.country
                && account.routing_number() == query.routing_number
                && account.account_fingerprint() == &query.fingerprint
        }))
    }
}
