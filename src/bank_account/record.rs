use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::bank_account::details::{AccountType, CountryBankAccount};
use crate::bank_account::pipeline::{self, normalize_account_number, Candidate};
use crate::bank_account::presentation::{self, CanonicalHash};
use crate::bank_account::state::{VerificationEvent, VerificationState};
use crate::bank_account::store::{self, AccountNumberUniqueness, UniquenessQuery};
use crate::config::ValidationConfig;
use crate::country::{Country, Currency};
use crate::encryption::{AccountFingerprint, AccountNumberVault, EncryptedAccountNumber};
use crate::error::{BankAccountError, ValidationErrors};
use crate::rules::Field;
use crate::stats::Stats;

pub(crate) struct NewBankAccount {
    pub user_id: Option<u64>,
    pub details: CountryBankAccount,
    pub account_number: EncryptedAccountNumber,
    pub account_number_last_four: String,
    pub account_fingerprint: AccountFingerprint,
    pub account_holder_full_name: String,
    pub created_at: DateTime<Utc>,
}

/// A validated bank account. Only ever built through
/// [BankAccountBuilder](crate::BankAccountBuilder), so every record passed validation
/// when it was created.
#[derive(Clone, Debug)]
pub struct BankAccount {
    id: Option<u64>,
    user_id: Option<u64>,
    details: CountryBankAccount,
    account_number: EncryptedAccountNumber,
    account_number_last_four: String,
    account_fingerprint: AccountFingerprint,
    account_holder_full_name: String,
    state: VerificationState,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

/// Corrections applied to an existing record by [BankAccount::update]. Unset fields keep
/// their current value.
#[derive(Debug, Default)]
pub struct BankAccountChanges {
    identifiers: BTreeMap<Field, String>,
    account_number: Option<SecretString>,
    account_holder_full_name: Option<String>,
    account_type: Option<AccountType>,
}

impl BankAccountChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(mut self, field: Field, value: impl Into<String>) -> Self {
        self.identifiers.insert(field, value.into());
        self
    }

    pub fn account_number(mut self, account_number: impl Into<String>) -> Self {
        self.account_number = Some(SecretString::from(account_number.into()));
        self
    }

    pub fn account_holder_full_name(mut self, name: impl Into<String>) -> Self {
        self.account_holder_full_name = Some(name.into());
        self
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }
}

impl BankAccount {
    pub(crate) fn new(new: NewBankAccount) -> Self {
        Self {
            id: None,
            user_id: new.user_id,
            details: new.details,
            account_number: new.account_number,
            account_number_last_four: new.account_number_last_four,
            account_fingerprint: new.account_fingerprint,
            account_holder_full_name: new.account_holder_full_name,
            state: VerificationState::default(),
            created_at: new.created_at,
            deleted_at: None,
        }
    }

    /// Assigned by the store when the record is persisted
    pub fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    pub fn details(&self) -> &CountryBankAccount {
        &self.details
    }

    pub fn country(&self) -> Country {
        self.details.country()
    }

    pub fn currency(&self) -> Currency {
        self.details.currency()
    }

    pub fn bank_account_type(&self) -> &'static str {
        self.details.bank_account_type()
    }

    pub fn routing_number(&self) -> Option<String> {
        self.details.routing_number()
    }

    pub fn account_type(&self) -> Option<AccountType> {
        self.details.account_type()
    }

    pub fn encrypted_account_number(&self) -> &EncryptedAccountNumber {
        &self.account_number
    }

    pub fn account_number_last_four(&self) -> &str {
        &self.account_number_last_four
    }

    pub fn account_fingerprint(&self) -> &AccountFingerprint {
        &self.account_fingerprint
    }

    pub fn account_holder_full_name(&self) -> &str {
        &self.account_holder_full_name
    }

    pub fn state(&self) -> VerificationState {
        self.state
    }

    pub fn is_verified(&self) -> bool {
        self.state == VerificationState::Verified
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    pub fn is_alive(&self) -> bool {
        self.deleted_at.is_none()
    }

    /// Deleted accounts never receive payouts. Verification is not required.
    pub fn is_eligible_payout_destination(&self) -> bool {
        self.is_alive()
    }

    pub fn account_number_visual(&self) -> String {
        presentation::account_number_visual(&self.details, &self.account_number_last_four)
    }

    pub fn to_canonical_hash(&self) -> CanonicalHash {
        presentation::canonical_hash(&self.details, &self.account_number_last_four)
    }

    pub fn mark_verified(&mut self, config: &ValidationConfig) -> Result<(), BankAccountError> {
        self.state = self.state.transition(VerificationEvent::MarkVerified)?;
        Stats::new(&config.labels)
            .verified(self.country())
            .increment(1);
        info!(id = ?self.id, country = %self.country(), "bank account verified");
        Ok(())
    }

    /// Soft-deletes the record. Deleting twice keeps the first timestamp.
    pub fn mark_deleted(&mut self, at: DateTime<Utc>, config: &ValidationConfig) {
        if self.deleted_at.is_some() {
            return;
        }
        self.deleted_at = Some(at);
        Stats::new(&config.labels)
            .deleted(self.country())
            .increment(1);
        info!(id = ?self.id, country = %self.country(), "bank account deleted");
    }

    /// Runs the validation pipeline again against the stored values, for instance after the
    /// country rules changed.
    pub fn revalidate(
        &self,
        vault: &dyn AccountNumberVault,
        config: &ValidationConfig,
    ) -> Result<ValidationErrors, BankAccountError> {
        let account_number = vault.decrypt(&self.account_number)?;
        let errors = pipeline::validate(
            &Candidate {
                details: &self.details,
                account_number: account_number.expose_secret(),
                account_holder_full_name: &self.account_holder_full_name,
            },
            config,
        );
        pipeline::record_outcome(&Stats::new(&config.labels), self.country(), &errors);
        Ok(errors)
    }

    /// Applies a correction. Either every change is applied or, when the result fails
    /// validation, none is. A new account number or routing number resets verification;
    /// other corrections keep it.
    pub fn update(
        &mut self,
        changes: BankAccountChanges,
        vault: &dyn AccountNumberVault,
        uniqueness: &dyn AccountNumberUniqueness,
        config: &ValidationConfig,
    ) -> Result<Result<(), ValidationErrors>, BankAccountError> {
        if !self.is_alive() {
            return Err(BankAccountError::Deleted);
        }

        let mut details = self.details.clone();
        for (field, slot) in details.identifiers_mut() {
            if let Some(value) = changes.identifiers.get(&field) {
                *slot = value.trim().to_owned();
            }
        }
        if let Some(account_type) = changes.account_type {
            details.set_account_type(account_type);
        }
        let account_holder_full_name = match &changes.account_holder_full_name {
            Some(name) => name.trim().to_owned(),
            None => self.account_holder_full_name.clone(),
        };
        let account_number_changed = changes.account_number.is_some();
        let account_number = match &changes.account_number {
            Some(raw) => SecretString::from(normalize_account_number(
                raw.expose_secret(),
                details.rules(),
            )),
            None => vault.decrypt(&self.account_number)?,
        };

        let stats = Stats::new(&config.labels);
        let mut errors = pipeline::validate(
            &Candidate {
                details: &details,
                account_number: account_number.expose_secret(),
                account_holder_full_name: &account_holder_full_name,
            },
            config,
        );
        let fingerprint = if errors.is_empty() {
            let fingerprint = vault.fingerprint(&account_number)?;
            let query = UniquenessQuery {
                country: details.country(),
                routing_number: details.routing_number(),
                fingerprint: fingerprint.clone(),
                exclude_id: self.id,
                user_id: self.user_id,
            };
            if let Some(error) = store::check_uniqueness(uniqueness, &query)? {
                errors.push(error);
            }
            Some(fingerprint)
        } else {
            None
        };
        pipeline::record_outcome(&stats, details.country(), &errors);

        let Some(fingerprint) = fingerprint.filter(|_| errors.is_empty()) else {
            return Ok(Err(errors));
        };
        let reroutes = fingerprint != self.account_fingerprint
            || details.routing_number() != self.details.routing_number();
        if account_number_changed {
            self.account_number = vault.encrypt(&account_number)?;
            self.account_number_last_four =
                presentation::last_four(account_number.expose_secret());
        }
        if reroutes {
            self.state = VerificationState::Unverified;
        }
        self.account_fingerprint = fingerprint;
        self.details = details;
        self.account_holder_full_name = account_holder_full_name;
        debug!(id = ?self.id, country = %self.country(), reroutes, "bank account updated");
        Ok(Ok(()))
    }
}
