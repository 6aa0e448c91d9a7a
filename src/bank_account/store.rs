use std::error::Error;

use crate::bank_account::record::BankAccount;
use crate::country::Country;
use crate::encryption::AccountFingerprint;
use crate::error::{BankAccountError, ValidationError};
use crate::rules::Field;

pub(crate) const ACCOUNT_NUMBER_TAKEN_MESSAGE: &str = "This account number is already in use.";

/// The account a new or updated bank account would collide with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UniquenessQuery {
    pub country: Country,
    pub routing_number: Option<String>,
    pub fingerprint: AccountFingerprint,
    /// The record being updated or replaced, which never collides with itself
    pub exclude_id: Option<u64>,
    pub user_id: Option<u64>,
}

/// Lookup against persisted bank accounts. The policy for what counts as "taken" belongs
/// to the store.
pub trait AccountNumberUniqueness: Send + Sync {
    fn is_account_number_taken(
        &self,
        query: &UniquenessQuery,
    ) -> Result<bool, Box<dyn Error + Send + Sync>>;
}

/// Accepts every account number
#[derive(Clone, Copy, Debug, Default)]
pub struct NoUniquenessCheck;

impl AccountNumberUniqueness for NoUniquenessCheck {
    fn is_account_number_taken(
        &self,
        _query: &UniquenessQuery,
    ) -> Result<bool, Box<dyn Error + Send + Sync>> {
        Ok(false)
    }
}

pub(crate) fn check_uniqueness(
    uniqueness: &dyn AccountNumberUniqueness,
    query: &UniquenessQuery,
) -> Result<Option<ValidationError>, BankAccountError> {
    let taken = uniqueness
        .is_account_number_taken(query)
        .map_err(|err| BankAccountError::Uniqueness(err.to_string()))?;
    Ok(taken.then(|| {
        ValidationError::business_rule(Field::AccountNumber, ACCOUNT_NUMBER_TAKEN_MESSAGE)
    }))
}

/// Accounts that have not been soft-deleted
pub fn alive<'a>(
    accounts: impl IntoIterator<Item = &'a BankAccount>,
) -> impl Iterator<Item = &'a BankAccount> {
    accounts.into_iter().filter(|account| account.is_alive())
}

/// The account payouts are sent to: the most recently created alive one.
pub fn active_payout_destination<'a>(
    accounts: impl IntoIterator<Item = &'a BankAccount>,
) -> Option<&'a BankAccount> {
    alive(accounts).max_by_key(|account| account.created_at())
}
