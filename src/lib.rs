// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod bank_account;
mod config;
mod country;
mod encryption;
mod error;
mod observability;
mod rules;
mod secondary_validation;
mod stats;
mod validation;

#[cfg(any(test, feature = "testing", feature = "bench"))]
pub mod testing;

// This is the public API of the bank accounts library
pub use bank_account::builder::BankAccountBuilder;
pub use bank_account::details::{AccountType, CountryBankAccount};
pub use bank_account::form::BankAccountForm;
pub use bank_account::normalize_account_number;
pub use bank_account::presentation::{
    account_number_visual, canonical_hash, last_four, CanonicalHash,
};
pub use bank_account::record::{BankAccount, BankAccountChanges};
pub use bank_account::state::{StateTransitionError, VerificationEvent, VerificationState};
pub use bank_account::store::{
    active_payout_destination, alive, AccountNumberUniqueness, NoUniquenessCheck, UniquenessQuery,
};
pub use config::ValidationConfig;
pub use country::{Country, Currency, EUROZONE};
pub use encryption::{
    AccountFingerprint, AccountNumberVault, EncryptedAccountNumber, EncryptionError,
    HmacFingerprinter,
};
pub use error::{BankAccountError, ErrorKind, ValidationError, ValidationErrors};
pub use observability::labels::Labels;
pub use rules::{rules_for, AccountNumberRule, CountryRules, Field, FieldRule, IbanRule, Visual};
pub use secondary_validation::{IbanPrefix, SecondaryValidator, Validator};
pub use validation::{validate_regex, RegexValidationError};

#[cfg(any(feature = "testing", feature = "bench"))]
pub use crate::secondary_validation::{AbaRtnChecksum, CbuChecksum, ClabeChecksum, IbanChecker};
