use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};

use crate::bank_account::details::CountryBankAccount;
use crate::bank_account::form::BankAccountForm;
use crate::bank_account::pipeline::{self, normalize_account_number, Candidate};
use crate::bank_account::presentation::last_four;
use crate::bank_account::record::{BankAccount, NewBankAccount};
use crate::bank_account::store::{self, AccountNumberUniqueness, UniquenessQuery};
use crate::config::ValidationConfig;
use crate::country::Country;
use crate::encryption::AccountNumberVault;
use crate::error::{BankAccountError, ValidationErrors};
use crate::stats::Stats;

/// Turns submitted forms into validated [BankAccount] records.
///
/// The outer `Result` of the build methods carries failures that prevented validation
/// (unsupported country, vault or store unavailable). The inner one carries the validation
/// errors of a submission that could be evaluated.
pub struct BankAccountBuilder<'a> {
    config: &'a ValidationConfig,
    stats: Stats,
}

impl<'a> BankAccountBuilder<'a> {
    pub fn new(config: &'a ValidationConfig) -> Self {
        Self {
            config,
            stats: Stats::new(&config.labels),
        }
    }

    /// Maps a submitted country code to a supported country, applying the configured
    /// fallback for unknown codes.
    pub fn resolve_country(&self, country_code: &str) -> Result<Country, BankAccountError> {
        match Country::from_code(country_code) {
            Ok(country) => Ok(country),
            Err(err) => {
                self.stats.unsupported_country.increment(1);
                match self.config.fallback_country {
                    Some(fallback) => {
                        debug!(
                            country_code,
                            fallback = %fallback,
                            "unsupported bank account country, using fallback"
                        );
                        Ok(fallback)
                    }
                    None => {
                        warn!(country_code, "unsupported bank account country");
                        Err(err)
                    }
                }
            }
        }
    }

    /// Validates a form without building a record. The uniqueness check is skipped.
    pub fn validate(&self, form: &BankAccountForm) -> Result<ValidationErrors, BankAccountError> {
        let country = self.resolve_country(&form.country_code)?;
        let details = CountryBankAccount::from_form(country, form);
        let account_number =
            normalize_account_number(form.account_number.expose_secret(), details.rules());
        let errors = pipeline::validate(
            &Candidate {
                details: &details,
                account_number: &account_number,
                account_holder_full_name: &form.account_holder_full_name,
            },
            self.config,
        );
        pipeline::record_outcome(&self.stats, country, &errors);
        Ok(errors)
    }

    pub fn build(
        &self,
        form: BankAccountForm,
        vault: &dyn AccountNumberVault,
        uniqueness: &dyn AccountNumberUniqueness,
    ) -> Result<Result<BankAccount, ValidationErrors>, BankAccountError> {
        let owner = form.user_id;
        self.build_at(form, owner, vault, uniqueness, None, Utc::now())
    }

    /// Builds the replacement of `previous`, which is soft-deleted only when the replacement
    /// is valid. The replacement belongs to the owner of `previous`: a form naming another
    /// user is refused. The uniqueness check ignores `previous`.
    pub fn replace(
        &self,
        previous: &mut BankAccount,
        form: BankAccountForm,
        vault: &dyn AccountNumberVault,
        uniqueness: &dyn AccountNumberUniqueness,
    ) -> Result<Result<BankAccount, ValidationErrors>, BankAccountError> {
        if !previous.is_alive() {
            return Err(BankAccountError::Deleted);
        }
        if form.user_id.is_some_and(|user_id| previous.user_id() != Some(user_id)) {
            return Err(BankAccountError::OwnerMismatch);
        }
        let now = Utc::now();
        let replacement = self.build_at(
            form,
            previous.user_id(),
            vault,
            uniqueness,
            previous.id(),
            now,
        )?;
        if replacement.is_ok() {
            previous.mark_deleted(now, self.config);
        }
        Ok(replacement)
    }

    fn build_at(
        &self,
        form: BankAccountForm,
        user_id: Option<u64>,
        vault: &dyn AccountNumberVault,
        uniqueness: &dyn AccountNumberUniqueness,
        exclude_id: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<Result<BankAccount, ValidationErrors>, BankAccountError> {
        let country = self.resolve_country(&form.country_code)?;
        let details = CountryBankAccount::from_form(country, &form);
        let account_number = SecretString::from(normalize_account_number(
            form.account_number.expose_secret(),
            details.rules(),
        ));
        let account_holder_full_name = form.account_holder_full_name.trim().to_owned();

        let mut errors = pipeline::validate(
            &Candidate {
                details: &details,
                account_number: account_number.expose_secret(),
                account_holder_full_name: &account_holder_full_name,
            },
            self.config,
        );
        if !errors.is_empty() {
            pipeline::record_outcome(&self.stats, country, &errors);
            return Ok(Err(errors));
        }

        let account_fingerprint = vault.fingerprint(&account_number)?;
        let query = UniquenessQuery {
            country,
            routing_number: details.routing_number(),
            fingerprint: account_fingerprint.clone(),
            exclude_id,
            user_id,
        };
        if let Some(error) = store::check_uniqueness(uniqueness, &query)? {
            errors.push(error);
        }
        pipeline::record_outcome(&self.stats, country, &errors);
        if !errors.is_empty() {
            return Ok(Err(errors));
        }

        let account = BankAccount::new(NewBankAccount {
            user_id,
            account_number: vault.encrypt(&account_number)?,
            account_number_last_four: last_four(account_number.expose_secret()),
            account_fingerprint,
            account_holder_full_name,
            details,
            created_at: now,
        });
        self.stats.created(country).increment(1);
        info!(
            country = %country,
            bank_account_type = account.bank_account_type(),
            last_four = account.account_number_last_four(),
            "bank account created"
        );
        Ok(Ok(account))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bank_account::store::NoUniquenessCheck;
    use crate::rules::Field;
    use crate::testing::TestVault;

    fn us_form() -> BankAccountForm {
        BankAccountForm::new("US", "000123456789", "Chuck Bartowski")
            .identifier(Field::RoutingNumber, "110000000")
    }

    #[test]
    fn builds_an_unverified_record() {
        let config = ValidationConfig::default();
        let account = BankAccountBuilder::new(&config)
            .build(us_form(), &TestVault::default(), &NoUniquenessCheck)
            .unwrap()
            .unwrap();
        assert_eq!(account.country(), Country::US);
        assert!(!account.is_verified());
        assert!(account.is_alive());
        assert_eq!(account.account_number_last_four(), "6789");
        assert_eq!(account.account_holder_full_name(), "Chuck Bartowski");
    }

    #[test]
    fn unsupported_country_without_fallback() {
        let config = ValidationConfig::default();
        let form = BankAccountForm::new("XX", "000123456789", "Chuck Bartowski");
        assert_eq!(
            BankAccountBuilder::new(&config)
                .build(form, &TestVault::default(), &NoUniquenessCheck)
                .unwrap_err(),
            BankAccountError::UnsupportedCountry("XX".to_string())
        );
    }

    #[test]
    fn unsupported_country_with_fallback() {
        let config = ValidationConfig::default().fallback_country(Country::US);
        let builder = BankAccountBuilder::new(&config);
        assert_eq!(builder.resolve_country("XX"), Ok(Country::US));
        assert_eq!(builder.resolve_country(" gb "), Ok(Country::GB));
    }

    #[test]
    fn vault_failures_are_errors() {
        let config = ValidationConfig::default();
        let vault = TestVault::default().unavailable();
        assert_eq!(
            BankAccountBuilder::new(&config)
                .build(us_form(), &vault, &NoUniquenessCheck)
                .unwrap_err(),
            BankAccountError::Encryption(crate::encryption::EncryptionError::KeyUnavailable)
        );
    }

    #[test]
    fn validate_reports_without_building() {
        let config = ValidationConfig::default();
        let form = BankAccountForm::new("US", "000123456789", "")
            .identifier(Field::RoutingNumber, "110000000");
        let errors = BankAccountBuilder::new(&config).validate(&form).unwrap();
        assert_eq!(
            errors.messages(),
            vec!["The account holder's full name can't be blank."]
        );
    }
}
