mod table;

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use strum::{Display, IntoEnumIterator, IntoStaticStr};

use crate::config::ValidationConfig;
use crate::country::{Country, Currency};
use crate::error::ErrorKind;
use crate::secondary_validation::{IbanChecker, IbanPrefix, SecondaryValidator, Validator};
use crate::validation::validate_and_create_regex;

/// Account numbers accepted in place of an IBAN when production-only checks are disabled.
/// Sandbox payout providers hand out test IBANs that do not satisfy the real checks.
const SANDBOX_ACCOUNT_NUMBER_PATTERN: &str = "[0-9A-Za-z]{8,34}";

lazy_static! {
    static ref SANDBOX_ACCOUNT_NUMBER: Regex = pattern(SANDBOX_ACCOUNT_NUMBER_PATTERN);

    // Every `Country` variant is inserted, so lookups by country cannot miss.
    static ref COUNTRY_RULES: BTreeMap<Country, CountryRules> = Country::iter()
        .map(|country| (country, table::country_rules(country)))
        .collect();
}

/// Compiles a pattern from the static rule table. Rules are only constructed inside the
/// crate, from literals covered by the table tests.
fn pattern(input: &str) -> Regex {
    validate_and_create_regex(input).unwrap()
}

/// A submitted value a rule can apply to.
#[derive(
    Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Field {
    RoutingNumber,
    BankCode,
    BranchCode,
    InstitutionNumber,
    TransitNumber,
    SortCode,
    ClearingCode,
    Ifsc,
    BsbNumber,
    AccountNumber,
    AccountHolderFullName,
}

impl Field {
    /// Human readable name used in error messages
    pub fn label(self) -> &'static str {
        match self {
            Field::RoutingNumber => "routing number",
            Field::BankCode => "bank code",
            Field::BranchCode => "branch code",
            Field::InstitutionNumber => "institution number",
            Field::TransitNumber => "transit number",
            Field::SortCode => "sort code",
            Field::ClearingCode => "clearing code",
            Field::Ifsc => "IFSC",
            Field::BsbNumber => "BSB number",
            Field::AccountNumber => "account number",
            Field::AccountHolderFullName => "account holder's full name",
        }
    }

    /// Key used for this field in canonical hashes
    pub fn key(self) -> &'static str {
        self.into()
    }
}

/// Format rule for a single routing identifier.
///
/// Rules come from the built-in table and cannot be built from arbitrary patterns:
///
/// ```compile_fail
/// use bank_accounts::{Field, FieldRule};
///
/// FieldRule::new(Field::BankCode, "[0-9");
/// ```
#[derive(Debug)]
pub struct FieldRule {
    pub field: Field,
    pattern: Regex,
    validator: Option<SecondaryValidator>,
}

impl FieldRule {
    pub(crate) fn new(field: Field, pattern_str: &str) -> Self {
        Self {
            field,
            pattern: pattern(pattern_str),
            validator: None,
        }
    }

    pub(crate) fn validator(mut self, validator: SecondaryValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn check(&self, value: &str) -> Result<(), ErrorKind> {
        if value.trim().is_empty() {
            return Err(ErrorKind::Presence);
        }
        if !self.pattern.is_match(value) {
            return Err(ErrorKind::Format);
        }
        match &self.validator {
            Some(validator) if !validator.is_valid_match(value) => Err(ErrorKind::Checksum),
            _ => Ok(()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IbanRule {
    pub prefix: IbanPrefix,
    /// Only enforced when the configuration enables production-only checks
    pub production_only: bool,
}

/// How the account number itself is validated.
#[derive(Debug)]
pub enum AccountNumberRule {
    Pattern {
        pattern: Regex,
        validator: Option<SecondaryValidator>,
    },
    Iban(IbanRule),
}

impl AccountNumberRule {
    pub(crate) fn pattern(pattern_str: &str) -> Self {
        AccountNumberRule::Pattern {
            pattern: pattern(pattern_str),
            validator: None,
        }
    }

    pub(crate) fn pattern_with_checksum(
        pattern_str: &str,
        validator: SecondaryValidator,
    ) -> Self {
        AccountNumberRule::Pattern {
            pattern: pattern(pattern_str),
            validator: Some(validator),
        }
    }

    pub(crate) fn iban(prefix: IbanPrefix) -> Self {
        AccountNumberRule::Iban(IbanRule {
            prefix,
            production_only: false,
        })
    }

    pub(crate) fn production_iban(prefix: IbanPrefix) -> Self {
        AccountNumberRule::Iban(IbanRule {
            prefix,
            production_only: true,
        })
    }

    pub fn is_iban(&self) -> bool {
        matches!(self, AccountNumberRule::Iban(_))
    }

    pub fn check(&self, value: &str, config: &ValidationConfig) -> Result<(), ErrorKind> {
        if value.trim().is_empty() {
            return Err(ErrorKind::Presence);
        }
        match self {
            AccountNumberRule::Pattern { pattern, validator } => {
                if !pattern.is_match(value) {
                    return Err(ErrorKind::Format);
                }
                match validator {
                    Some(validator) if !validator.is_valid_match(value) => Err(ErrorKind::Checksum),
                    _ => Ok(()),
                }
            }
            AccountNumberRule::Iban(rule) => {
                if rule.production_only && !config.enforce_production_only_checks {
                    return if SANDBOX_ACCOUNT_NUMBER.is_match(value) {
                        Ok(())
                    } else {
                        Err(ErrorKind::Format)
                    };
                }
                if IbanChecker::new(rule.prefix).is_valid_match(value) {
                    Ok(())
                } else {
                    Err(ErrorKind::Checksum)
                }
            }
        }
    }
}

/// How the masked account number is rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visual {
    /// `******1234`
    Masked,
    /// `DE******1234`
    CountryPrefixed,
}

/// Everything needed to validate and present a bank account for one country.
#[derive(Debug)]
pub struct CountryRules {
    pub country: Country,
    pub bank_account_type: &'static str,
    pub currency: Currency,
    pub identifiers: Vec<FieldRule>,
    pub account_number: AccountNumberRule,
    pub visual: Visual,
    /// Identifier fields copied into the canonical hash in addition to the common keys
    pub hash_fields: &'static [Field],
    /// Whether the account type (checking/savings) is part of this country's account
    pub has_account_type: bool,
}

impl CountryRules {
    pub fn identifier_rule(&self, field: Field) -> Option<&FieldRule> {
        self.identifiers.iter().find(|rule| rule.field == field)
    }
}

/// Rule set for a country. Total over `Country`.
pub fn rules_for(country: Country) -> &'static CountryRules {
    &COUNTRY_RULES[&country]
}
