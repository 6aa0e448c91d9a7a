use tracing::debug;

use crate::bank_account::details::CountryBankAccount;
use crate::config::ValidationConfig;
use crate::country::Country;
use crate::error::{ErrorKind, ValidationError, ValidationErrors};
use crate::rules::{CountryRules, Field};
use crate::stats::Stats;

pub(crate) const BLOCKED_BANK_MESSAGE: &str = "Payouts to this bank are not supported.";

/// A bank account about to be validated, with its account number already normalized.
pub(crate) struct Candidate<'a> {
    pub details: &'a CountryBankAccount,
    pub account_number: &'a str,
    pub account_holder_full_name: &'a str,
}

type Check = fn(&Candidate<'_>, &ValidationConfig, &mut ValidationErrors);

/// Every check runs, so a submission reports all of its problems at once.
const CHECKS: &[Check] = &[
    check_account_holder_full_name,
    check_identifiers,
    check_account_number,
    check_blocked_bank,
];

pub(crate) fn validate(candidate: &Candidate<'_>, config: &ValidationConfig) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    for check in CHECKS {
        check(candidate, config, &mut errors);
    }
    errors
}

pub(crate) fn record_outcome(stats: &Stats, country: Country, errors: &ValidationErrors) {
    stats.validations(country).increment(1);
    for error in errors.iter() {
        stats.validation_failures(country, error.kind).increment(1);
    }
    if !errors.is_empty() {
        let fields: Vec<&'static str> = errors.iter().map(|e| e.field.key()).collect();
        debug!(country = %country, ?fields, "bank account failed validation");
    }
}

/// Strips whitespace users paste along with account numbers. IBANs are also upper-cased.
pub fn normalize_account_number(raw: &str, rules: &CountryRules) -> String {
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if rules.account_number.is_iban() {
        stripped.to_ascii_uppercase()
    } else {
        stripped
    }
}

fn check_account_holder_full_name(
    candidate: &Candidate<'_>,
    _config: &ValidationConfig,
    errors: &mut ValidationErrors,
) {
    if candidate.account_holder_full_name.trim().is_empty() {
        errors.push(ValidationError::new(
            ErrorKind::Presence,
            Field::AccountHolderFullName,
        ));
    }
}

fn check_identifiers(
    candidate: &Candidate<'_>,
    _config: &ValidationConfig,
    errors: &mut ValidationErrors,
) {
    let rules = candidate.details.rules();
    for (field, value) in candidate.details.identifiers() {
        let Some(rule) = rules.identifier_rule(field) else {
            continue;
        };
        if let Err(kind) = rule.check(value) {
            errors.push(ValidationError::new(kind, field));
        }
    }
}

fn check_account_number(
    candidate: &Candidate<'_>,
    config: &ValidationConfig,
    errors: &mut ValidationErrors,
) {
    let rules = candidate.details.rules();
    if let Err(kind) = rules.account_number.check(candidate.account_number, config) {
        errors.push(ValidationError::new(kind, Field::AccountNumber));
    }
}

fn check_blocked_bank(
    candidate: &Candidate<'_>,
    config: &ValidationConfig,
    errors: &mut ValidationErrors,
) {
    let country = candidate.details.country();
    let blocked_identifier = candidate
        .details
        .identifiers()
        .into_iter()
        .find(|(_, value)| !value.is_empty() && config.is_blocked(country, value))
        .map(|(field, _)| field);
    let blocked = blocked_identifier.or_else(|| {
        candidate
            .details
            .routing_number()
            .filter(|routing_number| config.is_blocked(country, routing_number))
            .map(|_| Field::RoutingNumber)
    });
    if let Some(field) = blocked {
        errors.push(ValidationError::business_rule(field, BLOCKED_BANK_MESSAGE));
    }
}
