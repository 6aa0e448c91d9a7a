use std::fmt;

use serde::Serialize;
use strum::{Display, IntoStaticStr};
use thiserror::Error;

use crate::bank_account::state::StateTransitionError;
use crate::encryption::EncryptionError;
use crate::rules::Field;

/// Failures that are not ordinary validation results. A caller receiving one of these
/// could not even evaluate the submitted bank account.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum BankAccountError {
    #[error("Bank accounts are not supported for country `{0}`")]
    UnsupportedCountry(String),

    #[error(transparent)]
    Encryption(#[from] EncryptionError),

    #[error("The account number uniqueness check failed: {0}")]
    Uniqueness(String),

    #[error("The bank account has been deleted")]
    Deleted,

    #[error("A bank account can only be replaced by its owner")]
    OwnerMismatch,

    #[error(transparent)]
    StateTransition(#[from] StateTransitionError),
}

#[derive(
    Serialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ErrorKind {
    /// A required field is blank
    Presence,
    /// A field does not match its country pattern
    Format,
    /// A field is well formed but its check digits are wrong
    Checksum,
    /// A field is valid but refused by a payout rule
    BusinessRule,
}

/// A single validation failure.
///
/// Errors attach to the form as a whole (`base`); `field` is kept for logging and metrics
/// but the message never names the submitted value.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub kind: ErrorKind,
    pub field: Field,
    pub message: String,
}

impl ValidationError {
    pub fn new(kind: ErrorKind, field: Field) -> Self {
        let message = match kind {
            ErrorKind::Presence => format!("The {} can't be blank.", field.label()),
            // Checksum failures are reported exactly like format failures
            ErrorKind::Format | ErrorKind::Checksum | ErrorKind::BusinessRule => {
                format!("The {} is invalid.", field.label())
            }
        };
        Self {
            kind,
            field,
            message,
        }
    }

    pub fn business_rule(field: Field, message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::BusinessRule,
            field,
            message: message.into(),
        }
    }

    pub fn attribute(&self) -> &'static str {
        "base"
    }
}

/// Every validation failure found for one submission, in pipeline order.
#[derive(Serialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.message.as_str()).collect()
    }

    pub fn has(&self, kind: ErrorKind, field: Field) -> bool {
        self.0.iter().any(|e| e.kind == kind && e.field == field)
    }
}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.messages().join(" "))
    }
}

impl std::error::Error for ValidationErrors {}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn messages_do_not_distinguish_format_from_checksum() {
        let format = ValidationError::new(ErrorKind::Format, Field::RoutingNumber);
        let checksum = ValidationError::new(ErrorKind::Checksum, Field::RoutingNumber);
        assert_eq!(format.message, "The routing number is invalid.");
        assert_eq!(format.message, checksum.message);
        assert_eq!(format.attribute(), "base");
    }

    #[test]
    fn presence_message() {
        let error = ValidationError::new(ErrorKind::Presence, Field::AccountHolderFullName);
        assert_eq!(
            error.message,
            "The account holder's full name can't be blank."
        );
    }

    #[test]
    fn errors_accumulate_in_order() {
        let mut errors = ValidationErrors::new();
        assert!(errors.is_empty());
        errors.push(ValidationError::new(ErrorKind::Format, Field::BankCode));
        errors.push(ValidationError::new(
            ErrorKind::Checksum,
            Field::AccountNumber,
        ));
        assert_eq!(errors.len(), 2);
        assert!(errors.has(ErrorKind::Checksum, Field::AccountNumber));
        assert!(!errors.has(ErrorKind::Presence, Field::AccountNumber));
        assert_eq!(
            errors.to_string(),
            "The bank code is invalid. The account number is invalid."
        );
    }

    #[test]
    fn serializes_as_list() {
        let mut errors = ValidationErrors::new();
        errors.push(ValidationError::new(ErrorKind::Presence, Field::SortCode));
        assert_eq!(
            serde_json::to_string(&errors).unwrap(),
            r#"[{"kind":"presence","field":"sort_code","message":"The sort code can't be blank."}]"#
        );
    }
}
