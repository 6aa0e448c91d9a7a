mod aba_rtn_checksum;
mod cbu_checksum;
mod clabe_checksum;
mod iban_checker;

pub use crate::secondary_validation::aba_rtn_checksum::AbaRtnChecksum;
pub use crate::secondary_validation::cbu_checksum::CbuChecksum;
pub use crate::secondary_validation::clabe_checksum::ClabeChecksum;
pub use crate::secondary_validation::iban_checker::{IbanChecker, IbanPrefix};

pub trait Validator: Send + Sync {
    fn is_valid_match(&self, regex_match: &str) -> bool;
}

/// Check digit algorithms a country rule can attach to an identifier.
#[derive(Clone, Debug, PartialEq)]
pub enum SecondaryValidator {
    AbaRtnChecksum,
    ClabeChecksum,
    CbuChecksum,
    IbanChecker(IbanPrefix),
}

/// Returns the decimal digits of the input, or `None` if any character is not an ASCII digit.
fn digits(input: &str) -> Option<Vec<u32>> {
    input.chars().map(|c| c.to_digit(10)).collect()
}

/// Weighted sum of the digits, keeping only the last decimal digit of every product.
#[inline]
fn weighted_unit_sum(digits: &[u32], weights: &[u32]) -> u32 {
    digits
        .iter()
        .zip(weights.iter().cycle())
        .map(|(digit, weight)| (digit * weight) % 10)
        .sum()
}

impl Validator for SecondaryValidator {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        match self {
            SecondaryValidator::AbaRtnChecksum => AbaRtnChecksum.is_valid_match(regex_match),
            SecondaryValidator::ClabeChecksum => ClabeChecksum.is_valid_match(regex_match),
            SecondaryValidator::CbuChecksum => CbuChecksum.is_valid_match(regex_match),
            SecondaryValidator::IbanChecker(prefix) => {
                IbanChecker::new(*prefix).is_valid_match(regex_match)
            }
        }
    }
}
