use crate::country::Country;
use crate::secondary_validation::Validator;
use iban::{Iban, IbanLike, ParseIbanError};

/// Which country codes an IBAN may start with.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum IbanPrefix {
    Any,
    Exactly(Country),
    OneOf(&'static [Country]),
}

impl IbanPrefix {
    fn accepts(&self, country_code: &str) -> bool {
        match self {
            IbanPrefix::Any => true,
            IbanPrefix::Exactly(country) => country.alpha2() == country_code,
            IbanPrefix::OneOf(countries) => countries.iter().any(|c| c.alpha2() == country_code),
        }
    }
}

pub struct IbanChecker {
    prefix: IbanPrefix,
}

impl IbanChecker {
    pub fn new(prefix: IbanPrefix) -> Self {
        Self { prefix }
    }

    /// Country code of a checksum-valid IBAN, `None` otherwise.
    pub fn country_code(candidate: &str) -> Option<String> {
        let iban_candidate: String = candidate
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_uppercase())
            .collect();
        match iban_candidate.parse::<Iban>() {
            Ok(iban) => Some(iban.country_code().to_owned()),
            // The registry bundled with `iban_validate` lags behind newly registered IBAN
            // countries. The mod-97 check already passed for these.
            Err(ParseIbanError::UnknownCountry(base_iban)) => {
                Some(base_iban.country_code().to_owned())
            }
            Err(_) => None,
        }
    }
}

impl Validator for IbanChecker {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        if regex_match
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == ' ' || c == '-'))
        {
            return false;
        }
        match Self::country_code(regex_match) {
            Some(country_code) => self.prefix.accepts(&country_code),
            None => false,
        }
    }
}
