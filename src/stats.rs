use metrics::{counter, Counter};

use crate::country::Country;
use crate::error::ErrorKind;
use crate::observability::labels::Labels;

const KIND: &str = "kind";

/// Counters emitted by bank account creation and lifecycle changes.
///
/// Handles are resolved against the recorder installed when they are created, so a
/// `Stats` is built per operation rather than kept in a global.
pub struct Stats {
    labels: Labels,
    pub unsupported_country: Counter,
}

impl Stats {
    pub fn new(labels: &Labels) -> Self {
        Stats {
            labels: labels.clone(),
            unsupported_country: counter!("bank_account.unsupported_country", labels.clone()),
        }
    }

    /// Every validation run, whatever its outcome
    pub fn validations(&self, country: Country) -> Counter {
        counter!(
            "bank_account.validations",
            self.labels.with_country(country)
        )
    }

    pub fn validation_failures(&self, country: Country, kind: ErrorKind) -> Counter {
        let kind: &'static str = kind.into();
        counter!(
            "bank_account.validation_failures",
            self.labels
                .with_country(country)
                .clone_with_labels(&[(KIND, kind)])
        )
    }

    pub fn created(&self, country: Country) -> Counter {
        counter!("bank_account.created", self.labels.with_country(country))
    }

    pub fn verified(&self, country: Country) -> Counter {
        counter!("bank_account.verified", self.labels.with_country(country))
    }

    pub fn deleted(&self, country: Country) -> Counter {
        counter!("bank_account.deleted", self.labels.with_country(country))
    }
}

impl Default for Stats {
    fn default() -> Self {
        Stats::new(&Labels::empty())
    }
}
