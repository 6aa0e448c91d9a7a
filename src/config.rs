use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;
use std::collections::BTreeMap;

use crate::country::Country;
use crate::observability::labels::Labels;

fn default_enforce_production_only_checks() -> bool {
    true
}

/// Settings injected into every validation. Loaded once per process and shared read-only.
#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidationConfig {
    /// Some countries only check IBANs against the real registry in production, because
    /// sandbox payout providers issue test account numbers that fail those checks.
    #[serde(default = "default_enforce_production_only_checks")]
    pub enforce_production_only_checks: bool,

    /// Country used when a submitted code is not supported. `None` rejects unknown codes.
    #[serde(default)]
    pub fallback_country: Option<Country>,

    /// Routing numbers or bank codes that cannot receive payouts, per country
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub blocked_bank_codes: BTreeMap<Country, Vec<String>>,

    #[serde(skip)]
    pub labels: Labels,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            enforce_production_only_checks: default_enforce_production_only_checks(),
            fallback_country: None,
            blocked_bank_codes: BTreeMap::new(),
            labels: Labels::empty(),
        }
    }
}

impl ValidationConfig {
    pub fn enforce_production_only_checks(&self, enforce: bool) -> Self {
        self.mutate_clone(|x| x.enforce_production_only_checks = enforce)
    }

    pub fn fallback_country(&self, country: Country) -> Self {
        self.mutate_clone(|x| x.fallback_country = Some(country))
    }

    pub fn block_bank_code(&self, country: Country, code: impl Into<String>) -> Self {
        let code = code.into();
        self.mutate_clone(|x| x.blocked_bank_codes.entry(country).or_default().push(code))
    }

    pub fn labels(&self, labels: Labels) -> Self {
        self.mutate_clone(|x| x.labels = labels)
    }

    pub fn is_blocked(&self, country: Country, code: &str) -> bool {
        self.blocked_bank_codes
            .get(&country)
            .is_some_and(|codes| {
                codes
                    .iter()
                    .any(|blocked| blocked.eq_ignore_ascii_case(code))
            })
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn should_have_default() {
        let config = ValidationConfig::default();
        assert_eq!(
            config,
            ValidationConfig {
                enforce_production_only_checks: true,
                fallback_country: None,
                blocked_bank_codes: BTreeMap::new(),
                labels: Labels::empty(),
            }
        );
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: ValidationConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ValidationConfig::default());

        let config: ValidationConfig =
            serde_json::from_str(r#"{"blocked_bank_codes": null}"#).unwrap();
        assert!(config.blocked_bank_codes.is_empty());
    }

    #[test]
    fn deserializes_sandbox_settings() {
        let json_config = r#"{
            "enforce_production_only_checks": false,
            "fallback_country": "US",
            "blocked_bank_codes": {"PH": ["TESTPHM1XXX"]}
        }"#;
        let config: ValidationConfig = serde_json::from_str(json_config).unwrap();
        assert!(!config.enforce_production_only_checks);
        assert_eq!(config.fallback_country, Some(Country::US));
        assert!(config.is_blocked(Country::PH, "testphm1xxx"));
        assert!(!config.is_blocked(Country::KR, "TESTPHM1XXX"));
    }

    #[test]
    fn setters_do_not_mutate_original() {
        let config = ValidationConfig::default();
        let blocked = config.block_bank_code(Country::US, "021000021");
        assert!(blocked.is_blocked(Country::US, "021000021"));
        assert!(!config.is_blocked(Country::US, "021000021"));
        assert_eq!(
            config.fallback_country(Country::US).fallback_country,
            Some(Country::US)
        );
    }
}
