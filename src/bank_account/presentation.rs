use serde::Serialize;
use std::collections::BTreeMap;

use crate::bank_account::details::CountryBankAccount;
use crate::rules::Visual;

const MASK: &str = "******";
const ACCOUNT_TYPE: &str = "account_type";

/// The trailing characters of an account number kept for display.
///
/// Short account numbers keep at least one character masked.
pub fn last_four(account_number: &str) -> String {
    let chars: Vec<char> = account_number.chars().collect();
    let keep = if chars.len() > 4 {
        4
    } else {
        chars.len().saturating_sub(1)
    };
    chars[chars.len() - keep..].iter().collect()
}

/// `******1234`, or `DE******1234` where account numbers are IBANs.
pub fn account_number_visual(details: &CountryBankAccount, last_four: &str) -> String {
    match details.rules().visual {
        Visual::Masked => format!("{MASK}{last_four}"),
        Visual::CountryPrefixed => format!("{}{MASK}{last_four}", details.country().alpha2()),
    }
}

/// Payout-safe summary of a bank account, handed to payout providers and the UI.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct CanonicalHash {
    pub routing_number: Option<String>,
    pub account_number: String,
    pub bank_account_type: &'static str,
    #[serde(flatten)]
    pub extra: BTreeMap<&'static str, String>,
}

pub fn canonical_hash(details: &CountryBankAccount, last_four: &str) -> CanonicalHash {
    let rules = details.rules();
    let mut extra: BTreeMap<&'static str, String> = rules
        .hash_fields
        .iter()
        .filter_map(|field| {
            details
                .identifier(*field)
                .map(|value| (field.key(), value.to_owned()))
        })
        .collect();
    if let Some(account_type) = details.account_type() {
        extra.insert(ACCOUNT_TYPE, account_type.to_string());
    }
    CanonicalHash {
        routing_number: details.routing_number(),
        account_number: account_number_visual(details, last_four),
        bank_account_type: rules.bank_account_type,
        extra,
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bank_account::form::BankAccountForm;
    use crate::country::Country;
    use crate::rules::Field;
    use serde_json::json;

    #[test]
    fn keeps_last_four_characters() {
        assert_eq!(last_four("000123456789"), "6789");
        assert_eq!(last_four("DE89370400440532013000"), "3000");
        assert_eq!(last_four("12345"), "2345");
    }

    #[test]
    fn short_account_numbers_stay_partially_masked() {
        assert_eq!(last_four("1234"), "234");
        assert_eq!(last_four("12"), "2");
        assert_eq!(last_four("1"), "");
        assert_eq!(last_four(""), "");
    }

    #[test]
    fn visual_by_country() {
        assert_eq!(
            account_number_visual(&CountryBankAccount::empty(Country::US), "6789"),
            "******6789"
        );
        assert_eq!(
            account_number_visual(&CountryBankAccount::empty(Country::DE), "3000"),
            "DE******3000"
        );
        assert_eq!(
            account_number_visual(&CountryBankAccount::empty(Country::OM), "3456"),
            "OM******3456"
        );
    }

    #[test]
    fn us_hash_includes_account_type() {
        let form = BankAccountForm::new("US", "000123456789", "Chuck Bartowski")
            .identifier(Field::RoutingNumber, "110000000");
        let details = CountryBankAccount::from_form(Country::US, &form);
        assert_eq!(
            serde_json::to_value(canonical_hash(&details, "6789")).unwrap(),
            json!({
                "routing_number": "110000000",
                "account_number": "******6789",
                "bank_account_type": "ACH",
                "account_type": "checking",
            })
        );
    }

    #[test]
    fn canada_hash_includes_identifiers() {
        let form = BankAccountForm::new("CA", "000123456789", "Chuck Bartowski")
            .identifier(Field::InstitutionNumber, "000")
            .identifier(Field::TransitNumber, "11000");
        let details = CountryBankAccount::from_form(Country::CA, &form);
        assert_eq!(
            serde_json::to_value(canonical_hash(&details, "6789")).unwrap(),
            json!({
                "routing_number": "11000-000",
                "account_number": "******6789",
                "bank_account_type": "CANADIAN",
                "institution_number": "000",
                "transit_number": "11000",
            })
        );
    }

    #[test]
    fn iban_hash_has_no_routing_number() {
        let details = CountryBankAccount::empty(Country::FR);
        assert_eq!(
            serde_json::to_value(canonical_hash(&details, "2606")).unwrap(),
            json!({
                "routing_number": null,
                "account_number": "FR******2606",
                "bank_account_type": "EUROPEAN",
            })
        );
    }
}
