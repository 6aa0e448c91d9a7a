use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use crate::bank_account::details::AccountType;
use crate::rules::Field;

fn deserialize_secret<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(SecretString::from)
}

/// A bank account as submitted by a user. Fields the selected country does not use are
/// ignored.
///
/// The account number is held as a secret and is only exposed to validation and to the vault.
#[derive(Deserialize, Debug)]
pub struct BankAccountForm {
    pub country_code: String,

    #[serde(deserialize_with = "deserialize_secret")]
    pub account_number: SecretString,

    #[serde(default)]
    pub account_holder_full_name: String,

    #[serde(default)]
    pub account_type: Option<AccountType>,

    #[serde(default)]
    pub user_id: Option<u64>,

    #[serde(default)]
    pub routing_number: Option<String>,
    #[serde(default)]
    pub bank_code: Option<String>,
    #[serde(default)]
    pub branch_code: Option<String>,
    #[serde(default)]
    pub institution_number: Option<String>,
    #[serde(default)]
    pub transit_number: Option<String>,
    #[serde(default)]
    pub sort_code: Option<String>,
    #[serde(default)]
    pub clearing_code: Option<String>,
    #[serde(default)]
    pub ifsc: Option<String>,
    #[serde(default)]
    pub bsb_number: Option<String>,
}

impl BankAccountForm {
    pub fn new(
        country_code: impl Into<String>,
        account_number: impl Into<String>,
        account_holder_full_name: impl Into<String>,
    ) -> Self {
        Self {
            country_code: country_code.into(),
            account_number: SecretString::from(account_number.into()),
            account_holder_full_name: account_holder_full_name.into(),
            account_type: None,
            user_id: None,
            routing_number: None,
            bank_code: None,
            branch_code: None,
            institution_number: None,
            transit_number: None,
            sort_code: None,
            clearing_code: None,
            ifsc: None,
            bsb_number: None,
        }
    }

    /// Sets a routing identifier. The account number and holder name are set through
    /// [BankAccountForm::new] and are ignored here.
    pub fn identifier(mut self, field: Field, value: impl Into<String>) -> Self {
        if let Some(slot) = self.slot_mut(field) {
            *slot = Some(value.into());
        }
        self
    }

    pub fn account_type(mut self, account_type: AccountType) -> Self {
        self.account_type = Some(account_type);
        self
    }

    pub fn user_id(mut self, user_id: u64) -> Self {
        self.user_id = Some(user_id);
        self
    }

    /// The submitted value of a routing identifier
    pub fn get(&self, field: Field) -> Option<&str> {
        let value = match field {
            Field::RoutingNumber => &self.routing_number,
            Field::BankCode => &self.bank_code,
            Field::BranchCode => &self.branch_code,
            Field::InstitutionNumber => &self.institution_number,
            Field::TransitNumber => &self.transit_number,
            Field::SortCode => &self.sort_code,
            Field::ClearingCode => &self.clearing_code,
            Field::Ifsc => &self.ifsc,
            Field::BsbNumber => &self.bsb_number,
            Field::AccountNumber | Field::AccountHolderFullName => return None,
        };
        value.as_deref()
    }

    fn slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        match field {
            Field::RoutingNumber => Some(&mut self.routing_number),
            Field::BankCode => Some(&mut self.bank_code),
            Field::BranchCode => Some(&mut self.branch_code),
            Field::InstitutionNumber => Some(&mut self.institution_number),
            Field::TransitNumber => Some(&mut self.transit_number),
            Field::SortCode => Some(&mut self.sort_code),
            Field::ClearingCode => Some(&mut self.clearing_code),
            Field::Ifsc => Some(&mut self.ifsc),
            Field::BsbNumber => Some(&mut self.bsb_number),
            Field::AccountNumber | Field::AccountHolderFullName => None,
        }
    }
}
