use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::bank_account::form::BankAccountForm;
use crate::country::{Country, Currency};
use crate::rules::{rules_for, CountryRules, Field};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AccountType {
    #[default]
    Checking,
    Savings,
}

/// Country specific routing details of a bank account. One variant per supported country;
/// the eurozone shares a single variant.
///
/// The account number is not part of this type, it only lives encrypted on the record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CountryBankAccount {
    UnitedStates {
        routing_number: String,
        account_type: AccountType,
    },
    Canada {
        institution_number: String,
        transit_number: String,
    },
    Australia {
        bsb_number: String,
    },
    UnitedKingdom {
        sort_code: String,
    },
    HongKong {
        clearing_code: String,
        branch_code: String,
    },
    Singapore {
        bank_code: String,
        branch_code: String,
    },
    NewZealand,
    Japan {
        bank_code: String,
        branch_code: String,
    },
    Korea {
        bank_code: String,
    },
    India {
        ifsc: String,
    },
    Thailand {
        bank_code: String,
    },
    Philippines {
        bank_code: String,
    },
    Vietnam {
        bank_code: String,
    },
    Taiwan {
        bank_code: String,
    },
    Indonesia {
        bank_code: String,
    },
    Cambodia {
        bank_code: String,
    },
    TrinidadAndTobago {
        bank_code: String,
        branch_code: String,
    },
    Chile {
        bank_code: String,
        account_type: AccountType,
    },
    Colombia {
        bank_code: String,
        account_type: AccountType,
    },
    Bolivia {
        bank_code: String,
    },
    Mexico,
    Argentina,
    Peru,
    SouthAfrica {
        bank_code: String,
    },
    Kenya {
        bank_code: String,
    },
    Morocco {
        bank_code: String,
    },
    Switzerland,
    Poland,
    CzechRepublic,
    Bulgaria,
    Denmark,
    Hungary,
    Romania,
    Sweden,
    Norway,
    Israel,
    UnitedArabEmirates,
    CostaRica,
    Oman {
        bank_code: String,
    },
    Kazakhstan {
        bank_code: String,
    },
    Egypt {
        bank_code: String,
    },
    Pakistan {
        bank_code: String,
    },
    Turkey {
        bank_code: String,
    },
    SaudiArabia {
        bank_code: String,
    },
    Serbia {
        bank_code: String,
    },
    Europe {
        country: Country,
    },
}

impl CountryBankAccount {
    /// The variant for a country, with blank identifier fields.
    pub fn empty(country: Country) -> Self {
        use Country::*;

        match country {
            US => Self::UnitedStates {
                routing_number: String::new(),
                account_type: AccountType::default(),
            },
            CA => Self::Canada {
                institution_number: String::new(),
                transit_number: String::new(),
            },
            AU => Self::Australia {
                bsb_number: String::new(),
            },
            GB => Self::UnitedKingdom {
                sort_code: String::new(),
            },
            HK => Self::HongKong {
                clearing_code: String::new(),
                branch_code: String::new(),
            },
            SG => Self::Singapore {
                bank_code: String::new(),
                branch_code: String::new(),
            },
            NZ => Self::NewZealand,
            JP => Self::Japan {
                bank_code: String::new(),
                branch_code: String::new(),
            },
            KR => Self::Korea {
                bank_code: String::new(),
            },
            IN => Self::India {
                ifsc: String::new(),
            },
            TH => Self::Thailand {
                bank_code: String::new(),
            },
            PH => Self::Philippines {
                bank_code: String::new(),
            },
            VN => Self::Vietnam {
                bank_code: String::new(),
            },
            TW => Self::Taiwan {
                bank_code: String::new(),
            },
            ID => Self::Indonesia {
                bank_code: String::new(),
            },
            KH => Self::Cambodia {
                bank_code: String::new(),
            },
            TT => Self::TrinidadAndTobago {
                bank_code: String::new(),
                branch_code: String::new(),
            },
            CL => Self::Chile {
                bank_code: String::new(),
                account_type: AccountType::default(),
            },
            CO => Self::Colombia {
                bank_code: String::new(),
                account_type: AccountType::default(),
            },
            BO => Self::Bolivia {
                bank_code: String::new(),
            },
            MX => Self::Mexico,
            AR => Self::Argentina,
            PE => Self::Peru,
            ZA => Self::SouthAfrica {
                bank_code: String::new(),
            },
            KE => Self::Kenya {
                bank_code: String::new(),
            },
            MA => Self::Morocco {
                bank_code: String::new(),
            },
            CH => Self::Switzerland,
            PL => Self::Poland,
            CZ => Self::CzechRepublic,
            BG => Self::Bulgaria,
            DK => Self::Denmark,
            HU => Self::Hungary,
            RO => Self::Romania,
            SE => Self::Sweden,
            NO => Self::Norway,
            IL => Self::Israel,
            AE => Self::UnitedArabEmirates,
            CR => Self::CostaRica,
            OM => Self::Oman {
                bank_code: String::new(),
            },
            KZ => Self::Kazakhstan {
                bank_code: String::new(),
            },
            EG => Self::Egypt {
                bank_code: String::new(),
            },
            PK => Self::Pakistan {
                bank_code: String::new(),
            },
            TR => Self::Turkey {
                bank_code: String::new(),
            },
            SA => Self::SaudiArabia {
                bank_code: String::new(),
            },
            RS => Self::Serbia {
                bank_code: String::new(),
            },
            AT | BE | CY | DE | EE | ES | FI | FR | GR | HR | IE | IT | LT | LU | LV | MT | NL
            | PT | SI | SK => Self::Europe { country },
        }
    }

    /// Copies the fields this country uses out of a submitted form. Missing fields stay
    /// blank and are reported by the presence checks.
    pub fn from_form(country: Country, form: &BankAccountForm) -> Self {
        let mut details = Self::empty(country);
        for (field, slot) in details.identifiers_mut() {
            *slot = form.get(field).unwrap_or_default().trim().to_owned();
        }
        if let Some(account_type) = form.account_type {
            details.set_account_type(account_type);
        }
        details
    }

    pub fn country(&self) -> Country {
        match self {
            Self::UnitedStates { .. } => Country::US,
            Self::Canada { .. } => Country::CA,
            Self::Australia { .. } => Country::AU,
            Self::UnitedKingdom { .. } => Country::GB,
            Self::HongKong { .. } => Country::HK,
            Self::Singapore { .. } => Country::SG,
            Self::NewZealand => Country::NZ,
            Self::Japan { .. } => Country::JP,
            Self::Korea { .. } => Country::KR,
            Self::India { .. } => Country::IN,
            Self::Thailand { .. } => Country::TH,
            Self::Philippines { .. } => Country::PH,
            Self::Vietnam { .. } => Country::VN,
            Self::Taiwan { .. } => Country::TW,
            Self::Indonesia { .. } => Country::ID,
            Self::Cambodia { .. } => Country::KH,
            Self::TrinidadAndTobago { .. } => Country::TT,
            Self::Chile { .. } => Country::CL,
            Self::Colombia { .. } => Country::CO,
            Self::Bolivia { .. } => Country::BO,
            Self::Mexico => Country::MX,
            Self::Argentina => Country::AR,
            Self::Peru => Country::PE,
            Self::SouthAfrica { .. } => Country::ZA,
            Self::Kenya { .. } => Country::KE,
            Self::Morocco { .. } => Country::MA,
            Self::Switzerland => Country::CH,
            Self::Poland => Country::PL,
            Self::CzechRepublic => Country::CZ,
            Self::Bulgaria => Country::BG,
            Self::Denmark => Country::DK,
            Self::Hungary => Country::HU,
            Self::Romania => Country::RO,
            Self::Sweden => Country::SE,
            Self::Norway => Country::NO,
            Self::Israel => Country::IL,
            Self::UnitedArabEmirates => Country::AE,
            Self::CostaRica => Country::CR,
            Self::Oman { .. } => Country::OM,
            Self::Kazakhstan { .. } => Country::KZ,
            Self::Egypt { .. } => Country::EG,
            Self::Pakistan { .. } => Country::PK,
            Self::Turkey { .. } => Country::TR,
            Self::SaudiArabia { .. } => Country::SA,
            Self::Serbia { .. } => Country::RS,
            Self::Europe { country } => *country,
        }
    }

    pub fn rules(&self) -> &'static CountryRules {
        rules_for(self.country())
    }

    pub fn currency(&self) -> Currency {
        self.rules().currency
    }

    pub fn bank_account_type(&self) -> &'static str {
        self.rules().bank_account_type
    }

    /// The identifier that routes funds to the receiving institution, derived from the
    /// country's identifier fields. `None` when the account number carries it (IBAN, CLABE, ...).
    pub fn routing_number(&self) -> Option<String> {
        match self {
            Self::UnitedStates { routing_number, .. } => Some(routing_number.clone()),
            Self::Canada {
                institution_number,
                transit_number,
            } => Some(format!("{transit_number}-{institution_number}")),
            Self::Australia { bsb_number } => Some(bsb_number.clone()),
            Self::UnitedKingdom { sort_code } => Some(sort_code.clone()),
            Self::HongKong {
                clearing_code,
                branch_code,
            } => Some(format!("{clearing_code}-{branch_code}")),
            Self::Singapore {
                bank_code,
                branch_code,
            } => Some(format!("{bank_code}-{branch_code}")),
            Self::Japan {
                bank_code,
                branch_code,
            }
            | Self::TrinidadAndTobago {
                bank_code,
                branch_code,
            } => Some(format!("{bank_code}{branch_code}")),
            Self::India { ifsc } => Some(ifsc.clone()),
            Self::Korea { bank_code }
            | Self::Thailand { bank_code }
            | Self::Philippines { bank_code }
            | Self::Vietnam { bank_code }
            | Self::Taiwan { bank_code }
            | Self::Indonesia { bank_code }
            | Self::Cambodia { bank_code }
            | Self::Chile { bank_code, .. }
            | Self::Colombia { bank_code, .. }
            | Self::Bolivia { bank_code }
            | Self::SouthAfrica { bank_code }
            | Self::Kenya { bank_code }
            | Self::Morocco { bank_code }
            | Self::Oman { bank_code }
            | Self::Kazakhstan { bank_code }
            | Self::Egypt { bank_code }
            | Self::Pakistan { bank_code }
            | Self::Turkey { bank_code }
            | Self::SaudiArabia { bank_code }
            | Self::Serbia { bank_code } => Some(bank_code.clone()),
            Self::NewZealand
            | Self::Mexico
            | Self::Argentina
            | Self::Peru
            | Self::Switzerland
            | Self::Poland
            | Self::CzechRepublic
            | Self::Bulgaria
            | Self::Denmark
            | Self::Hungary
            | Self::Romania
            | Self::Sweden
            | Self::Norway
            | Self::Israel
            | Self::UnitedArabEmirates
            | Self::CostaRica
            | Self::Europe { .. } => None,
        }
    }

    pub fn account_type(&self) -> Option<AccountType> {
        match self {
            Self::UnitedStates { account_type, .. }
            | Self::Chile { account_type, .. }
            | Self::Colombia { account_type, .. } => Some(*account_type),
            _ => None,
        }
    }

    /// Ignored for countries without account types.
    pub fn set_account_type(&mut self, new_account_type: AccountType) {
        match self {
            Self::UnitedStates { account_type, .. }
            | Self::Chile { account_type, .. }
            | Self::Colombia { account_type, .. } => *account_type = new_account_type,
            _ => {}
        }
    }

    /// Identifier values in validation order.
    pub fn identifiers(&self) -> Vec<(Field, &str)> {
        match self {
            Self::UnitedStates { routing_number, .. } => {
                vec![(Field::RoutingNumber, routing_number.as_str())]
            }
            Self::Canada {
                institution_number,
                transit_number,
            } => vec![
                (Field::InstitutionNumber, institution_number.as_str()),
                (Field::TransitNumber, transit_number.as_str()),
            ],
            Self::Australia { bsb_number } => vec![(Field::BsbNumber, bsb_number.as_str())],
            Self::UnitedKingdom { sort_code } => vec![(Field::SortCode, sort_code.as_str())],
            Self::HongKong {
                clearing_code,
                branch_code,
            } => vec![
                (Field::ClearingCode, clearing_code.as_str()),
                (Field::BranchCode, branch_code.as_str()),
            ],
            Self::Singapore {
                bank_code,
                branch_code,
            }
            | Self::Japan {
                bank_code,
                branch_code,
            }
            | Self::TrinidadAndTobago {
                bank_code,
                branch_code,
            } => vec![
                (Field::BankCode, bank_code.as_str()),
                (Field::BranchCode, branch_code.as_str()),
            ],
            Self::India { ifsc } => vec![(Field::Ifsc, ifsc.as_str())],
            Self::Korea { bank_code }
            | Self::Thailand { bank_code }
            | Self::Philippines { bank_code }
            | Self::Vietnam { bank_code }
            | Self::Taiwan { bank_code }
            | Self::Indonesia { bank_code }
            | Self::Cambodia { bank_code }
            | Self::Chile { bank_code, .. }
            | Self::Colombia { bank_code, .. }
            | Self::Bolivia { bank_code }
            | Self::SouthAfrica { bank_code }
            | Self::Kenya { bank_code }
            | Self::Morocco { bank_code }
            | Self::Oman { bank_code }
            | Self::Kazakhstan { bank_code }
            | Self::Egypt { bank_code }
            | Self::Pakistan { bank_code }
            | Self::Turkey { bank_code }
            | Self::SaudiArabia { bank_code }
            | Self::Serbia { bank_code } => vec![(Field::BankCode, bank_code.as_str())],
            _ => vec![],
        }
    }

    pub fn identifier(&self, field: Field) -> Option<&str> {
        self.identifiers()
            .into_iter()
            .find_map(|(f, value)| (f == field).then_some(value))
    }

    pub(crate) fn identifiers_mut(&mut self) -> Vec<(Field, &mut String)> {
        match self {
            Self::UnitedStates { routing_number, .. } => {
                vec![(Field::RoutingNumber, routing_number)]
            }
            Self::Canada {
                institution_number,
                transit_number,
            } => vec![
                (Field::InstitutionNumber, institution_number),
                (Field::TransitNumber, transit_number),
            ],
            Self::Australia { bsb_number } => vec![(Field::BsbNumber, bsb_number)],
            Self::UnitedKingdom { sort_code } => vec![(Field::SortCode, sort_code)],
            Self::HongKong {
                clearing_code,
                branch_code,
            } => vec![
                (Field::ClearingCode, clearing_code),
                (Field::BranchCode, branch_code),
            ],
            Self::Singapore {
                bank_code,
                branch_code,
            }
            | Self::Japan {
                bank_code,
                branch_code,
            }
            | Self::TrinidadAndTobago {
                bank_code,
                branch_code,
            } => vec![
                (Field::BankCode, bank_code),
                (Field::BranchCode, branch_code),
            ],
            Self::India { ifsc } => vec![(Field::Ifsc, ifsc)],
            Self::Korea { bank_code }
            | Self::Thailand { bank_code }
            | Self::Philippines { bank_code }
            | Self::Vietnam { bank_code }
            | Self::Taiwan { bank_code }
            | Self::Indonesia { bank_code }
            | Self::Cambodia { bank_code }
            | Self::Chile { bank_code, .. }
            | Self::Colombia { bank_code, .. }
            | Self::Bolivia { bank_code }
            | Self::SouthAfrica { bank_code }
            | Self::Kenya { bank_code }
            | Self::Morocco { bank_code }
            | Self::Oman { bank_code }
            | Self::Kazakhstan { bank_code }
            | Self::Egypt { bank_code }
            | Self::Pakistan { bank_code }
            | Self::Turkey { bank_code }
            | Self::SaudiArabia { bank_code }
            | Self::Serbia { bank_code } => vec![(Field::BankCode, bank_code)],
            _ => vec![],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn every_country_round_trips_through_its_variant() {
        for country in Country::iter() {
            let details = CountryBankAccount::empty(country);
            assert_eq!(details.country(), country);
            assert_eq!(details.currency(), rules_for(country).currency);
        }
    }

    #[test]
    fn identifiers_follow_the_rule_table() {
        for country in Country::iter() {
            let details = CountryBankAccount::empty(country);
            let fields: Vec<Field> = details.identifiers().into_iter().map(|(f, _)| f).collect();
            let rule_fields: Vec<Field> = rules_for(country)
                .identifiers
                .iter()
                .map(|rule| rule.field)
                .collect();
            assert_eq!(fields, rule_fields, "{country}");
            assert_eq!(
                details.account_type().is_some(),
                rules_for(country).has_account_type,
                "{country}"
            );
        }
    }

    #[test]
    fn routing_numbers_are_derived_from_identifiers() {
        let form = BankAccountForm::new("CA", "000123456789", "Chuck Bartowski")
            .identifier(Field::InstitutionNumber, "000")
            .identifier(Field::TransitNumber, "11000");
        let canada = CountryBankAccount::from_form(Country::CA, &form);
        assert_eq!(canada.routing_number(), Some("11000-000".to_string()));

        let form = BankAccountForm::new("JP", "1234567", "Chuck Bartowski")
            .identifier(Field::BankCode, "1100")
            .identifier(Field::BranchCode, "000");
        let japan = CountryBankAccount::from_form(Country::JP, &form);
        assert_eq!(japan.routing_number(), Some("1100000".to_string()));

        let form = BankAccountForm::new("HK", "000123456", "Chuck Bartowski")
            .identifier(Field::ClearingCode, "110")
            .identifier(Field::BranchCode, "000");
        let hong_kong = CountryBankAccount::from_form(Country::HK, &form);
        assert_eq!(hong_kong.routing_number(), Some("110-000".to_string()));

        for country in [Country::DK, Country::MX] {
            assert_eq!(CountryBankAccount::empty(country).routing_number(), None);
        }
    }

    #[test]
    fn from_form_trims_and_ignores_unused_fields() {
        let form = BankAccountForm::new("GB", "00012345", "Chuck Bartowski")
            .identifier(Field::SortCode, " 10-88-00 ")
            .identifier(Field::BankCode, "ignored");
        let details = CountryBankAccount::from_form(Country::GB, &form);
        assert_eq!(
            details,
            CountryBankAccount::UnitedKingdom {
                sort_code: "10-88-00".to_string()
            }
        );
        assert_eq!(details.identifier(Field::BankCode), None);
    }

    #[test]
    fn account_type_is_copied_where_supported() {
        let form = BankAccountForm::new("US", "000123456789", "Chuck Bartowski")
            .identifier(Field::RoutingNumber, "110000000")
            .account_type(AccountType::Savings);
        assert_eq!(
            CountryBankAccount::from_form(Country::US, &form).account_type(),
            Some(AccountType::Savings)
        );
        let form = BankAccountForm::new("US", "000123456789", "Chuck Bartowski")
            .identifier(Field::RoutingNumber, "110000000");
        assert_eq!(
            CountryBankAccount::from_form(Country::US, &form).account_type(),
            Some(AccountType::Checking)
        );
        let mut korea = CountryBankAccount::empty(Country::KR);
        korea.set_account_type(AccountType::Savings);
        assert_eq!(korea.account_type(), None);
    }

    #[test]
    fn eurozone_countries_share_a_variant() {
        let germany = CountryBankAccount::empty(Country::DE);
        let france = CountryBankAccount::empty(Country::FR);
        assert_eq!(germany.bank_account_type(), "EUROPEAN");
        assert_eq!(france.bank_account_type(), "EUROPEAN");
        assert_eq!(germany.currency(), Currency::EUR);
        assert_eq!(france.country(), Country::FR);
    }
}
