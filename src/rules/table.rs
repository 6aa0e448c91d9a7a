use crate::country::{Country, Currency, EUROZONE};
use crate::rules::{AccountNumberRule, CountryRules, Field, FieldRule, Visual};
use crate::secondary_validation::{IbanPrefix, SecondaryValidator};

const BIC_PATTERN: &str = "[0-9a-zA-Z]{8,11}";

struct RulesBuilder {
    bank_account_type: &'static str,
    currency: Currency,
    identifiers: Vec<FieldRule>,
    account_number: AccountNumberRule,
    visual: Visual,
    hash_fields: &'static [Field],
    has_account_type: bool,
}

impl RulesBuilder {
    fn new(
        bank_account_type: &'static str,
        currency: Currency,
        account_number: AccountNumberRule,
    ) -> Self {
        let visual = if account_number.is_iban() {
            Visual::CountryPrefixed
        } else {
            Visual::Masked
        };
        Self {
            bank_account_type,
            currency,
            identifiers: vec![],
            account_number,
            visual,
            hash_fields: &[],
            has_account_type: false,
        }
    }

    fn identifier(mut self, field: Field, pattern: &str) -> Self {
        self.identifiers.push(FieldRule::new(field, pattern));
        self
    }

    fn identifier_rule(mut self, rule: FieldRule) -> Self {
        self.identifiers.push(rule);
        self
    }

    fn bic_bank_code(self) -> Self {
        self.identifier(Field::BankCode, BIC_PATTERN)
    }

    fn hash_fields(mut self, fields: &'static [Field]) -> Self {
        self.hash_fields = fields;
        self
    }

    fn with_account_type(mut self) -> Self {
        self.has_account_type = true;
        self
    }

    fn into_rules(self, country: Country) -> CountryRules {
        CountryRules {
            country,
            bank_account_type: self.bank_account_type,
            currency: self.currency,
            identifiers: self.identifiers,
            account_number: self.account_number,
            visual: self.visual,
            hash_fields: self.hash_fields,
            has_account_type: self.has_account_type,
        }
    }
}

fn digits(pattern: &str) -> AccountNumberRule {
    AccountNumberRule::pattern(pattern)
}

/// IBAN account number that must carry the country's own prefix, enforced in production only.
fn local_iban(country: Country) -> AccountNumberRule {
    AccountNumberRule::production_iban(IbanPrefix::Exactly(country))
}

/// IBAN-only countries whose tag is the country code itself
fn iban_country(country: Country, currency: Currency) -> RulesBuilder {
    RulesBuilder::new(
        country.alpha2(),
        currency,
        AccountNumberRule::iban(IbanPrefix::Any),
    )
}

pub(super) fn country_rules(country: Country) -> CountryRules {
    use Country::*;

    let builder = match country {
        US => RulesBuilder::new("ACH", Currency::USD, digits("\\d{1,17}"))
            .identifier_rule(
                FieldRule::new(Field::RoutingNumber, "\\d{9}")
                    .validator(SecondaryValidator::AbaRtnChecksum),
            )
            .with_account_type(),
        CA => RulesBuilder::new("CANADIAN", Currency::CAD, digits("\\d{5,12}"))
            .identifier(Field::InstitutionNumber, "\\d{3}")
            .identifier(Field::TransitNumber, "\\d{5}")
            .hash_fields(&[Field::InstitutionNumber, Field::TransitNumber]),
        AU => RulesBuilder::new("AUSTRALIAN", Currency::AUD, digits("\\d{5,9}"))
            .identifier(Field::BsbNumber, "\\d{6}")
            .hash_fields(&[Field::BsbNumber]),
        GB => RulesBuilder::new("UK", Currency::GBP, digits("\\d{6,8}"))
            .identifier(Field::SortCode, "\\d{2}-\\d{2}-\\d{2}")
            .hash_fields(&[Field::SortCode]),
        HK => RulesBuilder::new("HONG_KONG", Currency::HKD, digits("\\d{6,12}"))
            .identifier(Field::ClearingCode, "\\d{3}")
            .identifier(Field::BranchCode, "\\d{3}")
            .hash_fields(&[Field::ClearingCode, Field::BranchCode]),
        SG => RulesBuilder::new("SINGAPOREAN", Currency::SGD, digits("\\d{6,12}"))
            .identifier(Field::BankCode, "\\d{4}")
            .identifier(Field::BranchCode, "\\d{3}")
            .hash_fields(&[Field::BankCode, Field::BranchCode]),
        NZ => RulesBuilder::new("NZ", Currency::NZD, digits("\\d{15,16}")),
        JP => RulesBuilder::new("JP", Currency::JPY, digits("\\d{4,8}"))
            .identifier(Field::BankCode, "\\d{4}")
            .identifier(Field::BranchCode, "\\d{3}")
            .hash_fields(&[Field::BankCode, Field::BranchCode]),
        KR => RulesBuilder::new("KR", Currency::KRW, digits("\\d{11,16}")).bic_bank_code(),
        IN => RulesBuilder::new("IN", Currency::INR, digits("\\d{8,18}"))
            .identifier(Field::Ifsc, "[A-Za-z]{4}0[A-Za-z0-9]{6}")
            .hash_fields(&[Field::Ifsc]),
        TH => RulesBuilder::new("TH", Currency::THB, digits("\\d{6,16}"))
            .identifier(Field::BankCode, "\\d{3}"),
        PH => RulesBuilder::new("PH", Currency::PHP, digits("\\d{1,17}")).bic_bank_code(),
        VN => RulesBuilder::new("VN", Currency::VND, digits("\\d{1,17}"))
            .identifier(Field::BankCode, "\\d{8}"),
        TW => RulesBuilder::new("TW", Currency::TWD, digits("\\d{10,14}")).bic_bank_code(),
        ID => RulesBuilder::new("ID", Currency::IDR, digits("\\d{1,35}"))
            .identifier(Field::BankCode, "[0-9a-zA-Z]{3,4}"),
        KH => RulesBuilder::new("KH", Currency::KHR, digits("\\d{5,15}")).bic_bank_code(),
        TT => RulesBuilder::new("TT", Currency::TTD, digits("\\d{1,17}"))
            .identifier(Field::BankCode, "\\d{3}")
            .identifier(Field::BranchCode, "\\d{5}")
            .hash_fields(&[Field::BankCode, Field::BranchCode]),
        CL => RulesBuilder::new("CL", Currency::CLP, digits("\\d{5,25}"))
            .identifier(Field::BankCode, "\\d{3}")
            .with_account_type(),
        CO => RulesBuilder::new("CO", Currency::COP, digits("\\d{6,20}"))
            .identifier(Field::BankCode, "\\d{3}")
            .with_account_type(),
        BO => RulesBuilder::new("BO", Currency::BOB, digits("\\d{10,15}"))
            .identifier(Field::BankCode, "\\d{1,3}"),
        MX => RulesBuilder::new(
            "MX",
            Currency::MXN,
            AccountNumberRule::pattern_with_checksum(
                "\\d{18}",
                SecondaryValidator::ClabeChecksum,
            ),
        ),
        AR => RulesBuilder::new(
            "AR",
            Currency::ARS,
            AccountNumberRule::pattern_with_checksum(
                "\\d{22}",
                SecondaryValidator::CbuChecksum,
            ),
        ),
        PE => RulesBuilder::new("PE", Currency::PEN, digits("\\d{20}")),
        ZA => RulesBuilder::new("ZA", Currency::ZAR, digits("\\d{6,15}")).bic_bank_code(),
        KE => RulesBuilder::new("KE", Currency::KES, digits("\\d{5,20}")).bic_bank_code(),
        MA => RulesBuilder::new("MA", Currency::MAD, digits("\\d{24}")).bic_bank_code(),
        CH => iban_country(CH, Currency::CHF),
        PL => iban_country(PL, Currency::PLN),
        CZ => iban_country(CZ, Currency::CZK),
        BG => iban_country(BG, Currency::BGN),
        DK => iban_country(DK, Currency::DKK),
        HU => iban_country(HU, Currency::HUF),
        RO => iban_country(RO, Currency::RON),
        SE => iban_country(SE, Currency::SEK),
        NO => iban_country(NO, Currency::NOK),
        IL => RulesBuilder::new("IL", Currency::ILS, local_iban(IL)),
        AE => RulesBuilder::new("AE", Currency::AED, local_iban(AE)),
        CR => RulesBuilder::new("CR", Currency::CRC, local_iban(CR)),
        OM => RulesBuilder::new("OM", Currency::OMR, local_iban(OM)).bic_bank_code(),
        KZ => RulesBuilder::new("KZ", Currency::KZT, local_iban(KZ)).bic_bank_code(),
        EG => RulesBuilder::new("EG", Currency::EGP, local_iban(EG)).bic_bank_code(),
        PK => RulesBuilder::new("PK", Currency::PKR, local_iban(PK)).bic_bank_code(),
        TR => RulesBuilder::new("TR", Currency::TRY, local_iban(TR)).bic_bank_code(),
        SA => RulesBuilder::new("SA", Currency::SAR, local_iban(SA)).bic_bank_code(),
        RS => RulesBuilder::new("RS", Currency::RSD, local_iban(RS)).bic_bank_code(),
        AT | BE | CY | DE | EE | ES | FI | FR | GR | HR | IE | IT | LT | LU | LV | MT | NL
        | PT | SI | SK => RulesBuilder::new(
            "EUROPEAN",
            Currency::EUR,
            AccountNumberRule::iban(IbanPrefix::OneOf(EUROZONE)),
        ),
    };

    builder.into_rules(country)
}
