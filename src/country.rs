use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

use crate::error::BankAccountError;

/// Countries a payout bank account can be created for, as ISO 3166-1 alpha-2 codes.
#[derive(
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(ascii_case_insensitive)]
pub enum Country {
    US,
    CA,
    AU,
    GB,
    HK,
    SG,
    NZ,
    JP,
    KR,
    IN,
    TH,
    PH,
    VN,
    TW,
    ID,
    KH,
    TT,
    CL,
    CO,
    BO,
    MX,
    AR,
    PE,
    ZA,
    KE,
    MA,
    CH,
    PL,
    CZ,
    BG,
    DK,
    HU,
    RO,
    SE,
    NO,
    IL,
    AE,
    CR,
    OM,
    KZ,
    EG,
    PK,
    TR,
    SA,
    RS,
    // Eurozone
    AT,
    BE,
    CY,
    DE,
    EE,
    ES,
    FI,
    FR,
    GR,
    HR,
    IE,
    IT,
    LT,
    LU,
    LV,
    MT,
    NL,
    PT,
    SI,
    SK,
}

pub const EUROZONE: &[Country] = &[
    Country::AT,
    Country::BE,
    Country::CY,
    Country::DE,
    Country::EE,
    Country::ES,
    Country::FI,
    Country::FR,
    Country::GR,
    Country::HR,
    Country::IE,
    Country::IT,
    Country::LT,
    Country::LU,
    Country::LV,
    Country::MT,
    Country::NL,
    Country::PT,
    Country::SI,
    Country::SK,
];

impl Country {
    /// Parses a country code, ignoring case and surrounding whitespace.
    pub fn from_code(code: &str) -> Result<Country, BankAccountError> {
        code.trim()
            .parse::<Country>()
            .map_err(|_| BankAccountError::UnsupportedCountry(code.trim().to_owned()))
    }

    pub fn alpha2(self) -> &'static str {
        self.into()
    }

    pub fn is_eurozone(self) -> bool {
        EUROZONE.contains(&self)
    }
}

/// ISO 4217 payout currencies.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr,
)]
pub enum Currency {
    USD,
    CAD,
    AUD,
    GBP,
    HKD,
    SGD,
    NZD,
    JPY,
    KRW,
    INR,
    THB,
    PHP,
    VND,
    TWD,
    IDR,
    KHR,
    TTD,
    CLP,
    COP,
    BOB,
    MXN,
    ARS,
    PEN,
    ZAR,
    KES,
    MAD,
    CHF,
    PLN,
    CZK,
    BGN,
    DKK,
    HUF,
    RON,
    SEK,
    NOK,
    ILS,
    AED,
    CRC,
    OMR,
    KZT,
    EGP,
    PKR,
    TRY,
    SAR,
    RSD,
    EUR,
}

#[cfg(test)]
mod test {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn parses_codes_case_insensitively() {
        assert_eq!(Country::from_code("us"), Ok(Country::US));
        assert_eq!(Country::from_code(" Gb "), Ok(Country::GB));
        assert_eq!(Country::from_code("OM"), Ok(Country::OM));
    }

    #[test]
    fn rejects_unknown_codes() {
        assert_eq!(
            Country::from_code("XX"),
            Err(BankAccountError::UnsupportedCountry("XX".to_string()))
        );
        assert_eq!(
            Country::from_code(""),
            Err(BankAccountError::UnsupportedCountry("".to_string()))
        );
        assert_eq!(
            Country::from_code("USA"),
            Err(BankAccountError::UnsupportedCountry("USA".to_string()))
        );
    }

    #[test]
    fn display_round_trips_through_from_code() {
        for country in Country::iter() {
            assert_eq!(country.to_string(), country.alpha2());
            assert_eq!(Country::from_code(country.alpha2()), Ok(country));
        }
    }

    #[test]
    fn eurozone_members() {
        assert!(Country::DE.is_eurozone());
        assert!(Country::HR.is_eurozone());
        assert!(!Country::CH.is_eurozone());
        assert!(!Country::PL.is_eurozone());
    }
}
