use crate::secondary_validation::{digits, Validator};

pub struct AbaRtnChecksum;

const ABA_RTN_LENGTH: usize = 9;
const ABA_RTN_MULTIPLIERS: &[u32] = &[7, 3, 9];

impl Validator for AbaRtnChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        // check if (7(d1 + d4 + d7) + 3(d2 + d5 + d8) + 9(d3 + d6)) mod 10 == d9
        let Some(digits) = digits(regex_match) else {
            return false;
        };
        if digits.len() != ABA_RTN_LENGTH {
            return false;
        }

        let checksum: u32 = digits[..ABA_RTN_LENGTH - 1]
            .iter()
            .enumerate()
            .map(|(i, digit)| ABA_RTN_MULTIPLIERS[i % 3] * digit)
            .sum();

        checksum % 10 == digits[ABA_RTN_LENGTH - 1]
    }
}
