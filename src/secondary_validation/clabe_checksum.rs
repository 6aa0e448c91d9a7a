use crate::secondary_validation::{digits, weighted_unit_sum, Validator};

/// Mexican CLABE (Clave Bancaria Estandarizada): 17 digits followed by a check digit.
pub struct ClabeChecksum;

const CLABE_LENGTH: usize = 18;
const CLABE_WEIGHTS: &[u32] = &[3, 7, 1];

impl Validator for ClabeChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        let Some(digits) = digits(regex_match) else {
            return false;
        };
        if digits.len() != CLABE_LENGTH {
            return false;
        }

        let sum = weighted_unit_sum(&digits[..CLABE_LENGTH - 1], CLABE_WEIGHTS);
        (10 - sum % 10) % 10 == digits[CLABE_LENGTH - 1]
    }
}
