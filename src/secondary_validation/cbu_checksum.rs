use crate::secondary_validation::{digits, Validator};

/// Argentinian CBU (Clave Bancaria Uniforme).
///
/// Two blocks, each ending with its own check digit: an 8 digit bank/branch block and a
/// 14 digit account block.
pub struct CbuChecksum;

const CBU_LENGTH: usize = 22;
const BANK_BLOCK_LENGTH: usize = 8;
const BANK_BLOCK_WEIGHTS: &[u32] = &[7, 1, 3, 9, 7, 1, 3];
const ACCOUNT_BLOCK_WEIGHTS: &[u32] = &[3, 9, 7, 1, 3, 9, 7, 1, 3, 9, 7, 1, 3];

fn block_is_valid(block: &[u32], weights: &[u32]) -> bool {
    let Some((check_digit, payload)) = block.split_last() else {
        return false;
    };
    let sum: u32 = payload.iter().zip(weights).map(|(d, w)| d * w).sum();
    (10 - sum % 10) % 10 == *check_digit
}

impl Validator for CbuChecksum {
    fn is_valid_match(&self, regex_match: &str) -> bool {
        let Some(digits) = digits(regex_match) else {
            return false;
        };
        if digits.len() != CBU_LENGTH {
            return false;
        }

        let (bank_block, account_block) = digits.split_at(BANK_BLOCK_LENGTH);
        block_is_valid(bank_block, BANK_BLOCK_WEIGHTS)
            && block_is_valid(account_block, ACCOUNT_BLOCK_WEIGHTS)
    }
}

#[cfg(test)]
mod test {
    use crate::secondary_validation::*;

    #[test]
    fn test_valid_cbus() {
        let valid_cbus = vec!["2850590940090418135201", "0170099220000067797370"];
        for cbu in valid_cbus {
            assert!(CbuChecksum.is_valid_match(cbu), "{cbu} should be valid");
        }
    }

    #[test]
    fn test_invalid_cbus() {
        let invalid_cbus = vec![
            // wrong account block check digit
            "2850590940090418135202",
            // wrong bank block check digit
            "2850590840090418135201",
            // wrong length
            "285059094009041813520",
            // non digit characters
            "28505909400904181352O1",
        ];
        for cbu in invalid_cbus {
            assert!(!CbuChecksum.is_valid_match(cbu), "{cbu} should be invalid");
        }
    }
}
