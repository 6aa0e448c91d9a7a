// This needs cleaned up a bit before clippy should run here
#![allow(warnings)]

use afl::fuzz;
use bank_accounts::testing::TestVault;
use bank_accounts::{
    AccountNumberVault, AccountType, BankAccountBuilder, BankAccountForm, Country, Field,
    NoUniquenessCheck, ValidationConfig,
};
use rand::{rngs::StdRng, Rng, SeedableRng};

const IDENTIFIER_FIELDS: &[Field] = &[
    Field::RoutingNumber,
    Field::BankCode,
    Field::BranchCode,
    Field::InstitutionNumber,
    Field::TransitNumber,
    Field::SortCode,
    Field::ClearingCode,
    Field::Ifsc,
    Field::BsbNumber,
];

#[cfg(not(feature = "manual_test"))]
fn main() {
    fuzz!(|data: &[u8]| {
        run_raw_fuzz(data);
    });
}

#[cfg(feature = "manual_test")]
fn main() {
    use std::io::{stdin, Read};

    let mut input = vec![];
    stdin().read_to_end(&mut input).unwrap();
    run_raw_fuzz(&input);
}

fn split_bytes_once(input: &[u8]) -> Option<(&[u8], &[u8])> {
    if let Some(i) = input.iter().position(|b| *b == b',') {
        Some((&input[0..i], &input[i + 1..]))
    } else {
        None
    }
}

fn run_raw_fuzz(bytes: &[u8]) -> Option<()> {
    let (country_code, bytes) = split_bytes_once(bytes)?;
    let (account_number, bytes) = split_bytes_once(bytes)?;
    let (identifier, rand_seed) = split_bytes_once(bytes)?;

    let country_code = std::str::from_utf8(country_code).ok()?;
    let account_number = std::str::from_utf8(account_number).ok()?;
    let identifier = std::str::from_utf8(identifier).ok()?;

    let mut rng_seed: u64 = 0;
    for i in 0..8 {
        if rand_seed.len() > i {
            rng_seed <<= 8;
            rng_seed += rand_seed[i] as u64;
        }
    }

    let rng = StdRng::seed_from_u64(rng_seed);
    run_fuzz(country_code, account_number, identifier, rng);

    Some(())
}

fn gen_config(rng: &mut StdRng) -> ValidationConfig {
    let config = ValidationConfig::default().enforce_production_only_checks(rng.gen_bool(0.5));
    if rng.gen_bool(0.5) {
        config.fallback_country(Country::US)
    } else {
        config
    }
}

fn gen_form(
    rng: &mut StdRng,
    country_code: &str,
    account_number: &str,
    identifier: &str,
) -> BankAccountForm {
    let mut form = BankAccountForm::new(country_code, account_number, "Fuzz Holder");
    for field in IDENTIFIER_FIELDS {
        if rng.gen_bool(0.7) {
            form = form.identifier(*field, identifier);
        }
    }
    if rng.gen_bool(0.5) {
        form = form.account_type(AccountType::Savings);
    }
    form
}

fn run_fuzz(country_code: &str, account_number: &str, identifier: &str, mut rng: StdRng) {
    let config = gen_config(&mut rng);
    let form = gen_form(&mut rng, country_code, account_number, identifier);
    let vault = TestVault::default();

    #[cfg(feature = "manual_test")]
    {
        println!("Country code: {:?}", country_code);
        println!("Account number: {:?}", account_number);
        println!("Identifier: {:?}", identifier);
        println!("Config: {:?}", config);
    }

    let result = BankAccountBuilder::new(&config).build(form, &vault, &NoUniquenessCheck);

    #[cfg(feature = "manual_test")]
    println!("Result: {:?}", result);

    if let Ok(Ok(account)) = result {
        // A valid record never carries the plaintext and always masks part of it
        let visual = account.account_number_visual();
        assert!(visual.contains("******"));
        assert!(account.account_number_last_four().chars().count() <= 4);
        assert!(account.revalidate(&vault, &config).unwrap().is_empty());
        assert!(vault.decrypt(account.encrypted_account_number()).is_ok());
    }
}
