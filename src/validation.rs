use regex::Regex;
use thiserror::Error;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum RegexValidationError {
    #[error("Invalid regex syntax")]
    InvalidSyntax,

    #[error("The regex has exceeded the complexity limit")]
    TooComplex,

    #[error("Identifier patterns are not allowed to match an empty string")]
    MatchesEmptyString,
}

const REGEX_SIZE_LIMIT: usize = 1 << 20;

/// Checks that an identifier pattern is usable in a country rule
pub fn validate_regex(input: &str) -> Result<(), RegexValidationError> {
    validate_and_create_regex(input).map(|_| ())
}

/// Builds an anchored regex from an identifier pattern.
///
/// Identifier rules are whole-value matches, so the pattern is always wrapped in `^(?:...)$`.
/// A pattern that accepts the empty string is rejected: blank values are reported by the
/// presence check and must never pass a format check.
pub fn validate_and_create_regex(input: &str) -> Result<Regex, RegexValidationError> {
    let anchored = format!("^(?:{input})$");

    // Identifiers are ASCII: `\d` must not accept other scripts' digits
    let regex = regex::RegexBuilder::new(&anchored)
        .unicode(false)
        .size_limit(REGEX_SIZE_LIMIT)
        .build()
        .map_err(|regex_err| match regex_err {
            regex::Error::CompiledTooBig(_) => RegexValidationError::TooComplex,
            _ => RegexValidationError::InvalidSyntax,
        })?;

    if regex.is_match("") {
        return Err(RegexValidationError::MatchesEmptyString);
    }

    Ok(regex)
}
