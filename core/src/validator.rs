//! Raffle submission validator
//!
//! Pure checks over an address and a list of codes. Nothing here fails with an
//! error: every violation is recorded into the [`ValidationErrors`] accumulator
//! the caller hands in, keyed by the offending value.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;

use crate::result::ValidationErrors;

pub const INVALID_ADDRESS: &str = "Your address should satisfy next criteria: 42 symbols long, \
     starts from '0x', contain only characters and digits";
pub const INVALID_SIZE_OF_RAFFLE_LIST_KEY: &str = "Invalid size of raffle list";
pub const INVALID_SIZE_OF_RAFFLE_LIST: &str = "Raffle list should be from 1 to 10";
pub const INVALID_CODE: &str = "Code should be 5 digits long and contain only unique digits";

/// Key used when the offending value itself is missing.
pub const NULL_KEY: &str = "null";

/// Lists must be strictly shorter than this. A list of exactly 10 codes is
/// rejected even though the size message reads "from 1 to 10".
pub const MAX_CODES_EXCLUSIVE: usize = 10;

lazy_static! {
    /// `0x` followed by 40 ASCII letters or digits
    static ref ADDRESS_REGEX: Regex = Regex::new(r"^0x[0-9A-Za-z]{40}$").unwrap();

    /// Exactly five ASCII digits
    static ref CODE_REGEX: Regex = Regex::new(r"^[0-9]{5}$").unwrap();
}

/// Validate an address and its code list into `errors`, returning the
/// accumulator so callers can chain on a fresh map.
///
/// Address and codes share one map keyed by offending value, so an address that
/// is textually identical to an invalid code collapses into a single entry.
pub fn validate_raffle(
    address: Option<&str>,
    codes: Option<&[Option<String>]>,
    mut errors: ValidationErrors,
) -> ValidationErrors {
    validate_address(address, &mut errors);
    validate_code_list(codes, &mut errors);
    errors
}

/// Record an address-format error unless `address` is `0x` + 40 alphanumerics.
pub fn validate_address(address: Option<&str>, errors: &mut ValidationErrors) {
    match address {
        Some(addr) if ADDRESS_REGEX.is_match(addr) => {}
        other => errors.insert(other.unwrap_or(NULL_KEY), INVALID_ADDRESS),
    }
}

/// Check the list size, then every code.
///
/// Individual codes are only inspected while `errors` is still empty after the
/// size check. A size violation therefore hides per-code problems, and so does
/// an address error recorded earlier into the same accumulator.
pub fn validate_code_list(codes: Option<&[Option<String>]>, errors: &mut ValidationErrors) {
    validate_code_list_size(codes, errors);
    if !errors.is_empty() {
        return;
    }

    for code in codes.unwrap_or_default() {
        validate_code(code.as_deref(), errors);
    }
}

/// Record a code-format error unless `code` is five pairwise distinct digits.
pub fn validate_code(code: Option<&str>, errors: &mut ValidationErrors) {
    match code {
        Some(c) if CODE_REGEX.is_match(c) && has_unique_digits(c) => {}
        other => errors.insert(other.unwrap_or(NULL_KEY), INVALID_CODE),
    }
}

fn validate_code_list_size(codes: Option<&[Option<String>]>, errors: &mut ValidationErrors) {
    let len = codes.map_or(0, <[_]>::len);
    if len == 0 || len >= MAX_CODES_EXCLUSIVE {
        errors.insert(INVALID_SIZE_OF_RAFFLE_LIST_KEY, INVALID_SIZE_OF_RAFFLE_LIST);
    }
}

fn has_unique_digits(code: &str) -> bool {
    let mut seen = HashSet::with_capacity(code.len());
    code.chars().all(|c| seen.insert(c))
}
