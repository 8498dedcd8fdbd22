//! Checksum/format validators (spec §4.2).
//!
//! Every validator is a pure function `&str -> (valid, confidence)`. None
//! of them allocate process-wide state; they are safe to call from any
//! number of threads concurrently.

pub mod aba;
pub mod bip39;
pub mod crypto;
pub mod dea;
pub mod luhn;
pub mod mod97;
pub mod securities;
pub mod ssn;
pub mod swift;
pub mod tracking;
pub mod vin;

/// Alphanumeric-to-numeric remap used by IBAN, ISIN, and LEI checksums:
/// `A=10, B=11, ..., Z=35`; digits pass through unchanged, appended as
/// decimal digit strings.
pub fn alpha_to_numeric(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len() * 2);
    for c in s.chars() {
        if c.is_ascii_digit() {
            out.push(c);
        } else if c.is_ascii_alphabetic() {
            let value = (c.to_ascii_uppercase() as u32) - ('A' as u32) + 10;
            out.push_str(&value.to_string());
        } else {
            return None;
        }
    }
    Some(out)
}

/// Compute `digits mod modulus` for a (potentially huge) decimal digit
/// string, one digit at a time, avoiding bignum arithmetic.
pub fn mod_of_digit_string(digits: &str, modulus: u64) -> Option<u64> {
    let mut rem: u64 = 0;
    for c in digits.chars() {
        let d = c.to_digit(10)? as u64;
        rem = (rem * 10 + d) % modulus;
    }
    Some(rem)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alpha_to_numeric_remaps_letters() {
        assert_eq!(alpha_to_numeric("A9"), Some("109".to_string()));
        assert_eq!(alpha_to_numeric("Z"), Some("35".to_string()));
    }

    #[test]
    fn mod_of_digit_string_matches_small_values() {
        assert_eq!(mod_of_digit_string("100", 97), Some(100 % 97));
        assert_eq!(mod_of_digit_string("12345678901234567890", 97), Some(12345678901234567890u128.rem_euclid(97) as u64));
    }
}
