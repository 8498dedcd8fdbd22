//! CUSIP / ISIN / SEDOL / LEI — securities identifier checksums.
//!
//! All use the alphanumeric-to-numeric remap `A=10..Z=35`; ISIN additionally
//! runs Luhn over the remapped string, SEDOL forbids vowels.

use super::{alpha_to_numeric, luhn::luhn_valid, mod_of_digit_string};

fn cusip_char_value(c: char) -> Option<u32> {
    match c {
        '0'..='9' => c.to_digit(10),
        'A'..='Z' => Some((c as u32) - ('A' as u32) + 10),
        '*' => Some(36),
        '@' => Some(37),
        '#' => Some(38),
        _ => None,
    }
}

pub fn validate_cusip(raw: &str) -> (bool, f64) {
    let cusip: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if cusip.len() != 9 {
        return (false, 0.0);
    }
    let chars: Vec<char> = cusip.chars().collect();
    let mut sum = 0u32;
    for (i, c) in chars[..8].iter().enumerate() {
        let Some(mut v) = cusip_char_value(*c) else {
            return (false, 0.0);
        };
        if i % 2 == 1 {
            v *= 2;
        }
        sum += v / 10 + v % 10;
    }
    let check = (10 - (sum % 10)) % 10;
    match chars[8].to_digit(10) {
        Some(d) if d == check => (true, 0.95),
        _ => (false, 0.0),
    }
}

pub fn validate_isin(raw: &str) -> (bool, f64) {
    let isin: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if isin.len() != 12 {
        return (false, 0.0);
    }
    if !isin[0..2].chars().all(|c| c.is_ascii_alphabetic()) {
        return (false, 0.0);
    }
    if !isin[11..12].chars().next().unwrap().is_ascii_digit() {
        return (false, 0.0);
    }
    let Some(numeral_prefix) = alpha_to_numeric(&isin[0..11]) else {
        return (false, 0.0);
    };
    let full = format!("{numeral_prefix}{}", &isin[11..12]);
    if luhn_valid(&full) {
        (true, 0.95)
    } else {
        (false, 0.0)
    }
}

const SEDOL_WEIGHTS: [u32; 6] = [1, 3, 1, 7, 3, 9];

pub fn validate_sedol(raw: &str) -> (bool, f64) {
    let sedol: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if sedol.len() != 7 {
        return (false, 0.0);
    }
    if sedol.chars().any(|c| "AEIOU".contains(c)) {
        return (false, 0.0);
    }
    let chars: Vec<char> = sedol.chars().collect();
    let mut sum = 0u32;
    for (i, c) in chars[..6].iter().enumerate() {
        let Some(v) = cusip_char_value(*c) else {
            return (false, 0.0);
        };
        sum += v * SEDOL_WEIGHTS[i];
    }
    let check = (10 - (sum % 10)) % 10;
    match chars[6].to_digit(10) {
        Some(d) if d == check => (true, 0.93),
        _ => (false, 0.0),
    }
}

pub fn validate_lei(raw: &str) -> (bool, f64) {
    let lei: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if lei.len() != 20 || !lei.chars().all(|c| c.is_ascii_alphanumeric()) {
        return (false, 0.0);
    }
    let Some(numeral) = alpha_to_numeric(&lei) else {
        return (false, 0.0);
    };
    match mod_of_digit_string(&numeral, 97) {
        Some(1) => (true, 0.95),
        _ => (false, 0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_cusip_passes() {
        // 037833100 — Apple Inc. CUSIP, widely cited example.
        let (valid, _) = validate_cusip("037833100");
        assert!(valid);
    }

    #[test]
    fn corrupted_cusip_fails() {
        let (valid, _) = validate_cusip("037833109");
        assert!(!valid);
    }

    #[test]
    fn well_known_isin_passes() {
        // US0378331005 — Apple Inc. ISIN (CUSIP 037833100 + US + check 5).
        let (valid, _) = validate_isin("US0378331005");
        assert!(valid);
    }

    #[test]
    fn sedol_rejects_vowels() {
        let (valid, _) = validate_sedol("0A63H21");
        assert!(!valid);
    }

    #[test]
    fn wrong_length_lei_rejected() {
        let (valid, _) = validate_lei("TOO_SHORT");
        assert!(!valid);
    }
}
