//! Mod-97 / ISO 7064 — IBAN.

use super::mod_of_digit_string;

/// Validate an IBAN: move the first four characters to the end, remap
/// letters to two-digit numbers (A=10..Z=35), and check the resulting
/// decimal string is congruent to 1 mod 97.
pub fn validate_iban(raw: &str) -> (bool, f64) {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if cleaned.len() < 15 || cleaned.len() > 34 {
        return (false, 0.0);
    }
    if cleaned.chars().take(2).any(|c| !c.is_ascii_alphabetic())
        || !cleaned.chars().all(|c| c.is_ascii_alphanumeric())
    {
        return (false, 0.0);
    }

    let rearranged = format!("{}{}", &cleaned[4..], &cleaned[..4]);
    let Some(numeric) = super::alpha_to_numeric(&rearranged) else {
        return (false, 0.0);
    };
    match mod_of_digit_string(&numeric, 97) {
        Some(1) => (true, 0.95),
        _ => (false, 0.0),
    }
}
