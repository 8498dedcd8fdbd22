//! SWIFT / BIC — format validation plus a deny-list of common English
//! words/city names that coincidentally match the SWIFT shape.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Common words/abbreviations that happen to be 8 or 11 uppercase
/// alnum characters shaped like a SWIFT code. Carried from the reference
/// implementation's deny-list concept (not transcribed verbatim in full).
static DENY_LIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "DATABASE", "PASSWORD", "USERNAME", "TEMPLATE", "DOCUMENT", "KEYBOARD",
        "SOFTWARE", "HARDWARE", "PORTLAND", "COLORADO", "ARKANSAS", "ORIGINAL",
    ]
    .into_iter()
    .collect()
});

fn is_bank_code(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_country_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_location_code(s: &str) -> bool {
    s.len() == 2 && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn is_branch_code(s: &str) -> bool {
    s.len() == 3 && s.chars().all(|c| c.is_ascii_alphanumeric())
}

pub fn validate_swift(raw: &str) -> (bool, f64) {
    let code: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if code.len() != 8 && code.len() != 11 {
        return (false, 0.0);
    }
    if DENY_LIST.contains(code.as_str()) {
        return (false, 0.0);
    }

    let bank = &code[0..4];
    let country = &code[4..6];
    let location = &code[6..8];
    if !is_bank_code(bank) || !is_country_code(country) || !is_location_code(location) {
        return (false, 0.0);
    }
    if code.len() == 11 {
        let branch = &code[8..11];
        if !is_branch_code(branch) {
            return (false, 0.0);
        }
    }
    (true, 0.92)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_eight_char_swift_passes() {
        let (valid, _) = validate_swift("DEUTDEFF");
        assert!(valid);
    }

    #[test]
    fn well_formed_eleven_char_swift_passes() {
        let (valid, _) = validate_swift("DEUTDEFF500");
        assert!(valid);
    }

    #[test]
    fn deny_listed_word_rejected_despite_shape() {
        let (valid, _) = validate_swift("DATABASE");
        assert!(!valid);
    }

    #[test]
    fn bad_location_code_rejected() {
        let (valid, _) = validate_swift("DEUTDE##");
        assert!(!valid);
    }
}
