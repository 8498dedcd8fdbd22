//! Luhn (mod-10, alternating double) — credit cards, NPI.

/// `true` iff `digits` (ASCII digits only) passes the raw Luhn check.
pub fn luhn_valid(digits: &str) -> bool {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let mut sum = 0u32;
    let mut double = false;
    for c in digits.chars().rev() {
        let mut d = c.to_digit(10).unwrap();
        if double {
            d *= 2;
            if d > 9 {
                d -= 9;
            }
        }
        sum += d;
        double = !double;
    }
    sum % 10 == 0
}

/// Credit-card candidate that already matched a plausible format (length
/// 13-19, digits-only after removing separators). Spec §4.2: a Luhn
/// failure still reports `valid=true`, with reduced confidence — detect
/// with a flag rather than silently reject.
pub const CREDIT_CARD_LUHN_PASS_CONFIDENCE: f64 = 0.99;
pub const CREDIT_CARD_LUHN_FAIL_CONFIDENCE: f64 = 0.87;

pub fn validate_credit_card(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if digits.len() < 13 || digits.len() > 19 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    if luhn_valid(&digits) {
        (true, CREDIT_CARD_LUHN_PASS_CONFIDENCE)
    } else {
        (true, CREDIT_CARD_LUHN_FAIL_CONFIDENCE)
    }
}

/// NPI (National Provider Identifier): 10 digits, Luhn over the number
/// prefixed with the constant `80840` (the NPI "issuer" prefix mandated
/// by the Luhn check specified in the NPI final rule).
pub fn validate_npi(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != 10 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    let prefixed = format!("80840{digits}");
    if luhn_valid(&prefixed) {
        (true, 0.97)
    } else {
        (false, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_valid_visa_passes_luhn() {
        assert!(luhn_valid("4111111111111111"));
    }

    #[test]
    fn altered_digit_fails_luhn() {
        assert!(!luhn_valid("4111111111111112"));
    }

    #[test]
    fn credit_card_luhn_fail_still_valid_with_reduced_confidence() {
        let (valid, confidence) = validate_credit_card("4111111111111112");
        assert!(valid);
        assert!((0.85..0.90).contains(&confidence));
    }

    #[test]
    fn credit_card_bad_length_is_invalid() {
        let (valid, _) = validate_credit_card("123");
        assert!(!valid);
    }

    #[test]
    fn npi_round_trip_via_luhn_is_deterministic() {
        // Self-consistency: a 10-digit candidate either satisfies the
        // 80840-prefixed Luhn check or it doesn't; validate_npi must agree
        // with luhn_valid on the same prefixed string.
        let digits = "1234567893";
        let expect = luhn_valid(&format!("80840{digits}"));
        let (valid, _) = validate_npi(digits);
        assert_eq!(valid, expect);
    }
}
