//! ABA routing number — Mod-10 with weights [3,7,1], restricted prefixes.

const WEIGHTS: [u32; 9] = [3, 7, 1, 3, 7, 1, 3, 7, 1];

fn prefix_in_range(first_two: u32) -> bool {
    (0..=12).contains(&first_two)
        || (21..=32).contains(&first_two)
        || (61..=72).contains(&first_two)
        || first_two == 80
}

pub fn validate_aba_routing(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    let values: Vec<u32> = digits.chars().map(|c| c.to_digit(10).unwrap()).collect();
    let first_two = values[0] * 10 + values[1];
    if !prefix_in_range(first_two) {
        return (false, 0.0);
    }
    let sum: u32 = values.iter().zip(WEIGHTS.iter()).map(|(d, w)| d * w).sum();
    if sum % 10 == 0 {
        (true, 0.95)
    } else {
        (false, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_valid_routing_number_passes() {
        // 011000015 — Federal Reserve Bank of Boston, widely-cited example.
        let (valid, _) = validate_aba_routing("011000015");
        assert!(valid);
    }

    #[test]
    fn bad_prefix_is_rejected() {
        let (valid, _) = validate_aba_routing("990000015");
        assert!(!valid);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let (valid, _) = validate_aba_routing("123");
        assert!(!valid);
    }
}
