//! SSN structural validation — downgrades confidence rather than
//! rejecting outright on an invalid area/group/serial (spec §4.2).

pub fn validate_ssn(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    let area: u32 = digits[0..3].parse().unwrap();
    let group: u32 = digits[3..5].parse().unwrap();
    let serial: u32 = digits[5..9].parse().unwrap();

    let area_invalid = area == 0 || area == 666 || area >= 900;
    let group_invalid = group == 0;
    let serial_invalid = serial == 0;

    if area_invalid {
        (true, 0.85)
    } else if group_invalid {
        (true, 0.80)
    } else if serial_invalid {
        (true, 0.75)
    } else {
        (true, 0.99)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_formed_ssn_gets_high_confidence() {
        let (valid, confidence) = validate_ssn("123-45-6789");
        assert!(valid);
        assert!(confidence >= 0.95);
    }

    #[test]
    fn invalid_area_downgrades_not_rejects() {
        let (valid, confidence) = validate_ssn("000-45-6789");
        assert!(valid);
        assert!(confidence < 0.95);
    }

    #[test]
    fn ssn_666_area_is_invalid_area() {
        let (valid, confidence) = validate_ssn("666-45-6789");
        assert!(valid);
        assert!(confidence < 0.95);
    }

    #[test]
    fn wrong_length_rejected_outright() {
        let (valid, _) = validate_ssn("12345");
        assert!(!valid);
    }
}
