//! DEA registration number — 2 letters + 7 digits,
//! `(d1+d3+d5) + 2*(d2+d4+d6) mod 10 == d7`.

pub fn validate_dea(raw: &str) -> (bool, f64) {
    let cleaned: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.len() != 9 {
        return (false, 0.0);
    }
    let mut chars = cleaned.chars();
    let letter1 = chars.next().unwrap();
    let letter2 = chars.next().unwrap();
    if !letter1.is_ascii_alphabetic() || !letter2.is_ascii_alphabetic() {
        return (false, 0.0);
    }
    let digits: Vec<u32> = chars.clone().map(|c| c.to_digit(10).unwrap_or(99)).collect();
    if digits.len() != 7 || digits.iter().any(|d| *d == 99) {
        return (false, 0.0);
    }

    let odd_sum = digits[0] + digits[2] + digits[4];
    let even_sum = digits[1] + digits[3] + digits[5];
    let check = (odd_sum + 2 * even_sum) % 10;

    if check == digits[6] {
        (true, 0.95)
    } else {
        (false, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_consistent_check_digit_validates() {
        // d1..d6 = 1,2,3,4,5,6 -> check = (1+3+5) + 2*(2+4+6) mod 10
        // = 9 + 24 = 33 mod 10 = 3
        let (valid, _) = validate_dea("AB1234563");
        assert!(valid);
    }

    #[test]
    fn wrong_check_digit_fails() {
        let (valid, _) = validate_dea("AB1234569");
        assert!(!valid);
    }

    #[test]
    fn non_letter_prefix_rejected() {
        let (valid, _) = validate_dea("121234563");
        assert!(!valid);
    }
}
