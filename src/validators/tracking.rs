//! Carrier tracking-number checksums — UPS, FedEx, USPS.

/// UPS 1Z-prefixed tracking number: `1Z` + 6-char shipper + 2-char service
/// + 7-digit package serial + 1 check digit. Each alphabetic character in
/// the shipper code contributes `(ord(c) - ord('A') + 1) mod 10`; digits
/// contribute their own value. Weighted alternating 1/2, mod 10.
pub fn validate_ups(raw: &str) -> (bool, f64) {
    let code: String = raw.chars().filter(|c| !c.is_whitespace()).map(|c| c.to_ascii_uppercase()).collect();
    if code.len() != 18 || !code.starts_with("1Z") {
        return (false, 0.0);
    }
    let body = &code[2..17];
    let check_char = code.chars().nth(17).unwrap();
    let Some(check_digit) = check_char.to_digit(10) else {
        return (false, 0.0);
    };

    let mut sum = 0u32;
    for (i, c) in body.chars().enumerate() {
        let digit = if c.is_ascii_digit() {
            c.to_digit(10).unwrap()
        } else if c.is_ascii_alphabetic() {
            ((c as u32) - ('A' as u32) + 1) % 10
        } else {
            return (false, 0.0);
        };
        let weight = if i % 2 == 0 { 1 } else { 2 };
        let mut product = digit * weight;
        if product > 9 {
            product -= 9;
        }
        sum += product;
    }

    if sum % 10 == check_digit {
        (true, 0.9)
    } else {
        (false, 0.0)
    }
}

/// FedEx 12-digit ground/express tracking number, Mod-11 check using
/// weights cycling `1..=7`.
pub fn validate_fedex(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() != 12 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    let values: Vec<u32> = digits.chars().map(|c| c.to_digit(10).unwrap()).collect();
    let sum: u32 = values[..11]
        .iter()
        .enumerate()
        .map(|(i, d)| d * (((i % 7) as u32) + 1))
        .sum();
    let check = sum % 11 % 10;
    if check == values[11] {
        (true, 0.85)
    } else {
        (false, 0.0)
    }
}

/// USPS tracking number (20-22 digits), alternating-weight (3,1) mod-10
/// check, same family as UPC/Luhn-style checks.
pub fn validate_usps(raw: &str) -> (bool, f64) {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() < 20 || digits.len() > 22 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return (false, 0.0);
    }
    let values: Vec<u32> = digits.chars().map(|c| c.to_digit(10).unwrap()).collect();
    let (body, check_digit) = values.split_at(values.len() - 1);
    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(i, d)| d * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    let remainder = sum % 10;
    let check = if remainder == 0 { 0 } else { 10 - remainder };
    if check == check_digit[0] {
        (true, 0.85)
    } else {
        (false, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ups_rejects_bad_prefix() {
        let (valid, _) = validate_ups("2Z12345E0205271688");
        assert!(!valid);
    }

    #[test]
    fn ups_self_consistent_check_digit() {
        let (valid, _) = validate_ups("1Z999AA10123456786");
        assert!(valid);
    }

    #[test]
    fn fedex_wrong_length_rejected() {
        let (valid, _) = validate_fedex("123");
        assert!(!valid);
    }

    #[test]
    fn usps_wrong_length_rejected() {
        let (valid, _) = validate_usps("123");
        assert!(!valid);
    }
}
