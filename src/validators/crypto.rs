//! Bitcoin Base58Check / Bech32, Ethereum address validation.

use sha2::{Digest, Sha256};

const BASE58_ALPHABET: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";
const BECH32_CHARSET: &str = "qpzry9x8gf2tvdw0s3jn54khce6mua7l";

fn base58_decode(input: &str) -> Option<Vec<u8>> {
    let mut digits: Vec<u8> = vec![0];
    for c in input.bytes() {
        let value = BASE58_ALPHABET.iter().position(|&b| b == c)? as u32;
        let mut carry = value;
        for d in digits.iter_mut() {
            carry += (*d as u32) * 58;
            *d = (carry % 256) as u8;
            carry /= 256;
        }
        while carry > 0 {
            digits.push((carry % 256) as u8);
            carry /= 256;
        }
    }
    // leading '1's in base58 encode leading zero bytes
    let leading_zeros = input.bytes().take_while(|&b| b == b'1').count();
    let mut out = vec![0u8; leading_zeros];
    out.extend(digits.iter().rev());
    Some(out)
}

/// Constant-time byte comparison.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// Legacy (P2PKH, starts `1`) or P2SH (starts `3`) Bitcoin address.
pub fn validate_bitcoin_base58(raw: &str) -> (bool, f64) {
    let addr = raw.trim();
    if addr.len() < 25 || addr.len() > 34 {
        return (false, 0.0);
    }
    if !(addr.starts_with('1') || addr.starts_with('3')) {
        return (false, 0.0);
    }
    if !addr.bytes().all(|b| BASE58_ALPHABET.contains(&b)) {
        return (false, 0.0);
    }
    let Some(decoded) = base58_decode(addr) else {
        return (false, 0.0);
    };
    if decoded.len() != 25 {
        return (false, 0.0);
    }
    let (payload, checksum) = decoded.split_at(21);
    let round1 = Sha256::digest(payload);
    let round2 = Sha256::digest(round1);
    if constant_time_eq(&round2[0..4], checksum) {
        (true, 0.97)
    } else {
        (false, 0.0)
    }
}

/// Bech32 SegWit (`bc1q...`) or Bech32m Taproot (`bc1p...`) address.
/// Structural validation only (witness version + length), per spec §4.2.
pub fn validate_bitcoin_bech32(raw: &str) -> (bool, f64) {
    let addr = raw.trim().to_ascii_lowercase();
    if addr.len() < 42 || addr.len() > 62 {
        return (false, 0.0);
    }
    if !addr.starts_with("bc1") {
        return (false, 0.0);
    }
    let data = &addr[3..];
    if !data.chars().all(|c| BECH32_CHARSET.contains(c)) {
        return (false, 0.0);
    }
    let witness_version = data.chars().next();
    match witness_version {
        Some('q') if addr.len() == 42 || addr.len() == 62 => (true, 0.9),
        Some('p') if addr.len() == 62 => (true, 0.9),
        _ => (false, 0.0),
    }
}

pub fn validate_ethereum(raw: &str) -> (bool, f64) {
    let addr = raw.trim();
    if addr.len() != 42 {
        return (false, 0.0);
    }
    let Some(hex_part) = addr.strip_prefix("0x").or_else(|| addr.strip_prefix("0X")) else {
        return (false, 0.0);
    };
    if hex_part.len() == 40 && hex_part.bytes().all(|b| b.is_ascii_hexdigit()) {
        (true, 0.9)
    } else {
        (false, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn well_known_genesis_address_passes() {
        // Satoshi's genesis block coinbase address.
        let (valid, _) = validate_bitcoin_base58("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa");
        assert!(valid);
    }

    #[test]
    fn corrupted_base58_address_fails() {
        let (valid, _) = validate_bitcoin_base58("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNb");
        assert!(!valid);
    }

    #[test]
    fn bech32_segwit_v0_length_42_passes_structurally() {
        let (valid, _) = validate_bitcoin_bech32("bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4");
        assert!(valid);
    }

    #[test]
    fn ethereum_address_format_check() {
        let (valid, _) = validate_ethereum("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
        assert!(valid);
        let (valid2, _) = validate_ethereum("not-an-address");
        assert!(!valid2);
    }
}
