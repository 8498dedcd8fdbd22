//! Financial detector (tier CHECKSUM): securities identifiers and crypto
//! addresses, with a context-keyword confidence bonus for ambiguous
//! short-format matches such as bare SWIFT codes (spec §4.3).

use super::{span_from_match, Detector, DetectorKind};
use crate::types::{Span, Tier};
use crate::validators::{
    bip39, crypto,
    securities::{validate_cusip, validate_isin, validate_lei, validate_sedol},
    swift::validate_swift,
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

const CONTEXT_WINDOW: usize = 100;
const CONTEXT_BOOST: f64 = 0.25;
const BOOST_THRESHOLD: f64 = 0.70;

type Validator = fn(&str) -> (bool, f64);

struct Candidate {
    regex: Regex,
    entity_type: &'static str,
    validator: Option<Validator>,
    /// Used when there's no validator (e.g. address families whose
    /// checksum is only structural) — a fixed starting confidence.
    base_confidence: f64,
}

fn candidate(pattern: &str, entity_type: &'static str, validator: Option<Validator>, base_confidence: f64) -> Candidate {
    Candidate {
        regex: Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern for {entity_type}: {e}")),
        entity_type,
        validator,
        base_confidence,
    }
}

static CANDIDATES: Lazy<Vec<Candidate>> = Lazy::new(|| {
    vec![
        candidate(r"\b[0-9A-Z]{9}\b", "CUSIP", Some(validate_cusip), 0.5),
        candidate(r"\b[A-Z]{2}[0-9A-Z]{9}[0-9]\b", "ISIN", Some(validate_isin), 0.5),
        candidate(r"\b[0-9B-DF-HJ-NP-TV-Z]{6}[0-9]\b", "SEDOL", Some(validate_sedol), 0.45),
        candidate(r"\b[A-Z0-9]{18}[0-9]{2}\b", "LEI", Some(validate_lei), 0.5),
        candidate(r"\b[A-Z]{6}[A-Z0-9]{2}(?:[A-Z0-9]{3})?\b", "SWIFT_BIC", Some(validate_swift), 0.4),
        candidate(r"\b1[A-HJ-NP-Za-km-z1-9]{24,33}\b", "BITCOIN_ADDRESS", Some(crypto::validate_bitcoin_base58), 0.6),
        candidate(r"\b3[A-HJ-NP-Za-km-z1-9]{24,33}\b", "BITCOIN_ADDRESS", Some(crypto::validate_bitcoin_base58), 0.6),
        candidate(r"\bbc1[a-z0-9]{38,59}\b", "BITCOIN_ADDRESS", Some(crypto::validate_bitcoin_bech32), 0.6),
        candidate(r"\b0[xX][0-9a-fA-F]{40}\b", "ETHEREUM_ADDRESS", Some(crypto::validate_ethereum), 0.6),
    ]
});

/// Types whose short/ambiguous formats get a context-keyword bonus.
static CONTEXT_KEYWORDS: Lazy<HashMap<&'static str, Vec<&'static str>>> = Lazy::new(|| {
    [
        ("SWIFT_BIC", vec!["swift", "bic", "wire transfer", "bank code"]),
        ("CUSIP", vec!["cusip", "security id"]),
        ("ISIN", vec!["isin"]),
        ("SEDOL", vec!["sedol"]),
        ("LEI", vec!["lei", "legal entity identifier"]),
    ]
    .into_iter()
    .collect()
});

fn context_has_keyword(text: &str, start: usize, end: usize, entity_type: &str) -> bool {
    let Some(keywords) = CONTEXT_KEYWORDS.get(entity_type) else {
        return false;
    };
    let window_start = start.saturating_sub(CONTEXT_WINDOW);
    let window_end = (end + CONTEXT_WINDOW).min(text.len());
    let Some(window) = text.get(window_start..window_end) else {
        return false;
    };
    let lower = window.to_ascii_lowercase();
    keywords.iter().any(|kw| lower.contains(kw))
}

pub struct FinancialDetector;

impl Detector for FinancialDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Financial
    }

    fn tier(&self) -> Tier {
        Tier::Checksum
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for c in CANDIDATES.iter() {
            for m in c.regex.find_iter(text) {
                let mut confidence = c.base_confidence;
                if let Some(validator) = c.validator {
                    let (valid, validator_confidence) = validator(m.as_str());
                    if !valid {
                        continue;
                    }
                    confidence = validator_confidence;
                }
                if confidence < BOOST_THRESHOLD && context_has_keyword(text, m.start(), m.end(), c.entity_type) {
                    confidence = (confidence + CONTEXT_BOOST).min(1.0);
                }
                if let Some(span) =
                    span_from_match(text, m.start(), m.end(), c.entity_type, confidence, "financial", Tier::Checksum)
                {
                    spans.push(span);
                }
            }
        }

        spans.extend(self.detect_seed_phrases(text));
        spans
    }
}

impl FinancialDetector {
    fn detect_seed_phrases(&self, text: &str) -> Vec<Span> {
        static SEED_CONTEXT: Lazy<Regex> = Lazy::new(|| {
            Regex::new(r"(?i)(?:seed|mnemonic|recovery|backup)\s*(?:phrase|words)?:?\s*((?:\w+\s+){11,23}\w+)").unwrap()
        });
        let mut out = Vec::new();
        for caps in SEED_CONTEXT.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let (valid, confidence) = bip39::validate_seed_phrase(m.as_str());
            if !valid {
                continue;
            }
            if let Some(span) = span_from_match(
                text,
                m.start(),
                m.end(),
                "SEED_PHRASE",
                confidence,
                "financial",
                Tier::Checksum,
            ) {
                out.push(span);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_swift_boosted_by_context() {
        let text = "Please use SWIFT code DEUTDEFF for the wire.";
        let spans = FinancialDetector.detect(text);
        let swift = spans.iter().find(|s| s.entity_type == "SWIFT_BIC");
        assert!(swift.is_some());
        assert!(swift.unwrap().confidence > 0.4);
    }

    #[test]
    fn ethereum_address_detected() {
        let text = "Send to 0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed please.";
        let spans = FinancialDetector.detect(text);
        assert!(spans.iter().any(|s| s.entity_type == "ETHEREUM_ADDRESS"));
    }
}
