//! Checksum detector (tier CHECKSUM): format-plus-validator pairs. A
//! candidate advances only if its validator returns `valid=true`, and the
//! result supersedes lower-tier detections of the same span (spec §4.3).

use super::{span_from_match, Detector, DetectorKind};
use crate::types::{Span, Tier};
use crate::validators::{aba, dea, luhn, mod97, ssn, tracking, vin};
use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

type Validator = fn(&str) -> (bool, f64);

struct CandidatePattern {
    regex: Regex,
    entity_type: &'static str,
    validator: Validator,
}

fn candidate(pattern: &str, entity_type: &'static str, validator: Validator) -> CandidatePattern {
    CandidatePattern {
        regex: Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern for {entity_type}: {e}")),
        entity_type,
        validator,
    }
}

static CANDIDATES: Lazy<Vec<CandidatePattern>> = Lazy::new(|| {
    vec![
        candidate(r"\b\d{3}-\d{2}-\d{4}\b", "SSN", ssn::validate_ssn),
        candidate(
            r"\b(?:\d[ -]?){13,19}\b",
            "CREDIT_CARD",
            luhn::validate_credit_card,
        ),
        candidate(r"\b\d{10}\b", "NPI", luhn::validate_npi),
        candidate(r"\b[A-Z]{2}\d{7}\b", "DEA", dea::validate_dea),
        candidate(
            r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b",
            "IBAN",
            mod97::validate_iban,
        ),
        candidate(r"\b[A-HJ-NPR-Z0-9]{17}\b", "VIN", vin::validate_vin),
        candidate(r"\b\d{9}\b", "BANK_ROUTING", aba::validate_aba_routing),
        candidate(r"\b1Z[A-Z0-9]{16}\b", "TRACKING_NUMBER", tracking::validate_ups),
        candidate(r"\b\d{12}\b", "TRACKING_NUMBER", tracking::validate_fedex),
        candidate(r"\b\d{20,22}\b", "TRACKING_NUMBER", tracking::validate_usps),
    ]
});

pub struct ChecksumDetector;

impl Detector for ChecksumDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Checksum
    }

    fn tier(&self) -> Tier {
        Tier::Checksum
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        CANDIDATES
            .par_iter()
            .flat_map(|c| {
                c.regex
                    .find_iter(text)
                    .filter_map(|m| {
                        let (valid, confidence) = (c.validator)(m.as_str());
                        if !valid {
                            // ValidatorRejected: candidate dropped silently.
                            return None;
                        }
                        span_from_match(
                            text,
                            m.start(),
                            m.end(),
                            c.entity_type,
                            confidence,
                            "checksum",
                            Tier::Checksum,
                        )
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credit_card_gets_checksum_tier() {
        let text = "Visa 4111 1111 1111 1111";
        let spans = ChecksumDetector.detect(text);
        let card = spans.iter().find(|s| s.entity_type == "CREDIT_CARD");
        assert!(card.is_some());
        assert_eq!(card.unwrap().tier, Tier::Checksum);
    }

    #[test]
    fn invalid_dea_is_dropped_silently() {
        let text = "DEA: AB1234569"; // bad check digit
        let spans = ChecksumDetector.detect(text);
        assert!(spans.iter().all(|s| s.entity_type != "DEA"));
    }

    #[test]
    fn every_span_matches_source_text() {
        let text = "SSN 123-45-6789 routing 011000015";
        for span in ChecksumDetector.detect(text) {
            assert!(span.matches_source(text));
        }
    }
}
