//! Pattern detector (tier PATTERN): static catalogue of compiled
//! expressions for PII, healthcare identifiers, government IDs, and
//! credentials-in-context (spec §4.3).

use super::{span_from_match, Detector, DetectorKind};
use crate::types::{Span, Tier};
use once_cell::sync::Lazy;
use regex::Regex;

struct PatternEntry {
    regex: Regex,
    entity_type: &'static str,
    confidence: f64,
    group: usize,
}

fn entry(pattern: &str, entity_type: &'static str, confidence: f64, group: usize) -> PatternEntry {
    PatternEntry {
        regex: Regex::new(pattern).unwrap_or_else(|e| panic!("bad pattern for {entity_type}: {e}")),
        entity_type,
        confidence,
        group,
    }
}

/// The `regex` crate's finite-automaton engine is linear-time in input
/// length by construction — it cannot backtrack exponentially, so the
/// ReDoS mitigation spec §9 requires is satisfied structurally rather
/// than by a per-match timeout wrapper.
static PATTERNS: Lazy<Vec<PatternEntry>> = Lazy::new(|| {
    vec![
        // --- contact / general PII ---
        entry(r"\b[\w.+-]+@[\w-]+\.[A-Za-z]{2,}\b", "EMAIL", 0.95, 0),
        entry(r"\b\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b", "PHONE", 0.85, 0),
        entry(r"\bfax:?\s*\(?\d{3}\)?[-.\s]\d{3}[-.\s]\d{4}\b", "FAX", 0.8, 0),
        entry(
            r"\b(?:19|20)\d{2}-(?:0[1-9]|1[0-2])-(?:0[1-9]|[12]\d|3[01])\b",
            "DATE",
            0.75,
            0,
        ),
        entry(
            r"\b(?:0[1-9]|1[0-2])/(?:0[1-9]|[12]\d|3[01])/(?:19|20)\d{2}\b",
            "DATE",
            0.7,
            0,
        ),
        entry(r"\b([01]?\d|2[0-3]):[0-5]\d(?::[0-5]\d)?\s*(?:[AaPp][Mm])?\b", "TIME", 0.55, 0),
        entry(r"\b\d{1,3}\s+[A-Z][a-zA-Z]+(?:\s[A-Z][a-zA-Z]+)*\s(?:St|Street|Ave|Avenue|Rd|Road|Blvd|Dr|Drive|Ln|Lane|Ct|Court)\.?\b", "ADDRESS", 0.6, 0),
        entry(r"\b\d{5}(?:-\d{4})?\b", "ZIP", 0.35, 0),
        entry(r"\bage:?\s*(\d{1,3})\b", "AGE", 0.6, 0),

        // --- healthcare ---
        entry(r"\bMRN:?\s*([A-Za-z0-9]{6,12})\b", "MRN", 0.75, 1),
        entry(r"\bNPI:?\s*(\d{10})\b", "NPI", 0.8, 1),
        entry(r"\bMBI:?\s*([A-Za-z0-9]{4}-?[A-Za-z0-9]{3}-?[A-Za-z0-9]{4})\b", "MBI", 0.75, 1),
        entry(r"\bNDC:?\s*(\d{4,5}-\d{3,4}-\d{1,2})\b", "NDC", 0.8, 1),
        entry(r"\b(?:room|rm)\.?\s*#?\s*(\d{1,4}[A-Za-z]?)\b", "ROOM_BED", 0.55, 0),
        entry(r"\bRx:?\s*#?\s*(\d{5,9})\b", "PRESCRIPTION", 0.6, 0),
        entry(r"\b(?:CVS|Walgreens|Rite Aid|Walmart Pharmacy)\b", "FACILITY", 0.55, 0),
        entry(r"\b[A-Z][a-zA-Z]+ (?:Hospital|Medical Center|Clinic|Health System)\b", "FACILITY", 0.55, 0),

        // --- government IDs ---
        entry(r"\b\d{3}-\d{2}-\d{4}\b", "SSN", 0.9, 0),
        entry(r"\b[A-Z]{1,2}\d{6,9}\b", "PASSPORT", 0.4, 0),
        entry(r"\bDLN:?\s*([A-Za-z0-9]{6,12})\b", "DRIVER_LICENSE", 0.5, 1),
        entry(r"\b(?:military id|dod id):?\s*(\d{9,10})\b", "MILITARY_ID", 0.6, 1),

        // --- financial (format only; checksum detector re-validates) ---
        entry(r"\b(?:\d[ -]*?){13,19}\b", "CREDIT_CARD", 0.3, 0),
        entry(r"\b[A-Z]{2}\d{2}[A-Z0-9]{11,30}\b", "IBAN", 0.4, 0),
    ]
});

pub struct PatternDetector;

impl Detector for PatternDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Pattern
    }

    fn tier(&self) -> Tier {
        Tier::Pattern
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();
        for p in PATTERNS.iter() {
            for caps in p.regex.captures_iter(text) {
                let Some(m) = caps.get(p.group) else { continue };
                if let Some(span) = span_from_match(
                    text,
                    m.start(),
                    m.end(),
                    p.entity_type,
                    p.confidence,
                    "pattern",
                    Tier::Pattern,
                ) {
                    spans.push(span);
                }
            }
        }
        spans
    }
}
