//! Additional-pattern detector (tier PATTERN): age, employer, health-plan
//! IDs, bank routing, employee IDs (spec §4.3). Validates `AGE ∈ [0,120]`.

use super::{span_from_match, Detector, DetectorKind};
use crate::types::{Span, Tier};
use once_cell::sync::Lazy;
use regex::Regex;

static AGE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bage:?\s*(\d{1,3})\b").unwrap());
static EMPLOYER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bemployer:?\s*([A-Z][\w&.,' -]{2,40})\b").unwrap());
static HEALTH_PLAN_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bhealth\s*plan\s*(?:id)?:?\s*([A-Za-z0-9-]{6,15})\b").unwrap());
static BANK_ROUTING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\brouting\s*(?:number|#|no\.?)?:?\s*(\d{9})\b").unwrap());
static EMPLOYEE_ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bemployee\s*(?:id|#)?:?\s*([A-Za-z0-9-]{4,12})\b").unwrap());

pub struct AdditionalDetector;

impl Detector for AdditionalDetector {
    fn kind(&self) -> DetectorKind {
        DetectorKind::Additional
    }

    fn tier(&self) -> Tier {
        Tier::Pattern
    }

    fn detect(&self, text: &str) -> Vec<Span> {
        let mut spans = Vec::new();

        for caps in AGE_RE.captures_iter(text) {
            let Some(m) = caps.get(1) else { continue };
            let Ok(age) = m.as_str().parse::<u32>() else { continue };
            if age > 120 {
                continue;
            }
            if let Some(span) = span_from_match(text, m.start(), m.end(), "AGE", 0.7, "additional", Tier::Pattern) {
                spans.push(span);
            }
        }

        for (re, entity_type, confidence) in [
            (&*EMPLOYER_RE, "EMPLOYER", 0.55),
            (&*HEALTH_PLAN_RE, "HEALTH_PLAN_ID", 0.65),
            (&*BANK_ROUTING_RE, "BANK_ROUTING", 0.6),
            (&*EMPLOYEE_ID_RE, "EMPLOYEE_ID", 0.55),
        ] {
            for caps in re.captures_iter(text) {
                let Some(m) = caps.get(1) else { continue };
                if let Some(span) = span_from_match(text, m.start(), m.end(), entity_type, confidence, "additional", Tier::Pattern) {
                    spans.push(span);
                }
            }
        }

        spans
    }
}
