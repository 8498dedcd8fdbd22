//! Context enhancer (post-pattern, spec §4.3): for each span, decides
//! `keep | reject | verify` along with an adjusted confidence, using a
//! deny-list, structural checks, and hotword rules. Runs after every
//! tier's detectors but before the merge pipeline.

use crate::types::Span;
use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Keep,
    Reject,
    Verify,
}

/// Phrases that precede a placeholder/example value rather than a real one.
static SAMPLE_HOTWORDS: &[&str] = &[
    "example", "sample", "placeholder", "dummy", "test data", "lorem ipsum", "your_", "xxx-xx-",
];

/// Structural "this isn't a real value" checks: HTML markup, a greeting
/// salutation, or a generic reference-code label.
static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[a-zA-Z][^>]*>").unwrap());
static GREETING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^(?:dear|hello|hi|to whom it may concern)\b").unwrap());
static REFERENCE_CODE_LABEL: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bref(?:erence)?[\s#:-]*$").unwrap());

const HOTWORD_WINDOW: usize = 40;
const VERIFY_CONFIDENCE_CEILING: f64 = 0.6;

pub struct ContextEnhancer;

impl ContextEnhancer {
    /// Evaluate a single span against `text`, returning the verdict and
    /// (for `Keep`/`Verify`) an adjusted confidence.
    pub fn evaluate(&self, text: &str, span: &Span) -> (Verdict, f64) {
        if HTML_TAG.is_match(&span.text) || GREETING.is_match(&span.text) {
            return (Verdict::Reject, 0.0);
        }

        let window_start = span.start.saturating_sub(HOTWORD_WINDOW);
        let left_context = text.get(window_start..span.start).unwrap_or("");
        if REFERENCE_CODE_LABEL.is_match(left_context) {
            return (Verdict::Reject, 0.0);
        }

        let lower_left = left_context.to_ascii_lowercase();
        if SAMPLE_HOTWORDS.iter().any(|hw| lower_left.contains(hw)) {
            return (Verdict::Reject, 0.0);
        }

        if span.confidence < VERIFY_CONFIDENCE_CEILING {
            return (Verdict::Verify, span.confidence);
        }

        (Verdict::Keep, span.confidence)
    }

    /// Apply `evaluate` across a span list, dropping rejects and marking
    /// `needs_review` on anything sent to `verify`.
    pub fn apply(&self, text: &str, spans: Vec<Span>) -> Vec<Span> {
        spans
            .into_iter()
            .filter_map(|span| match self.evaluate(text, &span) {
                (Verdict::Reject, _) => None,
                (Verdict::Keep, confidence) => Some(span.with_confidence(confidence)),
                (Verdict::Verify, confidence) => {
                    let mut verified = span.with_confidence(confidence);
                    verified.needs_review = true;
                    verified.review_reason = Some("low-confidence contextual match".to_string());
                    Some(verified)
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    fn span(start: usize, end: usize, text: &str, confidence: f64) -> Span {
        Span::new(start, end, text, "SSN", confidence, "test", Tier::Pattern).unwrap()
    }

    #[test]
    fn reject_after_example_hotword() {
        let text = "For example, SSN: 123-45-6789 is a placeholder.";
        let s = span(13, 24, "123-45-6789", 0.9);
        let (verdict, _) = ContextEnhancer.evaluate(text, &s);
        assert_eq!(verdict, Verdict::Reject);
    }

    #[test]
    fn reject_after_reference_label() {
        let text = "Ref: 123-45-6789";
        let s = span(5, 16, "123-45-6789", 0.9);
        let (verdict, _) = ContextEnhancer.evaluate(text, &s);
        assert_eq!(verdict, Verdict::Reject);
    }

    #[test]
    fn low_confidence_sent_to_verify() {
        let text = "maybe SSN 123-45-6789";
        let s = span(10, 21, "123-45-6789", 0.4);
        let (verdict, _) = ContextEnhancer.evaluate(text, &s);
        assert_eq!(verdict, Verdict::Verify);
    }

    #[test]
    fn ordinary_high_confidence_span_kept() {
        let text = "Patient SSN: 123-45-6789 on file.";
        let s = span(13, 24, "123-45-6789", 0.9);
        let (verdict, _) = ContextEnhancer.evaluate(text, &s);
        assert_eq!(verdict, Verdict::Keep);
    }
}
