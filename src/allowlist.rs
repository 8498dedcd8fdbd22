//! Allowlist (spec §4.5): context-aware suppression and confidence
//! damping applied to merged spans. Distinct from the merge pipeline —
//! this stage never changes span boundaries, only drops spans or lowers
//! confidence based on surrounding words.

use crate::types::Span;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

const CONTEXT_WINDOW: usize = 50;

/// Literal placeholder/relative-date words that are never real PII
/// regardless of type (spec §4.5's `SAFE_ALLOWLIST`).
static SAFE_ALLOWLIST: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "today",
        "yesterday",
        "tomorrow",
        "unknown",
        "n/a",
        "na",
        "redacted",
        "first name",
        "last name",
        "full name",
        "none",
        "n/a.",
        "tbd",
        "pending",
    ]
    .into_iter()
    .collect()
});

/// Common English words that pattern detectors occasionally match as a
/// short NAME or other low-signal type.
static COMMON_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "the", "and", "for", "with", "this", "that", "from", "have", "been", "will", "not",
        "but", "are", "was", "you", "your", "all", "any", "can", "has",
    ]
    .into_iter()
    .collect()
});

/// Phrases in the left context that indicate the match is being discussed
/// hypothetically, not disclosed ("format is", "e.g.", "such as").
static FALSE_POSITIVE_PHRASES: &[&str] = &[
    "format is",
    "for example",
    "e.g.",
    "such as",
    "i.e.",
    "pattern is",
    "looks like",
    "in the format",
];

/// Clinical labels that, when immediately preceding a span, mean the span
/// is a lab value or coded label rather than identifying data.
static CLINICAL_LABELS: &[&str] = &["lab value:", "result:", "code:", "icd-10:", "cpt:"];

/// Common drug names frequently mistaken for a person's surname by
/// pattern-tier NAME detection (e.g. "Norvasc" looks like a surname).
static DRUG_NAMES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "norvasc", "lipitor", "zoloft", "prozac", "advil", "tylenol", "metformin", "lisinopril",
    ]
    .into_iter()
    .collect()
});

/// Reference-range patterns for ID-like numeric types — "normal range:
/// 70-100" is not an MRN even though it matches the digit shape.
static REFERENCE_RANGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:normal\s+range|reference\s+range|range)\s*:?\s*$").unwrap());

/// Per-type false-positive terms: a span of this type whose exact text
/// (lowercased) is in this set is dropped outright.
static TYPE_FALSE_POSITIVES: Lazy<std::collections::HashMap<&'static str, HashSet<&'static str>>> = Lazy::new(|| {
    [
        ("NAME", ["unknown", "n/a", "patient", "staff", "doctor"].into_iter().collect()),
        ("EMPLOYER", ["n/a", "none", "self-employed"].into_iter().collect()),
        ("ADDRESS", ["n/a", "unknown", "see above"].into_iter().collect()),
    ]
    .into_iter()
    .collect()
});

fn left_context<'a>(text: &'a str, start: usize) -> &'a str {
    let window_start = start.saturating_sub(CONTEXT_WINDOW);
    text.get(window_start..start).unwrap_or("")
}

/// `true` iff `span` should be dropped by the allowlist.
fn is_suppressed(text: &str, span: &Span) -> bool {
    let trimmed = span.text.trim();
    let lower = trimmed.to_ascii_lowercase();

    if SAFE_ALLOWLIST.contains(lower.as_str()) {
        return true;
    }

    if let Some(false_positives) = TYPE_FALSE_POSITIVES.get(span.entity_type.as_str()) {
        if false_positives.contains(lower.as_str()) {
            return true;
        }
    }

    if span.entity_type == "NAME" && (COMMON_WORDS.contains(lower.as_str()) || DRUG_NAMES.contains(lower.as_str())) {
        return true;
    }

    let left = left_context(text, span.start).to_ascii_lowercase();

    if FALSE_POSITIVE_PHRASES.iter().any(|p| left.ends_with(p) || left.contains(p)) {
        return true;
    }

    if CLINICAL_LABELS.iter().any(|l| left.trim_end().ends_with(l)) {
        return true;
    }

    if matches!(span.entity_type.as_str(), "MRN" | "ACCOUNT_NUMBER" | "MEMBER_ID") && REFERENCE_RANGE.is_match(&left) {
        return true;
    }

    false
}

/// Left-context words that mean a DATE span is a document metadata date
/// (publication/version/copyright), not a personal one (spec §4.5).
static DATE_METADATA_WORDS: &[&str] = &["published", "version", "copyright", "effective", "updated"];

/// Left-context words that mean an MRN-shaped span is a room number,
/// phone extension, or lot/batch code, not a medical record number.
static MRN_NON_IDENTIFYING_WORDS: &[&str] = &["room", "extension", "reference", "lot", "batch"];

const CONTEXT_DAMPING: f64 = 0.3;

fn damp_confidence(text: &str, span: &Span) -> f64 {
    let left = left_context(text, span.start).to_ascii_lowercase();

    if matches!(span.entity_type.as_str(), "DATE" | "DOB") && DATE_METADATA_WORDS.iter().any(|w| left.contains(w)) {
        return span.confidence * CONTEXT_DAMPING;
    }

    if span.entity_type == "MRN" && MRN_NON_IDENTIFYING_WORDS.iter().any(|w| left.contains(w)) {
        return span.confidence * CONTEXT_DAMPING;
    }

    span.confidence
}

/// Apply the allowlist: drop suppressed spans, damp the rest.
pub fn apply(text: &str, spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter(|s| !is_suppressed(text, s))
        .map(|s| {
            let confidence = damp_confidence(text, &s);
            s.with_confidence(confidence)
        })
        .collect()
}
