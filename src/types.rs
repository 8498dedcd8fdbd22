//! Core data model: Span, Tier, Category, DetectionResult, ScoringResult.
//!
//! Spans are immutable values. Every pipeline stage takes a `Vec<Span>` and
//! returns a new one; nothing is mutated in place.

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Detection authority level. Higher tiers override lower ones during merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Tier {
    Ml = 1,
    Pattern = 2,
    Structured = 3,
    Checksum = 4,
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Tier::Ml => "ML",
            Tier::Pattern => "PATTERN",
            Tier::Structured => "STRUCTURED",
            Tier::Checksum => "CHECKSUM",
        };
        write!(f, "{s}")
    }
}

/// Entity category, used by the scorer's co-occurrence rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    DirectIdentifier,
    QuasiIdentifier,
    Contact,
    Financial,
    HealthInfo,
    Credential,
    ClassificationMarking,
    ClinicalContext,
    Other,
}

/// How broadly an object is accessible. Multiplies risk during scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExposureLevel {
    Private,
    Internal,
    OrgWide,
    Public,
}

impl ExposureLevel {
    /// Case-insensitive parse, as required at any external boundary.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PRIVATE" => Some(ExposureLevel::Private),
            "INTERNAL" => Some(ExposureLevel::Internal),
            "ORG_WIDE" => Some(ExposureLevel::OrgWide),
            "PUBLIC" => Some(ExposureLevel::Public),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            ExposureLevel::Private => 1.0,
            ExposureLevel::Internal => 1.2,
            ExposureLevel::OrgWide => 1.8,
            ExposureLevel::Public => 2.5,
        }
    }
}

impl fmt::Display for ExposureLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ExposureLevel::Private => "PRIVATE",
            ExposureLevel::Internal => "INTERNAL",
            ExposureLevel::OrgWide => "ORG_WIDE",
            ExposureLevel::Public => "PUBLIC",
        };
        write!(f, "{s}")
    }
}

/// Risk tier produced by the scorer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiskTier {
    Minimal,
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for RiskTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskTier::Minimal => "MINIMAL",
            RiskTier::Low => "LOW",
            RiskTier::Medium => "MEDIUM",
            RiskTier::High => "HIGH",
            RiskTier::Critical => "CRITICAL",
        };
        write!(f, "{s}")
    }
}

/// A contiguous character range in the source text carrying a detected
/// entity type and confidence. Immutable: every field is set at
/// construction and never mutated afterward.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub entity_type: String,
    pub confidence: f64,
    pub detector: String,
    pub tier: Tier,
    pub safe_harbor_value: Option<String>,
    pub needs_review: bool,
    pub review_reason: Option<String>,
    pub coref_anchor_value: Option<String>,
    pub token: Option<String>,
}

impl Span {
    /// Construct a span, enforcing spec §3's invariants. `source` is the
    /// full text the span was detected in; when present, the referenced
    /// slice must match `text` exactly.
    pub fn new(
        start: usize,
        end: usize,
        text: impl Into<String>,
        entity_type: impl Into<String>,
        confidence: f64,
        detector: impl Into<String>,
        tier: Tier,
    ) -> Result<Self, String> {
        let text = text.into();
        if start >= end {
            return Err(format!("span start ({start}) must be < end ({end})"));
        }
        if text.len() != end - start {
            return Err(format!(
                "span text length ({}) does not match end-start ({})",
                text.len(),
                end - start
            ));
        }
        if !(0.0..=1.0).contains(&confidence) {
            return Err(format!("confidence {confidence} out of [0,1]"));
        }
        let entity_type = entity_type.into().trim().to_ascii_uppercase();
        Ok(Span {
            start,
            end,
            text,
            entity_type,
            confidence,
            detector: detector.into(),
            tier,
            safe_harbor_value: None,
            needs_review: false,
            review_reason: None,
            coref_anchor_value: None,
            token: None,
        })
    }

    /// Verify the span's text slice against a source string. Detectors
    /// that cannot satisfy this must be skipped with a warning rather than
    /// emit invalid spans (spec §4.3).
    pub fn matches_source(&self, source: &str) -> bool {
        source.get(self.start..self.end) == Some(self.text.as_str())
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Rebuild this span with a different confidence, preserving every
    /// other field. Used throughout the merge pipeline, which never
    /// mutates a span in place.
    pub fn with_confidence(&self, confidence: f64) -> Span {
        Span {
            confidence: confidence.clamp(0.0, 1.0),
            ..self.clone()
        }
    }

    pub fn with_type(&self, entity_type: impl Into<String>) -> Span {
        Span {
            entity_type: entity_type.into(),
            ..self.clone()
        }
    }

    pub fn with_range(&self, start: usize, end: usize, text: impl Into<String>) -> Span {
        Span {
            start,
            end,
            text: text.into(),
            ..self.clone()
        }
    }

    /// `true` iff this span's range overlaps `other`'s.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// `true` iff this span's range fully contains `other`'s.
    pub fn contains(&self, other: &Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// Static partition of related types for containment dedup (spec §3).
/// Two types are compatible iff identical, one is a prefix of the other,
/// or they belong to the same group.
static COMPATIBILITY_GROUPS: Lazy<Vec<HashSet<&'static str>>> = Lazy::new(|| {
    vec![
        // NAME_* subtypes
        [
            "NAME",
            "NAME_PATIENT",
            "NAME_PROVIDER",
            "NAME_RELATIVE",
            "PERSON",
        ]
        .into_iter()
        .collect(),
        // address parts
        ["ADDRESS", "STREET", "CITY", "STATE", "ZIP"]
            .into_iter()
            .collect(),
        ["PHONE", "FAX"].into_iter().collect(),
        ["SSN", "SSN_PARTIAL"].into_iter().collect(),
    ]
});

/// Canonical compatibility-group key for `entity_type`: types sharing a
/// key are mutually compatible. Used by the merge pipeline's indexed
/// containment check, which groups kept spans instead of comparing every
/// pair. Covers the static groups and exact-match; the rarer "one type is
/// a literal prefix of another" case `types_compatible` also allows isn't
/// representable as a partition and isn't exercised by the registry's
/// current type set.
pub fn compatibility_group_key(entity_type: &str) -> String {
    for group in COMPATIBILITY_GROUPS.iter() {
        if group.contains(entity_type) {
            let mut members: Vec<&str> = group.iter().copied().collect();
            members.sort_unstable();
            return members[0].to_string();
        }
    }
    entity_type.to_string()
}

pub fn types_compatible(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    if a.starts_with(b) || b.starts_with(a) {
        return true;
    }
    COMPATIBILITY_GROUPS
        .iter()
        .any(|group| group.contains(a) && group.contains(b))
}

/// Clinical-context categories detected for downstream allowlist use, but
/// filtered from final output (spec §4.4 stage 2). Includes `DRUG` beyond
/// spec's literal six-entry list, per the reference implementation.
pub const CLINICAL_CONTEXT_TYPES: &[&str] = &[
    "LAB_TEST",
    "DIAGNOSIS",
    "MEDICATION",
    "PROCEDURE",
    "PAYER",
    "PHYSICAL_DESC",
    "DRUG",
];

pub fn is_clinical_context_type(entity_type: &str) -> bool {
    CLINICAL_CONTEXT_TYPES.contains(&entity_type)
}

pub const NAME_ENTITY_TYPES: &[&str] = &[
    "NAME",
    "NAME_PATIENT",
    "NAME_PROVIDER",
    "NAME_RELATIVE",
    "PERSON",
    "PER",
];

pub fn is_name_entity_type(entity_type: &str) -> bool {
    if NAME_ENTITY_TYPES.contains(&entity_type) {
        return true;
    }
    for suffix in ["_PATIENT", "_PROVIDER", "_RELATIVE"] {
        if let Some(base) = entity_type.strip_suffix(suffix) {
            return NAME_ENTITY_TYPES.contains(&base);
        }
    }
    false
}

/// Result of running `detect()` over a piece of text.
#[derive(Debug, Clone)]
pub struct DetectionResult {
    pub text: String,
    pub spans: Vec<Span>,
    pub processing_time_ms: f64,
    pub detectors_used: Vec<String>,
    pub detectors_failed: Vec<String>,
    pub warnings: Vec<String>,
    pub degraded: bool,
    pub all_detectors_failed: bool,
    pub entity_counts: HashMap<String, usize>,
}

impl DetectionResult {
    pub fn new(
        text: String,
        spans: Vec<Span>,
        processing_time_ms: f64,
        detectors_used: Vec<String>,
        detectors_failed: Vec<String>,
        warnings: Vec<String>,
        degraded: bool,
        all_detectors_failed: bool,
    ) -> Self {
        let mut entity_counts: HashMap<String, usize> = HashMap::new();
        for span in &spans {
            *entity_counts.entry(span.entity_type.clone()).or_insert(0) += 1;
        }
        DetectionResult {
            text,
            spans,
            processing_time_ms,
            detectors_used,
            detectors_failed,
            warnings,
            degraded,
            all_detectors_failed,
            entity_counts,
        }
    }

    pub fn empty(text: String) -> Self {
        DetectionResult::new(text, Vec::new(), 0.0, Vec::new(), Vec::new(), Vec::new(), false, false)
    }

    pub fn has_pii(&self) -> bool {
        !self.spans.is_empty()
    }

    /// A result is reliable when nothing failed and it wasn't degraded.
    pub fn is_reliable(&self) -> bool {
        !self.degraded && !self.all_detectors_failed
    }
}

/// Result of the scorer (spec §3/§4.7).
#[derive(Debug, Clone)]
pub struct ScoringResult {
    pub score: u32,
    pub tier: RiskTier,
    pub content_score: f64,
    pub exposure_multiplier: f64,
    pub co_occurrence_multiplier: f64,
    pub co_occurrence_rules: Vec<String>,
    pub categories: HashSet<Category>,
    pub exposure: ExposureLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_rejects_bad_range() {
        assert!(Span::new(5, 5, "", "NAME", 0.9, "x", Tier::Pattern).is_err());
    }

    #[test]
    fn span_rejects_text_length_mismatch() {
        assert!(Span::new(0, 5, "abc", "NAME", 0.9, "x", Tier::Pattern).is_err());
    }

    #[test]
    fn span_rejects_bad_confidence() {
        assert!(Span::new(0, 3, "abc", "NAME", 1.5, "x", Tier::Pattern).is_err());
    }

    #[test]
    fn tier_ordering_is_monotonic() {
        assert!(Tier::Ml < Tier::Pattern);
        assert!(Tier::Pattern < Tier::Structured);
        assert!(Tier::Structured < Tier::Checksum);
    }

    #[test]
    fn compatibility_is_symmetric_for_groups() {
        assert!(types_compatible("NAME_PATIENT", "NAME_PROVIDER"));
        assert!(types_compatible("SSN", "SSN_PARTIAL"));
        assert!(!types_compatible("SSN", "PHONE"));
    }

    #[test]
    fn exposure_parse_case_insensitive() {
        assert_eq!(ExposureLevel::parse("public"), Some(ExposureLevel::Public));
        assert_eq!(ExposureLevel::parse("Org_Wide"), Some(ExposureLevel::OrgWide));
        assert_eq!(ExposureLevel::parse("bogus"), None);
    }

    #[test]
    fn exposure_multiplier_is_monotonic() {
        assert!(ExposureLevel::Public.multiplier() > ExposureLevel::OrgWide.multiplier());
        assert!(ExposureLevel::OrgWide.multiplier() > ExposureLevel::Internal.multiplier());
        assert!(ExposureLevel::Internal.multiplier() > ExposureLevel::Private.multiplier());
    }
}
