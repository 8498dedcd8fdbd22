//! Scorer (spec §4.7): turns entity counts into a 0-100 risk score and
//! tier, driven by entity weight, co-occurrence rules, and exposure.

use crate::registry;
use crate::types::{Category, ExposureLevel, RiskTier, ScoringResult};
use std::collections::{HashMap, HashSet};

const WEIGHT_SCALE: f64 = 4.0;
const DEFAULT_CONFIDENCE: f64 = 0.90;

const CRITICAL_THRESHOLD: u32 = 80;
const HIGH_THRESHOLD: u32 = 55;
const MEDIUM_THRESHOLD: u32 = 31;
const LOW_THRESHOLD: u32 = 11;

struct CoOccurrenceRule {
    name: &'static str,
    categories: &'static [Category],
    multiplier: f64,
}

/// Co-occurrence rules: when every category in `categories` is present,
/// its multiplier applies. The highest-multiplier matching rule wins;
/// rules don't stack. Literal rule set from spec §4.7 / `scorer.py:46-61`.
const CO_OCCURRENCE_RULES: &[CoOccurrenceRule] = &[
    CoOccurrenceRule {
        name: "full_identity",
        categories: &[Category::DirectIdentifier, Category::QuasiIdentifier, Category::Financial],
        multiplier: 2.2,
    },
    CoOccurrenceRule {
        name: "classification_marking_present",
        categories: &[Category::ClassificationMarking],
        multiplier: 2.5,
    },
    CoOccurrenceRule {
        name: "direct_identifier_plus_health",
        categories: &[Category::DirectIdentifier, Category::HealthInfo],
        multiplier: 2.0,
    },
    CoOccurrenceRule {
        name: "direct_identifier_plus_financial",
        categories: &[Category::DirectIdentifier, Category::Financial],
        multiplier: 1.8,
    },
    CoOccurrenceRule {
        name: "credential_present",
        categories: &[Category::Credential],
        multiplier: 1.5,
    },
    CoOccurrenceRule {
        name: "quasi_plus_health",
        categories: &[Category::QuasiIdentifier, Category::HealthInfo],
        multiplier: 1.5,
    },
    CoOccurrenceRule {
        name: "contact_plus_health",
        categories: &[Category::Contact, Category::HealthInfo],
        multiplier: 1.4,
    },
];

fn tier_for_score(score: u32) -> RiskTier {
    if score >= CRITICAL_THRESHOLD {
        RiskTier::Critical
    } else if score >= HIGH_THRESHOLD {
        RiskTier::High
    } else if score >= MEDIUM_THRESHOLD {
        RiskTier::Medium
    } else if score >= LOW_THRESHOLD {
        RiskTier::Low
    } else {
        RiskTier::Minimal
    }
}

/// Score a set of entity type -> occurrence counts. `confidence` scales
/// the whole base score and defaults to 0.90 when not supplied (spec
/// Open Question: the scorer operates on already-merged counts, which
/// carry no single confidence value of their own).
pub fn score(entity_counts: &HashMap<String, usize>, exposure: ExposureLevel, confidence: Option<f64>) -> ScoringResult {
    let confidence = confidence.unwrap_or(DEFAULT_CONFIDENCE).clamp(0.0, 1.0);

    let mut base = 0.0;
    let mut categories: HashSet<Category> = HashSet::new();
    for (entity_type, count) in entity_counts {
        if *count == 0 {
            continue;
        }
        let weight = registry::get_weight(entity_type) as f64;
        let entity_score = weight * WEIGHT_SCALE * (1.0 + (*count as f64).max(1.0).ln()) * confidence;
        base += entity_score;
        categories.insert(registry::get_category(entity_type));
    }

    let mut co_occurrence_multiplier: f64 = 1.0;
    let mut co_occurrence_rules = Vec::new();
    for rule in CO_OCCURRENCE_RULES {
        if rule.categories.iter().all(|c| categories.contains(c)) {
            co_occurrence_rules.push(rule.name.to_string());
            co_occurrence_multiplier = co_occurrence_multiplier.max(rule.multiplier);
        }
    }

    let content_score = (base * co_occurrence_multiplier).min(100.0);
    let exposure_multiplier = exposure.multiplier();
    let final_score = (content_score * exposure_multiplier).min(100.0);
    let score = final_score.round() as u32;

    ScoringResult {
        score,
        tier: tier_for_score(score),
        content_score,
        exposure_multiplier,
        co_occurrence_multiplier,
        co_occurrence_rules,
        categories,
        exposure,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_entities_scores_zero() {
        let counts = HashMap::new();
        let result = score(&counts, ExposureLevel::Private, None);
        assert_eq!(result.score, 0);
        assert_eq!(result.tier, RiskTier::Minimal);
    }

    #[test]
    fn ssn_alone_is_nontrivial() {
        let mut counts = HashMap::new();
        counts.insert("SSN".to_string(), 1);
        let result = score(&counts, ExposureLevel::Private, None);
        assert!(result.score > 0);
    }

    #[test]
    fn higher_exposure_never_decreases_score() {
        let mut counts = HashMap::new();
        counts.insert("SSN".to_string(), 1);
        counts.insert("CREDIT_CARD".to_string(), 1);
        let private = score(&counts, ExposureLevel::Private, None);
        let public = score(&counts, ExposureLevel::Public, None);
        assert!(public.score >= private.score);
    }

    #[test]
    fn more_occurrences_never_decreases_score() {
        let mut one = HashMap::new();
        one.insert("EMAIL".to_string(), 1);
        let mut many = HashMap::new();
        many.insert("EMAIL".to_string(), 10);
        let a = score(&one, ExposureLevel::Internal, None);
        let b = score(&many, ExposureLevel::Internal, None);
        assert!(b.score >= a.score);
    }

    #[test]
    fn score_never_exceeds_100() {
        let mut counts = HashMap::new();
        for t in ["SSN", "CREDIT_CARD", "MRN", "PASSPORT", "PRIVATE_KEY"] {
            counts.insert(t.to_string(), 50);
        }
        let result = score(&counts, ExposureLevel::Public, Some(1.0));
        assert!(result.score <= 100);
    }

    #[test]
    fn direct_identifier_plus_financial_rule_fires() {
        let mut counts = HashMap::new();
        counts.insert("NAME".to_string(), 1);
        counts.insert("CREDIT_CARD".to_string(), 1);
        let result = score(&counts, ExposureLevel::Private, None);
        assert!(result.co_occurrence_rules.contains(&"direct_identifier_plus_financial".to_string()));
    }
}
