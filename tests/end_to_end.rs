//! End-to-end scenarios exercising detect -> merge -> allowlist -> score
//! through the public API, plus invariant properties via proptest.

use openrisk_core::{detect_default, score, Config, ExposureLevel, Tier};
use proptest::prelude::*;

#[test]
fn ssn_and_phone_both_detected() {
    let text = "Reach Jane at 555-123-4567, SSN 123-45-6789.";
    let result = detect_default(text).unwrap();
    assert!(result.spans.iter().any(|s| s.entity_type == "SSN"));
    assert!(result.spans.iter().any(|s| s.entity_type == "PHONE"));
}

#[test]
fn email_with_trailing_period_is_trimmed() {
    let text = "Please email john.doe@corp.example. Thanks.";
    let result = detect_default(text).unwrap();
    let email = result.spans.iter().find(|s| s.entity_type == "EMAIL");
    assert!(email.is_some());
    assert!(!email.unwrap().text.ends_with('.'));
}

#[test]
fn valid_credit_card_outranks_pattern_tier() {
    let text = "MRN 4111111111111111 on file, card 4111 1111 1111 1111.";
    let result = detect_default(text).unwrap();
    let card = result.spans.iter().find(|s| s.entity_type == "CREDIT_CARD");
    assert!(card.is_some());
    assert_eq!(card.unwrap().tier, Tier::Checksum);
}

#[test]
fn driver_license_context_suppresses_spurious_mrn() {
    let text = "DL 12345678 DOB 01/01/1980 CLASS C EXP 12/2030 HGT 5-10 WGT 180 EYES BRN SEX M ISS 01/01/2020";
    let cfg = Config::default();
    let result = openrisk_core::detect(text, &cfg).unwrap();
    assert!(result.spans.iter().all(|s| !(s.entity_type == "MRN" && s.tier == Tier::Ml)));
}

#[test]
fn tracking_context_suppresses_spurious_mrn() {
    let text = "Your USPS tracking number is 9400111899223197428431, thanks for shipping.";
    let result = detect_default(text).unwrap();
    assert!(result.spans.iter().all(|s| !(s.entity_type == "MRN" && s.tier == Tier::Ml)));
}

#[test]
fn short_initial_name_is_filtered() {
    let text = "Seen by Dr. K. today for a follow-up.";
    let result = detect_default(text).unwrap();
    assert!(result.spans.iter().all(|s| s.text.trim() != "K."));
}

#[test]
fn scoring_reflects_detected_pii() {
    let text = "SSN 123-45-6789, card 4111 1111 1111 1111, email jane@corp.example.";
    let result = detect_default(text).unwrap();
    let scoring = score(&result, ExposureLevel::OrgWide);
    assert!(scoring.score > 0);
    assert!(scoring.score <= 100);
}

#[test]
fn clean_text_scores_zero() {
    let text = "The quick brown fox jumps over the lazy dog.";
    let result = detect_default(text).unwrap();
    let scoring = score(&result, ExposureLevel::Private);
    assert_eq!(scoring.score, 0);
}

proptest! {
    #[test]
    fn every_span_satisfies_invariants(seed in 0u64..1000) {
        let text = format!("SSN 123-45-678{} and email user{}@example.com", seed % 10, seed);
        let result = detect_default(&text).unwrap();
        for span in &result.spans {
            prop_assert!(span.start < span.end);
            prop_assert!(span.text.len() == span.end - span.start);
            prop_assert!((0.0..=1.0).contains(&span.confidence));
            prop_assert!(span.matches_source(&text));
        }
    }

    #[test]
    fn scoring_is_monotonic_in_exposure(count in 1usize..20) {
        let mut counts = std::collections::HashMap::new();
        counts.insert("SSN".to_string(), count);
        let private = openrisk_core::scorer::score(&counts, ExposureLevel::Private, None);
        let public = openrisk_core::scorer::score(&counts, ExposureLevel::Public, None);
        prop_assert!(public.score >= private.score);
    }
}
