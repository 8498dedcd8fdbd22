//! openrisk-core: detection, merge, and scoring for sensitive-data risk
//! assessment. Given a piece of text, `detect` finds PII/PHI/secret spans
//! and runs them through the merge pipeline and allowlist; `scorer::score`
//! turns the resulting entity counts into a 0-100 risk score and tier.
//!
//! File/object extraction and storage adapters live outside this crate —
//! `adapter_merger` only normalizes and merges counts those adapters have
//! already produced.

pub mod adapter_merger;
pub mod allowlist;
pub mod config;
pub mod detectors;
pub mod error;
pub mod labels;
pub mod merge;
pub mod orchestrator;
pub mod registry;
pub mod scorer;
pub mod types;
pub mod validators;

pub use config::Config;
pub use error::{OpenRiskError, Result};
pub use types::{Category, DetectionResult, ExposureLevel, RiskTier, ScoringResult, Span, Tier};

/// Run the full detection pipeline over `text` using `config`.
pub fn detect(text: &str, config: &Config) -> Result<DetectionResult> {
    orchestrator::detect(text, config)
}

/// Run detection with default configuration.
pub fn detect_default(text: &str) -> Result<DetectionResult> {
    orchestrator::detect(text, &Config::default())
}

/// Score a detection result at a given exposure level.
pub fn score(result: &DetectionResult, exposure: ExposureLevel) -> ScoringResult {
    scorer::score(&result.entity_counts, exposure, None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_detect_and_score() {
        let text = "Patient John Smith, SSN 123-45-6789, card 4111 1111 1111 1111.";
        let result = detect_default(text).unwrap();
        assert!(result.has_pii());
        let scoring = score(&result, ExposureLevel::Internal);
        assert!(scoring.score > 0);
    }
}
