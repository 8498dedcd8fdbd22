//! Orchestrator (spec §4.6/§5): runs every enabled detector against the
//! input text with a worker pool and a per-detector deadline, recovering
//! from individual detector panics/timeouts without failing the whole
//! scan, then hands the combined spans through the context enhancer
//! before the merge pipeline.

use crate::config::Config;
use crate::detectors::context_enhancer::ContextEnhancer;
use crate::detectors::{additional, checksum, financial, pattern, secrets, Detector};
use crate::error::{OpenRiskError, Result};
use crate::types::{DetectionResult, Span};
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

fn registered_detectors() -> Vec<Box<dyn Detector>> {
    vec![
        Box::new(pattern::PatternDetector),
        Box::new(checksum::ChecksumDetector),
        Box::new(financial::FinancialDetector),
        Box::new(secrets::SecretsDetector),
        Box::new(additional::AdditionalDetector),
    ]
}

/// Run a single detector on its own thread, enforcing `timeout` and
/// catching panics so one bad detector can't take down the scan.
fn run_with_deadline(detector: Box<dyn Detector>, text: String, timeout: Duration) -> (String, Option<Vec<Span>>) {
    let name = detector.name().to_string();
    let (tx, rx) = mpsc::channel();

    let handle = thread::spawn(move || {
        let result = panic::catch_unwind(AssertUnwindSafe(|| detector.detect(&text)));
        let _ = tx.send(result.ok());
    });

    match rx.recv_timeout(timeout) {
        Ok(spans) => {
            let _ = handle.join();
            (name, spans)
        }
        Err(_) => {
            tracing::warn!(detector = %name, timeout_ms = timeout.as_millis(), "detector exceeded deadline");
            (name, None)
        }
    }
}

/// Run detection end to end: size gate, worker-pool fan-out with
/// per-detector timeout, context enhancement, then the merge pipeline.
pub fn detect(text: &str, config: &Config) -> Result<DetectionResult> {
    if text.len() > config.max_text_size {
        return Err(OpenRiskError::InputTooLarge {
            size: text.len(),
            max: config.max_text_size,
        });
    }

    let started = Instant::now();
    let timeout = Duration::from_millis(config.detector_timeout_ms);

    let detectors: Vec<Box<dyn Detector>> = registered_detectors()
        .into_iter()
        .filter(|d| config.is_detector_enabled(d.name()))
        .collect();

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.max_workers)
        .build()
        .map_err(|e| OpenRiskError::InvalidInput { reason: format!("failed to build worker pool: {e}") })?;

    let results: Vec<(String, Option<Vec<Span>>)> = pool.install(|| {
        use rayon::prelude::*;
        detectors
            .into_par_iter()
            .map(|d| run_with_deadline(d, text.to_string(), timeout))
            .collect()
    });

    let mut spans = Vec::new();
    let mut detectors_used = Vec::new();
    let mut detectors_failed = Vec::new();
    let mut warnings = Vec::new();

    for (name, outcome) in results {
        match outcome {
            Some(found) => {
                detectors_used.push(name);
                spans.extend(found);
            }
            None => {
                warnings.push(format!("detector '{name}' failed or exceeded its deadline"));
                detectors_failed.push(name);
            }
        }
    }

    let all_detectors_failed = !detectors_failed.is_empty() && detectors_used.is_empty();
    let degraded = !detectors_failed.is_empty();

    let enhancer = ContextEnhancer;
    let spans = enhancer.apply(text, spans);
    let spans: Vec<Span> = spans
        .into_iter()
        .filter(|s| s.confidence >= config.min_confidence)
        .collect();

    let spans = crate::merge::merge(text, spans, config.include_clinical_context);
    let spans = crate::allowlist::apply(text, spans);

    let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;

    Ok(DetectionResult::new(
        text.to_string(),
        spans,
        processing_time_ms,
        detectors_used,
        detectors_failed,
        warnings,
        degraded,
        all_detectors_failed,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_ssn_and_email_together() {
        let cfg = Config::default();
        let text = "Contact jane.smith@corp.example about SSN 123-45-6789.";
        let result = detect(text, &cfg).unwrap();
        assert!(result.spans.iter().any(|s| s.entity_type == "SSN"));
        assert!(result.spans.iter().any(|s| s.entity_type == "EMAIL"));
        assert!(!result.all_detectors_failed);
    }

    #[test]
    fn oversized_input_is_rejected() {
        let cfg = Config::builder().max_text_size(10).build();
        let text = "this text is longer than ten characters";
        let err = detect(text, &cfg).unwrap_err();
        assert!(matches!(err, OpenRiskError::InputTooLarge { .. }));
    }

    #[test]
    fn every_returned_span_matches_source_text() {
        let cfg = Config::default();
        let text = "Card 4111 1111 1111 1111 routing 011000015 ssn 123-45-6789";
        let result = detect(text, &cfg).unwrap();
        for span in &result.spans {
            assert!(span.matches_source(text));
        }
    }
}
