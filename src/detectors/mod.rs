//! Detector trait and the core's detector implementations (spec §4.3).

pub mod additional;
pub mod checksum;
pub mod context_enhancer;
pub mod financial;
pub mod pattern;
pub mod secrets;

use crate::types::{Span, Tier};

/// A detector's identity, used for config lookups and orchestrator
/// bookkeeping — a sum type rather than runtime reflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetectorKind {
    Pattern,
    Checksum,
    Financial,
    Secrets,
    Additional,
    ContextEnhancer,
}

impl DetectorKind {
    pub fn name(self) -> &'static str {
        match self {
            DetectorKind::Pattern => "pattern",
            DetectorKind::Checksum => "checksum",
            DetectorKind::Financial => "financial",
            DetectorKind::Secrets => "secrets",
            DetectorKind::Additional => "additional",
            DetectorKind::ContextEnhancer => "context_enhancer",
        }
    }
}

/// `{name, tier, detect(text)}` — the minimal interface a detection
/// strategy exposes. No runtime reflection: the orchestrator holds a
/// fixed, explicit list of boxed trait objects.
pub trait Detector: Send + Sync {
    fn kind(&self) -> DetectorKind;
    fn tier(&self) -> Tier;
    fn name(&self) -> &'static str {
        self.kind().name()
    }
    /// Detect entities in `text`, returning spans in the source text's
    /// byte-offset index space. A detector that cannot guarantee
    /// `span.matches_source(text)` for every returned span must drop that
    /// span rather than emit it (spec §4.3's invariant).
    fn detect(&self, text: &str) -> Vec<Span>;
}

/// Build one span from a regex match, dropping it (with a debug log
/// rather than a panic) if the match's slice doesn't exactly equal the
/// captured text — guards the source-text invariant at the boundary
/// every detector shares.
pub(crate) fn span_from_match(
    text: &str,
    start: usize,
    end: usize,
    entity_type: &str,
    confidence: f64,
    detector: &str,
    tier: Tier,
) -> Option<Span> {
    let slice = text.get(start..end)?;
    match Span::new(start, end, slice, entity_type, confidence, detector, tier) {
        Ok(span) => Some(span),
        Err(reason) => {
            tracing::debug!(detector, entity_type, reason, "dropping invalid span");
            None
        }
    }
}
