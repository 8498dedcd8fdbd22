//! Tunables for the detection pipeline (spec §6).
//!
//! `Config` is always-valid: the only way to build one is through
//! `Config::default()`, `Config::builder()`, or `Config::from_env()`, each
//! of which validates before returning.

use std::collections::HashSet;
use std::env;

/// Default worker-pool size for the orchestrator. Matches the reference
/// implementation's `MAX_DETECTOR_WORKERS`.
pub const DEFAULT_MAX_WORKERS: usize = 8;

pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.5;
pub const DEFAULT_MAX_TEXT_SIZE: usize = 1_000_000;
pub const DEFAULT_DETECTOR_TIMEOUT_MS: u64 = 120_000;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub min_confidence: f64,
    pub max_text_size: usize,
    pub detector_timeout_ms: u64,
    pub max_file_size: u64,
    pub max_workers: usize,
    /// `None` means "all registered detectors enabled".
    pub enabled_detectors: Option<HashSet<String>>,
    pub include_clinical_context: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            max_text_size: DEFAULT_MAX_TEXT_SIZE,
            detector_timeout_ms: DEFAULT_DETECTOR_TIMEOUT_MS,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            max_workers: DEFAULT_MAX_WORKERS,
            enabled_detectors: None,
            include_clinical_context: false,
        }
    }
}

impl Config {
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Load overrides from `OPENRISK_*` environment variables, falling
    /// back to defaults on anything missing or unparseable. Never fails —
    /// a bad env var is logged and ignored rather than crashing the host.
    pub fn from_env() -> Self {
        let mut cfg = Config::default();

        if let Some(v) = env_parse::<f64>("OPENRISK_MIN_CONFIDENCE") {
            cfg.min_confidence = v;
        }
        if let Some(v) = env_parse::<usize>("OPENRISK_MAX_TEXT_SIZE") {
            cfg.max_text_size = v;
        }
        if let Some(v) = env_parse::<u64>("OPENRISK_DETECTOR_TIMEOUT_MS") {
            cfg.detector_timeout_ms = v;
        }
        if let Some(v) = env_parse::<u64>("OPENRISK_MAX_FILE_SIZE") {
            cfg.max_file_size = v;
        }
        if let Some(v) = env_parse::<bool>("OPENRISK_INCLUDE_CLINICAL_CONTEXT") {
            cfg.include_clinical_context = v;
        }

        cfg.validate();
        cfg
    }

    fn validate(&mut self) {
        if !(0.0..=1.0).contains(&self.min_confidence) {
            tracing::warn!(
                value = self.min_confidence,
                "min_confidence out of [0,1], clamping"
            );
            self.min_confidence = self.min_confidence.clamp(0.0, 1.0);
        }
        if self.max_text_size == 0 {
            tracing::warn!("max_text_size was 0, resetting to default");
            self.max_text_size = DEFAULT_MAX_TEXT_SIZE;
        }
        if self.max_workers == 0 {
            self.max_workers = DEFAULT_MAX_WORKERS;
        }
    }

    pub fn is_detector_enabled(&self, name: &str) -> bool {
        match &self.enabled_detectors {
            None => true,
            Some(set) => set.contains(name),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => Some(v),
            Err(_) => {
                tracing::warn!(key, raw, "could not parse env override, ignoring");
                None
            }
        },
        Err(_) => None,
    }
}

#[derive(Debug, Default)]
pub struct ConfigBuilder {
    inner: OptionalConfig,
}

#[derive(Debug, Default)]
struct OptionalConfig {
    min_confidence: Option<f64>,
    max_text_size: Option<usize>,
    detector_timeout_ms: Option<u64>,
    max_file_size: Option<u64>,
    max_workers: Option<usize>,
    enabled_detectors: Option<HashSet<String>>,
    include_clinical_context: Option<bool>,
}

impl ConfigBuilder {
    pub fn min_confidence(mut self, v: f64) -> Self {
        self.inner.min_confidence = Some(v);
        self
    }
    pub fn max_text_size(mut self, v: usize) -> Self {
        self.inner.max_text_size = Some(v);
        self
    }
    pub fn detector_timeout_ms(mut self, v: u64) -> Self {
        self.inner.detector_timeout_ms = Some(v);
        self
    }
    pub fn max_file_size(mut self, v: u64) -> Self {
        self.inner.max_file_size = Some(v);
        self
    }
    pub fn max_workers(mut self, v: usize) -> Self {
        self.inner.max_workers = Some(v);
        self
    }
    pub fn enabled_detectors(mut self, v: HashSet<String>) -> Self {
        self.inner.enabled_detectors = Some(v);
        self
    }
    pub fn include_clinical_context(mut self, v: bool) -> Self {
        self.inner.include_clinical_context = Some(v);
        self
    }

    pub fn build(self) -> Config {
        let defaults = Config::default();
        let mut cfg = Config {
            min_confidence: self.inner.min_confidence.unwrap_or(defaults.min_confidence),
            max_text_size: self.inner.max_text_size.unwrap_or(defaults.max_text_size),
            detector_timeout_ms: self
                .inner
                .detector_timeout_ms
                .unwrap_or(defaults.detector_timeout_ms),
            max_file_size: self.inner.max_file_size.unwrap_or(defaults.max_file_size),
            max_workers: self.inner.max_workers.unwrap_or(defaults.max_workers),
            enabled_detectors: self.inner.enabled_detectors,
            include_clinical_context: self
                .inner
                .include_clinical_context
                .unwrap_or(defaults.include_clinical_context),
        };
        cfg.validate();
        cfg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.min_confidence, 0.5);
        assert_eq!(cfg.max_text_size, 1_000_000);
        assert_eq!(cfg.max_workers, 8);
    }

    #[test]
    fn builder_clamps_bad_confidence() {
        let cfg = Config::builder().min_confidence(3.0).build();
        assert_eq!(cfg.min_confidence, 1.0);
    }
}
