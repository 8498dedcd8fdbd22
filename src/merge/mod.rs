//! Merge pipeline (spec §4.4): a fixed sequence of pure stages, each
//! producing an equal-or-smaller span list, that turns raw detector output
//! into the final non-overlapping span set. Grounded in the pattern of
//! independent `fn(Vec<Span>) -> Vec<Span>` stage functions chained in
//! order; every stage here is a free function so it can be unit-tested in
//! isolation.

use crate::registry;
use crate::types::{is_clinical_context_type, is_name_entity_type, types_compatible, Span, Tier};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Run every stage in spec order and return the final span set.
/// `include_clinical_context` skips stage 2's drop so clinical-context
/// spans survive to the rest of the pipeline (spec §6 / SPEC_FULL.md §A).
pub fn merge(text: &str, spans: Vec<Span>, include_clinical_context: bool) -> Vec<Span> {
    let spans = canonicalize_types(spans);
    let spans = if include_clinical_context {
        spans
    } else {
        drop_clinical_context(spans)
    };
    let spans = fix_misclassified_emails(text, spans);
    let spans = trim_whitespace(spans);
    let spans = trim_trailing_punctuation(spans);
    let spans = trim_name_at_newline(spans);
    let spans = trim_name_at_non_name_word(spans);
    let spans = snap_to_word_boundaries(text, spans);
    let spans = filter_short_names(spans);
    let spans = filter_city_as_name(spans);
    let spans = filter_ml_mrn_on_id_cards(text, spans);
    let spans = filter_tracking_numbers(text, spans);
    let spans = merge_adjacent_addresses(text, spans);
    let spans = remove_contained_spans(spans);
    let spans = deduplicate_exact(spans);
    let spans = select_non_overlapping(spans);
    sort_by_start(spans)
}

/// Stage 1: canonicalize entity types via the registry's alias table.
fn canonicalize_types(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .map(|s| {
            let canonical = registry::normalize_type(&s.entity_type, Some(&s.detector));
            s.with_type(canonical)
        })
        .collect()
}

/// Stage 2: drop spans whose type is clinical context, not identifying.
fn drop_clinical_context(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter(|s| !is_clinical_context_type(&s.entity_type))
        .collect()
}

static TRAILING_DOT_WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w.+-]+@[\w.-]+\.\w+$").unwrap());

/// Stage 3: a pattern detector that classified the following sentence word
/// as part of the email (e.g. trailing period absorbed) gets trimmed back
/// to the longest valid email prefix.
fn fix_misclassified_emails(_text: &str, spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .map(|s| {
            if s.entity_type != "EMAIL" {
                return s;
            }
            let trimmed = s.text.trim_end_matches(['.', ',', ';', ':', ')']);
            if trimmed.len() == s.text.len() || !TRAILING_DOT_WORD.is_match(trimmed) {
                return s;
            }
            let new_end = s.start + trimmed.len();
            s.with_range(s.start, new_end, trimmed.to_string())
        })
        .collect()
}

/// Stage 4: trim leading/trailing whitespace captured inside a span.
fn trim_whitespace(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter_map(|s| {
            let trimmed = s.text.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.len() == s.text.len() {
                return Some(s);
            }
            let leading = s.text.len() - s.text.trim_start().len();
            let new_start = s.start + leading;
            let new_end = new_start + trimmed.len();
            Some(s.with_range(new_start, new_end, trimmed.to_string()))
        })
        .collect()
}

const TRAILING_PUNCT_TYPES: &[&str] = &["SSN", "MRN", "NPI", "CREDIT_CARD", "PHONE", "FAX", "ZIP", "DEA", "VIN"];

/// Stage 5: ID-like types never legitimately end in punctuation — trim it.
fn trim_trailing_punctuation(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .map(|s| {
            if !TRAILING_PUNCT_TYPES.contains(&s.entity_type.as_str()) {
                return s;
            }
            let trimmed = s.text.trim_end_matches(['.', ',', ';', ':', '!', '?']);
            if trimmed.len() == s.text.len() {
                return s;
            }
            let new_end = s.start + trimmed.len();
            s.with_range(s.start, new_end, trimmed.to_string())
        })
        .collect()
}

/// Stage 6: a NAME span that absorbed a newline only ever has real name
/// text before the break.
fn trim_name_at_newline(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter_map(|s| {
            if !is_name_entity_type(&s.entity_type) {
                return Some(s);
            }
            match s.text.find('\n') {
                None => Some(s),
                Some(0) => None,
                Some(idx) => {
                    let prefix = s.text[..idx].trim_end();
                    if prefix.is_empty() {
                        return None;
                    }
                    let new_end = s.start + prefix.len();
                    Some(s.with_range(s.start, new_end, prefix.to_string()))
                }
            }
        })
        .collect()
}

/// Words that a NAME span sometimes trails into but are never part of a
/// person's name.
static NON_NAME_TRAILING_WORDS: &[&str] =
    &["said", "reports", "stated", "the", "and", "is", "was", "has", "will", "called"];

/// Stage 7: drop a trailing word from a NAME span if it's a known non-name
/// word (pattern detector over-captured into the next sentence).
fn trim_name_at_non_name_word(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .map(|s| {
            if !is_name_entity_type(&s.entity_type) {
                return s;
            }
            let Some(last_space) = s.text.trim_end().rfind(' ') else {
                return s;
            };
            let trailing = &s.text[last_space + 1..].trim_end();
            if !NON_NAME_TRAILING_WORDS.contains(&trailing.to_ascii_lowercase().as_str()) {
                return s;
            }
            let prefix = s.text[..last_space].trim_end();
            if prefix.is_empty() {
                return s;
            }
            let new_end = s.start + prefix.len();
            s.with_range(s.start, new_end, prefix.to_string())
        })
        .collect()
}

const SNAP_CONFIDENCE_PENALTY: f64 = 0.95;
const SNAP_MAX_EXPANSION: usize = 10;

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Stage 8: expand a span outward to the nearest word boundary on either
/// side, up to `SNAP_MAX_EXPANSION` chars, applying a confidence penalty
/// since the expanded text wasn't what the detector actually matched.
fn snap_to_word_boundaries(text: &str, spans: Vec<Span>) -> Vec<Span> {
    let chars: Vec<char> = text.chars().collect();
    spans
        .into_iter()
        .map(|s| {
            let mut start = s.start;
            let mut end = s.end;

            if start > 0 && start <= chars.len() && is_word_char(chars[start - 1]) {
                let mut expanded = 0;
                while start > 0 && is_word_char(chars[start - 1]) && expanded < SNAP_MAX_EXPANSION {
                    start -= 1;
                    expanded += 1;
                }
            }
            if end < chars.len() && end > 0 && is_word_char(chars[end - 1]) && is_word_char(chars.get(end).copied().unwrap_or(' ')) {
                let mut expanded = 0;
                while end < chars.len() && is_word_char(chars[end]) && expanded < SNAP_MAX_EXPANSION {
                    end += 1;
                    expanded += 1;
                }
            }

            if start == s.start && end == s.end {
                return s;
            }
            let new_text: String = chars[start..end].iter().collect();
            let penalized = s.confidence * SNAP_CONFIDENCE_PENALTY;
            s.with_range(start, end, new_text).with_confidence(penalized)
        })
        .collect()
}

const MIN_NAME_LENGTH: usize = 3;

/// Stage 9: a NAME span shorter than 3 characters is almost always an
/// initial or a false positive, not a full name.
fn filter_short_names(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter(|s| !is_name_entity_type(&s.entity_type) || s.text.trim().chars().count() >= MIN_NAME_LENGTH)
        .collect()
}

/// Common US place-name suffixes; a NAME span ending in one of these is
/// almost always a town, not a surname.
static US_CITY_SUFFIXES: &[&str] = &["burg", "ville", "ford", "town", "field", "dale", "boro", "wood", "haven"];

static CITY_STATE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z][a-zA-Z.' -]+,\s*[A-Z]{2}$").unwrap()
});

/// Stage 10: a NAME span that matches a `City, ST` pattern, or whose last
/// word ends in a common US place-name suffix, is a misclassified city —
/// reclassify it as ADDRESS with a confidence discount when the match came
/// only from the suffix heuristic (spec §4.4 stage 10; `filter_city_as_name`
/// in `merger.py`).
fn filter_city_as_name(spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .map(|s| {
            if s.entity_type != "NAME" {
                return s;
            }
            let trimmed = s.text.trim();

            if CITY_STATE_PATTERN.is_match(trimmed) {
                return s.with_type("ADDRESS");
            }

            let last_word = trimmed.rsplit(' ').next().unwrap_or(trimmed).to_ascii_lowercase();
            if US_CITY_SUFFIXES.iter().any(|suffix| last_word.ends_with(suffix)) {
                return s.with_type("ADDRESS").with_confidence(s.confidence * 0.9);
            }

            s
        })
        .collect()
}

/// Markers that indicate the surrounding text is an ID card / driver's
/// license layout, where a bare 6-10 digit MRN-shaped match is usually a
/// card field (DOB, height/weight code, etc.), not a medical record number.
static ID_CARD_MARKERS: &[&str] = &["DL", "DOB", "EXP", "CLASS", "HGT", "WGT", "EYES", "SEX", "ISS"];

const ID_CARD_MARKER_THRESHOLD: usize = 2;

/// Stage 11: drop ML-tier MRN spans when the full text looks like an ID
/// card (2+ DL-style field markers present).
fn filter_ml_mrn_on_id_cards(text: &str, spans: Vec<Span>) -> Vec<Span> {
    let marker_count = ID_CARD_MARKERS
        .iter()
        .filter(|m| text.to_ascii_uppercase().contains(*m))
        .count();
    if marker_count < ID_CARD_MARKER_THRESHOLD {
        return spans;
    }
    spans
        .into_iter()
        .filter(|s| !(s.entity_type == "MRN" && s.tier == Tier::Ml))
        .collect()
}

static CARRIER_KEYWORDS: &[&str] = &["ups", "fedex", "usps", "tracking", "shipment", "package", "carrier"];
const TRACKING_CONTEXT_WINDOW: usize = 30;

/// Stage 12: an ML-tier MRN span that also looks like a carrier tracking
/// number (digits-only, 10+ chars) gets dropped if a carrier keyword
/// appears within 30 chars to the left.
fn filter_tracking_numbers(text: &str, spans: Vec<Span>) -> Vec<Span> {
    spans
        .into_iter()
        .filter(|s| {
            if s.entity_type != "MRN" || s.tier != Tier::Ml {
                return true;
            }
            if !s.text.chars().all(|c| c.is_ascii_digit()) || s.text.len() < 10 {
                return true;
            }
            let window_start = s.start.saturating_sub(TRACKING_CONTEXT_WINDOW);
            let left = text.get(window_start..s.start).unwrap_or("").to_ascii_lowercase();
            !CARRIER_KEYWORDS.iter().any(|kw| left.contains(kw))
        })
        .collect()
}

const ADDRESS_MERGE_MAX_GAP: usize = 20;

/// Stage 13: merge adjacent ADDRESS spans separated by at most 20 chars of
/// intervening text (street / city / state / zip captured as separate
/// matches) into one span.
fn merge_adjacent_addresses(text: &str, spans: Vec<Span>) -> Vec<Span> {
    let mut addresses: Vec<Span> = spans.iter().filter(|s| s.entity_type == "ADDRESS").cloned().collect();
    let mut rest: Vec<Span> = spans.into_iter().filter(|s| s.entity_type != "ADDRESS").collect();

    addresses.sort_by_key(|s| s.start);
    let mut merged: Vec<Span> = Vec::new();
    for span in addresses {
        if let Some(last) = merged.last_mut() {
            if span.start >= last.end && span.start - last.end <= ADDRESS_MERGE_MAX_GAP {
                let new_text = text.get(last.start..span.end).unwrap_or(&span.text).to_string();
                let combined_confidence = last.confidence.max(span.confidence);
                *last = last.with_range(last.start, span.end, new_text).with_confidence(combined_confidence);
                continue;
            }
        }
        merged.push(span);
    }

    rest.append(&mut merged);
    rest
}

/// A Fenwick tree over compressed start coordinates tracking the maximum
/// `end` among kept spans in one compatibility group. `prefix_max_end(x)`
/// answers "is there a kept span in this group starting at or before x,
/// and how far does the furthest one reach" in O(log n), so stage 14's
/// containment check never has to scan every already-kept span.
struct GroupIndex {
    coords: Vec<usize>,
    tree: Vec<i64>,
}

impl GroupIndex {
    fn new(coords: Vec<usize>) -> Self {
        let len = coords.len();
        GroupIndex {
            coords,
            tree: vec![-1i64; len + 1],
        }
    }

    fn rank(&self, start: usize) -> usize {
        self.coords.partition_point(|&c| c <= start)
    }

    fn update(&mut self, start: usize, end: usize) {
        let end = end as i64;
        let mut i = self.rank(start);
        while i < self.tree.len() {
            if self.tree[i] < end {
                self.tree[i] = end;
            }
            i += i & i.wrapping_neg();
        }
    }

    fn prefix_max_end(&self, start: usize) -> i64 {
        let mut best = -1i64;
        let mut i = self.rank(start);
        while i > 0 {
            if self.tree[i] > best {
                best = self.tree[i];
            }
            i -= i & i.wrapping_neg();
        }
        best
    }
}

/// Stage 14: remove any span fully contained in a longer, type-compatible
/// span, keeping the outer one. Sorted by length desc, then tier desc,
/// then confidence desc so the first span seen for a region is the one
/// to keep. Below `INDEX_THRESHOLD` spans, a direct nested scan is cheaper
/// than building the index; at or above it, use a per-group interval
/// index so the pass stays O(n log n) instead of O(n^2) (spec §9).
const INDEX_THRESHOLD: usize = 100;

fn remove_contained_spans(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then(b.tier.cmp(&a.tier))
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
    });

    if spans.len() < INDEX_THRESHOLD {
        remove_contained_spans_scan(spans)
    } else {
        remove_contained_spans_indexed(spans)
    }
}

fn remove_contained_spans_scan(spans: Vec<Span>) -> Vec<Span> {
    let mut kept: Vec<Span> = Vec::new();
    'outer: for span in spans {
        for existing in &kept {
            if existing.contains(&span) && types_compatible(&existing.entity_type, &span.entity_type) {
                continue 'outer;
            }
        }
        kept.push(span);
    }
    kept
}

fn remove_contained_spans_indexed(spans: Vec<Span>) -> Vec<Span> {
    let mut coords: Vec<usize> = spans.iter().map(|s| s.start).collect();
    coords.sort_unstable();
    coords.dedup();

    let mut indexes: std::collections::HashMap<String, GroupIndex> = std::collections::HashMap::new();
    let mut kept: Vec<Span> = Vec::new();

    for span in spans {
        let key = crate::types::compatibility_group_key(&span.entity_type);
        let index = indexes
            .entry(key)
            .or_insert_with(|| GroupIndex::new(coords.clone()));

        if index.prefix_max_end(span.start) >= span.end as i64 {
            continue;
        }
        index.update(span.start, span.end);
        kept.push(span);
    }
    kept
}

/// Stage 15: drop exact duplicates (same start, end, type), keeping the
/// highest tier then highest confidence.
fn deduplicate_exact(spans: Vec<Span>) -> Vec<Span> {
    let mut seen: std::collections::HashMap<(usize, usize, String), Span> = std::collections::HashMap::new();
    for span in spans {
        let key = (span.start, span.end, span.entity_type.clone());
        match seen.get(&key) {
            Some(existing) if existing.tier > span.tier => continue,
            Some(existing) if existing.tier == span.tier && existing.confidence >= span.confidence => continue,
            _ => {
                seen.insert(key, span);
            }
        }
    }
    seen.into_values().collect()
}

/// Stage 16: greedy selection of a non-overlapping span set, in priority
/// order (tier desc, confidence desc, length desc, start asc).
fn select_non_overlapping(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by(|a, b| {
        b.tier
            .cmp(&a.tier)
            .then(b.confidence.partial_cmp(&a.confidence).unwrap_or(std::cmp::Ordering::Equal))
            .then(b.len().cmp(&a.len()))
            .then(a.start.cmp(&b.start))
    });

    let mut taken: Vec<Span> = Vec::new();
    let mut occupied: HashSet<usize> = HashSet::new();
    for span in spans {
        if (span.start..span.end).any(|i| occupied.contains(&i)) {
            continue;
        }
        occupied.extend(span.start..span.end);
        taken.push(span);
    }
    taken
}

/// Stage 17: final output order is by start offset.
fn sort_by_start(mut spans: Vec<Span>) -> Vec<Span> {
    spans.sort_by_key(|s| s.start);
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Tier;

    fn span(start: usize, end: usize, text: &str, entity_type: &str, confidence: f64, tier: Tier) -> Span {
        Span::new(start, end, text, entity_type, confidence, "test", tier).unwrap()
    }

    #[test]
    fn drops_clinical_context_types() {
        let spans = vec![span(0, 8, "headache", "DIAGNOSIS", 0.8, Tier::Pattern)];
        assert!(drop_clinical_context(spans).is_empty());
    }

    #[test]
    fn trims_whitespace_inside_span() {
        let spans = vec![span(0, 6, " abc  ", "NAME", 0.8, Tier::Pattern)];
        let trimmed = trim_whitespace(spans);
        assert_eq!(trimmed[0].text, "abc");
        assert_eq!(trimmed[0].start, 1);
        assert_eq!(trimmed[0].end, 4);
    }

    #[test]
    fn trims_trailing_punctuation_on_id_types() {
        let spans = vec![span(0, 12, "123-45-6789.", "SSN", 0.9, Tier::Checksum)];
        let trimmed = trim_trailing_punctuation(spans);
        assert_eq!(trimmed[0].text, "123-45-6789");
    }

    #[test]
    fn drops_short_name_spans() {
        let spans = vec![span(0, 2, "K.", "NAME", 0.8, Tier::Pattern)];
        assert!(filter_short_names(spans).is_empty());
    }

    #[test]
    fn removes_contained_span_of_compatible_type() {
        let outer = span(0, 20, "123 Main St, Boston", "ADDRESS", 0.9, Tier::Pattern);
        let inner = span(13, 19, "Boston", "CITY", 0.8, Tier::Pattern);
        let kept = remove_contained_spans(vec![outer.clone(), inner]);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].entity_type, "ADDRESS");
    }

    #[test]
    fn indexed_containment_path_matches_scan_above_threshold() {
        // 120 disjoint outer/inner pairs forces the n >= INDEX_THRESHOLD
        // indexed path rather than the nested-scan fallback.
        let mut spans = Vec::new();
        for i in 0..60 {
            let base = i * 40;
            let outer_text = "123 Main St, Boston".to_string();
            let outer = span(base, base + outer_text.len(), &outer_text, "ADDRESS", 0.9, Tier::Pattern);
            let inner = span(base + 13, base + 19, "Boston", "CITY", 0.8, Tier::Pattern);
            spans.push(outer);
            spans.push(inner);
        }
        assert!(spans.len() >= INDEX_THRESHOLD);
        let kept = remove_contained_spans(spans);
        assert_eq!(kept.len(), 60);
        assert!(kept.iter().all(|s| s.entity_type == "ADDRESS"));
    }

    #[test]
    fn deduplicates_exact_duplicate_spans_keeping_higher_tier() {
        let a = span(0, 11, "123-45-6789", "SSN", 0.8, Tier::Pattern);
        let b = span(0, 11, "123-45-6789", "SSN", 0.95, Tier::Checksum);
        let deduped = deduplicate_exact(vec![a, b]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].tier, Tier::Checksum);
    }

    #[test]
    fn select_non_overlapping_prefers_higher_tier() {
        let low = span(0, 11, "123-45-6789", "SSN", 0.99, Tier::Pattern);
        let high = span(2, 9, "3-45-67", "SSN", 0.5, Tier::Checksum);
        let selected = select_non_overlapping(vec![low, high]);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].tier, Tier::Checksum);
    }

    #[test]
    fn full_pipeline_is_idempotent_on_already_clean_spans() {
        let text = "Contact john@example.com now.";
        let spans = vec![span(8, 24, "john@example.com", "EMAIL", 0.95, Tier::Pattern)];
        let once = merge(text, spans.clone(), false);
        let twice = merge(text, once.clone(), false);
        assert_eq!(once.len(), twice.len());
    }
}
