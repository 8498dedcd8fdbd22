//! Adapter Merger (spec §4.8): combines detection results from multiple
//! upstream adapters (e.g. a file-system scanner and a database scanner)
//! into one normalized view, applying a worst-case policy to protection
//! fields so a merge never understates risk.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStrategy {
    /// Union entity types; counts take the max seen for any single type.
    ConservativeUnion,
    /// Counts are summed across inputs.
    SumCounts,
    /// The first input's value wins on conflict.
    FirstWins,
}

/// Normalized context carried alongside counts: whether the object is
/// encrypted, publicly accessible, etc. "Worst case" means the merge
/// keeps whichever side is more exposed/least protected.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedContext {
    pub encrypted: bool,
    pub publicly_accessible: bool,
    pub access_control_enabled: bool,
}

impl NormalizedContext {
    /// Merge two contexts by taking the least-protected value per field.
    pub fn merge_worst_case(&self, other: &NormalizedContext) -> NormalizedContext {
        NormalizedContext {
            encrypted: self.encrypted && other.encrypted,
            publicly_accessible: self.publicly_accessible || other.publicly_accessible,
            access_control_enabled: self.access_control_enabled && other.access_control_enabled,
        }
    }
}

#[derive(Debug, Clone)]
pub struct NormalizedInput {
    pub source: String,
    pub entity_counts: HashMap<String, usize>,
    pub context: NormalizedContext,
}

/// Merge a list of adapter inputs into one normalized result, using
/// `strategy` for entity counts and worst-case protection merging for
/// context regardless of strategy.
pub fn merge(inputs: &[NormalizedInput], strategy: MergeStrategy) -> NormalizedInput {
    let mut merged_counts: HashMap<String, usize> = HashMap::new();
    let mut merged_context: Option<NormalizedContext> = None;
    let mut sources = Vec::new();

    for input in inputs {
        sources.push(input.source.clone());

        for (entity_type, count) in &input.entity_counts {
            merged_counts
                .entry(entity_type.clone())
                .and_modify(|existing| {
                    *existing = match strategy {
                        MergeStrategy::ConservativeUnion => (*existing).max(*count),
                        MergeStrategy::SumCounts => *existing + *count,
                        MergeStrategy::FirstWins => *existing,
                    }
                })
                .or_insert(*count);
        }

        merged_context = Some(match merged_context {
            None => input.context.clone(),
            Some(existing) => existing.merge_worst_case(&input.context),
        });
    }

    NormalizedInput {
        source: sources.join(","),
        entity_counts: merged_counts,
        context: merged_context.unwrap_or(NormalizedContext {
            encrypted: true,
            publicly_accessible: false,
            access_control_enabled: true,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(encrypted: bool, public: bool, access_control: bool) -> NormalizedContext {
        NormalizedContext {
            encrypted,
            publicly_accessible: public,
            access_control_enabled: access_control,
        }
    }

    #[test]
    fn worst_case_prefers_public_over_private() {
        let merged = ctx(true, true, true).merge_worst_case(&ctx(true, false, true));
        assert!(merged.publicly_accessible);
    }

    #[test]
    fn worst_case_prefers_unencrypted() {
        let merged = ctx(true, false, true).merge_worst_case(&ctx(false, false, true));
        assert!(!merged.encrypted);
    }

    #[test]
    fn conservative_union_takes_max_count() {
        let mut a = HashMap::new();
        a.insert("SSN".to_string(), 2);
        let mut b = HashMap::new();
        b.insert("SSN".to_string(), 5);
        let inputs = vec![
            NormalizedInput { source: "a".into(), entity_counts: a, context: ctx(true, false, true) },
            NormalizedInput { source: "b".into(), entity_counts: b, context: ctx(true, false, true) },
        ];
        let merged = merge(&inputs, MergeStrategy::ConservativeUnion);
        assert_eq!(merged.entity_counts["SSN"], 5);
    }

    #[test]
    fn sum_counts_adds_across_inputs() {
        let mut a = HashMap::new();
        a.insert("EMAIL".to_string(), 3);
        let mut b = HashMap::new();
        b.insert("EMAIL".to_string(), 4);
        let inputs = vec![
            NormalizedInput { source: "a".into(), entity_counts: a, context: ctx(true, false, true) },
            NormalizedInput { source: "b".into(), entity_counts: b, context: ctx(true, false, true) },
        ];
        let merged = merge(&inputs, MergeStrategy::SumCounts);
        assert_eq!(merged.entity_counts["EMAIL"], 7);
    }

    #[test]
    fn first_wins_ignores_later_inputs() {
        let mut a = HashMap::new();
        a.insert("PHONE".to_string(), 1);
        let mut b = HashMap::new();
        b.insert("PHONE".to_string(), 99);
        let inputs = vec![
            NormalizedInput { source: "a".into(), entity_counts: a, context: ctx(true, false, true) },
            NormalizedInput { source: "b".into(), entity_counts: b, context: ctx(true, false, true) },
        ];
        let merged = merge(&inputs, MergeStrategy::FirstWins);
        assert_eq!(merged.entity_counts["PHONE"], 1);
    }
}
