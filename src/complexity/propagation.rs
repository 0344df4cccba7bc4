//! Call-graph fixed-point propagation
//!
//! Raises every function's complexity to the join of its local estimate and
//! the complexities of the functions it calls, repeating whole passes until
//! nothing changes. Each pass reads a snapshot taken at its start and commits
//! all promotions at its end, so the outcome does not depend on record order
//! within a pass.
//!
//! Callee names resolve to the first record with that name in document
//! order. Names with no record contribute nothing.

use crate::core::{ComplexityClass, FunctionRecord};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Summary of one propagation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationOutcome {
    /// Passes executed, including the final pass that found no change.
    pub passes: usize,
    /// Total number of complexity promotions committed.
    pub promotions: usize,
    /// False when the pass ceiling stopped the run before a fixed point.
    pub converged: bool,
}

/// Pass ceiling guaranteed to be enough for a monotone run over `records`.
///
/// Each changing pass promotes at least one record by at least one level, so
/// at most `(HEIGHT - 1) * records` passes change something; one more pass
/// confirms the fixed point.
pub fn default_pass_limit(records: usize) -> usize {
    ComplexityClass::HEIGHT * records.max(1) + 1
}

/// Index of the first record for each name.
fn resolve_names(records: &[FunctionRecord]) -> HashMap<&str, usize> {
    let mut resolution = HashMap::with_capacity(records.len());
    for (index, record) in records.iter().enumerate() {
        resolution.entry(record.name.as_str()).or_insert(index);
    }
    resolution
}

/// Resolved callee edges per record, excluding self references.
fn call_edges(records: &[FunctionRecord]) -> Vec<Vec<usize>> {
    let resolution = resolve_names(records);
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut edges: Vec<usize> = record
                .calls
                .iter()
                .filter_map(|name| resolution.get(name.as_str()).copied())
                .filter(|&callee| callee != index)
                .collect();
            edges.sort_unstable();
            edges.dedup();
            edges
        })
        .collect()
}

/// Candidate for one record against a snapshot, with the callee that
/// contributed the maximum (if any callee raised it above the local value).
fn candidate(
    record: &FunctionRecord,
    edges: &[usize],
    snapshot: &[ComplexityClass],
) -> (ComplexityClass, Option<usize>) {
    edges.iter().fold(
        (record.local_complexity, None),
        |(best, source), &callee| {
            let value = snapshot[callee];
            if value > best {
                (value, Some(callee))
            } else {
                (best, source)
            }
        },
    )
}

/// Run propagation to a fixed point with the default pass ceiling.
pub fn propagate(records: &mut [FunctionRecord]) -> PropagationOutcome {
    let limit = default_pass_limit(records.len());
    propagate_with_limit(records, limit)
}

/// Run propagation, stopping after `max_passes` passes at the latest.
pub fn propagate_with_limit(
    records: &mut [FunctionRecord],
    max_passes: usize,
) -> PropagationOutcome {
    let edges = call_edges(records);
    let mut passes = 0;
    let mut promotions = 0;

    while passes < max_passes {
        passes += 1;
        let snapshot: Vec<ComplexityClass> = records.iter().map(|r| r.complexity).collect();

        let updates: Vec<(usize, ComplexityClass, Option<usize>)> = records
            .iter()
            .enumerate()
            .filter_map(|(index, record)| {
                let (value, source) = candidate(record, &edges[index], &snapshot);
                (value > record.complexity).then_some((index, value, source))
            })
            .collect();

        trace!(pass = passes, updates = updates.len(), "Propagation pass");

        if updates.is_empty() {
            debug!(passes, promotions, "Propagation reached fixed point");
            return PropagationOutcome {
                passes,
                promotions,
                converged: true,
            };
        }

        for (index, value, source) in updates {
            let reason = match source {
                Some(callee) => format!(
                    "raised to {} via call to {} (line {})",
                    value, records[callee].name, records[callee].position.line
                ),
                None => format!("raised to {}", value),
            };
            let record = &mut records[index];
            record.complexity = value;
            record.evidence.push(reason);
            promotions += 1;
        }
    }

    warn!(
        passes,
        promotions, "Propagation stopped at pass ceiling before reaching a fixed point"
    );
    PropagationOutcome {
        passes,
        promotions,
        converged: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{FunctionKind, SourcePosition};
    use ComplexityClass::*;

    fn record(name: &str, line: usize, local: ComplexityClass, calls: &[&str]) -> FunctionRecord {
        FunctionRecord::new(
            name,
            SourcePosition::new(line, 1),
            FunctionKind::Declaration,
            "",
        )
        .with_local_estimate(local, vec![])
        .with_calls(calls.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_caller_inherits_callee_complexity() {
        let mut records = vec![
            record("a", 1, Constant, &["b"]),
            record("b", 5, Quadratic, &[]),
        ];
        let outcome = propagate(&mut records);
        assert!(outcome.converged);
        assert_eq!(records[0].complexity, Quadratic);
        assert_eq!(records[1].complexity, Quadratic);
        assert_eq!(
            records[0].evidence,
            vec!["raised to O(n^2) via call to b (line 5)".to_string()]
        );
    }

    #[test]
    fn test_transitive_chain() {
        let mut records = vec![
            record("a", 1, Constant, &["b"]),
            record("b", 2, Linear, &["c"]),
            record("c", 3, Cubic, &[]),
        ];
        let outcome = propagate(&mut records);
        assert!(records.iter().all(|r| r.complexity == Cubic));
        // pass 1 raises a to O(n) and b to O(n^3), pass 2 raises a, pass 3 confirms
        assert_eq!(outcome.promotions, 3);
        assert_eq!(outcome.passes, 3);
    }

    #[test]
    fn test_mutual_recursion_is_not_inflated() {
        let mut records = vec![
            record("a", 1, Linear, &["b"]),
            record("b", 2, Linear, &["a"]),
        ];
        let outcome = propagate(&mut records);
        assert!(outcome.converged);
        assert_eq!(outcome.promotions, 0);
        assert_eq!(outcome.passes, 1);
        assert_eq!(records[0].complexity, Linear);
        assert_eq!(records[1].complexity, Linear);
    }

    #[test]
    fn test_unknown_callees_are_ignored() {
        let mut records = vec![record("a", 1, Linear, &["lodashDeepClone"])];
        propagate(&mut records);
        assert_eq!(records[0].complexity, Linear);
        assert!(records[0].calls.contains("lodashDeepClone"));
    }

    #[test]
    fn test_self_call_does_not_change_anything() {
        let mut records = vec![record("walk", 1, Linear, &["walk"])];
        let outcome = propagate(&mut records);
        assert_eq!(outcome.promotions, 0);
        assert_eq!(records[0].complexity, Linear);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first_declaration() {
        let mut records = vec![
            record("helper", 1, Linear, &[]),
            record("caller", 4, Constant, &["helper"]),
            record("helper", 9, Exponential, &[]),
        ];
        propagate(&mut records);
        assert_eq!(records[1].complexity, Linear);
        assert_eq!(records[2].complexity, Exponential);
    }

    #[test]
    fn test_second_run_is_idempotent() {
        let mut records = vec![
            record("a", 1, Constant, &["b", "c"]),
            record("b", 2, Logarithmic, &["a"]),
            record("c", 3, Linearithmic, &[]),
        ];
        propagate(&mut records);
        let settled = records.clone();
        let outcome = propagate(&mut records);
        assert_eq!(outcome.promotions, 0);
        assert_eq!(records, settled);
    }

    #[test]
    fn test_pass_ceiling_reports_partial_result() {
        let mut records = vec![
            record("a", 1, Constant, &["b"]),
            record("b", 2, Constant, &["c"]),
            record("c", 3, Cubic, &[]),
        ];
        let outcome = propagate_with_limit(&mut records, 1);
        assert!(!outcome.converged);
        assert_eq!(outcome.passes, 1);
        assert_eq!(records[1].complexity, Cubic);
        assert_eq!(records[0].complexity, Constant);
    }

    #[test]
    fn test_default_pass_limit() {
        assert_eq!(default_pass_limit(0), 9);
        assert_eq!(default_pass_limit(10), 81);
    }
}
