//! # Space Syntax Metrics
//!
//! Closed-form integration family computed from one node's BFS depth
//! statistics, plus the [`Metric`] container the analyses publish.
//!
//! With `N` reached nodes (origin included) and total depth `TD`:
//!
//! ```text
//! MD  = TD / (N - 1)                                   mean depth
//! RA  = 2 (MD - 1) / (N - 2)                           relative asymmetry
//! D   = 2 ((log2((N + 2) / 3) - 1) N + 1) / ((N - 1)(N - 2))
//! RRA = RA / D                                         real relative asymmetry
//! I   = 1 / RRA                                        integration
//! ```
//!
//! The evaluation order above is kept exactly so results are reproducible
//! bit for bit. Everything is `f32` to match the published vectors.

use serde::{Deserialize, Serialize};

use crate::traversal::DepthStats;

pub const DEPTH: &str = "Depth";
pub const INTEGRATION: &str = "Integration";
pub const TOTAL_DEPTH: &str = "TD";
pub const MEAN_DEPTH: &str = "MD";
pub const RELATIVE_ASYMMETRY: &str = "RA";
pub const REAL_RELATIVE_ASYMMETRY: &str = "RRA";

/// Integration-family values for one origin node.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationStats {
    pub integration: f32,
    pub total_depth: f32,
    pub mean_depth: f32,
    pub relative_asymmetry: f32,
    pub real_relative_asymmetry: f32,
}

fn log2(value: f32) -> f32 {
    value.ln() / 2f32.ln()
}

/// Expected RA of a random graph with `n` nodes; normalizes RA into RRA.
pub fn diamond_value(n: f32) -> f32 {
    2.0 * ((log2((n + 2.0) / 3.0) - 1.0) * n + 1.0) / ((n - 1.0) * (n - 2.0))
}

/// Evaluate the formulas for `node_count` reached nodes and `total_depth`.
///
/// With fewer than two nodes there is no sample: everything except `TD`
/// is `NaN`. `RRA == 0` yields `integration == +inf`.
pub fn integration_stats(node_count: u32, total_depth: u64) -> IntegrationStats {
    let td = total_depth as f32;
    if node_count < 2 {
        return IntegrationStats {
            integration: f32::NAN,
            total_depth: td,
            mean_depth: f32::NAN,
            relative_asymmetry: f32::NAN,
            real_relative_asymmetry: f32::NAN,
        };
    }

    let n = node_count as f32;
    let md = td / (n - 1.0);
    let ra = 2.0 * (md - 1.0) / (n - 2.0);
    let d = diamond_value(n);
    let rra = ra / d;

    IntegrationStats {
        integration: 1.0 / rra,
        total_depth: td,
        mean_depth: md,
        relative_asymmetry: ra,
        real_relative_asymmetry: rra,
    }
}

impl From<DepthStats> for IntegrationStats {
    fn from(stats: DepthStats) -> Self {
        integration_stats(stats.node_count, stats.total_depth)
    }
}

// ============================================================================
// Metric
// ============================================================================

/// A named per-node value vector; `values[i]` belongs to node `i` and
/// `NaN` means "no data at this node".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub values: Vec<f32>,
}

impl Metric {
    pub fn new(name: impl Into<String>, values: Vec<f32>) -> Self {
        Self { name: name.into(), values }
    }

    pub fn get(&self, node: u32) -> Option<f32> {
        self.values.get(node as usize).copied()
    }

    /// Smallest and largest finite value, if any.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }

    /// Nodes with a defined (non-NaN) value.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| !v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_insufficient_sample_is_nan() {
        for n in [0, 1] {
            let stats = integration_stats(n, 0);
            assert!(stats.integration.is_nan());
            assert!(stats.mean_depth.is_nan());
            assert!(stats.relative_asymmetry.is_nan());
            assert!(stats.real_relative_asymmetry.is_nan());
            assert_eq!(stats.total_depth, 0.0);
        }
    }

    #[test]
    fn test_star_hub_is_infinitely_integrated() {
        let stats = integration_stats(5, 4);
        assert_eq!(stats.mean_depth, 1.0);
        assert_eq!(stats.relative_asymmetry, 0.0);
        assert_eq!(stats.real_relative_asymmetry, 0.0);
        assert_eq!(stats.integration, f32::INFINITY);
    }

    #[test]
    fn test_chain_end() {
        // 5-node chain seen from an end: TD = 0+1+2+3+4.
        let stats = integration_stats(5, 10);
        assert_eq!(stats.mean_depth, 2.5);
        assert_eq!(stats.relative_asymmetry, 1.0);
        let d = diamond_value(5.0);
        assert!(close(d, 0.351_99), "D = {d}");
        assert!(close(stats.real_relative_asymmetry, 1.0 / d));
        assert!(close(stats.integration, d));
    }

    #[test]
    fn test_from_depth_stats() {
        let stats = IntegrationStats::from(DepthStats { max_depth: 1, total_depth: 4, node_count: 5 });
        assert_eq!(stats, integration_stats(5, 4));
    }

    #[test]
    fn test_value_range_skips_non_finite() {
        let metric = Metric::new("RA", vec![f32::NAN, 2.0, f32::INFINITY, -1.0]);
        assert_eq!(metric.value_range(), Some((-1.0, 2.0)));
        assert_eq!(metric.defined_count(), 3);
        assert_eq!(Metric::new("x", vec![f32::NAN]).value_range(), None);
    }
}
