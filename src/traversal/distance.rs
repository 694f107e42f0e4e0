//! Unweighted shortest-path distances from one source.

use super::BreadthFirst;
use crate::view::GraphView;

/// Integer type usable as a distance cell. `UNREACHED` (the type's
/// maximum) marks nodes outside the source's component.
pub trait Distance: Copy + PartialEq + std::fmt::Debug {
    const UNREACHED: Self;

    /// Convert a BFS depth, saturating at `UNREACHED`.
    fn from_depth(depth: u32) -> Self;
}

macro_rules! impl_distance {
    ($($t:ty),*) => {
        $(
            impl Distance for $t {
                const UNREACHED: Self = <$t>::MAX;

                fn from_depth(depth: u32) -> Self {
                    <$t>::try_from(depth).unwrap_or(<$t>::MAX)
                }
            }
        )*
    };
}

impl_distance!(u8, u16, u32, u64, usize);

/// Fills an index-aligned array with BFS distances.
#[derive(Debug, Clone)]
pub struct MinDistanceCalculator<N> {
    bfs: BreadthFirst<N>,
}

impl<N: Copy> Default for MinDistanceCalculator<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Copy> MinDistanceCalculator<N> {
    pub fn new() -> Self {
        Self { bfs: BreadthFirst::new() }
    }

    /// `out[i]` becomes the distance from `source` to node `i`, or
    /// `D::UNREACHED`. `out` must cover `graph.index_bound()` entries.
    pub fn calculate<G, D>(&mut self, graph: &G, source: N, out: &mut [D])
    where
        G: GraphView<Node = N>,
        D: Distance,
    {
        debug_assert!(out.len() >= graph.index_bound(), "distance buffer too short");
        out.fill(D::UNREACHED);
        self.bfs.run(graph, source, |node, depth| {
            out[graph.node_index(node) as usize] = D::from_depth(depth);
        });
    }
}
