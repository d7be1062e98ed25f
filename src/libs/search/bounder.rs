use super::node::Bounds;
use crate::libs::variant::VariantGraph;
use rayon::prelude::*;

/// Below this many assignments per worker the slices are summed inline.
const MIN_SLICE: usize = 32;

/// A position already fixed on the path from the root to a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Assignment {
    pub position: usize,
    pub value: u8,
}

/// Computes how assigning a value to a position moves a node's bounds.
///
/// Every link between the position and an already assigned one becomes
/// resolved: its cost (different-value weight if both sides are equal,
/// same-value weight otherwise) is added to the lower bound, and the slack
/// between that cost and the link's worst case is removed from the upper
/// bound. Links to unassigned positions are left for later levels, and a
/// missing link contributes nothing.
#[derive(Debug, Clone, Copy)]
pub struct BoundCalculator<'a> {
    graph: &'a VariantGraph,
}

impl<'a> BoundCalculator<'a> {
    pub fn new(graph: &'a VariantGraph) -> Self {
        Self { graph }
    }

    fn accumulate(&self, position: usize, value: u8, assigned: &[Assignment]) -> Bounds {
        assigned
            .iter()
            .filter_map(|a| {
                self.graph.link(position, a.position).map(|link| {
                    let cost = link.cost(a.value == value);
                    Bounds::new(cost, link.value() - cost)
                })
            })
            .fold(Bounds::default(), |acc, delta| acc + delta)
    }

    /// Bound deltas for giving `position` the value `value`, with `assigned`
    /// holding the values already fixed on the node's path.
    ///
    /// The links are split over at most `workers` slices. The result does not
    /// depend on the split.
    pub fn bounds(
        &self,
        position: usize,
        value: u8,
        assigned: &[Assignment],
        workers: usize,
    ) -> Bounds {
        let workers = workers.clamp(1, (assigned.len() / MIN_SLICE).max(1));
        if workers == 1 {
            return self.accumulate(position, value, assigned);
        }

        let slice = assigned.len().div_ceil(workers);
        assigned
            .par_chunks(slice)
            .map(|chunk| self.accumulate(position, value, chunk))
            .reduce(Bounds::default, |a, b| a + b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::variant::LinkKind;

    fn assign(pairs: &[(usize, u8)]) -> Vec<Assignment> {
        pairs
            .iter()
            .map(|&(position, value)| Assignment { position, value })
            .collect()
    }

    #[test]
    fn resolved_links_move_bounds() {
        let mut graph = VariantGraph::with_positions(4);
        graph.add_weight(LinkKind::Same, 0, 3, 5).unwrap();
        graph.add_weight(LinkKind::Different, 0, 3, 2).unwrap();
        graph.add_weight(LinkKind::Different, 1, 3, 4).unwrap();

        let bounder = BoundCalculator::new(&graph);
        let assigned = assign(&[(0, 0), (1, 0), (2, 1)]);

        // 3 = 0: link 0-3 equal → cost 2, slack 3; link 1-3 equal → cost 4, slack 0
        assert_eq!(bounder.bounds(3, 0, &assigned, 1), Bounds::new(6, 3));
        // 3 = 1: link 0-3 differ → cost 5, slack 0; link 1-3 differ → cost 0, slack 4
        assert_eq!(bounder.bounds(3, 1, &assigned, 1), Bounds::new(5, 4));
    }

    #[test]
    fn missing_links_are_zero() {
        let graph = VariantGraph::with_positions(3);
        let bounder = BoundCalculator::new(&graph);
        let assigned = assign(&[(0, 1), (1, 0)]);
        assert_eq!(bounder.bounds(2, 1, &assigned, 4), Bounds::default());
        assert_eq!(bounder.bounds(2, 1, &[], 4), Bounds::default());
    }

    #[test]
    fn worker_budget_does_not_change_result() {
        let n = 400;
        let mut graph = VariantGraph::with_positions(n + 1);
        for i in 0..n {
            if i % 3 != 0 {
                graph.add_weight(LinkKind::Same, i, n, i % 7).unwrap();
                graph.add_weight(LinkKind::Different, i, n, i % 5).unwrap();
            }
        }
        let assigned: Vec<Assignment> = (0..n)
            .map(|position| Assignment {
                position,
                value: (position % 2) as u8,
            })
            .collect();

        let bounder = BoundCalculator::new(&graph);
        let serial = bounder.bounds(n, 1, &assigned, 1);
        for workers in [2, 3, 8, 64] {
            assert_eq!(bounder.bounds(n, 1, &assigned, workers), serial);
        }
        assert!(serial.lower > 0);
    }
}
