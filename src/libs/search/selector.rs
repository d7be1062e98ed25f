use crate::libs::error::PhaseError;
use crate::libs::variant::{Position, VariantGraph};
use std::cmp::Reverse;

/// Decides the order in which positions are branched on.
///
/// Starting from the start position, each step picks the unselected position
/// with the strongest total link weight to the positions already selected.
/// Ties go to the heavier position, then to the lower index, so the order is
/// fixed for a given graph.
#[derive(Debug, Clone)]
pub struct PositionSelector {
    order: Vec<usize>,
    cursor: usize,
}

impl PositionSelector {
    pub fn new(graph: &VariantGraph, start: usize) -> Result<Self, PhaseError> {
        let n = graph.len();
        if n == 0 {
            return Ok(Self {
                order: Vec::new(),
                cursor: 0,
            });
        }
        if start >= n {
            return Err(PhaseError::PositionOutOfRange {
                index: start,
                len: n,
            });
        }
        // Strengths below are partial sums of this total
        graph
            .checked_total_worst_case()
            .ok_or(PhaseError::WeightOverflow)?;

        let mut order = Vec::with_capacity(n);
        let mut selected = vec![false; n];
        let mut strength = vec![0usize; n];

        let mut current = start;
        loop {
            order.push(current);
            selected[current] = true;
            for (other, link) in graph.incident(current) {
                strength[other] += link.value();
            }

            match (0..n)
                .filter(|&idx| !selected[idx])
                .max_by_key(|&idx| {
                    let rank = graph.position(idx).map_or(0, Position::value);
                    (strength[idx], rank, Reverse(idx))
                })
            {
                Some(next) => current = next,
                None => break,
            }
        }

        Ok(Self { order, cursor: 0 })
    }

    /// The full selection order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Positions not yet handed out.
    pub fn remaining(&self) -> usize {
        self.order.len() - self.cursor
    }

    /// Next position to branch on, `None` once the order is exhausted.
    pub fn select_next(&mut self) -> Option<usize> {
        let position = self.order.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(position)
    }

    pub fn last(&self) -> Option<usize> {
        self.order.last().copied()
    }

    /// `true` when `position` closes the selection order.
    pub fn is_last(&self, position: usize) -> bool {
        self.last() == Some(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::libs::variant::LinkKind;

    #[test]
    fn visits_every_position_once() {
        let mut graph = VariantGraph::with_positions(6);
        graph.add_weight(LinkKind::Same, 0, 4, 3).unwrap();
        graph.add_weight(LinkKind::Different, 4, 2, 5).unwrap();
        graph.add_weight(LinkKind::Same, 1, 5, 1).unwrap();

        let mut selector = PositionSelector::new(&graph, 0).unwrap();
        let mut seen = Vec::new();
        while let Some(position) = selector.select_next() {
            let last = selector.is_last(position);
            seen.push(position);
            assert_eq!(last, selector.remaining() == 0);
        }
        assert_eq!(seen.len(), 6);
        assert_eq!(selector.select_next(), None);

        let mut sorted = seen.clone();
        sorted.sort();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn strongest_link_first() {
        let mut graph = VariantGraph::with_positions(5);
        graph.add_weight(LinkKind::Same, 0, 3, 2).unwrap();
        graph.add_weight(LinkKind::Same, 0, 1, 9).unwrap();
        graph.add_weight(LinkKind::Different, 1, 4, 4).unwrap();
        graph.add_weight(LinkKind::Same, 3, 4, 1).unwrap();

        let selector = PositionSelector::new(&graph, 0).unwrap();
        // 1 (9), then 4 (4), then 3 (2 + 1), then the unlinked 2
        assert_eq!(selector.order(), &[0, 1, 4, 3, 2]);
        assert!(selector.is_last(2));
        assert!(!selector.is_last(3));
    }

    #[test]
    fn ties_prefer_weight_then_index() {
        let mut graph = VariantGraph::with_positions(4);
        graph.set_position_weight(3, 5).unwrap();

        let selector = PositionSelector::new(&graph, 1).unwrap();
        assert_eq!(selector.order(), &[1, 3, 0, 2]);

        // Deterministic
        let again = PositionSelector::new(&graph, 1).unwrap();
        assert_eq!(selector.order(), again.order());
    }

    #[test]
    fn overflowing_total_is_an_error() {
        let mut graph = VariantGraph::with_positions(3);
        graph.add_weight(LinkKind::Same, 0, 1, usize::MAX).unwrap();
        graph.add_weight(LinkKind::Different, 0, 2, usize::MAX).unwrap();

        assert!(matches!(
            PositionSelector::new(&graph, 0),
            Err(PhaseError::WeightOverflow)
        ));
    }

    #[test]
    fn bad_start() {
        let graph = VariantGraph::with_positions(2);
        assert!(PositionSelector::new(&graph, 2).is_err());

        let empty = PositionSelector::new(&VariantGraph::new(), 7).unwrap();
        assert!(empty.is_empty());
        assert_eq!(empty.last(), None);
    }
}
