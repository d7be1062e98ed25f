use super::link::{canonical, Link, LinkKind};
use crate::libs::error::PhaseError;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;

/// A variant position: its significance, the column it occupies in the
/// haplotype and, once the search has finished, its phased value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    pub weight: usize,
    pub haplo_index: usize,
    pub resolved: Option<u8>,
}

impl Position {
    pub fn new(haplo_index: usize) -> Self {
        Self {
            weight: 1,
            haplo_index,
            resolved: None,
        }
    }

    /// Ranking value used to break ordering ties.
    pub fn value(&self) -> usize {
        self.weight
    }
}

/// Weighted graph over variant positions.
///
/// Positions are graph nodes, links are undirected edges carrying a
/// same-value and a different-value weight. Edges are always inserted as
/// (lower, upper).
#[derive(Debug, Default, Clone)]
pub struct VariantGraph {
    graph: UnGraph<Position, Link>,
}

impl VariantGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates `n` positions with weight 1, the haplotype index of each being
    /// its own position index.
    pub fn with_positions(n: usize) -> Self {
        let mut graph = Self::new();
        graph.resize(n);
        graph
    }

    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn num_links(&self) -> usize {
        self.graph.edge_count()
    }

    /// Grows or shrinks the graph to `n` positions.
    /// Shrinking drops the trailing positions and their links.
    pub fn resize(&mut self, n: usize) {
        while self.len() < n {
            let idx = self.len();
            self.graph.add_node(Position::new(idx));
        }
        while self.len() > n {
            // Removing the last index never relabels other nodes
            let last = NodeIndex::new(self.len() - 1);
            self.graph.remove_node(last);
        }
    }

    fn check(&self, idx: usize) -> Result<NodeIndex, PhaseError> {
        if idx < self.len() {
            Ok(NodeIndex::new(idx))
        } else {
            Err(PhaseError::PositionOutOfRange {
                index: idx,
                len: self.len(),
            })
        }
    }

    pub fn position(&self, idx: usize) -> Option<&Position> {
        self.graph.node_weight(NodeIndex::new(idx))
    }

    /// Panics if `idx` is out of range.
    pub fn position_weight(&self, idx: usize) -> usize {
        self.graph[NodeIndex::new(idx)].weight
    }

    /// Panics if `idx` is out of range.
    pub fn position_haplo_index(&self, idx: usize) -> usize {
        self.graph[NodeIndex::new(idx)].haplo_index
    }

    pub fn set_position_weight(&mut self, idx: usize, weight: usize) -> Result<(), PhaseError> {
        let node = self.check(idx)?;
        self.graph[node].weight = weight;
        Ok(())
    }

    pub fn set_haplo_index(&mut self, idx: usize, haplo_index: usize) -> Result<(), PhaseError> {
        let node = self.check(idx)?;
        self.graph[node].haplo_index = haplo_index;
        Ok(())
    }

    /// Returns the link between `i` and `j`, creating a zero-weighted one if
    /// the pair has none yet. Existing weights are left untouched.
    pub fn create_link(&mut self, i: usize, j: usize) -> Result<&Link, PhaseError> {
        if i == j {
            return Err(PhaseError::SelfLink(i));
        }
        let (lower, upper) = canonical(i, j);
        let a = self.check(lower)?;
        let b = self.check(upper)?;

        let edge = match self.graph.find_edge(a, b) {
            Some(edge) => edge,
            None => self.graph.add_edge(a, b, Link::new()),
        };
        Ok(&self.graph[edge])
    }

    pub fn link(&self, i: usize, j: usize) -> Option<&Link> {
        let (lower, upper) = canonical(i, j);
        self.graph
            .find_edge(NodeIndex::new(lower), NodeIndex::new(upper))
            .map(|edge| &self.graph[edge])
    }

    pub fn has_link(&self, i: usize, j: usize) -> bool {
        self.link(i, j).is_some()
    }

    /// One weight of an existing link.
    pub fn link_weight(&self, kind: LinkKind, i: usize, j: usize) -> Result<usize, PhaseError> {
        let (lower, upper) = canonical(i, j);
        self.link(lower, upper)
            .map(|link| link.weight(kind))
            .ok_or(PhaseError::LinkNotFound { lower, upper })
    }

    /// `max(same, different)` of the link, or 0 when there is none.
    pub fn link_max(&self, i: usize, j: usize) -> usize {
        self.link(i, j).map_or(0, Link::value)
    }

    /// Accumulates `weight` onto a link, creating it first if needed.
    /// Fails without changing the link if the sum overflows.
    pub fn add_weight(
        &mut self,
        kind: LinkKind,
        i: usize,
        j: usize,
        weight: usize,
    ) -> Result<(), PhaseError> {
        let (lower, upper) = canonical(i, j);
        self.create_link(lower, upper)?
            .checked_add_weight(kind, weight)
            .ok_or(PhaseError::LinkOverflow { lower, upper })?;
        Ok(())
    }

    /// Every link touching `idx`, paired with the position on its other end.
    pub fn incident(&self, idx: usize) -> impl Iterator<Item = (usize, &Link)> + '_ {
        let node = NodeIndex::new(idx);
        self.graph.edges(node).map(move |edge| {
            let other = if edge.source() == node {
                edge.target()
            } else {
                edge.source()
            };
            (other.index(), edge.weight())
        })
    }

    /// All links as (lower, upper, link).
    pub fn links(&self) -> impl Iterator<Item = (usize, usize, &Link)> + '_ {
        self.graph.edge_references().map(|edge| {
            let (lower, upper) = canonical(edge.source().index(), edge.target().index());
            (lower, upper, edge.weight())
        })
    }

    /// Sum of `link_max` over every link touching `idx`.
    pub fn position_worst_case(&self, idx: usize) -> usize {
        self.incident(idx).map(|(_, link)| link.value()).sum()
    }

    /// Sum of `link_max` over all links: no assignment can cost more.
    /// Saturates at `usize::MAX`.
    pub fn total_worst_case(&self) -> usize {
        self.checked_total_worst_case().unwrap_or(usize::MAX)
    }

    /// `None` when the total does not fit in `usize`. Every partial sum
    /// taken during a search is bounded by this total.
    pub fn checked_total_worst_case(&self) -> Option<usize> {
        self.graph
            .raw_edges()
            .iter()
            .try_fold(0usize, |acc, edge| acc.checked_add(edge.weight.value()))
    }

    /// Stores the phased value of a position.
    pub fn resolve(&mut self, idx: usize, value: u8) -> Result<(), PhaseError> {
        debug_assert!(value <= 1, "haplotype values are binary");
        let node = self.check(idx)?;
        self.graph[node].resolved = Some(value);
        Ok(())
    }

    pub fn resolved(&self, idx: usize) -> Option<u8> {
        self.position(idx).and_then(|p| p.resolved)
    }

    pub fn clear_resolved(&mut self) {
        for position in self.graph.node_weights_mut() {
            position.resolved = None;
        }
    }

    /// Resolved values ordered by haplotype index.
    pub fn haplotype(&self) -> Vec<Option<u8>> {
        let mut positions: Vec<&Position> =
            self.graph.raw_nodes().iter().map(|node| &node.weight).collect();
        positions.sort_by_key(|p| p.haplo_index);
        positions.iter().map(|p| p.resolved).collect()
    }
}
