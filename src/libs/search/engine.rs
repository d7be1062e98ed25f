use super::arena::SearchNodeArena;
use super::bounder::{Assignment, BoundCalculator};
use super::config::EngineConfig;
use super::node::{Bounds, NodeId};
use super::register::MinRegister;
use super::selector::PositionSelector;
use crate::libs::error::PhaseError;
use crate::libs::variant::VariantGraph;
use rayon::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info};

/// What one frontier level did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelStats {
    /// 1 for the root's children
    pub depth: usize,
    pub position: usize,
    pub haplo_index: usize,
    pub frontier_size: usize,
    pub branch_workers: usize,
    /// Nodes that passed the bound test
    pub admitted: usize,
    /// Admitted nodes that received children
    pub expanded: usize,
    /// Best upper bound handed to the level
    pub incoming_ubound: usize,
    /// Best upper bound after the level
    pub min_ubound: usize,
    /// Smallest lower bound among admitted nodes
    pub min_lbound: Option<usize>,
    /// Largest lower bound among admitted nodes
    pub max_admitted_lower: Option<usize>,
}

/// Outcome of one `explore` call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchSummary {
    pub levels: Vec<LevelStats>,
    /// Positions in branching order, the start first
    pub order: Vec<usize>,
    /// Nodes allocated in the arena
    pub nodes: usize,
    /// Cost of the chosen assignment
    pub cost: usize,
}

/// Per-worker tally, merged after the level join.
#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    admitted: usize,
    expanded: usize,
    max_lower: Option<usize>,
}

impl Tally {
    fn merge(self, other: Tally) -> Tally {
        Tally {
            admitted: self.admitted + other.admitted,
            expanded: self.expanded + other.expanded,
            max_lower: self.max_lower.max(other.max_lower),
        }
    }
}

/// State of a single search call; dropped once the values are copied out.
struct SearchState<'g> {
    arena: SearchNodeArena,
    selector: PositionSelector,
    bounder: BoundCalculator<'g>,
    resolved: Vec<(usize, u8)>,
    levels: Vec<LevelStats>,
    cost: usize,
}

/// Branch-and-bound phasing engine.
///
/// Owns the variant graph. `explore` builds a fresh search tree, evaluates it
/// level by level on a worker pool, and writes the winning assignment back
/// into the graph.
#[derive(Debug)]
pub struct SearchEngine {
    graph: VariantGraph,
    config: EngineConfig,
    start: AtomicUsize,
    worst_case: AtomicUsize,
}

impl SearchEngine {
    pub fn new(graph: VariantGraph, config: EngineConfig) -> Self {
        Self {
            graph,
            config,
            start: AtomicUsize::new(0),
            worst_case: AtomicUsize::new(0),
        }
    }

    pub fn graph(&self) -> &VariantGraph {
        &self.graph
    }

    /// Position fixed to 0 at the root of the search.
    pub fn start(&self) -> usize {
        self.start.load(Ordering::Acquire)
    }

    pub fn set_start(&self, position: usize) -> Result<(), PhaseError> {
        if position >= self.graph.len() {
            return Err(PhaseError::PositionOutOfRange {
                index: position,
                len: self.graph.len(),
            });
        }
        self.start.store(position, Ordering::Release);
        Ok(())
    }

    /// Upper bound the root was seeded with by the last `explore`.
    pub fn worst_case(&self) -> usize {
        self.worst_case.load(Ordering::Acquire)
    }

    /// Searches for the cheapest assignment and resolves every position.
    pub fn explore(&mut self) -> Result<SearchSummary, PhaseError> {
        let n = self.graph.len();
        if n == 0 {
            return Ok(SearchSummary::default());
        }

        let start = self.start();
        let selector = PositionSelector::new(&self.graph, start)?;
        let order = selector.order().to_vec();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.config.threads())
            .thread_name(|i| format!("parhap-worker-{}", i))
            .build()?;

        // No assignment can cost more than every link at its worst
        let worst_case = self
            .graph
            .checked_total_worst_case()
            .ok_or(PhaseError::WeightOverflow)?;
        self.worst_case.store(worst_case, Ordering::Release);

        info!(
            positions = n,
            links = self.graph.num_links(),
            start,
            worst_case,
            branch_workers = self.config.branch_workers,
            bound_workers = self.config.bound_workers,
            "exploring"
        );

        let mut state = SearchState {
            arena: SearchNodeArena::with_capacity(4 * n),
            selector,
            bounder: BoundCalculator::new(&self.graph),
            resolved: Vec::with_capacity(n),
            levels: Vec::new(),
            cost: 0,
        };

        // The order begins with the start position, which the root fixes to 0
        state.selector.select_next();
        let root = state.arena.root(start, Bounds::new(0, worst_case));

        if !state.selector.is_last(start) {
            let left = state.arena.branch(root);
            let min_ubound = MinRegister::new(worst_case);
            let engine = &*self;
            let top = pool.install(|| engine.search_frontier(&mut state, &min_ubound, left, 2));
            debug_assert_eq!(top, root);
        }
        state.resolved.push((start, state.arena.node(root).value()));

        let summary = SearchSummary {
            levels: std::mem::take(&mut state.levels),
            order,
            nodes: state.arena.len(),
            cost: state.cost,
        };
        let resolved = std::mem::take(&mut state.resolved);
        drop(state);

        for (position, value) in resolved {
            self.graph.resolve(position, value)?;
        }

        info!(
            cost = summary.cost,
            nodes = summary.nodes,
            levels = summary.levels.len(),
            "search finished"
        );
        Ok(summary)
    }

    /// Evaluates the frontier `[frontier_start, frontier_start + frontier_size)`
    /// against the next position, expands the survivors and recurses.
    ///
    /// Returns the parent of the node on the winning chain at this level, so
    /// the caller can resolve its own position from it.
    fn search_frontier(
        &self,
        state: &mut SearchState<'_>,
        min_ubound: &MinRegister,
        frontier_start: NodeId,
        frontier_size: usize,
    ) -> NodeId {
        let Some(position) = state.selector.select_next() else {
            return state.arena.node(frontier_start).parent();
        };
        let haplo_index = self.graph.position_haplo_index(position);
        let terminal = state.selector.is_last(position);

        let branch_workers = self.config.branch_workers_for(frontier_size);
        let bound_workers = self.config.bound_workers_for(branch_workers);
        let incoming_ubound = min_ubound.get();
        let min_lbound = MinRegister::default();
        let frontier_end = frontier_start + frontier_size;

        let arena = &state.arena;
        let bounder = &state.bounder;

        // Worker t takes nodes t, t + stride, t + 2 * stride, ...
        let tally = (0..branch_workers)
            .into_par_iter()
            .map(|worker| {
                let mut tally = Tally::default();
                for id in (frontier_start + worker..frontier_end).step_by(branch_workers) {
                    let node = arena.node(id);
                    let value = node.branch().value();
                    node.set_value(value);
                    node.set_position(position);

                    let assigned: Vec<Assignment> = arena
                        .ancestors(id)
                        .map(|ancestor| {
                            let a = arena.node(ancestor);
                            Assignment {
                                position: a.position(),
                                value: a.value(),
                            }
                        })
                        .collect();
                    let delta = bounder.bounds(position, value, &assigned, bound_workers);
                    let bounds = node.tighten(delta);

                    // Pruned: nothing below this node can beat the best upper bound
                    if bounds.lower > min_ubound.get() {
                        continue;
                    }

                    tally.admitted += 1;
                    tally.max_lower = tally.max_lower.max(Some(bounds.lower));
                    if !terminal {
                        arena.branch(id);
                        tally.expanded += 1;
                    }
                    min_ubound.merge(bounds.upper);
                    min_lbound.merge(bounds.lower);
                }
                tally
            })
            .reduce(Tally::default, Tally::merge);

        let min_lower = (tally.admitted > 0).then(|| min_lbound.get());
        debug!(
            depth = state.levels.len() + 1,
            position,
            haplo_index,
            frontier = frontier_size,
            admitted = tally.admitted,
            expanded = tally.expanded,
            min_lower,
            min_upper = min_ubound.get(),
            "search level"
        );
        state.levels.push(LevelStats {
            depth: state.levels.len() + 1,
            position,
            haplo_index,
            frontier_size,
            branch_workers,
            admitted: tally.admitted,
            expanded: tally.expanded,
            incoming_ubound,
            min_ubound: min_ubound.get(),
            min_lbound: min_lower,
            max_admitted_lower: tally.max_lower,
        });

        let best = if terminal {
            state.cost = min_lbound.get();
            self.terminal_winner(&state.arena, frontier_start, frontier_end, state.cost)
        } else {
            // Children of this level were allocated right after the frontier
            debug_assert_eq!(state.arena.len(), frontier_end + 2 * tally.expanded);
            self.search_frontier(state, min_ubound, frontier_end, 2 * tally.expanded)
        };

        let node = state.arena.node(best);
        state.resolved.push((position, node.value()));
        node.parent()
    }

    /// Among the complete assignments costing `cost`, the one whose values,
    /// read in branching order, are lexicographically smallest.
    ///
    /// Every assignment of optimal cost survives pruning, so the candidate set
    /// and the winner do not depend on worker scheduling.
    fn terminal_winner(
        &self,
        arena: &SearchNodeArena,
        frontier_start: NodeId,
        frontier_end: NodeId,
        cost: usize,
    ) -> NodeId {
        (frontier_start..frontier_end)
            .filter(|&id| arena.node(id).lower_bound() == cost)
            .min_by_key(|&id| arena.chain_values(id))
            .unwrap_or(frontier_start)
    }
}
