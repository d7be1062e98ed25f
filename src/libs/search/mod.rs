//! Parallel branch-and-bound search over binary position assignments.
//!
//! The engine walks positions in the order chosen by [`PositionSelector`],
//! keeps every live branch as a node in a [`SearchNodeArena`] and prunes
//! branches whose lower bound exceeds the best upper bound seen so far.

pub mod arena;
pub mod bounder;
pub mod config;
pub mod engine;
pub mod node;
pub mod register;
pub mod selector;

pub use arena::SearchNodeArena;
pub use bounder::{Assignment, BoundCalculator};
pub use config::EngineConfig;
pub use engine::{LevelStats, SearchEngine, SearchSummary};
pub use node::{Bounds, BranchType, NodeId, SearchNode, NO_NODE};
pub use register::MinRegister;
pub use selector::PositionSelector;
