pub mod graph;
pub mod link;

pub use graph::{Position, VariantGraph};
pub use link::{canonical, Link, LinkKind};
