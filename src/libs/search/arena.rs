use super::node::{Bounds, BranchType, NodeId, SearchNode};
use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

const MIN_BUCKET: usize = 4;

/// Growable pool of search nodes addressed by index.
///
/// Storage is a list of buckets, each twice the size of the previous one.
/// A bucket is allocated the first time an index inside it is handed out and
/// is never moved afterwards, so a `NodeId` stays valid for the lifetime of
/// the arena no matter how much it grows. Indices are never reused.
#[derive(Debug)]
pub struct SearchNodeArena {
    buckets: Box<[OnceLock<Box<[SearchNode]>>]>,
    /// log2 of the first bucket's size
    shift: u32,
    next: CachePadded<AtomicUsize>,
}

impl SearchNodeArena {
    pub fn new() -> Self {
        Self::with_capacity(MIN_BUCKET)
    }

    /// Creates an arena whose first bucket holds at least `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        let first = capacity.max(MIN_BUCKET).next_power_of_two();
        let shift = first.trailing_zeros();
        let buckets = (0..(usize::BITS - shift))
            .map(|_| OnceLock::new())
            .collect::<Vec<_>>()
            .into_boxed_slice();

        let arena = Self {
            buckets,
            shift,
            next: CachePadded::new(AtomicUsize::new(0)),
        };
        arena.bucket(0);
        arena
    }

    /// Number of nodes handed out so far.
    pub fn len(&self) -> usize {
        self.next.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of node slots currently backed by memory.
    pub fn capacity(&self) -> usize {
        self.buckets
            .iter()
            .filter_map(OnceLock::get)
            .map(|bucket| bucket.len())
            .sum()
    }

    fn bucket_len(&self, bucket: usize) -> usize {
        1 << (bucket as u32 + self.shift)
    }

    fn bucket(&self, bucket: usize) -> &[SearchNode] {
        self.buckets[bucket].get_or_init(|| {
            (0..self.bucket_len(bucket))
                .map(|_| SearchNode::default())
                .collect()
        })
    }

    /// (bucket, offset) of an index
    fn locate(&self, id: NodeId) -> (usize, usize) {
        let adjusted = id + (1 << self.shift);
        let bucket = (usize::BITS - 1 - adjusted.leading_zeros() - self.shift) as usize;
        (bucket, adjusted - self.bucket_len(bucket))
    }

    fn slot(&self, id: NodeId) -> &SearchNode {
        let (bucket, offset) = self.locate(id);
        &self.bucket(bucket)[offset]
    }

    /// Hands out a fresh node: zero bounds, no parent, no children.
    pub fn allocate(&self) -> NodeId {
        let id = self.next.fetch_add(1, Ordering::AcqRel);
        self.slot(id);
        id
    }

    /// Hands out two adjacent fresh nodes and returns the first.
    pub fn allocate_pair(&self) -> NodeId {
        let id = self.next.fetch_add(2, Ordering::AcqRel);
        self.slot(id);
        self.slot(id + 1);
        id
    }

    pub fn get(&self, id: NodeId) -> Option<&SearchNode> {
        if id < self.len() {
            Some(self.slot(id))
        } else {
            None
        }
    }

    /// Panics if `id` has not been allocated.
    pub fn node(&self, id: NodeId) -> &SearchNode {
        match self.get(id) {
            Some(node) => node,
            None => panic!(
                "search node {} has not been allocated (arena holds {})",
                id,
                self.len()
            ),
        }
    }

    /// Allocates the root: its own parent, branch value 0, the given bounds.
    pub fn root(&self, position: usize, bounds: Bounds) -> NodeId {
        let id = self.allocate();
        let root = self.node(id);
        root.set_parent(id);
        root.set_position(position);
        root.set_branch(BranchType::Left);
        root.set_value(0);
        root.set_bounds(bounds);
        id
    }

    /// Expands `parent` with a left and a right child that inherit its
    /// current bounds. Returns the left child; the right one follows it.
    pub fn branch(&self, parent: NodeId) -> NodeId {
        let left = self.allocate_pair();
        let bounds = self.node(parent).bounds();

        for (child, branch) in [(left, BranchType::Left), (left + 1, BranchType::Right)] {
            let node = self.node(child);
            node.set_parent(parent);
            node.set_branch(branch);
            node.set_value(branch.value());
            node.set_bounds(bounds);
        }
        self.node(parent).set_children(left, left + 1);

        left
    }

    /// Walks from the parent of `id` up to and including the root.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        let parent = self.node(id).parent();
        Ancestors {
            arena: self,
            current: if parent == id { None } else { Some(parent) },
        }
    }

    /// Branch values from the root down to `id`.
    pub fn chain_values(&self, id: NodeId) -> Vec<u8> {
        let mut values: Vec<u8> = self
            .ancestors(id)
            .map(|ancestor| self.node(ancestor).value())
            .collect();
        values.reverse();
        values.push(self.node(id).value());
        values
    }
}

impl Default for SearchNodeArena {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Ancestors<'a> {
    arena: &'a SearchNodeArena,
    current: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        let parent = self.arena.node(id).parent();
        self.current = if parent == id { None } else { Some(parent) };
        Some(id)
    }
}
