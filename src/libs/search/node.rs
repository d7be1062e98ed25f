use std::ops::Add;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};

/// NodeId is an index into the search arena.
pub type NodeId = usize;

/// Marks an unset parent, child or position.
pub const NO_NODE: NodeId = usize::MAX;

/// Which side of its parent a node hangs on; fixes its branch value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BranchType {
    Left = 0,
    Right = 1,
}

impl BranchType {
    /// The binary value a node of this type assigns.
    pub fn value(self) -> u8 {
        self as u8
    }

    fn from_u8(raw: u8) -> Self {
        if raw == 0 {
            BranchType::Left
        } else {
            BranchType::Right
        }
    }
}

/// A pair of cost bounds, or a pair of deltas to apply to one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bounds {
    pub lower: usize,
    pub upper: usize,
}

impl Bounds {
    pub fn new(lower: usize, upper: usize) -> Self {
        Self { lower, upper }
    }
}

impl Add for Bounds {
    type Output = Bounds;

    fn add(self, rhs: Bounds) -> Bounds {
        Bounds {
            lower: self.lower + rhs.lower,
            upper: self.upper + rhs.upper,
        }
    }
}

/// One node of the search tree.
///
/// Every field is atomic so the arena can hand out shared references to
/// concurrent workers. Within a level each node is written by exactly one
/// worker and the level join orders those writes before the next level reads
/// them, so relaxed ordering is enough.
#[derive(Debug)]
pub struct SearchNode {
    parent: AtomicUsize,
    left: AtomicUsize,
    right: AtomicUsize,
    position: AtomicUsize,
    value: AtomicU8,
    branch: AtomicU8,
    lower: AtomicUsize,
    upper: AtomicUsize,
}

impl Default for SearchNode {
    fn default() -> Self {
        Self {
            parent: AtomicUsize::new(NO_NODE),
            left: AtomicUsize::new(NO_NODE),
            right: AtomicUsize::new(NO_NODE),
            position: AtomicUsize::new(NO_NODE),
            value: AtomicU8::new(0),
            branch: AtomicU8::new(BranchType::Left as u8),
            lower: AtomicUsize::new(0),
            upper: AtomicUsize::new(0),
        }
    }
}

impl SearchNode {
    pub fn parent(&self) -> NodeId {
        self.parent.load(Ordering::Relaxed)
    }

    pub fn set_parent(&self, parent: NodeId) {
        self.parent.store(parent, Ordering::Relaxed);
    }

    /// The root is its own parent.
    pub fn is_root(&self, id: NodeId) -> bool {
        self.parent() == id
    }

    /// (left, right) if the node has been expanded.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        let left = self.left.load(Ordering::Relaxed);
        let right = self.right.load(Ordering::Relaxed);
        if left == NO_NODE {
            None
        } else {
            Some((left, right))
        }
    }

    pub fn set_children(&self, left: NodeId, right: NodeId) {
        self.left.store(left, Ordering::Relaxed);
        self.right.store(right, Ordering::Relaxed);
    }

    /// The variant position this node assigns a value to.
    pub fn position(&self) -> usize {
        self.position.load(Ordering::Relaxed)
    }

    pub fn set_position(&self, position: usize) {
        self.position.store(position, Ordering::Relaxed);
    }

    pub fn value(&self) -> u8 {
        self.value.load(Ordering::Relaxed)
    }

    pub fn set_value(&self, value: u8) {
        self.value.store(value, Ordering::Relaxed);
    }

    pub fn branch(&self) -> BranchType {
        BranchType::from_u8(self.branch.load(Ordering::Relaxed))
    }

    pub fn set_branch(&self, branch: BranchType) {
        self.branch.store(branch as u8, Ordering::Relaxed);
    }

    pub fn lower_bound(&self) -> usize {
        self.lower.load(Ordering::Relaxed)
    }

    pub fn upper_bound(&self) -> usize {
        self.upper.load(Ordering::Relaxed)
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.lower_bound(), self.upper_bound())
    }

    pub fn set_bounds(&self, bounds: Bounds) {
        self.lower.store(bounds.lower, Ordering::Relaxed);
        self.upper.store(bounds.upper, Ordering::Relaxed);
    }

    /// Raises the lower bound and lowers the upper bound by `delta`,
    /// returning the tightened bounds.
    pub fn tighten(&self, delta: Bounds) -> Bounds {
        let current = self.bounds();
        let tightened = Bounds::new(
            current.lower + delta.lower,
            current.upper.saturating_sub(delta.upper),
        );
        self.set_bounds(tightened);
        tightened
    }
}
