use std::sync::atomic::{AtomicUsize, Ordering};

/// Which component of a link to read or update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    /// Evidence that both positions carry the same value (homozygous)
    Same,
    /// Evidence that the positions carry different values (heterozygous)
    Different,
}

/// A link between two variant positions.
///
/// Both weights are atomics so that several graph-construction workers can
/// accumulate evidence into the same link through a shared reference.
#[derive(Debug, Default)]
pub struct Link {
    same: AtomicUsize,
    different: AtomicUsize,
}

impl Link {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(same: usize, different: usize) -> Self {
        Self {
            same: AtomicUsize::new(same),
            different: AtomicUsize::new(different),
        }
    }

    fn slot(&self, kind: LinkKind) -> &AtomicUsize {
        match kind {
            LinkKind::Same => &self.same,
            LinkKind::Different => &self.different,
        }
    }

    pub fn weight(&self, kind: LinkKind) -> usize {
        self.slot(kind).load(Ordering::Acquire)
    }

    pub fn set_weight(&self, kind: LinkKind, weight: usize) {
        self.slot(kind).store(weight, Ordering::Release);
    }

    /// Adds to one component and returns the previous weight.
    pub fn add_weight(&self, kind: LinkKind, weight: usize) -> usize {
        self.slot(kind).fetch_add(weight, Ordering::AcqRel)
    }

    /// Like `add_weight`, but leaves the link untouched and returns `None`
    /// when the sum does not fit.
    pub fn checked_add_weight(&self, kind: LinkKind, weight: usize) -> Option<usize> {
        self.slot(kind)
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |current| {
                current.checked_add(weight)
            })
            .ok()
    }

    pub fn same(&self) -> usize {
        self.weight(LinkKind::Same)
    }

    pub fn different(&self) -> usize {
        self.weight(LinkKind::Different)
    }

    /// The larger of the two weights, used for ordering and worst-case bounds.
    pub fn value(&self) -> usize {
        self.same().max(self.different())
    }

    /// Cost paid when the two endpoints are resolved.
    ///
    /// Equal values violate the different-value evidence, unequal values
    /// violate the same-value evidence.
    pub fn cost(&self, equal: bool) -> usize {
        if equal {
            self.different()
        } else {
            self.same()
        }
    }
}

impl Clone for Link {
    fn clone(&self) -> Self {
        Self::with_weights(self.same(), self.different())
    }
}

/// Orders a pair of positions as (lower, upper).
///
/// ```
/// assert_eq!(parhap::libs::variant::canonical(5, 2), (2, 5));
/// assert_eq!(parhap::libs::variant::canonical(2, 5), (2, 5));
/// ```
pub fn canonical(i: usize, j: usize) -> (usize, usize) {
    if i <= j {
        (i, j)
    } else {
        (j, i)
    }
}
