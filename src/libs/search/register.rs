use crossbeam::utils::CachePadded;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A shared value that can only move down.
///
/// Workers publish candidates with [`MinRegister::merge`]; the register keeps
/// the smallest one. A write only happens when the candidate is strictly
/// below the last observed value.
#[derive(Debug)]
pub struct MinRegister {
    value: CachePadded<AtomicUsize>,
}

impl MinRegister {
    pub fn new(value: usize) -> Self {
        Self {
            value: CachePadded::new(AtomicUsize::new(value)),
        }
    }

    pub fn get(&self) -> usize {
        self.value.load(Ordering::Acquire)
    }

    /// Lowers the register to `candidate` if it is smaller.
    /// Returns `true` when this call moved the value.
    pub fn merge(&self, candidate: usize) -> bool {
        let mut current = self.value.load(Ordering::Acquire);
        while candidate < current {
            match self.value.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return true,
                Err(observed) => current = observed,
            }
        }
        false
    }
}

impl Default for MinRegister {
    fn default() -> Self {
        Self::new(usize::MAX)
    }
}
