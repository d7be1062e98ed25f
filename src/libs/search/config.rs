use crate::libs::error::PhaseError;

/// Worker budget of a search.
///
/// `branch_workers` caps how many frontier nodes are evaluated at once;
/// `bound_workers` is the total budget, shared out between the frontier
/// workers for the per-node bound computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub branch_workers: usize,
    pub bound_workers: usize,
}

impl EngineConfig {
    pub fn new(branch_workers: usize, bound_workers: usize) -> Result<Self, PhaseError> {
        if branch_workers == 0 {
            return Err(PhaseError::config("branch workers must be positive"));
        }
        if bound_workers == 0 {
            return Err(PhaseError::config("bound workers must be positive"));
        }
        Ok(Self {
            branch_workers,
            bound_workers,
        })
    }

    /// Frontier workers for a level, never more than the frontier holds.
    pub fn branch_workers_for(&self, frontier_size: usize) -> usize {
        self.branch_workers.min(frontier_size).max(1)
    }

    /// Bound workers left for each node once `branch_workers` are busy.
    pub fn bound_workers_for(&self, branch_workers: usize) -> usize {
        (self.bound_workers / branch_workers.max(1)).max(1)
    }

    /// Threads in the pool backing one search.
    pub fn threads(&self) -> usize {
        self.branch_workers.max(self.bound_workers)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let n = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            branch_workers: n,
            bound_workers: n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_workers() {
        assert!(EngineConfig::new(0, 4).is_err());
        assert!(EngineConfig::new(4, 0).is_err());
        assert!(EngineConfig::new(1, 1).is_ok());
    }

    #[test]
    fn clipping_and_apportioning() {
        let config = EngineConfig::new(8, 16).unwrap();
        assert_eq!(config.branch_workers_for(2), 2);
        assert_eq!(config.branch_workers_for(100), 8);
        assert_eq!(config.branch_workers_for(0), 1);

        assert_eq!(config.bound_workers_for(2), 8);
        assert_eq!(config.bound_workers_for(8), 2);
        assert_eq!(EngineConfig::new(8, 4).unwrap().bound_workers_for(8), 1);
        assert_eq!(config.threads(), 16);
    }
}
