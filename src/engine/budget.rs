//! Relationship budget guard
//!
//! Templates and systems can propose relationships combinatorially, so
//! every commit passes through this guard. Two independent counters: one
//! reset at tick start, one at growth-phase start. A proposal commits only
//! while both have remaining capacity; a commit decrements both. Excess
//! proposals are dropped, not queued — exceeding a cap is an expected
//! outcome of growth, not a fault.

use crate::core::config::RelationshipBudgetConfig;

#[derive(Debug)]
pub struct RelationshipBudget {
    max_per_tick: usize,
    max_per_phase: usize,
    tick_count: usize,
    phase_count: usize,
    dropped: u64,
}

impl RelationshipBudget {
    pub fn new(config: &RelationshipBudgetConfig) -> Self {
        Self {
            max_per_tick: config.max_per_simulation_tick,
            max_per_phase: config.max_per_growth_phase,
            tick_count: 0,
            phase_count: 0,
            dropped: 0,
        }
    }

    /// Reset the per-tick counter. Called at the start of every tick.
    pub fn begin_tick(&mut self) {
        self.tick_count = 0;
    }

    /// Reset the per-phase counter. Called at the start of every growth phase.
    pub fn begin_growth_phase(&mut self) {
        self.phase_count = 0;
    }

    /// Try to commit one relationship. First proposed, first committed;
    /// there is no re-ordering by importance.
    pub fn try_commit(&mut self) -> bool {
        if self.tick_count < self.max_per_tick && self.phase_count < self.max_per_phase {
            self.tick_count += 1;
            self.phase_count += 1;
            true
        } else {
            self.dropped += 1;
            false
        }
    }

    pub fn committed_this_tick(&self) -> usize {
        self.tick_count
    }

    pub fn committed_this_phase(&self) -> usize {
        self.phase_count
    }

    /// Total proposals dropped over the run
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn budget(per_tick: usize, per_phase: usize) -> RelationshipBudget {
        RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: per_tick,
            max_per_growth_phase: per_phase,
        })
    }

    #[test]
    fn test_per_tick_cap() {
        let mut b = budget(2, 100);
        assert!(b.try_commit());
        assert!(b.try_commit());
        assert!(!b.try_commit());
        assert_eq!(b.dropped(), 1);

        b.begin_tick();
        assert!(b.try_commit());
    }

    #[test]
    fn test_per_phase_cap_spans_ticks() {
        let mut b = budget(2, 3);
        assert!(b.try_commit());
        assert!(b.try_commit());
        b.begin_tick();
        assert!(b.try_commit());
        // Phase exhausted even though the tick counter was reset
        assert!(!b.try_commit());

        b.begin_growth_phase();
        assert!(b.try_commit());
    }

    #[test]
    fn test_zero_caps_drop_everything() {
        let mut b = budget(0, 10);
        assert!(!b.try_commit());
        assert_eq!(b.committed_this_tick(), 0);
        assert_eq!(b.dropped(), 1);
    }
}
