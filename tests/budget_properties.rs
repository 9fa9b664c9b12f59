//! Property tests for the relationship budget guard

use proptest::prelude::*;

use worldloom::core::config::RelationshipBudgetConfig;
use worldloom::engine::budget::RelationshipBudget;

proptest! {
    /// Whatever the proposal pattern, commits never exceed either cap:
    /// per tick within a tick window, per phase within a phase window.
    #[test]
    fn commits_never_exceed_caps(
        max_per_tick in 0usize..8,
        max_per_phase in 0usize..16,
        // Phases, each a list of ticks, each a number of proposals
        phases in prop::collection::vec(
            prop::collection::vec(0usize..12, 1..6),
            1..6,
        ),
    ) {
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: max_per_tick,
            max_per_growth_phase: max_per_phase,
        });

        let mut total_committed = 0u64;
        let mut total_proposed = 0u64;

        for ticks in &phases {
            budget.begin_growth_phase();
            let mut phase_committed = 0usize;

            for proposals in ticks {
                budget.begin_tick();
                let mut tick_committed = 0usize;

                for _ in 0..*proposals {
                    total_proposed += 1;
                    if budget.try_commit() {
                        tick_committed += 1;
                        phase_committed += 1;
                        total_committed += 1;
                    }
                }

                prop_assert!(tick_committed <= max_per_tick);
                prop_assert_eq!(budget.committed_this_tick(), tick_committed);
            }

            prop_assert!(phase_committed <= max_per_phase);
        }

        // Every proposal was either committed or counted as dropped
        prop_assert_eq!(total_committed + budget.dropped(), total_proposed);
    }

    /// Commit order is strictly first-proposed-first-committed: the
    /// accepted set is always a prefix of each tick's proposals.
    #[test]
    fn acceptance_is_a_prefix_per_tick(
        max_per_tick in 1usize..6,
        proposals in 1usize..20,
    ) {
        let mut budget = RelationshipBudget::new(&RelationshipBudgetConfig {
            max_per_simulation_tick: max_per_tick,
            max_per_growth_phase: usize::MAX,
        });
        budget.begin_growth_phase();
        budget.begin_tick();

        let outcomes: Vec<bool> = (0..proposals).map(|_| budget.try_commit()).collect();
        let accepted = outcomes.iter().filter(|&&ok| ok).count();

        prop_assert_eq!(accepted, proposals.min(max_per_tick));
        // No acceptance after the first rejection
        prop_assert!(outcomes.iter().take(accepted).all(|&ok| ok));
        prop_assert!(outcomes.iter().skip(accepted).all(|&ok| !ok));
    }
}
