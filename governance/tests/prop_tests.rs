use proptest::prelude::*;

use charter_governance::{
    Collaborators, GovernanceEngine, GovernanceError, GovernanceParameters, ProposalState,
};
use charter_nullables::{NullClock, NullConfigStore, NullOracle};
use charter_types::{AccountId, Weight};
use std::sync::Arc;

fn engine_with(
    weights: &[u64],
    total: u128,
    quorum_bps: u32,
) -> (GovernanceEngine, Arc<NullOracle>, Arc<NullClock>) {
    let oracle = Arc::new(NullOracle::new());
    oracle.set_weight("proposer", 1);
    for (i, w) in weights.iter().enumerate() {
        oracle.set_weight(format!("v{i}"), *w as u128);
    }
    oracle.set_total(total);
    let clock = Arc::new(NullClock::new(0));
    let engine = GovernanceEngine::new(
        AccountId::new("admin"),
        AccountId::new("governor"),
        GovernanceParameters::new(10, 1, quorum_bps).unwrap(),
        Collaborators {
            oracle: oracle.clone(),
            clock: clock.clone(),
            store: Arc::new(NullConfigStore::new("governor", "")),
        },
    );
    (engine, oracle, clock)
}

proptest! {
    /// Tallies always equal the sum of receipt weights per side.
    #[test]
    fn tallies_match_receipts(
        votes in prop::collection::vec((0u64..1_000_000, any::<bool>()), 1..20),
    ) {
        let weights: Vec<u64> = votes.iter().map(|(w, _)| *w).collect();
        let (mut engine, _oracle, clock) = engine_with(&weights, 1_000_000_000, 0);
        let pid = engine.create_proposal(&AccountId::new("proposer"), "t", "d", "p").unwrap();
        clock.advance(1);
        for (i, (_, support)) in votes.iter().enumerate() {
            engine.cast_vote(pid, &AccountId::new(format!("v{i}")), *support).unwrap();
        }
        let proposal = engine.proposal(pid).unwrap();
        let (mut for_sum, mut against_sum) = (0u128, 0u128);
        for (_, receipt) in proposal.receipts() {
            prop_assert!(receipt.has_voted);
            if receipt.support {
                for_sum += receipt.weight.raw();
            } else {
                against_sum += receipt.weight.raw();
            }
        }
        prop_assert_eq!(proposal.for_votes, Weight::new(for_sum));
        prop_assert_eq!(proposal.against_votes, Weight::new(against_sum));
    }

    /// A repeated vote never changes the tallies, whatever weight the voter now holds.
    #[test]
    fn double_vote_is_inert(
        first in 0u64..1_000_000,
        second in 0u64..1_000_000,
        support in any::<bool>(),
        resupport in any::<bool>(),
    ) {
        let (mut engine, oracle, clock) = engine_with(&[first], 10_000_000, 0);
        let pid = engine.create_proposal(&AccountId::new("proposer"), "t", "d", "p").unwrap();
        clock.advance(1);
        let voter = AccountId::new("v0");
        engine.cast_vote(pid, &voter, support).unwrap();
        let before = engine.proposal_details(pid).unwrap();
        oracle.set_weight("v0", second as u128);
        let err = engine.cast_vote(pid, &voter, resupport).unwrap_err();
        prop_assert!(
            matches!(err, GovernanceError::AlreadyVoted { .. }),
            "expected AlreadyVoted, got {:?}",
            err
        );
        let after = engine.proposal_details(pid).unwrap();
        prop_assert_eq!(before, after);
    }

    /// State is a pure function of its inputs: repeated reads agree.
    #[test]
    fn state_is_deterministic(
        for_w in 0u64..1_000_000,
        against_w in 0u64..1_000_000,
        total in 1u128..10_000_000,
        quorum in 0u32..=10_000,
        elapsed in 0u64..30,
    ) {
        let (mut engine, _oracle, clock) = engine_with(&[for_w, against_w], total, quorum);
        let pid = engine.create_proposal(&AccountId::new("proposer"), "t", "d", "p").unwrap();
        clock.advance(1);
        engine.cast_vote(pid, &AccountId::new("v0"), true).unwrap();
        engine.cast_vote(pid, &AccountId::new("v1"), false).unwrap();
        clock.advance(elapsed);
        let first = engine.state(pid).unwrap();
        let second = engine.state(pid).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Closed outcome matches the floor-division quorum rule and strict majority.
    #[test]
    fn closed_outcome_follows_floor_rule(
        for_w in 0u64..1_000_000,
        against_w in 0u64..1_000_000,
        total in 1u128..10_000_000,
        quorum in 0u32..=10_000,
    ) {
        let (mut engine, _oracle, clock) = engine_with(&[for_w, against_w], total, quorum);
        let pid = engine.create_proposal(&AccountId::new("proposer"), "t", "d", "p").unwrap();
        clock.advance(1);
        engine.cast_vote(pid, &AccountId::new("v0"), true).unwrap();
        engine.cast_vote(pid, &AccountId::new("v1"), false).unwrap();
        clock.advance(10);

        let votes = for_w as u128 + against_w as u128;
        let quorum_reached = votes * 10_000 / total >= quorum as u128;
        let expected = if quorum_reached && for_w > against_w {
            ProposalState::Succeeded
        } else {
            ProposalState::Defeated
        };
        prop_assert_eq!(engine.state(pid).unwrap(), expected);
    }

    /// Execution writes the store at most once, however often it is attempted.
    #[test]
    fn execute_at_most_once(attempts in 1usize..6) {
        let oracle = Arc::new(NullOracle::with_balances([("proposer", 10), ("v", 90)]));
        let clock = Arc::new(NullClock::new(0));
        let store = Arc::new(NullConfigStore::new("governor", "old"));
        let mut engine = GovernanceEngine::new(
            AccountId::new("admin"),
            AccountId::new("governor"),
            GovernanceParameters::new(3, 1, 1000).unwrap(),
            Collaborators { oracle, clock: clock.clone(), store: store.clone() },
        );
        let pid = engine.create_proposal(&AccountId::new("proposer"), "t", "d", "new").unwrap();
        clock.advance(1);
        engine.cast_vote(pid, &AccountId::new("v"), true).unwrap();
        clock.advance(3);
        let successes = (0..attempts)
            .filter(|_| engine.execute_proposal(pid).is_ok())
            .count();
        prop_assert_eq!(successes, 1);
        prop_assert_eq!(store.updates().len(), 1);
        prop_assert_eq!(engine.state(pid).unwrap(), ProposalState::Executed);
    }
}
