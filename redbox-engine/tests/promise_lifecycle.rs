//! End-to-end promise lifecycle: negotiation, reconciliation, and the
//! stance consequences of keeping or breaking your word.

use std::collections::BTreeSet;

use redbox_engine::{
    BudgetProposal, LobbyError, LobbyGroup, MpId, Promise, PromiseCategory, PromiseId,
    PromiseOutcome, Representative, Responsibility, Roster, StanceContext, broken_count_for,
    classify, lobby_group, reconcile_promises,
};

fn nhs_budget(delta: f64) -> BudgetProposal {
    let mut budget = BudgetProposal::default();
    budget.spending.set("nhs_england", delta);
    budget
}

#[test]
fn promise_round_trip_fulfilled_before_deadline() {
    let made_turn = 4;
    let mut promises = vec![Promise::new(
        PromiseId(1),
        BTreeSet::from([MpId(7)]),
        PromiseCategory::NhsSpending,
        Some(3.0),
        made_turn,
    )];
    assert_eq!(promises[0].deadline_turn, made_turn + 3);

    // Turn 5 budget misses the mark; turn 6 meets it.
    assert!(reconcile_promises(&mut promises, &nhs_budget(1.0), 5).is_empty());
    assert!(promises[0].outcome.is_pending());

    assert!(reconcile_promises(&mut promises, &nhs_budget(3.5), 6).is_empty());
    assert_eq!(promises[0].outcome, PromiseOutcome::Fulfilled { turn: 6 });

    // Fulfilled is terminal, no matter how late budgets sour.
    for turn in 7..12 {
        assert!(reconcile_promises(&mut promises, &nhs_budget(-8.0), turn).is_empty());
    }
    assert!(promises[0].outcome.is_fulfilled());
    assert_eq!(broken_count_for(&promises, MpId(7)), 0);
}

#[test]
fn promise_breaks_at_first_evaluation_past_deadline() {
    let mut promises = vec![Promise::new(
        PromiseId(2),
        BTreeSet::from([MpId(9)]),
        PromiseCategory::NhsSpending,
        Some(5.0),
        1,
    )];
    let never_enough = nhs_budget(2.0);

    for turn in 1..=4 {
        assert!(reconcile_promises(&mut promises, &never_enough, turn).is_empty());
    }
    let broken = reconcile_promises(&mut promises, &never_enough, 5);
    assert_eq!(broken, vec![PromiseId(2)]);
    match promises[0].outcome {
        PromiseOutcome::Broken {
            by_turn,
            responsibility,
        } => {
            assert_eq!(by_turn, 5);
            assert_eq!(responsibility, Responsibility::Chancellor);
        }
        other => panic!("expected broken outcome, got {other:?}"),
    }
    assert_eq!(broken_count_for(&promises, MpId(9)), 1);
}

#[test]
fn broken_promise_drags_the_stance_down() {
    let rep = Representative {
        id: MpId(9),
        ..Representative::default()
    };
    let ctx = StanceContext::default();
    let budget = BudgetProposal::default();

    let mut promises = vec![Promise::new(
        PromiseId(3),
        BTreeSet::from([MpId(9)]),
        PromiseCategory::NhsSpending,
        Some(5.0),
        1,
    )];
    let before_break = classify(&rep, &budget, &promises, 4, &ctx, None);

    reconcile_promises(&mut promises, &budget, 5);
    assert!(promises[0].outcome.is_broken());
    let after_break = classify(&rep, &budget, &promises, 5, &ctx, None);

    // The open-promise roll contributed +10 or +2; the broken promise costs
    // a flat 20 and removes the roll entirely.
    assert!(after_break.score < before_break.score);
    assert_eq!(after_break.breakdown.broken_promises, 1);
    assert_eq!(after_break.breakdown.open_promises, 0);
}

#[test]
fn group_negotiation_mints_a_promise_that_can_be_kept() {
    let mut roster = Roster::new();
    for id in 1..=5u32 {
        let mut rep = Representative {
            id: MpId(id),
            name: format!("Bloc Member {id}"),
            ..Representative::default()
        };
        rep.ideology.economic_axis = -6.0;
        rep.constituency.region = redbox_engine::Region::London;
        roster.insert(rep);
    }
    let group = LobbyGroup {
        name: String::from("health caucus"),
        member_ids: (1..=5).map(MpId).collect(),
        spokesperson: MpId(3),
        cohesion: 40.0,
    };

    let outcome = lobby_group(
        &group,
        &roster,
        PromiseCategory::NhsSpending,
        13.0,
        2,
        PromiseId(11),
    )
    .expect("group resolves");
    assert!(outcome.success);
    let mut promises = vec![outcome.promise.expect("minted promise")];
    assert_eq!(promises[0].targets.len(), 5);

    // A budget honouring the promised value fulfils it for every member.
    let broken = reconcile_promises(&mut promises, &nhs_budget(13.0), 3);
    assert!(broken.is_empty());
    assert!(promises[0].outcome.is_fulfilled());
    for id in 1..=5u32 {
        assert_eq!(broken_count_for(&promises, MpId(id)), 0);
    }
}

#[test]
fn failed_negotiation_has_no_side_effects() {
    let mut roster = Roster::new();
    let mut rep = Representative {
        id: MpId(1),
        ..Representative::default()
    };
    rep.ideology.economic_axis = -6.0;
    rep.constituency.region = redbox_engine::Region::London;
    roster.insert(rep);
    let group = LobbyGroup {
        name: String::from("lone wolf"),
        member_ids: vec![MpId(1)],
        spokesperson: MpId(1),
        cohesion: 80.0,
    };

    let outcome = lobby_group(
        &group,
        &roster,
        PromiseCategory::NhsSpending,
        1.0,
        2,
        PromiseId(12),
    )
    .expect("group resolves");
    assert!(!outcome.success);
    assert!(outcome.promise.is_none());
    let demand = outcome.counter_demand.expect("counter demand");
    // NHS threshold 10 scaled by cohesion 80 -> 14.
    assert!((demand.minimum_value - 14.0).abs() < f64::EPSILON);
}

#[test]
fn ghost_spokesperson_is_rejected_loudly() {
    let roster = Roster::new();
    let group = LobbyGroup {
        name: String::from("phantom bloc"),
        member_ids: vec![MpId(1)],
        spokesperson: MpId(1),
        cohesion: 10.0,
    };
    assert_eq!(
        lobby_group(
            &group,
            &roster,
            PromiseCategory::NhsSpending,
            50.0,
            1,
            PromiseId(13)
        ),
        Err(LobbyError::GroupOrSpokespersonNotFound)
    );
}
