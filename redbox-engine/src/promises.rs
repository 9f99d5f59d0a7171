//! Promises made to members and their turn-by-turn reconciliation.
//!
//! A promise is a three-state machine: `Pending` until a budget meets its
//! category criterion on or before the deadline (`Fulfilled`), or the
//! deadline passes unmet (`Broken`). Both end states are terminal. Promises
//! are never deleted; the broken ones keep feeding stance penalties and
//! narrative history.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{FISCAL_REVENUE_WEIGHT, PROMISE_DEADLINE_TURNS};
use crate::params::{
    BudgetProposal, REGIONAL_INVESTMENT_LINES, SPEND_DEFENCE, SPEND_DISABILITY,
    SPEND_GREEN_ENERGY, SPEND_NHS, SPEND_SCHOOLS, SPEND_STATE_PENSION, SPEND_UNIVERSAL_CREDIT,
    TRACKED_PERSONAL_TAXES,
};
use crate::roster::MpId;

/// Stable identity of a promise.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct PromiseId(pub u32);

impl fmt::Display for PromiseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "promise-{}", self.0)
    }
}

/// What was promised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromiseCategory {
    TaxCuts,
    TaxRisesAvoid,
    NhsSpending,
    EducationSpending,
    RegionalInvestment,
    WelfareProtection,
    DefenceSpending,
    GreenInvestment,
    FiscalDiscipline,
}

impl PromiseCategory {
    pub const ALL: &'static [Self] = &[
        Self::TaxCuts,
        Self::TaxRisesAvoid,
        Self::NhsSpending,
        Self::EducationSpending,
        Self::RegionalInvestment,
        Self::WelfareProtection,
        Self::DefenceSpending,
        Self::GreenInvestment,
        Self::FiscalDiscipline,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::TaxCuts => "tax_cuts",
            Self::TaxRisesAvoid => "tax_rises_avoid",
            Self::NhsSpending => "nhs_spending",
            Self::EducationSpending => "education_spending",
            Self::RegionalInvestment => "regional_investment",
            Self::WelfareProtection => "welfare_protection",
            Self::DefenceSpending => "defence_spending",
            Self::GreenInvestment => "green_investment",
            Self::FiscalDiscipline => "fiscal_discipline",
        }
    }

    /// The promise category a budget dial maps to, if any. Used to turn a
    /// group's top shared concern into a negotiable demand.
    #[must_use]
    pub fn for_parameter(parameter: &str) -> Option<Self> {
        match parameter {
            SPEND_NHS | crate::params::SPEND_NHS_CAPITAL | crate::params::SPEND_MENTAL_HEALTH
            | crate::params::SPEND_SOCIAL_CARE => Some(Self::NhsSpending),
            SPEND_SCHOOLS
            | crate::params::SPEND_HIGHER_EDUCATION
            | crate::params::SPEND_EARLY_YEARS
            | crate::params::SPEND_SKILLS => Some(Self::EducationSpending),
            SPEND_UNIVERSAL_CREDIT | SPEND_DISABILITY | crate::params::SPEND_CHILD_BENEFIT
            | SPEND_STATE_PENSION => Some(Self::WelfareProtection),
            SPEND_DEFENCE | crate::params::SPEND_DEFENCE_EQUIPMENT | crate::params::SPEND_BORDER => {
                Some(Self::DefenceSpending)
            }
            SPEND_GREEN_ENERGY | crate::params::SPEND_ENVIRONMENT => Some(Self::GreenInvestment),
            key if REGIONAL_INVESTMENT_LINES.contains(&key)
                || key == crate::params::SPEND_DEVOLVED_GRANTS =>
            {
                Some(Self::RegionalInvestment)
            }
            key if crate::params::TAX_PARAMETERS.contains(&key) => Some(Self::TaxRisesAvoid),
            _ => None,
        }
    }

    /// Whether this category uses the higher group-lobbying threshold.
    #[must_use]
    pub const fn is_nhs_flavoured(self) -> bool {
        matches!(self, Self::NhsSpending)
    }
}

impl fmt::Display for PromiseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PromiseCategory {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.key() == s)
            .ok_or(())
    }
}

/// Who takes the blame when a promise is broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Responsibility {
    Chancellor,
    Representative,
}

/// The three-state lifecycle. Fulfilled-and-broken is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "state")]
pub enum PromiseOutcome {
    #[default]
    Pending,
    Fulfilled {
        turn: u32,
    },
    Broken {
        by_turn: u32,
        responsibility: Responsibility,
    },
}

impl PromiseOutcome {
    #[must_use]
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Pending)
    }

    #[must_use]
    pub const fn is_broken(self) -> bool {
        matches!(self, Self::Broken { .. })
    }

    #[must_use]
    pub const fn is_fulfilled(self) -> bool {
        matches!(self, Self::Fulfilled { .. })
    }
}

/// A commitment made to one or more members during lobbying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Promise {
    pub id: PromiseId,
    pub targets: BTreeSet<MpId>,
    pub category: PromiseCategory,
    #[serde(default)]
    pub specific_value: Option<f64>,
    pub made_turn: u32,
    pub deadline_turn: u32,
    #[serde(default)]
    pub outcome: PromiseOutcome,
}

impl Promise {
    /// Mint a new pending promise with the standard deadline window.
    #[must_use]
    pub fn new(
        id: PromiseId,
        targets: BTreeSet<MpId>,
        category: PromiseCategory,
        specific_value: Option<f64>,
        made_turn: u32,
    ) -> Self {
        Self {
            id,
            targets,
            category,
            specific_value,
            made_turn,
            deadline_turn: made_turn + PROMISE_DEADLINE_TURNS,
            outcome: PromiseOutcome::Pending,
        }
    }

    #[must_use]
    pub fn targets_member(&self, id: MpId) -> bool {
        self.targets.contains(&id)
    }
}

/// Whether a budget satisfies a category's criterion.
///
/// An unknown pairing conservatively reads as unmet; missing deltas read as
/// zero, so an empty budget only ever satisfies `TaxRisesAvoid`.
#[must_use]
pub fn criterion_met(
    category: PromiseCategory,
    specific_value: Option<f64>,
    budget: &BudgetProposal,
) -> bool {
    match category {
        PromiseCategory::NhsSpending => meets_floor(budget.spending.get(SPEND_NHS), specific_value),
        PromiseCategory::EducationSpending => {
            meets_floor(budget.spending.get(SPEND_SCHOOLS), specific_value)
        }
        PromiseCategory::DefenceSpending => {
            meets_floor(budget.spending.get(SPEND_DEFENCE), specific_value)
        }
        PromiseCategory::GreenInvestment => {
            meets_floor(budget.spending.get(SPEND_GREEN_ENERGY), specific_value)
        }
        PromiseCategory::RegionalInvestment => meets_floor(
            budget
                .spending
                .sum_of(&REGIONAL_INVESTMENT_LINES),
            specific_value,
        ),
        PromiseCategory::WelfareProtection => {
            let protected = [SPEND_UNIVERSAL_CREDIT, SPEND_DISABILITY]
                .iter()
                .all(|key| budget.spending.get(key) >= 0.0);
            match specific_value {
                Some(value) => {
                    protected && budget.spending.get(SPEND_UNIVERSAL_CREDIT) >= value
                }
                None => protected,
            }
        }
        PromiseCategory::TaxCuts => {
            let total: f64 = TRACKED_PERSONAL_TAXES
                .iter()
                .map(|key| budget.taxes.get(key))
                .sum();
            match specific_value {
                Some(value) => total <= -value,
                None => total < 0.0,
            }
        }
        PromiseCategory::TaxRisesAvoid => TRACKED_PERSONAL_TAXES
            .iter()
            .all(|key| budget.taxes.get(key) <= 0.0),
        PromiseCategory::FiscalDiscipline => {
            let spend: f64 = budget.spending.iter().map(|(_, delta)| delta).sum();
            let tax: f64 = budget.taxes.iter().map(|(_, delta)| delta).sum();
            spend - tax * FISCAL_REVENUE_WEIGHT < 0.0
        }
    }
}

fn meets_floor(delta: f64, specific_value: Option<f64>) -> bool {
    match specific_value {
        Some(value) => delta >= value,
        None => delta > 0.0,
    }
}

/// Run the per-turn reconciliation pass: mark pending promises the budget
/// fulfils, break the ones whose deadline has lapsed, and return the ids
/// newly broken this turn. The only engine function that mutates shared
/// long-lived state.
pub fn reconcile_promises(
    promises: &mut [Promise],
    budget: &BudgetProposal,
    turn: u32,
) -> Vec<PromiseId> {
    let mut newly_broken = Vec::new();
    for promise in promises.iter_mut() {
        if !promise.outcome.is_pending() {
            continue;
        }
        if turn <= promise.deadline_turn {
            if criterion_met(promise.category, promise.specific_value, budget) {
                promise.outcome = PromiseOutcome::Fulfilled { turn };
            }
        } else {
            promise.outcome = PromiseOutcome::Broken {
                by_turn: turn,
                responsibility: Responsibility::Chancellor,
            };
            newly_broken.push(promise.id);
        }
    }
    newly_broken
}

/// Broken promises made to a given member.
#[must_use]
pub fn broken_count_for(promises: &[Promise], id: MpId) -> u32 {
    promises
        .iter()
        .filter(|promise| promise.outcome.is_broken() && promise.targets_member(id))
        .count() as u32
}

/// Still-open promises made to a given member.
pub fn open_promises_for(promises: &[Promise], id: MpId) -> impl Iterator<Item = &Promise> {
    promises
        .iter()
        .filter(move |promise| promise.outcome.is_pending() && promise.targets_member(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn promise(category: PromiseCategory, value: Option<f64>, made_turn: u32) -> Promise {
        Promise::new(
            PromiseId(1),
            BTreeSet::from([MpId(10)]),
            category,
            value,
            made_turn,
        )
    }

    fn nhs_budget(delta: f64) -> BudgetProposal {
        BudgetProposal {
            spending: [(SPEND_NHS, delta)].into_iter().collect(),
            ..BudgetProposal::default()
        }
    }

    #[test]
    fn promise_fulfils_before_deadline_and_stays_fulfilled() {
        let mut promises = vec![promise(PromiseCategory::NhsSpending, Some(5.0), 1)];
        let generous = nhs_budget(6.0);

        let broken = reconcile_promises(&mut promises, &generous, 2);
        assert!(broken.is_empty());
        assert_eq!(promises[0].outcome, PromiseOutcome::Fulfilled { turn: 2 });

        // Terminal: later lean budgets cannot break it.
        let broken = reconcile_promises(&mut promises, &nhs_budget(-10.0), 9);
        assert!(broken.is_empty());
        assert!(promises[0].outcome.is_fulfilled());
    }

    #[test]
    fn promise_breaks_exactly_when_deadline_lapses() {
        let mut promises = vec![promise(PromiseCategory::NhsSpending, Some(5.0), 1)];
        let stingy = nhs_budget(1.0);

        for turn in 2..=4 {
            let broken = reconcile_promises(&mut promises, &stingy, turn);
            assert!(broken.is_empty(), "broke early at turn {turn}");
            assert!(promises[0].outcome.is_pending());
        }

        let broken = reconcile_promises(&mut promises, &stingy, 5);
        assert_eq!(broken, vec![PromiseId(1)]);
        assert_eq!(
            promises[0].outcome,
            PromiseOutcome::Broken {
                by_turn: 5,
                responsibility: Responsibility::Chancellor,
            }
        );

        // Terminal: re-reconciling reports nothing new.
        let broken = reconcile_promises(&mut promises, &nhs_budget(50.0), 6);
        assert!(broken.is_empty());
        assert!(promises[0].outcome.is_broken());
    }

    #[test]
    fn unspecified_value_accepts_any_positive_delta() {
        let mut promises = vec![promise(PromiseCategory::NhsSpending, None, 1)];
        reconcile_promises(&mut promises, &nhs_budget(0.1), 1);
        assert!(promises[0].outcome.is_fulfilled());
    }

    #[test]
    fn tax_rises_avoid_tracks_all_four_dials() {
        use crate::params::{TAX_INCOME_BASIC, TAX_NI_MAIN};
        let clean = BudgetProposal {
            taxes: [(TAX_INCOME_BASIC, -1.0)].into_iter().collect(),
            ..BudgetProposal::default()
        };
        assert!(criterion_met(PromiseCategory::TaxRisesAvoid, None, &clean));

        let dirty = BudgetProposal {
            taxes: [(TAX_NI_MAIN, 0.5)].into_iter().collect(),
            ..BudgetProposal::default()
        };
        assert!(!criterion_met(PromiseCategory::TaxRisesAvoid, None, &dirty));

        // Empty budget raises nothing.
        assert!(criterion_met(
            PromiseCategory::TaxRisesAvoid,
            None,
            &BudgetProposal::default()
        ));
    }

    #[test]
    fn fiscal_discipline_wants_negative_weighted_swing() {
        use crate::params::TAX_INCOME_HIGHER;
        let tightening = BudgetProposal {
            taxes: [(TAX_INCOME_HIGHER, 2.0)].into_iter().collect(),
            spending: [(SPEND_NHS, 1.0)].into_iter().collect(),
            ..BudgetProposal::default()
        };
        assert!(criterion_met(
            PromiseCategory::FiscalDiscipline,
            None,
            &tightening
        ));
        assert!(!criterion_met(
            PromiseCategory::FiscalDiscipline,
            None,
            &nhs_budget(4.0)
        ));
    }

    #[test]
    fn welfare_protection_fails_on_any_cut() {
        let cut = BudgetProposal {
            spending: [(SPEND_DISABILITY, -0.5), (SPEND_UNIVERSAL_CREDIT, 2.0)]
                .into_iter()
                .collect(),
            ..BudgetProposal::default()
        };
        assert!(!criterion_met(PromiseCategory::WelfareProtection, None, &cut));

        // No welfare lines itemized counts as protected.
        assert!(criterion_met(
            PromiseCategory::WelfareProtection,
            None,
            &BudgetProposal::default()
        ));
    }

    #[test]
    fn broken_and_open_counters_filter_by_target() {
        let mut first = promise(PromiseCategory::NhsSpending, Some(5.0), 1);
        first.outcome = PromiseOutcome::Broken {
            by_turn: 5,
            responsibility: Responsibility::Chancellor,
        };
        let second = Promise::new(
            PromiseId(2),
            BTreeSet::from([MpId(10), MpId(11)]),
            PromiseCategory::TaxCuts,
            None,
            2,
        );
        let promises = vec![first, second];

        assert_eq!(broken_count_for(&promises, MpId(10)), 1);
        assert_eq!(broken_count_for(&promises, MpId(11)), 0);
        assert_eq!(open_promises_for(&promises, MpId(11)).count(), 1);
        assert_eq!(open_promises_for(&promises, MpId(12)).count(), 0);
    }

    #[test]
    fn parameter_category_mapping_covers_dial_families() {
        assert_eq!(
            PromiseCategory::for_parameter(SPEND_NHS),
            Some(PromiseCategory::NhsSpending)
        );
        assert_eq!(
            PromiseCategory::for_parameter(crate::params::SPEND_RAIL),
            Some(PromiseCategory::RegionalInvestment)
        );
        assert_eq!(
            PromiseCategory::for_parameter(crate::params::TAX_INCOME_BASIC),
            Some(PromiseCategory::TaxRisesAvoid)
        );
        assert_eq!(PromiseCategory::for_parameter("unknown_dial"), None);
    }
}
