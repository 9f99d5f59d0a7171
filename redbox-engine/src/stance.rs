//! Turning evaluator output, promises, and temperament into a stance.
//!
//! Only governing-party members get the full treatment: every other bench
//! resolves by affiliation alone. The per-promise compliance roll is a pure
//! hash of stable identifiers, never an RNG draw, so that a forecasting
//! caller replaying the same cloned state sees identical scores every time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::concerns::build_concerns;
use crate::constants::{
    ALIGNMENT_WEIGHT, BROKEN_PROMISE_PENALTY, COMPLIANCE_BASE, COMPLIANCE_MARGINALITY_WEIGHT,
    COMPLIANCE_REBELLIOUSNESS_DIVISOR, CONSTITUENCY_WEIGHT, HIGH_TRAIT_THRESHOLD,
    LOW_ALIGNMENT_THRESHOLD, MANIFESTO_VIOLATION_PENALTY, MARGINAL_CONSTITUENCY_EXTRA_WEIGHT,
    MINISTER_PAYROLL_BONUS, OPPOSE_THRESHOLD, PLAUSIBILITY_MARGINAL_EXTRA,
    PLAUSIBILITY_PRINCIPLED_DIVISOR, PLAUSIBILITY_WEIGHT_BASE, PRINCIPLED_MISALIGNMENT_PENALTY,
    PROMISE_COMPLIANT_BONUS, PROMISE_DEFIANT_BONUS, REBEL_TEMPERAMENT_PENALTY, STANCE_BASE_SCORE,
    SUPPORT_THRESHOLD, TAX_SHAPE_NUDGE,
};
use crate::evaluator::assess;
use crate::numbers::{clamp_probability, usize_to_f64};
use crate::params::{BudgetProposal, TaxDistribution};
use crate::promises::{Promise, broken_count_for, open_promises_for};
use crate::rng::stable_fraction;
use crate::roster::{Faction, MpId, Representative, Roster};

const COMPLIANCE_DOMAIN: &[u8] = b"promise-compliance";

/// Tri-state disposition toward a specific budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StanceLabel {
    Support,
    Oppose,
    Undecided,
}

impl StanceLabel {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Support => "support",
            Self::Oppose => "oppose",
            Self::Undecided => "undecided",
        }
    }
}

/// Component breakdown retained alongside the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StanceBreakdown {
    pub ideological_alignment: f64,
    pub constituency_impact: f64,
    pub granular_impact: f64,
    pub broken_promises: u32,
    pub open_promises: u32,
}

/// A lobbying-granted override, valid only through the turn it was set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManualOverride {
    pub set_turn: u32,
}

/// One member's computed disposition. The label is a field of this single
/// record; callers that only need the tri-state project it out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stance {
    pub score: f64,
    pub label: StanceLabel,
    pub breakdown: StanceBreakdown,
    pub reason: String,
    #[serde(default)]
    pub manual_override: Option<ManualOverride>,
}

impl Stance {
    /// Whether a lobbying override still binds at the given turn.
    #[must_use]
    pub fn override_valid_at(&self, turn: u32) -> bool {
        self.manual_override
            .is_some_and(|granted| granted.set_turn == turn)
    }

    /// A stance granted by successful lobbying: carried unchanged through
    /// every reclassification this turn, recomputed from scratch after.
    #[must_use]
    pub fn overridden(label: StanceLabel, score: f64, reason: &str, turn: u32) -> Self {
        Self {
            score,
            label,
            breakdown: StanceBreakdown::default(),
            reason: reason.to_string(),
            manual_override: Some(ManualOverride { set_turn: turn }),
        }
    }

    fn fixed(score: f64, label: StanceLabel, reason: &str) -> Self {
        Self {
            score,
            label,
            breakdown: StanceBreakdown::default(),
            reason: reason.to_string(),
            manual_override: None,
        }
    }
}

/// Canonical form for stance maps crossing the engine boundary.
///
/// Serialization boundaries produce either a native id-keyed map or an
/// array of `[id, stance]` pairs; both normalize here before any scoring
/// or ballot logic sees them.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct StanceMap(BTreeMap<MpId, Stance>);

#[derive(Deserialize)]
#[serde(untagged)]
enum StanceMapRepr {
    Map(BTreeMap<MpId, Stance>),
    Pairs(Vec<(MpId, Stance)>),
}

impl<'de> Deserialize<'de> for StanceMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = StanceMapRepr::deserialize(deserializer)?;
        Ok(match repr {
            StanceMapRepr::Map(map) => Self(map),
            StanceMapRepr::Pairs(pairs) => Self(pairs.into_iter().collect()),
        })
    }
}

impl StanceMap {
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<MpId, Stance> {
        self.0
    }

    #[must_use]
    pub fn as_map(&self) -> &BTreeMap<MpId, Stance> {
        &self.0
    }
}

impl From<BTreeMap<MpId, Stance>> for StanceMap {
    fn from(map: BTreeMap<MpId, Stance>) -> Self {
        Self(map)
    }
}

/// Per-vote context supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct StanceContext {
    /// Whip pressure for the division; consumed by the vote simulator.
    #[serde(default)]
    pub whip_strength: Option<f64>,
    /// Explicit promise-compliance probability, overriding the inferred one.
    #[serde(default)]
    pub compliance_override: Option<f64>,
}

/// Classify one member against a proposed budget.
///
/// `prior` carries the previous stance so a still-valid manual override can
/// short-circuit recomputation; it is otherwise ignored.
#[must_use]
pub fn classify(
    rep: &Representative,
    budget: &BudgetProposal,
    promises: &[Promise],
    turn: u32,
    ctx: &StanceContext,
    prior: Option<&Stance>,
) -> Stance {
    if let Some(previous) = prior
        && previous.override_valid_at(turn)
    {
        return previous.clone();
    }

    if !rep.affiliation.takes_seats() {
        return Stance::fixed(50.0, StanceLabel::Undecided, "does not take seats");
    }
    if !rep.affiliation.is_governing() {
        return Stance::fixed(
            20.0,
            StanceLabel::Oppose,
            "Opposition benches oppose the government's budget",
        );
    }

    let concerns = build_concerns(rep);
    let assessment = assess(rep, &concerns, budget);
    let marginal = rep.constituency.is_marginal();

    let mut score = STANCE_BASE_SCORE;
    score += assessment.ideological_alignment * ALIGNMENT_WEIGHT;
    score -= MANIFESTO_VIOLATION_PENALTY * usize_to_f64(budget.manifesto_violations.len());

    let broken = broken_count_for(promises, rep.id);
    score -= BROKEN_PROMISE_PENALTY * f64::from(broken);

    let compliance = ctx
        .compliance_override
        .map_or_else(|| inferred_compliance(rep), clamp_probability);
    let mut open = 0u32;
    for promise in open_promises_for(promises, rep.id) {
        open = open.saturating_add(1);
        let roll = stable_fraction(
            COMPLIANCE_DOMAIN,
            &[u64::from(rep.id.0), u64::from(promise.id.0), u64::from(turn)],
        );
        score += if roll < compliance {
            PROMISE_COMPLIANT_BONUS
        } else {
            PROMISE_DEFIANT_BONUS
        };
    }

    score += assessment.constituency_impact * CONSTITUENCY_WEIGHT;
    if marginal {
        score += assessment.constituency_impact * MARGINAL_CONSTITUENCY_EXTRA_WEIGHT;
    }
    score += assessment.granular_impact;

    if rep.traits.rebelliousness > HIGH_TRAIT_THRESHOLD {
        score -= REBEL_TEMPERAMENT_PENALTY;
    }
    if rep.is_minister {
        score += MINISTER_PAYROLL_BONUS;
    }
    if rep.traits.principled > HIGH_TRAIT_THRESHOLD
        && assessment.ideological_alignment < LOW_ALIGNMENT_THRESHOLD
    {
        score -= PRINCIPLED_MISALIGNMENT_PENALTY;
    }

    let plausibility_weight =
        PLAUSIBILITY_WEIGHT_BASE + rep.traits.principled / PLAUSIBILITY_PRINCIPLED_DIVISOR;
    score -= assessment.plausibility_penalty * plausibility_weight;
    if marginal {
        score -= assessment.plausibility_penalty * PLAUSIBILITY_MARGINAL_EXTRA;
    }

    score += tax_shape_nudge(rep, budget.tax_distribution);

    let label = label_for(score);
    let breakdown = StanceBreakdown {
        ideological_alignment: assessment.ideological_alignment,
        constituency_impact: assessment.constituency_impact,
        granular_impact: assessment.granular_impact,
        broken_promises: broken,
        open_promises: open,
    };
    let reason = compose_reason(label, &breakdown, assessment.plausibility_penalty);

    Stance {
        score,
        label,
        breakdown,
        reason,
        manual_override: None,
    }
}

/// Classify the whole roster in stable id order.
#[must_use]
pub fn classify_all(
    roster: &Roster,
    budget: &BudgetProposal,
    promises: &[Promise],
    turn: u32,
    ctx: &StanceContext,
    prior: Option<&BTreeMap<MpId, Stance>>,
) -> BTreeMap<MpId, Stance> {
    roster
        .iter()
        .map(|rep| {
            let previous = prior.and_then(|map| map.get(&rep.id));
            (rep.id, classify(rep, budget, promises, turn, ctx, previous))
        })
        .collect()
}

const fn label_for(score: f64) -> StanceLabel {
    if score > SUPPORT_THRESHOLD {
        StanceLabel::Support
    } else if score < OPPOSE_THRESHOLD {
        StanceLabel::Oppose
    } else {
        StanceLabel::Undecided
    }
}

/// Inferred probability a member believes an open promise will be honoured.
/// Rebels discount promises; marginal-seat members need them to be true.
fn inferred_compliance(rep: &Representative) -> f64 {
    clamp_probability(
        COMPLIANCE_BASE - rep.traits.rebelliousness / COMPLIANCE_REBELLIOUSNESS_DIVISOR
            + rep.constituency.marginality * COMPLIANCE_MARGINALITY_WEIGHT,
    )
}

fn tax_shape_nudge(rep: &Representative, distribution: Option<TaxDistribution>) -> f64 {
    let Some(distribution) = distribution else {
        return 0.0;
    };
    match (rep.effective_faction(), distribution) {
        (Some(Faction::Left | Faction::SoftLeft), TaxDistribution::ProgressiveLeaning) => {
            TAX_SHAPE_NUDGE
        }
        (Some(Faction::Left | Faction::SoftLeft), TaxDistribution::RegressiveLeaning) => {
            -TAX_SHAPE_NUDGE
        }
        (Some(Faction::Centrist), TaxDistribution::RegressiveLeaning) => -TAX_SHAPE_NUDGE,
        (Some(Faction::PartyRight), TaxDistribution::ProgressiveLeaning) => -TAX_SHAPE_NUDGE,
        (Some(Faction::PartyRight), TaxDistribution::RegressiveLeaning) => TAX_SHAPE_NUDGE,
        _ => 0.0,
    }
}

fn compose_reason(label: StanceLabel, breakdown: &StanceBreakdown, plausibility: f64) -> String {
    match label {
        StanceLabel::Support => {
            if breakdown.granular_impact > 15.0 {
                String::from("Backs the budget: it delivers on their priority issues")
            } else if breakdown.constituency_impact > 2.0 {
                String::from("Backs the budget: clear gains for the constituency")
            } else {
                String::from("Backs the budget: comfortable ideological fit")
            }
        }
        StanceLabel::Oppose => {
            if breakdown.broken_promises > 0 {
                String::from("Opposes: promises to them have been broken")
            } else if plausibility > 30.0 {
                String::from("Opposes: the package is not credible as written")
            } else if breakdown.constituency_impact < -2.0 {
                String::from("Opposes: the constituency takes a direct hit")
            } else {
                String::from("Opposes: too far from their politics")
            }
        }
        StanceLabel::Undecided => {
            String::from("Undecided: the case for and against is finely balanced")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::promises::{PromiseCategory, PromiseId, PromiseOutcome, Responsibility};
    use crate::roster::{Affiliation, IdeologicalPosition, MpTraits};
    use std::collections::BTreeSet;

    fn governing_rep(id: u32) -> Representative {
        Representative {
            id: MpId(id),
            ideology: IdeologicalPosition {
                economic_axis: -4.0,
                social_axis: 0.0,
                fiscal_conservatism: 5.0,
            },
            traits: MpTraits {
                rebelliousness: 3.0,
                ambition: 5.0,
                principled: 5.0,
                careerist: 5.0,
                popularity_focus: 5.0,
            },
            ..Representative::default()
        }
    }

    fn open_promise(id: u32, target: u32, turn: u32) -> Promise {
        Promise::new(
            PromiseId(id),
            BTreeSet::from([MpId(target)]),
            PromiseCategory::NhsSpending,
            Some(3.0),
            turn,
        )
    }

    #[test]
    fn classification_is_deterministic() {
        let rep = governing_rep(7);
        let budget = BudgetProposal::default();
        let promises = vec![open_promise(1, 7, 1), open_promise(2, 7, 1)];
        let ctx = StanceContext::default();

        let first = classify(&rep, &budget, &promises, 3, &ctx, None);
        let second = classify(&rep, &budget, &promises, 3, &ctx, None);
        assert!((first.score - second.score).abs() < f64::EPSILON);
        assert_eq!(first.label, second.label);
        assert_eq!(first.breakdown.open_promises, 2);
    }

    #[test]
    fn non_governing_benches_resolve_by_affiliation() {
        let budget = BudgetProposal::default();
        let ctx = StanceContext::default();

        let mut opposition = governing_rep(1);
        opposition.affiliation = Affiliation::Opposition;
        let stance = classify(&opposition, &budget, &[], 1, &ctx, None);
        assert_eq!(stance.label, StanceLabel::Oppose);

        let mut libdem = governing_rep(2);
        libdem.affiliation = Affiliation::LiberalDemocrat;
        assert_eq!(
            classify(&libdem, &budget, &[], 1, &ctx, None).label,
            StanceLabel::Oppose
        );

        let mut abstentionist = governing_rep(3);
        abstentionist.affiliation = Affiliation::Abstentionist;
        let stance = classify(&abstentionist, &budget, &[], 1, &ctx, None);
        assert_eq!(stance.label, StanceLabel::Undecided);
        assert_eq!(stance.reason, "does not take seats");
    }

    #[test]
    fn broken_promises_cost_twenty_each() {
        let rep = governing_rep(5);
        let budget = BudgetProposal::default();
        let ctx = StanceContext::default();

        let clean = classify(&rep, &budget, &[], 2, &ctx, None);

        let mut broken = open_promise(1, 5, 1);
        broken.outcome = PromiseOutcome::Broken {
            by_turn: 2,
            responsibility: Responsibility::Chancellor,
        };
        let with_broken = classify(&rep, &budget, &[broken], 2, &ctx, None);
        assert!((clean.score - with_broken.score - 20.0).abs() < f64::EPSILON);
        assert_eq!(with_broken.breakdown.broken_promises, 1);
    }

    #[test]
    fn open_promise_bonus_depends_on_compliance_roll_only() {
        let rep = governing_rep(9);
        let budget = BudgetProposal::default();
        let promises = vec![open_promise(4, 9, 1)];

        let trusting = StanceContext {
            compliance_override: Some(0.95),
            ..StanceContext::default()
        };
        let cynical = StanceContext {
            compliance_override: Some(0.05),
            ..StanceContext::default()
        };
        let base = classify(&rep, &budget, &[], 2, &StanceContext::default(), None);
        let best = classify(&rep, &budget, &promises, 2, &trusting, None);
        let worst = classify(&rep, &budget, &promises, 2, &cynical, None);

        // Whatever the roll lands on, the bonus is one of the two fixed
        // increments and monotone in the compliance probability.
        assert!(best.score >= worst.score);
        let best_delta = best.score - base.score;
        let worst_delta = worst.score - base.score;
        assert!(best_delta == 10.0 || best_delta == 2.0);
        assert!(worst_delta == 10.0 || worst_delta == 2.0);
    }

    #[test]
    fn manifesto_violations_penalize_governing_only() {
        let rep = governing_rep(11);
        let ctx = StanceContext::default();
        let clean_budget = BudgetProposal::default();
        let mut dirty_budget = BudgetProposal::default();
        dirty_budget
            .manifesto_violations
            .push(String::from("raised the basic rate"));

        let clean = classify(&rep, &clean_budget, &[], 1, &ctx, None);
        let dirty = classify(&rep, &dirty_budget, &[], 1, &ctx, None);
        assert!((clean.score - dirty.score - 10.0).abs() < f64::EPSILON);

        let mut outsider = governing_rep(12);
        outsider.affiliation = Affiliation::Opposition;
        let outsider_stance = classify(&outsider, &dirty_budget, &[], 1, &ctx, None);
        assert_eq!(outsider_stance.label, StanceLabel::Oppose);
    }

    #[test]
    fn valid_override_short_circuits() {
        let rep = governing_rep(13);
        let budget = BudgetProposal::default();
        let ctx = StanceContext::default();

        let overridden = Stance {
            score: 99.0,
            label: StanceLabel::Support,
            breakdown: StanceBreakdown::default(),
            reason: String::from("pledged support after negotiation"),
            manual_override: Some(ManualOverride { set_turn: 4 }),
        };

        let same_turn = classify(&rep, &budget, &[], 4, &ctx, Some(&overridden));
        assert_eq!(same_turn, overridden);

        let next_turn = classify(&rep, &budget, &[], 5, &ctx, Some(&overridden));
        assert!(next_turn.manual_override.is_none());
        assert!((next_turn.score - 99.0).abs() > f64::EPSILON);
    }

    #[test]
    fn minister_bonus_and_rebel_penalty_apply() {
        let budget = BudgetProposal::default();
        let ctx = StanceContext::default();

        let backbencher = governing_rep(20);
        let mut minister = governing_rep(20);
        minister.is_minister = true;
        let delta = classify(&minister, &budget, &[], 1, &ctx, None).score
            - classify(&backbencher, &budget, &[], 1, &ctx, None).score;
        assert!((delta - 18.0).abs() < f64::EPSILON);

        let mut rebel = governing_rep(21);
        rebel.traits.rebelliousness = 9.0;
        let rebel_delta = classify(&backbencher, &budget, &[], 1, &ctx, None).score
            - classify(&rebel, &budget, &[], 1, &ctx, None).score;
        assert!((rebel_delta - 15.0).abs() < f64::EPSILON);
    }

    #[test]
    fn stance_map_shapes_normalize_identically() {
        let stance = Stance {
            score: 70.0,
            label: StanceLabel::Support,
            breakdown: StanceBreakdown::default(),
            reason: String::from("solid"),
            manual_override: None,
        };
        let map = BTreeMap::from([(MpId(5), stance.clone()), (MpId(2), stance)]);
        let canonical = StanceMap::from(map.clone());

        let as_map = serde_json::to_string(&canonical).unwrap();
        let pairs: Vec<(MpId, Stance)> = map.into_iter().collect();
        let as_pairs = serde_json::to_string(&pairs).unwrap();

        let from_map: StanceMap = serde_json::from_str(&as_map).unwrap();
        let from_pairs: StanceMap = serde_json::from_str(&as_pairs).unwrap();
        assert_eq!(from_map, canonical);
        assert_eq!(from_pairs, canonical);
        let ids: Vec<u32> = from_pairs.as_map().keys().map(|id| id.0).collect();
        assert_eq!(ids, vec![2, 5]);
    }

    #[test]
    fn classify_all_covers_roster_in_order() {
        let mut roster = Roster::new();
        for id in [4u32, 1, 3] {
            let mut rep = governing_rep(id);
            if id == 3 {
                rep.affiliation = Affiliation::Abstentionist;
            }
            roster.insert(rep);
        }
        let stances = classify_all(
            &roster,
            &BudgetProposal::default(),
            &[],
            1,
            &StanceContext::default(),
            None,
        );
        let ids: Vec<u32> = stances.keys().map(|id| id.0).collect();
        assert_eq!(ids, vec![1, 3, 4]);
        assert_eq!(stances[&MpId(3)].label, StanceLabel::Undecided);
    }
}
