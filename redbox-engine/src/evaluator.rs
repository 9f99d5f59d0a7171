//! Scoring a proposed budget against a member's preferences.
//!
//! Four independent reads: where the budget sits ideologically, how close
//! that is to the member, what it does to their constituency, and how it
//! lands against their granular concerns. A fifth, the plausibility penalty,
//! is budget-intrinsic: it models deltas any member would balk at
//! regardless of leaning.

use serde::{Deserialize, Serialize};

use crate::concerns::{ConcernDirection, ConcernProfile};
use crate::numbers::{clamp_axis, clamp_percent, clamp_scale};
use crate::params::{
    BudgetProposal, SPEND_JUSTICE, SPEND_LOCAL_GOVERNMENT, SPEND_MENTAL_HEALTH, SPEND_NHS,
    SPEND_POLICE, SPEND_SCHOOLS, SPEND_SOCIAL_CARE, SPEND_STATE_PENSION, SPEND_HIGHER_EDUCATION,
    SPEND_HOUSING_COMMUNITIES, SPEND_UNIVERSAL_CREDIT, TAX_CAPITAL_GAINS, TAX_INCOME_ADDITIONAL,
    TAX_INCOME_BASIC, TAX_INCOME_HIGHER, TAX_PERSONAL_ALLOWANCE, TAX_VAT_STANDARD,
};
use crate::roster::{AgeProfile, IdeologicalPosition, Representative};

// How hard itemized deltas drag the implied position.
const TAX_ECONOMIC_PULL: f64 = 0.3;
const SPEND_ECONOMIC_PULL: f64 = 0.2;
const DEFICIT_FISCAL_PULL: f64 = 0.12;
const NEUTRAL_FISCAL_STANCE: f64 = 5.0;

// Granular impact shaping.
const TAX_MAGNITUDE_SCALE: f64 = 2.5;
const SPEND_MAGNITUDE_SCALE: f64 = 1.0;
const MAGNITUDE_CAP: f64 = 5.0;
const MAINTAIN_HELD_CREDIT: f64 = 2.0;
const MAINTAIN_VIOLATED_PENALTY: f64 = -1.5;
const GRANULAR_OUTPUT_SCALE: f64 = 10.0;

// Plausibility shaping.
const SWING_BANDS: [(f64, f64); 4] = [(70.0, 90.0), (50.0, 60.0), (30.0, 35.0), (10.0, 10.0)];
const INCOHERENT_MIX_PENALTY: f64 = 20.0;
const MIX_SLASH_THRESHOLD: f64 = -5.0;
const VAT_LARGE_RISE: f64 = 10.0;
const VAT_LARGE_PENALTY: f64 = 25.0;
const VAT_NOTABLE_RISE: f64 = 5.0;
const VAT_NOTABLE_PENALTY: f64 = 15.0;

/// Where a budget sits on the axes a member is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImpliedIdeology {
    pub economic_axis: f64,
    pub fiscal_conservatism: f64,
}

/// All evaluator outputs for one member and one budget.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetAssessment {
    pub implied: ImpliedIdeology,
    pub ideological_alignment: f64,
    pub constituency_impact: f64,
    pub granular_impact: f64,
    pub plausibility_penalty: f64,
}

/// Map itemized deltas onto an implied ideological position.
///
/// Tax rises and spending rises both pull the implied economic axis left;
/// deficit-widening changes reduce implied fiscal conservatism from a
/// neutral stance, deficit-narrowing raise it.
#[must_use]
pub fn implied_ideology(budget: &BudgetProposal) -> ImpliedIdeology {
    let mut economic = 0.0;
    for (_, delta) in budget.taxes.iter() {
        economic -= delta * TAX_ECONOMIC_PULL;
    }
    for (_, delta) in budget.spending.iter() {
        economic -= delta * SPEND_ECONOMIC_PULL;
    }
    let fiscal = NEUTRAL_FISCAL_STANCE - budget.deficit_swing() * DEFICIT_FISCAL_PULL;
    ImpliedIdeology {
        economic_axis: clamp_axis(economic),
        fiscal_conservatism: clamp_scale(fiscal),
    }
}

/// Closeness of a member to a budget's implied position; 10 is identical.
#[must_use]
pub fn ideological_alignment(position: &IdeologicalPosition, implied: &ImpliedIdeology) -> f64 {
    let economic_gap = (position.economic_axis - implied.economic_axis).abs();
    let fiscal_gap = (position.fiscal_conservatism - implied.fiscal_conservatism).abs();
    clamp_scale(10.0 - (economic_gap + fiscal_gap) / 2.0)
}

/// Heuristic constituency read in `[-5, 5]` from a fixed rule table.
#[must_use]
pub fn constituency_impact(rep: &Representative, budget: &BudgetProposal) -> f64 {
    let demo = &rep.constituency.demographics;
    let mut score: f64 = 0.0;

    if demo.median_income < 28_000.0 {
        let credit = budget.spending.get(SPEND_UNIVERSAL_CREDIT);
        if credit > 0.0 {
            score += 1.5;
        } else if credit < 0.0 {
            score -= 2.0;
        }
        if budget.taxes.get(TAX_INCOME_BASIC) > 0.0 {
            score -= 1.0;
        }
        if budget.taxes.get(TAX_PERSONAL_ALLOWANCE) > 0.0 {
            score += 1.0;
        }
    } else if demo.median_income > 45_000.0 {
        if budget.taxes.get(TAX_INCOME_HIGHER) > 0.0 {
            score -= 1.5;
        }
        if budget.taxes.get(TAX_CAPITAL_GAINS) > 0.0 {
            score -= 0.5;
        }
    }

    if demo.public_sector_dependency > 0.3 {
        let lines = budget.spending.sum_of(&[
            SPEND_NHS,
            SPEND_SCHOOLS,
            SPEND_LOCAL_GOVERNMENT,
            SPEND_POLICE,
        ]);
        if lines > 0.0 {
            score += 1.5;
        } else if lines < 0.0 {
            score -= 2.0;
        }
    }

    match demo.age_profile {
        AgeProfile::Elderly => {
            let lines = budget
                .spending
                .sum_of(&[SPEND_STATE_PENSION, SPEND_SOCIAL_CARE]);
            if lines > 0.0 {
                score += 1.5;
            } else if lines < 0.0 {
                score -= 2.0;
            }
        }
        AgeProfile::Young => {
            let lines = budget.spending.sum_of(&[
                SPEND_SCHOOLS,
                SPEND_HIGHER_EDUCATION,
                SPEND_HOUSING_COMMUNITIES,
            ]);
            if lines > 0.0 {
                score += 1.0;
            } else if lines < 0.0 {
                score -= 1.0;
            }
        }
        AgeProfile::Mixed => {}
    }

    // Granular-line sensitivity everyone shares.
    if budget.spending.get(SPEND_JUSTICE) < -1.0 {
        score -= 0.5;
    }
    if budget.spending.get(SPEND_MENTAL_HEALTH) > 0.0 {
        score += 0.5;
    }
    if budget.spending.get(SPEND_SOCIAL_CARE) > 0.0 {
        score += 0.5;
    }

    score.clamp(-5.0, 5.0)
}

/// Concern-weighted read of the itemized deltas, scaled to `[-50, 50]`.
///
/// Only dials actually itemized in the budget count; a concern with no
/// matching delta contributes nothing. Within a match: full credit when the
/// change runs the wanted way (halved below an explicit threshold), a
/// symmetric penalty when it runs against, and a small penalty when a
/// `Maintain` concern sees any change at all.
#[must_use]
pub fn granular_impact(profile: &ConcernProfile, budget: &BudgetProposal) -> f64 {
    let mut weighted = 0.0;
    let mut weight = 0.0;

    for concern in &profile.concerns {
        let itemized =
            budget.taxes.contains(&concern.parameter) || budget.spending.contains(&concern.parameter);
        if !itemized {
            continue;
        }
        let delta = budget.delta(&concern.parameter);
        let scale = if budget.is_tax_parameter(&concern.parameter) {
            TAX_MAGNITUDE_SCALE
        } else {
            SPEND_MAGNITUDE_SCALE
        };
        let score = match concern.direction {
            ConcernDirection::Increase => directional_score(delta, concern.threshold, scale),
            ConcernDirection::Decrease => directional_score(-delta, concern.threshold, scale),
            ConcernDirection::Maintain => {
                if delta.abs() > f64::EPSILON {
                    MAINTAIN_VIOLATED_PENALTY
                } else {
                    MAINTAIN_HELD_CREDIT
                }
            }
        };
        weighted += score * concern.priority;
        weight += concern.priority;
    }

    if weight <= f64::EPSILON {
        return 0.0;
    }
    ((weighted / weight) * GRANULAR_OUTPUT_SCALE).clamp(-50.0, 50.0)
}

/// Score a signed delta against a wanted direction; positive input means the
/// change runs the wanted way.
fn directional_score(oriented_delta: f64, threshold: Option<f64>, scale: f64) -> f64 {
    if oriented_delta.abs() < f64::EPSILON {
        return 0.0;
    }
    let magnitude = (oriented_delta.abs() * scale).min(MAGNITUDE_CAP);
    let full = if oriented_delta > 0.0 { magnitude } else { -magnitude };
    match threshold {
        Some(wanted) if oriented_delta > 0.0 && oriented_delta < wanted => full * 0.5,
        _ => full,
    }
}

/// Budget-intrinsic toxicity in `[0, 100]`, independent of any ideology.
#[must_use]
pub fn plausibility_penalty(budget: &BudgetProposal) -> f64 {
    let mut penalty = 0.0;

    // Extreme single-rate swings: the worst dial sets the band.
    let mut worst_swing = 0.0f64;
    for (_, delta) in budget.taxes.iter() {
        let magnitude = delta.abs();
        for (threshold, band) in SWING_BANDS {
            if magnitude >= threshold {
                worst_swing = worst_swing.max(band);
                break;
            }
        }
    }
    penalty += worst_swing;

    // Incoherent cross-rate mixes: raising the basic rate while slashing the
    // higher or additional rate.
    let basic = budget.taxes.get(TAX_INCOME_BASIC);
    let higher = budget.taxes.get(TAX_INCOME_HIGHER);
    let additional = budget.taxes.get(TAX_INCOME_ADDITIONAL);
    if basic > 0.0 && (higher <= MIX_SLASH_THRESHOLD || additional <= MIX_SLASH_THRESHOLD) {
        penalty += INCOHERENT_MIX_PENALTY;
    }

    // Large VAT rises read as reckless to everyone.
    let vat = budget.taxes.get(TAX_VAT_STANDARD);
    if vat >= VAT_LARGE_RISE {
        penalty += VAT_LARGE_PENALTY;
    } else if vat >= VAT_NOTABLE_RISE {
        penalty += VAT_NOTABLE_PENALTY;
    }

    clamp_percent(penalty)
}

/// Run the full evaluator for one member.
#[must_use]
pub fn assess(
    rep: &Representative,
    concerns: &ConcernProfile,
    budget: &BudgetProposal,
) -> BudgetAssessment {
    let implied = implied_ideology(budget);
    BudgetAssessment {
        implied,
        ideological_alignment: ideological_alignment(&rep.ideology, &implied),
        constituency_impact: constituency_impact(rep, budget),
        granular_impact: granular_impact(concerns, budget),
        plausibility_penalty: plausibility_penalty(budget),
    }
}
