//! Derivation of policy concerns from ideology, faction, and constituency.
//!
//! Concerns are assembled additively from independent rule blocks; each block
//! contributes zero or more entries with a fixed priority and direction. The
//! result is deduplicated per budget parameter (highest priority wins) and
//! amplified for marginal seats. Pure and deterministic: identical inputs
//! always produce identical profiles, so callers are free to cache.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::constants::{MARGINAL_PRIORITY_MULTIPLIER, MARGINAL_SEAT_CAVEAT};
use crate::params::{
    SPEND_BORDER, SPEND_CHILD_BENEFIT, SPEND_DEFENCE, SPEND_DEVOLVED_GRANTS, SPEND_DISABILITY,
    SPEND_EARLY_YEARS, SPEND_GREEN_ENERGY, SPEND_HIGHER_EDUCATION, SPEND_HOUSING_COMMUNITIES,
    SPEND_INTERNATIONAL_AID, SPEND_LOCAL_GOVERNMENT, SPEND_NHS, SPEND_POLICE, SPEND_RAIL,
    SPEND_SCHOOLS, SPEND_SCIENCE, SPEND_SKILLS, SPEND_SOCIAL_CARE, SPEND_STATE_PENSION,
    SPEND_UNIVERSAL_CREDIT, TAX_BUSINESS_RATES, TAX_CORPORATION_MAIN, TAX_INCOME_ADDITIONAL,
    TAX_INCOME_BASIC, TAX_INCOME_HIGHER, TAX_PERSONAL_ALLOWANCE, TAX_STAMP_DUTY, TAX_VAT_STANDARD,
};
use crate::roster::{AgeProfile, Faction, Representative};

/// Which way a member wants a budget dial moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConcernDirection {
    Increase,
    Decrease,
    Maintain,
}

/// One policy concern keyed to a budget dial.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concern {
    pub parameter: String,
    pub priority: f64,
    pub direction: ConcernDirection,
    pub reason: String,
    #[serde(default)]
    pub threshold: Option<f64>,
}

/// Ranked, deduplicated concern list for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ConcernProfile {
    pub concerns: Vec<Concern>,
    pub primary_issues: Vec<String>,
}

struct ConcernSink {
    entries: Vec<Concern>,
}

impl ConcernSink {
    const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    fn push(&mut self, parameter: &str, priority: f64, direction: ConcernDirection, reason: &str) {
        self.entries.push(Concern {
            parameter: parameter.to_string(),
            priority,
            direction,
            reason: reason.to_string(),
            threshold: None,
        });
    }

    fn push_with_threshold(
        &mut self,
        parameter: &str,
        priority: f64,
        direction: ConcernDirection,
        reason: &str,
        threshold: f64,
    ) {
        self.entries.push(Concern {
            parameter: parameter.to_string(),
            priority,
            direction,
            reason: reason.to_string(),
            threshold: Some(threshold),
        });
    }
}

/// Build the full concern profile for one member.
#[must_use]
pub fn build_concerns(rep: &Representative) -> ConcernProfile {
    let mut sink = ConcernSink::new();

    ideology_block(rep, &mut sink);
    faction_block(rep, &mut sink);
    fiscal_hawk_block(rep, &mut sink);
    constituency_block(rep, &mut sink);
    minister_block(rep, &mut sink);

    assemble(rep, sink.entries)
}

fn ideology_block(rep: &Representative, sink: &mut ConcernSink) {
    let econ = rep.ideology.economic_axis;
    if econ <= -5.0 {
        sink.push(
            SPEND_NHS,
            9.0,
            ConcernDirection::Increase,
            "Committed to a fully funded health service",
        );
        sink.push(
            SPEND_UNIVERSAL_CREDIT,
            8.0,
            ConcernDirection::Increase,
            "The safety net must not be cut",
        );
        sink.push(
            TAX_INCOME_ADDITIONAL,
            6.0,
            ConcernDirection::Increase,
            "Top earners should carry more of the load",
        );
        sink.push(
            SPEND_GREEN_ENERGY,
            6.0,
            ConcernDirection::Increase,
            "Green transition is a jobs programme",
        );
    } else if econ <= -2.0 {
        sink.push(
            SPEND_NHS,
            7.0,
            ConcernDirection::Increase,
            "Health spending is the doorstep issue",
        );
        sink.push(
            SPEND_SCHOOLS,
            6.0,
            ConcernDirection::Increase,
            "Schools funding cannot slip further",
        );
        sink.push(
            SPEND_SOCIAL_CARE,
            5.0,
            ConcernDirection::Increase,
            "Care backlogs hit constituents directly",
        );
    }
    if econ >= 5.0 {
        sink.push(
            TAX_INCOME_BASIC,
            8.0,
            ConcernDirection::Decrease,
            "Lower taxes drive growth",
        );
        sink.push(
            TAX_CORPORATION_MAIN,
            7.0,
            ConcernDirection::Decrease,
            "Business investment needs headroom",
        );
        sink.push(
            SPEND_DEFENCE,
            6.0,
            ConcernDirection::Increase,
            "Defence of the realm comes first",
        );
        sink.push(
            SPEND_UNIVERSAL_CREDIT,
            5.0,
            ConcernDirection::Decrease,
            "Welfare spending must be restrained",
        );
    } else if econ >= 2.0 {
        sink.push(
            TAX_INCOME_BASIC,
            6.0,
            ConcernDirection::Decrease,
            "Working families need a tax break",
        );
        sink.push(
            TAX_BUSINESS_RATES,
            5.0,
            ConcernDirection::Decrease,
            "High streets are buckling under rates",
        );
        sink.push(
            SPEND_DEFENCE,
            5.0,
            ConcernDirection::Increase,
            "Defence commitments must be met",
        );
    }
}

fn faction_block(rep: &Representative, sink: &mut ConcernSink) {
    match rep.effective_faction() {
        Some(Faction::Left) => {
            sink.push_with_threshold(
                SPEND_GREEN_ENERGY,
                8.0,
                ConcernDirection::Increase,
                "Green investment is the test of seriousness",
                2.0,
            );
            sink.push(
                SPEND_UNIVERSAL_CREDIT,
                8.0,
                ConcernDirection::Increase,
                "Ending austerity was the point",
            );
            sink.push(
                SPEND_DISABILITY,
                7.0,
                ConcernDirection::Increase,
                "Disabled constituents bore the last decade",
            );
        }
        Some(Faction::SoftLeft) => {
            sink.push(
                SPEND_SCHOOLS,
                7.0,
                ConcernDirection::Increase,
                "Education is the route out of poverty",
            );
            sink.push(
                SPEND_EARLY_YEARS,
                6.0,
                ConcernDirection::Increase,
                "Early years funding pays for itself",
            );
        }
        Some(Faction::Centrist) => {
            sink.push(
                TAX_INCOME_BASIC,
                6.0,
                ConcernDirection::Maintain,
                "Keep the tax pledge intact",
            );
            sink.push(
                SPEND_SCIENCE,
                5.0,
                ConcernDirection::Increase,
                "Growth needs a research base",
            );
        }
        Some(Faction::PartyRight) => {
            sink.push(
                SPEND_DEFENCE,
                7.0,
                ConcernDirection::Increase,
                "Defence spending signals seriousness abroad",
            );
            sink.push(
                SPEND_BORDER,
                6.0,
                ConcernDirection::Increase,
                "Border control is a doorstep promise",
            );
        }
        None => {}
    }
}

fn fiscal_hawk_block(rep: &Representative, sink: &mut ConcernSink) {
    if rep.ideology.fiscal_conservatism > 7.0 {
        sink.push(
            SPEND_INTERNATIONAL_AID,
            6.0,
            ConcernDirection::Decrease,
            "Aid must be trimmed until the books balance",
        );
        sink.push(
            TAX_VAT_STANDARD,
            5.0,
            ConcernDirection::Maintain,
            "No stealth rises on consumption",
        );
        sink.push(
            SPEND_LOCAL_GOVERNMENT,
            4.0,
            ConcernDirection::Decrease,
            "Town halls can find efficiencies",
        );
    }
}

fn constituency_block(rep: &Representative, sink: &mut ConcernSink) {
    let demo = &rep.constituency.demographics;
    if demo.median_income < 28_000.0 {
        sink.push(
            SPEND_UNIVERSAL_CREDIT,
            8.0,
            ConcernDirection::Increase,
            "Low-income constituents rely on the safety net",
        );
        sink.push(
            TAX_PERSONAL_ALLOWANCE,
            6.0,
            ConcernDirection::Increase,
            "Raising the allowance helps every payslip here",
        );
        sink.push(
            SPEND_CHILD_BENEFIT,
            5.0,
            ConcernDirection::Increase,
            "Child poverty is visible in the casework",
        );
    } else if demo.median_income > 45_000.0 {
        sink.push(
            TAX_INCOME_HIGHER,
            6.0,
            ConcernDirection::Maintain,
            "Higher-rate payers are concentrated here",
        );
        sink.push(
            TAX_STAMP_DUTY,
            5.0,
            ConcernDirection::Decrease,
            "Stamp duty freezes the local housing chain",
        );
    }
    if demo.unemployment_rate > 6.0 {
        sink.push(
            SPEND_SKILLS,
            7.0,
            ConcernDirection::Increase,
            "Retraining is the only answer to closures",
        );
        sink.push(
            SPEND_LOCAL_GOVERNMENT,
            6.0,
            ConcernDirection::Increase,
            "Local services absorb the shock of job losses",
        );
    }
    if demo.public_sector_dependency > 0.3 {
        sink.push(
            SPEND_NHS,
            7.0,
            ConcernDirection::Increase,
            "The hospital is the largest local employer",
        );
        sink.push(
            SPEND_SCHOOLS,
            6.0,
            ConcernDirection::Increase,
            "School staffing dominates local employment",
        );
        sink.push(
            SPEND_POLICE,
            5.0,
            ConcernDirection::Increase,
            "Police numbers are a local employment issue",
        );
    }
    match demo.age_profile {
        AgeProfile::Elderly => {
            sink.push(
                SPEND_STATE_PENSION,
                8.0,
                ConcernDirection::Increase,
                "The pension lock matters here",
            );
            sink.push(
                SPEND_SOCIAL_CARE,
                7.0,
                ConcernDirection::Increase,
                "Care home places are the top surgery issue",
            );
        }
        AgeProfile::Young => {
            sink.push(
                SPEND_HIGHER_EDUCATION,
                6.0,
                ConcernDirection::Increase,
                "Student funding decides this seat",
            );
            sink.push(
                SPEND_HOUSING_COMMUNITIES,
                6.0,
                ConcernDirection::Increase,
                "First-time buyers are locked out locally",
            );
        }
        AgeProfile::Mixed => {}
    }
    if rep.constituency.region.is_devolved() {
        sink.push(
            SPEND_DEVOLVED_GRANTS,
            7.0,
            ConcernDirection::Increase,
            "The block grant settlement is watched closely",
        );
    }
    if rep.constituency.region.wants_regional_investment() {
        sink.push(
            SPEND_RAIL,
            6.0,
            ConcernDirection::Increase,
            "Rail links decide whether investment arrives",
        );
        sink.push(
            SPEND_HOUSING_COMMUNITIES,
            5.0,
            ConcernDirection::Increase,
            "Regeneration funding is long overdue",
        );
    }
}

fn minister_block(rep: &Representative, sink: &mut ConcernSink) {
    if rep.is_minister {
        sink.push(
            TAX_INCOME_BASIC,
            7.0,
            ConcernDirection::Maintain,
            "Fiscal credibility is the government's shop window",
        );
        sink.push(
            TAX_VAT_STANDARD,
            6.0,
            ConcernDirection::Maintain,
            "Markets punish surprise consumption taxes",
        );
    }
}

fn assemble(rep: &Representative, entries: Vec<Concern>) -> ConcernProfile {
    let mut by_parameter: BTreeMap<String, Concern> = BTreeMap::new();
    for concern in entries {
        match by_parameter.get(&concern.parameter) {
            Some(existing) if existing.priority >= concern.priority => {}
            _ => {
                by_parameter.insert(concern.parameter.clone(), concern);
            }
        }
    }

    let mut concerns: Vec<Concern> = by_parameter.into_values().collect();
    if rep.constituency.is_marginal() {
        for concern in &mut concerns {
            concern.priority =
                (concern.priority * MARGINAL_PRIORITY_MULTIPLIER).min(10.0);
            concern.reason.push_str(MARGINAL_SEAT_CAVEAT);
        }
    }
    // Descending priority, parameter key as the deterministic tie-break.
    concerns.sort_by(|a, b| {
        b.priority
            .total_cmp(&a.priority)
            .then_with(|| a.parameter.cmp(&b.parameter))
    });

    let primary_issues = concerns
        .iter()
        .take(5)
        .map(|concern| concern.parameter.clone())
        .collect();

    ConcernProfile {
        concerns,
        primary_issues,
    }
}
