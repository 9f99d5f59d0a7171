//! Persuasion: individual lobbying approaches and bloc negotiation.
//!
//! Success chances are multiplicative trait adjustments on a per-approach
//! base rate, always clamped to the engine's probability band. The actual
//! roll draws from the injected lobbying stream; flavor text is delegated to
//! the caller's renderer, the core only reports the structured outcome.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MessageRenderer;
use crate::concerns::build_concerns;
use crate::constants::{
    GROUP_COHESION_DIVISOR, GROUP_THRESHOLD_DEFAULT, GROUP_THRESHOLD_NHS, LOBBY_BASE_PERSUADE,
    LOBBY_BASE_PROMISE, LOBBY_BASE_THREATEN, LOBBY_BROKEN_PROMISE_DECAY, LOBBY_MARGINAL_FACTOR,
    LOBBY_PROMISE_PAYLOAD_FACTOR, LOBBY_REBEL_FACTOR, LOBBY_THREATEN_CAREERIST_FACTOR,
    LOBBY_THREATEN_PRINCIPLED_FACTOR, HIGH_TRAIT_THRESHOLD, THREATEN_BACKFIRE_CHANCE,
};
use crate::numbers::clamp_probability;
use crate::promises::{Promise, PromiseCategory, PromiseId};
use crate::roster::{MpId, Representative, Roster};

/// How the whips approach a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobbyApproach {
    Promise,
    Persuade,
    Threaten,
}

impl LobbyApproach {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Promise => "promise",
            Self::Persuade => "persuade",
            Self::Threaten => "threaten",
        }
    }

    const fn base_rate(self) -> f64 {
        match self {
            Self::Promise => LOBBY_BASE_PROMISE,
            Self::Persuade => LOBBY_BASE_PERSUADE,
            Self::Threaten => LOBBY_BASE_THREATEN,
        }
    }
}

impl fmt::Display for LobbyApproach {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Structured result tag handed to the message renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LobbyOutcome {
    Success,
    Failure,
    Backfire,
}

impl LobbyOutcome {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Backfire => "backfire",
        }
    }
}

/// A concrete promise payload accompanying a `Promise` approach.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PromiseDraft {
    pub category: PromiseCategory,
    #[serde(default)]
    pub specific_value: Option<f64>,
}

/// What one lobbying attempt produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyAttempt {
    pub success: bool,
    pub backfired: bool,
    pub probability: f64,
    pub outcome: LobbyOutcome,
    pub message: String,
}

/// Success probability for one approach against one member, before the roll.
///
/// Always lands in `[0.05, 0.95]` whatever the trait combination.
#[must_use]
pub fn success_probability(
    rep: &Representative,
    approach: LobbyApproach,
    has_payload: bool,
    broken_count: u32,
) -> f64 {
    let mut probability = approach.base_rate();
    if rep.traits.rebelliousness > HIGH_TRAIT_THRESHOLD {
        probability *= LOBBY_REBEL_FACTOR;
    }
    if approach == LobbyApproach::Threaten {
        if rep.traits.principled > HIGH_TRAIT_THRESHOLD {
            probability *= LOBBY_THREATEN_PRINCIPLED_FACTOR;
        }
        if rep.traits.careerist > HIGH_TRAIT_THRESHOLD {
            probability *= LOBBY_THREATEN_CAREERIST_FACTOR;
        }
    }
    if approach == LobbyApproach::Promise && has_payload {
        probability *= LOBBY_PROMISE_PAYLOAD_FACTOR;
    }
    probability *= LOBBY_BROKEN_PROMISE_DECAY.powi(i32::try_from(broken_count).unwrap_or(i32::MAX));
    if rep.constituency.is_marginal() {
        probability *= LOBBY_MARGINAL_FACTOR;
    }
    clamp_probability(probability)
}

/// Run one lobbying attempt against one member.
///
/// A failed threat can independently backfire; the renderer turns the
/// structured `(member, approach, outcome)` triple into flavor text.
pub fn attempt_lobbying<R: Rng + ?Sized, M: MessageRenderer + ?Sized>(
    rep: &Representative,
    approach: LobbyApproach,
    payload: Option<&PromiseDraft>,
    broken_count: u32,
    rng: &mut R,
    renderer: &M,
) -> LobbyAttempt {
    let probability = success_probability(rep, approach, payload.is_some(), broken_count);
    let success = rng.gen_bool(probability);
    let backfired =
        !success && approach == LobbyApproach::Threaten && rng.gen_bool(THREATEN_BACKFIRE_CHANCE);
    let outcome = if success {
        LobbyOutcome::Success
    } else if backfired {
        LobbyOutcome::Backfire
    } else {
        LobbyOutcome::Failure
    };
    LobbyAttempt {
        success,
        backfired,
        probability,
        outcome,
        message: renderer.render(rep, approach, outcome),
    }
}

/// Turn a successful `Promise`-approach payload into a pending promise
/// aimed at the lobbied member.
#[must_use]
pub fn seal_promise(draft: &PromiseDraft, target: MpId, turn: u32, id: PromiseId) -> Promise {
    Promise::new(
        id,
        BTreeSet::from([target]),
        draft.category,
        draft.specific_value,
        turn,
    )
}

/// A bloc of governing members negotiating through a spokesperson.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LobbyGroup {
    pub name: String,
    pub member_ids: Vec<MpId>,
    pub spokesperson: MpId,
    /// 0-100; tighter blocs demand more before settling.
    pub cohesion: f64,
}

/// The bloc's structured answer when an offer falls short.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterDemand {
    pub category: PromiseCategory,
    pub minimum_value: f64,
    pub reason: String,
}

/// Result of a group negotiation round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLobbyOutcome {
    pub success: bool,
    pub promise: Option<Promise>,
    pub counter_demand: Option<CounterDemand>,
    pub spokesperson_response: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LobbyError {
    #[error("group or spokesperson not found")]
    GroupOrSpokespersonNotFound,
    #[error("group has no shared concern to negotiate over")]
    NoSharedConcern,
}

/// Negotiate with a bloc: an offer is accepted only when it addresses the
/// group's top shared concern at a cohesion-scaled minimum value.
///
/// Success mints one shared promise across every member; failure returns a
/// counter-demand and touches nothing.
///
/// # Errors
///
/// `GroupOrSpokespersonNotFound` when the group is empty or the spokesperson
/// is not a group member present in the roster; `NoSharedConcern` when no
/// member concern maps to a negotiable category.
pub fn lobby_group(
    group: &LobbyGroup,
    roster: &Roster,
    offered_category: PromiseCategory,
    offered_value: f64,
    turn: u32,
    next_id: PromiseId,
) -> Result<GroupLobbyOutcome, LobbyError> {
    if group.member_ids.is_empty() || !group.member_ids.contains(&group.spokesperson) {
        return Err(LobbyError::GroupOrSpokespersonNotFound);
    }
    let spokesperson = roster
        .get(group.spokesperson)
        .ok_or(LobbyError::GroupOrSpokespersonNotFound)?;

    let (demand_category, demand_weight) = top_shared_demand(group, roster)?;
    let base_threshold = if demand_category.is_nhs_flavoured() {
        GROUP_THRESHOLD_NHS
    } else {
        GROUP_THRESHOLD_DEFAULT
    };
    let threshold = base_threshold * (1.0 + group.cohesion / GROUP_COHESION_DIVISOR);

    let satisfied = offered_category == demand_category && offered_value >= threshold;
    if satisfied {
        let targets = group.member_ids.iter().copied().collect();
        let promise = Promise::new(
            next_id,
            targets,
            offered_category,
            Some(offered_value),
            turn,
        );
        let response = format!(
            "{} accepts on behalf of {} members: {} it is, then.",
            spokesperson.name,
            group.member_ids.len(),
            offered_category.key(),
        );
        Ok(GroupLobbyOutcome {
            success: true,
            promise: Some(promise),
            counter_demand: None,
            spokesperson_response: response,
        })
    } else {
        let reason = if offered_category == demand_category {
            format!(
                "The offer falls short: the group wants at least {threshold:.1} on {}.",
                demand_category.key(),
            )
        } else {
            format!(
                "Wrong ask: the group's priority is {} (weight {demand_weight:.1}), not {}.",
                demand_category.key(),
                offered_category.key(),
            )
        };
        let response = format!("{} shakes their head. {reason}", spokesperson.name);
        Ok(GroupLobbyOutcome {
            success: false,
            promise: None,
            counter_demand: Some(CounterDemand {
                category: demand_category,
                minimum_value: threshold,
                reason,
            }),
            spokesperson_response: response,
        })
    }
}

/// The concern category the bloc cares most about, weighted across members.
///
/// A concern counts as shared when more than one member carries it; a
/// single-member group falls back to its own strongest concern.
fn top_shared_demand(
    group: &LobbyGroup,
    roster: &Roster,
) -> Result<(PromiseCategory, f64), LobbyError> {
    let mut totals: BTreeMap<&'static str, (PromiseCategory, f64, usize)> = BTreeMap::new();
    for member_id in &group.member_ids {
        let Some(member) = roster.get(*member_id) else {
            continue;
        };
        let profile = build_concerns(member);
        for concern in &profile.concerns {
            let Some(category) = PromiseCategory::for_parameter(&concern.parameter) else {
                continue;
            };
            let entry = totals.entry(category.key()).or_insert((category, 0.0, 0));
            entry.1 += concern.priority;
            entry.2 += 1;
        }
    }

    let shared_minimum = if group.member_ids.len() > 1 { 2 } else { 1 };
    totals
        .values()
        .filter(|(_, _, holders)| *holders >= shared_minimum)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .or_else(|| totals.values().max_by(|a, b| a.1.total_cmp(&b.1)))
        .map(|(category, weight, _)| (*category, *weight))
        .ok_or(LobbyError::NoSharedConcern)
}
