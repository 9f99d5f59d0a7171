//! Redbox Engine
//!
//! Platform-agnostic core logic for the Redbox parliamentary budget
//! simulation. This crate models the legislature itself: who the members
//! are, what they care about, how they read a proposed budget, what the
//! whips can extract from them, and how a division resolves. Rendering,
//! persistence, and the fiscal arithmetic that produces budget deltas all
//! live with external collaborators.

pub mod concerns;
pub mod constants;
pub mod division;
pub mod evaluator;
pub mod lobbying;
pub mod numbers;
pub mod params;
pub mod profile;
pub mod promises;
pub mod rng;
pub mod roster;
pub mod stance;

// Re-export commonly used types
pub use concerns::{Concern, ConcernDirection, ConcernProfile, build_concerns};
pub use division::{
    DivisionController, DivisionResult, record_division, simulate_vote, whip_assessment_for,
};
pub use evaluator::{
    BudgetAssessment, ImpliedIdeology, assess, constituency_impact, granular_impact,
    ideological_alignment, implied_ideology, plausibility_penalty,
};
pub use lobbying::{
    CounterDemand, GroupLobbyOutcome, LobbyApproach, LobbyAttempt, LobbyError, LobbyGroup,
    LobbyOutcome, PromiseDraft, attempt_lobbying, lobby_group, seal_promise, success_probability,
};
pub use params::{BudgetProposal, DeltaTable, TaxDistribution};
pub use profile::{
    ProfileTable, ProfileTableError, SampleRange, generate_constituency, generate_profile,
    mint_representative, profile_catalog,
};
pub use promises::{
    Promise, PromiseCategory, PromiseId, PromiseOutcome, Responsibility, broken_count_for,
    criterion_met, open_promises_for, reconcile_promises,
};
pub use rng::{CountingRng, RngBundle, stable_fraction, stable_hash64};
pub use roster::{
    Affiliation, AgeProfile, BallotChoice, BudgetVote, Constituency, Demographics, Faction,
    IdeologicalPosition, MpId, MpTraits, Region, Representative, Roster, VotingRecord,
};
pub use stance::{
    ManualOverride, Stance, StanceBreakdown, StanceContext, StanceLabel, StanceMap, classify,
    classify_all,
};

/// Trait for the flavor-text collaborator.
///
/// The engine reports lobbying outcomes as structured data; turning them
/// into prose keyed on the member, approach, and outcome is presentation
/// work that belongs outside this crate.
pub trait MessageRenderer {
    fn render(
        &self,
        rep: &roster::Representative,
        approach: lobbying::LobbyApproach,
        outcome: lobbying::LobbyOutcome,
    ) -> String;
}

/// Minimal renderer emitting stable message keys, suitable for tests and
/// for hosts that do their own lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyedMessages;

impl MessageRenderer for KeyedMessages {
    fn render(
        &self,
        _rep: &roster::Representative,
        approach: lobbying::LobbyApproach,
        outcome: lobbying::LobbyOutcome,
    ) -> String {
        format!("lobby.{}.{}", approach.key(), outcome.key())
    }
}

/// Long-lived chamber state the persistence collaborator owns.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize, Default)]
pub struct ChamberState {
    pub roster: roster::Roster,
    #[serde(default)]
    pub promises: Vec<promises::Promise>,
    #[serde(default)]
    pub voting_records: std::collections::BTreeMap<roster::MpId, roster::VotingRecord>,
}

/// Trait for abstracting save/load operations.
/// Platform-specific implementations should provide this.
pub trait ChamberStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save chamber state.
    ///
    /// # Errors
    ///
    /// Returns an error if the chamber state cannot be saved.
    fn save_chamber(&self, save_name: &str, state: &ChamberState) -> Result<(), Self::Error>;

    /// Load chamber state.
    ///
    /// # Errors
    ///
    /// Returns an error if the chamber state cannot be loaded.
    fn load_chamber(&self, save_name: &str) -> Result<Option<ChamberState>, Self::Error>;
}

/// Convenience wrapper erasing a storage backend's error type at the
/// collaborator seam.
pub struct StoredChamber<S> {
    storage: S,
}

impl<S> StoredChamber<S>
where
    S: ChamberStorage,
    S::Error: Into<anyhow::Error>,
{
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Save through the backend, erasing its error type.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports, erased to `anyhow::Error`.
    pub fn save(&self, save_name: &str, state: &ChamberState) -> Result<(), anyhow::Error> {
        self.storage.save_chamber(save_name, state).map_err(Into::into)
    }

    /// Load through the backend, erasing its error type.
    ///
    /// # Errors
    ///
    /// Returns whatever the backend reports, erased to `anyhow::Error`.
    pub fn load(&self, save_name: &str) -> Result<Option<ChamberState>, anyhow::Error> {
        self.storage.load_chamber(save_name).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyed_messages_are_stable() {
        let renderer = KeyedMessages;
        let rep = roster::Representative::default();
        assert_eq!(
            renderer.render(&rep, lobbying::LobbyApproach::Promise, lobbying::LobbyOutcome::Success),
            "lobby.promise.success"
        );
        assert_eq!(
            renderer.render(
                &rep,
                lobbying::LobbyApproach::Threaten,
                lobbying::LobbyOutcome::Backfire
            ),
            "lobby.threaten.backfire"
        );
    }

    #[test]
    fn chamber_state_round_trips_through_json() {
        let mut state = ChamberState::default();
        state.roster.insert(roster::Representative::default());
        state.promises.push(promises::Promise::new(
            promises::PromiseId(1),
            std::collections::BTreeSet::from([roster::MpId(0)]),
            promises::PromiseCategory::NhsSpending,
            Some(4.0),
            1,
        ));
        let json = serde_json::to_string(&state).unwrap();
        let restored: ChamberState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }
}
