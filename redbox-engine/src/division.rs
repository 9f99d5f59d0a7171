//! Simulating a division: individual ballots, the aggregate result, and the
//! narrative the whips read afterwards.
//!
//! Ballot sampling draws from an injected RNG so callers choose between
//! reproducible what-if runs and live play. Narrative lead sentences are
//! selected by a stable hash of the outcome numbers, which keeps repeated
//! similar outcomes from sounding identical without consuming RNG state.

use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::constants::{
    DEBUG_ENV_VAR, HIGH_ABSTENTION_FLAG, OPPOSE_NOE_BACKBENCH_BASE, OPPOSE_NOE_CAP,
    OPPOSE_NOE_MINISTER_BASE, OPPOSE_NOE_PRINCIPLED_STEP, OPPOSE_NOE_REBELLIOUSNESS_STEP,
    OPPOSE_THRESHOLD, SIGNIFICANT_CUT_DELTA, SUPPORT_AYE_BACKBENCH_BASE, SUPPORT_AYE_MINISTER,
    SUPPORT_AYE_REBELLIOUSNESS_STEP, SUPPORT_DEAL_NOE_SHARE, SUPPORT_THRESHOLD,
    SWING_CALLOUT_LIMIT, UNDECIDED_ABSTAIN_BASE, UNDECIDED_AYE_BASE,
    UNDECIDED_AYE_MINISTER_BONUS, UNDECIDED_AYE_REBELLIOUSNESS_STEP, WEAK_WHIP_THRESHOLD,
    WEAK_WHIP_WOBBLE_STEP, WHIP_BAND_GRUMBLING, WHIP_BAND_RESTIVE, WHIP_BAND_REVOLT,
    WHIP_BAND_SOLID, WHIP_PROMOTION_SCALE,
};
use crate::params::BudgetProposal;
use crate::rng::{RngBundle, stable_hash64};
use crate::roster::{BallotChoice, BudgetVote, MpId, Representative, Roster, VotingRecord};
use crate::stance::{Stance, StanceContext, StanceLabel, classify_all};

#[cfg(debug_assertions)]
fn debug_log_enabled() -> bool {
    matches!(std::env::var(DEBUG_ENV_VAR), Ok(val) if val != "0")
}

#[cfg(not(debug_assertions))]
const fn debug_log_enabled() -> bool {
    false
}

/// Aggregate outcome of one simulated division.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DivisionResult {
    pub ayes: usize,
    pub noes: usize,
    pub abstentions: usize,
    pub majority: i64,
    pub passed: bool,
    pub rebel_count: usize,
    pub narrative: String,
    pub whip_assessment: String,
    pub ballots: BTreeMap<MpId, BallotChoice>,
    /// Members whose aye was extracted by whip pressure rather than belief.
    #[serde(default)]
    pub coerced: BTreeSet<MpId>,
}

struct BallotDecision {
    choice: BallotChoice,
    coerced: bool,
}

/// Sample one member's ballot from their stance label.
fn ballot_for<R: Rng + ?Sized>(
    rep: &Representative,
    stance: &Stance,
    whip_strength: f64,
    rng: &mut R,
) -> BallotDecision {
    if !rep.affiliation.takes_seats() {
        return BallotDecision {
            choice: BallotChoice::Abstain,
            coerced: false,
        };
    }
    if !rep.affiliation.is_governing() {
        return BallotDecision {
            choice: BallotChoice::Noe,
            coerced: false,
        };
    }

    match stance.label {
        StanceLabel::Support => support_ballot(rep, stance, whip_strength, rng),
        StanceLabel::Oppose => oppose_ballot(rep, rng),
        StanceLabel::Undecided => undecided_ballot(rep, whip_strength, rng),
    }
}

fn support_ballot<R: Rng + ?Sized>(
    rep: &Representative,
    stance: &Stance,
    whip_strength: f64,
    rng: &mut R,
) -> BallotDecision {
    let mut aye_chance = if rep.is_minister {
        SUPPORT_AYE_MINISTER
    } else {
        SUPPORT_AYE_BACKBENCH_BASE - rep.traits.rebelliousness * SUPPORT_AYE_REBELLIOUSNESS_STEP
    };
    // A weak whip lets nominal supporters wobble toward abstention.
    if whip_strength < WEAK_WHIP_THRESHOLD {
        aye_chance -= (WEAK_WHIP_THRESHOLD - whip_strength) * WEAK_WHIP_WOBBLE_STEP;
    }
    if rng.gen_bool(aye_chance.clamp(0.0, 1.0)) {
        return BallotDecision {
            choice: BallotChoice::Aye,
            coerced: false,
        };
    }
    // An active, uncompromised deal turns a wobble into near-rebellion
    // rather than a tactical abstention.
    let active_deal =
        stance.breakdown.open_promises > 0 && stance.breakdown.broken_promises == 0;
    let choice = if active_deal && rng.gen_bool(SUPPORT_DEAL_NOE_SHARE) {
        BallotChoice::Noe
    } else {
        BallotChoice::Abstain
    };
    BallotDecision {
        choice,
        coerced: false,
    }
}

fn oppose_ballot<R: Rng + ?Sized>(rep: &Representative, rng: &mut R) -> BallotDecision {
    let base = if rep.is_minister {
        OPPOSE_NOE_MINISTER_BASE
    } else {
        OPPOSE_NOE_BACKBENCH_BASE
    };
    let mut noe_chance = base + rep.traits.principled * OPPOSE_NOE_PRINCIPLED_STEP;
    if !rep.is_minister {
        noe_chance += rep.traits.rebelliousness * OPPOSE_NOE_REBELLIOUSNESS_STEP;
    }
    let choice = if rng.gen_bool(noe_chance.min(OPPOSE_NOE_CAP).clamp(0.0, 1.0)) {
        BallotChoice::Noe
    } else {
        BallotChoice::Abstain
    };
    BallotDecision {
        choice,
        coerced: false,
    }
}

fn undecided_ballot<R: Rng + ?Sized>(
    rep: &Representative,
    whip_strength: f64,
    rng: &mut R,
) -> BallotDecision {
    let mut aye_band = UNDECIDED_AYE_BASE
        - rep.traits.rebelliousness * UNDECIDED_AYE_REBELLIOUSNESS_STEP;
    if rep.is_minister {
        aye_band += UNDECIDED_AYE_MINISTER_BONUS;
    }
    let natural_aye = aye_band.clamp(0.05, 0.9);
    // Whip pressure only ever promotes the undecided toward the lobby.
    let promoted_aye =
        (natural_aye + (whip_strength / 100.0) * WHIP_PROMOTION_SCALE).clamp(0.05, 0.9);
    let abstain_band = UNDECIDED_ABSTAIN_BASE.min(1.0 - promoted_aye);

    let roll: f64 = rng.r#gen();
    if roll < promoted_aye {
        BallotDecision {
            choice: BallotChoice::Aye,
            coerced: roll >= natural_aye,
        }
    } else if roll < promoted_aye + abstain_band {
        BallotDecision {
            choice: BallotChoice::Abstain,
            coerced: false,
        }
    } else {
        BallotDecision {
            choice: BallotChoice::Noe,
            coerced: false,
        }
    }
}

/// Simulate the division and assemble the aggregate result.
///
/// Every member of the roster casts exactly one ballot; a member missing
/// from the stance map is treated as undecided.
#[must_use]
pub fn simulate_vote<R: Rng + ?Sized>(
    roster: &Roster,
    stances: &BTreeMap<MpId, Stance>,
    budget: &BudgetProposal,
    whip_strength: f64,
    rng: &mut R,
) -> DivisionResult {
    let fallback = Stance {
        score: 50.0,
        label: StanceLabel::Undecided,
        breakdown: crate::stance::StanceBreakdown::default(),
        reason: String::from("no recorded stance"),
        manual_override: None,
    };

    let mut ballots = BTreeMap::new();
    let mut coerced = BTreeSet::new();
    let (mut ayes, mut noes, mut abstentions) = (0usize, 0usize, 0usize);

    for rep in roster {
        let stance = stances.get(&rep.id).unwrap_or(&fallback);
        let decision = ballot_for(rep, stance, whip_strength, rng);
        match decision.choice {
            BallotChoice::Aye => ayes += 1,
            BallotChoice::Noe => noes += 1,
            BallotChoice::Abstain => abstentions += 1,
        }
        if decision.coerced {
            coerced.insert(rep.id);
        }
        ballots.insert(rep.id, decision.choice);
    }

    let majority = i64::try_from(ayes).unwrap_or(i64::MAX) - i64::try_from(noes).unwrap_or(0);
    let passed = majority > 0;
    let rebel_count = (noes + abstentions)
        .saturating_sub(roster.opposition_voting_seats() + roster.abstentionist_seats());

    if debug_log_enabled() {
        println!(
            "division: {ayes} aye / {noes} noe / {abstentions} abstain, whip {whip_strength:.0}, rebels ~{rebel_count}"
        );
    }

    let narrative = build_narrative(
        ayes,
        noes,
        abstentions,
        passed,
        majority,
        budget,
        roster,
        stances,
    );
    let whip_assessment = whip_assessment_for(rebel_count).to_string();

    DivisionResult {
        ayes,
        noes,
        abstentions,
        majority,
        passed,
        rebel_count,
        narrative,
        whip_assessment,
        ballots,
        coerced,
    }
}

const COMFORTABLE_LEADS: [&str; 3] = [
    "The budget sails through with room to spare.",
    "A comfortable night for the Treasury bench.",
    "The government walks the budget home.",
];
const NARROW_LEADS: [&str; 3] = [
    "The budget scrapes through after a tense count.",
    "Tellers exchange glances; the government survives by a whisker.",
    "A knife-edge division falls the Chancellor's way.",
];
const NARROW_DEFEAT_LEADS: [&str; 3] = [
    "The budget falls by a handful of votes.",
    "A near-run thing, but the noes have it.",
    "The government comes up just short in the lobbies.",
];
const HEAVY_DEFEAT_LEADS: [&str; 3] = [
    "The budget is crushed in the division lobbies.",
    "A rout: the noes pile up well beyond the government's worst fears.",
    "The Chancellor's budget is dead on arrival.",
];

#[allow(clippy::too_many_arguments)]
fn build_narrative(
    ayes: usize,
    noes: usize,
    abstentions: usize,
    passed: bool,
    majority: i64,
    budget: &BudgetProposal,
    roster: &Roster,
    stances: &BTreeMap<MpId, Stance>,
) -> String {
    let leads: &[&str; 3] = if passed && majority >= 60 {
        &COMFORTABLE_LEADS
    } else if passed {
        &NARROW_LEADS
    } else if majority > -30 {
        &NARROW_DEFEAT_LEADS
    } else {
        &HEAVY_DEFEAT_LEADS
    };
    let pick = stable_hash64(
        b"division-narrative",
        &[ayes as u64, noes as u64, abstentions as u64],
    ) as usize
        % leads.len();

    let mut narrative = format!(
        "{} The division: {ayes} ayes, {noes} noes, {abstentions} abstentions.",
        leads[pick]
    );

    let mut pressure: SmallVec<[&'static str; 4]> = SmallVec::new();
    if !budget.manifesto_violations.is_empty() {
        pressure.push("manifesto promises are visibly strained");
    }
    if budget.taxes.iter().filter(|(_, delta)| *delta > 0.0).count() >= 2 {
        pressure.push("several tax rises land at once");
    }
    if budget
        .spending
        .iter()
        .filter(|(_, delta)| *delta <= SIGNIFICANT_CUT_DELTA)
        .count()
        >= 2
    {
        pressure.push("deep cuts bite across departments");
    }
    if abstentions > HIGH_ABSTENTION_FLAG {
        pressure.push("the abstention column is unusually long");
    }
    if !pressure.is_empty() {
        narrative.push_str(" Pressure points: ");
        narrative.push_str(&pressure.join("; "));
        narrative.push('.');
    }

    let swing_names = swing_members(roster, stances);
    if !swing_names.is_empty() {
        narrative.push_str(" Eyes turn to ");
        narrative.push_str(&swing_names.join(", "));
        narrative.push_str(", whose votes were never certain.");
    }

    narrative
}

/// Governing members whose scores sat closest to the support/oppose
/// boundaries; the names the whips watched all evening.
fn swing_members(roster: &Roster, stances: &BTreeMap<MpId, Stance>) -> Vec<String> {
    let mut candidates: Vec<(f64, &str)> = roster
        .iter()
        .filter(|rep| rep.affiliation.is_governing())
        .filter_map(|rep| {
            let stance = stances.get(&rep.id)?;
            let distance = (stance.score - SUPPORT_THRESHOLD)
                .abs()
                .min((stance.score - OPPOSE_THRESHOLD).abs());
            Some((distance, rep.name.as_str()))
        })
        .collect();
    candidates.sort_by(|a, b| a.0.total_cmp(&b.0));
    candidates
        .into_iter()
        .take(SWING_CALLOUT_LIMIT)
        .map(|(_, name)| name.to_string())
        .collect()
}

/// Categorical read of the rebellion for the whips office.
#[must_use]
pub const fn whip_assessment_for(rebel_count: usize) -> &'static str {
    if rebel_count <= WHIP_BAND_SOLID {
        "Iron discipline: the whips delivered every vote."
    } else if rebel_count <= WHIP_BAND_GRUMBLING {
        "A handful of malcontents; nothing the whips cannot manage."
    } else if rebel_count <= WHIP_BAND_RESTIVE {
        "A restive backbench; the whips office wants names."
    } else if rebel_count <= WHIP_BAND_REVOLT {
        "Open revolt is brewing on the government benches."
    } else {
        "The whips have lost the parliamentary party."
    }
}

/// Append the division to each member's history. Only a governing `Noe`
/// counts as rebellion.
pub fn record_division(
    records: &mut BTreeMap<MpId, VotingRecord>,
    roster: &Roster,
    result: &DivisionResult,
    stances: &BTreeMap<MpId, Stance>,
    turn: u32,
) {
    for rep in roster {
        let Some(choice) = result.ballots.get(&rep.id).copied() else {
            continue;
        };
        let reasoning = stances
            .get(&rep.id)
            .map_or_else(String::new, |stance| stance.reason.clone());
        let rebellion = rep.affiliation.is_governing() && choice == BallotChoice::Noe;
        records.entry(rep.id).or_default().record(
            BudgetVote {
                turn,
                choice,
                reasoning,
                coerced: result.coerced.contains(&rep.id),
            },
            rebellion,
        );
    }
}

/// Owns the per-session RNG bundle and drives classify-then-divide turns.
#[derive(Debug)]
pub struct DivisionController {
    rng: Rc<RngBundle>,
}

impl DivisionController {
    /// Reproducible controller for what-if forecasting.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: Rc::new(RngBundle::from_user_seed(seed)),
        }
    }

    /// Live controller for interactive play.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: Rc::new(RngBundle::from_entropy()),
        }
    }

    /// Deterministically reseed controller-owned RNG streams.
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Rc::new(RngBundle::from_user_seed(seed));
    }

    /// Expose the shared RNG bundle for session wiring.
    #[must_use]
    pub fn rng_bundle(&self) -> Rc<RngBundle> {
        self.rng.clone()
    }

    /// Classify the roster, then run the division in one pass.
    #[must_use]
    pub fn run_division(
        &self,
        roster: &Roster,
        budget: &BudgetProposal,
        promises: &[crate::promises::Promise],
        turn: u32,
        ctx: &StanceContext,
    ) -> (BTreeMap<MpId, Stance>, DivisionResult) {
        let stances = classify_all(roster, budget, promises, turn, ctx, None);
        let whip = ctx.whip_strength.unwrap_or(50.0);
        let result = {
            let mut ballot_rng = self.rng.ballot();
            simulate_vote(roster, &stances, budget, whip, &mut *ballot_rng)
        };
        (stances, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::{Affiliation, MpTraits};
    use crate::stance::StanceBreakdown;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn rep(id: u32, affiliation: Affiliation) -> Representative {
        Representative {
            id: MpId(id),
            name: format!("Member {id}"),
            affiliation,
            ..Representative::default()
        }
    }

    fn stance_with(label: StanceLabel, score: f64) -> Stance {
        Stance {
            score,
            label,
            breakdown: StanceBreakdown::default(),
            reason: String::from("test stance"),
            manual_override: None,
        }
    }

    fn mixed_roster() -> Roster {
        let mut roster = Roster::new();
        for id in 1..=300u32 {
            roster.insert(rep(id, Affiliation::Government));
        }
        for id in 301..=500u32 {
            roster.insert(rep(id, Affiliation::Opposition));
        }
        for id in 501..=507u32 {
            roster.insert(rep(id, Affiliation::Abstentionist));
        }
        roster
    }

    fn uniform_stances(roster: &Roster, label: StanceLabel, score: f64) -> BTreeMap<MpId, Stance> {
        roster
            .iter()
            .map(|rep| (rep.id, stance_with(label, score)))
            .collect()
    }

    #[test]
    fn ballots_always_sum_to_roster_size() {
        let roster = mixed_roster();
        let stances = uniform_stances(&roster, StanceLabel::Support, 80.0);
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let result = simulate_vote(&roster, &stances, &BudgetProposal::default(), 60.0, &mut rng);
        assert_eq!(result.ayes + result.noes + result.abstentions, roster.len());
        assert_eq!(
            result.majority,
            i64::try_from(result.ayes).unwrap() - i64::try_from(result.noes).unwrap()
        );
        assert_eq!(result.passed, result.majority > 0);
        assert_eq!(result.ballots.len(), roster.len());
    }

    #[test]
    fn abstentionists_abstain_and_opposition_votes_noe() {
        let roster = mixed_roster();
        let stances = uniform_stances(&roster, StanceLabel::Support, 80.0);
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let result = simulate_vote(&roster, &stances, &BudgetProposal::default(), 90.0, &mut rng);
        for id in 301..=500u32 {
            assert_eq!(result.ballots[&MpId(id)], BallotChoice::Noe);
        }
        for id in 501..=507u32 {
            assert_eq!(result.ballots[&MpId(id)], BallotChoice::Abstain);
        }
    }

    #[test]
    fn rebel_count_subtracts_non_governing_benches() {
        let roster = mixed_roster();
        let stances = uniform_stances(&roster, StanceLabel::Support, 80.0);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let result = simulate_vote(&roster, &stances, &BudgetProposal::default(), 90.0, &mut rng);
        // Opposition noes and abstentionist abstentions are not rebels.
        let governing_defectors = roster
            .iter()
            .filter(|rep| rep.affiliation.is_governing())
            .filter(|rep| result.ballots[&rep.id] != BallotChoice::Aye)
            .count();
        assert_eq!(result.rebel_count, governing_defectors);
    }

    #[test]
    fn ministers_on_side_virtually_never_defect() {
        let mut roster = Roster::new();
        for id in 1..=200u32 {
            let mut minister = rep(id, Affiliation::Government);
            minister.is_minister = true;
            roster.insert(minister);
        }
        let stances = uniform_stances(&roster, StanceLabel::Support, 80.0);
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let result = simulate_vote(&roster, &stances, &BudgetProposal::default(), 80.0, &mut rng);
        assert!(result.ayes >= 195, "ministers defected: {} ayes", result.ayes);
    }

    #[test]
    fn strong_whip_promotes_the_undecided() {
        let mut roster = Roster::new();
        for id in 1..=400u32 {
            roster.insert(rep(id, Affiliation::Government));
        }
        let stances = uniform_stances(&roster, StanceLabel::Undecided, 50.0);

        let mut weak_rng = ChaCha20Rng::seed_from_u64(5);
        let weak = simulate_vote(
            &roster,
            &stances,
            &BudgetProposal::default(),
            0.0,
            &mut weak_rng,
        );
        let mut strong_rng = ChaCha20Rng::seed_from_u64(5);
        let strong = simulate_vote(
            &roster,
            &stances,
            &BudgetProposal::default(),
            100.0,
            &mut strong_rng,
        );
        assert!(
            strong.ayes > weak.ayes + 20,
            "whip had no pull: weak {} vs strong {}",
            weak.ayes,
            strong.ayes
        );
        assert!(!strong.coerced.is_empty());
    }

    #[test]
    fn weak_whip_wobbles_nominal_supporters() {
        let mut roster = Roster::new();
        for id in 1..=400u32 {
            let mut backbencher = rep(id, Affiliation::Government);
            backbencher.traits = MpTraits {
                rebelliousness: 5.0,
                ..MpTraits::default()
            };
            roster.insert(backbencher);
        }
        let stances = uniform_stances(&roster, StanceLabel::Support, 70.0);

        let mut weak_rng = ChaCha20Rng::seed_from_u64(6);
        let weak = simulate_vote(
            &roster,
            &stances,
            &BudgetProposal::default(),
            0.0,
            &mut weak_rng,
        );
        let mut firm_rng = ChaCha20Rng::seed_from_u64(6);
        let firm = simulate_vote(
            &roster,
            &stances,
            &BudgetProposal::default(),
            80.0,
            &mut firm_rng,
        );
        assert!(
            weak.abstentions > firm.abstentions,
            "no wobble: weak {} vs firm {}",
            weak.abstentions,
            firm.abstentions
        );
    }

    #[test]
    fn whip_assessment_bands_cover_severity() {
        assert!(whip_assessment_for(0).contains("Iron discipline"));
        assert!(whip_assessment_for(4).contains("malcontents"));
        assert!(whip_assessment_for(12).contains("restive"));
        assert!(whip_assessment_for(25).contains("revolt"));
        assert!(whip_assessment_for(80).contains("lost the parliamentary party"));
    }

    #[test]
    fn narrative_flags_pressure_points() {
        let roster = mixed_roster();
        let stances = uniform_stances(&roster, StanceLabel::Oppose, 30.0);
        let mut budget = BudgetProposal::default();
        budget
            .manifesto_violations
            .push(String::from("raised income tax"));
        budget.taxes.set(crate::params::TAX_INCOME_BASIC, 2.0);
        budget.taxes.set(crate::params::TAX_VAT_STANDARD, 3.0);
        budget.spending.set(crate::params::SPEND_JUSTICE, -4.0);
        budget.spending.set(crate::params::SPEND_CULTURE, -3.0);

        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let result = simulate_vote(&roster, &stances, &budget, 50.0, &mut rng);
        assert!(result.narrative.contains("Pressure points"));
        assert!(result.narrative.contains("manifesto"));
        assert!(result.narrative.contains("tax rises"));
        assert!(result.narrative.contains("cuts"));
        assert!(result.narrative.contains("Eyes turn to"));
    }

    #[test]
    fn record_division_counts_only_governing_noes_as_rebellion() {
        let mut roster = Roster::new();
        roster.insert(rep(1, Affiliation::Government));
        roster.insert(rep(2, Affiliation::Opposition));
        let stances = uniform_stances(&roster, StanceLabel::Oppose, 30.0);

        let result = DivisionResult {
            ayes: 0,
            noes: 2,
            abstentions: 0,
            majority: -2,
            passed: false,
            rebel_count: 1,
            narrative: String::new(),
            whip_assessment: String::new(),
            ballots: BTreeMap::from([(MpId(1), BallotChoice::Noe), (MpId(2), BallotChoice::Noe)]),
            coerced: BTreeSet::new(),
        };

        let mut records = BTreeMap::new();
        record_division(&mut records, &roster, &result, &stances, 3);
        assert_eq!(records[&MpId(1)].rebellion_count, 1);
        assert_eq!(records[&MpId(2)].rebellion_count, 0);
        assert_eq!(records[&MpId(1)].votes.len(), 1);
        assert_eq!(records[&MpId(1)].votes[0].turn, 3);
    }

    #[test]
    fn controller_is_reproducible_per_seed() {
        let roster = mixed_roster();
        let budget = BudgetProposal::default();
        let ctx = StanceContext {
            whip_strength: Some(65.0),
            ..StanceContext::default()
        };

        let first = DivisionController::from_seed(0xC0FFEE);
        let second = DivisionController::from_seed(0xC0FFEE);
        let (stances_a, result_a) = first.run_division(&roster, &budget, &[], 1, &ctx);
        let (stances_b, result_b) = second.run_division(&roster, &budget, &[], 1, &ctx);
        assert_eq!(stances_a, stances_b);
        assert_eq!(result_a.ballots, result_b.ballots);
        assert_eq!(result_a.narrative, result_b.narrative);
    }
}
