//! The legislature: representatives, constituencies, and voting history.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::numbers::{clamp_axis, clamp_scale};

/// Stable identity of a representative.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct MpId(pub u32);

impl fmt::Display for MpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "mp-{}", self.0)
    }
}

/// Political groupings in the chamber. `Government` is the governing party;
/// `Abstentionist` never takes its seats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Affiliation {
    #[default]
    Government,
    Opposition,
    LiberalDemocrat,
    ScottishNationals,
    Abstentionist,
    Unionist,
    Green,
    Welsh,
    Independent,
}

impl Affiliation {
    pub const ALL: &'static [Self] = &[
        Self::Government,
        Self::Opposition,
        Self::LiberalDemocrat,
        Self::ScottishNationals,
        Self::Abstentionist,
        Self::Unionist,
        Self::Green,
        Self::Welsh,
        Self::Independent,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::Opposition => "opposition",
            Self::LiberalDemocrat => "liberal_democrat",
            Self::ScottishNationals => "scottish_nationals",
            Self::Abstentionist => "abstentionist",
            Self::Unionist => "unionist",
            Self::Green => "green",
            Self::Welsh => "welsh",
            Self::Independent => "independent",
        }
    }

    /// Whether this grouping's members sit on the government benches.
    #[must_use]
    pub const fn is_governing(self) -> bool {
        matches!(self, Self::Government)
    }

    /// Whether this grouping's members take their seats at all.
    #[must_use]
    pub const fn takes_seats(self) -> bool {
        !matches!(self, Self::Abstentionist)
    }
}

impl fmt::Display for Affiliation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Affiliation {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|affiliation| affiliation.key() == s)
            .ok_or(())
    }
}

/// Intra-party ideological subgroups, meaningful only inside the governing
/// party; an unknown faction on any other affiliation is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Left,
    SoftLeft,
    Centrist,
    PartyRight,
}

impl Faction {
    pub const ALL: &'static [Self] =
        &[Self::Left, Self::SoftLeft, Self::Centrist, Self::PartyRight];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::SoftLeft => "soft_left",
            Self::Centrist => "centrist",
            Self::PartyRight => "party_right",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Faction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|faction| faction.key() == s)
            .ok_or(())
    }
}

/// Position on the three ideological axes the engine scores against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct IdeologicalPosition {
    pub economic_axis: f64,
    pub social_axis: f64,
    pub fiscal_conservatism: f64,
}

impl IdeologicalPosition {
    /// Normalize all axes back into their declared domains.
    pub fn clamp(&mut self) {
        self.economic_axis = clamp_axis(self.economic_axis);
        self.social_axis = clamp_axis(self.social_axis);
        self.fiscal_conservatism = clamp_scale(self.fiscal_conservatism);
    }
}

/// Personality traits on 0-10 scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct MpTraits {
    pub rebelliousness: f64,
    pub ambition: f64,
    pub principled: f64,
    pub careerist: f64,
    pub popularity_focus: f64,
}

impl MpTraits {
    /// Normalize all traits back into `[0, 10]`.
    pub fn clamp(&mut self) {
        self.rebelliousness = clamp_scale(self.rebelliousness);
        self.ambition = clamp_scale(self.ambition);
        self.principled = clamp_scale(self.principled);
        self.careerist = clamp_scale(self.careerist);
        self.popularity_focus = clamp_scale(self.popularity_focus);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    London,
    SouthEast,
    SouthWest,
    #[default]
    Midlands,
    NorthEast,
    NorthWest,
    Yorkshire,
    EastOfEngland,
    Scotland,
    Wales,
    NorthernIreland,
}

impl Region {
    pub const ALL: &'static [Self] = &[
        Self::London,
        Self::SouthEast,
        Self::SouthWest,
        Self::Midlands,
        Self::NorthEast,
        Self::NorthWest,
        Self::Yorkshire,
        Self::EastOfEngland,
        Self::Scotland,
        Self::Wales,
        Self::NorthernIreland,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::London => "london",
            Self::SouthEast => "south_east",
            Self::SouthWest => "south_west",
            Self::Midlands => "midlands",
            Self::NorthEast => "north_east",
            Self::NorthWest => "north_west",
            Self::Yorkshire => "yorkshire",
            Self::EastOfEngland => "east_of_england",
            Self::Scotland => "scotland",
            Self::Wales => "wales",
            Self::NorthernIreland => "northern_ireland",
        }
    }

    /// Devolved nations draw block-grant concerns.
    #[must_use]
    pub const fn is_devolved(self) -> bool {
        matches!(self, Self::Scotland | Self::Wales | Self::NorthernIreland)
    }

    /// Regions with standing regional-investment sensitivity.
    #[must_use]
    pub const fn wants_regional_investment(self) -> bool {
        matches!(
            self,
            Self::NorthEast | Self::NorthWest | Self::Yorkshire | Self::Midlands
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgeProfile {
    Young,
    #[default]
    Mixed,
    Elderly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Demographics {
    pub median_income: f64,
    pub unemployment_rate: f64,
    pub public_sector_dependency: f64,
    pub age_profile: AgeProfile,
}

impl Default for Demographics {
    fn default() -> Self {
        Self {
            median_income: 33_000.0,
            unemployment_rate: 4.0,
            public_sector_dependency: 0.2,
            age_profile: AgeProfile::Mixed,
        }
    }
}

/// The seat a representative holds. Immutable after generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Constituency {
    pub name: String,
    pub region: Region,
    pub marginality: f64,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub previous_margin: f64,
    #[serde(default)]
    pub swing_required: f64,
}

impl Constituency {
    /// Seats above this marginality amplify constituency-driven scoring.
    #[must_use]
    pub fn is_marginal(&self) -> bool {
        self.marginality > crate::constants::MARGINAL_SEAT_THRESHOLD
    }
}

impl Default for Constituency {
    fn default() -> Self {
        Self {
            name: String::from("Placeholder"),
            region: Region::default(),
            marginality: 30.0,
            demographics: Demographics::default(),
            previous_margin: 20.0,
            swing_required: 10.0,
        }
    }
}

/// One member of the simulated legislature.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Representative {
    pub id: MpId,
    pub name: String,
    pub affiliation: Affiliation,
    #[serde(default)]
    pub faction: Option<Faction>,
    pub ideology: IdeologicalPosition,
    pub traits: MpTraits,
    pub constituency: Constituency,
    #[serde(default)]
    pub is_minister: bool,
    #[serde(default)]
    pub committees: Vec<String>,
}

impl Representative {
    /// The faction, only when it is meaningful (governing party).
    #[must_use]
    pub fn effective_faction(&self) -> Option<Faction> {
        if self.affiliation.is_governing() {
            self.faction
        } else {
            None
        }
    }
}

impl Default for Representative {
    fn default() -> Self {
        Self {
            id: MpId(0),
            name: String::from("Placeholder Member"),
            affiliation: Affiliation::Government,
            faction: None,
            ideology: IdeologicalPosition::default(),
            traits: MpTraits::default(),
            constituency: Constituency::default(),
            is_minister: false,
            committees: Vec::new(),
        }
    }
}

/// Canonical ordered view of the chamber.
///
/// Serialization boundaries hand rosters over as native maps, arrays of
/// `[id, representative]` pairs, or bare arrays of representative records;
/// all three normalize here.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Roster(BTreeMap<MpId, Representative>);

#[derive(Deserialize)]
#[serde(untagged)]
enum RosterRepr {
    Map(BTreeMap<MpId, Representative>),
    Pairs(Vec<(MpId, Representative)>),
    Records(Vec<Representative>),
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = RosterRepr::deserialize(deserializer)?;
        Ok(match repr {
            RosterRepr::Map(map) => Self(map),
            RosterRepr::Pairs(pairs) => Self(pairs.into_iter().collect()),
            RosterRepr::Records(records) => Self::from_representatives(records),
        })
    }
}

impl Roster {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    #[must_use]
    pub fn from_representatives(records: Vec<Representative>) -> Self {
        Self(records.into_iter().map(|rep| (rep.id, rep)).collect())
    }

    pub fn insert(&mut self, rep: Representative) {
        self.0.insert(rep.id, rep);
    }

    #[must_use]
    pub fn get(&self, id: MpId) -> Option<&Representative> {
        self.0.get(&id)
    }

    /// Iterate in stable id order.
    pub fn iter(&self) -> impl Iterator<Item = &Representative> {
        self.0.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Governing-party seat count.
    #[must_use]
    pub fn governing_seats(&self) -> usize {
        self.iter()
            .filter(|rep| rep.affiliation.is_governing())
            .count()
    }

    /// Seats whose members routinely vote against government budgets.
    #[must_use]
    pub fn opposition_voting_seats(&self) -> usize {
        self.iter()
            .filter(|rep| !rep.affiliation.is_governing() && rep.affiliation.takes_seats())
            .count()
    }

    /// Seats held by the permanently-abstaining affiliation.
    #[must_use]
    pub fn abstentionist_seats(&self) -> usize {
        self.iter()
            .filter(|rep| !rep.affiliation.takes_seats())
            .count()
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Representative;
    type IntoIter = std::collections::btree_map::Values<'a, MpId, Representative>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.values()
    }
}

/// How a member voted in one division.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BallotChoice {
    Aye,
    Noe,
    Abstain,
}

impl BallotChoice {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Aye => "aye",
            Self::Noe => "noe",
            Self::Abstain => "abstain",
        }
    }
}

impl fmt::Display for BallotChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One entry in a member's division history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BudgetVote {
    pub turn: u32,
    pub choice: BallotChoice,
    pub reasoning: String,
    #[serde(default)]
    pub coerced: bool,
}

/// Append-only division history for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct VotingRecord {
    pub votes: Vec<BudgetVote>,
    pub rebellion_count: u32,
}

impl VotingRecord {
    /// Party loyalty derived from rebellion history, floored at zero.
    #[must_use]
    pub fn loyalty_score(&self) -> u32 {
        100u32.saturating_sub(self.rebellion_count.saturating_mul(2))
    }

    /// Record one ballot; a rebellion bumps the rebellion counter.
    pub fn record(&mut self, vote: BudgetVote, rebellion: bool) {
        self.votes.push(vote);
        if rebellion {
            self.rebellion_count = self.rebellion_count.saturating_add(1);
        }
    }
}
