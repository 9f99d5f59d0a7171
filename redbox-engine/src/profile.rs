//! Data-driven generation of ideological profiles and traits.
//!
//! Sampling ranges live in a declarative table (`assets/profiles.json`)
//! rather than in code, so group character can be tuned without touching the
//! generator. Sampling is uniform within each documented range; the caller
//! supplies the RNG.

use std::collections::HashMap;
use std::sync::OnceLock;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roster::{
    Affiliation, AgeProfile, Constituency, Demographics, Faction, IdeologicalPosition, MpId,
    MpTraits, Region, Representative,
};

/// Inclusive uniform sampling interval, serialized as `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SampleRange(pub f64, pub f64);

impl SampleRange {
    #[must_use]
    pub const fn min(self) -> f64 {
        self.0
    }

    #[must_use]
    pub const fn max(self) -> f64 {
        self.1
    }

    fn sample<R: Rng + ?Sized>(self, rng: &mut R) -> f64 {
        if (self.1 - self.0).abs() < f64::EPSILON {
            self.0
        } else {
            rng.gen_range(self.0..=self.1)
        }
    }

    fn validate(self, field: &'static str) -> Result<(), ProfileTableError> {
        if self.0 > self.1 || !self.0.is_finite() || !self.1.is_finite() {
            return Err(ProfileTableError::InvertedRange {
                field,
                min: self.0,
                max: self.1,
            });
        }
        Ok(())
    }
}

/// Trait sampling ranges for one affiliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraitRanges {
    pub rebelliousness: SampleRange,
    pub ambition: SampleRange,
    pub principled: SampleRange,
    pub careerist: SampleRange,
    pub popularity_focus: SampleRange,
}

/// Base sampling ranges for one affiliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRanges {
    pub economic: SampleRange,
    pub social: SampleRange,
    pub fiscal: SampleRange,
    pub traits: TraitRanges,
}

/// Faction overrides layered on the governing party's base ranges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactionRanges {
    #[serde(default)]
    pub economic: Option<SampleRange>,
    #[serde(default)]
    pub social: Option<SampleRange>,
    #[serde(default)]
    pub fiscal: Option<SampleRange>,
    #[serde(default)]
    pub rebelliousness_bonus: f64,
    #[serde(default)]
    pub principled_bonus: f64,
}

/// Adjustments applied to members on the government payroll.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinisterAdjustments {
    pub rebelliousness_factor: f64,
    pub ambition_bonus: f64,
}

/// The full declarative sampling table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileTable {
    pub affiliations: HashMap<Affiliation, GroupRanges>,
    pub factions: HashMap<Faction, FactionRanges>,
    pub minister: MinisterAdjustments,
}

#[derive(Debug, Error, PartialEq)]
pub enum ProfileTableError {
    #[error("{field} range inverted or non-finite (min {min:.2}, max {max:.2})")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    #[error("missing sampling ranges for affiliation {0}")]
    MissingAffiliation(Affiliation),
    #[error("missing override ranges for faction {0}")]
    MissingFaction(Faction),
}

impl ProfileTable {
    /// Check the table covers every group with well-formed ranges.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first missing group or inverted range.
    pub fn validate(&self) -> Result<(), ProfileTableError> {
        for affiliation in Affiliation::ALL {
            let ranges = self
                .affiliations
                .get(affiliation)
                .ok_or(ProfileTableError::MissingAffiliation(*affiliation))?;
            ranges.economic.validate("economic")?;
            ranges.social.validate("social")?;
            ranges.fiscal.validate("fiscal")?;
            ranges.traits.rebelliousness.validate("rebelliousness")?;
            ranges.traits.ambition.validate("ambition")?;
            ranges.traits.principled.validate("principled")?;
            ranges.traits.careerist.validate("careerist")?;
            ranges.traits.popularity_focus.validate("popularity_focus")?;
        }
        for faction in Faction::ALL {
            let ranges = self
                .factions
                .get(faction)
                .ok_or(ProfileTableError::MissingFaction(*faction))?;
            for (field, range) in [
                ("faction economic", ranges.economic),
                ("faction social", ranges.social),
                ("faction fiscal", ranges.fiscal),
            ] {
                if let Some(range) = range {
                    range.validate(field)?;
                }
            }
        }
        Ok(())
    }
}

/// The embedded default sampling table.
///
/// # Panics
///
/// Panics at first use when the embedded asset is malformed; this is a build
/// defect, not a runtime condition.
pub fn profile_catalog() -> &'static ProfileTable {
    static CATALOG: OnceLock<ProfileTable> = OnceLock::new();
    CATALOG.get_or_init(|| {
        let table: ProfileTable = serde_json::from_str(include_str!("../assets/profiles.json"))
            .expect("valid embedded profile table");
        table.validate().expect("complete embedded profile table");
        table
    })
}

/// Sample an ideological position and trait set for one member.
///
/// Faction overrides apply only inside the governing party; a faction handed
/// in alongside any other affiliation is ignored. Ministers sample like
/// everyone else, then have their rebelliousness damped.
#[must_use]
pub fn generate_profile<R: Rng + ?Sized>(
    table: &ProfileTable,
    affiliation: Affiliation,
    faction: Option<Faction>,
    is_minister: bool,
    rng: &mut R,
) -> (IdeologicalPosition, MpTraits) {
    let Some(base) = table.affiliations.get(&affiliation) else {
        // Missing table entries fall back to a neutral profile.
        return (IdeologicalPosition::default(), MpTraits::default());
    };

    let mut economic = base.economic.sample(rng);
    let mut social = base.social.sample(rng);
    let mut fiscal = base.fiscal.sample(rng);
    let mut traits = MpTraits {
        rebelliousness: base.traits.rebelliousness.sample(rng),
        ambition: base.traits.ambition.sample(rng),
        principled: base.traits.principled.sample(rng),
        careerist: base.traits.careerist.sample(rng),
        popularity_focus: base.traits.popularity_focus.sample(rng),
    };

    if affiliation.is_governing()
        && let Some(faction) = faction
        && let Some(overrides) = table.factions.get(&faction)
    {
        if let Some(range) = overrides.economic {
            economic = range.sample(rng);
        }
        if let Some(range) = overrides.social {
            social = range.sample(rng);
        }
        if let Some(range) = overrides.fiscal {
            fiscal = range.sample(rng);
        }
        traits.rebelliousness += overrides.rebelliousness_bonus;
        traits.principled += overrides.principled_bonus;
    }

    if is_minister {
        traits.rebelliousness *= table.minister.rebelliousness_factor;
        traits.ambition += table.minister.ambition_bonus;
    }

    let mut ideology = IdeologicalPosition {
        economic_axis: economic,
        social_axis: social,
        fiscal_conservatism: fiscal,
    };
    ideology.clamp();
    traits.clamp();
    (ideology, traits)
}

/// Regional baseline for constituency demographics.
const fn region_baseline(region: Region) -> (f64, f64, f64) {
    // (median income GBP, unemployment %, public sector dependency)
    match region {
        Region::London => (44_000.0, 4.5, 0.20),
        Region::SouthEast => (40_000.0, 3.2, 0.18),
        Region::SouthWest => (33_000.0, 3.4, 0.22),
        Region::Midlands => (30_000.0, 4.8, 0.24),
        Region::NorthEast => (27_000.0, 5.8, 0.30),
        Region::NorthWest => (29_000.0, 5.0, 0.28),
        Region::Yorkshire => (28_500.0, 4.9, 0.27),
        Region::EastOfEngland => (34_000.0, 3.5, 0.20),
        Region::Scotland => (31_000.0, 4.2, 0.30),
        Region::Wales => (27_500.0, 4.6, 0.32),
        Region::NorthernIreland => (26_500.0, 4.0, 0.35),
    }
}

/// Sample a constituency for a seat in the given region.
#[must_use]
pub fn generate_constituency<R: Rng + ?Sized>(
    name: &str,
    region: Region,
    rng: &mut R,
) -> Constituency {
    let (income_base, unemployment_base, dependency_base) = region_baseline(region);
    let marginality = rng.gen_range(5.0..=95.0);
    let previous_margin = ((100.0 - marginality) / 2.0) * rng.gen_range(0.6..=1.0);
    let age_profile = match rng.gen_range(0u8..10) {
        0..=2 => AgeProfile::Young,
        3..=6 => AgeProfile::Mixed,
        _ => AgeProfile::Elderly,
    };
    Constituency {
        name: name.to_string(),
        region,
        marginality,
        demographics: Demographics {
            median_income: income_base * rng.gen_range(0.8..=1.25),
            unemployment_rate: (unemployment_base * rng.gen_range(0.7..=1.4)).max(1.0),
            public_sector_dependency: (dependency_base * rng.gen_range(0.7..=1.4)).clamp(0.05, 0.6),
            age_profile,
        },
        previous_margin,
        swing_required: previous_margin / 2.0,
    }
}

/// Mint a complete representative at game start.
#[must_use]
pub fn mint_representative<R: Rng + ?Sized>(
    id: MpId,
    name: &str,
    affiliation: Affiliation,
    faction: Option<Faction>,
    region: Region,
    is_minister: bool,
    rng: &mut R,
) -> Representative {
    let table = profile_catalog();
    let (ideology, traits) = generate_profile(table, affiliation, faction, is_minister, rng);
    Representative {
        id,
        name: name.to_string(),
        affiliation,
        faction: affiliation.is_governing().then_some(faction).flatten(),
        ideology,
        traits,
        constituency: generate_constituency(name, region, rng),
        is_minister,
        committees: Vec::new(),
    }
}
