//! Budget dial identifiers and the canonical delta representation.
//!
//! Upstream cloning and serialization can hand the engine deltas as a native
//! map, an array of pairs, or an array of keyed records. Everything is
//! normalized into [`DeltaTable`] at the boundary; scoring logic never
//! inspects wire shapes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

// Tax dials (percentage-point deltas) --------------------------------------
pub const TAX_INCOME_BASIC: &str = "income_tax_basic_rate";
pub const TAX_INCOME_HIGHER: &str = "income_tax_higher_rate";
pub const TAX_INCOME_ADDITIONAL: &str = "income_tax_additional_rate";
pub const TAX_PERSONAL_ALLOWANCE: &str = "personal_allowance";
pub const TAX_NI_MAIN: &str = "national_insurance_main_rate";
pub const TAX_NI_EMPLOYER: &str = "national_insurance_employer_rate";
pub const TAX_VAT_STANDARD: &str = "vat_standard_rate";
pub const TAX_VAT_REDUCED: &str = "vat_reduced_rate";
pub const TAX_CORPORATION_MAIN: &str = "corporation_tax_main_rate";
pub const TAX_CORPORATION_SMALL: &str = "corporation_tax_small_profits_rate";
pub const TAX_CAPITAL_GAINS: &str = "capital_gains_tax_rate";
pub const TAX_INHERITANCE: &str = "inheritance_tax_rate";
pub const TAX_STAMP_DUTY: &str = "stamp_duty_rate";
pub const TAX_FUEL_DUTY: &str = "fuel_duty";
pub const TAX_ALCOHOL_DUTY: &str = "alcohol_duty";
pub const TAX_TOBACCO_DUTY: &str = "tobacco_duty";
pub const TAX_AIR_PASSENGER: &str = "air_passenger_duty";
pub const TAX_COUNCIL_MULTIPLIER: &str = "council_tax_multiplier";
pub const TAX_BUSINESS_RATES: &str = "business_rates_multiplier";
pub const TAX_BANK_LEVY: &str = "bank_levy";

/// All tax dials, in presentation order.
pub const TAX_PARAMETERS: [&str; 20] = [
    TAX_INCOME_BASIC,
    TAX_INCOME_HIGHER,
    TAX_INCOME_ADDITIONAL,
    TAX_PERSONAL_ALLOWANCE,
    TAX_NI_MAIN,
    TAX_NI_EMPLOYER,
    TAX_VAT_STANDARD,
    TAX_VAT_REDUCED,
    TAX_CORPORATION_MAIN,
    TAX_CORPORATION_SMALL,
    TAX_CAPITAL_GAINS,
    TAX_INHERITANCE,
    TAX_STAMP_DUTY,
    TAX_FUEL_DUTY,
    TAX_ALCOHOL_DUTY,
    TAX_TOBACCO_DUTY,
    TAX_AIR_PASSENGER,
    TAX_COUNCIL_MULTIPLIER,
    TAX_BUSINESS_RATES,
    TAX_BANK_LEVY,
];

/// The personal-tax dials tracked by the "no tax rises" promise category.
pub const TRACKED_PERSONAL_TAXES: [&str; 4] =
    [TAX_INCOME_BASIC, TAX_INCOME_HIGHER, TAX_INCOME_ADDITIONAL, TAX_NI_MAIN];

// Spending dials (GBP bn deltas) -------------------------------------------
pub const SPEND_NHS: &str = "nhs_england";
pub const SPEND_NHS_CAPITAL: &str = "nhs_capital";
pub const SPEND_MENTAL_HEALTH: &str = "mental_health_services";
pub const SPEND_SOCIAL_CARE: &str = "social_care";
pub const SPEND_PUBLIC_HEALTH: &str = "public_health";
pub const SPEND_SCHOOLS: &str = "education_schools";
pub const SPEND_HIGHER_EDUCATION: &str = "education_higher";
pub const SPEND_EARLY_YEARS: &str = "early_years";
pub const SPEND_SKILLS: &str = "skills_training";
pub const SPEND_DEFENCE: &str = "defence";
pub const SPEND_DEFENCE_EQUIPMENT: &str = "defence_equipment";
pub const SPEND_POLICE: &str = "police";
pub const SPEND_JUSTICE: &str = "justice_courts";
pub const SPEND_PRISONS: &str = "prisons";
pub const SPEND_BORDER: &str = "border_security";
pub const SPEND_UNIVERSAL_CREDIT: &str = "welfare_universal_credit";
pub const SPEND_STATE_PENSION: &str = "state_pension";
pub const SPEND_DISABILITY: &str = "disability_benefits";
pub const SPEND_CHILD_BENEFIT: &str = "child_benefit";
pub const SPEND_HOUSING_SUPPORT: &str = "housing_support";
pub const SPEND_RAIL: &str = "transport_rail";
pub const SPEND_ROADS: &str = "transport_roads";
pub const SPEND_LOCAL_GOVERNMENT: &str = "local_government";
pub const SPEND_HOUSING_COMMUNITIES: &str = "housing_communities";
pub const SPEND_ENVIRONMENT: &str = "environment_agriculture";
pub const SPEND_GREEN_ENERGY: &str = "green_energy";
pub const SPEND_SCIENCE: &str = "science_research";
pub const SPEND_CULTURE: &str = "culture_sport";
pub const SPEND_INTERNATIONAL_AID: &str = "international_aid";
pub const SPEND_DEVOLVED_GRANTS: &str = "devolved_block_grants";

/// All spending dials, in presentation order.
pub const SPENDING_PARAMETERS: [&str; 30] = [
    SPEND_NHS,
    SPEND_NHS_CAPITAL,
    SPEND_MENTAL_HEALTH,
    SPEND_SOCIAL_CARE,
    SPEND_PUBLIC_HEALTH,
    SPEND_SCHOOLS,
    SPEND_HIGHER_EDUCATION,
    SPEND_EARLY_YEARS,
    SPEND_SKILLS,
    SPEND_DEFENCE,
    SPEND_DEFENCE_EQUIPMENT,
    SPEND_POLICE,
    SPEND_JUSTICE,
    SPEND_PRISONS,
    SPEND_BORDER,
    SPEND_UNIVERSAL_CREDIT,
    SPEND_STATE_PENSION,
    SPEND_DISABILITY,
    SPEND_CHILD_BENEFIT,
    SPEND_HOUSING_SUPPORT,
    SPEND_RAIL,
    SPEND_ROADS,
    SPEND_LOCAL_GOVERNMENT,
    SPEND_HOUSING_COMMUNITIES,
    SPEND_ENVIRONMENT,
    SPEND_GREEN_ENERGY,
    SPEND_SCIENCE,
    SPEND_CULTURE,
    SPEND_INTERNATIONAL_AID,
    SPEND_DEVOLVED_GRANTS,
];

/// Spending lines read as "regional investment" by promises and concerns.
pub const REGIONAL_INVESTMENT_LINES: [&str; 4] = [
    SPEND_LOCAL_GOVERNMENT,
    SPEND_RAIL,
    SPEND_ROADS,
    SPEND_HOUSING_COMMUNITIES,
];

/// Canonical ordered map of parameter key to delta. Missing keys read as 0.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct DeltaTable(BTreeMap<String, f64>);

/// Wire shapes accepted for a delta table.
#[derive(Deserialize)]
#[serde(untagged)]
enum DeltaTableRepr {
    Map(BTreeMap<String, f64>),
    Pairs(Vec<(String, f64)>),
    Entries(Vec<DeltaEntry>),
}

#[derive(Deserialize)]
struct DeltaEntry {
    #[serde(alias = "parameter", alias = "key")]
    name: String,
    #[serde(alias = "delta")]
    value: f64,
}

impl<'de> Deserialize<'de> for DeltaTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = DeltaTableRepr::deserialize(deserializer)?;
        Ok(match repr {
            DeltaTableRepr::Map(map) => Self(map),
            DeltaTableRepr::Pairs(pairs) => pairs.into_iter().collect(),
            DeltaTableRepr::Entries(entries) => entries
                .into_iter()
                .map(|entry| (entry.name, entry.value))
                .collect(),
        })
    }
}

impl DeltaTable {
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Delta for a parameter, defaulting to 0 when absent.
    #[must_use]
    pub fn get(&self, key: &str) -> f64 {
        self.0.get(key).copied().unwrap_or(0.0)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: &str, value: f64) {
        self.0.insert(key.to_string(), value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(key, value)| (key.as_str(), *value))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of deltas across the listed keys.
    #[must_use]
    pub fn sum_of(&self, keys: &[&str]) -> f64 {
        keys.iter().map(|key| self.get(key)).sum()
    }

    /// Number of listed keys whose delta satisfies the predicate.
    #[must_use]
    pub fn count_where<F: Fn(f64) -> bool>(&self, keys: &[&str], pred: F) -> usize {
        keys.iter().filter(|key| pred(self.get(key))).count()
    }
}

impl FromIterator<(String, f64)> for DeltaTable {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> FromIterator<(&'a str, f64)> for DeltaTable {
    fn from_iter<T: IntoIterator<Item = (&'a str, f64)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.to_string(), value))
                .collect(),
        )
    }
}

/// Classified shape of the tax side, supplied by the fiscal collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaxDistribution {
    ProgressiveLeaning,
    RegressiveLeaning,
    Broad,
}

/// A proposed budget as the engine consumes it: sparse itemized deltas plus
/// the derived signals owned by the fiscal collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct BudgetProposal {
    #[serde(default)]
    pub taxes: DeltaTable,
    #[serde(default)]
    pub spending: DeltaTable,
    #[serde(default)]
    pub manifesto_violations: Vec<String>,
    #[serde(default)]
    pub tax_distribution: Option<TaxDistribution>,
}

impl BudgetProposal {
    /// Delta for a parameter, searching tax dials first, then spending.
    #[must_use]
    pub fn delta(&self, key: &str) -> f64 {
        if self.taxes.contains(key) {
            self.taxes.get(key)
        } else {
            self.spending.get(key)
        }
    }

    #[must_use]
    pub fn is_tax_parameter(&self, key: &str) -> bool {
        TAX_PARAMETERS.contains(&key)
    }

    /// Simplified deficit swing: positive widens the deficit.
    ///
    /// Spending deltas count at face value; tax deltas count against at a
    /// 1.5x revenue weight so a broad tax rise narrows faster than a single
    /// programme boost widens.
    #[must_use]
    pub fn deficit_swing(&self) -> f64 {
        let spend: f64 = self.spending.iter().map(|(_, delta)| delta).sum();
        let tax: f64 = self.taxes.iter().map(|(_, delta)| delta).sum();
        spend - tax * 1.5
    }
}
