//! Centralized balance and tuning constants for the Redbox engine.
//!
//! These values define the deterministic math for stance scoring, promise
//! handling, lobbying, and division simulation. Keeping them together
//! ensures the politics can only be rebalanced via code changes reviewed in
//! version control, rather than through external assets.

// Seat sensitivity ---------------------------------------------------------
pub const MARGINAL_SEAT_THRESHOLD: f64 = 70.0;
pub const MARGINAL_PRIORITY_MULTIPLIER: f64 = 1.5;
pub const MARGINAL_SEAT_CAVEAT: &str = " (marginal seat)";

// Stance scoring -----------------------------------------------------------
pub const STANCE_BASE_SCORE: f64 = 50.0;
pub const ALIGNMENT_WEIGHT: f64 = 5.0;
pub const MANIFESTO_VIOLATION_PENALTY: f64 = 10.0;
pub const BROKEN_PROMISE_PENALTY: f64 = 20.0;
pub const PROMISE_COMPLIANT_BONUS: f64 = 10.0;
pub const PROMISE_DEFIANT_BONUS: f64 = 2.0;
pub const CONSTITUENCY_WEIGHT: f64 = 3.0;
pub const MARGINAL_CONSTITUENCY_EXTRA_WEIGHT: f64 = 2.0;
pub const HIGH_TRAIT_THRESHOLD: f64 = 7.0;
pub const REBEL_TEMPERAMENT_PENALTY: f64 = 15.0;
pub const MINISTER_PAYROLL_BONUS: f64 = 18.0;
pub const PRINCIPLED_MISALIGNMENT_PENALTY: f64 = 10.0;
pub const LOW_ALIGNMENT_THRESHOLD: f64 = 3.0;
pub const PLAUSIBILITY_WEIGHT_BASE: f64 = 0.7;
pub const PLAUSIBILITY_PRINCIPLED_DIVISOR: f64 = 20.0;
pub const PLAUSIBILITY_MARGINAL_EXTRA: f64 = 0.18;
pub const TAX_SHAPE_NUDGE: f64 = 2.0;
pub const SUPPORT_THRESHOLD: f64 = 62.0;
pub const OPPOSE_THRESHOLD: f64 = 42.0;

// Promise compliance inference ---------------------------------------------
pub const COMPLIANCE_BASE: f64 = 0.8;
pub const COMPLIANCE_REBELLIOUSNESS_DIVISOR: f64 = 20.0;
pub const COMPLIANCE_MARGINALITY_WEIGHT: f64 = 0.001;

// Promise lifecycle --------------------------------------------------------
pub const PROMISE_DEADLINE_TURNS: u32 = 3;
pub const FISCAL_REVENUE_WEIGHT: f64 = 1.5;

// Lobbying -----------------------------------------------------------------
pub const LOBBY_BASE_PROMISE: f64 = 0.70;
pub const LOBBY_BASE_PERSUADE: f64 = 0.40;
pub const LOBBY_BASE_THREATEN: f64 = 0.55;
pub const LOBBY_REBEL_FACTOR: f64 = 0.6;
pub const LOBBY_THREATEN_PRINCIPLED_FACTOR: f64 = 0.5;
pub const LOBBY_THREATEN_CAREERIST_FACTOR: f64 = 1.4;
pub const LOBBY_PROMISE_PAYLOAD_FACTOR: f64 = 1.1;
pub const LOBBY_BROKEN_PROMISE_DECAY: f64 = 0.8;
pub const LOBBY_MARGINAL_FACTOR: f64 = 1.2;
pub const THREATEN_BACKFIRE_CHANCE: f64 = 0.30;
pub const GROUP_THRESHOLD_NHS: f64 = 10.0;
pub const GROUP_THRESHOLD_DEFAULT: f64 = 5.0;
pub const GROUP_COHESION_DIVISOR: f64 = 200.0;

// Division simulation ------------------------------------------------------
pub const SUPPORT_AYE_MINISTER: f64 = 0.995;
pub const SUPPORT_AYE_BACKBENCH_BASE: f64 = 0.9;
pub const SUPPORT_AYE_REBELLIOUSNESS_STEP: f64 = 0.01;
pub const SUPPORT_DEAL_NOE_SHARE: f64 = 0.45;
pub const OPPOSE_NOE_MINISTER_BASE: f64 = 0.55;
pub const OPPOSE_NOE_BACKBENCH_BASE: f64 = 0.72;
pub const OPPOSE_NOE_PRINCIPLED_STEP: f64 = 0.02;
pub const OPPOSE_NOE_REBELLIOUSNESS_STEP: f64 = 0.01;
pub const OPPOSE_NOE_CAP: f64 = 0.97;
pub const UNDECIDED_AYE_BASE: f64 = 0.40;
pub const UNDECIDED_AYE_MINISTER_BONUS: f64 = 0.25;
pub const UNDECIDED_AYE_REBELLIOUSNESS_STEP: f64 = 0.02;
pub const UNDECIDED_ABSTAIN_BASE: f64 = 0.35;
pub const WEAK_WHIP_THRESHOLD: f64 = 40.0;
pub const WHIP_PROMOTION_SCALE: f64 = 0.2;
pub const WEAK_WHIP_WOBBLE_STEP: f64 = 0.002;
pub const HIGH_ABSTENTION_FLAG: usize = 40;
pub const SWING_CALLOUT_LIMIT: usize = 3;
pub const SIGNIFICANT_CUT_DELTA: f64 = -2.0;

// Whip assessment bands (rebel count ceilings, low to high) ----------------
pub const WHIP_BAND_SOLID: usize = 0;
pub const WHIP_BAND_GRUMBLING: usize = 5;
pub const WHIP_BAND_RESTIVE: usize = 15;
pub const WHIP_BAND_REVOLT: usize = 30;

// Debug logging ------------------------------------------------------------
pub(crate) const DEBUG_ENV_VAR: &str = "REDBOX_DEBUG_LOGS";
