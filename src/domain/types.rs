//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during calibration
//! - persisted as flat JSON documents by the store
//! - exported to CSV / backup bundles and reloaded later
//!
//! Persisted structs use camelCase field names so that backup bundles written
//! by the original web version of the tracker import without translation.

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Biological sex used for BMR formula selection.
///
/// Mifflin-St Jeor only defines male/female variants; this is a documented
/// limitation of the formula, not of the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// Discrete activity levels offered by the UI.
///
/// The plan itself stores the raw multiplier (`UserConfig::activity_level`)
/// rather than this enum: the five levels are a UI convention, not a domain
/// invariant, and imported configs may carry any multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    Extreme,
}

impl ActivityLevel {
    /// TDEE multiplier for this level.
    pub fn multiplier(self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::Light => 1.375,
            ActivityLevel::Moderate => 1.55,
            ActivityLevel::Active => 1.725,
            ActivityLevel::Extreme => 1.9,
        }
    }

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "sedentary",
            ActivityLevel::Light => "lightly active",
            ActivityLevel::Moderate => "moderately active",
            ActivityLevel::Active => "very active",
            ActivityLevel::Extreme => "extremely active",
        }
    }
}

/// Time of day a weight measurement was taken.
///
/// Morning readings are the stable ones; evening readings carry diurnal noise
/// and are excluded from calibration. The ordering (`Morning < Evening`) is
/// the within-day tie-break used when sorting the weight log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    Morning,
    Evening,
}

impl TimeOfDay {
    pub fn display_name(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Evening => "evening",
        }
    }
}

/// Meal slot for a logged meal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum MealSlot {
    Breakfast,
    Lunch,
    Dinner,
    Snack,
}

impl MealSlot {
    pub fn display_name(self) -> &'static str {
        match self {
            MealSlot::Breakfast => "breakfast",
            MealSlot::Lunch => "lunch",
            MealSlot::Dinner => "dinner",
            MealSlot::Snack => "snack",
        }
    }
}

/// The active weight-loss plan, including cached derived targets.
///
/// `bmr`, `tdee`, `daily_calorie_target` and the three macro targets are
/// derived values: they are always mutually consistent with the metabolic
/// formulas at the time they were last (re)computed, and are never edited
/// independently. Re-computation happens at onboarding and when a calibration
/// is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    pub start_date: NaiveDate,
    /// Goal date; must be after `start_date`.
    pub end_date: NaiveDate,
    /// Weight (kg) at plan start.
    pub start_weight: f64,
    /// Goal weight (kg); below `start_weight` (the tracker only models loss).
    pub target_weight: f64,
    /// Height in cm.
    pub height: f64,
    /// Age in years.
    pub age: u32,
    pub gender: Gender,
    /// TDEE multiplier (UI offers 1.2 … 1.9).
    pub activity_level: f64,
    /// Cached Mifflin-St Jeor BMR, kcal/day (rounded).
    pub bmr: i32,
    /// Cached TDEE, kcal/day (rounded).
    pub tdee: i32,
    /// Current daily calorie budget, kcal.
    pub daily_calorie_target: i32,
    /// Protein target, grams.
    pub protein_target: i32,
    /// Fat target, grams.
    pub fats_target: i32,
    /// Carb target, grams.
    pub carbs_target: i32,
}

impl UserConfig {
    /// Total planned weight to lose, kg.
    pub fn weight_to_lose(&self) -> f64 {
        self.start_weight - self.target_weight
    }

    /// Whole plan span in days.
    pub fn total_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }
}

/// A single weight measurement.
///
/// `expected` is the linear-plan prediction for this date/time, computed when
/// the entry is created (or edited) and stored. It is deliberately *not*
/// recomputed when the plan changes: the log shows what the plan predicted at
/// the time of weighing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightEntry {
    /// Unique, creation-timestamp-derived id.
    pub id: u64,
    pub date: NaiveDate,
    pub time: TimeOfDay,
    /// Measured weight, kg.
    pub weight: f64,
    /// Plan prediction for this date/time, kg.
    pub expected: f64,
}

impl WeightEntry {
    /// Measured minus predicted, kg (positive = above plan).
    pub fn deviation(&self) -> f64 {
        self.weight - self.expected
    }
}

/// A single logged meal. No derived fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MealEntry {
    /// Unique, creation-timestamp-derived id.
    pub id: u64,
    pub date: NaiveDate,
    #[serde(rename = "type")]
    pub slot: MealSlot,
    pub description: String,
    /// kcal, non-negative.
    pub calories: f64,
    /// Grams, non-negative.
    pub protein: f64,
    /// Grams, non-negative.
    pub fats: f64,
    /// Grams, non-negative.
    pub carbs: f64,
}

/// Daily calories split into macro grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroSplit {
    /// Grams of protein.
    pub protein: i32,
    /// Grams of fat.
    pub fats: i32,
    /// Grams of carbohydrate.
    pub carbs: i32,
}

/// Which way actual progress deviates from the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    /// Losing more slowly than planned (actual weight above the plan line).
    Slower,
    /// Losing faster than planned (actual weight below the plan line).
    Faster,
    OnTrack,
}

impl Direction {
    pub fn display_name(self) -> &'static str {
        match self {
            Direction::Slower => "slower than plan",
            Direction::Faster => "faster than plan",
            Direction::OnTrack => "on track",
        }
    }
}

/// Output of one calibration evaluation.
///
/// Produced fresh on every run, never persisted and never mutated. When
/// `has_enough_data` is false the analysis fields (`moving_average`,
/// `expected_weight`, `deviation_kg`, rates) are zeroed and the suggestion
/// simply restates the current plan; callers must branch on the flag before
/// trusting deviation or direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalibrationResult {
    /// Whether at least `window_days` morning readings exist.
    pub has_enough_data: bool,
    /// Mean of the most recent morning readings, kg.
    pub moving_average: f64,
    /// Plan prediction at the latest morning reading's date, kg.
    pub expected_weight: f64,
    /// `moving_average - expected_weight`, kg. Positive = above plan.
    pub deviation_kg: f64,
    /// Observed loss rate over the averaging window, kg/week.
    pub actual_weekly_rate: f64,
    /// Whole-plan linear loss rate, kg/week.
    pub planned_weekly_rate: f64,
    /// Re-estimated TDEE from logged intake + weight change, kcal/day.
    #[serde(rename = "estimatedTDEE")]
    pub estimated_tdee: i32,
    /// Recommended new daily budget, kcal.
    pub suggested_calories: i32,
    /// Macro split of `suggested_calories`.
    pub suggested_macros: MacroSplit,
    /// Whether `|deviation_kg|` crossed the calibration threshold.
    pub needs_calibration: bool,
    pub direction: Direction,
    /// Morning readings used (or available, when below the window size).
    pub data_points_used: usize,
}

/// A full-state export bundle (config + both record arrays).
///
/// Version "2.0" matches the original web app's export format so bundles can
/// be moved between the two.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    pub version: String,
    /// RFC 3339 timestamp of the export.
    pub export_date: String,
    pub user_config: Option<UserConfig>,
    #[serde(default)]
    pub weight_data: Vec<WeightEntry>,
    #[serde(default)]
    pub calorie_data: Vec<MealEntry>,
}

/// Backup format version written by this tool.
pub const BACKUP_VERSION: &str = "2.0";
