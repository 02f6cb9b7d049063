//! The calibration engine.
//!
//! Given the active plan and the full weight/meal history, decide whether the
//! plan is on track and what the daily calorie budget should be going forward.
//!
//! The engine is a pure function of its inputs: `today` is injected by the
//! caller (never read from the wall clock here), no state is kept across
//! calls, and insufficient history is reported through
//! `CalibrationResult::has_enough_data` rather than an error. Two windows are
//! in play and deliberately not unified:
//!
//! - the deviation analysis uses the configurable `window_days` (default 7)
//!   of most recent morning readings — a short-term trend signal
//! - the TDEE re-estimate always looks back 14 days — a slower, more stable
//!   metabolic estimate

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};

use crate::domain::{CalibrationResult, Direction, MealEntry, TimeOfDay, UserConfig, WeightEntry};
use crate::metabolic;

/// Fixed lookback (days) for the real-TDEE estimate, independent of
/// `CalibrationParams::window_days`.
pub const TDEE_LOOKBACK_DAYS: i64 = 14;

/// Tunable knobs of the deviation analysis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParams {
    /// Number of morning readings averaged (and the minimum required).
    pub window_days: usize,
    /// Absolute deviation (kg) at which the plan counts as off track.
    pub threshold_kg: f64,
}

impl Default for CalibrationParams {
    fn default() -> Self {
        Self {
            window_days: 7,
            threshold_kg: 0.3,
        }
    }
}

/// Run one calibration evaluation.
///
/// Always returns a fully-populated result; when fewer than
/// `params.window_days` morning readings exist the analysis fields are zeroed,
/// the suggestion restates the current plan, and `has_enough_data` is false.
pub fn analyze(
    config: &UserConfig,
    weights: &[WeightEntry],
    meals: &[MealEntry],
    today: NaiveDate,
    params: &CalibrationParams,
) -> CalibrationResult {
    let Some(window) = morning_moving_average(weights, params.window_days) else {
        let morning_count = weights.iter().filter(|w| w.time == TimeOfDay::Morning).count();
        return CalibrationResult {
            has_enough_data: false,
            moving_average: 0.0,
            expected_weight: 0.0,
            deviation_kg: 0.0,
            actual_weekly_rate: 0.0,
            planned_weekly_rate: 0.0,
            estimated_tdee: config.tdee,
            suggested_calories: config.daily_calorie_target,
            suggested_macros: metabolic::macro_split(f64::from(config.daily_calorie_target)),
            needs_calibration: false,
            direction: Direction::OnTrack,
            data_points_used: morning_count,
        };
    };

    // The window is newest-first; its head defines the reference date the
    // plan line is evaluated at.
    let newest = &window.entries[0];
    let oldest = &window.entries[window.entries.len() - 1];
    let expected = metabolic::expected_weight_on(config, newest.date);
    let deviation = metabolic::round2(window.average - expected);

    let planned_weekly_rate =
        metabolic::round2(metabolic::weekly_rate(config.weight_to_lose(), config.total_days()));

    // Observed rate from the window's boundary readings. A single-day window
    // would divide by zero, so the span is floored at one day.
    let window_span_days = (newest.date - oldest.date).num_days().max(1);
    let actual_weekly_rate =
        metabolic::round2((oldest.weight - newest.weight) / window_span_days as f64 * 7.0);

    let estimated_tdee =
        estimate_real_tdee(weights, meals, TDEE_LOOKBACK_DAYS).unwrap_or(config.tdee);

    // Budget that still reaches the target by the end date, starting from the
    // smoothed current weight — but never below resting metabolic need.
    let remaining_days = metabolic::days_between(today, config.end_date).max(1);
    let still_to_lose = window.average - config.target_weight;
    let required_deficit = still_to_lose * metabolic::KCAL_PER_KG / remaining_days as f64;
    let min_calories =
        metabolic::bmr(window.average, config.height, config.age, config.gender).round() as i32;
    let suggested_calories =
        ((f64::from(estimated_tdee) - required_deficit).round() as i32).max(min_calories);

    let (needs_calibration, direction) = decide(deviation, params.threshold_kg);

    CalibrationResult {
        has_enough_data: true,
        moving_average: window.average,
        expected_weight: expected,
        deviation_kg: deviation,
        actual_weekly_rate,
        planned_weekly_rate,
        estimated_tdee,
        suggested_calories,
        suggested_macros: metabolic::macro_split(f64::from(suggested_calories)),
        needs_calibration,
        direction,
        data_points_used: window.entries.len(),
    }
}

struct MovingAverage {
    /// Mean of the window, rounded to 2 decimals.
    average: f64,
    /// The window itself, newest first.
    entries: Vec<WeightEntry>,
}

/// Average the most recent `window_days` morning readings.
///
/// Evening readings are excluded for stability (diurnal noise). Returns `None`
/// when fewer than `window_days` morning readings exist.
fn morning_moving_average(weights: &[WeightEntry], window_days: usize) -> Option<MovingAverage> {
    let mut morning: Vec<WeightEntry> = weights
        .iter()
        .filter(|w| w.time == TimeOfDay::Morning)
        .cloned()
        .collect();
    if morning.len() < window_days || window_days == 0 {
        return None;
    }

    morning.sort_by(|a, b| b.date.cmp(&a.date));
    morning.truncate(window_days);

    let sum: f64 = morning.iter().map(|w| w.weight).sum();
    Some(MovingAverage {
        average: metabolic::round2(sum / morning.len() as f64),
        entries: morning,
    })
}

/// Estimate real TDEE from logged intake and observed weight change.
///
/// Takes the morning readings within `lookback_days` of the latest one
/// (needing at least two), then:
///
/// ```text
/// TDEE = avg_daily_intake + delta_kg * 7700 / elapsed_days
/// ```
///
/// where `elapsed_days` is the actual span between the first and last reading
/// in the lookback (floored at 1) and the intake average divides by elapsed
/// days, not by the number of days that have meals logged. Returns `None`
/// when fewer than two readings qualify or no meals fall inside the span.
fn estimate_real_tdee(
    weights: &[WeightEntry],
    meals: &[MealEntry],
    lookback_days: i64,
) -> Option<i32> {
    let mut morning: Vec<&WeightEntry> = weights
        .iter()
        .filter(|w| w.time == TimeOfDay::Morning)
        .collect();
    if morning.len() < 2 {
        return None;
    }
    morning.sort_by(|a, b| a.date.cmp(&b.date));

    let latest = morning[morning.len() - 1].date;
    let cutoff = latest - Duration::days(lookback_days);
    let in_window: Vec<&WeightEntry> = morning.into_iter().filter(|w| w.date >= cutoff).collect();
    if in_window.len() < 2 {
        return None;
    }

    let first = in_window[0];
    let last = in_window[in_window.len() - 1];
    // Positive delta = weight lost.
    let delta_kg = first.weight - last.weight;
    let elapsed_days = (last.date - first.date).num_days().max(1);

    // Group intake by day; the mean still divides by elapsed days so that
    // unlogged days count as zero rather than shrinking the denominator.
    let mut daily_calories: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for meal in meals {
        if meal.date >= first.date && meal.date <= last.date {
            *daily_calories.entry(meal.date).or_insert(0.0) += meal.calories;
        }
    }
    if daily_calories.is_empty() {
        return None;
    }

    let total_calories: f64 = daily_calories.values().sum();
    let avg_daily = total_calories / elapsed_days as f64;
    let daily_deficit = delta_kg * metabolic::KCAL_PER_KG / elapsed_days as f64;
    Some((avg_daily + daily_deficit).round() as i32)
}

/// Threshold decision: whether to recalibrate, and which way we are off.
///
/// A deviation of exactly `threshold` trips `needs_calibration` but keeps the
/// direction at `OnTrack` (strict comparison) — long-standing behavior,
/// preserved.
fn decide(deviation_kg: f64, threshold_kg: f64) -> (bool, Direction) {
    let needs = deviation_kg.abs() >= threshold_kg;
    let direction = if deviation_kg > threshold_kg {
        Direction::Slower
    } else if deviation_kg < -threshold_kg {
        Direction::Faster
    } else {
        Direction::OnTrack
    };
    (needs, direction)
}
