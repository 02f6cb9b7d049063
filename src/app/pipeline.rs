//! Shared workflow logic used by the command handlers.
//!
//! Keeping this in one place avoids duplicating the core flows:
//! onboarding -> plan, store snapshot -> status numbers, and
//! store snapshot -> calibration. The handlers then focus on printing.

use chrono::NaiveDate;

use crate::calibrate::{self, CalibrationParams};
use crate::cli::InitArgs;
use crate::domain::{CalibrationResult, UserConfig, WeightEntry};
use crate::error::AppError;
use crate::metabolic;
use crate::report::{DayTotals, day_totals};
use crate::store::Store;

/// Daily budget below which a plan draws a safety warning, kcal.
const MIN_SAFE_CALORIES: i32 = 1200;

/// Loss rate above which a plan draws a safety warning, kg/week.
const MAX_SAFE_WEEKLY_RATE: f64 = 1.0;

/// A computed plan plus any safety warnings it triggered.
///
/// Warnings do not invalidate the plan; the init handler decides whether to
/// require `--force`.
#[derive(Debug, Clone)]
pub struct PlanProposal {
    pub config: UserConfig,
    pub warnings: Vec<String>,
}

/// Turn onboarding inputs into a full plan with all derived values cached.
pub fn build_plan(args: &InitArgs, today: NaiveDate) -> Result<PlanProposal, AppError> {
    if !(args.weight.is_finite() && args.weight > 0.0) {
        return Err(AppError::usage("Current weight must be a positive number of kg."));
    }
    if !(args.height.is_finite() && args.height > 0.0) {
        return Err(AppError::usage("Height must be a positive number of cm."));
    }
    if args.age == 0 {
        return Err(AppError::usage("Age must be positive."));
    }
    if !(args.target_weight.is_finite() && args.target_weight > 0.0)
        || args.target_weight >= args.weight
    {
        return Err(AppError::usage(
            "Target weight must be positive and below the current weight (loss plans only).",
        ));
    }
    let days_to_goal = metabolic::days_between(today, args.target_date);
    if days_to_goal <= 0 {
        return Err(AppError::usage("Target date must be in the future."));
    }

    let activity_level = args.activity.multiplier();
    let bmr = metabolic::bmr(args.weight, args.height, args.age, args.gender);
    let tdee = metabolic::tdee(bmr, activity_level);
    let weight_to_lose = args.weight - args.target_weight;
    let daily_target = metabolic::daily_target(tdee, weight_to_lose, days_to_goal);
    let macros = metabolic::macro_split(f64::from(daily_target));
    let rate = metabolic::weekly_rate(weight_to_lose, days_to_goal);

    let mut warnings = Vec::new();
    if daily_target < MIN_SAFE_CALORIES {
        warnings.push(format!(
            "Daily budget of {daily_target} kcal is very low (under {MIN_SAFE_CALORIES}); \
             consider a later target date."
        ));
    }
    if rate > MAX_SAFE_WEEKLY_RATE {
        warnings.push(format!(
            "Planned rate of {rate:.2} kg/week is aggressive (safe range is 0.5-1.0); \
             consider a later target date."
        ));
    }

    Ok(PlanProposal {
        config: UserConfig {
            start_date: today,
            end_date: args.target_date,
            start_weight: args.weight,
            target_weight: args.target_weight,
            height: args.height,
            age: args.age,
            gender: args.gender,
            activity_level,
            bmr: bmr.round() as i32,
            tdee: tdee.round() as i32,
            daily_calorie_target: daily_target,
            protein_target: macros.protein,
            fats_target: macros.fats,
            carbs_target: macros.carbs,
        },
        warnings,
    })
}

/// Everything the status dashboard needs from one store snapshot.
#[derive(Debug, Clone)]
pub struct StatusData {
    pub config: UserConfig,
    pub latest: Option<WeightEntry>,
    pub today_totals: DayTotals,
}

pub fn status_data(store: &Store, today: NaiveDate) -> Result<StatusData, AppError> {
    let config = store.require_config()?.clone();
    let latest = store.weights().first().cloned();
    let today_totals = day_totals(store.meals(), today);
    Ok(StatusData {
        config,
        latest,
        today_totals,
    })
}

/// Run the calibration engine over the store's current snapshot.
pub fn run_calibration(
    store: &Store,
    today: NaiveDate,
    params: &CalibrationParams,
) -> Result<CalibrationResult, AppError> {
    let config = store.require_config()?;
    Ok(calibrate::analyze(config, store.weights(), store.meals(), today, params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActivityLevel, Gender};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn init_args() -> InitArgs {
        InitArgs {
            weight: 82.0,
            target_weight: 75.0,
            height: 178.0,
            age: 35,
            gender: Gender::Male,
            target_date: date(2024, 6, 1),
            activity: ActivityLevel::Moderate,
            force: false,
        }
    }

    #[test]
    fn built_plan_has_mutually_consistent_derived_values() {
        let today = date(2024, 1, 1);
        let proposal = build_plan(&init_args(), today).unwrap();
        let c = &proposal.config;

        let bmr = metabolic::bmr(c.start_weight, c.height, c.age, c.gender);
        assert_eq!(c.bmr, bmr.round() as i32);
        assert_eq!(c.tdee, metabolic::tdee(bmr, c.activity_level).round() as i32);
        assert_eq!(
            c.daily_calorie_target,
            metabolic::daily_target(
                metabolic::tdee(bmr, c.activity_level),
                c.weight_to_lose(),
                c.total_days()
            )
        );
        let macros = metabolic::macro_split(f64::from(c.daily_calorie_target));
        assert_eq!(c.protein_target, macros.protein);
        assert_eq!(c.fats_target, macros.fats);
        assert_eq!(c.carbs_target, macros.carbs);

        // 7 kg over 152 days is a gentle plan; no warnings expected.
        assert!(proposal.warnings.is_empty());
    }

    #[test]
    fn aggressive_goals_draw_warnings() {
        let mut args = init_args();
        // 12 kg in 30 days: both the rate and the budget become unsafe.
        args.target_weight = 70.0;
        args.target_date = date(2024, 1, 31);
        let proposal = build_plan(&args, date(2024, 1, 1)).unwrap();
        assert_eq!(proposal.warnings.len(), 2);
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let today = date(2024, 1, 1);

        let mut past = init_args();
        past.target_date = date(2023, 12, 1);
        assert_eq!(build_plan(&past, today).unwrap_err().exit_code(), 2);

        let mut gain = init_args();
        gain.target_weight = 90.0;
        assert_eq!(build_plan(&gain, today).unwrap_err().exit_code(), 2);

        let mut same_day = init_args();
        same_day.target_date = today;
        assert_eq!(build_plan(&same_day, today).unwrap_err().exit_code(), 2);
    }
}
