//! Formatted terminal output for the CLI.

use chrono::NaiveDate;

use crate::calibrate::CalibrationParams;
use crate::domain::{CalibrationResult, MealEntry, UserConfig, WeightEntry};
use crate::metabolic;
use crate::report::{DailySummary, DayTotals};

/// The plan overview shown by `lean init` and `lean status`.
pub fn format_plan_summary(config: &UserConfig, today: NaiveDate) -> String {
    let mut out = String::new();

    out.push_str("=== lean - weight plan ===\n");
    out.push_str(&format!(
        "Goal: {} -> {} kg by {}\n",
        config.start_weight, config.target_weight, config.end_date
    ));
    let days_left = metabolic::days_between(today, config.end_date).max(0);
    out.push_str(&format!(
        "Span: {} days total | {} days left\n",
        config.total_days(),
        days_left
    ));
    out.push_str(&format!(
        "Planned rate: {:.2} kg/week\n",
        metabolic::weekly_rate(config.weight_to_lose(), config.total_days())
    ));

    out.push_str("\nEnergy:\n");
    out.push_str(&format!("- BMR : {} kcal\n", config.bmr));
    out.push_str(&format!("- TDEE: {} kcal\n", config.tdee));
    out.push_str(&format!(
        "- Daily target: {} kcal (deficit {})\n",
        config.daily_calorie_target,
        config.tdee - config.daily_calorie_target
    ));
    out.push_str(&format!(
        "- Macros: {}g protein / {}g fat / {}g carbs\n",
        config.protein_target, config.fats_target, config.carbs_target
    ));

    out
}

/// The daily dashboard: latest weight and today's intake vs. targets.
pub fn format_status(
    config: &UserConfig,
    latest: Option<&WeightEntry>,
    today_totals: &DayTotals,
    today: NaiveDate,
) -> String {
    let mut out = String::new();

    out.push_str("=== lean - status ===\n");
    match latest {
        Some(entry) => out.push_str(&format!(
            "Current weight: {} kg ({} {}, plan {})\n",
            entry.weight,
            entry.date,
            entry.time.display_name(),
            entry.expected
        )),
        None => out.push_str("Current weight: no entries yet\n"),
    }
    out.push_str(&format!("Target weight : {} kg\n", config.target_weight));
    let days_left = metabolic::days_between(today, config.end_date).max(0);
    out.push_str(&format!("Days remaining: {} (until {})\n", days_left, config.end_date));

    out.push_str(&format!(
        "\nToday ({today}): {:.0} / {} kcal",
        today_totals.calories, config.daily_calorie_target
    ));
    let remaining = f64::from(config.daily_calorie_target) - today_totals.calories;
    if remaining >= 0.0 {
        out.push_str(&format!(" | {remaining:.0} left\n"));
    } else {
        out.push_str(&format!(" | {:.0} over\n", -remaining));
    }
    out.push_str(&format!(
        "Macros: {:.1}g/{} protein | {:.1}g/{} fat | {:.1}g/{} carbs\n",
        today_totals.protein,
        config.protein_target,
        today_totals.fats,
        config.fats_target,
        today_totals.carbs,
        config.carbs_target
    ));

    out
}

/// The calibration report.
pub fn format_calibration(result: &CalibrationResult, params: &CalibrationParams) -> String {
    let mut out = String::new();

    out.push_str("=== lean - calibration ===\n");

    if !result.has_enough_data {
        let missing = params.window_days.saturating_sub(result.data_points_used);
        out.push_str(&format!(
            "Not enough data yet: {} of {} morning weigh-ins.\n",
            result.data_points_used, params.window_days
        ));
        out.push_str(&format!(
            "Log {missing} more morning weigh-in{} and try again.\n",
            if missing == 1 { "" } else { "s" }
        ));
        out.push_str(&format!(
            "Current plan stays at {} kcal/day.\n",
            result.suggested_calories
        ));
        return out;
    }

    out.push_str(&format!(
        "Moving average ({} mornings): {:.2} kg\n",
        result.data_points_used, result.moving_average
    ));
    out.push_str(&format!("Plan expects : {:.2} kg\n", result.expected_weight));
    out.push_str(&format!(
        "Deviation    : {:+.2} kg ({})\n",
        result.deviation_kg,
        result.direction.display_name()
    ));
    out.push_str(&format!(
        "Rate         : actual {:.2} vs planned {:.2} kg/week\n",
        result.actual_weekly_rate, result.planned_weekly_rate
    ));

    out.push_str("\nRecommendation:\n");
    out.push_str(&format!("- Estimated TDEE  : {} kcal\n", result.estimated_tdee));
    out.push_str(&format!(
        "- Suggested budget: {} kcal ({}g protein / {}g fat / {}g carbs)\n",
        result.suggested_calories,
        result.suggested_macros.protein,
        result.suggested_macros.fats,
        result.suggested_macros.carbs
    ));

    if result.needs_calibration {
        out.push_str(&format!(
            "\nDeviation exceeds {:.1} kg: run `lean calibrate --apply` to adopt the new budget.\n",
            params.threshold_kg
        ));
    } else {
        out.push_str("\nWithin threshold: no calibration needed.\n");
    }

    out
}

/// The weight log as a table, in stored order.
pub fn format_weight_table(entries: &[WeightEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<15} {:<12} {:<8} {:>8} {:>9} {:>6}\n",
        "id", "date", "time", "weight", "expected", "dev"
    ));
    for w in entries {
        out.push_str(&format!(
            "{:<15} {:<12} {:<8} {:>8.1} {:>9.1} {:>+6.1}\n",
            w.id,
            w.date.to_string(),
            w.time.display_name(),
            w.weight,
            w.expected,
            w.deviation(),
        ));
    }
    out
}

/// The meal log as a table, in stored order.
pub fn format_meal_table(meals: &[MealEntry]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<15} {:<12} {:<10} {:>6} {:>5} {:>5} {:>5}  {}\n",
        "id", "date", "slot", "kcal", "prot", "fat", "carb", "description"
    ));
    for m in meals {
        out.push_str(&format!(
            "{:<15} {:<12} {:<10} {:>6.0} {:>5.1} {:>5.1} {:>5.1}  {}\n",
            m.id,
            m.date.to_string(),
            m.slot.display_name(),
            m.calories,
            m.protein,
            m.fats,
            m.carbs,
            m.description,
        ));
    }
    out
}

/// Per-day intake history with over/under marks against the daily target.
pub fn format_daily_history(days: &[DailySummary], config: &UserConfig) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<12} {:>6} {:>8} {:>7} {:>7} {:>7}  {}\n",
        "date", "meals", "kcal", "prot", "fat", "carb", "vs target"
    ));
    for day in days {
        let over = day.totals.calories - f64::from(config.daily_calorie_target);
        let mark = if over > 0.0 {
            format!("+{over:.0}")
        } else {
            format!("{over:.0}")
        };
        out.push_str(&format!(
            "{:<12} {:>6} {:>8.0} {:>7.1} {:>7.1} {:>7.1}  {}\n",
            day.date.to_string(),
            day.meal_count,
            day.totals.calories,
            day.totals.protein,
            day.totals.fats,
            day.totals.carbs,
            mark,
        ));
    }
    out
}
