//! Metabolic calculator: pure, stateless energy/weight formulas.
//!
//! Everything in this module is a deterministic function of its arguments:
//!
//! - Mifflin-St Jeor BMR and activity-scaled TDEE
//! - daily calorie target for a linear loss plan
//! - fixed-percentage macro split
//! - expected weight on a date under the linear plan
//!
//! The calibration engine reuses these same formulas so that plan targets and
//! calibration suggestions can never drift apart.

use chrono::NaiveDate;

use crate::domain::{Gender, MacroSplit, TimeOfDay, UserConfig};

/// Energy density of body mass used throughout the tracker, kcal per kg.
///
/// The conventional 7700 kcal/kg figure for body-fat-equivalent tissue.
pub const KCAL_PER_KG: f64 = 7700.0;

/// Flat diurnal offset applied to evening readings, kg.
pub const EVENING_OFFSET_KG: f64 = 0.5;

/// Basal metabolic rate (kcal/day) via Mifflin-St Jeor.
///
/// Male: `10w + 6.25h - 5a + 5`; female: `10w + 6.25h - 5a - 161`.
/// The two variants differ by a constant 166 kcal for identical inputs.
pub fn bmr(weight_kg: f64, height_cm: f64, age: u32, gender: Gender) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * f64::from(age);
    match gender {
        Gender::Male => base + 5.0,
        Gender::Female => base - 161.0,
    }
}

/// Total daily energy expenditure: `bmr * activity_level`.
pub fn tdee(bmr: f64, activity_level: f64) -> f64 {
    bmr * activity_level
}

/// Daily calorie target that reaches the goal in `days_to_goal` days.
///
/// `round(tdee - weight_to_lose * 7700 / days_to_goal)`.
///
/// Precondition: `days_to_goal > 0`. Passing zero or a negative span is a
/// caller bug (division by zero / a surplus "target"); this function does not
/// validate it.
pub fn daily_target(tdee: f64, weight_to_lose_kg: f64, days_to_goal: i64) -> i32 {
    let deficit = weight_to_lose_kg * KCAL_PER_KG / days_to_goal as f64;
    (tdee - deficit).round() as i32
}

/// Split daily calories 30% protein / 25% fat / 45% carbs into grams.
///
/// Each macro is rounded independently (4 kcal/g protein and carbs,
/// 9 kcal/g fat), so the grams re-sum to within a few kcal of the input.
pub fn macro_split(daily_calories: f64) -> MacroSplit {
    MacroSplit {
        protein: (daily_calories * 0.30 / 4.0).round() as i32,
        fats: (daily_calories * 0.25 / 9.0).round() as i32,
        carbs: (daily_calories * 0.45 / 4.0).round() as i32,
    }
}

/// Expected weight (kg) on `date` under the plan's straight line, with the
/// evening diurnal offset, rounded to 1 decimal.
///
/// This is the value stored on a `WeightEntry` at logging time.
pub fn expected_weight(config: &UserConfig, date: NaiveDate, time: TimeOfDay) -> f64 {
    let mut expected = plan_line(config, date);
    if time == TimeOfDay::Evening {
        expected += EVENING_OFFSET_KG;
    }
    round1(expected)
}

/// Expected morning weight (kg) on `date`, rounded to 2 decimals.
///
/// Calibration always compares against the morning/floor of the plan curve,
/// so no evening offset here.
pub fn expected_weight_on(config: &UserConfig, date: NaiveDate) -> f64 {
    round2(plan_line(config, date))
}

/// Signed loss rate in kg/week for a linear plan (negative when gaining).
pub fn weekly_rate(weight_to_lose_kg: f64, days_to_goal: i64) -> f64 {
    weight_to_lose_kg / days_to_goal as f64 * 7.0
}

/// Whole-day difference `to - from` (negative when `to` is in the past).
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

fn plan_line(config: &UserConfig, date: NaiveDate) -> f64 {
    let days_passed = (date - config.start_date).num_days() as f64;
    let total_days = config.total_days() as f64;
    let daily_loss = config.weight_to_lose() / total_days;
    config.start_weight - daily_loss * days_passed
}

/// Round to 1 decimal place.
pub fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}

/// Round to 2 decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn test_config() -> UserConfig {
        UserConfig {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 1),
            start_weight: 82.0,
            target_weight: 75.0,
            height: 178.0,
            age: 35,
            gender: Gender::Male,
            activity_level: 1.55,
            bmr: 1783,
            tdee: 2763,
            daily_calorie_target: 0,
            protein_target: 0,
            fats_target: 0,
            carbs_target: 0,
        }
    }

    #[test]
    fn bmr_matches_mifflin_st_jeor() {
        // 10*80 + 6.25*180 - 5*30 + 5 = 1780
        assert!((bmr(80.0, 180.0, 30, Gender::Male) - 1780.0).abs() < 1e-9);
        assert!((bmr(80.0, 180.0, 30, Gender::Female) - 1614.0).abs() < 1e-9);
    }

    #[test]
    fn bmr_gender_gap_is_constant_166() {
        for (w, h, a) in [(55.0, 160.0, 22), (80.0, 180.0, 30), (110.0, 195.0, 64)] {
            let gap = bmr(w, h, a, Gender::Male) - bmr(w, h, a, Gender::Female);
            assert!((gap - 166.0).abs() < 1e-9);
        }
    }

    #[test]
    fn bmr_is_monotone_in_inputs() {
        let base = bmr(80.0, 180.0, 30, Gender::Male);
        assert!(bmr(81.0, 180.0, 30, Gender::Male) > base);
        assert!(bmr(80.0, 181.0, 30, Gender::Male) > base);
        assert!(bmr(80.0, 180.0, 31, Gender::Male) < base);
    }

    #[test]
    fn macro_split_energy_stays_within_rounding_tolerance() {
        for kcal in [1200.0, 1517.0, 1800.0, 2200.0, 2763.0, 3400.0] {
            let m = macro_split(kcal);
            let back = f64::from(m.protein) * 4.0 + f64::from(m.fats) * 9.0 + f64::from(m.carbs) * 4.0;
            assert!((back - kcal).abs() <= 3.0, "split of {kcal} re-sums to {back}");
        }
    }

    #[test]
    fn macro_split_known_value() {
        // 2000 kcal: 600/4=150g protein, 500/9=55.6→56g fat, 900/4=225g carbs.
        let m = macro_split(2000.0);
        assert_eq!(m.protein, 150);
        assert_eq!(m.fats, 56);
        assert_eq!(m.carbs, 225);
    }

    #[test]
    fn daily_target_with_nothing_to_lose_is_tdee() {
        assert_eq!(daily_target(2763.4, 0.0, 120), 2763);
    }

    #[test]
    fn daily_target_subtracts_linear_deficit() {
        // 7 kg over 110 days: deficit = 7*7700/110 = 490 kcal/day.
        assert_eq!(daily_target(2700.0, 7.0, 110), 2210);
    }

    #[test]
    fn weekly_rate_seven_kg_over_seventy_days() {
        assert!((weekly_rate(7.0, 70) - 0.7).abs() < 1e-12);
    }

    #[test]
    fn weekly_rate_is_signed() {
        assert!(weekly_rate(-3.0, 70) < 0.0);
    }

    #[test]
    fn expected_weight_interpolates_and_offsets_evening() {
        let config = test_config();
        // 152-day plan losing 7 kg: 0.046052... kg/day.
        let at_start = expected_weight(&config, config.start_date, TimeOfDay::Morning);
        assert!((at_start - 82.0).abs() < 1e-9);

        let at_end = expected_weight(&config, config.end_date, TimeOfDay::Morning);
        assert!((at_end - 75.0).abs() < 1e-9);

        let morning = expected_weight(&config, date(2024, 2, 1), TimeOfDay::Morning);
        let evening = expected_weight(&config, date(2024, 2, 1), TimeOfDay::Evening);
        assert!((evening - morning - EVENING_OFFSET_KG).abs() < 1e-9);
    }

    #[test]
    fn expected_weight_on_uses_two_decimals_and_no_offset() {
        let config = test_config();
        // Day 6 of 152: 82 - 6 * 7/152 = 81.7237 → 81.72.
        let v = expected_weight_on(&config, date(2024, 1, 7));
        assert!((v - 81.72).abs() < 1e-9);
    }

    #[test]
    fn days_between_is_signed_whole_days() {
        assert_eq!(days_between(date(2024, 1, 1), date(2024, 1, 15)), 14);
        assert_eq!(days_between(date(2024, 1, 15), date(2024, 1, 1)), -14);
    }
}
