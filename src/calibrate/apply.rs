//! Committing a calibration onto the plan.
//!
//! Applying is a deliberate, caller-invoked step — the engine only proposes.
//! A calibration changes how the plan is *executed* (the daily budget and
//! macros), never the plan itself: dates, start/target weights, biometrics
//! and the cached bmr/tdee stay untouched.

use crate::domain::{CalibrationResult, UserConfig};

/// Produce a new config with the suggested budget and macros in effect.
///
/// Pure and total; the input config is not modified.
pub fn apply_calibration(config: &UserConfig, result: &CalibrationResult) -> UserConfig {
    UserConfig {
        daily_calorie_target: result.suggested_calories,
        protein_target: result.suggested_macros.protein,
        fats_target: result.suggested_macros.fats,
        carbs_target: result.suggested_macros.carbs,
        ..config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibrate::{CalibrationParams, analyze};
    use crate::domain::{Gender, TimeOfDay, WeightEntry};
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn apply_replaces_budget_but_preserves_the_plan() {
        let config = UserConfig {
            start_date: date(2024, 1, 1),
            end_date: date(2024, 6, 1),
            start_weight: 82.0,
            target_weight: 75.0,
            height: 178.0,
            age: 35,
            gender: Gender::Male,
            activity_level: 1.55,
            bmr: 1763,
            tdee: 2763,
            daily_calorie_target: 2409,
            protein_target: 181,
            fats_target: 67,
            carbs_target: 271,
        };
        let weights: Vec<WeightEntry> = (0..10u64)
            .map(|i| WeightEntry {
                id: i,
                date: date(2024, 1, 1) + Duration::days(i as i64),
                time: TimeOfDay::Morning,
                weight: 82.0,
                expected: 82.0,
            })
            .collect();

        let result = analyze(&config, &weights, &[], date(2024, 1, 10), &CalibrationParams::default());
        let updated = apply_calibration(&config, &result);

        assert_eq!(updated.daily_calorie_target, result.suggested_calories);
        assert_eq!(updated.protein_target, result.suggested_macros.protein);
        assert_eq!(updated.fats_target, result.suggested_macros.fats);
        assert_eq!(updated.carbs_target, result.suggested_macros.carbs);

        // The plan itself is untouched.
        assert_eq!(updated.bmr, config.bmr);
        assert_eq!(updated.tdee, config.tdee);
        assert_eq!(updated.start_date, config.start_date);
        assert_eq!(updated.end_date, config.end_date);
        assert_eq!(updated.start_weight, config.start_weight);
        assert_eq!(updated.target_weight, config.target_weight);
        assert_eq!(updated.height, config.height);
        assert_eq!(updated.age, config.age);
        assert_eq!(updated.activity_level, config.activity_level);
    }
}
