//! Seeded synthetic weight/meal history.
//!
//! The generated history is deliberately imperfect: the subject loses weight
//! somewhat slower than the plan line and over-eats a little relative to the
//! daily budget, so a calibration run on demo data has something to say.

use chrono::{Duration, NaiveDate};
use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::domain::{MealEntry, MealSlot, TimeOfDay, UserConfig, WeightEntry};
use crate::error::AppError;
use crate::metabolic;

/// Fraction of the planned loss rate the demo subject actually achieves.
const ADHERENCE: f64 = 0.8;

/// Day-to-day scale noise, kg (standard deviation).
const SCALE_NOISE_KG: f64 = 0.25;

/// Chance of an additional evening weigh-in on any given day.
const EVENING_PROB: f64 = 0.3;

/// Chance of a fourth (snack) meal on any given day.
const SNACK_PROB: f64 = 0.4;

#[derive(Debug, Clone)]
pub struct DemoHistory {
    pub weights: Vec<WeightEntry>,
    pub meals: Vec<MealEntry>,
}

/// A default demo plan ending well after `today`, with the start date placed
/// so that the generated history ends today.
pub fn demo_plan(today: NaiveDate, days: usize) -> UserConfig {
    let start_date = today - Duration::days(days.saturating_sub(1) as i64);
    let end_date = start_date + Duration::days(150);

    let bmr = metabolic::bmr(82.0, 178.0, 35, crate::domain::Gender::Male);
    let tdee = metabolic::tdee(bmr, 1.55);
    let daily_target = metabolic::daily_target(tdee, 7.0, 150);
    let macros = metabolic::macro_split(f64::from(daily_target));

    UserConfig {
        start_date,
        end_date,
        start_weight: 82.0,
        target_weight: 75.0,
        height: 178.0,
        age: 35,
        gender: crate::domain::Gender::Male,
        activity_level: 1.55,
        bmr: bmr.round() as i32,
        tdee: tdee.round() as i32,
        daily_calorie_target: daily_target,
        protein_target: macros.protein,
        fats_target: macros.fats,
        carbs_target: macros.carbs,
    }
}

/// Generate `days` days of history for `config`, starting at the plan start.
pub fn generate_demo_history(
    config: &UserConfig,
    days: usize,
    seed: u64,
) -> Result<DemoHistory, AppError> {
    if days == 0 {
        return Err(AppError::usage("Demo history needs at least one day."));
    }
    if days as i64 > config.total_days() {
        return Err(AppError::usage(format!(
            "Demo history of {days} days does not fit the {}-day plan.",
            config.total_days()
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, 1.0)
        .map_err(|e| AppError::new(4, format!("Noise distribution error: {e}")))?;

    let planned_daily_loss = config.weight_to_lose() / config.total_days() as f64;
    let actual_daily_loss = planned_daily_loss * ADHERENCE;

    let mut weights = Vec::with_capacity(days * 2);
    let mut meals = Vec::with_capacity(days * 4);
    let mut next_id: u64 = 1;
    let mut id = || {
        let v = next_id;
        next_id += 1;
        v
    };

    for day in 0..days {
        let date = config.start_date + Duration::days(day as i64);
        let trend = config.start_weight - actual_daily_loss * day as f64;

        let morning = metabolic::round1(trend + noise.sample(&mut rng) * SCALE_NOISE_KG);
        weights.push(WeightEntry {
            id: id(),
            date,
            time: TimeOfDay::Morning,
            weight: morning,
            expected: metabolic::expected_weight(config, date, TimeOfDay::Morning),
        });

        if rng.gen_bool(EVENING_PROB) {
            let evening = metabolic::round1(
                morning + metabolic::EVENING_OFFSET_KG + noise.sample(&mut rng) * 0.15,
            );
            weights.push(WeightEntry {
                id: id(),
                date,
                time: TimeOfDay::Evening,
                weight: evening,
                expected: metabolic::expected_weight(config, date, TimeOfDay::Evening),
            });
        }

        // Daily intake hovers a bit above the budget (the demo subject is
        // only mostly compliant), split across the day's meals.
        let intake =
            f64::from(config.daily_calorie_target) * (1.05 + noise.sample(&mut rng) * 0.08);
        let mut slots = vec![
            (MealSlot::Breakfast, 0.25, "oatmeal with berries"),
            (MealSlot::Lunch, 0.40, "chicken, rice and salad"),
            (MealSlot::Dinner, 0.35, "fish with vegetables"),
        ];
        if rng.gen_bool(SNACK_PROB) {
            slots.push((MealSlot::Snack, 0.10, "yogurt and a handful of nuts"));
        }

        for (slot, share, description) in slots {
            let calories = (intake * share).max(0.0).round();
            let macros = metabolic::macro_split(calories);
            meals.push(MealEntry {
                id: id(),
                date,
                slot,
                description: description.to_string(),
                calories,
                protein: f64::from(macros.protein),
                fats: f64::from(macros.fats),
                carbs: f64::from(macros.carbs),
            });
        }
    }

    // Same ordering invariants the store maintains.
    weights.sort_by(|a, b| b.date.cmp(&a.date).then(a.time.cmp(&b.time)));
    meals.sort_by(|a, b| b.date.cmp(&a.date));

    Ok(DemoHistory { weights, meals })
}
