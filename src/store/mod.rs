//! The plan/record store.
//!
//! Owns the persisted state — the active `UserConfig` plus the weight and
//! meal logs — as three flat JSON documents in one data directory:
//!
//! - `config.json`
//! - `weight.json`
//! - `meals.json`
//!
//! The store is the only writer. The calculator and the calibration engine
//! receive read-only snapshots and never mutate anything here; applying a
//! calibration goes back through [`Store::set_config`] as an explicit step.
//!
//! Mutating operations persist immediately, so the documents on disk always
//! reflect the in-memory state.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::domain::{MealEntry, MealSlot, TimeOfDay, UserConfig, WeightEntry};
use crate::error::AppError;
use crate::metabolic;

const CONFIG_DOC: &str = "config.json";
const WEIGHT_DOC: &str = "weight.json";
const MEALS_DOC: &str = "meals.json";

pub struct Store {
    root: PathBuf,
    config: Option<UserConfig>,
    weights: Vec<WeightEntry>,
    meals: Vec<MealEntry>,
}

impl Store {
    /// Open (or initialize) the store at `root`, loading whatever documents
    /// already exist. Missing documents mean an empty state, not an error.
    pub fn open(root: &Path) -> Result<Self, AppError> {
        fs::create_dir_all(root).map_err(|e| {
            AppError::new(2, format!("Failed to create data dir '{}': {e}", root.display()))
        })?;

        let config = read_doc(&root.join(CONFIG_DOC))?;
        let mut weights: Vec<WeightEntry> = read_doc(&root.join(WEIGHT_DOC))?.unwrap_or_default();
        let mut meals: Vec<MealEntry> = read_doc(&root.join(MEALS_DOC))?.unwrap_or_default();

        // Imported or hand-edited documents may be unsorted; normalize once.
        sort_weights(&mut weights);
        sort_meals(&mut meals);

        Ok(Self {
            root: root.to_path_buf(),
            config,
            weights,
            meals,
        })
    }

    pub fn config(&self) -> Option<&UserConfig> {
        self.config.as_ref()
    }

    /// The active plan, or an actionable error when onboarding hasn't run.
    pub fn require_config(&self) -> Result<&UserConfig, AppError> {
        self.config
            .as_ref()
            .ok_or_else(|| AppError::no_data("No active plan. Run `lean init` first."))
    }

    /// Weight log, most recent first (evening after morning within a day).
    pub fn weights(&self) -> &[WeightEntry] {
        &self.weights
    }

    /// Meal log, most recent first.
    pub fn meals(&self) -> &[MealEntry] {
        &self.meals
    }

    /// Replace the active plan and persist it.
    pub fn set_config(&mut self, config: UserConfig) -> Result<(), AppError> {
        self.config = Some(config);
        self.save_config()
    }

    /// Log a weight measurement. The plan prediction for the date/time is
    /// computed now and stored on the entry. Returns the new entry's id.
    pub fn add_weight(
        &mut self,
        date: NaiveDate,
        time: TimeOfDay,
        weight: f64,
    ) -> Result<u64, AppError> {
        if !(weight.is_finite() && weight > 0.0) {
            return Err(AppError::usage("Weight must be a positive number of kg."));
        }
        let config = self.require_config()?;
        let expected = metabolic::expected_weight(config, date, time);

        let id = self.next_id();
        self.weights.push(WeightEntry {
            id,
            date,
            time,
            weight,
            expected,
        });
        sort_weights(&mut self.weights);
        self.save_weights()?;
        Ok(id)
    }

    /// Edit a weight entry in place; the stored prediction is recomputed for
    /// the (possibly new) date/time.
    pub fn edit_weight(
        &mut self,
        id: u64,
        date: Option<NaiveDate>,
        time: Option<TimeOfDay>,
        weight: Option<f64>,
    ) -> Result<(), AppError> {
        if let Some(weight) = weight {
            if !(weight.is_finite() && weight > 0.0) {
                return Err(AppError::usage("Weight must be a positive number of kg."));
            }
        }
        let config = self.require_config()?.clone();
        let entry = self
            .weights
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or_else(|| AppError::usage(format!("No weight entry with id {id}.")))?;

        if let Some(date) = date {
            entry.date = date;
        }
        if let Some(time) = time {
            entry.time = time;
        }
        if let Some(weight) = weight {
            entry.weight = weight;
        }
        entry.expected = metabolic::expected_weight(&config, entry.date, entry.time);

        sort_weights(&mut self.weights);
        self.save_weights()
    }

    pub fn remove_weight(&mut self, id: u64) -> Result<(), AppError> {
        let before = self.weights.len();
        self.weights.retain(|w| w.id != id);
        if self.weights.len() == before {
            return Err(AppError::usage(format!("No weight entry with id {id}.")));
        }
        self.save_weights()
    }

    pub fn clear_weights(&mut self) -> Result<(), AppError> {
        self.weights.clear();
        self.save_weights()
    }

    /// Log a meal. Calorie and macro fields must be non-negative.
    #[allow(clippy::too_many_arguments)]
    pub fn add_meal(
        &mut self,
        date: NaiveDate,
        slot: MealSlot,
        description: String,
        calories: f64,
        protein: f64,
        fats: f64,
        carbs: f64,
    ) -> Result<u64, AppError> {
        validate_meal_numbers(calories, protein, fats, carbs)?;

        let id = self.next_id();
        self.meals.push(MealEntry {
            id,
            date,
            slot,
            description,
            calories,
            protein,
            fats,
            carbs,
        });
        sort_meals(&mut self.meals);
        self.save_meals()?;
        Ok(id)
    }

    /// Edit a meal entry in place.
    #[allow(clippy::too_many_arguments)]
    pub fn edit_meal(
        &mut self,
        id: u64,
        date: Option<NaiveDate>,
        slot: Option<MealSlot>,
        description: Option<String>,
        calories: Option<f64>,
        protein: Option<f64>,
        fats: Option<f64>,
        carbs: Option<f64>,
    ) -> Result<(), AppError> {
        let entry = self
            .meals
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| AppError::usage(format!("No meal entry with id {id}.")))?;
        validate_meal_numbers(
            calories.unwrap_or(entry.calories),
            protein.unwrap_or(entry.protein),
            fats.unwrap_or(entry.fats),
            carbs.unwrap_or(entry.carbs),
        )?;
        if let Some(date) = date {
            entry.date = date;
        }
        if let Some(slot) = slot {
            entry.slot = slot;
        }
        if let Some(description) = description {
            entry.description = description;
        }
        if let Some(calories) = calories {
            entry.calories = calories;
        }
        if let Some(protein) = protein {
            entry.protein = protein;
        }
        if let Some(fats) = fats {
            entry.fats = fats;
        }
        if let Some(carbs) = carbs {
            entry.carbs = carbs;
        }

        sort_meals(&mut self.meals);
        self.save_meals()
    }

    pub fn remove_meal(&mut self, id: u64) -> Result<(), AppError> {
        let before = self.meals.len();
        self.meals.retain(|m| m.id != id);
        if self.meals.len() == before {
            return Err(AppError::usage(format!("No meal entry with id {id}.")));
        }
        self.save_meals()
    }

    pub fn clear_meals(&mut self) -> Result<(), AppError> {
        self.meals.clear();
        self.save_meals()
    }

    /// Replace the whole state (backup import). Incoming arrays are
    /// re-sorted; ids are kept as-is.
    pub fn replace_all(
        &mut self,
        config: Option<UserConfig>,
        mut weights: Vec<WeightEntry>,
        mut meals: Vec<MealEntry>,
    ) -> Result<(), AppError> {
        sort_weights(&mut weights);
        sort_meals(&mut meals);
        self.config = config;
        self.weights = weights;
        self.meals = meals;
        self.save_config()?;
        self.save_weights()?;
        self.save_meals()
    }

    /// Wipe the plan and both logs, removing the documents on disk.
    pub fn clear_all(&mut self) -> Result<(), AppError> {
        self.config = None;
        self.weights.clear();
        self.meals.clear();
        for doc in [CONFIG_DOC, WEIGHT_DOC, MEALS_DOC] {
            let path = self.root.join(doc);
            if path.exists() {
                fs::remove_file(&path).map_err(|e| {
                    AppError::new(2, format!("Failed to remove '{}': {e}", path.display()))
                })?;
            }
        }
        Ok(())
    }

    fn save_config(&self) -> Result<(), AppError> {
        write_doc(&self.root.join(CONFIG_DOC), &self.config)
    }

    fn save_weights(&self) -> Result<(), AppError> {
        write_doc(&self.root.join(WEIGHT_DOC), &self.weights)
    }

    fn save_meals(&self) -> Result<(), AppError> {
        write_doc(&self.root.join(MEALS_DOC), &self.meals)
    }

    /// Creation-timestamp-derived id, bumped past any existing id so that
    /// rapid successive inserts (or imported future-dated ids) stay unique.
    fn next_id(&self) -> u64 {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        let max_existing = self
            .weights
            .iter()
            .map(|w| w.id)
            .chain(self.meals.iter().map(|m| m.id))
            .max()
            .unwrap_or(0);
        now_ms.max(max_existing + 1)
    }
}

/// Most recent first; within a day, evening sorts after morning.
fn sort_weights(weights: &mut [WeightEntry]) {
    weights.sort_by(|a, b| b.date.cmp(&a.date).then(a.time.cmp(&b.time)));
}

/// Most recent first; stable, so same-day meals keep insertion order.
fn sort_meals(meals: &mut [MealEntry]) {
    meals.sort_by(|a, b| b.date.cmp(&a.date));
}

fn validate_meal_numbers(calories: f64, protein: f64, fats: f64, carbs: f64) -> Result<(), AppError> {
    for (name, v) in [
        ("calories", calories),
        ("protein", protein),
        ("fats", fats),
        ("carbs", carbs),
    ] {
        if !(v.is_finite() && v >= 0.0) {
            return Err(AppError::usage(format!("Meal {name} must be non-negative.")));
        }
    }
    Ok(())
}

fn read_doc<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, AppError> {
    if !path.exists() {
        return Ok(None);
    }
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open '{}': {e}", path.display())))?;
    let value = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid JSON in '{}': {e}", path.display())))?;
    Ok(Some(value))
}

fn write_doc<T: Serialize>(path: &Path, value: &T) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create '{}': {e}", path.display())))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| AppError::new(2, format!("Failed to write '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Gender;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn plan() -> UserConfig {
        UserConfig {
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
        }
    }

    fn temp_store(tag: &str) -> (PathBuf, Store) {
        let root = std::env::temp_dir().join(format!("lean-store-{tag}-{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        let store = Store::open(&root).unwrap();
        (root, store)
    }

    #[test]
    fn weight_log_sorts_descending_with_evening_after_morning() {
        let (root, mut store) = temp_store("sort");
        store.set_config(plan()).unwrap();

        store.add_weight(date(2024, 1, 2), TimeOfDay::Evening, 81.9).unwrap();
        store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.0).unwrap();
        store.add_weight(date(2024, 1, 2), TimeOfDay::Morning, 81.8).unwrap();
        store.add_weight(date(2024, 1, 3), TimeOfDay::Morning, 81.7).unwrap();

        let order: Vec<(NaiveDate, TimeOfDay)> =
            store.weights().iter().map(|w| (w.date, w.time)).collect();
        assert_eq!(
            order,
            vec![
                (date(2024, 1, 3), TimeOfDay::Morning),
                (date(2024, 1, 2), TimeOfDay::Morning),
                (date(2024, 1, 2), TimeOfDay::Evening),
                (date(2024, 1, 1), TimeOfDay::Morning),
            ]
        );

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn entries_store_the_plan_prediction_at_logging_time() {
        let (root, mut store) = temp_store("expected");
        store.set_config(plan()).unwrap();

        store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.4).unwrap();
        let entry = &store.weights()[0];
        assert!((entry.expected - 82.0).abs() < 1e-9);

        // Evening prediction carries the diurnal offset.
        store.add_weight(date(2024, 1, 1), TimeOfDay::Evening, 82.9).unwrap();
        let evening = store
            .weights()
            .iter()
            .find(|w| w.time == TimeOfDay::Evening)
            .unwrap();
        assert!((evening.expected - 82.5).abs() < 1e-9);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn state_round_trips_through_reopen() {
        let (root, mut store) = temp_store("reopen");
        store.set_config(plan()).unwrap();
        store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.0).unwrap();
        store
            .add_meal(date(2024, 1, 1), MealSlot::Lunch, "soup".into(), 450.0, 20.0, 12.0, 55.0)
            .unwrap();

        let reopened = Store::open(&root).unwrap();
        assert_eq!(reopened.config(), Some(&plan()));
        assert_eq!(reopened.weights(), store.weights());
        assert_eq!(reopened.meals(), store.meals());

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn editing_recomputes_the_stored_prediction() {
        let (root, mut store) = temp_store("edit");
        store.set_config(plan()).unwrap();
        let id = store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.0).unwrap();

        store
            .edit_weight(id, Some(date(2024, 1, 1)), Some(TimeOfDay::Evening), Some(82.6))
            .unwrap();
        let entry = &store.weights()[0];
        assert_eq!(entry.time, TimeOfDay::Evening);
        assert!((entry.weight - 82.6).abs() < 1e-9);
        assert!((entry.expected - 82.5).abs() < 1e-9);

        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn unknown_ids_are_usage_errors() {
        let (root, mut store) = temp_store("unknown");
        store.set_config(plan()).unwrap();
        assert_eq!(store.remove_weight(12345).unwrap_err().exit_code(), 2);
        assert_eq!(store.remove_meal(12345).unwrap_err().exit_code(), 2);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn meal_numbers_must_be_non_negative() {
        let (root, mut store) = temp_store("negative");
        let err = store
            .add_meal(date(2024, 1, 1), MealSlot::Snack, String::new(), -10.0, 0.0, 0.0, 0.0)
            .unwrap_err();
        assert_eq!(err.exit_code(), 2);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn ids_stay_unique_for_rapid_inserts() {
        let (root, mut store) = temp_store("ids");
        store.set_config(plan()).unwrap();
        let a = store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.0).unwrap();
        let b = store.add_weight(date(2024, 1, 2), TimeOfDay::Morning, 81.9).unwrap();
        let c = store
            .add_meal(date(2024, 1, 1), MealSlot::Lunch, String::new(), 450.0, 0.0, 0.0, 0.0)
            .unwrap();
        assert!(a != b && b != c && a != c);
        let _ = fs::remove_dir_all(root);
    }

    #[test]
    fn clear_all_removes_documents() {
        let (root, mut store) = temp_store("clear");
        store.set_config(plan()).unwrap();
        store.add_weight(date(2024, 1, 1), TimeOfDay::Morning, 82.0).unwrap();
        store.clear_all().unwrap();

        assert!(store.config().is_none());
        assert!(store.weights().is_empty());
        assert!(!root.join(CONFIG_DOC).exists());
        assert!(!root.join(WEIGHT_DOC).exists());

        let _ = fs::remove_dir_all(root);
    }
}
