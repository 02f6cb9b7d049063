//! Reporting: daily intake aggregation and formatted terminal output.
//!
//! Formatting lives in one place (`format`) so the calculator and engine stay
//! clean and output changes are localized.

use chrono::NaiveDate;

use crate::domain::MealEntry;

pub mod format;

pub use format::*;

/// Calories and macros summed over a set of meals.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DayTotals {
    pub calories: f64,
    pub protein: f64,
    pub fats: f64,
    pub carbs: f64,
}

impl DayTotals {
    fn add(&mut self, meal: &MealEntry) {
        self.calories += meal.calories;
        self.protein += meal.protein;
        self.fats += meal.fats;
        self.carbs += meal.carbs;
    }
}

/// One day of logged meals, aggregated.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub meal_count: usize,
    pub totals: DayTotals,
}

/// Totals for a single date.
pub fn day_totals(meals: &[MealEntry], date: NaiveDate) -> DayTotals {
    let mut totals = DayTotals::default();
    for meal in meals.iter().filter(|m| m.date == date) {
        totals.add(meal);
    }
    totals
}

/// Aggregate the meal log per day, most recent first.
pub fn daily_history(meals: &[MealEntry]) -> Vec<DailySummary> {
    let mut days: Vec<DailySummary> = Vec::new();
    // The log is kept sorted descending by date, so one pass groups it.
    for meal in meals {
        match days.last_mut() {
            Some(day) if day.date == meal.date => {
                day.meal_count += 1;
                day.totals.add(meal);
            }
            _ => {
                let mut totals = DayTotals::default();
                totals.add(meal);
                days.push(DailySummary {
                    date: meal.date,
                    meal_count: 1,
                    totals,
                });
            }
        }
    }
    days
}
