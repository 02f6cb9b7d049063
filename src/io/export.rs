//! CSV exports of the two logs.
//!
//! Meant to be easy to open in a spreadsheet. The weight export includes the
//! stored plan prediction and the per-entry deviation so progress can be
//! eyeballed without the tool.

use std::fs;
use std::path::Path;

use crate::domain::{MealEntry, WeightEntry};
use crate::error::AppError;

/// Render the weight log as CSV (most recent first, as stored).
pub fn weight_csv(entries: &[WeightEntry]) -> String {
    let mut out = String::from("date,time,weight_kg,expected_kg,deviation_kg\n");
    for w in entries {
        out.push_str(&format!(
            "{},{},{},{},{:.1}\n",
            w.date,
            w.time.display_name(),
            w.weight,
            w.expected,
            w.deviation(),
        ));
    }
    out
}

/// Render the meal log as CSV (most recent first, as stored).
pub fn meals_csv(entries: &[MealEntry]) -> String {
    let mut out = String::from("date,slot,description,calories,protein_g,fats_g,carbs_g\n");
    for m in entries {
        out.push_str(&format!(
            "{},{},{},{},{},{},{}\n",
            m.date,
            m.slot.display_name(),
            quote(&m.description),
            m.calories,
            m.protein,
            m.fats,
            m.carbs,
        ));
    }
    out
}

/// Write a rendered CSV to disk.
pub fn write_csv(path: &Path, csv: &str) -> Result<(), AppError> {
    fs::write(path, csv)
        .map_err(|e| AppError::new(2, format!("Failed to write CSV '{}': {e}", path.display())))
}

/// Always-quoted CSV field; embedded quotes are doubled.
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{MealSlot, TimeOfDay};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weight_csv_includes_deviation_column() {
        let entries = vec![WeightEntry {
            id: 1,
            date: date(2024, 1, 5),
            time: TimeOfDay::Morning,
            weight: 81.9,
            expected: 81.8,
        }];
        let csv = weight_csv(&entries);
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("date,time,weight_kg,expected_kg,deviation_kg"));
        assert_eq!(lines.next(), Some("2024-01-05,morning,81.9,81.8,0.1"));
    }

    #[test]
    fn meal_descriptions_are_quoted_and_escaped() {
        let entries = vec![MealEntry {
            id: 1,
            date: date(2024, 1, 5),
            slot: MealSlot::Lunch,
            description: "soup, \"borscht\"".into(),
            calories: 450.0,
            protein: 20.0,
            fats: 12.0,
            carbs: 55.0,
        }];
        let csv = meals_csv(&entries);
        assert!(csv.contains("\"soup, \"\"borscht\"\"\""));
        assert!(csv.starts_with("date,slot,description,calories,"));
    }
}
