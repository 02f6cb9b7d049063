//! Full-state backup bundles.
//!
//! A bundle is a single JSON document holding the plan and both logs, plus a
//! format version and export timestamp. Version "2.0" is shared with the
//! original web version of the tracker, so bundles round-trip between the
//! two.

use std::fs::File;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::domain::{BACKUP_VERSION, Backup, MealEntry, UserConfig, WeightEntry};
use crate::error::AppError;

/// Assemble a bundle from the current state.
pub fn make_backup(
    config: Option<&UserConfig>,
    weights: &[WeightEntry],
    meals: &[MealEntry],
    exported_at: DateTime<Utc>,
) -> Backup {
    Backup {
        version: BACKUP_VERSION.to_string(),
        export_date: exported_at.to_rfc3339(),
        user_config: config.cloned(),
        weight_data: weights.to_vec(),
        calorie_data: meals.to_vec(),
    }
}

/// Write a bundle to disk as pretty-printed JSON.
pub fn write_backup(path: &Path, backup: &Backup) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::new(2, format!("Failed to create backup '{}': {e}", path.display()))
    })?;
    serde_json::to_writer_pretty(file, backup)
        .map_err(|e| AppError::new(2, format!("Failed to write backup: {e}")))
}

/// Read a bundle from disk.
///
/// Unknown future versions are accepted as long as the fields parse; a bundle
/// with no parsable config and no records is rejected as almost certainly the
/// wrong file.
pub fn read_backup(path: &Path) -> Result<Backup, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::new(2, format!("Failed to open backup '{}': {e}", path.display()))
    })?;
    let backup: Backup = serde_json::from_reader(file)
        .map_err(|e| AppError::new(2, format!("Invalid backup JSON: {e}")))?;

    if backup.user_config.is_none()
        && backup.weight_data.is_empty()
        && backup.calorie_data.is_empty()
    {
        return Err(AppError::usage(format!(
            "Backup '{}' contains no plan and no records.",
            path.display()
        )));
    }
    Ok(backup)
}
