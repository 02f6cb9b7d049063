//! Command-line parsing for the tracker.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the calculator/engine code.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::domain::{ActivityLevel, Gender, MealSlot, TimeOfDay};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lean",
    version,
    about = "Weight-loss & nutrition tracker with plan calibration"
)]
pub struct Cli {
    /// Data directory (default: $LEAN_DATA_DIR, else ./lean-data).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set up a weight-loss plan (biometrics + goal) and seed the first weigh-in.
    Init(InitArgs),
    /// Log and manage weight measurements.
    Weight {
        #[command(subcommand)]
        command: WeightCommand,
    },
    /// Log and manage meals.
    Meal {
        #[command(subcommand)]
        command: MealCommand,
    },
    /// Show the dashboard: latest weight, days remaining, today's intake.
    Status,
    /// Show per-day intake history.
    History,
    /// Compare actual progress against the plan and suggest a new calorie budget.
    Calibrate(CalibrateArgs),
    /// Export a log as CSV.
    Export(ExportArgs),
    /// Write a full-state backup bundle (JSON).
    Backup(BackupArgs),
    /// Restore state from a backup bundle.
    Import(ImportArgs),
    /// Generate a seeded synthetic history to try the tool.
    Demo(DemoArgs),
    /// Delete the plan and all recorded data.
    Reset {
        /// Required; a reset cannot be undone.
        #[arg(long)]
        force: bool,
    },
}

/// Onboarding inputs.
#[derive(Debug, Args)]
pub struct InitArgs {
    /// Current weight, kg.
    #[arg(long, value_name = "KG")]
    pub weight: f64,

    /// Goal weight, kg (must be below current).
    #[arg(long, value_name = "KG")]
    pub target_weight: f64,

    /// Height, cm.
    #[arg(long, value_name = "CM")]
    pub height: f64,

    /// Age, years.
    #[arg(long)]
    pub age: u32,

    #[arg(long, value_enum)]
    pub gender: Gender,

    /// Goal date (YYYY-MM-DD, must be in the future).
    #[arg(long, value_name = "DATE")]
    pub target_date: NaiveDate,

    /// Activity level for the TDEE multiplier.
    #[arg(long, value_enum, default_value_t = ActivityLevel::Moderate)]
    pub activity: ActivityLevel,

    /// Proceed despite safety warnings (very low budget / aggressive rate),
    /// or overwrite an existing plan.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Subcommand)]
pub enum WeightCommand {
    /// Log a weigh-in.
    Add {
        /// Measured weight, kg.
        #[arg(value_name = "KG")]
        weight: f64,

        /// Measurement date (default: today).
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long, value_enum, default_value_t = TimeOfDay::Morning)]
        time: TimeOfDay,
    },
    /// Edit an existing weigh-in (the plan prediction is recomputed).
    Edit {
        id: u64,

        #[arg(long, value_name = "KG")]
        weight: Option<f64>,

        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long, value_enum)]
        time: Option<TimeOfDay>,
    },
    /// Print the weight log.
    List,
    /// Delete one weigh-in.
    Remove { id: u64 },
    /// Delete the whole weight log.
    Clear {
        /// Required; clearing cannot be undone.
        #[arg(long)]
        force: bool,
    },
}

#[derive(Debug, Subcommand)]
pub enum MealCommand {
    /// Log a meal.
    Add {
        /// Calories, kcal.
        #[arg(value_name = "KCAL")]
        calories: f64,

        #[arg(long, value_enum, default_value_t = MealSlot::Snack)]
        slot: MealSlot,

        /// Meal date (default: today).
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long, default_value = "")]
        description: String,

        /// Protein, grams.
        #[arg(long, default_value_t = 0.0, value_name = "G")]
        protein: f64,

        /// Fat, grams.
        #[arg(long, default_value_t = 0.0, value_name = "G")]
        fats: f64,

        /// Carbs, grams.
        #[arg(long, default_value_t = 0.0, value_name = "G")]
        carbs: f64,
    },
    /// Edit an existing meal.
    Edit {
        id: u64,

        #[arg(long, value_name = "KCAL")]
        calories: Option<f64>,

        #[arg(long, value_enum)]
        slot: Option<MealSlot>,

        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_name = "G")]
        protein: Option<f64>,

        #[arg(long, value_name = "G")]
        fats: Option<f64>,

        #[arg(long, value_name = "G")]
        carbs: Option<f64>,
    },
    /// Print the meal log (optionally a single day).
    List {
        #[arg(long, value_name = "DATE")]
        date: Option<NaiveDate>,
    },
    /// Delete one meal.
    Remove { id: u64 },
    /// Delete the whole meal log.
    Clear {
        /// Required; clearing cannot be undone.
        #[arg(long)]
        force: bool,
    },
}

/// Calibration options.
#[derive(Debug, Args)]
pub struct CalibrateArgs {
    /// Morning weigh-ins averaged for the deviation analysis.
    #[arg(long, default_value_t = 7, value_name = "N")]
    pub window_days: usize,

    /// Deviation (kg) at which the plan counts as off track.
    #[arg(long, default_value_t = 0.3, value_name = "KG")]
    pub threshold: f64,

    /// Commit the suggested budget onto the plan (explicit, one-way).
    #[arg(long)]
    pub apply: bool,
}

/// Which log to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportKind {
    Weight,
    Meals,
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[arg(value_enum)]
    pub kind: ExportKind,

    /// Output CSV path.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Output JSON path.
    #[arg(long, value_name = "FILE")]
    pub out: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Backup bundle to restore.
    #[arg(long, value_name = "FILE")]
    pub file: PathBuf,

    /// Required when the store already holds data; import replaces everything.
    #[arg(long)]
    pub force: bool,
}

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Days of history to generate (ending today).
    #[arg(long, default_value_t = 21, value_name = "N")]
    pub days: usize,

    /// RNG seed; the same seed always produces the same history.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Required when the store already holds data; demo replaces everything.
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_weight_add_with_defaults() {
        let cli = Cli::try_parse_from(["lean", "weight", "add", "81.4"]).unwrap();
        match cli.command {
            Command::Weight {
                command: WeightCommand::Add { weight, date, time },
            } => {
                assert!((weight - 81.4).abs() < 1e-9);
                assert_eq!(date, None);
                assert_eq!(time, TimeOfDay::Morning);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_calibrate_knobs() {
        let cli = Cli::try_parse_from([
            "lean",
            "calibrate",
            "--window-days",
            "10",
            "--threshold",
            "0.5",
            "--apply",
        ])
        .unwrap();
        match cli.command {
            Command::Calibrate(args) => {
                assert_eq!(args.window_days, 10);
                assert!((args.threshold - 0.5).abs() < 1e-9);
                assert!(args.apply);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_iso_dates() {
        let cli = Cli::try_parse_from([
            "lean", "weight", "add", "81.4", "--date", "2024-02-01", "--time", "evening",
        ])
        .unwrap();
        match cli.command {
            Command::Weight {
                command: WeightCommand::Add { date, time, .. },
            } => {
                assert_eq!(date, Some(NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()));
                assert_eq!(time, TimeOfDay::Evening);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
