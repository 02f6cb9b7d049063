//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - opens the store at the resolved data directory
//! - dispatches to the command handlers
//! - prints reports and confirmations

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::calibrate::{self, CalibrationParams};
use crate::cli::{
    BackupArgs, CalibrateArgs, Cli, Command, DemoArgs, ExportArgs, ExportKind, ImportArgs,
    InitArgs, MealCommand, WeightCommand,
};
use crate::domain::TimeOfDay;
use crate::error::AppError;
use crate::report;
use crate::store::Store;

pub mod pipeline;

const DATA_DIR_ENV: &str = "LEAN_DATA_DIR";
const DEFAULT_DATA_DIR: &str = "lean-data";

/// Entry point for the `lean` binary.
pub fn run() -> Result<(), AppError> {
    // A .env in the working directory may set LEAN_DATA_DIR; ignore if absent.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let data_dir = resolve_data_dir(cli.data_dir);
    let mut store = Store::open(&data_dir)?;
    let today = chrono::Local::now().date_naive();

    match cli.command {
        Command::Init(args) => handle_init(&mut store, args, today),
        Command::Weight { command } => handle_weight(&mut store, command, today),
        Command::Meal { command } => handle_meal(&mut store, command, today),
        Command::Status => handle_status(&store, today),
        Command::History => handle_history(&store),
        Command::Calibrate(args) => handle_calibrate(&mut store, args, today),
        Command::Export(args) => handle_export(&store, args),
        Command::Backup(args) => handle_backup(&store, args),
        Command::Import(args) => handle_import(&mut store, args),
        Command::Demo(args) => handle_demo(&mut store, args, today),
        Command::Reset { force } => handle_reset(&mut store, force),
    }
}

/// Explicit flag wins, then the environment, then `./lean-data`.
fn resolve_data_dir(flag: Option<PathBuf>) -> PathBuf {
    flag.or_else(|| std::env::var_os(DATA_DIR_ENV).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR))
}

fn handle_init(store: &mut Store, args: InitArgs, today: NaiveDate) -> Result<(), AppError> {
    if store.config().is_some() && !args.force {
        return Err(AppError::usage(
            "A plan already exists. Re-run with --force to replace it (logs are kept).",
        ));
    }

    let proposal = pipeline::build_plan(&args, today)?;
    if !proposal.warnings.is_empty() && !args.force {
        let mut message = String::from("Refusing to create this plan:\n");
        for warning in &proposal.warnings {
            message.push_str(&format!("- {warning}\n"));
        }
        message.push_str("Re-run with --force to accept it anyway.");
        return Err(AppError::usage(message));
    }
    for warning in &proposal.warnings {
        eprintln!("warning: {warning}");
    }

    store.set_config(proposal.config.clone())?;
    // Seed the log with today's weigh-in so the plan starts with a data point.
    store.add_weight(today, TimeOfDay::Morning, args.weight)?;

    println!("{}", report::format_plan_summary(&proposal.config, today));
    Ok(())
}

fn handle_weight(
    store: &mut Store,
    command: WeightCommand,
    today: NaiveDate,
) -> Result<(), AppError> {
    match command {
        WeightCommand::Add { weight, date, time } => {
            let date = date.unwrap_or(today);
            let id = store.add_weight(date, time, weight)?;
            println!("Logged {weight} kg ({} {}), id {id}.", date, time.display_name());
            Ok(())
        }
        WeightCommand::Edit {
            id,
            weight,
            date,
            time,
        } => {
            store.edit_weight(id, date, time, weight)?;
            println!("Updated weight entry {id}.");
            Ok(())
        }
        WeightCommand::List => {
            if store.weights().is_empty() {
                return Err(AppError::no_data("No weight entries yet."));
            }
            print!("{}", report::format_weight_table(store.weights()));
            Ok(())
        }
        WeightCommand::Remove { id } => {
            store.remove_weight(id)?;
            println!("Removed weight entry {id}.");
            Ok(())
        }
        WeightCommand::Clear { force } => {
            if !force {
                return Err(AppError::usage(
                    "Refusing to clear the weight log without --force.",
                ));
            }
            store.clear_weights()?;
            println!("Weight log cleared.");
            Ok(())
        }
    }
}

fn handle_meal(store: &mut Store, command: MealCommand, today: NaiveDate) -> Result<(), AppError> {
    match command {
        MealCommand::Add {
            calories,
            slot,
            date,
            description,
            protein,
            fats,
            carbs,
        } => {
            let date = date.unwrap_or(today);
            let id = store.add_meal(date, slot, description, calories, protein, fats, carbs)?;
            println!("Logged {calories} kcal ({} {}), id {id}.", date, slot.display_name());
            Ok(())
        }
        MealCommand::Edit {
            id,
            calories,
            slot,
            date,
            description,
            protein,
            fats,
            carbs,
        } => {
            store.edit_meal(id, date, slot, description, calories, protein, fats, carbs)?;
            println!("Updated meal entry {id}.");
            Ok(())
        }
        MealCommand::List { date } => {
            let meals = store.meals();
            if meals.is_empty() {
                return Err(AppError::no_data("No meal entries yet."));
            }
            match date {
                Some(date) => {
                    let day: Vec<_> = meals.iter().filter(|m| m.date == date).cloned().collect();
                    if day.is_empty() {
                        return Err(AppError::no_data(format!("No meals logged on {date}.")));
                    }
                    print!("{}", report::format_meal_table(&day));
                }
                None => print!("{}", report::format_meal_table(meals)),
            }
            Ok(())
        }
        MealCommand::Remove { id } => {
            store.remove_meal(id)?;
            println!("Removed meal entry {id}.");
            Ok(())
        }
        MealCommand::Clear { force } => {
            if !force {
                return Err(AppError::usage(
                    "Refusing to clear the meal log without --force.",
                ));
            }
            store.clear_meals()?;
            println!("Meal log cleared.");
            Ok(())
        }
    }
}

fn handle_status(store: &Store, today: NaiveDate) -> Result<(), AppError> {
    let data = pipeline::status_data(store, today)?;
    print!(
        "{}",
        report::format_status(&data.config, data.latest.as_ref(), &data.today_totals, today)
    );
    Ok(())
}

fn handle_history(store: &Store) -> Result<(), AppError> {
    let config = store.require_config()?;
    let days = report::daily_history(store.meals());
    if days.is_empty() {
        return Err(AppError::no_data("No meal entries yet."));
    }
    print!("{}", report::format_daily_history(&days, config));
    Ok(())
}

fn handle_calibrate(
    store: &mut Store,
    args: CalibrateArgs,
    today: NaiveDate,
) -> Result<(), AppError> {
    if args.window_days == 0 {
        return Err(AppError::usage("--window-days must be at least 1."));
    }
    if !(args.threshold.is_finite() && args.threshold >= 0.0) {
        return Err(AppError::usage("--threshold must be a non-negative number of kg."));
    }

    let params = CalibrationParams {
        window_days: args.window_days,
        threshold_kg: args.threshold,
    };
    let result = pipeline::run_calibration(store, today, &params)?;
    print!("{}", report::format_calibration(&result, &params));

    if args.apply {
        if !result.has_enough_data {
            return Err(AppError::no_data(
                "Cannot apply a calibration without enough morning weigh-ins.",
            ));
        }
        let config = store.require_config()?;
        let updated = calibrate::apply_calibration(config, &result);
        store.set_config(updated)?;
        println!(
            "\nApplied: daily target is now {} kcal.",
            result.suggested_calories
        );
    }
    Ok(())
}

fn handle_export(store: &Store, args: ExportArgs) -> Result<(), AppError> {
    let csv = match args.kind {
        ExportKind::Weight => {
            if store.weights().is_empty() {
                return Err(AppError::no_data("No weight entries to export."));
            }
            crate::io::weight_csv(store.weights())
        }
        ExportKind::Meals => {
            if store.meals().is_empty() {
                return Err(AppError::no_data("No meal entries to export."));
            }
            crate::io::meals_csv(store.meals())
        }
    };
    crate::io::write_csv(&args.out, &csv)?;
    println!("Wrote {}.", args.out.display());
    Ok(())
}

fn handle_backup(store: &Store, args: BackupArgs) -> Result<(), AppError> {
    if store_is_empty(store) {
        return Err(AppError::no_data("Nothing to back up yet."));
    }
    let backup = crate::io::make_backup(
        store.config(),
        store.weights(),
        store.meals(),
        chrono::Utc::now(),
    );
    crate::io::write_backup(&args.out, &backup)?;
    println!("Wrote {}.", args.out.display());
    Ok(())
}

fn handle_import(store: &mut Store, args: ImportArgs) -> Result<(), AppError> {
    if !store_is_empty(store) && !args.force {
        return Err(AppError::usage(
            "The store already holds data; import replaces everything. Re-run with --force.",
        ));
    }

    let backup = crate::io::read_backup(&args.file)?;
    let weights = backup.weight_data.len();
    let meals = backup.calorie_data.len();
    store.replace_all(backup.user_config, backup.weight_data, backup.calorie_data)?;
    println!("Imported {weights} weight and {meals} meal entries from {}.", args.file.display());
    Ok(())
}

fn handle_demo(store: &mut Store, args: DemoArgs, today: NaiveDate) -> Result<(), AppError> {
    if !store_is_empty(store) && !args.force {
        return Err(AppError::usage(
            "The store already holds data; demo replaces everything. Re-run with --force.",
        ));
    }

    let config = crate::data::demo_plan(today, args.days);
    let history = crate::data::generate_demo_history(&config, args.days, args.seed)?;
    let weights = history.weights.len();
    let meals = history.meals.len();
    store.replace_all(Some(config.clone()), history.weights, history.meals)?;

    println!(
        "Generated {} days of demo history ({weights} weigh-ins, {meals} meals, seed {}).\n",
        args.days, args.seed
    );
    println!("{}", report::format_plan_summary(&config, today));
    println!("Try `lean status` and `lean calibrate` next.");
    Ok(())
}

fn handle_reset(store: &mut Store, force: bool) -> Result<(), AppError> {
    if !force {
        return Err(AppError::usage(
            "Refusing to delete the plan and all records without --force.",
        ));
    }
    store.clear_all()?;
    println!("All data deleted.");
    Ok(())
}

fn store_is_empty(store: &Store) -> bool {
    store.config().is_none() && store.weights().is_empty() && store.meals().is_empty()
}
