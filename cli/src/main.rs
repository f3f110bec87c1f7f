mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

use crate::commands::{
    MealArgs, ProfileArgs, WorkoutArgs, cmd_delete, cmd_history, cmd_insights, cmd_meal_list,
    cmd_meal_log, cmd_profile_set, cmd_profile_show, cmd_summary, cmd_supplement_list,
    cmd_supplement_log, cmd_workout_list, cmd_workout_log,
};
use crate::config::Config;
use gainlog_core::policy::{MAX_HISTORY_DAYS, MAX_WINDOW_DAYS};
use gainlog_core::service::{RecordKind, Tracker};

#[derive(Parser)]
#[command(
    name = "gainlog",
    version,
    about = "Log meals, workouts, and supplements, and get weekly coaching"
)]
struct Cli {
    /// Path to the store file (default: platform data dir)
    #[arg(long, global = true, value_name = "PATH")]
    store: Option<PathBuf>,
    /// If the store file is corrupt, move it aside and start fresh instead of failing
    #[arg(long, global = true)]
    reset_corrupt: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show or update your profile and daily goals
    Profile {
        #[command(subcommand)]
        command: ProfileCommands,
    },
    /// Log, list, or delete meals
    Meal {
        #[command(subcommand)]
        command: MealCommands,
    },
    /// Log, list, or delete workouts
    Workout {
        #[command(subcommand)]
        command: WorkoutCommands,
    },
    /// Log, list, or delete supplement intake
    Supplement {
        #[command(subcommand)]
        command: SupplementCommands,
    },
    /// Show everything logged on one day (defaults to today)
    Summary {
        /// Date to show (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show daily totals for the last N days
    History {
        /// Number of days to show
        #[arg(
            short,
            long,
            default_value = "7",
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HISTORY_DAYS))
        )]
        days: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Coaching over the recent window: protein trend, workout consistency, missed supplements
    Insights {
        /// Day to evaluate from (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum ProfileCommands {
    /// Update profile fields; fields not given keep their current value
    Set {
        #[arg(long)]
        name: Option<String>,
        /// Current body weight
        #[arg(long)]
        weight: Option<f64>,
        /// Goal body weight
        #[arg(long)]
        goal_weight: Option<f64>,
        /// Daily protein goal in grams
        #[arg(long)]
        protein: Option<u32>,
        /// Daily calorie goal
        #[arg(long)]
        calories: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the profile
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum MealCommands {
    /// Log a meal
    Log {
        /// Meal name
        name: String,
        /// Protein in grams
        #[arg(short, long)]
        protein: f64,
        /// Calories
        #[arg(short, long)]
        calories: f64,
        /// Time eaten (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List meals (default: the recent window)
    List {
        /// Only this date
        #[arg(long)]
        date: Option<String>,
        /// Go back this many days from today
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_WINDOW_DAYS))
        )]
        days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a meal by ID (full or unique prefix)
    Delete {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum WorkoutCommands {
    /// Log a workout
    Log {
        /// Workout type: push, pull, legs, upper body, lower body, full body, cardio, hiit, yoga, or any custom name
        workout_type: String,
        /// Duration in minutes
        #[arg(short, long)]
        duration: f64,
        /// Intensity: light, moderate, hard, very hard
        #[arg(short, long, default_value = "moderate")]
        intensity: String,
        /// Start time (HH:MM, default: now)
        #[arg(long)]
        time: Option<String>,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        notes: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List workouts (default: the recent window)
    List {
        /// Only this date
        #[arg(long)]
        date: Option<String>,
        /// Go back this many days from today
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_WINDOW_DAYS))
        )]
        days: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a workout by ID (full or unique prefix)
    Delete {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
enum SupplementCommands {
    /// Log a supplement
    Log {
        /// Supplement: multivitamin, protein shake, creatine, fish oil, vitamin d, magnesium, pre-workout, bcaa, or any other name
        name: String,
        /// When: morning, pre-workout, post-workout, with meal, evening, bedtime
        #[arg(short, long, default_value = "morning")]
        when: String,
        /// Record the dose as missed instead of taken
        #[arg(long)]
        missed: bool,
        /// Date (YYYY-MM-DD or today/yesterday/tomorrow, default: today)
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List supplement intake (default: the recent window)
    List {
        /// Only this date
        #[arg(long)]
        date: Option<String>,
        /// Go back this many days from today
        #[arg(
            short,
            long,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_WINDOW_DAYS))
        )]
        days: Option<u32>,
        /// Only show missed doses
        #[arg(long)]
        missed: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete a supplement entry by ID (full or unique prefix)
    Delete {
        id: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("GAINLOG_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

#[allow(clippy::too_many_lines)]
fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.store)?;
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        store = %config.store_path.display(),
        "resolved configuration"
    );
    let mut tracker = if cli.reset_corrupt {
        Tracker::open_or_reset(&config.store_path, config.policy)?
    } else {
        Tracker::open(&config.store_path, config.policy)?
    };

    match cli.command {
        Commands::Profile { command } => match command {
            ProfileCommands::Set {
                name,
                weight,
                goal_weight,
                protein,
                calories,
                json,
            } => cmd_profile_set(
                &mut tracker,
                ProfileArgs {
                    name,
                    weight,
                    goal_weight,
                    protein,
                    calories,
                },
                json,
            ),
            ProfileCommands::Show { json } => cmd_profile_show(&tracker, json),
        },
        Commands::Meal { command } => match command {
            MealCommands::Log {
                name,
                protein,
                calories,
                time,
                date,
                notes,
                json,
            } => cmd_meal_log(
                &mut tracker,
                MealArgs {
                    name,
                    protein,
                    calories,
                    time,
                    date,
                    notes,
                },
                json,
            ),
            MealCommands::List { date, days, json } => cmd_meal_list(&tracker, date, days, json),
            MealCommands::Delete { id, json } => {
                cmd_delete(&mut tracker, RecordKind::Meal, &id, json)
            }
        },
        Commands::Workout { command } => match command {
            WorkoutCommands::Log {
                workout_type,
                duration,
                intensity,
                time,
                date,
                notes,
                json,
            } => cmd_workout_log(
                &mut tracker,
                WorkoutArgs {
                    workout_type,
                    duration,
                    intensity,
                    time,
                    date,
                    notes,
                },
                json,
            ),
            WorkoutCommands::List { date, days, json } => {
                cmd_workout_list(&tracker, date, days, json)
            }
            WorkoutCommands::Delete { id, json } => {
                cmd_delete(&mut tracker, RecordKind::Workout, &id, json)
            }
        },
        Commands::Supplement { command } => match command {
            SupplementCommands::Log {
                name,
                when,
                missed,
                date,
                json,
            } => cmd_supplement_log(&mut tracker, &name, &when, missed, date, json),
            SupplementCommands::List {
                date,
                days,
                missed,
                json,
            } => cmd_supplement_list(&tracker, date, days, missed, json),
            SupplementCommands::Delete { id, json } => {
                cmd_delete(&mut tracker, RecordKind::Supplement, &id, json)
            }
        },
        Commands::Summary { date, json } => cmd_summary(&tracker, date, json),
        Commands::History { days, json } => cmd_history(&tracker, days, json),
        Commands::Insights { date, json } => cmd_insights(&tracker, date, json),
    }
}
