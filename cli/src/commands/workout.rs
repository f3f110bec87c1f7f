use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use gainlog_core::models::WorkoutRecord;
use gainlog_core::service::{Tracker, WorkoutInput};

use super::helpers::{list_window, now_hhmm, parse_date, short_id, truncate};

pub(crate) struct WorkoutArgs {
    pub workout_type: String,
    pub duration: f64,
    pub intensity: String,
    pub time: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

pub(crate) fn cmd_workout_log(tracker: &mut Tracker, args: WorkoutArgs, json: bool) -> Result<()> {
    let date = parse_date(args.date)?;
    let time = args.time.unwrap_or_else(now_hhmm);
    let workout = tracker.log_workout(&WorkoutInput {
        date,
        time: &time,
        workout_type: &args.workout_type,
        duration_min: args.duration,
        intensity: &args.intensity,
        notes: args.notes,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&workout)?);
    } else {
        let id = short_id(&workout.id);
        let kind = &workout.workout_type;
        let minutes = workout.duration_min;
        let intensity = workout.intensity;
        println!(
            "Logged [{id}] {kind} on {} — {minutes:.0} min, {intensity}",
            workout.date
        );
    }
    Ok(())
}

pub(crate) fn cmd_workout_list(
    tracker: &Tracker,
    date: Option<String>,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let window = list_window(date, days, |today| tracker.recent_window(today))?;
    let workouts = tracker.workouts(window);

    if json {
        println!("{}", serde_json::to_string_pretty(&workouts)?);
        return Ok(());
    }

    if workouts.is_empty() {
        eprintln!("No workouts between {} and {}", window.start, window.end);
        process::exit(2);
    }
    print_workout_table(&workouts);
    Ok(())
}

pub(crate) fn print_workout_table(workouts: &[WorkoutRecord]) {
    #[derive(Tabled)]
    struct WorkoutRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Type")]
        kind: String,
        #[tabled(rename = "Minutes")]
        minutes: String,
        #[tabled(rename = "Intensity")]
        intensity: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<WorkoutRow> = workouts
        .iter()
        .map(|w| WorkoutRow {
            id: short_id(&w.id),
            date: w.date.to_string(),
            time: w.time.format("%H:%M").to_string(),
            kind: truncate(w.workout_type.label(), 20),
            minutes: format!("{:.0}", w.duration_min),
            intensity: w.intensity.to_string(),
            notes: truncate(&w.notes, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
