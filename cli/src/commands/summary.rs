use anyhow::Result;
use chrono::Local;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use gainlog_core::service::Tracker;

use super::helpers::{no_neg_zero, parse_date, short_id};

pub(crate) fn cmd_summary(tracker: &Tracker, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let summary = tracker.daily_summary(date);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    if summary.is_empty() {
        eprintln!("No entries for {date}");
        process::exit(2);
    }

    println!("=== {date} ===\n");

    if !summary.meals.is_empty() {
        println!("  MEALS");
        for m in &summary.meals {
            let id = short_id(&m.id);
            let time = m.time.format("%H:%M");
            let name = &m.name;
            let protein = m.protein_g;
            let cal = m.calories;
            println!("    [{id}] {time} {name} — P:{protein:.0}g | {cal:.0} kcal");
        }
        println!();
    }

    if !summary.workouts.is_empty() {
        println!("  WORKOUTS");
        for w in &summary.workouts {
            let id = short_id(&w.id);
            let time = w.time.format("%H:%M");
            let kind = &w.workout_type;
            let minutes = w.duration_min;
            let intensity = w.intensity;
            println!("    [{id}] {time} {kind} — {minutes:.0} min, {intensity}");
        }
        println!();
    }

    if !summary.supplements.is_empty() {
        println!("  SUPPLEMENTS");
        for s in &summary.supplements {
            let id = short_id(&s.id);
            let mark = if s.taken { "✓" } else { "✗" };
            let what = &s.supplement;
            let when = s.time_of_day;
            println!("    [{id}] {mark} {what} ({when})");
        }
        println!();
    }

    let p = summary.total_protein_g;
    let cal = summary.total_calories;
    let pg = summary.protein_goal_g;
    let cg = summary.calorie_goal;
    let pp = summary.protein_percent;
    let cp = summary.calories_percent;
    println!("  PROTEIN:  {p:.0}g / {pg}g ({pp:.0}%)");
    println!("  CALORIES: {cal:.0} / {cg} kcal ({cp:.0}%)");
    if summary.workout_minutes > 0.0 {
        println!("  TRAINING: {:.0} min", summary.workout_minutes);
    }

    Ok(())
}

pub(crate) fn cmd_history(tracker: &Tracker, days: u32, json: bool) -> Result<()> {
    #[derive(Tabled)]
    struct HistoryRow {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Workouts")]
        workouts: String,
        #[tabled(rename = "Supplements")]
        supplements: String,
    }

    let today = Local::now().date_naive();
    let summaries = tracker.history(today, days);

    if json {
        println!("{}", serde_json::to_string_pretty(&summaries)?);
        return Ok(());
    }

    if summaries.iter().all(gainlog_core::service::DaySummary::is_empty) {
        eprintln!("No entries in the last {days} days");
        process::exit(2);
    }

    let rows: Vec<HistoryRow> = summaries
        .iter()
        .map(|s| {
            let p = no_neg_zero(s.total_protein_g);
            let cal = no_neg_zero(s.total_calories);
            let taken = s.supplements.iter().filter(|x| x.taken).count();
            HistoryRow {
                date: s.date.to_string(),
                protein: format!("{p:.0}g"),
                calories: format!("{cal:.0}"),
                workouts: format!("{} ({:.0} min)", s.workouts.len(), s.workout_minutes),
                supplements: format!("{taken}/{}", s.supplements.len()),
            }
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    println!("{table}");

    Ok(())
}
