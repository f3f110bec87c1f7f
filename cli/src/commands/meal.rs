use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use gainlog_core::models::MealRecord;
use gainlog_core::service::{MealInput, Tracker};

use super::helpers::{list_window, now_hhmm, parse_date, short_id, truncate};

pub(crate) struct MealArgs {
    pub name: String,
    pub protein: f64,
    pub calories: f64,
    pub time: Option<String>,
    pub date: Option<String>,
    pub notes: Option<String>,
}

pub(crate) fn cmd_meal_log(tracker: &mut Tracker, args: MealArgs, json: bool) -> Result<()> {
    let date = parse_date(args.date)?;
    let time = args.time.unwrap_or_else(now_hhmm);
    let meal = tracker.log_meal(&MealInput {
        date,
        time: &time,
        name: &args.name,
        protein_g: args.protein,
        calories: args.calories,
        notes: args.notes,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&meal)?);
    } else {
        let id = short_id(&meal.id);
        let name = &meal.name;
        let protein = meal.protein_g;
        let cal = meal.calories;
        println!(
            "Logged [{id}] {name} on {} {} — {protein:.0}g protein, {cal:.0} kcal",
            meal.date,
            meal.time.format("%H:%M")
        );
    }
    Ok(())
}

pub(crate) fn cmd_meal_list(
    tracker: &Tracker,
    date: Option<String>,
    days: Option<u32>,
    json: bool,
) -> Result<()> {
    let window = list_window(date, days, |today| tracker.recent_window(today))?;
    let meals = tracker.meals(window);

    if json {
        println!("{}", serde_json::to_string_pretty(&meals)?);
        return Ok(());
    }

    if meals.is_empty() {
        eprintln!("No meals between {} and {}", window.start, window.end);
        process::exit(2);
    }
    print_meal_table(&meals);
    Ok(())
}

pub(crate) fn print_meal_table(meals: &[MealRecord]) {
    #[derive(Tabled)]
    struct MealRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Time")]
        time: String,
        #[tabled(rename = "Meal")]
        name: String,
        #[tabled(rename = "Protein")]
        protein: String,
        #[tabled(rename = "Calories")]
        calories: String,
        #[tabled(rename = "Notes")]
        notes: String,
    }

    let rows: Vec<MealRow> = meals
        .iter()
        .map(|m| MealRow {
            id: short_id(&m.id),
            date: m.date.to_string(),
            time: m.time.format("%H:%M").to_string(),
            name: truncate(&m.name, 30),
            protein: format!("{:.0}g", m.protein_g),
            calories: format!("{:.0}", m.calories),
            notes: truncate(&m.notes, 30),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(4..6)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
