mod helpers;
mod insights;
mod meal;
mod profile;
mod summary;
mod supplement;
mod workout;

use anyhow::Result;
use std::process;
use uuid::Uuid;

use gainlog_core::service::{RecordKind, Tracker};

use helpers::{json_error, resolve_id};

pub(crate) use insights::cmd_insights;
pub(crate) use meal::{MealArgs, cmd_meal_list, cmd_meal_log};
pub(crate) use profile::{ProfileArgs, cmd_profile_set, cmd_profile_show};
pub(crate) use summary::{cmd_history, cmd_summary};
pub(crate) use supplement::{cmd_supplement_list, cmd_supplement_log};
pub(crate) use workout::{WorkoutArgs, cmd_workout_list, cmd_workout_log};

fn kind_label(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Meal => "Meal",
        RecordKind::Workout => "Workout",
        RecordKind::Supplement => "Supplement",
    }
}

fn record_ids(tracker: &Tracker, kind: RecordKind) -> Vec<Uuid> {
    let state = tracker.state();
    match kind {
        RecordKind::Meal => state.meals.iter().map(|m| m.id).collect(),
        RecordKind::Workout => state.workouts.iter().map(|w| w.id).collect(),
        RecordKind::Supplement => state.supplements.iter().map(|s| s.id).collect(),
    }
}

/// Delete a record by full id or unique id prefix.
pub(crate) fn cmd_delete(
    tracker: &mut Tracker,
    kind: RecordKind,
    id_input: &str,
    json: bool,
) -> Result<()> {
    let label = kind_label(kind);
    let resolved = resolve_id(record_ids(tracker, kind), id_input)?;

    let deleted = match resolved {
        Some(id) => tracker.delete(kind, id)?.then_some(id),
        None => None,
    };

    if let Some(id) = deleted {
        if json {
            println!("{}", serde_json::json!({ "deleted": id }));
        } else {
            println!("Deleted {} {id}", label.to_lowercase());
        }
        Ok(())
    } else {
        if json {
            println!("{}", json_error(&format!("{label} {id_input} not found")));
        } else {
            eprintln!("{label} {id_input} not found");
        }
        process::exit(2);
    }
}
