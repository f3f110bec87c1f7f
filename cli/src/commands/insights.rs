use anyhow::Result;

use gainlog_core::aggregate::{Consistency, ProteinLevel};
use gainlog_core::insights::Insights;
use gainlog_core::service::Tracker;

use super::helpers::parse_date;

pub(crate) fn cmd_insights(tracker: &Tracker, date: Option<String>, json: bool) -> Result<()> {
    let today = parse_date(date)?;
    let insights = tracker.insights(today);

    if json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    print_insights(&insights);
    Ok(())
}

fn print_insights(i: &Insights) {
    println!("=== Insights {} → {} ===\n", i.window.start, i.window.end);

    println!(
        "  TODAY: {:.0}g protein ({:.0}% of goal), {:.0} kcal ({:.0}% of goal)\n",
        i.today_protein_g, i.protein_percent, i.today_calories, i.calories_percent
    );

    let marker = match i.protein.level {
        ProteinLevel::BelowGoal { .. } => "!",
        ProteinLevel::ApproachingGoal => "~",
        ProteinLevel::AtOrAboveGoal => "✓",
    };
    println!("  [{marker}] {}", i.protein.message);
    for s in &i.protein.suggestions {
        println!("      - {s}");
    }

    let marker = match i.workouts.consistency {
        Consistency::Low => "!",
        Consistency::Moderate => "~",
        Consistency::High => "✓",
    };
    println!("  [{marker}] {}", i.workouts.message);

    if i.carry_forward.missed_protein_g > 0.0 {
        println!(
            "  [~] Yesterday you were {:.0}g short on protein. Today's target: {:.0}g.",
            i.carry_forward.missed_protein_g, i.carry_forward.adjusted_target_g
        );
    }

    if i.breakfast.flagged {
        println!(
            "  [!] No breakfast on {} of {} logged days. Consider prepping something the night before.",
            i.breakfast.skipped_days.len(),
            i.breakfast.logged_days
        );
    }

    if !i.missed_supplements.is_empty() {
        println!("  [!] Missed supplements:");
        for s in &i.missed_supplements {
            println!("      - {} {} ({})", s.date, s.supplement, s.time_of_day);
        }
    }
}
