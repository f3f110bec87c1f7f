use anyhow::Result;
use std::process;
use tabled::{Table, Tabled, settings::Style};

use gainlog_core::models::SupplementRecord;
use gainlog_core::service::{SupplementInput, Tracker};

use super::helpers::{list_window, parse_date, short_id};

pub(crate) fn cmd_supplement_log(
    tracker: &mut Tracker,
    name: &str,
    time_of_day: &str,
    missed: bool,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let record = tracker.log_supplement(&SupplementInput {
        date,
        supplement: name,
        time_of_day,
        taken: !missed,
    })?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        let id = short_id(&record.id);
        let what = &record.supplement;
        let when = record.time_of_day;
        let status = if record.taken { "taken" } else { "missed" };
        println!("Logged [{id}] {what} ({when}) on {} — {status}", record.date);
    }
    Ok(())
}

pub(crate) fn cmd_supplement_list(
    tracker: &Tracker,
    date: Option<String>,
    days: Option<u32>,
    missed_only: bool,
    json: bool,
) -> Result<()> {
    let window = list_window(date, days, |today| tracker.recent_window(today))?;
    let mut records = tracker.supplements(window);
    if missed_only {
        records = gainlog_core::aggregate::missed_supplements(&records);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        eprintln!("No supplements between {} and {}", window.start, window.end);
        process::exit(2);
    }
    print_supplement_table(&records);
    Ok(())
}

pub(crate) fn print_supplement_table(records: &[SupplementRecord]) {
    #[derive(Tabled)]
    struct SupplementRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Supplement")]
        supplement: String,
        #[tabled(rename = "When")]
        when: String,
        #[tabled(rename = "Taken")]
        taken: String,
    }

    let rows: Vec<SupplementRow> = records
        .iter()
        .map(|s| SupplementRow {
            id: short_id(&s.id),
            date: s.date.to_string(),
            supplement: s.supplement.to_string(),
            when: s.time_of_day.to_string(),
            taken: if s.taken { "yes" } else { "no" }.to_string(),
        })
        .collect();

    let table = Table::new(&rows).with(Style::rounded()).to_string();
    println!("{table}");
}
