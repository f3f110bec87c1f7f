use anyhow::{Context, Result, bail};
use chrono::{Local, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use gainlog_core::aggregate::Window;

pub(crate) fn parse_date(date_str: Option<String>) -> Result<NaiveDate> {
    match date_str {
        None => Ok(Local::now().date_naive()),
        Some(s) => match s.as_str() {
            "today" => Ok(Local::now().date_naive()),
            "yesterday" => Ok(Local::now().date_naive() - chrono::Duration::days(1)),
            "tomorrow" => Ok(Local::now().date_naive() + chrono::Duration::days(1)),
            _ => NaiveDate::parse_from_str(&s, "%Y-%m-%d").with_context(|| {
                format!("Invalid date '{s}'. Use YYYY-MM-DD or today/yesterday/tomorrow")
            }),
        },
    }
}

/// Current local clock time as `HH:MM`.
pub(crate) fn now_hhmm() -> String {
    Local::now().format("%H:%M").to_string()
}

/// Pick the listing window: a single `--date`, the last `--days`, or the default trailing window.
pub(crate) fn list_window(
    date: Option<String>,
    days: Option<u32>,
    default: impl FnOnce(NaiveDate) -> Window,
) -> Result<Window> {
    if date.is_some() && days.is_some() {
        bail!("Use either --date or --days, not both");
    }
    if date.is_some() {
        let d = parse_date(date)?;
        return Ok(Window::new(d, d));
    }
    let today = Local::now().date_naive();
    Ok(match days {
        Some(n) => Window::trailing(today, n),
        None => default(today),
    })
}

/// Resolve a full id or a unique id prefix (at least 4 characters) against `ids`.
///
/// Returns `Ok(None)` when nothing matches.
pub(crate) fn resolve_id(ids: impl IntoIterator<Item = Uuid>, input: &str) -> Result<Option<Uuid>> {
    let needle = input.trim().to_lowercase();
    if let Ok(full) = Uuid::parse_str(&needle) {
        return Ok(ids.into_iter().find(|id| *id == full));
    }
    if needle.len() < 4 {
        bail!("Id prefix '{input}' is too short. Use at least 4 characters");
    }
    let matches: Vec<Uuid> = ids
        .into_iter()
        .filter(|id| id.to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [] => Ok(None),
        [one] => Ok(Some(*one)),
        _ => bail!(
            "Id prefix '{input}' matches {} records. Use more characters",
            matches.len()
        ),
    }
}

pub(crate) fn short_id(id: &Uuid) -> String {
    id.to_string()[..8].to_string()
}

pub(crate) fn json_error(message: &str) -> String {
    #[derive(Serialize)]
    struct CliError<'a> {
        error: &'a str,
    }
    serde_json::to_string(&CliError { error: message })
        .unwrap_or_else(|_| format!("{{\"error\":\"{message}\"}}"))
}

pub(crate) fn no_neg_zero(v: f64) -> f64 {
    if v == 0.0 { 0.0 } else { v }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let end = s.char_indices().nth(max - 3).map_or(s.len(), |(i, _)| i);
        format!("{}...", &s[..end])
    }
}
