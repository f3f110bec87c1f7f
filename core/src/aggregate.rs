//! Read-only aggregation over record slices.
//!
//! Every function here is pure: it takes a snapshot and returns plain
//! values. Nothing is cached between calls.

use std::collections::BTreeMap;

use chrono::{Days, NaiveDate};
use serde::Serialize;

use crate::models::{Dated, SupplementRecord};
use crate::policy::InsightPolicy;

/// Inclusive calendar date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Window {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Window {
    #[must_use]
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// `[today - days, today]`. The start saturates at `NaiveDate::MIN`.
    #[must_use]
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        Self {
            start: today
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN),
            end: today,
        }
    }

    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, 0 for an inverted window.
    #[must_use]
    pub fn len_days(&self) -> i64 {
        ((self.end - self.start).num_days() + 1).max(0)
    }
}

#[must_use]
pub fn filter_by_window<T: Dated + Clone>(records: &[T], window: Window) -> Vec<T> {
    records
        .iter()
        .filter(|r| window.contains(r.date()))
        .cloned()
        .collect()
}

/// Stable sort by date then time. Records without a time sort first within a day.
pub fn sort_chronological<T: Dated>(records: &mut [T]) {
    records.sort_by_key(|r| (r.date(), r.time()));
}

pub fn sum_field<T, F>(records: &[T], field: F) -> f64
where
    F: Fn(&T) -> f64,
{
    records.iter().map(field).sum()
}

/// Per-day sums. Only days with at least one record appear.
pub fn daily_totals<T, F>(records: &[T], field: F) -> BTreeMap<NaiveDate, f64>
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let mut totals = BTreeMap::new();
    for r in records {
        *totals.entry(r.date()).or_insert(0.0) += field(r);
    }
    totals
}

#[allow(clippy::cast_precision_loss)]
pub fn average<T, F>(records: &[T], field: F) -> f64
where
    F: Fn(&T) -> f64,
{
    if records.is_empty() {
        return 0.0;
    }
    sum_field(records, field) / records.len() as f64
}

/// Mean of the per-day totals over days that have records.
#[allow(clippy::cast_precision_loss)]
pub fn average_daily<T, F>(records: &[T], field: F) -> f64
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let totals = daily_totals(records, field);
    if totals.is_empty() {
        return 0.0;
    }
    totals.values().sum::<f64>() / totals.len() as f64
}

#[must_use]
pub fn percent_of_goal(actual: f64, goal: f64) -> f64 {
    if goal <= 0.0 {
        return 0.0;
    }
    (actual / goal * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum ProteinLevel {
    BelowGoal { shortfall_g: f64 },
    ApproachingGoal,
    AtOrAboveGoal,
}

#[must_use]
pub fn recommend(avg_daily_protein: f64, protein_goal: f64, policy: &InsightPolicy) -> ProteinLevel {
    if avg_daily_protein >= protein_goal {
        ProteinLevel::AtOrAboveGoal
    } else if avg_daily_protein < policy.protein_below_goal_ratio * protein_goal {
        ProteinLevel::BelowGoal {
            shortfall_g: protein_goal - avg_daily_protein,
        }
    } else {
        ProteinLevel::ApproachingGoal
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Consistency {
    Low,
    Moderate,
    High,
}

#[must_use]
pub fn workout_consistency(count: usize, policy: &InsightPolicy) -> Consistency {
    if count >= policy.workouts_high_from {
        Consistency::High
    } else if count >= policy.workouts_moderate_from {
        Consistency::Moderate
    } else {
        Consistency::Low
    }
}

#[must_use]
pub fn missed_supplements(records: &[SupplementRecord]) -> Vec<SupplementRecord> {
    records.iter().filter(|s| !s.taken).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MealRecord, Supplement, TimeOfDay};
    use chrono::NaiveTime;
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn meal(d: u32, hour: u32, protein_g: f64) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            date: date(d),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            name: "Meal".to_string(),
            protein_g,
            calories: protein_g * 10.0,
            notes: String::new(),
        }
    }

    fn supplement(taken: bool) -> SupplementRecord {
        SupplementRecord {
            id: Uuid::new_v4(),
            date: date(15),
            supplement: Supplement::Creatine,
            time_of_day: TimeOfDay::Morning,
            taken,
        }
    }

    fn protein(m: &MealRecord) -> f64 {
        m.protein_g
    }

    #[test]
    fn test_trailing_window_covers_eight_days() {
        let w = Window::trailing(date(15), 7);
        assert_eq!(w.start, date(8));
        assert_eq!(w.end, date(15));
        assert_eq!(w.len_days(), 8);
        assert!(w.contains(date(8)));
        assert!(w.contains(date(15)));
        assert!(!w.contains(date(7)));
        assert!(!w.contains(date(16)));
    }

    #[test]
    fn test_trailing_window_saturates_at_min_date() {
        let w = Window::trailing(date(19), 200_000_000);
        assert_eq!(w.start, NaiveDate::MIN);
        assert_eq!(w.end, date(19));
        assert!(w.contains(date(1)));

        let w = Window::trailing(date(19), u32::MAX);
        assert_eq!(w.start, NaiveDate::MIN);
    }

    #[test]
    fn test_filter_by_window_preserves_order() {
        let meals = vec![meal(15, 12, 1.0), meal(1, 12, 2.0), meal(9, 12, 3.0)];
        let filtered = filter_by_window(&meals, Window::trailing(date(15), 7));
        let got: Vec<f64> = filtered.iter().map(protein).collect();
        assert_eq!(got, vec![1.0, 3.0]);
    }

    #[test]
    fn test_sort_chronological() {
        let mut meals = vec![meal(15, 18, 1.0), meal(14, 12, 2.0), meal(15, 7, 3.0)];
        sort_chronological(&mut meals);
        let got: Vec<f64> = meals.iter().map(protein).collect();
        assert_eq!(got, vec![2.0, 3.0, 1.0]);
    }

    #[test]
    fn test_sum_field_empty_is_zero() {
        let meals: Vec<MealRecord> = Vec::new();
        assert!(sum_field(&meals, protein).abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_matches_sum_over_len() {
        let meals = vec![meal(15, 8, 30.0), meal(15, 12, 45.0), meal(14, 19, 60.0)];
        let avg = average(&meals, protein);
        assert!((avg - sum_field(&meals, protein) / 3.0).abs() < 1e-9);
        assert!((avg - 45.0).abs() < 1e-9);
    }

    #[test]
    fn test_average_empty_is_zero() {
        let meals: Vec<MealRecord> = Vec::new();
        assert!(average(&meals, protein).abs() < f64::EPSILON);
        assert!(average_daily(&meals, protein).abs() < f64::EPSILON);
    }

    #[test]
    fn test_daily_totals_partition_sum() {
        let meals = vec![
            meal(13, 8, 20.0),
            meal(15, 8, 30.0),
            meal(13, 19, 25.5),
            meal(15, 12, 45.0),
        ];
        let totals = daily_totals(&meals, protein);
        assert_eq!(totals.len(), 2);
        assert!((totals[&date(13)] - 45.5).abs() < 1e-9);
        assert!((totals[&date(15)] - 75.0).abs() < 1e-9);
        assert!(!totals.contains_key(&date(14)));
        let partitioned: f64 = totals.values().sum();
        assert!((partitioned - sum_field(&meals, protein)).abs() < 1e-9);
    }

    #[test]
    fn test_percent_of_goal_scenario() {
        assert!((percent_of_goal(90.0, 150.0) - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_percent_of_goal_clamped_and_monotonic() {
        assert!((percent_of_goal(300.0, 150.0) - 100.0).abs() < f64::EPSILON);
        assert!(percent_of_goal(50.0, 0.0).abs() < f64::EPSILON);
        assert!(percent_of_goal(-10.0, 150.0).abs() < f64::EPSILON);

        let mut last = 0.0;
        for actual in (0..400).step_by(7) {
            let p = percent_of_goal(f64::from(actual), 150.0);
            assert!(p >= last);
            assert!(p <= 100.0);
            last = p;
        }
    }

    #[test]
    fn test_recommend_below_goal_with_shortfall() {
        let daily = [100.0, 120.0, 80.0, 90.0, 110.0, 95.0, 105.0];
        let meals: Vec<MealRecord> = daily
            .iter()
            .zip(9..)
            .map(|(p, d)| meal(d, 12, *p))
            .collect();
        let avg = average_daily(&meals, protein);
        assert!((avg - 100.0).abs() < 1e-9);

        let policy = InsightPolicy::default();
        match recommend(avg, 150.0, &policy) {
            ProteinLevel::BelowGoal { shortfall_g } => assert!((shortfall_g - 50.0).abs() < 1e-9),
            other => panic!("expected BelowGoal, got {other:?}"),
        }
        assert_eq!(recommend(avg, 100.0, &policy), ProteinLevel::AtOrAboveGoal);
    }

    #[test]
    fn test_recommend_approaching_band_is_half_open() {
        let policy = InsightPolicy::default();
        // 0.8 * 150 = 120 is the first value in the approaching band
        assert_eq!(recommend(120.0, 150.0, &policy), ProteinLevel::ApproachingGoal);
        assert_eq!(recommend(149.9, 150.0, &policy), ProteinLevel::ApproachingGoal);
        assert_eq!(recommend(150.0, 150.0, &policy), ProteinLevel::AtOrAboveGoal);
        assert!(matches!(
            recommend(119.9, 150.0, &policy),
            ProteinLevel::BelowGoal { .. }
        ));
    }

    #[test]
    fn test_workout_consistency_thresholds() {
        let policy = InsightPolicy::default();
        assert_eq!(workout_consistency(0, &policy), Consistency::Low);
        assert_eq!(workout_consistency(2, &policy), Consistency::Low);
        assert_eq!(workout_consistency(3, &policy), Consistency::Moderate);
        assert_eq!(workout_consistency(4, &policy), Consistency::Moderate);
        assert_eq!(workout_consistency(5, &policy), Consistency::High);
        assert_eq!(workout_consistency(12, &policy), Consistency::High);
    }

    #[test]
    fn test_missed_supplements() {
        let records = vec![supplement(false), supplement(true)];
        let missed = missed_supplements(&records);
        assert_eq!(missed.len(), 1);
        assert_eq!(missed[0].id, records[0].id);
    }
}
