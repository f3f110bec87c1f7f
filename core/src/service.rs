use std::path::Path;

use anyhow::Result;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use crate::aggregate::{Window, filter_by_window, percent_of_goal, sort_chronological, sum_field};
use crate::insights::Insights;
use crate::models::{
    MealRecord, NewMeal, NewSupplement, NewWorkout, Profile, StoreState, SupplementRecord,
    WorkoutRecord, parse_time,
};
use crate::policy::{InsightPolicy, MAX_HISTORY_DAYS};
use crate::store::RecordStore;

/// Which record collection an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Meal,
    Workout,
    Supplement,
}

/// Everything logged on one day, in chronological order.
#[derive(Debug, Clone, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub meals: Vec<MealRecord>,
    pub workouts: Vec<WorkoutRecord>,
    pub supplements: Vec<SupplementRecord>,
    pub total_protein_g: f64,
    pub total_calories: f64,
    pub workout_minutes: f64,
    pub protein_goal_g: u32,
    pub calorie_goal: u32,
    pub protein_percent: f64,
    pub calories_percent: f64,
}

impl DaySummary {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.meals.is_empty() && self.workouts.is_empty() && self.supplements.is_empty()
    }
}

/// Raw meal input as it arrives from a form or the command line.
#[derive(Debug, Clone)]
pub struct MealInput<'a> {
    pub date: NaiveDate,
    pub time: &'a str,
    pub name: &'a str,
    pub protein_g: f64,
    pub calories: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct WorkoutInput<'a> {
    pub date: NaiveDate,
    pub time: &'a str,
    pub workout_type: &'a str,
    pub duration_min: f64,
    pub intensity: &'a str,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SupplementInput<'a> {
    pub date: NaiveDate,
    pub supplement: &'a str,
    pub time_of_day: &'a str,
    pub taken: bool,
}

/// Facade over the record store and the aggregation engine.
///
/// Mutations persist before returning. Reads recompute from the current
/// snapshot every time.
pub struct Tracker {
    store: RecordStore,
    policy: InsightPolicy,
}

impl Tracker {
    pub fn open(store_path: &Path, policy: InsightPolicy) -> Result<Self> {
        policy.validate()?;
        let store = RecordStore::open(store_path)?;
        Ok(Self { store, policy })
    }

    /// Like [`Tracker::open`], but a corrupt store file is moved aside and
    /// replaced by an empty one.
    pub fn open_or_reset(store_path: &Path, policy: InsightPolicy) -> Result<Self> {
        policy.validate()?;
        let store = RecordStore::open_or_reset(store_path)?;
        Ok(Self { store, policy })
    }

    #[must_use]
    pub fn state(&self) -> &StoreState {
        self.store.state()
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        self.store.profile()
    }

    #[must_use]
    pub fn policy(&self) -> &InsightPolicy {
        &self.policy
    }

    // --- Mutations ---

    pub fn set_profile(&mut self, profile: Profile) -> Result<Profile> {
        self.store.set_profile(profile)?;
        Ok(self.store.profile().clone())
    }

    pub fn log_meal(&mut self, input: &MealInput<'_>) -> Result<MealRecord> {
        let meal = NewMeal {
            date: input.date,
            time: parse_time(input.time)?,
            name: input.name.to_string(),
            protein_g: input.protein_g,
            calories: input.calories,
            notes: input.notes.clone().unwrap_or_default(),
        };
        Ok(self.store.add_meal(meal)?)
    }

    pub fn log_workout(&mut self, input: &WorkoutInput<'_>) -> Result<WorkoutRecord> {
        let workout = NewWorkout {
            date: input.date,
            time: parse_time(input.time)?,
            workout_type: input.workout_type.parse()?,
            duration_min: input.duration_min,
            intensity: input.intensity.parse()?,
            notes: input.notes.clone().unwrap_or_default(),
        };
        Ok(self.store.add_workout(workout)?)
    }

    pub fn log_supplement(&mut self, input: &SupplementInput<'_>) -> Result<SupplementRecord> {
        let supplement = NewSupplement {
            date: input.date,
            supplement: input.supplement.parse()?,
            time_of_day: input.time_of_day.parse()?,
            taken: input.taken,
        };
        Ok(self.store.add_supplement(supplement)?)
    }

    /// Delete a record by id. Returns false if nothing matched.
    pub fn delete(&mut self, kind: RecordKind, id: Uuid) -> Result<bool> {
        let deleted = match kind {
            RecordKind::Meal => self.store.delete_meal(id)?,
            RecordKind::Workout => self.store.delete_workout(id)?,
            RecordKind::Supplement => self.store.delete_supplement(id)?,
        };
        Ok(deleted)
    }

    // --- Reads ---

    /// Meals in the window, oldest first.
    #[must_use]
    pub fn meals(&self, window: Window) -> Vec<MealRecord> {
        let mut meals = filter_by_window(&self.state().meals, window);
        sort_chronological(&mut meals);
        meals
    }

    #[must_use]
    pub fn workouts(&self, window: Window) -> Vec<WorkoutRecord> {
        let mut workouts = filter_by_window(&self.state().workouts, window);
        sort_chronological(&mut workouts);
        workouts
    }

    #[must_use]
    pub fn supplements(&self, window: Window) -> Vec<SupplementRecord> {
        let mut supplements = filter_by_window(&self.state().supplements, window);
        sort_chronological(&mut supplements);
        supplements
    }

    /// The trailing window ending at `today`, sized by the policy.
    #[must_use]
    pub fn recent_window(&self, today: NaiveDate) -> Window {
        Window::trailing(today, self.policy.window_days)
    }

    #[must_use]
    pub fn daily_summary(&self, date: NaiveDate) -> DaySummary {
        let day = Window::new(date, date);
        let meals = self.meals(day);
        let workouts = self.workouts(day);
        let supplements = self.supplements(day);
        let profile = self.profile();

        let total_protein_g = sum_field(&meals, |m| m.protein_g);
        let total_calories = sum_field(&meals, |m| m.calories);
        let workout_minutes = sum_field(&workouts, |w| w.duration_min);

        DaySummary {
            date,
            total_protein_g,
            total_calories,
            workout_minutes,
            protein_goal_g: profile.daily_protein_g,
            calorie_goal: profile.daily_calories,
            protein_percent: percent_of_goal(total_protein_g, f64::from(profile.daily_protein_g)),
            calories_percent: percent_of_goal(total_calories, f64::from(profile.daily_calories)),
            meals,
            workouts,
            supplements,
        }
    }

    /// One summary per day for the last `days` days, most recent first.
    ///
    /// At most [`MAX_HISTORY_DAYS`] days are returned, and the range stops
    /// at the earliest representable date.
    #[must_use]
    pub fn history(&self, today: NaiveDate, days: u32) -> Vec<DaySummary> {
        (0..days.min(MAX_HISTORY_DAYS))
            .map_while(|i| today.checked_sub_days(Days::new(u64::from(i))))
            .map(|d| self.daily_summary(d))
            .collect()
    }

    #[must_use]
    pub fn insights(&self, today: NaiveDate) -> Insights {
        Insights::build(self.state(), today, &self.policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::{Consistency, ProteinLevel};
    use tempfile::TempDir;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn tracker(dir: &TempDir) -> Tracker {
        Tracker::open(&dir.path().join("gainlog.json"), InsightPolicy::default()).unwrap()
    }

    fn meal_input(d: u32, time: &'static str, protein_g: f64) -> MealInput<'static> {
        MealInput {
            date: date(d),
            time,
            name: "Greek Yogurt",
            protein_g,
            calories: protein_g * 8.0,
            notes: None,
        }
    }

    fn workout_input(d: u32) -> WorkoutInput<'static> {
        WorkoutInput {
            date: date(d),
            time: "18:00",
            workout_type: "Pull",
            duration_min: 50.0,
            intensity: "hard",
            notes: None,
        }
    }

    #[test]
    fn test_log_meal_and_daily_summary() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.log_meal(&meal_input(15, "19:00", 50.0)).unwrap();
        t.log_meal(&meal_input(15, "07:30", 40.0)).unwrap();
        t.log_meal(&meal_input(14, "12:00", 99.0)).unwrap();

        let summary = t.daily_summary(date(15));
        assert_eq!(summary.meals.len(), 2);
        assert_eq!(summary.meals[0].time.format("%H:%M").to_string(), "07:30");
        assert!((summary.total_protein_g - 90.0).abs() < 1e-9);
        assert!((summary.protein_percent - 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_log_meal_rejects_bad_time() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        assert!(t.log_meal(&meal_input(15, "lunchtime", 20.0)).is_err());
        assert!(t.state().meals.is_empty());
    }

    #[test]
    fn test_log_workout_parses_enums() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let w = t.log_workout(&workout_input(15)).unwrap();
        assert_eq!(w.workout_type.label(), "Pull");
        assert_eq!(w.intensity.label(), "Hard");

        let bad = WorkoutInput {
            intensity: "brutal",
            ..workout_input(15)
        };
        assert!(t.log_workout(&bad).is_err());
        assert_eq!(t.state().workouts.len(), 1);
    }

    #[test]
    fn test_four_workouts_is_moderate() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        for d in [9, 11, 13, 15] {
            t.log_workout(&workout_input(d)).unwrap();
        }
        assert_eq!(t.insights(date(15)).workouts.consistency, Consistency::Moderate);
    }

    #[test]
    fn test_delete_each_kind() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        let m = t.log_meal(&meal_input(15, "12:00", 30.0)).unwrap();
        let w = t.log_workout(&workout_input(15)).unwrap();
        let s = t
            .log_supplement(&SupplementInput {
                date: date(15),
                supplement: "creatine",
                time_of_day: "post-workout",
                taken: true,
            })
            .unwrap();

        assert!(t.delete(RecordKind::Meal, m.id).unwrap());
        assert!(t.delete(RecordKind::Workout, w.id).unwrap());
        assert!(t.delete(RecordKind::Supplement, s.id).unwrap());
        assert!(!t.delete(RecordKind::Meal, m.id).unwrap());
        assert!(t.daily_summary(date(15)).is_empty());
    }

    #[test]
    fn test_delete_unknown_id_is_false() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.log_meal(&meal_input(15, "12:00", 30.0)).unwrap();
        assert!(!t.delete(RecordKind::Meal, Uuid::new_v4()).unwrap());
        assert_eq!(t.state().meals.len(), 1);
    }

    #[test]
    fn test_history_is_bounded() {
        let dir = TempDir::new().unwrap();
        let t = tracker(&dir);
        assert_eq!(t.history(date(15), u32::MAX).len(), MAX_HISTORY_DAYS as usize);

        // Near the start of the calendar the range stops instead of overflowing
        let early = NaiveDate::MIN + Days::new(2);
        let dates: Vec<NaiveDate> = t.history(early, 10).iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![early, NaiveDate::MIN + Days::new(1), NaiveDate::MIN]);
    }

    #[test]
    fn test_open_rejects_invalid_policy() {
        let dir = TempDir::new().unwrap();
        let policy = InsightPolicy {
            window_days: u32::MAX,
            ..InsightPolicy::default()
        };
        assert!(Tracker::open(&dir.path().join("gainlog.json"), policy).is_err());
    }

    #[test]
    fn test_history_is_most_recent_first() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.log_meal(&meal_input(13, "12:00", 30.0)).unwrap();
        let history = t.history(date(15), 3);
        let dates: Vec<NaiveDate> = history.iter().map(|s| s.date).collect();
        assert_eq!(dates, vec![date(15), date(14), date(13)]);
        assert!((history[2].total_protein_g - 30.0).abs() < 1e-9);
        assert!(history[0].is_empty());
    }

    #[test]
    fn test_profile_goal_drives_insights() {
        let dir = TempDir::new().unwrap();
        let mut t = tracker(&dir);
        t.log_meal(&meal_input(15, "12:00", 100.0)).unwrap();
        assert!(matches!(
            t.insights(date(15)).protein.level,
            ProteinLevel::BelowGoal { .. }
        ));

        t.set_profile(Profile {
            daily_protein_g: 100,
            ..Profile::default()
        })
        .unwrap();
        assert_eq!(
            t.insights(date(15)).protein.level,
            ProteinLevel::AtOrAboveGoal
        );
    }

    #[test]
    fn test_reopen_sees_persisted_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gainlog.json");
        {
            let mut t = Tracker::open(&path, InsightPolicy::default()).unwrap();
            t.log_meal(&meal_input(15, "12:00", 30.0)).unwrap();
        }
        let t = Tracker::open(&path, InsightPolicy::default()).unwrap();
        assert_eq!(t.state().meals.len(), 1);
    }
}
