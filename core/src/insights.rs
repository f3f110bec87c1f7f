//! Coaching report built from a store snapshot.

use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate, NaiveTime};
use serde::Serialize;

use crate::aggregate::{
    Consistency, ProteinLevel, Window, average_daily, filter_by_window,
    missed_supplements, percent_of_goal, recommend, sort_chronological, sum_field,
    workout_consistency,
};
use crate::models::{MealRecord, StoreState, SupplementRecord};
use crate::policy::InsightPolicy;

#[derive(Debug, Clone, Serialize)]
pub struct Insights {
    pub today: NaiveDate,
    pub window: Window,
    pub today_protein_g: f64,
    pub today_calories: f64,
    pub protein_percent: f64,
    pub calories_percent: f64,
    pub protein: ProteinInsight,
    pub workouts: WorkoutInsight,
    pub missed_supplements: Vec<SupplementRecord>,
    pub carry_forward: CarryForward,
    pub breakfast: BreakfastInsight,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProteinInsight {
    pub avg_daily_g: f64,
    pub goal_g: f64,
    pub level: ProteinLevel,
    pub message: String,
    pub suggestions: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkoutInsight {
    pub count: usize,
    pub total_minutes: f64,
    pub consistency: Consistency,
    pub message: String,
}

/// Yesterday's protein shortfall rolled into today's target.
#[derive(Debug, Clone, Serialize)]
pub struct CarryForward {
    pub yesterday_protein_g: f64,
    pub missed_protein_g: f64,
    pub adjusted_target_g: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BreakfastInsight {
    pub logged_days: usize,
    pub skipped_days: Vec<NaiveDate>,
    /// Set when breakfast was skipped on at least half of the logged days.
    pub flagged: bool,
}

impl Insights {
    #[must_use]
    pub fn build(state: &StoreState, today: NaiveDate, policy: &InsightPolicy) -> Self {
        let window = Window::trailing(today, policy.window_days);
        let protein_goal = f64::from(state.profile.daily_protein_g);
        let calorie_goal = f64::from(state.profile.daily_calories);

        let recent_meals = filter_by_window(&state.meals, window);
        let todays_meals = filter_by_window(&state.meals, Window::new(today, today));
        let today_protein_g = sum_field(&todays_meals, |m| m.protein_g);
        let today_calories = sum_field(&todays_meals, |m| m.calories);

        let avg_daily_g = average_daily(&recent_meals, |m| m.protein_g);
        let protein = protein_insight(avg_daily_g, protein_goal, policy);

        let recent_workouts = filter_by_window(&state.workouts, window);
        let count = recent_workouts.len();
        let consistency = workout_consistency(count, policy);
        let workouts = WorkoutInsight {
            count,
            total_minutes: sum_field(&recent_workouts, |w| w.duration_min),
            consistency,
            message: consistency_message(consistency, count, window, policy),
        };

        let mut missed = missed_supplements(&filter_by_window(&state.supplements, window));
        sort_chronological(&mut missed);

        Self {
            today,
            window,
            today_protein_g,
            today_calories,
            protein_percent: percent_of_goal(today_protein_g, protein_goal),
            calories_percent: percent_of_goal(today_calories, calorie_goal),
            protein,
            workouts,
            missed_supplements: missed,
            carry_forward: carry_forward(&state.meals, today, protein_goal),
            breakfast: breakfast_insight(&recent_meals, policy),
        }
    }
}

fn protein_insight(avg_daily_g: f64, goal_g: f64, policy: &InsightPolicy) -> ProteinInsight {
    let level = recommend(avg_daily_g, goal_g, policy);
    let (message, suggestions) = match level {
        ProteinLevel::BelowGoal { shortfall_g } => (
            format!(
                "Protein is below target: averaging {avg_daily_g:.0}g against a {goal_g:.0}g goal."
            ),
            vec![
                format!(
                    "Add a protein shake (~{:.0}g) to your day.",
                    policy.protein_shake_g
                ),
                "Increase protein portions at your main meals.".to_string(),
                format!("You're about {shortfall_g:.0}g short per day."),
            ],
        ),
        ProteinLevel::ApproachingGoal => (
            format!("Close to your protein goal: averaging {avg_daily_g:.0}g of {goal_g:.0}g."),
            Vec::new(),
        ),
        ProteinLevel::AtOrAboveGoal => (
            format!("Protein goal met: averaging {avg_daily_g:.0}g against {goal_g:.0}g."),
            Vec::new(),
        ),
    };
    ProteinInsight {
        avg_daily_g,
        goal_g,
        level,
        message,
        suggestions,
    }
}

fn consistency_message(
    consistency: Consistency,
    count: usize,
    window: Window,
    policy: &InsightPolicy,
) -> String {
    let span = format!("in the last {} days", window.len_days());
    match consistency {
        Consistency::Low => format!(
            "Only {count} workout(s) {span}. Aim for at least {} sessions.",
            policy.workouts_moderate_from
        ),
        Consistency::Moderate => {
            format!("{count} workouts {span}. One or two more would build momentum.")
        }
        Consistency::High => format!("{count} workouts {span}. Great consistency."),
    }
}

fn carry_forward(meals: &[MealRecord], today: NaiveDate, goal_g: f64) -> CarryForward {
    let yesterday = today - Duration::days(1);
    let yesterdays = filter_by_window(meals, Window::new(yesterday, yesterday));
    let yesterday_protein_g = sum_field(&yesterdays, |m| m.protein_g);
    let missed_protein_g = (goal_g - yesterday_protein_g).max(0.0);
    CarryForward {
        yesterday_protein_g,
        missed_protein_g,
        adjusted_target_g: goal_g + missed_protein_g,
    }
}

fn breakfast_insight(recent_meals: &[MealRecord], policy: &InsightPolicy) -> BreakfastInsight {
    let cutoff = NaiveTime::from_hms_opt(policy.breakfast_cutoff_hour.min(23), 0, 0)
        .unwrap_or(NaiveTime::MIN);
    let logged: BTreeSet<NaiveDate> = recent_meals.iter().map(|m| m.date).collect();
    let with_breakfast: BTreeSet<NaiveDate> = recent_meals
        .iter()
        .filter(|m| m.time < cutoff)
        .map(|m| m.date)
        .collect();
    let skipped_days: Vec<NaiveDate> = logged.difference(&with_breakfast).copied().collect();
    let logged_days = logged.len();
    BreakfastInsight {
        logged_days,
        flagged: logged_days > 0 && skipped_days.len() * 2 >= logged_days,
        skipped_days,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Intensity, Supplement, TimeOfDay, WorkoutRecord, WorkoutType};
    use uuid::Uuid;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    fn meal(d: u32, hour: u32, protein_g: f64, calories: f64) -> MealRecord {
        MealRecord {
            id: Uuid::new_v4(),
            date: date(d),
            time: NaiveTime::from_hms_opt(hour, 0, 0).unwrap(),
            name: "Meal".to_string(),
            protein_g,
            calories,
            notes: String::new(),
        }
    }

    fn workout(d: u32) -> WorkoutRecord {
        WorkoutRecord {
            id: Uuid::new_v4(),
            date: date(d),
            time: NaiveTime::from_hms_opt(18, 0, 0).unwrap(),
            workout_type: WorkoutType::Legs,
            duration_min: 45.0,
            intensity: Intensity::Moderate,
            notes: String::new(),
        }
    }

    fn supplement(d: u32, taken: bool) -> SupplementRecord {
        SupplementRecord {
            id: Uuid::new_v4(),
            date: date(d),
            supplement: Supplement::FishOil,
            time_of_day: TimeOfDay::WithMeal,
            taken,
        }
    }

    #[test]
    fn test_today_percent_of_goal() {
        let mut state = StoreState::default();
        state.meals = vec![meal(15, 8, 40.0, 500.0), meal(15, 13, 50.0, 500.0)];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert!((insights.today_protein_g - 90.0).abs() < 1e-9);
        assert!((insights.protein_percent - 60.0).abs() < 1e-9);
        assert!((insights.calories_percent - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_week_below_goal_suggestions() {
        let mut state = StoreState::default();
        let daily = [100.0, 120.0, 80.0, 90.0, 110.0, 95.0, 105.0];
        state.meals = daily
            .iter()
            .zip(9..)
            .map(|(p, d)| meal(d, 8, *p, 1800.0))
            .collect();

        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert!((insights.protein.avg_daily_g - 100.0).abs() < 1e-9);
        assert!(matches!(
            insights.protein.level,
            ProteinLevel::BelowGoal { shortfall_g } if (shortfall_g - 50.0).abs() < 1e-9
        ));
        assert_eq!(insights.protein.suggestions.len(), 3);
        assert!(insights.protein.suggestions[2].contains("50g"));

        state.profile.daily_protein_g = 100;
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert_eq!(insights.protein.level, ProteinLevel::AtOrAboveGoal);
        assert!(insights.protein.suggestions.is_empty());
    }

    #[test]
    fn test_workouts_in_window() {
        let mut state = StoreState::default();
        // June 7 falls outside [June 8, June 15]
        state.workouts = vec![workout(7), workout(8), workout(10), workout(12), workout(15)];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert_eq!(insights.workouts.count, 4);
        assert_eq!(insights.workouts.consistency, Consistency::Moderate);
        assert!((insights.workouts.total_minutes - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_workout_message_names_window_length() {
        let state = StoreState::default();
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert!(insights.workouts.message.contains("last 8 days"));

        let policy = InsightPolicy {
            window_days: 13,
            ..InsightPolicy::default()
        };
        let insights = Insights::build(&state, date(15), &policy);
        assert!(insights.workouts.message.contains("last 14 days"));
        assert!(!insights.workouts.message.contains("week"));
    }

    #[test]
    fn test_missed_supplements_in_window() {
        let mut state = StoreState::default();
        state.supplements = vec![
            supplement(14, false),
            supplement(14, true),
            supplement(1, false),
        ];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert_eq!(insights.missed_supplements.len(), 1);
        assert_eq!(insights.missed_supplements[0].id, state.supplements[0].id);
    }

    #[test]
    fn test_carry_forward_missed_protein() {
        let mut state = StoreState::default();
        state.meals = vec![meal(14, 12, 100.0, 900.0)];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert!((insights.carry_forward.yesterday_protein_g - 100.0).abs() < 1e-9);
        assert!((insights.carry_forward.missed_protein_g - 50.0).abs() < 1e-9);
        assert!((insights.carry_forward.adjusted_target_g - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_carry_forward_never_negative() {
        let mut state = StoreState::default();
        state.meals = vec![meal(14, 12, 210.0, 2500.0)];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert!(insights.carry_forward.missed_protein_g.abs() < f64::EPSILON);
        assert!((insights.carry_forward.adjusted_target_g - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_skipped_breakfast_flagged() {
        let mut state = StoreState::default();
        state.meals = vec![
            meal(12, 13, 40.0, 600.0),
            meal(13, 12, 40.0, 600.0),
            meal(14, 8, 30.0, 400.0),
            meal(14, 19, 40.0, 700.0),
        ];
        let insights = Insights::build(&state, date(15), &InsightPolicy::default());
        assert_eq!(insights.breakfast.logged_days, 3);
        assert_eq!(insights.breakfast.skipped_days, vec![date(12), date(13)]);
        assert!(insights.breakfast.flagged);
    }

    #[test]
    fn test_empty_state_insights() {
        let insights = Insights::build(&StoreState::default(), date(15), &InsightPolicy::default());
        assert!(insights.protein.avg_daily_g.abs() < f64::EPSILON);
        assert!(matches!(insights.protein.level, ProteinLevel::BelowGoal { .. }));
        assert_eq!(insights.workouts.consistency, Consistency::Low);
        assert!(!insights.breakfast.flagged);
        assert!(insights.missed_supplements.is_empty());
    }
}
