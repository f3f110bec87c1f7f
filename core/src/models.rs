use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::policy::{DEFAULT_DAILY_CALORIES, DEFAULT_DAILY_PROTEIN_G};

/// Anything that carries a calendar date used for grouping and windowing.
pub trait Dated {
    fn date(&self) -> NaiveDate;

    /// Time of day, when the record has one. Used only as a sort tiebreak.
    fn time(&self) -> Option<NaiveTime> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub weight: f64,
    pub goal_weight: f64,
    pub daily_protein_g: u32,
    pub daily_calories: u32,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            name: String::new(),
            weight: 0.0,
            goal_weight: 0.0,
            daily_protein_g: DEFAULT_DAILY_PROTEIN_G,
            daily_calories: DEFAULT_DAILY_CALORIES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub name: String,
    pub protein_g: f64,
    pub calories: f64,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub workout_type: WorkoutType,
    pub duration_min: f64,
    pub intensity: Intensity,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplementRecord {
    pub id: Uuid,
    pub date: NaiveDate,
    pub supplement: Supplement,
    pub time_of_day: TimeOfDay,
    #[serde(default = "default_taken")]
    pub taken: bool,
}

fn default_taken() -> bool {
    true
}

impl Dated for MealRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn time(&self) -> Option<NaiveTime> {
        Some(self.time)
    }
}

impl Dated for WorkoutRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn time(&self) -> Option<NaiveTime> {
        Some(self.time)
    }
}

impl Dated for SupplementRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl<T: Dated> Dated for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }

    fn time(&self) -> Option<NaiveTime> {
        (**self).time()
    }
}

/// The whole persisted document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    #[serde(default)]
    pub profile: Profile,
    #[serde(default)]
    pub meals: Vec<MealRecord>,
    #[serde(default)]
    pub workouts: Vec<WorkoutRecord>,
    #[serde(default)]
    pub supplements: Vec<SupplementRecord>,
}

// --- Creation inputs ---

#[derive(Debug, Clone)]
pub struct NewMeal {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub name: String,
    pub protein_g: f64,
    pub calories: f64,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub workout_type: WorkoutType,
    pub duration_min: f64,
    pub intensity: Intensity,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct NewSupplement {
    pub date: NaiveDate,
    pub supplement: Supplement,
    pub time_of_day: TimeOfDay,
    pub taken: bool,
}

impl NewMeal {
    pub(crate) fn into_record(self) -> Result<MealRecord> {
        validate_name("Meal name", &self.name)?;
        validate_non_negative("protein_g", self.protein_g)?;
        validate_non_negative("calories", self.calories)?;
        Ok(MealRecord {
            id: Uuid::new_v4(),
            date: self.date,
            time: whole_minute(self.time),
            name: self.name.trim().to_string(),
            protein_g: self.protein_g,
            calories: self.calories,
            notes: self.notes,
        })
    }
}

impl NewWorkout {
    pub(crate) fn into_record(self) -> Result<WorkoutRecord> {
        validate_non_negative("duration_min", self.duration_min)?;
        if let WorkoutType::Custom(label) = &self.workout_type {
            validate_name("Custom workout type", label)?;
        }
        // A custom label that spells a built-in type is stored as that type.
        let workout_type = WorkoutType::from(String::from(self.workout_type));
        Ok(WorkoutRecord {
            id: Uuid::new_v4(),
            date: self.date,
            time: whole_minute(self.time),
            workout_type,
            duration_min: self.duration_min,
            intensity: self.intensity,
            notes: self.notes,
        })
    }
}

impl NewSupplement {
    pub(crate) fn into_record(self) -> Result<SupplementRecord> {
        if let Supplement::Other(label) = &self.supplement {
            validate_name("Supplement name", label)?;
        }
        let supplement = Supplement::from(String::from(self.supplement));
        Ok(SupplementRecord {
            id: Uuid::new_v4(),
            date: self.date,
            supplement,
            time_of_day: self.time_of_day,
            taken: self.taken,
        })
    }
}

// --- Validation ---

pub fn validate_profile(profile: &Profile) -> Result<()> {
    validate_non_negative("weight", profile.weight)?;
    validate_non_negative("goal_weight", profile.goal_weight)?;
    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(StoreError::validation(format!("{field} must be a finite number")));
    }
    if value < 0.0 {
        return Err(StoreError::validation(format!("{field} must not be negative")));
    }
    Ok(())
}

fn validate_name(what: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::validation(format!("{what} must not be empty")));
    }
    Ok(())
}

/// Parse a `HH:MM` clock time.
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), hhmm::FORMAT).map_err(|_| {
        StoreError::validation(format!("Invalid time '{s}'. Must be HH:MM"))
    })
}

/// Records keep minute precision, the same precision they are stored with.
fn whole_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// Lowercase and drop separators so "Very Hard", "very-hard" and "VERY_HARD" compare equal.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

// --- Enumerations ---

pub const WORKOUT_TYPES: &[&str] = &[
    "Push",
    "Pull",
    "Legs",
    "Upper Body",
    "Lower Body",
    "Full Body",
    "Cardio",
    "HIIT",
    "Yoga",
];

/// Workout category. Anything outside the fixed set is kept as `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum WorkoutType {
    Push,
    Pull,
    Legs,
    UpperBody,
    LowerBody,
    FullBody,
    Cardio,
    Hiit,
    Yoga,
    Custom(String),
}

impl WorkoutType {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Push => "Push",
            Self::Pull => "Pull",
            Self::Legs => "Legs",
            Self::UpperBody => "Upper Body",
            Self::LowerBody => "Lower Body",
            Self::FullBody => "Full Body",
            Self::Cardio => "Cardio",
            Self::Hiit => "HIIT",
            Self::Yoga => "Yoga",
            Self::Custom(label) => label,
        }
    }

    fn known(s: &str) -> Option<Self> {
        let found = match normalize(s).as_str() {
            "push" => Self::Push,
            "pull" => Self::Pull,
            "legs" => Self::Legs,
            "upperbody" => Self::UpperBody,
            "lowerbody" => Self::LowerBody,
            "fullbody" => Self::FullBody,
            "cardio" => Self::Cardio,
            "hiit" => Self::Hiit,
            "yoga" => Self::Yoga,
            _ => return None,
        };
        Some(found)
    }
}

impl From<String> for WorkoutType {
    fn from(s: String) -> Self {
        Self::known(&s).unwrap_or(Self::Custom(s))
    }
}

impl From<WorkoutType> for String {
    fn from(t: WorkoutType) -> Self {
        match t {
            WorkoutType::Custom(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for WorkoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkoutType {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        validate_name("Workout type", s)?;
        Ok(Self::from(s.to_string()))
    }
}

pub const INTENSITIES: &[&str] = &["Light", "Moderate", "Hard", "Very Hard"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Moderate,
    Hard,
    #[serde(rename = "Very Hard")]
    VeryHard,
}

impl Intensity {
    #[must_use]
    pub fn label(self) -> &'static str {
        INTENSITIES[self as usize]
    }
}

impl fmt::Display for Intensity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Intensity {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "hard" => Ok(Self::Hard),
            "veryhard" => Ok(Self::VeryHard),
            _ => Err(StoreError::validation(format!(
                "Invalid intensity '{s}'. Must be one of: {}",
                INTENSITIES.join(", ")
            ))),
        }
    }
}

pub const SUPPLEMENTS: &[&str] = &[
    "Multivitamin",
    "Protein Shake",
    "Creatine",
    "Fish Oil",
    "Vitamin D",
    "Magnesium",
    "Pre-Workout",
    "BCAA",
];

/// Supplement name. Anything outside the fixed set is kept as `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Supplement {
    Multivitamin,
    ProteinShake,
    Creatine,
    FishOil,
    VitaminD,
    Magnesium,
    PreWorkout,
    Bcaa,
    Other(String),
}

impl Supplement {
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Multivitamin => "Multivitamin",
            Self::ProteinShake => "Protein Shake",
            Self::Creatine => "Creatine",
            Self::FishOil => "Fish Oil",
            Self::VitaminD => "Vitamin D",
            Self::Magnesium => "Magnesium",
            Self::PreWorkout => "Pre-Workout",
            Self::Bcaa => "BCAA",
            Self::Other(label) => label,
        }
    }

    fn known(s: &str) -> Option<Self> {
        let found = match normalize(s).as_str() {
            "multivitamin" => Self::Multivitamin,
            "proteinshake" => Self::ProteinShake,
            "creatine" => Self::Creatine,
            "fishoil" => Self::FishOil,
            "vitamind" => Self::VitaminD,
            "magnesium" => Self::Magnesium,
            "preworkout" => Self::PreWorkout,
            "bcaa" => Self::Bcaa,
            _ => return None,
        };
        Some(found)
    }
}

impl From<String> for Supplement {
    fn from(s: String) -> Self {
        Self::known(&s).unwrap_or(Self::Other(s))
    }
}

impl From<Supplement> for String {
    fn from(s: Supplement) -> Self {
        match s {
            Supplement::Other(label) => label,
            other => other.label().to_string(),
        }
    }
}

impl fmt::Display for Supplement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Supplement {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        validate_name("Supplement name", s)?;
        Ok(Self::from(s.to_string()))
    }
}

pub const TIMES_OF_DAY: &[&str] = &[
    "Morning",
    "Pre-Workout",
    "Post-Workout",
    "With Meal",
    "Evening",
    "Bedtime",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    #[serde(rename = "Pre-Workout")]
    PreWorkout,
    #[serde(rename = "Post-Workout")]
    PostWorkout,
    #[serde(rename = "With Meal")]
    WithMeal,
    Evening,
    Bedtime,
}

impl TimeOfDay {
    #[must_use]
    pub fn label(self) -> &'static str {
        TIMES_OF_DAY[self as usize]
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeOfDay {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match normalize(s).as_str() {
            "morning" => Ok(Self::Morning),
            "preworkout" => Ok(Self::PreWorkout),
            "postworkout" => Ok(Self::PostWorkout),
            "withmeal" => Ok(Self::WithMeal),
            "evening" => Ok(Self::Evening),
            "bedtime" => Ok(Self::Bedtime),
            _ => Err(StoreError::validation(format!(
                "Invalid time of day '{s}'. Must be one of: {}",
                TIMES_OF_DAY.join(", ")
            ))),
        }
    }
}

/// `HH:MM` serde representation for clock times.
///
/// Times with seconds are written as `HH:MM:SS[.fff]` so nothing is lost.
mod hhmm {
    use chrono::{NaiveTime, Timelike};
    use serde::{Deserialize, Deserializer, Serializer};

    pub(super) const FORMAT: &str = "%H:%M";
    const FORMAT_SECONDS: &str = "%H:%M:%S";
    const FORMAT_FRACTION: &str = "%H:%M:%S%.f";

    pub(super) fn serialize<S: Serializer>(time: &NaiveTime, ser: S) -> Result<S::Ok, S::Error> {
        let format = match (time.second(), time.nanosecond()) {
            (0, 0) => FORMAT,
            (_, 0) => FORMAT_SECONDS,
            _ => FORMAT_FRACTION,
        };
        ser.collect_str(&time.format(format))
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveTime, D::Error> {
        let s = String::deserialize(de)?;
        [FORMAT, FORMAT_SECONDS, FORMAT_FRACTION]
            .iter()
            .find_map(|f| NaiveTime::parse_from_str(&s, f).ok())
            .ok_or_else(|| serde::de::Error::custom(format!("invalid time '{s}', expected HH:MM")))
    }
}
