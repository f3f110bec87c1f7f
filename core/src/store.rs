use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Result, StoreError};
use crate::models::{
    MealRecord, NewMeal, NewSupplement, NewWorkout, Profile, StoreState, SupplementRecord,
    WorkoutRecord, validate_profile,
};

/// Read the store document. A missing file yields the default state.
pub fn load(path: &Path) -> Result<StoreState> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "store file absent, starting empty");
            return Ok(StoreState::default());
        }
        Err(source) => {
            return Err(StoreError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let state: StoreState = serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        meals = state.meals.len(),
        workouts = state.workouts.len(),
        supplements = state.supplements.len(),
        "loaded store"
    );
    Ok(state)
}

/// Overwrite the store document with `state`.
///
/// The document is written to a sibling temp file and renamed over the
/// target, so a failed write never leaves a half-written store behind.
pub fn save(path: &Path, state: &StoreState) -> Result<()> {
    let json = serde_json::to_string_pretty(state)?;
    let tmp = temp_path(path);
    let write_err = |source| StoreError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let result = fs::File::create(&tmp)
        .and_then(|mut f| {
            f.write_all(json.as_bytes())?;
            f.write_all(b"\n")?;
            f.sync_all()
        })
        .and_then(|()| fs::rename(&tmp, path));

    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(source));
    }
    debug!(path = %path.display(), bytes = json.len(), "saved store");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

/// `<file>.corrupt`, or `<file>.corrupt.N` for the first free N when an
/// earlier backup is already there.
fn corrupt_path(path: &Path) -> PathBuf {
    let base = path.file_name().unwrap_or_default().to_os_string();
    let mut name = base.clone();
    name.push(".corrupt");
    let mut candidate = path.with_file_name(&name);
    let mut n = 1u32;
    while candidate.exists() {
        let mut name = base.clone();
        name.push(format!(".corrupt.{n}"));
        candidate = path.with_file_name(name);
        n += 1;
    }
    candidate
}

/// In-memory store state bound to its durable file.
///
/// Every mutation runs as a one-step [`RecordStore::transact`], so after a
/// call returns the file and memory agree whether it succeeded or not.
pub struct RecordStore {
    path: PathBuf,
    state: StoreState,
}

impl RecordStore {
    /// Load the store at `path`. A corrupt file is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let state = load(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            state,
        })
    }

    /// Load the store at `path`, moving a corrupt file aside to
    /// `<file>.corrupt` and starting from defaults.
    pub fn open_or_reset(path: &Path) -> Result<Self> {
        match Self::open(path) {
            Err(e) if e.is_corrupt() => {
                let aside = corrupt_path(path);
                warn!(
                    path = %path.display(),
                    moved_to = %aside.display(),
                    error = %e,
                    "store file is corrupt, starting fresh"
                );
                fs::rename(path, &aside).map_err(|source| StoreError::Write {
                    path: aside.clone(),
                    source,
                })?;
                Ok(Self {
                    path: path.to_path_buf(),
                    state: StoreState::default(),
                })
            }
            other => other,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.state.profile
    }

    pub fn save(&self) -> Result<()> {
        save(&self.path, &self.state)
    }

    /// Apply `f` to the state and persist. If `f` or the write fails the
    /// state is restored to what it was before the call.
    pub fn transact<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut StoreState) -> Result<T>,
    {
        let snapshot = self.state.clone();
        let outcome = f(&mut self.state).and_then(|value| {
            save(&self.path, &self.state)?;
            Ok(value)
        });
        if outcome.is_err() {
            self.state = snapshot;
        }
        outcome
    }

    pub fn set_profile(&mut self, profile: Profile) -> Result<()> {
        validate_profile(&profile)?;
        self.transact(|state| {
            state.profile = profile;
            Ok(())
        })?;
        info!("profile updated");
        Ok(())
    }

    pub fn add_meal(&mut self, meal: NewMeal) -> Result<MealRecord> {
        let record = meal.into_record()?;
        self.transact(|state| {
            state.meals.push(record.clone());
            Ok(())
        })?;
        info!(id = %record.id, date = %record.date, "meal logged");
        Ok(record)
    }

    pub fn add_workout(&mut self, workout: NewWorkout) -> Result<WorkoutRecord> {
        let record = workout.into_record()?;
        self.transact(|state| {
            state.workouts.push(record.clone());
            Ok(())
        })?;
        info!(id = %record.id, date = %record.date, "workout logged");
        Ok(record)
    }

    pub fn add_supplement(&mut self, supplement: NewSupplement) -> Result<SupplementRecord> {
        let record = supplement.into_record()?;
        self.transact(|state| {
            state.supplements.push(record.clone());
            Ok(())
        })?;
        info!(id = %record.id, date = %record.date, "supplement logged");
        Ok(record)
    }

    /// Remove the meal with `id`. Returns false, without writing, if none matches.
    pub fn delete_meal(&mut self, id: Uuid) -> Result<bool> {
        let Some(idx) = self.state.meals.iter().position(|m| m.id == id) else {
            return Ok(false);
        };
        self.transact(|state| {
            state.meals.remove(idx);
            Ok(())
        })?;
        info!(%id, "meal deleted");
        Ok(true)
    }

    pub fn delete_workout(&mut self, id: Uuid) -> Result<bool> {
        let Some(idx) = self.state.workouts.iter().position(|w| w.id == id) else {
            return Ok(false);
        };
        self.transact(|state| {
            state.workouts.remove(idx);
            Ok(())
        })?;
        info!(%id, "workout deleted");
        Ok(true)
    }

    pub fn delete_supplement(&mut self, id: Uuid) -> Result<bool> {
        let Some(idx) = self.state.supplements.iter().position(|s| s.id == id) else {
            return Ok(false);
        };
        self.transact(|state| {
            state.supplements.remove(idx);
            Ok(())
        })?;
        info!(%id, "supplement deleted");
        Ok(true)
    }
}
