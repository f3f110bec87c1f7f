use anyhow::{Result, bail};

use gainlog_core::models::Profile;
use gainlog_core::service::Tracker;

#[derive(Default)]
pub(crate) struct ProfileArgs {
    pub name: Option<String>,
    pub weight: Option<f64>,
    pub goal_weight: Option<f64>,
    pub protein: Option<u32>,
    pub calories: Option<u32>,
}

impl ProfileArgs {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.weight.is_none()
            && self.goal_weight.is_none()
            && self.protein.is_none()
            && self.calories.is_none()
    }

    /// Build the replacement profile: given fields override `current`.
    fn apply_to(self, current: &Profile) -> Profile {
        Profile {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            weight: self.weight.unwrap_or(current.weight),
            goal_weight: self.goal_weight.unwrap_or(current.goal_weight),
            daily_protein_g: self.protein.unwrap_or(current.daily_protein_g),
            daily_calories: self.calories.unwrap_or(current.daily_calories),
        }
    }
}

pub(crate) fn cmd_profile_set(tracker: &mut Tracker, args: ProfileArgs, json: bool) -> Result<()> {
    if args.is_empty() {
        bail!(
            "Nothing to update. Provide at least one of --name, --weight, --goal-weight, --protein, or --calories"
        );
    }
    let profile = args.apply_to(tracker.profile());
    let saved = tracker.set_profile(profile)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&saved)?);
    } else {
        println!("Profile saved");
        print_profile(&saved);
    }
    Ok(())
}

pub(crate) fn cmd_profile_show(tracker: &Tracker, json: bool) -> Result<()> {
    let profile = tracker.profile();
    if json {
        println!("{}", serde_json::to_string_pretty(profile)?);
    } else {
        print_profile(profile);
    }
    Ok(())
}

fn print_profile(p: &Profile) {
    let name = if p.name.is_empty() { "(unset)" } else { p.name.as_str() };
    println!("  Name:        {name}");
    println!("  Weight:      {:.1}", p.weight);
    println!("  Goal weight: {:.1}", p.goal_weight);
    println!("  Protein:     {}g/day", p.daily_protein_g);
    println!("  Calories:    {} kcal/day", p.daily_calories);
}
