//models.rs
use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Goal {
    WeightLoss,
    MuscleGain,
    FlexibilityMaintenance,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::WeightLoss, Goal::MuscleGain, Goal::FlexibilityMaintenance];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::WeightLoss => "Weight Loss",
            Goal::MuscleGain => "Muscle Gain",
            Goal::FlexibilityMaintenance => "Flexibility & Maintenance",
        }
    }
}

impl From<Goal> for u8 {
    fn from(goal: Goal) -> u8 {
        match goal {
            Goal::WeightLoss => 0,
            Goal::MuscleGain => 1,
            Goal::FlexibilityMaintenance => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownGoal(pub u8);

impl fmt::Display for UnknownGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown goal code {}", self.0)
    }
}

impl std::error::Error for UnknownGoal {}

impl TryFrom<u8> for Goal {
    type Error = UnknownGoal;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Goal::WeightLoss),
            1 => Ok(Goal::MuscleGain),
            2 => Ok(Goal::FlexibilityMaintenance),
            other => Err(UnknownGoal(other)),
        }
    }
}

/// The fitness parameters sent to the recommendation service.
///
/// Bounds on the numeric fields are hints for the form only; values outside
/// them are kept and submitted as typed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub difficulty: i32,
    pub duration: i32,
    pub intensity: i32,
    pub goal: Goal,
}

impl Default for Profile {
    fn default() -> Self {
        Profile {
            difficulty: 3,
            duration: 30,
            intensity: 3,
            goal: Goal::WeightLoss,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileField {
    Difficulty,
    Duration,
    Intensity,
    Goal,
}

impl ProfileField {
    pub const NUMERIC: [ProfileField; 3] = [
        ProfileField::Difficulty,
        ProfileField::Duration,
        ProfileField::Intensity,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ProfileField::Difficulty => "Desired Difficulty (1-5)",
            ProfileField::Duration => "Workout Duration (min)",
            ProfileField::Intensity => "Exercise Intensity (1-5)",
            ProfileField::Goal => "Fitness Goal",
        }
    }

    /// Suggested input range, inclusive.
    pub fn bounds(&self) -> (i32, i32) {
        match self {
            ProfileField::Difficulty | ProfileField::Intensity => (1, 5),
            ProfileField::Duration => (15, 90),
            ProfileField::Goal => (0, 2),
        }
    }
}

/// A single-field change to a [`Profile`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldEdit {
    Difficulty(i32),
    Duration(i32),
    Intensity(i32),
    Goal(Goal),
}

impl FieldEdit {
    /// Parses raw form input for `field` from its leading integer, so `"45abc"` is 45
    /// and `"4.5"` is 4. Returns `None` when the text has no leading integer
    /// (or, for the goal, is not a known goal code).
    pub fn parse(field: ProfileField, raw: &str) -> Option<FieldEdit> {
        let value = leading_integer(raw)?;
        match field {
            ProfileField::Difficulty => Some(FieldEdit::Difficulty(value)),
            ProfileField::Duration => Some(FieldEdit::Duration(value)),
            ProfileField::Intensity => Some(FieldEdit::Intensity(value)),
            ProfileField::Goal => {
                let code = u8::try_from(value).ok()?;
                Goal::try_from(code).ok().map(FieldEdit::Goal)
            }
        }
    }
}

fn leading_integer(raw: &str) -> Option<i32> {
    let text = raw.trim_start();
    let sign_len = usize::from(text.starts_with(['+', '-']));
    let digits = text[sign_len..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(text.len() - sign_len);
    if digits == 0 {
        return None;
    }
    text[..sign_len + digits].parse().ok()
}

impl Profile {
    pub fn apply(&mut self, edit: FieldEdit) {
        match edit {
            FieldEdit::Difficulty(value) => self.difficulty = value,
            FieldEdit::Duration(value) => self.duration = value,
            FieldEdit::Intensity(value) => self.intensity = value,
            FieldEdit::Goal(goal) => self.goal = goal,
        }
    }

    pub fn value(&self, field: ProfileField) -> i32 {
        match field {
            ProfileField::Difficulty => self.difficulty,
            ProfileField::Duration => self.duration,
            ProfileField::Intensity => self.intensity,
            ProfileField::Goal => i32::from(u8::from(self.goal)),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorkoutItem {
    pub name: String,
    pub description: String,
    pub difficulty: i32,
    pub duration: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NutritionItem {
    pub name: String,
    pub description: String,
    pub calories: i32,
    pub protein: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub carbs: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fats: Option<i32>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub workouts: Vec<WorkoutItem>,
    pub nutrition: Vec<NutritionItem>,
}

impl RecommendationBundle {
    /// Workout cards first, then nutrition cards, each in the order the service returned them.
    pub fn cards(&self) -> impl Iterator<Item = RecommendationCard<'_>> {
        self.workouts
            .iter()
            .map(RecommendationCard::Workout)
            .chain(self.nutrition.iter().map(RecommendationCard::Nutrition))
    }

    pub fn card_count(&self) -> usize {
        self.workouts.len() + self.nutrition.len()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CardKind {
    Workout,
    Nutrition,
}

impl CardKind {
    pub const ALL: [CardKind; 2] = [CardKind::Workout, CardKind::Nutrition];

    pub fn heading(&self) -> &'static str {
        match self {
            CardKind::Workout => "Workout Plans",
            CardKind::Nutrition => "Nutrition Guide",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: String,
}

impl Stat {
    fn new(label: &'static str, value: String) -> Self {
        Stat { label, value }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RecommendationCard<'a> {
    Workout(&'a WorkoutItem),
    Nutrition(&'a NutritionItem),
}

impl<'a> RecommendationCard<'a> {
    pub fn kind(&self) -> CardKind {
        match self {
            RecommendationCard::Workout(_) => CardKind::Workout,
            RecommendationCard::Nutrition(_) => CardKind::Nutrition,
        }
    }

    pub fn title(&self) -> &'a str {
        match *self {
            RecommendationCard::Workout(item) => &item.name,
            RecommendationCard::Nutrition(item) => &item.name,
        }
    }

    pub fn description(&self) -> &'a str {
        match *self {
            RecommendationCard::Workout(item) => &item.description,
            RecommendationCard::Nutrition(item) => &item.description,
        }
    }

    pub fn stats(&self) -> Vec<Stat> {
        match self {
            RecommendationCard::Workout(item) => {
                let mut stats = vec![
                    Stat::new("Difficulty", format!("{}/5", item.difficulty)),
                    Stat::new("Duration", format!("{} min", item.duration)),
                ];
                if let Some(intensity) = item.intensity {
                    stats.push(Stat::new("Intensity", format!("{}/5", intensity)));
                }
                stats
            }
            RecommendationCard::Nutrition(item) => {
                let mut stats = vec![
                    Stat::new("Calories", format!("{} kcal", item.calories)),
                    Stat::new("Protein", format!("{}g", item.protein)),
                ];
                if let Some(carbs) = item.carbs {
                    stats.push(Stat::new("Carbs", format!("{}g", carbs)));
                }
                if let Some(fats) = item.fats {
                    stats.push(Stat::new("Fats", format!("{}g", fats)));
                }
                stats
            }
        }
    }
}
