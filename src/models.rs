use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Budget health of a project. Set by hand, never derived from the numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Over,
    Warning,
    Good,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Over => "over",
            Self::Warning => "warning",
            Self::Good => "good",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Over => "Over Budget",
            Self::Warning => "Warning",
            Self::Good => "Good",
        }
    }
}

impl FromStr for ProjectStatus {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "over" => Ok(Self::Over),
            "warning" => Ok(Self::Warning),
            "good" => Ok(Self::Good),
            _ => Err(ModelError::InvalidProjectStatus {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mood scale, declared from most to least positive so `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoodType {
    VeryHappy,
    Happy,
    Neutral,
    Unhappy,
    VeryUnhappy,
}

impl MoodType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::VeryHappy => "very_happy",
            Self::Happy => "happy",
            Self::Neutral => "neutral",
            Self::Unhappy => "unhappy",
            Self::VeryUnhappy => "very_unhappy",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::VeryHappy => "😄",
            Self::Happy => "😊",
            Self::Neutral => "😐",
            Self::Unhappy => "😕",
            Self::VeryUnhappy => "😢",
        }
    }
}

impl FromStr for MoodType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "very_happy" => Ok(Self::VeryHappy),
            "happy" => Ok(Self::Happy),
            "neutral" => Ok(Self::Neutral),
            "unhappy" => Ok(Self::Unhappy),
            "very_unhappy" => Ok(Self::VeryUnhappy),
            _ => Err(ModelError::InvalidMood {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for MoodType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    Available,
    Meeting,
    Busy,
    Offline,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Meeting => "meeting",
            Self::Busy => "busy",
            Self::Offline => "offline",
        }
    }
}

impl FromStr for Availability {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "meeting" => Ok(Self::Meeting),
            "busy" => Ok(Self::Busy),
            "offline" => Ok(Self::Offline),
            _ => Err(ModelError::InvalidAvailability {
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<String>,
    pub budget: u64,
    pub profitability: i64,
    pub hours: String,
    pub status: ProjectStatus,
    pub over_by: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

/// Current mood of a member; mirrors the newest history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodSnapshot {
    pub current: MoodType,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub mood: MoodType,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl MoodEntry {
    pub fn snapshot(&self) -> MoodSnapshot {
        MoodSnapshot {
            current: self.mood,
            timestamp: self.timestamp,
            note: self.note.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    pub id: String,
    pub name: String,
    pub role: String,
    pub availability: Availability,
    pub mood: MoodSnapshot,
    /// Newest first.
    pub mood_history: Vec<MoodEntry>,
}

/// User-entered project constraints. Empty strings mean "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    pub status: String,
    pub client: String,
    pub budget_range: String,
    pub date_range: String,
}

impl FilterCriteria {
    pub fn is_empty(&self) -> bool {
        self.status.is_empty()
            && self.client.is_empty()
            && self.budget_range.is_empty()
            && self.date_range.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BudgetSlice {
    pub label: String,
    pub value: f64,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MoodTrendPoint {
    pub label: String,
    pub happy: u32,
    pub neutral: u32,
    pub unhappy: u32,
}

/// Headline counts shown above the charts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectOverview {
    pub total_projects: u32,
    pub completed: u32,
    pub ongoing: u32,
    pub delayed: u32,
    pub employees: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSummary {
    pub status: ProjectStatus,
    pub count: usize,
    pub total_budget: u64,
    pub total_profitability: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_parse_from_their_wire_names() {
        for status in [ProjectStatus::Over, ProjectStatus::Warning, ProjectStatus::Good] {
            assert_eq!(status.as_str().parse::<ProjectStatus>().unwrap(), status);
        }
        assert!("late".parse::<ProjectStatus>().is_err());
    }

    #[test]
    fn moods_order_from_most_to_least_positive() {
        let mut moods = vec![MoodType::Unhappy, MoodType::VeryHappy, MoodType::Neutral];
        moods.sort();
        assert_eq!(
            moods,
            vec![MoodType::VeryHappy, MoodType::Neutral, MoodType::Unhappy]
        );
        assert_eq!("very_unhappy".parse::<MoodType>().unwrap(), MoodType::VeryUnhappy);
        assert!("ecstatic".parse::<MoodType>().is_err());
    }

    #[test]
    fn project_serializes_with_camel_case_keys() {
        let project = Project {
            name: "Neo".to_string(),
            client: None,
            budget: 70000,
            profitability: 4000,
            hours: "1:00".to_string(),
            status: ProjectStatus::Warning,
            over_by: "800 left hours".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 15),
            end_date: None,
        };

        let json = serde_json::to_value(&project).unwrap();
        assert_eq!(json["overBy"], "800 left hours");
        assert_eq!(json["status"], "warning");
        assert_eq!(json["startDate"], "2024-01-15");
        assert!(json.get("client").is_none());
        assert!(json.get("endDate").is_none());
    }

    #[test]
    fn empty_criteria_is_empty() {
        let mut criteria = FilterCriteria::default();
        assert!(criteria.is_empty());
        criteria.date_range = "01/01/2024 - 02/01/2024".to_string();
        assert!(!criteria.is_empty());
    }
}
