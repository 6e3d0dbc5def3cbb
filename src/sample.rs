use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use log::{debug, info};

use crate::models::{
    Availability, BudgetSlice, MoodEntry, MoodTrendPoint, MoodType, Project, ProjectOverview,
    ProjectStatus, SeriesPoint, TeamMember,
};

/// Read-only, ordered project collection backing the dashboard.
#[derive(Debug, Clone, Default)]
pub struct ProjectStore {
    projects: Vec<Project>,
}

impl ProjectStore {
    pub fn new(projects: Vec<Project>) -> Self {
        Self { projects }
    }

    pub fn sample() -> Self {
        Self::new(sample_projects())
    }

    pub fn from_csv_path(csv_path: &Path) -> anyhow::Result<Self> {
        #[derive(serde::Deserialize)]
        struct CsvRow {
            name: String,
            client: Option<String>,
            budget: u64,
            profitability: i64,
            hours: String,
            status: String,
            over_by: String,
            start_date: Option<NaiveDate>,
            end_date: Option<NaiveDate>,
        }

        let mut reader = csv::Reader::from_path(csv_path)
            .with_context(|| format!("failed to open {}", csv_path.display()))?;
        let mut projects = Vec::new();

        for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
            // header occupies line 1
            let line = index + 2;
            let row = result
                .with_context(|| format!("{} line {line}: malformed row", csv_path.display()))?;
            let status: ProjectStatus = row
                .status
                .parse()
                .with_context(|| format!("{} line {line}", csv_path.display()))?;

            projects.push(Project {
                name: row.name,
                client: row.client.filter(|client| !client.is_empty()),
                budget: row.budget,
                profitability: row.profitability,
                hours: row.hours,
                status,
                over_by: row.over_by,
                start_date: row.start_date,
                end_date: row.end_date,
            });
        }

        info!(
            "Imported {} projects from {}",
            projects.len(),
            csv_path.display()
        );
        Ok(Self::new(projects))
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }
}

pub fn sample_projects() -> Vec<Project> {
    let projects = vec![
        ("Insurance App", -2500, ProjectStatus::Over, "100 hours over Budget!"),
        ("Neo", 4000, ProjectStatus::Warning, "800 left hours"),
        ("VR Website", 4000, ProjectStatus::Good, "2000 left hours"),
        ("VR Website", 4000, ProjectStatus::Good, "1600 left hours"),
    ];

    projects
        .into_iter()
        .map(|(name, profitability, status, over_by)| Project {
            name: name.to_string(),
            client: None,
            budget: 70000,
            profitability,
            hours: "1:00".to_string(),
            status,
            over_by: over_by.to_string(),
            start_date: None,
            end_date: None,
        })
        .collect()
}

fn timestamp(y: i32, m: u32, d: u32, h: u32, min: u32) -> anyhow::Result<DateTime<Utc>> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0)
        .single()
        .context("invalid timestamp")
}

fn member(
    id: &str,
    name: &str,
    role: &str,
    availability: Availability,
    history: Vec<MoodEntry>,
) -> anyhow::Result<TeamMember> {
    let mood = history
        .first()
        .map(MoodEntry::snapshot)
        .with_context(|| format!("member {id} has no mood history"))?;

    Ok(TeamMember {
        id: id.to_string(),
        name: name.to_string(),
        role: role.to_string(),
        availability,
        mood,
        mood_history: history,
    })
}

pub fn sample_team() -> anyhow::Result<Vec<TeamMember>> {
    let andrea = member(
        "1",
        "Andrea",
        "Product Manager",
        Availability::Available,
        vec![
            MoodEntry {
                mood: MoodType::Happy,
                timestamp: timestamp(2024, 2, 23, 9, 0)?,
                note: Some("Great progress on new features!".to_string()),
            },
            MoodEntry {
                mood: MoodType::Neutral,
                timestamp: timestamp(2024, 2, 22, 9, 0)?,
                note: Some("Busy day ahead".to_string()),
            },
        ],
    )?;

    let alvaro = member(
        "2",
        "Alvaro",
        "Dev and Manager",
        Availability::Meeting,
        vec![
            MoodEntry {
                mood: MoodType::VeryHappy,
                timestamp: timestamp(2024, 2, 23, 8, 30)?,
                note: Some("Sprint goals achieved!".to_string()),
            },
            MoodEntry {
                mood: MoodType::Happy,
                timestamp: timestamp(2024, 2, 22, 8, 30)?,
                note: None,
            },
        ],
    )?;

    debug!("Loaded sample team");
    Ok(vec![andrea, alvaro])
}

pub fn revenue_series() -> Vec<SeriesPoint> {
    [
        ("19 June", 1000.0),
        ("20 June", 3500.0),
        ("21 June", 3700.0),
        ("22 June", 4000.0),
        ("23 June", 5000.0),
        ("24 June", 6500.0),
        ("25 June", 6500.0),
    ]
    .into_iter()
    .map(|(label, value)| SeriesPoint {
        label: label.to_string(),
        value,
    })
    .collect()
}

pub fn budget_breakdown() -> Vec<BudgetSlice> {
    [
        ("Over Budget", 20.0, "#FF4B55"),
        ("On Budget", 30.0, "#8884d8"),
        ("Under Budget", 50.0, "#36D7B7"),
    ]
    .into_iter()
    .map(|(label, value, color)| BudgetSlice {
        label: label.to_string(),
        value,
        color: color.to_string(),
    })
    .collect()
}

pub fn mood_trend() -> Vec<MoodTrendPoint> {
    [
        ("Mon", 4, 1, 0),
        ("Tue", 3, 2, 0),
        ("Wed", 2, 2, 1),
        ("Thu", 4, 1, 0),
        ("Fri", 5, 0, 0),
    ]
    .into_iter()
    .map(|(label, happy, neutral, unhappy)| MoodTrendPoint {
        label: label.to_string(),
        happy,
        neutral,
        unhappy,
    })
    .collect()
}

pub fn overview() -> ProjectOverview {
    ProjectOverview {
        total_projects: 5,
        completed: 1,
        ongoing: 3,
        delayed: 1,
        employees: 5,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn sample_team_keeps_current_mood_in_sync_with_history() {
        let team = sample_team().unwrap();
        assert_eq!(team.len(), 2);
        for member in &team {
            assert_eq!(member.mood.current, member.mood_history[0].mood);
            assert_eq!(member.mood.timestamp, member.mood_history[0].timestamp);
        }
        assert_eq!(team[0].id, "1");
        assert_eq!(team[1].mood.current, MoodType::VeryHappy);
    }

    #[test]
    fn sample_store_preserves_declared_order() {
        let store = ProjectStore::sample();
        let names: Vec<&str> = store.projects().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Insurance App", "Neo", "VR Website", "VR Website"]);
        assert!(store.projects().iter().all(|p| p.budget == 70000));
    }

    #[test]
    fn imports_projects_from_csv() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name,client,budget,profitability,hours,status,over_by,start_date,end_date"
        )
        .unwrap();
        writeln!(file, "Neo,Acme,70000,4000,1:00,warning,800 left hours,2024-01-01,").unwrap();
        writeln!(file, "Atlas,,120000,-300,12:30,over,20 hours over,,").unwrap();
        file.flush().unwrap();

        let store = ProjectStore::from_csv_path(file.path()).unwrap();
        assert_eq!(store.len(), 2);
        let neo = &store.projects()[0];
        assert_eq!(neo.client.as_deref(), Some("Acme"));
        assert_eq!(neo.status, ProjectStatus::Warning);
        assert_eq!(neo.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
        assert_eq!(neo.end_date, None);
        let atlas = &store.projects()[1];
        assert_eq!(atlas.client, None);
        assert_eq!(atlas.profitability, -300);
    }

    #[test]
    fn import_rejects_unknown_status_with_line_number() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "name,client,budget,profitability,hours,status,over_by,start_date,end_date"
        )
        .unwrap();
        writeln!(file, "Neo,Acme,70000,4000,1:00,late,800 left hours,,").unwrap();
        file.flush().unwrap();

        let err = ProjectStore::from_csv_path(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("line 2"));
    }
}
