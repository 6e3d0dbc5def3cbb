use std::str::FromStr;

use log::{debug, warn};
use serde::Deserialize;

use crate::models::{FilterCriteria, Project};

/// How the client criterion is matched against project names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientMatch {
    /// Keep projects whose name contains the text, ignoring case.
    #[default]
    Contains,
    /// Drop projects whose name contains the text. Kept for compatibility
    /// with exports produced by earlier dashboards.
    ExcludeContaining,
}

impl FromStr for ClientMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "contains" => Ok(Self::Contains),
            "exclude_containing" => Ok(Self::ExcludeContaining),
            other => Err(format!("unknown client match mode: {other}")),
        }
    }
}

/// Inclusive budget bounds parsed from a `"min-max"` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    pub min: f64,
    pub max: f64,
}

impl BudgetRange {
    /// Returns `None` unless both bounds are finite numbers.
    pub fn parse(value: &str) -> Option<Self> {
        let (min, max) = value.split_once('-')?;
        let min = parse_bound(min)?;
        let max = parse_bound(max)?;
        Some(Self { min, max })
    }

    pub fn contains(&self, budget: u64) -> bool {
        let budget = budget as f64;
        self.min <= budget && budget <= self.max
    }
}

fn parse_bound(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|value| value.is_finite())
}

pub fn apply_filters<'a>(projects: &'a [Project], criteria: &FilterCriteria) -> Vec<&'a Project> {
    apply_filters_with(projects, criteria, ClientMatch::default())
}

pub fn apply_filters_with<'a>(
    projects: &'a [Project],
    criteria: &FilterCriteria,
    client_match: ClientMatch,
) -> Vec<&'a Project> {
    let budget_range = if criteria.budget_range.is_empty() {
        None
    } else {
        let parsed = BudgetRange::parse(&criteria.budget_range);
        if parsed.is_none() {
            warn!(
                "Ignoring malformed budget range {:?}",
                criteria.budget_range
            );
        }
        parsed
    };

    if !criteria.date_range.is_empty() {
        debug!("Date range {:?} is not applied", criteria.date_range);
    }

    let client = criteria.client.to_lowercase();

    let filtered: Vec<&Project> = projects
        .iter()
        .filter(|project| {
            if !criteria.status.is_empty() && project.status.as_str() != criteria.status {
                return false;
            }

            if !client.is_empty() {
                let matches = project.name.to_lowercase().contains(&client);
                let keep = match client_match {
                    ClientMatch::Contains => matches,
                    ClientMatch::ExcludeContaining => !matches,
                };
                if !keep {
                    return false;
                }
            }

            match budget_range {
                Some(range) => range.contains(project.budget),
                None => true,
            }
        })
        .collect();

    debug!(
        "Filter kept {} of {} projects",
        filtered.len(),
        projects.len()
    );
    filtered
}
