use std::fmt::Write;

use crate::models::{
    BudgetSlice, FilterCriteria, MoodTrendPoint, MoodType, Project, ProjectOverview,
    ProjectStatus, SeriesPoint, StatusSummary, TeamMember,
};
use crate::mood;

/// Static chart series shown alongside the live project and team data.
pub struct ChartSeries<'a> {
    pub revenue: &'a [SeriesPoint],
    pub budget: &'a [BudgetSlice],
    pub mood_trend: &'a [MoodTrendPoint],
}

pub fn summarize_by_status(projects: &[&Project]) -> Vec<StatusSummary> {
    let mut map: std::collections::HashMap<ProjectStatus, StatusSummary> =
        std::collections::HashMap::new();

    for project in projects {
        let entry = map.entry(project.status).or_insert(StatusSummary {
            status: project.status,
            count: 0,
            total_budget: 0,
            total_profitability: 0,
        });
        entry.count += 1;
        entry.total_budget = entry.total_budget.saturating_add(project.budget);
        entry.total_profitability = entry
            .total_profitability
            .saturating_add(project.profitability);
    }

    let mut summaries: Vec<StatusSummary> = map.into_values().collect();
    summaries.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.status.as_str().cmp(b.status.as_str()))
    });
    summaries
}

fn describe_criteria(criteria: &FilterCriteria) -> String {
    if criteria.is_empty() {
        return "all projects".to_string();
    }
    let mut parts = Vec::new();
    if !criteria.status.is_empty() {
        parts.push(format!("status {}", criteria.status));
    }
    if !criteria.client.is_empty() {
        parts.push(format!("client \"{}\"", criteria.client));
    }
    if !criteria.budget_range.is_empty() {
        parts.push(format!("budget {}", criteria.budget_range));
    }
    if parts.is_empty() {
        "all projects".to_string()
    } else {
        parts.join(", ")
    }
}

pub fn build_report(
    overview: &ProjectOverview,
    projects: &[&Project],
    criteria: &FilterCriteria,
    members: &[TeamMember],
    charts: &ChartSeries<'_>,
) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# Project Dashboard");
    let _ = writeln!(output, "Showing {}", describe_criteria(criteria));
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");
    let _ = writeln!(output, "- Total projects: {}", overview.total_projects);
    let _ = writeln!(output, "- Completed: {}", overview.completed);
    let _ = writeln!(output, "- Ongoing: {}", overview.ongoing);
    let _ = writeln!(output, "- Delayed: {}", overview.delayed);
    let _ = writeln!(output, "- Employees: {}", overview.employees);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Projects");

    if projects.is_empty() {
        let _ = writeln!(output, "No projects match the current filters.");
    } else {
        let _ = writeln!(output, "| Project | Budget | Profitability | Hours | Status |");
        let _ = writeln!(output, "|---|---|---|---|---|");
        for project in projects {
            let sign = if project.profitability < 0 { "▼" } else { "▲" };
            let _ = writeln!(
                output,
                "| {} | {} | {} {}€ | {} | {} ({}) |",
                project.name,
                project.budget,
                sign,
                project.profitability,
                project.hours,
                project.status.label(),
                project.over_by
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Status Mix");
    let summaries = summarize_by_status(projects);
    if summaries.is_empty() {
        let _ = writeln!(output, "No projects to summarize.");
    } else {
        for summary in &summaries {
            let _ = writeln!(
                output,
                "- {}: {} projects, budget {}, profitability {}",
                summary.status.label(),
                summary.count,
                summary.total_budget,
                summary.total_profitability
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Budget");
    for slice in charts.budget {
        let _ = writeln!(output, "- {}: {:.0}%", slice.label, slice.value);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Total Revenue");
    for point in charts.revenue {
        let _ = writeln!(output, "- {}: {:.0}", point.label, point.value);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Team Mood");

    if members.is_empty() {
        let _ = writeln!(output, "No team members recorded.");
    } else {
        for member in members {
            let note = member.mood.note.as_deref().unwrap_or("-");
            let _ = writeln!(
                output,
                "- {} {} ({}, {}): {} since {}",
                member.mood.current.emoji(),
                member.name,
                member.role,
                member.availability,
                note,
                member.mood.timestamp.format("%Y-%m-%d %H:%M")
            );
        }

        let _ = writeln!(output);
        let _ = writeln!(output, "### Distribution");
        for (mood, count) in mood::mood_stats(members) {
            let _ = writeln!(output, "- {} {}: {}", mood.emoji(), mood, count);
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "### Weekly Trend");
    for point in charts.mood_trend {
        let _ = writeln!(
            output,
            "- {}: {} {}, {} {}, {} {}",
            point.label,
            MoodType::Happy.emoji(),
            point.happy,
            MoodType::Neutral.emoji(),
            point.neutral,
            MoodType::Unhappy.emoji(),
            point.unhappy
        );
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::apply_filters;
    use crate::sample::{
        budget_breakdown, mood_trend, overview, revenue_series, sample_projects, sample_team,
    };

    #[test]
    fn summaries_group_by_status_largest_first() {
        let projects = sample_projects();
        let refs: Vec<&Project> = projects.iter().collect();
        let summaries = summarize_by_status(&refs);

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].status, ProjectStatus::Good);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].total_budget, 140000);
        let over = summaries
            .iter()
            .find(|s| s.status == ProjectStatus::Over)
            .unwrap();
        assert_eq!(over.total_profitability, -2500);
    }

    #[test]
    fn totals_saturate_instead_of_overflowing() {
        let mut projects = sample_projects();
        projects.truncate(2);
        for project in &mut projects {
            project.status = ProjectStatus::Over;
            project.budget = u64::MAX / 2 + 1;
            project.profitability = i64::MIN / 2 - 1;
        }
        let refs: Vec<&Project> = projects.iter().collect();

        let summaries = summarize_by_status(&refs);
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].count, 2);
        assert_eq!(summaries[0].total_budget, u64::MAX);
        assert_eq!(summaries[0].total_profitability, i64::MIN);
    }

    #[test]
    fn report_lists_filtered_projects_and_team() {
        let projects = sample_projects();
        let criteria = FilterCriteria {
            status: "over".to_string(),
            ..Default::default()
        };
        let filtered = apply_filters(&projects, &criteria);
        let team = sample_team().unwrap();
        let revenue = revenue_series();
        let budget = budget_breakdown();
        let trend = mood_trend();
        let charts = ChartSeries {
            revenue: &revenue,
            budget: &budget,
            mood_trend: &trend,
        };

        let report = build_report(&overview(), &filtered, &criteria, &team, &charts);

        assert!(report.contains("Showing status over"));
        assert!(report.contains("| Insurance App | 70000 | ▼ -2500€ |"));
        assert!(!report.contains("| Neo |"));
        assert!(report.contains("- Over Budget: 20%"));
        assert!(report.contains("- 19 June: 1000"));
        assert!(report.contains("Andrea (Product Manager, available)"));
        assert!(report.contains("- 😊 happy: 1"));
        assert!(report.contains("- Fri: 😊 5"));
    }

    #[test]
    fn empty_sections_render_placeholders() {
        let charts = ChartSeries {
            revenue: &[],
            budget: &[],
            mood_trend: &[],
        };
        let report = build_report(&overview(), &[], &FilterCriteria::default(), &[], &charts);
        assert!(report.contains("Showing all projects"));
        assert!(report.contains("No projects match the current filters."));
        assert!(report.contains("No team members recorded."));
    }
}
