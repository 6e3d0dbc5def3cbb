use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

mod config;
mod error;
mod export;
mod filter;
mod logger;
mod models;
mod mood;
mod report;
mod sample;
mod state;

use crate::config::Config;
use crate::export::{DirectoryDownload, ExportFormat};
use crate::filter::ClientMatch;
use crate::models::MoodType;
use crate::sample::ProjectStore;
use crate::state::{Action, DashboardState, FilterField};

#[derive(Parser)]
#[command(name = "project-dashboard")]
#[command(about = "Project budget, profitability and team mood dashboard", long_about = None)]
struct Cli {
    /// Load projects from a CSV file instead of the built-in sample set
    #[arg(long, global = true)]
    projects: Option<PathBuf>,

    /// Config file (defaults to DASHBOARD_CONFIG or ./dashboard.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Default)]
struct FilterArgs {
    /// Keep only projects with this status (over, warning, good)
    #[arg(long, default_value = "")]
    status: String,
    /// Match project names containing this text
    #[arg(long, default_value = "")]
    client: String,
    /// Inclusive budget bounds, e.g. 50000-100000
    #[arg(long, default_value = "")]
    budget_range: String,
    /// Accepted but not applied
    #[arg(long, default_value = "")]
    date_range: String,
    /// Drop projects matching --client instead of keeping them
    #[arg(long)]
    legacy_client_filter: bool,
}

impl FilterArgs {
    fn actions(self) -> Vec<Action> {
        [
            (FilterField::Status, self.status),
            (FilterField::Client, self.client),
            (FilterField::BudgetRange, self.budget_range),
            (FilterField::DateRange, self.date_range),
        ]
        .into_iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(field, value)| Action::SetFilter(field, value))
        .collect()
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List projects after filtering
    Projects {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Export the filtered projects
    Export {
        #[arg(long, value_enum)]
        format: ExportFormat,
        /// Directory to save into (defaults to export.out_dir)
        #[arg(long)]
        out_dir: Option<PathBuf>,
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show team members and their moods
    Team,
    /// Record a new mood for a team member
    Mood {
        #[arg(long)]
        member: String,
        #[arg(long)]
        mood: MoodType,
        #[arg(long, default_value = "")]
        note: String,
    },
    /// Generate a markdown dashboard report
    Report {
        #[arg(long, default_value = "dashboard.md")]
        out: PathBuf,
        #[command(flatten)]
        filters: FilterArgs,
    },
}

fn build_state(
    projects: Option<&std::path::Path>,
    client_match: ClientMatch,
    filters: Option<FilterArgs>,
) -> anyhow::Result<DashboardState> {
    let store = match projects {
        Some(path) => ProjectStore::from_csv_path(path)?,
        None => ProjectStore::sample(),
    };
    if store.is_empty() {
        log::warn!("No projects loaded");
    } else {
        log::debug!("Loaded {} projects", store.len());
    }
    let team = sample::sample_team()?;

    let filters = filters.unwrap_or_default();
    let client_match = if filters.legacy_client_filter {
        ClientMatch::ExcludeContaining
    } else {
        client_match
    };

    let mut state = DashboardState::new(store, team, client_match);
    state.dispatch(Action::OpenFilters);
    state.dispatch(Action::ResetFilters);
    for action in filters.actions() {
        state.dispatch(action);
    }
    state.dispatch(Action::CloseModal);
    Ok(state)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    config.validate()?;
    logger::initialize(
        config.logging.level,
        config.logging.file.as_deref(),
        config.logging.colored,
    )?;
    config.log_summary();

    let projects = cli.projects.as_deref();
    let client_match = config.export.client_match;

    match cli.command {
        Commands::Projects { filters } => {
            let state = build_state(projects, client_match, Some(filters))?;
            let visible = state.visible_projects();

            if visible.is_empty() {
                println!("No projects match these filters.");
                return Ok(());
            }

            println!("Projects ({} of {}):", visible.len(), state.projects().len());
            for project in visible {
                println!(
                    "- {} [{}] budget {} profitability {}€, {} ({})",
                    project.name,
                    project.status,
                    project.budget,
                    project.profitability,
                    project.hours,
                    project.over_by
                );
            }
        }
        Commands::Export {
            format,
            out_dir,
            filters,
        } => {
            let state = build_state(projects, client_match, Some(filters))?;
            let trigger =
                DirectoryDownload::new(out_dir.unwrap_or_else(|| config.export.out_dir.clone()));
            let path = state
                .download(format, &trigger)
                .with_context(|| format!("export to {} failed", trigger.dir().display()))?;
            println!(
                "Exported {} projects to {}.",
                state.visible_projects().len(),
                path.display()
            );
        }
        Commands::Team => {
            let state = build_state(projects, client_match, None)?;

            println!("Team members:");
            for member in state.team() {
                println!(
                    "- [{}] {} {} ({}, {}){}",
                    member.id,
                    member.mood.current.emoji(),
                    member.name,
                    member.role,
                    member.availability,
                    member
                        .mood
                        .note
                        .as_deref()
                        .map(|note| format!(": {note}"))
                        .unwrap_or_default()
                );
            }

            println!("Mood distribution:");
            for (mood, count) in state.mood_stats() {
                println!("- {} {mood}: {count}", mood.emoji());
            }
        }
        Commands::Mood { member, mood, note } => {
            let mut state = build_state(projects, client_match, None)?;
            state.dispatch(Action::OpenMoodEditor(member.clone()));
            if !matches!(state.modal(), state::Modal::MoodEditOpen { .. }) {
                println!("No team member with id {member}.");
                return Ok(());
            }
            state.dispatch(Action::SelectMood(mood));
            state.dispatch(Action::SetMoodNote(note));
            log::debug!(
                "Submitting {} for {member} with note {:?}",
                state.draft_mood(),
                state.draft_note()
            );
            state.dispatch(Action::SubmitMood);

            if let Some(updated) = mood::find_member(state.team(), &member) {
                println!("{} mood history (newest first):", updated.name);
                for entry in &updated.mood_history {
                    println!(
                        "- {} {} at {}{}",
                        entry.mood.emoji(),
                        entry.mood,
                        entry.timestamp.to_rfc3339(),
                        entry
                            .note
                            .as_deref()
                            .map(|note| format!(": {note}"))
                            .unwrap_or_default()
                    );
                }
            }
        }
        Commands::Report { out, filters } => {
            let state = build_state(projects, client_match, Some(filters))?;
            let revenue = sample::revenue_series();
            let budget = sample::budget_breakdown();
            let trend = sample::mood_trend();
            let report = report::build_report(
                &sample::overview(),
                &state.visible_projects(),
                state.criteria(),
                state.team(),
                &report::ChartSeries {
                    revenue: &revenue,
                    budget: &budget,
                    mood_trend: &trend,
                },
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
    }

    Ok(())
}
