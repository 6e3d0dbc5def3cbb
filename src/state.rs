use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::Context;
use log::{debug, warn};

use crate::export::{self, DownloadTrigger, ExportFormat, ExportPayload};
use crate::filter::{self, ClientMatch};
use crate::models::{FilterCriteria, MoodType, Project, TeamMember};
use crate::mood;
use crate::sample::ProjectStore;

/// Which overlay is showing. At most one can be open.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Modal {
    #[default]
    Closed,
    FilterOpen,
    MoodEditOpen { member_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterField {
    Status,
    Client,
    BudgetRange,
    DateRange,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    OpenFilters,
    SetFilter(FilterField, String),
    ResetFilters,
    CloseModal,
    OpenMoodEditor(String),
    SelectMood(MoodType),
    SetMoodNote(String),
    SubmitMood,
}

/// Everything the dashboard shows, owned in one place and changed only
/// through [`DashboardState::dispatch`].
#[derive(Debug, Clone)]
pub struct DashboardState {
    store: ProjectStore,
    team: Vec<TeamMember>,
    criteria: FilterCriteria,
    client_match: ClientMatch,
    modal: Modal,
    draft_mood: MoodType,
    draft_note: String,
}

impl DashboardState {
    pub fn new(store: ProjectStore, team: Vec<TeamMember>, client_match: ClientMatch) -> Self {
        Self {
            store,
            team,
            criteria: FilterCriteria::default(),
            client_match,
            modal: Modal::Closed,
            draft_mood: MoodType::Happy,
            draft_note: String::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        debug!("Dispatching {action:?}");
        match action {
            Action::OpenFilters => self.modal = Modal::FilterOpen,
            Action::SetFilter(field, value) => {
                let slot = match field {
                    FilterField::Status => &mut self.criteria.status,
                    FilterField::Client => &mut self.criteria.client,
                    FilterField::BudgetRange => &mut self.criteria.budget_range,
                    FilterField::DateRange => &mut self.criteria.date_range,
                };
                *slot = value;
            }
            Action::ResetFilters => self.criteria = FilterCriteria::default(),
            Action::CloseModal => self.modal = Modal::Closed,
            Action::OpenMoodEditor(member_id) => {
                let current = mood::find_member(&self.team, &member_id).map(|m| m.mood.current);
                match current {
                    Some(current) => {
                        self.draft_mood = current;
                        self.modal = Modal::MoodEditOpen { member_id };
                    }
                    None => warn!("Cannot edit mood: no team member with id {member_id}"),
                }
            }
            Action::SelectMood(mood) => self.draft_mood = mood,
            Action::SetMoodNote(note) => self.draft_note = note,
            Action::SubmitMood => {
                if !matches!(self.modal, Modal::MoodEditOpen { .. }) {
                    return;
                }
                let Modal::MoodEditOpen { member_id } = std::mem::take(&mut self.modal) else {
                    return;
                };
                self.team =
                    mood::update_mood(&self.team, &member_id, self.draft_mood, &self.draft_note);
                self.draft_note.clear();
            }
        }
    }

    pub fn modal(&self) -> &Modal {
        &self.modal
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn team(&self) -> &[TeamMember] {
        &self.team
    }

    pub fn projects(&self) -> &[Project] {
        self.store.projects()
    }

    pub fn draft_mood(&self) -> MoodType {
        self.draft_mood
    }

    pub fn draft_note(&self) -> &str {
        &self.draft_note
    }

    pub fn visible_projects(&self) -> Vec<&Project> {
        match self.client_match {
            ClientMatch::Contains => filter::apply_filters(self.store.projects(), &self.criteria),
            legacy => filter::apply_filters_with(self.store.projects(), &self.criteria, legacy),
        }
    }

    pub fn mood_stats(&self) -> BTreeMap<MoodType, usize> {
        mood::mood_stats(&self.team)
    }

    pub fn export(&self, format: ExportFormat) -> anyhow::Result<ExportPayload> {
        export::format_export(&self.visible_projects(), format)
    }

    /// Exports the visible projects and hands them to `trigger`.
    pub fn download(
        &self,
        format: ExportFormat,
        trigger: &impl DownloadTrigger,
    ) -> anyhow::Result<PathBuf> {
        let payload = self.export(format)?;
        trigger
            .save(&payload)
            .with_context(|| format!("failed to save {}", payload.filename))
    }
}
