use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use log::{info, warn};

use crate::models::{MoodEntry, MoodType, TeamMember};

pub fn update_mood(
    members: &[TeamMember],
    member_id: &str,
    mood: MoodType,
    note: &str,
) -> Vec<TeamMember> {
    update_mood_at(members, member_id, mood, note, Utc::now())
}

/// Records a new mood for one member, returning the updated team.
///
/// The new entry is prepended to the member's history and becomes the
/// current mood in the same step. An unknown `member_id` returns the team
/// unchanged.
pub fn update_mood_at(
    members: &[TeamMember],
    member_id: &str,
    mood: MoodType,
    note: &str,
    timestamp: DateTime<Utc>,
) -> Vec<TeamMember> {
    if find_member(members, member_id).is_none() {
        warn!("Mood update ignored: no team member with id {member_id}");
        return members.to_vec();
    }

    let note = (!note.trim().is_empty()).then(|| note.to_string());

    members
        .iter()
        .map(|member| {
            if member.id != member_id {
                return member.clone();
            }

            let entry = MoodEntry {
                mood,
                timestamp,
                note: note.clone(),
            };
            let mut updated = member.clone();
            updated.mood = entry.snapshot();
            updated.mood_history.insert(0, entry);
            info!(
                "{} is now {} ({} entries)",
                updated.name,
                mood,
                updated.mood_history.len()
            );
            updated
        })
        .collect()
}

pub fn find_member<'a>(members: &'a [TeamMember], member_id: &str) -> Option<&'a TeamMember> {
    members.iter().find(|member| member.id == member_id)
}

/// Counts members by current mood. Moods nobody has are absent.
pub fn mood_stats(members: &[TeamMember]) -> BTreeMap<MoodType, usize> {
    members.iter().fold(BTreeMap::new(), |mut stats, member| {
        *stats.entry(member.mood.current).or_insert(0) += 1;
        stats
    })
}
