use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::shared::{validate_text_field, validate_title};
use crate::entity::team_quest;
use crate::error::AppError;

/// Maximum hints per quest. Enforced at entry, not by the schema.
pub const MAX_HINTS_PER_QUEST: usize = 3;

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateTournamentRequest {
    #[schema(example = "Autumn City Hunt")]
    pub title: String,
}

pub fn validate_create_tournament(payload: &CreateTournamentRequest) -> Result<(), AppError> {
    validate_title(&payload.title)
}

#[derive(Deserialize, utoipa::ToSchema)]
pub struct CreateQuestRequest {
    #[schema(example = "The Old Lighthouse")]
    pub title: String,
    #[schema(example = "59.9311, 30.3609")]
    pub coords: String,
    pub description: String,
    /// Correct answer, matched exactly and case-sensitively.
    #[schema(example = "ALPHA")]
    pub answer: String,
    /// Up to 3 hints, revealed to teams in the given order.
    #[serde(default)]
    pub hints: Vec<String>,
}

pub fn validate_create_quest(payload: &CreateQuestRequest) -> Result<(), AppError> {
    validate_title(&payload.title)?;
    validate_text_field(&payload.coords, "Coords", 255)?;
    validate_text_field(&payload.description, "Description", 300)?;
    if payload.answer.is_empty() || payload.answer.chars().count() > 255 {
        return Err(AppError::Validation(
            "Answer must be 1-255 characters".into(),
        ));
    }
    if payload.hints.len() > MAX_HINTS_PER_QUEST {
        return Err(AppError::Validation(format!(
            "A quest may have at most {MAX_HINTS_PER_QUEST} hints"
        )));
    }
    if payload.hints.iter().any(|h| h.trim().is_empty()) {
        return Err(AppError::Validation("Hints must not be empty".into()));
    }
    Ok(())
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TournamentResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Autumn City Hunt")]
    pub title: String,
    pub created_at: DateTime<Utc>,
    /// Derived: creation time plus the fixed five-hour window.
    pub end_time: DateTime<Utc>,
}

impl From<crate::entity::tournament::Model> for TournamentResponse {
    fn from(m: crate::entity::tournament::Model) -> Self {
        let end_time = m.end_time();
        Self {
            id: m.id,
            title: m.title,
            created_at: m.created_at,
            end_time,
        }
    }
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct TournamentListResponse {
    pub data: Vec<TournamentResponse>,
}

/// Staff view of a quest; includes the stored answer.
#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestAdminResponse {
    #[schema(example = 3)]
    pub id: i32,
    pub tournament_id: i32,
    pub title: String,
    pub coords: String,
    pub description: String,
    pub answer: String,
    pub hints: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestAdminListResponse {
    pub data: Vec<QuestAdminResponse>,
}

// ---------------------------------------------------------------------------
// Leaderboard DTOs
// ---------------------------------------------------------------------------

/// Quest summary on the leaderboard; never includes the answer.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardQuest {
    pub id: i32,
    pub title: String,
}

/// One answered quest of a ranked team.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardEntry {
    pub quest_id: i32,
    pub status: team_quest::QuestStatus,
    pub hints_used: i32,
    pub done_time: Option<DateTime<Utc>>,
}

/// One team on the leaderboard, with its aggregate score and the
/// answered rows it was computed from.
#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardTeam {
    pub team_id: i32,
    #[schema(example = "Night Owls")]
    pub name: String,
    /// Quests answered correctly.
    #[schema(example = 4)]
    pub total_done: u64,
    /// Penalty minutes, rounded up.
    #[schema(example = 75)]
    pub time: i64,
    pub quests: Vec<LeaderboardEntry>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct LeaderboardResponse {
    pub tournament: TournamentResponse,
    pub quests: Vec<LeaderboardQuest>,
    /// Teams ranked by completions descending, then penalty time ascending.
    pub teams: Vec<LeaderboardTeam>,
}
