use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{quest, team_quest};
use crate::error::AppError;

/// Request body for answer submission.
#[derive(Deserialize, utoipa::ToSchema)]
pub struct SubmitAnswerRequest {
    /// Quest progress ID (from the quest list), not the quest ID.
    #[schema(example = 17)]
    pub id: i32,
    /// Submitted answer, compared case-sensitively with no trimming.
    #[schema(example = "ALPHA")]
    pub answer: String,
}

pub fn validate_submit_answer_request(payload: &SubmitAnswerRequest) -> Result<(), AppError> {
    if payload.answer.is_empty() {
        return Err(AppError::Validation("Answer must not be empty".into()));
    }
    Ok(())
}

/// A team's view of one quest: the quest itself plus the team's progress.
/// The correct answer is never included.
#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestProgressResponse {
    /// Quest progress ID, used for submissions and hint reveals.
    #[schema(example = 17)]
    pub id: i32,
    /// Quest ID.
    #[schema(example = 3)]
    pub quest_id: i32,
    #[schema(example = "The Old Lighthouse")]
    pub title: String,
    #[schema(example = "59.9311, 30.3609")]
    pub coords: String,
    pub description: String,
    pub status: team_quest::QuestStatus,
    /// Hints revealed so far.
    #[schema(example = 1)]
    pub hints_used: i32,
    /// Hints available for this quest in total.
    #[schema(example = 3)]
    pub hints_available: i32,
    /// Time of the latest submission, if any.
    pub done_time: Option<DateTime<Utc>>,
}

impl QuestProgressResponse {
    pub fn new(row: team_quest::Model, quest: &quest::Model, hints_available: i32) -> Self {
        Self {
            id: row.id,
            quest_id: quest.id,
            title: quest.title.clone(),
            coords: quest.coords.clone(),
            description: quest.description.clone(),
            status: row.status,
            hints_used: row.hints,
            hints_available,
            done_time: row.done_time,
        }
    }
}

/// Quest list for the default tournament.
#[derive(Serialize, utoipa::ToSchema)]
pub struct QuestListResponse {
    pub tournament_id: i32,
    pub quests: Vec<QuestProgressResponse>,
}

/// A newly revealed hint.
#[derive(Serialize, utoipa::ToSchema)]
pub struct HintResponse {
    /// The revealed hint text.
    #[schema(example = "Look under the bridge")]
    pub hint: String,
    /// Hints revealed so far, including this one.
    #[schema(example = 2)]
    pub hints_used: i32,
    /// Hints available for this quest in total.
    #[schema(example = 3)]
    pub hints_available: i32,
}
