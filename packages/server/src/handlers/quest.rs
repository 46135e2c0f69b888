use std::collections::HashMap;

use axum::Json;
use axum::extract::{Path, State};
use sea_orm::sea_query::OnConflict;
use sea_orm::*;
use tracing::instrument;

use crate::entity::team_quest::QuestStatus;
use crate::entity::{quest, quest_hint, team_quest};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthTeam;
use crate::extractors::json::AppJson;
use crate::models::quest::{
    HintResponse, QuestListResponse, QuestProgressResponse, SubmitAnswerRequest,
    validate_submit_answer_request,
};
use crate::state::AppState;
use crate::utils::tournament::{find_owned_team_quest, find_tournament, tournament_quests};

/// Hints of a quest, in reveal order.
async fn quest_hints<C: ConnectionTrait>(
    db: &C,
    quest_id: i32,
) -> Result<Vec<quest_hint::Model>, AppError> {
    Ok(quest_hint::Entity::find()
        .filter(quest_hint::Column::QuestId.eq(quest_id))
        .order_by_asc(quest_hint::Column::Id)
        .all(db)
        .await?)
}

/// Materialize missing progress rows for a team, one per quest.
///
/// `ON CONFLICT (team_id, quest_id) DO NOTHING` makes concurrent first
/// views safe: whichever request loses the race simply reads the row the
/// winner inserted.
async fn materialize_progress<C: ConnectionTrait>(
    db: &C,
    team_id: i32,
    quests: &[quest::Model],
) -> Result<(), AppError> {
    if quests.is_empty() {
        return Ok(());
    }

    let now = chrono::Utc::now();
    let rows = quests.iter().map(|q| team_quest::ActiveModel {
        team_id: Set(team_id),
        quest_id: Set(q.id),
        hints: Set(0),
        status: Set(QuestStatus::NotReady),
        done_time: Set(None),
        created_at: Set(now),
        ..Default::default()
    });

    let result = team_quest::Entity::insert_many(rows)
        .on_conflict(
            OnConflict::columns([team_quest::Column::TeamId, team_quest::Column::QuestId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(_) | Err(DbErr::RecordNotInserted) => Ok(()),
        Err(e) => Err(AppError::from(e)),
    }
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Quests",
    operation_id = "listQuests",
    summary = "Quest list with the team's progress",
    description = "Returns every quest of the default tournament, ordered by quest id, \
                   with this team's progress. Missing progress rows are created on first \
                   view; repeated calls never duplicate them.",
    responses(
        (status = 200, description = "Quest list", body = QuestListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Default tournament missing (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team), fields(team_id = auth_team.team_id))]
pub async fn list_quests(
    auth_team: AuthTeam,
    State(state): State<AppState>,
) -> Result<Json<QuestListResponse>, AppError> {
    let tournament = find_tournament(&state.db, state.config.tournament.default_id).await?;
    let quests = tournament_quests(&state.db, tournament.id).await?;

    materialize_progress(&state.db, auth_team.team_id, &quests).await?;

    let quest_ids: Vec<i32> = quests.iter().map(|q| q.id).collect();

    let mut hint_counts: HashMap<i32, i32> = HashMap::new();
    for hint in quest_hint::Entity::find()
        .filter(quest_hint::Column::QuestId.is_in(quest_ids.clone()))
        .all(&state.db)
        .await?
    {
        *hint_counts.entry(hint.quest_id).or_insert(0) += 1;
    }

    let rows = team_quest::Entity::find()
        .filter(team_quest::Column::TeamId.eq(auth_team.team_id))
        .filter(team_quest::Column::QuestId.is_in(quest_ids))
        .order_by_asc(team_quest::Column::QuestId)
        .all(&state.db)
        .await?;

    let quests_by_id: HashMap<i32, &quest::Model> = quests.iter().map(|q| (q.id, q)).collect();
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let Some(quest) = quests_by_id.get(&row.quest_id) else {
            continue; // quest deleted between queries
        };
        let available = hint_counts.get(&quest.id).copied().unwrap_or(0);
        entries.push(QuestProgressResponse::new(row, quest, available));
    }

    Ok(Json(QuestListResponse {
        tournament_id: tournament.id,
        quests: entries,
    }))
}

#[utoipa::path(
    post,
    path = "/submit",
    tag = "Quests",
    operation_id = "submitAnswer",
    summary = "Submit an answer for a quest",
    description = "Compares the submitted answer to the quest's stored answer, exactly and \
                   case-sensitively. Every attempt stamps `done_time` and overwrites the \
                   status with READY or FAIL; resubmission is allowed and a later FAIL \
                   replaces an earlier READY.",
    request_body = SubmitAnswerRequest,
    responses(
        (status = 200, description = "Updated progress", body = QuestProgressResponse),
        (status = 400, description = "Empty answer (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such progress row for this team (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team, payload), fields(team_id = auth_team.team_id, team_quest_id = payload.id))]
pub async fn submit_answer(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    AppJson(payload): AppJson<SubmitAnswerRequest>,
) -> Result<Json<QuestProgressResponse>, AppError> {
    validate_submit_answer_request(&payload)?;

    let row = find_owned_team_quest(&state.db, payload.id, auth_team.team_id).await?;

    let quest = quest::Entity::find_by_id(row.quest_id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Quest not found".into()))?;

    let correct = quest.answer == payload.answer;

    let mut active: team_quest::ActiveModel = row.into();
    active.done_time = Set(Some(chrono::Utc::now()));
    active.status = Set(if correct {
        QuestStatus::Ready
    } else {
        QuestStatus::Fail
    });
    let updated = active.update(&state.db).await?;

    tracing::info!(
        quest_id = quest.id,
        correct,
        "Answer evaluated for team {}",
        auth_team.team_id
    );

    let available = quest_hints(&state.db, quest.id).await?.len() as i32;
    Ok(Json(QuestProgressResponse::new(updated, &quest, available)))
}

#[utoipa::path(
    post,
    path = "/{id}/hint",
    tag = "Quests",
    operation_id = "revealHint",
    summary = "Reveal the next hint for a quest",
    description = "Reveals the next unrevealed hint and increments the team's hint counter. \
                   Each revealed hint adds 15 penalty minutes on the leaderboard.",
    params(("id" = i32, Path, description = "Quest progress ID")),
    responses(
        (status = 200, description = "Revealed hint", body = HintResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "No such progress row for this team (NOT_FOUND)", body = ErrorBody),
        (status = 409, description = "All hints already revealed (CONFLICT)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team), fields(team_id = auth_team.team_id, team_quest_id = id))]
pub async fn reveal_hint(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<HintResponse>, AppError> {
    let row = find_owned_team_quest(&state.db, id, auth_team.team_id).await?;

    let hints = quest_hints(&state.db, row.quest_id).await?;
    let revealed = row.hints;

    let Some(hint) = hints.get(revealed as usize) else {
        return Err(AppError::Conflict(
            "All hints for this quest have been revealed".into(),
        ));
    };
    let text = hint.text.clone();

    let mut active: team_quest::ActiveModel = row.into();
    active.hints = Set(revealed + 1);
    let updated = active.update(&state.db).await?;

    Ok(Json(HintResponse {
        hint: text,
        hints_used: updated.hints,
        hints_available: hints.len() as i32,
    }))
}
