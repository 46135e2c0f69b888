use std::collections::BTreeMap;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use sea_orm::*;
use tracing::instrument;

use crate::entity::{quest, quest_hint, team, team_quest, tournament};
use crate::error::{AppError, ErrorBody};
use crate::extractors::auth::AuthTeam;
use crate::extractors::json::AppJson;
use crate::models::tournament::*;
use crate::scoring::{self, QuestResult};
use crate::state::AppState;
use crate::utils::tournament::{find_tournament, find_tournament_quest, tournament_quests};

#[utoipa::path(
    post,
    path = "/",
    tag = "Tournaments",
    operation_id = "createTournament",
    summary = "Create a tournament",
    description = "Creates a tournament running for a fixed five-hour window from creation. \
                   Requires a staff team.",
    request_body = CreateTournamentRequest,
    responses(
        (status = 201, description = "Tournament created", body = TournamentResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team, payload), fields(title = %payload.title))]
pub async fn create_tournament(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CreateTournamentRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_team.require_staff()?;
    validate_create_tournament(&payload)?;

    let new_tournament = tournament::ActiveModel {
        title: Set(payload.title.trim().to_string()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let model = new_tournament.insert(&state.db).await?;

    Ok((StatusCode::CREATED, Json(TournamentResponse::from(model))))
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Tournaments",
    operation_id = "listTournaments",
    summary = "List tournaments",
    responses(
        (status = 200, description = "All tournaments", body = TournamentListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team))]
pub async fn list_tournaments(
    auth_team: AuthTeam,
    State(state): State<AppState>,
) -> Result<Json<TournamentListResponse>, AppError> {
    auth_team.require_staff()?;

    let data = tournament::Entity::find()
        .order_by_asc(tournament::Column::Id)
        .all(&state.db)
        .await?
        .into_iter()
        .map(TournamentResponse::from)
        .collect();

    Ok(Json(TournamentListResponse { data }))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Tournaments",
    operation_id = "getTournament",
    summary = "Get a tournament",
    params(("id" = i32, Path, description = "Tournament ID")),
    responses(
        (status = 200, description = "Tournament", body = TournamentResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team))]
pub async fn get_tournament(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<TournamentResponse>, AppError> {
    auth_team.require_staff()?;
    let model = find_tournament(&state.db, id).await?;
    Ok(Json(TournamentResponse::from(model)))
}

/// Delete a quest's children, then the quest rows themselves.
async fn delete_quests_cascade<C: ConnectionTrait>(
    db: &C,
    quest_ids: Vec<i32>,
) -> Result<(), AppError> {
    if quest_ids.is_empty() {
        return Ok(());
    }
    team_quest::Entity::delete_many()
        .filter(team_quest::Column::QuestId.is_in(quest_ids.clone()))
        .exec(db)
        .await?;
    quest_hint::Entity::delete_many()
        .filter(quest_hint::Column::QuestId.is_in(quest_ids.clone()))
        .exec(db)
        .await?;
    quest::Entity::delete_many()
        .filter(quest::Column::Id.is_in(quest_ids))
        .exec(db)
        .await?;
    Ok(())
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Tournaments",
    operation_id = "deleteTournament",
    summary = "Delete a tournament and everything under it",
    description = "Removes the tournament with its quests, hints, and team progress rows \
                   in one transaction.",
    params(("id" = i32, Path, description = "Tournament ID")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team))]
pub async fn delete_tournament(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    auth_team.require_staff()?;
    let model = find_tournament(&state.db, id).await?;

    let txn = state.db.begin().await?;
    let quest_ids: Vec<i32> = quest::Entity::find()
        .filter(quest::Column::TournamentId.eq(model.id))
        .select_only()
        .column(quest::Column::Id)
        .into_tuple()
        .all(&txn)
        .await?;
    delete_quests_cascade(&txn, quest_ids).await?;
    tournament::Entity::delete_by_id(model.id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!("Deleted tournament {}", id);
    Ok(StatusCode::NO_CONTENT)
}

fn quest_admin_response(q: quest::Model, hints: Vec<String>) -> QuestAdminResponse {
    QuestAdminResponse {
        id: q.id,
        tournament_id: q.tournament_id,
        title: q.title,
        coords: q.coords,
        description: q.description,
        answer: q.answer,
        hints,
        created_at: q.created_at,
    }
}

#[utoipa::path(
    post,
    path = "/{id}/quests",
    tag = "Tournaments",
    operation_id = "createQuest",
    summary = "Add a quest to a tournament",
    description = "Creates a quest with up to 3 hints, revealed to teams in the given order.",
    params(("id" = i32, Path, description = "Tournament ID")),
    request_body = CreateQuestRequest,
    responses(
        (status = 201, description = "Quest created", body = QuestAdminResponse),
        (status = 400, description = "Validation error (VALIDATION_ERROR)", body = ErrorBody),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Tournament not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team, payload), fields(tournament_id = id, title = %payload.title))]
pub async fn create_quest(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    AppJson(payload): AppJson<CreateQuestRequest>,
) -> Result<impl IntoResponse, AppError> {
    auth_team.require_staff()?;
    validate_create_quest(&payload)?;
    let tournament = find_tournament(&state.db, id).await?;

    let txn = state.db.begin().await?;

    let new_quest = quest::ActiveModel {
        tournament_id: Set(tournament.id),
        title: Set(payload.title.trim().to_string()),
        coords: Set(payload.coords.trim().to_string()),
        description: Set(payload.description.trim().to_string()),
        answer: Set(payload.answer.clone()),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };
    let model = new_quest.insert(&txn).await?;

    if !payload.hints.is_empty() {
        let rows = payload.hints.iter().map(|text| quest_hint::ActiveModel {
            quest_id: Set(model.id),
            text: Set(text.trim().to_string()),
            ..Default::default()
        });
        quest_hint::Entity::insert_many(rows)
            .exec_without_returning(&txn)
            .await?;
    }

    txn.commit().await?;

    let hints = payload.hints.iter().map(|h| h.trim().to_string()).collect();
    Ok((
        StatusCode::CREATED,
        Json(quest_admin_response(model, hints)),
    ))
}

#[utoipa::path(
    get,
    path = "/{id}/quests",
    tag = "Tournaments",
    operation_id = "listTournamentQuests",
    summary = "List a tournament's quests with answers and hints",
    params(("id" = i32, Path, description = "Tournament ID")),
    responses(
        (status = 200, description = "Quests, ordered by id", body = QuestAdminListResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Tournament not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team))]
pub async fn list_tournament_quests(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<QuestAdminListResponse>, AppError> {
    auth_team.require_staff()?;
    let tournament = find_tournament(&state.db, id).await?;
    let quests = tournament_quests(&state.db, tournament.id).await?;

    let quest_ids: Vec<i32> = quests.iter().map(|q| q.id).collect();
    let mut hints_by_quest: BTreeMap<i32, Vec<String>> = BTreeMap::new();
    for hint in quest_hint::Entity::find()
        .filter(quest_hint::Column::QuestId.is_in(quest_ids))
        .order_by_asc(quest_hint::Column::Id)
        .all(&state.db)
        .await?
    {
        hints_by_quest.entry(hint.quest_id).or_default().push(hint.text);
    }

    let data = quests
        .into_iter()
        .map(|q| {
            let hints = hints_by_quest.remove(&q.id).unwrap_or_default();
            quest_admin_response(q, hints)
        })
        .collect();

    Ok(Json(QuestAdminListResponse { data }))
}

#[utoipa::path(
    delete,
    path = "/{id}/quests/{quest_id}",
    tag = "Tournaments",
    operation_id = "deleteQuest",
    summary = "Delete a quest with its hints and progress rows",
    params(
        ("id" = i32, Path, description = "Tournament ID"),
        ("quest_id" = i32, Path, description = "Quest ID"),
    ),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 403, description = "Forbidden (PERMISSION_DENIED)", body = ErrorBody),
        (status = 404, description = "Not found (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team))]
pub async fn delete_quest(
    auth_team: AuthTeam,
    State(state): State<AppState>,
    Path((id, quest_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    auth_team.require_staff()?;
    let quest = find_tournament_quest(&state.db, id, quest_id).await?;

    let txn = state.db.begin().await?;
    delete_quests_cascade(&txn, vec![quest.id]).await?;
    txn.commit().await?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Leaderboard",
    operation_id = "leaderboard",
    summary = "Leaderboard for the default tournament",
    description = "Every team with at least one progress row in the tournament, ranked by \
                   quests completed (descending) then penalty minutes (ascending). Penalty \
                   minutes sum elapsed time per answered quest plus 15 minutes per revealed \
                   hint and 30 per failed quest; unanswered quests don't count.",
    responses(
        (status = 200, description = "Ranked teams", body = LeaderboardResponse),
        (status = 401, description = "Unauthorized (TOKEN_MISSING, TOKEN_INVALID)", body = ErrorBody),
        (status = 404, description = "Default tournament missing (NOT_FOUND)", body = ErrorBody),
    ),
    security(("jwt" = [])),
)]
#[instrument(skip(state, auth_team), fields(team_id = auth_team.team_id))]
pub async fn leaderboard(
    auth_team: AuthTeam,
    State(state): State<AppState>,
) -> Result<Json<LeaderboardResponse>, AppError> {
    let tournament = find_tournament(&state.db, state.config.tournament.default_id).await?;
    let quests = tournament_quests(&state.db, tournament.id).await?;
    let quest_ids: Vec<i32> = quests.iter().map(|q| q.id).collect();

    let rows = team_quest::Entity::find()
        .filter(team_quest::Column::QuestId.is_in(quest_ids))
        .order_by_asc(team_quest::Column::QuestId)
        .all(&state.db)
        .await?;

    // BTreeMap keeps team iteration deterministic ahead of the stable sort.
    let mut rows_by_team: BTreeMap<i32, Vec<team_quest::Model>> = BTreeMap::new();
    for row in rows {
        rows_by_team.entry(row.team_id).or_default().push(row);
    }

    let team_names: BTreeMap<i32, String> = team::Entity::find()
        .filter(team::Column::Id.is_in(rows_by_team.keys().copied().collect::<Vec<_>>()))
        .all(&state.db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.name))
        .collect();

    let mut teams = Vec::with_capacity(rows_by_team.len());
    for (team_id, team_rows) in rows_by_team {
        let results: Vec<QuestResult> = team_rows.iter().map(QuestResult::from).collect();
        let score = scoring::score_team(tournament.created_at, &results);

        let entries = team_rows
            .into_iter()
            .filter(|row| row.status.is_scored())
            .map(|row| LeaderboardEntry {
                quest_id: row.quest_id,
                status: row.status,
                hints_used: row.hints,
                done_time: row.done_time,
            })
            .collect();

        teams.push(LeaderboardTeam {
            team_id,
            name: team_names.get(&team_id).cloned().unwrap_or_default(),
            total_done: score.total_done,
            time: score.time,
            quests: entries,
        });
    }

    teams.sort_by_key(|t| {
        scoring::TeamScore {
            total_done: t.total_done,
            time: t.time,
        }
        .rank_key()
    });

    Ok(Json(LeaderboardResponse {
        tournament: TournamentResponse::from(tournament),
        quests: quests
            .into_iter()
            .map(|q| LeaderboardQuest {
                id: q.id,
                title: q.title,
            })
            .collect(),
        teams,
    }))
}
