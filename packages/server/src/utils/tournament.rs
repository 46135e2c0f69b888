use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};

use crate::entity::{quest, team_quest, tournament};
use crate::error::AppError;

/// Look up a tournament by ID, returning 404 if not found.
pub async fn find_tournament<C: sea_orm::ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<tournament::Model, AppError> {
    tournament::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Tournament not found".into()))
}

/// Look up a quest within a tournament, returning 404 if it doesn't
/// exist or belongs to another tournament.
pub async fn find_tournament_quest<C: sea_orm::ConnectionTrait>(
    db: &C,
    tournament_id: i32,
    quest_id: i32,
) -> Result<quest::Model, AppError> {
    quest::Entity::find_by_id(quest_id)
        .filter(quest::Column::TournamentId.eq(tournament_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Quest not found".into()))
}

/// The quests of a tournament, ordered by id ascending.
pub async fn tournament_quests<C: sea_orm::ConnectionTrait>(
    db: &C,
    tournament_id: i32,
) -> Result<Vec<quest::Model>, AppError> {
    Ok(quest::Entity::find()
        .filter(quest::Column::TournamentId.eq(tournament_id))
        .order_by_asc(quest::Column::Id)
        .all(db)
        .await?)
}

/// Look up a team's progress row by id, scoped to the requesting team.
///
/// A row owned by another team is reported as 404 rather than 403 so the
/// endpoint doesn't confirm which progress ids exist.
pub async fn find_owned_team_quest<C: sea_orm::ConnectionTrait>(
    db: &C,
    team_quest_id: i32,
    team_id: i32,
) -> Result<team_quest::Model, AppError> {
    team_quest::Entity::find_by_id(team_quest_id)
        .one(db)
        .await?
        .filter(|tq| tq.team_id == team_id)
        .ok_or_else(|| AppError::NotFound("Quest progress not found".into()))
}
