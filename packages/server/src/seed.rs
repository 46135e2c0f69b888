use sea_orm::sea_query::{Index, PostgresQueryBuilder};
use sea_orm::*;
use tracing::info;

use crate::entity::team_quest;

/// Ensure required database indexes exist.
///
/// SeaORM's schema-sync doesn't support composite unique indexes, so the
/// (team_id, quest_id) index is created manually on startup. It both
/// enforces the one-row-per-(team, quest) invariant and backs the
/// `ON CONFLICT DO NOTHING` upsert in the quest-list materialization,
/// so failing to create it is fatal.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let stmt = Index::create()
        .if_not_exists()
        .unique()
        .name("idx_team_quest_team_quest")
        .table(team_quest::Entity)
        .col(team_quest::Column::TeamId)
        .col(team_quest::Column::QuestId)
        .to_string(PostgresQueryBuilder);

    db.execute_unprepared(&stmt).await?;
    info!("Ensured unique index idx_team_quest_team_quest exists");

    Ok(())
}
