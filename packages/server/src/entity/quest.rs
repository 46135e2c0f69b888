use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub tournament_id: i32,
    #[sea_orm(belongs_to, from = "tournament_id", to = "id")]
    pub tournament: HasOne<super::tournament::Entity>,

    pub title: String,
    /// Free-text location, e.g. "55.7558, 37.6173" or a riddle.
    pub coords: String,
    pub description: String,
    /// Correct answer, compared case-sensitively with no normalization.
    pub answer: String,

    #[sea_orm(has_many)]
    pub hints: HasMany<super::quest_hint::Entity>,

    #[sea_orm(has_many)]
    pub team_quests: HasMany<super::team_quest::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
