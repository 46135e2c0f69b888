use chrono::Duration;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Every tournament runs for a fixed five-hour window from creation.
pub const TOURNAMENT_DURATION_HOURS: i64 = 5;

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "tournament")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,

    #[sea_orm(has_many)]
    pub quests: HasMany<super::quest::Entity>,

    pub created_at: DateTimeUtc,
}

impl Model {
    /// Derived close time; not stored.
    pub fn end_time(&self) -> DateTimeUtc {
        self.created_at + Duration::hours(TOURNAMENT_DURATION_HOURS)
    }
}

impl ActiveModelBehavior for ActiveModel {}
