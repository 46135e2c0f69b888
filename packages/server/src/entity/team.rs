use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub email: String,
    pub name: String,
    /// Argon2 hash, never the plaintext.
    pub password: String,

    /// Staff teams may manage tournaments and quests.
    #[sea_orm(default_value = false)]
    pub is_staff: bool,
    /// Inactive teams cannot log in. Deactivate instead of deleting.
    #[sea_orm(default_value = true)]
    pub is_active: bool,

    #[sea_orm(has_many)]
    pub team_quests: HasMany<super::team_quest::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
