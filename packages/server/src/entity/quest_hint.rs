use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// A hint for a quest. Revealed in id order; at most 3 per quest,
/// enforced at the admin-entry handler rather than the schema.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quest_hint")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub quest_id: i32,
    #[sea_orm(belongs_to, from = "quest_id", to = "id")]
    pub quest: HasOne<super::quest::Entity>,

    pub text: String,
}

impl ActiveModelBehavior for ActiveModel {}
