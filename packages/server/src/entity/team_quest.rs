use std::fmt;
use std::str::FromStr;

use sea_orm::entity::prelude::*;
use sea_orm::prelude::StringLen;
use serde::{Deserialize, Serialize};

/// Progress of one team on one quest.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    DeriveActiveEnum,
    EnumIter,
    utoipa::ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestStatus {
    /// No answer submitted yet.
    #[default]
    #[sea_orm(string_value = "NOT_READY")]
    NotReady,
    /// Correct answer recorded.
    #[sea_orm(string_value = "READY")]
    Ready,
    /// Incorrect answer recorded.
    #[sea_orm(string_value = "FAIL")]
    Fail,
}

impl QuestStatus {
    /// Returns true if the row counts toward the leaderboard
    /// (an answer has been submitted, right or wrong).
    pub fn is_scored(&self) -> bool {
        matches!(self, Self::Ready | Self::Fail)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotReady => "NOT_READY",
            Self::Ready => "READY",
            Self::Fail => "FAIL",
        }
    }
}

impl fmt::Display for QuestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error when parsing an invalid status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseStatusError {
    invalid: String,
}

impl fmt::Display for ParseStatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Invalid status '{}'. Valid values: NOT_READY, READY, FAIL",
            self.invalid
        )
    }
}

impl std::error::Error for ParseStatusError {}

impl FromStr for QuestStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_READY" => Ok(Self::NotReady),
            "READY" => Ok(Self::Ready),
            "FAIL" => Ok(Self::Fail),
            _ => Err(ParseStatusError {
                invalid: s.to_string(),
            }),
        }
    }
}

/// One row per (team, quest); a unique index on the pair is created at
/// startup by `seed::ensure_indexes` and backs the materialization upsert.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "team_quest")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub team_id: i32,
    #[sea_orm(belongs_to, from = "team_id", to = "id")]
    pub team: HasOne<super::team::Entity>,

    pub quest_id: i32,
    #[sea_orm(belongs_to, from = "quest_id", to = "id")]
    pub quest: HasOne<super::quest::Entity>,

    /// Number of hints revealed so far.
    #[sea_orm(default_value = 0)]
    pub hints: i32,
    pub status: QuestStatus,
    /// Stamped on every submission attempt, regardless of correctness.
    pub done_time: Option<DateTimeUtc>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
