pub mod quest;
pub mod quest_hint;
pub mod team;
pub mod team_quest;
pub mod tournament;
