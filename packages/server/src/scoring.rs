//! Leaderboard scoring.
//!
//! Pure functions over per-quest results; the HTTP handler in
//! `handlers::tournament` feeds them entity rows and serializes the output.
//!
//! A team's penalty time is the ceiling of:
//!   - elapsed minutes from tournament creation to each answered quest's
//!     done_time, summed per quest (each answered quest contributes its own
//!     absolute elapsed-since-start, so wall-clock time is counted once per
//!     answered quest — kept for leaderboard compatibility with existing
//!     deployments),
//!   - plus 15 minutes per revealed hint,
//!   - plus a flat 30 minutes per failed quest.
//! Unanswered (NOT_READY) quests contribute nothing.

use chrono::{DateTime, Utc};

use crate::entity::team_quest::{self, QuestStatus};

/// Penalty minutes per revealed hint.
pub const HINT_PENALTY_MINUTES: i64 = 15;
/// Flat penalty minutes per failed quest.
pub const FAIL_PENALTY_MINUTES: i64 = 30;

/// The scoring-relevant slice of a team's progress on one quest.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuestResult {
    pub status: QuestStatus,
    pub hints: i32,
    pub done_time: Option<DateTime<Utc>>,
}

impl From<&team_quest::Model> for QuestResult {
    fn from(row: &team_quest::Model) -> Self {
        Self {
            status: row.status,
            hints: row.hints,
            done_time: row.done_time,
        }
    }
}

/// A team's aggregate leaderboard score.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TeamScore {
    /// Number of quests answered correctly.
    pub total_done: u64,
    /// Penalty minutes, rounded up.
    pub time: i64,
}

impl TeamScore {
    /// Sort key for the leaderboard: more completions first, fewer penalty
    /// minutes breaking ties. Ordering beyond these two keys is left to the
    /// stability of the sort.
    pub fn rank_key(&self) -> (i64, i64) {
        (-(self.total_done as i64), self.time)
    }
}

/// Compute a team's score from its progress rows.
///
/// Only rows with an answered status (READY or FAIL) qualify; passing
/// unanswered rows is fine, they are skipped.
pub fn score_team(tournament_start: DateTime<Utc>, rows: &[QuestResult]) -> TeamScore {
    let mut total_done = 0u64;
    let mut quests_time = 0f64;
    let mut hints = 0i64;
    let mut fails = 0i64;

    for row in rows.iter().filter(|r| r.status.is_scored()) {
        if row.status == QuestStatus::Ready {
            total_done += 1;
        } else {
            fails += 1;
        }
        hints += i64::from(row.hints);
        if let Some(done) = row.done_time {
            quests_time += (done - tournament_start).num_milliseconds() as f64 / 60_000.0;
        }
    }

    let time = (quests_time
        + (hints * HINT_PENALTY_MINUTES) as f64
        + (fails * FAIL_PENALTY_MINUTES) as f64)
        .ceil() as i64;

    TeamScore { total_done, time }
}
