use chrono::Duration;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use serde_json::{Value, json};

use server::entity::team_quest::QuestStatus;
use server::entity::{team, team_quest, tournament};

use crate::common::{TestApp, routes};
use crate::quest::{create_quest, seed_default_tournament};

/// Overwrite a team's progress row directly, with done_time expressed in
/// minutes after tournament creation. Submission times can't be controlled
/// through the API, so leaderboard arithmetic is pinned at the store level.
async fn set_progress(
    app: &TestApp,
    team_email: &str,
    quest_id: i32,
    status: QuestStatus,
    hints: i32,
    done_minutes: Option<i64>,
) {
    let tournament = tournament::Entity::find_by_id(1)
        .one(&app.db)
        .await
        .unwrap()
        .expect("default tournament missing");

    let team = team::Entity::find()
        .filter(team::Column::Email.eq(team_email))
        .one(&app.db)
        .await
        .unwrap()
        .expect("team missing");

    let row = team_quest::Entity::find()
        .filter(team_quest::Column::TeamId.eq(team.id))
        .filter(team_quest::Column::QuestId.eq(quest_id))
        .one(&app.db)
        .await
        .unwrap()
        .expect("progress row missing; view the quest list first");

    let mut active: team_quest::ActiveModel = row.into();
    active.status = Set(status);
    active.hints = Set(hints);
    active.done_time = Set(done_minutes.map(|m| tournament.created_at + Duration::minutes(m)));
    team_quest::Entity::update(active)
        .exec(&app.db)
        .await
        .unwrap();
}

fn team_entry<'a>(board: &'a Value, name: &str) -> &'a Value {
    board["teams"]
        .as_array()
        .expect("leaderboard has no teams array")
        .iter()
        .find(|t| t["name"] == name)
        .unwrap_or_else(|| panic!("team {name} missing from leaderboard"))
}

/// Tournament with two quests; both teams have viewed the quest list.
async fn two_team_setup(app: &TestApp) -> (i32, i32, String, String) {
    let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
    let tid = seed_default_tournament(app, &staff).await;
    let q1 = create_quest(app, &staff, tid, "Lighthouse", "ALPHA", &[]).await;
    let q2 = create_quest(app, &staff, tid, "Bridge", "BETA", &[]).await;

    let owls = app
        .register_and_login("owls@example.com", "Owls", "securepass")
        .await;
    let foxes = app
        .register_and_login("foxes@example.com", "Foxes", "securepass")
        .await;
    app.get_with_token(routes::QUESTS, &owls).await;
    app.get_with_token(routes::QUESTS, &foxes).await;

    (q1, q2, owls, foxes)
}

#[tokio::test]
async fn worked_example_one_done_one_failed_one_hint() {
    let app = TestApp::spawn().await;
    let (q1, q2, owls, _foxes) = two_team_setup(&app).await;

    // Q1 correct at T0+10min with 1 hint, Q2 wrong at T0+20min:
    // ceil(10 + 20 + 15*1 + 30*1) = 75.
    set_progress(&app, "owls@example.com", q1, QuestStatus::Ready, 1, Some(10)).await;
    set_progress(&app, "owls@example.com", q2, QuestStatus::Fail, 0, Some(20)).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;
    assert_eq!(res.status, 200, "leaderboard failed: {}", res.text);

    let entry = team_entry(&res.body, "Owls");
    assert_eq!(entry["total_done"], 1);
    assert_eq!(entry["time"], 75);
    assert_eq!(entry["quests"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn more_completions_outrank_a_faster_but_less_complete_team() {
    let app = TestApp::spawn().await;
    let (q1, q2, owls, _foxes) = two_team_setup(&app).await;

    // Owls: one quest done quickly. Foxes: both quests done, slowly.
    set_progress(&app, "owls@example.com", q1, QuestStatus::Ready, 0, Some(5)).await;
    set_progress(&app, "foxes@example.com", q1, QuestStatus::Ready, 0, Some(60)).await;
    set_progress(&app, "foxes@example.com", q2, QuestStatus::Ready, 0, Some(90)).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;
    let teams = res.body["teams"].as_array().unwrap();

    assert_eq!(teams[0]["name"], "Foxes");
    assert_eq!(teams[1]["name"], "Owls");
}

#[tokio::test]
async fn equal_completions_are_ranked_by_penalty_time_ascending() {
    let app = TestApp::spawn().await;
    let (q1, _q2, owls, _foxes) = two_team_setup(&app).await;

    set_progress(&app, "owls@example.com", q1, QuestStatus::Ready, 2, Some(10)).await;
    set_progress(&app, "foxes@example.com", q1, QuestStatus::Ready, 0, Some(10)).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;
    let teams = res.body["teams"].as_array().unwrap();

    // Same completions; the two revealed hints cost Owls 30 minutes.
    assert_eq!(teams[0]["name"], "Foxes");
    assert_eq!(teams[0]["time"], 10);
    assert_eq!(teams[1]["name"], "Owls");
    assert_eq!(teams[1]["time"], 40);
}

#[tokio::test]
async fn unanswered_rows_are_excluded_even_with_hints_set() {
    let app = TestApp::spawn().await;
    let (q1, q2, owls, _foxes) = two_team_setup(&app).await;

    set_progress(&app, "owls@example.com", q1, QuestStatus::Ready, 0, Some(10)).await;
    // Hints on an unanswered quest must not count.
    set_progress(&app, "owls@example.com", q2, QuestStatus::NotReady, 2, None).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;
    let entry = team_entry(&res.body, "Owls");

    assert_eq!(entry["total_done"], 1);
    assert_eq!(entry["time"], 10);
    let quests = entry["quests"].as_array().unwrap();
    assert_eq!(quests.len(), 1);
    assert_eq!(quests[0]["quest_id"], json!(q1));
}

#[tokio::test]
async fn teams_with_only_unanswered_rows_still_appear_with_zero_score() {
    let app = TestApp::spawn().await;
    let (_q1, _q2, owls, _foxes) = two_team_setup(&app).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;

    let entry = team_entry(&res.body, "Foxes");
    assert_eq!(entry["total_done"], 0);
    assert_eq!(entry["time"], 0);
    assert!(entry["quests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn leaderboard_includes_the_tournament_window_and_quest_titles() {
    let app = TestApp::spawn().await;
    let (_q1, _q2, owls, _foxes) = two_team_setup(&app).await;

    let res = app.get_with_token(routes::LEADERBOARD, &owls).await;

    assert_eq!(res.body["tournament"]["title"], "Autumn City Hunt");
    assert!(res.body["tournament"]["end_time"].is_string());
    let quests = res.body["quests"].as_array().unwrap();
    assert_eq!(quests.len(), 2);
    assert!(!res.text.contains("ALPHA"), "answer leaked: {}", res.text);
}

#[tokio::test]
async fn leaderboard_requires_authentication() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::LEADERBOARD).await;

    assert_eq!(res.status, 401);
}

#[tokio::test]
async fn leaderboard_requires_the_default_tournament_to_exist() {
    let app = TestApp::spawn().await;
    let token = app
        .register_and_login("owls@example.com", "Owls", "securepass")
        .await;

    let res = app.get_with_token(routes::LEADERBOARD, &token).await;

    assert_eq!(res.status, 404);
}
