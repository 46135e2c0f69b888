use serde_json::{Value, json};

use crate::common::{TestApp, routes};

/// Create the default tournament (the first one created gets id 1, which is
/// what the test config points the quest list and leaderboard at).
pub async fn seed_default_tournament(app: &TestApp, staff_token: &str) -> i32 {
    let res = app
        .post_with_token(
            routes::TOURNAMENTS,
            &json!({"title": "Autumn City Hunt"}),
            staff_token,
        )
        .await;
    assert_eq!(res.status, 201, "create_tournament failed: {}", res.text);
    res.id()
}

/// Add a quest to a tournament, returning its id.
pub async fn create_quest(
    app: &TestApp,
    staff_token: &str,
    tournament_id: i32,
    title: &str,
    answer: &str,
    hints: &[&str],
) -> i32 {
    let res = app
        .post_with_token(
            &routes::tournament_quests(tournament_id),
            &json!({
                "title": title,
                "coords": "59.9311, 30.3609",
                "description": "Find the keeper's mark.",
                "answer": answer,
                "hints": hints,
            }),
            staff_token,
        )
        .await;
    assert_eq!(res.status, 201, "create_quest failed: {}", res.text);
    res.id()
}

/// The team's progress row for a given quest, from the quest list.
fn progress_for<'a>(list: &'a Value, quest_id: i32) -> &'a Value {
    list["quests"]
        .as_array()
        .expect("quest list has no quests array")
        .iter()
        .find(|q| q["quest_id"] == json!(quest_id))
        .expect("quest missing from list")
}

mod quest_list {
    use super::*;

    #[tokio::test]
    async fn listing_materializes_one_progress_row_per_quest() {
        let app = TestApp::spawn().await;
        let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
        let tid = seed_default_tournament(&app, &staff).await;
        let q1 = create_quest(&app, &staff, tid, "Lighthouse", "ALPHA", &[]).await;
        let q2 = create_quest(&app, &staff, tid, "Bridge", "BETA", &["hint one"]).await;

        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;
        let res = app.get_with_token(routes::QUESTS, &token).await;

        assert_eq!(res.status, 200, "quest list failed: {}", res.text);
        let quests = res.body["quests"].as_array().unwrap();
        assert_eq!(quests.len(), 2);
        // Ordered by quest id ascending.
        assert_eq!(quests[0]["quest_id"], json!(q1));
        assert_eq!(quests[1]["quest_id"], json!(q2));
        assert_eq!(quests[0]["status"], "NOT_READY");
        assert_eq!(quests[0]["hints_used"], 0);
        assert_eq!(quests[1]["hints_available"], 1);
        assert!(quests[0]["done_time"].is_null());
    }

    #[tokio::test]
    async fn listing_twice_never_duplicates_progress_rows() {
        let app = TestApp::spawn().await;
        let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
        let tid = seed_default_tournament(&app, &staff).await;
        create_quest(&app, &staff, tid, "Lighthouse", "ALPHA", &[]).await;

        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;

        let first = app.get_with_token(routes::QUESTS, &token).await;
        let second = app.get_with_token(routes::QUESTS, &token).await;

        assert_eq!(first.body["quests"].as_array().unwrap().len(), 1);
        assert_eq!(second.body["quests"].as_array().unwrap().len(), 1);
        assert_eq!(
            first.body["quests"][0]["id"],
            second.body["quests"][0]["id"]
        );
    }

    #[tokio::test]
    async fn the_answer_is_never_serialized_to_teams() {
        let app = TestApp::spawn().await;
        let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
        let tid = seed_default_tournament(&app, &staff).await;
        create_quest(&app, &staff, tid, "Lighthouse", "ALPHA", &[]).await;

        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;
        let res = app.get_with_token(routes::QUESTS, &token).await;

        assert!(!res.text.contains("ALPHA"), "answer leaked: {}", res.text);
    }

    #[tokio::test]
    async fn listing_requires_the_default_tournament_to_exist() {
        let app = TestApp::spawn().await;
        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;

        let res = app.get_with_token(routes::QUESTS, &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn listing_requires_authentication() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::QUESTS).await;

        assert_eq!(res.status, 401);
    }
}

mod answer_submission {
    use super::*;

    async fn team_with_progress(app: &TestApp) -> (String, i32) {
        let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
        let tid = seed_default_tournament(app, &staff).await;
        let quest_id = create_quest(app, &staff, tid, "Lighthouse", "ALPHA", &[]).await;

        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;
        let list = app.get_with_token(routes::QUESTS, &token).await;
        let progress_id = progress_for(&list.body, quest_id)["id"].as_i64().unwrap() as i32;
        (token, progress_id)
    }

    #[tokio::test]
    async fn correct_answer_sets_status_ready_and_stamps_done_time() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_progress(&app).await;

        let res = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "ALPHA"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200, "submit failed: {}", res.text);
        assert_eq!(res.body["status"], "READY");
        assert!(res.body["done_time"].is_string());
    }

    #[tokio::test]
    async fn incorrect_answer_sets_status_fail_but_still_stamps_done_time() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_progress(&app).await;

        let res = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "GAMMA"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 200);
        assert_eq!(res.body["status"], "FAIL");
        assert!(res.body["done_time"].is_string());
    }

    #[tokio::test]
    async fn comparison_is_case_sensitive_with_no_trimming() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_progress(&app).await;

        let lowercase = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "alpha"}),
                &token,
            )
            .await;
        assert_eq!(lowercase.body["status"], "FAIL");

        let padded = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": " ALPHA "}),
                &token,
            )
            .await;
        assert_eq!(padded.body["status"], "FAIL");
    }

    #[tokio::test]
    async fn resubmission_overwrites_an_earlier_result() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_progress(&app).await;

        let first = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "ALPHA"}),
                &token,
            )
            .await;
        assert_eq!(first.body["status"], "READY");

        // A later wrong answer replaces the earlier READY.
        let second = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "WRONG"}),
                &token,
            )
            .await;
        assert_eq!(second.body["status"], "FAIL");
    }

    #[tokio::test]
    async fn empty_answer_is_rejected() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_progress(&app).await;

        let res = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": ""}),
                &token,
            )
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn cannot_submit_against_another_teams_progress_row() {
        let app = TestApp::spawn().await;
        let (_owner_token, progress_id) = team_with_progress(&app).await;

        let intruder = app
            .register_and_login("foxes@example.com", "Foxes", "securepass")
            .await;
        let res = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": progress_id, "answer": "ALPHA"}),
                &intruder,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn submitting_against_a_nonexistent_progress_row_is_a_404() {
        let app = TestApp::spawn().await;
        let (token, _) = team_with_progress(&app).await;

        let res = app
            .post_with_token(
                routes::QUESTS_SUBMIT,
                &json!({"id": 999_999, "answer": "ALPHA"}),
                &token,
            )
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod hint_reveal {
    use super::*;

    async fn team_with_hinted_quest(app: &TestApp) -> (String, i32) {
        let staff = app.staff_team("staff@example.com", "Staff", "securepass").await;
        let tid = seed_default_tournament(app, &staff).await;
        let quest_id = create_quest(
            app,
            &staff,
            tid,
            "Lighthouse",
            "ALPHA",
            &["first hint", "second hint"],
        )
        .await;

        let token = app
            .register_and_login("owls@example.com", "Night Owls", "securepass")
            .await;
        let list = app.get_with_token(routes::QUESTS, &token).await;
        let progress_id = progress_for(&list.body, quest_id)["id"].as_i64().unwrap() as i32;
        (token, progress_id)
    }

    #[tokio::test]
    async fn hints_are_revealed_in_order_and_counted() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_hinted_quest(&app).await;

        let first = app
            .post_with_token(&routes::quest_hint(progress_id), &json!({}), &token)
            .await;
        assert_eq!(first.status, 200, "hint reveal failed: {}", first.text);
        assert_eq!(first.body["hint"], "first hint");
        assert_eq!(first.body["hints_used"], 1);
        assert_eq!(first.body["hints_available"], 2);

        let second = app
            .post_with_token(&routes::quest_hint(progress_id), &json!({}), &token)
            .await;
        assert_eq!(second.body["hint"], "second hint");
        assert_eq!(second.body["hints_used"], 2);
    }

    #[tokio::test]
    async fn revealing_past_the_last_hint_is_a_conflict() {
        let app = TestApp::spawn().await;
        let (token, progress_id) = team_with_hinted_quest(&app).await;

        for _ in 0..2 {
            app.post_with_token(&routes::quest_hint(progress_id), &json!({}), &token)
                .await;
        }
        let res = app
            .post_with_token(&routes::quest_hint(progress_id), &json!({}), &token)
            .await;

        assert_eq!(res.status, 409);
        assert_eq!(res.body["code"], "CONFLICT");
    }

    #[tokio::test]
    async fn cannot_reveal_hints_on_another_teams_progress_row() {
        let app = TestApp::spawn().await;
        let (_owner_token, progress_id) = team_with_hinted_quest(&app).await;

        let intruder = app
            .register_and_login("foxes@example.com", "Foxes", "securepass")
            .await;
        let res = app
            .post_with_token(&routes::quest_hint(progress_id), &json!({}), &intruder)
            .await;

        assert_eq!(res.status, 404);
    }
}
