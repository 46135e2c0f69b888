use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/auth", auth_routes())
        .nest("/quests", quest_routes())
        .nest("/tournaments", tournament_routes())
        .nest("/tournament", leaderboard_routes())
}

fn auth_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::auth::register))
        .routes(routes!(handlers::auth::login))
        .routes(routes!(handlers::auth::me))
}

fn quest_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::quest::list_quests))
        .routes(routes!(handlers::quest::submit_answer))
        .routes(routes!(handlers::quest::reveal_hint))
}

fn tournament_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(
            handlers::tournament::create_tournament,
            handlers::tournament::list_tournaments
        ))
        .routes(routes!(
            handlers::tournament::get_tournament,
            handlers::tournament::delete_tournament
        ))
        .routes(routes!(
            handlers::tournament::create_quest,
            handlers::tournament::list_tournament_quests
        ))
        .routes(routes!(handlers::tournament::delete_quest))
}

/// `GET /api/v1/tournament` is the leaderboard of the configured default
/// tournament.
fn leaderboard_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(handlers::tournament::leaderboard))
}
