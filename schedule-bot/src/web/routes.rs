//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tracing::warn;

use crate::domain::UserId;
use crate::schedule::ScheduleSource;
use crate::stations::StationDirectory;

use super::dto::*;
use super::state::AppState;

/// Longest message text accepted, matching the usual chat message limit.
const MAX_TEXT_CHARS: usize = 4096;

/// Create the application router.
pub fn create_router<D, S>(state: AppState<D, S>) -> Router
where
    D: StationDirectory + 'static,
    S: ScheduleSource + 'static,
{
    Router::new()
        .route("/health", get(health))
        .route("/messages", post(post_message::<D, S>))
        .route("/users/:user_id/routes", get(list_routes::<D, S>))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Feed one message through the user's dialogue.
async fn post_message<D, S>(
    State(state): State<AppState<D, S>>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError>
where
    D: StationDirectory,
    S: ScheduleSource,
{
    if req.text.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "text must not be empty".to_string(),
        });
    }
    if req.text.chars().count() > MAX_TEXT_CHARS {
        return Err(AppError::BadRequest {
            message: format!("text longer than {MAX_TEXT_CHARS} characters"),
        });
    }

    let transition = state
        .dialogue
        .receive(UserId(req.user_id), &req.text, state.now())
        .await;

    Ok(Json(MessageResponse::from(transition)))
}

/// List a user's saved routes.
async fn list_routes<D, S>(
    State(state): State<AppState<D, S>>,
    Path(user_id): Path<i64>,
) -> Json<RoutesResponse> {
    let store = state.dialogue.store();
    let routes = store.list(UserId(user_id));

    Json(RoutesResponse {
        user_id,
        routes: routes.iter().map(RouteResult::from).collect(),
        limit: store.max_routes(),
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
        };

        warn!(%status, %message, "request rejected");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use tempfile::{TempDir, tempdir};

    use crate::cache::CacheConfig;
    use crate::dialogue::{Dialogue, GET_SCHEDULE};
    use crate::schedule::FetcherConfig;
    use crate::store::{RouteStore, RouteStoreConfig};
    use crate::yandex::MockYandexClient;

    fn state() -> (TempDir, AppState<MockYandexClient, MockYandexClient>) {
        let dir = tempdir().unwrap();
        let store = Arc::new(RouteStore::open(RouteStoreConfig::new(dir.path())));
        let mock = MockYandexClient::new();
        let dialogue = Dialogue::new(
            mock.clone(),
            mock,
            store,
            &CacheConfig::default(),
            FetcherConfig::default(),
        );
        let offset = chrono::FixedOffset::east_opt(3 * 3600).unwrap();
        (dir, AppState::new(dialogue, offset))
    }

    fn message(user_id: i64, text: &str) -> Json<MessageRequest> {
        Json(MessageRequest {
            user_id,
            text: text.to_string(),
        })
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn messages_drive_the_session() {
        let (_dir, state) = state();

        let Json(resp) = post_message(State(state.clone()), message(1, "/start"))
            .await
            .unwrap();
        assert_eq!(resp.state, "selecting_action");
        assert!(!resp.messages.is_empty());

        let Json(resp) = post_message(State(state), message(1, GET_SCHEDULE))
            .await
            .unwrap();
        assert_eq!(resp.state, "choosing_origin");

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["keyboard"]["kind"], "buttons");
    }

    #[tokio::test]
    async fn blank_text_rejected() {
        let (_dir, state) = state();
        let result = post_message(State(state), message(1, "   ")).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn oversized_text_rejected() {
        let (_dir, state) = state();
        let text = "a".repeat(MAX_TEXT_CHARS + 1);
        let result = post_message(State(state), message(1, &text)).await;
        assert!(matches!(result, Err(AppError::BadRequest { .. })));
    }

    #[tokio::test]
    async fn routes_listing() {
        let (_dir, state) = state();
        let Json(resp) = list_routes(State(state.clone()), Path(5)).await;
        assert_eq!(resp.user_id, 5);
        assert!(resp.routes.is_empty());
        assert_eq!(resp.limit, 10);

        let store = state.dialogue.store();
        let klin = crate::stations::popular_station("Клин").unwrap();
        let tver = crate::stations::popular_station("Тверь").unwrap();
        store.add(UserId(5), "Dacha", klin, tver).unwrap();

        let Json(resp) = list_routes(State(state), Path(5)).await;
        assert_eq!(resp.routes.len(), 1);
        assert_eq!(resp.routes[0].name, "Dacha");
        assert_eq!(resp.routes[0].origin.id, "s9602944");
    }

    #[test]
    fn bad_request_maps_to_400() {
        let response = AppError::BadRequest {
            message: "nope".to_string(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
