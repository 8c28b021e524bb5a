// HTTP surface
//
// Routes map onto the lifecycle handlers; the principal extractor and the
// owner guard stand in front of them, so denied requests never reach a
// handler body.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use uuid::Uuid;

use crate::account::{
    Account, AccountController, AccountForm, AccountStore, AccountView, ControllerError, Owner,
};
use crate::notify::{Notification, NotificationLog};

/// Header carrying the authenticated username, set by the fronting session
/// layer
pub const AUTH_USER_HEADER: &str = "x-teller-user";

#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<AccountController>,
    pub store: Arc<dyn AccountStore>,
    pub notifications: NotificationLog,
}

/// Authenticated principal for the current request
#[derive(Debug, Clone)]
pub struct Principal {
    pub username: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for Principal
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(AUTH_USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|username| !username.is_empty())
            .map(|username| Principal {
                username: username.to_string(),
            })
            .ok_or((StatusCode::UNAUTHORIZED, "authentication required"))
    }
}

/// Owner overview, the redirect target after account creation
#[derive(Debug, Serialize)]
pub struct UserView {
    pub view: &'static str,
    pub username: String,
    pub accounts: Vec<Account>,
    pub notifications: Vec<Notification>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/accounts", post(create_account))
        .route("/accounts/:id", get(display_account))
        .route("/user", get(user_overview))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any),
                ),
        )
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// POST /accounts: submit an application, redirect to the owner overview
async fn create_account(
    State(state): State<AppState>,
    principal: Principal,
    Json(form): Json<AccountForm>,
) -> Result<Redirect, StatusCode> {
    let owner = Owner::new(principal.username);
    match state.controller.create_account(owner, form).await {
        Ok(_) => Ok(Redirect::to("/user")),
        Err(e) => {
            warn!("Failed to create account: {:?}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /accounts/{id}: view an account. Only the owner may see it; the guard
/// runs before the handler body.
async fn display_account(
    State(state): State<AppState>,
    principal: Principal,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountView>, StatusCode> {
    let account = match state.store.find(id).await {
        Ok(Some(account)) => account,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => {
            warn!("Failed to load account for authorization: {:?}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    if account.owner.email != principal.username {
        return Err(StatusCode::FORBIDDEN);
    }

    match state.controller.display_account(id).await {
        Ok(view) => Ok(Json(view)),
        Err(e) => {
            warn!("Failed to display account: {:?}", e);
            Err(error_status(&e))
        }
    }
}

/// GET /user: the principal's accounts and notifications
async fn user_overview(
    State(state): State<AppState>,
    principal: Principal,
) -> Result<Json<UserView>, StatusCode> {
    let accounts = match state.store.find_by_owner(&principal.username).await {
        Ok(accounts) => accounts,
        Err(e) => {
            warn!("Failed to list accounts: {:?}", e);
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };
    let notifications = state.notifications.for_owner(&principal.username).await;

    Ok(Json(UserView {
        view: "user",
        username: principal.username,
        accounts,
        notifications,
    }))
}

fn error_status(error: &ControllerError) -> StatusCode {
    match error {
        ControllerError::NotFound(_) => StatusCode::NOT_FOUND,
        ControllerError::Transition(_) => StatusCode::CONFLICT,
        ControllerError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
