//! HTTP face of the client: each handler plays one UI interaction.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::CONTENT_TYPE, Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Redirect, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::app::App;
use crate::backend::Backend;
use crate::entities::{ExtendedUser, ProfileDraft, Todo, TodoChanges, TodoCriteria, UserCriteria};
use crate::error::AppError;
use crate::navigation::RouteHistory;
use crate::prompt::ScriptedPrompt;

pub struct HttpState<B> {
    pub app: App<B>,
    pub history: Arc<RouteHistory>,
}

impl<B> Clone for HttpState<B> {
    fn clone(&self) -> Self {
        Self {
            app: self.app.clone(),
            history: self.history.clone(),
        }
    }
}

impl<B: Backend> HttpState<B> {
    /// Turns the latest navigation into a redirect.
    fn follow_navigation(&self) -> Response {
        match self.history.take_last() {
            Some(route) => Redirect::to(&route.to_uri()).into_response(),
            None => StatusCode::NO_CONTENT.into_response(),
        }
    }

    async fn require_session(&self) -> Result<(), AppError> {
        if self.app.check_user().await {
            Ok(())
        } else {
            Err(AppError::Unauthorized)
        }
    }

    async fn find_todo(&self, id: i64) -> Result<Todo, AppError> {
        self.app.fetch_todos().await;
        self.app
            .todos()
            .await
            .into_iter()
            .find(|todo| todo.id == id)
            .ok_or(AppError::TodoNotFound(id))
    }
}

pub fn router<B: Backend>(app: App<B>, history: Arc<RouteHistory>) -> Router {
    let state = HttpState { app, history };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/healthz", get(|| async { StatusCode::NO_CONTENT }))
        .route("/signup", post(sign_up::<B>))
        .route("/login", post(login::<B>))
        .route("/logout", post(logout::<B>))
        .route("/session", get(session::<B>))
        .route("/todos", get(list_todos::<B>).post(create_todo::<B>))
        .route("/todos/{id}", put(update_todo::<B>).delete(delete_todo::<B>))
        .route("/users", get(list_users::<B>))
        .route("/users/{id}", put(update_user::<B>))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            track_activity::<B>,
        ))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any request counts as user activity.
async fn track_activity<B: Backend>(
    State(http): State<HttpState<B>>,
    request: Request,
    next: Next,
) -> Response {
    http.app.reset_inactivity_timer().await;
    next.run(request).await
}

#[derive(Debug, Deserialize)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LogoutQuery {
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    pub title: String,
    #[serde(default)]
    pub detail: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteQuery {
    #[serde(default)]
    pub confirm: bool,
}

async fn sign_up<B: Backend>(
    State(http): State<HttpState<B>>,
    Json(request): Json<SignUpRequest>,
) -> Result<Response, AppError> {
    http.history.take_last();
    http.app
        .sign_up(&request.username, &request.email, &request.password)
        .await
        .ok_or(AppError::SignUpFailed)?;
    Ok(http.follow_navigation())
}

async fn login<B: Backend>(
    State(http): State<HttpState<B>>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, AppError> {
    http.history.take_last();
    http.app
        .login(&request.email, &request.password)
        .await
        .ok_or(AppError::Unauthorized)?;
    Ok(http.follow_navigation())
}

async fn logout<B: Backend>(
    State(http): State<HttpState<B>>,
    Query(query): Query<LogoutQuery>,
) -> Response {
    http.history.take_last();
    http.app.logout(query.reason.as_deref()).await;
    http.follow_navigation()
}

async fn session<B: Backend>(State(http): State<HttpState<B>>) -> Result<Response, AppError> {
    http.require_session().await?;
    Ok(Json(http.app.current_user().await).into_response())
}

async fn list_todos<B: Backend>(
    State(http): State<HttpState<B>>,
    Query(criteria): Query<TodoCriteria>,
) -> Result<Json<Vec<Todo>>, AppError> {
    http.require_session().await?;
    http.app.set_todo_criteria(criteria).await;
    http.app.fetch_todos().await;
    Ok(Json(http.app.sorted_todos().await))
}

async fn create_todo<B: Backend>(
    State(http): State<HttpState<B>>,
    Json(request): Json<DraftRequest>,
) -> Result<Response, AppError> {
    http.require_session().await?;
    http.app.toggle_edit_mode(false).await;
    http.app
        .edit_draft(|draft| {
            draft.title = request.title;
            draft.detail = request.detail;
            draft.deadline = request.deadline;
        })
        .await;

    let prompt = ScriptedPrompt::default();
    http.app.save_todo(&prompt).await;

    let alerts = prompt.alerts();
    if !alerts.is_empty() {
        return Err(AppError::Rejected(alerts));
    }
    Ok((StatusCode::CREATED, Json(http.app.sorted_todos().await)).into_response())
}

async fn update_todo<B: Backend>(
    State(http): State<HttpState<B>>,
    Path(id): Path<i64>,
    Json(changes): Json<TodoChanges>,
) -> Result<Json<Vec<Todo>>, AppError> {
    http.require_session().await?;
    let current = http.find_todo(id).await?;

    let edited = Todo {
        title: changes.title,
        detail: changes.detail,
        deadline: changes.deadline,
        status: changes.status,
        ..current
    };
    http.app.set_edit_mode(&edited).await;
    http.app.save_todo(&ScriptedPrompt::default()).await;

    Ok(Json(http.app.sorted_todos().await))
}

async fn delete_todo<B: Backend>(
    State(http): State<HttpState<B>>,
    Path(id): Path<i64>,
    Query(query): Query<DeleteQuery>,
) -> Result<Json<Vec<Todo>>, AppError> {
    http.require_session().await?;
    let todo = http.find_todo(id).await?;

    let prompt = ScriptedPrompt::answering(query.confirm);
    http.app.delete_todo(&todo, &prompt).await;

    Ok(Json(http.app.sorted_todos().await))
}

async fn list_users<B: Backend>(
    State(http): State<HttpState<B>>,
    Query(criteria): Query<UserCriteria>,
) -> Result<Response, AppError> {
    http.require_session().await?;
    if !http.app.is_admin().await {
        return Err(AppError::Forbidden);
    }

    http.app.set_user_criteria(criteria).await;
    http.app.fetch_all_users().await;
    Ok(Json(http.app.sorted_users().await).into_response())
}

async fn update_user<B: Backend>(
    State(http): State<HttpState<B>>,
    Path(id): Path<String>,
    Json(draft): Json<ProfileDraft>,
) -> Result<StatusCode, AppError> {
    http.require_session().await?;
    let current = http.app.current_user().await.ok_or(AppError::Unauthorized)?;
    // the auth email change applies to the session user, so only self-edits
    if current.id != id {
        return Err(AppError::Forbidden);
    }
    if !current.is_admin() && changes_access(&current, &draft) {
        return Err(AppError::Forbidden);
    }

    http.app.set_profile_draft(draft).await;
    if http.app.update_profile(&id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::ProfileUpdateFailed)
    }
}

/// Whether `draft` alters the role or account status of `user`.
fn changes_access(user: &ExtendedUser, draft: &ProfileDraft) -> bool {
    let role_changed = draft.role.is_some_and(|role| user.role != Some(role));
    let status_changed = draft
        .account_status
        .as_ref()
        .is_some_and(|status| user.account_status.as_ref() != Some(status));
    role_changed || status_changed
}
