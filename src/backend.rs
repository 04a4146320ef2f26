//! The auth + storage service the application talks to.

use async_trait::async_trait;

use crate::entities::{ExtendedUser, NewTodo, ProfileDraft, Todo, TodoChanges};

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    TaskJoin(#[from] tokio::task::JoinError),

    #[error("invalid login credentials")]
    InvalidCredentials,

    #[error("email {0} is already registered")]
    AlreadyRegistered(String),

    #[error("no active session")]
    NoSession,

    #[error("no row matched id {0}")]
    NotFound(String),

    #[error("{0}")]
    Rejected(String),
}

/// The principal the auth service currently considers logged in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: ExtendedUser,
}

#[async_trait]
pub trait Backend: Send + Sync + 'static {
    /// Registers credentials. `Ok(None)` means the service accepted the call
    /// but produced no user.
    async fn sign_up(&self, email: &str, password: &str)
        -> Result<Option<ExtendedUser>, BackendError>;

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExtendedUser, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    async fn get_session(&self) -> Result<Option<Session>, BackendError>;

    async fn update_user_email(&self, email: &str) -> Result<ExtendedUser, BackendError>;

    /// Total number of registered profiles.
    async fn user_count(&self) -> Result<i64, BackendError>;

    async fn select_profiles(&self) -> Result<Vec<ExtendedUser>, BackendError>;

    async fn select_profile(&self, user_id: &str) -> Result<Option<ExtendedUser>, BackendError>;

    async fn insert_profile(&self, profile: &ExtendedUser) -> Result<(), BackendError>;

    async fn update_profile(&self, user_id: &str, changes: &ProfileDraft)
        -> Result<(), BackendError>;

    /// Every todo visible to the current session.
    async fn select_todos(&self) -> Result<Vec<Todo>, BackendError>;

    async fn insert_todo(&self, todo: &NewTodo) -> Result<Vec<Todo>, BackendError>;

    async fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<(), BackendError>;

    async fn delete_todo(&self, id: i64) -> Result<(), BackendError>;
}
