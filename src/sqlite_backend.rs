use async_trait::async_trait;
use axum_login::AuthnBackend;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::authentication::{Credentials, SqliteAuthBackend};
use crate::backend::{Backend, BackendError, Session};
use crate::crud_ops;
use crate::entities::{Account, ExtendedUser, NewTodo, ProfileDraft, Todo, TodoChanges};

/// Local stand-in for the hosted auth + storage service. Holds a single
/// session, like the client it serves.
#[derive(Debug)]
pub struct SqliteBackend {
    auth: SqliteAuthBackend,
    session: Mutex<Option<Session>>,
}

impl SqliteBackend {
    pub async fn connect(database_url: &str) -> Result<Self, BackendError> {
        let sqlite_pool = SqlitePoolOptions::new().connect(database_url).await?;
        info!("connected to {database_url}");
        Self::with_pool(sqlite_pool).await
    }

    pub async fn with_pool(sqlite_pool: SqlitePool) -> Result<Self, BackendError> {
        sqlx::migrate!().run(&sqlite_pool).await?;

        Ok(Self {
            auth: SqliteAuthBackend::new(sqlite_pool),
            session: Mutex::new(None),
        })
    }

    fn pool(&self) -> &SqlitePool {
        &self.auth.sqlite_pool
    }

    async fn session_user_id(&self) -> Result<String, BackendError> {
        self.session
            .lock()
            .await
            .as_ref()
            .map(|session| session.user.id.clone())
            .ok_or(BackendError::NoSession)
    }
}

fn identity(account: &Account) -> ExtendedUser {
    ExtendedUser {
        id: account.id.clone(),
        email: account.email.clone(),
        username: None,
        role: None,
        account_status: None,
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<ExtendedUser>, BackendError> {
        let account = self.auth.register(email, password).await?;
        debug!(id = %account.id, "registered account");
        Ok(Some(identity(&account)))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExtendedUser, BackendError> {
        let credentials = Credentials {
            email: email.to_owned(),
            password: password.to_owned(),
        };
        let account = self
            .auth
            .authenticate(credentials)
            .await?
            .ok_or(BackendError::InvalidCredentials)?;

        let user = identity(&account);
        *self.session.lock().await = Some(Session { user: user.clone() });
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.session.lock().await.take();
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let mut session = self.session.lock().await;
        let Some(user_id) = session.as_ref().map(|current| current.user.id.clone()) else {
            return Ok(None);
        };

        // the account may have been removed since sign-in
        match self.auth.get_user(&user_id).await? {
            Some(account) => {
                let refreshed = Session {
                    user: identity(&account),
                };
                *session = Some(refreshed.clone());
                Ok(Some(refreshed))
            }
            None => {
                session.take();
                Ok(None)
            }
        }
    }

    async fn update_user_email(&self, email: &str) -> Result<ExtendedUser, BackendError> {
        let user_id = self.session_user_id().await?;
        let account = self.auth.change_email(&user_id, email).await?;
        let user = identity(&account);
        *self.session.lock().await = Some(Session { user: user.clone() });
        Ok(user)
    }

    async fn user_count(&self) -> Result<i64, BackendError> {
        crud_ops::count_profiles(self.pool()).await
    }

    async fn select_profiles(&self) -> Result<Vec<ExtendedUser>, BackendError> {
        crud_ops::select_profiles(self.pool()).await
    }

    async fn select_profile(&self, user_id: &str) -> Result<Option<ExtendedUser>, BackendError> {
        crud_ops::select_profile(self.pool(), user_id).await
    }

    async fn insert_profile(&self, profile: &ExtendedUser) -> Result<(), BackendError> {
        crud_ops::insert_profile(self.pool(), profile).await
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileDraft,
    ) -> Result<(), BackendError> {
        crud_ops::update_profile(self.pool(), user_id, changes).await
    }

    async fn select_todos(&self) -> Result<Vec<Todo>, BackendError> {
        let user_id = self.session_user_id().await?;
        crud_ops::select_todos(self.pool(), &user_id).await
    }

    async fn insert_todo(&self, todo: &NewTodo) -> Result<Vec<Todo>, BackendError> {
        let user_id = self.session_user_id().await?;
        if todo.user_id != user_id {
            return Err(BackendError::Rejected(
                "todo owner does not match the session".into(),
            ));
        }
        crud_ops::insert_todo(self.pool(), todo).await
    }

    async fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<(), BackendError> {
        let user_id = self.session_user_id().await?;
        crud_ops::update_todo(self.pool(), &user_id, id, changes).await
    }

    async fn delete_todo(&self, id: i64) -> Result<(), BackendError> {
        let user_id = self.session_user_id().await?;
        crud_ops::delete_todo(self.pool(), &user_id, id).await
    }
}
