use crate::backend::BackendError;
use crate::entities::Account;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Credential store of the auth service, backed by the `accounts` table.
#[derive(Debug, Clone)]
pub struct SqliteAuthBackend {
    pub sqlite_pool: sqlx::SqlitePool,
}

impl SqliteAuthBackend {
    pub fn new(sqlite_pool: sqlx::SqlitePool) -> Self {
        Self { sqlite_pool }
    }

    pub async fn register(&self, email: &str, password: &str) -> Result<Account, BackendError> {
        let existing: Option<Account> = sqlx::query_as("select * from accounts where email = ?")
            .bind(email)
            .fetch_optional(&self.sqlite_pool)
            .await?;
        if existing.is_some() {
            return Err(BackendError::AlreadyRegistered(email.to_owned()));
        }

        // argon2 hashing blocks, same as verification below
        let password = password.to_owned();
        let password_hash =
            tokio::task::spawn_blocking(move || password_auth::generate_hash(password)).await?;

        let account: Account = sqlx::query_as(
            "insert into accounts (id, email, password_hash) values (?, ?, ?) returning *",
        )
        .bind(uuid::Uuid::new_v4().to_string())
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.sqlite_pool)
        .await?;

        Ok(account)
    }

    pub async fn change_email(&self, id: &str, email: &str) -> Result<Account, BackendError> {
        let account: Option<Account> =
            sqlx::query_as("update accounts set email = ? where id = ? returning *")
                .bind(email)
                .bind(id)
                .fetch_optional(&self.sqlite_pool)
                .await?;

        account.ok_or_else(|| BackendError::NotFound(id.to_owned()))
    }
}

#[async_trait::async_trait]
impl axum_login::AuthnBackend for SqliteAuthBackend {
    type User = Account;
    type Credentials = self::Credentials;
    type Error = BackendError;

    async fn authenticate(
        &self,
        creds: Self::Credentials,
    ) -> Result<Option<Self::User>, Self::Error> {
        let account: Option<Self::User> = sqlx::query_as("select * from accounts where email = ?")
            .bind(creds.email)
            .fetch_optional(&self.sqlite_pool)
            .await?;

        // `password_auth::verify_password()` is blocking, hence using `tokio::task::spawn_blocking()`
        tokio::task::spawn_blocking(|| {
            // compares form input with argon2 password hash
            Ok(account.filter(|account| {
                password_auth::verify_password(creds.password, &account.password_hash).is_ok()
            }))
        })
        .await?
    }

    async fn get_user(
        &self,
        user_id: &axum_login::UserId<Self>,
    ) -> Result<Option<Self::User>, Self::Error> {
        let account = sqlx::query_as("select * from accounts where id = ?")
            .bind(user_id)
            .fetch_optional(&self.sqlite_pool)
            .await?;

        Ok(account)
    }
}
