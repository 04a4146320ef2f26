//! Sign-up, login, logout and session checks. Every operation reports
//! failure through its return value and the log, never through an error.

use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::backend::Backend;
use crate::entities::{ExtendedUser, Role, ACCOUNT_STATUS_ACTIVE};
use crate::navigation::Route;
use crate::storage::USER_KEY;

pub const INACTIVITY_LOGOUT_REASON: &str =
    "*You have been automatically logged out due to inactivity.";

impl<B: Backend> App<B> {
    /// Registers a user and their profile row. The very first registrant
    /// becomes an admin.
    pub async fn sign_up(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Option<ExtendedUser> {
        let existing_users = match self.backend.user_count().await {
            Ok(count) => count,
            Err(e) => {
                error!("failed to check user count: {e}");
                return None;
            }
        };
        debug!(existing_users, "counted registered users");
        let role = Role::for_user_count(existing_users);

        let user = match self.backend.sign_up(email, password).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                error!("sign-up returned no user");
                return None;
            }
            Err(e) => {
                error!("sign-up error: {e}");
                return None;
            }
        };
        self.state.lock().await.user = Some(user.clone());

        let profile = ExtendedUser {
            id: user.id.clone(),
            email: user.email.clone(),
            username: Some(username.to_owned()),
            role: Some(role),
            account_status: Some(ACCOUNT_STATUS_ACTIVE.to_owned()),
        };
        if let Err(e) = self.backend.insert_profile(&profile).await {
            error!(user_id = %user.id, "user role assignment failed: {e}");
        }

        self.navigator.navigate(Route::VerifyEmail);
        self.state.lock().await.user.clone()
    }

    pub async fn login(&self, email: &str, password: &str) -> Option<ExtendedUser> {
        let user = match self.backend.sign_in_with_password(email, password).await {
            Ok(user) => user,
            Err(e) => {
                error!("login error: {e}");
                return None;
            }
        };
        info!(user_id = %user.id, "user authenticated");

        {
            let mut state = self.state.lock().await;
            state.user = Some(user.clone());
            state.is_authenticated = true;
        }
        match serde_json::to_value(&user) {
            Ok(value) => {
                if let Err(e) = self.storage.set(USER_KEY, value) {
                    warn!("failed to persist user: {e}");
                }
            }
            Err(e) => warn!("failed to serialize user: {e}"),
        }

        self.navigator.navigate(Route::Todos);
        Some(user)
    }

    /// Signs out remotely, then always wipes the local session, even when
    /// the remote call failed.
    pub async fn logout(&self, reason: Option<&str>) {
        if let Err(e) = self.backend.sign_out().await {
            error!("sign-out error: {e}");
        }
        self.clear_local_session().await;

        self.navigator.navigate(Route::Root {
            message: reason.map(str::to_owned),
        });
    }

    /// Re-reads the session and merges the profile row into the current
    /// user. Returns whether a session exists.
    pub async fn check_user(&self) -> bool {
        let session = match self.backend.get_session().await {
            Ok(Some(session)) => session,
            Ok(None) => {
                info!("no active session found, user is logged out");
                self.clear_local_session().await;
                return false;
            }
            Err(e) => {
                error!("error getting session: {e}");
                self.clear_local_session().await;
                return false;
            }
        };

        let mut user = session.user;
        {
            let mut state = self.state.lock().await;
            state.user = Some(user.clone());
            state.is_authenticated = true;
        }

        match self.backend.select_profile(&user.id).await {
            Ok(Some(profile)) => user.merge_profile(&profile),
            Ok(None) => {
                warn!(user_id = %user.id, "no profile row for user");
                user.role = None;
            }
            Err(e) => {
                error!(user_id = %user.id, "failed to fetch user profile: {e}");
                user.role = None;
            }
        }
        debug!(role = ?user.role, "merged user profile");
        self.state.lock().await.user = Some(user);

        self.start_inactivity_timer().await;
        true
    }

    pub async fn is_admin(&self) -> bool {
        self.state
            .lock()
            .await
            .user
            .as_ref()
            .is_some_and(ExtendedUser::is_admin)
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.is_authenticated
    }

    pub async fn current_user(&self) -> Option<ExtendedUser> {
        self.state.lock().await.user.clone()
    }

    /// Arms the logout timer, replacing any pending one. Does nothing while
    /// signed out.
    pub async fn start_inactivity_timer(&self) {
        let mut state = self.state.lock().await;
        if !state.is_authenticated {
            return;
        }

        let app = self.clone();
        state
            .inactivity_timer
            .start(self.inactivity_timeout, move || async move {
                info!("automatic logout: no activity for {:?}", app.inactivity_timeout);
                app.logout(Some(INACTIVITY_LOGOUT_REASON)).await;
            });
    }

    pub async fn clear_inactivity_timer(&self) {
        self.state.lock().await.inactivity_timer.clear();
    }

    /// Activity handler: restarts the countdown for a signed-in user.
    pub async fn reset_inactivity_timer(&self) {
        self.start_inactivity_timer().await;
    }

    async fn clear_local_session(&self) {
        self.state.lock().await.clear_user();
        if let Err(e) = self.storage.remove(USER_KEY) {
            warn!("failed to remove persisted user: {e}");
        }
    }
}
