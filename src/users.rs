use tracing::{debug, error, info, warn};

use crate::app::App;
use crate::backend::Backend;
use crate::entities::{ExtendedUser, ProfileDraft, UserCriteria};

impl<B: Backend> App<B> {
    /// Loads every profile row into the admin list. A failure leaves the
    /// list as it was and yields nothing.
    pub async fn fetch_all_users(&self) -> Vec<ExtendedUser> {
        match self.backend.select_profiles().await {
            Ok(users) => {
                self.state.lock().await.users = users.clone();
                users
            }
            Err(e) => {
                error!("error getting all users: {e}");
                Vec::new()
            }
        }
    }

    pub async fn sorted_users(&self) -> Vec<ExtendedUser> {
        self.state.lock().await.sorted_users()
    }

    pub async fn set_user_criteria(&self, criteria: UserCriteria) {
        self.state.lock().await.user_criteria = criteria;
    }

    pub async fn set_profile_draft(&self, draft: ProfileDraft) {
        self.state.lock().await.profile_draft = draft;
    }

    /// Replaces the current user with the stored profile of `user_id`.
    pub async fn load_user_profile(&self, user_id: &str) {
        if user_id.is_empty() {
            error!("no user id provided");
            return;
        }
        debug!(user_id, "loading profile");

        match self.backend.select_profile(user_id).await {
            Ok(Some(profile)) => self.state.lock().await.user = Some(profile),
            Ok(None) => warn!(user_id, "no profile found for this user"),
            Err(e) => error!(user_id, "error loading user profile: {e}"),
        }
    }

    /// Writes the profile draft to the profile table and the auth service,
    /// then confirms the session still holds.
    pub async fn update_profile(&self, user_id: &str) -> bool {
        if !self.check_user().await {
            warn!("session is invalid or user is not authenticated");
        }
        let draft = self.state.lock().await.profile_draft.clone();

        if let Err(e) = self.backend.update_profile(user_id, &draft).await {
            error!(user_id, "error updating users table: {e}");
            return false;
        }

        let Some(email) = draft.email.as_deref().filter(|email| !email.is_empty()) else {
            error!(user_id, "email is missing in the profile draft");
            return false;
        };
        if let Err(e) = self.backend.update_user_email(email).await {
            error!(user_id, "error updating auth email: {e}");
            return false;
        }

        match self.backend.get_session().await {
            Ok(Some(_)) => {
                info!(user_id, "profile updated");
                true
            }
            Ok(None) => {
                error!("session vanished after profile update");
                false
            }
            Err(e) => {
                error!("error refreshing session: {e}");
                false
            }
        }
    }
}
