use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::pipeline::{FieldValue, Fields, SortOrder};

pub const ACCOUNT_STATUS_ACTIVE: &str = "active";

#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    pub title: String,
    pub detail: Option<String>,
    pub deadline: Option<String>,
    pub status: bool,
    pub user_id: String,
    #[sqlx(default)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

impl Todo {
    /// The empty record a create form starts from.
    pub fn blank() -> Self {
        Self {
            id: 0,
            title: String::new(),
            detail: Some(String::new()),
            deadline: Some(String::new()),
            status: false,
            user_id: String::new(),
            role: None,
        }
    }

    pub fn changes(&self) -> TodoChanges {
        TodoChanges {
            deadline: self.deadline.clone(),
            title: self.title.clone(),
            detail: self.detail.clone(),
            status: self.status,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TodoField {
    Id,
    Title,
    Detail,
    Deadline,
    Status,
    UserId,
}

impl Fields for Todo {
    type Field = TodoField;

    fn field(&self, field: TodoField) -> FieldValue<'_> {
        match field {
            TodoField::Id => FieldValue::Number(self.id),
            TodoField::Title => FieldValue::Text(&self.title),
            TodoField::Detail => self
                .detail
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            TodoField::Deadline => FieldValue::Deadline(
                self.deadline.as_deref().filter(|deadline| !deadline.is_empty()),
            ),
            TodoField::Status => FieldValue::Flag(self.status),
            TodoField::UserId => FieldValue::Text(&self.user_id),
        }
    }
}

/// Row payload for a todo insert; the id is assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTodo {
    pub title: String,
    pub detail: Option<String>,
    pub deadline: Option<String>,
    pub status: bool,
    pub user_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoChanges {
    pub deadline: Option<String>,
    pub title: String,
    pub detail: Option<String>,
    pub status: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    /// The first account ever registered administers the rest.
    pub fn for_user_count(existing_users: i64) -> Self {
        if existing_users == 0 {
            Role::Admin
        } else {
            Role::User
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::User => "user",
        }
    }
}

/// A user as the application sees it: the auth identity merged with its
/// profile row.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ExtendedUser {
    pub id: String,
    pub email: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub account_status: Option<String>,
}

impl ExtendedUser {
    pub fn is_admin(&self) -> bool {
        self.role == Some(Role::Admin)
    }

    /// Copies the profile-only columns onto the auth identity. `role` is
    /// always overwritten, even with `None`.
    pub fn merge_profile(&mut self, profile: &ExtendedUser) {
        if profile.username.is_some() {
            self.username = profile.username.clone();
        }
        if profile.account_status.is_some() {
            self.account_status = profile.account_status.clone();
        }
        self.role = profile.role;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    Id,
    Email,
    Username,
    Role,
    AccountStatus,
}

impl Fields for ExtendedUser {
    type Field = UserField;

    fn field(&self, field: UserField) -> FieldValue<'_> {
        match field {
            UserField::Id => FieldValue::Text(&self.id),
            UserField::Email => FieldValue::Text(&self.email),
            UserField::Username => self
                .username
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
            UserField::Role => self
                .role
                .map_or(FieldValue::Missing, |role| FieldValue::Text(role.as_str())),
            UserField::AccountStatus => self
                .account_status
                .as_deref()
                .map_or(FieldValue::Missing, FieldValue::Text),
        }
    }
}

/// Editable profile columns, also the body of a profile update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDraft {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub account_status: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoSortField {
    #[default]
    Id,
    Title,
    Deadline,
}

impl From<TodoSortField> for TodoField {
    fn from(sort: TodoSortField) -> Self {
        match sort {
            TodoSortField::Id => TodoField::Id,
            TodoSortField::Title => TodoField::Title,
            TodoSortField::Deadline => TodoField::Deadline,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserSortField {
    #[default]
    Id,
    Username,
    Email,
    Role,
}

impl From<UserSortField> for UserField {
    fn from(sort: UserSortField) -> Self {
        match sort {
            UserSortField::Id => UserField::Id,
            UserSortField::Username => UserField::Username,
            UserSortField::Email => UserField::Email,
            UserSortField::Role => UserField::Role,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoCriteria {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub sort: TodoSortField,
    #[serde(default)]
    pub order: SortOrder,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCriteria {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub sort: UserSortField,
    #[serde(default)]
    pub order: SortOrder,
}

/// Credential row of the auth service. Never leaves the backend.
#[derive(Debug, Clone, FromRow)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

impl axum_login::AuthUser for Account {
    type Id = String;

    fn id(&self) -> Self::Id {
        self.id.clone()
    }

    // when user changes password, auth session becomes invalid
    fn session_auth_hash(&self) -> &[u8] {
        self.password_hash.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_registrant_is_admin() {
        assert_eq!(Role::for_user_count(0), Role::Admin);
        assert_eq!(Role::for_user_count(1), Role::User);
        assert_eq!(Role::for_user_count(42), Role::User);
    }

    #[test]
    fn merge_profile_overwrites_role() {
        let mut user = ExtendedUser {
            id: "u1".into(),
            email: "a@example.com".into(),
            username: Some("old".into()),
            role: Some(Role::Admin),
            account_status: None,
        };
        let profile = ExtendedUser {
            id: "u1".into(),
            email: "ignored@example.com".into(),
            username: None,
            role: None,
            account_status: Some(ACCOUNT_STATUS_ACTIVE.into()),
        };

        user.merge_profile(&profile);

        assert_eq!(user.email, "a@example.com");
        assert_eq!(user.username.as_deref(), Some("old"));
        assert_eq!(user.role, None);
        assert_eq!(user.account_status.as_deref(), Some("active"));
    }

    #[test]
    fn empty_deadline_reads_as_missing() {
        let mut todo = Todo::blank();
        assert_eq!(todo.field(TodoField::Deadline), FieldValue::Deadline(None));
        todo.deadline = Some("2024-01-01".into());
        assert_eq!(
            todo.field(TodoField::Deadline),
            FieldValue::Deadline(Some("2024-01-01"))
        );
    }

    #[test]
    fn criteria_deserialize_from_lowercase() {
        let criteria: TodoCriteria =
            serde_json::from_str(r#"{"search":"x","completed":true,"sort":"deadline","order":"desc"}"#)
                .unwrap();
        assert_eq!(criteria.sort, TodoSortField::Deadline);
        assert_eq!(criteria.order, SortOrder::Desc);
        assert!(criteria.completed);
    }
}
