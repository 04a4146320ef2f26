#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use todo_app::entities::{ExtendedUser, NewTodo, ProfileDraft, Todo, TodoChanges};
use todo_app::navigation::RouteHistory;
use todo_app::storage::MemoryStore;
use todo_app::{App, Backend, BackendError, Session};

#[derive(Debug, Default)]
pub struct FakeData {
    pub accounts: Vec<(ExtendedUser, String)>,
    pub session: Option<ExtendedUser>,
    pub profiles: Vec<ExtendedUser>,
    pub todos: Vec<Todo>,
    pub next_todo_id: i64,
    pub calls: Vec<&'static str>,
    pub failing: HashSet<&'static str>,
}

/// In-memory backend that records each call by name and can be told to fail
/// any of them.
#[derive(Debug, Default)]
pub struct FakeBackend {
    pub data: Mutex<FakeData>,
}

impl FakeBackend {
    pub fn fail(&self, call: &'static str) {
        self.data.lock().unwrap().failing.insert(call);
    }

    pub fn recover(&self, call: &'static str) {
        self.data.lock().unwrap().failing.remove(call);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.data.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.data.lock().unwrap().calls.clear();
    }

    pub fn with_session(&self, user: ExtendedUser) {
        self.data.lock().unwrap().session = Some(user);
    }

    pub fn add_profile(&self, profile: ExtendedUser) {
        self.data.lock().unwrap().profiles.push(profile);
    }

    pub fn add_todo(&self, todo: Todo) {
        let mut data = self.data.lock().unwrap();
        data.next_todo_id = data.next_todo_id.max(todo.id);
        data.todos.push(todo);
    }

    pub fn stored_todos(&self) -> Vec<Todo> {
        self.data.lock().unwrap().todos.clone()
    }

    pub fn profiles(&self) -> Vec<ExtendedUser> {
        self.data.lock().unwrap().profiles.clone()
    }

    fn enter(&self, call: &'static str) -> Result<std::sync::MutexGuard<'_, FakeData>, BackendError> {
        let mut data = self.data.lock().unwrap();
        data.calls.push(call);
        if data.failing.contains(call) {
            return Err(BackendError::Rejected(format!("{call} failed")));
        }
        Ok(data)
    }
}

fn session_id(data: &FakeData) -> Result<String, BackendError> {
    data.session
        .as_ref()
        .map(|user| user.id.clone())
        .ok_or(BackendError::NoSession)
}

#[async_trait]
impl Backend for FakeBackend {
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<ExtendedUser>, BackendError> {
        let mut data = self.enter("sign_up")?;
        if data.accounts.iter().any(|(user, _)| user.email == email) {
            return Err(BackendError::AlreadyRegistered(email.into()));
        }
        let user = user(&format!("u{}", data.accounts.len() + 1), email);
        data.accounts.push((user.clone(), password.into()));
        Ok(Some(user))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ExtendedUser, BackendError> {
        let mut data = self.enter("sign_in_with_password")?;
        let user = data
            .accounts
            .iter()
            .find(|(user, secret)| user.email == email && secret == password)
            .map(|(user, _)| user.clone())
            .ok_or(BackendError::InvalidCredentials)?;
        data.session = Some(user.clone());
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let mut data = self.enter("sign_out")?;
        data.session = None;
        Ok(())
    }

    async fn get_session(&self) -> Result<Option<Session>, BackendError> {
        let data = self.enter("get_session")?;
        Ok(data.session.clone().map(|user| Session { user }))
    }

    async fn update_user_email(&self, email: &str) -> Result<ExtendedUser, BackendError> {
        let mut data = self.enter("update_user_email")?;
        let user = data.session.as_mut().ok_or(BackendError::NoSession)?;
        user.email = email.into();
        Ok(user.clone())
    }

    async fn user_count(&self) -> Result<i64, BackendError> {
        let data = self.enter("user_count")?;
        Ok(data.profiles.len() as i64)
    }

    async fn select_profiles(&self) -> Result<Vec<ExtendedUser>, BackendError> {
        let data = self.enter("select_profiles")?;
        Ok(data.profiles.clone())
    }

    async fn select_profile(&self, user_id: &str) -> Result<Option<ExtendedUser>, BackendError> {
        let data = self.enter("select_profile")?;
        Ok(data.profiles.iter().find(|p| p.id == user_id).cloned())
    }

    async fn insert_profile(&self, profile: &ExtendedUser) -> Result<(), BackendError> {
        let mut data = self.enter("insert_profile")?;
        data.profiles.push(profile.clone());
        Ok(())
    }

    async fn update_profile(
        &self,
        user_id: &str,
        changes: &ProfileDraft,
    ) -> Result<(), BackendError> {
        let mut data = self.enter("update_profile")?;
        let profile = data
            .profiles
            .iter_mut()
            .find(|p| p.id == user_id)
            .ok_or_else(|| BackendError::NotFound(user_id.into()))?;
        if let Some(username) = &changes.username {
            profile.username = Some(username.clone());
        }
        if let Some(email) = &changes.email {
            profile.email = email.clone();
        }
        if let Some(role) = changes.role {
            profile.role = Some(role);
        }
        if let Some(status) = &changes.account_status {
            profile.account_status = Some(status.clone());
        }
        Ok(())
    }

    async fn select_todos(&self) -> Result<Vec<Todo>, BackendError> {
        let data = self.enter("select_todos")?;
        let owner = session_id(&data)?;
        Ok(data
            .todos
            .iter()
            .filter(|todo| todo.user_id == owner)
            .cloned()
            .collect())
    }

    async fn insert_todo(&self, todo: &NewTodo) -> Result<Vec<Todo>, BackendError> {
        let mut data = self.enter("insert_todo")?;
        session_id(&data)?;
        data.next_todo_id += 1;
        let inserted = Todo {
            id: data.next_todo_id,
            title: todo.title.clone(),
            detail: todo.detail.clone(),
            deadline: todo.deadline.clone(),
            status: todo.status,
            user_id: todo.user_id.clone(),
            role: None,
        };
        data.todos.push(inserted.clone());
        Ok(vec![inserted])
    }

    async fn update_todo(&self, id: i64, changes: &TodoChanges) -> Result<(), BackendError> {
        let mut data = self.enter("update_todo")?;
        let todo = data
            .todos
            .iter_mut()
            .find(|todo| todo.id == id)
            .ok_or_else(|| BackendError::NotFound(id.to_string()))?;
        todo.title = changes.title.clone();
        todo.detail = changes.detail.clone();
        todo.deadline = changes.deadline.clone();
        todo.status = changes.status;
        Ok(())
    }

    async fn delete_todo(&self, id: i64) -> Result<(), BackendError> {
        let mut data = self.enter("delete_todo")?;
        data.todos.retain(|todo| todo.id != id);
        Ok(())
    }
}

pub fn user(id: &str, email: &str) -> ExtendedUser {
    ExtendedUser {
        id: id.into(),
        email: email.into(),
        username: None,
        role: None,
        account_status: None,
    }
}

pub fn todo(id: i64, user_id: &str, title: &str) -> Todo {
    Todo {
        id,
        title: title.into(),
        detail: None,
        deadline: None,
        status: false,
        user_id: user_id.into(),
        role: None,
    }
}

pub struct Harness {
    pub app: App<FakeBackend>,
    pub backend: Arc<FakeBackend>,
    pub storage: Arc<MemoryStore>,
    pub history: Arc<RouteHistory>,
}

pub fn harness() -> Harness {
    let backend = Arc::new(FakeBackend::default());
    let storage = Arc::new(MemoryStore::default());
    let history = Arc::new(RouteHistory::default());
    let app = App::new(backend.clone(), storage.clone(), history.clone())
        .with_inactivity_timeout(Duration::from_secs(60 * 60));
    Harness {
        app,
        backend,
        storage,
        history,
    }
}
