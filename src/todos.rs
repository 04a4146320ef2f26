use tracing::{debug, error};

use crate::app::App;
use crate::backend::{Backend, Session};
use crate::date::is_valid_date;
use crate::entities::{NewTodo, Todo, TodoCriteria};
use crate::prompt::Prompt;

pub const MISSING_TITLE: &str = "\"Todo Title\" is a required field.";
pub const INVALID_DEADLINE: &str =
    "Please enter a valid date (in the format \u{201c}YYYY-MM-DD\u{201d}) in the Deadline field.";
pub const ADD_FAILED: &str = "Failed to add the task. Please try again.";

impl<B: Backend> App<B> {
    /// Submits the draft: an update while editing, an insert otherwise.
    pub async fn save_todo(&self, prompt: &dyn Prompt) {
        let (is_editing, draft) = {
            let state = self.state.lock().await;
            (state.is_editing, state.draft.clone())
        };

        if is_editing {
            self.update_todo(&draft).await;
        } else {
            self.add_todo(prompt).await;
        }
        self.toggle_edit_mode(false).await;
    }

    /// Inserts the draft as a new open todo owned by the session user.
    pub async fn add_todo(&self, prompt: &dyn Prompt) {
        let draft = {
            let mut state = self.state.lock().await;
            if state.draft.title.is_empty() {
                prompt.alert(MISSING_TITLE);
                return;
            }
            match state.draft.deadline.as_deref() {
                Some(deadline) if !deadline.is_empty() => {
                    if !is_valid_date(deadline) {
                        prompt.alert(INVALID_DEADLINE);
                        return;
                    }
                }
                _ => state.draft.deadline = None,
            }
            state.draft.clone()
        };

        // no prompt here: the session expired underneath the form
        let Some(session) = self.active_session().await else {
            return;
        };

        let todo = NewTodo {
            title: draft.title,
            detail: draft.detail,
            deadline: draft.deadline,
            status: false,
            user_id: session.user.id,
        };
        match self.backend.insert_todo(&todo).await {
            Ok(inserted) => {
                debug!(count = inserted.len(), "inserted todo");
                self.fetch_todos().await;
                self.reset_draft().await;
            }
            Err(e) => {
                error!("error inserting todo: {e}");
                prompt.alert(ADD_FAILED);
            }
        }
    }

    /// Overwrites the editable columns of `todo`. The list is refetched
    /// whether or not the write succeeded.
    pub async fn update_todo(&self, todo: &Todo) {
        if let Err(e) = self.backend.update_todo(todo.id, &todo.changes()).await {
            error!(todo_id = todo.id, "error updating todo: {e}");
        }
        self.fetch_todos().await;
        self.reset_draft().await;
    }

    pub async fn delete_todo(&self, todo: &Todo, prompt: &dyn Prompt) {
        let question = format!("Are you sure you want to DELETE Todo No. {} ?", todo.id);
        if !prompt.confirm(&question) {
            return;
        }

        if let Err(e) = self.backend.delete_todo(todo.id).await {
            error!(todo_id = todo.id, "error deleting todo: {e}");
            return;
        }
        self.fetch_todos().await;
    }

    /// Replaces the local list with the backend's; empties it on failure.
    pub async fn fetch_todos(&self) {
        let fetched = self.backend.select_todos().await;

        let mut state = self.state.lock().await;
        match fetched {
            Ok(todos) => state.todos = todos,
            Err(e) => {
                error!("error fetching todos: {e}");
                state.todos.clear();
            }
        }
    }

    pub async fn set_edit_mode(&self, todo: &Todo) {
        self.state.lock().await.draft = todo.clone();
        self.toggle_edit_mode(true).await;
    }

    pub async fn toggle_edit_mode(&self, is_editing: bool) {
        self.state.lock().await.is_editing = is_editing;
    }

    /// Clears the form fields of the draft; the owner is kept.
    pub async fn reset_draft(&self) {
        let mut state = self.state.lock().await;
        let user_id = std::mem::take(&mut state.draft.user_id);
        state.draft = Todo {
            user_id,
            ..Todo::blank()
        };
    }

    pub async fn edit_draft(&self, edit: impl FnOnce(&mut Todo)) {
        edit(&mut self.state.lock().await.draft);
    }

    pub async fn set_todo_criteria(&self, criteria: TodoCriteria) {
        self.state.lock().await.todo_criteria = criteria;
    }

    pub async fn sorted_todos(&self) -> Vec<Todo> {
        self.state.lock().await.sorted_todos()
    }

    pub async fn todos(&self) -> Vec<Todo> {
        self.state.lock().await.todos.clone()
    }

    async fn active_session(&self) -> Option<Session> {
        match self.backend.get_session().await {
            Ok(Some(session)) => Some(session),
            Ok(None) => {
                error!("no active session, user is not logged in");
                None
            }
            Err(e) => {
                error!("error getting session: {e}");
                None
            }
        }
    }
}
