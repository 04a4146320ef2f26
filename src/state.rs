use crate::entities::{
    ExtendedUser, ProfileDraft, Todo, TodoCriteria, TodoField, UserCriteria, UserField,
};
use crate::pipeline::{filter_by_flag, filter_by_search, sort_by};
use crate::timer::InactivityTimer;

/// Everything the client keeps between interactions.
#[derive(Debug)]
pub struct AppState {
    pub user: Option<ExtendedUser>,
    pub is_authenticated: bool,
    pub inactivity_timer: InactivityTimer,

    pub todos: Vec<Todo>,
    pub draft: Todo,
    pub is_editing: bool,
    pub todo_criteria: TodoCriteria,

    pub users: Vec<ExtendedUser>,
    pub profile_draft: ProfileDraft,
    pub user_criteria: UserCriteria,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            user: None,
            is_authenticated: false,
            inactivity_timer: InactivityTimer::default(),
            todos: Vec::new(),
            draft: Todo::blank(),
            is_editing: false,
            todo_criteria: TodoCriteria::default(),
            users: Vec::new(),
            profile_draft: ProfileDraft::default(),
            user_criteria: UserCriteria::default(),
        }
    }
}

impl AppState {
    /// Todos as displayed: searched on title and detail, filtered on
    /// completion, then sorted.
    pub fn sorted_todos(&self) -> Vec<Todo> {
        if self.todos.is_empty() {
            return Vec::new();
        }
        let criteria = &self.todo_criteria;

        let searched = filter_by_search(
            &self.todos,
            Some(criteria.search.as_str()),
            &[TodoField::Title, TodoField::Detail],
        );
        let filtered = filter_by_flag(&searched, TodoField::Status, criteria.completed);
        sort_by(&filtered, criteria.sort.into(), criteria.order)
    }

    /// Users as displayed: searched on username and email, then sorted.
    pub fn sorted_users(&self) -> Vec<ExtendedUser> {
        if self.users.is_empty() {
            return Vec::new();
        }
        let criteria = &self.user_criteria;

        let searched = filter_by_search(
            &self.users,
            Some(criteria.search.as_str()),
            &[UserField::Username, UserField::Email],
        );
        sort_by(&searched, criteria.sort.into(), criteria.order)
    }

    /// Forgets the signed-in user and disarms the inactivity timer.
    pub fn clear_user(&mut self) {
        self.user = None;
        self.is_authenticated = false;
        self.inactivity_timer.clear();
    }
}
