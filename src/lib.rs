//! A todo-list client with user accounts.
//!
//! [`App`] is the whole client: the signed-in user, the todo list with its
//! search/filter/sort view, the admin user list and the inactivity logout
//! timer. It talks to an auth + storage service through the [`Backend`]
//! trait; [`SqliteBackend`] is the bundled implementation. [`routes::router`]
//! exposes the client's interactions over HTTP.

pub mod app;
pub mod auth;
pub mod authentication;
pub mod backend;
pub mod config;
pub mod crud_ops;
pub mod date;
pub mod entities;
pub mod error;
pub mod navigation;
pub mod pipeline;
pub mod prompt;
pub mod routes;
pub mod sqlite_backend;
pub mod state;
pub mod storage;
pub mod timer;
pub mod todos;
pub mod users;

pub use app::App;
pub use backend::{Backend, BackendError, Session};
pub use sqlite_backend::SqliteBackend;
