use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Mutex, MutexGuard};

use crate::backend::Backend;
use crate::navigation::Navigator;
use crate::state::AppState;
use crate::storage::KeyValueStore;
use crate::timer::INACTIVITY_TIMEOUT;

/// The application context: backend, client state and the collaborators the
/// orchestrators report to. Cloning is cheap and shares everything.
pub struct App<B> {
    pub(crate) backend: Arc<B>,
    pub(crate) state: Arc<Mutex<AppState>>,
    pub(crate) storage: Arc<dyn KeyValueStore>,
    pub(crate) navigator: Arc<dyn Navigator>,
    pub(crate) inactivity_timeout: Duration,
}

impl<B> Clone for App<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
            storage: self.storage.clone(),
            navigator: self.navigator.clone(),
            inactivity_timeout: self.inactivity_timeout,
        }
    }
}

impl<B: Backend> App<B> {
    pub fn new(
        backend: Arc<B>,
        storage: Arc<dyn KeyValueStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            backend,
            state: Arc::new(Mutex::new(AppState::default())),
            storage,
            navigator,
            inactivity_timeout: INACTIVITY_TIMEOUT,
        }
    }

    pub fn with_inactivity_timeout(mut self, timeout: Duration) -> Self {
        self.inactivity_timeout = timeout;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Direct access for UI writers and tests. Never hold the guard across
    /// an orchestrator call.
    pub async fn state(&self) -> MutexGuard<'_, AppState> {
        self.state.lock().await
    }
}
