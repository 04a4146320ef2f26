use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

pub const INACTIVITY_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// A restartable one-shot timer. At most one callback is ever pending:
/// starting again cancels the previous one.
#[derive(Debug, Default)]
pub struct InactivityTimer {
    pending: Option<JoinHandle<()>>,
}

impl InactivityTimer {
    pub fn start<F, Fut>(&mut self, delay: Duration, on_fire: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.clear();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // detached, so clearing this timer from inside the callback
            // does not abort the callback itself
            tokio::spawn(on_fire());
        }));
    }

    pub fn clear(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for InactivityTimer {
    fn drop(&mut self) {
        self.clear();
    }
}
