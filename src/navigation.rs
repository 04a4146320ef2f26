use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    VerifyEmail,
    Todos,
    /// The landing page, optionally explaining why the user ended up there.
    Root { message: Option<String> },
}

impl Route {
    pub fn to_uri(&self) -> String {
        match self {
            Route::VerifyEmail => "/verify-email".to_owned(),
            Route::Todos => "/todos".to_owned(),
            Route::Root { message: None } => "/".to_owned(),
            Route::Root {
                message: Some(message),
            } => format!("/?message={}", urlencoding::encode(message)),
        }
    }
}

pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Records every navigation so the caller can act on the latest one.
#[derive(Debug, Default)]
pub struct RouteHistory {
    routes: Mutex<Vec<Route>>,
}

impl RouteHistory {
    pub fn last(&self) -> Option<Route> {
        self.routes.lock().ok()?.last().cloned()
    }

    pub fn all(&self) -> Vec<Route> {
        self.routes
            .lock()
            .map(|routes| routes.clone())
            .unwrap_or_default()
    }

    /// Drains the history, returning the most recent route.
    pub fn take_last(&self) -> Option<Route> {
        let mut routes = self.routes.lock().ok()?;
        let last = routes.pop();
        routes.clear();
        last
    }
}

impl Navigator for RouteHistory {
    fn navigate(&self, route: Route) {
        tracing::debug!(uri = %route.to_uri(), "navigate");
        if let Ok(mut routes) = self.routes.lock() {
            routes.push(route);
        }
    }
}
