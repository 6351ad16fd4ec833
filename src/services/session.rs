use std::collections::HashMap;
use std::sync::Mutex;

/// Key holding the logged-in user's id
pub const SESSION_ID_KEY: &str = "id";
/// Key holding the bearer token for the matching service
pub const SESSION_TOKEN_KEY: &str = "token";

/// Values stored for the current browser-style session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStore {
    values: HashMap<String, String>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `MATCH_DECK_SESSION_ID` and `MATCH_DECK_SESSION_TOKEN`
    pub fn from_env() -> Self {
        let mut store = Self::new();
        if let Ok(id) = std::env::var("MATCH_DECK_SESSION_ID") {
            store.insert(SESSION_ID_KEY, id);
        }
        if let Ok(token) = std::env::var("MATCH_DECK_SESSION_TOKEN") {
            store.insert(SESSION_TOKEN_KEY, token);
        }
        store
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.get(SESSION_ID_KEY).and_then(|id| id.trim().parse().ok())
    }

    pub fn token(&self) -> Option<&str> {
        self.get(SESSION_TOKEN_KEY)
    }
}

/// Views the deck can send the user to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Landing,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Landing => "/landing",
        }
    }
}

/// Navigation collaborator
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator that only logs
#[derive(Debug, Default)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, route: Route) {
        tracing::info!("Navigating to {}", route.path());
    }
}

/// Navigator that remembers every route it was asked for
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> Vec<Route> {
        match self.routes.lock() {
            Ok(routes) => routes.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        match self.routes.lock() {
            Ok(mut routes) => routes.push(route),
            Err(poisoned) => poisoned.into_inner().push(route),
        }
    }
}
