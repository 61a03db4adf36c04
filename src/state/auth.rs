use crate::state::persistence::Persister;
use log::{info, warn};
use sportsdb_api::{ApiResult, AuthApi, Registration, Session};

pub const SESSION_KEY: &str = "session";

/// The signed-in user, if any. Restored from storage at startup.
#[derive(Debug)]
pub struct AuthStore {
    session: Option<Session>,
    is_loading: bool,
    error: Option<String>,
    persister: Persister,
}

impl AuthStore {
    pub fn new(persister: Persister) -> Self {
        Self { session: None, is_loading: false, error: None, persister }
    }

    pub async fn load(&mut self) {
        let raw = self.persister.read(SESSION_KEY).await;
        self.session = raw.and_then(|raw| {
            serde_json::from_str::<Option<Session>>(&raw)
                .inspect_err(|e| warn!("ignoring unreadable session: {e}"))
                .ok()
                .flatten()
        });
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn begin(&mut self) {
        self.is_loading = true;
        self.error = None;
    }

    /// Failure keeps whatever session was already there.
    pub fn apply_login(&mut self, result: ApiResult<Session>) {
        self.is_loading = false;
        match result {
            Ok(session) => {
                info!("signed in as {}", session.user.username);
                self.session = Some(session);
                self.error = None;
                self.persist();
            }
            Err(e) => {
                warn!("sign-in failed: {e}");
                self.error = Some(e.to_string());
            }
        }
    }

    pub async fn login(&mut self, api: &AuthApi, username: &str, password: &str) {
        self.begin();
        let result = api.login(username, password).await;
        self.apply_login(result);
    }

    pub async fn register(&mut self, api: &AuthApi, registration: &Registration) {
        self.begin();
        let result = api.register(registration).await;
        self.apply_login(result);
    }

    pub fn logout(&mut self) {
        self.session = None;
        self.persist();
    }

    fn persist(&self) {
        self.persister.write_json(SESSION_KEY, &self.session);
    }
}
