use crate::client::{ApiError, ApiResult, Http, endpoint};
use crate::dummyjson::{AddUserRequest, DummyUser, LoginRequest};
use crate::{Registration, Session, UserProfile};
use chrono::Utc;

const AUTH_BASE: &str = "https://dummyjson.com";

/// DummyJSON-backed authentication: login, registration and profile lookup.
#[derive(Debug, Clone)]
pub struct AuthApi {
    http: Http,
    base_url: String,
}

impl Default for AuthApi {
    fn default() -> Self {
        Self::with_base_url(AUTH_BASE)
    }
}

impl AuthApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { http: Http::default(), base_url: base_url.into() }
    }

    pub async fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        let url = endpoint(&self.base_url, "auth/login", &[])?;
        let raw: DummyUser = self.http.post(url, &LoginRequest { username, password }).await?;
        let token = raw
            .access_token
            .clone()
            .or_else(|| raw.token.clone())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ApiError::NotFound(format!("token in login response for {username}")))?;
        let user = map_user(raw)?;
        Ok(Session { user, token })
    }

    /// DummyJSON only simulates user creation and never issues a token for
    /// it, so the session token is minted locally.
    pub async fn register(&self, registration: &Registration) -> ApiResult<Session> {
        let url = endpoint(&self.base_url, "users/add", &[])?;
        let body = AddUserRequest {
            first_name: &registration.first_name,
            last_name: &registration.last_name,
            username: &registration.username,
            email: &registration.email,
            password: &registration.password,
            image: avatar_url(&registration.username),
        };
        let raw: DummyUser = self.http.post(url, &body).await?;
        let user = map_user(raw)?;
        Ok(Session { user, token: format!("local-{}", Utc::now().timestamp_millis()) })
    }

    pub async fn profile(&self, user_id: u64) -> ApiResult<UserProfile> {
        let url = endpoint(&self.base_url, &format!("users/{user_id}"), &[])?;
        let raw: DummyUser = self.http.get(url).await?;
        map_user(raw)
    }
}

fn avatar_url(username: &str) -> String {
    format!("https://robohash.org/{username}?set=set2&size=150x150")
}

fn map_user(raw: DummyUser) -> ApiResult<UserProfile> {
    let id = raw.id.ok_or_else(|| ApiError::NotFound("user id in response".into()))?;
    Ok(UserProfile {
        id,
        username: raw.username.unwrap_or_default(),
        email: raw.email.unwrap_or_default(),
        first_name: raw.first_name.unwrap_or_default(),
        last_name: raw.last_name.unwrap_or_default(),
        image: raw.image.filter(|i| !i.is_empty()),
    })
}
