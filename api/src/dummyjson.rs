//! DummyJSON auth/user wire types.
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AddUserRequest<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub username: &'a str,
    pub email: &'a str,
    pub password: &'a str,
    pub image: String,
}

/// Shape shared by `/auth/login`, `/users/add` and `/users/{id}`.
/// Login responses additionally carry a token.
#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DummyUser {
    pub id: Option<u64>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image: Option<String>,
    /// Current DummyJSON issues `accessToken`; older deployments sent `token`.
    pub access_token: Option<String>,
    pub token: Option<String>,
}
