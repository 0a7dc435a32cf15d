use serde::{Deserialize, Serialize};

use crate::database::Resource;

/// User account (collection "users")
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String, // bcrypt hash
    /// Hash of a mailed recovery password. Accepted alongside `password`
    /// until the next successful login.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temporary_password: Option<String>,
}

impl Resource for User {
    const COLLECTION: &'static str = "users";
    const ID_FIELD: &'static str = "id";
    const UNIQUE_FIELD: &'static str = "email";

    fn set_id(&mut self, id: i64) {
        self.id = id;
    }

    fn unique_value(&self) -> &str {
        &self.email
    }
}

#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct RegisterForm {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
}

/// Public view of a user; never carries the password hash.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserInfo {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        UserInfo {
            id: user.id,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
        }
    }
}
