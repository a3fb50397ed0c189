//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::identity::{CreateUser, UpdateUser};
use crate::domain::User;

/// User as returned by the API; never carries the password hash
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub role_id: Option<String>,
    pub role_name: Option<String>,
    pub is_active: bool,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_time: Option<DateTime<Utc>>,
}

impl From<User> for UserDto {
    fn from(u: User) -> Self {
        Self {
            role_name: u.role_name().map(String::from),
            id: u.id,
            username: u.username,
            email: u.email,
            full_name: u.full_name,
            role_id: u.role_id,
            is_active: u.is_active,
            created_time: u.created_time,
            modified_time: u.modified_time,
            last_login_time: u.last_login_time,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "username": "cashier1",
    "email": "cashier1@example.com",
    "full_name": "Nguyen Van A",
    "password": "secure-password",
    "role_id": null
}))]
pub struct CreateUserRequest {
    #[validate(length(min = 3, max = 50, message = "username must be 3-50 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email format"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub full_name: String,
    #[validate(length(min = 8, max = 128, message = "password must be 8-128 characters"))]
    pub password: String,
    pub role_id: Option<String>,
}

impl From<CreateUserRequest> for CreateUser {
    fn from(r: CreateUserRequest) -> Self {
        Self {
            username: r.username,
            email: r.email,
            full_name: r.full_name,
            password: r.password,
            role_id: r.role_id,
        }
    }
}

/// Omitted fields stay unchanged; `role_id: ""` removes the role
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserRequest {
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    pub role_id: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UpdateUserRequest> for UpdateUser {
    fn from(r: UpdateUserRequest) -> Self {
        Self {
            email: r.email,
            full_name: r.full_name,
            role_id: r.role_id,
            is_active: r.is_active,
        }
    }
}

/// Replaces the user's direct grants
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({ "permissions": ["ticket.view", "ticket.create"] }))]
pub struct SetPermissionsRequest {
    pub permissions: Vec<String>,
}
