use chrono::{DateTime, Utc};

use crate::domain::role::Role;

/// User model
#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub password_hash: String,
    pub role_id: Option<String>,
    pub is_active: bool,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
    pub last_login_time: Option<DateTime<Utc>>,
    /// Loaded when the `role` navigation is included
    pub role: Option<Role>,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        full_name: impl Into<String>,
        password_hash: impl Into<String>,
        role_id: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.into(),
            email: email.into(),
            full_name: full_name.into(),
            password_hash: password_hash.into(),
            role_id,
            is_active: true,
            created_time: now,
            modified_time: now,
            last_login_time: None,
            role: None,
        }
    }

    pub fn role_name(&self) -> Option<&str> {
        self.role.as_ref().map(|r| r.name.as_str())
    }
}
