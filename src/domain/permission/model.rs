use chrono::{DateTime, Utc};

/// Persisted permission row, named `resource.action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: String,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub description: Option<String>,
    pub created_time: DateTime<Utc>,
}
