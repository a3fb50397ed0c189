//! Role and permission DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::access::{CreateRole, PermissionEntry, RoleDetails, UpdateRole};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RoleDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    /// Permission names, sorted
    pub permissions: Vec<String>,
    pub created_time: DateTime<Utc>,
    pub modified_time: DateTime<Utc>,
}

impl From<RoleDetails> for RoleDto {
    fn from(d: RoleDetails) -> Self {
        Self {
            id: d.role.id,
            name: d.role.name,
            description: d.role.description,
            permissions: d.permissions,
            created_time: d.role.created_time,
            modified_time: d.role.modified_time,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[schema(example = json!({
    "name": "Cashier",
    "description": "Sells tickets at the counter",
    "permissions": ["ticket.view", "ticket.create", "customer.view"]
}))]
pub struct CreateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl From<CreateRoleRequest> for CreateRole {
    fn from(r: CreateRoleRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            permissions: r.permissions,
        }
    }
}

/// Omitted fields stay unchanged; `permissions` replaces the whole set
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRoleRequest {
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: Option<String>,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub permissions: Option<Vec<String>>,
}

impl From<UpdateRoleRequest> for UpdateRole {
    fn from(r: UpdateRoleRequest) -> Self {
        Self {
            name: r.name,
            description: r.description,
            permissions: r.permissions,
        }
    }
}

/// Catalog row: `name` is what roles and users are granted
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "id": "0b6f0c1e-3f7e-4b5e-9c61-0f4a3c1d2e11",
    "name": "ticket.view",
    "resource": "ticket",
    "action": "view",
    "display_name": "View Ticket"
}))]
pub struct PermissionDto {
    pub id: String,
    pub name: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
}

impl From<PermissionEntry> for PermissionDto {
    fn from(e: PermissionEntry) -> Self {
        Self {
            id: e.id,
            name: e.name,
            resource: e.resource,
            action: e.action,
            display_name: e.display_name,
        }
    }
}
