//! Access control: the per-request permission check and role management.

pub mod checker;
pub mod roles;

pub use checker::PermissionChecker;
pub use roles::{CreateRole, PermissionEntry, RoleDetails, RoleService, UpdateRole};
