//! Permissions: the registry of known `resource.action` names, the
//! persisted permission rows and the lookups the authorization check
//! needs.

pub mod model;
pub mod registry;
pub mod repository;

pub use model::Permission;
pub use registry::{names, PermissionDef, PermissionRegistry};
pub use repository::{PermissionRepository, PermissionStore};
