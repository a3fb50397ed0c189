//! Catalog of every permission the API knows about.
//!
//! Built once at startup and shared by reference. Route guards use the
//! constants in [`names`]; the registry is the source the database rows
//! are synced from and the validator for grants.

use std::collections::{BTreeSet, HashMap};

use crate::domain::{DomainError, DomainResult};

/// Permission names checked by the HTTP layer
pub mod names {
    pub const USER_VIEW: &str = "user.view";
    pub const USER_CREATE: &str = "user.create";
    pub const USER_UPDATE: &str = "user.update";
    pub const USER_DELETE: &str = "user.delete";

    pub const ROLE_VIEW: &str = "role.view";
    pub const ROLE_CREATE: &str = "role.create";
    pub const ROLE_UPDATE: &str = "role.update";
    pub const ROLE_DELETE: &str = "role.delete";

    pub const PERMISSION_VIEW: &str = "permission.view";
    pub const PERMISSION_UPDATE: &str = "permission.update";

    pub const CUSTOMER_VIEW: &str = "customer.view";
    pub const CUSTOMER_CREATE: &str = "customer.create";
    pub const CUSTOMER_UPDATE: &str = "customer.update";
    pub const CUSTOMER_DELETE: &str = "customer.delete";

    pub const CARD_VIEW: &str = "card.view";
    pub const CARD_CREATE: &str = "card.create";
    pub const CARD_UPDATE: &str = "card.update";
    pub const CARD_DELETE: &str = "card.delete";

    pub const TICKET_VIEW: &str = "ticket.view";
    pub const TICKET_CREATE: &str = "ticket.create";
    pub const TICKET_UPDATE: &str = "ticket.update";
    pub const TICKET_DELETE: &str = "ticket.delete";
}

const RESOURCES: &[(&str, &str)] = &[
    ("user", "User"),
    ("role", "Role"),
    ("permission", "Permission"),
    ("customer", "Customer"),
    ("card", "Card"),
    ("ticket", "Ticket"),
];

const ACTIONS: &[(&str, &str)] = &[
    ("view", "View"),
    ("create", "Create"),
    ("update", "Update"),
    ("delete", "Delete"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionDef {
    /// `resource.action`
    pub name: String,
    pub resource: String,
    pub action: String,
    pub display_name: String,
}

#[derive(Debug, Clone)]
pub struct PermissionRegistry {
    defs: Vec<PermissionDef>,
    index: HashMap<String, usize>,
}

impl PermissionRegistry {
    /// Every combination of `resources` × `actions`
    pub fn new(resources: &[(&str, &str)], actions: &[(&str, &str)]) -> Self {
        let defs: Vec<PermissionDef> = resources
            .iter()
            .flat_map(|(resource, resource_display)| {
                actions.iter().map(move |(action, action_display)| PermissionDef {
                    name: format!("{}.{}", resource, action),
                    resource: resource.to_string(),
                    action: action.to_string(),
                    display_name: format!("{} {}", action_display, resource_display),
                })
            })
            .collect();

        let index = defs
            .iter()
            .enumerate()
            .map(|(i, d)| (d.name.clone(), i))
            .collect();

        Self { defs, index }
    }

    /// The ticket office catalog
    pub fn builtin() -> Self {
        Self::new(RESOURCES, ACTIONS)
    }

    pub fn all(&self) -> &[PermissionDef] {
        &self.defs
    }

    pub fn get(&self, name: &str) -> Option<&PermissionDef> {
        self.index.get(name).map(|&i| &self.defs[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn display_name(&self, name: &str) -> Option<&str> {
        self.get(name).map(|d| d.display_name.as_str())
    }

    /// Deduplicate and sort `names`, rejecting any unknown name.
    pub fn validate_names(&self, names: &[String]) -> DomainResult<Vec<String>> {
        let unknown: Vec<&str> = names
            .iter()
            .map(String::as_str)
            .filter(|n| !self.contains(n))
            .collect();
        if !unknown.is_empty() {
            return Err(DomainError::Validation(format!(
                "Unknown permissions: {}",
                unknown.join(", ")
            )));
        }

        let set: BTreeSet<String> = names.iter().cloned().collect();
        Ok(set.into_iter().collect())
    }
}

impl Default for PermissionRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_has_every_resource_action_pair() {
        let registry = PermissionRegistry::builtin();
        assert_eq!(registry.all().len(), RESOURCES.len() * ACTIONS.len());
        assert_eq!(registry.display_name("ticket.view"), Some("View Ticket"));
        assert!(!registry.contains("ticket.print"));
    }

    #[test]
    fn route_constants_are_registered() {
        let registry = PermissionRegistry::builtin();
        for name in [
            names::USER_VIEW,
            names::USER_CREATE,
            names::USER_UPDATE,
            names::USER_DELETE,
            names::ROLE_VIEW,
            names::ROLE_CREATE,
            names::ROLE_UPDATE,
            names::ROLE_DELETE,
            names::PERMISSION_VIEW,
            names::PERMISSION_UPDATE,
            names::CUSTOMER_VIEW,
            names::CUSTOMER_CREATE,
            names::CUSTOMER_UPDATE,
            names::CUSTOMER_DELETE,
            names::CARD_VIEW,
            names::CARD_CREATE,
            names::CARD_UPDATE,
            names::CARD_DELETE,
            names::TICKET_VIEW,
            names::TICKET_CREATE,
            names::TICKET_UPDATE,
            names::TICKET_DELETE,
        ] {
            assert!(registry.contains(name), "{} missing from registry", name);
        }
    }

    #[test]
    fn validate_names_dedups_and_sorts() {
        let registry = PermissionRegistry::builtin();
        let names = vec![
            "ticket.view".to_string(),
            "card.view".to_string(),
            "ticket.view".to_string(),
        ];
        assert_eq!(
            registry.validate_names(&names).unwrap(),
            vec!["card.view".to_string(), "ticket.view".to_string()]
        );
    }

    #[test]
    fn validate_names_rejects_unknown() {
        let registry = PermissionRegistry::builtin();
        let err = registry
            .validate_names(&["ticket.fly".to_string()])
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn separate_registries_do_not_share_state() {
        let custom = PermissionRegistry::new(&[("report", "Report")], &[("export", "Export")]);
        assert!(custom.contains("report.export"));
        assert!(!PermissionRegistry::builtin().contains("report.export"));
    }
}
