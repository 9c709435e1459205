use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::database::models::Role;

/// Closed set of admin capability tags. Each protected route family declares
/// at most one of these; `All` grants everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Content,
    Notification,
    Leagues,
    Reels,
    Users,
    Subscribers,
    Roles,
    All,
}

impl Permission {
    /// Catalog of every tag with its display name, for the role editor
    pub const CATALOG: [(Permission, &'static str); 8] = [
        (Permission::Content, "Content Management"),
        (Permission::Notification, "Notification Management"),
        (Permission::Leagues, "Leagues Management"),
        (Permission::Reels, "Reels Management"),
        (Permission::Users, "Users Management"),
        (Permission::Subscribers, "Subscribers Management"),
        (Permission::Roles, "Roles Management"),
        (Permission::All, "All Permissions (Super Admin)"),
    ];

    pub fn as_tag(&self) -> &'static str {
        match self {
            Permission::Content => "content",
            Permission::Notification => "notification",
            Permission::Leagues => "leagues",
            Permission::Reels => "reels",
            Permission::Users => "users",
            Permission::Subscribers => "subscribers",
            Permission::Roles => "roles",
            Permission::All => "all",
        }
    }

    /// Parse a stored tag. Unknown tags yield `None`; stores ignore them on
    /// read since they can never be written through the API.
    pub fn from_tag(tag: &str) -> Option<Permission> {
        match tag {
            "content" => Some(Permission::Content),
            "notification" => Some(Permission::Notification),
            "leagues" => Some(Permission::Leagues),
            "reels" => Some(Permission::Reels),
            "users" => Some(Permission::Users),
            "subscribers" => Some(Permission::Subscribers),
            "roles" => Some(Permission::Roles),
            "all" => Some(Permission::All),
            _ => None,
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_tag())
    }
}

/// An admin's effective permissions: the union of the tags of every assigned
/// role. Any role carrying `all` short-circuits to the universal set; an
/// admin with no roles holds the empty set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionSet {
    all: bool,
    tags: HashSet<Permission>,
}

impl PermissionSet {
    pub fn from_roles<'a>(roles: impl IntoIterator<Item = &'a Role>) -> Self {
        let mut set = PermissionSet::default();

        for role in roles {
            for tag in &role.permissions {
                match Permission::from_tag(tag) {
                    Some(Permission::All) => {
                        set.all = true;
                        return set;
                    }
                    Some(permission) => {
                        set.tags.insert(permission);
                    }
                    None => {}
                }
            }
        }

        set
    }

    pub fn allows(&self, needed: Permission) -> bool {
        self.all || self.tags.contains(&needed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn role(permissions: &[&str]) -> Role {
        Role {
            id: 1,
            name: "Test Role".to_string(),
            description: String::new(),
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    const EVERY_TAG: [Permission; 8] = [
        Permission::Content,
        Permission::Notification,
        Permission::Leagues,
        Permission::Reels,
        Permission::Users,
        Permission::Subscribers,
        Permission::Roles,
        Permission::All,
    ];

    #[test]
    fn test_no_roles_denies_every_tag() {
        let roles: Vec<Role> = vec![];
        let set = PermissionSet::from_roles(&roles);
        for tag in EVERY_TAG {
            assert!(!set.allows(tag), "{} should be denied", tag);
        }
    }

    #[test]
    fn test_all_role_grants_every_tag() {
        let roles = vec![role(&["all"])];
        let set = PermissionSet::from_roles(&roles);
        for tag in EVERY_TAG {
            assert!(set.allows(tag), "{} should be granted", tag);
        }
    }

    #[test]
    fn test_union_over_multiple_roles() {
        let roles = vec![role(&["content", "notification"]), role(&["leagues"])];
        let set = PermissionSet::from_roles(&roles);

        assert!(set.allows(Permission::Content));
        assert!(set.allows(Permission::Notification));
        assert!(set.allows(Permission::Leagues));
        assert!(!set.allows(Permission::Users));
        assert!(!set.allows(Permission::Roles));
    }

    #[test]
    fn test_unknown_tags_are_ignored() {
        let roles = vec![role(&["betting", "content"])];
        let set = PermissionSet::from_roles(&roles);

        assert!(set.allows(Permission::Content));
        assert!(!set.allows(Permission::Users));
    }

    #[test]
    fn test_tag_round_trip() {
        for tag in EVERY_TAG {
            assert_eq!(Permission::from_tag(tag.as_tag()), Some(tag));
        }
        assert_eq!(Permission::from_tag("unknown"), None);
    }
}
