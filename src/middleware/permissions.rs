use matchit::Router;
use once_cell::sync::Lazy;

use crate::auth::permission::Permission;

/// Declarative route → required tag table for the protected admin API.
/// `None` means any authenticated admin may call the route. Consulted once
/// per request by the admin gate instead of scattering checks per handler.
const ROUTE_TAGS: &[(&str, Option<Permission>)] = &[
    ("/api/auth/me", None),
    ("/api/auth/change-password", None),
    ("/api/users", Some(Permission::Users)),
    ("/api/users/*rest", Some(Permission::Users)),
    ("/api/leagues", Some(Permission::Leagues)),
    ("/api/leagues/*rest", Some(Permission::Leagues)),
    ("/api/teams", Some(Permission::Leagues)),
    ("/api/teams/*rest", Some(Permission::Leagues)),
    ("/api/players", None),
    ("/api/players/*rest", None),
    ("/api/reels", Some(Permission::Reels)),
    ("/api/reels/*rest", Some(Permission::Reels)),
    ("/api/subscribers", Some(Permission::Subscribers)),
    ("/api/subscribers/*rest", Some(Permission::Subscribers)),
    ("/api/content", Some(Permission::Content)),
    ("/api/content/*rest", Some(Permission::Content)),
    ("/api/notifications", Some(Permission::Notification)),
    ("/api/notifications/*rest", Some(Permission::Notification)),
    ("/api/admins", Some(Permission::Roles)),
    ("/api/admins/*rest", Some(Permission::Roles)),
    ("/api/roles", Some(Permission::Roles)),
    ("/api/roles/*rest", Some(Permission::Roles)),
];

static ROUTE_TABLE: Lazy<Router<Option<Permission>>> = Lazy::new(|| {
    let mut table = Router::new();
    for (pattern, tag) in ROUTE_TAGS {
        table
            .insert(*pattern, *tag)
            .expect("route permission table pattern is valid");
    }
    table
});

/// Look up the tag required for a protected path. Paths outside the table
/// fall back to authenticated-only.
pub fn required_permission(path: &str) -> Option<Permission> {
    let normalized = if path.len() > 1 {
        path.trim_end_matches('/')
    } else {
        path
    };

    ROUTE_TABLE
        .at(normalized)
        .map(|matched| *matched.value)
        .unwrap_or(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_teams_require_leagues_tag() {
        assert_eq!(required_permission("/api/teams"), Some(Permission::Leagues));
        assert_eq!(required_permission("/api/teams/"), Some(Permission::Leagues));
        assert_eq!(required_permission("/api/teams/3"), Some(Permission::Leagues));
    }

    #[test]
    fn test_players_require_authentication_only() {
        assert_eq!(required_permission("/api/players"), None);
        assert_eq!(required_permission("/api/players/5"), None);
        assert_eq!(required_permission("/api/players/popular"), None);
    }

    #[test]
    fn test_admin_management_requires_roles_tag() {
        assert_eq!(required_permission("/api/admins"), Some(Permission::Roles));
        assert_eq!(
            required_permission("/api/admins/5/toggle-status"),
            Some(Permission::Roles)
        );
        assert_eq!(
            required_permission("/api/roles/permissions"),
            Some(Permission::Roles)
        );
    }

    #[test]
    fn test_session_routes_need_no_tag() {
        assert_eq!(required_permission("/api/auth/me"), None);
        assert_eq!(required_permission("/api/auth/change-password"), None);
    }

    #[test]
    fn test_every_resource_family_is_tagged() {
        assert_eq!(required_permission("/api/users/9"), Some(Permission::Users));
        assert_eq!(required_permission("/api/leagues/1/toggle"), Some(Permission::Leagues));
        assert_eq!(required_permission("/api/reels/manage"), Some(Permission::Reels));
        assert_eq!(
            required_permission("/api/subscribers/stats"),
            Some(Permission::Subscribers)
        );
        assert_eq!(
            required_permission("/api/content/faqs/2"),
            Some(Permission::Content)
        );
        assert_eq!(
            required_permission("/api/notifications/4/send"),
            Some(Permission::Notification)
        );
    }
}
