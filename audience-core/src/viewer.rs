//! Viewer-side contracts for targeting
//!
//! The engine never owns an identity model. It sees the viewer through the
//! [`Viewer`] capability (an evaluation receives `Option<&dyn Viewer>`,
//! `None` being the anonymous viewer) and expands roles through an
//! injected [`RoleHierarchy`].

/// Capability implemented by the host application's authenticated user.
///
/// Only two facts are read: whether the viewer has a determinable
/// identity, and which roles it holds. Viewers without an identity are
/// treated as guest-equivalent by the guest criterion.
pub trait Viewer: Send + Sync {
    /// Stable identity of the viewer (username, subject id), if any.
    fn identity(&self) -> Option<&str>;

    /// Role identifiers held by the viewer.
    fn roles(&self) -> Vec<String>;
}

/// Injected role-expansion function.
///
/// Maps a set of held roles to the full set of roles they imply. The
/// expansion itself belongs to the host's security layer; the engine only
/// calls it.
pub trait RoleHierarchy: Send + Sync {
    /// All roles reachable from the given roles, including the inputs.
    fn reachable_roles(&self, roles: &[String]) -> Vec<String>;
}

/// Identity hierarchy for wirings without role inheritance: every role
/// reaches only itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlatRoleHierarchy;

impl RoleHierarchy for FlatRoleHierarchy {
    fn reachable_roles(&self, roles: &[String]) -> Vec<String> {
        roles.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_hierarchy_is_identity() {
        let roles = vec!["ROLE_ADMIN".to_string(), "ROLE_EDITOR".to_string()];
        assert_eq!(FlatRoleHierarchy.reachable_roles(&roles), roles);
    }

    #[test]
    fn test_flat_hierarchy_empty() {
        assert!(FlatRoleHierarchy.reachable_roles(&[]).is_empty());
    }
}
