use crate::middleware::auth::Claims;

/// Actions the permission gate can be asked about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// Caller identity and target, as far as the gate cares.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: i32,
    pub role: String,
    pub product_id: i32,
}

impl AuthContext {
    pub fn from_claims(claims: &Claims, user_id: i32, product_id: i32) -> Self {
        Self {
            user_id,
            role: claims.role.clone(),
            product_id,
        }
    }
}

/// Binary allow/deny decision per call. Injected so tests and deployments can
/// substitute their own policy without touching the controller.
pub trait PermissionGate: Send + Sync + 'static {
    fn authorize(&self, action: Action, ctx: &AuthContext) -> bool;
}

/// Role-claim based gate: admins do everything, editors cannot delete,
/// viewers only read. Unknown roles are denied outright.
pub struct RolePermissionGate;

impl PermissionGate for RolePermissionGate {
    fn authorize(&self, action: Action, ctx: &AuthContext) -> bool {
        match ctx.role.as_str() {
            "admin" => true,
            "editor" => !matches!(action, Action::Delete),
            "viewer" => matches!(action, Action::Read),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(role: &str) -> AuthContext {
        AuthContext {
            user_id: 1,
            role: role.to_string(),
            product_id: 1,
        }
    }

    #[test]
    fn admin_is_allowed_everything() {
        let gate = RolePermissionGate;
        for action in [Action::Read, Action::Create, Action::Update, Action::Delete] {
            assert!(gate.authorize(action, &ctx("admin")));
        }
    }

    #[test]
    fn editor_cannot_delete() {
        let gate = RolePermissionGate;
        assert!(gate.authorize(Action::Create, &ctx("editor")));
        assert!(gate.authorize(Action::Update, &ctx("editor")));
        assert!(!gate.authorize(Action::Delete, &ctx("editor")));
    }

    #[test]
    fn viewer_is_read_only() {
        let gate = RolePermissionGate;
        assert!(gate.authorize(Action::Read, &ctx("viewer")));
        assert!(!gate.authorize(Action::Create, &ctx("viewer")));
        assert!(!gate.authorize(Action::Update, &ctx("viewer")));
        assert!(!gate.authorize(Action::Delete, &ctx("viewer")));
    }

    #[test]
    fn unknown_roles_are_denied() {
        let gate = RolePermissionGate;
        assert!(!gate.authorize(Action::Read, &ctx("intern")));
    }
}
