//! Permission gate.
//!
//! `can_perform*` are pure predicates over an actor snapshot. `PermissionGate`
//! binds them to one session and adds the enforcing `authorize*` calls, which
//! return an `AccessError` for the caller to surface and log the decision.

use std::fmt;

use bizdesk_core::TenantContext;
use tracing::{debug, warn};

use crate::actor::{Actor, MemberId};
use crate::catalog::{PermissionId, Resource, Verb};
use crate::error::AccessError;

/// Whether `actor` holds `permission`. Owners always do.
pub fn can_perform(actor: &Actor, permission: &PermissionId) -> bool {
    match actor.permissions() {
        None => true,
        Some(granted) => granted.contains(permission),
    }
}

/// String form of [`can_perform`]. Identifiers outside the catalog are never
/// granted to a delegate.
pub fn can_perform_id(actor: &Actor, permission_id: &str) -> bool {
    if actor.is_owner() {
        return true;
    }
    PermissionId::parse(permission_id)
        .map(|p| can_perform(actor, &p))
        .unwrap_or(false)
}

/// Operations on a team-member record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MemberAction {
    Delete,
    ChangeRole,
    ChangePermissions,
    /// Profile details (name, phone, ...), not access.
    Edit,
}

impl MemberAction {
    pub fn required_permission(&self) -> PermissionId {
        match self {
            MemberAction::Delete => PermissionId::TEAM_DELETE,
            MemberAction::ChangeRole | MemberAction::ChangePermissions | MemberAction::Edit => {
                PermissionId::TEAM_EDIT
            }
        }
    }

    /// Actions nobody may perform on their own record.
    pub fn is_self_guarded(&self) -> bool {
        !matches!(self, MemberAction::Edit)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberAction::Delete => "delete",
            MemberAction::ChangeRole => "change_role",
            MemberAction::ChangePermissions => "change_permissions",
            MemberAction::Edit => "edit",
        }
    }
}

impl fmt::Display for MemberAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberAction::Delete => "delete",
            MemberAction::ChangeRole => "change the role of",
            MemberAction::ChangePermissions => "change the permissions of",
            MemberAction::Edit => "edit",
        })
    }
}

/// Decide a team-member action. The self-modification rule runs before the
/// permission check and applies to owners too.
pub fn check_member_action(actor: &Actor, action: MemberAction, target: &MemberId) -> Result<(), AccessError> {
    if action.is_self_guarded() && actor.id() == target {
        return Err(AccessError::SelfModificationDenied { action });
    }

    let required = action.required_permission();
    if can_perform(actor, &required) {
        Ok(())
    } else {
        Err(AccessError::AccessDenied {
            permission: required.to_string(),
        })
    }
}

pub fn can_perform_member_action(actor: &Actor, action: MemberAction, target: &MemberId) -> bool {
    check_member_action(actor, action, target).is_ok()
}

/// The authenticated context a gate is bound to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub tenant: TenantContext,
    pub actor: Actor,
}

impl Session {
    pub fn new(tenant: TenantContext, actor: Actor) -> Self {
        Self { tenant, actor }
    }
}

pub struct PermissionGate {
    session: Session,
}

impl PermissionGate {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn actor(&self) -> &Actor {
        &self.session.actor
    }

    pub fn can_perform(&self, permission: &PermissionId) -> bool {
        can_perform(self.actor(), permission)
    }

    pub fn can_perform_id(&self, permission_id: &str) -> bool {
        can_perform_id(self.actor(), permission_id)
    }

    /// Dashboard tabs the actor may open.
    pub fn visible_resources(&self) -> Vec<Resource> {
        Resource::ALL
            .into_iter()
            .filter(|r| {
                PermissionId::new(*r, Verb::View)
                    .map(|p| self.can_perform(&p))
                    .unwrap_or(false)
            })
            .collect()
    }

    pub fn authorize(&self, permission: &PermissionId) -> Result<(), AccessError> {
        if self.can_perform(permission) {
            self.log_allowed(permission.to_string());
            Ok(())
        } else {
            let err = AccessError::AccessDenied {
                permission: permission.to_string(),
            };
            self.log_denied(&err);
            Err(err)
        }
    }

    pub fn authorize_id(&self, permission_id: &str) -> Result<(), AccessError> {
        if self.can_perform_id(permission_id) {
            self.log_allowed(permission_id.to_string());
            Ok(())
        } else {
            let err = AccessError::AccessDenied {
                permission: permission_id.to_string(),
            };
            self.log_denied(&err);
            Err(err)
        }
    }

    pub fn authorize_member_action(&self, action: MemberAction, target: &MemberId) -> Result<(), AccessError> {
        match check_member_action(self.actor(), action, target) {
            Ok(()) => {
                self.log_allowed(format!("team member {} on {}", action.as_str(), target));
                Ok(())
            }
            Err(err) => {
                self.log_denied(&err);
                Err(err)
            }
        }
    }

    fn log_allowed(&self, what: String) {
        debug!(
            tenant = %self.session.tenant.tenant_id,
            actor = %self.actor().id(),
            "authorized {}", what
        );
    }

    fn log_denied(&self, err: &AccessError) {
        warn!(
            tenant = %self.session.tenant.tenant_id,
            actor = %self.actor().id(),
            role = %self.actor().role(),
            reason = err.reason(),
            "access denied: {}", err
        );
    }
}

#[cfg(test)]
mod tests {
    use tracing_test::traced_test;

    use super::*;
    use crate::actor::DelegateRole;
    use crate::catalog::PermissionSet;

    fn staff(perms: &[&str]) -> Actor {
        Actor::delegate("m-staff", DelegateRole::Staff, PermissionSet::parse_all(perms).unwrap())
    }

    fn gate(actor: Actor) -> PermissionGate {
        PermissionGate::new(Session::new(TenantContext::new("acme-salon"), actor))
    }

    #[test]
    fn owner_is_never_restricted() {
        let owner = Actor::owner("m-owner");
        assert!(can_perform(&owner, &PermissionId::TEAM_DELETE));
        assert!(can_perform_id(&owner, "totally.made_up"));
        assert!(can_perform_id(&owner, ""));
    }

    #[test]
    fn delegates_fail_closed_on_unknown_identifiers() {
        let actor = staff(&["appointments.create"]);
        assert!(can_perform_id(&actor, "appointments.create"));
        assert!(!can_perform_id(&actor, "appointments.delete"));
        assert!(!can_perform_id(&actor, "appointments.create.extra"));
        assert!(!can_perform_id(&actor, ""));
    }

    #[test]
    fn self_deletion_is_blocked_before_permissions() {
        let admin = Actor::with_role_defaults("m-admin", DelegateRole::Admin);
        let me = MemberId::from("m-admin");

        assert_eq!(
            check_member_action(&admin, MemberAction::Delete, &me),
            Err(AccessError::SelfModificationDenied {
                action: MemberAction::Delete
            })
        );
        assert!(!can_perform_member_action(&admin, MemberAction::ChangeRole, &me));
        assert!(can_perform_member_action(&admin, MemberAction::Edit, &me));
        assert!(can_perform_member_action(&admin, MemberAction::Delete, &MemberId::from("m-other")));
    }

    #[test]
    fn owner_cannot_delete_own_record() {
        let owner = Actor::owner("m-owner");
        assert!(!can_perform_member_action(&owner, MemberAction::Delete, &MemberId::from("m-owner")));
        assert!(can_perform_member_action(&owner, MemberAction::Delete, &MemberId::from("m-staff")));
    }

    #[test]
    fn self_modification_message_points_to_administrator() {
        let err = AccessError::SelfModificationDenied {
            action: MemberAction::ChangePermissions,
        };
        assert_eq!(
            err.to_string(),
            "You cannot change the permissions of your own account. Please contact your administrator."
        );
    }

    #[test]
    fn visible_resources_follow_view_permissions() {
        let g = gate(staff(&["dashboard.view", "appointments.view", "appointments.create"]));
        assert_eq!(g.visible_resources(), vec![Resource::Dashboard, Resource::Appointments]);

        let owner = gate(Actor::owner("m-owner"));
        assert_eq!(owner.visible_resources().len(), Resource::ALL.len());
    }

    #[test]
    #[traced_test]
    fn denials_are_logged() {
        let g = gate(staff(&["appointments.view"]));
        let err = g.authorize_id("smtp.edit").unwrap_err();
        assert_eq!(err.reason(), "access_denied");
        assert!(logs_contain("access denied"));
        assert!(logs_contain("acme-salon"));
    }
}
