//! Actors: the authenticated team member behind a session.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::catalog::{catalog, PermissionId, PermissionSet, Resource, Verb};
use crate::error::CatalogError;

/// Identifier of a team-member record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(pub String);

impl MemberId {
    /// Generate a fresh id for a newly invited member.
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for MemberId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for MemberId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for MemberId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Owner,
    Admin,
    Manager,
    Staff,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Owner => "owner",
            Role::Admin => "admin",
            Role::Manager => "manager",
            Role::Staff => "staff",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "owner" => Ok(Role::Owner),
            "admin" => Ok(Role::Admin),
            "manager" => Ok(Role::Manager),
            "staff" => Ok(Role::Staff),
            _ => Err(CatalogError::UnknownRole(s.to_string())),
        }
    }
}

/// Roles that can be handed to a team member. The owner role cannot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelegateRole {
    Admin,
    Manager,
    Staff,
}

impl DelegateRole {
    /// Preset grant for a member invited with this role and no explicit list.
    pub fn default_permissions(&self) -> PermissionSet {
        match self {
            DelegateRole::Admin => catalog().collect(),
            DelegateRole::Manager => catalog()
                .filter(|p| {
                    p.verb() == Verb::View
                        || matches!(
                            p.resource(),
                            Resource::Appointments | Resource::Clients | Resource::Leads | Resource::Services
                        )
                        || (p.resource() == Resource::Reports && p.verb() == Verb::Export)
                })
                .collect(),
            DelegateRole::Staff => [
                (Resource::Dashboard, Verb::View),
                (Resource::Appointments, Verb::View),
                (Resource::Appointments, Verb::Create),
                (Resource::Appointments, Verb::Edit),
                (Resource::Clients, Verb::View),
                (Resource::Clients, Verb::Create),
            ]
            .into_iter()
            .filter_map(|(r, v)| PermissionId::new(r, v).ok())
            .collect(),
        }
    }
}

impl From<DelegateRole> for Role {
    fn from(role: DelegateRole) -> Self {
        match role {
            DelegateRole::Admin => Role::Admin,
            DelegateRole::Manager => Role::Manager,
            DelegateRole::Staff => Role::Staff,
        }
    }
}

impl TryFrom<Role> for DelegateRole {
    type Error = CatalogError;

    fn try_from(role: Role) -> Result<Self, Self::Error> {
        match role {
            Role::Owner => Err(CatalogError::OwnerNotDelegable),
            Role::Admin => Ok(DelegateRole::Admin),
            Role::Manager => Ok(DelegateRole::Manager),
            Role::Staff => Ok(DelegateRole::Staff),
        }
    }
}

/// A team member acting under an explicit permission set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Delegate {
    id: MemberId,
    role: DelegateRole,
    permissions: PermissionSet,
}

impl Delegate {
    pub fn id(&self) -> &MemberId {
        &self.id
    }

    pub fn role(&self) -> DelegateRole {
        self.role
    }

    pub fn permissions(&self) -> &PermissionSet {
        &self.permissions
    }
}

/// The team member invoking an action.
///
/// Built once per authenticated session and never mutated; a role change
/// produces a new `Actor`. The owner variant carries no permission set at
/// all: owners are unrestricted by construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Actor {
    Owner { id: MemberId },
    Delegate(Delegate),
}

impl Actor {
    pub fn owner(id: impl Into<MemberId>) -> Self {
        Actor::Owner { id: id.into() }
    }

    pub fn delegate(id: impl Into<MemberId>, role: DelegateRole, permissions: PermissionSet) -> Self {
        Actor::Delegate(Delegate {
            id: id.into(),
            role,
            permissions,
        })
    }

    /// Delegate holding the preset permissions of `role`.
    pub fn with_role_defaults(id: impl Into<MemberId>, role: DelegateRole) -> Self {
        Self::delegate(id, role, role.default_permissions())
    }

    pub fn id(&self) -> &MemberId {
        match self {
            Actor::Owner { id } => id,
            Actor::Delegate(d) => &d.id,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Actor::Owner { .. } => Role::Owner,
            Actor::Delegate(d) => d.role.into(),
        }
    }

    pub fn is_owner(&self) -> bool {
        matches!(self, Actor::Owner { .. })
    }

    /// `None` for owners, who have no restriction to consult.
    pub fn permissions(&self) -> Option<&PermissionSet> {
        match self {
            Actor::Owner { .. } => None,
            Actor::Delegate(d) => Some(&d.permissions),
        }
    }
}
