//! Stored access records for team members.

use bizdesk_core::errors::DeskError;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, DelegateRole, MemberId, Role};
use crate::catalog::PermissionSet;
use crate::error::CatalogError;

/// Access record as persisted by the team backend.
///
/// ```json
/// { "member_id": "m-42", "role": "staff", "permissions": ["appointments.view"] }
/// ```
///
/// `permissions` is kept as raw strings so a stale identifier is reported by
/// name when the grant is turned into an [`Actor`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberGrant {
    pub member_id: MemberId,
    pub role: Role,
    /// Absent means "use the role preset". Ignored for owners.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl MemberGrant {
    pub fn into_actor(self) -> Result<Actor, CatalogError> {
        let role = match self.role {
            Role::Owner => return Ok(Actor::owner(self.member_id)),
            other => DelegateRole::try_from(other)?,
        };

        let permissions = match self.permissions {
            Some(ids) => PermissionSet::parse_all(ids)?,
            None => role.default_permissions(),
        };

        Ok(Actor::delegate(self.member_id, role, permissions))
    }

    pub fn from_actor(actor: &Actor) -> Self {
        Self {
            member_id: actor.id().clone(),
            role: actor.role(),
            permissions: actor
                .permissions()
                .map(|set| set.iter().map(|p| p.to_string()).collect()),
        }
    }
}

/// Load a JSON array of grants. Any unknown role or permission fails the
/// whole load with a `BadRequest`.
pub fn load_grants(json: &str) -> anyhow::Result<Vec<Actor>> {
    let grants: Vec<MemberGrant> = serde_json::from_str(json)
        .map_err(|e| DeskError::bad_request(format!("Invalid team access data: {e}")).into_anyhow())?;

    grants
        .into_iter()
        .map(|g| {
            let member = g.member_id.clone();
            g.into_actor().map_err(|e| {
                DeskError::from(e)
                    .with_data(serde_json::json!({ "member_id": member }))
                    .into_anyhow()
            })
        })
        .collect()
}
