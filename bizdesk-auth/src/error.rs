use bizdesk_core::errors::DeskError;
use serde_json::json;
use thiserror::Error;

use crate::gate::MemberAction;

/// Problems with permission identifiers or role grants. Raised at load time.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("Malformed permission identifier '{0}' (expected resource.verb)")]
    Malformed(String),

    #[error("Unknown resource '{0}'")]
    UnknownResource(String),

    #[error("Unknown verb '{0}'")]
    UnknownVerb(String),

    #[error("Permission '{resource}.{verb}' is not in the catalog")]
    NotInCatalog { resource: String, verb: String },

    #[error("Unknown role '{0}'")]
    UnknownRole(String),

    #[error("The owner role cannot be delegated to a team member")]
    OwnerNotDelegable,
}

/// Outcome of a denied authorization.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AccessError {
    #[error("Access Denied: you do not have the '{permission}' permission")]
    AccessDenied { permission: String },

    #[error("You cannot {action} your own account. Please contact your administrator.")]
    SelfModificationDenied { action: MemberAction },
}

impl AccessError {
    pub fn reason(&self) -> &'static str {
        match self {
            AccessError::AccessDenied { .. } => "access_denied",
            AccessError::SelfModificationDenied { .. } => "self_modification_denied",
        }
    }
}

impl From<AccessError> for DeskError {
    fn from(err: AccessError) -> Self {
        let data = match &err {
            AccessError::AccessDenied { permission } => json!({
                "reason": err.reason(),
                "permission": permission,
            }),
            AccessError::SelfModificationDenied { action } => json!({
                "reason": err.reason(),
                "action": action.as_str(),
            }),
        };
        DeskError::forbidden(err.to_string()).with_data(data)
    }
}

impl From<CatalogError> for DeskError {
    fn from(err: CatalogError) -> Self {
        DeskError::bad_request(err.to_string())
    }
}
