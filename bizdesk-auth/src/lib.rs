//! Team access control for Bizdesk: the permission catalog, actors and their
//! roles, stored member grants, and the permission gate.

pub mod actor;
pub mod catalog;
pub mod error;
pub mod gate;
pub mod grant;

pub use actor::{Actor, Delegate, DelegateRole, MemberId, Role};
pub use catalog::{catalog, PermissionId, PermissionSet, Resource, Verb};
pub use error::{AccessError, CatalogError};
pub use gate::{
    can_perform, can_perform_id, can_perform_member_action, check_member_action, MemberAction, PermissionGate,
    Session,
};
pub use grant::{load_grants, MemberGrant};
