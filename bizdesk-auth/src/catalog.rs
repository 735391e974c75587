//! Permission catalog.
//!
//! Every permission is a `resource.verb` pair drawn from a closed set per
//! resource. A `PermissionId` can only be built from a catalog entry, so an
//! unrecognized string is rejected where it is parsed (config load, API
//! boundary) instead of silently never matching.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A tab / module of the business dashboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Resource {
    Dashboard,
    Appointments,
    Clients,
    Leads,
    Team,
    Services,
    Payments,
    Smtp,
    AiAgent,
    Integrations,
    BusinessProfile,
    Reports,
    Settings,
}

impl Resource {
    pub const ALL: [Resource; 13] = [
        Resource::Dashboard,
        Resource::Appointments,
        Resource::Clients,
        Resource::Leads,
        Resource::Team,
        Resource::Services,
        Resource::Payments,
        Resource::Smtp,
        Resource::AiAgent,
        Resource::Integrations,
        Resource::BusinessProfile,
        Resource::Reports,
        Resource::Settings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Resource::Dashboard => "dashboard",
            Resource::Appointments => "appointments",
            Resource::Clients => "clients",
            Resource::Leads => "leads",
            Resource::Team => "team",
            Resource::Services => "services",
            Resource::Payments => "payments",
            Resource::Smtp => "smtp",
            Resource::AiAgent => "ai_agent",
            Resource::Integrations => "integrations",
            Resource::BusinessProfile => "business_profile",
            Resource::Reports => "reports",
            Resource::Settings => "settings",
        }
    }

    /// The closed set of verbs this resource accepts.
    pub fn verbs(&self) -> &'static [Verb] {
        use Verb::*;
        match self {
            Resource::Dashboard => &[View],
            Resource::Appointments => &[View, Create, Edit, Delete],
            Resource::Clients => &[View, Create, Edit, Delete, Export],
            Resource::Leads => &[View, Create, Edit, Delete, Convert],
            Resource::Team => &[View, Invite, Edit, Delete],
            Resource::Services => &[View, Create, Edit, Delete],
            Resource::Payments => &[View, Refund, Configure],
            Resource::Smtp => &[View, Edit, Test],
            Resource::AiAgent => &[View, Configure],
            Resource::Integrations => &[View, Configure],
            Resource::BusinessProfile => &[View, Edit, Publish],
            Resource::Reports => &[View, Export],
            Resource::Settings => &[View, Edit],
        }
    }

    pub fn allows(&self, verb: Verb) -> bool {
        self.verbs().contains(&verb)
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resource {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Resource::ALL
            .iter()
            .copied()
            .find(|r| r.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownResource(s.to_string()))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verb {
    View,
    Create,
    Edit,
    Delete,
    Export,
    Convert,
    Invite,
    Refund,
    Configure,
    Test,
    Publish,
}

impl Verb {
    pub const ALL: [Verb; 11] = [
        Verb::View,
        Verb::Create,
        Verb::Edit,
        Verb::Delete,
        Verb::Export,
        Verb::Convert,
        Verb::Invite,
        Verb::Refund,
        Verb::Configure,
        Verb::Test,
        Verb::Publish,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Verb::View => "view",
            Verb::Create => "create",
            Verb::Edit => "edit",
            Verb::Delete => "delete",
            Verb::Export => "export",
            Verb::Convert => "convert",
            Verb::Invite => "invite",
            Verb::Refund => "refund",
            Verb::Configure => "configure",
            Verb::Test => "test",
            Verb::Publish => "publish",
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Verb {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Verb::ALL
            .iter()
            .copied()
            .find(|v| v.as_str() == s)
            .ok_or_else(|| CatalogError::UnknownVerb(s.to_string()))
    }
}

/// A catalog permission, written `resource.verb` (e.g. `team.delete`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PermissionId {
    resource: Resource,
    verb: Verb,
}

impl PermissionId {
    pub const TEAM_VIEW: PermissionId = PermissionId::known(Resource::Team, Verb::View);
    pub const TEAM_EDIT: PermissionId = PermissionId::known(Resource::Team, Verb::Edit);
    pub const TEAM_DELETE: PermissionId = PermissionId::known(Resource::Team, Verb::Delete);

    // Only for pairs listed in `Resource::verbs`.
    const fn known(resource: Resource, verb: Verb) -> Self {
        Self { resource, verb }
    }

    pub fn new(resource: Resource, verb: Verb) -> Result<Self, CatalogError> {
        if resource.allows(verb) {
            Ok(Self { resource, verb })
        } else {
            Err(CatalogError::NotInCatalog {
                resource: resource.as_str().to_string(),
                verb: verb.as_str().to_string(),
            })
        }
    }

    pub fn parse(id: &str) -> Result<Self, CatalogError> {
        let (resource, verb) = id
            .split_once('.')
            .ok_or_else(|| CatalogError::Malformed(id.to_string()))?;
        if resource.is_empty() || verb.is_empty() || verb.contains('.') {
            return Err(CatalogError::Malformed(id.to_string()));
        }
        Self::new(resource.parse()?, verb.parse()?)
    }

    pub fn resource(&self) -> Resource {
        self.resource
    }

    pub fn verb(&self) -> Verb {
        self.verb
    }
}

impl fmt::Display for PermissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.resource, self.verb)
    }
}

impl FromStr for PermissionId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PermissionId {
    type Error = CatalogError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PermissionId> for String {
    fn from(id: PermissionId) -> Self {
        id.to_string()
    }
}

/// Every valid permission identifier.
pub fn catalog() -> impl Iterator<Item = PermissionId> {
    Resource::ALL
        .into_iter()
        .flat_map(|resource| resource.verbs().iter().map(move |&verb| PermissionId { resource, verb }))
}

/// Granted permissions. Duplicates collapse and order is irrelevant.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<PermissionId>);

impl PermissionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw identifiers; the first one outside the catalog fails the load.
    pub fn parse_all<I, S>(ids: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        ids.into_iter()
            .map(|s| PermissionId::parse(s.as_ref()))
            .collect()
    }

    pub fn contains(&self, permission: &PermissionId) -> bool {
        self.0.contains(permission)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PermissionId> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PermissionId> for PermissionSet {
    fn from_iter<T: IntoIterator<Item = PermissionId>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
