use serde::{Deserialize, Serialize};

/// User role, stored as `roles.code`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    Administrator,
    Designer,
    ReadOnly,
}

/// Protected resource families
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Member,
    NonMember,
    Fee,
    Trip,
    TripType,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
}

impl Role {
    pub const ALL: [Role; 4] = [
        Role::Manager,
        Role::Administrator,
        Role::Designer,
        Role::ReadOnly,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MANAGER" => Some(Self::Manager),
            "ADMINISTRATOR" => Some(Self::Administrator),
            "DESIGNER" => Some(Self::Designer),
            "READ_ONLY" => Some(Self::ReadOnly),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Manager => "MANAGER",
            Self::Administrator => "ADMINISTRATOR",
            Self::Designer => "DESIGNER",
            Self::ReadOnly => "READ_ONLY",
        }
    }

    /// Whether this role may perform `action` on `resource`
    pub fn can(&self, resource: Resource, action: Action) -> bool {
        use Resource::*;

        match self {
            Role::Manager => matches!(resource, Member | NonMember | Fee | Trip),
            Role::Administrator => match resource {
                Member | NonMember | Fee | Trip | TripType => true,
                User => !matches!(action, Action::Update),
            },
            Role::Designer => resource == Trip && action == Action::Read,
            Role::ReadOnly => {
                matches!(resource, Member | NonMember | Fee | Trip) && action == Action::Read
            }
        }
    }
}

impl Resource {
    pub const ALL: [Resource; 6] = [
        Resource::Member,
        Resource::NonMember,
        Resource::Fee,
        Resource::Trip,
        Resource::TripType,
        Resource::User,
    ];
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Create, Action::Read, Action::Update, Action::Delete];
}
