use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Entities an admin can moderate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Company,
    Job,
    User,
}

impl EntityKind {
    pub const fn collection(self) -> &'static str {
        match self {
            EntityKind::Company => "companies",
            EntityKind::Job => "jobs",
            EntityKind::User => "users",
        }
    }

    /// Persisted field backing `flag` on this entity, or `None` when the pair does not exist.
    pub const fn field_name(self, flag: ModerationFlag) -> Option<&'static str> {
        match (self, flag) {
            (EntityKind::Company, ModerationFlag::Verified) => Some("verified"),
            (EntityKind::Job, ModerationFlag::Verified) => Some("isVerified"),
            (_, ModerationFlag::Blocked) => Some("blocked"),
            (EntityKind::User, ModerationFlag::Verified) => None,
        }
    }
}

impl FromStr for EntityKind {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "company" | "companies" => Ok(EntityKind::Company),
            "job" | "jobs" => Ok(EntityKind::Job),
            "user" | "users" => Ok(EntityKind::User),
            _ => Err(UnknownName::Entity(value.to_string())),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            EntityKind::Company => "company",
            EntityKind::Job => "job",
            EntityKind::User => "user",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModerationFlag {
    Verified,
    Blocked,
}

impl FromStr for ModerationFlag {
    type Err = UnknownName;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "verified" | "verify" | "isverified" => Ok(ModerationFlag::Verified),
            "blocked" | "block" => Ok(ModerationFlag::Blocked),
            _ => Err(UnknownName::Flag(value.to_string())),
        }
    }
}

impl fmt::Display for ModerationFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModerationFlag::Verified => f.write_str("verified"),
            ModerationFlag::Blocked => f.write_str("blocked"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnknownName {
    #[error("unknown entity kind '{0}'")]
    Entity(String),
    #[error("unknown moderation flag '{0}'")]
    Flag(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ModerationTarget {
    pub kind: EntityKind,
    pub id: String,
}

impl ModerationTarget {
    pub fn new(kind: EntityKind, id: impl Into<String>) -> Self {
        Self {
            kind,
            id: id.into(),
        }
    }
}

/// Moderation fields of one stored entity, keyed by persisted field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityFlags {
    pub flags: BTreeMap<String, bool>,
}

impl EntityFlags {
    /// Fields that have never been written read as `false`.
    pub fn get(&self, field: &str) -> bool {
        self.flags.get(field).copied().unwrap_or(false)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub kind: EntityKind,
    pub id: String,
    pub flag: ModerationFlag,
    pub new_value: bool,
}
