use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fixed role hierarchy of the platform.
///
/// `Unknown` is what an actor resolves to when none of its labels is one of
/// the five recognized roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    SystemAdmin,
    SchoolAdmin,
    ContentModerator,
    Teacher,
    Student,
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized role label '{0}'")]
pub struct UnrecognizedRole(pub String);

impl Role {
    /// Recognized roles, highest priority first.
    pub const PRIORITY: [Role; 5] = [
        Role::SystemAdmin,
        Role::SchoolAdmin,
        Role::ContentModerator,
        Role::Teacher,
        Role::Student,
    ];

    /// Picks the highest-priority recognized role out of a set of labels.
    ///
    /// Unrecognized labels are ignored; an empty set (or one made only of
    /// unrecognized labels) resolves to [`Role::Unknown`].
    pub fn resolve<I, S>(labels: I) -> Role
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let present: Vec<Role> = labels
            .into_iter()
            .filter_map(|label| label.as_ref().parse::<Role>().ok())
            .collect();
        Self::PRIORITY
            .into_iter()
            .find(|role| present.contains(role))
            .unwrap_or(Role::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::SystemAdmin => "SystemAdmin",
            Role::SchoolAdmin => "SchoolAdmin",
            Role::ContentModerator => "ContentModerator",
            Role::Teacher => "Teacher",
            Role::Student => "Student",
            Role::Unknown => "Unknown",
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown)
    }

    /// Teachers and content moderators share the staff branch of every guard.
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Teacher | Role::ContentModerator)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UnrecognizedRole;

    // "Unknown" is an outcome of resolution, never a label an actor carries.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "SystemAdmin" => Ok(Role::SystemAdmin),
            "SchoolAdmin" => Ok(Role::SchoolAdmin),
            "ContentModerator" => Ok(Role::ContentModerator),
            "Teacher" => Ok(Role::Teacher),
            "Student" => Ok(Role::Student),
            other => Err(UnrecognizedRole(other.to_string())),
        }
    }
}
