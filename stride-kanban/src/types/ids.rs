//! Newtype identifiers for tasks and the references they carry

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! string_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap an existing identifier string
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the identifier as a string slice
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }
    };
}

string_id! {
    /// Identifier of a task document. Generated as a ULID on creation.
    TaskId
}

string_id! {
    /// Identifier of one entry in an operation log. Generated as a ULID.
    LogEntryId
}

string_id! {
    /// Opaque reference to the workspace a task belongs to.
    ///
    /// Workspaces are managed outside the engine; the engine only scopes
    /// boards and batches by this value.
    WorkspaceId
}

string_id! {
    /// Opaque reference to the project a task belongs to.
    ProjectId
}

string_id! {
    /// Opaque reference to the workspace member a task is assigned to.
    MemberId
}

impl TaskId {
    /// Generate a fresh task identifier
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEntryId {
    /// Generate a fresh log entry identifier
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }
}

impl Default for LogEntryId {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_is_ulid_shaped() {
        let id = TaskId::new();
        assert_eq!(id.as_str().len(), 26);
    }

    #[test]
    fn test_ids_round_trip_through_serde() {
        let id = WorkspaceId::from_string("ws-alpha");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"ws-alpha\"");
        let parsed: WorkspaceId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = TaskId::new();
        let b = TaskId::new();
        assert_ne!(a, b);
    }
}
