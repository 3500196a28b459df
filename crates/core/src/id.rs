// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Key newtypes for entities in the tree.
//!
//! Keys are assigned by the mobile client or the project manager tooling,
//! never by this service, so the wrappers only carry and compare them.

/// Define a newtype key wrapper around `SmolStr`.
///
/// Generates `new()`, `as_str()`, `is_empty()`, `Display`, `From<String>`,
/// `From<&str>`, `AsRef<str>`, `Borrow<str>`, `PartialEq<str>` and
/// `PartialEq<&str>`.
///
/// ```ignore
/// define_key! {
///     /// Doc comment for the key type.
///     pub struct ProjectId;
/// }
/// ```
#[macro_export]
macro_rules! define_key {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            pub fn new(key: impl Into<smol_str::SmolStr>) -> Self {
                Self(key.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::new(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_key! {
    /// Project key, e.g. `-NFOro2sLvW7fq6aDZ2M`.
    pub struct ProjectId;
}

define_key! {
    /// Group key within a project.
    pub struct GroupId;
}

define_key! {
    /// User key (the auth uid of the mobile client).
    pub struct UserId;
}

define_key! {
    /// User group key.
    pub struct UserGroupId;
}

define_key! {
    /// Key of a user group membership log entry.
    pub struct MembershipId;
}

/// Identifier attached to each dispatched event for log correlation.
///
/// Format is `evt-{nanoid}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct EventId(pub smol_str::SmolStr);

impl EventId {
    pub const PREFIX: &'static str = "evt-";

    /// Generate a new random event id
    pub fn generate() -> Self {
        Self(smol_str::SmolStr::new(format!("{}{}", Self::PREFIX, nanoid::nanoid!(16))))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
