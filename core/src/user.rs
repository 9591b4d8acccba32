//! User entity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Store-assigned user identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The caller-controlled fields of a user.
///
/// Used both for inserts and for full overwrites on update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}

/// A persisted user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Store-assigned identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Contact email address.
    pub email: String,
}

impl User {
    /// Combine an identifier with profile fields.
    #[must_use]
    pub fn from_profile(id: UserId, profile: UserProfile) -> Self {
        Self {
            id,
            name: profile.name,
            email: profile.email,
        }
    }
}
