//! Uuid newtypes, one per table a handler or domain rule refers to.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

macro_rules! typed_ids {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Fresh time-ordered (v7) id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps a uuid read from storage or a request.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// The raw uuid, for queries.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    )+};
}

typed_ids! {
    /// A registered user.
    UserId;
    /// A society. Every other row belongs to exactly one.
    SocietyId;
    /// A building inside a society.
    BuildingId;
    /// A flat inside a building.
    FlatId;
    /// A standalone housing unit.
    HousingUnitId;
    /// A user assigned to a flat or housing unit.
    MemberId;
    /// A monthly maintenance due.
    DueId;
    /// One month's share of a pending maintenance amount.
    AllocationId;
    /// A penalty raised against a unit.
    PenaltyId;
    /// A poll.
    PollId;
    /// One choice on a poll.
    PollOptionId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
