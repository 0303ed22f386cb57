//! Newtype wrappers around `i64` for all backend identifiers.
//!
//! Using distinct types prevents accidentally passing a `MapId` where a
//! `NodeId` is expected. The backend assigns positive ids; [`AclId`] also
//! carries negative, locally synthesized ids for rows not yet saved.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Macro to define a newtype ID wrapper around `i64`.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Create an identifier from a raw value.
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            /// Return the raw value.
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.trim().parse::<i64>().map(Self)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> i64 {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier for an ACL row. Negative values are local, unsaved rows.
    AclId
);

define_id!(
    /// Identifier for a user account.
    UserId
);

define_id!(
    /// Identifier for a group. `0` is the wildcard group.
    GroupId
);

define_id!(
    /// Identifier for a role. `0` is the wildcard role.
    RoleId
);

define_id!(
    /// Identifier for a map.
    MapId
);

define_id!(
    /// Identifier for a node.
    NodeId
);

impl AclId {
    /// Whether this id was synthesized locally and has never been saved.
    pub const fn is_synthetic(self) -> bool {
        self.0 < 0
    }
}

impl GroupId {
    /// The wildcard group assigned when no group is chosen.
    pub const WILDCARD: GroupId = GroupId(0);
}

impl RoleId {
    /// The wildcard role assigned when no role is chosen.
    pub const WILDCARD: RoleId = RoleId(0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synthetic_ids() {
        assert!(AclId::new(-1).is_synthetic());
        assert!(!AclId::new(0).is_synthetic());
        assert!(!AclId::new(42).is_synthetic());
    }

    #[test]
    fn test_from_str() {
        let id: NodeId = " 17 ".parse().unwrap();
        assert_eq!(id, NodeId(17));
        assert!("abc".parse::<MapId>().is_err());
    }

    #[test]
    fn test_serde_transparent() {
        let json = serde_json::to_string(&GroupId(5)).unwrap();
        assert_eq!(json, "5");
        let back: GroupId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, GroupId(5));
    }
}
