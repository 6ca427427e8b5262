//! Authentication and authorization.
//!
//! This module provides:
//! - Password hashing with Argon2id
//! - Society role definitions and their ordering

mod password;

pub use password::{MIN_PASSWORD_LEN, PasswordError, hash_password, verify_password};

use serde::{Deserialize, Serialize};

/// A user's role within one society, ordered by privilege.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SocietyRole {
    /// Resident: reads society data, votes, reads notices.
    Member,
    /// Manages structure, dues, allocations, penalties and ledgers.
    Admin,
    /// Creator of the society; everything an admin can do plus role changes.
    SuperAdmin,
}

impl SocietyRole {
    /// True if this role may change society data.
    #[must_use]
    pub const fn can_manage(&self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    /// True if this role may grant admin rights.
    #[must_use]
    pub const fn can_grant_roles(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }

    /// True if this role is at least `required`.
    #[must_use]
    pub fn satisfies(&self, required: Self) -> bool {
        *self >= required
    }

    /// Storage name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Member => "member",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }
}

impl std::fmt::Display for SocietyRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SocietyRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "member" => Ok(Self::Member),
            "admin" => Ok(Self::Admin),
            "super_admin" => Ok(Self::SuperAdmin),
            _ => Err(format!("Unknown society role: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_permissions() {
        assert!(SocietyRole::SuperAdmin.can_manage());
        assert!(SocietyRole::Admin.can_manage());
        assert!(!SocietyRole::Member.can_manage());

        assert!(SocietyRole::SuperAdmin.can_grant_roles());
        assert!(!SocietyRole::Admin.can_grant_roles());
    }

    #[test]
    fn test_role_ordering() {
        assert!(SocietyRole::SuperAdmin.satisfies(SocietyRole::Admin));
        assert!(SocietyRole::Admin.satisfies(SocietyRole::Admin));
        assert!(!SocietyRole::Member.satisfies(SocietyRole::Admin));
        assert!(SocietyRole::Member.satisfies(SocietyRole::Member));
    }

    #[test]
    fn test_role_round_trip() {
        for role in [
            SocietyRole::Member,
            SocietyRole::Admin,
            SocietyRole::SuperAdmin,
        ] {
            assert_eq!(role.to_string().parse::<SocietyRole>(), Ok(role));
        }
        assert!("owner".parse::<SocietyRole>().is_err());
    }
}
