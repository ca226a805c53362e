//! Authentication types: roles, JWT claims and the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{SchoolId, UserId};

/// Role of a user within the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Platform operator, not bound to any school.
    SuperAdmin,
    /// Administrator of one school.
    SchoolAdmin,
    /// Teacher at one school.
    Teacher,
    /// Student at one school.
    Student,
    /// Parent or guardian of a student.
    Parent,
}

impl Role {
    /// Returns the database/wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::SuperAdmin => "SUPER_ADMIN",
            Self::SchoolAdmin => "SCHOOL_ADMIN",
            Self::Teacher => "TEACHER",
            Self::Student => "STUDENT",
            Self::Parent => "PARENT",
        }
    }

    /// Returns true for the role exempt from tenant scoping.
    #[must_use]
    pub const fn is_super_admin(&self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SUPER_ADMIN" => Ok(Self::SuperAdmin),
            "SCHOOL_ADMIN" => Ok(Self::SchoolAdmin),
            "TEACHER" => Ok(Self::Teacher),
            "STUDENT" => Ok(Self::Student),
            "PARENT" => Ok(Self::Parent),
            _ => Err(format!("Unknown role: {s}")),
        }
    }
}

/// JWT claims for access tokens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: Uuid,
    /// User email.
    pub email: String,
    /// User's role.
    pub role: Role,
    /// Tenant the user belongs to; absent for super-admins.
    #[serde(default)]
    pub school: Option<Uuid>,
    /// Issued at timestamp.
    pub iat: i64,
    /// Expiration timestamp.
    pub exp: i64,
}

impl Claims {
    /// Creates new claims for a user.
    #[must_use]
    pub fn new(
        user_id: Uuid,
        email: &str,
        role: Role,
        school_id: Option<Uuid>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        let now = Utc::now();
        Self {
            sub: user_id,
            email: email.to_string(),
            role,
            school: school_id,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        }
    }

    /// Returns the user ID from claims.
    #[must_use]
    pub const fn user_id(&self) -> Uuid {
        self.sub
    }

    /// Returns the school ID from claims, if any.
    #[must_use]
    pub const fn school_id(&self) -> Option<Uuid> {
        self.school
    }
}

/// The authenticated identity performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller {
    /// User performing the request.
    pub user_id: UserId,
    /// User email.
    pub email: String,
    /// User's role.
    pub role: Role,
    /// Tenant of the user; `None` for super-admins (and misconfigured accounts).
    pub school_id: Option<SchoolId>,
}

impl Caller {
    /// Creates a caller.
    #[must_use]
    pub fn new(
        user_id: UserId,
        email: impl Into<String>,
        role: Role,
        school_id: Option<SchoolId>,
    ) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            school_id,
        }
    }
}

impl From<Claims> for Caller {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: UserId::from_uuid(claims.sub),
            email: claims.email,
            role: claims.role,
            school_id: claims.school.map(SchoolId::from_uuid),
        }
    }
}
