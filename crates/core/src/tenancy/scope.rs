//! Caller-to-tenant scope resolution.

use scholaris_shared::Caller;
use scholaris_shared::types::SchoolId;

/// The set of schools a caller's queries are restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenantScope {
    /// Super-admin: no tenant predicate is applied.
    Unscoped,
    /// Queries are restricted to one school.
    School(SchoolId),
    /// Non-super-admin without a school. Every scoped query matches nothing.
    Nothing,
}

impl TenantScope {
    /// Resolves the scope for a caller.
    #[must_use]
    pub fn for_caller(caller: &Caller) -> Self {
        if caller.role.is_super_admin() {
            return Self::Unscoped;
        }
        match caller.school_id {
            Some(school_id) => Self::School(school_id),
            None => Self::Nothing,
        }
    }

    /// Returns true when a record owned by `school_id` is visible.
    #[must_use]
    pub fn permits(&self, school_id: SchoolId) -> bool {
        match self {
            Self::Unscoped => true,
            Self::School(own) => *own == school_id,
            Self::Nothing => false,
        }
    }

    /// Returns the school the scope is pinned to, if any.
    #[must_use]
    pub const fn school_id(&self) -> Option<SchoolId> {
        match self {
            Self::School(id) => Some(*id),
            Self::Unscoped | Self::Nothing => None,
        }
    }

    /// Picks the school a new record is created under.
    ///
    /// An explicit request wins when the scope permits it. Without one the
    /// caller's own school is used. `None` means no school can be chosen.
    #[must_use]
    pub fn target_school(&self, requested: Option<SchoolId>) -> Option<SchoolId> {
        match requested {
            Some(school_id) => self.permits(school_id).then_some(school_id),
            None => self.school_id(),
        }
    }
}

impl From<&Caller> for TenantScope {
    fn from(caller: &Caller) -> Self {
        Self::for_caller(caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scholaris_shared::Role;
    use scholaris_shared::types::UserId;

    fn caller(role: Role, school: Option<SchoolId>) -> Caller {
        Caller::new(UserId::new(), "someone@school.test", role, school)
    }

    #[test]
    fn test_super_admin_is_unscoped_even_with_school() {
        let scope = TenantScope::for_caller(&caller(Role::SuperAdmin, Some(SchoolId::new())));
        assert_eq!(scope, TenantScope::Unscoped);
        assert_eq!(scope.school_id(), None);
    }

    #[test]
    fn test_school_admin_is_pinned_to_school() {
        let school = SchoolId::new();
        let scope = TenantScope::for_caller(&caller(Role::SchoolAdmin, Some(school)));
        assert_eq!(scope, TenantScope::School(school));
        assert!(scope.permits(school));
        assert!(!scope.permits(SchoolId::new()));
    }

    #[test]
    fn test_missing_school_fails_closed() {
        let scope = TenantScope::for_caller(&caller(Role::Parent, None));
        assert_eq!(scope, TenantScope::Nothing);
        assert!(!scope.permits(SchoolId::new()));
        assert_eq!(scope.school_id(), None);
    }

    #[test]
    fn test_target_school() {
        let own = SchoolId::new();
        let other = SchoolId::new();

        let pinned = TenantScope::School(own);
        assert_eq!(pinned.target_school(None), Some(own));
        assert_eq!(pinned.target_school(Some(own)), Some(own));
        assert_eq!(pinned.target_school(Some(other)), None);

        assert_eq!(TenantScope::Unscoped.target_school(Some(other)), Some(other));
        assert_eq!(TenantScope::Unscoped.target_school(None), None);
        assert_eq!(TenantScope::Nothing.target_school(Some(own)), None);
    }
}
