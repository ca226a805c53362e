//! Property-based tests for tenant scoping.
//!
//! - A scoped caller sees exactly their own school
//! - A super-admin sees every school
//! - A caller without a school sees nothing

use proptest::prelude::*;
use scholaris_shared::types::{SchoolId, UserId};
use scholaris_shared::{Caller, Role};
use uuid::Uuid;

use super::scope::TenantScope;

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::SchoolAdmin),
        Just(Role::Teacher),
        Just(Role::Student),
        Just(Role::Parent),
    ]
}

fn school_strategy() -> impl Strategy<Value = SchoolId> {
    any::<u128>().prop_map(|n| SchoolId::from_uuid(Uuid::from_u128(n)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_scoped_caller_sees_only_own_school(
        role in role_strategy(),
        own in school_strategy(),
        other in school_strategy(),
    ) {
        let caller = Caller::new(UserId::new(), "a@b.test", role, Some(own));
        let scope = TenantScope::for_caller(&caller);

        prop_assert!(scope.permits(own));
        prop_assert_eq!(scope.permits(other), own == other);
    }

    #[test]
    fn prop_super_admin_sees_every_school(
        own in proptest::option::of(school_strategy()),
        other in school_strategy(),
    ) {
        let caller = Caller::new(UserId::new(), "root@b.test", Role::SuperAdmin, own);
        prop_assert!(TenantScope::for_caller(&caller).permits(other));
    }

    #[test]
    fn prop_schoolless_caller_sees_nothing(
        role in role_strategy(),
        other in school_strategy(),
    ) {
        let caller = Caller::new(UserId::new(), "lost@b.test", role, None);
        prop_assert!(!TenantScope::for_caller(&caller).permits(other));
    }
}
