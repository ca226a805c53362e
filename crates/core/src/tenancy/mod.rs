//! Tenant scoping policy.
//!
//! Every invoice, payment and statement is reached through a student, and a
//! student belongs to exactly one school. This module decides which schools a
//! caller may see and which billing actions their role may attempt at all.

pub mod access;
pub mod scope;

#[cfg(test)]
mod scope_props;

pub use access::{AccessDenied, BillingAction};
pub use scope::TenantScope;
