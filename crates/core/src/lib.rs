//! Core business logic for Scholaris billing.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `tenancy` - Tenant scoping policy and role gates
//! - `billing` - Invoice arithmetic, payment application, status rules,
//!   document numbering and fee statements

pub mod billing;
pub mod tenancy;
