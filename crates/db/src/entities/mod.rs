//! `SeaORM` entity definitions.

pub mod prelude;

pub mod fee_structures;
pub mod invoice_items;
pub mod invoices;
pub mod payments;
pub mod schools;
pub mod sea_orm_active_enums;
pub mod students;
pub mod users;
