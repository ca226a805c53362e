//! Entity re-exports.

pub use super::fee_structures::Entity as FeeStructures;
pub use super::invoice_items::Entity as InvoiceItems;
pub use super::invoices::Entity as Invoices;
pub use super::payments::Entity as Payments;
pub use super::schools::Entity as Schools;
pub use super::students::Entity as Students;
pub use super::users::Entity as Users;
