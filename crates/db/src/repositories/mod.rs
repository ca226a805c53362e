//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every read is restricted to live rows inside the caller's tenant scope.

pub mod error;
pub mod fee_structure;
pub mod invoice;
pub mod payment;
pub mod student;

pub use error::RepositoryError;
pub use fee_structure::FeeStructureRepository;
pub use invoice::{
    FeeStructureRef, InvoiceDetails, InvoiceFilter, InvoiceLine, InvoiceRepository,
};
pub use payment::{PaymentDetails, PaymentFilter, PaymentRepository, RecordPaymentInput};
pub use student::StudentSummary;
