//! `SeaORM` active enums mirroring the PostgreSQL enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use scholaris_core::billing::{
    FeeFrequency as DomainFeeFrequency, InvoiceStatus as DomainInvoiceStatus,
    PaymentMethod as DomainPaymentMethod,
};
use scholaris_shared::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
pub enum UserRole {
    #[sea_orm(string_value = "SUPER_ADMIN")]
    SuperAdmin,
    #[sea_orm(string_value = "SCHOOL_ADMIN")]
    SchoolAdmin,
    #[sea_orm(string_value = "TEACHER")]
    Teacher,
    #[sea_orm(string_value = "STUDENT")]
    Student,
    #[sea_orm(string_value = "PARENT")]
    Parent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "invoice_status")]
pub enum InvoiceStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "PARTIAL")]
    Partial,
    #[sea_orm(string_value = "PAID")]
    Paid,
    #[sea_orm(string_value = "OVERDUE")]
    Overdue,
    #[sea_orm(string_value = "CANCELLED")]
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "payment_method")]
pub enum PaymentMethod {
    #[sea_orm(string_value = "CASH")]
    Cash,
    #[sea_orm(string_value = "BANK_TRANSFER")]
    BankTransfer,
    #[sea_orm(string_value = "CARD")]
    Card,
    #[sea_orm(string_value = "CHEQUE")]
    Cheque,
    #[sea_orm(string_value = "ONLINE")]
    Online,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "fee_frequency")]
pub enum FeeFrequency {
    #[sea_orm(string_value = "MONTHLY")]
    Monthly,
    #[sea_orm(string_value = "QUARTERLY")]
    Quarterly,
    #[sea_orm(string_value = "YEARLY")]
    Yearly,
    #[sea_orm(string_value = "ONE_TIME")]
    OneTime,
}

impl From<Role> for UserRole {
    fn from(role: Role) -> Self {
        match role {
            Role::SuperAdmin => Self::SuperAdmin,
            Role::SchoolAdmin => Self::SchoolAdmin,
            Role::Teacher => Self::Teacher,
            Role::Student => Self::Student,
            Role::Parent => Self::Parent,
        }
    }
}

impl From<UserRole> for Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::SuperAdmin => Self::SuperAdmin,
            UserRole::SchoolAdmin => Self::SchoolAdmin,
            UserRole::Teacher => Self::Teacher,
            UserRole::Student => Self::Student,
            UserRole::Parent => Self::Parent,
        }
    }
}

impl From<DomainInvoiceStatus> for InvoiceStatus {
    fn from(status: DomainInvoiceStatus) -> Self {
        match status {
            DomainInvoiceStatus::Pending => Self::Pending,
            DomainInvoiceStatus::Partial => Self::Partial,
            DomainInvoiceStatus::Paid => Self::Paid,
            DomainInvoiceStatus::Overdue => Self::Overdue,
            DomainInvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<InvoiceStatus> for DomainInvoiceStatus {
    fn from(status: InvoiceStatus) -> Self {
        match status {
            InvoiceStatus::Pending => Self::Pending,
            InvoiceStatus::Partial => Self::Partial,
            InvoiceStatus::Paid => Self::Paid,
            InvoiceStatus::Overdue => Self::Overdue,
            InvoiceStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl From<DomainPaymentMethod> for PaymentMethod {
    fn from(method: DomainPaymentMethod) -> Self {
        match method {
            DomainPaymentMethod::Cash => Self::Cash,
            DomainPaymentMethod::BankTransfer => Self::BankTransfer,
            DomainPaymentMethod::Card => Self::Card,
            DomainPaymentMethod::Cheque => Self::Cheque,
            DomainPaymentMethod::Online => Self::Online,
        }
    }
}

impl From<PaymentMethod> for DomainPaymentMethod {
    fn from(method: PaymentMethod) -> Self {
        match method {
            PaymentMethod::Cash => Self::Cash,
            PaymentMethod::BankTransfer => Self::BankTransfer,
            PaymentMethod::Card => Self::Card,
            PaymentMethod::Cheque => Self::Cheque,
            PaymentMethod::Online => Self::Online,
        }
    }
}

impl From<DomainFeeFrequency> for FeeFrequency {
    fn from(frequency: DomainFeeFrequency) -> Self {
        match frequency {
            DomainFeeFrequency::Monthly => Self::Monthly,
            DomainFeeFrequency::Quarterly => Self::Quarterly,
            DomainFeeFrequency::Yearly => Self::Yearly,
            DomainFeeFrequency::OneTime => Self::OneTime,
        }
    }
}

impl From<FeeFrequency> for DomainFeeFrequency {
    fn from(frequency: FeeFrequency) -> Self {
        match frequency {
            FeeFrequency::Monthly => Self::Monthly,
            FeeFrequency::Quarterly => Self::Quarterly,
            FeeFrequency::Yearly => Self::Yearly,
            FeeFrequency::OneTime => Self::OneTime,
        }
    }
}
