//! Billing service: invoice pricing, payment planning and status rules.
//!
//! Everything here is pure. Repositories call into it with rows they have
//! already loaded (and, for payments, locked) and persist what it returns.

use rust_decimal::Decimal;
use scholaris_shared::types::money::{fits_column, has_money_scale};

use super::error::BillingError;
use super::types::{
    CreateInvoiceInput, InvoiceAmounts, InvoiceItemInput, InvoiceSnapshot, InvoiceStatus,
    PaymentPlan, PricedInvoice, PricedItem,
};

/// Billing service for invoice and payment validation.
///
/// This service contains pure business logic with no database dependencies.
pub struct BillingService;

impl BillingService {
    /// Validate and price an invoice before persisting.
    ///
    /// 1. Requires at least one line
    /// 2. Validates each line (description, quantity, unit price)
    /// 3. Fixes each line amount as `quantity * unit_price`
    /// 4. Validates discount and tax
    /// 5. Computes subtotal, total and balance, rejecting a negative total
    ///
    /// # Errors
    ///
    /// Returns `BillingError` if validation fails.
    pub fn price_invoice(input: &CreateInvoiceInput) -> Result<PricedInvoice, BillingError> {
        if input.items.is_empty() {
            return Err(BillingError::EmptyItems);
        }

        let mut items = Vec::with_capacity(input.items.len());
        for (index, item) in input.items.iter().enumerate() {
            items.push(Self::price_item(index, item)?);
        }

        Self::check_amount("Discount", input.discount)?;
        if input.discount < Decimal::ZERO {
            return Err(BillingError::NegativeDiscount);
        }
        Self::check_amount("Tax", input.tax)?;
        if input.tax < Decimal::ZERO {
            return Err(BillingError::NegativeTax);
        }

        let subtotal: Decimal = items.iter().map(|item| item.amount).sum();
        if !fits_column(subtotal) {
            return Err(BillingError::AmountTooLarge("Subtotal"));
        }

        let amounts = InvoiceAmounts::unpaid(subtotal, input.discount, input.tax);
        if amounts.total_amount < Decimal::ZERO {
            return Err(BillingError::NegativeTotal(amounts.total_amount));
        }
        if !fits_column(amounts.total_amount) {
            return Err(BillingError::AmountTooLarge("Total amount"));
        }

        Ok(PricedInvoice {
            items,
            amounts,
            status: InvoiceStatus::Pending,
        })
    }

    fn price_item(index: usize, item: &InvoiceItemInput) -> Result<PricedItem, BillingError> {
        let position = index + 1;

        if item.description.trim().is_empty() {
            return Err(BillingError::BlankDescription { position });
        }
        if item.quantity < 1 {
            return Err(BillingError::InvalidQuantity { position });
        }
        Self::check_amount("Unit price", item.unit_price)?;
        if item.unit_price < Decimal::ZERO {
            return Err(BillingError::NegativeUnitPrice { position });
        }

        let amount = Self::line_amount(item.quantity, item.unit_price);
        if !fits_column(amount) {
            return Err(BillingError::AmountTooLarge("Item amount"));
        }

        Ok(PricedItem {
            position: i32::try_from(index)
                .map_err(|_| BillingError::Internal("too many invoice items".to_string()))?,
            description: item.description.trim().to_string(),
            quantity: item.quantity,
            unit_price: item.unit_price,
            amount,
            fee_structure_id: item.fee_structure_id,
        })
    }

    /// Computes a line amount. Exact for two-decimal unit prices.
    #[must_use]
    pub fn line_amount(quantity: i32, unit_price: Decimal) -> Decimal {
        Decimal::from(quantity) * unit_price
    }

    /// Derives the status implied by the paid amount.
    ///
    /// Balance at or below zero is `Paid`; anything paid is `Partial`;
    /// otherwise `Pending`.
    #[must_use]
    pub fn derive_status(total_amount: Decimal, paid_amount: Decimal) -> InvoiceStatus {
        if total_amount - paid_amount <= Decimal::ZERO {
            InvoiceStatus::Paid
        } else if paid_amount > Decimal::ZERO {
            InvoiceStatus::Partial
        } else {
            InvoiceStatus::Pending
        }
    }

    /// Plans the application of a payment to an invoice snapshot.
    ///
    /// The snapshot must have been read under a row lock in the same
    /// transaction that will apply the plan; `expected_paid_amount` lets the
    /// update verify nothing moved in between.
    ///
    /// # Errors
    ///
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `TooPrecise` if `amount` has more than two decimal places
    /// - `InvoiceCancelled` if the invoice is cancelled
    /// - `ExceedsBalance` if `amount` is larger than the balance
    pub fn plan_payment(
        snapshot: &InvoiceSnapshot,
        amount: Decimal,
    ) -> Result<PaymentPlan, BillingError> {
        Self::check_payment_amount(amount)?;
        if snapshot.status == InvoiceStatus::Cancelled {
            return Err(BillingError::InvoiceCancelled);
        }

        let amounts = snapshot.amounts;
        if amount > amounts.balance_amount {
            return Err(BillingError::ExceedsBalance {
                balance: amounts.balance_amount,
            });
        }

        let new_paid_amount = amounts.paid_amount + amount;
        let new_balance_amount = amounts.total_amount - new_paid_amount;

        Ok(PaymentPlan {
            amount,
            expected_paid_amount: amounts.paid_amount,
            new_paid_amount,
            new_balance_amount,
            new_status: Self::derive_status(amounts.total_amount, new_paid_amount),
        })
    }

    /// Checks a payment amount on its own, before any invoice is read.
    ///
    /// # Errors
    ///
    /// - `NonPositiveAmount` if `amount <= 0`
    /// - `TooPrecise` if `amount` has more than two decimal places
    pub fn check_payment_amount(amount: Decimal) -> Result<(), BillingError> {
        if amount <= Decimal::ZERO {
            return Err(BillingError::NonPositiveAmount);
        }
        if !has_money_scale(amount) {
            return Err(BillingError::TooPrecise("Payment amount"));
        }
        Ok(())
    }

    /// Checks that an administrative status override agrees with the amounts.
    ///
    /// | status | requires |
    /// |---|---|
    /// | `Pending` | nothing paid |
    /// | `Partial` | something paid, balance remaining |
    /// | `Paid` | zero balance |
    /// | `Overdue`, `Cancelled` | balance remaining |
    ///
    /// # Errors
    ///
    /// Returns `StatusContradictsAmounts` naming the violated rule.
    pub fn validate_status_override(
        amounts: &InvoiceAmounts,
        status: InvoiceStatus,
    ) -> Result<(), BillingError> {
        let paid = amounts.paid_amount;
        let balance = amounts.balance_amount;

        let violation = match status {
            InvoiceStatus::Pending if paid > Decimal::ZERO => {
                Some("invoice already has payments")
            }
            InvoiceStatus::Partial if paid <= Decimal::ZERO => Some("nothing has been paid"),
            InvoiceStatus::Partial if balance <= Decimal::ZERO => {
                Some("invoice is fully paid")
            }
            InvoiceStatus::Paid if balance > Decimal::ZERO => Some("balance is still outstanding"),
            InvoiceStatus::Overdue | InvoiceStatus::Cancelled if balance <= Decimal::ZERO => {
                Some("invoice is fully paid")
            }
            _ => None,
        };

        match violation {
            Some(reason) => Err(BillingError::StatusContradictsAmounts { status, reason }),
            None => Ok(()),
        }
    }

    /// Checks that an invoice may be soft-deleted.
    ///
    /// # Errors
    ///
    /// Returns `HasPayments` if any payment references the invoice.
    pub fn ensure_deletable(payment_count: u64) -> Result<(), BillingError> {
        if payment_count > 0 {
            return Err(BillingError::HasPayments);
        }
        Ok(())
    }

    pub(super) fn check_amount(field: &'static str, value: Decimal) -> Result<(), BillingError> {
        if !has_money_scale(value) {
            return Err(BillingError::TooPrecise(field));
        }
        if !fits_column(value) {
            return Err(BillingError::AmountTooLarge(field));
        }
        Ok(())
    }
}
