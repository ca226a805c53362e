//! Property-based tests for BillingService.
//!
//! - Total integrity: `total = subtotal - discount + tax`
//! - Balance integrity: `balance = total - paid` after every payment
//! - Paid amount never decreases and never exceeds the total
//! - Paying exactly the balance settles the invoice
//! - Statement totals equal the sums of their lines

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use scholaris_shared::types::StudentId;

use super::error::BillingError;
use super::service::BillingService;
use super::statement::{StatementLine, summarize};
use super::types::{CreateInvoiceInput, InvoiceItemInput, InvoiceSnapshot, InvoiceStatus};

/// Strategy to generate non-negative unit prices (0.00 to 10,000.00).
fn unit_price() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive payment amounts (0.01 to 2,000.00).
fn payment_amount() -> impl Strategy<Value = Decimal> {
    (1i64..200_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate invoice lines.
fn item() -> impl Strategy<Value = InvoiceItemInput> {
    (unit_price(), 1i32..20i32).prop_map(|(price, quantity)| {
        InvoiceItemInput::new("Fee", price).with_quantity(quantity)
    })
}

fn make_input(items: Vec<InvoiceItemInput>, discount: Decimal, tax: Decimal) -> CreateInvoiceInput {
    CreateInvoiceInput {
        student_id: StudentId::new(),
        issue_date: None,
        due_date: NaiveDate::from_ymd_opt(2026, 6, 30).unwrap(),
        items,
        discount,
        tax,
        notes: None,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Priced invoices always satisfy both arithmetic invariants.
    #[test]
    fn prop_priced_invoice_is_consistent(
        items in prop::collection::vec(item(), 1..8),
        discount_cents in 0i64..10_000i64,
        tax in unit_price(),
    ) {
        let discount = Decimal::new(discount_cents, 2);
        match BillingService::price_invoice(&make_input(items.clone(), discount, tax)) {
            Ok(priced) => {
                let expected: Decimal = items
                    .iter()
                    .map(|i| Decimal::from(i.quantity) * i.unit_price)
                    .sum();
                prop_assert_eq!(priced.amounts.subtotal, expected);
                prop_assert_eq!(
                    priced.amounts.total_amount,
                    priced.amounts.subtotal - discount + tax
                );
                prop_assert_eq!(priced.amounts.balance_amount, priced.amounts.total_amount);
                prop_assert_eq!(priced.amounts.paid_amount, Decimal::ZERO);
                prop_assert!(priced.amounts.is_consistent());
                prop_assert_eq!(priced.status, InvoiceStatus::Pending);
                prop_assert_eq!(priced.items.len(), items.len());
            }
            Err(BillingError::NegativeTotal(total)) => {
                prop_assert!(total < Decimal::ZERO);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Applying any sequence of payments keeps the invariants, never lowers
    /// the paid amount and never overpays.
    #[test]
    fn prop_payment_sequence_preserves_invariants(
        price in (1i64..500_000i64).prop_map(|c| Decimal::new(c, 2)),
        payments in prop::collection::vec(payment_amount(), 1..12),
    ) {
        let priced = BillingService::price_invoice(&make_input(
            vec![InvoiceItemInput::new("Tuition", price)],
            Decimal::ZERO,
            Decimal::ZERO,
        ))
        .unwrap();

        let mut snapshot = InvoiceSnapshot { status: priced.status, amounts: priced.amounts };
        let mut accepted = Decimal::ZERO;

        for amount in payments {
            let before = snapshot;
            match BillingService::plan_payment(&snapshot, amount) {
                Ok(plan) => {
                    prop_assert!(plan.new_paid_amount > before.amounts.paid_amount);
                    prop_assert_eq!(plan.expected_paid_amount, before.amounts.paid_amount);
                    snapshot.amounts.paid_amount = plan.new_paid_amount;
                    snapshot.amounts.balance_amount = plan.new_balance_amount;
                    snapshot.status = plan.new_status;
                    accepted += amount;
                }
                Err(BillingError::ExceedsBalance { balance }) => {
                    prop_assert!(amount > before.amounts.balance_amount);
                    prop_assert_eq!(balance, before.amounts.balance_amount);
                    prop_assert_eq!(snapshot, before);
                }
                Err(other) => prop_assert!(false, "unexpected error: {other}"),
            }

            prop_assert!(snapshot.amounts.is_consistent());
            prop_assert!(snapshot.amounts.balance_amount >= Decimal::ZERO);
            prop_assert_eq!(snapshot.amounts.paid_amount, accepted);
            prop_assert_eq!(
                snapshot.status,
                BillingService::derive_status(
                    snapshot.amounts.total_amount,
                    snapshot.amounts.paid_amount
                )
            );
        }
    }

    /// Paying exactly the remaining balance settles the invoice.
    #[test]
    fn prop_exact_balance_settles(
        price in (1i64..500_000i64).prop_map(|c| Decimal::new(c, 2)),
        first_share in 0u8..100u8,
    ) {
        let priced = BillingService::price_invoice(&make_input(
            vec![InvoiceItemInput::new("Tuition", price)],
            Decimal::ZERO,
            Decimal::ZERO,
        ))
        .unwrap();
        let mut snapshot = InvoiceSnapshot { status: priced.status, amounts: priced.amounts };

        let first = (price * Decimal::from(first_share) / Decimal::from(100)).round_dp(2);
        if first > Decimal::ZERO && first < price {
            let plan = BillingService::plan_payment(&snapshot, first).unwrap();
            prop_assert_eq!(plan.new_status, InvoiceStatus::Partial);
            snapshot.amounts.paid_amount = plan.new_paid_amount;
            snapshot.amounts.balance_amount = plan.new_balance_amount;
            snapshot.status = plan.new_status;
        }

        let plan = BillingService::plan_payment(&snapshot, snapshot.amounts.balance_amount).unwrap();
        prop_assert_eq!(plan.new_balance_amount, Decimal::ZERO);
        prop_assert_eq!(plan.new_paid_amount, price);
        prop_assert_eq!(plan.new_status, InvoiceStatus::Paid);
    }

    /// Statement summary is the sum of its lines.
    #[test]
    fn prop_statement_sums(
        lines in prop::collection::vec((unit_price(), 0u8..=100u8), 0..10),
    ) {
        let lines: Vec<StatementLine> = lines
            .into_iter()
            .map(|(total, share)| {
                let paid = (total * Decimal::from(share) / Decimal::from(100)).round_dp(2);
                StatementLine {
                    invoice_number: "INV".to_string(),
                    issue_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
                    due_date: NaiveDate::from_ymd_opt(2026, 2, 1).unwrap(),
                    total_amount: total,
                    paid_amount: paid,
                    balance: total - paid,
                    status: BillingService::derive_status(total, paid),
                }
            })
            .collect();

        let summary = summarize(&lines);
        let balances: Decimal = lines.iter().map(|l| l.balance).sum();
        prop_assert_eq!(summary.current_balance, summary.total_due - summary.total_paid);
        prop_assert_eq!(summary.current_balance, balances);
    }
}
