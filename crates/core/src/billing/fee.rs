//! Fee structures: the per-school catalogue invoice lines are drawn from.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::BillingError;
use super::service::BillingService;
use super::types::InvoiceItemInput;

/// How often a fee falls due.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FeeFrequency {
    /// Every month.
    Monthly,
    /// Every term of three months.
    Quarterly,
    /// Once per academic year.
    #[default]
    Yearly,
    /// Charged a single time.
    OneTime,
}

impl FeeFrequency {
    /// Returns the string representation of the frequency.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Monthly => "MONTHLY",
            Self::Quarterly => "QUARTERLY",
            Self::Yearly => "YEARLY",
            Self::OneTime => "ONE_TIME",
        }
    }
}

impl std::fmt::Display for FeeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A new fee structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeeStructureInput {
    /// Display name, e.g. "Tuition".
    pub name: String,
    /// Free-form description.
    pub description: Option<String>,
    /// Standard charge.
    pub amount: Decimal,
    /// Billing cadence.
    pub frequency: FeeFrequency,
    /// Whether families may opt out.
    pub is_optional: bool,
}

/// Partial update of a fee structure. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeStructurePatch {
    /// New name.
    pub name: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New amount.
    pub amount: Option<Decimal>,
    /// New cadence.
    pub frequency: Option<FeeFrequency>,
    /// New opt-out flag.
    pub is_optional: Option<bool>,
}

impl FeeStructurePatch {
    /// True when the patch changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.amount.is_none()
            && self.frequency.is_none()
            && self.is_optional.is_none()
    }
}

impl BillingService {
    /// Validates a new fee structure and returns it with the name trimmed.
    ///
    /// # Errors
    ///
    /// - `BlankFeeName` if the name is blank
    /// - `TooPrecise` or `AmountTooLarge` if the amount does not fit the column
    /// - `NegativeFeeAmount` if the amount is below zero
    pub fn validate_fee_structure(
        input: FeeStructureInput,
    ) -> Result<FeeStructureInput, BillingError> {
        let name = Self::fee_name(&input.name)?;
        Self::fee_amount(input.amount)?;
        Ok(FeeStructureInput { name, ..input })
    }

    /// Validates the fields a patch sets.
    ///
    /// # Errors
    ///
    /// Same rules as [`BillingService::validate_fee_structure`].
    pub fn validate_fee_patch(patch: FeeStructurePatch) -> Result<FeeStructurePatch, BillingError> {
        let name = patch.name.as_deref().map(Self::fee_name).transpose()?;
        if let Some(amount) = patch.amount {
            Self::fee_amount(amount)?;
        }
        Ok(FeeStructurePatch { name, ..patch })
    }

    /// Distinct fee structure ids referenced by invoice lines.
    #[must_use]
    pub fn referenced_fee_structures(items: &[InvoiceItemInput]) -> Vec<Uuid> {
        items
            .iter()
            .filter_map(|item| item.fee_structure_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Checks that every referenced fee structure is among those offered by
    /// the student's school.
    ///
    /// # Errors
    ///
    /// Returns `UnknownFeeStructure` for the first line whose reference is
    /// not offered.
    pub fn ensure_fee_structures_offered(
        items: &[InvoiceItemInput],
        offered: &[Uuid],
    ) -> Result<(), BillingError> {
        let missing = items.iter().position(|item| {
            item.fee_structure_id
                .is_some_and(|id| !offered.contains(&id))
        });
        match missing {
            Some(index) => Err(BillingError::UnknownFeeStructure { position: index + 1 }),
            None => Ok(()),
        }
    }

    fn fee_name(name: &str) -> Result<String, BillingError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BillingError::BlankFeeName);
        }
        Ok(name.to_string())
    }

    fn fee_amount(amount: Decimal) -> Result<(), BillingError> {
        Self::check_amount("Fee amount", amount)?;
        if amount < Decimal::ZERO {
            return Err(BillingError::NegativeFeeAmount);
        }
        Ok(())
    }
}
