//! Money calculation utilities using rust_decimal for precision
//!
//! All ledger arithmetic runs on `Decimal` internally and converts to `f64`
//! at the storage/serialization edge.

use rust_decimal::prelude::*;

use crate::orders::PaymentStatus;
use crate::utils::AppError;
use crate::utils::time::millis_after_days;

/// Rounding strategy for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed order amount
pub const MAX_AMOUNT: f64 = 1_000_000.0;
/// Maximum allowed quantity per order line
pub const MAX_LINE_QUANTITY: f64 = 100_000.0;

/// Validate that a f64 value is finite (not NaN, not Infinity)
#[inline]
fn require_finite(value: f64, field_name: &str) -> Result<(), AppError> {
    if !value.is_finite() {
        return Err(AppError::Validation(format!(
            "{} must be a finite number, got {}",
            field_name, value
        )));
    }
    Ok(())
}

/// Validate an order line quantity
pub fn validate_quantity(quantity: f64) -> Result<(), AppError> {
    require_finite(quantity, "quantity")?;
    if quantity <= 0.0 {
        return Err(AppError::Validation(format!(
            "quantity must be positive, got {}",
            quantity
        )));
    }
    if quantity > MAX_LINE_QUANTITY {
        return Err(AppError::Validation(format!(
            "quantity exceeds maximum allowed ({}), got {}",
            MAX_LINE_QUANTITY, quantity
        )));
    }
    Ok(())
}

/// Validate a monetary amount (order total or unit price)
pub fn validate_amount(value: f64, field_name: &str) -> Result<(), AppError> {
    require_finite(value, field_name)?;
    if value < 0.0 {
        return Err(AppError::Validation(format!(
            "{} must be non-negative, got {}",
            field_name, value
        )));
    }
    if value > MAX_AMOUNT {
        return Err(AppError::Validation(format!(
            "{} exceeds maximum allowed ({}), got {}",
            field_name, MAX_AMOUNT, value
        )));
    }
    Ok(())
}

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Sum amounts with precise arithmetic
pub fn sum_amounts<I>(amounts: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let total: Decimal = amounts.into_iter().map(to_decimal).sum();
    to_f64(total)
}

/// Billing label shown in transaction histories and receivables
pub fn display_status(status: PaymentStatus) -> &'static str {
    match status {
        PaymentStatus::Unpaid => "Due",
        PaymentStatus::Paid => "Paid",
        PaymentStatus::Overdue => "Overdue",
    }
}

/// Effective due date: the stored value, else the configured default
/// counted from the order date. The derived value is never written back.
pub fn effective_due_date(due_date: Option<i64>, ordered_at: i64, due_days: i64) -> i64 {
    due_date.unwrap_or_else(|| millis_after_days(ordered_at, due_days))
}
