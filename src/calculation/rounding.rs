//! Display rounding.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Decimal places shown for mean scores and mean points.
pub const DISPLAY_DECIMAL_PLACES: u32 = 2;

/// Rounds a computed value to 2 decimal places, halves away from zero.
///
/// Non-finite values (which well-formed inputs never produce) round to zero.
///
/// # Examples
///
/// ```
/// use grade_engine::calculation::round_for_display;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_for_display(22.0 / 3.0), Decimal::new(733, 2));
/// assert_eq!(round_for_display(0.125), Decimal::new(13, 2));
/// ```
pub fn round_for_display(value: f64) -> Decimal {
    Decimal::from_f64(value)
        .unwrap_or_default()
        .round_dp_with_strategy(DISPLAY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Converts a display value back to `f64` for classification.
pub fn display_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}
