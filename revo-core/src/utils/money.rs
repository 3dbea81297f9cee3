use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Minor units per major unit (paise per rupee).
const MINOR_PER_MAJOR: i64 = 100;

/// Convert a major-unit amount into integer minor units.
///
/// Returns `None` when the amount has sub-minor-unit precision or does not
/// fit in an `i64`.
pub fn to_minor_units(amount: Decimal) -> Option<i64> {
    let scaled = amount.checked_mul(Decimal::from(MINOR_PER_MAJOR))?;
    if !scaled.fract().is_zero() {
        return None;
    }
    scaled.to_i64()
}
