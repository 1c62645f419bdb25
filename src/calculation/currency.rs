//! Currency normalization.
//!
//! Some Nador West Med tables are published in Moroccan dirham. Amounts are
//! converted to euros with the caller-supplied dirham-per-euro rate.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};

/// Converts a dirham amount to euros.
///
/// # Errors
///
/// Returns `InvalidInput` when the rate is zero or negative, or so small the
/// converted amount overflows.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::normalize_dirham;
/// use rust_decimal::Decimal;
///
/// let eur = normalize_dirham(Decimal::from(1085), Decimal::new(1085, 2)).unwrap();
/// assert_eq!(eur, Decimal::from(100));
/// ```
pub fn normalize_dirham(amount: Decimal, dh_per_eur: Decimal) -> EngineResult<Decimal> {
    if dh_per_eur <= Decimal::ZERO {
        return Err(EngineError::invalid_input(
            "dh_per_eur",
            format!("exchange rate must be greater than zero, got {}", dh_per_eur),
        ));
    }
    amount.checked_div(dh_per_eur).ok_or_else(|| {
        EngineError::invalid_input(
            "dh_per_eur",
            format!("converting {} at {} overflows", amount, dh_per_eur),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_trailer_rate_in_euros() {
        let eur = normalize_dirham(dec("1500.564"), dec("10.8")).unwrap();
        assert_eq!(eur.round_dp(2), dec("138.94"));
    }

    #[test]
    fn test_zero_rate_is_rejected() {
        match normalize_dirham(dec("100"), Decimal::ZERO) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "dh_per_eur"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_vanishing_rate_is_rejected() {
        match normalize_dirham(dec("1500"), dec("0.0000000000000000000000000001")) {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "dh_per_eur");
                assert!(message.contains("overflows"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_rate_is_rejected() {
        assert!(normalize_dirham(dec("100"), dec("-10.8")).is_err());
    }

    proptest! {
        #[test]
        fn prop_round_trip_within_a_cent(
            amount_cents in 0i64..1_000_000_000,
            rate_thousandths in 1_000i64..20_000,
        ) {
            let amount = Decimal::new(amount_cents, 2);
            let rate = Decimal::new(rate_thousandths, 3);
            let eur = normalize_dirham(amount, rate).unwrap();
            let back = eur * rate;
            prop_assert!((back - amount).abs() < Decimal::new(1, 2));
        }
    }
}
