//! Surcharge composition.
//!
//! A movement fee is its base rate multiplied by every applicable surcharge
//! factor. Factors commute. A full exemption zeroes the fee before any factor
//! is looked at. A partial exemption is a factor on the movement the regime
//! designates for it and a full exemption on every other movement.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::config::PartialExemptionRule;
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, Exemption, Movement};

/// A labelled multiplicative factor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurchargeFactor {
    /// What the factor stands for (e.g. "distress").
    pub label: String,
    /// The multiplier.
    pub factor: Decimal,
}

impl SurchargeFactor {
    /// Creates a labelled factor.
    pub fn new(label: impl Into<String>, factor: Decimal) -> Self {
        Self {
            label: label.into(),
            factor,
        }
    }
}

/// The result of composing surcharges on a base amount.
#[derive(Debug, Clone)]
pub struct SurchargeResult {
    /// The final amount.
    pub amount: Decimal,
    /// Every factor applied, including a partial exemption factor.
    pub applied: Vec<SurchargeFactor>,
    /// True when a full exemption zeroed the amount.
    pub exempt: bool,
    /// The audit step recording this composition.
    pub audit_step: AuditStep,
}

/// Returns the factor a regime defines for a surcharge.
///
/// # Errors
///
/// Returns `InvalidInput` naming `field` when the regime has no such factor.
pub fn defined_factor(rate: Option<Decimal>, field: &str) -> EngineResult<Decimal> {
    rate.ok_or_else(|| EngineError::invalid_input(field, "surcharge is not defined by this regime"))
}

/// Overtime factor `1 + step × ceil(hours)`.
///
/// Every started hour adds one step to a single factor; hours do not compound.
pub fn overtime_factor(step: Decimal, hours: Decimal) -> Decimal {
    Decimal::ONE + step * hours.ceil()
}

/// Applies an exemption and a list of factors to a base amount.
///
/// # Arguments
///
/// * `base` - The base amount before surcharges
/// * `factors` - Multiplicative factors, in any order
/// * `exemption` - The exemption status of the movement
/// * `partial_rule` - The regime's partial exemption rule, if any
/// * `movement` - The movement being priced, checked against the partial rule
/// * `tariff_ref` - Tariff section recorded in the audit step
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidInput` when a partial exemption is requested on a regime
/// without one, or on a fee that is not tied to a movement.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::{compose_surcharges, SurchargeFactor};
/// use port_tariff_engine::models::Exemption;
/// use rust_decimal::Decimal;
///
/// let factors = vec![
///     SurchargeFactor::new("confirmed_delay", Decimal::new(15, 1)),
///     SurchargeFactor::new("distress", Decimal::from(2)),
/// ];
/// let result = compose_surcharges(
///     Decimal::from(100), &factors, Exemption::None, None, None, "pilotage", 1,
/// )
/// .unwrap();
/// assert_eq!(result.amount, Decimal::from(300));
/// ```
pub fn compose_surcharges(
    base: Decimal,
    factors: &[SurchargeFactor],
    exemption: Exemption,
    partial_rule: Option<&PartialExemptionRule>,
    movement: Option<Movement>,
    tariff_ref: &str,
    step_number: u32,
) -> EngineResult<SurchargeResult> {
    let mut applied = Vec::with_capacity(factors.len() + 1);

    let fully_exempt = match exemption {
        Exemption::None => false,
        Exemption::Full => true,
        Exemption::Partial => {
            let rule = partial_rule.ok_or_else(|| {
                EngineError::invalid_input("exemption", "this regime has no partial exemption")
            })?;
            let movement = movement.ok_or_else(|| {
                EngineError::invalid_input(
                    "exemption",
                    "partial exemption only applies to movement fees",
                )
            })?;
            if movement == rule.movement {
                applied.push(SurchargeFactor::new("partial_exemption", rule.factor));
            }
            movement != rule.movement
        }
    };

    let (amount, exempt) = if fully_exempt {
        (Decimal::ZERO, true)
    } else {
        applied.extend(factors.iter().cloned());
        let amount = applied.iter().fold(base, |acc, f| acc * f.factor);
        (amount, false)
    };

    let reasoning = if exempt {
        format!("Fully exempt: {} base and every surcharge skipped", base.round_dp(2))
    } else if applied.is_empty() {
        format!("No surcharge: {}", base.round_dp(4))
    } else {
        let chain: Vec<String> = applied
            .iter()
            .map(|f| format!("{} ({})", f.factor.normalize(), f.label))
            .collect();
        format!(
            "{} × {} = {}",
            base.round_dp(4),
            chain.join(" × "),
            amount.round_dp(4)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "surcharges".to_string(),
        rule_name: "Surcharge Composition".to_string(),
        tariff_ref: tariff_ref.to_string(),
        input: serde_json::json!({
            "base": base.to_string(),
            "exemption": exemption,
            "movement": movement.map(Movement::key)
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "factors": applied,
            "exempt": exempt
        }),
        reasoning,
    };

    Ok(SurchargeResult {
        amount,
        applied,
        exempt,
        audit_step,
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

    fn exit_half_rate() -> PartialExemptionRule {
        PartialExemptionRule {
            movement: Movement::Exit,
            factor: dec("0.5"),
        }
    }

    #[test]
    fn test_no_factors_returns_base() {
        let result =
            compose_surcharges(dec("317"), &[], Exemption::None, None, None, "pilotage", 1)
                .unwrap();
        assert_eq!(result.amount, dec("317"));
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_full_exemption_skips_factors() {
        let factors = vec![SurchargeFactor::new("distress", dec("2"))];
        let result = compose_surcharges(
            dec("317"), &factors, Exemption::Full, None, Some(Movement::Entry), "pilotage", 1,
        )
        .unwrap();

        assert!(result.exempt);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_partial_exemption_on_designated_movement() {
        let rule = exit_half_rate();
        let factors = vec![SurchargeFactor::new("distress", dec("2"))];
        let result = compose_surcharges(
            dec("215.7"),
            &factors,
            Exemption::Partial,
            Some(&rule),
            Some(Movement::Exit),
            "pilotage",
            1,
        )
        .unwrap();

        assert_eq!(result.amount, dec("215.7"));
        assert_eq!(result.applied[0].label, "partial_exemption");
    }

    #[test]
    fn test_partial_exemption_waives_other_movements() {
        let rule = exit_half_rate();
        let factors = vec![SurchargeFactor::new("distress", dec("2"))];
        let result = compose_surcharges(
            dec("317"),
            &factors,
            Exemption::Partial,
            Some(&rule),
            Some(Movement::Entry),
            "pilotage",
            1,
        )
        .unwrap();

        assert!(result.exempt);
        assert_eq!(result.amount, Decimal::ZERO);
        assert!(result.applied.is_empty());
    }

    #[test]
    fn test_partial_exemption_needs_a_movement() {
        let rule = exit_half_rate();
        let result =
            compose_surcharges(dec("317"), &[], Exemption::Partial, Some(&rule), None, "launch", 1);

        match result {
            Err(EngineError::InvalidInput { field, message }) => {
                assert_eq!(field, "exemption");
                assert!(message.contains("movement"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_partial_exemption_without_rule_is_rejected() {
        let result = compose_surcharges(
            dec("317"), &[], Exemption::Partial, None, Some(Movement::Exit), "pilotage", 1,
        );
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_overtime_factor_counts_started_hours() {
        assert_eq!(overtime_factor(dec("0.5"), Decimal::ZERO), Decimal::ONE);
        assert_eq!(overtime_factor(dec("0.5"), dec("0.2")), dec("1.5"));
        assert_eq!(overtime_factor(dec("0.5"), dec("2")), dec("2"));
        assert_eq!(overtime_factor(dec("0.3"), dec("2.5")), dec("1.9"));
    }

    #[test]
    fn test_defined_factor_rejects_missing_rate() {
        assert_eq!(defined_factor(Some(dec("1.5")), "confirmed_delay").unwrap(), dec("1.5"));

        match defined_factor(None, "pilotage.confirmed_delay") {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "pilotage.confirmed_delay");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_audit_step_lists_factors() {
        let factors = vec![
            SurchargeFactor::new("confirmed_delay", dec("1.5")),
            SurchargeFactor::new("distress", dec("2")),
        ];
        let result = compose_surcharges(
            dec("100"), &factors, Exemption::None, None, None, "pilotage", 5,
        )
        .unwrap();

        assert_eq!(result.audit_step.step_number, 5);
        assert_eq!(result.audit_step.output["factors"][1]["label"], "distress");
        assert!(result.audit_step.reasoning.contains("1.5 (confirmed_delay)"));
    }

    fn factor_strategy() -> impl Strategy<Value = SurchargeFactor> {
        prop::sample::select(vec!["1.5", "2", "1.25", "0.25", "0.2", "0.5", "2.5"])
            .prop_map(|f| SurchargeFactor::new("factor", dec(f)))
    }

    proptest! {
        #[test]
        fn prop_factor_order_does_not_matter(
            base_cents in 1i64..100_000_000,
            factors in prop::collection::vec(factor_strategy(), 0..5),
            rotation in 0usize..5,
        ) {
            let base = Decimal::new(base_cents, 2);
            let mut reordered = factors.clone();
            reordered.reverse();
            if !reordered.is_empty() {
                let shift = rotation % reordered.len();
                reordered.rotate_left(shift);
            }

            let a = compose_surcharges(base, &factors, Exemption::None, None, None, "t", 1)
                .unwrap();
            let b = compose_surcharges(base, &reordered, Exemption::None, None, None, "t", 1)
                .unwrap();
            prop_assert_eq!(a.amount, b.amount);
        }

        #[test]
        fn prop_full_exemption_is_zero(
            base_cents in 0i64..100_000_000,
            factors in prop::collection::vec(factor_strategy(), 0..5),
        ) {
            let base = Decimal::new(base_cents, 2);
            let result = compose_surcharges(base, &factors, Exemption::Full, None, None, "t", 1)
                .unwrap();
            prop_assert_eq!(result.amount, Decimal::ZERO);
        }
    }
}
