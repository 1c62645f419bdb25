//! Linear rate formulas.
//!
//! Some schedules publish a rate as `slope × metric + intercept` with a
//! minimum amount instead of a bracket table.

use rust_decimal::Decimal;

use crate::config::LinearFormula;
use crate::models::AuditStep;

/// The result of evaluating a linear formula.
#[derive(Debug, Clone)]
pub struct LinearFormulaResult {
    /// `max(slope × metric + intercept, floor)`.
    pub amount: Decimal,
    /// True when the floor replaced the affine value.
    pub floor_applied: bool,
    /// The audit step recording this evaluation.
    pub audit_step: AuditStep,
}

/// Evaluates `max(slope × metric + intercept, floor)`.
///
/// Without a floor the plain affine value is returned.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::evaluate_linear_formula;
/// use port_tariff_engine::config::LinearFormula;
/// use rust_decimal::Decimal;
///
/// let formula = LinearFormula {
///     slope: Decimal::new(5798, 4),
///     intercept: Decimal::ZERO,
///     floor: Some(Decimal::from(80)),
/// };
///
/// // 100 m × 0.5798 = 57.98, below the 80 floor
/// let result = evaluate_linear_formula(&formula, Decimal::from(100), "mooring", 1);
/// assert_eq!(result.amount, Decimal::from(80));
/// assert!(result.floor_applied);
/// ```
pub fn evaluate_linear_formula(
    formula: &LinearFormula,
    metric: Decimal,
    tariff_ref: &str,
    step_number: u32,
) -> LinearFormulaResult {
    let affine = formula.slope * metric + formula.intercept;
    let (amount, floor_applied) = match formula.floor {
        Some(floor) if affine < floor => (floor, true),
        _ => (affine, false),
    };

    let reasoning = if floor_applied {
        format!(
            "{} × {} + {} = {} is below the minimum; {} applies",
            formula.slope.normalize(),
            metric.normalize(),
            formula.intercept.normalize(),
            affine.round_dp(4),
            amount.normalize()
        )
    } else {
        format!(
            "{} × {} + {} = {}",
            formula.slope.normalize(),
            metric.normalize(),
            formula.intercept.normalize(),
            amount.round_dp(4)
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "linear_formula".to_string(),
        rule_name: "Linear Rate Formula".to_string(),
        tariff_ref: tariff_ref.to_string(),
        input: serde_json::json!({
            "metric": metric.to_string(),
            "slope": formula.slope.to_string(),
            "intercept": formula.intercept.to_string(),
            "floor": formula.floor.map(|f| f.to_string())
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "floor_applied": floor_applied
        }),
        reasoning,
    };

    LinearFormulaResult {
        amount,
        floor_applied,
        audit_step,
    }
}
