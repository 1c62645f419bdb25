//! Mooring and unmooring.
//!
//! One mooring line is charged per movement. The category's linear formula
//! gives the base rate; an operation longer than the category's included
//! duration is surcharged per started extra hour.

use rust_decimal::Decimal;

use crate::config::MooringSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, Exemption, MooringOptions, Movement, Port, VesselProfile, check_quantity,
};

use super::linear_formula::evaluate_linear_formula;
use super::surcharge::{SurchargeFactor, compose_surcharges, defined_factor, overtime_factor};

/// The result of pricing mooring for one movement.
#[derive(Debug, Clone)]
pub struct MooringResult {
    /// The movement priced.
    pub movement: Movement,
    /// Base rate from the category formula.
    pub base_rate: Decimal,
    /// The amount due.
    pub amount: Decimal,
    /// Audit steps: formula, then surcharges.
    pub audit_steps: Vec<AuditStep>,
}

/// Prices mooring for one movement.
///
/// # Errors
///
/// * `UnknownSchedule` when the category is not published by the regime
/// * `InvalidInput` for a negative duration, or an overrun on a regime
///   without an overtime rule
pub fn calculate_mooring(
    port: Port,
    schedule: &MooringSchedule,
    movement: Movement,
    geometric_volume: Decimal,
    vessel: &VesselProfile,
    options: &MooringOptions,
    step_number: u32,
) -> EngineResult<MooringResult> {
    let category = schedule.categories.get(&options.category).ok_or_else(|| {
        EngineError::unknown_schedule(port.key(), format!("mooring.{}", options.category))
    })?;
    check_quantity("mooring.duration_hours", options.duration_hours)?;

    let tariff_ref = format!("{}.mooring.{}", port.key(), options.category);
    let metric = schedule.basis.metric(geometric_volume, vessel);
    let base = evaluate_linear_formula(&category.formula, metric, &tariff_ref, step_number);

    let mut factors = Vec::new();
    if let Some(included) = category.included_hours {
        let overrun = options.duration_hours - included;
        if overrun > Decimal::ZERO {
            let step = defined_factor(schedule.overtime_step, "mooring.duration_hours")?;
            factors.push(SurchargeFactor::new("overtime", overtime_factor(step, overrun)));
        }
    }

    let surcharged = compose_surcharges(
        base.amount,
        &factors,
        Exemption::None,
        None,
        Some(movement),
        &tariff_ref,
        step_number + 1,
    )?;

    Ok(MooringResult {
        movement,
        base_rate: base.amount,
        amount: surcharged.amount,
        audit_steps: vec![base.audit_step, surcharged.audit_step],
    })
}
