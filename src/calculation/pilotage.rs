//! Pilotage fees.
//!
//! Each movement is priced from the regime's tariff for that movement (a
//! tier table on geometric volume at Tanger Med, a linear formula on gross
//! tonnage at Nador West Med), then surcharged. Pilot launch hire is priced
//! separately.

use rust_decimal::Decimal;

use crate::config::{MovementTariff, PilotLaunchRates, PilotageSchedule};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, Movement, PilotLaunch, PilotageOptions, Port, VesselProfile,
    check_quantity,
};

use super::linear_formula::evaluate_linear_formula;
use super::surcharge::{SurchargeFactor, compose_surcharges, defined_factor, overtime_factor};
use super::tier_resolver::resolve_tier_rate;

/// A base rate resolved from a [`MovementTariff`].
#[derive(Debug, Clone)]
pub struct MovementRate {
    /// The base rate.
    pub rate: Decimal,
    /// Warning raised by the tier lookup, if any.
    pub warning: Option<AuditWarning>,
    /// The audit step recording the lookup.
    pub audit_step: AuditStep,
}

/// Resolves a movement tariff against a metric.
///
/// # Errors
///
/// Propagates `UnresolvedBracket` from the tier lookup.
pub fn resolve_movement_rate(
    tariff: &MovementTariff,
    metric: Decimal,
    tariff_ref: &str,
    step_number: u32,
) -> EngineResult<MovementRate> {
    match tariff {
        MovementTariff::Tiered { table } => {
            let result = resolve_tier_rate(metric, table, step_number)?;
            Ok(MovementRate {
                rate: result.rate,
                warning: result.warning,
                audit_step: result.audit_step,
            })
        }
        MovementTariff::Linear { formula } => {
            let result = evaluate_linear_formula(formula, metric, tariff_ref, step_number);
            Ok(MovementRate {
                rate: result.amount,
                warning: None,
                audit_step: result.audit_step,
            })
        }
    }
}

/// The result of pricing pilotage for one movement.
#[derive(Debug, Clone)]
pub struct PilotageResult {
    /// The movement priced.
    pub movement: Movement,
    /// The metric the tariff was applied to.
    pub metric: Decimal,
    /// The base rate before surcharges.
    pub base_rate: Decimal,
    /// The amount due.
    pub amount: Decimal,
    /// Audit steps: rate lookup, then surcharges.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while pricing.
    pub warnings: Vec<AuditWarning>,
}

/// Prices pilotage for one movement.
///
/// # Arguments
///
/// * `port` - The regime, used in error keys
/// * `schedule` - The regime's pilotage schedule
/// * `movement` - The movement to price
/// * `geometric_volume` - The vessel's geometric volume
/// * `vessel` - The vessel profile
/// * `options` - Surcharge flags and exemption
/// * `step_number` - The first step number for the audit trail
///
/// # Errors
///
/// * `UnknownSchedule` when the regime has no tariff for the movement
/// * `InvalidInput` when a selected surcharge is not defined by the regime, or
///   the overtime hours are negative
pub fn calculate_pilotage(
    port: Port,
    schedule: &PilotageSchedule,
    movement: Movement,
    geometric_volume: Decimal,
    vessel: &VesselProfile,
    options: &PilotageOptions,
    step_number: u32,
) -> EngineResult<PilotageResult> {
    let tariff = schedule.movements.get(&movement).ok_or_else(|| {
        EngineError::unknown_schedule(port.key(), format!("pilotage.{}", movement.key()))
    })?;

    let tariff_ref = format!("{}.pilotage.{}", port.key(), movement.key());
    let metric = schedule.basis.metric(geometric_volume, vessel);
    let base = resolve_movement_rate(tariff, metric, &tariff_ref, step_number)?;

    let flags = &options.surcharges;
    let rates = &schedule.surcharges;
    let mut factors = Vec::new();

    if flags.confirmed_delay {
        let factor = defined_factor(rates.confirmed_delay, "pilotage.confirmed_delay")?;
        factors.push(SurchargeFactor::new("confirmed_delay", factor));
    }
    if flags.post_boarding_delay {
        let factor = defined_factor(rates.post_boarding_delay, "pilotage.post_boarding_delay")?;
        factors.push(SurchargeFactor::new("post_boarding_delay", factor));
    }
    if flags.distress {
        let factor = defined_factor(rates.distress, "pilotage.distress")?;
        factors.push(SurchargeFactor::new("distress", factor));
    }
    check_quantity("pilotage.overtime_hours", flags.overtime_hours)?;
    if flags.overtime_hours > Decimal::ZERO {
        let step = defined_factor(rates.overtime_step, "pilotage.overtime_hours")?;
        factors.push(SurchargeFactor::new(
            "overtime",
            overtime_factor(step, flags.overtime_hours),
        ));
    }

    let surcharged = compose_surcharges(
        base.rate,
        &factors,
        options.exemption,
        rates.partial_exemption.as_ref(),
        Some(movement),
        &tariff_ref,
        step_number + 1,
    )?;

    Ok(PilotageResult {
        movement,
        metric,
        base_rate: base.rate,
        amount: surcharged.amount,
        audit_steps: vec![base.audit_step, surcharged.audit_step],
        warnings: base.warning.into_iter().collect(),
    })
}

/// The result of pricing a pilot launch hire.
#[derive(Debug, Clone)]
pub struct PilotLaunchResult {
    /// The amount due.
    pub amount: Decimal,
    /// True when the anchorage minimum replaced the hourly amount.
    pub minimum_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices a pilot launch hire.
///
/// Inside the port the launch is charged per hour; at the anchorage per hour
/// with a minimum charge.
///
/// # Errors
///
/// Returns `InvalidInput` when the regime publishes no launch rates or the
/// hours are negative.
pub fn calculate_pilot_launch(
    rates: Option<&PilotLaunchRates>,
    launch: &PilotLaunch,
    step_number: u32,
) -> EngineResult<PilotLaunchResult> {
    let rates = rates.ok_or_else(|| {
        EngineError::invalid_input("pilotage.launch", "this regime publishes no launch rates")
    })?;
    check_quantity("pilotage.launch.hours", launch.hours)?;

    let hourly = if launch.at_anchorage {
        rates.anchorage_hourly
    } else {
        rates.interior_hourly
    };
    let hourly_amount = hourly * launch.hours;
    let minimum_applied = launch.at_anchorage && hourly_amount < rates.anchorage_minimum;
    let amount = if minimum_applied {
        rates.anchorage_minimum
    } else {
        hourly_amount
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "pilot_launch".to_string(),
        rule_name: "Pilot Launch".to_string(),
        tariff_ref: "Pilot launch hire".to_string(),
        input: serde_json::json!({
            "hours": launch.hours.to_string(),
            "at_anchorage": launch.at_anchorage
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "minimum_applied": minimum_applied
        }),
        reasoning: if minimum_applied {
            format!(
                "{} h × {} = {} is below the anchorage minimum of {}",
                launch.hours.normalize(),
                hourly.normalize(),
                hourly_amount.normalize(),
                rates.anchorage_minimum.normalize()
            )
        } else {
            format!(
                "{} h × {} = {}",
                launch.hours.normalize(),
                hourly.normalize(),
                amount.normalize()
            )
        },
    };

    Ok(PilotLaunchResult {
        amount,
        minimum_applied,
        audit_step,
    })
}
