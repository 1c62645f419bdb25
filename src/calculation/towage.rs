//! Towage, tanker safety watch and tug standby.
//!
//! The tier table gives the rate for one tug and one movement. Surcharges
//! apply to that unit rate; the tug and movement counts multiply last.
//!
//! Standby is billed per started hour. The band holding the total duration
//! sets the hourly rate for every hour.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tracing::debug;

use crate::config::TowageSchedule;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, AuditWarning, Exemption, TowageOptions, VesselProfile, check_quantity,
};

use super::surcharge::{SurchargeFactor, compose_surcharges, defined_factor};
use super::tier_resolver::resolve_tier_rate;

/// The result of a towage calculation.
#[derive(Debug, Clone)]
pub struct TowageResult {
    /// Rate per tug per movement from the table.
    pub per_tug_rate: Decimal,
    /// Per tug per movement amount after surcharges.
    pub unit_amount: Decimal,
    /// `unit_amount × tug_count × movement_count`.
    pub amount: Decimal,
    /// Audit steps: rate lookup, surcharges, cardinality.
    pub audit_steps: Vec<AuditStep>,
    /// Warnings raised while pricing.
    pub warnings: Vec<AuditWarning>,
}

/// Prices towage for the whole call.
///
/// # Errors
///
/// * `InvalidInput` when a selected surcharge is not defined by the regime
/// * `UnresolvedBracket` from the tier lookup
pub fn calculate_towage(
    schedule: &TowageSchedule,
    vessel: &VesselProfile,
    options: &TowageOptions,
    step_number: u32,
) -> EngineResult<TowageResult> {
    let lookup = resolve_tier_rate(vessel.gross_tonnage, &schedule.table, step_number)?;

    let mut factors = Vec::new();
    if options.no_propulsion {
        let factor = defined_factor(schedule.no_propulsion, "towage.no_propulsion")?;
        factors.push(SurchargeFactor::new("no_propulsion", factor));
    }
    if options.shifting {
        let factor = defined_factor(schedule.shifting, "towage.shifting")?;
        factors.push(SurchargeFactor::new("shifting", factor));
    }
    if options.waiting_or_cancelled {
        let factor = defined_factor(schedule.waiting_or_cancelled, "towage.waiting_or_cancelled")?;
        factors.push(SurchargeFactor::new("waiting_or_cancelled", factor));
    }

    let exemption = if options.exempt {
        Exemption::Full
    } else {
        Exemption::None
    };
    let surcharged = compose_surcharges(
        lookup.rate,
        &factors,
        exemption,
        None,
        None,
        &schedule.table.name,
        step_number + 1,
    )?;

    let tugs = Decimal::from(vessel.tug_count);
    let movements = Decimal::from(vessel.movement_count);
    let amount = surcharged.amount * tugs * movements;

    let cardinality_step = AuditStep {
        step_number: step_number + 2,
        rule_id: "towage_cardinality".to_string(),
        rule_name: "Towage Tugs and Movements".to_string(),
        tariff_ref: schedule.table.name.clone(),
        input: serde_json::json!({
            "unit_amount": surcharged.amount.to_string(),
            "tug_count": vessel.tug_count,
            "movement_count": vessel.movement_count
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} × {} tug(s) × {} movement(s) = {}",
            surcharged.amount.round_dp(4),
            vessel.tug_count,
            vessel.movement_count,
            amount.round_dp(4)
        ),
    };

    Ok(TowageResult {
        per_tug_rate: lookup.rate,
        unit_amount: surcharged.amount,
        amount,
        audit_steps: vec![lookup.audit_step, surcharged.audit_step, cardinality_step],
        warnings: lookup.warning.into_iter().collect(),
    })
}

/// The result of a safety watch calculation.
#[derive(Debug, Clone)]
pub struct SafetyWatchResult {
    /// `hourly × hours × tug_count`.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices a tanker safety watch by the call's tugs.
///
/// # Errors
///
/// Returns `InvalidInput` when the regime has no safety watch rate or the
/// hours are negative.
pub fn calculate_safety_watch(
    schedule: &TowageSchedule,
    hours: Decimal,
    tug_count: u32,
    step_number: u32,
) -> EngineResult<SafetyWatchResult> {
    check_quantity("towage.safety_watch_hours", hours)?;
    let hourly = defined_factor(schedule.safety_watch_hourly, "towage.safety_watch_hours")?;
    let amount = hourly * hours * Decimal::from(tug_count);

    let audit_step = AuditStep {
        step_number,
        rule_id: "safety_watch".to_string(),
        rule_name: "Tanker Safety Watch".to_string(),
        tariff_ref: schedule.table.name.clone(),
        input: serde_json::json!({
            "hours": hours.to_string(),
            "tug_count": tug_count
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} h × {} × {} tug(s) = {}",
            hours.normalize(),
            hourly.normalize(),
            tug_count,
            amount.normalize()
        ),
    };

    Ok(SafetyWatchResult { amount, audit_step })
}

/// The result of a tug standby calculation.
#[derive(Debug, Clone)]
pub struct TugAvailabilityResult {
    /// Started hours billed.
    pub billed_hours: u32,
    /// Hourly rate of the band the duration falls in.
    pub hourly: Decimal,
    /// `hourly × billed_hours × tug_count`.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices tugs held on standby for the call.
///
/// # Errors
///
/// Returns `InvalidInput` when the regime publishes no standby rate or the
/// hours are out of range.
pub fn calculate_tug_availability(
    schedule: &TowageSchedule,
    hours: Decimal,
    tug_count: u32,
    step_number: u32,
) -> EngineResult<TugAvailabilityResult> {
    check_quantity("towage.availability_hours", hours)?;
    if schedule.availability.is_empty() {
        return Err(EngineError::invalid_input(
            "towage.availability_hours",
            "this regime publishes no tug standby rate",
        ));
    }

    let billed_hours = hours.ceil().to_u32().unwrap_or(u32::MAX);
    let band_hour = billed_hours.max(1);
    let band = schedule
        .availability
        .iter()
        .find(|band| {
            band.from_hour <= band_hour && band.to_hour.is_none_or(|to| band_hour <= to)
        })
        .ok_or_else(|| {
            EngineError::invalid_input(
                "towage.availability_hours",
                format!("no standby band covers {} h", billed_hours),
            )
        })?;
    let amount = band.hourly * Decimal::from(billed_hours) * Decimal::from(tug_count);

    debug!(
        table = %schedule.table.name,
        billed_hours,
        hourly = %band.hourly,
        "Tug standby band resolved"
    );

    let band_label = match band.to_hour {
        Some(to) => format!("{}-{} h", band.from_hour, to),
        None => format!("{}+ h", band.from_hour),
    };
    let audit_step = AuditStep {
        step_number,
        rule_id: "tug_availability".to_string(),
        rule_name: "Tug Standby".to_string(),
        tariff_ref: format!("{}.availability", schedule.table.name),
        input: serde_json::json!({
            "hours": hours.to_string(),
            "tug_count": tug_count
        }),
        output: serde_json::json!({
            "billed_hours": billed_hours,
            "hourly": band.hourly.to_string(),
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} started h in band {} × {} × {} tug(s) = {}",
            billed_hours,
            band_label,
            band.hourly.normalize(),
            tug_count,
            amount.normalize()
        ),
    };

    Ok(TugAvailabilityResult {
        billed_hours,
        hourly: band.hourly,
        amount,
        audit_step,
    })
}
