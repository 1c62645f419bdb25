//! Vessel dues.
//!
//! A Moroccan call pays vessel dues either on its geometric volume at a
//! terminal's rates (nautical dues, port dues, stationnement), or as a ro-ro
//! call package: nautical dues plus a flat amount covering a set duration.

use rust_decimal::Decimal;

use crate::config::{RoroPackage, VesselDuesSchedule};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, FeeCategory, FeeLine, Port, VesselDuesSelection, check_quantity,
};

use super::stay::calculate_stationnement;

const HALF_HOURS_PER_HOUR: Decimal = Decimal::TWO;

/// The result of a vessel dues calculation.
#[derive(Debug, Clone)]
pub struct VesselDuesResult {
    /// Fee lines in order.
    pub lines: Vec<FeeLine>,
    /// One audit step per line.
    pub audit_steps: Vec<AuditStep>,
}

/// Prices the vessel dues of a call.
///
/// # Errors
///
/// * `UnknownSchedule` when the terminal or package key is not published
/// * `InvalidInput` from the stay rules, or for a negative call duration
pub fn calculate_vessel_dues(
    port: Port,
    schedule: &VesselDuesSchedule,
    selection: &VesselDuesSelection,
    geometric_volume: Decimal,
    stay_hours: Decimal,
    step_number: u32,
) -> EngineResult<VesselDuesResult> {
    match selection {
        VesselDuesSelection::Terminal {
            terminal,
            anchorage,
        } => {
            let rates = schedule.terminals.get(terminal).ok_or_else(|| {
                EngineError::unknown_schedule(port.key(), format!("terminals.{}", terminal))
            })?;

            let nautical = geometric_volume * rates.nautical;
            let port_dues = geometric_volume * rates.port;
            let stay = calculate_stationnement(
                geometric_volume,
                rates.stationnement,
                stay_hours,
                &schedule.stay,
                anchorage.as_ref(),
                step_number + 2,
            )?;

            let lines = vec![
                fee_line(
                    port,
                    FeeCategory::NauticalDues,
                    format!("Nautical dues ({})", terminal),
                    nautical,
                ),
                fee_line(
                    port,
                    FeeCategory::PortDues,
                    format!("Port dues ({})", terminal),
                    port_dues,
                ),
                fee_line(
                    port,
                    FeeCategory::Stationnement,
                    "Stationnement".to_string(),
                    stay.amount,
                ),
            ];
            let audit_steps = vec![
                volume_rate_step(
                    step_number,
                    "nautical_dues",
                    "Nautical Dues",
                    geometric_volume,
                    rates.nautical,
                    nautical,
                ),
                volume_rate_step(
                    step_number + 1,
                    "port_dues",
                    "Port Dues",
                    geometric_volume,
                    rates.port,
                    port_dues,
                ),
                stay.audit_step,
            ];

            Ok(VesselDuesResult { lines, audit_steps })
        }
        VesselDuesSelection::RoroPackage {
            package,
            call_hours,
        } => {
            let rates = schedule.roro_packages.get(package).ok_or_else(|| {
                EngineError::unknown_schedule(port.key(), format!("roro_packages.{}", package))
            })?;
            check_quantity("vessel_dues.call_hours", *call_hours)?;

            let nautical = geometric_volume * schedule.roro_nautical;
            let (package_amount, extra_half_hours) = roro_package_amount(rates, *call_hours);

            let lines = vec![
                fee_line(
                    port,
                    FeeCategory::NauticalDues,
                    "Nautical dues (ro-ro)".to_string(),
                    nautical,
                ),
                fee_line(
                    port,
                    FeeCategory::RoroPackage,
                    format!("Ro-ro package ({})", package),
                    package_amount,
                ),
            ];
            let package_step = AuditStep {
                step_number: step_number + 1,
                rule_id: "roro_package".to_string(),
                rule_name: "Ro-ro Call Package".to_string(),
                tariff_ref: format!("{}.roro_packages.{}", port.key(), package),
                input: serde_json::json!({
                    "call_hours": call_hours.to_string(),
                    "included_hours": rates.included_hours.to_string()
                }),
                output: serde_json::json!({
                    "amount": package_amount.to_string(),
                    "extra_half_hours": extra_half_hours.to_string()
                }),
                reasoning: format!(
                    "{} flat + {} started half hour(s) × {} = {}",
                    rates.flat.normalize(),
                    extra_half_hours,
                    rates.half_hour_rate.normalize(),
                    package_amount.normalize()
                ),
            };
            let audit_steps = vec![
                volume_rate_step(
                    step_number,
                    "nautical_dues",
                    "Nautical Dues",
                    geometric_volume,
                    schedule.roro_nautical,
                    nautical,
                ),
                package_step,
            ];

            Ok(VesselDuesResult { lines, audit_steps })
        }
    }
}

/// Returns the package amount and the number of started half hours beyond the included duration.
pub fn roro_package_amount(package: &RoroPackage, call_hours: Decimal) -> (Decimal, Decimal) {
    let overrun = (call_hours - package.included_hours).max(Decimal::ZERO);
    let half_hours = (overrun * HALF_HOURS_PER_HOUR).ceil();
    (package.flat + half_hours * package.half_hour_rate, half_hours)
}

fn fee_line(port: Port, category: FeeCategory, label: String, amount: Decimal) -> FeeLine {
    FeeLine {
        category,
        port,
        label,
        amount,
    }
}

fn volume_rate_step(
    step_number: u32,
    rule_id: &str,
    rule_name: &str,
    volume: Decimal,
    rate: Decimal,
    amount: Decimal,
) -> AuditStep {
    AuditStep {
        step_number,
        rule_id: rule_id.to_string(),
        rule_name: rule_name.to_string(),
        tariff_ref: rule_name.to_string(),
        input: serde_json::json!({
            "volume": volume.to_string(),
            "rate": rate.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} m³ × {} = {}",
            volume.round_dp(2),
            rate.normalize(),
            amount.round_dp(4)
        ),
    }
}
