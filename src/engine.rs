//! Evaluation of a port call across the selected regimes.
//!
//! [`evaluate`] derives the geometric volume once, prices every regime the
//! request selects, and compares the totals against the reference port. Any
//! error aborts the whole evaluation.

use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::calculation::{
    GeometricVolumeResult, build_breakdown, calculate_cargo_dues, calculate_geometric_volume,
    calculate_mooring, calculate_pilot_launch, calculate_pilotage, calculate_safety_watch,
    calculate_statutory_tax, calculate_towage, calculate_tug_availability, calculate_vessel_dues,
    compare_breakdowns,
};
use crate::config::{AlgecirasSchedule, MoroccanSchedule, TariffSchedules};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AlgecirasSelection, AuditStep, AuditTrace, AuditWarning, Evaluation, EvaluationRequest,
    FeeCategory, FeeLine, MoroccanSelection, Port, RegimeBreakdown, TaxCategory, VesselProfile,
};

/// Evaluates a port call against the given schedules.
///
/// # Errors
///
/// Returns the first error raised by input validation or any calculator.
///
/// # Example
///
/// ```no_run
/// use port_tariff_engine::config::ConfigLoader;
/// use port_tariff_engine::engine::evaluate;
/// use port_tariff_engine::models::EvaluationRequest;
///
/// let loader = ConfigLoader::load("./config/tariffs_2025").unwrap();
/// let request: EvaluationRequest = serde_json::from_str(r#"{
///     "vessel": {
///         "length_overall": "190.94", "beam": "32.20", "draft": "6.50",
///         "gross_tonnage": "22341", "stay_hours": "30"
///     },
///     "tanger_med": { "vessel_dues": { "basis": "terminal", "terminal": "containers" } }
/// }"#).unwrap();
///
/// let evaluation = evaluate(&request, loader.schedules()).unwrap();
/// println!("{}", evaluation.breakdowns[0].total);
/// ```
pub fn evaluate(
    request: &EvaluationRequest,
    schedules: &TariffSchedules,
) -> EngineResult<Evaluation> {
    let start_time = Instant::now();
    let regimes = [
        request.tanger_med.is_some(),
        request.nador_west_med.is_some(),
        request.algeciras.is_some(),
    ]
    .iter()
    .filter(|selected| **selected)
    .count();

    info!(
        schedule_version = %schedules.metadata().version,
        regimes = regimes,
        "Evaluating port call"
    );

    let result = run_evaluation(request, schedules);

    match &result {
        Ok(evaluation) => {
            let duration = start_time.elapsed();
            for breakdown in &evaluation.breakdowns {
                info!(
                    port = breakdown.port.key(),
                    total = %breakdown.total,
                    lines = breakdown.lines.len(),
                    warnings = breakdown.audit_trace.warnings.len(),
                    "Regime priced"
                );
            }
            info!(
                regimes = evaluation.breakdowns.len(),
                comparisons = evaluation.comparisons.len(),
                duration_us = duration.as_micros(),
                "Evaluation completed successfully"
            );
        }
        Err(err) => {
            warn!(error = %err, "Evaluation failed");
        }
    }

    result
}

fn run_evaluation(
    request: &EvaluationRequest,
    schedules: &TariffSchedules,
) -> EngineResult<Evaluation> {
    let vessel = &request.vessel;
    vessel.validate()?;
    if let Some(rate) = request.dh_per_eur {
        if rate <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                "dh_per_eur",
                format!("exchange rate must be greater than zero, got {}", rate),
            ));
        }
    }

    let volume = calculate_geometric_volume(vessel.length_overall, vessel.beam, vessel.draft, 1)?;
    debug!(
        volume = %volume.volume,
        floor_applied = volume.floor_applied,
        "Derived geometric volume"
    );

    let mut breakdowns = Vec::new();
    if let Some(selection) = &request.tanger_med {
        breakdowns.push(evaluate_moroccan(
            Port::TangerMed,
            schedules.tanger_med(),
            selection,
            vessel,
            &volume,
            request.dh_per_eur,
        )?);
    }
    if let Some(selection) = &request.nador_west_med {
        breakdowns.push(evaluate_moroccan(
            Port::NadorWestMed,
            schedules.nador_west_med(),
            selection,
            vessel,
            &volume,
            request.dh_per_eur,
        )?);
    }
    if let Some(selection) = &request.algeciras {
        breakdowns.push(evaluate_algeciras(
            schedules.algeciras(),
            selection,
            vessel,
            &volume,
        )?);
    }

    let comparisons = match request.reference_port {
        Some(reference) => {
            if !breakdowns.iter().any(|b| b.port == reference) {
                return Err(EngineError::invalid_input(
                    "reference_port",
                    format!("{} is not among the evaluated regimes", reference.key()),
                ));
            }
            compare_breakdowns(&breakdowns, reference)
        }
        None => Vec::new(),
    };

    Ok(Evaluation {
        schedule_version: schedules.metadata().version.clone(),
        geometric_volume: volume.volume,
        breakdowns,
        comparisons,
    })
}

/// Collects fee lines and audit entries for one regime.
struct RegimeLedger {
    port: Port,
    lines: Vec<FeeLine>,
    trace: AuditTrace,
    next_step: u32,
}

impl RegimeLedger {
    fn new(port: Port, volume: &GeometricVolumeResult) -> Self {
        Self {
            port,
            lines: Vec::new(),
            trace: AuditTrace {
                steps: vec![volume.audit_step.clone()],
                warnings: Vec::new(),
            },
            next_step: volume.audit_step.step_number + 1,
        }
    }

    fn record(&mut self, steps: Vec<AuditStep>, warnings: Vec<AuditWarning>) {
        self.next_step += steps.len() as u32;
        self.trace.steps.extend(steps);
        self.trace.warnings.extend(warnings);
    }

    fn line(&mut self, category: FeeCategory, label: String, amount: Decimal) {
        self.lines.push(FeeLine {
            category,
            port: self.port,
            label,
            amount,
        });
    }

    fn finish(self) -> RegimeBreakdown {
        let breakdown = build_breakdown(self.port, self.lines, self.trace);
        debug!(
            port = breakdown.port.key(),
            total = %breakdown.total,
            steps = breakdown.audit_trace.steps.len(),
            "Regime breakdown built"
        );
        breakdown
    }
}

fn evaluate_moroccan(
    port: Port,
    schedule: &MoroccanSchedule,
    selection: &MoroccanSelection,
    vessel: &VesselProfile,
    volume: &GeometricVolumeResult,
    dh_per_eur: Option<Decimal>,
) -> EngineResult<RegimeBreakdown> {
    let mut ledger = RegimeLedger::new(port, volume);
    let geometric_volume = volume.volume;

    let dues = calculate_vessel_dues(
        port,
        &schedule.vessel_dues,
        &selection.vessel_dues,
        geometric_volume,
        vessel.stay_hours,
        ledger.next_step,
    )?;
    ledger.lines.extend(dues.lines);
    ledger.record(dues.audit_steps, Vec::new());

    if let Some(options) = &selection.pilotage {
        for &movement in &selection.movements {
            let result = calculate_pilotage(
                port,
                &schedule.pilotage,
                movement,
                geometric_volume,
                vessel,
                options,
                ledger.next_step,
            )?;
            ledger.line(
                FeeCategory::Pilotage,
                format!("Pilotage ({})", movement.key()),
                result.amount,
            );
            ledger.record(result.audit_steps, result.warnings);
        }

        if let Some(launch) = &options.launch {
            let result = calculate_pilot_launch(
                schedule.pilotage.launch.as_ref(),
                launch,
                ledger.next_step,
            )?;
            ledger.line(FeeCategory::PilotLaunch, "Pilot launch".to_string(), result.amount);
            ledger.record(vec![result.audit_step], Vec::new());
        }
    }

    if let Some(options) = &selection.towage {
        let result = calculate_towage(&schedule.towage, vessel, options, ledger.next_step)?;
        ledger.line(
            FeeCategory::Towage,
            format!(
                "Towage ({} tug(s) × {} movement(s))",
                vessel.tug_count, vessel.movement_count
            ),
            result.amount,
        );
        ledger.record(result.audit_steps, result.warnings);

        if !options.safety_watch_hours.is_zero() {
            let result = calculate_safety_watch(
                &schedule.towage,
                options.safety_watch_hours,
                vessel.tug_count,
                ledger.next_step,
            )?;
            ledger.line(FeeCategory::SafetyWatch, "Tanker safety watch".to_string(), result.amount);
            ledger.record(vec![result.audit_step], Vec::new());
        }

        if !options.availability_hours.is_zero() {
            let result = calculate_tug_availability(
                &schedule.towage,
                options.availability_hours,
                vessel.tug_count,
                ledger.next_step,
            )?;
            ledger.line(
                FeeCategory::TugAvailability,
                format!("Tug standby ({} h)", result.billed_hours),
                result.amount,
            );
            ledger.record(vec![result.audit_step], Vec::new());
        }
    }

    if let Some(options) = &selection.mooring {
        for &movement in &selection.movements {
            let result = calculate_mooring(
                port,
                &schedule.mooring,
                movement,
                geometric_volume,
                vessel,
                options,
                ledger.next_step,
            )?;
            ledger.line(
                FeeCategory::Mooring,
                format!("Mooring ({})", movement.key()),
                result.amount,
            );
            ledger.record(result.audit_steps, Vec::new());
        }
    }

    for item in &selection.cargo {
        let result = calculate_cargo_dues(
            port,
            &schedule.cargo,
            item,
            &vessel.cargo,
            dh_per_eur,
            ledger.next_step,
        )?;
        ledger.lines.push(result.line);
        ledger.record(vec![result.audit_step], Vec::new());
    }

    Ok(ledger.finish())
}

fn evaluate_algeciras(
    schedule: &AlgecirasSchedule,
    selection: &AlgecirasSelection,
    vessel: &VesselProfile,
    volume: &GeometricVolumeResult,
) -> EngineResult<RegimeBreakdown> {
    let mut ledger = RegimeLedger::new(Port::Algeciras, volume);

    for &category in &selection.categories {
        let result =
            calculate_statutory_tax(schedule, category, selection, vessel, ledger.next_step)?;
        let (fee_category, label) = match category {
            TaxCategory::T0 => (FeeCategory::T0NavigationAid, "T0 navigation aid tax"),
            TaxCategory::T1 => (FeeCategory::T1Vessel, "T1 vessel tax"),
            TaxCategory::T2 => (FeeCategory::T2Passenger, "T2 passenger tax"),
            TaxCategory::T3 => (FeeCategory::T3Cargo, "T3 cargo tax"),
            TaxCategory::T6 => (FeeCategory::T6Storage, "T6 storage tax"),
        };
        ledger.line(fee_category, label.to_string(), result.amount);
        ledger.record(vec![result.audit_step], Vec::new());
    }

    Ok(ledger.finish())
}
