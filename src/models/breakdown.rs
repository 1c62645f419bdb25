//! Fee breakdown models for the Port Tariff Engine.
//!
//! This module contains the [`Evaluation`] type and its associated structures
//! that capture all outputs of a tariff evaluation: fee lines, per-regime
//! totals, comparisons and audit traces.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A port (tariff regime).
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::Port;
///
/// assert_eq!(Port::TangerMed.key(), "tanger_med");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Port {
    /// Tanger Med Port Authority.
    TangerMed,
    /// Nador West Med.
    NadorWestMed,
    /// Autoridad Portuaria de la Bahía de Algeciras.
    Algeciras,
}

impl Port {
    /// Returns the snake_case key used in schedules, errors and logs.
    pub fn key(self) -> &'static str {
        match self {
            Port::TangerMed => "tanger_med",
            Port::NadorWestMed => "nador_west_med",
            Port::Algeciras => "algeciras",
        }
    }
}

/// The category of a fee line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeCategory {
    /// Nautical dues on the geometric volume.
    NauticalDues,
    /// Port dues on the geometric volume.
    PortDues,
    /// Idle-time (stationnement) dues.
    Stationnement,
    /// Ro-ro / ferry hourly call package.
    RoroPackage,
    /// Pilotage for one movement.
    Pilotage,
    /// Pilot launch hire.
    PilotLaunch,
    /// Towage.
    Towage,
    /// Tanker safety watch by tugs.
    SafetyWatch,
    /// Tugs held on standby, billed by the hour.
    TugAvailability,
    /// Mooring or unmooring.
    Mooring,
    /// Container dues.
    ContainerDues,
    /// General or bulk cargo dues.
    GeneralCargoDues,
    /// Hydrocarbon dues.
    HydrocarbonDues,
    /// Ro-ro freight dues.
    RoroFreightDues,
    /// Container storage in the terminal yard.
    ContainerStorage,
    /// Passenger dues.
    PassengerDues,
    /// Accompanied passenger vehicle dues.
    PassengerVehicleDues,
    /// Algeciras navigation aid tax.
    T0NavigationAid,
    /// Algeciras vessel tax.
    T1Vessel,
    /// Algeciras passenger tax.
    T2Passenger,
    /// Algeciras cargo tax.
    T3Cargo,
    /// Algeciras transit-zone storage tax.
    T6Storage,
}

/// A single line item in a regime breakdown.
///
/// # Example
///
/// ```
/// use port_tariff_engine::models::{FeeCategory, FeeLine, Port};
/// use rust_decimal::Decimal;
///
/// let line = FeeLine {
///     category: FeeCategory::Pilotage,
///     port: Port::NadorWestMed,
///     label: "Pilotage entry".to_string(),
///     amount: Decimal::new(52815, 2),
/// };
/// assert_eq!(line.port, Port::NadorWestMed);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeLine {
    /// The category of the fee.
    pub category: FeeCategory,
    /// The port that levies it.
    pub port: Port,
    /// Human-readable label.
    pub label: String,
    /// Amount in euros, unrounded.
    pub amount: Decimal,
}

/// A single step in the audit trace recording a tariff decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the tariff book section for this rule.
    pub tariff_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during evaluation.
///
/// Warnings flag results that are computed but may deserve a second look,
/// such as a metric resolved through the below-first-bracket fallback.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The audit trace for one regime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The fee breakdown of one regime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeBreakdown {
    /// The regime.
    pub port: Port,
    /// Fee lines in computation order.
    pub lines: Vec<FeeLine>,
    /// Sum of all line amounts.
    pub total: Decimal,
    /// Audit trace of the regime's decisions.
    pub audit_trace: AuditTrace,
}

/// Relative difference between two regime totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegimeDelta {
    /// The reference regime.
    pub reference: Port,
    /// The compared regime.
    pub other: Port,
    /// `other − reference` in euros.
    pub difference: Decimal,
    /// `(other − reference) / reference × 100`; `None` when the reference total is zero.
    pub delta_percent: Option<Decimal>,
}

impl RegimeDelta {
    /// Formats the percentage for display, "n/a" when not applicable.
    ///
    /// # Example
    ///
    /// ```
    /// use port_tariff_engine::models::{Port, RegimeDelta};
    /// use rust_decimal::Decimal;
    ///
    /// let delta = RegimeDelta {
    ///     reference: Port::TangerMed,
    ///     other: Port::NadorWestMed,
    ///     difference: Decimal::ZERO,
    ///     delta_percent: None,
    /// };
    /// assert_eq!(delta.display_percent(), "n/a");
    /// ```
    pub fn display_percent(&self) -> String {
        match self.delta_percent {
            Some(pct) if pct > Decimal::ZERO => format!("+{}%", pct.round_dp(1)),
            Some(pct) => format!("{}%", pct.round_dp(1)),
            None => "n/a".to_string(),
        }
    }
}

/// The complete result of one evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Version of the tariff schedules used.
    pub schedule_version: String,
    /// Geometric volume derived for the vessel (m³).
    pub geometric_volume: Decimal,
    /// One breakdown per selected regime.
    pub breakdowns: Vec<RegimeBreakdown>,
    /// Deltas of every other regime against the reference regime.
    pub comparisons: Vec<RegimeDelta>,
}

impl Evaluation {
    /// Returns the breakdown of a regime, if it was evaluated.
    pub fn breakdown(&self, port: Port) -> Option<&RegimeBreakdown> {
        self.breakdowns.iter().find(|b| b.port == port)
    }
}
