//! Calculation logic for the Port Tariff Engine.
//!
//! This module contains the pure tariff calculators: geometric volume, tier
//! and linear rate resolution, stationnement, surcharge composition, the
//! per-movement fee calculators (pilotage, towage, mooring), vessel and cargo
//! dues, the Algeciras statutory taxes, currency normalization and the
//! aggregation of fee lines into regime totals and comparisons.

mod aggregate;
mod cargo_dues;
mod currency;
mod geometric_volume;
mod linear_formula;
mod mooring;
mod pilotage;
mod statutory_tax;
mod stay;
mod surcharge;
mod tier_resolver;
mod towage;
mod vessel_dues;

pub use aggregate::{build_breakdown, compare_breakdowns, compare_totals, total_of};
pub use cargo_dues::{CargoDuesResult, calculate_cargo_dues};
pub use currency::normalize_dirham;
pub use geometric_volume::{
    DRAFT_FLOOR_COEFFICIENT, GeometricVolumeResult, calculate_geometric_volume,
};
pub use linear_formula::{LinearFormulaResult, evaluate_linear_formula};
pub use mooring::{MooringResult, calculate_mooring};
pub use pilotage::{
    MovementRate, PilotLaunchResult, PilotageResult, calculate_pilot_launch, calculate_pilotage,
    resolve_movement_rate,
};
pub use statutory_tax::{
    AppliedCoefficients, StatutoryTaxResult, calculate_statutory_tax, storage_weight,
};
pub use stay::{StationnementResult, StayCharge, calculate_stationnement};
pub use surcharge::{
    SurchargeFactor, SurchargeResult, compose_surcharges, defined_factor, overtime_factor,
};
pub use tier_resolver::{TierRateResult, TierResolution, resolve_tier_rate};
pub use towage::{
    SafetyWatchResult, TowageResult, TugAvailabilityResult, calculate_safety_watch,
    calculate_towage, calculate_tug_availability,
};
pub use vessel_dues::{VesselDuesResult, calculate_vessel_dues, roro_package_amount};
