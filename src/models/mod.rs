//! Core data models for the Port Tariff Engine.
//!
//! This module contains the request-side profile and selections and the
//! result-side fee breakdown types.

mod breakdown;
mod selection;
mod vessel;

pub use breakdown::{
    AuditStep, AuditTrace, AuditWarning, Evaluation, FeeCategory, FeeLine, Port, RegimeBreakdown,
    RegimeDelta,
};
pub use selection::{
    AlgecirasSelection, AnchorageStay, BonusClass, CargoItem, ConcessionType, EvaluationRequest,
    Exemption, FreightDirection, FrequencyBand, MooringOptions, MoroccanSelection, Movement,
    PilotLaunch, PilotageOptions, PilotageSurcharges, SpecialReduction, TaxCategory,
    TowageOptions, VesselDuesSelection,
};
pub use vessel::{CargoProfile, MAX_DIMENSION_M, MAX_QUANTITY, VesselProfile, check_quantity};
