//! Configuration loading and management for the Port Tariff Engine.
//!
//! This module loads the per-regime rate schedules from YAML files into
//! immutable structures that every calculator borrows, and provides a
//! [`ScheduleStore`] for swapping a whole vintage atomically.
//!
//! # Example
//!
//! ```no_run
//! use port_tariff_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/tariffs_2025").unwrap();
//! println!("Loaded schedules: {}", config.metadata().name);
//! ```

mod loader;
mod store;
mod types;

pub use loader::ConfigLoader;
pub use store::ScheduleStore;
pub use types::{
    AlgecirasSchedule, Bracket, CargoDuesSchedule, CoefficientSet, ContainerStorageRates,
    ContainerStorageSchedule, Currency, HourBand, LinearFormula, MooringCategory,
    MooringSchedule, MoroccanSchedule, MovementTariff, PartialExemptionRule, PilotLaunchRates,
    PilotageSchedule, PilotageSurchargeRates, RoroFreightSchedule, RoroPackage,
    ScheduleMetadata, SizeBasis, StayRules, StorageBand, StorageRules, Supplement,
    TariffSchedules, TerminalDues, TierRange, TierTable, TowageSchedule, VesselDuesSchedule,
};
