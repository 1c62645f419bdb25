//! Per-regime selections made by the caller.
//!
//! A selection names the schedule keys and surcharge flags a regime should
//! price. Nothing here carries a default movement set or an implicit
//! surcharge: what the caller does not select is not charged.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::VesselProfile;
use super::breakdown::Port;

/// A vessel movement inside the port.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Movement {
    /// Arrival from the limit of the port to the berth.
    Entry,
    /// Departure from the berth to the limit of the port.
    Exit,
    /// Shift from one quay to another.
    QuayChange,
    /// Shift from one basin or berth area to another.
    BerthChange,
    /// Short shifting along the same quay (déhalage).
    InteriorMove,
}

impl Movement {
    /// Returns the snake_case key used in schedules and audit steps.
    pub fn key(self) -> &'static str {
        match self {
            Movement::Entry => "entry",
            Movement::Exit => "exit",
            Movement::QuayChange => "quay_change",
            Movement::BerthChange => "berth_change",
            Movement::InteriorMove => "interior_move",
        }
    }
}

/// Exemption status of a movement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exemption {
    /// The movement is charged.
    #[default]
    None,
    /// The movement is fully exempt; every surcharge is skipped.
    Full,
    /// The regime's partial exemption, valid only on its designated movement.
    Partial,
}

/// Pilotage surcharge flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PilotageSurcharges {
    /// The vessel confirmed a delay.
    #[serde(default)]
    pub confirmed_delay: bool,
    /// The vessel was more than 20 minutes late after the pilot boarded.
    #[serde(default)]
    pub post_boarding_delay: bool,
    /// The vessel is disabled or in distress.
    #[serde(default)]
    pub distress: bool,
    /// Hours of pilotage beyond the included allowance.
    #[serde(default)]
    pub overtime_hours: Decimal,
}

/// Pilot launch hire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PilotLaunch {
    /// Hours of hire.
    pub hours: Decimal,
    /// True when the launch serves the anchorage rather than the port interior.
    #[serde(default)]
    pub at_anchorage: bool,
}

/// Pilotage options for one regime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PilotageOptions {
    /// Surcharge flags applied to every priced movement.
    #[serde(default)]
    pub surcharges: PilotageSurcharges,
    /// Exemption applied to every priced movement.
    #[serde(default)]
    pub exemption: Exemption,
    /// Optional pilot launch hire.
    #[serde(default)]
    pub launch: Option<PilotLaunch>,
}

/// Towage options for one regime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TowageOptions {
    /// The towed vessel has no propulsion.
    #[serde(default)]
    pub no_propulsion: bool,
    /// The towage is a shifting (déhalage).
    #[serde(default)]
    pub shifting: bool,
    /// The tugs waited or the order was cancelled.
    #[serde(default)]
    pub waiting_or_cancelled: bool,
    /// Full towage exemption.
    #[serde(default)]
    pub exempt: bool,
    /// Hours of tanker safety watch.
    #[serde(default)]
    pub safety_watch_hours: Decimal,
    /// Hours the tugs are held on standby.
    #[serde(default)]
    pub availability_hours: Decimal,
}

/// Mooring options for one regime.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MooringOptions {
    /// Mooring category key (e.g. "cat_a", "standard").
    pub category: String,
    /// Actual duration of the mooring operation in hours.
    #[serde(default)]
    pub duration_hours: Decimal,
}

/// Anchorage (rade) stay reported by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnchorageStay {
    /// Day of anchorage reached by the vessel (1-based).
    pub day_reached: u32,
    /// The vessel anchored only to take bunkers.
    #[serde(default)]
    pub bunkering_only: bool,
}

/// Basis for the vessel dues of a Moroccan call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "basis", rename_all = "snake_case")]
pub enum VesselDuesSelection {
    /// Volume-based dues for a terminal.
    Terminal {
        /// Terminal key (e.g. "containers").
        terminal: String,
        /// Optional anchorage stay.
        #[serde(default)]
        anchorage: Option<AnchorageStay>,
    },
    /// Flat hourly package for ro-ro and ferry calls.
    RoroPackage {
        /// Package key (e.g. "cat_a").
        package: String,
        /// Duration of the call in hours.
        call_hours: Decimal,
    },
}

/// Direction of a ro-ro freight unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreightDirection {
    /// Unit discharged in the port.
    Import,
    /// Unit loaded in the port.
    Export,
}

/// A cargo item to price with the regime's cargo dues.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CargoItem {
    /// Containers, quantity taken from the profile's TEU count.
    Containers {
        /// Operation key: "transhipment", "import_export" or "cabotage".
        operation: String,
        /// Dangerous goods surcharge applies.
        #[serde(default)]
        dangerous: bool,
    },
    /// General or bulk cargo, quantity taken from the profile's tonnage.
    GeneralCargo {
        /// Product key.
        product: String,
    },
    /// Hydrocarbons, quantity taken from the profile's tonnage.
    Hydrocarbon {
        /// Product key (e.g. "white_products").
        product: String,
        /// Operation key.
        operation: String,
    },
    /// Ro-ro freight units.
    RoroFreight {
        /// Unit key (e.g. "full_trailer").
        unit: String,
        /// Import or export.
        direction: FreightDirection,
        /// Number of units.
        count: u32,
        /// Dangerous goods surcharge applies.
        #[serde(default)]
        dangerous: bool,
    },
    /// Containers stored in a terminal yard.
    ContainerStorage {
        /// Terminal key (e.g. "tc1").
        terminal: String,
        /// Container type key: "dry_20", "dry_40", "reefer" or "empty".
        container: String,
        /// Number of containers.
        count: u32,
        /// Days each container stays in the yard, free days included.
        days: u32,
    },
    /// Passengers, quantity taken from the profile's passenger count.
    Passengers {
        /// Route category key: "strait" or "beyond_strait".
        category: String,
    },
    /// Accompanied passenger vehicles.
    PassengerVehicles {
        /// Vehicle key (e.g. "car_strait", "coach").
        vehicle: String,
        /// Number of vehicles.
        count: u32,
    },
}

/// Everything a Moroccan regime (Tanger Med or Nador West Med) needs to price a call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoroccanSelection {
    /// Vessel dues basis.
    pub vessel_dues: VesselDuesSelection,
    /// Movements to price for pilotage and mooring.
    #[serde(default)]
    pub movements: Vec<Movement>,
    /// Pilotage options; `None` skips pilotage.
    #[serde(default)]
    pub pilotage: Option<PilotageOptions>,
    /// Towage options; `None` skips towage.
    #[serde(default)]
    pub towage: Option<TowageOptions>,
    /// Mooring options; `None` skips mooring.
    #[serde(default)]
    pub mooring: Option<MooringOptions>,
    /// Cargo items.
    #[serde(default)]
    pub cargo: Vec<CargoItem>,
}

/// Algeciras statutory tax categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaxCategory {
    /// Navigation aid tax.
    T0,
    /// Vessel tax.
    T1,
    /// Passenger tax.
    T2,
    /// Cargo tax.
    T3,
    /// Transit-zone storage tax.
    T6,
}

impl TaxCategory {
    /// Every category, in tariff order.
    pub const ALL: [TaxCategory; 5] = [
        TaxCategory::T0,
        TaxCategory::T1,
        TaxCategory::T2,
        TaxCategory::T3,
        TaxCategory::T6,
    ];

    /// Returns the category code.
    pub fn code(self) -> &'static str {
        match self {
            TaxCategory::T0 => "T0",
            TaxCategory::T1 => "T1",
            TaxCategory::T2 => "T2",
            TaxCategory::T3 => "T3",
            TaxCategory::T6 => "T6",
        }
    }
}

/// Berth concession type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcessionType {
    /// Public berth operated by the port authority.
    PublicBerth,
    /// Berth inside a concessioned terminal.
    ConcessionedTerminal,
}

/// Annual call-frequency band of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyBand {
    /// Fewer than 12 calls a year.
    Occasional,
    /// 12 to 51 calls a year.
    Low,
    /// 52 to 103 calls a year.
    Medium,
    /// 104 calls a year or more.
    High,
}

/// Special reduction class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecialReduction {
    /// No special reduction.
    #[default]
    None,
    /// Transhipment traffic.
    Transhipment,
    /// Short-sea shipping.
    ShortSea,
    /// Cruise traffic.
    Cruise,
}

/// Bonus class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusClass {
    /// No bonus.
    #[default]
    None,
    /// Environmental good-practice bonus.
    Environmental,
    /// Port competitiveness bonus.
    Competitiveness,
}

/// Everything the Algeciras statutory taxes need.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgecirasSelection {
    /// Categories to compute, in output order.
    pub categories: Vec<TaxCategory>,
    /// Berth concession type.
    pub concession: ConcessionType,
    /// Annual call-frequency band.
    pub frequency: FrequencyBand,
    /// The call belongs to a regular service.
    #[serde(default)]
    pub regular_service: bool,
    /// Special reduction class.
    #[serde(default)]
    pub special_reduction: SpecialReduction,
    /// Bonus class.
    #[serde(default)]
    pub bonus: BonusClass,
    /// T3 product group key.
    #[serde(default)]
    pub cargo_group: Option<String>,
    /// The stored cargo is rolling cargo (shorter T6 franchise).
    #[serde(default)]
    pub rolling_cargo: bool,
}

/// A complete evaluation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The vessel and its operation.
    pub vessel: VesselProfile,
    /// Tanger Med selection; `None` skips the regime.
    #[serde(default)]
    pub tanger_med: Option<MoroccanSelection>,
    /// Nador West Med selection; `None` skips the regime.
    #[serde(default)]
    pub nador_west_med: Option<MoroccanSelection>,
    /// Algeciras selection; `None` skips the regime.
    #[serde(default)]
    pub algeciras: Option<AlgecirasSelection>,
    /// Dirham per euro, needed when a DH-denominated tariff is priced.
    #[serde(default)]
    pub dh_per_eur: Option<Decimal>,
    /// Port the other regimes are compared against.
    #[serde(default)]
    pub reference_port: Option<Port>,
}
