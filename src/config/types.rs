//! Configuration types for tariff schedules.
//!
//! This module contains the strongly-typed schedule structures that are
//! deserialized from the YAML tariff files. Every structure is read-only
//! after loading.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    BonusClass, ConcessionType, FreightDirection, FrequencyBand, Movement, SpecialReduction,
    TaxCategory, VesselProfile,
};

/// Metadata about the tariff vintage.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleMetadata {
    /// Short code of the schedule set (e.g., "PORT-TARIFFS-2025").
    pub code: String,
    /// Human-readable name.
    pub name: String,
    /// Version label of the vintage.
    pub version: String,
    /// Date from which the tariffs apply.
    pub effective_date: NaiveDate,
    /// Tariff documents the figures were taken from.
    #[serde(default)]
    pub sources: Vec<String>,
}

/// One rate bracket `(lower, upper, rate)`; the upper bound is inclusive.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Bracket {
    /// Lower bound as published.
    pub lower: Decimal,
    /// Inclusive upper bound.
    pub upper: Decimal,
    /// Rate for any metric in the bracket.
    pub rate: Decimal,
}

/// Per-unit supplement applied beyond the last bracket of a range.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Supplement {
    /// Size of one started increment (e.g., 10 000 m³).
    pub unit_size: Decimal,
    /// Amount added per started increment.
    pub rate: Decimal,
}

/// An ordered, contiguous run of brackets with an optional supplement rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierRange {
    /// Brackets in ascending order.
    pub brackets: Vec<Bracket>,
    /// Extrapolation beyond the last bracket.
    #[serde(default)]
    pub supplement: Option<Supplement>,
}

impl TierRange {
    /// Lower bound of the first bracket.
    pub fn lower(&self) -> Decimal {
        self.brackets.first().map_or(Decimal::ZERO, |b| b.lower)
    }

    /// Upper bound of the last bracket.
    pub fn upper(&self) -> Decimal {
        self.brackets.last().map_or(Decimal::ZERO, |b| b.upper)
    }

    fn validate(&self, table: &str) -> EngineResult<()> {
        let invalid = |message: String| EngineError::InvalidSchedule {
            table: table.to_string(),
            message,
        };

        if self.brackets.is_empty() {
            return Err(invalid("range has no brackets".to_string()));
        }

        for bracket in &self.brackets {
            if bracket.lower > bracket.upper {
                return Err(invalid(format!(
                    "bracket {}..{} has its bounds reversed",
                    bracket.lower, bracket.upper
                )));
            }
        }

        // Published tables step either from `upper` to `upper` or to `upper + 1`.
        for pair in self.brackets.windows(2) {
            let (previous, next) = (&pair[0], &pair[1]);
            if next.lower != previous.upper && next.lower != previous.upper + Decimal::ONE {
                return Err(invalid(format!(
                    "bracket starting at {} does not follow bracket ending at {}",
                    next.lower, previous.upper
                )));
            }
        }

        if let Some(supplement) = &self.supplement {
            if supplement.unit_size <= Decimal::ZERO {
                return Err(invalid(format!(
                    "supplement unit size must be positive, got {}",
                    supplement.unit_size
                )));
            }
        }

        Ok(())
    }
}

/// A tier table: a primary range and an optional disjoint secondary range for very large values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TierTable {
    /// Name used in errors and audit steps.
    pub name: String,
    /// The primary range.
    pub primary: TierRange,
    /// The range for very large values, starting above the primary range.
    #[serde(default)]
    pub secondary: Option<TierRange>,
}

impl TierTable {
    /// Checks ordering, contiguity and supplement rules.
    pub fn validate(&self) -> EngineResult<()> {
        self.primary.validate(&self.name)?;

        if let Some(secondary) = &self.secondary {
            secondary.validate(&self.name)?;
            if secondary.lower() <= self.primary.upper() {
                return Err(EngineError::InvalidSchedule {
                    table: self.name.clone(),
                    message: format!(
                        "secondary range starts at {} inside the primary range ending at {}",
                        secondary.lower(),
                        self.primary.upper()
                    ),
                });
            }
        }

        Ok(())
    }
}

/// Affine rate `slope × metric + intercept`, optionally floored.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct LinearFormula {
    /// Rate per unit of metric.
    pub slope: Decimal,
    /// Constant term.
    #[serde(default)]
    pub intercept: Decimal,
    /// Minimum amount.
    #[serde(default)]
    pub floor: Option<Decimal>,
}

/// The size metric a tariff is based on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizeBasis {
    /// Geometric volume (m³).
    GeometricVolume,
    /// Gross tonnage.
    GrossTonnage,
    /// Length overall (m).
    LengthOverall,
}

impl SizeBasis {
    /// Picks this basis's metric for a vessel whose geometric volume is known.
    pub fn metric(self, geometric_volume: Decimal, vessel: &VesselProfile) -> Decimal {
        match self {
            SizeBasis::GeometricVolume => geometric_volume,
            SizeBasis::GrossTonnage => vessel.gross_tonnage,
            SizeBasis::LengthOverall => vessel.length_overall,
        }
    }

    /// Returns the snake_case key used in audit steps.
    pub fn key(self) -> &'static str {
        match self {
            SizeBasis::GeometricVolume => "geometric_volume",
            SizeBasis::GrossTonnage => "gross_tonnage",
            SizeBasis::LengthOverall => "length_overall",
        }
    }
}

/// How a movement's base rate is obtained.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementTariff {
    /// Looked up in a tier table.
    Tiered {
        /// The table.
        table: TierTable,
    },
    /// Computed with a linear formula.
    Linear {
        /// The formula.
        formula: LinearFormula,
    },
}

/// Vessel dues rates of one terminal (€/m³ of geometric volume).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TerminalDues {
    /// Nautical dues rate.
    pub nautical: Decimal,
    /// Port dues rate.
    pub port: Decimal,
    /// Stationnement (idle time) rate per day.
    pub stationnement: Decimal,
}

/// Stationnement rules of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StayRules {
    /// Free period (hours).
    pub franchise_hours: Decimal,
    /// Band after the franchise charged at the reduced rate (hours).
    pub reduced_band_hours: Decimal,
    /// Divisor of the reduced rate (3 means one third).
    pub reduced_divisor: Decimal,
    /// Anchorage day from which the anchorage reduction applies.
    pub anchorage_reduction_day: u32,
    /// Factor applied once the anchorage reduction applies.
    pub anchorage_reduction_factor: Decimal,
    /// Anchorage stay for bunkering that is exempt, if the regime has such a rule.
    #[serde(default)]
    pub bunkering_exemption_hours: Option<Decimal>,
}

/// Ro-ro call package.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoroPackage {
    /// Flat amount covering the included duration.
    pub flat: Decimal,
    /// Included call duration (hours).
    pub included_hours: Decimal,
    /// Amount per started half hour beyond the included duration.
    pub half_hour_rate: Decimal,
}

/// Vessel dues schedule of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VesselDuesSchedule {
    /// Rates per terminal key.
    pub terminals: HashMap<String, TerminalDues>,
    /// Stationnement rules.
    pub stay: StayRules,
    /// Nautical dues rate for ro-ro package calls (€/m³).
    pub roro_nautical: Decimal,
    /// Ro-ro packages per key.
    pub roro_packages: HashMap<String, RoroPackage>,
}

/// Partial pilotage exemption rule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PartialExemptionRule {
    /// The only movement the partial exemption applies to.
    pub movement: Movement,
    /// Factor applied to the base rate.
    pub factor: Decimal,
}

/// Pilotage surcharge factors. A missing factor means the regime does not define the surcharge.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PilotageSurchargeRates {
    /// Confirmed delay factor.
    #[serde(default)]
    pub confirmed_delay: Option<Decimal>,
    /// Delay after the pilot boarded.
    #[serde(default)]
    pub post_boarding_delay: Option<Decimal>,
    /// Disabled vessel factor.
    #[serde(default)]
    pub distress: Option<Decimal>,
    /// Increment per started overtime hour (0.5 means +50 % per hour).
    #[serde(default)]
    pub overtime_step: Option<Decimal>,
    /// Partial exemption rule.
    #[serde(default)]
    pub partial_exemption: Option<PartialExemptionRule>,
}

/// Pilot launch rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PilotLaunchRates {
    /// Hourly rate inside the port.
    pub interior_hourly: Decimal,
    /// Hourly rate at the anchorage.
    pub anchorage_hourly: Decimal,
    /// Minimum charge at the anchorage.
    pub anchorage_minimum: Decimal,
}

/// Pilotage schedule of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PilotageSchedule {
    /// Metric the tariffs are based on.
    pub basis: SizeBasis,
    /// Tariff per movement.
    pub movements: HashMap<Movement, MovementTariff>,
    /// Surcharge factors.
    #[serde(default)]
    pub surcharges: PilotageSurchargeRates,
    /// Pilot launch rates, if the regime publishes them.
    #[serde(default)]
    pub launch: Option<PilotLaunchRates>,
}

/// Towage schedule of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TowageSchedule {
    /// Rate per tug per movement by gross tonnage.
    pub table: TierTable,
    /// Factor for vessels without propulsion.
    #[serde(default)]
    pub no_propulsion: Option<Decimal>,
    /// Factor for shifting.
    #[serde(default)]
    pub shifting: Option<Decimal>,
    /// Factor charged for waiting or cancellation.
    #[serde(default)]
    pub waiting_or_cancelled: Option<Decimal>,
    /// Tanker safety watch rate per tug per hour.
    #[serde(default)]
    pub safety_watch_hourly: Option<Decimal>,
    /// Standby rate per tug per hour, by duration band. Empty when unpublished.
    #[serde(default)]
    pub availability: Vec<HourBand>,
}

/// An hourly rate that applies when the total duration falls in the band.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourBand {
    /// First hour of the band (1-based).
    pub from_hour: u32,
    /// Last hour of the band; `None` for the open-ended last band.
    #[serde(default)]
    pub to_hour: Option<u32>,
    /// Rate per tug per hour.
    pub hourly: Decimal,
}

/// One mooring category.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MooringCategory {
    /// Rate formula on the schedule's basis.
    pub formula: LinearFormula,
    /// Duration included in the rate (hours), if the regime limits it.
    #[serde(default)]
    pub included_hours: Option<Decimal>,
}

/// Mooring schedule of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MooringSchedule {
    /// Metric the formulas are based on.
    pub basis: SizeBasis,
    /// Categories per key.
    pub categories: HashMap<String, MooringCategory>,
    /// Increment per started hour beyond the included duration (0.30 means +30 %).
    #[serde(default)]
    pub overtime_step: Option<Decimal>,
}

/// Currency a table is published in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Currency {
    /// Euro.
    #[default]
    Eur,
    /// Moroccan dirham.
    Dirham,
}

/// Ro-ro freight dues.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RoroFreightSchedule {
    /// Currency of the rates.
    #[serde(default)]
    pub currency: Currency,
    /// Rate per unit key and direction.
    pub units: HashMap<String, HashMap<FreightDirection, Decimal>>,
}

/// Per-day storage rates of one container type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerStorageRates {
    /// Rate per container per day from the first billable day.
    pub short_stay: Decimal,
    /// Rate per container per day from `long_stay_from_day`.
    pub long_stay: Decimal,
}

/// Container yard storage.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContainerStorageSchedule {
    /// Days free of charge.
    pub free_days: u32,
    /// First day billed at the long-stay rate.
    pub long_stay_from_day: u32,
    /// Rates by terminal and container type.
    pub terminals: HashMap<String, HashMap<String, ContainerStorageRates>>,
}

impl ContainerStorageSchedule {
    /// Returns the number of short-stay and long-stay days in a stay of `days`.
    pub fn billable_days(&self, days: u32) -> (u32, u32) {
        let short_end = days.min(self.long_stay_from_day.saturating_sub(1));
        let short = short_end.saturating_sub(self.free_days);
        let long = days.saturating_sub(self.long_stay_from_day.saturating_sub(1));
        (short, long)
    }

    /// Checks that the long-stay rate starts after the free days.
    pub fn validate(&self) -> EngineResult<()> {
        if self.long_stay_from_day <= self.free_days {
            return Err(EngineError::InvalidSchedule {
                table: "cargo.container_storage".to_string(),
                message: format!(
                    "long stay starts on day {} inside {} free day(s)",
                    self.long_stay_from_day, self.free_days
                ),
            });
        }
        Ok(())
    }
}

/// Cargo dues schedule of a regime.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CargoDuesSchedule {
    /// Container rate per TEU by operation.
    pub containers: HashMap<String, Decimal>,
    /// Factor for dangerous goods.
    pub dangerous_goods_factor: Decimal,
    /// General cargo rate per tonne by product.
    #[serde(default)]
    pub general_cargo: HashMap<String, Decimal>,
    /// Hydrocarbon rate per tonne by product and operation.
    #[serde(default)]
    pub hydrocarbons: HashMap<String, HashMap<String, Decimal>>,
    /// Ro-ro freight dues.
    #[serde(default)]
    pub roro_freight: Option<RoroFreightSchedule>,
    /// Container yard storage.
    #[serde(default)]
    pub container_storage: Option<ContainerStorageSchedule>,
    /// Rate per passenger by route category.
    #[serde(default)]
    pub passengers: HashMap<String, Decimal>,
    /// Rate per accompanied vehicle by vehicle key.
    #[serde(default)]
    pub passenger_vehicles: HashMap<String, Decimal>,
}

/// Complete schedule of a Moroccan port authority.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MoroccanSchedule {
    /// Vessel dues.
    pub vessel_dues: VesselDuesSchedule,
    /// Pilotage.
    pub pilotage: PilotageSchedule,
    /// Towage.
    pub towage: TowageSchedule,
    /// Mooring.
    pub mooring: MooringSchedule,
    /// Cargo dues.
    pub cargo: CargoDuesSchedule,
}

impl MoroccanSchedule {
    /// Validates every tier table and band list of the schedule.
    pub fn validate(&self) -> EngineResult<()> {
        self.towage.table.validate()?;
        for tariff in self.pilotage.movements.values() {
            if let MovementTariff::Tiered { table } = tariff {
                table.validate()?;
            }
        }
        if !self.towage.availability.is_empty() {
            check_bands(
                &format!("{}.availability", self.towage.table.name),
                "hour",
                self.towage
                    .availability
                    .iter()
                    .map(|band| (band.from_hour, band.to_hour)),
            )?;
        }
        if let Some(storage) = &self.cargo.container_storage {
            storage.validate()?;
        }
        Ok(())
    }
}

/// Coefficients of one Algeciras tax category.
///
/// A map that is absent means the category does not vary with that selector.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CoefficientSet {
    /// Utilization coefficient by concession type.
    #[serde(default)]
    pub utilization: Option<HashMap<ConcessionType, Decimal>>,
    /// Frequency coefficient by annual call band.
    #[serde(default)]
    pub frequency: Option<HashMap<FrequencyBand, Decimal>>,
    /// Special reduction coefficient by class.
    #[serde(default)]
    pub special_reduction: Option<HashMap<SpecialReduction, Decimal>>,
    /// Bonus coefficient by class.
    #[serde(default)]
    pub bonus: Option<HashMap<BonusClass, Decimal>>,
}

/// One storage period band (days are 1-based and inclusive).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageBand {
    /// First day of the band.
    pub from_day: u32,
    /// Last day of the band; `None` for the open-ended last band.
    #[serde(default)]
    pub to_day: Option<u32>,
    /// Coefficient applied to each day of the band.
    pub coefficient: Decimal,
}

/// T6 storage rules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StorageRules {
    /// Free period for rolling cargo (hours).
    pub rolling_franchise_hours: Decimal,
    /// Free period for other cargo (hours).
    pub standard_franchise_hours: Decimal,
    /// Day bands in ascending order.
    pub bands: Vec<StorageBand>,
}

/// Algeciras statutory tax schedule.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AlgecirasSchedule {
    /// Base unit rate per category (T3 uses `cargo_groups` instead).
    pub base_rates: HashMap<TaxCategory, Decimal>,
    /// T3 base rate per product group.
    pub cargo_groups: HashMap<String, Decimal>,
    /// Coefficients per category.
    pub coefficients: HashMap<TaxCategory, CoefficientSet>,
    /// Subtracted from the frequency coefficient for regular services.
    pub regular_service_adjustment: Decimal,
    /// T6 storage rules.
    pub storage: StorageRules,
}

impl AlgecirasSchedule {
    /// Checks that every category has a coefficient entry and that storage
    /// bands are ascending and contiguous.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(missing) = TaxCategory::ALL
            .iter()
            .find(|category| !self.coefficients.contains_key(category))
        {
            return Err(EngineError::InvalidSchedule {
                table: "algeciras.coefficients".to_string(),
                message: format!("no coefficient entry for {}", missing.code()),
            });
        }

        check_bands(
            "algeciras.storage",
            "day",
            self.storage.bands.iter().map(|band| (band.from_day, band.to_day)),
        )
    }
}

/// Checks that `(from, to)` bands start at 1, are contiguous and end open.
fn check_bands(
    table: &str,
    unit: &str,
    bands: impl ExactSizeIterator<Item = (u32, Option<u32>)>,
) -> EngineResult<()> {
    let invalid = |message: String| EngineError::InvalidSchedule {
        table: table.to_string(),
        message,
    };

    let count = bands.len();
    let mut expected_start = 1;
    let mut open_ended = false;
    for (index, (from, to)) in bands.enumerate() {
        if from != expected_start {
            return Err(invalid(format!(
                "band starts on {} {} but {} {} was expected",
                unit, from, unit, expected_start
            )));
        }
        match to {
            Some(to) if to < from => {
                return Err(invalid(format!("band {}..{} has its bounds reversed", from, to)));
            }
            Some(to) => expected_start = to + 1,
            None if index + 1 != count => {
                return Err(invalid("only the last band may be open-ended".to_string()));
            }
            None => open_ended = true,
        }
    }

    if open_ended {
        Ok(())
    } else {
        Err(invalid("the last band must be open-ended".to_string()))
    }
}

/// The complete, immutable set of tariff schedules for one vintage.
#[derive(Debug, Clone)]
pub struct TariffSchedules {
    metadata: ScheduleMetadata,
    tanger_med: MoroccanSchedule,
    nador_west_med: MoroccanSchedule,
    algeciras: AlgecirasSchedule,
}

impl TariffSchedules {
    /// Creates a schedule set from its parts, validating every table.
    pub fn new(
        metadata: ScheduleMetadata,
        tanger_med: MoroccanSchedule,
        nador_west_med: MoroccanSchedule,
        algeciras: AlgecirasSchedule,
    ) -> EngineResult<Self> {
        tanger_med.validate()?;
        nador_west_med.validate()?;
        algeciras.validate()?;

        Ok(Self {
            metadata,
            tanger_med,
            nador_west_med,
            algeciras,
        })
    }

    /// Returns the vintage metadata.
    pub fn metadata(&self) -> &ScheduleMetadata {
        &self.metadata
    }

    /// Returns the Tanger Med schedule.
    pub fn tanger_med(&self) -> &MoroccanSchedule {
        &self.tanger_med
    }

    /// Returns the Nador West Med schedule.
    pub fn nador_west_med(&self) -> &MoroccanSchedule {
        &self.nador_west_med
    }

    /// Returns the Algeciras schedule.
    pub fn algeciras(&self) -> &AlgecirasSchedule {
        &self.algeciras
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn bracket(lower: &str, upper: &str, rate: &str) -> Bracket {
        Bracket {
            lower: dec(lower),
            upper: dec(upper),
            rate: dec(rate),
        }
    }

    fn create_table(secondary: Option<TierRange>) -> TierTable {
        TierTable {
            name: "test".to_string(),
            primary: TierRange {
                brackets: vec![
                    bracket("0", "40000", "317.0"),
                    bracket("40001", "50000", "342.4"),
                ],
                supplement: Some(Supplement {
                    unit_size: dec("10000"),
                    rate: dec("191.4"),
                }),
            },
            secondary,
        }
    }

    #[test]
    fn test_published_table_is_valid() {
        assert!(create_table(None).validate().is_ok());
    }

    #[test]
    fn test_gap_between_brackets_is_rejected() {
        let mut table = create_table(None);
        table.primary.brackets[1].lower = dec("45000");

        match table.validate() {
            Err(EngineError::InvalidSchedule { table, message }) => {
                assert_eq!(table, "test");
                assert!(message.contains("45000"));
            }
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_reversed_bracket_is_rejected() {
        let mut table = create_table(None);
        table.primary.brackets[0] = bracket("40000", "0", "317.0");
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_overlapping_secondary_is_rejected() {
        let secondary = TierRange {
            brackets: vec![bracket("45000", "60000", "500")],
            supplement: None,
        };
        assert!(create_table(Some(secondary)).validate().is_err());
    }

    #[test]
    fn test_zero_unit_size_is_rejected() {
        let mut table = create_table(None);
        table.primary.supplement = Some(Supplement {
            unit_size: Decimal::ZERO,
            rate: dec("10"),
        });
        assert!(table.validate().is_err());
    }

    fn load_algeciras() -> AlgecirasSchedule {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/tariffs_2025/algeciras.yaml");
        serde_yaml::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_published_algeciras_schedule_is_valid() {
        assert!(load_algeciras().validate().is_ok());
    }

    #[test]
    fn test_missing_coefficient_category_is_rejected() {
        let mut schedule = load_algeciras();
        schedule.coefficients.remove(&TaxCategory::T6);

        match schedule.validate() {
            Err(EngineError::InvalidSchedule { table, message }) => {
                assert_eq!(table, "algeciras.coefficients");
                assert!(message.contains("T6"));
            }
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_hour_band_gap_is_rejected() {
        let bands = [(1, Some(2)), (4, Some(12)), (13, None)];

        match check_bands("tanger_med.towage.availability", "hour", bands.into_iter()) {
            Err(EngineError::InvalidSchedule { table, message }) => {
                assert_eq!(table, "tanger_med.towage.availability");
                assert!(message.contains("hour 4"));
            }
            other => panic!("Expected InvalidSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_closed_last_band_is_rejected() {
        let bands = [(1, Some(2)), (3, Some(12))];
        assert!(check_bands("test", "hour", bands.into_iter()).is_err());
    }

    #[test]
    fn test_container_storage_days_split() {
        let storage = ContainerStorageSchedule {
            free_days: 2,
            long_stay_from_day: 8,
            terminals: HashMap::new(),
        };

        assert_eq!(storage.billable_days(0), (0, 0));
        assert_eq!(storage.billable_days(2), (0, 0));
        assert_eq!(storage.billable_days(7), (5, 0));
        assert_eq!(storage.billable_days(10), (5, 3));
        assert!(storage.validate().is_ok());
    }

    #[test]
    fn test_long_stay_inside_free_days_is_rejected() {
        let storage = ContainerStorageSchedule {
            free_days: 3,
            long_stay_from_day: 2,
            terminals: HashMap::new(),
        };
        assert!(storage.validate().is_err());
    }

    #[test]
    fn test_movement_tariff_deserializes_linear() {
        let yaml = "kind: linear\nformula:\n  slope: 0.022641381\n  \
                    intercept: 21.25659786\n  floor: 261.1\n";
        let tariff: MovementTariff = serde_yaml::from_str(yaml).unwrap();
        match tariff {
            MovementTariff::Linear { formula } => {
                assert_eq!(formula.slope, dec("0.022641381"));
                assert_eq!(formula.floor, Some(dec("261.1")));
            }
            other => panic!("Expected Linear, got {:?}", other),
        }
    }
}
