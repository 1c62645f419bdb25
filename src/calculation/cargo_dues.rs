//! Cargo dues.
//!
//! Prices one [`CargoItem`] against a Moroccan regime's cargo tables.
//! Quantities come from the vessel's [`CargoProfile`] except for items that
//! carry their own count (ro-ro freight, stored containers, vehicles).
//!
//! Container storage is priced per container as the sum of its day rates:
//! free days cost nothing, then the short-stay rate applies until the
//! long-stay day.

use rust_decimal::Decimal;

use crate::config::{CargoDuesSchedule, Currency};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AuditStep, CargoItem, CargoProfile, FeeCategory, FeeLine, FreightDirection, Port,
};

use super::currency::normalize_dirham;

/// The result of pricing one cargo item.
#[derive(Debug, Clone)]
pub struct CargoDuesResult {
    /// The fee line.
    pub line: FeeLine,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Prices one cargo item.
///
/// # Errors
///
/// * `UnknownSchedule` when the operation, product, unit, terminal, container
///   type, passenger category or vehicle is not published
/// * `InvalidInput` when a dirham table is priced without an exchange rate
pub fn calculate_cargo_dues(
    port: Port,
    schedule: &CargoDuesSchedule,
    item: &CargoItem,
    cargo: &CargoProfile,
    dh_per_eur: Option<Decimal>,
    step_number: u32,
) -> EngineResult<CargoDuesResult> {
    let unknown = |key: String| EngineError::unknown_schedule(port.key(), key);
    let dangerous_factor = |dangerous: bool| {
        if dangerous {
            schedule.dangerous_goods_factor
        } else {
            Decimal::ONE
        }
    };

    let (category, label, quantity, rate, factor, tariff_ref) = match item {
        CargoItem::Containers {
            operation,
            dangerous,
        } => {
            let rate = *schedule
                .containers
                .get(operation)
                .ok_or_else(|| unknown(format!("cargo.containers.{}", operation)))?;
            (
                FeeCategory::ContainerDues,
                format!("Container dues ({})", operation),
                cargo.teu,
                rate,
                dangerous_factor(*dangerous),
                format!("cargo.containers.{}", operation),
            )
        }
        CargoItem::GeneralCargo { product } => {
            let rate = *schedule
                .general_cargo
                .get(product)
                .ok_or_else(|| unknown(format!("cargo.general_cargo.{}", product)))?;
            (
                FeeCategory::GeneralCargoDues,
                format!("Cargo dues ({})", product),
                cargo.tonnage,
                rate,
                Decimal::ONE,
                format!("cargo.general_cargo.{}", product),
            )
        }
        CargoItem::Hydrocarbon { product, operation } => {
            let key = format!("cargo.hydrocarbons.{}.{}", product, operation);
            let rate = *schedule
                .hydrocarbons
                .get(product)
                .and_then(|by_operation| by_operation.get(operation))
                .ok_or_else(|| unknown(key.clone()))?;
            (
                FeeCategory::HydrocarbonDues,
                format!("Hydrocarbon dues ({}, {})", product, operation),
                cargo.tonnage,
                rate,
                Decimal::ONE,
                key,
            )
        }
        CargoItem::RoroFreight {
            unit,
            direction,
            count,
            dangerous,
        } => {
            let freight = schedule
                .roro_freight
                .as_ref()
                .ok_or_else(|| unknown("cargo.roro_freight".to_string()))?;
            let direction_key = match direction {
                FreightDirection::Import => "import",
                FreightDirection::Export => "export",
            };
            let key = format!("cargo.roro_freight.{}.{}", unit, direction_key);
            let published = *freight
                .units
                .get(unit)
                .and_then(|by_direction| by_direction.get(direction))
                .ok_or_else(|| unknown(key.clone()))?;
            let rate = match freight.currency {
                Currency::Eur => published,
                Currency::Dirham => {
                    let dh_per_eur = dh_per_eur.ok_or_else(|| {
                        EngineError::invalid_input(
                            "dh_per_eur",
                            format!("required to price '{}' published in dirham", key),
                        )
                    })?;
                    normalize_dirham(published, dh_per_eur)?
                }
            };
            (
                FeeCategory::RoroFreightDues,
                format!("Ro-ro freight ({}, {})", unit, direction_key),
                Decimal::from(*count),
                rate,
                dangerous_factor(*dangerous),
                key,
            )
        }
        CargoItem::ContainerStorage {
            terminal,
            container,
            count,
            days,
        } => {
            let storage = schedule
                .container_storage
                .as_ref()
                .ok_or_else(|| unknown("cargo.container_storage".to_string()))?;
            let key = format!("cargo.container_storage.{}.{}", terminal, container);
            let rates = storage
                .terminals
                .get(terminal)
                .and_then(|by_type| by_type.get(container))
                .ok_or_else(|| unknown(key.clone()))?;
            let (short_days, long_days) = storage.billable_days(*days);
            let per_container = Decimal::from(short_days) * rates.short_stay
                + Decimal::from(long_days) * rates.long_stay;
            (
                FeeCategory::ContainerStorage,
                format!("Container storage ({}, {}, {} day(s))", terminal, container, days),
                Decimal::from(*count),
                per_container,
                Decimal::ONE,
                key,
            )
        }
        CargoItem::Passengers { category } => {
            let rate = *schedule
                .passengers
                .get(category)
                .ok_or_else(|| unknown(format!("cargo.passengers.{}", category)))?;
            (
                FeeCategory::PassengerDues,
                format!("Passenger dues ({})", category),
                Decimal::from(cargo.passengers),
                rate,
                Decimal::ONE,
                format!("cargo.passengers.{}", category),
            )
        }
        CargoItem::PassengerVehicles { vehicle, count } => {
            let rate = *schedule
                .passenger_vehicles
                .get(vehicle)
                .ok_or_else(|| unknown(format!("cargo.passenger_vehicles.{}", vehicle)))?;
            (
                FeeCategory::PassengerVehicleDues,
                format!("Passenger vehicles ({})", vehicle),
                Decimal::from(*count),
                rate,
                Decimal::ONE,
                format!("cargo.passenger_vehicles.{}", vehicle),
            )
        }
    };

    let amount = quantity * rate * factor;

    let audit_step = AuditStep {
        step_number,
        rule_id: "cargo_dues".to_string(),
        rule_name: "Cargo Dues".to_string(),
        tariff_ref: format!("{}.{}", port.key(), tariff_ref),
        input: serde_json::json!({
            "quantity": quantity.to_string(),
            "rate_eur": rate.to_string(),
            "dangerous_goods_factor": factor.to_string()
        }),
        output: serde_json::json!({
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} × {} × {} = {}",
            quantity.normalize(),
            rate.round_dp(4),
            factor.normalize(),
            amount.round_dp(4)
        ),
    };

    Ok(CargoDuesResult {
        line: FeeLine {
            category,
            port,
            label,
            amount,
        },
        audit_step,
    })
}
