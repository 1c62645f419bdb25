//! Vessel and operation profile.
//!
//! This module defines the [`VesselProfile`] every regime prices against and
//! the [`CargoProfile`] carried with it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest accepted vessel dimension, in metres.
pub const MAX_DIMENSION_M: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Largest accepted tonnage, count, area or duration.
///
/// Every product the engine forms from quantities in range stays well inside
/// the `Decimal` range.
pub const MAX_QUANTITY: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Checks that a quantity is neither negative nor above [`MAX_QUANTITY`].
///
/// # Errors
///
/// Returns `InvalidInput` naming `field` when the value is out of range.
pub fn check_quantity(field: &str, value: Decimal) -> EngineResult<()> {
    if value < Decimal::ZERO {
        return Err(EngineError::invalid_input(
            field,
            format!("must not be negative, got {}", value),
        ));
    }
    if value > MAX_QUANTITY {
        return Err(EngineError::invalid_input(
            field,
            format!("must not exceed {}, got {}", MAX_QUANTITY, value),
        ));
    }
    Ok(())
}

/// Cargo and passenger counts for one port call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CargoProfile {
    /// Containers handled, in TEU (EVP).
    #[serde(default)]
    pub teu: Decimal,
    /// Cargo tonnage handled (tonnes).
    #[serde(default)]
    pub tonnage: Decimal,
    /// Passengers embarked or disembarked.
    #[serde(default)]
    pub passengers: u32,
    /// Area occupied in the transit zone (m²).
    #[serde(default)]
    pub storage_area_m2: Decimal,
    /// Time the cargo occupies the transit zone (hours).
    #[serde(default)]
    pub storage_hours: Decimal,
}

/// Represents a vessel call subject to tariff evaluation.
///
/// Created once per evaluation request and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VesselProfile {
    /// Length overall in metres.
    pub length_overall: Decimal,
    /// Beam in metres.
    pub beam: Decimal,
    /// Declared maximum draft in metres.
    pub draft: Decimal,
    /// Gross tonnage.
    pub gross_tonnage: Decimal,
    /// Length of stay in port, in hours.
    pub stay_hours: Decimal,
    /// Number of tugs engaged per movement.
    #[serde(default)]
    pub tug_count: u32,
    /// Number of towed movements.
    #[serde(default)]
    pub movement_count: u32,
    /// Cargo and passenger counts.
    #[serde(default)]
    pub cargo: CargoProfile,
}

impl VesselProfile {
    /// Checks the numeric domain of every field.
    ///
    /// Dimensions and gross tonnage must be strictly positive; stay and cargo
    /// quantities must not be negative. Dimensions are capped at
    /// [`MAX_DIMENSION_M`] and every other quantity at [`MAX_QUANTITY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use port_tariff_engine::models::{CargoProfile, VesselProfile};
    /// use rust_decimal::Decimal;
    ///
    /// let vessel = VesselProfile {
    ///     length_overall: Decimal::new(19094, 2),
    ///     beam: Decimal::new(3220, 2),
    ///     draft: Decimal::new(650, 2),
    ///     gross_tonnage: Decimal::from(22341),
    ///     stay_hours: Decimal::from(30),
    ///     tug_count: 2,
    ///     movement_count: 2,
    ///     cargo: CargoProfile::default(),
    /// };
    /// assert!(vessel.validate().is_ok());
    /// ```
    pub fn validate(&self) -> EngineResult<()> {
        for (field, value, max) in [
            ("length_overall", self.length_overall, MAX_DIMENSION_M),
            ("beam", self.beam, MAX_DIMENSION_M),
            ("draft", self.draft, MAX_DIMENSION_M),
            ("gross_tonnage", self.gross_tonnage, MAX_QUANTITY),
        ] {
            if value <= Decimal::ZERO {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must be greater than zero, got {}", value),
                ));
            }
            if value > max {
                return Err(EngineError::invalid_input(
                    field,
                    format!("must not exceed {}, got {}", max, value),
                ));
            }
        }

        for (field, value) in [
            ("stay_hours", self.stay_hours),
            ("cargo.teu", self.cargo.teu),
            ("cargo.tonnage", self.cargo.tonnage),
            ("cargo.storage_area_m2", self.cargo.storage_area_m2),
            ("cargo.storage_hours", self.cargo.storage_hours),
        ] {
            check_quantity(field, value)?;
        }

        Ok(())
    }
}
