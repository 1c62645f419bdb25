//! Geometric volume calculation.
//!
//! The geometric volume (VG) is the billing basis of the Moroccan vessel dues
//! and of Tanger Med pilotage:
//!
//! ```text
//! VG = length × beam × max(draft, 0.14 × √(length × beam))
//! ```
//!
//! The `0.14 × √(length × beam)` term is a minimum draft: below it the
//! declared draft has no effect on the volume.

use rust_decimal::{Decimal, MathematicalOps};

use crate::error::{EngineError, EngineResult};
use crate::models::AuditStep;

/// Coefficient of the minimum draft formula.
pub const DRAFT_FLOOR_COEFFICIENT: Decimal = Decimal::from_parts(14, 0, 0, false, 2);

/// The result of a geometric volume calculation.
#[derive(Debug, Clone)]
pub struct GeometricVolumeResult {
    /// The geometric volume in m³.
    pub volume: Decimal,
    /// The draft actually used (declared draft or floor).
    pub effective_draft: Decimal,
    /// The minimum draft computed from length and beam.
    pub draft_floor: Decimal,
    /// True when the floor replaced the declared draft.
    pub floor_applied: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Computes the geometric volume of a vessel.
///
/// # Arguments
///
/// * `length` - Length overall (m)
/// * `beam` - Beam (m)
/// * `draft` - Declared draft (m)
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidInput` when any dimension is zero or negative, or when the
/// volume does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::calculate_geometric_volume;
/// use rust_decimal::Decimal;
///
/// // 200 × 30 × max(14, 0.14 × √6000 ≈ 10.84) = 84 000 m³
/// let result = calculate_geometric_volume(
///     Decimal::from(200),
///     Decimal::from(30),
///     Decimal::from(14),
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.volume, Decimal::from(84000));
/// assert!(!result.floor_applied);
/// ```
pub fn calculate_geometric_volume(
    length: Decimal,
    beam: Decimal,
    draft: Decimal,
    step_number: u32,
) -> EngineResult<GeometricVolumeResult> {
    for (field, value) in [("length_overall", length), ("beam", beam), ("draft", draft)] {
        if value <= Decimal::ZERO {
            return Err(EngineError::invalid_input(
                field,
                format!("must be greater than zero, got {}", value),
            ));
        }
    }

    let footprint = length.checked_mul(beam).ok_or_else(|| out_of_range(length, beam))?;
    let root = footprint.sqrt().ok_or_else(|| {
        EngineError::invalid_input(
            "length_overall",
            format!("cannot take the square root of {}", footprint),
        )
    })?;
    let draft_floor = DRAFT_FLOOR_COEFFICIENT * root;

    let floor_applied = draft < draft_floor;
    let effective_draft = if floor_applied { draft_floor } else { draft };
    let volume = footprint
        .checked_mul(effective_draft)
        .ok_or_else(|| out_of_range(length, beam))?;

    let reasoning = if floor_applied {
        format!(
            "Declared draft {} m is below the floor 0.14 × √({} × {}) = {} m; \
             VG = {} × {} × {} = {} m³",
            draft.normalize(),
            length.normalize(),
            beam.normalize(),
            draft_floor.round_dp(4),
            length.normalize(),
            beam.normalize(),
            draft_floor.round_dp(4),
            volume.round_dp(2)
        )
    } else {
        format!(
            "VG = {} × {} × {} = {} m³",
            length.normalize(),
            beam.normalize(),
            draft.normalize(),
            volume.normalize()
        )
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "geometric_volume".to_string(),
        rule_name: "Geometric Volume".to_string(),
        tariff_ref: "VG = L × B × max(Te, 0.14√(L × B))".to_string(),
        input: serde_json::json!({
            "length_overall": length.normalize().to_string(),
            "beam": beam.normalize().to_string(),
            "draft": draft.normalize().to_string()
        }),
        output: serde_json::json!({
            "volume": volume.to_string(),
            "effective_draft": effective_draft.to_string(),
            "draft_floor": draft_floor.to_string(),
            "floor_applied": floor_applied
        }),
        reasoning,
    };

    Ok(GeometricVolumeResult {
        volume,
        effective_draft,
        draft_floor,
        floor_applied,
        audit_step,
    })
}

fn out_of_range(length: Decimal, beam: Decimal) -> EngineError {
    EngineError::invalid_input(
        "length_overall",
        format!("volume of a {} m × {} m hull is out of range", length, beam),
    )
}
