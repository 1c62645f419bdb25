//! Tiered rate resolution.
//!
//! Resolves a size metric (geometric volume, gross tonnage) against a
//! [`TierTable`]:
//!
//! 1. inside the primary range: the rate of the bracket whose upper bound is
//!    the first one at or above the metric;
//! 2. above the primary range (and below the secondary range, if any): the
//!    last primary rate plus one supplement per started `unit_size`;
//! 3. inside the secondary range: the matching secondary bracket;
//! 4. above the secondary range: the last secondary rate plus the secondary
//!    supplement per started `unit_size`;
//! 5. below the first bracket: the first bracket's rate, with a warning.
//!
//! The step from the extrapolated primary rate to the first secondary rate
//! can go down. That is how the tariff books are published and is reproduced
//! as-is.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::config::{Bracket, TierRange, TierTable};
use crate::error::{EngineError, EngineResult};
use crate::models::{AuditStep, AuditWarning};

/// How a rate was obtained from a tier table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TierResolution {
    /// A bracket of the primary range.
    Primary,
    /// Extrapolated beyond the primary range.
    PrimarySupplement,
    /// A bracket of the secondary range.
    Secondary,
    /// Extrapolated beyond the secondary range.
    SecondarySupplement,
    /// Metric below the first bracket; the first bracket's rate is used.
    BelowFirstBracket,
}

/// The result of a tier lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct TierRateResult {
    /// The resolved rate.
    pub rate: Decimal,
    /// How the rate was obtained.
    pub resolution: TierResolution,
    /// Started supplement increments added (zero for bracket hits).
    pub increments: Decimal,
    /// Set when the below-first-bracket fallback was used.
    pub warning: Option<AuditWarning>,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

/// Resolves a metric against a tier table.
///
/// # Errors
///
/// Returns `UnresolvedBracket` when the metric lies beyond a range that has
/// no supplement rule.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::{resolve_tier_rate, TierResolution};
/// use port_tariff_engine::config::{Bracket, Supplement, TierRange, TierTable};
/// use rust_decimal::Decimal;
///
/// let table = TierTable {
///     name: "towage".to_string(),
///     primary: TierRange {
///         brackets: vec![
///             Bracket {
///                 lower: Decimal::ZERO,
///                 upper: Decimal::from(1000),
///                 rate: Decimal::new(3392, 1),
///             },
///             Bracket {
///                 lower: Decimal::from(1001),
///                 upper: Decimal::from(2000),
///                 rate: Decimal::new(4108, 1),
///             },
///         ],
///         supplement: Some(Supplement {
///             unit_size: Decimal::from(500),
///             rate: Decimal::from(50),
///         }),
///     },
///     secondary: None,
/// };
///
/// let result = resolve_tier_rate(Decimal::from(2600), &table, 1).unwrap();
/// assert_eq!(result.resolution, TierResolution::PrimarySupplement);
/// assert_eq!(result.rate, Decimal::new(5108, 1)); // 410.8 + 2 × 50
/// ```
pub fn resolve_tier_rate(
    metric: Decimal,
    table: &TierTable,
    step_number: u32,
) -> EngineResult<TierRateResult> {
    let primary = &table.primary;
    let mut warning = None;

    let (rate, resolution, increments) = if metric < primary.lower() {
        let first = first_bracket(primary, table, metric)?;
        warn!(
            table = %table.name,
            metric = %metric,
            "Metric below the first bracket, using the first bracket rate"
        );
        warning = Some(AuditWarning {
            code: "BELOW_FIRST_BRACKET".to_string(),
            message: format!(
                "Metric {} is below the first bracket of '{}' ({}); its rate {} was used",
                metric, table.name, first.lower, first.rate
            ),
            severity: "medium".to_string(),
        });
        (first.rate, TierResolution::BelowFirstBracket, Decimal::ZERO)
    } else if metric <= primary.upper() {
        let bracket = find_bracket(primary, table, metric)?;
        (bracket.rate, TierResolution::Primary, Decimal::ZERO)
    } else {
        match &table.secondary {
            Some(secondary) if metric >= secondary.lower() => {
                if metric <= secondary.upper() {
                    let bracket = find_bracket(secondary, table, metric)?;
                    (bracket.rate, TierResolution::Secondary, Decimal::ZERO)
                } else {
                    let (rate, increments) = extrapolate(secondary, table, metric)?;
                    (rate, TierResolution::SecondarySupplement, increments)
                }
            }
            _ => {
                let (rate, increments) = extrapolate(primary, table, metric)?;
                (rate, TierResolution::PrimarySupplement, increments)
            }
        }
    };

    let reasoning = match resolution {
        TierResolution::PrimarySupplement | TierResolution::SecondarySupplement => format!(
            "Metric {} exceeds the last bracket of '{}'; {} started increment(s) added: rate {}",
            metric.round_dp(2),
            table.name,
            increments,
            rate.normalize()
        ),
        TierResolution::BelowFirstBracket => format!(
            "Metric {} is below the first bracket of '{}'; first bracket rate {} used",
            metric.round_dp(2),
            table.name,
            rate.normalize()
        ),
        TierResolution::Primary | TierResolution::Secondary => format!(
            "Metric {} falls in a bracket of '{}': rate {}",
            metric.round_dp(2),
            table.name,
            rate.normalize()
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "tier_lookup".to_string(),
        rule_name: "Tier Rate Lookup".to_string(),
        tariff_ref: table.name.clone(),
        input: serde_json::json!({
            "table": table.name,
            "metric": metric.to_string()
        }),
        output: serde_json::json!({
            "rate": rate.normalize().to_string(),
            "resolution": resolution,
            "increments": increments.to_string()
        }),
        reasoning,
    };

    Ok(TierRateResult {
        rate,
        resolution,
        increments,
        warning,
        audit_step,
    })
}

fn unresolved(table: &TierTable, metric: Decimal) -> EngineError {
    EngineError::UnresolvedBracket {
        table: table.name.clone(),
        metric: metric.to_string(),
    }
}

fn first_bracket<'a>(
    range: &'a TierRange,
    table: &TierTable,
    metric: Decimal,
) -> EngineResult<&'a Bracket> {
    range.brackets.first().ok_or_else(|| unresolved(table, metric))
}

/// Brackets are contiguous, so the first upper bound at or above the metric wins.
fn find_bracket<'a>(
    range: &'a TierRange,
    table: &TierTable,
    metric: Decimal,
) -> EngineResult<&'a Bracket> {
    range
        .brackets
        .iter()
        .find(|b| metric <= b.upper)
        .ok_or_else(|| unresolved(table, metric))
}

fn extrapolate(
    range: &TierRange,
    table: &TierTable,
    metric: Decimal,
) -> EngineResult<(Decimal, Decimal)> {
    let supplement = range
        .supplement
        .as_ref()
        .ok_or_else(|| unresolved(table, metric))?;
    let last = range
        .brackets
        .last()
        .ok_or_else(|| unresolved(table, metric))?;

    let increments = ((metric - last.upper) / supplement.unit_size).ceil();
    Ok((last.rate + increments * supplement.rate, increments))
}
