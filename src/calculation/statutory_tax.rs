//! Algeciras statutory port taxes.
//!
//! Every category is priced with the same composition:
//!
//! ```text
//! amount = metric × base × utilization × max(frequency − adjustment, 0) × special × bonus
//! ```
//!
//! where the metric depends on the category:
//!
//! | Category | Metric |
//! |----------|--------|
//! | T0 | GT / 100 |
//! | T1 | GT / 100 × stay hours |
//! | T2 | passengers |
//! | T3 | tonnes (base rate by product group) |
//! | T6 | m² × Σ band coefficient over billable days |
//!
//! Every category carries a coefficient entry; a map inside it the category
//! does not publish counts as 1. The regular-service adjustment only applies
//! to categories with a frequency map.

use std::collections::HashMap;
use std::hash::Hash;

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::config::{AlgecirasSchedule, StorageRules};
use crate::error::{EngineError, EngineResult};
use crate::models::{AlgecirasSelection, AuditStep, TaxCategory, VesselProfile};

const REGIME: &str = "algeciras";
const HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// The coefficients used for one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppliedCoefficients {
    /// Utilization coefficient.
    pub utilization: Decimal,
    /// Frequency coefficient after the regular-service adjustment.
    pub frequency: Decimal,
    /// Special reduction coefficient.
    pub special_reduction: Decimal,
    /// Bonus coefficient.
    pub bonus: Decimal,
}

impl AppliedCoefficients {
    /// Product of all coefficients.
    pub fn product(&self) -> Decimal {
        self.utilization * self.frequency * self.special_reduction * self.bonus
    }
}

/// The result of one statutory tax category.
#[derive(Debug, Clone)]
pub struct StatutoryTaxResult {
    /// The category.
    pub category: TaxCategory,
    /// The category's metric.
    pub metric: Decimal,
    /// The base unit rate.
    pub base_rate: Decimal,
    /// The coefficients applied.
    pub coefficients: AppliedCoefficients,
    /// The amount due.
    pub amount: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates one Algeciras tax category.
///
/// # Errors
///
/// * `UnknownSchedule` when the base rate, product group, coefficient entry,
///   or a coefficient for the selected class is missing from a published map
/// * `InvalidInput` when T3 is requested without a product group
pub fn calculate_statutory_tax(
    schedule: &AlgecirasSchedule,
    category: TaxCategory,
    selection: &AlgecirasSelection,
    vessel: &VesselProfile,
    step_number: u32,
) -> EngineResult<StatutoryTaxResult> {
    let hundred = Decimal::ONE_HUNDRED;
    let cargo = &vessel.cargo;

    let base_rate = match category {
        TaxCategory::T3 => {
            let group = selection.cargo_group.as_deref().ok_or_else(|| {
                EngineError::invalid_input("algeciras.cargo_group", "required for the T3 cargo tax")
            })?;
            *schedule.cargo_groups.get(group).ok_or_else(|| {
                EngineError::unknown_schedule(REGIME, format!("cargo_groups.{}", group))
            })?
        }
        _ => *schedule.base_rates.get(&category).ok_or_else(|| {
            EngineError::unknown_schedule(REGIME, format!("base_rates.{}", category.code()))
        })?,
    };

    let (metric, metric_note) = match category {
        TaxCategory::T0 => (
            vessel.gross_tonnage / hundred,
            format!("{} GT / 100", vessel.gross_tonnage.normalize()),
        ),
        TaxCategory::T1 => (
            vessel.gross_tonnage / hundred * vessel.stay_hours,
            format!(
                "{} GT / 100 × {} h",
                vessel.gross_tonnage.normalize(),
                vessel.stay_hours.normalize()
            ),
        ),
        TaxCategory::T2 => (
            Decimal::from(cargo.passengers),
            format!("{} passengers", cargo.passengers),
        ),
        TaxCategory::T3 => (cargo.tonnage, format!("{} t", cargo.tonnage.normalize())),
        TaxCategory::T6 => {
            let (days, weight) = storage_weight(
                &schedule.storage,
                cargo.storage_hours,
                selection.rolling_cargo,
            );
            (
                cargo.storage_area_m2 * weight,
                format!(
                    "{} m² × {} ({} billable day(s))",
                    cargo.storage_area_m2.normalize(),
                    weight,
                    days
                ),
            )
        }
    };

    let code = category.code();
    let set = schedule.coefficients.get(&category).ok_or_else(|| {
        EngineError::unknown_schedule(REGIME, format!("coefficients.{}", code))
    })?;

    let utilization = lookup(set.utilization.as_ref(), selection.concession, code, "utilization")?;
    let raw_frequency = lookup(set.frequency.as_ref(), selection.frequency, code, "frequency")?;
    let frequency = if selection.regular_service && set.frequency.is_some() {
        (raw_frequency - schedule.regular_service_adjustment).max(Decimal::ZERO)
    } else {
        raw_frequency
    };
    let special_reduction = lookup(
        set.special_reduction.as_ref(),
        selection.special_reduction,
        code,
        "special_reduction",
    )?;
    let bonus = lookup(set.bonus.as_ref(), selection.bonus, code, "bonus")?;

    let coefficients = AppliedCoefficients {
        utilization,
        frequency,
        special_reduction,
        bonus,
    };
    let amount = metric * base_rate * coefficients.product();

    let audit_step = AuditStep {
        step_number,
        rule_id: format!("statutory_tax_{}", code.to_lowercase()),
        rule_name: format!("Algeciras {}", code),
        tariff_ref: format!("Tasa {}", code),
        input: serde_json::json!({
            "metric": metric.to_string(),
            "base_rate": base_rate.to_string(),
            "regular_service": selection.regular_service
        }),
        output: serde_json::json!({
            "coefficients": coefficients,
            "amount": amount.to_string()
        }),
        reasoning: format!(
            "{} = {}; × {} × {} × {} × {} × {} = {}",
            metric_note,
            metric.round_dp(4),
            base_rate.normalize(),
            utilization.normalize(),
            frequency.normalize(),
            special_reduction.normalize(),
            bonus.normalize(),
            amount.round_dp(4)
        ),
    };

    Ok(StatutoryTaxResult {
        category,
        metric,
        base_rate,
        coefficients,
        amount,
        audit_step,
    })
}

/// Returns the number of billable storage days and the sum of their band coefficients.
///
/// Each billable day is weighted by the band it falls in.
pub fn storage_weight(
    rules: &StorageRules,
    storage_hours: Decimal,
    rolling_cargo: bool,
) -> (u32, Decimal) {
    let franchise = if rolling_cargo {
        rules.rolling_franchise_hours
    } else {
        rules.standard_franchise_hours
    };
    let billable_hours = (storage_hours - franchise).max(Decimal::ZERO);
    let days = (billable_hours / HOURS_PER_DAY)
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX);

    let weight = rules
        .bands
        .iter()
        .filter(|band| band.from_day <= days)
        .map(|band| {
            let last = band.to_day.map_or(days, |to| to.min(days));
            Decimal::from(last - band.from_day + 1) * band.coefficient
        })
        .sum();

    (days, weight)
}

fn lookup<K>(
    map: Option<&HashMap<K, Decimal>>,
    key: K,
    code: &str,
    name: &str,
) -> EngineResult<Decimal>
where
    K: Eq + Hash + Serialize,
{
    let Some(map) = map else {
        return Ok(Decimal::ONE);
    };
    map.get(&key).copied().ok_or_else(|| {
        let selector = serde_json::to_value(&key)
            .ok()
            .and_then(|v| v.as_str().map(str::to_owned))
            .unwrap_or_default();
        EngineError::unknown_schedule(
            REGIME,
            format!("coefficients.{}.{}.{}", code, name, selector),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CoefficientSet, StorageBand};
    use crate::models::{
        BonusClass, CargoProfile, ConcessionType, FrequencyBand, SpecialReduction,
    };
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_schedule() -> AlgecirasSchedule {
        let t1 = CoefficientSet {
            utilization: Some(HashMap::from([
                (ConcessionType::PublicBerth, dec("1.20")),
                (ConcessionType::ConcessionedTerminal, dec("0.80")),
            ])),
            frequency: Some(HashMap::from([
                (FrequencyBand::Occasional, dec("1.00")),
                (FrequencyBand::Low, dec("0.90")),
                (FrequencyBand::Medium, dec("0.80")),
                (FrequencyBand::High, dec("0.70")),
            ])),
            special_reduction: Some(HashMap::from([
                (SpecialReduction::None, dec("1.00")),
                (SpecialReduction::Transhipment, dec("0.80")),
            ])),
            bonus: None,
        };

        AlgecirasSchedule {
            base_rates: HashMap::from([
                (TaxCategory::T0, dec("0.29")),
                (TaxCategory::T1, dec("1.43")),
                (TaxCategory::T2, dec("3.20")),
                (TaxCategory::T6, dec("0.018")),
            ]),
            cargo_groups: HashMap::from([("group_3".to_string(), dec("2.49"))]),
            coefficients: HashMap::from([
                (TaxCategory::T0, CoefficientSet::default()),
                (TaxCategory::T1, t1),
                (TaxCategory::T2, CoefficientSet::default()),
                (TaxCategory::T3, CoefficientSet::default()),
                (TaxCategory::T6, CoefficientSet::default()),
            ]),
            regular_service_adjustment: dec("0.05"),
            storage: StorageRules {
                rolling_franchise_hours: dec("4"),
                standard_franchise_hours: dec("48"),
                bands: vec![
                    StorageBand { from_day: 1, to_day: Some(4), coefficient: dec("1") },
                    StorageBand { from_day: 5, to_day: Some(10), coefficient: dec("2") },
                    StorageBand { from_day: 11, to_day: Some(30), coefficient: dec("4") },
                    StorageBand { from_day: 31, to_day: None, coefficient: dec("8") },
                ],
            },
        }
    }

    fn create_vessel() -> VesselProfile {
        VesselProfile {
            length_overall: dec("190.94"),
            beam: dec("32.20"),
            draft: dec("6.50"),
            gross_tonnage: dec("22341"),
            stay_hours: dec("30"),
            tug_count: 2,
            movement_count: 2,
            cargo: CargoProfile {
                teu: Decimal::ZERO,
                tonnage: dec("12000"),
                passengers: 450,
                storage_area_m2: dec("1000"),
                storage_hours: dec("100"),
            },
        }
    }

    fn create_selection() -> AlgecirasSelection {
        AlgecirasSelection {
            categories: vec![TaxCategory::T1],
            concession: ConcessionType::PublicBerth,
            frequency: FrequencyBand::Low,
            regular_service: false,
            special_reduction: SpecialReduction::None,
            bonus: BonusClass::None,
            cargo_group: Some("group_3".to_string()),
            rolling_cargo: false,
        }
    }

    #[test]
    fn test_t0_without_coefficients() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T0, &create_selection(), &create_vessel(), 1,
        )
        .unwrap();

        assert_eq!(result.metric, dec("223.41"));
        assert_eq!(result.coefficients.product(), Decimal::ONE);
        assert_eq!(result.amount, dec("64.7889"));
    }

    #[test]
    fn test_t1_composes_coefficients() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T1, &create_selection(), &create_vessel(), 1,
        )
        .unwrap();

        // 223.41 × 30 × 1.43 × 1.20 × 0.90
        assert_eq!(result.metric, dec("6702.3"));
        assert_eq!(result.amount, dec("10351.03212"));
    }

    #[test]
    fn test_regular_service_lowers_frequency() {
        let mut selection = create_selection();
        selection.regular_service = true;

        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T1, &selection, &create_vessel(), 1,
        )
        .unwrap();

        assert_eq!(result.coefficients.frequency, dec("0.85"));
    }

    #[test]
    fn test_regular_service_ignored_without_frequency_map() {
        let mut selection = create_selection();
        selection.regular_service = true;

        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T0, &selection, &create_vessel(), 1,
        )
        .unwrap();

        assert_eq!(result.coefficients.frequency, Decimal::ONE);
    }

    #[test]
    fn test_adjusted_frequency_is_clamped_at_zero() {
        let mut schedule = create_schedule();
        schedule.regular_service_adjustment = dec("2");
        let mut selection = create_selection();
        selection.regular_service = true;

        let result = calculate_statutory_tax(
            &schedule, TaxCategory::T1, &selection, &create_vessel(), 1,
        )
        .unwrap();

        assert_eq!(result.coefficients.frequency, Decimal::ZERO);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_missing_coefficient_in_published_map() {
        let mut selection = create_selection();
        selection.special_reduction = SpecialReduction::Cruise;

        match calculate_statutory_tax(
            &create_schedule(), TaxCategory::T1, &selection, &create_vessel(), 1,
        ) {
            Err(EngineError::UnknownSchedule { regime, key }) => {
                assert_eq!(regime, "algeciras");
                assert_eq!(key, "coefficients.T1.special_reduction.cruise");
            }
            other => panic!("Expected UnknownSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_coefficient_entry_is_an_error() {
        let mut schedule = create_schedule();
        schedule.coefficients.remove(&TaxCategory::T6);

        match calculate_statutory_tax(
            &schedule, TaxCategory::T6, &create_selection(), &create_vessel(), 1,
        ) {
            Err(EngineError::UnknownSchedule { regime, key }) => {
                assert_eq!(regime, "algeciras");
                assert_eq!(key, "coefficients.T6");
            }
            other => panic!("Expected UnknownSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_t3_uses_product_group() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T3, &create_selection(), &create_vessel(), 1,
        )
        .unwrap();

        assert_eq!(result.base_rate, dec("2.49"));
        assert_eq!(result.amount, dec("29880"));
    }

    #[test]
    fn test_t3_unknown_group() {
        let mut selection = create_selection();
        selection.cargo_group = Some("group_9".to_string());

        match calculate_statutory_tax(
            &create_schedule(), TaxCategory::T3, &selection, &create_vessel(), 1,
        ) {
            Err(EngineError::UnknownSchedule { key, .. }) => {
                assert_eq!(key, "cargo_groups.group_9")
            }
            other => panic!("Expected UnknownSchedule, got {:?}", other),
        }
    }

    #[test]
    fn test_t3_without_group_is_invalid() {
        let mut selection = create_selection();
        selection.cargo_group = None;

        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T3, &selection, &create_vessel(), 1,
        );
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_storage_weight_is_progressive() {
        let rules = create_schedule().storage;

        // 100 h - 48 h franchise = 52 h -> 3 days, all in the first band
        assert_eq!(storage_weight(&rules, dec("100"), false), (3, dec("3")));
        // 4 h franchise: 96 h -> 4 days
        assert_eq!(storage_weight(&rules, dec("100"), true), (4, dec("4")));
        // 12 days: 4 × 1 + 6 × 2 + 2 × 4
        assert_eq!(storage_weight(&rules, dec("336"), false), (12, dec("24")));
        // 32 days: 4 + 12 + 80 + 2 × 8
        assert_eq!(storage_weight(&rules, dec("816"), false), (32, dec("112")));
    }

    #[test]
    fn test_storage_within_franchise_is_free() {
        let rules = create_schedule().storage;
        assert_eq!(storage_weight(&rules, dec("48"), false), (0, Decimal::ZERO));
    }

    #[test]
    fn test_t6_storage_amount() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T6, &create_selection(), &create_vessel(), 1,
        )
        .unwrap();

        // 1000 m² × 3 × 0.018
        assert_eq!(result.metric, dec("3000"));
        assert_eq!(result.amount, dec("54"));
    }

    #[test]
    fn test_t2_passengers() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T2, &create_selection(), &create_vessel(), 1,
        )
        .unwrap();
        assert_eq!(result.amount, dec("1440"));
    }

    #[test]
    fn test_audit_step_names_category() {
        let result = calculate_statutory_tax(
            &create_schedule(), TaxCategory::T1, &create_selection(), &create_vessel(), 6,
        )
        .unwrap();

        assert_eq!(result.audit_step.step_number, 6);
        assert_eq!(result.audit_step.rule_id, "statutory_tax_t1");
        assert_eq!(result.audit_step.output["coefficients"]["frequency"], "0.90");
    }
}
