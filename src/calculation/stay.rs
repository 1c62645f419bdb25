//! Stationnement (idle-time) dues.
//!
//! A call is charged nothing during the franchise. The first hours past the
//! franchise are charged a fraction of one day; past that band every started
//! day is charged in full. Long anchorage stays and pure bunkering calls are
//! reduced or exempted according to the regime's [`StayRules`].

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Serialize;

use crate::config::StayRules;
use crate::error::{EngineError, EngineResult};
use crate::models::{AnchorageStay, AuditStep, check_quantity};

const HOURS_PER_DAY: Decimal = Decimal::from_parts(24, 0, 0, false, 0);

/// How the stay was charged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "basis", content = "days")]
pub enum StayCharge {
    /// Within the franchise.
    Franchise,
    /// Within the reduced band just after the franchise.
    ReducedBand,
    /// Every started day past the franchise.
    WholeDays(u32),
    /// Anchorage for bunkering only, within the exempt duration.
    BunkeringExempt,
}

/// The result of a stationnement calculation.
#[derive(Debug, Clone)]
pub struct StationnementResult {
    /// The amount due.
    pub amount: Decimal,
    /// How the stay was charged.
    pub charge: StayCharge,
    /// Hours beyond the franchise (zero inside it).
    pub hours_past_franchise: Decimal,
    /// True when the anchorage reduction was applied.
    pub anchorage_reduced: bool,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// Calculates stationnement dues.
///
/// # Arguments
///
/// * `volume` - Geometric volume (m³)
/// * `rate` - Stationnement rate per m³ and day
/// * `stay_hours` - Total stay in hours
/// * `rules` - The regime's stay rules
/// * `anchorage` - Anchorage stay, if the vessel waited at the anchorage
/// * `step_number` - The step number for audit trail sequencing
///
/// # Errors
///
/// Returns `InvalidInput` for a negative stay, or when a bunkering-only
/// anchorage is reported to a regime without a bunkering exemption.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::calculate_stationnement;
/// use port_tariff_engine::config::StayRules;
/// use rust_decimal::Decimal;
///
/// let rules = StayRules {
///     franchise_hours: Decimal::from(24),
///     reduced_band_hours: Decimal::from(8),
///     reduced_divisor: Decimal::from(3),
///     anchorage_reduction_day: 6,
///     anchorage_reduction_factor: Decimal::new(5, 1),
///     bunkering_exemption_hours: None,
/// };
///
/// // 50 h: 26 h past the franchise, two started days
/// let result = calculate_stationnement(
///     Decimal::from(10000),
///     Decimal::new(551, 4),
///     Decimal::from(50),
///     &rules,
///     None,
///     1,
/// )
/// .unwrap();
/// assert_eq!(result.amount, Decimal::from(1102));
/// ```
pub fn calculate_stationnement(
    volume: Decimal,
    rate: Decimal,
    stay_hours: Decimal,
    rules: &StayRules,
    anchorage: Option<&AnchorageStay>,
    step_number: u32,
) -> EngineResult<StationnementResult> {
    check_quantity("stay_hours", stay_hours)?;

    let bunkering_exempt = match anchorage {
        Some(stay) if stay.bunkering_only => {
            let limit = rules.bunkering_exemption_hours.ok_or_else(|| {
                EngineError::invalid_input(
                    "anchorage.bunkering_only",
                    "this regime has no bunkering exemption",
                )
            })?;
            stay_hours <= limit
        }
        _ => false,
    };

    let hours_past_franchise = (stay_hours - rules.franchise_hours).max(Decimal::ZERO);
    let daily = volume * rate;

    let (base_amount, charge) = if bunkering_exempt {
        (Decimal::ZERO, StayCharge::BunkeringExempt)
    } else if stay_hours <= rules.franchise_hours {
        (Decimal::ZERO, StayCharge::Franchise)
    } else if hours_past_franchise <= rules.reduced_band_hours {
        (daily / rules.reduced_divisor, StayCharge::ReducedBand)
    } else {
        let days = (hours_past_franchise / HOURS_PER_DAY).ceil();
        let count = days.to_u32().unwrap_or(u32::MAX);
        (daily * days, StayCharge::WholeDays(count))
    };

    let anchorage_reduced = matches!(
        anchorage,
        Some(stay) if stay.day_reached >= rules.anchorage_reduction_day
    ) && base_amount > Decimal::ZERO;
    let amount = if anchorage_reduced {
        base_amount * rules.anchorage_reduction_factor
    } else {
        base_amount
    };

    let mut reasoning = match charge {
        StayCharge::Franchise => format!(
            "Stay of {} h is within the {} h franchise",
            stay_hours.normalize(),
            rules.franchise_hours.normalize()
        ),
        StayCharge::BunkeringExempt => format!(
            "Bunkering-only anchorage of {} h is exempt",
            stay_hours.normalize()
        ),
        StayCharge::ReducedBand => format!(
            "{} h past the franchise: {} × {} / {} = {}",
            hours_past_franchise.normalize(),
            volume.round_dp(2),
            rate.normalize(),
            rules.reduced_divisor.normalize(),
            base_amount.round_dp(4)
        ),
        StayCharge::WholeDays(days) => format!(
            "{} h past the franchise: {} started day(s) × {} × {} = {}",
            hours_past_franchise.normalize(),
            days,
            volume.round_dp(2),
            rate.normalize(),
            base_amount.round_dp(4)
        ),
    };
    if anchorage_reduced {
        reasoning.push_str(&format!(
            "; anchorage day {} reached, × {}",
            rules.anchorage_reduction_day,
            rules.anchorage_reduction_factor.normalize()
        ));
    }

    let audit_step = AuditStep {
        step_number,
        rule_id: "stationnement".to_string(),
        rule_name: "Stationnement".to_string(),
        tariff_ref: "Stationnement".to_string(),
        input: serde_json::json!({
            "volume": volume.to_string(),
            "rate": rate.to_string(),
            "stay_hours": stay_hours.to_string(),
            "anchorage_day": anchorage.map(|a| a.day_reached),
            "bunkering_only": anchorage.is_some_and(|a| a.bunkering_only)
        }),
        output: serde_json::json!({
            "amount": amount.to_string(),
            "charge": charge,
            "anchorage_reduced": anchorage_reduced
        }),
        reasoning,
    };

    Ok(StationnementResult {
        amount,
        charge,
        hours_past_franchise,
        anchorage_reduced,
        audit_step,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_tanger_med_rules() -> StayRules {
        StayRules {
            franchise_hours: dec("24"),
            reduced_band_hours: dec("8"),
            reduced_divisor: dec("3"),
            anchorage_reduction_day: 6,
            anchorage_reduction_factor: dec("0.5"),
            bunkering_exemption_hours: Some(dec("48")),
        }
    }

    fn create_nador_rules() -> StayRules {
        StayRules {
            anchorage_reduction_day: 5,
            bunkering_exemption_hours: None,
            ..create_tanger_med_rules()
        }
    }

    fn stay(hours: &str) -> StationnementResult {
        calculate_stationnement(
            dec("10000"),
            dec("0.0551"),
            dec(hours),
            &create_tanger_med_rules(),
            None,
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_franchise_is_free() {
        let result = stay("24");
        assert_eq!(result.amount, Decimal::ZERO);
        assert_eq!(result.charge, StayCharge::Franchise);
    }

    #[test]
    fn test_thirty_hours_is_one_third_day() {
        let result = stay("30");
        assert_eq!(result.charge, StayCharge::ReducedBand);
        assert_eq!(result.amount, dec("551") / dec("3"));
    }

    #[test]
    fn test_end_of_reduced_band_is_still_reduced() {
        let result = stay("32");
        assert_eq!(result.charge, StayCharge::ReducedBand);
    }

    #[test]
    fn test_just_past_reduced_band_is_a_full_day() {
        let result = stay("32.5");
        assert_eq!(result.charge, StayCharge::WholeDays(1));
        assert_eq!(result.amount, dec("551"));
    }

    #[test]
    fn test_fifty_hours_is_two_days() {
        let result = stay("50");
        assert_eq!(result.charge, StayCharge::WholeDays(2));
        assert_eq!(result.amount, dec("1102"));
        assert_eq!(result.hours_past_franchise, dec("26"));
    }

    #[test]
    fn test_anchorage_reduction_from_configured_day() {
        let rules = create_tanger_med_rules();
        let day_five = AnchorageStay {
            day_reached: 5,
            bunkering_only: false,
        };
        let day_six = AnchorageStay {
            day_reached: 6,
            bunkering_only: false,
        };

        let before = calculate_stationnement(
            dec("10000"), dec("0.0551"), dec("50"), &rules, Some(&day_five), 1,
        )
        .unwrap();
        let after = calculate_stationnement(
            dec("10000"), dec("0.0551"), dec("50"), &rules, Some(&day_six), 1,
        )
        .unwrap();

        assert!(!before.anchorage_reduced);
        assert_eq!(before.amount, dec("1102"));
        assert!(after.anchorage_reduced);
        assert_eq!(after.amount, dec("551"));
    }

    #[test]
    fn test_nador_reduces_from_day_five() {
        let day_five = AnchorageStay {
            day_reached: 5,
            bunkering_only: false,
        };
        let result = calculate_stationnement(
            dec("10000"), dec("0.053"), dec("50"), &create_nador_rules(), Some(&day_five), 1,
        )
        .unwrap();

        assert!(result.anchorage_reduced);
        assert_eq!(result.amount, dec("530"));
    }

    #[test]
    fn test_bunkering_within_limit_is_exempt() {
        let bunkering = AnchorageStay {
            day_reached: 2,
            bunkering_only: true,
        };
        let result = calculate_stationnement(
            dec("10000"), dec("0.0551"), dec("40"), &create_tanger_med_rules(), Some(&bunkering), 1,
        )
        .unwrap();

        assert_eq!(result.charge, StayCharge::BunkeringExempt);
        assert_eq!(result.amount, Decimal::ZERO);
    }

    #[test]
    fn test_bunkering_beyond_limit_is_charged() {
        let bunkering = AnchorageStay {
            day_reached: 3,
            bunkering_only: true,
        };
        let result = calculate_stationnement(
            dec("10000"), dec("0.0551"), dec("50"), &create_tanger_med_rules(), Some(&bunkering), 1,
        )
        .unwrap();

        assert_eq!(result.charge, StayCharge::WholeDays(2));
        assert_eq!(result.amount, dec("1102"));
    }

    #[test]
    fn test_bunkering_flag_rejected_without_rule() {
        let bunkering = AnchorageStay {
            day_reached: 1,
            bunkering_only: true,
        };
        let result = calculate_stationnement(
            dec("10000"), dec("0.053"), dec("40"), &create_nador_rules(), Some(&bunkering), 1,
        );

        match result {
            Err(EngineError::InvalidInput { field, .. }) => {
                assert_eq!(field, "anchorage.bunkering_only");
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_stay_is_rejected() {
        let result = calculate_stationnement(
            dec("10000"), dec("0.0551"), dec("-1"), &create_tanger_med_rules(), None, 1,
        );
        assert!(matches!(result, Err(EngineError::InvalidInput { .. })));
    }

    #[test]
    fn test_audit_step_records_days() {
        let result = stay("50");
        assert_eq!(result.audit_step.rule_id, "stationnement");
        assert_eq!(result.audit_step.output["charge"]["basis"], "whole_days");
        assert_eq!(result.audit_step.output["charge"]["days"], 2);
    }
}
