//! Totals and cross-regime comparison.

use rust_decimal::Decimal;

use crate::models::{AuditTrace, FeeLine, Port, RegimeBreakdown, RegimeDelta};

const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Sums the amounts of a list of fee lines.
pub fn total_of(lines: &[FeeLine]) -> Decimal {
    lines.iter().map(|line| line.amount).sum()
}

/// Builds a regime breakdown, computing its total.
pub fn build_breakdown(
    port: Port,
    lines: Vec<FeeLine>,
    audit_trace: AuditTrace,
) -> RegimeBreakdown {
    let total = total_of(&lines);
    RegimeBreakdown {
        port,
        lines,
        total,
        audit_trace,
    }
}

/// Compares two totals.
///
/// `delta_percent` is `(other − reference) / reference × 100`, and `None`
/// when the reference total is zero.
///
/// # Examples
///
/// ```
/// use port_tariff_engine::calculation::compare_totals;
/// use port_tariff_engine::models::Port;
/// use rust_decimal::Decimal;
///
/// let delta = compare_totals(
///     Port::TangerMed,
///     Decimal::from(1000),
///     Port::NadorWestMed,
///     Decimal::from(850),
/// );
/// assert_eq!(delta.delta_percent, Some(Decimal::from(-15)));
/// ```
pub fn compare_totals(
    reference: Port,
    reference_total: Decimal,
    other: Port,
    other_total: Decimal,
) -> RegimeDelta {
    let difference = other_total - reference_total;
    let delta_percent = if reference_total.is_zero() {
        None
    } else {
        Some(difference / reference_total * HUNDRED)
    };

    RegimeDelta {
        reference,
        other,
        difference,
        delta_percent,
    }
}

/// Compares every breakdown against the reference port's breakdown.
///
/// Returns an empty list when the reference port was not evaluated.
pub fn compare_breakdowns(breakdowns: &[RegimeBreakdown], reference: Port) -> Vec<RegimeDelta> {
    let Some(reference_breakdown) = breakdowns.iter().find(|b| b.port == reference) else {
        return Vec::new();
    };

    breakdowns
        .iter()
        .filter(|b| b.port != reference)
        .map(|b| compare_totals(reference, reference_breakdown.total, b.port, b.total))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FeeCategory;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn line(port: Port, amount: &str) -> FeeLine {
        FeeLine {
            category: FeeCategory::Pilotage,
            port,
            label: "test".to_string(),
            amount: dec(amount),
        }
    }

    #[test]
    fn test_total_sums_lines() {
        let lines = vec![
            line(Port::TangerMed, "317.0"),
            line(Port::TangerMed, "215.7"),
            line(Port::TangerMed, "0"),
        ];
        assert_eq!(total_of(&lines), dec("532.7"));
        assert_eq!(total_of(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_delta_minus_fifteen_percent() {
        let delta = compare_totals(Port::TangerMed, dec("1000"), Port::NadorWestMed, dec("850"));

        assert_eq!(delta.difference, dec("-150"));
        assert_eq!(delta.delta_percent, Some(dec("-15")));
        assert_eq!(delta.display_percent(), "-15.0%");
    }

    #[test]
    fn test_zero_reference_is_not_applicable() {
        let delta = compare_totals(Port::TangerMed, Decimal::ZERO, Port::Algeciras, dec("500"));

        assert_eq!(delta.delta_percent, None);
        assert_eq!(delta.display_percent(), "n/a");
    }

    #[test]
    fn test_compare_breakdowns_skips_reference() {
        let breakdowns = vec![
            build_breakdown(
                Port::TangerMed,
                vec![line(Port::TangerMed, "1000")],
                AuditTrace::default(),
            ),
            build_breakdown(
                Port::NadorWestMed,
                vec![line(Port::NadorWestMed, "850")],
                AuditTrace::default(),
            ),
            build_breakdown(
                Port::Algeciras,
                vec![line(Port::Algeciras, "1200")],
                AuditTrace::default(),
            ),
        ];

        let deltas = compare_breakdowns(&breakdowns, Port::TangerMed);

        assert_eq!(deltas.len(), 2);
        assert_eq!(deltas[0].other, Port::NadorWestMed);
        assert_eq!(deltas[1].delta_percent, Some(dec("20")));
    }

    #[test]
    fn test_compare_breakdowns_without_reference_is_empty() {
        let breakdowns = vec![build_breakdown(
            Port::Algeciras,
            vec![line(Port::Algeciras, "1200")],
            AuditTrace::default(),
        )];
        assert!(compare_breakdowns(&breakdowns, Port::TangerMed).is_empty());
    }
}
