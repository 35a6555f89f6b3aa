//! Property-based tests for the seasonal trend detector.
//!
//! These tests verify invariants that should hold for all valid inputs,
//! using randomly generated daily count series.

use chrono::{Duration, NaiveDate};
use proptest::prelude::*;
use seasonal_trends::prelude::*;

fn start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
}

fn rows_from_counts(counts: &[u64]) -> Vec<InputRow> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| InputRow::new(start() + Duration::days(i as i64), c))
        .collect()
}

/// Daily counts spanning `min_days..max_days` days.
fn daily_counts_strategy(min_days: usize, max_days: usize) -> impl Strategy<Value = Vec<u64>> {
    (min_days..max_days).prop_flat_map(|len| prop::collection::vec(0u64..500, len))
}

/// One count per month, on the first of the month.
fn monthly_rows(counts: &[u64]) -> Vec<InputRow> {
    counts
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            let d = start()
                .checked_add_months(chrono::Months::new(i as u32))
                .unwrap();
            InputRow::new(d, c)
        })
        .collect()
}

// =============================================================================
// Property: rankings cover the calendar and are sorted
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rankings_cover_calendar_sorted_descending(counts in daily_counts_strategy(366, 800)) {
        let detector = SeasonalTrendDetector::new(&rows_from_counts(&counts)).unwrap();

        let months = detector.peak_months();
        prop_assert_eq!(months.len(), 12);
        let mut keys = months.keys();
        keys.sort_unstable();
        prop_assert_eq!(keys, (1..=12).collect::<Vec<u32>>());
        for pair in months.as_slice().windows(2) {
            prop_assert!(pair[0].mean_count >= pair[1].mean_count);
            if pair[0].mean_count == pair[1].mean_count {
                prop_assert!(pair[0].key < pair[1].key);
            }
        }

        let quarters = detector.peak_quarters();
        prop_assert_eq!(quarters.len(), 4);
        for pair in quarters.as_slice().windows(2) {
            prop_assert!(pair[0].mean_count >= pair[1].mean_count);
        }
    }

    #[test]
    fn strength_is_bounded(counts in daily_counts_strategy(30, 800)) {
        let detector = SeasonalTrendDetector::new(&rows_from_counts(&counts)).unwrap();
        match detector.seasonality_strength() {
            Ok(strength) => prop_assert!((0.0..=1.0).contains(&strength)),
            Err(SeasonalError::DivisionByZero { .. }) => {
                prop_assert!(counts.iter().all(|&c| c == 0));
            }
            Err(other) => prop_assert!(false, "unexpected error {:?}", other),
        }
    }
}

// =============================================================================
// Property: decomposition is additive or reports insufficient data
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn decomposition_is_additive(
        counts in (24usize..72).prop_flat_map(|n| prop::collection::vec(1u64..10_000, n)),
        period in prop::sample::select(vec![3usize, 4, 6, 12])
    ) {
        let detector = SeasonalTrendDetector::new(&monthly_rows(&counts)).unwrap();
        let result = detector.detect_seasonal_pattern(period).unwrap();
        let d = result.decomposition().unwrap();

        prop_assert_eq!(d.len(), counts.len());
        for (key, observed) in &d.observed {
            let sum = d.trend[key] + d.seasonal[key] + d.residual[key];
            prop_assert!((observed - sum).abs() < 1e-6);
        }
    }

    #[test]
    fn short_series_is_insufficient(
        counts in (1usize..24).prop_flat_map(|n| prop::collection::vec(1u64..10_000, n))
    ) {
        let detector = SeasonalTrendDetector::new(&monthly_rows(&counts)).unwrap();
        let result = detector.detect_seasonal_pattern(12).unwrap();
        prop_assert_eq!(
            result,
            DecompositionResult::InsufficientData {
                required_periods: 24,
                available_periods: counts.len(),
            }
        );
    }
}

// =============================================================================
// Property: anomalies exceed the threshold and come out in order
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn anomalies_are_ordered_and_exceed_threshold(
        counts in prop::collection::vec(0u64..1_000, 0..48),
        threshold in 0.5..3.0_f64
    ) {
        let detector = SeasonalTrendDetector::new(&monthly_rows(&counts)).unwrap();
        let anomalies = detector.detect_anomalous_periods(threshold).unwrap();

        for a in &anomalies {
            prop_assert!(a.z_score.abs() > threshold);
            match a.kind {
                AnomalyKind::Spike => prop_assert!(a.z_score > 0.0),
                AnomalyKind::Drop => prop_assert!(a.z_score <= 0.0),
            }
        }
        for pair in anomalies.windows(2) {
            prop_assert!(pair[0].period < pair[1].period);
        }
    }

    #[test]
    fn summary_survives_json(counts in daily_counts_strategy(1, 400)) {
        prop_assume!(counts.iter().any(|&c| c > 0));
        let detector = SeasonalTrendDetector::new(&rows_from_counts(&counts)).unwrap();
        let summary = detector.summary().unwrap();

        let back = SeasonalSummary::from_json(&summary.to_json().unwrap()).unwrap();
        prop_assert_eq!(back.total_count, counts.iter().sum::<u64>());
        prop_assert_eq!(back.anomalous_periods.len(), summary.anomalous_periods.len());
        prop_assert!((back.average_monthly_count - summary.average_monthly_count).abs() < 1e-9);
        prop_assert!((back.seasonality_strength - summary.seasonality_strength).abs() < 1e-12);
    }
}
