//! Property tests for the rating engine and the ECDF.

use proptest::prelude::*;
use rolestats_core::{Ecdf, RoleStats, TransformType};

fn arb_sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(-1_000.0..1_000.0_f64, 1..60)
}

/// Samples with plenty of repeated values.
fn arb_tied_sample() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0..5_i32).prop_map(f64::from), 1..40)
}

fn arb_transform() -> impl Strategy<Value = TransformType> {
    prop_oneof![
        Just(TransformType::Unknown),
        Just(TransformType::RankTry),
        Just(TransformType::RankUpper),
        Just(TransformType::RankAll),
        Just(TransformType::MultiUpper),
        Just(TransformType::MultiAll),
        Just(TransformType::MinMaxUpper),
        Just(TransformType::MinMaxAll),
    ]
}

proptest! {
    /// Every query lands in [0, 100], including values far outside the sample.
    #[test]
    fn rating_is_bounded(
        sample in arb_sample(),
        transform in arb_transform(),
        value in -1e6..1e6_f64,
    ) {
        let stats = RoleStats::with_transform(&sample, transform).unwrap();
        let r = stats.rating(value);
        prop_assert!((0.0..=100.0).contains(&r), "rating {} out of bounds", r);
    }

    /// Larger raw values never rate lower.
    #[test]
    fn rating_is_monotone(
        sample in arb_sample(),
        transform in arb_transform(),
        a in -2_000.0..2_000.0_f64,
        b in -2_000.0..2_000.0_f64,
    ) {
        let stats = RoleStats::with_transform(&sample, transform).unwrap();
        let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(
            stats.rating(lo) <= stats.rating(hi),
            "{} rated {} but {} rated {} under {}",
            lo, stats.rating(lo), hi, stats.rating(hi), stats.transform_type()
        );
    }

    /// Monotone on sample points of heavily tied data as well.
    #[test]
    fn rating_is_monotone_with_ties(sample in arb_tied_sample()) {
        let stats = RoleStats::new(&sample).unwrap();
        let mut sorted = sample.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let ratings = stats.ratings(&sorted);
        for pair in ratings.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn rating_is_idempotent(sample in arb_sample(), value in -2_000.0..2_000.0_f64) {
        let stats = RoleStats::new(&sample).unwrap();
        prop_assert_eq!(stats.rating(value), stats.rating(value));
    }

    /// The median rates exactly at the anchor used by the line below it.
    #[test]
    fn median_rates_at_anchor(sample in arb_sample(), transform in arb_transform()) {
        let stats = RoleStats::with_transform(&sample, transform).unwrap();
        let diff = (stats.rating(stats.raw_median()) - stats.rating_at_median()).abs();
        prop_assert!(diff < 1e-9);
    }

    /// Selection always ends in a concrete strategy.
    #[test]
    fn selection_is_terminal(sample in arb_sample(), transform in arb_transform()) {
        let stats = RoleStats::with_transform(&sample, transform).unwrap();
        prop_assert!(stats.transform_type().is_concrete());
    }

    #[test]
    fn constant_sample_rates_flat(value in -100.0..100.0_f64, len in 1..20_usize, query in -1e3..1e3_f64) {
        let stats = RoleStats::new(&vec![value; len]).unwrap();
        prop_assert_eq!(stats.transform_type(), TransformType::Flat);
        prop_assert_eq!(stats.rating(query), 50.0);
    }

    #[test]
    fn ecdf_bounds(sample in arb_sample(), x in -2_000.0..2_000.0_f64) {
        let ecdf = Ecdf::from_unsorted(&sample).unwrap();
        prop_assert_eq!(ecdf.f_minus(ecdf.min()), 0.0);
        prop_assert_eq!(ecdf.f_plus(ecdf.max()), 1.0);
        prop_assert!(ecdf.f_plus(x) >= ecdf.f_minus(x));
        prop_assert!((0.0..=1.0).contains(&ecdf.f_minus(x)));
        prop_assert!((0.0..=1.0).contains(&ecdf.f_plus(x)));
    }

    /// Rebuilding through set_list matches a fresh engine.
    #[test]
    fn set_list_matches_fresh_engine(
        first in arb_sample(),
        second in arb_sample(),
        value in -2_000.0..2_000.0_f64,
    ) {
        let mut reused = RoleStats::new(&first).unwrap();
        reused.set_list(&second).unwrap();
        let fresh = RoleStats::new(&second).unwrap();

        prop_assert_eq!(reused.summary(), fresh.summary());
        prop_assert_eq!(reused.rating(value), fresh.rating(value));
    }
}
