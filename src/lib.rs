mod core;
mod ecdf;
mod traits;
mod transform;

use crate::core::{bounded, find_median, load_list_stats, range_transform, sort_sample};
use anyhow::Result;
use log::{debug, trace, warn};
use num::Float;

pub use crate::{
    ecdf::Ecdf,
    traits::FloatConst,
    transform::{transform_valid, TransformStats, TransformType},
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendWeight<T>(T);

impl<T> BlendWeight<T>
where
    T: Float + FloatConst + std::fmt::Debug,
{
    pub fn new(value: T) -> Result<Self> {
        if !value.is_finite() || value < T::ZERO || value > T::ONE {
            return Err(anyhow::anyhow!("Blend weight must be within [0, 1], got {:?}", value));
        }
        Ok(BlendWeight(value))
    }

    pub fn value(&self) -> T {
        self.0
    }
}

impl<T> Default for BlendWeight<T>
where
    T: Float + FloatConst,
{
    fn default() -> Self {
        BlendWeight(T::HALF)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MedianTolerance<T>(T);

impl<T> MedianTolerance<T>
where
    T: Float + FloatConst + std::fmt::Debug,
{
    pub fn new(value: T) -> Result<Self> {
        if !value.is_finite() || value < T::ZERO {
            return Err(anyhow::anyhow!("Median tolerance must be non-negative, got {:?}", value));
        }
        if value > T::ONE {
            return Err(anyhow::anyhow!("Median tolerance too large (> 1), got {:?}", value));
        }
        Ok(MedianTolerance(value))
    }

    pub fn value(&self) -> T {
        self.0
    }
}

impl<T> Default for MedianTolerance<T>
where
    T: Float + FloatConst,
{
    fn default() -> Self {
        MedianTolerance(T::from(0.05).unwrap())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlatRating<T>(T);

impl<T> FlatRating<T>
where
    T: Float + FloatConst + std::fmt::Debug,
{
    pub fn new(value: T) -> Result<Self> {
        if !value.is_finite() || value < T::ZERO || value > T::HUNDRED {
            return Err(anyhow::anyhow!("Flat rating must be within [0, 100], got {:?}", value));
        }
        Ok(FlatRating(value))
    }

    pub fn value(&self) -> T {
        self.0
    }
}

impl<T> Default for FlatRating<T>
where
    T: Float + FloatConst,
{
    fn default() -> Self {
        FlatRating(T::FIFTY)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingConfig<T> {
    pub blend_weight: BlendWeight<T>,
    pub median_tolerance: MedianTolerance<T>,
    pub flat_rating: FlatRating<T>,
}

impl<T> Default for RatingConfig<T>
where
    T: Float + FloatConst,
{
    fn default() -> Self {
        RatingConfig {
            blend_weight: BlendWeight::default(),
            median_tolerance: MedianTolerance::default(),
            flat_rating: FlatRating::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoleStatsSummary<T> {
    pub transform_type: TransformType,
    pub len: usize,
    pub upper_len: usize,
    pub raw_median: T,
    pub ecdf_median: T,
    pub sum_over_median: T,
    pub sum_upper: T,
    pub factor: T,
    pub factor_origin: T,
    pub rating_at_median: T,
    pub upper_minmax_diff: T,
    pub upper_raw_min: T,
    pub transform_one_percent: T,
}

/// Rates raw values against a reference sample on a 0-100 scale.
#[derive(Debug, Clone)]
pub struct RoleStats<T> {
    config: RatingConfig<T>,
    requested: TransformType,
    transform_type: TransformType,
    raws: Ecdf<T>,
    upper: Option<Ecdf<T>>,
    raw_stats: TransformStats<T>,
    upper_stats: Option<TransformStats<T>>,
    transformations: Vec<(TransformType, TransformStats<T>)>,
    ecdf_median: T,
    raw_median: T,
    sum_over_median: T,
    sum_upper: T,
    factor: T,
    factor_origin: T,
    rating_at_median: T,
    upper_minmax_diff: T,
    upper_raw_min: T,
    transform_one_percent: T,
}

impl<T> RoleStats<T>
where
    T: Float + FloatConst + std::fmt::Debug,
{
    pub fn new(unsorted: &[T]) -> Result<Self> {
        Self::with_config(unsorted, TransformType::Unknown, RatingConfig::default())
    }

    pub fn with_transform(unsorted: &[T], transform: TransformType) -> Result<Self> {
        Self::with_config(unsorted, transform, RatingConfig::default())
    }

    pub fn with_config(
        unsorted: &[T],
        transform: TransformType,
        config: RatingConfig<T>,
    ) -> Result<Self> {
        Self::init_list(unsorted, transform, config)
    }

    // A rejected sample leaves the engine untouched.
    pub fn set_list(&mut self, unsorted: &[T]) -> Result<()> {
        *self = Self::init_list(unsorted, self.requested, self.config)?;
        Ok(())
    }

    fn init_list(unsorted: &[T], requested: TransformType, config: RatingConfig<T>) -> Result<Self> {
        if unsorted.is_empty() {
            return Err(anyhow::anyhow!("Sample must be non-empty"));
        }
        if let Some(bad) = unsorted.iter().find(|v| !v.is_finite()) {
            return Err(anyhow::anyhow!("Sample values must be finite, got {:?}", bad));
        }

        let sorted = sort_sample(unsorted)?;
        let raw_median = find_median(&sorted)?;
        let raw_min = sorted[0];

        // A median sitting on the minimum would make the upper partition the
        // whole sample again, so only strictly greater values are kept.
        let upper_start = if raw_median <= raw_min {
            sorted.partition_point(|&v| v <= raw_median)
        } else {
            sorted.partition_point(|&v| v < raw_median)
        };
        let upper_values = sorted[upper_start..].to_vec();
        let sum_over_median = sorted
            .iter()
            .filter(|&&v| v > raw_median)
            .fold(T::ZERO, |acc, &v| acc + v);

        let raw_stats = load_list_stats(&sorted)?;
        let raws = Ecdf::new(sorted)?;
        let (upper, upper_stats) = if upper_values.is_empty() {
            (None, None)
        } else {
            let stats = load_list_stats(&upper_values)?;
            (Some(Ecdf::new(upper_values)?), Some(stats))
        };

        let sum_upper = upper.as_ref().map_or(T::ZERO, |u| {
            u.sorted_data()
                .iter()
                .fold(T::ZERO, |acc, &v| acc + u.smoothed_rank(v))
        });
        let (upper_raw_min, upper_minmax_diff) = upper
            .as_ref()
            .map_or((raw_median, T::ZERO), |u| (u.min(), u.max() - u.min()));

        let mut stats = RoleStats {
            config,
            requested,
            transform_type: TransformType::Unknown,
            ecdf_median: raws.average_rank(raw_median),
            raws,
            upper,
            raw_stats,
            upper_stats,
            transformations: Vec::new(),
            raw_median,
            sum_over_median,
            sum_upper,
            factor: T::ZERO,
            factor_origin: T::ZERO,
            rating_at_median: config.flat_rating.value(),
            upper_minmax_diff,
            upper_raw_min,
            transform_one_percent: upper_minmax_diff / T::FIFTY,
        };

        stats.configure_transformations()?;
        stats.calculate_factor_value();

        debug!(
            "Rating {} values with {} (requested {}), median {:?}, factor {:?}",
            stats.raws.len(),
            stats.transform_type,
            requested,
            stats.raw_median,
            stats.factor
        );
        Ok(stats)
    }

    fn configure_transformations(&mut self) -> Result<()> {
        self.transformations.clear();
        if self.requested == TransformType::Flat {
            self.transform_type = TransformType::Flat;
            return Ok(());
        }

        for (candidate, mid_is_avg) in self.requested.candidates() {
            if !self.load_transformations(candidate, mid_is_avg)? {
                continue;
            }
            if self.requested.is_concrete() && candidate != self.requested {
                warn!(
                    "Requested transform {} is degenerate for this sample, using {}",
                    self.requested, candidate
                );
            }
            self.transform_type = candidate;
            return Ok(());
        }

        debug!(
            "No transform spreads the {} sample values, rating everything {:?}",
            self.raws.len(),
            self.config.flat_rating.value()
        );
        self.transform_type = TransformType::Flat;
        Ok(())
    }

    fn load_transformations(&mut self, candidate: TransformType, mid_is_avg: bool) -> Result<bool> {
        let list = if candidate.is_upper() {
            match &self.upper {
                Some(upper) => upper.sorted_data(),
                None => {
                    trace!("Skipping {}: upper partition is empty", candidate);
                    return Ok(false);
                }
            }
        } else {
            self.raws.sorted_data()
        };

        let fractions: Vec<T> = list
            .iter()
            .map(|&v| self.transform_rating(candidate, v) / T::HUNDRED)
            .collect();
        let ts = load_list_stats(&fractions)?;
        let valid = transform_valid(&ts, mid_is_avg, self.config.median_tolerance.value());
        trace!("Candidate {} stats {:?}, valid: {}", candidate, ts, valid);

        self.transformations.push((candidate, ts));
        Ok(valid)
    }

    // Below-median line: through the origin for a positive median, through the
    // sample minimum otherwise.
    fn calculate_factor_value(&mut self) {
        self.rating_at_median = match self.transform_type {
            TransformType::Flat => self.config.flat_rating.value(),
            t => self.transform_rating(t, self.raw_median),
        };

        let raw_min = self.raws.min();
        let (origin, span) = if self.raw_median > T::ZERO {
            (T::ZERO, self.raw_median)
        } else {
            (raw_min, self.raw_median - raw_min)
        };
        self.factor_origin = origin;

        let factor = self.rating_at_median / span;
        if span > T::ZERO && factor.is_finite() {
            self.factor = factor;
        } else {
            debug!(
                "Median {:?} leaves no usable span below it, factor set to zero",
                self.raw_median
            );
            self.factor = T::ZERO;
        }
    }

    fn transform_rating(&self, transform: TransformType, val: T) -> T {
        let w = self.config.blend_weight.value();
        let rating = match transform {
            TransformType::RankUpper => self.upper_rank(val),
            TransformType::RankAll => self.raws.average_rank(val) * T::HUNDRED,
            TransformType::MultiUpper => match &self.upper_stats {
                Some(us) => {
                    let range = range_transform(val, us.min, us.average, us.max);
                    w * self.upper_rank(val) + (T::ONE - w) * (T::FIFTY + T::FIFTY * range)
                }
                None => T::FIFTY,
            },
            TransformType::MultiAll => {
                let rs = &self.raw_stats;
                let range = range_transform(val, rs.min, rs.average, rs.max);
                (w * self.raws.average_rank(val) + (T::ONE - w) * range) * T::HUNDRED
            }
            TransformType::MinMaxUpper => {
                if self.transform_one_percent > T::ZERO {
                    let r = T::FIFTY + (val - self.upper_raw_min) / self.transform_one_percent;
                    bounded(r, T::FIFTY, T::HUNDRED)
                } else {
                    T::FIFTY
                }
            }
            TransformType::MinMaxAll => {
                range_transform(val, self.raws.min(), self.raw_median, self.raws.max()) * T::HUNDRED
            }
            TransformType::Unknown | TransformType::RankTry | TransformType::Flat => {
                self.config.flat_rating.value()
            }
        };
        bounded(rating, T::ZERO, T::HUNDRED)
    }

    fn upper_rank(&self, val: T) -> T {
        self.upper
            .as_ref()
            .map_or(T::FIFTY, |u| u.smoothed_rank(val) * T::HUNDRED)
    }

    /// Rating of `val` in [0, 100]; NaN rates 0.
    pub fn get_rating(&self, val: T) -> T {
        if val.is_nan() {
            return T::ZERO;
        }
        match self.transform_type {
            TransformType::Flat => self.config.flat_rating.value(),
            t if t.is_upper() && val < self.raw_median => bounded(
                (val - self.factor_origin) * self.factor,
                T::ZERO,
                self.rating_at_median,
            ),
            t => self.transform_rating(t, val),
        }
    }

    pub fn rating(&self, val: T) -> T {
        self.get_rating(val)
    }

    pub fn ratings(&self, values: &[T]) -> Vec<T> {
        values.iter().map(|&v| self.get_rating(v)).collect()
    }

    pub fn transform_type(&self) -> TransformType {
        self.transform_type
    }

    pub fn requested_transform(&self) -> TransformType {
        self.requested
    }

    pub fn config(&self) -> &RatingConfig<T> {
        &self.config
    }

    pub fn raws(&self) -> &Ecdf<T> {
        &self.raws
    }

    pub fn upper(&self) -> Option<&Ecdf<T>> {
        self.upper.as_ref()
    }

    pub fn transformations(&self) -> &[(TransformType, TransformStats<T>)] {
        &self.transformations
    }

    pub fn raw_median(&self) -> T {
        self.raw_median
    }

    pub fn factor(&self) -> T {
        self.factor
    }

    pub fn rating_at_median(&self) -> T {
        self.rating_at_median
    }

    pub fn summary(&self) -> RoleStatsSummary<T> {
        RoleStatsSummary {
            transform_type: self.transform_type,
            len: self.raws.len(),
            upper_len: self.upper.as_ref().map_or(0, |u| u.len()),
            raw_median: self.raw_median,
            ecdf_median: self.ecdf_median,
            sum_over_median: self.sum_over_median,
            sum_upper: self.sum_upper,
            factor: self.factor,
            factor_origin: self.factor_origin,
            rating_at_median: self.rating_at_median,
            upper_minmax_diff: self.upper_minmax_diff,
            upper_raw_min: self.upper_raw_min,
            transform_one_percent: self.transform_one_percent,
        }
    }
}
