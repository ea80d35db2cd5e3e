use anyhow::Result;
use itertools::Itertools;
use num::Float;

use crate::{core::sort_sample, traits::FloatConst};

/// Empirical CDF over a fixed, sorted sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Ecdf<T> {
    sorted: Vec<T>,
    len: T,
}

impl<T> Ecdf<T>
where
    T: Float + FloatConst + std::fmt::Debug,
{
    pub fn new(sorted: Vec<T>) -> Result<Self> {
        if sorted.is_empty() {
            return Err(anyhow::anyhow!("ECDF sample must be non-empty"));
        }
        if sorted.iter().any(|v| v.is_nan()) {
            return Err(anyhow::anyhow!("ECDF sample contains NaN"));
        }
        if let Some((a, b)) = sorted.iter().tuple_windows().find(|(a, b)| a > b) {
            return Err(anyhow::anyhow!(
                "ECDF sample is not sorted: {:?} precedes {:?}",
                a,
                b
            ));
        }
        let len = T::from(sorted.len())
            .ok_or_else(|| anyhow::anyhow!("Sample length not representable"))?;
        Ok(Ecdf { sorted, len })
    }

    pub fn from_unsorted(unsorted: &[T]) -> Result<Self> {
        Self::new(sort_sample(unsorted)?)
    }

    pub fn sorted_data(&self) -> &[T] {
        &self.sorted
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    // Always false: construction rejects empty samples.
    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn min(&self) -> T {
        self.sorted[0]
    }

    pub fn max(&self) -> T {
        self.sorted[self.sorted.len() - 1]
    }

    pub fn f_minus(&self, x: T) -> T {
        let below = self.sorted.partition_point(|&v| v < x);
        self.share(below)
    }

    pub fn f_plus(&self, x: T) -> T {
        let at_or_below = self.sorted.partition_point(|&v| v <= x);
        self.share(at_or_below)
    }

    pub fn average_rank(&self, x: T) -> T {
        (self.f_plus(x) + self.f_minus(x)) / T::TWO
    }

    // in [0.5, 1]
    pub fn smoothed_rank(&self, x: T) -> T {
        (self.f_plus(x) + self.f_minus(x)) / T::FOUR + T::HALF
    }

    fn share(&self, count: usize) -> T {
        // count <= len, which is already known to fit in T
        T::from(count).unwrap_or(self.len) / self.len
    }
}
