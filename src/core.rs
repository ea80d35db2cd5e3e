use anyhow::Result;
use num::Float;

use crate::{traits::FloatConst, transform::TransformStats};

pub fn sort_sample<T>(arr: &[T]) -> Result<Vec<T>>
where
    T: Float,
{
    let mut sorted = arr.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    Ok(sorted)
}

pub fn find_median<T>(sorted: &[T]) -> Result<T>
where
    T: Float + FloatConst,
{
    let n = sorted.len();
    if n == 0 {
        return Err(anyhow::anyhow!("Cannot take the median of an empty list"));
    }
    let mid = n / 2;
    if n % 2 == 0 {
        let (a, b) = (sorted[mid - 1], sorted[mid]);
        Ok(a + (b - a) / T::TWO)
    } else {
        Ok(sorted[mid])
    }
}

pub fn load_list_stats<T>(values: &[T]) -> Result<TransformStats<T>>
where
    T: Float + FloatConst,
{
    let sorted = sort_sample(values)?;
    let median = find_median(&sorted)?;
    let average = running_mean(&sorted)?;

    Ok(TransformStats {
        average,
        median,
        min: sorted[0],
        max: sorted[sorted.len() - 1],
    })
}

// Incremental so that large values never overflow an intermediate sum.
pub fn running_mean<T>(values: &[T]) -> Result<T>
where
    T: Float + FloatConst,
{
    let mut avg = T::ZERO;
    for (i, &v) in values.iter().enumerate() {
        let k = T::from(i + 1).ok_or_else(|| anyhow::anyhow!("List length not representable"))?;
        avg = avg + (v - avg) / k;
    }
    Ok(avg)
}

// min -> 0, mid -> 0.5, max -> 1; a zero-width half collapses onto its boundary.
pub fn range_transform<T>(val: T, min: T, mid: T, max: T) -> T
where
    T: Float + FloatConst,
{
    if val.is_nan() || val <= min {
        return T::ZERO;
    }
    if val >= max {
        return T::ONE;
    }
    if val <= mid {
        if mid > min {
            T::HALF * (val - min) / (mid - min)
        } else {
            T::HALF
        }
    } else if max > mid {
        T::HALF + T::HALF * (val - mid) / (max - mid)
    } else {
        T::ONE
    }
}

// NaN maps onto the lower bound.
pub fn bounded<T>(val: T, lower: T, upper: T) -> T
where
    T: Float,
{
    if val.is_nan() || val < lower {
        lower
    } else if val > upper {
        upper
    } else {
        val
    }
}
