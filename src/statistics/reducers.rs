//! One [`SliceReducer`] implementation per statistic
//!
//! Every reducer folds one input block (honoring the optional mask) into a
//! single value, accumulating in the element type's promoted `Flex` or
//! `Float` type so narrow integers cannot overflow along the way. The entry
//! points in [`crate::statistics`] pick the reducer variant and the output
//! element type from the input's type tag.

use std::cmp::Ordering;

use num_traits::Float;

use crate::dtype::{Element, RealElement};
use crate::projection::SliceReducer;
use crate::view::Block;

use super::accumulators::{
    count_as, Extremum, RunningProduct, RunningSum, UnitVectorSum, Welford,
};

/// Apply `push` to every selected sample.
fn fold<T, F>(input: Block<'_, T>, mask: Option<Block<'_, bool>>, mut push: F)
where
    T: Element,
    F: FnMut(T),
{
    match mask {
        Some(mask) => {
            for (value, keep) in input.iter().zip(mask.iter()) {
                if keep {
                    push(value);
                }
            }
        }
        None => {
            for value in input.iter() {
                push(value);
            }
        }
    }
}

/// Narrow an `f64` accumulator result to the element's float type.
fn float_from<F: Float>(value: f64) -> F {
    F::from(value).unwrap_or_else(F::nan)
}

/// Mean or plain sum over the selected samples, in the flex type.
///
/// When a mask selects zero samples the raw (zero) sum is returned rather
/// than dividing by zero.
#[derive(Debug, Clone, Copy)]
pub struct MeanProjection {
    compute_mean: bool,
}

impl MeanProjection {
    #[must_use]
    pub fn mean() -> Self {
        Self { compute_mean: true }
    }

    #[must_use]
    pub fn sum() -> Self {
        Self {
            compute_mean: false,
        }
    }
}

impl<T: Element> SliceReducer<T> for MeanProjection {
    type Out = T::Flex;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T::Flex {
        let mut acc = RunningSum::new();
        fold(input, mask, |value| acc.push(value.to_flex()));
        if self.compute_mean && acc.count() > 0 {
            acc.sum() / count_as::<T::Float>(acc.count())
        } else {
            acc.sum()
        }
    }
}

/// Product of the selected samples, seeded with one.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductProjection;

impl<T: Element> SliceReducer<T> for ProductProjection {
    type Out = T::Flex;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T::Flex {
        let mut acc = RunningProduct::new();
        fold(input, mask, |value| acc.push(value.to_flex()));
        acc.value()
    }
}

/// Mean or sum of absolute values (complex modulus), in the float type.
#[derive(Debug, Clone, Copy)]
pub struct MeanAbsProjection {
    compute_mean: bool,
}

impl MeanAbsProjection {
    #[must_use]
    pub fn mean() -> Self {
        Self { compute_mean: true }
    }

    #[must_use]
    pub fn sum() -> Self {
        Self {
            compute_mean: false,
        }
    }
}

impl<T: Element> SliceReducer<T> for MeanAbsProjection {
    type Out = T::Float;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T::Float {
        let mut acc = RunningSum::new();
        fold(input, mask, |value| acc.push(value.float_abs()));
        if self.compute_mean && acc.count() > 0 {
            acc.sum() / count_as::<T::Float>(acc.count())
        } else {
            acc.sum()
        }
    }
}

/// Mean or sum of squared values, in the flex type.
///
/// Samples are promoted before squaring, so narrow integer types cannot
/// overflow in the multiply.
#[derive(Debug, Clone, Copy)]
pub struct MeanSquareProjection {
    compute_mean: bool,
}

impl MeanSquareProjection {
    #[must_use]
    pub fn mean() -> Self {
        Self { compute_mean: true }
    }

    #[must_use]
    pub fn sum() -> Self {
        Self {
            compute_mean: false,
        }
    }
}

impl<T: Element> SliceReducer<T> for MeanSquareProjection {
    type Out = T::Flex;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T::Flex {
        let mut acc = RunningSum::new();
        fold(input, mask, |value| {
            let flex = value.to_flex();
            acc.push(flex * flex);
        });
        if self.compute_mean && acc.count() > 0 {
            acc.sum() / count_as::<T::Float>(acc.count())
        } else {
            acc.sum()
        }
    }
}

/// Streaming sample variance or standard deviation, in the float type.
#[derive(Debug, Clone, Copy)]
pub struct VarianceProjection {
    compute_std: bool,
}

impl VarianceProjection {
    #[must_use]
    pub fn variance() -> Self {
        Self { compute_std: false }
    }

    #[must_use]
    pub fn standard_deviation() -> Self {
        Self { compute_std: true }
    }
}

impl<T: RealElement> SliceReducer<T> for VarianceProjection {
    type Out = T::Float;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T::Float {
        let mut acc = Welford::new();
        fold(input, mask, |value| acc.push(value.to_f64()));
        float_from(if self.compute_std {
            acc.standard_deviation()
        } else {
            acc.variance()
        })
    }
}

/// Circular mean: the angle of the resultant of the samples' unit vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalMeanProjection;

impl<T: Element + Float> SliceReducer<T> for DirectionalMeanProjection {
    type Out = T;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T {
        let mut acc = UnitVectorSum::new();
        fold(input, mask, |angle| acc.push(angle));
        acc.angle()
    }
}

/// Circular dispersion `1 - R` or circular standard deviation
/// `sqrt(-2 ln R)`, with R the normalized resultant length.
///
/// R caps at one, so a set of identical angles has zero dispersion under
/// both measures. An empty selection has NaN dispersion.
#[derive(Debug, Clone, Copy)]
pub struct DirectionalVarianceProjection {
    compute_std: bool,
}

impl DirectionalVarianceProjection {
    #[must_use]
    pub fn variance() -> Self {
        Self { compute_std: false }
    }

    #[must_use]
    pub fn standard_deviation() -> Self {
        Self { compute_std: true }
    }
}

impl<T: Element + Float> SliceReducer<T> for DirectionalVarianceProjection {
    type Out = T;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T {
        let mut acc = UnitVectorSum::new();
        fold(input, mask, |angle| acc.push(angle));
        let resultant = acc.resultant_length();
        if self.compute_std {
            let minus_two = -(T::one() + T::one());
            (minus_two * resultant.ln()).sqrt()
        } else {
            T::one() - resultant
        }
    }
}

/// Running maximum or minimum of the selected samples, in the input type.
///
/// With zero selected samples the seed survives: the lowest representable
/// value for a maximum, the highest for a minimum.
#[derive(Debug, Clone, Copy)]
pub struct ExtremumProjection {
    maximum: bool,
}

impl ExtremumProjection {
    #[must_use]
    pub fn maximum() -> Self {
        Self { maximum: true }
    }

    #[must_use]
    pub fn minimum() -> Self {
        Self { maximum: false }
    }
}

impl<T: RealElement> SliceReducer<T> for ExtremumProjection {
    type Out = T;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T {
        let mut acc = if self.maximum {
            Extremum::maximum()
        } else {
            Extremum::minimum()
        };
        fold(input, mask, |value| acc.push(value));
        acc.value()
    }
}

/// Nearest-rank percentile of the selected samples, in the input type.
///
/// The selected samples are sorted ascending (NaN compares as equal, so its
/// position is unspecified) and the value at rank
/// `round(percentile / 100 * (n - 1))` is returned. An empty selection
/// yields the element type's zero. Percentiles of exactly 0 and 100 never
/// reach this reducer; the entry point folds them as extrema instead.
#[derive(Debug, Clone, Copy)]
pub struct PercentileProjection {
    percentile: f64,
}

impl PercentileProjection {
    #[must_use]
    pub fn new(percentile: f64) -> Self {
        Self { percentile }
    }
}

impl<T: RealElement> SliceReducer<T> for PercentileProjection {
    type Out = T;

    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> T {
        let mut values = Vec::with_capacity(input.len());
        fold(input, mask, |value| values.push(value));
        if values.is_empty() {
            return T::zero();
        }
        values.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
        let rank = (self.percentile / 100.0 * (values.len() - 1) as f64).round() as usize;
        values[rank]
    }
}
