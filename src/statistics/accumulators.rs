//! Per-fold statistic accumulators
//!
//! One accumulator instance lives for exactly one output position: the
//! reducer creates it fresh, pushes every selected sample, and reads one
//! result. [`Welford`] carries the streaming mean/variance state;
//! [`UnitVectorSum`] collects angles as unit vectors for the circular
//! statistics.

use num_complex::Complex;
use num_traits::{Float, NumAssign};

use crate::dtype::RealElement;

/// Running sum with a sample count.
#[derive(Debug, Clone, Copy)]
pub struct RunningSum<F> {
    sum: F,
    count: usize,
}

impl<F: NumAssign + Copy> RunningSum<F> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sum: F::zero(),
            count: 0,
        }
    }

    pub fn push(&mut self, value: F) {
        self.sum += value;
        self.count += 1;
    }

    #[must_use]
    pub fn sum(&self) -> F {
        self.sum
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl<F: NumAssign + Copy> Default for RunningSum<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Running product, seeded with one.
#[derive(Debug, Clone, Copy)]
pub struct RunningProduct<F> {
    product: F,
}

impl<F: NumAssign + Copy> RunningProduct<F> {
    #[must_use]
    pub fn new() -> Self {
        Self { product: F::one() }
    }

    pub fn push(&mut self, value: F) {
        self.product *= value;
    }

    #[must_use]
    pub fn value(&self) -> F {
        self.product
    }
}

impl<F: NumAssign + Copy> Default for RunningProduct<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Running extremum, seeded at the element type's lowest or highest value.
///
/// A candidate replaces the current value only when it compares strictly
/// beyond it, so NaN samples never displace a finite extremum.
#[derive(Debug, Clone, Copy)]
pub struct Extremum<T> {
    best: T,
    maximum: bool,
}

impl<T: RealElement> Extremum<T> {
    /// Running maximum, seeded at the lowest representable value.
    #[must_use]
    pub fn maximum() -> Self {
        Self {
            best: T::lowest(),
            maximum: true,
        }
    }

    /// Running minimum, seeded at the highest representable value.
    #[must_use]
    pub fn minimum() -> Self {
        Self {
            best: T::highest(),
            maximum: false,
        }
    }

    pub fn push(&mut self, value: T) {
        let beats = if self.maximum {
            value > self.best
        } else {
            value < self.best
        };
        if beats {
            self.best = value;
        }
    }

    #[must_use]
    pub fn value(&self) -> T {
        self.best
    }
}

/// Streaming mean and variance state (Welford's algorithm).
///
/// Keeps the sample count, the running mean, and the running sum of squared
/// deviations from that mean. Accumulation is in `f64` regardless of the
/// source element type.
#[derive(Debug, Clone, Copy, Default)]
pub struct Welford {
    count: usize,
    mean: f64,
    m2: f64,
}

impl Welford {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        let delta2 = value - self.mean;
        self.m2 += delta * delta2;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Mean of the pushed samples, 0 when none were pushed.
    #[must_use]
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance with denominator `n - 1`, or 0 with fewer than two
    /// samples.
    #[must_use]
    pub fn variance(&self) -> f64 {
        if self.count > 1 {
            self.m2 / (self.count - 1) as f64
        } else {
            0.0
        }
    }

    #[must_use]
    pub fn standard_deviation(&self) -> f64 {
        self.variance().sqrt()
    }
}

/// One angle as a unit vector in the complex plane.
#[must_use]
pub fn angle_to_vector<F: Float>(angle: F) -> Complex<F> {
    Complex::new(angle.cos(), angle.sin())
}

/// Sum of unit vectors for the circular statistics.
///
/// The resultant length R is the magnitude of the vector sum divided by the
/// sample count: identical angles give R = 1, uniformly opposed angles give
/// R = 0. With no samples R is NaN, which the directional reducers
/// propagate.
#[derive(Debug, Clone, Copy)]
pub struct UnitVectorSum<F> {
    sum: Complex<F>,
    count: usize,
}

impl<F: Float> UnitVectorSum<F> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sum: Complex::new(F::zero(), F::zero()),
            count: 0,
        }
    }

    pub fn push(&mut self, angle: F) {
        self.sum = self.sum + angle_to_vector(angle);
        self.count += 1;
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Four-quadrant angle of the resultant vector.
    #[must_use]
    pub fn angle(&self) -> F {
        self.sum.arg()
    }

    /// Normalized resultant length R, clamped to at most one.
    ///
    /// The true ratio never exceeds one, but rounding in the vector sum can
    /// push the computed value a few ULPs past it. NaN from an empty sum
    /// passes through unclamped.
    #[must_use]
    pub fn resultant_length(&self) -> F {
        let ratio = self.sum.norm() / count_as(self.count);
        if ratio > F::one() {
            F::one()
        } else {
            ratio
        }
    }
}

impl<F: Float> Default for UnitVectorSum<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Sample count as the accumulation float type.
pub(crate) fn count_as<F: Float>(count: usize) -> F {
    F::from(count).unwrap_or_else(F::nan)
}
