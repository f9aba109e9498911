//! Statistic entry points over the projection engine
//!
//! One public function per statistic. Each picks the reducer variant
//! matching the input's element type (and, for mean and variance, the
//! [`Mode`]), requests the statistic's natural output type, and hands off to
//! [`project`](crate::projection::project).
//!
//! # Organization
//!
//! - [`accumulators`]: per-fold running state (sums, extrema, Welford,
//!   unit-vector sums)
//! - [`reducers`]: the [`SliceReducer`](crate::projection::SliceReducer)
//!   implementations the entry points select from

pub mod accumulators;
pub mod reducers;

use crate::errors::{Result, RuProjError};
use crate::projection::project;
use crate::raster::Raster;

use self::reducers::{
    DirectionalMeanProjection, DirectionalVarianceProjection, ExtremumProjection,
    MeanAbsProjection, MeanProjection, MeanSquareProjection, PercentileProjection,
    ProductProjection, VarianceProjection,
};

/// Interpretation of the samples for the mean and variance statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Ordinary arithmetic statistics.
    #[default]
    Linear,
    /// Samples are angles in radians and the statistics are circular,
    /// computed on the resultant of their unit vectors. Only floating-point
    /// rasters support this.
    Directional,
}

impl Mode {
    /// Get the string representation of the mode
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linear => "linear",
            Self::Directional => "directional",
        }
    }
}

/// The fixed-arity statistics, for driving a reduction by name.
///
/// [`percentile`] is not listed because it takes a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Statistic {
    Mean,
    Sum,
    Product,
    MeanAbs,
    SumAbs,
    MeanSquare,
    SumSquare,
    Variance,
    StandardDeviation,
    Minimum,
    Maximum,
}

impl Statistic {
    /// Get the string representation of the statistic
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Product => "product",
            Self::MeanAbs => "mean of absolute values",
            Self::SumAbs => "sum of absolute values",
            Self::MeanSquare => "mean of squares",
            Self::SumSquare => "sum of squares",
            Self::Variance => "variance",
            Self::StandardDeviation => "standard deviation",
            Self::Minimum => "minimum",
            Self::Maximum => "maximum",
        }
    }
}

/// Reduce the selected dimensions of `input` with the named statistic, in
/// [`Linear`](Mode::Linear) mode.
///
/// # Errors
///
/// Propagates the matching entry point's validation errors.
pub fn reduce(
    input: &Raster,
    mask: Option<&Raster>,
    statistic: Statistic,
    process: &[bool],
) -> Result<Raster> {
    match statistic {
        Statistic::Mean => mean(input, mask, Mode::default(), process),
        Statistic::Sum => sum(input, mask, process),
        Statistic::Product => product(input, mask, process),
        Statistic::MeanAbs => mean_abs(input, mask, process),
        Statistic::SumAbs => sum_abs(input, mask, process),
        Statistic::MeanSquare => mean_square(input, mask, process),
        Statistic::SumSquare => sum_square(input, mask, process),
        Statistic::Variance => variance(input, mask, Mode::default(), process),
        Statistic::StandardDeviation => standard_deviation(input, mask, Mode::default(), process),
        Statistic::Minimum => minimum(input, mask, process),
        Statistic::Maximum => maximum(input, mask, process),
    }
}

/// Projects the input to the mean over the selected dimensions.
///
/// The result is stored in the input's flex type: complex stays complex,
/// everything else becomes floating point. In
/// [`Directional`](Mode::Directional) mode samples are angles in radians and
/// the circular mean is computed instead.
///
/// A mask restricts the fold to samples where it is `true`. A collapsed
/// block whose mask selects nothing yields the raw (zero) sum rather than a
/// division by zero.
///
/// # Arguments
///
/// * `input` - The raster to reduce
/// * `mask` - Optional single-channel boolean mask selecting samples
/// * `mode` - Linear or directional interpretation of the samples
/// * `process` - Dimensions to collapse (`true` collapses); empty collapses
///   all
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for a directional mean of a
/// non-float raster, and propagates selector and mask validation errors.
///
/// # Examples
///
/// ```rust
/// use ndarray::ArrayD;
/// use ru_proj::prelude::*;
///
/// let data = ArrayD::from_shape_vec(vec![2, 2], vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
/// let raster = Raster::from_array(data);
/// let out = mean(&raster, None, Mode::Linear, &[]).unwrap();
/// assert_eq!(out.scalar_at(&[0, 0], 0), Some(Scalar::F32(2.5)));
/// ```
pub fn mean(input: &Raster, mask: Option<&Raster>, mode: Mode, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_flex();
    match mode {
        Mode::Directional => crate::dispatch_float!(input.dtype(), "directional mean", T => {
            project::<T, _>(input, mask, out, process, &DirectionalMeanProjection)
        }),
        Mode::Linear => crate::dispatch_all!(input.dtype(), T => {
            project::<T, _>(input, mask, out, process, &MeanProjection::mean())
        }),
    }
}

/// Projects the input to the sum over the selected dimensions, stored in the
/// input's flex type.
///
/// # Errors
///
/// Propagates selector and mask validation errors.
pub fn sum(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_flex();
    crate::dispatch_all!(input.dtype(), T => {
        project::<T, _>(input, mask, out, process, &MeanProjection::sum())
    })
}

/// Projects the input to the product over the selected dimensions, stored in
/// the input's flex type. An empty selection yields 1.
///
/// # Errors
///
/// Propagates selector and mask validation errors.
pub fn product(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_flex();
    crate::dispatch_all!(input.dtype(), T => {
        project::<T, _>(input, mask, out, process, &ProductProjection)
    })
}

/// Projects the input to the mean of absolute values, stored in the input's
/// float type. For complex samples the modulus is used.
///
/// Unsigned rasters take the plain mean path, which computes the same thing
/// without the redundant absolute value.
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for boolean rasters, and
/// propagates selector and mask validation errors.
pub fn mean_abs(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_float();
    if input.dtype().is_unsigned() {
        crate::dispatch_unsigned!(input.dtype(), "mean of absolute values", T => {
            project::<T, _>(input, mask, out, process, &MeanProjection::mean())
        })
    } else {
        crate::dispatch_signed!(input.dtype(), "mean of absolute values", T => {
            project::<T, _>(input, mask, out, process, &MeanAbsProjection::mean())
        })
    }
}

/// Projects the input to the sum of absolute values, stored in the input's
/// float type. For complex samples the modulus is used.
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for boolean rasters, and
/// propagates selector and mask validation errors.
pub fn sum_abs(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_float();
    if input.dtype().is_unsigned() {
        crate::dispatch_unsigned!(input.dtype(), "sum of absolute values", T => {
            project::<T, _>(input, mask, out, process, &MeanProjection::sum())
        })
    } else {
        crate::dispatch_signed!(input.dtype(), "sum of absolute values", T => {
            project::<T, _>(input, mask, out, process, &MeanAbsProjection::sum())
        })
    }
}

/// Projects the input to the mean of squared values, stored in the input's
/// flex type.
///
/// # Errors
///
/// Propagates selector and mask validation errors.
pub fn mean_square(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_flex();
    if input.dtype().is_bool() {
        // Squaring is the identity on binary samples.
        project::<bool, _>(input, mask, out, process, &MeanProjection::mean())
    } else {
        crate::dispatch_nonbinary!(input.dtype(), "mean of squares", T => {
            project::<T, _>(input, mask, out, process, &MeanSquareProjection::mean())
        })
    }
}

/// Projects the input to the sum of squared values, stored in the input's
/// flex type.
///
/// # Errors
///
/// Propagates selector and mask validation errors.
pub fn sum_square(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    let out = input.dtype().suggest_flex();
    if input.dtype().is_bool() {
        // Squaring is the identity on binary samples.
        project::<bool, _>(input, mask, out, process, &MeanProjection::sum())
    } else {
        crate::dispatch_nonbinary!(input.dtype(), "sum of squares", T => {
            project::<T, _>(input, mask, out, process, &MeanSquareProjection::sum())
        })
    }
}

/// Projects the input to the sample variance (denominator `n - 1`) over the
/// selected dimensions, stored in the input's float type.
///
/// Accumulation is streaming (Welford's algorithm) in `f64`. Collapsed
/// blocks with fewer than two selected samples yield 0. In
/// [`Directional`](Mode::Directional) mode samples are angles in radians and
/// the circular dispersion `1 - R` is computed instead, with R the
/// normalized resultant length.
///
/// A boolean raster takes the mean path: the sample variance of binary
/// samples carries no more information than their mean.
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for complex rasters (and, in
/// directional mode, anything non-float), and propagates selector and mask
/// validation errors.
pub fn variance(
    input: &Raster,
    mask: Option<&Raster>,
    mode: Mode,
    process: &[bool],
) -> Result<Raster> {
    let out = input.dtype().suggest_float();
    match mode {
        Mode::Directional => {
            let reducer = DirectionalVarianceProjection::variance();
            crate::dispatch_float!(input.dtype(), "directional variance", T => {
                project::<T, _>(input, mask, out, process, &reducer)
            })
        }
        Mode::Linear if input.dtype().is_bool() => {
            project::<bool, _>(input, mask, out, process, &MeanProjection::mean())
        }
        Mode::Linear => crate::dispatch_noncomplex!(input.dtype(), "variance", T => {
            project::<T, _>(input, mask, out, process, &VarianceProjection::variance())
        }),
    }
}

/// Projects the input to the sample standard deviation over the selected
/// dimensions, stored in the input's float type.
///
/// In [`Directional`](Mode::Directional) mode the circular standard
/// deviation `sqrt(-2 ln R)` is computed. Boolean rasters take the mean
/// path, like [`variance`].
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for complex rasters (and, in
/// directional mode, anything non-float), and propagates selector and mask
/// validation errors.
pub fn standard_deviation(
    input: &Raster,
    mask: Option<&Raster>,
    mode: Mode,
    process: &[bool],
) -> Result<Raster> {
    let out = input.dtype().suggest_float();
    match mode {
        Mode::Directional => {
            let reducer = DirectionalVarianceProjection::standard_deviation();
            crate::dispatch_float!(input.dtype(), "directional standard deviation", T => {
                project::<T, _>(input, mask, out, process, &reducer)
            })
        }
        Mode::Linear if input.dtype().is_bool() => {
            project::<bool, _>(input, mask, out, process, &MeanProjection::mean())
        }
        Mode::Linear => crate::dispatch_noncomplex!(input.dtype(), "standard deviation", T => {
            project::<T, _>(input, mask, out, process, &VarianceProjection::standard_deviation())
        }),
    }
}

/// Projects the input to the minimum over the selected dimensions, stored in
/// the input's own type.
///
/// An empty selection yields the type's highest representable value; NaN
/// samples never displace a finite minimum.
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for complex rasters, and
/// propagates selector and mask validation errors.
pub fn minimum(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    crate::dispatch_noncomplex!(input.dtype(), "minimum", T => {
        project::<T, _>(input, mask, input.dtype(), process, &ExtremumProjection::minimum())
    })
}

/// Projects the input to the maximum over the selected dimensions, stored in
/// the input's own type.
///
/// An empty selection yields the type's lowest representable value; NaN
/// samples never displace a finite maximum.
///
/// # Errors
///
/// Returns [`RuProjError::UnsupportedType`] for complex rasters, and
/// propagates selector and mask validation errors.
pub fn maximum(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    crate::dispatch_noncomplex!(input.dtype(), "maximum", T => {
        project::<T, _>(input, mask, input.dtype(), process, &ExtremumProjection::maximum())
    })
}

/// Projects the input to the nearest-rank percentile over the selected
/// dimensions, stored in the input's own type.
///
/// A percentile of exactly 0 or 100 is folded as the minimum or maximum
/// without materializing the samples. Interior percentiles sort each
/// collapsed block and pick the value at rank
/// `round(percentile / 100 * (n - 1))`; an empty selection yields the
/// type's zero.
///
/// # Arguments
///
/// * `input` - The raster to reduce
/// * `mask` - Optional single-channel boolean mask selecting samples
/// * `percentile` - Percentile to extract, in `0.0..=100.0`
/// * `process` - Dimensions to collapse (`true` collapses); empty collapses
///   all
///
/// # Errors
///
/// Returns [`RuProjError::InvalidArgument`] if `percentile` is NaN or
/// outside `0.0..=100.0`, [`RuProjError::UnsupportedType`] for complex
/// rasters, and propagates selector and mask validation errors.
///
/// # Examples
///
/// ```rust
/// use ndarray::ArrayD;
/// use ru_proj::prelude::*;
///
/// let data = ArrayD::from_shape_vec(vec![5], vec![10u8, 20, 30, 40, 50]).unwrap();
/// let raster = Raster::from_array(data);
/// let median = percentile(&raster, None, 50.0, &[]).unwrap();
/// assert_eq!(median.get::<u8>(&[0], 0), Some(30));
/// ```
pub fn percentile(
    input: &Raster,
    mask: Option<&Raster>,
    percentile: f64,
    process: &[bool],
) -> Result<Raster> {
    if !(0.0..=100.0).contains(&percentile) {
        return Err(RuProjError::InvalidArgument(format!(
            "percentile must lie in 0.0..=100.0, got {percentile}"
        )));
    }
    if percentile == 0.0 {
        minimum(input, mask, process)
    } else if percentile == 100.0 {
        maximum(input, mask, process)
    } else {
        let reducer = PercentileProjection::new(percentile);
        crate::dispatch_noncomplex!(input.dtype(), "percentile", T => {
            project::<T, _>(input, mask, input.dtype(), process, &reducer)
        })
    }
}
