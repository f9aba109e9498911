//! RuProj: masked statistical projections over multi-channel rasters
//!
//! A Rust library for dimensional reduction of N-dimensional, multi-channel
//! numeric arrays: collapse any subset of dimensions to size 1 and fill each
//! surviving position with one statistic (mean, sum, product, variance,
//! extrema, percentiles, circular statistics) folded over the collapsed
//! dimensions, optionally under a boolean mask.
//!
//! ## Key Features
//!
//! - **Pluggable reductions**: one
//!   [`SliceReducer`](projection::SliceReducer) per statistic, selected once
//!   per call by element type and mode, never per element
//! - **13 element types**: boolean, the 8 integer widths, `f32`/`f64`, and
//!   the two complex types, with promoted accumulation so narrow integers
//!   cannot overflow
//! - **Masked folds**: single-channel boolean masks, with singleton
//!   dimensions broadcast across the input
//! - **Channel-aware**: multi-channel rasters reduce per channel; channels
//!   are never folded together
//! - **Strided iteration**: odometer-driven traversal with singleton
//!   squeezing and no per-position allocation
//!
//! ## Module Organization
//!
//! - [`raster`]: the sample container ([`Raster`](raster::Raster),
//!   [`Samples`](raster::Samples), [`Scalar`](raster::Scalar))
//! - [`dtype`]: element type tags, promotion rules, and the
//!   [`Element`](dtype::Element) trait
//! - [`view`]: strided sub-view descriptors and odometer iteration
//! - [`projection`]: the projection controller and the reducer seam
//! - [`statistics`]: statistic entry points, accumulators, and reducers
//! - [`metadata`]: raster inspection and description
//! - [`errors`]: centralized error handling
//!
//! ## Usage Examples
//!
//! ```rust
//! use ndarray::ArrayD;
//! use ru_proj::prelude::*;
//!
//! // A 2 x 3 raster of f64 samples.
//! let data = ArrayD::from_shape_vec(vec![2, 3], vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
//! let raster = Raster::from_array(data);
//!
//! // Collapse every dimension: one mean for the whole raster.
//! let out = mean(&raster, None, Mode::Linear, &[]).unwrap();
//! assert_eq!(out.shape(), &[1, 1]);
//! assert_eq!(out.scalar_at(&[0, 0], 0), Some(Scalar::F64(3.5)));
//!
//! // Collapse dimension 1 only, keeping dimension 0.
//! let out = maximum(&raster, None, &[false, true]).unwrap();
//! assert_eq!(out.shape(), &[2, 1]);
//! assert_eq!(out.get::<f64>(&[1, 0], 0), Some(6.0));
//! ```

// Core modules
pub mod dtype;
pub mod errors;
pub mod metadata;
pub mod projection;
pub mod raster;
pub mod statistics;
pub mod view;

// Type dispatch macros
pub mod dispatch;

// Direct re-exports for the public API
pub use dtype::*;
pub use errors::*;
pub use metadata::*;
pub use projection::*;
pub use raster::*;
pub use statistics::*;
pub use view::*;

// High-level convenience API
pub mod prelude {
    //! Commonly used imports for convenience

    pub use crate::dtype::{DType, Element, RealElement};
    pub use crate::errors::{Result, RuProjError};
    pub use crate::metadata::{describe_raster, raster_metadata, RasterMetadata};
    pub use crate::projection::{project, SliceReducer};
    pub use crate::raster::{Raster, Samples, Scalar};
    pub use crate::statistics::{
        maximum, mean, mean_abs, mean_square, minimum, percentile, product, reduce,
        standard_deviation, sum, sum_abs, sum_square, variance, Mode, Statistic,
    };
    pub use crate::view::{Block, View};
}

// Backwards compatibility wrappers (deprecated)
#[deprecated(since = "0.3.0", note = "Use the modular API instead: `statistics::mean`")]
pub fn reduce_mean(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    statistics::mean(input, mask, Mode::Linear, process)
}

#[deprecated(since = "0.3.0", note = "Use the modular API instead: `statistics::sum`")]
pub fn reduce_sum(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    statistics::sum(input, mask, process)
}

#[deprecated(since = "0.3.0", note = "Use the modular API instead: `statistics::minimum`")]
pub fn reduce_min(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    statistics::minimum(input, mask, process)
}

#[deprecated(since = "0.3.0", note = "Use the modular API instead: `statistics::maximum`")]
pub fn reduce_max(input: &Raster, mask: Option<&Raster>, process: &[bool]) -> Result<Raster> {
    statistics::maximum(input, mask, process)
}
