//! The raster container: owned N-dimensional, multi-channel sample storage
//!
//! A [`Raster`] owns one dense `ndarray` of samples, type-erased behind the
//! [`Samples`] enum, plus the channel count and the metadata that rides along
//! through a projection (physical pixel size, color space). Multi-channel
//! rasters store the channel axis as the last storage axis, so the samples of
//! one pixel are interleaved. [`Scalar`] is the matching one-sample value and
//! the bridging buffer used when a reducer's natural output type differs from
//! the type a caller asked the output raster to store.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex;

use crate::dtype::{DType, Element};
use crate::errors::{Result, RuProjError};

/// Run `$body` with `$array` bound to the typed array inside `$samples`,
/// whichever variant it is.
macro_rules! with_samples {
    ($samples:expr, $array:ident => $body:expr) => {
        match $samples {
            Samples::Bool($array) => $body,
            Samples::U8($array) => $body,
            Samples::U16($array) => $body,
            Samples::U32($array) => $body,
            Samples::U64($array) => $body,
            Samples::I8($array) => $body,
            Samples::I16($array) => $body,
            Samples::I32($array) => $body,
            Samples::I64($array) => $body,
            Samples::F32($array) => $body,
            Samples::F64($array) => $body,
            Samples::Complex32($array) => $body,
            Samples::Complex64($array) => $body,
        }
    };
}

/// Type-erased sample storage, one dense array per supported element type.
///
/// The variant in use is the runtime counterpart of the raster's [`DType`];
/// [`Element::samples`] and [`Element::wrap`] move typed arrays in and out.
#[derive(Debug, Clone, PartialEq)]
pub enum Samples {
    Bool(ArrayD<bool>),
    U8(ArrayD<u8>),
    U16(ArrayD<u16>),
    U32(ArrayD<u32>),
    U64(ArrayD<u64>),
    I8(ArrayD<i8>),
    I16(ArrayD<i16>),
    I32(ArrayD<i32>),
    I64(ArrayD<i64>),
    F32(ArrayD<f32>),
    F64(ArrayD<f64>),
    Complex32(ArrayD<Complex<f32>>),
    Complex64(ArrayD<Complex<f64>>),
}

impl Samples {
    /// Zero-filled standard-layout storage with the given shape and type.
    #[must_use]
    pub fn zeros(shape: &[usize], dtype: DType) -> Samples {
        fn filled<T: Element>(shape: &[usize]) -> Samples {
            T::wrap(ArrayD::from_elem(IxDyn(shape), T::zero()))
        }
        match dtype {
            DType::Bool => filled::<bool>(shape),
            DType::U8 => filled::<u8>(shape),
            DType::U16 => filled::<u16>(shape),
            DType::U32 => filled::<u32>(shape),
            DType::U64 => filled::<u64>(shape),
            DType::I8 => filled::<i8>(shape),
            DType::I16 => filled::<i16>(shape),
            DType::I32 => filled::<i32>(shape),
            DType::I64 => filled::<i64>(shape),
            DType::F32 => filled::<f32>(shape),
            DType::F64 => filled::<f64>(shape),
            DType::Complex32 => filled::<Complex<f32>>(shape),
            DType::Complex64 => filled::<Complex<f64>>(shape),
        }
    }

    /// Runtime tag of the stored element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        fn tag<T: Element>(_: &ArrayD<T>) -> DType {
            T::DTYPE
        }
        with_samples!(self, array => tag(array))
    }

    #[must_use]
    pub fn shape(&self) -> &[usize] {
        with_samples!(self, array => array.shape())
    }

    #[must_use]
    pub fn strides(&self) -> &[isize] {
        with_samples!(self, array => array.strides())
    }

    #[must_use]
    pub fn ndim(&self) -> usize {
        with_samples!(self, array => array.ndim())
    }

    /// Total number of stored samples.
    #[must_use]
    pub fn len(&self) -> usize {
        with_samples!(self, array => array.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Read one sample as a type-erased [`Scalar`].
    #[must_use]
    pub fn scalar_at(&self, index: &[usize]) -> Option<Scalar> {
        with_samples!(self, array => array.get(index).copied().map(Element::scalar))
    }

    /// Store one typed sample at a flat storage offset.
    ///
    /// When `T` matches the stored element type the value is written
    /// directly; otherwise it crosses through [`Scalar::cast`].
    ///
    /// # Errors
    ///
    /// Returns [`RuProjError::Generic`] if the offset is out of bounds or
    /// the storage is not in standard layout.
    pub fn put<T: Element>(&mut self, offset: usize, value: T) -> Result<()> {
        if let Some(array) = T::samples_mut(self) {
            return store(array, offset, value);
        }
        self.put_scalar(offset, value.scalar())
    }

    /// Store one type-erased sample at a flat storage offset, casting to
    /// the stored element type.
    ///
    /// # Errors
    ///
    /// Returns [`RuProjError::Generic`] if the offset is out of bounds or
    /// the storage is not in standard layout.
    pub fn put_scalar(&mut self, offset: usize, value: Scalar) -> Result<()> {
        with_samples!(self, array => store(array, offset, Element::from_scalar(value)))
    }
}

fn store<T: Element>(array: &mut ArrayD<T>, offset: usize, value: T) -> Result<()> {
    let samples = array.as_slice_mut().ok_or_else(|| {
        RuProjError::Generic("raster storage is not in standard layout".to_string())
    })?;
    match samples.get_mut(offset) {
        Some(slot) => {
            *slot = value;
            Ok(())
        }
        None => Err(RuProjError::Generic(format!(
            "sample offset {offset} is out of bounds"
        ))),
    }
}

/// One type-erased sample value.
///
/// `Scalar` is the single-value bridge of the projection engine: when a
/// reducer produces one element type and the output raster stores another,
/// the value makes the crossing through [`Scalar::cast`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Complex32(Complex<f32>),
    Complex64(Complex<f64>),
}

impl Scalar {
    /// Runtime tag of the carried value.
    #[must_use]
    pub fn dtype(self) -> DType {
        match self {
            Scalar::Bool(_) => DType::Bool,
            Scalar::U8(_) => DType::U8,
            Scalar::U16(_) => DType::U16,
            Scalar::U32(_) => DType::U32,
            Scalar::U64(_) => DType::U64,
            Scalar::I8(_) => DType::I8,
            Scalar::I16(_) => DType::I16,
            Scalar::I32(_) => DType::I32,
            Scalar::I64(_) => DType::I64,
            Scalar::F32(_) => DType::F32,
            Scalar::F64(_) => DType::F64,
            Scalar::Complex32(_) => DType::Complex32,
            Scalar::Complex64(_) => DType::Complex64,
        }
    }

    /// Widen to `Complex<f64>`, the common carrier for casts. Lossy above
    /// 2^53 for 64-bit integers.
    #[must_use]
    pub fn to_complex(self) -> Complex<f64> {
        let real = |v: f64| Complex::new(v, 0.0);
        match self {
            Scalar::Bool(v) => real(if v { 1.0 } else { 0.0 }),
            Scalar::U8(v) => real(f64::from(v)),
            Scalar::U16(v) => real(f64::from(v)),
            Scalar::U32(v) => real(f64::from(v)),
            Scalar::U64(v) => real(v as f64),
            Scalar::I8(v) => real(f64::from(v)),
            Scalar::I16(v) => real(f64::from(v)),
            Scalar::I32(v) => real(f64::from(v)),
            Scalar::I64(v) => real(v as f64),
            Scalar::F32(v) => real(f64::from(v)),
            Scalar::F64(v) => real(v),
            Scalar::Complex32(v) => Complex::new(f64::from(v.re), f64::from(v.im)),
            Scalar::Complex64(v) => v,
        }
    }

    /// Re-express the value in another element type.
    ///
    /// Casting routes through `Complex<f64>`: complex to real keeps the real
    /// component, real to complex gains a zero imaginary part, float to
    /// integer truncates and saturates (NaN becomes 0), and a boolean target
    /// tests `!= 0`.
    #[must_use]
    pub fn cast(self, dtype: DType) -> Scalar {
        if self.dtype() == dtype {
            return self;
        }
        let carrier = self.to_complex();
        let re = carrier.re;
        match dtype {
            DType::Bool => Scalar::Bool(re != 0.0),
            DType::U8 => Scalar::U8(re as u8),
            DType::U16 => Scalar::U16(re as u16),
            DType::U32 => Scalar::U32(re as u32),
            DType::U64 => Scalar::U64(re as u64),
            DType::I8 => Scalar::I8(re as i8),
            DType::I16 => Scalar::I16(re as i16),
            DType::I32 => Scalar::I32(re as i32),
            DType::I64 => Scalar::I64(re as i64),
            DType::F32 => Scalar::F32(re as f32),
            DType::F64 => Scalar::F64(re),
            DType::Complex32 => {
                Scalar::Complex32(Complex::new(carrier.re as f32, carrier.im as f32))
            }
            DType::Complex64 => Scalar::Complex64(carrier),
        }
    }
}

/// N-dimensional, multi-channel sample container.
///
/// Storage is always standard (row-major, contiguous) layout. A raster with
/// more than one channel keeps the channel axis as the last storage axis, so
/// [`shape`](Raster::shape) reports the spatial dimensions only and the
/// channel count is a separate property. Physical pixel size and color space
/// are carried along unchanged through a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    samples: Samples,
    channels: usize,
    pixel_size: Vec<f64>,
    color_space: Option<String>,
}

impl Raster {
    /// Zero-filled raster with the given spatial shape and channel count.
    /// A channel count of 0 is treated as 1.
    #[must_use]
    pub fn new(shape: &[usize], channels: usize, dtype: DType) -> Raster {
        let channels = channels.max(1);
        Raster {
            samples: Samples::zeros(&storage_shape_for(shape, channels), dtype),
            channels,
            pixel_size: Vec::new(),
            color_space: None,
        }
    }

    /// Single-channel raster taking ownership of an existing array.
    #[must_use]
    pub fn from_array<T: Element>(array: ArrayD<T>) -> Raster {
        Raster {
            samples: T::wrap(standard_layout(array)),
            channels: 1,
            pixel_size: Vec::new(),
            color_space: None,
        }
    }

    /// Multi-channel raster over an array whose last axis is the channel
    /// axis (for `channels > 1`).
    ///
    /// # Errors
    ///
    /// Returns [`RuProjError::InvalidArgument`] if the array has no trailing
    /// axis of size `channels` to interpret as the channel axis.
    pub fn from_array_with_channels<T: Element>(
        array: ArrayD<T>,
        channels: usize,
    ) -> Result<Raster> {
        let channels = channels.max(1);
        if channels > 1 {
            let trailing = array.ndim().checked_sub(1).map(|last| array.shape()[last]);
            if trailing != Some(channels) {
                return Err(RuProjError::InvalidArgument(format!(
                    "array of shape {:?} has no trailing axis of {} channels",
                    array.shape(),
                    channels
                )));
            }
        }
        Ok(Raster {
            samples: T::wrap(standard_layout(array)),
            channels,
            pixel_size: Vec::new(),
            color_space: None,
        })
    }

    /// Raster from a flat sample vector in storage order (dimension 0
    /// slowest, channels interleaved last).
    ///
    /// # Errors
    ///
    /// Returns [`RuProjError::ArrayError`] if the vector length does not
    /// match the shape.
    pub fn from_shape_vec<T: Element>(
        shape: &[usize],
        channels: usize,
        samples: Vec<T>,
    ) -> Result<Raster> {
        let channels = channels.max(1);
        let storage = storage_shape_for(shape, channels);
        let array = ArrayD::from_shape_vec(IxDyn(&storage), samples)?;
        Ok(Raster {
            samples: T::wrap(array),
            channels,
            pixel_size: Vec::new(),
            color_space: None,
        })
    }

    /// Raster with every sample set to `elem`.
    #[must_use]
    pub fn from_elem<T: Element>(shape: &[usize], channels: usize, elem: T) -> Raster {
        let channels = channels.max(1);
        let storage = storage_shape_for(shape, channels);
        Raster {
            samples: T::wrap(ArrayD::from_elem(IxDyn(&storage), elem)),
            channels,
            pixel_size: Vec::new(),
            color_space: None,
        }
    }

    /// Runtime tag of the stored element type.
    #[must_use]
    pub fn dtype(&self) -> DType {
        self.samples.dtype()
    }

    /// Spatial shape, without the channel axis.
    #[must_use]
    pub fn shape(&self) -> &[usize] {
        let storage = self.samples.shape();
        if self.channels > 1 {
            &storage[..storage.len() - 1]
        } else {
            storage
        }
    }

    /// Number of spatial dimensions.
    #[must_use]
    pub fn ndim(&self) -> usize {
        self.shape().len()
    }

    #[must_use]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Number of pixels (product of the spatial shape).
    #[must_use]
    pub fn num_pixels(&self) -> usize {
        self.shape().iter().product()
    }

    /// Total number of samples, channels included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Physical size of one pixel per dimension; empty when unknown.
    #[must_use]
    pub fn pixel_size(&self) -> &[f64] {
        &self.pixel_size
    }

    pub fn set_pixel_size(&mut self, pixel_size: Vec<f64>) {
        self.pixel_size = pixel_size;
    }

    #[must_use]
    pub fn color_space(&self) -> Option<&str> {
        self.color_space.as_deref()
    }

    pub fn set_color_space(&mut self, color_space: Option<String>) {
        self.color_space = color_space;
    }

    /// Borrow the type-erased sample storage.
    #[must_use]
    pub fn samples(&self) -> &Samples {
        &self.samples
    }

    /// Mutable access to the type-erased sample storage.
    pub fn samples_mut(&mut self) -> &mut Samples {
        &mut self.samples
    }

    /// Storage shape, channel axis included (for `channels > 1`).
    #[must_use]
    pub fn storage_shape(&self) -> &[usize] {
        self.samples.shape()
    }

    /// Storage strides, in samples, channel axis included.
    #[must_use]
    pub fn storage_strides(&self) -> &[isize] {
        self.samples.strides()
    }

    /// Borrow the typed array, if `T` matches the stored element type.
    #[must_use]
    pub fn array<T: Element>(&self) -> Option<&ArrayD<T>> {
        T::samples(&self.samples)
    }

    /// Mutable variant of [`array`](Raster::array).
    pub fn array_mut<T: Element>(&mut self) -> Option<&mut ArrayD<T>> {
        T::samples_mut(&mut self.samples)
    }

    /// Read one sample by spatial index and channel. `None` if the index,
    /// channel, or element type does not match.
    #[must_use]
    pub fn get<T: Element>(&self, index: &[usize], channel: usize) -> Option<T> {
        let storage = self.storage_index(index, channel)?;
        self.array::<T>()?.get(storage.as_slice()).copied()
    }

    /// Write one sample by spatial index and channel.
    ///
    /// # Errors
    ///
    /// Returns [`RuProjError::UnsupportedType`] if `T` does not match the
    /// stored element type, or [`RuProjError::InvalidArgument`] if the index
    /// or channel is out of range.
    pub fn set<T: Element>(&mut self, index: &[usize], channel: usize, value: T) -> Result<()> {
        let dtype = self.dtype();
        let storage = self.storage_index(index, channel).ok_or_else(|| {
            RuProjError::InvalidArgument(format!(
                "index {index:?} with channel {channel} does not address this raster"
            ))
        })?;
        let array = self.array_mut::<T>().ok_or_else(|| RuProjError::UnsupportedType {
            dtype,
            operation: format!("set<{}>", T::DTYPE),
        })?;
        let slot = array.get_mut(storage.as_slice()).ok_or_else(|| {
            RuProjError::InvalidArgument(format!("index {index:?} is out of bounds"))
        })?;
        *slot = value;
        Ok(())
    }

    /// Read one sample as a type-erased [`Scalar`].
    #[must_use]
    pub fn scalar_at(&self, index: &[usize], channel: usize) -> Option<Scalar> {
        let storage = self.storage_index(index, channel)?;
        self.samples.scalar_at(&storage)
    }

    fn storage_index(&self, index: &[usize], channel: usize) -> Option<Vec<usize>> {
        if index.len() != self.ndim() || channel >= self.channels {
            return None;
        }
        let mut storage = index.to_vec();
        if self.channels > 1 {
            storage.push(channel);
        }
        Some(storage)
    }
}

fn storage_shape_for(shape: &[usize], channels: usize) -> Vec<usize> {
    let mut storage = shape.to_vec();
    if channels > 1 {
        storage.push(channels);
    }
    storage
}

fn standard_layout<T: Element>(array: ArrayD<T>) -> ArrayD<T> {
    if array.as_slice().is_some() {
        array
    } else {
        array.as_standard_layout().into_owned()
    }
}
