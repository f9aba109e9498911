//! Element types, runtime type tags, and numeric promotion rules
//!
//! Rasters are type-erased at the API boundary: a [`DType`] tag names the
//! stored element type, and the [`Element`] trait is its compile-time mirror.
//! The statistic entry points bridge the two with the dispatch macros in
//! [`crate::dispatch`], instantiating each reducer once per supported type.
//!
//! Accumulation does not happen in the raw element type: small integers and
//! booleans promote to `f32`, wide integers to `f64`, and complex values stay
//! complex. [`DType::suggest_flex`] and [`DType::suggest_float`] are the
//! tag-level versions of these rules; [`Element::Flex`] and
//! [`Element::Float`] the type-level ones. The two always agree.

use std::fmt;
use std::ops::Div;

use ndarray::ArrayD;
use num_complex::Complex;
use num_traits::NumAssign;

use crate::raster::{Samples, Scalar};

/// Runtime tag identifying the element type stored in a raster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    /// Boolean (binary) samples
    Bool,
    /// 8-bit unsigned integer
    U8,
    /// 16-bit unsigned integer
    U16,
    /// 32-bit unsigned integer
    U32,
    /// 64-bit unsigned integer
    U64,
    /// 8-bit signed integer
    I8,
    /// 16-bit signed integer
    I16,
    /// 32-bit signed integer
    I32,
    /// 64-bit signed integer
    I64,
    /// 32-bit float
    F32,
    /// 64-bit float
    F64,
    /// Complex number with f32 components
    Complex32,
    /// Complex number with f64 components
    Complex64,
}

impl DType {
    /// Every supported element type, in declaration order.
    pub const ALL: [DType; 13] = [
        DType::Bool,
        DType::U8,
        DType::U16,
        DType::U32,
        DType::U64,
        DType::I8,
        DType::I16,
        DType::I32,
        DType::I64,
        DType::F32,
        DType::F64,
        DType::Complex32,
        DType::Complex64,
    ];

    /// Get the string representation of the type tag
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex32 => "complex32",
            Self::Complex64 => "complex64",
        }
    }

    /// Size of one sample in bytes
    #[must_use]
    pub const fn size_of(self) -> usize {
        match self {
            Self::Bool | Self::U8 | Self::I8 => 1,
            Self::U16 | Self::I16 => 2,
            Self::U32 | Self::I32 | Self::F32 => 4,
            Self::U64 | Self::I64 | Self::F64 | Self::Complex32 => 8,
            Self::Complex64 => 16,
        }
    }

    #[must_use]
    pub const fn is_bool(self) -> bool {
        matches!(self, Self::Bool)
    }

    /// Unsigned integer tags (booleans are not counted as unsigned)
    #[must_use]
    pub const fn is_unsigned(self) -> bool {
        matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    #[must_use]
    pub const fn is_signed_int(self) -> bool {
        matches!(self, Self::I8 | Self::I16 | Self::I32 | Self::I64)
    }

    #[must_use]
    pub const fn is_integer(self) -> bool {
        self.is_unsigned() || self.is_signed_int()
    }

    #[must_use]
    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    #[must_use]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex32 | Self::Complex64)
    }

    /// Real-valued float type suitable for accumulating this type: narrow
    /// types go to `f32`, wide ones to `f64`. Complex tags map to their
    /// component float.
    #[must_use]
    pub const fn suggest_float(self) -> DType {
        match self {
            Self::Bool
            | Self::U8
            | Self::I8
            | Self::U16
            | Self::I16
            | Self::F32
            | Self::Complex32 => DType::F32,
            _ => DType::F64,
        }
    }

    /// Like [`suggest_float`](Self::suggest_float), but complex types stay
    /// complex.
    #[must_use]
    pub const fn suggest_flex(self) -> DType {
        match self {
            Self::Complex32 => DType::Complex32,
            Self::Complex64 => DType::Complex64,
            other => other.suggest_float(),
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Compile-time mirror of [`DType`]: the closed set of element types the
/// projection engine instantiates reducers for.
///
/// Besides the numeric conversions, each implementation carries the witness
/// hooks that move typed arrays in and out of the type-erased [`Samples`]
/// storage and wrap single values as [`Scalar`]s.
pub trait Element: Copy + PartialEq + fmt::Debug + Send + Sync + 'static {
    /// Runtime tag for this element type.
    const DTYPE: DType;

    /// Precision-promoted accumulation type; complex stays complex.
    /// Agrees with [`DType::suggest_flex`].
    type Flex: Element + NumAssign + Div<Self::Float, Output = Self::Flex>;

    /// Real-valued promoted type. Agrees with [`DType::suggest_float`].
    type Float: Element + num_traits::Float + NumAssign;

    /// Additive identity of the raw element type.
    fn zero() -> Self;

    /// Promote one sample for accumulation.
    fn to_flex(self) -> Self::Flex;

    /// Absolute value (complex modulus) in the promoted float type.
    fn float_abs(self) -> Self::Float;

    /// Wrap one value as a type-erased [`Scalar`].
    fn scalar(self) -> Scalar;

    /// Extract one value from a type-erased [`Scalar`], casting as needed.
    fn from_scalar(scalar: Scalar) -> Self;

    /// Borrow the typed array out of a [`Samples`] store, if the tags match.
    fn samples(samples: &Samples) -> Option<&ArrayD<Self>>;

    /// Mutable variant of [`samples`](Self::samples).
    fn samples_mut(samples: &mut Samples) -> Option<&mut ArrayD<Self>>;

    /// Move a typed array into the matching [`Samples`] variant.
    fn wrap(array: ArrayD<Self>) -> Samples;
}

/// Real-ordered element types: everything except the complex pair.
///
/// Adds the total value bounds and the `f64` widening that the extremum,
/// variance, and percentile reducers rely on.
pub trait RealElement: Element + PartialOrd {
    /// Widen to `f64` (lossy above 2^53 for 64-bit integers).
    fn to_f64(self) -> f64;

    /// Smallest representable value; seeds a running maximum.
    fn lowest() -> Self;

    /// Largest representable value; seeds a running minimum.
    fn highest() -> Self;
}

macro_rules! impl_element_witness {
    ($variant:ident) => {
        fn scalar(self) -> Scalar {
            Scalar::$variant(self)
        }

        fn from_scalar(scalar: Scalar) -> Self {
            match scalar.cast(DType::$variant) {
                Scalar::$variant(value) => value,
                _ => Self::zero(),
            }
        }

        fn samples(samples: &Samples) -> Option<&ArrayD<Self>> {
            match samples {
                Samples::$variant(array) => Some(array),
                _ => None,
            }
        }

        fn samples_mut(samples: &mut Samples) -> Option<&mut ArrayD<Self>> {
            match samples {
                Samples::$variant(array) => Some(array),
                _ => None,
            }
        }

        fn wrap(array: ArrayD<Self>) -> Samples {
            Samples::$variant(array)
        }
    };
}

macro_rules! impl_int_element {
    ($t:ty, $variant:ident, $flex:ty) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Flex = $flex;
            type Float = $flex;

            fn zero() -> Self {
                0
            }

            fn to_flex(self) -> $flex {
                self as $flex
            }

            fn float_abs(self) -> $flex {
                (self as $flex).abs()
            }

            impl_element_witness!($variant);
        }

        impl RealElement for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn lowest() -> Self {
                <$t>::MIN
            }

            fn highest() -> Self {
                <$t>::MAX
            }
        }
    };
}

impl_int_element!(u8, U8, f32);
impl_int_element!(u16, U16, f32);
impl_int_element!(u32, U32, f64);
impl_int_element!(u64, U64, f64);
impl_int_element!(i8, I8, f32);
impl_int_element!(i16, I16, f32);
impl_int_element!(i32, I32, f64);
impl_int_element!(i64, I64, f64);

macro_rules! impl_float_element {
    ($t:ty, $variant:ident) => {
        impl Element for $t {
            const DTYPE: DType = DType::$variant;
            type Flex = $t;
            type Float = $t;

            fn zero() -> Self {
                0.0
            }

            fn to_flex(self) -> $t {
                self
            }

            fn float_abs(self) -> $t {
                self.abs()
            }

            impl_element_witness!($variant);
        }

        impl RealElement for $t {
            fn to_f64(self) -> f64 {
                self as f64
            }

            fn lowest() -> Self {
                <$t>::MIN
            }

            fn highest() -> Self {
                <$t>::MAX
            }
        }
    };
}

impl_float_element!(f32, F32);
impl_float_element!(f64, F64);

impl Element for bool {
    const DTYPE: DType = DType::Bool;
    type Flex = f32;
    type Float = f32;

    fn zero() -> Self {
        false
    }

    fn to_flex(self) -> f32 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn float_abs(self) -> f32 {
        self.to_flex()
    }

    impl_element_witness!(Bool);
}

impl RealElement for bool {
    fn to_f64(self) -> f64 {
        if self {
            1.0
        } else {
            0.0
        }
    }

    fn lowest() -> Self {
        false
    }

    fn highest() -> Self {
        true
    }
}

macro_rules! impl_complex_element {
    ($component:ty, $variant:ident) => {
        impl Element for Complex<$component> {
            const DTYPE: DType = DType::$variant;
            type Flex = Complex<$component>;
            type Float = $component;

            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }

            fn to_flex(self) -> Self {
                self
            }

            fn float_abs(self) -> $component {
                self.norm()
            }

            impl_element_witness!($variant);
        }
    };
}

impl_complex_element!(f32, Complex32);
impl_complex_element!(f64, Complex64);
