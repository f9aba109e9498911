//! Runtime element-type dispatch for the statistic entry points
//!
//! Every statistic supports a closed family of element types. The macros
//! below map a runtime [`DType`](crate::dtype::DType) tag to one
//! monomorphized instantiation of a generic body (`type T = ...; body`), one
//! macro per family. A tag outside the family produces an
//! [`UnsupportedType`](crate::errors::RuProjError::UnsupportedType) error
//! carrying the operation name, so the rejection message always says which
//! statistic refused which type.

/// Dispatch over every supported element type.
///
/// Every tag has an arm, so unlike the family macros below this one takes
/// no operation name and cannot reject a type.
#[macro_export]
macro_rules! dispatch_all {
    ($dtype:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex32 => {
                type $T = ::num_complex::Complex<f32>;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = ::num_complex::Complex<f64>;
                $body
            }
        }
    };
}

/// Dispatch over the floating-point element types only.
#[macro_export]
macro_rules! dispatch_float {
    ($dtype:expr, $op:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            other => Err($crate::errors::RuProjError::UnsupportedType {
                dtype: other,
                operation: $op.to_string(),
            }),
        }
    };
}

/// Dispatch over the signed element types: signed integers, floats, and
/// complex.
#[macro_export]
macro_rules! dispatch_signed {
    ($dtype:expr, $op:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex32 => {
                type $T = ::num_complex::Complex<f32>;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = ::num_complex::Complex<f64>;
                $body
            }
            other => Err($crate::errors::RuProjError::UnsupportedType {
                dtype: other,
                operation: $op.to_string(),
            }),
        }
    };
}

/// Dispatch over the unsigned integer element types only.
#[macro_export]
macro_rules! dispatch_unsigned {
    ($dtype:expr, $op:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            other => Err($crate::errors::RuProjError::UnsupportedType {
                dtype: other,
                operation: $op.to_string(),
            }),
        }
    };
}

/// Dispatch over every element type except booleans.
#[macro_export]
macro_rules! dispatch_nonbinary {
    ($dtype:expr, $op:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            $crate::dtype::DType::Complex32 => {
                type $T = ::num_complex::Complex<f32>;
                $body
            }
            $crate::dtype::DType::Complex64 => {
                type $T = ::num_complex::Complex<f64>;
                $body
            }
            other => Err($crate::errors::RuProjError::UnsupportedType {
                dtype: other,
                operation: $op.to_string(),
            }),
        }
    };
}

/// Dispatch over every real-ordered element type (everything but complex).
#[macro_export]
macro_rules! dispatch_noncomplex {
    ($dtype:expr, $op:expr, $T:ident => $body:block) => {
        match $dtype {
            $crate::dtype::DType::Bool => {
                type $T = bool;
                $body
            }
            $crate::dtype::DType::U8 => {
                type $T = u8;
                $body
            }
            $crate::dtype::DType::U16 => {
                type $T = u16;
                $body
            }
            $crate::dtype::DType::U32 => {
                type $T = u32;
                $body
            }
            $crate::dtype::DType::U64 => {
                type $T = u64;
                $body
            }
            $crate::dtype::DType::I8 => {
                type $T = i8;
                $body
            }
            $crate::dtype::DType::I16 => {
                type $T = i16;
                $body
            }
            $crate::dtype::DType::I32 => {
                type $T = i32;
                $body
            }
            $crate::dtype::DType::I64 => {
                type $T = i64;
                $body
            }
            $crate::dtype::DType::F32 => {
                type $T = f32;
                $body
            }
            $crate::dtype::DType::F64 => {
                type $T = f64;
                $body
            }
            other => Err($crate::errors::RuProjError::UnsupportedType {
                dtype: other,
                operation: $op.to_string(),
            }),
        }
    };
}
