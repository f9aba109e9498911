//! Tests for the statistic entry points and their type promotion rules

use approx::assert_relative_eq;
use num_complex::Complex;
use ru_proj::dtype::DType;
use ru_proj::errors::RuProjError;
use ru_proj::raster::{Raster, Scalar};
use ru_proj::statistics::{
    maximum, mean, mean_abs, mean_square, minimum, percentile, product, reduce,
    standard_deviation, sum, sum_abs, sum_square, variance, Mode, Statistic,
};

#[test]
fn test_sum_and_mean_promote_to_flex_types() {
    // u8 promotes to f32.
    let bytes = Raster::from_shape_vec(&[2, 3], 1, vec![1u8, 2, 3, 4, 5, 6]).unwrap();
    let total = sum(&bytes, None, &[]).unwrap();
    assert_eq!(total.dtype(), DType::F32);
    assert_eq!(total.scalar_at(&[0, 0], 0), Some(Scalar::F32(21.0)));
    let avg = mean(&bytes, None, Mode::Linear, &[]).unwrap();
    assert_eq!(avg.scalar_at(&[0, 0], 0), Some(Scalar::F32(3.5)));

    // i64 promotes to f64.
    let wide = Raster::from_shape_vec(&[3], 1, vec![-1i64, 0, 7]).unwrap();
    let total = sum(&wide, None, &[]).unwrap();
    assert_eq!(total.dtype(), DType::F64);
    assert_eq!(total.scalar_at(&[0], 0), Some(Scalar::F64(6.0)));

    // Complex sums stay complex.
    let complex = Raster::from_shape_vec(
        &[2],
        1,
        vec![Complex::new(1.0f32, 2.0), Complex::new(3.0, -1.0)],
    )
    .unwrap();
    let total = sum(&complex, None, &[]).unwrap();
    assert_eq!(total.dtype(), DType::Complex32);
    assert_eq!(
        total.scalar_at(&[0], 0),
        Some(Scalar::Complex32(Complex::new(4.0, 1.0)))
    );
}

#[test]
fn test_mean_equals_sum_over_count_for_every_selector() {
    let values: Vec<f64> = (0..24).map(|i| f64::from(i) * 0.37 - 2.0).collect();
    let input = Raster::from_shape_vec(&[2, 3, 4], 1, values).unwrap();

    for bits in 0..8u32 {
        let process = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0];
        let count: usize = input
            .shape()
            .iter()
            .zip(&process)
            .filter(|&(_, &flag)| flag)
            .map(|(&size, _)| size)
            .product();
        let means = mean(&input, None, Mode::Linear, &process).unwrap();
        let sums = sum(&input, None, &process).unwrap();
        let shape = means.shape().to_vec();
        for x in 0..shape[0] {
            for y in 0..shape[1] {
                for z in 0..shape[2] {
                    let m = means.get::<f64>(&[x, y, z], 0).unwrap();
                    let s = sums.get::<f64>(&[x, y, z], 0).unwrap();
                    assert_relative_eq!(m * count as f64, s, epsilon = 1e-9);
                }
            }
        }
    }
}

#[test]
fn test_extrema_bound_the_mean() {
    let values: Vec<f64> = (0..24u32).map(|i| f64::from((i * 7919) % 23)).collect();
    let input = Raster::from_shape_vec(&[2, 3, 4], 1, values).unwrap();

    for bits in 1..8u32 {
        let process = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0];
        let lows = minimum(&input, None, &process).unwrap();
        let mids = mean(&input, None, Mode::Linear, &process).unwrap();
        let highs = maximum(&input, None, &process).unwrap();
        let shape = mids.shape().to_vec();
        for x in 0..shape[0] {
            for y in 0..shape[1] {
                for z in 0..shape[2] {
                    let index = [x, y, z];
                    let low = lows.get::<f64>(&index, 0).unwrap();
                    let mid = mids.get::<f64>(&index, 0).unwrap();
                    let high = highs.get::<f64>(&index, 0).unwrap();
                    assert!(low <= mid && mid <= high);
                }
            }
        }
    }
}

#[test]
fn test_product_of_selected_samples() {
    let input = Raster::from_shape_vec(&[4], 1, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let out = product(&input, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(24.0)));

    // Masked-out samples do not contribute.
    let mut mask = Raster::from_elem(&[4], 1, false);
    mask.set(&[1], 0, true).unwrap();
    mask.set(&[3], 0, true).unwrap();
    let out = product(&input, Some(&mask), &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(8.0)));

    // An empty selection yields the multiplicative seed.
    let none = Raster::from_elem(&[4], 1, false);
    let out = product(&input, Some(&none), &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(1.0)));
}

#[test]
fn test_absolute_value_statistics() {
    let signed = Raster::from_shape_vec(&[3], 1, vec![-3i32, 4, -5]).unwrap();
    let out = sum_abs(&signed, None, &[]).unwrap();
    assert_eq!(out.dtype(), DType::F64); // i32 promotes to f64
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F64(12.0)));
    let out = mean_abs(&signed, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F64(4.0)));

    // Unsigned input: the absolute value is the identity.
    let unsigned = Raster::from_shape_vec(&[3], 1, vec![3u8, 4, 5]).unwrap();
    let out = sum_abs(&unsigned, None, &[]).unwrap();
    assert_eq!(out.dtype(), DType::F32);
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(12.0)));

    // Complex samples contribute their modulus, so the result is real.
    let complex = Raster::from_shape_vec(
        &[2],
        1,
        vec![Complex::new(3.0f32, 4.0), Complex::new(0.0, 0.0)],
    )
    .unwrap();
    let out = mean_abs(&complex, None, &[]).unwrap();
    assert_eq!(out.dtype(), DType::F32);
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(2.5)));

    // Binary rasters have no meaningful absolute value.
    let bits = Raster::from_elem(&[2], 1, true);
    assert!(matches!(
        sum_abs(&bits, None, &[]),
        Err(RuProjError::UnsupportedType { .. })
    ));
    assert!(matches!(
        mean_abs(&bits, None, &[]),
        Err(RuProjError::UnsupportedType { .. })
    ));
}

#[test]
fn test_square_statistics_and_binary_identity() {
    let input = Raster::from_shape_vec(&[3], 1, vec![1i16, 2, 3]).unwrap();
    let out = sum_square(&input, None, &[]).unwrap();
    assert_eq!(out.dtype(), DType::F32); // i16 promotes to f32
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(14.0)));
    let out = mean_square(&input, None, &[]).unwrap();
    assert_relative_eq!(out.get::<f32>(&[0], 0).unwrap(), 14.0 / 3.0, epsilon = 1e-6);

    // Samples promote before the multiply, so narrow types do not wrap.
    let narrow = Raster::from_shape_vec(&[2], 1, vec![100i8, 100]).unwrap();
    let out = sum_square(&narrow, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(20000.0)));

    // Squaring binary samples is the identity, so the square statistics
    // collapse to the plain ones.
    let bits = Raster::from_shape_vec(&[4], 1, vec![true, true, false, true]).unwrap();
    let out = sum_square(&bits, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(3.0)));
    let out = mean_square(&bits, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(0.75)));
}

#[test]
fn test_variance_and_standard_deviation() {
    let input = Raster::from_shape_vec(&[4], 1, vec![1.0f64, 2.0, 3.0, 4.0]).unwrap();
    let var = variance(&input, None, Mode::Linear, &[]).unwrap();
    // Sample variance of 1..4: 5/3.
    assert_relative_eq!(var.get::<f64>(&[0], 0).unwrap(), 5.0 / 3.0, epsilon = 1e-12);
    let std = standard_deviation(&input, None, Mode::Linear, &[]).unwrap();
    assert_relative_eq!(
        std.get::<f64>(&[0], 0).unwrap(),
        (5.0f64 / 3.0).sqrt(),
        epsilon = 1e-12
    );

    // Integer inputs accumulate in f64 and store the promoted float type.
    let ints = Raster::from_shape_vec(&[4], 1, vec![1u8, 2, 3, 4]).unwrap();
    let var = variance(&ints, None, Mode::Linear, &[]).unwrap();
    assert_eq!(var.dtype(), DType::F32);
    assert_relative_eq!(var.get::<f32>(&[0], 0).unwrap(), 5.0 / 3.0, epsilon = 1e-6);

    // A single selected sample has zero spread.
    let mut mask = Raster::from_elem(&[4], 1, false);
    mask.set(&[2], 0, true).unwrap();
    let var = variance(&input, Some(&mask), Mode::Linear, &[]).unwrap();
    assert_eq!(var.get::<f64>(&[0], 0), Some(0.0));
    let std = standard_deviation(&input, Some(&mask), Mode::Linear, &[]).unwrap();
    assert_eq!(std.get::<f64>(&[0], 0), Some(0.0));
}

#[test]
fn test_binary_variance_reduces_to_mean() {
    let bits = Raster::from_shape_vec(&[4], 1, vec![true, false, true, true]).unwrap();
    let var = variance(&bits, None, Mode::Linear, &[]).unwrap();
    let avg = mean(&bits, None, Mode::Linear, &[]).unwrap();
    assert_eq!(var.dtype(), DType::F32);
    assert_eq!(var.scalar_at(&[0], 0), avg.scalar_at(&[0], 0));
    assert_eq!(var.scalar_at(&[0], 0), Some(Scalar::F32(0.75)));

    let std = standard_deviation(&bits, None, Mode::Linear, &[]).unwrap();
    assert_eq!(std.scalar_at(&[0], 0), Some(Scalar::F32(0.75)));
}

#[test]
fn test_unsupported_type_families_are_rejected() {
    let complex = Raster::new(&[2], 1, DType::Complex64);
    for result in [
        variance(&complex, None, Mode::Linear, &[]),
        standard_deviation(&complex, None, Mode::Linear, &[]),
        minimum(&complex, None, &[]),
        maximum(&complex, None, &[]),
        percentile(&complex, None, 50.0, &[]),
    ] {
        assert!(matches!(result, Err(RuProjError::UnsupportedType { .. })));
    }

    // Directional statistics exist for float samples only.
    let ints = Raster::new(&[2], 1, DType::U8);
    assert!(matches!(
        mean(&ints, None, Mode::Directional, &[]),
        Err(RuProjError::UnsupportedType { .. })
    ));
    assert!(matches!(
        variance(&ints, None, Mode::Directional, &[]),
        Err(RuProjError::UnsupportedType { .. })
    ));

    // The error message names the statistic and the element type.
    let err = mean(&ints, None, Mode::Directional, &[]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Data type u8 is not supported by operation 'directional mean'"
    );
}

#[test]
fn test_directional_statistics_on_angles() {
    use std::f64::consts::{FRAC_PI_2, SQRT_2};

    // Identical angles: the mean is the angle and the dispersion is zero.
    let same = Raster::from_elem(&[5], 1, 1.0f64);
    let avg = mean(&same, None, Mode::Directional, &[]).unwrap();
    assert_relative_eq!(avg.get::<f64>(&[0], 0).unwrap(), 1.0, epsilon = 1e-12);
    let var = variance(&same, None, Mode::Directional, &[]).unwrap();
    assert_relative_eq!(var.get::<f64>(&[0], 0).unwrap(), 0.0, epsilon = 1e-9);

    // Two angles a quarter turn apart.
    let pair = Raster::from_shape_vec(&[2], 1, vec![0.0f64, FRAC_PI_2]).unwrap();
    let avg = mean(&pair, None, Mode::Directional, &[]).unwrap();
    assert_relative_eq!(
        avg.get::<f64>(&[0], 0).unwrap(),
        FRAC_PI_2 / 2.0,
        epsilon = 1e-12
    );
    // The resultant length is |(1, 0) + (0, 1)| / 2 = sqrt(2) / 2.
    let resultant = SQRT_2 / 2.0;
    let var = variance(&pair, None, Mode::Directional, &[]).unwrap();
    assert_relative_eq!(
        var.get::<f64>(&[0], 0).unwrap(),
        1.0 - resultant,
        epsilon = 1e-12
    );
    let std = standard_deviation(&pair, None, Mode::Directional, &[]).unwrap();
    assert_relative_eq!(
        std.get::<f64>(&[0], 0).unwrap(),
        (-2.0 * resultant.ln()).sqrt(),
        epsilon = 1e-12
    );
}

#[test]
fn test_identical_angles_have_zero_dispersion() {
    // Copies of one angle have a resultant of length one; rounding in the
    // unit-vector sum must not push the dispersion negative or NaN.
    for &(angle, n) in &[
        (0.05f64, 13usize),
        (1.0, 5),
        (2.4, 7),
        (4.89, 3),
        (6.2, 49),
    ] {
        let same = Raster::from_elem(&[n], 1, angle);
        let std = standard_deviation(&same, None, Mode::Directional, &[]).unwrap();
        let spread = std.get::<f64>(&[0], 0).unwrap();
        assert!(
            spread.is_finite() && spread.abs() < 1e-6,
            "standard deviation of {n} copies of angle {angle} was {spread}"
        );
        let var = variance(&same, None, Mode::Directional, &[]).unwrap();
        let spread = var.get::<f64>(&[0], 0).unwrap();
        assert!(
            (0.0..1e-9).contains(&spread),
            "variance of {n} copies of angle {angle} was {spread}"
        );
    }
}

#[test]
fn test_directional_statistics_of_empty_selection() {
    let input = Raster::from_elem(&[3], 1, 0.5f64);
    let mask = Raster::from_elem(&[3], 1, false);

    // The resultant of an empty sum has no direction; atan2(0, 0) is 0.
    let avg = mean(&input, Some(&mask), Mode::Directional, &[]).unwrap();
    assert_eq!(avg.get::<f64>(&[0], 0), Some(0.0));
    // The dispersion of an empty selection is undefined.
    let var = variance(&input, Some(&mask), Mode::Directional, &[]).unwrap();
    assert!(var.get::<f64>(&[0], 0).unwrap().is_nan());
}

#[test]
fn test_extrema_respect_mask_and_seed_empty_blocks() {
    let input = Raster::from_shape_vec(&[2, 3], 1, vec![5i32, -2, 9, 0, 7, -8]).unwrap();

    let lows = minimum(&input, None, &[false, true]).unwrap();
    assert_eq!(lows.get::<i32>(&[0, 0], 0), Some(-2));
    assert_eq!(lows.get::<i32>(&[1, 0], 0), Some(-8));
    let highs = maximum(&input, None, &[false, true]).unwrap();
    assert_eq!(highs.get::<i32>(&[0, 0], 0), Some(9));
    assert_eq!(highs.get::<i32>(&[1, 0], 0), Some(7));

    // Row 1 masked out entirely: the seeds survive.
    let mut mask = Raster::from_elem(&[2, 3], 1, true);
    for col in 0..3 {
        mask.set(&[1, col], 0, false).unwrap();
    }
    let highs = maximum(&input, Some(&mask), &[false, true]).unwrap();
    assert_eq!(highs.get::<i32>(&[0, 0], 0), Some(9));
    assert_eq!(highs.get::<i32>(&[1, 0], 0), Some(i32::MIN));
    let lows = minimum(&input, Some(&mask), &[false, true]).unwrap();
    assert_eq!(lows.get::<i32>(&[1, 0], 0), Some(i32::MAX));
}

#[test]
fn test_percentile_endpoints_and_nearest_rank() {
    let input = Raster::from_shape_vec(
        &[10],
        1,
        vec![7.0f64, 1.0, 9.0, 3.0, 10.0, 5.0, 2.0, 8.0, 6.0, 4.0],
    )
    .unwrap();

    // The endpoints fold to the extrema.
    let p0 = percentile(&input, None, 0.0, &[]).unwrap();
    assert_eq!(p0.get::<f64>(&[0], 0), Some(1.0));
    let p100 = percentile(&input, None, 100.0, &[]).unwrap();
    assert_eq!(p100.get::<f64>(&[0], 0), Some(10.0));

    // Interior ranks: round(p / 100 * (n - 1)) into the sorted samples.
    let median = percentile(&input, None, 50.0, &[]).unwrap();
    assert_eq!(median.get::<f64>(&[0], 0), Some(6.0)); // rank round(4.5) = 5
    let p25 = percentile(&input, None, 25.0, &[]).unwrap();
    assert_eq!(p25.get::<f64>(&[0], 0), Some(3.0)); // rank round(2.25) = 2

    // The result is an existing sample, stored in the input's own type.
    let ints = Raster::from_shape_vec(&[4], 1, vec![10u8, 20, 30, 40]).unwrap();
    let p50 = percentile(&ints, None, 50.0, &[]).unwrap();
    assert_eq!(p50.dtype(), DType::U8);
    assert_eq!(p50.get::<u8>(&[0], 0), Some(30)); // rank round(1.5) = 2
}

#[test]
fn test_percentile_rejects_out_of_range_arguments() {
    let input = Raster::from_elem(&[4], 1, 1.0f32);
    for p in [-0.5, 100.5, f64::NAN] {
        assert!(matches!(
            percentile(&input, None, p, &[]),
            Err(RuProjError::InvalidArgument(_))
        ));
    }
}

#[test]
fn test_statistic_selector_matches_direct_calls() {
    let input =
        Raster::from_shape_vec(&[2, 3], 1, vec![4.0f64, 1.0, 7.0, 2.0, 9.0, 3.0]).unwrap();

    let by_name = reduce(&input, None, Statistic::Maximum, &[true, false]).unwrap();
    let direct = maximum(&input, None, &[true, false]).unwrap();
    assert_eq!(by_name, direct);

    let by_name = reduce(&input, None, Statistic::Variance, &[false, true]).unwrap();
    let direct = variance(&input, None, Mode::Linear, &[false, true]).unwrap();
    assert_eq!(by_name, direct);

    assert_eq!(Statistic::Mean.as_str(), "mean");
    assert_eq!(Statistic::SumSquare.as_str(), "sum of squares");
    assert_eq!(Statistic::StandardDeviation.as_str(), "standard deviation");
    assert_eq!(Mode::Linear.as_str(), "linear");
    assert_eq!(Mode::Directional.as_str(), "directional");
    assert_eq!(Mode::default(), Mode::Linear);
}

#[test]
fn test_full_collapse_matches_flat_sequence_statistics() {
    let values = vec![0.5f64, -1.25, 3.75, 2.0, -0.5, 1.0];
    let input = Raster::from_shape_vec(&[3, 2], 1, values.clone()).unwrap();

    let total = sum(&input, None, &[]).unwrap();
    let expected: f64 = values.iter().sum();
    assert_relative_eq!(
        total.get::<f64>(&[0, 0], 0).unwrap(),
        expected,
        epsilon = 1e-12
    );

    let high = maximum(&input, None, &[]).unwrap();
    assert_eq!(high.get::<f64>(&[0, 0], 0), Some(3.75));
    let low = minimum(&input, None, &[]).unwrap();
    assert_eq!(low.get::<f64>(&[0, 0], 0), Some(-1.25));
}

#[test]
#[allow(deprecated)]
fn test_deprecated_wrappers_still_reduce() {
    let input = Raster::from_shape_vec(&[3], 1, vec![1.0f32, 2.0, 3.0]).unwrap();
    let out = ru_proj::reduce_mean(&input, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(2.0)));
    let out = ru_proj::reduce_max(&input, None, &[]).unwrap();
    assert_eq!(out.scalar_at(&[0], 0), Some(Scalar::F32(3.0)));
}
