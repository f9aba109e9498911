use approx::assert_relative_eq;
use ru_proj::dtype::DType;
use ru_proj::projection::project;
use ru_proj::raster::Raster;
use ru_proj::statistics::{maximum, mean, reducers::MeanProjection, sum, Mode};

#[test]
fn test_channel_raster_reduces_per_channel() {
    // 3 x 4 x 2 raster with 3 channels, all pixels (1, 1, 1) except the
    // pixel at the origin, which holds (2, 3, 4).
    let mut input = Raster::from_elem(&[3, 4, 2], 3, 1u8);
    input.set(&[0, 0, 0], 0, 2u8).unwrap();
    input.set(&[0, 0, 0], 1, 3u8).unwrap();
    input.set(&[0, 0, 0], 2, 4u8).unwrap();

    // Collapse every spatial dimension: one pixel, still 3 channels, still u8.
    let out = maximum(&input, None, &[]).unwrap();
    assert_eq!(out.shape(), &[1, 1, 1]);
    assert_eq!(out.channels(), 3);
    assert_eq!(out.dtype(), DType::U8);
    for (channel, expected) in [2u8, 3, 4].into_iter().enumerate() {
        assert_eq!(out.get::<u8>(&[0, 0, 0], channel), Some(expected));
    }

    // Keep dimension 0: the hot pixel contributes only to slice 0.
    let out = maximum(&input, None, &[false, true, true]).unwrap();
    assert_eq!(out.shape(), &[3, 1, 1]);
    for (channel, expected) in [2u8, 3, 4].into_iter().enumerate() {
        assert_eq!(out.get::<u8>(&[0, 0, 0], channel), Some(expected));
    }
    for x in 1..3 {
        for channel in 0..3 {
            assert_eq!(out.get::<u8>(&[x, 0, 0], channel), Some(1));
        }
    }
}

#[test]
fn test_single_hot_sample_mean_and_directional_mean() {
    // 24 samples, all zero except one.
    let mut input = Raster::from_elem(&[3, 4, 2], 1, 0.0f32);
    input.set(&[0, 0, 0], 0, 1.0f32).unwrap();

    let out = mean(&input, None, Mode::Linear, &[]).unwrap();
    assert_eq!(out.dtype(), DType::F32);
    assert_relative_eq!(
        out.get::<f32>(&[0, 0, 0], 0).unwrap(),
        1.0 / 24.0,
        epsilon = 1e-6
    );

    // Directionally, 23 unit vectors at angle 0 and one at angle 1 sum to
    // (cos 1 + 23, sin 1).
    let out = mean(&input, None, Mode::Directional, &[]).unwrap();
    let expected = 1.0f32.sin().atan2(1.0f32.cos() + 23.0);
    assert_relative_eq!(
        out.get::<f32>(&[0, 0, 0], 0).unwrap(),
        expected,
        epsilon = 1e-4
    );
}

#[test]
fn test_output_shape_follows_selector() {
    let input = Raster::from_shape_vec(&[2, 3, 4], 1, (0..24).map(f64::from).collect()).unwrap();

    for bits in 0..8u32 {
        let process = [bits & 1 != 0, bits & 2 != 0, bits & 4 != 0];
        let out = mean(&input, None, Mode::Linear, &process).unwrap();
        let expected: Vec<usize> = input
            .shape()
            .iter()
            .zip(&process)
            .map(|(&size, &flag)| if flag { 1 } else { size })
            .collect();
        assert_eq!(out.shape(), expected.as_slice());
        assert_eq!(out.ndim(), input.ndim());
    }
}

#[test]
fn test_degenerate_projection_returns_copy() {
    let mut input = Raster::from_shape_vec(&[2, 2], 1, vec![1u8, 2, 3, 4]).unwrap();
    input.set_pixel_size(vec![0.5, 2.0]);

    // A mask is ignored when nothing is selected.
    let mask = Raster::from_elem(&[2, 2], 1, false);
    let out = mean(&input, Some(&mask), Mode::Linear, &[false, false]).unwrap();
    assert_eq!(out, input);
    assert_eq!(out.dtype(), DType::U8); // not promoted to the flex type

    // Size-1 dimensions are never processed, so an all-singleton raster
    // degenerates even under the collapse-everything selector.
    let singleton = Raster::from_shape_vec(&[1, 1], 1, vec![5.0f32]).unwrap();
    let out = sum(&singleton, None, &[]).unwrap();
    assert_eq!(out, singleton);
}

#[test]
fn test_full_collapse_agrees_across_channel_layout() {
    // The same samples, once as a single channel and once duplicated into
    // two channels, must produce the same per-channel result.
    let values: Vec<f64> = (1..=12).map(f64::from).collect();
    let single = Raster::from_shape_vec(&[3, 4], 1, values.clone()).unwrap();

    let mut doubled = Vec::with_capacity(2 * values.len());
    for value in &values {
        doubled.push(*value);
        doubled.push(*value);
    }
    let dual = Raster::from_shape_vec(&[3, 4], 2, doubled).unwrap();

    let single_out = mean(&single, None, Mode::Linear, &[]).unwrap();
    let dual_out = mean(&dual, None, Mode::Linear, &[]).unwrap();
    let expected = single_out.get::<f64>(&[0, 0], 0).unwrap();
    assert_relative_eq!(expected, 6.5, epsilon = 1e-12);
    for channel in 0..2 {
        assert_relative_eq!(
            dual_out.get::<f64>(&[0, 0], channel).unwrap(),
            expected,
            epsilon = 1e-12
        );
    }
}

#[test]
fn test_masked_mean_skips_deselected_samples() {
    // 2 x 3 input, collapsing dimension 1 folds each row to one value.
    let input =
        Raster::from_shape_vec(&[2, 3], 1, vec![1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();

    let mut mask = Raster::from_elem(&[2, 3], 1, true);
    mask.set(&[0, 2], 0, false).unwrap(); // drop the 3.0
    for col in 0..3 {
        mask.set(&[1, col], 0, false).unwrap(); // row 1: nothing selected
    }

    let out = mean(&input, Some(&mask), Mode::Linear, &[false, true]).unwrap();
    assert_eq!(out.shape(), &[2, 1]);
    // Row 0 averages the two selected samples.
    assert_relative_eq!(out.get::<f64>(&[0, 0], 0).unwrap(), 1.5, epsilon = 1e-12);
    // Row 1 selects nothing: the raw (zero) sum is returned.
    assert_eq!(out.get::<f64>(&[1, 0], 0), Some(0.0));
}

#[test]
fn test_mask_singleton_dimensions_broadcast() {
    // 2 x 3: rows are [1, 2, 3] and [10, 20, 30].
    let input =
        Raster::from_shape_vec(&[2, 3], 1, vec![1.0f64, 2.0, 3.0, 10.0, 20.0, 30.0]).unwrap();

    // The mask has a singleton dimension 0 and applies to both rows.
    let mut mask = Raster::from_elem(&[1, 3], 1, true);
    mask.set(&[0, 1], 0, false).unwrap(); // drop the middle column

    let out = sum(&input, Some(&mask), &[false, true]).unwrap();
    assert_eq!(out.get::<f64>(&[0, 0], 0), Some(4.0)); // 1 + 3
    assert_eq!(out.get::<f64>(&[1, 0], 0), Some(40.0)); // 10 + 30
}

#[test]
fn test_multi_channel_shares_single_channel_mask() {
    // 4 pixels, 2 channels; channel 1 is channel 0 plus 100.
    let samples = vec![
        1.0f32, 101.0, // pixel 0
        2.0, 102.0, // pixel 1
        3.0, 103.0, // pixel 2
        4.0, 104.0, // pixel 3
    ];
    let input = Raster::from_shape_vec(&[4], 2, samples).unwrap();
    let mut mask = Raster::from_elem(&[4], 1, true);
    mask.set(&[3], 0, false).unwrap();

    let out = mean(&input, Some(&mask), Mode::Linear, &[]).unwrap();
    assert_eq!(out.shape(), &[1]);
    assert_eq!(out.channels(), 2);
    assert_relative_eq!(out.get::<f32>(&[0], 0).unwrap(), 2.0, epsilon = 1e-6);
    assert_relative_eq!(out.get::<f32>(&[0], 1).unwrap(), 102.0, epsilon = 1e-6);
}

#[test]
fn test_successive_partial_sums_match_full_sum() {
    let input =
        Raster::from_shape_vec(&[2, 3, 4], 1, (1..=24).map(f64::from).collect()).unwrap();

    let step1 = sum(&input, None, &[true, false, false]).unwrap();
    let step2 = sum(&step1, None, &[false, true, false]).unwrap();
    let both = sum(&input, None, &[true, true, false]).unwrap();
    assert_eq!(step2.shape(), &[1, 1, 4]);
    for z in 0..4 {
        assert_relative_eq!(
            step2.get::<f64>(&[0, 0, z], 0).unwrap(),
            both.get::<f64>(&[0, 0, z], 0).unwrap(),
            epsilon = 1e-12
        );
    }

    // Total over everything: 1 + 2 + ... + 24.
    let total = sum(&input, None, &[]).unwrap();
    assert_relative_eq!(
        total.get::<f64>(&[0, 0, 0], 0).unwrap(),
        300.0,
        epsilon = 1e-12
    );
}

#[test]
fn test_projection_bridges_requested_output_type() {
    let input = Raster::from_shape_vec(&[4], 1, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();

    // The mean reducer naturally produces f32 here; request f64 storage.
    let out =
        project::<f32, _>(&input, None, DType::F64, &[true], &MeanProjection::mean()).unwrap();
    assert_eq!(out.dtype(), DType::F64);
    assert_relative_eq!(out.get::<f64>(&[0], 0).unwrap(), 2.5, epsilon = 1e-6);

    // Integer storage truncates and saturates through the scalar bridge.
    let out =
        project::<f32, _>(&input, None, DType::U8, &[true], &MeanProjection::mean()).unwrap();
    assert_eq!(out.dtype(), DType::U8);
    assert_eq!(out.get::<u8>(&[0], 0), Some(2));
}

#[test]
fn test_projection_carries_raster_metadata() {
    let mut input = Raster::from_shape_vec(&[2, 2], 3, (0u8..12).collect()).unwrap();
    input.set_pixel_size(vec![0.25, 0.25]);
    input.set_color_space(Some("RGB".to_string()));

    let out = maximum(&input, None, &[true, false]).unwrap();
    assert_eq!(out.shape(), &[1, 2]);
    assert_eq!(out.channels(), 3);
    assert_eq!(out.pixel_size(), &[0.25, 0.25]);
    assert_eq!(out.color_space(), Some("RGB"));
    assert_eq!(out.dtype(), DType::U8);
    // Pixel (x, y) channel c holds 6x + 3y + c; the maximum over x lands at
    // x = 1.
    assert_eq!(out.get::<u8>(&[0, 1], 2), Some(11));
}
