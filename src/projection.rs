//! The projection controller: collapse selected dimensions to size 1
//!
//! [`project`] drives one dimensional reduction. It validates the process
//! selector and the mask, allocates the output raster, and walks every
//! surviving output position with an odometer, handing the reducer a
//! sub-view of the input (and mask) spanning exactly the collapsed
//! dimensions. The fold itself is pluggable through [`SliceReducer`]; one
//! implementation per statistic lives in [`crate::statistics::reducers`].

use ndarray::ArrayD;

use crate::dtype::{DType, Element};
use crate::errors::{Result, RuProjError};
use crate::raster::Raster;
use crate::view::{Block, View};

/// One statistic's fold over the collapsed dimensions of a single output
/// position.
///
/// Implementations are pure functions of the two blocks: they skip samples
/// where the mask is `false` and produce exactly one value of the reducer's
/// natural output type. The concrete reducer is chosen once per projection
/// call, by statistic and element type, never per element.
pub trait SliceReducer<T: Element> {
    /// The value type this reducer naturally produces.
    type Out: Element;

    /// Fold one input block (and optional mask block, iterated in lockstep)
    /// into a single value.
    fn reduce(&self, input: Block<'_, T>, mask: Option<Block<'_, bool>>) -> Self::Out;
}

/// Reduce the selected dimensions of `input` to size 1 through `reducer`.
///
/// `process` selects the dimensions to collapse (`true` collapses); an empty
/// selector collapses every dimension. Dimensions of size 1 are never
/// processed. The output raster keeps the input's dimensionality, channel
/// count, pixel size, and color space; collapsed dimensions have size 1.
/// Results are stored as `out_dtype`, through a one-sample cast whenever the
/// reducer's natural output type differs.
///
/// A raster with more than one channel is reduced per channel: the channel
/// axis joins the iteration as an extra dimension that is never collapsed,
/// and the mask (always single-channel) is shared across channels.
///
/// A mask must be a single-channel boolean raster of the input's
/// dimensionality; dimensions where it has size 1 are broadcast across the
/// input.
///
/// If no dimension ends up selected, the input is returned unchanged and the
/// mask and `out_dtype` are ignored.
///
/// # Errors
///
/// - [`RuProjError::UnsupportedType`] if `T` is not the input's element
///   type.
/// - [`RuProjError::InvalidArgument`] if the selector length does not match
///   the input dimensionality, or the mask is not a single-channel boolean
///   raster.
/// - [`RuProjError::ShapeMismatch`] if the mask shape cannot be broadcast to
///   the input shape.
///
/// All validation happens before the output is allocated; a failed call
/// commits nothing.
pub fn project<T, R>(
    input: &Raster,
    mask: Option<&Raster>,
    out_dtype: DType,
    process: &[bool],
    reducer: &R,
) -> Result<Raster>
where
    T: Element,
    R: SliceReducer<T>,
{
    let in_array = input.array::<T>().ok_or_else(|| RuProjError::UnsupportedType {
        dtype: input.dtype(),
        operation: format!("reduce<{}>", T::DTYPE),
    })?;
    let in_flat = flat_slice(in_array)?;

    let ndim = input.ndim();
    let in_sizes = input.shape().to_vec();

    // Normalize the selector; dimensions of size 1 are never processed.
    let mut process = if process.is_empty() {
        vec![true; ndim]
    } else {
        if process.len() != ndim {
            return Err(RuProjError::InvalidArgument(format!(
                "process selector has {} entries for a raster with {} dimensions",
                process.len(),
                ndim
            )));
        }
        process.to_vec()
    };
    for (flag, &size) in process.iter_mut().zip(&in_sizes) {
        if size == 1 {
            *flag = false;
        }
    }

    let mask_state = match mask {
        Some(mask) => Some(checked_mask(mask, &in_sizes)?),
        None => None,
    };

    // Nothing selected: the projection is a plain copy. The mask and the
    // requested output type play no part.
    if !process.iter().any(|&flag| flag) {
        return Ok(input.clone());
    }

    let out_sizes: Vec<usize> = in_sizes
        .iter()
        .zip(&process)
        .map(|(&size, &flag)| if flag { 1 } else { size })
        .collect();

    let channels = input.channels();
    let mut output = Raster::new(&out_sizes, channels, out_dtype);
    output.set_pixel_size(input.pixel_size().to_vec());
    output.set_color_space(input.color_space().map(String::from));

    // An unprocessed dimension of size 0 leaves nothing to fill in.
    if output.is_empty() {
        return Ok(output);
    }

    // Storage axes: the spatial dimensions plus, for a multi-channel
    // raster, the interleaved channel axis. The channel axis is never
    // collapsed, and the mask is shared across it (stride 0).
    let has_channel_axis = channels > 1;
    let axis_sizes = input.storage_shape().to_vec();
    let in_strides = input.storage_strides().to_vec();
    let mut axis_process = process;
    if has_channel_axis {
        axis_process.push(false);
    }

    // The sub-view a reducer folds over spans the collapsed axes and pins
    // every other axis to a single position.
    let proc_sizes: Vec<usize> = axis_sizes
        .iter()
        .zip(&axis_process)
        .map(|(&size, &flag)| if flag { size } else { 1 })
        .collect();
    let mut proc_in = View::new(0, proc_sizes.clone(), in_strides.clone());

    let (mask_flat, mask_strides) = match &mask_state {
        Some((flat, strides)) => {
            let mut strides = strides.clone();
            if has_channel_axis {
                strides.push(0);
            }
            (Some(*flat), strides)
        }
        None => (None, vec![0; axis_sizes.len()]),
    };
    let mut proc_mask = mask_flat.map(|_| View::new(0, proc_sizes, mask_strides.clone()));

    // Everything selected: one fold covers the whole raster.
    if axis_process.iter().all(|&flag| flag) {
        let value = match (mask_flat, proc_mask.as_ref()) {
            (Some(flat), Some(view)) => {
                reducer.reduce(Block::new(in_flat, &proc_in), Some(Block::new(flat, view)))
            }
            _ => reducer.reduce(Block::new(in_flat, &proc_in), None),
        };
        output.samples_mut().put(0, value)?;
        return Ok(output);
    }

    // The reducer never loops over pinned axes; dropping them shortens its
    // odometer. Input and mask views have identical sizes, so they squeeze
    // in lockstep.
    proc_in.squeeze();
    if let Some(view) = proc_mask.as_mut() {
        view.squeeze();
    }

    // Compact the outer iteration to the axes with more than one output
    // position, carrying the input, mask, and output strides in lockstep.
    let out_axis_sizes = output.storage_shape().to_vec();
    let out_strides = output.storage_strides().to_vec();
    let mut walk_sizes = Vec::new();
    let mut walk_in = Vec::new();
    let mut walk_mask = Vec::new();
    let mut walk_out = Vec::new();
    for d in 0..axis_sizes.len() {
        if out_axis_sizes[d] > 1 {
            walk_sizes.push(out_axis_sizes[d]);
            walk_in.push(in_strides[d]);
            walk_mask.push(mask_strides[d]);
            walk_out.push(out_strides[d]);
        }
    }
    let in_walk = View::new(0, walk_sizes.clone(), walk_in);
    let mask_walk = View::new(0, walk_sizes.clone(), walk_mask);
    let out_walk = View::new(0, walk_sizes, walk_out);

    // Three aligned offset streams: reposition the sub-views and address
    // the output cell for every surviving position.
    let out_samples = output.samples_mut();
    for ((in_offset, mask_offset), out_offset) in in_walk
        .offsets()
        .zip(mask_walk.offsets())
        .zip(out_walk.offsets())
    {
        proc_in.set_origin(in_offset);
        let value = match (mask_flat, proc_mask.as_mut()) {
            (Some(flat), Some(view)) => {
                view.set_origin(mask_offset);
                reducer.reduce(Block::new(in_flat, &proc_in), Some(Block::new(flat, view)))
            }
            _ => reducer.reduce(Block::new(in_flat, &proc_in), None),
        };
        out_samples.put(out_offset as usize, value)?;
    }

    Ok(output)
}

/// Validate a mask against the input's spatial shape and return its flat
/// samples plus per-dimension strides, with singleton dimensions expanded
/// to stride 0.
fn checked_mask<'a>(mask: &'a Raster, in_sizes: &[usize]) -> Result<(&'a [bool], Vec<isize>)> {
    if mask.dtype() != DType::Bool {
        return Err(RuProjError::InvalidArgument(format!(
            "mask raster must hold bool samples, got {}",
            mask.dtype()
        )));
    }
    if mask.channels() != 1 {
        return Err(RuProjError::InvalidArgument(format!(
            "mask raster must be single-channel, got {} channels",
            mask.channels()
        )));
    }
    let sizes = mask.shape();
    if sizes.len() != in_sizes.len() {
        return Err(RuProjError::ShapeMismatch {
            expected: in_sizes.to_vec(),
            found: sizes.to_vec(),
        });
    }
    let strides = mask.storage_strides();
    let mut expanded = Vec::with_capacity(sizes.len());
    for d in 0..sizes.len() {
        if sizes[d] == in_sizes[d] {
            expanded.push(strides[d]);
        } else if sizes[d] == 1 {
            expanded.push(0);
        } else {
            return Err(RuProjError::ShapeMismatch {
                expected: in_sizes.to_vec(),
                found: sizes.to_vec(),
            });
        }
    }
    let flat = mask
        .array::<bool>()
        .and_then(|array| array.as_slice())
        .ok_or_else(|| {
            RuProjError::Generic("mask storage is not in standard layout".to_string())
        })?;
    Ok((flat, expanded))
}

fn flat_slice<T: Element>(array: &ArrayD<T>) -> Result<&[T]> {
    array.as_slice().ok_or_else(|| {
        RuProjError::Generic("raster storage is not in standard layout".to_string())
    })
}
