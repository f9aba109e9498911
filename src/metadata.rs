//! Raster metadata inspection and description
//!
//! The container-level view of a raster: element type, spatial shape,
//! channel count, the physical metadata a projection passes through, and the
//! estimated storage footprint.

use crate::dtype::DType;
use crate::raster::Raster;

/// Structured summary of a raster
#[derive(Debug, Clone, PartialEq)]
pub struct RasterMetadata {
    /// Element type tag
    pub dtype: DType,
    /// Spatial shape, without the channel axis
    pub shape: Vec<usize>,
    /// Number of channels per pixel
    pub channels: usize,
    /// Physical size of one pixel per dimension; empty when unknown
    pub pixel_size: Vec<f64>,
    /// Color space name, if any
    pub color_space: Option<String>,
    /// Number of pixels (product of the spatial shape)
    pub num_pixels: usize,
    /// Total number of samples, channels included
    pub total_samples: usize,
    /// Estimated storage footprint in bytes
    pub estimated_size_bytes: usize,
}

/// Get structured metadata for a raster
#[must_use]
pub fn raster_metadata(raster: &Raster) -> RasterMetadata {
    RasterMetadata {
        dtype: raster.dtype(),
        shape: raster.shape().to_vec(),
        channels: raster.channels(),
        pixel_size: raster.pixel_size().to_vec(),
        color_space: raster.color_space().map(String::from),
        num_pixels: raster.num_pixels(),
        total_samples: raster.len(),
        estimated_size_bytes: raster.len() * raster.dtype().size_of(),
    }
}

/// Describes a raster, showing its element type, shape, channels, carried
/// metadata, and storage footprint.
pub fn describe_raster(raster: &Raster) {
    let meta = raster_metadata(raster);

    println!("\n Raster Description");
    println!("====================");
    println!(" Element type: {}", meta.dtype);

    if meta.shape.is_empty() {
        println!(" Shape: (scalar)");
    } else {
        let dims: Vec<String> = meta.shape.iter().map(ToString::to_string).collect();
        println!(" Shape: ({})", dims.join(" x "));
    }
    println!(" Channels: {}", meta.channels);

    if meta.pixel_size.is_empty() {
        println!(" Pixel size: (unknown)");
    } else {
        println!(" Pixel size: {:?}", meta.pixel_size);
    }
    match &meta.color_space {
        Some(color_space) => println!(" Color space: {color_space}"),
        None => println!(" Color space: (none)"),
    }

    println!("\n Storage Information:");
    println!("    Total pixels: {}", meta.num_pixels);
    println!("    Total samples: {}", meta.total_samples);
    println!("    Sample size: {} bytes", meta.dtype.size_of());

    let total_bytes = meta.estimated_size_bytes;
    if total_bytes < 1024 {
        println!("    Total size: {total_bytes} bytes");
    } else if total_bytes < 1024 * 1024 {
        println!("    Total size: {:.2} KB", total_bytes as f64 / 1024.0);
    } else if total_bytes < 1024 * 1024 * 1024 {
        println!("    Total size: {:.2} MB", total_bytes as f64 / (1024.0 * 1024.0));
    } else {
        println!(
            "    Total size: {:.2} GB",
            total_bytes as f64 / (1024.0 * 1024.0 * 1024.0)
        );
    }
}
