//! Grayscale sampling of decoded RGB images.
//!
//! Converts each pixel to a normalized luminance in [0.0, 1.0] using
//! the ITU-R BT.601 weights. Rows are independent, so large images are
//! sampled in parallel without changing the output order.

use super::image::{RgbImage, CHANNELS};
use rayon::prelude::*;

/// BT.601 luminance weights for red, green and blue.
const LUMA_WEIGHTS: [f32; 3] = [0.299, 0.587, 0.114];

/// Normalized grayscale intensities, one per pixel, in raster order.
///
/// Every value lies in [0.0, 1.0].
#[derive(Clone, PartialEq)]
pub struct PixelBuffer {
    intensities: Vec<f32>,
}

impl PixelBuffer {
    /// Builds a buffer from raw intensities, clamping each into [0.0, 1.0].
    ///
    /// NaN values are treated as black.
    pub fn from_intensities(values: impl IntoIterator<Item = f32>) -> Self {
        Self {
            intensities: values.into_iter().map(clamp_unit).collect(),
        }
    }

    /// Returns the intensities.
    #[inline]
    pub fn intensities(&self) -> &[f32] {
        &self.intensities
    }

    /// Returns the number of pixels.
    #[inline]
    pub fn len(&self) -> usize {
        self.intensities.len()
    }

    /// Returns true if empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.intensities.is_empty()
    }

    /// Mean intensity, or 0.0 for an empty buffer.
    pub fn mean(&self) -> f64 {
        if self.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.intensities.iter().map(|&v| f64::from(v)).sum();
        sum / self.len() as f64
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("pixels", &self.intensities.len())
            .field("mean", &format!("{:.4}", self.mean()))
            .finish()
    }
}

/// Converts RGB images into [`PixelBuffer`]s.
pub struct GrayscaleSampler {
    /// Images with at least this many pixels are sampled in parallel.
    parallel_threshold: usize,
}

impl GrayscaleSampler {
    pub fn new() -> Self {
        Self {
            parallel_threshold: 1 << 16,
        }
    }

    /// Creates a sampler with a custom parallelism threshold.
    pub fn with_parallel_threshold(parallel_threshold: usize) -> Self {
        Self { parallel_threshold }
    }

    /// Samples every pixel of the image in raster order.
    ///
    /// The caller is expected to have validated the image; trailing bytes
    /// that do not form a full pixel are ignored.
    pub fn sample(&self, image: &RgbImage) -> PixelBuffer {
        let stride = image.row_stride();
        if stride == 0 || image.height() == 0 {
            return PixelBuffer {
                intensities: Vec::new(),
            };
        }

        let intensities: Vec<f32> = if image.pixel_count() >= self.parallel_threshold as u64 {
            image
                .data()
                .par_chunks(stride)
                .flat_map_iter(|row| row.chunks_exact(CHANNELS).map(luminance))
                .collect()
        } else {
            image
                .data()
                .chunks(stride)
                .flat_map(|row| row.chunks_exact(CHANNELS).map(luminance))
                .collect()
        };

        tracing::trace!(
            width = image.width(),
            height = image.height(),
            pixels = intensities.len(),
            "Sampled grayscale intensities"
        );

        PixelBuffer { intensities }
    }
}

impl Default for GrayscaleSampler {
    fn default() -> Self {
        Self::new()
    }
}

/// Normalized luminance of one packed RGB pixel.
#[inline]
fn luminance(rgb: &[u8]) -> f32 {
    let weighted = LUMA_WEIGHTS[0] * f32::from(rgb[0])
        + LUMA_WEIGHTS[1] * f32::from(rgb[1])
        + LUMA_WEIGHTS[2] * f32::from(rgb[2]);
    clamp_unit(weighted / 255.0)
}

#[inline]
fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}
