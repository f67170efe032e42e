//! Image input and grayscale sampling.
//!
//! The upload layer decodes files into [`RgbImage`]s; this module turns
//! them into normalized grayscale intensities. No file format parsing
//! happens here.

mod image;
mod sampler;

pub use image::{RgbImage, CHANNELS};
pub use sampler::{GrayscaleSampler, PixelBuffer};
