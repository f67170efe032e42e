//! Decoded RGB image handed over by the upload layer.

/// Bytes per packed RGB pixel.
pub const CHANNELS: usize = 3;

/// A decoded image with packed RGB pixels in raster order.
///
/// Decoding from a file format happens upstream; this type only
/// carries the result together with its dimensions.
#[derive(Clone)]
pub struct RgbImage {
    /// Packed RGB bytes, row-major, top-left origin.
    data: Vec<u8>,
    /// Image width in pixels.
    width: u32,
    /// Image height in pixels.
    height: u32,
}

impl RgbImage {
    /// Creates a new image from packed RGB bytes.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            width,
            height,
        }
    }

    /// Creates an RGB image whose three channels all carry the given gray level.
    pub fn from_gray(levels: &[u8], width: u32, height: u32) -> Self {
        let data = levels.iter().flat_map(|&v| [v, v, v]).collect();
        Self::new(data, width, height)
    }

    /// Returns the packed RGB bytes.
    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the image width.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Returns the image height.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the total number of pixels (width * height).
    #[inline]
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Returns true if the image has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixel_count() == 0
    }

    /// Number of bytes in one row.
    #[inline]
    pub fn row_stride(&self) -> usize {
        self.width as usize * CHANNELS
    }

    /// Validates that the buffer size matches the dimensions.
    pub fn is_valid(&self) -> bool {
        self.data.len() as u64 == self.pixel_count() * CHANNELS as u64
    }
}

impl std::fmt::Debug for RgbImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RgbImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("data_bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_creation() {
        let image = RgbImage::new(vec![0u8; 64 * 48 * 3], 64, 48);

        assert_eq!(image.width(), 64);
        assert_eq!(image.height(), 48);
        assert_eq!(image.pixel_count(), 64 * 48);
        assert_eq!(image.row_stride(), 192);
        assert!(image.is_valid());
        assert!(!image.is_empty());
    }

    #[test]
    fn test_image_invalid_size() {
        let image = RgbImage::new(vec![0u8; 100], 64, 48);
        assert!(!image.is_valid());
    }

    #[test]
    fn test_from_gray_replicates_channels() {
        let image = RgbImage::from_gray(&[10, 200], 2, 1);
        assert_eq!(image.data(), &[10, 10, 10, 200, 200, 200]);
        assert!(image.is_valid());
    }

    #[test]
    fn test_zero_dimension_is_empty() {
        let image = RgbImage::new(Vec::new(), 0, 10);
        assert!(image.is_empty());
        assert!(image.is_valid());
    }
}
