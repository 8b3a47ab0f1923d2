//! Owned color + depth target.
//!
//! Addressing is bottom-left: `y = 0` is the visual bottom row. Rows are
//! stored top-down so [`Surface::as_bytes`] can be streamed straight into an
//! ARGB8888 texture; every accessor flips `y` on the way in.

use std::path::Path;

use log::debug;

use crate::colors;

pub struct Surface {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: u32,
    height: u32,
    max_width: u32,
    max_height: u32,
    resized: bool,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let size = (width * height) as usize;
        Self {
            color_buffer: vec![colors::BACKGROUND; size],
            depth_buffer: vec![f32::NEG_INFINITY; size],
            width,
            height,
            max_width: width,
            max_height: height,
            resized: false,
        }
    }

    /// Changes the addressable size. The backing vectors keep their
    /// allocation, so shrinking and growing back below the largest size seen
    /// does not reallocate. Contents are undefined until the next clear.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            return;
        }
        self.width = width;
        self.height = height;
        self.max_width = self.max_width.max(width);
        self.max_height = self.max_height.max(height);
        let size = (width * height) as usize;
        self.color_buffer.resize(size, colors::BACKGROUND);
        self.depth_buffer.resize(size, f32::NEG_INFINITY);
        self.resized = true;
        debug!(
            "surface resized to {}x{} (largest {}x{})",
            width, height, self.max_width, self.max_height
        );
    }

    /// Returns and clears the flag set by [`Surface::resize`].
    pub fn take_resized(&mut self) -> bool {
        std::mem::take(&mut self.resized)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Largest size this surface has been resized to.
    pub fn max_size(&self) -> (u32, u32) {
        (self.max_width, self.max_height)
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    /// Fills the color buffer and resets depth to negative infinity.
    pub fn clear(&mut self, color: u32) {
        self.color_buffer.fill(color);
        self.clear_depth();
    }

    #[inline]
    pub fn clear_depth(&mut self) {
        self.depth_buffer.fill(f32::NEG_INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
            let row = self.height - 1 - y as u32;
            Some((row * self.width + x as u32) as usize)
        } else {
            None
        }
    }

    /// Writes without depth testing. Out-of-bounds writes are dropped.
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: u32) {
        if let Some(idx) = self.index(x, y) {
            self.color_buffer[idx] = color;
        }
    }

    /// Writes only when `depth` is strictly greater (nearer) than what is
    /// stored. Returns whether the pixel was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        match self.index(x, y) {
            Some(idx) if depth > self.depth_buffer[idx] => {
                self.depth_buffer[idx] = depth;
                self.color_buffer[idx] = color;
                true
            }
            _ => false,
        }
    }

    #[inline]
    pub fn get_pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|idx| self.color_buffer[idx])
    }

    #[inline]
    pub fn get_depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|idx| self.depth_buffer[idx])
    }

    /// Copies a `width x height` block whose rows run bottom-up, placing its
    /// first pixel at `(x, y)`. Parts outside the surface are dropped.
    pub fn blit(&mut self, x: i32, y: i32, width: u32, height: u32, pixels: &[u32]) {
        debug_assert_eq!(pixels.len(), (width * height) as usize);
        for (row, line) in pixels.chunks_exact(width.max(1) as usize).enumerate() {
            for (col, &color) in line.iter().enumerate() {
                self.set_pixel(x + col as i32, y + row as i32, color);
            }
        }
    }

    /// Copies another surface of the same size.
    pub fn copy_from(&mut self, other: &Surface) {
        if other.width == self.width && other.height == self.height {
            self.color_buffer.copy_from_slice(&other.color_buffer);
        }
    }

    /// Packed pixels, top row first.
    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Pixel bytes in native order, top row first, `width * 4` bytes per row.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: u32 has no padding and any byte pattern is a valid u8; the
        // slice covers exactly the vector's initialized elements.
        unsafe {
            std::slice::from_raw_parts(
                self.color_buffer.as_ptr() as *const u8,
                self.color_buffer.len() * 4,
            )
        }
    }

    /// Converts to an 8-bit RGB image, top row first.
    pub fn to_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, row| {
            let (r, g, b) = colors::channels(self.color_buffer[(row * self.width + x) as usize]);
            image::Rgb([r, g, b])
        })
    }

    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<(), image::ImageError> {
        self.to_image()
            .save_with_format(path, image::ImageFormat::Png)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn y_zero_is_the_bottom_row() {
        let mut s = Surface::new(3, 2);
        s.set_pixel(0, 0, 0xFF00FF00);
        // Storage is top-down, so the bottom-left pixel is the first of row 1.
        assert_eq!(s.pixels()[3], 0xFF00FF00);
        assert_eq!(s.get_pixel(0, 0), Some(0xFF00FF00));
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut s = Surface::new(2, 2);
        s.clear(0);
        s.set_pixel(-1, 0, 1);
        s.set_pixel(2, 0, 1);
        s.set_pixel(0, 2, 1);
        assert!(!s.set_pixel_with_depth(0, -1, 1.0, 1));
        assert!(s.pixels().iter().all(|&p| p == 0));
        assert_eq!(s.get_pixel(5, 5), None);
    }

    #[test]
    fn depth_test_is_strictly_greater() {
        let mut s = Surface::new(1, 1);
        s.clear(0);
        assert_eq!(s.get_depth(0, 0), Some(f32::NEG_INFINITY));
        assert!(s.set_pixel_with_depth(0, 0, 0.5, 1));
        assert!(!s.set_pixel_with_depth(0, 0, 0.5, 2));
        assert!(!s.set_pixel_with_depth(0, 0, 0.2, 3));
        assert!(s.set_pixel_with_depth(0, 0, 0.7, 4));
        assert_eq!(s.get_pixel(0, 0), Some(4));
    }

    #[test]
    fn resize_tracks_largest_size_and_flag() {
        let mut s = Surface::new(4, 4);
        assert!(!s.take_resized());
        s.resize(8, 2);
        assert_eq!(s.max_size(), (8, 4));
        assert_eq!(s.pixels().len(), 16);
        assert!(s.take_resized());
        assert!(!s.take_resized());
        s.resize(8, 2);
        assert!(!s.take_resized());
    }

    #[test]
    fn blit_places_bottom_up_block() {
        let mut s = Surface::new(4, 4);
        s.clear(0);
        s.blit(1, 1, 2, 2, &[1, 2, 3, 4]);
        assert_eq!(s.get_pixel(1, 1), Some(1));
        assert_eq!(s.get_pixel(2, 1), Some(2));
        assert_eq!(s.get_pixel(1, 2), Some(3));
        assert_eq!(s.get_pixel(2, 2), Some(4));
        assert_eq!(s.get_pixel(0, 0), Some(0));
    }

    #[test]
    fn as_bytes_covers_every_pixel() {
        let s = Surface::new(5, 3);
        assert_eq!(s.as_bytes().len(), 5 * 3 * 4);
    }

    #[test]
    fn image_export_keeps_orientation() {
        let mut s = Surface::new(2, 2);
        s.clear(0xFF000000);
        s.set_pixel(0, 1, 0xFFFF0000);
        let img = s.to_image();
        // Image row 0 is the top row.
        assert_eq!(img.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(img.get_pixel(0, 1).0, [0, 0, 0]);
    }
}
