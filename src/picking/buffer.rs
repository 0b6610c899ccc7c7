use crate::util::ScreenSize;

use super::{ColorKey, PickingColor, PickingError, PickingTarget};

/// CPU-side picking target.
///
/// Rows are stored bottom-up, the way a GPU readback returns them. [`Self::fill_rect`] takes
/// top-left window coordinates, [`PickingTarget::read_pixel`] takes storage coordinates.
#[derive(Clone, Debug)]
pub struct PickingBuffer {
    width: u32,
    height: u32,
    pixels: Vec<PickingColor>,
}

impl PickingBuffer {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![PickingColor::default(); (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Resizes and clears the buffer.
    pub fn resize(&mut self, size: ScreenSize) {
        *self = Self::new(size.width, size.height);
    }

    pub fn clear(&mut self) {
        self.pixels.fill(PickingColor::default());
    }

    /// Paints `key` over a rectangle given in top-left window pixels. Parts outside the buffer are
    /// clipped.
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, key: ColorKey) {
        let color = PickingColor::from(key);

        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);

        for window_row in y.min(y_end)..y_end {
            let row = (self.height - 1 - window_row) as usize;
            let start = row * self.width as usize;
            self.pixels[start + x.min(x_end) as usize..start + x_end as usize].fill(color);
        }
    }

    /// Raw texels, bottom row first.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }
}

impl PickingTarget for PickingBuffer {
    fn size(&self) -> Option<ScreenSize> {
        (self.width > 0 && self.height > 0).then(|| ScreenSize::new(self.width, self.height))
    }

    fn read_pixel(&self, x: u32, y: u32) -> Result<PickingColor, PickingError> {
        if x >= self.width || y >= self.height {
            return Err(PickingError::OutOfBounds {
                x: x as i64,
                y: y as i64,
                width: self.width,
                height: self.height,
            });
        }

        Ok(self.pixels[(y * self.width + x) as usize])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_are_stored_bottom_up() {
        let mut buffer = PickingBuffer::new(4, 3);
        let key = ColorKey::new(0, 0, 1);

        // top window row
        buffer.fill_rect(0, 0, 4, 1, key);

        assert_eq!(buffer.read_pixel(0, 2).unwrap().key(), key);
        assert!(buffer.read_pixel(0, 0).unwrap().key().is_none());
        assert_eq!(&buffer.as_bytes()[32..36], &[0, 0, 1, 255]);
    }

    #[test]
    fn fill_is_clipped() {
        let mut buffer = PickingBuffer::new(4, 3);
        buffer.fill_rect(2, 1, 100, 100, ColorKey::new(1, 1, 1));

        assert_eq!(buffer.read_pixel(3, 0).unwrap().key(), ColorKey::new(1, 1, 1));
        assert!(buffer.read_pixel(1, 0).unwrap().key().is_none());
        assert!(buffer.read_pixel(3, 2).unwrap().key().is_none());

        // fully outside
        buffer.fill_rect(10, 10, 2, 2, ColorKey::new(2, 2, 2));
    }

    #[test]
    fn empty_buffer_is_not_ready() {
        let buffer = PickingBuffer::new(0, 0);

        assert_eq!(buffer.size(), None);
        assert!(matches!(
            buffer.read_pixel(0, 0),
            Err(PickingError::OutOfBounds { .. })
        ));
    }
}
