use crate::util::{ScreenPos, ScreenSize};

use super::{ColorKey, PickingColor, PickingError};

/// Anything a picking color can be read back from.
///
/// Coordinates are storage coordinates with the origin at the bottom-left, as with a GPU
/// readback.
pub trait PickingTarget {
    /// `None` until the target has been allocated.
    fn size(&self) -> Option<ScreenSize>;

    fn read_pixel(&self, x: u32, y: u32) -> Result<PickingColor, PickingError>;
}

/// Maps a top-left screen position to bottom-left storage coordinates.
///
/// The row is `height - y`, rounded up and shifted by one so that `y = 0` lands on the top
/// storage row.
fn flip(pos: ScreenPos, size: ScreenSize) -> Result<(u32, u32), PickingError> {
    let x = pos.x.floor() as i64;
    let y = (size.height as f32 - pos.y).ceil() as i64 - 1;

    let out_of_bounds = PickingError::OutOfBounds {
        x,
        y,
        width: size.width,
        height: size.height,
    };

    if !pos.x.is_finite() || !pos.y.is_finite() {
        return Err(out_of_bounds);
    }
    if x < 0 || y < 0 || x >= size.width as i64 || y >= size.height as i64 {
        return Err(out_of_bounds);
    }

    Ok((x as u32, y as u32))
}

/// Turns the pointer position into the key of the object under it, one frame at a time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PickingResolver {
    current: ColorKey,
    previous: ColorKey,
}

impl PickingResolver {
    pub fn new() -> Self {
        Default::default()
    }

    /// Reads the key at `pos`. A missing target or an out-of-range position resolves to
    /// [`ColorKey::NONE`].
    pub fn resolve(target: Option<&dyn PickingTarget>, pos: ScreenPos) -> ColorKey {
        match Self::read_key(target, pos) {
            Ok(key) => key,
            Err(err) => {
                log::trace!("nothing picked at {pos:?}: {err}");
                ColorKey::NONE
            }
        }
    }

    pub fn read_key(target: Option<&dyn PickingTarget>, pos: ScreenPos) -> Result<ColorKey, PickingError> {
        let target = target.ok_or(PickingError::NotReady)?;
        let size = target.size().ok_or(PickingError::NotReady)?;

        let (x, y) = flip(pos, size)?;
        Ok(target.read_pixel(x, y)?.key())
    }

    /// Starts a new frame: the current key becomes the previous one and `pos` is resolved again.
    pub fn update(&mut self, target: Option<&dyn PickingTarget>, pos: ScreenPos) {
        self.previous = self.current;
        self.current = Self::resolve(target, pos);
    }

    /// Overrides the current key without shifting history.
    pub fn set_current(&mut self, key: ColorKey) {
        self.current = key;
    }

    #[inline]
    pub fn current(&self) -> ColorKey {
        self.current
    }

    #[inline]
    pub fn previous(&self) -> ColorKey {
        self.previous
    }

    pub fn reset(&mut self) {
        *self = Default::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{picking::PickingBuffer, util::pos};

    fn buffer() -> PickingBuffer {
        let mut buffer = PickingBuffer::new(8, 4);
        buffer.fill_rect(0, 0, 8, 1, ColorKey::new(0, 0, 1));
        buffer.fill_rect(0, 3, 8, 1, ColorKey::new(0, 0, 2));
        buffer
    }

    #[test]
    fn y_axis_is_flipped() {
        let buffer = buffer();
        let target = Some(&buffer as &dyn PickingTarget);

        assert_eq!(PickingResolver::resolve(target, pos(0., 0.)), ColorKey::new(0, 0, 1));
        assert_eq!(PickingResolver::resolve(target, pos(3.5, 0.5)), ColorKey::new(0, 0, 1));
        assert_eq!(PickingResolver::resolve(target, pos(7., 3.)), ColorKey::new(0, 0, 2));
        assert_eq!(PickingResolver::resolve(target, pos(7., 2.)), ColorKey::NONE);
    }

    #[test]
    fn outside_or_missing_target_is_none() {
        let buffer = buffer();
        let target = Some(&buffer as &dyn PickingTarget);

        assert_eq!(PickingResolver::resolve(target, pos(-1., 0.)), ColorKey::NONE);
        assert_eq!(PickingResolver::resolve(target, pos(8., 0.)), ColorKey::NONE);
        assert_eq!(PickingResolver::resolve(target, pos(0., 4.)), ColorKey::NONE);
        assert_eq!(PickingResolver::resolve(None, pos(0., 0.)), ColorKey::NONE);
        assert_eq!(
            PickingResolver::read_key(None, pos(0., 0.)),
            Err(PickingError::NotReady)
        );
    }

    #[test]
    fn update_shifts_history() {
        let buffer = buffer();
        let target = Some(&buffer as &dyn PickingTarget);
        let mut resolver = PickingResolver::new();

        resolver.update(target, pos(0., 0.));
        assert_eq!(resolver.previous(), ColorKey::NONE);
        assert_eq!(resolver.current(), ColorKey::new(0, 0, 1));

        resolver.update(target, pos(0., 3.));
        assert_eq!(resolver.previous(), ColorKey::new(0, 0, 1));
        assert_eq!(resolver.current(), ColorKey::new(0, 0, 2));
    }
}
