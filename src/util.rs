#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalUnit;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhysicalUnit;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorldUnit;

/// Screen position in logical points, origin top-left.
pub type ScreenPos<F = f32> = euclid::Point2D<F, LogicalUnit>;
pub type PhysicalPos<F = f32> = euclid::Point2D<F, PhysicalUnit>;

pub type ScreenVec<F = f32> = euclid::Vector2D<F, LogicalUnit>;

pub type ScreenSize<F = u32> = euclid::Size2D<F, PhysicalUnit>;

/// Direction in world space, as produced by unprojecting a screen position.
pub type WorldVector = euclid::Vector3D<f64, WorldUnit>;

#[inline(always)]
pub fn pos(x: f32, y: f32) -> ScreenPos {
    ScreenPos::new(x, y)
}

pub trait PhysicalToLogical {
    type LogicalResult;
    fn to_points(&self, pixels_per_point: f32) -> Self::LogicalResult;
}

impl PhysicalToLogical for PhysicalPos<f32> {
    type LogicalResult = ScreenPos<f32>;

    fn to_points(&self, pixels_per_point: f32) -> Self::LogicalResult {
        Self::LogicalResult::new(self.x / pixels_per_point, self.y / pixels_per_point)
    }
}

impl PhysicalToLogical for winit::dpi::PhysicalPosition<f64> {
    type LogicalResult = ScreenPos<f32>;

    fn to_points(&self, pixels_per_point: f32) -> Self::LogicalResult {
        PhysicalPos::new(self.x as f32, self.y as f32).to_points(pixels_per_point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_positions_convert_to_points() {
        let physical = winit::dpi::PhysicalPosition::new(40.0, 10.0);

        assert_eq!(physical.to_points(2.), pos(20., 5.));
        assert_eq!(PhysicalPos::<f32>::new(3.0, 9.0).to_points(1.5), pos(2., 6.));
    }
}
