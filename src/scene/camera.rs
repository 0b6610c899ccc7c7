use euclid::Angle;

use crate::util::{ScreenPos, ScreenSize, WorldVector};

use super::Camera;

/// A perspective camera at the origin looking down `-z`, with `+y` up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinholeCamera {
    pub viewport: ScreenSize,
    pub fov_y: Angle<f64>,
}

impl PinholeCamera {
    pub fn new(viewport: ScreenSize, fov_y: Angle<f64>) -> Self {
        Self { viewport, fov_y }
    }

    pub fn aspect(&self) -> f64 {
        if self.viewport.height == 0 {
            return 1.;
        }
        self.viewport.width as f64 / self.viewport.height as f64
    }
}

impl Camera for PinholeCamera {
    fn unproject(&self, pos: ScreenPos) -> WorldVector {
        let width = self.viewport.width.max(1) as f64;
        let height = self.viewport.height.max(1) as f64;

        let ndc_x = 2. * pos.x as f64 / width - 1.;
        let ndc_y = 1. - 2. * pos.y as f64 / height;

        let half_height = (self.fov_y.radians / 2.).tan();

        WorldVector::new(ndc_x * half_height * self.aspect(), ndc_y * half_height, -1.).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::pos;

    #[test]
    fn center_looks_forward() {
        let camera = PinholeCamera::new(ScreenSize::new(200, 100), Angle::degrees(90.));

        let forward = camera.unproject(pos(100., 50.));
        assert!((forward - WorldVector::new(0., 0., -1.)).length() < 1e-9);

        let top = camera.unproject(pos(100., 0.));
        assert!(top.y > 0. && (top.y + top.z).abs() < 1e-9);

        let left = camera.unproject(pos(0., 50.));
        assert!(left.x < 0.);
    }
}
