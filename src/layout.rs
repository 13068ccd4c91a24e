//! Fitting rasterized text into the camera's view.

use glam::{Mat4, Vec3};

use crate::config::CameraConfig;

/// Projection parameters that decide how much of the scene is visible.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub fov_degrees: f32,
    pub aspect: f32,
    /// Camera distance to the subject plane.
    pub distance: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn new(camera: &CameraConfig, width: f64, height: f64) -> Self {
        Self {
            fov_degrees: camera.fov_degrees,
            aspect: aspect_ratio(width, height),
            distance: camera.distance,
            near: camera.near,
            far: camera.far,
        }
    }

    /// Degenerate sizes (a collapsed or hidden window) keep the last aspect.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        if width <= 0.0 || height <= 0.0 {
            log::debug!("ignoring degenerate viewport {width}x{height}");
            return;
        }
        self.aspect = aspect_ratio(width, height);
    }

    pub fn visible_height(&self) -> f32 {
        2.0 * (self.fov_degrees.to_radians() / 2.0).tan() * self.distance
    }

    pub fn visible_width(&self) -> f32 {
        self.visible_height() * self.aspect
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(self.fov_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    /// Camera at `(0, 0, distance)` looking at the origin.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(Vec3::new(0.0, 0.0, self.distance), Vec3::ZERO, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

fn aspect_ratio(width: f64, height: f64) -> f32 {
    if width <= 0.0 || height <= 0.0 {
        1.0
    } else {
        (width / height) as f32
    }
}

/// `max(x) - min(x)`, zero for an empty set.
pub fn bounding_width(points: &[Vec3]) -> f32 {
    let (min, max) = points
        .iter()
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), p| {
            (lo.min(p.x), hi.max(p.x))
        });
    if points.is_empty() {
        0.0
    } else {
        max - min
    }
}

/// Shrinks `points` uniformly in x and y until their width fits
/// `safe_fraction` of the visible width. Never enlarges. Returns the factor
/// that was applied.
pub fn fit_to_view(points: &mut [Vec3], projection: &Projection, safe_fraction: f32) -> f32 {
    let width = bounding_width(points);
    if width == 0.0 {
        return 1.0;
    }

    let safe_width = projection.visible_width() * safe_fraction;
    if width <= safe_width {
        return 1.0;
    }

    let factor = safe_width / width;
    for p in points.iter_mut() {
        p.x *= factor;
        p.y *= factor;
    }
    log::debug!("text width {width:.1} exceeds {safe_width:.1}, scaled by {factor:.4}");
    factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn projection(aspect: f32) -> Projection {
        Projection {
            fov_degrees: 90.0,
            aspect,
            distance: 10.0,
            near: 0.1,
            far: 100.0,
        }
    }

    #[test]
    fn visible_extent_follows_fov_and_aspect() {
        let p = projection(2.0);
        assert!((p.visible_height() - 20.0).abs() < 1e-4);
        assert!((p.visible_width() - 40.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_viewport_falls_back_to_square() {
        let p = Projection::new(&CameraConfig::default(), 800.0, 0.0);
        assert_eq!(p.aspect, 1.0);
    }

    #[test]
    fn zero_width_viewport_keeps_text_visible() {
        let p = Projection::new(&CameraConfig::default(), 0.0, 900.0);
        assert_eq!(p.aspect, 1.0);

        let mut p = Projection::new(&CameraConfig::default(), 1600.0, 900.0);
        p.set_viewport(0.0, 900.0);
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);
        p.set_viewport(1200.0, -1.0);
        assert!((p.aspect - 16.0 / 9.0).abs() < 1e-6);

        let mut pts = vec![Vec3::new(-30.0, 1.0, 0.0), Vec3::new(30.0, -1.0, 0.0)];
        let factor = fit_to_view(&mut pts, &p, 0.85);
        assert!(factor > 0.0);
        assert!(bounding_width(&pts) > 0.0);
    }

    #[test]
    fn single_point_is_left_alone() {
        let mut pts = vec![Vec3::new(500.0, 3.0, 0.0)];
        assert_eq!(fit_to_view(&mut pts, &projection(1.0), 0.85), 1.0);
        assert_eq!(pts[0], Vec3::new(500.0, 3.0, 0.0));
    }

    #[test]
    fn wide_text_shrinks_to_safe_width() {
        let mut pts = vec![Vec3::new(-50.0, 2.0, 1.0), Vec3::new(50.0, -2.0, 1.0)];
        let factor = fit_to_view(&mut pts, &projection(1.0), 0.85);
        // safe width is 20 * 0.85 = 17
        assert!((factor - 0.17).abs() < 1e-6);
        assert!((bounding_width(&pts) - 17.0).abs() < 1e-4);
        assert!((pts[0].y - 0.34).abs() < 1e-5);
        assert_eq!(pts[0].z, 1.0);
    }
}
