use std::f32::consts::PI;

use glam::Vec3;

/// Point `index` of `count` on a golden-angle spiral over a sphere of `radius`.
///
/// Polar angles are evenly spaced in cosine so each point covers equal area.
pub fn sphere_point(index: usize, count: usize, radius: f32) -> Vec3 {
    let n = count as f32;
    let phi = (-1.0 + 2.0 * index as f32 / n).clamp(-1.0, 1.0).acos();
    let theta = (n * PI).sqrt() * phi;

    Vec3::new(
        radius * theta.cos() * phi.sin(),
        radius * theta.sin() * phi.sin(),
        radius * phi.cos(),
    )
}

/// `count` points spread over the sphere. Same inputs, same output.
pub fn sphere_points(count: usize, radius: f32) -> Vec<Vec3> {
    (0..count).map(|i| sphere_point(i, count, radius)).collect()
}
