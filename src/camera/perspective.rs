use crate::core::{loader::InputParams, ray::Ray};

use super::CameraT;

pub struct PerspectiveCamera {
    eye: glam::Vec3A,
    forward: glam::Vec3A,
    up: glam::Vec3A,
    right: glam::Vec3A,
    half_cot_half_fov: f32,
}

impl PerspectiveCamera {
    /// `fov` is the vertical field of view in radians.
    pub fn new(eye: glam::Vec3A, forward: glam::Vec3A, up: glam::Vec3A, fov: f32) -> Self {
        let forward = forward.normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self {
            eye,
            forward,
            up,
            right,
            half_cot_half_fov: 0.5 / (fov * 0.5).tan(),
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let eye = params.get_float3("eye")?.into();
        let forward: glam::Vec3A = params.get_float3("forward")?.into();
        let up: glam::Vec3A = params.get_float3_or("up", [0.0, 1.0, 0.0])?.into();
        let fov_deg = params.get_float("fov")?;

        if forward.length_squared() == 0.0 || forward.cross(up).length_squared() == 0.0 {
            anyhow::bail!("{} - 'forward' must be non-zero and not parallel to 'up'", params.name());
        }
        if !(fov_deg > 0.0 && fov_deg < 180.0) {
            anyhow::bail!("{} - 'fov' should be in (0, 180) degrees", params.name());
        }

        Ok(Self::new(eye, forward, up, fov_deg.to_radians()))
    }
}

impl CameraT for PerspectiveCamera {
    fn generate_ray(&self, point: (f32, f32)) -> Ray {
        let direction =
            (self.forward * self.half_cot_half_fov + self.right * point.0 + self.up * point.1)
                .normalize();
        Ray::new(self.eye, direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_ray_looks_forward() {
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 1.0, 5.0),
            glam::Vec3A::new(0.0, 0.0, -2.0),
            glam::Vec3A::Y,
            45f32.to_radians(),
        );
        let ray = camera.generate_ray((0.0, 0.0));
        assert!((ray.direction - glam::Vec3A::new(0.0, 0.0, -1.0)).length() < 1e-5);

        // top edge of the image is half the fov above the axis
        let ray = camera.generate_ray((0.0, 0.5));
        let angle = ray.direction.dot(-glam::Vec3A::Z).acos();
        assert!((angle - 22.5f32.to_radians()).abs() < 1e-4);
        assert!(ray.direction.y > 0.0);
    }
}
