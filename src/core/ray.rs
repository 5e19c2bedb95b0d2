#[derive(Debug, Copy, Clone)]
pub struct Ray {
    pub origin: glam::Vec3A,
    pub direction: glam::Vec3A,
    pub t_min: f32,
}

impl Ray {
    pub const T_MIN_EPS: f32 = 0.0001;

    pub fn new(origin: glam::Vec3A, direction: glam::Vec3A) -> Self {
        Self {
            origin,
            direction,
            t_min: Self::T_MIN_EPS,
        }
    }

    /// Offsets `t_min` for grazing directions, `cos` being measured against the surface normal.
    pub fn leaving_surface(origin: glam::Vec3A, direction: glam::Vec3A, cos: f32) -> Self {
        let mut ray = Self::new(origin, direction);
        ray.t_min = Self::T_MIN_EPS / cos.abs().max(0.00001);
        ray
    }

    pub fn point_at(&self, t: f32) -> glam::Vec3A {
        self.origin + self.direction * t
    }
}
