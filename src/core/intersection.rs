pub struct Intersection {
    pub t: f32,
    pub position: glam::Vec3A,
    /// Geometric normal, not flipped towards the ray.
    pub normal: glam::Vec3A,
    pub surface: usize,
}

impl Default for Intersection {
    fn default() -> Self {
        Self {
            t: f32::MAX,
            position: glam::Vec3A::ZERO,
            normal: glam::Vec3A::Y,
            surface: 0,
        }
    }
}

impl Intersection {
    pub fn with_t_max(t_max: f32) -> Self {
        Self {
            t: t_max,
            ..Default::default()
        }
    }
}
