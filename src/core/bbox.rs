use super::ray::Ray;

#[derive(Copy, Clone, Debug)]
pub struct Bbox {
    pub p_min: glam::Vec3A,
    pub p_max: glam::Vec3A,
}

impl Bbox {
    pub fn new(p_min: glam::Vec3A, p_max: glam::Vec3A) -> Self {
        Self { p_min, p_max }
    }

    pub fn from_points(points: &[glam::Vec3A]) -> Self {
        points
            .iter()
            .fold(Self::empty(), |bbox, p| bbox.merge(Self::new(*p, *p)))
    }

    pub fn empty() -> Self {
        Self {
            p_min: glam::Vec3A::splat(f32::MAX),
            p_max: glam::Vec3A::splat(f32::MIN),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.p_min.cmpgt(self.p_max).any()
    }

    pub fn merge(self, another: Bbox) -> Self {
        Self {
            p_min: self.p_min.min(another.p_min),
            p_max: self.p_max.max(another.p_max),
        }
    }

    pub fn expand(self, delta: f32) -> Self {
        Self {
            p_min: self.p_min - glam::Vec3A::splat(delta),
            p_max: self.p_max + glam::Vec3A::splat(delta),
        }
    }

    pub fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        if self.is_empty() {
            return false;
        }

        let inv_dir = ray.direction.recip();
        let t0 = (self.p_min - ray.origin) * inv_dir;
        let t1 = (self.p_max - ray.origin) * inv_dir;
        let t_near = t0.min(t1).max_element();
        let t_far = t0.max(t1).min_element();
        t_near <= t_far && t_far > ray.t_min && t_near < t_max
    }

    pub fn surface_area(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            let diff = self.p_max - self.p_min;
            2.0 * (diff.x * diff.y + diff.y * diff.z + diff.z * diff.x)
        }
    }

    pub fn centroid(&self) -> glam::Vec3A {
        (self.p_min + self.p_max) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_box_is_never_hit() {
        let ray = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::X);
        assert!(Bbox::empty().is_empty());
        assert!(!Bbox::empty().intersect_test(&ray, f32::MAX));
    }

    #[test]
    fn ray_hits_box_in_front_only() {
        let bbox = Bbox::from_points(&[glam::Vec3A::new(1.0, -1.0, -1.0), glam::Vec3A::new(2.0, 1.0, 1.0)]);
        let forward = Ray::new(glam::Vec3A::ZERO, glam::Vec3A::X);
        let backward = Ray::new(glam::Vec3A::ZERO, -glam::Vec3A::X);
        assert!(bbox.intersect_test(&forward, f32::MAX));
        assert!(!bbox.intersect_test(&forward, 0.5));
        assert!(!bbox.intersect_test(&backward, f32::MAX));
        assert!((bbox.surface_area() - 2.0 * (2.0 + 4.0 + 2.0)).abs() < 1e-5);
    }
}
