use crate::core::{bbox::Bbox, intersection::Intersection, loader::InputParams, ray::Ray};

use super::PrimitiveT;

pub struct Sphere {
    center: glam::Vec3A,
    radius: f32,
    surface: usize,
}

impl Sphere {
    pub fn new(center: glam::Vec3A, radius: f32, surface: usize) -> Self {
        Self {
            center,
            radius,
            surface,
        }
    }

    pub fn load(params: &mut InputParams, surface: usize) -> anyhow::Result<Self> {
        let center = params.get_float3_or("center", [0.0, 0.0, 0.0])?;
        let radius = params.get_float("radius")?;
        if radius <= 0.0 {
            anyhow::bail!("{} - 'radius' should be positive", params.name());
        }

        Ok(Sphere::new(center.into(), radius, surface))
    }

    fn intersect_ray(&self, ray: &Ray) -> Option<(f32, f32)> {
        let oc = ray.origin - self.center;
        let a = ray.direction.length_squared();
        let b = ray.direction.dot(oc);
        let c = oc.length_squared() - self.radius * self.radius;
        let delta = b * b - a * c;
        if delta >= 0.0 {
            let delta = delta.sqrt();
            Some(((-b - delta) / a, (-b + delta) / a))
        } else {
            None
        }
    }
}

impl PrimitiveT for Sphere {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        if let Some((min, max)) = self.intersect_ray(ray) {
            let t = if min > ray.t_min { min } else { max };
            ray.t_min < t && t < t_max
        } else {
            false
        }
    }

    fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool {
        if let Some((min, max)) = self.intersect_ray(ray) {
            let t = if min > ray.t_min { min } else { max };
            if ray.t_min < t && t < inter.t {
                inter.t = t;
                inter.position = ray.point_at(t);
                inter.normal = (inter.position - self.center) / self.radius;
                inter.surface = self.surface;
                return true;
            }
        }
        false
    }

    fn bbox(&self) -> Bbox {
        Bbox::new(
            self.center - glam::Vec3A::splat(self.radius),
            self.center + glam::Vec3A::splat(self.radius),
        )
    }
}
