use crate::core::{bbox::Bbox, intersection::Intersection, loader::InputParams, ray::Ray};

use super::PrimitiveT;

pub struct Triangle {
    positions: [glam::Vec3A; 3],
    normal: glam::Vec3A,
    surface: usize,
}

impl Triangle {
    pub fn new(positions: [glam::Vec3A; 3], surface: usize) -> Self {
        let normal = (positions[1] - positions[0])
            .cross(positions[2] - positions[0])
            .normalize_or_zero();
        Self {
            positions,
            normal,
            surface,
        }
    }

    /// Möller–Trumbore, returns `t`.
    fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let [p0, p1, p2] = self.positions;
        let e1 = p1 - p0;
        let e2 = p2 - p0;
        let q = ray.direction.cross(e2);
        let det = e1.dot(q);
        if det.abs() < 1e-12 {
            return None;
        }
        let det_inv = 1.0 / det;
        let s = ray.origin - p0;
        let u = s.dot(q) * det_inv;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let r = s.cross(e1);
        let v = ray.direction.dot(r) * det_inv;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        Some(e2.dot(r) * det_inv)
    }
}

impl PrimitiveT for Triangle {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        matches!(self.intersect_ray(ray), Some(t) if ray.t_min < t && t < t_max)
    }

    fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool {
        match self.intersect_ray(ray) {
            Some(t) if ray.t_min < t && t < inter.t => {
                inter.t = t;
                inter.position = ray.point_at(t);
                inter.normal = self.normal;
                inter.surface = self.surface;
                true
            }
            _ => false,
        }
    }

    fn bbox(&self) -> Bbox {
        Bbox::from_points(&self.positions)
    }
}

pub fn load_mesh(params: &mut InputParams, surface: usize) -> anyhow::Result<Vec<Triangle>> {
    let (positions, indices) = if params.contains_key("obj_file") {
        load_obj(params)?
    } else {
        let positions = params.get_float_array("positions")?;
        let indices = params.get_int_array("indices")?;
        if positions.len() % 3 != 0 {
            anyhow::bail!(
                "{} - 'positions' length should be a multiple of 3",
                params.name()
            );
        }
        let positions = positions
            .chunks_exact(3)
            .map(|p| glam::Vec3A::new(p[0], p[1], p[2]))
            .collect::<Vec<_>>();
        let mut checked = Vec::with_capacity(indices.len());
        for ind in indices {
            if ind < 0 || ind as usize >= positions.len() {
                anyhow::bail!("{} - index {} is out of range", params.name(), ind);
            }
            checked.push(ind as u32);
        }
        (positions, checked)
    };

    if indices.len() % 3 != 0 {
        anyhow::bail!(
            "{} - 'indices' length should be a multiple of 3",
            params.name()
        );
    }

    let triangles = indices
        .chunks_exact(3)
        .map(|tri| {
            Triangle::new(
                [
                    positions[tri[0] as usize],
                    positions[tri[1] as usize],
                    positions[tri[2] as usize],
                ],
                surface,
            )
        })
        .filter(|tri| tri.normal != glam::Vec3A::ZERO)
        .collect::<Vec<_>>();
    log::debug!("{} - {} triangles", params.name(), triangles.len());

    Ok(triangles)
}

fn load_obj(params: &mut InputParams) -> anyhow::Result<(Vec<glam::Vec3A>, Vec<u32>)> {
    use anyhow::Context;

    let obj_file = params.get_file_path("obj_file")?;
    let load_options = tobj::LoadOptions {
        triangulate: true,
        single_index: true,
        ..Default::default()
    };
    let (models, _) = tobj::load_obj(&obj_file, &load_options).context(format!(
        "{} - can't read obj file '{}'",
        params.name(),
        obj_file.display()
    ))?;

    let mut positions = vec![];
    let mut indices = vec![];
    for model in models {
        let base = positions.len() as u32;
        positions.extend(
            model
                .mesh
                .positions
                .chunks_exact(3)
                .map(|p| glam::Vec3A::new(p[0], p[1], p[2])),
        );
        indices.extend(model.mesh.indices.into_iter().map(|ind| ind + base));
    }

    Ok((positions, indices))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> Triangle {
        Triangle::new(
            [
                glam::Vec3A::new(0.0, 0.0, 0.0),
                glam::Vec3A::new(1.0, 0.0, 0.0),
                glam::Vec3A::new(0.0, 1.0, 0.0),
            ],
            1,
        )
    }

    #[test]
    fn hit_inside_miss_outside() {
        let tri = unit_triangle();
        let mut inter = Intersection::default();
        let ray = Ray::new(glam::Vec3A::new(0.25, 0.25, 1.0), -glam::Vec3A::Z);
        assert!(tri.intersect(&ray, &mut inter));
        assert!((inter.t - 1.0).abs() < 1e-5);
        assert!((inter.normal - glam::Vec3A::Z).length() < 1e-5);

        let ray = Ray::new(glam::Vec3A::new(0.75, 0.75, 1.0), -glam::Vec3A::Z);
        assert!(!tri.intersect_test(&ray, f32::MAX));
    }

    #[test]
    fn closer_hit_is_kept() {
        let tri = unit_triangle();
        let ray = Ray::new(glam::Vec3A::new(0.25, 0.25, 1.0), -glam::Vec3A::Z);
        let mut inter = Intersection::with_t_max(0.5);
        assert!(!tri.intersect(&ray, &mut inter));
        assert_eq!(inter.t, 0.5);
    }
}
