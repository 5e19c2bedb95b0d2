use crate::core::{bbox::Bbox, intersection::Intersection, loader::InputParams, ray::Ray};

use anyhow::Context;

use super::{hair_file, PrimitiveT};

/// Open cylinder around the segment `p0 -> p1`, one piece of a hair strand.
pub struct Cylinder {
    p0: glam::Vec3A,
    p1: glam::Vec3A,
    axis: glam::Vec3A,
    length: f32,
    radius: f32,
    surface: usize,
}

impl Cylinder {
    pub fn new(p0: glam::Vec3A, p1: glam::Vec3A, radius: f32, surface: usize) -> Self {
        let length = (p1 - p0).length();
        Self {
            p0,
            p1,
            axis: (p1 - p0) / length,
            length,
            radius,
            surface,
        }
    }

    /// Hit distances in increasing order, each one within the segment.
    fn intersect_ray(&self, ray: &Ray) -> [Option<f32>; 2] {
        let o = ray.origin - self.p0;
        let d = ray.direction;
        let d_perp = d - self.axis * d.dot(self.axis);
        let o_perp = o - self.axis * o.dot(self.axis);

        let a = d_perp.length_squared();
        if a < 1e-12 {
            return [None, None];
        }
        let b = o_perp.dot(d_perp);
        let c = o_perp.length_squared() - self.radius * self.radius;
        let delta = b * b - a * c;
        if delta < 0.0 {
            return [None, None];
        }
        let delta = delta.sqrt();

        let within = |t: f32| {
            let s = (o + d * t).dot(self.axis);
            if (0.0..=self.length).contains(&s) {
                Some(t)
            } else {
                None
            }
        };
        [within((-b - delta) / a), within((-b + delta) / a)]
    }

    fn nearest_hit(&self, ray: &Ray, t_max: f32) -> Option<f32> {
        self.intersect_ray(ray)
            .iter()
            .flatten()
            .copied()
            .find(|t| ray.t_min < *t && *t < t_max)
    }
}

impl PrimitiveT for Cylinder {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool {
        self.nearest_hit(ray, t_max).is_some()
    }

    fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool {
        if let Some(t) = self.nearest_hit(ray, inter.t) {
            let position = ray.point_at(t);
            let on_axis = self.p0 + self.axis * (position - self.p0).dot(self.axis);
            inter.t = t;
            inter.position = position;
            inter.normal = (position - on_axis).normalize_or_zero();
            inter.surface = self.surface;
            true
        } else {
            false
        }
    }

    fn bbox(&self) -> Bbox {
        Bbox::from_points(&[self.p0, self.p1]).expand(self.radius)
    }
}

pub const DEFAULT_STRAND_LENGTH: i64 = 100;

/// Strands come either inline, each a flat list of control points
/// `[x0, y0, z0, x1, y1, z1, ...]`, or from a `strands_file` (`.hair` or `.ply`).
/// Points are placed with `scale` then `translation`; `radius` stays in scene
/// units. Points of `.ply` files are grouped into strands of `strand_length` points.
pub fn load_strands(params: &mut InputParams, surface: usize) -> anyhow::Result<Vec<Cylinder>> {
    let radius = params.get_float("radius")?;
    if radius <= 0.0 {
        anyhow::bail!("{} - 'radius' should be positive", params.name());
    }

    let strands = if params.contains_key("strands_file") {
        let path = params.get_file_path("strands_file")?;
        let strand_length = params.get_int_or("strand_length", DEFAULT_STRAND_LENGTH)?;
        if strand_length < 2 {
            anyhow::bail!("{} - 'strand_length' should be at least 2", params.name());
        }
        let strands = hair_file::read_strands_file(&path, strand_length as usize).with_context(|| {
            format!(
                "{} - can't read strands file '{}'",
                params.name(),
                path.display()
            )
        })?;
        let total = strands.len();
        let strands = strands
            .into_iter()
            .filter(|strand| strand.len() >= 2)
            .collect::<Vec<_>>();
        if strands.len() < total {
            log::warn!(
                "{} - skipped {} strands with fewer than 2 points",
                params.name(),
                total - strands.len()
            );
        }
        strands
    } else {
        let mut strands = vec![];
        for (i, strand) in params.get_float_2darray("strands")?.iter().enumerate() {
            if strand.len() % 3 != 0 || strand.len() < 6 {
                anyhow::bail!(
                    "{} - strand {} should hold at least 2 points as xyz triples",
                    params.name(),
                    i
                );
            }
            strands.push(
                strand
                    .chunks_exact(3)
                    .map(|p| glam::Vec3A::new(p[0], p[1], p[2]))
                    .collect::<Vec<_>>(),
            );
        }
        strands
    };

    let scale = params.get_float_or("scale", 1.0)?;
    if scale <= 0.0 {
        anyhow::bail!("{} - 'scale' should be positive", params.name());
    }
    let translation: glam::Vec3A = params.get_float3_or("translation", [0.0; 3])?.into();

    let mut segments = vec![];
    for points in &strands {
        let points = points
            .iter()
            .map(|p| *p * scale + translation)
            .collect::<Vec<_>>();
        segments.extend(
            points
                .windows(2)
                .filter(|w| w[0] != w[1])
                .map(|w| Cylinder::new(w[0], w[1], radius, surface)),
        );
    }
    log::debug!(
        "{} - {} strands, {} segments",
        params.name(),
        strands.len(),
        segments.len()
    );

    Ok(segments)
}
