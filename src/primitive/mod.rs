mod bvh;
mod cylinder;
mod hair_file;
mod sphere;
mod triangle;

pub use bvh::*;
pub use cylinder::*;
pub use sphere::*;
pub use triangle::*;

use crate::core::{bbox::Bbox, intersection::Intersection, loader::InputParams, ray::Ray};

#[enum_dispatch::enum_dispatch(Shape)]
pub trait PrimitiveT: Send + Sync {
    fn intersect_test(&self, ray: &Ray, t_max: f32) -> bool;

    /// Only reports hits closer than the current `inter.t`.
    fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool;

    fn bbox(&self) -> Bbox;
}

#[enum_dispatch::enum_dispatch]
pub enum Shape {
    Sphere,
    Triangle,
    Cylinder,
}

/// Expands one `shapes` entry into primitives that all use `surface`.
pub fn create_shapes_from_params(
    params: &mut InputParams,
    surface: usize,
) -> anyhow::Result<Vec<Shape>> {
    let ty = params.get_str("type")?;
    let name = params.name().to_owned();
    params.set_name(format!("{}-{}", name, ty).into());

    let res = match ty.as_str() {
        "sphere" => vec![Sphere::load(params, surface)?.into()],
        "mesh" => triangle::load_mesh(params, surface)?
            .into_iter()
            .map(Shape::from)
            .collect(),
        "strands" => cylinder::load_strands(params, surface)?
            .into_iter()
            .map(Shape::from)
            .collect(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    Ok(res)
}
