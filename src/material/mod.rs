mod conductor;
mod dielectric;
mod diffuse;
mod util;

pub use conductor::*;
pub use dielectric::*;
pub use diffuse::*;

use crate::core::{color::Color, loader::InputParams, rng::Rng};

/// A sampled incident direction in the local shading frame (normal along +z).
pub struct BsdfSample {
    pub wi: glam::Vec3A,
    pub bsdf: Color,
    pub pdf: f32,
}

#[enum_dispatch::enum_dispatch(Material)]
pub trait MaterialT: Send + Sync {
    /// `wo` points away from the surface; it may lie below the surface for back faces.
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BsdfSample>;

    /// Always black for delta materials.
    fn eval(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color;

    fn is_delta(&self) -> bool;
}

#[enum_dispatch::enum_dispatch]
pub enum Material {
    Diffuse,
    Conductor,
    Dielectric,
}

pub fn create_material_from_params(params: &mut InputParams) -> anyhow::Result<(String, Material)> {
    params.set_name("material".into());
    let ty = params.get_str("type")?;
    let name = params.get_str("name")?;
    params.set_name(format!("material-{}-{}", ty, name).into());

    let res = match ty.as_str() {
        "diffuse" => Diffuse::load(params)?.into(),
        "conductor" => Conductor::load(params)?.into(),
        "dielectric" => Dielectric::load(params)?.into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok((name, res))
}
