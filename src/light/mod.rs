mod directional;
mod environment;
mod point;

pub use directional::*;
pub use environment::*;
pub use point::*;

use crate::core::{color::Color, loader::InputParams};

/// Incident light at a shading point from one delta light.
pub struct LightSample {
    /// Unit vector from the shading point towards the light.
    pub direction: glam::Vec3A,
    pub strength: Color,
    pub dist: f32,
}

#[enum_dispatch::enum_dispatch(Light)]
pub trait LightT: Send + Sync {
    fn sample(&self, position: glam::Vec3A) -> LightSample;
}

#[enum_dispatch::enum_dispatch]
pub enum Light {
    DirLight,
    PointLight,
}

pub fn create_light_from_params(params: &mut InputParams) -> anyhow::Result<Light> {
    params.set_name("light".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("light-{}", ty).into());

    let res = match ty.as_str() {
        "directional" => DirLight::load(params)?.into(),
        "point" => PointLight::load(params)?.into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok(res)
}
