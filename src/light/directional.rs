use crate::core::{color::Color, loader::InputParams};

use super::{LightSample, LightT};

pub struct DirLight {
    /// Direction the light travels in.
    direction: glam::Vec3A,
    irradiance: Color,
}

impl DirLight {
    pub fn new(direction: glam::Vec3A, irradiance: Color) -> Self {
        Self {
            direction: direction.normalize(),
            irradiance,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let direction: glam::Vec3A = params.get_float3("direction")?.into();
        if direction.length_squared() == 0.0 {
            anyhow::bail!("{} - 'direction' should be non-zero", params.name());
        }
        let irradiance = params.get_float3("irradiance")?;
        Ok(Self::new(direction, irradiance.into()))
    }
}

impl LightT for DirLight {
    fn sample(&self, _position: glam::Vec3A) -> LightSample {
        LightSample {
            direction: -self.direction,
            strength: self.irradiance,
            dist: f32::MAX,
        }
    }
}
