use crate::core::{color::Color, loader::InputParams};

use super::{LightSample, LightT};

pub struct PointLight {
    position: glam::Vec3A,
    intensity: Color,
}

impl PointLight {
    pub fn new(position: glam::Vec3A, intensity: Color) -> Self {
        Self {
            position,
            intensity,
        }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let position = params.get_float3("position")?;
        let intensity = params.get_float3("intensity")?;
        Ok(Self::new(position.into(), intensity.into()))
    }
}

impl LightT for PointLight {
    fn sample(&self, position: glam::Vec3A) -> LightSample {
        let dir = self.position - position;
        let dist_sqr = dir.length_squared();
        let dist = dist_sqr.sqrt();
        LightSample {
            direction: dir / dist,
            strength: self.intensity / dist_sqr,
            dist,
        }
    }
}
