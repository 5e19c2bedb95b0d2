use crate::core::{color::Color, loader::InputParams, rng::Rng};

use super::{util, BsdfSample, MaterialT};

/// Perfect mirror with a constant tint.
pub struct Conductor {
    reflectance: Color,
}

impl Conductor {
    pub fn new(reflectance: Color) -> Self {
        Self { reflectance }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let reflectance = params.get_float3_or("reflectance", [1.0, 1.0, 1.0])?;
        Ok(Self::new(reflectance.into()))
    }
}

impl MaterialT for Conductor {
    fn sample(&self, wo: glam::Vec3A, _rng: &mut Rng) -> Option<BsdfSample> {
        let wi = util::reflect(wo);
        if wi.z == 0.0 {
            return None;
        }
        Some(BsdfSample {
            wi,
            bsdf: self.reflectance / wi.z.abs(),
            pdf: 1.0,
        })
    }

    fn eval(&self, _wo: glam::Vec3A, _wi: glam::Vec3A) -> Color {
        Color::BLACK
    }

    fn is_delta(&self) -> bool {
        true
    }
}
