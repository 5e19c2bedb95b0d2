use crate::core::{color::Color, loader::InputParams, rng::Rng};

use super::{BsdfSample, MaterialT};

/// Two-sided Lambertian reflector.
pub struct Diffuse {
    reflectance: Color,
}

impl Diffuse {
    pub fn new(reflectance: Color) -> Self {
        Self { reflectance }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let reflectance = params.get_float3_or("reflectance", [0.5, 0.5, 0.5])?;
        Ok(Self::new(reflectance.into()))
    }
}

impl MaterialT for Diffuse {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BsdfSample> {
        let mut wi = rng.cosine_weighted_on_hemisphere();
        if wo.z < 0.0 {
            wi.z = -wi.z;
        }
        let pdf = wi.z.abs() * std::f32::consts::FRAC_1_PI;
        if pdf <= 0.0 {
            return None;
        }
        Some(BsdfSample {
            wi,
            bsdf: self.reflectance * std::f32::consts::FRAC_1_PI,
            pdf,
        })
    }

    fn eval(&self, wo: glam::Vec3A, wi: glam::Vec3A) -> Color {
        if wo.z * wi.z > 0.0 {
            self.reflectance * std::f32::consts::FRAC_1_PI
        } else {
            Color::BLACK
        }
    }

    fn is_delta(&self) -> bool {
        false
    }
}
