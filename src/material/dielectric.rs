use crate::core::{color::Color, loader::InputParams, rng::Rng};

use super::{util, BsdfSample, MaterialT};

/// Smooth glass, choosing reflection or refraction by the Fresnel term.
pub struct Dielectric {
    ior: f32,
}

impl Dielectric {
    pub fn new(ior: f32) -> Self {
        Self { ior }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let ior = params.get_float_or("ior", 1.5)?;
        if ior <= 0.0 {
            anyhow::bail!("{} - 'ior' should be positive", params.name());
        }
        Ok(Self::new(ior))
    }
}

impl MaterialT for Dielectric {
    fn sample(&self, wo: glam::Vec3A, rng: &mut Rng) -> Option<BsdfSample> {
        let fresnel = util::fresnel(self.ior, wo);
        if rng.uniform_1d() < fresnel {
            let wi = util::reflect(wo);
            Some(BsdfSample {
                wi,
                bsdf: Color::gray(fresnel / wi.z.abs()),
                pdf: fresnel,
            })
        } else {
            let wi = util::refract(wo, self.ior)?;
            // radiance is compressed when entering the denser side
            let ior_ratio = if wo.z >= 0.0 { 1.0 / self.ior } else { self.ior };
            Some(BsdfSample {
                wi,
                bsdf: Color::gray(ior_ratio * ior_ratio * (1.0 - fresnel) / wi.z.abs()),
                pdf: 1.0 - fresnel,
            })
        }
    }

    fn eval(&self, _wo: glam::Vec3A, _wi: glam::Vec3A) -> Color {
        Color::BLACK
    }

    fn is_delta(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_weights_stay_bounded() {
        let glass = Dielectric::new(1.5);
        let mut rng = Rng::from_seed(9);
        let wo = glam::Vec3A::new(0.3, 0.0, 0.91f32.sqrt());
        let mut reflected = 0;
        let mut refracted = 0;
        for _ in 0..512 {
            let s = glass.sample(wo, &mut rng).unwrap();
            let weight = s.bsdf * s.wi.z.abs() / s.pdf;
            if s.wi.z > 0.0 {
                reflected += 1;
                assert!((weight.r - 1.0).abs() < 1e-4);
            } else {
                refracted += 1;
                assert!(weight.r <= 1.0);
            }
        }
        assert!(refracted > reflected);
    }
}
