mod independent;
mod stratified;

pub use independent::*;
pub use stratified::*;

use crate::core::{loader::InputParams, rng::Rng};

/// Yields `spp` sub-pixel offsets in [0, 1)^2 per pixel.
#[enum_dispatch::enum_dispatch(PixelSampler)]
pub trait PixelSamplerT: Send + Sync + Clone + Copy {
    fn spp(&self) -> u32;

    fn start_pixel(&mut self);

    fn next_sample(&mut self, rng: &mut Rng) -> Option<(f32, f32)>;
}

#[enum_dispatch::enum_dispatch]
#[derive(Clone, Copy)]
pub enum PixelSampler {
    IndependentSampler,
    StratifiedSampler,
}

impl PixelSampler {
    /// Same sampler kind with a different sample count.
    pub fn with_spp(self, spp: u32) -> Self {
        match self {
            PixelSampler::IndependentSampler(_) => IndependentSampler::new(spp).into(),
            PixelSampler::StratifiedSampler(_) => StratifiedSampler::new(spp).into(),
        }
    }
}

pub const DEFAULT_SCENE_SPP: u32 = 4;

pub fn create_sampler_from_params(params: &mut InputParams) -> anyhow::Result<PixelSampler> {
    params.set_name("sampler".into());
    let ty = params.get_str_or("type", "independent")?;
    params.set_name(format!("sampler-{}", ty).into());

    let spp = params.get_int_or("sample_count", DEFAULT_SCENE_SPP as i64)?;
    if spp <= 0 || spp > u32::MAX as i64 {
        anyhow::bail!("{} - 'sample_count' should be a positive integer", params.name());
    }
    let spp = spp as u32;

    let res = match ty.as_str() {
        "independent" => IndependentSampler::new(spp).into(),
        "stratified" => StratifiedSampler::new(spp).into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok(res)
}
