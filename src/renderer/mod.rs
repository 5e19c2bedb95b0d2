mod pt;
mod util;

pub use pt::*;

use crate::{
    core::{bitmap::ImageBuffer, loader::InputParams, scene::Scene},
    error::GtResult,
    variant::Variant,
};

/// Per-call parameters, as opposed to what the scene file fixes.
#[derive(Clone, Debug)]
pub struct RenderSettings {
    pub variant: Variant,
    pub spp: u32,
    pub seed: Option<u64>,
    pub show_progress: bool,
}

#[enum_dispatch::enum_dispatch(Renderer)]
pub trait RendererT: Send + Sync {
    fn render(&self, scene: &Scene, settings: &RenderSettings) -> GtResult<ImageBuffer>;
}

#[enum_dispatch::enum_dispatch]
pub enum Renderer {
    PathTracer,
}

pub const DEFAULT_MAX_DEPTH: u32 = 8;

pub fn create_renderer_from_params(params: &mut InputParams) -> anyhow::Result<Renderer> {
    params.set_name("integrator".into());
    let ty = params.get_str_or("type", "path")?;
    params.set_name(format!("integrator-{}", ty).into());

    let res = match ty.as_str() {
        "path" => PathTracer::load(params)?.into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok(res)
}
