mod perspective;

pub use perspective::*;

use crate::core::{loader::InputParams, ray::Ray};

#[enum_dispatch::enum_dispatch(Camera)]
pub trait CameraT: Send + Sync {
    /// `point` is on the image plane, y in [-0.5, 0.5] and x scaled by the aspect ratio.
    fn generate_ray(&self, point: (f32, f32)) -> Ray;
}

#[enum_dispatch::enum_dispatch]
pub enum Camera {
    PerspectiveCamera,
}

pub fn create_camera_from_params(params: &mut InputParams) -> anyhow::Result<Camera> {
    params.set_name("camera".into());
    let ty = params.get_str("type")?;
    params.set_name(format!("camera-{}", ty).into());

    let res = match ty.as_str() {
        "perspective" => PerspectiveCamera::load(params)?.into(),
        _ => anyhow::bail!("{}: unknown type '{}'", params.name(), ty),
    };

    params.check_unused_keys();

    Ok(res)
}
