use crate::core::{color::Color, loader::InputParams};

/// Constant radiance for rays leaving the scene.
pub struct Environment {
    radiance: Color,
}

impl Environment {
    pub fn new(radiance: Color) -> Self {
        Self { radiance }
    }

    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        params.set_name("environment".into());
        let radiance = params.get_float3("radiance")?;
        params.check_unused_keys();
        Ok(Self::new(radiance.into()))
    }

    pub fn radiance(&self, _direction: glam::Vec3A) -> Color {
        self.radiance
    }
}
