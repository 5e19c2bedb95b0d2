pub mod camera;
pub mod core;
pub mod driver;
pub mod error;
pub mod light;
pub mod loader;
pub mod material;
pub mod pixel_sampler;
pub mod primitive;
pub mod renderer;
pub mod variant;

pub use driver::{run, DriverConfig};
pub use error::{GtError, GtResult};
pub use variant::Variant;
