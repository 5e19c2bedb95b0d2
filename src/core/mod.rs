pub mod bbox;
pub mod bitmap;
pub mod color;
pub mod coord;
pub mod film;
pub mod intersection;
pub mod loader;
pub mod ray;
pub mod rng;
pub mod scene;
