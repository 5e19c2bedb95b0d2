use crate::{
    camera::Camera,
    light::{Environment, Light},
    material::Material,
    pixel_sampler::PixelSampler,
    primitive::{BvhAccel, PrimitiveT, Shape},
    renderer::Renderer,
};

use super::{color::Color, intersection::Intersection, ray::Ray};

/// What a shape is made of: index into the scene materials plus emitted radiance.
pub struct Surface {
    pub material: usize,
    pub emission: Color,
}

/// A loaded scene, ready to be rendered by its own integrator.
pub struct Scene {
    width: u32,
    height: u32,
    camera: Camera,
    renderer: Renderer,
    sampler: PixelSampler,
    aggregate: BvhAccel<Shape>,
    materials: Vec<Material>,
    surfaces: Vec<Surface>,
    lights: Vec<Light>,
    environment: Option<Environment>,
}

pub struct SceneParts {
    pub width: u32,
    pub height: u32,
    pub camera: Camera,
    pub renderer: Renderer,
    pub sampler: PixelSampler,
    pub shapes: Vec<Shape>,
    pub materials: Vec<Material>,
    pub surfaces: Vec<Surface>,
    pub lights: Vec<Light>,
    pub environment: Option<Environment>,
}

impl Scene {
    pub fn new(parts: SceneParts) -> Self {
        let aggregate = BvhAccel::new(parts.shapes, 4, 16);
        log::info!(
            "{} primitives, {} materials, {} lights{}",
            aggregate.len(),
            parts.materials.len(),
            parts.lights.len(),
            if parts.environment.is_some() {
                ", environment"
            } else {
                ""
            }
        );

        Self {
            width: parts.width,
            height: parts.height,
            camera: parts.camera,
            renderer: parts.renderer,
            sampler: parts.sampler,
            aggregate,
            materials: parts.materials,
            surfaces: parts.surfaces,
            lights: parts.lights,
            environment: parts.environment,
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Sampler from the scene file; the render call's spp takes precedence over its count.
    pub fn sampler(&self) -> PixelSampler {
        self.sampler
    }

    pub fn primitive_count(&self) -> usize {
        self.aggregate.len()
    }

    pub fn intersect(&self, ray: &Ray, inter: &mut Intersection) -> bool {
        self.aggregate.intersect(ray, inter)
    }

    pub fn occluded(&self, ray: &Ray, t_max: f32) -> bool {
        self.aggregate.intersect_test(ray, t_max)
    }

    pub fn surface(&self, index: usize) -> &Surface {
        &self.surfaces[index]
    }

    pub fn material(&self, index: usize) -> &Material {
        &self.materials[index]
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }
}
