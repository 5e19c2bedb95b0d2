use crate::{
    camera::CameraT,
    core::{
        bitmap::ImageBuffer,
        color::Color,
        coord::Coordinate,
        film::{Film, FilmTile},
        intersection::Intersection,
        loader::InputParams,
        ray::Ray,
        rng::Rng,
        scene::Scene,
    },
    error::{GtError, GtResult},
    light::LightT,
    material::MaterialT,
    pixel_sampler::{PixelSampler, PixelSamplerT},
};

use super::{util, RenderSettings, RendererT, DEFAULT_MAX_DEPTH};

/// Unidirectional path tracer. Delta lights are sampled with shadow rays at every
/// non-specular vertex; emitters and the environment are picked up when hit.
pub struct PathTracer {
    max_depth: u32,
}

impl PathTracer {
    const RR_START_DEPTH: u32 = 3;

    pub fn new(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// A `max_depth` of -1 means no bounce limit.
    pub fn load(params: &mut InputParams) -> anyhow::Result<Self> {
        let max_depth = params.get_int_or("max_depth", DEFAULT_MAX_DEPTH as i64)?;
        let max_depth = match max_depth {
            -1 => u32::MAX,
            d if d >= 1 && d <= u32::MAX as i64 => d as u32,
            _ => anyhow::bail!(
                "{} - 'max_depth' should be -1 or a positive integer",
                params.name()
            ),
        };
        Ok(Self::new(max_depth))
    }

    fn trace_ray(&self, scene: &Scene, mut ray: Ray, rng: &mut Rng) -> Color {
        let mut final_color = Color::BLACK;
        let mut throughput = Color::WHITE;
        let mut curr_depth = 0;

        while curr_depth < self.max_depth {
            let mut inter = Intersection::default();
            if !scene.intersect(&ray, &mut inter) {
                if let Some(env) = scene.environment() {
                    final_color += throughput * env.radiance(ray.direction);
                }
                break;
            }

            let surf = scene.surface(inter.surface);
            // emitters only radiate from their front side
            if !surf.emission.is_black() && ray.direction.dot(inter.normal) < 0.0 {
                final_color += throughput * surf.emission;
            }

            let material = scene.material(surf.material);
            let coord = Coordinate::from_z(inter.normal);
            let wo = coord.to_local(-ray.direction);

            if !material.is_delta() {
                for light in scene.lights() {
                    let light_sample = light.sample(inter.position);
                    let wi = coord.to_local(light_sample.direction);
                    let bsdf = material.eval(wo, wi);
                    if bsdf.is_black() {
                        continue;
                    }
                    let shadow_ray =
                        Ray::leaving_surface(inter.position, light_sample.direction, wi.z);
                    if !scene.occluded(&shadow_ray, light_sample.dist - 0.001) {
                        final_color += throughput * light_sample.strength * bsdf * wi.z.abs();
                    }
                }
            }

            let samp = match material.sample(wo, rng) {
                Some(samp) if samp.pdf > 0.0 => samp,
                _ => break,
            };
            throughput *= samp.bsdf * (samp.wi.z.abs() / samp.pdf);
            if !throughput.is_finite() || throughput.is_black() {
                break;
            }
            ray = Ray::leaving_surface(inter.position, coord.to_world(samp.wi), samp.wi.z);

            if curr_depth >= Self::RR_START_DEPTH {
                let rr_prop = throughput.max_component().clamp(0.05, 0.95);
                if rng.uniform_1d() > rr_prop {
                    break;
                }
                throughput /= rr_prop;
            }

            curr_depth += 1;
        }

        final_color
    }

    fn render_rows(
        &self,
        scene: &Scene,
        range: util::ImageRange,
        mut pixel_sampler: PixelSampler,
        seed: Option<u64>,
        progress_bar: &indicatif::ProgressBar,
    ) -> FilmTile {
        let (width, height) = scene.size();
        let aspect = width as f32 / height as f32;
        let width_inv = 1.0 / width as f32;
        let height_inv = 1.0 / height as f32;
        let camera = scene.camera();

        let mut tile = FilmTile::new(range.from, range.to, width);
        for j in range.from..range.to {
            let mut rng = Rng::for_row(seed, j);
            for i in 0..width {
                let mut pixel = PixelAverage::default();
                pixel_sampler.start_pixel();
                while let Some((offset_x, offset_y)) = pixel_sampler.next_sample(&mut rng) {
                    let x = ((i as f32 + offset_x) * width_inv - 0.5) * aspect;
                    let y = ((height - j - 1) as f32 + offset_y) * height_inv - 0.5;
                    pixel.add(self.trace_ray(scene, camera.generate_ray((x, y)), &mut rng));
                }
                tile.pixels.push(pixel.average());
            }
            progress_bar.inc(width as u64);
        }
        tile
    }
}

/// Mean of the finite samples of one pixel. NaN or infinite radiance is left out
/// of both the sum and the count.
#[derive(Default)]
struct PixelAverage {
    sum: Color,
    count: u32,
}

impl PixelAverage {
    fn add(&mut self, color: Color) {
        if color.is_finite() {
            self.sum += color;
            self.count += 1;
        }
    }

    fn average(&self) -> Color {
        if self.count > 0 {
            self.sum / self.count as f32
        } else {
            Color::BLACK
        }
    }
}

impl RendererT for PathTracer {
    fn render(&self, scene: &Scene, settings: &RenderSettings) -> GtResult<ImageBuffer> {
        if settings.spp == 0 {
            return Err(GtError::render("samples per pixel must be positive"));
        }
        let (width, height) = scene.size();
        let film_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|len| len.checked_mul(3));
        if width == 0 || height == 0 || film_len.is_none() {
            return Err(GtError::render(format!(
                "can't allocate a {}x{} film",
                width, height
            )));
        }

        let pixel_sampler = scene.sampler().with_spp(settings.spp);
        let ranges = util::create_image_ranges(settings.variant.worker_count(), height);
        log::info!(
            "rendering {}x{} at {} spp on {} ({} row ranges)",
            width,
            height,
            pixel_sampler.spp(),
            settings.variant,
            ranges.len()
        );

        let progress_bar = util::render_progress_bar(width, height, settings.show_progress);
        let tiles = crossbeam::scope(|scope| {
            let handles = ranges
                .iter()
                .map(|range| {
                    let range = *range;
                    let progress_bar = progress_bar.clone();
                    let seed = settings.seed;
                    scope.spawn(move |_| {
                        self.render_rows(scene, range, pixel_sampler, seed, &progress_bar)
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|handle| handle.join())
                .collect::<Result<Vec<_>, _>>()
        })
        .map_err(|_| GtError::render("a render worker panicked"))?
        .map_err(|_| GtError::render("a render worker panicked"))?;
        progress_bar.finish_and_clear();

        let mut film = Film::new(width, height);
        for tile in tiles {
            film.merge_tile(tile);
        }
        Ok(film.into_image_buffer(settings.variant.mode))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        camera::PerspectiveCamera,
        core::{bitmap::PixelFormat, scene::{SceneParts, Surface}},
        light::{Environment, PointLight},
        material::Diffuse,
        pixel_sampler::StratifiedSampler,
        primitive::Sphere,
        variant::{Backend, ColorMode, Variant},
    };

    fn sphere_parts(lit: bool) -> SceneParts {
        let camera = PerspectiveCamera::new(
            glam::Vec3A::new(0.0, 0.0, 4.0),
            -glam::Vec3A::Z,
            glam::Vec3A::Y,
            40f32.to_radians(),
        );
        let lights = if lit {
            vec![PointLight::new(glam::Vec3A::new(2.0, 3.0, 4.0), Color::gray(20.0)).into()]
        } else {
            vec![]
        };
        SceneParts {
            width: 12,
            height: 9,
            camera: camera.into(),
            renderer: PathTracer::new(4).into(),
            sampler: StratifiedSampler::new(4).into(),
            shapes: vec![Sphere::new(glam::Vec3A::ZERO, 1.0, 0).into()],
            materials: vec![Diffuse::new(Color::gray(0.6)).into()],
            surfaces: vec![Surface {
                material: 0,
                emission: Color::BLACK,
            }],
            lights,
            environment: None,
        }
    }

    fn sphere_scene(lit: bool) -> Scene {
        Scene::new(sphere_parts(lit))
    }

    fn settings(backend: Backend, mode: ColorMode, spp: u32) -> RenderSettings {
        RenderSettings {
            variant: Variant::new(backend, mode),
            spp,
            seed: Some(7),
            show_progress: false,
        }
    }

    fn render(scene: &Scene, settings: &RenderSettings) -> GtResult<ImageBuffer> {
        PathTracer::new(4).render(scene, settings)
    }

    #[test]
    fn seeded_render_does_not_depend_on_worker_count() {
        let scene = sphere_scene(true);
        let single = render(&scene, &settings(Backend::Scalar, ColorMode::Rgb, 8)).unwrap();
        let parallel = render(&scene, &settings(Backend::Llvm, ColorMode::Rgb, 8)).unwrap();
        assert_eq!(single.data(), parallel.data());
    }

    #[test]
    fn lit_sphere_is_visible() {
        let scene = sphere_scene(true);
        let image = render(&scene, &settings(Backend::Llvm, ColorMode::Rgb, 4)).unwrap();
        assert_eq!((image.width(), image.height()), (12, 9));
        assert_eq!(image.format(), PixelFormat::Rgb);
        assert!(image.pixel(6, 4).iter().all(|v| *v > 0.0));
        // corners miss the sphere and there is no environment
        assert!(image.pixel(0, 0).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn unlit_scene_is_black() {
        let scene = sphere_scene(false);
        let image = render(&scene, &settings(Backend::Scalar, ColorMode::Rgb, 2)).unwrap();
        assert_eq!(image.mean(), 0.0);
    }

    #[test]
    fn environment_shows_through_misses() {
        let scene = Scene::new(SceneParts {
            environment: Some(Environment::new(Color::gray(0.25))),
            ..sphere_parts(false)
        });
        let image = render(&scene, &settings(Backend::Scalar, ColorMode::Mono, 2)).unwrap();
        assert_eq!(image.format(), PixelFormat::Y);
        assert!((image.pixel(0, 0)[0] - 0.25).abs() < 1e-5);
    }

    #[test]
    fn non_finite_samples_do_not_darken_the_pixel() {
        let mut pixel = PixelAverage::default();
        pixel.add(Color::gray(0.5));
        pixel.add(Color::new(f32::NAN, 0.0, 0.0));
        pixel.add(Color::gray(f32::INFINITY));
        assert_eq!(pixel.average(), Color::gray(0.5));

        assert_eq!(PixelAverage::default().average(), Color::BLACK);
    }

    #[test]
    fn zero_spp_is_a_render_error() {
        let scene = sphere_scene(true);
        match render(&scene, &settings(Backend::Scalar, ColorMode::Rgb, 0)) {
            Err(GtError::Render(_)) => {}
            other => panic!("expected a render error, got {:?}", other.map(|_| ())),
        }
    }
}
