use std::{
    collections::HashMap,
    convert::TryInto,
    path::{Path, PathBuf},
};

use anyhow::Context;

use crate::{
    camera,
    core::{
        loader::InputParams,
        scene::{Scene, SceneParts, Surface},
    },
    error::{GtError, GtResult},
    light::{self, Environment},
    material, pixel_sampler, primitive,
    renderer::{self, Renderer},
};

const SCENE_KEYS: [&str; 8] = [
    "film",
    "integrator",
    "sampler",
    "camera",
    "materials",
    "shapes",
    "lights",
    "environment",
];

/// Loads a JSON scene description. Every failure, from a missing file to a dangling
/// material reference, is reported as a scene load error naming the file.
///
/// Scenes are variant independent; the colour mode only applies when rendering.
pub fn load_scene<P: AsRef<Path>>(path: P) -> GtResult<Scene> {
    let path = path.as_ref();
    log::debug!("loading '{}'", path.display());
    load_json_scene(path).map_err(|err| GtError::scene_load(path, err))
}

fn load_json_scene(path: &Path) -> anyhow::Result<Scene> {
    let json_file = std::fs::File::open(path).context("scene - can't open file")?;
    let json_reader = std::io::BufReader::new(json_file);
    let json_value: serde_json::Value =
        serde_json::from_reader(json_reader).context("scene - malformed JSON")?;
    let json = json_value
        .as_object()
        .context("scene - top level should be an object")?;
    let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();

    for key in json.keys() {
        if !key.starts_with('#') && !SCENE_KEYS.contains(&key.as_str()) {
            log::warn!("scene - unused key '{}'", key);
        }
    }

    let empty = serde_json::Value::Object(serde_json::Map::new());

    let film_value = json.get("film").context("scene - there is no 'film' field")?;
    let mut film_params = section_params(film_value, "film", &base_dir)?;
    let width = get_dimension(&mut film_params, "width")?;
    let height = get_dimension(&mut film_params, "height")?;
    film_params.check_unused_keys();

    let mut integrator_params =
        section_params(json.get("integrator").unwrap_or(&empty), "integrator", &base_dir)?;
    let renderer: Renderer = renderer::create_renderer_from_params(&mut integrator_params)?;

    let mut sampler_params =
        section_params(json.get("sampler").unwrap_or(&empty), "sampler", &base_dir)?;
    let sampler = pixel_sampler::create_sampler_from_params(&mut sampler_params)?;

    let camera_value = json
        .get("camera")
        .context("scene - there is no 'camera' field")?;
    let mut camera_params = section_params(camera_value, "camera", &base_dir)?;
    let camera = camera::create_camera_from_params(&mut camera_params)?;

    let mut materials = vec![];
    let mut material_indices = HashMap::new();
    for (i, value) in array_section(json, "materials", true)?.iter().enumerate() {
        let mut params = section_params(value, "material", &base_dir)
            .with_context(|| format!("materials[{}]", i))?;
        let (name, material) = material::create_material_from_params(&mut params)?;
        if material_indices.insert(name.clone(), materials.len()).is_some() {
            anyhow::bail!("materials - duplicated name '{}'", name);
        }
        materials.push(material);
    }

    let mut shapes = vec![];
    let mut surfaces = vec![];
    for (i, value) in array_section(json, "shapes", true)?.iter().enumerate() {
        let name = format!("shape-{}", i);
        let mut params = section_params(value, "shape", &base_dir)?;
        params.set_name(name.clone().into());

        let material_name = params.get_str("material")?;
        let material = match material_indices.get(&material_name) {
            Some(index) => *index,
            None => anyhow::bail!("{} - unknown material '{}'", name, material_name),
        };
        let emission = params.get_float3_or("emission", [0.0; 3])?;
        if emission.iter().any(|e| *e < 0.0) {
            anyhow::bail!("{} - 'emission' should be non-negative", name);
        }
        surfaces.push(Surface {
            material,
            emission: emission.into(),
        });

        shapes.extend(primitive::create_shapes_from_params(
            &mut params,
            surfaces.len() - 1,
        )?);
        params.check_unused_keys();
    }

    let mut lights = vec![];
    for value in array_section(json, "lights", false)? {
        let mut params = section_params(value, "light", &base_dir)?;
        lights.push(light::create_light_from_params(&mut params)?);
    }

    let environment = match json.get("environment") {
        Some(value) => {
            let mut params = section_params(value, "environment", &base_dir)?;
            Some(Environment::load(&mut params)?)
        }
        None => None,
    };

    if lights.is_empty() && environment.is_none() && surfaces.iter().all(|s| s.emission.is_black())
    {
        log::warn!("scene - no light source, the image will be black");
    }

    Ok(Scene::new(SceneParts {
        width,
        height,
        camera,
        renderer,
        sampler,
        shapes,
        materials,
        surfaces,
        lights,
        environment,
    }))
}

fn section_params(
    value: &serde_json::Value,
    name: &'static str,
    base_dir: &Path,
) -> anyhow::Result<InputParams> {
    let mut params: InputParams = value
        .try_into()
        .with_context(|| format!("{} - invalid section", name))?;
    params.set_name(name.into());
    params.set_base_dir(PathBuf::from(base_dir));
    Ok(params)
}

fn array_section<'a>(
    json: &'a serde_json::Map<String, serde_json::Value>,
    key: &str,
    required: bool,
) -> anyhow::Result<&'a [serde_json::Value]> {
    match json.get(key) {
        Some(serde_json::Value::Array(arr)) => Ok(arr),
        Some(_) => anyhow::bail!("scene - '{}' should be an array", key),
        None if required => anyhow::bail!("scene - there is no '{}' field", key),
        None => Ok(&[]),
    }
}

fn get_dimension(params: &mut InputParams, key: &str) -> anyhow::Result<u32> {
    let value = params.get_int(key)?;
    if value <= 0 || value > u32::MAX as i64 {
        anyhow::bail!("{} - '{}' should be a positive integer", params.name(), key);
    }
    Ok(value as u32)
}
