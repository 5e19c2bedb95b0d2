//! The ground-truth render sequence: select a variant, resolve the scene, load,
//! render and write. Each step runs once and the first failure ends the run.

use std::path::{Path, PathBuf};

use crate::{
    core::bitmap,
    error::GtResult,
    loader,
    renderer::{RenderSettings, RendererT},
    variant,
};

pub const DEFAULT_VARIANT: &str = "llvm_ad_rgb";
pub const DEFAULT_SPP: u32 = 128;
pub const SCENE_FILE: &str = "hair_scene.json";
pub const OUTPUT_FILE: &str = "ground_truth.png";

#[derive(Clone, Debug)]
pub struct DriverConfig {
    pub variant: String,
    pub spp: u32,
    /// Used as given; when absent `SCENE_FILE` is looked up next to the program.
    pub scene: Option<PathBuf>,
    pub output: PathBuf,
    pub seed: Option<u64>,
    pub show_progress: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            variant: DEFAULT_VARIANT.to_owned(),
            spp: DEFAULT_SPP,
            scene: None,
            output: PathBuf::from(OUTPUT_FILE),
            seed: None,
            show_progress: true,
        }
    }
}

/// Locates `file_name` relative to the program rather than the working directory.
///
/// Candidates, first existing wins: the executable's directory, its `scenes/`
/// subdirectory, then the `scenes/` directory of the source tree. When none exists
/// the source tree candidate is returned so that loading reports the missing file.
pub fn resolve_scene_path(file_name: &str) -> PathBuf {
    let source_candidate = Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("scenes")
        .join(file_name);

    let exe_dir = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));
    let mut candidates = vec![];
    if let Some(dir) = exe_dir {
        candidates.push(dir.join(file_name));
        candidates.push(dir.join("scenes").join(file_name));
    }

    candidates
        .into_iter()
        .find(|path| path.is_file())
        .unwrap_or(source_candidate)
}

/// Runs the whole sequence and returns where the image was written.
pub fn run(config: &DriverConfig) -> GtResult<PathBuf> {
    let variant = variant::select(&config.variant)?;
    log::info!("variant: {}", variant);

    let scene_path = match &config.scene {
        Some(path) => path.clone(),
        None => resolve_scene_path(SCENE_FILE),
    };
    log::info!("loading scene '{}'", scene_path.display());
    let scene = loader::load_scene(&scene_path)?;

    let settings = RenderSettings {
        variant,
        spp: config.spp,
        seed: config.seed,
        show_progress: config.show_progress,
    };
    let begin_time = std::time::Instant::now();
    let image = scene.renderer().render(&scene, &settings)?;
    log::info!("rendered in {:?}", begin_time.elapsed());
    drop(scene);

    bitmap::write_bitmap(&config.output, &image)?;
    log::info!("wrote '{}'", config.output.display());

    Ok(config.output.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_ground_truth_setup() {
        let config = DriverConfig::default();
        assert_eq!(config.spp, 128);
        assert_eq!(config.output, PathBuf::from("ground_truth.png"));
        assert!(config.scene.is_none());
        assert!(variant::select(&config.variant).is_ok());
    }

    #[test]
    fn bundled_scene_is_found_from_any_working_directory() {
        let path = resolve_scene_path(SCENE_FILE);
        assert!(path.is_absolute());
        assert!(path.is_file(), "{} is missing", path.display());
    }

    #[test]
    fn bundled_scene_loads_its_hair_file() {
        let scene = loader::load_scene(resolve_scene_path(SCENE_FILE)).unwrap();
        assert_eq!(scene.size(), (256, 256));
        // 288 strands of 6 segments, plus head, floor, glass ball and lamp
        assert_eq!(scene.primitive_count(), 288 * 6 + 5);
    }

    #[test]
    fn unknown_scene_falls_back_to_the_source_tree() {
        let path = resolve_scene_path("no_such_scene.json");
        assert_eq!(
            path,
            Path::new(env!("CARGO_MANIFEST_DIR")).join("scenes/no_such_scene.json")
        );
    }
}
