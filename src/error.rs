use std::path::PathBuf;

pub type GtResult<T> = Result<T, GtError>;

#[derive(thiserror::Error, Debug)]
pub enum GtError {
    #[error("backend unavailable: variant '{variant}' {reason}")]
    BackendUnavailable { variant: String, reason: String },

    #[error("failed to load scene '{}': {message}", path.display())]
    SceneLoad { path: PathBuf, message: String },

    #[error("render error: {0}")]
    Render(String),

    #[error("failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GtError {
    pub fn backend_unavailable(variant: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BackendUnavailable {
            variant: variant.into(),
            reason: reason.into(),
        }
    }

    /// Keeps the whole `anyhow` context chain in the message.
    pub fn scene_load(path: impl Into<PathBuf>, err: anyhow::Error) -> Self {
        Self::SceneLoad {
            path: path.into(),
            message: format!("{:#}", err),
        }
    }

    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(GtError::backend_unavailable("cuda_ad_rgb", "x")
            .to_string()
            .starts_with("backend unavailable:"));
        assert!(GtError::render("x").to_string().starts_with("render error:"));
        assert!(GtError::io("out.png", std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
            .to_string()
            .contains("disk full"));
    }

    #[test]
    fn scene_load_keeps_context_chain() {
        let err = anyhow::anyhow!("no such file").context("scene - can't open");
        let err = GtError::scene_load("hair_scene.json", err);
        let msg = err.to_string();
        assert!(msg.contains("hair_scene.json"));
        assert!(msg.contains("can't open"));
        assert!(msg.contains("no such file"));
    }
}
