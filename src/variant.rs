use std::{fmt, str::FromStr};

use crate::error::{GtError, GtResult};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Backend {
    /// Renders on a single thread.
    Scalar,
    /// All CPU cores.
    Llvm,
    /// GPU. Known by name but never compiled into this build.
    Cuda,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ColorMode {
    Mono,
    Rgb,
}

/// A compute backend paired with a colour mode, named like `llvm_ad_rgb`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Variant {
    pub backend: Backend,
    pub mode: ColorMode,
}

const ALL_VARIANTS: [Variant; 6] = [
    Variant::new(Backend::Scalar, ColorMode::Mono),
    Variant::new(Backend::Scalar, ColorMode::Rgb),
    Variant::new(Backend::Llvm, ColorMode::Mono),
    Variant::new(Backend::Llvm, ColorMode::Rgb),
    Variant::new(Backend::Cuda, ColorMode::Mono),
    Variant::new(Backend::Cuda, ColorMode::Rgb),
];

impl Variant {
    pub const fn new(backend: Backend, mode: ColorMode) -> Self {
        Self { backend, mode }
    }

    pub fn is_available(&self) -> bool {
        match self.backend {
            Backend::Scalar | Backend::Llvm => true,
            Backend::Cuda => false,
        }
    }

    /// Number of row ranges rendered concurrently.
    pub fn worker_count(&self) -> u32 {
        match self.backend {
            Backend::Scalar => 1,
            Backend::Llvm | Backend::Cuda => num_cpus::get() as u32 * 2,
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let backend = match self.backend {
            Backend::Scalar => "scalar",
            Backend::Llvm => "llvm_ad",
            Backend::Cuda => "cuda_ad",
        };
        let mode = match self.mode {
            ColorMode::Mono => "mono",
            ColorMode::Rgb => "rgb",
        };
        write!(f, "{}_{}", backend, mode)
    }
}

impl FromStr for Variant {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (backend, mode) = match s.rfind('_') {
            Some(pos) => (&s[..pos], &s[pos + 1..]),
            None => anyhow::bail!("'{}' is not of the form <backend>_<mode>", s),
        };
        let backend = match backend {
            "scalar" => Backend::Scalar,
            "llvm_ad" => Backend::Llvm,
            "cuda_ad" => Backend::Cuda,
            _ => anyhow::bail!("unknown backend '{}'", backend),
        };
        let mode = match mode {
            "mono" => ColorMode::Mono,
            "rgb" => ColorMode::Rgb,
            _ => anyhow::bail!("unknown colour mode '{}'", mode),
        };
        Ok(Self::new(backend, mode))
    }
}

pub fn all() -> &'static [Variant] {
    &ALL_VARIANTS
}

pub fn available() -> Vec<Variant> {
    ALL_VARIANTS
        .iter()
        .copied()
        .filter(Variant::is_available)
        .collect()
}

/// Resolves a variant name to one this build can render with.
pub fn select(name: &str) -> GtResult<Variant> {
    log::debug!(
        "available variants: {}",
        available()
            .iter()
            .map(Variant::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    );

    let variant: Variant = name
        .parse()
        .map_err(|err: anyhow::Error| GtError::backend_unavailable(name, err.to_string()))?;
    if !variant.is_available() {
        return Err(GtError::backend_unavailable(
            name,
            "is not compiled into this build",
        ));
    }
    Ok(variant)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for variant in all() {
            let parsed: Variant = variant.to_string().parse().unwrap();
            assert_eq!(parsed, *variant);
        }
        assert_eq!(
            "llvm_ad_rgb".parse::<Variant>().unwrap(),
            Variant::new(Backend::Llvm, ColorMode::Rgb)
        );
    }

    #[test]
    fn cpu_variants_are_selectable() {
        assert_eq!(
            select("scalar_mono").unwrap(),
            Variant::new(Backend::Scalar, ColorMode::Mono)
        );
        assert_eq!(available().len(), 4);
        assert!(available().iter().all(|v| v.backend != Backend::Cuda));
    }

    #[test]
    fn gpu_and_unknown_variants_are_unavailable() {
        for name in &["cuda_ad_rgb", "cuda_ad_mono", "metal_rgb", "rgb", "scalar_spectral"] {
            match select(name) {
                Err(GtError::BackendUnavailable { variant, .. }) => assert_eq!(variant, *name),
                other => panic!("{}: expected BackendUnavailable, got {:?}", name, other),
            }
        }
    }

    #[test]
    fn scalar_renders_on_one_worker() {
        assert_eq!(Variant::new(Backend::Scalar, ColorMode::Rgb).worker_count(), 1);
        assert!(Variant::new(Backend::Llvm, ColorMode::Rgb).worker_count() >= 2);
    }
}
