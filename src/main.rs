use std::path::PathBuf;

use structopt::StructOpt;

use gtgen::{driver, variant, DriverConfig};

#[derive(StructOpt, Debug)]
#[structopt(name = "gtgen", about = "Renders the ground-truth image of the hair scene")]
struct Opt {
    /// Rendering variant, e.g. scalar_mono
    #[structopt(long)]
    variant: Option<String>,

    /// Samples per pixel
    #[structopt(long)]
    spp: Option<u32>,

    /// Scene file; defaults to the hair scene shipped with the program
    #[structopt(long, parse(from_os_str))]
    scene: Option<PathBuf>,

    /// Output image, png/jpg/exr
    #[structopt(short, long, parse(from_os_str))]
    output: Option<PathBuf>,

    /// Fixed seed for a reproducible image
    #[structopt(long)]
    seed: Option<u64>,

    #[structopt(long)]
    no_progress: bool,

    /// Print the known variants and exit
    #[structopt(long)]
    list_variants: bool,
}

/// Flags left out keep the `DriverConfig` defaults.
fn driver_config(opt: Opt) -> DriverConfig {
    let defaults = DriverConfig::default();
    DriverConfig {
        variant: opt.variant.unwrap_or(defaults.variant),
        spp: opt.spp.unwrap_or(defaults.spp),
        scene: opt.scene,
        output: opt.output.unwrap_or(defaults.output),
        seed: opt.seed,
        show_progress: !opt.no_progress,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let opt = Opt::from_args();

    if opt.list_variants {
        for v in variant::all() {
            let status = if v.is_available() { "" } else { " (unavailable)" };
            println!("{}{}", v, status);
        }
        return Ok(());
    }

    driver::run(&driver_config(opt))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_flags_use_driver_defaults() {
        let config = driver_config(Opt::from_iter(&["gtgen"]));
        assert_eq!(config.variant, driver::DEFAULT_VARIANT);
        assert_eq!(config.spp, driver::DEFAULT_SPP);
        assert_eq!(config.output, PathBuf::from(driver::OUTPUT_FILE));
        assert!(config.show_progress);
    }

    #[test]
    fn flags_override_defaults() {
        let config = driver_config(Opt::from_iter(&[
            "gtgen",
            "--variant",
            "scalar_mono",
            "--spp",
            "4",
            "-o",
            "out.exr",
            "--no-progress",
        ]));
        assert_eq!(config.variant, "scalar_mono");
        assert_eq!(config.spp, 4);
        assert_eq!(config.output, PathBuf::from("out.exr"));
        assert!(!config.show_progress);
    }
}
