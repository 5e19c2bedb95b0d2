use std::{path::Path, process::Command};

fn gtgen(cwd: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gtgen"))
        .current_dir(cwd)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

#[test]
fn bundled_scene_renders_from_any_working_directory() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    for cwd in &[first.path(), second.path()] {
        let out = gtgen(cwd, &["--spp", "1", "--seed", "3", "--no-progress"]);
        assert!(
            out.status.success(),
            "gtgen failed in {}: {}",
            cwd.display(),
            String::from_utf8_lossy(&out.stderr)
        );
        let image = cwd.join("ground_truth.png");
        assert!(std::fs::metadata(&image).unwrap().len() > 0);
    }
}

#[test]
fn unavailable_variant_exits_non_zero() {
    let dir = tempfile::tempdir().unwrap();
    let out = gtgen(dir.path(), &["--variant", "cuda_ad_rgb", "--no-progress"]);

    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("backend unavailable"));
    assert!(!dir.path().join("ground_truth.png").exists());
}

#[test]
fn list_variants_marks_gpu_as_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let out = gtgen(dir.path(), &["--list-variants"]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.lines().any(|l| l == "llvm_ad_rgb"));
    assert!(stdout.lines().any(|l| l == "cuda_ad_rgb (unavailable)"));
}
