use std::fs;
use std::path::Path;

use inr_training::{run_train, HyperParameters, InrError};

fn solid_image(path: &Path, rgb: [u8; 3]) {
    image::RgbImage::from_fn(8, 8, |_x, _y| image::Rgb(rgb))
        .save(path)
        .unwrap();
}

fn params(tmp: &tempfile::TempDir, model_type: &str) -> HyperParameters {
    HyperParameters {
        img_path: tmp.path().join("source.png"),
        log_dir: tmp.path().join("log"),
        experiment_name: "smoke".into(),
        model_type: model_type.into(),
        hidden_features: 32,
        hidden_layers: 2,
        remain_raw_resolution: true,
        lr: 5e-3,
        epochs: 400,
        steps: 400,
        steps_til_summary: 100,
        seed: Some(7),
        ..Default::default()
    }
}

#[test]
fn solid_color_reconstruction_exceeds_30_db() {
    let tmp = tempfile::tempdir().unwrap();
    let params = params(&tmp, "MLP");
    solid_image(&params.img_path, [200, 100, 50]);

    let report = run_train(&params).unwrap();
    assert!(
        report.recon_psnr > 30.0,
        "reconstruction PSNR too low: {}",
        report.recon_psnr
    );
    assert_eq!(report.samples, 64);
    assert!(report.max_psnr >= 0.0);

    let run_dir = params.run_dir();
    assert!(run_dir.join("recon.png").exists());
    let summary: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(run_dir.join("summary.json")).unwrap()).unwrap();
    assert_eq!(summary["model_type"], "MLP");
    assert_eq!(summary["epochs"], 400);

    let history = summary["history"].as_array().unwrap();
    assert_eq!(history.len(), 400);
    assert_eq!(history[0]["epoch"], 1);
    assert_eq!(history[399]["epoch"], 400);
}

#[test]
fn grayscale_diner_mlp_reconstruction() {
    let tmp = tempfile::tempdir().unwrap();
    let params = HyperParameters {
        grayscale: true,
        ..params(&tmp, "DinerMLP")
    };
    image::GrayImage::from_pixel(8, 8, image::Luma([90]))
        .save(&params.img_path)
        .unwrap();

    let report = run_train(&params).unwrap();
    assert!(report.recon_psnr > 30.0, "psnr {}", report.recon_psnr);

    let recon = image::open(params.run_dir().join("recon.png")).unwrap();
    assert_eq!(recon.color(), image::ColorType::L8);
}

#[test]
fn log_has_one_line_per_interval_and_appends() {
    let tmp = tempfile::tempdir().unwrap();
    let params = HyperParameters {
        epochs: 6,
        steps: 4,
        steps_til_summary: 2,
        ..params(&tmp, "Siren")
    };
    solid_image(&params.img_path, [10, 20, 30]);

    run_train(&params).unwrap();
    let log_path = params.run_dir().join("log.txt");
    let contents = fs::read_to_string(&log_path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[TRAIN] Epoch: 2 Loss: "));
    assert!(lines[2].starts_with("[TRAIN] Epoch: 6 Loss: "));
    assert!(lines.iter().all(|l| l.contains(" PSNR: ") && l.contains(" Time: ")));

    run_train(&params).unwrap();
    let contents = fs::read_to_string(&log_path).unwrap();
    assert_eq!(contents.lines().count(), 6);
}

#[test]
fn indivisible_steps_fail_before_any_file_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let params = HyperParameters {
        steps: 10,
        steps_til_summary: 3,
        ..params(&tmp, "MLP")
    };
    solid_image(&params.img_path, [1, 2, 3]);

    let err = run_train(&params).unwrap_err();
    assert!(matches!(err, InrError::Config(_)), "unexpected error: {err}");
    assert!(!params.log_dir.exists());
}

#[test]
fn nonpositive_w0_fails_before_any_file_is_created() {
    let tmp = tempfile::tempdir().unwrap();
    let params = HyperParameters {
        w0: 0.0,
        ..params(&tmp, "Siren")
    };
    solid_image(&params.img_path, [1, 2, 3]);

    let err = run_train(&params).unwrap_err();
    assert!(matches!(err, InrError::Config(_)), "unexpected error: {err}");
    assert!(!params.log_dir.exists());
}

#[test]
fn unsupported_model_type_is_not_implemented() {
    let tmp = tempfile::tempdir().unwrap();
    let params = params(&tmp, "Transformer");
    solid_image(&params.img_path, [1, 2, 3]);

    let err = run_train(&params).unwrap_err();
    assert!(matches!(err, InrError::NotImplemented(_)), "unexpected error: {err}");
    assert!(!params.log_dir.exists());
}

#[test]
fn diner_models_cannot_render_at_another_resolution() {
    let tmp = tempfile::tempdir().unwrap();
    let params = HyperParameters {
        epochs: 2,
        steps: 2,
        steps_til_summary: 1,
        render_resolution: Some("16x16".parse().unwrap()),
        ..params(&tmp, "DinerSiren")
    };
    solid_image(&params.img_path, [1, 2, 3]);

    let err = run_train(&params).unwrap_err();
    assert!(matches!(err, InrError::Render(_)), "unexpected error: {err}");
}
