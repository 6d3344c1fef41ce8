use burn::tensor::{backend::Backend, Tensor, TensorData};
use image::imageops::FilterType;
use image::{GrayImage, RgbImage};
use inr_models::CoordinateModel;
use std::path::Path;

use crate::config::Resolution;
use crate::dataset::coordinate_grid;
use crate::{InrError, InrResult};

/// Evaluate `model` on every pixel of `resolution` and write the image to `path`.
///
/// Predictions are clamped to [-1, 1] and mapped to 8-bit values. `channels`
/// must match the model's output width (1 for luma, 3 for RGB).
pub fn render<B: Backend, M: CoordinateModel<B>>(
    model: &M,
    path: &Path,
    resolution: Resolution,
    input_dim: usize,
    channels: usize,
    device: &B::Device,
) -> InrResult<()> {
    let n = resolution.pixels();
    if let Some(samples) = model.fixed_samples() {
        if samples != n {
            return Err(InrError::Render(format!(
                "model is bound to {samples} samples and cannot render {resolution} ({n} pixels)"
            )));
        }
    }

    let coords = Tensor::<B, 2>::from_data(
        TensorData::new(coordinate_grid(resolution, input_dim), [n, input_dim]),
        device,
    );
    let output = model.forward(coords).clamp(-1.0, 1.0);
    let [rows, cols] = output.dims();
    if rows != n || cols != channels {
        return Err(InrError::Render(format!(
            "model produced [{rows}, {cols}], expected [{n}, {channels}]"
        )));
    }

    let values = output
        .into_data()
        .to_vec::<f32>()
        .map_err(|e| InrError::Render(format!("failed to read predictions: {e:?}")))?;
    let pixels: Vec<u8> = values.iter().map(|v| to_u8(*v)).collect();

    let Resolution { width, height } = resolution;
    let saved = match channels {
        1 => GrayImage::from_raw(width, height, pixels).map(|img| img.save(path)),
        3 => RgbImage::from_raw(width, height, pixels).map(|img| img.save(path)),
        other => {
            return Err(InrError::Render(format!(
                "unsupported channel count {other}"
            )))
        }
    };
    match saved {
        Some(result) => result.map_err(InrError::image(path)),
        None => Err(InrError::Render("pixel buffer does not match resolution".into())),
    }
}

fn to_u8(v: f32) -> u8 {
    ((v + 1.0) * 0.5 * 255.0).round().clamp(0.0, 255.0) as u8
}

/// PSNR in dB between two 8-bit images, on [0, 1] intensities (peak 1).
///
/// The source is resized to the reconstruction's size when they differ.
/// Identical images give `f64::INFINITY`.
pub fn calculate_psnr(reconstructed: &Path, source: &Path) -> InrResult<f64> {
    let recon = image::open(reconstructed)
        .map_err(InrError::image(reconstructed))?
        .to_rgb8();
    let mut src = image::open(source).map_err(InrError::image(source))?.to_rgb8();
    if src.dimensions() != recon.dimensions() {
        let (w, h) = recon.dimensions();
        log::debug!(
            "resizing {} from {:?} to {w}x{h} for PSNR",
            source.display(),
            src.dimensions()
        );
        src = image::imageops::resize(&src, w, h, FilterType::Triangle);
    }
    Ok(psnr_u8(recon.as_raw(), src.as_raw()))
}

pub fn psnr_u8(a: &[u8], b: &[u8]) -> f64 {
    let n = a.len().min(b.len());
    if n == 0 {
        return f64::NAN;
    }
    let sum: f64 = a
        .iter()
        .zip(b)
        .map(|(x, y)| {
            let d = (*x as f64 - *y as f64) / 255.0;
            d * d
        })
        .sum();
    let mse = sum / n as f64;
    10.0 * (1.0 / mse).log10()
}
