use burn::tensor::{backend::Backend, Tensor, TensorData};
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::path::PathBuf;

use crate::config::{HyperParameters, Resolution};
use crate::{InrError, InrResult};

#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub image_path: PathBuf,
    pub sidelength: u32,
    pub grayscale: bool,
    pub remain_raw_resolution: bool,
    pub input_dim: usize,
}

impl From<&HyperParameters> for DatasetConfig {
    fn from(params: &HyperParameters) -> Self {
        Self {
            image_path: params.img_path.clone(),
            sidelength: params.sidelength,
            grayscale: params.grayscale,
            remain_raw_resolution: params.remain_raw_resolution,
            input_dim: params.input_dim,
        }
    }
}

/// One image flattened into per-pixel (coordinate, color) pairs, row-major.
#[derive(Debug, Clone)]
pub struct ImageDataset {
    resolution: Resolution,
    input_dim: usize,
    channels: usize,
    /// `[len, input_dim]` coordinates in [-1, 1].
    coords: Vec<f32>,
    /// `[len, channels]` colors in [-1, 1].
    colors: Vec<f32>,
}

impl DatasetConfig {
    pub fn load(&self) -> InrResult<ImageDataset> {
        let img = image::open(&self.image_path).map_err(InrError::image(&self.image_path))?;
        let img = if self.remain_raw_resolution {
            img
        } else {
            img.resize_exact(self.sidelength, self.sidelength, FilterType::Triangle)
        };
        let dataset = ImageDataset::from_image(&img, self.grayscale, self.input_dim)?;
        log::info!(
            "loaded {} at {} ({} samples, {} channel(s))",
            self.image_path.display(),
            dataset.resolution(),
            dataset.len(),
            dataset.channels()
        );
        Ok(dataset)
    }
}

impl ImageDataset {
    pub fn from_image(img: &DynamicImage, grayscale: bool, input_dim: usize) -> InrResult<Self> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(InrError::Config("image has no pixels".into()));
        }
        if input_dim == 0 {
            return Err(InrError::Config("input_dim must be positive".into()));
        }

        let raw = if grayscale {
            img.to_luma8().into_raw()
        } else {
            img.to_rgb8().into_raw()
        };
        let colors = raw.into_iter().map(|v| v as f32 / 255.0 * 2.0 - 1.0).collect();
        let resolution = Resolution::new(width, height);

        Ok(Self {
            resolution,
            input_dim,
            channels: if grayscale { 1 } else { 3 },
            coords: coordinate_grid(resolution, input_dim),
            colors,
        })
    }

    pub fn len(&self) -> usize {
        self.resolution.pixels()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn input_dim(&self) -> usize {
        self.input_dim
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// `(coordinates [len, input_dim], colors [len, channels])` on `device`.
    pub fn to_tensors<B: Backend>(&self, device: &B::Device) -> (Tensor<B, 2>, Tensor<B, 2>) {
        let n = self.len();
        let coords = Tensor::<B, 2>::from_data(
            TensorData::new(self.coords.clone(), [n, self.input_dim]),
            device,
        );
        let colors = Tensor::<B, 2>::from_data(
            TensorData::new(self.colors.clone(), [n, self.channels]),
            device,
        );
        (coords, colors)
    }
}

fn axis(i: u32, n: u32) -> f32 {
    if n <= 1 {
        0.0
    } else {
        -1.0 + 2.0 * i as f32 / (n - 1) as f32
    }
}

/// Row-major coordinates for every pixel of `resolution`.
///
/// With `input_dim == 1` each pixel gets its linear index mapped to [-1, 1];
/// otherwise `(row, col)` in [-1, 1] followed by zeros up to `input_dim`.
pub fn coordinate_grid(resolution: Resolution, input_dim: usize) -> Vec<f32> {
    let Resolution { width, height } = resolution;
    let n = resolution.pixels();
    let mut coords = Vec::with_capacity(n * input_dim);
    for y in 0..height {
        for x in 0..width {
            if input_dim == 1 {
                let idx = (y * width + x) as usize;
                let v = if n <= 1 {
                    0.0
                } else {
                    -1.0 + 2.0 * idx as f32 / (n - 1) as f32
                };
                coords.push(v);
                continue;
            }
            coords.push(axis(y, height));
            coords.push(axis(x, width));
            coords.extend(std::iter::repeat(0.0).take(input_dim - 2));
        }
    }
    coords
}
