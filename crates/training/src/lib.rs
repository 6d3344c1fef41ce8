#![recursion_limit = "256"]

pub mod config;
pub mod dataset;
pub mod error;
pub mod logger;
pub mod loss;
pub mod render;
pub mod util;

pub use config::{HyperParameters, Resolution};
pub use dataset::{coordinate_grid, DatasetConfig, ImageDataset};
pub use error::{InrError, InrResult};
pub use inr_models::{CoordinateModel, DinerMlp, DinerSiren, InrConfig, Mlp, ModelKind, Siren};
pub use logger::RunLog;
pub use loss::{mse_to_psnr, relative_l2_loss};
pub use render::{calculate_psnr, render};
pub use util::{fit, run_train, should_report, EpochMetrics, FitOutcome, TrainReport};
/// Backend alias for training/eval (NdArray by default; WGPU if enabled).
#[cfg(feature = "backend-wgpu")]
pub type TrainBackend = burn_wgpu::Wgpu<f32>;
#[cfg(not(feature = "backend-wgpu"))]
pub type TrainBackend = burn_ndarray::NdArray<f32>;
