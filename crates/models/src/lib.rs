//! Burn coordinate networks for implicit neural representations.
//!
//! Four architectures map per-pixel inputs to colors:
//! - `Siren`: sine-activated layers over the coordinates.
//! - `Mlp`: ReLU layers over the coordinates.
//! - `DinerSiren` / `DinerMlp`: a learnable per-sample table is fed through a
//!   Siren/MLP instead of the coordinates, so the table length is fixed to the
//!   number of training samples.
//!
//! These are plain Burn modules. Choosing one from a string tag and driving
//! the optimizer lives in the `inr_training` crate.

use burn::module::Module;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

mod diner;
mod kind;
mod mlp;
mod siren;

pub use diner::{DinerMlp, DinerSiren};
pub use kind::{ModelKind, UnknownModelKind};
pub use mlp::Mlp;
pub use siren::{SineLayer, Siren};

/// Architecture parameters shared by every model kind.
#[derive(Debug, Clone)]
pub struct InrConfig {
    /// Width of each input vector (coordinate or table row).
    pub in_features: usize,
    /// Color channels produced per sample.
    pub out_features: usize,
    pub hidden_features: usize,
    /// Hidden layers after the first one.
    pub hidden_layers: usize,
    /// Sine frequency for the first and hidden Siren layers.
    pub omega_0: f32,
    /// Rows of the DINER table; ignored by `Siren` and `Mlp`.
    pub table_len: usize,
}

impl Default for InrConfig {
    fn default() -> Self {
        Self {
            in_features: 2,
            out_features: 3,
            hidden_features: 64,
            hidden_layers: 2,
            omega_0: 30.0,
            table_len: 0,
        }
    }
}

/// A network that maps a batch of coordinates `[n, in]` to predictions `[n, out]`.
pub trait CoordinateModel<B: Backend>: Module<B> {
    fn forward(&self, coords: Tensor<B, 2>) -> Tensor<B, 2>;

    /// Number of samples the model is bound to, if its output ignores the coordinates.
    fn fixed_samples(&self) -> Option<usize> {
        None
    }
}
