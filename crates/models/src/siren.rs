use burn::module::Module;
use burn::nn;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::{CoordinateModel, InrConfig};

/// Linear layer followed by `sin(omega_0 * x)`.
#[derive(Module, Debug)]
pub struct SineLayer<B: Backend> {
    linear: nn::Linear<B>,
    omega_0: f32,
}

impl<B: Backend> SineLayer<B> {
    /// First layers draw weights from `U(-1/in, 1/in)`; later ones from
    /// `U(-sqrt(6/in)/omega_0, sqrt(6/in)/omega_0)` so activations stay in the
    /// sine's well-behaved range.
    pub fn new(
        input_dim: usize,
        output_dim: usize,
        omega_0: f32,
        is_first: bool,
        device: &B::Device,
    ) -> Self {
        let bound = if is_first {
            1.0 / input_dim as f64
        } else {
            hidden_bound(input_dim, omega_0)
        };
        let linear = nn::LinearConfig::new(input_dim, output_dim)
            .with_initializer(nn::Initializer::Uniform {
                min: -bound,
                max: bound,
            })
            .init(device);
        Self { linear, omega_0 }
    }

    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        self.linear.forward(input).mul_scalar(self.omega_0).sin()
    }
}

fn hidden_bound(input_dim: usize, omega_0: f32) -> f64 {
    (6.0 / input_dim as f64).sqrt() / omega_0 as f64
}

/// Sinusoidal representation network with a linear output head.
#[derive(Module, Debug)]
pub struct Siren<B: Backend> {
    layers: Vec<SineLayer<B>>,
    head: nn::Linear<B>,
}

impl<B: Backend> Siren<B> {
    pub fn new(cfg: &InrConfig, device: &B::Device) -> Self {
        let mut layers = Vec::with_capacity(cfg.hidden_layers + 1);
        layers.push(SineLayer::new(
            cfg.in_features,
            cfg.hidden_features,
            cfg.omega_0,
            true,
            device,
        ));
        for _ in 0..cfg.hidden_layers {
            layers.push(SineLayer::new(
                cfg.hidden_features,
                cfg.hidden_features,
                cfg.omega_0,
                false,
                device,
            ));
        }

        let bound = hidden_bound(cfg.hidden_features, cfg.omega_0);
        let head = nn::LinearConfig::new(cfg.hidden_features, cfg.out_features)
            .with_initializer(nn::Initializer::Uniform {
                min: -bound,
                max: bound,
            })
            .init(device);

        Self { layers, head }
    }
}

impl<B: Backend> CoordinateModel<B> for Siren<B> {
    fn forward(&self, coords: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = coords;
        for layer in &self.layers {
            x = layer.forward(x);
        }
        self.head.forward(x)
    }
}
