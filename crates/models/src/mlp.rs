use burn::module::Module;
use burn::nn;
use burn::tensor::activation::relu;
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

use crate::{CoordinateModel, InrConfig};

/// ReLU multilayer perceptron with a linear output head.
#[derive(Module, Debug)]
pub struct Mlp<B: Backend> {
    stem: nn::Linear<B>,
    blocks: Vec<nn::Linear<B>>,
    head: nn::Linear<B>,
}

impl<B: Backend> Mlp<B> {
    pub fn new(cfg: &InrConfig, device: &B::Device) -> Self {
        let stem = nn::LinearConfig::new(cfg.in_features, cfg.hidden_features).init(device);
        let mut blocks = Vec::with_capacity(cfg.hidden_layers);
        for _ in 0..cfg.hidden_layers {
            blocks.push(nn::LinearConfig::new(cfg.hidden_features, cfg.hidden_features).init(device));
        }
        let head = nn::LinearConfig::new(cfg.hidden_features, cfg.out_features).init(device);
        Self { stem, blocks, head }
    }
}

impl<B: Backend> CoordinateModel<B> for Mlp<B> {
    fn forward(&self, coords: Tensor<B, 2>) -> Tensor<B, 2> {
        let mut x = relu(self.stem.forward(coords));
        for block in &self.blocks {
            x = relu(block.forward(x));
        }
        self.head.forward(x)
    }
}
