//! DINER variants: every training sample owns a learnable row in a table and
//! the network decodes the table instead of the raw coordinates. The
//! coordinates passed to `forward` are only used for their batch size.

use burn::module::{Module, Param};
use burn::tensor::backend::Backend;
use burn::tensor::{Distribution, Tensor};

use crate::{CoordinateModel, InrConfig, Mlp, Siren};

const TABLE_INIT_SCALE: f64 = 1e-4;

fn init_table<B: Backend>(cfg: &InrConfig, device: &B::Device) -> Param<Tensor<B, 2>> {
    let table = Tensor::<B, 2>::random(
        [cfg.table_len, cfg.in_features],
        Distribution::Uniform(-TABLE_INIT_SCALE, TABLE_INIT_SCALE),
        device,
    );
    Param::from_tensor(table)
}

#[derive(Module, Debug)]
pub struct DinerSiren<B: Backend> {
    table: Param<Tensor<B, 2>>,
    net: Siren<B>,
}

impl<B: Backend> DinerSiren<B> {
    pub fn new(cfg: &InrConfig, device: &B::Device) -> Self {
        Self {
            table: init_table(cfg, device),
            net: Siren::new(cfg, device),
        }
    }
}

impl<B: Backend> CoordinateModel<B> for DinerSiren<B> {
    fn forward(&self, _coords: Tensor<B, 2>) -> Tensor<B, 2> {
        self.net.forward(self.table.val()).clamp(-1.0, 1.0)
    }

    fn fixed_samples(&self) -> Option<usize> {
        Some(self.table.val().dims()[0])
    }
}

#[derive(Module, Debug)]
pub struct DinerMlp<B: Backend> {
    table: Param<Tensor<B, 2>>,
    net: Mlp<B>,
}

impl<B: Backend> DinerMlp<B> {
    pub fn new(cfg: &InrConfig, device: &B::Device) -> Self {
        Self {
            table: init_table(cfg, device),
            net: Mlp::new(cfg, device),
        }
    }
}

impl<B: Backend> CoordinateModel<B> for DinerMlp<B> {
    fn forward(&self, _coords: Tensor<B, 2>) -> Tensor<B, 2> {
        self.net.forward(self.table.val()).clamp(-1.0, 1.0)
    }

    fn fixed_samples(&self) -> Option<usize> {
        Some(self.table.val().dims()[0])
    }
}
