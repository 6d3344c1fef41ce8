use burn::tensor::{backend::Backend, Tensor};

const RELATIVE_EPS: f32 = 0.01;

/// Squared error normalized by the (detached) squared prediction.
///
/// Both tensors hold [-1, 1] values and are shifted to [0, 1] first:
/// `mean((o - t)^2 / (detach(o)^2 + 0.01))` with `o = (out + 1) / 2`, `t = (tgt + 1) / 2`.
pub fn relative_l2_loss<B: Backend, const D: usize>(
    output: Tensor<B, D>,
    targets: Tensor<B, D>,
) -> Tensor<B, 1> {
    let output = output.add_scalar(1.0).div_scalar(2.0);
    let targets = targets.add_scalar(1.0).div_scalar(2.0);
    let scale = output.clone().detach();
    let scale = (scale.clone() * scale).add_scalar(RELATIVE_EPS);
    let diff = output - targets;
    ((diff.clone() * diff) / scale).mean()
}

/// PSNR for an MSE measured on [-1, 1] signals (peak-to-peak range 2).
pub fn mse_to_psnr(mse: f64) -> f64 {
    10.0 * (4.0 / mse).log10()
}
