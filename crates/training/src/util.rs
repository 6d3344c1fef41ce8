use burn::backend::Autodiff;
use burn::module::AutodiffModule;
use burn::nn::loss::{MseLoss, Reduction};
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::Tensor;
use inr_models::{CoordinateModel, DinerMlp, DinerSiren, InrConfig, Mlp, ModelKind, Siren};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::config::{HyperParameters, LOG_FILE, RECON_FILE, SUMMARY_FILE};
use crate::dataset::{DatasetConfig, ImageDataset};
use crate::logger::RunLog;
use crate::loss::{mse_to_psnr, relative_l2_loss};
use crate::render::{calculate_psnr, render};
use crate::{InrError, InrResult, TrainBackend};

pub type ADBackend = Autodiff<TrainBackend>;

/// Scalars recorded after each optimization step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EpochMetrics {
    pub epoch: usize,
    pub mse: f64,
    pub relative_l2: f64,
    pub psnr: f64,
    /// Running maximum of `psnr` up to and including this epoch.
    pub max_psnr: f64,
    /// Accumulated optimization time in seconds.
    pub time_cost: f64,
}

pub struct FitOutcome<M> {
    pub model: M,
    pub history: Vec<EpochMetrics>,
    pub max_psnr: f64,
    pub time_cost: f64,
}

/// What a finished run produced; also written to `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct TrainReport {
    pub experiment_name: String,
    pub model_type: String,
    pub num_params: usize,
    pub samples: usize,
    pub epochs: usize,
    pub final_loss: f64,
    pub max_psnr: f64,
    pub time_cost: f64,
    pub recon_psnr: f64,
    pub log_path: PathBuf,
    pub recon_path: PathBuf,
    /// One entry per epoch, in order.
    pub history: Vec<EpochMetrics>,
}

/// Whether the epoch with zero-based index `epoch` writes a log line.
pub fn should_report(epoch: usize, steps_til_summary: usize) -> bool {
    steps_til_summary > 0 && (epoch + 1) % steps_til_summary == 0
}

pub fn run_train(params: &HyperParameters) -> InrResult<TrainReport> {
    params.validate()?;
    let kind: ModelKind = params.model_type.parse()?;

    if let Some(seed) = params.seed {
        <ADBackend as Backend>::seed(seed);
    }
    let device = <ADBackend as Backend>::Device::default();

    let dataset = DatasetConfig::from(params).load()?;

    let run_dir = params.run_dir();
    fs::create_dir_all(&run_dir).map_err(InrError::io(&run_dir))?;
    let mut run_log = RunLog::open(run_dir.join(LOG_FILE))?;
    let recon_path = run_dir.join(RECON_FILE);

    let arch = InrConfig {
        in_features: params.input_dim,
        out_features: dataset.channels(),
        hidden_features: params.hidden_features,
        hidden_layers: params.hidden_layers,
        omega_0: params.w0 as f32,
        table_len: dataset.len(),
    };
    log::info!(
        "training {kind} on {} samples for {} epochs (lr {})",
        dataset.len(),
        params.epochs,
        params.lr
    );

    let fitted = match kind {
        ModelKind::Siren => fit_and_render(
            Siren::<ADBackend>::new(&arch, &device),
            &dataset,
            params,
            &mut run_log,
            &recon_path,
            &device,
        )?,
        ModelKind::Mlp => fit_and_render(
            Mlp::<ADBackend>::new(&arch, &device),
            &dataset,
            params,
            &mut run_log,
            &recon_path,
            &device,
        )?,
        ModelKind::DinerSiren => fit_and_render(
            DinerSiren::<ADBackend>::new(&arch, &device),
            &dataset,
            params,
            &mut run_log,
            &recon_path,
            &device,
        )?,
        ModelKind::DinerMlp => fit_and_render(
            DinerMlp::<ADBackend>::new(&arch, &device),
            &dataset,
            params,
            &mut run_log,
            &recon_path,
            &device,
        )?,
    };

    let recon_psnr = calculate_psnr(&recon_path, &params.img_path)?;
    println!("Reconstruction PSNR: {recon_psnr:.2}");

    let report = TrainReport {
        experiment_name: params.experiment_name.clone(),
        model_type: kind.tag().to_string(),
        num_params: fitted.num_params,
        samples: dataset.len(),
        epochs: params.epochs,
        final_loss: fitted.final_loss,
        max_psnr: fitted.max_psnr,
        time_cost: fitted.time_cost,
        recon_psnr,
        log_path: run_log.path().to_path_buf(),
        recon_path,
        history: fitted.history,
    };
    let summary_path = run_dir.join(SUMMARY_FILE);
    fs::write(&summary_path, serde_json::to_string_pretty(&report)?)
        .map_err(InrError::io(&summary_path))?;

    Ok(report)
}

struct Fitted {
    num_params: usize,
    final_loss: f64,
    max_psnr: f64,
    time_cost: f64,
    history: Vec<EpochMetrics>,
}

fn fit_and_render<B, M>(
    model: M,
    dataset: &ImageDataset,
    params: &HyperParameters,
    run_log: &mut RunLog,
    recon_path: &Path,
    device: &B::Device,
) -> InrResult<Fitted>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + CoordinateModel<B>,
    M::InnerModule: CoordinateModel<B::InnerBackend>,
{
    let num_params = model.num_params();
    log::info!("model has {num_params} parameters");

    let (coords, targets) = dataset.to_tensors::<B>(device);
    let outcome = fit(model, coords, targets, params, run_log, device)?;

    let resolution = params.render_resolution.unwrap_or(dataset.resolution());
    render::<B::InnerBackend, _>(
        &outcome.model.valid(),
        recon_path,
        resolution,
        dataset.input_dim(),
        dataset.channels(),
        device,
    )?;
    log::info!("wrote {} at {resolution}", recon_path.display());

    Ok(Fitted {
        num_params,
        final_loss: outcome.history.last().map(|m| m.mse).unwrap_or(f64::NAN),
        max_psnr: outcome.max_psnr,
        time_cost: outcome.time_cost,
        history: outcome.history,
    })
}

/// Full-batch optimization: one forward pass over every sample per epoch,
/// one Adam step on the relative L2 loss. MSE is tracked for PSNR only.
pub fn fit<B, M>(
    mut model: M,
    coords: Tensor<B, 2>,
    targets: Tensor<B, 2>,
    params: &HyperParameters,
    run_log: &mut RunLog,
    device: &B::Device,
) -> InrResult<FitOutcome<M>>
where
    B: AutodiffBackend,
    M: AutodiffModule<B> + CoordinateModel<B>,
{
    let mut optim = AdamConfig::new().init();
    let mse = MseLoss::new();

    let mut history = Vec::with_capacity(params.epochs);
    let mut max_psnr = 0.0f64;
    let mut time_cost = 0.0f64;

    for epoch in 0..params.epochs {
        let start = Instant::now();

        let output = model.forward(coords.clone());
        let loss = relative_l2_loss(output.clone(), targets.clone());
        let loss_mse = mse
            .forward(output, targets.clone(), Reduction::Mean)
            .detach();
        let loss_detached = loss.clone().detach();

        let grads = GradientsParams::from_grads(loss.backward(), &model);
        model = optim.step(params.lr, model, grads);

        B::sync(device);
        time_cost += start.elapsed().as_secs_f64();

        let mse_val = scalar(loss_mse);
        let psnr = mse_to_psnr(mse_val);
        max_psnr = max_psnr.max(psnr);

        let metrics = EpochMetrics {
            epoch: epoch + 1,
            mse: mse_val,
            relative_l2: scalar(loss_detached),
            psnr,
            max_psnr,
            time_cost,
        };
        log::debug!(
            "epoch {}: mse {:.6} rel-l2 {:.6} psnr {:.2}",
            metrics.epoch,
            metrics.mse,
            metrics.relative_l2,
            metrics.psnr
        );

        if should_report(epoch, params.steps_til_summary) {
            run_log.write_line(&format!(
                "[TRAIN] Epoch: {} Loss: {} PSNR: {} Time: {:.2}",
                metrics.epoch, metrics.mse, metrics.psnr, metrics.time_cost
            ))?;
        }
        history.push(metrics);
    }

    log::info!("best PSNR {max_psnr:.2} dB after {time_cost:.2}s of optimization");

    Ok(FitOutcome {
        model,
        history,
        max_psnr,
        time_cost,
    })
}

fn scalar<B: Backend>(t: Tensor<B, 1>) -> f64 {
    t.into_data()
        .to_vec::<f32>()
        .unwrap_or_default()
        .into_iter()
        .next()
        .map(f64::from)
        .unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_on_interval_boundaries() {
        let epochs: Vec<usize> = (0..10).filter(|e| should_report(*e, 3)).collect();
        assert_eq!(epochs, vec![2, 5, 8]);
    }

    #[test]
    fn every_epoch_reports_with_interval_one() {
        assert!((0..5).all(|e| should_report(e, 1)));
        assert!(!should_report(0, 0));
    }
}
