use anyhow::Context;
use clap::Parser;
use inr_training::{run_train, HyperParameters};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "train",
    about = "Fit an implicit neural representation (Siren/MLP/DinerSiren/DinerMLP) to one image"
)]
struct Args {
    /// TOML file with hyperparameters; when given, it replaces the flags below
    /// (fields the file omits take their defaults, not the flag values).
    #[arg(long)]
    config: Option<PathBuf>,
    #[command(flatten)]
    params: HyperParameters,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let params = match args.config {
        Some(path) => {
            if args.params.differs_from_default() {
                log::warn!(
                    "--config {} is set; ignoring hyperparameter flags",
                    path.display()
                );
            }
            HyperParameters::from_path(&path)
                .with_context(|| format!("failed to load config {}", path.display()))?
        }
        None => args.params,
    };

    let report = run_train(&params).context("training run failed")?;
    println!(
        "{}: {} epochs in {:.2}s, best PSNR {:.2} dB, summary in {}",
        report.model_type,
        report.epochs,
        report.time_cost,
        report.max_psnr,
        params.run_dir().display()
    );
    Ok(())
}
