use anyhow::Context;
use clap::Parser;
use inr_training::calculate_psnr;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "psnr", about = "PSNR (dB) of a reconstruction against its source image")]
struct Args {
    /// Reconstructed image.
    reconstructed: PathBuf,
    /// Source image; resized to the reconstruction's size if they differ.
    source: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let psnr = calculate_psnr(&args.reconstructed, &args.source).with_context(|| {
        format!(
            "failed to compare {} with {}",
            args.reconstructed.display(),
            args.source.display()
        )
    })?;
    println!("PSNR: {psnr:.2}");
    Ok(())
}
