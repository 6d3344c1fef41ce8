//! Run hyperparameters: `clap` flags for the `train` binary, or a TOML file
//! where any subset of fields may be set.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Args;
use serde::{Deserialize, Serialize};

use crate::{InrError, InrResult};

const DEFAULT_IMG_PATH: &str = "pic/image.png";
const DEFAULT_STEPS: usize = 1000;
const DEFAULT_LR: f64 = 1e-3;
const DEFAULT_HIDDEN_LAYERS: usize = 2;
const DEFAULT_HIDDEN_FEATURES: usize = 64;
const DEFAULT_SIDELENGTH: u32 = 256;
const DEFAULT_W0: f64 = 30.0;
const DEFAULT_MODEL_TYPE: &str = "DinerMLP";
const DEFAULT_STEPS_TIL_SUMMARY: usize = 100;
const DEFAULT_INPUT_DIM: usize = 2;
const DEFAULT_EPOCHS: usize = 1000;
const DEFAULT_EXPERIMENT_NAME: &str = "diner_mlp";
const DEFAULT_LOG_DIR: &str = "log";

pub const LOG_FILE: &str = "log.txt";
pub const RECON_FILE: &str = "recon.png";
pub const SUMMARY_FILE: &str = "summary.json";

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParameters {
    /// Source image to fit.
    #[arg(long, default_value = DEFAULT_IMG_PATH)]
    pub img_path: PathBuf,
    /// Nominal step budget; must be a multiple of --steps-til-summary.
    #[arg(long, default_value_t = DEFAULT_STEPS)]
    pub steps: usize,
    /// Adam learning rate.
    #[arg(long, default_value_t = DEFAULT_LR)]
    pub lr: f64,
    /// Hidden layers after the first layer.
    #[arg(long, default_value_t = DEFAULT_HIDDEN_LAYERS)]
    pub hidden_layers: usize,
    /// Width of every hidden layer.
    #[arg(long, default_value_t = DEFAULT_HIDDEN_FEATURES)]
    pub hidden_features: usize,
    /// Square side the image is resized to (unless --remain-raw-resolution).
    #[arg(long, default_value_t = DEFAULT_SIDELENGTH)]
    pub sidelength: u32,
    /// Fit a single luma channel instead of RGB.
    #[arg(long, default_value_t = false)]
    pub grayscale: bool,
    /// Sine frequency for Siren layers.
    #[arg(long, default_value_t = DEFAULT_W0)]
    pub w0: f64,
    /// One of Siren, MLP, DinerSiren, DinerMLP.
    #[arg(long, default_value = DEFAULT_MODEL_TYPE)]
    pub model_type: String,
    /// Write a log line every N epochs.
    #[arg(long, default_value_t = DEFAULT_STEPS_TIL_SUMMARY)]
    pub steps_til_summary: usize,
    /// Width of each coordinate (or DINER table row).
    #[arg(long, default_value_t = DEFAULT_INPUT_DIM)]
    pub input_dim: usize,
    /// Number of full-batch optimization steps.
    #[arg(long, default_value_t = DEFAULT_EPOCHS)]
    pub epochs: usize,
    /// Keep the image's own resolution instead of resizing to --sidelength.
    #[arg(long, default_value_t = false)]
    pub remain_raw_resolution: bool,
    /// Run directory name under --log-dir.
    #[arg(long, default_value = DEFAULT_EXPERIMENT_NAME)]
    pub experiment_name: String,
    /// Root directory for run outputs.
    #[arg(long, default_value = DEFAULT_LOG_DIR)]
    pub log_dir: PathBuf,
    /// Reconstruction size as WIDTHxHEIGHT (defaults to the training resolution).
    #[arg(long)]
    pub render_resolution: Option<Resolution>,
    /// Seed for parameter initialization.
    #[arg(long)]
    pub seed: Option<u64>,
}

impl Default for HyperParameters {
    fn default() -> Self {
        Self {
            img_path: PathBuf::from(DEFAULT_IMG_PATH),
            steps: DEFAULT_STEPS,
            lr: DEFAULT_LR,
            hidden_layers: DEFAULT_HIDDEN_LAYERS,
            hidden_features: DEFAULT_HIDDEN_FEATURES,
            sidelength: DEFAULT_SIDELENGTH,
            grayscale: false,
            w0: DEFAULT_W0,
            model_type: DEFAULT_MODEL_TYPE.to_string(),
            steps_til_summary: DEFAULT_STEPS_TIL_SUMMARY,
            input_dim: DEFAULT_INPUT_DIM,
            epochs: DEFAULT_EPOCHS,
            remain_raw_resolution: false,
            experiment_name: DEFAULT_EXPERIMENT_NAME.to_string(),
            log_dir: PathBuf::from(DEFAULT_LOG_DIR),
            render_resolution: None,
            seed: None,
        }
    }
}

impl HyperParameters {
    pub fn from_path(path: &Path) -> InrResult<Self> {
        let raw = std::fs::read_to_string(path).map_err(InrError::io(path))?;
        toml::from_str(&raw).map_err(|source| InrError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Fail-fast checks; nothing is allocated or written before these pass.
    pub fn validate(&self) -> InrResult<()> {
        if self.steps_til_summary == 0 {
            return Err(InrError::Config("steps_til_summary must be positive".into()));
        }
        if self.steps % self.steps_til_summary != 0 {
            return Err(InrError::Config(format!(
                "steps ({}) must be divisible by steps_til_summary ({})",
                self.steps, self.steps_til_summary
            )));
        }
        if self.epochs == 0 {
            return Err(InrError::Config("epochs must be positive".into()));
        }
        if self.input_dim == 0 {
            return Err(InrError::Config("input_dim must be positive".into()));
        }
        if self.hidden_features == 0 {
            return Err(InrError::Config("hidden_features must be positive".into()));
        }
        if !self.remain_raw_resolution && self.sidelength == 0 {
            return Err(InrError::Config("sidelength must be positive".into()));
        }
        if !(self.lr.is_finite() && self.lr > 0.0) {
            return Err(InrError::Config(format!("lr must be positive, got {}", self.lr)));
        }
        if !(self.w0.is_finite() && self.w0 > 0.0) {
            return Err(InrError::Config(format!("w0 must be positive, got {}", self.w0)));
        }
        Ok(())
    }

    /// Whether any field differs from its default, i.e. a flag was changed.
    pub fn differs_from_default(&self) -> bool {
        *self != Self::default()
    }

    pub fn run_dir(&self) -> PathBuf {
        self.log_dir.join(&self.experiment_name)
    }

    pub fn channels(&self) -> usize {
        if self.grayscale {
            1
        } else {
            3
        }
    }
}

/// Image size parsed from `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn pixels(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got `{s}`"))?;
        let width: u32 = w.trim().parse().map_err(|e| format!("bad width `{w}`: {e}"))?;
        let height: u32 = h.trim().parse().map_err(|e| format!("bad height `{h}`: {e}"))?;
        if width == 0 || height == 0 {
            return Err(format!("resolution must be non-zero, got `{s}`"));
        }
        Ok(Self { width, height })
    }
}

impl TryFrom<String> for Resolution {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Resolution> for String {
    fn from(value: Resolution) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Cli {
        #[command(flatten)]
        params: HyperParameters,
    }

    #[test]
    fn flag_defaults_match_default_impl() {
        let cli = Cli::parse_from(["train"]);
        assert_eq!(cli.params, HyperParameters::default());
    }

    #[test]
    fn flags_override_defaults() {
        let cli = Cli::parse_from([
            "train",
            "--model-type",
            "Siren",
            "--epochs",
            "20",
            "--grayscale",
            "--render-resolution",
            "64x32",
        ]);
        assert_eq!(cli.params.model_type, "Siren");
        assert_eq!(cli.params.epochs, 20);
        assert!(cli.params.grayscale);
        assert_eq!(cli.params.render_resolution, Some(Resolution::new(64, 32)));
        assert_eq!(cli.params.channels(), 1);
    }

    #[test]
    fn steps_must_divide_by_summary_interval() {
        let params = HyperParameters {
            steps: 10,
            steps_til_summary: 3,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(InrError::Config(_))));

        let params = HyperParameters {
            steps: 9,
            steps_til_summary: 3,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_summary_interval_is_rejected() {
        let params = HyperParameters {
            steps_til_summary: 0,
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(InrError::Config(_))));
    }

    #[test]
    fn nonpositive_w0_is_rejected() {
        for w0 in [0.0, -30.0, f64::NAN, f64::INFINITY] {
            let params = HyperParameters {
                w0,
                ..Default::default()
            };
            assert!(
                matches!(params.validate(), Err(InrError::Config(_))),
                "w0 {w0} was accepted"
            );
        }
        let params = HyperParameters {
            w0: 1.0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn changed_flags_differ_from_default() {
        let cli = Cli::parse_from(["train"]);
        assert!(!cli.params.differs_from_default());

        let cli = Cli::parse_from(["train", "--w0", "10"]);
        assert!(cli.params.differs_from_default());
    }

    #[test]
    fn resolution_parsing() {
        assert_eq!("1200x1200".parse::<Resolution>(), Ok(Resolution::new(1200, 1200)));
        assert_eq!("8X4".parse::<Resolution>(), Ok(Resolution::new(8, 4)));
        assert!("1200".parse::<Resolution>().is_err());
        assert!("0x4".parse::<Resolution>().is_err());
        assert_eq!(Resolution::new(3, 2).to_string(), "3x2");
    }
}
