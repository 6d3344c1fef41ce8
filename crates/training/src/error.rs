use std::path::PathBuf;

use inr_models::UnknownModelKind;
use thiserror::Error;

pub type InrResult<T> = Result<T, InrError>;

#[derive(Debug, Error)]
pub enum InrError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("not implemented: {0}")]
    NotImplemented(String),
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("image error at {path}: {source}")]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("config parse error at {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("render failed: {0}")]
    Render(String),
}

impl From<UnknownModelKind> for InrError {
    fn from(err: UnknownModelKind) -> Self {
        InrError::NotImplemented(err.to_string())
    }
}

impl InrError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| InrError::Io { path, source }
    }

    pub(crate) fn image(path: impl Into<PathBuf>) -> impl FnOnce(image::ImageError) -> Self {
        let path = path.into();
        move |source| InrError::Image { path, source }
    }
}
