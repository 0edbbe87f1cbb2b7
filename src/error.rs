//! Error type shared by the renderer, the catalog, and chart storage.

use std::path::PathBuf;

use thiserror::Error;

/// Everything that can go wrong while building, storing, or rendering a chart.
#[derive(Debug, Error)]
pub enum FigureError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported output format `{0}` (expected svg or png)")]
    UnsupportedFormat(String),

    #[error("unknown figure `{0}`")]
    UnknownFigure(String),

    /// Plotters drawing errors are generic over the backend, so they are
    /// flattened to their debug text.
    #[error("drawing backend error: {0}")]
    Backend(String),

    #[error("image encoding failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid chart JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("unknown color `{0}`")]
    InvalidColor(String),

    #[error("invalid series format string `{0}`")]
    InvalidFormat(String),
}

impl FigureError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FigureError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Map any plotters error into [`FigureError::Backend`].
pub(crate) fn backend_err<E: std::fmt::Debug>(e: E) -> FigureError {
    FigureError::Backend(format!("{e:?}"))
}

pub type Result<T> = std::result::Result<T, FigureError>;
