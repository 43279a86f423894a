use std::path::PathBuf;

use crate::graphics::GraphicsError;

/// Failures that prevent a filter instance from being created.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("effect file {name} not found under {}", data_dir.display())]
    EffectMissing { name: String, data_dir: PathBuf },
    #[error(transparent)]
    EffectLoad(#[from] GraphicsError),
}
