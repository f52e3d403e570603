#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("chart '{chart}' has no plottable series")]
    EmptyChart { chart: String },

    #[error("failed to save chart '{chart}': {message}")]
    Save { chart: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
