use hand_gesture::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("preview window: {0}")]
    Window(String),

    #[error("hand tracking device: {0}")]
    Device(String),

    #[error("capture lost after {failures} consecutive failed frames")]
    CaptureLost { failures: u32 },
}
