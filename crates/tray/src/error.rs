/// Errors from tray resources.
#[derive(Debug, thiserror::Error)]
pub enum TrayError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("encode error: {0}")]
    Encode(image::ImageError),

    #[error("icon file is empty")]
    EmptyIcon,
}
