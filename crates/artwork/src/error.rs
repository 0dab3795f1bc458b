//! Error types for artwork retrieval.

/// Errors produced while fetching or decoding cover artwork.
#[derive(Debug, thiserror::Error)]
pub enum ArtworkError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(u16),

    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("cover larger than {limit} bytes")]
    TooLarge { limit: usize },

    #[error("image is empty or invalid")]
    Empty,
}
