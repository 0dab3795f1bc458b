//! Cover artwork for the now-playing entry.
//!
//! Artwork is downloaded from the URL scraped off the page, decoded with the
//! `image` crate and normalized to a fixed square. Anything that goes wrong
//! is reported as an [`ArtworkError`]; callers fall back to
//! [`CoverImage::placeholder`].

pub mod client;
pub mod cover;
pub mod error;

pub use client::{CoverFetcher, FetchConfig};
pub use cover::{COVER_SIZE, CoverImage, PLACEHOLDER_GRAY};
pub use error::ArtworkError;
