//! Cover artwork source seam.

use std::future::Future;
use std::pin::Pin;

use deezbar_artwork::{ArtworkError, CoverFetcher, CoverImage};

/// Boxed future returned by [`CoverSource::fetch_cover`].
pub type CoverFuture<'a> = Pin<Box<dyn Future<Output = Result<CoverImage, ArtworkError>> + Send + 'a>>;

/// Something that turns a cover URL into a decoded cover.
///
/// Implemented by [`CoverFetcher`]; tests substitute scripted sources.
pub trait CoverSource: Send + Sync {
    fn fetch_cover<'a>(&'a self, url: &'a str) -> CoverFuture<'a>;
}

impl CoverSource for CoverFetcher {
    fn fetch_cover<'a>(&'a self, url: &'a str) -> CoverFuture<'a> {
        Box::pin(self.fetch(url))
    }
}

/// Resolves the cover for a snapshot. Never fails: a missing URL or any
/// fetch error yields the placeholder.
pub async fn resolve_cover(source: &dyn CoverSource, url: Option<&str>) -> CoverImage {
    let Some(url) = url.filter(|u| !u.is_empty()) else {
        return CoverImage::placeholder();
    };

    match source.fetch_cover(url).await {
        Ok(cover) => cover,
        Err(e) => {
            tracing::warn!(url, "cover unavailable, using placeholder: {e}");
            CoverImage::placeholder()
        }
    }
}
