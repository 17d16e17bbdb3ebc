//! Media CDN access.

mod media_fetcher;
mod urls;

pub use media_fetcher::{HttpMediaFetcher, MediaFetcherConfig};
pub use urls::filename_from_url;
