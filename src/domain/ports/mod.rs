//! Port definitions for external dependencies.

mod media_fetch_port;

pub use media_fetch_port::MediaFetchPort;
