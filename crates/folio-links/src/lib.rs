//! Link card metadata.
//!
//! Cards without an author-supplied title fetch the target page through a
//! CORS proxy and read its title, description and image from meta tags.
//! Fetched HTML is untrusted: it is scanned for metadata and discarded.
//!
//! - [`ProxyMetadataSource`] fetches and caches page metadata as a
//!   [`LinkMetadataSource`](folio_renderer::LinkMetadataSource)
//! - [`LinkCardState`] keeps one card's fetch cancellable and its image
//!   failure flag
//! - [`LinkCardProcessor`] plugs into the renderer as a
//!   [`LinkCardHook`](folio_renderer::LinkCardHook) and mounts one
//!   [`LinkCardState`] per card

mod card;
mod extract;
mod fetch;
mod processor;

pub use card::{FetchJob, FetchOutcome, LinkCardState};
pub use extract::extract_metadata;
pub use fetch::{
    DEFAULT_PROXY_URL, DEFAULT_TIMEOUT, FetchError, ProxyFetcher, ProxyMetadataSource, proxy_url,
};
pub use processor::LinkCardProcessor;
