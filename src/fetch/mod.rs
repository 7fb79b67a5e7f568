pub mod fetcher;
pub mod http;

pub use fetcher::{FetchError, Fetcher};
pub use http::HttpFetcher;
