//! Network layer - request/response model and the fetcher seam.

mod error;
mod fetcher;
#[cfg(test)]
pub mod mock;
mod request;
mod response;

pub use error::FetchError;
pub use fetcher::{Fetcher, HttpFetcher};
pub use request::{CacheMode, Request, RequestKey};
pub use response::Response;
